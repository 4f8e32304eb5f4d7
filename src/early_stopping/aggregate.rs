use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EarlyStoppingError;

/// Reductions available for turning recorded epochs into one epoch budget.
///
/// The set is closed: trackers persist the active function by `name()` and
/// resolve it again with `from_name()`, so anything not listed here cannot be
/// stored or loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    #[default]
    Mean,
    Median,
    Min,
    Max,
}

impl AggregateFunction {
    pub const ALL: [AggregateFunction; 4] = [
        AggregateFunction::Mean,
        AggregateFunction::Median,
        AggregateFunction::Min,
        AggregateFunction::Max,
    ];

    /// Registry key of this function.
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Mean   => "mean",
            AggregateFunction::Median => "median",
            AggregateFunction::Min    => "min",
            AggregateFunction::Max    => "max",
        }
    }

    /// Looks a function up by its registry key.
    pub fn from_name(name: &str) -> Result<Self, EarlyStoppingError> {
        AggregateFunction::ALL
            .into_iter()
            .find(|func| func.name() == name)
            .ok_or_else(|| EarlyStoppingError::UnknownAggregate(name.to_string()))
    }

    /// Reduces `values` to a single number.
    ///
    /// Returns `None` for an empty slice.
    pub fn apply(self, values: &[usize]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let value = match self {
            AggregateFunction::Mean => {
                values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
            }
            AggregateFunction::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_unstable();
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
                } else {
                    sorted[mid] as f64
                }
            }
            AggregateFunction::Min => values.iter().copied().min()? as f64,
            AggregateFunction::Max => values.iter().copied().max()? as f64,
        };
        Some(value)
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median() {
        let epochs = [10, 20, 30, 40, 60];
        assert_eq!(AggregateFunction::Mean.apply(&epochs), Some(32.0));
        assert_eq!(AggregateFunction::Median.apply(&epochs), Some(30.0));
    }

    #[test]
    fn test_median_even_length_averages_middle() {
        assert_eq!(AggregateFunction::Median.apply(&[40, 10, 30, 20]), Some(25.0));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(AggregateFunction::Min.apply(&[7, 3, 9]), Some(3.0));
        assert_eq!(AggregateFunction::Max.apply(&[7, 3, 9]), Some(9.0));
    }

    #[test]
    fn test_empty_has_no_aggregate() {
        for func in AggregateFunction::ALL {
            assert_eq!(func.apply(&[]), None);
        }
    }

    #[test]
    fn test_registry_lookup() {
        for func in AggregateFunction::ALL {
            assert_eq!(AggregateFunction::from_name(func.name()).unwrap(), func);
        }
        assert!(matches!(
            AggregateFunction::from_name("geometric_mean"),
            Err(EarlyStoppingError::UnknownAggregate(name)) if name == "geometric_mean"
        ));
    }
}
