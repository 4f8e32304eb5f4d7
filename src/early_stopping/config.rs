use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::early_stopping::aggregate::AggregateFunction;
use crate::early_stopping::mode::EarlyStoppingMode;
use crate::early_stopping::tracker::EarlyStopping;
use crate::error::EarlyStoppingError;
use crate::train::train_config::TrainConfig;

fn default_max_epochs() -> usize {
    100
}

fn default_patience() -> usize {
    10
}

/// Serializable early-stopping settings for a model.
///
/// Every field has a default, so `{}` is a valid configuration file.
///
/// # Fields
/// - `mode`       — initial tracker mode
/// - `aggregate`  — reduction applied to recorded epochs (`"mean"`, `"median"`, ...)
/// - `num_epochs` — budget for `FIXED` mode
/// - `max_epochs` — upper bound on epochs while searching for the best one
/// - `patience`   — epochs without validation improvement before stopping
/// - `min_delta`  — smallest loss decrease that counts as improvement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyStoppingConfig {
    #[serde(default)]
    pub mode: EarlyStoppingMode,
    #[serde(default)]
    pub aggregate: AggregateFunction,
    #[serde(default)]
    pub num_epochs: Option<usize>,
    #[serde(default = "default_max_epochs")]
    pub max_epochs: usize,
    #[serde(default = "default_patience")]
    pub patience: usize,
    #[serde(default)]
    pub min_delta: f64,
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        EarlyStoppingConfig {
            mode: EarlyStoppingMode::default(),
            aggregate: AggregateFunction::default(),
            num_epochs: None,
            max_epochs: default_max_epochs(),
            patience: default_patience(),
            min_delta: 0.0,
        }
    }
}

impl EarlyStoppingConfig {
    /// Fresh tracker carrying this configuration's mode, aggregate and budget.
    pub fn tracker(&self) -> EarlyStopping {
        let mut tracker = EarlyStopping::new(self.mode).with_aggregate(self.aggregate);
        if let Some(epochs) = self.num_epochs {
            tracker.set_num_epochs(epochs);
        }
        tracker
    }

    /// Epoch-loop settings without progress channel or stop flag.
    pub fn train_config(&self) -> TrainConfig {
        TrainConfig {
            min_delta: self.min_delta,
            ..TrainConfig::new(self.max_epochs, self.patience)
        }
    }

    /// Serializes the configuration to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), EarlyStoppingError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a configuration from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<EarlyStoppingConfig, EarlyStoppingError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
