use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EarlyStoppingError;

/// Governs how a model's early-stopping tracker behaves during training.
///
/// - `Recording`    — train with validation monitoring and record the best epoch.
/// - `NotRecording` — train with validation monitoring, keep the epoch to yourself.
/// - `Fixed`        — train for exactly `num_epochs` epochs.
/// - `Optimal`      — train for the aggregate of the recorded epochs.
///
/// Only the first two involve recording at all; see `is_recording_capable()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EarlyStoppingMode {
    Recording,
    #[default]
    NotRecording,
    Fixed,
    Optimal,
}

impl EarlyStoppingMode {
    pub const ALL: [EarlyStoppingMode; 4] = [
        EarlyStoppingMode::Recording,
        EarlyStoppingMode::NotRecording,
        EarlyStoppingMode::Fixed,
        EarlyStoppingMode::Optimal,
    ];

    /// True for the modes in which training searches for its own best epoch.
    pub fn is_recording_capable(self) -> bool {
        matches!(self, EarlyStoppingMode::Recording | EarlyStoppingMode::NotRecording)
    }

    /// Literal variant name, as written to tracker files.
    pub fn name(self) -> &'static str {
        match self {
            EarlyStoppingMode::Recording    => "RECORDING",
            EarlyStoppingMode::NotRecording => "NOT_RECORDING",
            EarlyStoppingMode::Fixed        => "FIXED",
            EarlyStoppingMode::Optimal      => "OPTIMAL",
        }
    }
}

impl fmt::Display for EarlyStoppingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EarlyStoppingMode {
    type Err = EarlyStoppingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EarlyStoppingMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| EarlyStoppingError::UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_capability() {
        assert!(EarlyStoppingMode::Recording.is_recording_capable());
        assert!(EarlyStoppingMode::NotRecording.is_recording_capable());
        assert!(!EarlyStoppingMode::Fixed.is_recording_capable());
        assert!(!EarlyStoppingMode::Optimal.is_recording_capable());
    }

    #[test]
    fn test_string_form() {
        assert_eq!(EarlyStoppingMode::Recording.to_string(), "RECORDING");
        assert_eq!(EarlyStoppingMode::NotRecording.to_string(), "NOT_RECORDING");
        assert_eq!(EarlyStoppingMode::Fixed.to_string(), "FIXED");
        assert_eq!(EarlyStoppingMode::Optimal.to_string(), "OPTIMAL");

        for mode in EarlyStoppingMode::ALL {
            assert_eq!(mode.name().parse::<EarlyStoppingMode>().unwrap(), mode);
        }
        assert!(matches!(
            "recording".parse::<EarlyStoppingMode>(),
            Err(EarlyStoppingError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_serde_uses_variant_name() {
        let json = serde_json::to_string(&EarlyStoppingMode::NotRecording).unwrap();
        assert_eq!(json, "\"NOT_RECORDING\"");
        let mode: EarlyStoppingMode = serde_json::from_str("\"OPTIMAL\"").unwrap();
        assert_eq!(mode, EarlyStoppingMode::Optimal);
    }

    #[test]
    fn test_default_is_not_recording() {
        assert_eq!(EarlyStoppingMode::default(), EarlyStoppingMode::NotRecording);
    }
}
