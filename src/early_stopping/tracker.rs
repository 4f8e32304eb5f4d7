use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::early_stopping::aggregate::AggregateFunction;
use crate::early_stopping::mode::EarlyStoppingMode;
use crate::error::EarlyStoppingError;

/// Epoch bookkeeping for a model that supports early stopping.
///
/// During cross-validation the model runs in `Recording` mode and each fold
/// appends the epoch count its validation monitor settled on. The aggregate
/// of those counts (`optimal_epochs()`) is then the budget for the final fit
/// in `Optimal` mode. `Fixed` mode ignores the record and uses `num_epochs`.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyStopping {
    mode: EarlyStoppingMode,
    trained_epochs: Vec<usize>,
    aggregate: AggregateFunction,
    num_epochs: Option<usize>,
}

/// On-disk layout of a tracker. Field names follow the model metadata files
/// of the surrounding framework.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackerFile {
    trained_epochs: Vec<usize>,
    mode: String,
    #[serde(default)]
    num_epochs: Option<usize>,
    aggregate_func: String,
}

impl Default for EarlyStopping {
    fn default() -> Self {
        EarlyStopping::new(EarlyStoppingMode::default())
    }
}

impl EarlyStopping {
    /// Creates an empty tracker aggregating with the mean.
    pub fn new(mode: EarlyStoppingMode) -> EarlyStopping {
        EarlyStopping {
            mode,
            trained_epochs: Vec::new(),
            aggregate: AggregateFunction::default(),
            num_epochs: None,
        }
    }

    /// Builder-style variant of `set_aggregate`.
    pub fn with_aggregate(mut self, aggregate: AggregateFunction) -> EarlyStopping {
        self.aggregate = aggregate;
        self
    }

    pub fn mode(&self) -> EarlyStoppingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EarlyStoppingMode) {
        if self.mode != mode {
            debug!(from = %self.mode, to = %mode, "early stopping mode changed");
        }
        self.mode = mode;
    }

    pub fn aggregate(&self) -> AggregateFunction {
        self.aggregate
    }

    pub fn set_aggregate(&mut self, aggregate: AggregateFunction) {
        self.aggregate = aggregate;
    }

    /// Epoch count used in `Fixed` mode, if one was set.
    pub fn num_epochs(&self) -> Option<usize> {
        self.num_epochs
    }

    pub fn set_num_epochs(&mut self, epochs: usize) {
        self.num_epochs = Some(epochs);
    }

    /// Recorded epoch counts in recording order.
    pub fn trained_epochs(&self) -> &[usize] {
        &self.trained_epochs
    }

    /// Appends one epoch count to the record.
    pub fn record_epochs(&mut self, epochs: usize) {
        self.trained_epochs.push(epochs);
        debug!(epochs, recorded = self.trained_epochs.len(), "recorded trained epochs");
    }

    /// Forgets every recorded epoch count.
    pub fn clear_epochs(&mut self) {
        self.trained_epochs.clear();
    }

    /// Aggregate of the recorded epochs, rounded half-to-even.
    pub fn optimal_epochs(&self) -> Result<usize, EarlyStoppingError> {
        let value = self.aggregate.apply(&self.trained_epochs).ok_or_else(|| {
            EarlyStoppingError::invalid_state(
                "no epochs have been recorded yet; train in RECORDING mode first",
            )
        })?;
        Ok(value.round_ties_even() as usize)
    }

    /// Epoch budget for the next fit.
    ///
    /// Only meaningful in `Fixed` and `Optimal` mode. The recording modes let
    /// training pick its own stopping point, so asking for a budget there is
    /// an error.
    pub fn get_epochs(&self) -> Result<usize, EarlyStoppingError> {
        match self.mode {
            EarlyStoppingMode::Fixed => self.num_epochs.ok_or_else(|| {
                EarlyStoppingError::invalid_state("FIXED mode requires num_epochs to be set")
            }),
            EarlyStoppingMode::Optimal => self.optimal_epochs(),
            mode => Err(EarlyStoppingError::invalid_state(format!(
                "no epoch budget is defined in {mode} mode"
            ))),
        }
    }

    /// Writes the tracker as pretty-printed JSON, creating parent directories.
    ///
    /// The JSON goes to a uniquely named temp file in the target directory
    /// first and is renamed into place.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), EarlyStoppingError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let record = TrackerFile {
            trained_epochs: self.trained_epochs.clone(),
            mode: self.mode.name().to_string(),
            num_epochs: self.num_epochs,
            aggregate_func: self.aggregate.name().to_string(),
        };

        // Dropping the temp file on any error path deletes it.
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &record)?;
            writer.flush()?;
        }
        tmp.persist(path).map_err(|e| e.error)?;

        info!(path = %path.display(), mode = %self.mode, "saved early stopping state");
        Ok(())
    }

    /// Reads a tracker previously written by `to_file`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<EarlyStopping, EarlyStoppingError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let record: TrackerFile = serde_json::from_reader(reader)
            .map_err(|e| EarlyStoppingError::malformed(path, e.to_string()))?;

        let mode = record
            .mode
            .parse::<EarlyStoppingMode>()
            .map_err(|e| EarlyStoppingError::malformed(path, e.to_string()))?;
        let aggregate = AggregateFunction::from_name(&record.aggregate_func)
            .map_err(|e| EarlyStoppingError::malformed(path, e.to_string()))?;

        info!(
            path = %path.display(),
            %mode,
            recorded = record.trained_epochs.len(),
            "loaded early stopping state"
        );

        Ok(EarlyStopping {
            mode,
            trained_epochs: record.trained_epochs,
            aggregate,
            num_epochs: record.num_epochs,
        })
    }
}
