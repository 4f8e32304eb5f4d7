use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `max_epochs`  — most epochs to run while searching for the best epoch
///                   (RECORDING / NOT_RECORDING mode); ignored when the
///                   tracker dictates an exact budget
/// - `patience`    — epochs without validation improvement before stopping
/// - `min_delta`   — smallest validation loss decrease counted as improvement
/// - `progress_tx` — optional channel sender; one `EpochStats` is sent per
///                   completed epoch.  If the receiver is dropped the loop
///                   terminates early (clean shutdown).
/// - `stop_flag`   — optional atomic flag; when set to `true` from another
///                   thread the loop terminates after the current epoch.
pub struct TrainConfig {
    pub max_epochs: usize,
    pub patience: usize,
    pub min_delta: f64,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(max_epochs: usize, patience: usize) -> Self {
        TrainConfig {
            max_epochs,
            patience,
            min_delta: 0.0,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
