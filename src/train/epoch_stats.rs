use serde::{Serialize, Deserialize};

/// Per-epoch statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop
/// sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Upper bound on epochs for this run: the exact budget in FIXED/OPTIMAL
    /// mode, `max_epochs` otherwise.
    pub total_epochs: usize,
    /// Training loss reported by the step for this epoch.
    pub train_loss: f64,
    /// Validation loss, if the step monitors one.
    pub val_loss: Option<f64>,
    /// True when this epoch is the best seen so far by the validation monitor.
    pub is_best: bool,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
