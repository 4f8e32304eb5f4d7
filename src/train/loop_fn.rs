use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{info, trace, warn};

use crate::early_stopping::tracker::EarlyStopping;
use crate::error::EarlyStoppingError;
use crate::train::epoch_stats::EpochStats;
use crate::train::monitor::ValidationMonitor;
use crate::train::train_config::TrainConfig;

/// One iterative estimator, advanced an epoch at a time by `train_loop`.
pub trait EpochStep {
    /// Runs one full pass over the training data and returns its loss.
    /// `epoch` is 1-based.
    fn run_epoch(&mut self, epoch: usize) -> f64;

    /// Loss on held-out data after the latest epoch, if the step has any.
    fn validation_loss(&mut self) -> Option<f64> {
        None
    }
}

/// Summary of a finished `train_loop` run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopOutcome {
    /// Number of epochs actually run.
    pub epochs_run: usize,
    /// Epoch count worth recording: the epoch with the lowest validation
    /// loss, or `epochs_run` when the budget was fixed or nothing was monitored.
    pub best_epoch: usize,
    /// Training loss of the last completed epoch.
    pub final_train_loss: f64,
    pub best_val_loss: Option<f64>,
    /// True when the validation monitor ended the run before its budget.
    pub stopped_early: bool,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Drives `step` for as many epochs as `tracker` allows.
///
/// In FIXED and OPTIMAL mode the tracker's `get_epochs()` is the exact budget
/// and validation loss is reported but never used to stop. In the recording
/// modes the loop runs up to `config.max_epochs` and stops once the
/// validation monitor loses patience.
///
/// # Cancellation
/// Independently of the mode, the loop is cancelled if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// A cancelled run yields no outcome, so a truncated search is never
/// mistaken for a best epoch.
///
/// # Errors
/// - `InvalidState` if the tracker cannot provide a budget (FIXED without
///   `num_epochs`, OPTIMAL without recorded epochs) or the budget is zero.
/// - `Cancelled` if the loop was cancelled before finishing.
pub fn train_loop<S: EpochStep + ?Sized>(
    step: &mut S,
    tracker: &EarlyStopping,
    config: &TrainConfig,
) -> Result<LoopOutcome, EarlyStoppingError> {
    let monitored = tracker.mode().is_recording_capable();
    let budget = if monitored {
        config.max_epochs
    } else {
        tracker.get_epochs()?
    };
    if budget == 0 {
        return Err(EarlyStoppingError::invalid_state(format!(
            "epoch budget for {} mode is zero",
            tracker.mode()
        )));
    }

    let mut monitor = ValidationMonitor::new(config.patience, config.min_delta);
    let mut epochs_run = 0;
    let mut final_train_loss = 0.0;
    let mut stopped_early = false;
    let mut cancelled = false;

    for epoch in 1..=budget {
        if stop_requested(config) {
            cancelled = true;
            break;
        }

        let t_start = Instant::now();
        let train_loss = step.run_epoch(epoch);
        let val_loss = step.validation_loss();
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        epochs_run = epoch;
        final_train_loss = train_loss;

        let mut should_stop = false;
        if let Some(loss) = val_loss {
            should_stop = monitor.observe(epoch, loss) && monitored;
        }
        let is_best = val_loss.is_some() && monitor.best_epoch() == Some(epoch);

        trace!(epoch, train_loss, ?val_loss, is_best, "epoch finished");

        let stats = EpochStats {
            epoch,
            total_epochs: budget,
            train_loss,
            val_loss,
            is_best,
            elapsed_ms,
        };
        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                cancelled = true;
                break;
            }
        }

        if should_stop {
            stopped_early = epoch < budget;
            info!(
                epoch,
                best_epoch = monitor.best_epoch(),
                "validation loss stopped improving"
            );
            break;
        }
    }

    if cancelled {
        warn!(epochs_run, "training cancelled");
        return Err(EarlyStoppingError::Cancelled { epochs_run });
    }

    let best_epoch = if monitored {
        monitor.best_epoch().unwrap_or(epochs_run)
    } else {
        epochs_run
    };

    Ok(LoopOutcome {
        epochs_run,
        best_epoch,
        final_train_loss,
        best_val_loss: monitor.best_loss(),
        stopped_early,
    })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}
