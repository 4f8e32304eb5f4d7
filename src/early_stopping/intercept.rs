use tracing::debug;

use crate::early_stopping::mode::EarlyStoppingMode;
use crate::early_stopping::tracker::EarlyStopping;
use crate::error::EarlyStoppingError;

/// A model whose training routine can take part in early stopping.
pub trait EarlyStoppingModel {
    /// Whether the underlying estimator trains iteratively and can report the
    /// epoch count it settled on.
    fn supports_early_stopping(&self) -> bool;

    fn early_stopping(&self) -> &EarlyStopping;

    fn early_stopping_mut(&mut self) -> &mut EarlyStopping;
}

/// Runs `train` on `model` under early-stopping bookkeeping.
///
/// `train` returns the fitted estimator together with the number of epochs it
/// actually used. When `mode` is given it replaces the tracker's mode before
/// training and stays in effect afterwards. The epoch count is recorded only
/// if the tracker is in `Recording` mode once `train` returns.
///
/// Fails with `Unsupported` on models that do not support early stopping, so
/// a misconfigured model never silently trains without it.
pub fn early_stopping<M, T, E, F>(
    model: &mut M,
    mode: Option<EarlyStoppingMode>,
    train: F,
) -> Result<(T, usize), E>
where
    M: EarlyStoppingModel + ?Sized,
    F: FnOnce(&mut M) -> Result<(T, usize), E>,
    E: From<EarlyStoppingError>,
{
    if !model.supports_early_stopping() {
        return Err(EarlyStoppingError::unsupported(
            "early stopping is not supported by this model",
        )
        .into());
    }

    if let Some(mode) = mode {
        model.early_stopping_mut().set_mode(mode);
    }

    let (fitted, epochs) = train(model)?;

    let tracker = model.early_stopping_mut();
    if tracker.mode() == EarlyStoppingMode::Recording {
        tracker.record_epochs(epochs);
    } else {
        debug!(epochs, mode = %tracker.mode(), "trained without recording epochs");
    }

    Ok((fitted, epochs))
}
