/// Patience-based validation monitor.
///
/// Feeds on one validation loss per epoch and remembers the epoch with the
/// lowest loss. Training should stop once `patience` consecutive epochs have
/// failed to beat the best loss by more than `min_delta`.
#[derive(Debug, Clone)]
pub struct ValidationMonitor {
    pub patience: usize,
    pub min_delta: f64,
    counter: usize,
    best: Option<(usize, f64)>,
}

impl ValidationMonitor {
    pub fn new(patience: usize, min_delta: f64) -> Self {
        Self {
            patience,
            min_delta,
            counter: 0,
            best: None,
        }
    }

    /// Records the validation loss of 1-based `epoch`; returns `true` when
    /// training should stop.
    ///
    /// Non-finite losses never count as an improvement, not even on the first
    /// epoch.
    pub fn observe(&mut self, epoch: usize, loss: f64) -> bool {
        let improved = loss.is_finite()
            && match self.best {
                Some((_, best)) => loss < best - self.min_delta,
                None => true,
            };

        if improved {
            self.best = Some((epoch, loss));
            self.counter = 0;
            false
        } else {
            self.counter += 1;
            self.counter >= self.patience
        }
    }

    /// Epoch (1-based) with the lowest validation loss so far.
    pub fn best_epoch(&self) -> Option<usize> {
        self.best.map(|(epoch, _)| epoch)
    }

    pub fn best_loss(&self) -> Option<f64> {
        self.best.map(|(_, loss)| loss)
    }
}
