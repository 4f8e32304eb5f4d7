//! Records the best epoch of each cross-validation fold, then fits the final
//! model on all data for the aggregated number of epochs.
//!
//! Run with:
//!   cargo run --example cross_validation

use qspr_epochs::{
    early_stopping, train_loop, AggregateFunction, EarlyStopping, EarlyStoppingError,
    EarlyStoppingMode, EarlyStoppingModel, EpochStep, TrainConfig,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// y = w*x + b fitted by full-batch gradient descent.
#[derive(Debug, Clone, Default)]
struct Linear {
    w: f64,
    b: f64,
}

impl Linear {
    fn mse(&self, xs: &[f64], ys: &[f64]) -> f64 {
        xs.iter()
            .zip(ys)
            .map(|(x, y)| (self.w * x + self.b - y).powi(2))
            .sum::<f64>()
            / xs.len() as f64
    }
}

struct Fit<'a> {
    model: Linear,
    learning_rate: f64,
    train: (&'a [f64], &'a [f64]),
    val: Option<(&'a [f64], &'a [f64])>,
}

impl EpochStep for Fit<'_> {
    fn run_epoch(&mut self, _epoch: usize) -> f64 {
        let (xs, ys) = self.train;
        let n = xs.len() as f64;
        let (mut gw, mut gb) = (0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let err = self.model.w * x + self.model.b - y;
            gw += 2.0 * err * x / n;
            gb += 2.0 * err / n;
        }
        self.model.w -= self.learning_rate * gw;
        self.model.b -= self.learning_rate * gb;
        self.model.mse(xs, ys)
    }

    fn validation_loss(&mut self) -> Option<f64> {
        self.val.map(|(xs, ys)| self.model.mse(xs, ys))
    }
}

struct LinearModel {
    tracker: EarlyStopping,
    config: TrainConfig,
}

impl EarlyStoppingModel for LinearModel {
    fn supports_early_stopping(&self) -> bool {
        true
    }

    fn early_stopping(&self) -> &EarlyStopping {
        &self.tracker
    }

    fn early_stopping_mut(&mut self) -> &mut EarlyStopping {
        &mut self.tracker
    }
}

impl LinearModel {
    fn fit(
        &mut self,
        train: (&[f64], &[f64]),
        val: Option<(&[f64], &[f64])>,
        mode: Option<EarlyStoppingMode>,
    ) -> Result<(Linear, usize), EarlyStoppingError> {
        early_stopping(self, mode, |model| {
            let mut step = Fit {
                model: Linear::default(),
                learning_rate: 0.05,
                train,
                val,
            };
            let outcome = train_loop(&mut step, &model.tracker, &model.config)?;
            Ok((step.model, outcome.best_epoch))
        })
    }
}

fn main() -> Result<(), EarlyStoppingError> {
    let mut rng = StdRng::seed_from_u64(7);
    let xs: Vec<f64> = (0..200).map(|_| rng.gen_range(-2.0..2.0)).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|x| 3.0 * x - 1.0 + rng.gen_range(-0.8..0.8))
        .collect();

    let mut model = LinearModel {
        tracker: EarlyStopping::new(EarlyStoppingMode::NotRecording)
            .with_aggregate(AggregateFunction::Median),
        config: TrainConfig {
            min_delta: 1e-4,
            ..TrainConfig::new(1000, 10)
        },
    };

    let folds = 5;
    let fold_size = xs.len() / folds;
    for fold in 0..folds {
        let range = fold * fold_size..(fold + 1) * fold_size;
        let (mut tx, mut ty) = (Vec::new(), Vec::new());
        for i in (0..xs.len()).filter(|i| !range.contains(i)) {
            tx.push(xs[i]);
            ty.push(ys[i]);
        }
        let val = (&xs[range.clone()], &ys[range.clone()]);
        let (fitted, epochs) = model.fit(
            (tx.as_slice(), ty.as_slice()),
            Some(val),
            Some(EarlyStoppingMode::Recording),
        )?;
        println!(
            "Fold {fold}: best epoch {epochs:>4}  w = {:.3}, b = {:.3}",
            fitted.w, fitted.b
        );
    }

    println!("Recorded epochs: {:?}", model.tracker.trained_epochs());
    println!(
        "Optimal epochs ({}): {}",
        model.tracker.aggregate(),
        model.tracker.optimal_epochs()?
    );

    let (fitted, epochs) =
        model.fit((&xs[..], &ys[..]), None, Some(EarlyStoppingMode::Optimal))?;
    println!(
        "Final fit: {epochs} epochs  w = {:.3}, b = {:.3}",
        fitted.w, fitted.b
    );

    let path = std::env::temp_dir()
        .join("qspr-epochs-demo")
        .join("early_stopping.json");
    model.tracker.to_file(&path)?;
    println!("Saved tracker to {}", path.display());
    Ok(())
}
