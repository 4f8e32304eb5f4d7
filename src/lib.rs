pub mod error;
pub mod early_stopping;
pub mod train;

// Convenience re-exports
pub use error::EarlyStoppingError;
pub use early_stopping::aggregate::AggregateFunction;
pub use early_stopping::config::EarlyStoppingConfig;
pub use early_stopping::intercept::{early_stopping, EarlyStoppingModel};
pub use early_stopping::mode::EarlyStoppingMode;
pub use early_stopping::tracker::EarlyStopping;
pub use train::loop_fn::{train_loop, EpochStep, LoopOutcome};
pub use train::train_config::TrainConfig;
