pub mod epoch_stats;
pub mod train_config;
pub mod monitor;
pub mod loop_fn;

pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use monitor::ValidationMonitor;
pub use loop_fn::{train_loop, EpochStep, LoopOutcome};
