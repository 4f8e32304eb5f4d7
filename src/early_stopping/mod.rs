pub mod aggregate;
pub mod config;
pub mod intercept;
pub mod mode;
pub mod tracker;

pub use aggregate::AggregateFunction;
pub use config::EarlyStoppingConfig;
pub use intercept::{early_stopping, EarlyStoppingModel};
pub use mode::EarlyStoppingMode;
pub use tracker::EarlyStopping;
