//! Property-based tests for epoch aggregation and recording.

use proptest::prelude::*;
use qspr_epochs::{AggregateFunction, EarlyStopping, EarlyStoppingMode};

fn aggregate_strategy() -> impl Strategy<Value = AggregateFunction> {
    prop::sample::select(AggregateFunction::ALL.to_vec())
}

fn mode_strategy() -> impl Strategy<Value = EarlyStoppingMode> {
    prop::sample::select(EarlyStoppingMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_recording_is_append_only(epochs in prop::collection::vec(0usize..10_000, 0..50)) {
        let mut tracker = EarlyStopping::new(EarlyStoppingMode::Recording);
        for (i, &e) in epochs.iter().enumerate() {
            tracker.record_epochs(e);
            prop_assert_eq!(tracker.trained_epochs(), &epochs[..=i]);
        }
    }

    #[test]
    fn prop_optimal_is_rounded_aggregate(
        epochs in prop::collection::vec(0usize..10_000, 1..50),
        aggregate in aggregate_strategy(),
    ) {
        let mut tracker = EarlyStopping::new(EarlyStoppingMode::Optimal).with_aggregate(aggregate);
        for &e in &epochs {
            tracker.record_epochs(e);
        }
        let expected = aggregate.apply(&epochs).unwrap().round_ties_even() as usize;
        prop_assert_eq!(tracker.optimal_epochs().unwrap(), expected);
        prop_assert_eq!(tracker.get_epochs().unwrap(), expected);

        let lo = *epochs.iter().min().unwrap();
        let hi = *epochs.iter().max().unwrap();
        prop_assert!(expected >= lo && expected <= hi);
    }

    #[test]
    fn prop_mean_matches_direct_computation(epochs in prop::collection::vec(1usize..1_000, 1..30)) {
        let mut tracker = EarlyStopping::new(EarlyStoppingMode::Recording);
        for &e in &epochs {
            tracker.record_epochs(e);
        }
        let mean = epochs.iter().sum::<usize>() as f64 / epochs.len() as f64;
        prop_assert_eq!(tracker.optimal_epochs().unwrap(), mean.round_ties_even() as usize);
    }

    #[test]
    fn prop_fixed_ignores_record(
        epochs in prop::collection::vec(0usize..500, 0..20),
        fixed in 1usize..10_000,
    ) {
        let mut tracker = EarlyStopping::new(EarlyStoppingMode::Fixed);
        for &e in &epochs {
            tracker.record_epochs(e);
        }
        tracker.set_num_epochs(fixed);
        prop_assert_eq!(tracker.get_epochs().unwrap(), fixed);
    }

    #[test]
    fn prop_file_round_trip(
        epochs in prop::collection::vec(0usize..10_000, 0..20),
        mode in mode_strategy(),
        aggregate in aggregate_strategy(),
        num_epochs in prop::option::of(0usize..10_000),
    ) {
        let mut tracker = EarlyStopping::new(mode).with_aggregate(aggregate);
        for &e in &epochs {
            tracker.record_epochs(e);
        }
        if let Some(n) = num_epochs {
            tracker.set_num_epochs(n);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.json");
        tracker.to_file(&path).unwrap();
        let loaded = EarlyStopping::from_file(&path).unwrap();
        prop_assert_eq!(loaded, tracker);
    }
}
