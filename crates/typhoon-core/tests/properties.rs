//! Property tests for the numeric building blocks.

use std::time::Duration;

use proptest::prelude::*;
use typhoon_core::energy::EnergyBranch;
use typhoon_core::storage::{EnergyConfig, LingerConfig, RumbleConfig};
use typhoon_core::{normalize, EnergyAccumulator, HapticEnvelope, LingerCurve, TierTable};

fn curve() -> impl Strategy<Value = LingerCurve> {
    prop_oneof![
        Just(LingerCurve::Linear),
        Just(LingerCurve::Sqrt),
        Just(LingerCurve::Quadratic),
    ]
}

proptest! {
    #[test]
    fn normalize_is_bounded_and_monotonic(
        threshold in 0.0..10_000.0f64,
        span in 1.0..50_000.0f64,
        a in -1_000.0..100_000.0f64,
        b in -1_000.0..100_000.0f64,
    ) {
        let saturation = threshold + span;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let n_lo = normalize(lo, threshold, saturation);
        let n_hi = normalize(hi, threshold, saturation);
        prop_assert!((0.0..=1.0).contains(&n_lo));
        prop_assert!((0.0..=1.0).contains(&n_hi));
        prop_assert!(n_lo <= n_hi);
    }

    #[test]
    fn normalize_pins_both_ends(
        threshold in 0.0..10_000.0f64,
        span in 1.0..50_000.0f64,
        below in 0.0..1.0f64,
        above in 0.0..10.0f64,
    ) {
        let saturation = threshold + span;
        prop_assert_eq!(normalize(threshold * below, threshold, saturation), 0.0);
        prop_assert_eq!(normalize(saturation * (1.0 + above), threshold, saturation), 1.0);
    }

    #[test]
    fn classify_is_total_and_monotonic(
        a in -2.0..3.0f64,
        b in -2.0..3.0f64,
        ceiling in 0.1..10.0f64,
    ) {
        let table = TierTable::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_level = table.level(lo, ceiling);
        let hi_level = table.level(hi, ceiling);
        prop_assert!(lo_level <= hi_level);
        prop_assert!(hi_level < table.len());
        let classification = table.classify(hi, ceiling);
        prop_assert_eq!(classification.level, hi_level);
        prop_assert_eq!(&classification.label, &table.tiers()[hi_level].label);
    }

    #[test]
    fn linger_duration_is_monotonic_and_capped(
        curve in curve(),
        max_s in 0.0..5.0f64,
        a in -0.5..1.5f64,
        b in -0.5..1.5f64,
    ) {
        let linger = LingerConfig { max_duration_s: max_s, curve, ..LingerConfig::default() };
        let envelope = HapticEnvelope::new(&linger, &RumbleConfig::default());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let d_lo = envelope.linger_duration_for(lo);
        let d_hi = envelope.linger_duration_for(hi);
        prop_assert!(d_lo <= d_hi);
        prop_assert!(d_hi <= linger.max_duration());
    }

    #[test]
    fn constant_input_converges(
        k in 0.0..=1.0f64,
        smoothing in 0.05..0.95f64,
        decay in 0.05..=1.0f64,
    ) {
        let mut acc = EnergyAccumulator::new(&EnergyConfig {
            window_s: 10.0,
            smoothing_factor: smoothing,
            decay_rate: decay,
        });
        for step in 0..600u64 {
            let update = acc.update(Duration::from_millis(step * 50), k);
            prop_assert!((0.0..=1.0).contains(&update.energy));
        }
        prop_assert!((acc.energy() - k).abs() < 1e-6);
    }

    #[test]
    fn energy_above_average_decays_on_drop(
        k in 0.2..=1.0f64,
        decay in 0.05..=1.0f64,
    ) {
        let mut acc = EnergyAccumulator::new(&EnergyConfig {
            window_s: 1.0,
            smoothing_factor: 0.5,
            decay_rate: decay,
        });
        for s in 0..40 {
            acc.update(Duration::from_secs(s), k);
        }
        let before = acc.energy();
        let update = acc.update(Duration::from_secs(40), 0.0);
        prop_assert_eq!(update.branch, EnergyBranch::Decaying);
        prop_assert!(update.energy < before);
    }
}
