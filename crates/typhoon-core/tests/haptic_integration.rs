//! Integration tests for the rumble envelope and its wire encoding.

use std::time::Duration;

use typhoon_core::haptic::{countdown_plan, Regime};
use typhoon_core::storage::{CountdownConfig, LingerConfig, RumbleConfig};
use typhoon_core::{
    Config, HapticEnvelope, LingerCurve, PacketWriter, RumbleCommand, RumblePacket, Sample,
    ScriptedSamples, Session,
};

const TICK: Duration = Duration::from_millis(50);

#[test]
fn test_spike_then_silence_fades_to_zero() {
    let mut envelope = HapticEnvelope::new(&LingerConfig::default(), &RumbleConfig::default());
    assert_eq!(envelope.tick(1.0, TICK), Regime::Armed);

    let mut previous = envelope.amplitude();
    let mut reached_zero_at = None;
    for k in 1..=40 {
        envelope.tick(0.0, TICK);
        let amplitude = envelope.amplitude();
        assert!(amplitude >= 0.0);
        assert!(amplitude <= previous, "tick {k}: {amplitude} > {previous}");
        if amplitude == 0.0 && reached_zero_at.is_none() {
            reached_zero_at = Some(k);
        }
        previous = amplitude;
    }

    // 1.5 s of linger at 50 ms per tick.
    assert_eq!(reached_zero_at, Some(30));
    assert_eq!(envelope.command(), RumbleCommand::Stop);
}

#[test]
fn test_every_curve_fades_monotonically() {
    for curve in [LingerCurve::Linear, LingerCurve::Sqrt, LingerCurve::Quadratic] {
        let linger = LingerConfig {
            curve,
            ..LingerConfig::default()
        };
        let mut envelope = HapticEnvelope::new(&linger, &RumbleConfig::default());
        envelope.tick(0.7, TICK);
        let mut previous = envelope.amplitude();
        for _ in 0..40 {
            envelope.tick(0.0, TICK);
            assert!(envelope.amplitude() <= previous);
            previous = envelope.amplitude();
        }
        assert_eq!(previous, 0.0, "{curve:?} never reached silence");
    }
}

#[test]
fn test_session_commands_encode_to_packets() {
    let mut config = Config::default();
    config.sensor.threshold = 50.0;
    config.sensor.saturation = 1000.0;
    let mut session = Session::new(config).unwrap();

    let mut writer = PacketWriter::new(Vec::new());
    let source = ScriptedSamples::new([1000.0, 0.0], TICK);
    session.run(source, &mut writer, |_| {});

    let text = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "a8c8dd71a8c8dd71");
    assert_eq!(lines[2], RumblePacket::OFF.to_hex());
}

#[test]
fn test_silent_session_never_plays() {
    let mut session = Session::new(Config::default()).unwrap();
    for k in 0..20 {
        let report = session
            .tick(Sample::new(TICK * k, 100.0))
            .unwrap();
        assert!(report.command.is_stop());
    }
}

#[test]
fn test_countdown_packets_are_distinct() {
    let plan = countdown_plan(&CountdownConfig::default());
    let packets: Vec<_> = plan
        .iter()
        .map(|step| RumblePacket::encode(&step.command()))
        .collect();
    for pair in packets.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert!(packets.iter().all(|p| *p != RumblePacket::OFF));
}
