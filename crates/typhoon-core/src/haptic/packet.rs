//! Joy-Con HD rumble payload encoding.
//!
//! A payload is 8 bytes: one 4-byte frame per motor, both frames identical.
//! Frequencies are encoded on a log2 scale, amplitude on a three-segment
//! curve. Derived from the JoyconLib rumble encoder.

use std::fmt;

use super::command::RumbleCommand;

const LOW_FREQ_MIN_HZ: f64 = 40.875885;
const LOW_FREQ_MAX_HZ: f64 = 626.286133;
const HIGH_FREQ_MIN_HZ: f64 = 81.75177;
const HIGH_FREQ_MAX_HZ: f64 = 1252.572266;

/// An encoded rumble payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RumblePacket([u8; 8]);

impl RumblePacket {
    /// The official "motors off" payload.
    pub const OFF: RumblePacket = RumblePacket([0x00, 0x01, 0x40, 0x40, 0x00, 0x01, 0x40, 0x40]);

    pub fn encode(command: &RumbleCommand) -> Self {
        match *command {
            RumbleCommand::Stop => Self::OFF,
            RumbleCommand::Play {
                amplitude,
                low_hz,
                high_hz,
            } => Self::encode_play(amplitude, low_hz, high_hz),
        }
    }

    pub fn bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn encode_play(amplitude: f64, low_hz: f64, high_hz: f64) -> Self {
        if amplitude.is_nan() || amplitude <= 0.0 {
            return Self::OFF;
        }
        let amp = amplitude.min(1.0);
        let low_hz = clamp_or(low_hz, LOW_FREQ_MIN_HZ, LOW_FREQ_MAX_HZ);
        let high_hz = clamp_or(high_hz, HIGH_FREQ_MIN_HZ, HIGH_FREQ_MAX_HZ);

        let hf = ((32.0 * (high_hz * 0.1).log2()).round() as i32 - 0x60) * 4;
        let lf = (32.0 * (low_hz * 0.1).log2()).round() as i32 - 0x40;

        let hf_amp = encode_amplitude(amp);
        let mut lf_amp = hf_amp / 2;
        let odd = lf_amp % 2 > 0;
        if odd {
            lf_amp -= 1;
        }
        lf_amp = (lf_amp.max(0) >> 1) + 0x40;
        if odd {
            lf_amp |= 0x8000;
        }

        let frame = [
            to_byte(hf & 0xff),
            to_byte(((hf >> 8) & 0xff) + hf_amp),
            to_byte(lf + ((lf_amp >> 8) & 0xff)),
            to_byte(lf_amp & 0xff),
        ];

        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&frame);
        out[4..].copy_from_slice(&frame);
        Self(out)
    }
}

impl fmt::Display for RumblePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<RumblePacket> for [u8; 8] {
    fn from(packet: RumblePacket) -> Self {
        packet.0
    }
}

fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

fn to_byte(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// High-band amplitude code for `amp` in (0, 1].
fn encode_amplitude(amp: f64) -> i32 {
    let log = (amp * 1000.0).log2() * 32.0 - 96.0;
    let code = if amp < 0.117 {
        log / (5.0 - amp * amp) - 1.0
    } else if amp < 0.23 {
        log - 92.0
    } else {
        log * 2.0 - 246.0
    };
    (code as i32).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(amplitude: f64, low_hz: f64, high_hz: f64) -> RumblePacket {
        RumblePacket::encode(&RumbleCommand::Play {
            amplitude,
            low_hz,
            high_hz,
        })
    }

    #[test]
    fn stop_encodes_off_packet() {
        assert_eq!(RumblePacket::encode(&RumbleCommand::Stop), RumblePacket::OFF);
        assert_eq!(RumblePacket::OFF.to_hex(), "00014040".repeat(2));
    }

    #[test]
    fn zero_amplitude_play_is_off() {
        assert_eq!(play(0.0, 300.0, 800.0), RumblePacket::OFF);
        assert_eq!(play(f64::NAN, 300.0, 800.0), RumblePacket::OFF);
    }

    #[test]
    fn known_payloads() {
        assert_eq!(play(1.0, 300.0, 800.0).to_hex(), "a8c8dd71a8c8dd71");
        assert_eq!(play(0.5, 300.0, 800.0).to_hex(), "a888dd61a888dd61");
        assert_eq!(play(0.2, 300.0, 800.0).to_hex(), "a8395d4ea8395d4e");
        assert_eq!(play(0.1, 300.0, 800.0).to_hex(), "a817dd45a817dd45");
        assert_eq!(play(0.01, 300.0, 800.0).to_hex(), "a8025d40a8025d40");
        assert_eq!(play(0.3, 54.0, 90.0).to_hex(), "14580e5614580e56");
    }

    #[test]
    fn frequencies_are_clamped_to_hardware_range() {
        assert_eq!(play(1.0, 10.0, 5000.0).to_hex(), "fcc88171fcc88171");
        assert_eq!(play(1.0, 10.0, 5000.0), play(1.0, LOW_FREQ_MIN_HZ, HIGH_FREQ_MAX_HZ));
    }

    #[test]
    fn both_motor_frames_match() {
        let packet = play(0.42, 160.0, 320.0);
        let bytes = packet.bytes();
        assert_eq!(bytes[..4], bytes[4..]);
    }
}
