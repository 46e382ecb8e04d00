//! Input conditioning: Attenu-Gain-Randomizer (AGR) and drive.
//!
//! The AGR control (0–100) maps to a gain multiplier in three zones:
//!
//! | Control | Zone | Gain |
//! |---------|------|------|
//! | 0–25 | Random | `v/50 + rand × (1 − v/25)`, fully random at 0, exactly 0.5 at 25 |
//! | 25–50 | Attenuate | 0.5 → 1.0 linearly |
//! | 50–100 | Amplify | 1.0 → 4.0 (+12 dB) linearly |
//!
//! The zone is chosen from the integer part of the (smoothed) control, so the
//! boundaries are evaluated against whole steps.
//!
//! Drive is a plain multiplier in \[1.0, 5.0\] derived from a 0–100 % control.

use crate::random::XorShift32;

/// AGR control value giving unity gain.
pub const AGR_UNITY: f32 = 50.0;

/// Upper edge of the randomization zone.
pub const AGR_RANDOM_EDGE: i32 = 25;

/// Upper edge of the attenuation zone.
pub const AGR_ATTENUATE_EDGE: i32 = 50;

/// Gain at the top of the AGR range.
pub const AGR_MAX_GAIN: f32 = 4.0;

/// Drive gain at 100 %.
pub const MAX_DRIVE: f32 = 5.0;

/// Zone of the AGR control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgrZone {
    /// Per-sample random amplitude (0–25).
    Random,
    /// Attenuation toward unity (25–50).
    Attenuate,
    /// Amplification up to +12 dB (50–100).
    Amplify,
}

impl AgrZone {
    /// Zone for a continuous AGR control value.
    pub fn from_value(value: f32) -> Self {
        if value <= AGR_RANDOM_EDGE as f32 {
            AgrZone::Random
        } else if value <= AGR_ATTENUATE_EDGE as f32 {
            AgrZone::Attenuate
        } else {
            AgrZone::Amplify
        }
    }

    /// Three-letter display label.
    pub fn label(self) -> &'static str {
        match self {
            AgrZone::Random => "RND",
            AgrZone::Attenuate => "ATN",
            AgrZone::Amplify => "AMP",
        }
    }
}

/// Gain multiplier for an integer AGR step.
///
/// Draws one value from `rng` only in the randomization zone, so the random
/// sequence does not advance while the control sits above 25.
#[inline]
pub fn agr_gain(value: i32, rng: &mut XorShift32) -> f32 {
    if value <= AGR_RANDOM_EDGE {
        let random_mix = 1.0 - value as f32 / 25.0;
        let base = value as f32 / 50.0;
        base + rng.next_unit() * random_mix
    } else if value <= AGR_ATTENUATE_EDGE {
        let t = (value - AGR_RANDOM_EDGE) as f32 / 25.0;
        0.5 + t * 0.5
    } else {
        let t = (value - AGR_ATTENUATE_EDGE) as f32 / 50.0;
        1.0 + t * 3.0
    }
}

/// Drive gain (1.0–5.0) for a drive percentage (0–100).
#[inline]
pub fn drive_gain(percent: f32) -> f32 {
    1.0 + percent / 25.0
}

/// Drive percentage for a drive gain. Inverse of [`drive_gain`].
#[inline]
pub fn drive_percent(gain: f32) -> f32 {
    (gain - 1.0) * 25.0
}

/// Apply AGR and drive to one raw input sample.
///
/// `agr` is the smoothed control; it is truncated to an integer step here.
#[inline]
pub fn condition(input: f32, agr: f32, drive: f32, rng: &mut XorShift32) -> f32 {
    input * agr_gain(agr as i32, rng) * drive
}
