//! Read-only status for displays, plus the approximate response curve.
//!
//! Nothing here touches filter state. A [`Status`] is a snapshot of levels and
//! selectors; [`response_magnitude`] is a cheap closed-form sketch of the
//! magnitude response used for drawing, not an analysis of the real filter.

use libm::{fabsf, log10f, powf, sqrtf};

use crate::agr::AgrZone;
use crate::meter::LevelMeters;
use crate::model::Model;
use crate::oversample::Oversample;
use crate::svf::FilterMode;

/// Lowest frequency of the drawn curve.
pub const CURVE_MIN_HZ: f32 = 20.0;

/// Highest frequency of the drawn curve.
pub const CURVE_MAX_HZ: f32 = 20000.0;

/// Ceiling of the drawn magnitude.
pub const CURVE_MAX_MAGNITUDE: f32 = 2.0;

/// Width of a level bar in display cells.
pub const METER_BAR_CELLS: u32 = 50;

/// Snapshot of everything a display needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    /// Decayed peak of the conditioned input.
    pub input_level: f32,
    /// Decayed peak of the output.
    pub output_level: f32,
    /// Active mode.
    pub mode: FilterMode,
    /// Active model.
    pub model: Model,
    /// Oversampling factor.
    pub oversample: Oversample,
    /// Cutoff control in Hz (before CV).
    pub cutoff_hz: f32,
    /// Resonance control in percent (before CV).
    pub resonance_pct: f32,
    /// Input AGR control (0–100).
    pub agr: f32,
    /// Zone of the AGR control.
    pub agr_zone: AgrZone,
}

impl Status {
    /// Build a status from control values and meters.
    pub fn new(
        meters: &LevelMeters,
        mode: FilterMode,
        model: Model,
        oversample: Oversample,
        cutoff_hz: f32,
        resonance: f32,
        agr: f32,
    ) -> Self {
        Self {
            input_level: meters.input.level(),
            output_level: meters.output.level(),
            mode,
            model,
            oversample,
            cutoff_hz,
            resonance_pct: resonance * 100.0,
            agr,
            agr_zone: AgrZone::from_value(agr),
        }
    }

    /// Input bar width in cells, capped at [`METER_BAR_CELLS`].
    pub fn input_bar(&self) -> u32 {
        bar_cells(self.input_level)
    }

    /// Output bar width in cells, capped at [`METER_BAR_CELLS`].
    pub fn output_bar(&self) -> u32 {
        bar_cells(self.output_level)
    }

    /// Approximate response at `freq_hz` for the current controls.
    pub fn response_at(&self, freq_hz: f32) -> f32 {
        response_magnitude(self.mode, self.cutoff_hz, self.resonance_pct, freq_hz)
    }

    /// Sample the response curve at `N` log-spaced points over 20 Hz–20 kHz.
    pub fn response_curve<const N: usize>(&self) -> [f32; N] {
        let mut curve = [0.0; N];
        let last = N.saturating_sub(1).max(1) as f32;
        for (i, point) in curve.iter_mut().enumerate() {
            *point = self.response_at(curve_frequency(i as f32 / last));
        }
        curve
    }
}

fn bar_cells(level: f32) -> u32 {
    let cells = level * METER_BAR_CELLS as f32;
    if cells.is_nan() || cells <= 0.0 {
        0
    } else {
        (cells as u32).min(METER_BAR_CELLS)
    }
}

/// Frequency at a normalized position (0–1) of the logarithmic axis.
#[inline]
pub fn curve_frequency(position: f32) -> f32 {
    CURVE_MIN_HZ * powf(CURVE_MAX_HZ / CURVE_MIN_HZ, position)
}

/// Normalized position (0–1) of `freq_hz` on the logarithmic axis.
#[inline]
pub fn curve_position(freq_hz: f32) -> f32 {
    let lo = log10f(CURVE_MIN_HZ);
    let hi = log10f(CURVE_MAX_HZ);
    ((log10f(freq_hz.max(CURVE_MIN_HZ)) - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// Approximate magnitude of `mode` at `freq_hz`.
///
/// With `r = freq / cutoff`:
///
/// - LP: `1 / sqrt(1 + r⁴)`
/// - BP: `r / (1 + r²)`, boosted by `1 + (res − 50) / 25` above 50 %
/// - HP: `r² / sqrt(1 + r⁴)`
/// - AP: flat 0.5
///
/// Within ±30 % of the cutoff a resonance peak of up to `1 + 2 × res/100`
/// is applied, tapering linearly to the edges. The result is capped at 2.0.
pub fn response_magnitude(
    mode: FilterMode,
    cutoff_hz: f32,
    resonance_pct: f32,
    freq_hz: f32,
) -> f32 {
    if cutoff_hz <= 0.0 || cutoff_hz.is_nan() {
        return 0.0;
    }
    let r = freq_hz / cutoff_hz;
    let r2 = r * r;

    let mut response = match mode {
        FilterMode::Lowpass => 1.0 / sqrtf(1.0 + r2 * r2),
        FilterMode::Bandpass => {
            let bp = r / (1.0 + r2);
            if resonance_pct > 50.0 {
                bp * (1.0 + (resonance_pct - 50.0) / 25.0)
            } else {
                bp
            }
        }
        FilterMode::Highpass => r2 / sqrtf(1.0 + r2 * r2),
        FilterMode::Allpass => 0.5,
    };

    let distance = fabsf(r - 1.0);
    if resonance_pct > 0.0 && distance < 0.3 {
        response *= 1.0 + (resonance_pct / 100.0) * 2.0 * (1.0 - distance / 0.3);
    }

    response.min(CURVE_MAX_MAGNITUDE)
}
