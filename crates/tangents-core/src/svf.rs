//! Trapezoidal state variable filter: coefficients, state and one integrator step.
//!
//! Implements the Topology-Preserving Transform (TPT) SVF after Zavalishin,
//! "The Art of VA Filter Design" (2012). The implicit feedback loop is solved
//! algebraically each step, so lowpass, bandpass and highpass come out of the
//! same update and the structure stays stable under fast cutoff changes.
//!
//! # Coefficients
//!
//! [`SvfCoefficients::new`] derives `g`, `k` and `g_inv` from cutoff,
//! normalized resonance and the *effective* sample rate (host rate × the
//! oversampling factor):
//!
//! ```text
//! cutoff = clamp(cutoff, 20, 0.45 × rate)
//! g      = tan(π × cutoff / rate)
//! k      = 2.0 − resonance × 1.9          // 2.0 (damped) .. 0.1
//! g_inv  = 1 / (1 + g × (g + k))
//! ```
//!
//! `k` bottoms out at [`K_MIN`] rather than zero. At resonance 1.0 the filter
//! rings for a long time but never sustains an undamped oscillation.
//!
//! # Step
//!
//! ```text
//! hp = (u − k·bp − lp) · g_inv
//! bp = g·hp + bp
//! lp = g·bp + lp
//! ```
//!
//! `bp` and `lp` are clamped to ±[`STATE_LIMIT`], and every stored value is
//! passed through [`sanitize`].
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f32::consts::PI;
use libm::tanf;

use crate::math::{STATE_LIMIT, sanitize, soft_clamp};

/// Lowest allowed cutoff in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Highest allowed cutoff as a fraction of the effective sample rate.
pub const MAX_CUTOFF_RATIO: f32 = 0.45;

/// Damping with resonance at zero.
pub const K_MAX: f32 = 2.0;

/// Damping with resonance at one.
pub const K_MIN: f32 = 0.1;

/// Span of the resonance → damping map (`K_MAX − K_MIN`).
const K_SPAN: f32 = 1.9;

/// Filter response selected for the output.
///
/// All four are derived from the same integrator state; the mode only picks
/// which combination is summed into the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Lowpass output.
    #[default]
    Lowpass,
    /// Bandpass output.
    Bandpass,
    /// Highpass output.
    Highpass,
    /// `lp − hp` combination.
    Allpass,
}

impl FilterMode {
    /// All modes in host selector order.
    pub const ALL: [FilterMode; 4] = [
        FilterMode::Lowpass,
        FilterMode::Bandpass,
        FilterMode::Highpass,
        FilterMode::Allpass,
    ];

    /// Map a raw host selector to a mode. Unknown selectors fall back to lowpass.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => FilterMode::Bandpass,
            2 => FilterMode::Highpass,
            3 => FilterMode::Allpass,
            _ => FilterMode::Lowpass,
        }
    }

    /// Host selector index.
    pub fn index(self) -> i32 {
        match self {
            FilterMode::Lowpass => 0,
            FilterMode::Bandpass => 1,
            FilterMode::Highpass => 2,
            FilterMode::Allpass => 3,
        }
    }

    /// Parse a mode from its long name (`"lowpass"`) or short name (`"lp"`).
    pub fn from_name(name: &str) -> Option<Self> {
        FilterMode::ALL.into_iter().find(|m| {
            m.name().eq_ignore_ascii_case(name) || m.short_name().eq_ignore_ascii_case(name)
        })
    }

    /// Long display name.
    pub fn name(self) -> &'static str {
        match self {
            FilterMode::Lowpass => "Lowpass",
            FilterMode::Bandpass => "Bandpass",
            FilterMode::Highpass => "Highpass",
            FilterMode::Allpass => "All-pass",
        }
    }

    /// Two-letter display name.
    pub fn short_name(self) -> &'static str {
        match self {
            FilterMode::Lowpass => "LP",
            FilterMode::Bandpass => "BP",
            FilterMode::Highpass => "HP",
            FilterMode::Allpass => "AP",
        }
    }

    /// Select this mode's output from one integrator step.
    #[inline]
    pub fn mix(self, lp: f32, bp: f32, hp: f32) -> f32 {
        match self {
            FilterMode::Lowpass => lp,
            FilterMode::Bandpass => bp,
            FilterMode::Highpass => hp,
            FilterMode::Allpass => lp - hp,
        }
    }
}

/// Block-constant coefficients of the TPT integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvfCoefficients {
    /// Pre-warped frequency coefficient.
    pub g: f32,
    /// Damping coefficient, in \[[`K_MIN`], [`K_MAX`]\].
    pub k: f32,
    /// Normalization factor `1 / (1 + g·(g + k))`.
    pub g_inv: f32,
}

impl SvfCoefficients {
    /// Derive coefficients for a cutoff (Hz) and resonance (0–1) at `sample_rate`.
    ///
    /// `sample_rate` is the rate the integrator actually runs at, i.e. the host
    /// rate multiplied by the oversampling factor. Cutoff is clamped to
    /// \[20 Hz, 0.45 × `sample_rate`\]; resonance is clamped to \[0, 1\].
    pub fn new(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        let cutoff = clamp_cutoff(cutoff_hz, sample_rate);
        let resonance = if resonance.is_nan() {
            0.0
        } else {
            resonance.clamp(0.0, 1.0)
        };

        let g = tanf(PI * cutoff / sample_rate);
        let k = K_MAX - resonance * K_SPAN;
        let g_inv = 1.0 / (1.0 + g * (g + k));

        Self { g, k, g_inv }
    }

    /// Resonance recovered from `k`, in \[0, 1\].
    ///
    /// Scales how hard the pre-filter nonlinearity is driven.
    #[inline]
    pub fn resonance_amount(&self) -> f32 {
        (K_MAX - self.k) / K_SPAN
    }
}

impl Default for SvfCoefficients {
    fn default() -> Self {
        Self::new(1000.0, 0.0, 96000.0)
    }
}

/// Clamp a cutoff to \[20 Hz, 0.45 × `sample_rate`\]. NaN maps to the lower bound.
#[inline]
pub fn clamp_cutoff(cutoff_hz: f32, sample_rate: f32) -> f32 {
    let max = sample_rate * MAX_CUTOFF_RATIO;
    if cutoff_hz.is_nan() || cutoff_hz < MIN_CUTOFF_HZ {
        MIN_CUTOFF_HZ
    } else if cutoff_hz > max {
        max
    } else {
        cutoff_hz
    }
}

/// Integrator state carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FilterState {
    /// Last lowpass value.
    pub lp: f32,
    /// Last bandpass value.
    pub bp: f32,
    /// Last highpass value.
    pub hp: f32,
}

impl FilterState {
    /// Zeroed state.
    pub const fn new() -> Self {
        Self {
            lp: 0.0,
            bp: 0.0,
            hp: 0.0,
        }
    }

    /// Run one TPT step on the (already saturated) input `u`.
    ///
    /// Returns the stored `(lp, bp, hp)`: clamped where applicable and sanitized.
    #[inline]
    pub fn tick(&mut self, coeffs: &SvfCoefficients, u: f32) -> (f32, f32, f32) {
        let hp = (u - coeffs.k * self.bp - self.lp) * coeffs.g_inv;
        let bp = coeffs.g * hp + self.bp;
        let lp = coeffs.g * bp + self.lp;

        self.bp = sanitize(soft_clamp(bp, STATE_LIMIT));
        self.lp = sanitize(soft_clamp(lp, STATE_LIMIT));
        self.hp = sanitize(hp);

        (self.lp, self.bp, self.hp)
    }

    /// Clear the integrators.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
