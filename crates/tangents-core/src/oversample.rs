//! Oversampled nonlinear filter core.
//!
//! Each output sample runs the saturate → integrate step `N` times with the
//! input held, accumulating the selected mode's output, then averages the
//! passes. The averaging acts as a crude decimation filter.
//!
//! Because the coefficients are computed at `N ×` the host rate, each pass
//! advances the integrators by a smaller `g`. That keeps the loop stable at
//! high resonance without changing where the cutoff lands.
//!
//! ## Supported Factors
//!
//! - `1`: lowest CPU
//! - `2`: default
//! - `4`, `8`, `16`: progressively smoother high-resonance behaviour

use crate::math::sanitize;
use crate::model::Model;
use crate::svf::{FilterMode, FilterState, SvfCoefficients};

/// Maximum supported oversampling factor.
pub const MAX_OVERSAMPLE_FACTOR: usize = 16;

/// Oversampling factor selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Oversample {
    /// No oversampling.
    X1,
    /// 2× (power-on default).
    #[default]
    X2,
    /// 4×.
    X4,
    /// 8×.
    X8,
    /// 16×.
    X16,
}

impl Oversample {
    /// All factors in host selector order.
    pub const ALL: [Oversample; 5] = [
        Oversample::X1,
        Oversample::X2,
        Oversample::X4,
        Oversample::X8,
        Oversample::X16,
    ];

    /// Map a raw host selector (`factor = 1 << raw`). Out-of-range selectors
    /// saturate to ×1 or ×16.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            i32::MIN..=0 => Oversample::X1,
            1 => Oversample::X2,
            2 => Oversample::X4,
            3 => Oversample::X8,
            _ => Oversample::X16,
        }
    }

    /// Host selector index.
    pub fn index(self) -> i32 {
        match self {
            Oversample::X1 => 0,
            Oversample::X2 => 1,
            Oversample::X4 => 2,
            Oversample::X8 => 3,
            Oversample::X16 => 4,
        }
    }

    /// Look up a factor by its multiplier (1, 2, 4, 8 or 16).
    pub fn from_factor(factor: usize) -> Option<Self> {
        Oversample::ALL.into_iter().find(|o| o.factor() == factor)
    }

    /// Number of integrator passes per output sample.
    #[inline]
    pub fn factor(self) -> usize {
        1 << self.index()
    }
}

/// Block-constant settings of the oversampled core.
///
/// Built once per block; [`process`](Self::process) is then a pure function
/// of these settings, the incoming sample and the integrator state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OversampledCore {
    coeffs: SvfCoefficients,
    model: Model,
    mode: FilterMode,
    oversample: Oversample,
    pre_gain: f32,
}

impl OversampledCore {
    /// Capture the block's coefficients and selectors.
    ///
    /// The pre-filter gain `1 + resonance_amount × model scale` is derived here
    /// so higher resonance drives the nonlinearity harder.
    pub fn new(
        coeffs: SvfCoefficients,
        model: Model,
        mode: FilterMode,
        oversample: Oversample,
    ) -> Self {
        let pre_gain = 1.0 + coeffs.resonance_amount() * model.resonance_drive_scale();
        Self {
            coeffs,
            model,
            mode,
            oversample,
            pre_gain,
        }
    }

    /// Coefficients in use for this block.
    pub fn coefficients(&self) -> &SvfCoefficients {
        &self.coeffs
    }

    /// Resonance-dependent gain applied before the pre-filter saturation.
    pub fn pre_gain(&self) -> f32 {
        self.pre_gain
    }

    /// Active model.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Active mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Active oversampling factor.
    pub fn oversample(&self) -> Oversample {
        self.oversample
    }

    /// Produce one output sample from one conditioned input sample.
    #[inline]
    pub fn process(&self, state: &mut FilterState, input: f32) -> f32 {
        let passes = self.oversample.factor();
        // Input is held across passes, so the pre-filter stage is too.
        let u = self.model.saturate(input * self.pre_gain);

        let mut sum = 0.0;
        for _ in 0..passes {
            let (lp, bp, hp) = state.tick(&self.coeffs, u);
            sum += self.mode.mix(lp, bp, hp);
        }

        let averaged = sanitize(sum / passes as f32);
        self.model.saturate(averaged)
    }
}
