//! Filter model selection (saturation character).

use crate::math::{aggressive_sat, diode_clip, fast_tanh};

/// Nonlinear character of the filter.
///
/// The model picks the saturation curve applied before the integrators
/// (scaled by resonance) and again at the output stage (unscaled).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Model {
    /// Smooth symmetric tanh ([`fast_tanh`]).
    #[default]
    Yu,
    /// Asymmetric diode clipping ([`diode_clip`]).
    Ms,
    /// Aggressive fold-back ([`aggressive_sat`]).
    Xx,
}

impl Model {
    /// All models in host selector order.
    pub const ALL: [Model; 3] = [Model::Yu, Model::Ms, Model::Xx];

    /// Map a raw host selector to a model. Unknown selectors fall back to [`Model::Yu`].
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => Model::Ms,
            2 => Model::Xx,
            _ => Model::Yu,
        }
    }

    /// Host selector index.
    pub fn index(self) -> i32 {
        match self {
            Model::Yu => 0,
            Model::Ms => 1,
            Model::Xx => 2,
        }
    }

    /// Parse a model name (`"yu"`, `"ms"`, `"xx"`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Model::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Model::Yu => "YU",
            Model::Ms => "MS",
            Model::Xx => "XX",
        }
    }

    /// How strongly resonance pushes the pre-filter nonlinearity.
    ///
    /// The pre-filter gain is `1 + resonance_amount × drive_scale`.
    #[inline]
    pub fn resonance_drive_scale(self) -> f32 {
        match self {
            Model::Yu => 1.0,
            Model::Ms => 0.5,
            Model::Xx => 2.0,
        }
    }

    /// Apply this model's saturation curve.
    #[inline]
    pub fn saturate(self, x: f32) -> f32 {
        match self {
            Model::Yu => fast_tanh(x),
            Model::Ms => diode_clip(x),
            Model::Xx => aggressive_sat(x),
        }
    }
}
