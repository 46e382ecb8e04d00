//! Saturation curves and numeric guards for the filter core.
//!
//! Every function here is a pure scalar map, allocation-free and `no_std`.
//! The three saturation curves give the filter models their character:
//!
//! | Function | Model | Character | Output range |
//! |----------|-------|-----------|--------------|
//! | [`fast_tanh`] | YU | Smooth, symmetric | \[-1, 1\] |
//! | [`diode_clip`] | MS | Asymmetric, harder on the positive side | \[-0.5, 1\] |
//! | [`aggressive_sat`] | XX | tanh of `2x` with fold-back above 0.8 | \[-0.8, 0.8\] |
//!
//! The formulas are exact rational/exponential expressions; the boundedness
//! and continuity guarantees of the filter depend on them, so they are not
//! swapped for library `tanhf`.
//!
//! # Guards
//!
//! - [`sanitize`] replaces NaN, infinities and magnitudes beyond
//!   [`SANITIZE_LIMIT`] with `0.0`.
//! - [`soft_clamp`] limits integrator state to a ceiling (see [`STATE_LIMIT`]).

use libm::expf;

/// Magnitude above which a value is considered an overflow and zeroed by [`sanitize`].
pub const SANITIZE_LIMIT: f32 = 1e10;

/// Ceiling applied to the bandpass and lowpass integrator state.
pub const STATE_LIMIT: f32 = 5.0;

/// Fold-back threshold of [`aggressive_sat`].
pub const FOLD_THRESHOLD: f32 = 0.8;

/// Rational tanh approximation.
///
/// `x·(27 + x²) / (27 + 9x²)`, clamped to exactly ±1 for `|x| > 3`.
/// The rational part is monotonic on \[-3, 3\] and reaches ±1 at ±3, so the
/// curve is continuous and never leaves \[-1, 1\].
///
/// # Example
///
/// ```rust
/// use tangents_core::fast_tanh;
///
/// assert_eq!(fast_tanh(0.0), 0.0);
/// assert_eq!(fast_tanh(3.0), 1.0);
/// assert_eq!(fast_tanh(-10.0), -1.0);
/// ```
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    if x > 3.0 {
        return 1.0;
    }
    if x < -3.0 {
        return -1.0;
    }
    let x2 = x * x;
    x * (27.0 + x2) / (27.0 + 9.0 * x2)
}

/// Asymmetric diode-style clipper.
///
/// Positive half: `1 − e^(−x)`, approaching 1.
/// Negative half: `−0.5·(1 − e^(2x))`, approaching −0.5.
///
/// # Example
///
/// ```rust
/// use tangents_core::diode_clip;
///
/// assert!(diode_clip(10.0) <= 1.0);
/// assert!(diode_clip(-10.0) >= -0.5);
/// ```
#[inline]
pub fn diode_clip(x: f32) -> f32 {
    if x > 0.0 {
        1.0 - expf(-x)
    } else {
        -0.5 * (1.0 - expf(2.0 * x))
    }
}

/// Aggressive saturation with fold-back.
///
/// Applies [`fast_tanh`] to `2x`; when the magnitude exceeds
/// [`FOLD_THRESHOLD`], half of the excess is reflected back below the
/// threshold, keeping the sign.
#[inline]
pub fn aggressive_sat(x: f32) -> f32 {
    let y = fast_tanh(x * 2.0);
    let magnitude = y.abs();
    if magnitude > FOLD_THRESHOLD {
        let excess = magnitude - FOLD_THRESHOLD;
        let folded = FOLD_THRESHOLD - excess * 0.5;
        if y > 0.0 { folded } else { -folded }
    } else {
        y
    }
}

/// Replace NaN, infinity and overflow (`|x| > 1e10`) with `0.0`.
///
/// Idempotent: `sanitize(sanitize(x)) == sanitize(x)` for every `x`.
///
/// # Example
///
/// ```rust
/// use tangents_core::sanitize;
///
/// assert_eq!(sanitize(f32::NAN), 0.0);
/// assert_eq!(sanitize(1e20), 0.0);
/// assert_eq!(sanitize(0.25), 0.25);
/// ```
#[inline]
pub fn sanitize(x: f32) -> f32 {
    if x.is_nan() || x > SANITIZE_LIMIT || x < -SANITIZE_LIMIT {
        0.0
    } else {
        x
    }
}

/// Clamp `x` to `±limit`. NaN passes through untouched for [`sanitize`] to catch.
#[inline]
pub fn soft_clamp(x: f32, limit: f32) -> f32 {
    if x > limit {
        limit
    } else if x < -limit {
        -limit
    } else {
        x
    }
}
