//! Property-based tests for the Tangents filter core.
//!
//! Covers coefficient bounds, output boundedness across every mode, model and
//! oversampling factor, the numeric guards, and block-size invariance, using
//! proptest for randomized inputs.

use proptest::prelude::*;
use tangents_core::{
    BlockSmoothedParam, Effect, FilterMode, Model, Oversample, SvfCoefficients, TangentsFilter,
    XorShift32, aggressive_sat, agr_gain, diode_clip, fast_tanh, sanitize,
};

fn mode_strategy() -> impl Strategy<Value = FilterMode> {
    prop::sample::select(FilterMode::ALL.to_vec())
}

fn model_strategy() -> impl Strategy<Value = Model> {
    prop::sample::select(Model::ALL.to_vec())
}

fn oversample_strategy() -> impl Strategy<Value = Oversample> {
    prop::sample::select(Oversample::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any in-range cutoff and resonance at any effective rate,
    /// `g ≥ 0`, `k ∈ [0.1, 2.0]` and `g_inv` is positive and finite.
    #[test]
    fn coefficient_bounds(
        cutoff_fraction in 0.0f32..=1.0f32,
        resonance in 0.0f32..=1.0f32,
        host_rate in prop::sample::select(vec![44100.0f32, 48000.0, 96000.0, 192000.0]),
        oversample in oversample_strategy(),
    ) {
        let rate = host_rate * oversample.factor() as f32;
        let cutoff = 20.0 + cutoff_fraction * (0.45 * rate - 20.0);
        let c = SvfCoefficients::new(cutoff, resonance, rate);

        prop_assert!(c.g >= 0.0 && c.g.is_finite(), "g = {}", c.g);
        prop_assert!(c.k >= 0.1 - 1e-6 && c.k <= 2.0, "k = {}", c.k);
        prop_assert!(c.g_inv > 0.0 && c.g_inv.is_finite(), "g_inv = {}", c.g_inv);
    }

    /// Out-of-range and non-finite controls still give usable coefficients.
    #[test]
    fn coefficients_survive_wild_controls(
        cutoff in prop::num::f32::ANY,
        resonance in prop::num::f32::ANY,
    ) {
        let c = SvfCoefficients::new(cutoff, resonance, 48000.0);
        prop_assert!(c.g.is_finite() && c.k.is_finite() && c.g_inv.is_finite());
        prop_assert!(c.g_inv > 0.0);
    }

    /// Any finite input through any mode/model/factor yields finite output
    /// within the output-stage envelope.
    #[test]
    fn output_is_bounded(
        mode in mode_strategy(),
        model in model_strategy(),
        oversample in oversample_strategy(),
        cutoff in 20.0f32..20000.0f32,
        resonance in 0.0f32..=1.0f32,
        drive in 0.0f32..=100.0f32,
        input in prop::collection::vec(-100.0f32..100.0f32, 256),
    ) {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_mode(mode);
        filter.set_model(model);
        filter.set_oversample(oversample);
        filter.set_cutoff_hz(cutoff);
        filter.set_resonance(resonance);
        filter.set_drive_percent(drive);

        for chunk in input.chunks(32) {
            let mut block = chunk.to_vec();
            filter.process_block_inplace(&mut block);
            for &y in &block {
                prop_assert!(y.is_finite(), "{:?}/{:?}/{:?}: {}", mode, model, oversample, y);
                prop_assert!(y.abs() <= 1.2, "{:?}/{:?}/{:?}: {}", mode, model, oversample, y);
            }
        }
    }

    /// `sanitize` is idempotent and never lets NaN or overflow through.
    #[test]
    fn sanitize_is_idempotent(x in prop::num::f32::ANY) {
        let once = sanitize(x);
        prop_assert_eq!(sanitize(once), once);
        prop_assert!(once.is_finite());
        prop_assert!(once.abs() <= 1e10);
    }

    /// Saturation curves stay inside their documented ranges.
    #[test]
    fn saturation_bounds(x in -1.0e6f32..1.0e6f32) {
        let yu = fast_tanh(x);
        let ms = diode_clip(x);
        let xx = aggressive_sat(x);
        prop_assert!(yu.abs() <= 1.0, "YU({}) = {}", x, yu);
        prop_assert!((-0.5..=1.0).contains(&ms), "MS({}) = {}", x, ms);
        prop_assert!(xx.abs() <= 0.8, "XX({}) = {}", x, xx);
    }

    /// AGR gain stays in [0, 4] for every control step.
    #[test]
    fn agr_gain_range(value in 0i32..=100, seed in 1u32..=u32::MAX) {
        let mut rng = XorShift32::new(seed);
        let g = agr_gain(value, &mut rng);
        prop_assert!((0.0..=4.0).contains(&g), "agr_gain({}) = {}", value, g);
    }

    /// Block smoothing converges from any start to any target.
    #[test]
    fn smoothing_converges(start in -1000.0f32..1000.0f32, target in -1000.0f32..1000.0f32) {
        let mut p = BlockSmoothedParam::new(start);
        for _ in 0..200 {
            p.advance(target);
        }
        prop_assert!((p.get() - target).abs() < 1e-3, "{} -> {}", start, p.get());
    }

    /// With controls at rest, splitting the stream into different block sizes
    /// produces identical output.
    #[test]
    fn block_size_invariance_at_rest(
        mode in mode_strategy(),
        model in model_strategy(),
        oversample in oversample_strategy(),
        block_a in 1usize..64,
        block_b in 1usize..64,
        input in prop::collection::vec(-1.0f32..=1.0f32, 512),
    ) {
        let render = |block: usize| {
            let mut filter = TangentsFilter::new(48000.0);
            filter.set_mode(mode);
            filter.set_model(model);
            filter.set_oversample(oversample);
            let mut out = input.clone();
            for chunk in out.chunks_mut(block) {
                filter.process_block_inplace(chunk);
            }
            out
        };
        prop_assert_eq!(render(block_a * 4), render(block_b * 4));
    }
}
