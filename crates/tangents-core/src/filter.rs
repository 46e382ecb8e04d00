//! The Tangents filter instance: one self-contained nonlinear TPT filter.
//!
//! Processing is split into two phases per block:
//!
//! 1. [`TangentsFilter::prepare_block`] advances the block-rate smoothers,
//!    applies CV, and derives coefficients at the oversampled rate. The result
//!    is a [`BlockSnapshot`] that stays fixed for the whole block.
//! 2. [`TangentsFilter::process_sample`] runs AGR + drive, the oversampled core
//!    and the output stage for one sample against that snapshot.
//!
//! [`TangentsFilter::finish_block`] then folds the block's peaks into the
//! meters. [`TangentsFilter::process_block_with`] runs all three for a plain
//! input/output slice pair.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | Name | Range | Default |
//! |-------|------|-------|---------|
//! | 0 | Cutoff | 20–20000 Hz (log) | 1000 |
//! | 1 | Resonance | 0–100 % | 0 |
//! | 2 | Mode | LP / BP / HP / AP | LP |
//! | 3 | Model | YU / MS / XX | YU |
//! | 4 | Oversample | 1x–16x | 2x |
//! | 5 | CV Cut Amt | −100–100 % | 100 |
//! | 6 | CV Res Amt | −100–100 % | 100 |
//! | 7 | Input AGR | 0–100 % | 50 |
//! | 8 | Drive | 0–100 % | 0 |
//!
//! # Example
//!
//! ```rust
//! use tangents_core::{Effect, FilterMode, TangentsFilter};
//!
//! let mut filter = TangentsFilter::new(48000.0);
//! filter.set_mode(FilterMode::Bandpass);
//! filter.set_resonance(0.8);
//!
//! let mut block = [0.0_f32; 64];
//! block[0] = 1.0;
//! filter.process_block_inplace(&mut block);
//! assert!(block.iter().all(|s| s.is_finite()));
//! ```

use libm::exp2f;

use crate::agr::{self, drive_gain, drive_percent};
use crate::display::Status;
use crate::effect::Effect;
use crate::math::sanitize;
use crate::meter::{BlockPeak, LevelMeters};
use crate::model::Model;
use crate::oversample::{Oversample, OversampledCore};
use crate::param::SmoothedParameters;
use crate::param_info::{ParamDescriptor, ParamId, ParameterInfo};
use crate::random::{DEFAULT_SEED, XorShift32};
use crate::svf::{FilterMode, FilterState, MIN_CUTOFF_HZ, SvfCoefficients};

/// Host-facing upper bound of the cutoff control.
pub const MAX_CUTOFF_HZ: f32 = 20000.0;

/// Octaves of cutoff sweep per unit of cutoff CV.
pub const CV_CUTOFF_OCTAVES: f32 = 5.0;

/// Resonance change per unit of resonance CV.
pub const CV_RESONANCE_SCALE: f32 = 0.5;

/// Oversampling assumed for the coefficients computed at construction.
const INITIAL_OVERSAMPLE: Oversample = Oversample::X2;

/// Index of the cutoff parameter.
pub const PARAM_CUTOFF: usize = 0;
/// Index of the resonance parameter.
pub const PARAM_RESONANCE: usize = 1;
/// Index of the mode selector.
pub const PARAM_MODE: usize = 2;
/// Index of the model selector.
pub const PARAM_MODEL: usize = 3;
/// Index of the oversampling selector.
pub const PARAM_OVERSAMPLE: usize = 4;
/// Index of the cutoff CV depth.
pub const PARAM_CV_CUTOFF_AMOUNT: usize = 5;
/// Index of the resonance CV depth.
pub const PARAM_CV_RESONANCE_AMOUNT: usize = 6;
/// Index of the input AGR control.
pub const PARAM_AGR: usize = 7;
/// Index of the drive control.
pub const PARAM_DRIVE: usize = 8;

const PARAM_COUNT: usize = 9;

/// Display names of the mode selector steps.
pub const MODE_LABELS: &[&str] = &["Lowpass", "Bandpass", "Highpass", "All-pass"];
/// Display names of the model selector steps.
pub const MODEL_LABELS: &[&str] = &["YU", "MS", "XX"];
/// Display names of the oversampling selector steps.
pub const OVERSAMPLE_LABELS: &[&str] = &["1x", "2x", "4x", "8x", "16x"];

/// Unsmoothed control targets in engineering units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    /// Cutoff before CV, Hz (20–20000).
    pub cutoff_hz: f32,
    /// Resonance before CV (0–1).
    pub resonance: f32,
    /// Output response.
    pub mode: FilterMode,
    /// Saturation character.
    pub model: Model,
    /// Integrator passes per sample.
    pub oversample: Oversample,
    /// Cutoff CV depth (−1 to 1).
    pub cv_cutoff_amount: f32,
    /// Resonance CV depth (−1 to 1).
    pub cv_resonance_amount: f32,
    /// AGR control (0–100).
    pub agr: f32,
    /// Drive gain (1–5).
    pub drive: f32,
}

impl Controls {
    /// Power-on controls.
    pub const fn new() -> Self {
        Self {
            cutoff_hz: 1000.0,
            resonance: 0.0,
            mode: FilterMode::Lowpass,
            model: Model::Yu,
            oversample: Oversample::X2,
            cv_cutoff_amount: 1.0,
            cv_resonance_amount: 1.0,
            agr: agr::AGR_UNITY,
            drive: 1.0,
        }
    }

    /// Copy with every continuous control forced into range. NaN takes the
    /// power-on value.
    pub fn clamped(self) -> Self {
        let d = Self::new();
        Self {
            cutoff_hz: clamp_or(self.cutoff_hz, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ, d.cutoff_hz),
            resonance: clamp_or(self.resonance, 0.0, 1.0, d.resonance),
            cv_cutoff_amount: clamp_or(self.cv_cutoff_amount, -1.0, 1.0, d.cv_cutoff_amount),
            cv_resonance_amount: clamp_or(
                self.cv_resonance_amount,
                -1.0,
                1.0,
                d.cv_resonance_amount,
            ),
            agr: clamp_or(self.agr, 0.0, 100.0, d.agr),
            drive: clamp_or(self.drive, 1.0, agr::MAX_DRIVE, d.drive),
            ..self
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Control voltages sampled for one block. `None` means not connected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockCv {
    /// Cutoff CV (1 unit = 5 octaves at full depth).
    pub cutoff: Option<f32>,
    /// Resonance CV (1 unit = +0.5 resonance at full depth).
    pub resonance: Option<f32>,
}

impl BlockCv {
    /// No CV connected.
    pub const NONE: Self = Self {
        cutoff: None,
        resonance: None,
    };
}

/// Everything the per-sample loop needs, fixed for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSnapshot {
    core: OversampledCore,
    cutoff_hz: f32,
    resonance: f32,
    agr: f32,
    drive: f32,
}

impl BlockSnapshot {
    /// The oversampled core settings.
    pub fn core(&self) -> &OversampledCore {
        &self.core
    }

    /// Smoothed cutoff for this block, before the coefficients apply the rate ceiling.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    /// Smoothed resonance used for this block's coefficients.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Smoothed AGR control.
    pub fn agr(&self) -> f32 {
        self.agr
    }

    /// Smoothed drive gain.
    pub fn drive(&self) -> f32 {
        self.drive
    }
}

/// How a block's output is combined with what is already in the output buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputCombine {
    /// Overwrite the output.
    #[default]
    Replace,
    /// Sum into the output.
    Add,
}

impl OutputCombine {
    /// Write `value` into `slot`.
    #[inline]
    pub fn apply(self, slot: &mut f32, value: f32) {
        match self {
            OutputCombine::Replace => *slot = value,
            OutputCombine::Add => *slot += value,
        }
    }
}

/// One Steiner-Parker style filter instance.
///
/// Owns the integrators, smoothers, random state and meters exclusively.
/// Nothing is allocated after construction.
#[derive(Debug, Clone)]
pub struct TangentsFilter {
    sample_rate: f32,
    controls: Controls,
    smoothed: SmoothedParameters,
    coeffs: SvfCoefficients,
    state: FilterState,
    rng: XorShift32,
    meters: LevelMeters,
    cv: BlockCv,
    input_peak: BlockPeak,
    output_peak: BlockPeak,
}

impl TangentsFilter {
    /// Create a filter at power-on defaults for `sample_rate`.
    pub fn new(sample_rate: f32) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "tangents filter constructed");

        Self {
            sample_rate,
            controls: Controls::new(),
            smoothed: SmoothedParameters::new(),
            coeffs: SvfCoefficients::new(
                1000.0,
                0.0,
                sample_rate * INITIAL_OVERSAMPLE.factor() as f32,
            ),
            state: FilterState::new(),
            rng: XorShift32::new(DEFAULT_SEED),
            meters: LevelMeters::new(),
            cv: BlockCv::NONE,
            input_peak: BlockPeak::default(),
            output_peak: BlockPeak::default(),
        }
    }

    /// Host sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current control targets.
    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Replace all control targets. Values are clamped into range.
    pub fn set_controls(&mut self, controls: Controls) {
        self.controls = controls.clamped();
    }

    /// Set the cutoff target in Hz (20–20000).
    pub fn set_cutoff_hz(&mut self, hz: f32) {
        self.set_controls(Controls {
            cutoff_hz: hz,
            ..self.controls
        });
    }

    /// Set the resonance target (0–1).
    pub fn set_resonance(&mut self, resonance: f32) {
        self.set_controls(Controls {
            resonance,
            ..self.controls
        });
    }

    /// Select the output response.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.controls.mode = mode;
    }

    /// Select the saturation model.
    pub fn set_model(&mut self, model: Model) {
        self.controls.model = model;
    }

    /// Select the oversampling factor.
    pub fn set_oversample(&mut self, oversample: Oversample) {
        self.controls.oversample = oversample;
    }

    /// Set the AGR control (0–100).
    pub fn set_agr(&mut self, agr: f32) {
        self.set_controls(Controls { agr, ..self.controls });
    }

    /// Set the drive as a percentage (0–100 → gain 1–5).
    pub fn set_drive_percent(&mut self, percent: f32) {
        self.set_controls(Controls {
            drive: drive_gain(percent),
            ..self.controls
        });
    }

    /// CV used by [`Effect`] processing until changed.
    pub fn set_cv(&mut self, cv: BlockCv) {
        self.cv = cv;
    }

    /// Reseed the AGR random generator.
    pub fn set_seed(&mut self, seed: u32) {
        self.rng = XorShift32::new(seed);
    }

    /// Smoothed values as of the last prepared block.
    pub fn smoothed(&self) -> &SmoothedParameters {
        &self.smoothed
    }

    /// Coefficients as of the last prepared block.
    pub fn coefficients(&self) -> &SvfCoefficients {
        &self.coeffs
    }

    /// Integrator state.
    pub fn filter_state(&self) -> &FilterState {
        &self.state
    }

    /// Input and output meters.
    pub fn meters(&self) -> &LevelMeters {
        &self.meters
    }

    /// Read-only display snapshot.
    pub fn status(&self) -> Status {
        Status::new(
            &self.meters,
            self.controls.mode,
            self.controls.model,
            self.controls.oversample,
            self.controls.cutoff_hz,
            self.controls.resonance,
            self.controls.agr,
        )
    }

    /// Block-rate phase: smooth controls, apply CV, derive coefficients.
    ///
    /// Drive, AGR and the CV depths are smoothed first; CV is then applied to
    /// the raw cutoff and resonance, and the modulated values are smoothed.
    /// The smoothed cutoff is limited to the effective rate only when the
    /// coefficients are derived. Non-finite CV is treated as zero.
    pub fn prepare_block(&mut self, cv: BlockCv) -> BlockSnapshot {
        let c = &self.controls;
        let s = &mut self.smoothed;
        let drive = s.drive.advance(c.drive);
        let agr = s.agr.advance(c.agr);
        let cv_cut_amt = s.cv_cutoff_amount.advance(c.cv_cutoff_amount);
        let cv_res_amt = s.cv_resonance_amount.advance(c.cv_resonance_amount);

        let effective_rate = self.sample_rate * c.oversample.factor() as f32;

        let mut cutoff = c.cutoff_hz;
        if let Some(v) = cv.cutoff {
            cutoff *= exp2f(sanitize(v) * cv_cut_amt * CV_CUTOFF_OCTAVES);
            // the rate ceiling applies to the smoothed value, in the coefficients
            if !cutoff.is_finite() {
                cutoff = f32::MAX;
            }
        }

        let mut resonance = c.resonance;
        if let Some(v) = cv.resonance {
            resonance += sanitize(v) * cv_res_amt * CV_RESONANCE_SCALE;
            resonance = resonance.clamp(0.0, 1.0);
        }

        let cutoff = s.cutoff.advance(cutoff);
        let resonance = s.resonance.advance(resonance);

        self.coeffs = SvfCoefficients::new(cutoff, resonance, effective_rate);
        self.input_peak = BlockPeak::default();
        self.output_peak = BlockPeak::default();

        BlockSnapshot {
            core: OversampledCore::new(self.coeffs, c.model, c.mode, c.oversample),
            cutoff_hz: cutoff,
            resonance,
            agr,
            drive,
        }
    }

    /// Sample-rate phase: condition, filter and shape one input sample.
    #[inline]
    pub fn process_sample(&mut self, snapshot: &BlockSnapshot, input: f32) -> f32 {
        let conditioned = agr::condition(input, snapshot.agr, snapshot.drive, &mut self.rng);
        self.input_peak.track(conditioned);

        let output = snapshot.core.process(&mut self.state, conditioned);
        self.output_peak.track(output);
        output
    }

    /// Fold this block's peaks into the meters.
    pub fn finish_block(&mut self) {
        self.meters.update(self.input_peak, self.output_peak);
    }

    /// Run one full block from `input` into `output`.
    ///
    /// Processes the common prefix of both slices. An empty block still
    /// advances the smoothers and meters.
    pub fn process_block_with(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        cv: BlockCv,
        combine: OutputCombine,
    ) {
        let snapshot = self.prepare_block(cv);
        for (x, y) in input.iter().zip(output.iter_mut()) {
            let out = self.process_sample(&snapshot, *x);
            combine.apply(y, out);
        }
        self.finish_block();
    }
}

impl Default for TangentsFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Effect for TangentsFilter {
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        let snapshot = self.prepare_block(self.cv);
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(&snapshot, *sample);
        }
        self.finish_block();
    }

    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.process_block_with(input, output, self.cv, OutputCombine::Replace);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            from = self.sample_rate,
            to = sample_rate,
            "tangents sample rate changed"
        );

        self.sample_rate = sample_rate;
        let effective_rate = sample_rate * self.controls.oversample.factor() as f32;
        self.coeffs = SvfCoefficients::new(
            self.smoothed.cutoff.get(),
            self.smoothed.resonance.get(),
            effective_rate,
        );
    }

    /// Clears integrators and meters, snaps the smoothers to the current
    /// targets and reseeds the random generator.
    fn reset(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!("tangents filter reset");

        let c = self.controls;
        let s = &mut self.smoothed;
        s.cutoff.set_immediate(c.cutoff_hz);
        s.resonance.set_immediate(c.resonance);
        s.drive.set_immediate(c.drive);
        s.agr.set_immediate(c.agr);
        s.cv_cutoff_amount.set_immediate(c.cv_cutoff_amount);
        s.cv_resonance_amount.set_immediate(c.cv_resonance_amount);

        self.state.reset();
        self.meters.reset();
        self.rng = XorShift32::new(DEFAULT_SEED);
        self.input_peak = BlockPeak::default();
        self.output_peak = BlockPeak::default();
        self.set_sample_rate(self.sample_rate);
    }
}

impl ParameterInfo for TangentsFilter {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        let desc = match index {
            PARAM_CUTOFF => ParamDescriptor::frequency_hz(
                "Cutoff",
                "Cutoff",
                MIN_CUTOFF_HZ,
                MAX_CUTOFF_HZ,
                1000.0,
            )
            .with_id(ParamId(100), "cutoff_hz")
            .with_group("filter"),
            PARAM_RESONANCE => ParamDescriptor::percent("Resonance", "Reso", 0.0, 100.0, 0.0)
                .with_id(ParamId(101), "resonance")
                .with_group("filter"),
            PARAM_MODE => ParamDescriptor::selector("Mode", "Mode", MODE_LABELS, 0)
                .with_id(ParamId(102), "mode")
                .with_group("filter"),
            PARAM_MODEL => ParamDescriptor::selector("Model", "Model", MODEL_LABELS, 0)
                .with_id(ParamId(103), "model")
                .with_group("filter"),
            PARAM_OVERSAMPLE => {
                ParamDescriptor::selector("Oversample", "OS", OVERSAMPLE_LABELS, 1)
                    .with_id(ParamId(104), "oversample")
                    .with_group("filter")
            }
            PARAM_CV_CUTOFF_AMOUNT => {
                ParamDescriptor::percent("CV Cut Amt", "CV Cut", -100.0, 100.0, 100.0)
                    .with_id(ParamId(105), "cv_cutoff_amount")
                    .with_group("cv")
            }
            PARAM_CV_RESONANCE_AMOUNT => {
                ParamDescriptor::percent("CV Res Amt", "CV Res", -100.0, 100.0, 100.0)
                    .with_id(ParamId(106), "cv_resonance_amount")
                    .with_group("cv")
            }
            PARAM_AGR => ParamDescriptor::percent("Input AGR", "AGR", 0.0, 100.0, 50.0)
                .with_id(ParamId(107), "agr")
                .with_group("input"),
            PARAM_DRIVE => ParamDescriptor::percent("Drive", "Drive", 0.0, 100.0, 0.0)
                .with_id(ParamId(108), "drive")
                .with_group("input"),
            _ => return None,
        };
        Some(desc)
    }

    fn get_param(&self, index: usize) -> f32 {
        let c = &self.controls;
        match index {
            PARAM_CUTOFF => c.cutoff_hz,
            PARAM_RESONANCE => c.resonance * 100.0,
            PARAM_MODE => c.mode.index() as f32,
            PARAM_MODEL => c.model.index() as f32,
            PARAM_OVERSAMPLE => c.oversample.index() as f32,
            PARAM_CV_CUTOFF_AMOUNT => c.cv_cutoff_amount * 100.0,
            PARAM_CV_RESONANCE_AMOUNT => c.cv_resonance_amount * 100.0,
            PARAM_AGR => c.agr,
            PARAM_DRIVE => drive_percent(c.drive),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = self.param_info(index) else {
            return;
        };
        let v = desc.clamp(value);
        let step = libm::roundf(v) as i32;
        let mut c = self.controls;
        match index {
            PARAM_CUTOFF => c.cutoff_hz = v,
            PARAM_RESONANCE => c.resonance = v / 100.0,
            PARAM_MODE => c.mode = FilterMode::from_raw(step),
            PARAM_MODEL => c.model = Model::from_raw(step),
            PARAM_OVERSAMPLE => c.oversample = Oversample::from_raw(step),
            PARAM_CV_CUTOFF_AMOUNT => c.cv_cutoff_amount = v / 100.0,
            PARAM_CV_RESONANCE_AMOUNT => c.cv_resonance_amount = v / 100.0,
            PARAM_AGR => c.agr = v,
            PARAM_DRIVE => c.drive = drive_gain(v),
            _ => {}
        }
        self.set_controls(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(filter: &mut TangentsFilter, blocks: usize) {
        let mut silence = [0.0; 32];
        for _ in 0..blocks {
            filter.process_block_inplace(&mut silence);
        }
    }

    #[test]
    fn test_construction_defaults() {
        let filter = TangentsFilter::new(48000.0);
        let expected = SvfCoefficients::new(1000.0, 0.0, 96000.0);
        assert_eq!(*filter.coefficients(), expected);
        assert_eq!(*filter.smoothed(), SmoothedParameters::new());
        assert_eq!(filter.meters().input.level(), 0.0);
        assert_eq!(*filter.controls(), Controls::new());
    }

    #[test]
    fn test_prepare_block_smooths_cutoff() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_cutoff_hz(2000.0);
        let snap = filter.prepare_block(BlockCv::NONE);
        assert!((snap.cutoff_hz() - 1100.0).abs() < 1e-3);
        let expected = SvfCoefficients::new(snap.cutoff_hz(), 0.0, 96000.0);
        assert_eq!(*snap.core().coefficients(), expected);
    }

    #[test]
    fn test_cv_modulates_cutoff_in_octaves() {
        let mut filter = TangentsFilter::new(48000.0);
        // one fifth of a unit at full depth = one octave up
        let snap = filter.prepare_block(BlockCv {
            cutoff: Some(0.2),
            resonance: None,
        });
        assert!((snap.cutoff_hz() - 1100.0).abs() < 0.01, "{}", snap.cutoff_hz());
    }

    #[test]
    fn test_cv_resonance_is_clamped() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_resonance(0.9);
        for _ in 0..300 {
            filter.prepare_block(BlockCv {
                cutoff: None,
                resonance: Some(5.0),
            });
        }
        assert!(filter.smoothed().resonance.get() <= 1.0);
        assert!(filter.smoothed().resonance.is_settled(1.0));
    }

    #[test]
    fn test_non_finite_cv_is_ignored() {
        let mut filter = TangentsFilter::new(48000.0);
        let snap = filter.prepare_block(BlockCv {
            cutoff: Some(f32::NAN),
            resonance: Some(f32::INFINITY),
        });
        assert_eq!(snap.cutoff_hz(), 1000.0);
        assert_eq!(snap.resonance(), 0.0);
    }

    #[test]
    fn test_cv_cutoff_is_limited_after_smoothing() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_oversample(Oversample::X1);
        filter.set_cutoff_hz(10000.0);
        filter.reset();
        let up = BlockCv {
            cutoff: Some(0.4),
            resonance: None,
        };

        // two octaves up: the target is 40 kHz, above the 21.6 kHz ceiling
        let snap = filter.prepare_block(up);
        assert!((snap.cutoff_hz() - 13000.0).abs() < 0.1, "{}", snap.cutoff_hz());
        assert_eq!(
            *snap.core().coefficients(),
            SvfCoefficients::new(snap.cutoff_hz(), 0.0, 48000.0)
        );

        for _ in 0..3 {
            filter.prepare_block(up);
        }
        let smoothed = filter.smoothed().cutoff.get();
        assert!((smoothed - 20317.0).abs() < 0.5, "{smoothed}");

        for _ in 0..6 {
            filter.prepare_block(up);
        }
        let snap = filter.prepare_block(up);
        assert!(snap.cutoff_hz() > 0.45 * 48000.0);
        assert_eq!(
            *snap.core().coefficients(),
            SvfCoefficients::new(0.45 * 48000.0, 0.0, 48000.0)
        );

        // release starts from the unclamped value
        let before = snap.cutoff_hz();
        let released = filter.prepare_block(BlockCv::NONE).cutoff_hz();
        assert!((released - (before + (10000.0 - before) * 0.1)).abs() < 0.5);
    }

    #[test]
    fn test_huge_cutoff_cv_stays_finite() {
        let mut filter = TangentsFilter::new(48000.0);
        for _ in 0..4 {
            let snap = filter.prepare_block(BlockCv {
                cutoff: Some(1e9),
                resonance: None,
            });
            assert!(snap.cutoff_hz().is_finite());
            assert!(snap.core().coefficients().g.is_finite());
        }
    }

    #[test]
    fn test_set_cv_drives_effect_processing() {
        let cv = BlockCv {
            cutoff: Some(0.2),
            resonance: None,
        };
        let mut inplace = TangentsFilter::new(48000.0);
        inplace.set_cv(cv);
        inplace.process_block_inplace(&mut [0.0; 16]);
        let cutoff = inplace.smoothed().cutoff.get();
        assert!((cutoff - 1100.0).abs() < 0.01, "{cutoff}");

        let mut copied = TangentsFilter::new(48000.0);
        copied.set_cv(cv);
        let mut out = [0.0; 16];
        copied.process_block(&[0.0; 16], &mut out);
        assert_eq!(copied.smoothed().cutoff.get(), cutoff);

        inplace.set_cv(BlockCv::NONE);
        inplace.process_block_inplace(&mut [0.0; 16]);
        assert!(inplace.smoothed().cutoff.get() < cutoff);
    }

    #[test]
    fn test_output_combine_add() {
        let mut a = TangentsFilter::new(48000.0);
        let mut b = TangentsFilter::new(48000.0);
        let input: Vec<f32> = (0..64).map(|i| ((i as f32) * 0.3).sin() * 0.5).collect();

        let mut replaced = vec![0.0; 64];
        a.process_block_with(&input, &mut replaced, BlockCv::NONE, OutputCombine::Replace);

        let mut added = vec![0.25; 64];
        b.process_block_with(&input, &mut added, BlockCv::NONE, OutputCombine::Add);

        for (r, s) in replaced.iter().zip(&added) {
            assert!((r + 0.25 - s).abs() < 1e-6);
        }
    }

    #[test]
    fn test_meters_track_conditioned_input() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_drive_percent(100.0);
        settle(&mut filter, 200);
        let mut block = [0.0; 32];
        block[3] = -0.2;
        filter.process_block_inplace(&mut block);
        // drive 5x, AGR unity: peak 1.0 -> level 0.05
        assert!((filter.meters().input.level() - 0.05).abs() < 1e-4);
        assert!(filter.meters().output.level() > 0.0);
    }

    #[test]
    fn test_param_round_trip() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_param(PARAM_CUTOFF, 440.0);
        filter.set_param(PARAM_RESONANCE, 75.0);
        filter.set_param(PARAM_MODE, 3.0);
        filter.set_param(PARAM_MODEL, 2.0);
        filter.set_param(PARAM_OVERSAMPLE, 4.0);
        filter.set_param(PARAM_DRIVE, 50.0);
        filter.set_param(PARAM_CV_CUTOFF_AMOUNT, -250.0);

        assert_eq!(filter.get_param(PARAM_CUTOFF), 440.0);
        assert!((filter.get_param(PARAM_RESONANCE) - 75.0).abs() < 1e-4);
        assert_eq!(filter.controls().mode, FilterMode::Allpass);
        assert_eq!(filter.controls().model, Model::Xx);
        assert_eq!(filter.controls().oversample, Oversample::X16);
        assert_eq!(filter.controls().drive, 3.0);
        assert_eq!(filter.get_param(PARAM_CV_CUTOFF_AMOUNT), -100.0);
        assert_eq!(filter.find_param_by_name("agr"), Some(PARAM_AGR));
        assert_eq!(filter.find_param_by_name("Reso"), Some(PARAM_RESONANCE));
    }

    #[test]
    fn test_reset_restores_silence() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_resonance(0.95);
        let mut block = [0.0; 64];
        block[0] = 1.0;
        filter.process_block_inplace(&mut block);
        assert_ne!(*filter.filter_state(), FilterState::new());

        filter.reset();
        assert_eq!(*filter.filter_state(), FilterState::new());
        assert_eq!(filter.smoothed().resonance.get(), 0.95);
        assert_eq!(filter.meters().output.level(), 0.0);
    }

    #[test]
    fn test_set_sample_rate_recomputes_coefficients() {
        let mut filter = TangentsFilter::new(48000.0);
        filter.set_sample_rate(96000.0);
        assert_eq!(
            *filter.coefficients(),
            SvfCoefficients::new(1000.0, 0.0, 192000.0)
        );
    }
}
