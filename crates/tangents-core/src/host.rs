//! Host adapter: raw integer parameters and a shared bus buffer.
//!
//! Module hosts hand every algorithm one contiguous buffer holding all busses
//! back to back, plus the current value of every parameter as a raw integer.
//! [`Algorithm`] converts those raw values to engineering units, picks its
//! busses out of the buffer and drives a [`TangentsFilter`] one block per
//! [`step`](Algorithm::step).
//!
//! # Bus Layout
//!
//! ```text
//! bus_frames: [ bus 1 | bus 2 | ... | bus n ]   each num_frames long
//! bus n starts at (n - 1) * num_frames
//! ```
//!
//! A bus number of zero, or one whose frames would run past the end of the
//! buffer, is "not connected": a missing input reads silence, a missing output
//! is skipped, and a missing CV gives no modulation.

use crate::display::Status;
use crate::filter::{BlockCv, Controls, OutputCombine, TangentsFilter};
use crate::model::Model;
use crate::oversample::Oversample;
use crate::svf::FilterMode;

/// Highest bus number a host exposes.
pub const MAX_BUS: i32 = 28;

/// Position of each parameter in the host table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ParamIndex {
    /// Audio input bus.
    Input = 0,
    /// Audio output bus.
    Output,
    /// 0 = add to the output bus, non-zero = replace.
    OutputMode,
    /// Cutoff in Hz.
    Cutoff,
    /// Resonance, 0–1000.
    Resonance,
    /// Mode selector.
    Mode,
    /// Model selector.
    Model,
    /// Cutoff CV bus (0 = none).
    CvCutoff,
    /// Cutoff CV depth, −1000–1000.
    CvCutoffAmount,
    /// Resonance CV bus (0 = none).
    CvResonance,
    /// Resonance CV depth, −1000–1000.
    CvResonanceAmount,
    /// Input AGR, 0–1000.
    InputAgr,
    /// Drive, 0–1000.
    Drive,
    /// Oversampling selector, 0–4.
    Oversample,
}

impl ParamIndex {
    /// Every parameter in table order.
    pub const ALL: [ParamIndex; NUM_PARAMETERS] = [
        ParamIndex::Input,
        ParamIndex::Output,
        ParamIndex::OutputMode,
        ParamIndex::Cutoff,
        ParamIndex::Resonance,
        ParamIndex::Mode,
        ParamIndex::Model,
        ParamIndex::CvCutoff,
        ParamIndex::CvCutoffAmount,
        ParamIndex::CvResonance,
        ParamIndex::CvResonanceAmount,
        ParamIndex::InputAgr,
        ParamIndex::Drive,
        ParamIndex::Oversample,
    ];

    /// Parameter at table position `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Table position.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Table entry.
    pub fn info(self) -> &'static HostParameter {
        &HOST_PARAMETERS[self.index()]
    }
}

/// Number of host parameters.
pub const NUM_PARAMETERS: usize = 14;

/// What a host parameter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostParamKind {
    /// Audio input bus selector.
    AudioInput,
    /// Audio output bus selector.
    AudioOutput,
    /// Add/replace flag for the output bus.
    OutputMode,
    /// CV input bus selector (0 = none).
    CvInput,
    /// Plain integer control.
    Value,
    /// Enumerated selector.
    Enum,
}

/// One row of the host parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostParameter {
    /// Display name.
    pub name: &'static str,
    /// Minimum raw value.
    pub min: i32,
    /// Maximum raw value.
    pub max: i32,
    /// Raw default.
    pub default: i32,
    /// Role of the parameter.
    pub kind: HostParamKind,
    /// Raw units per displayed unit (10 shows 0–1000 as 0.0–100.0).
    pub display_divisor: i32,
    /// Step names for enumerated selectors.
    pub labels: &'static [&'static str],
}

impl HostParameter {
    const fn bus(name: &'static str, min: i32, default: i32, kind: HostParamKind) -> Self {
        Self {
            name,
            min,
            max: MAX_BUS,
            default,
            kind,
            display_divisor: 1,
            labels: &[],
        }
    }

    const fn value(name: &'static str, min: i32, max: i32, default: i32, divisor: i32) -> Self {
        Self {
            name,
            min,
            max,
            default,
            kind: HostParamKind::Value,
            display_divisor: divisor,
            labels: &[],
        }
    }

    const fn selector(name: &'static str, default: i32, labels: &'static [&'static str]) -> Self {
        Self {
            name,
            min: 0,
            max: labels.len() as i32 - 1,
            default,
            kind: HostParamKind::Enum,
            display_divisor: 1,
            labels,
        }
    }

    /// Clamp a raw value into this parameter's range.
    #[inline]
    pub fn clamp(&self, raw: i32) -> i32 {
        raw.clamp(self.min, self.max)
    }
}

/// The host parameter table, in [`ParamIndex`] order.
pub static HOST_PARAMETERS: [HostParameter; NUM_PARAMETERS] = [
    HostParameter::bus("Input", 1, 1, HostParamKind::AudioInput),
    HostParameter::bus("Output", 1, 13, HostParamKind::AudioOutput),
    HostParameter {
        name: "Output mode",
        min: 0,
        max: 1,
        default: 0,
        kind: HostParamKind::OutputMode,
        display_divisor: 1,
        labels: &["Add", "Replace"],
    },
    HostParameter::value("Cutoff", 20, 20000, 1000, 1),
    HostParameter::value("Resonance", 0, 1000, 0, 10),
    HostParameter::selector("Mode", 0, &["Lowpass", "Bandpass", "Highpass", "All-pass"]),
    HostParameter::selector("Model", 0, &["YU", "MS", "XX"]),
    HostParameter::bus("CV Cutoff", 0, 0, HostParamKind::CvInput),
    HostParameter::value("CV Cut Amt", -1000, 1000, 1000, 10),
    HostParameter::bus("CV Res", 0, 0, HostParamKind::CvInput),
    HostParameter::value("CV Res Amt", -1000, 1000, 1000, 10),
    HostParameter::value("Input", 0, 1000, 500, 10),
    HostParameter::value("Drive", 0, 1000, 0, 10),
    HostParameter::selector("Oversample", 1, &["1x", "2x", "4x", "8x", "16x"]),
];

/// Current raw value of every host parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostParams {
    values: [i32; NUM_PARAMETERS],
}

impl HostParams {
    /// Every parameter at its table default.
    pub fn new() -> Self {
        let mut values = [0; NUM_PARAMETERS];
        for (v, p) in values.iter_mut().zip(HOST_PARAMETERS.iter()) {
            *v = p.default;
        }
        Self { values }
    }

    /// Raw value of `param`.
    #[inline]
    pub fn get(&self, param: ParamIndex) -> i32 {
        self.values[param.index()]
    }

    /// Store `raw`, clamped to the table range.
    pub fn set(&mut self, param: ParamIndex, raw: i32) {
        self.values[param.index()] = param.info().clamp(raw);
    }

    /// All raw values in table order.
    pub fn values(&self) -> &[i32; NUM_PARAMETERS] {
        &self.values
    }

    /// Convert the filter controls to engineering units.
    pub fn controls(&self) -> Controls {
        Controls {
            cutoff_hz: self.get(ParamIndex::Cutoff) as f32,
            resonance: self.get(ParamIndex::Resonance) as f32 / 1000.0,
            mode: FilterMode::from_raw(self.get(ParamIndex::Mode)),
            model: Model::from_raw(self.get(ParamIndex::Model)),
            oversample: Oversample::from_raw(self.get(ParamIndex::Oversample)),
            cv_cutoff_amount: self.get(ParamIndex::CvCutoffAmount) as f32 / 1000.0,
            cv_resonance_amount: self.get(ParamIndex::CvResonanceAmount) as f32 / 1000.0,
            agr: self.get(ParamIndex::InputAgr) as f32 / 10.0,
            drive: 1.0 + self.get(ParamIndex::Drive) as f32 / 250.0,
        }
    }

    /// Output combination selected by the output mode flag.
    pub fn output_combine(&self) -> OutputCombine {
        if self.get(ParamIndex::OutputMode) != 0 {
            OutputCombine::Replace
        } else {
            OutputCombine::Add
        }
    }
}

impl Default for HostParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Start offset of bus `bus` in a buffer of `len` samples, if it fits.
#[inline]
fn bus_offset(bus: i32, num_frames: usize, len: usize) -> Option<usize> {
    let n = usize::try_from(bus).ok()?.checked_sub(1)?;
    let start = n.checked_mul(num_frames)?;
    (start.checked_add(num_frames)? <= len).then_some(start)
}

/// One filter instance as a host sees it.
///
/// # Example
///
/// ```rust
/// use tangents_core::host::{Algorithm, ParamIndex};
///
/// let mut alg = Algorithm::construct(48000.0);
/// alg.set_param(ParamIndex::Output, 2);
/// alg.set_param(ParamIndex::OutputMode, 1);
///
/// // two busses of 8 frames: input on 1, output on 2
/// let mut busses = [0.0_f32; 16];
/// busses[0] = 1.0;
/// alg.step(&mut busses, 2);
/// assert!(busses[8..].iter().any(|s| *s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Algorithm {
    params: HostParams,
    filter: TangentsFilter,
}

impl Algorithm {
    /// Build an instance with default parameters for `sample_rate`.
    pub fn construct(sample_rate: f32) -> Self {
        let params = HostParams::new();
        let mut filter = TangentsFilter::new(sample_rate);
        filter.set_controls(params.controls());
        Self { params, filter }
    }

    /// Raw parameter values.
    pub fn params(&self) -> &HostParams {
        &self.params
    }

    /// Set a raw parameter value. Out-of-range values are clamped.
    pub fn set_param(&mut self, param: ParamIndex, raw: i32) {
        self.params.set(param, raw);
        self.parameter_changed(param);
    }

    /// Change notification. Changes are picked up by the next
    /// [`step`](Self::step) through the smoothers, so nothing happens here.
    pub fn parameter_changed(&mut self, _param: ParamIndex) {}

    /// The filter instance.
    pub fn filter(&self) -> &TangentsFilter {
        &self.filter
    }

    /// Mutable access to the filter instance.
    pub fn filter_mut(&mut self) -> &mut TangentsFilter {
        &mut self.filter
    }

    /// Process one block of `num_frames_by_4 × 4` frames in place.
    ///
    /// CV is read from the first frame of each connected CV bus. Reads and
    /// writes go through indices, so the input and output may be the same bus.
    pub fn step(&mut self, bus_frames: &mut [f32], num_frames_by_4: usize) {
        let num_frames = num_frames_by_4 * 4;
        let len = bus_frames.len();
        let p = &self.params;
        let input = bus_offset(p.get(ParamIndex::Input), num_frames, len);
        let output = bus_offset(p.get(ParamIndex::Output), num_frames, len);
        let cv_bus = |param| {
            bus_offset(p.get(param), num_frames, len).and_then(|s| bus_frames.get(s).copied())
        };
        let cv = BlockCv {
            cutoff: cv_bus(ParamIndex::CvCutoff),
            resonance: cv_bus(ParamIndex::CvResonance),
        };
        let combine = p.output_combine();

        self.filter.set_controls(p.controls());
        let snapshot = self.filter.prepare_block(cv);
        for i in 0..num_frames {
            let x = input.map_or(0.0, |s| bus_frames[s + i]);
            let y = self.filter.process_sample(&snapshot, x);
            if let Some(o) = output {
                combine.apply(&mut bus_frames[o + i], y);
            }
        }
        self.filter.finish_block();
    }

    /// Display snapshot. Reads parameters and meters only.
    pub fn draw(&self) -> Status {
        let c = self.params.controls();
        Status::new(
            self.filter.meters(),
            c.mode,
            c.model,
            c.oversample,
            c.cutoff_hz,
            c.resonance,
            c.agr,
        )
    }
}
