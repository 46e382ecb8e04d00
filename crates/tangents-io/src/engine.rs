//! Offline processing engine.
//!
//! Runs a whole signal through [`Algorithm::step`] the way a module host
//! would: one bus buffer, a fixed block size, CV sampled at the start of
//! every block.

use tangents_core::Effect;
use tangents_core::host::{Algorithm, HostParams, ParamIndex};

use crate::{Error, Result};

/// Block size used when none is given.
pub const DEFAULT_BLOCK_SIZE: usize = 128;

// Busses of the engine's private buffer.
const INPUT_BUS: i32 = 1;
const OUTPUT_BUS: i32 = 2;
const CV_CUTOFF_BUS: i32 = 3;
const CV_RESONANCE_BUS: i32 = 4;
const NUM_BUSSES: usize = 4;

/// Optional CV signals, one value per input sample.
///
/// A CV signal shorter than the input holds its last value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CvInputs<'a> {
    /// Cutoff CV.
    pub cutoff: Option<&'a [f32]>,
    /// Resonance CV.
    pub resonance: Option<&'a [f32]>,
}

impl CvInputs<'static> {
    /// No CV.
    pub const NONE: Self = CvInputs {
        cutoff: None,
        resonance: None,
    };
}

/// Drives one [`Algorithm`] over whole signals.
///
/// # Example
///
/// ```rust
/// use tangents_io::{CvInputs, ProcessingEngine};
///
/// let mut engine = ProcessingEngine::new(48000.0);
/// let input = vec![0.25_f32; 1000];
/// let output = engine.process_file(&input, CvInputs::NONE);
/// assert_eq!(output.len(), input.len());
/// ```
#[derive(Debug, Clone)]
pub struct ProcessingEngine {
    algorithm: Algorithm,
    sample_rate: f32,
    block_size: usize,
    busses: Vec<f32>,
}

impl ProcessingEngine {
    /// Create an engine with default parameters and block size.
    pub fn new(sample_rate: f32) -> Self {
        let mut engine = Self {
            algorithm: Algorithm::construct(sample_rate),
            sample_rate,
            block_size: DEFAULT_BLOCK_SIZE,
            busses: vec![0.0; DEFAULT_BLOCK_SIZE * NUM_BUSSES],
        };
        engine.route(CvInputs::NONE);
        engine
    }

    /// Create an engine and load `params`. Bus assignments in `params` are
    /// ignored; the engine routes its own busses.
    pub fn with_params(sample_rate: f32, params: &HostParams) -> Self {
        let mut engine = Self::new(sample_rate);
        engine.set_params(params);
        // smoothers start at the loaded values
        let controls = engine.algorithm.params().controls();
        let filter = engine.algorithm.filter_mut();
        filter.set_controls(controls);
        filter.reset();
        engine
    }

    /// Sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Change the block size. It must be a non-zero multiple of 4.
    pub fn set_block_size(&mut self, block_size: usize) -> Result<()> {
        if block_size == 0 || block_size % 4 != 0 {
            return Err(Error::InvalidBlockSize(block_size));
        }
        self.block_size = block_size;
        self.busses = vec![0.0; block_size * NUM_BUSSES];
        tracing::debug!(block_size, "engine block size set");
        Ok(())
    }

    /// Load every non-bus parameter from `params`.
    pub fn set_params(&mut self, params: &HostParams) {
        for param in ParamIndex::ALL {
            if !is_routing(param) {
                self.algorithm.set_param(param, params.get(param));
            }
        }
    }

    /// The host adapter.
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Mutable access to the host adapter.
    pub fn algorithm_mut(&mut self) -> &mut Algorithm {
        &mut self.algorithm
    }

    /// Process `input` and return a signal of the same length.
    ///
    /// The last block is padded with silence; padded frames are dropped from
    /// the output.
    pub fn process_file(&mut self, input: &[f32], cv: CvInputs<'_>) -> Vec<f32> {
        self.process_file_with_progress(input, cv, |_| {})
    }

    /// [`process_file`](Self::process_file) with a callback receiving the
    /// number of frames processed so far after each block.
    pub fn process_file_with_progress(
        &mut self,
        input: &[f32],
        cv: CvInputs<'_>,
        mut progress: impl FnMut(usize),
    ) -> Vec<f32> {
        self.route(cv);
        tracing::info!(
            frames = input.len(),
            block_size = self.block_size,
            cv_cutoff = cv.cutoff.is_some(),
            cv_resonance = cv.resonance.is_some(),
            "processing"
        );

        let n = self.block_size;
        let mut output = Vec::with_capacity(input.len());

        for (block, chunk) in input.chunks(n).enumerate() {
            let start = block * n;
            let (inp, rest) = self.busses.split_at_mut(n);
            inp[..chunk.len()].copy_from_slice(chunk);
            inp[chunk.len()..].fill(0.0);

            let (_, cv_busses) = rest.split_at_mut(n);
            let (cv_cut, cv_res) = cv_busses.split_at_mut(n);
            fill_cv(cv_cut, cv.cutoff, start);
            fill_cv(cv_res, cv.resonance, start);

            self.algorithm.step(&mut self.busses, n / 4);

            let out_start = (OUTPUT_BUS as usize - 1) * n;
            output.extend_from_slice(&self.busses[out_start..out_start + chunk.len()]);
            progress(start + chunk.len());
        }

        output
    }

    fn route(&mut self, cv: CvInputs<'_>) {
        let alg = &mut self.algorithm;
        alg.set_param(ParamIndex::Input, INPUT_BUS);
        alg.set_param(ParamIndex::Output, OUTPUT_BUS);
        alg.set_param(ParamIndex::OutputMode, 1);
        alg.set_param(
            ParamIndex::CvCutoff,
            if cv.cutoff.is_some() { CV_CUTOFF_BUS } else { 0 },
        );
        alg.set_param(
            ParamIndex::CvResonance,
            if cv.resonance.is_some() { CV_RESONANCE_BUS } else { 0 },
        );
    }
}

impl Default for ProcessingEngine {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

fn is_routing(param: ParamIndex) -> bool {
    matches!(
        param,
        ParamIndex::Input
            | ParamIndex::Output
            | ParamIndex::OutputMode
            | ParamIndex::CvCutoff
            | ParamIndex::CvResonance
    )
}

/// Copy the CV frames for a block starting at `start`, holding the last
/// value past the end of the signal.
fn fill_cv(bus: &mut [f32], signal: Option<&[f32]>, start: usize) {
    let Some(signal) = signal else {
        bus.fill(0.0);
        return;
    };
    let last = signal.last().copied().unwrap_or(0.0);
    for (i, slot) in bus.iter_mut().enumerate() {
        *slot = signal.get(start + i).copied().unwrap_or(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangents_core::{BlockCv, OutputCombine, TangentsFilter};

    #[test]
    fn test_block_size_must_be_multiple_of_four() {
        let mut engine = ProcessingEngine::new(48000.0);
        assert!(matches!(
            engine.set_block_size(0),
            Err(Error::InvalidBlockSize(0))
        ));
        assert!(engine.set_block_size(30).is_err());
        assert!(engine.set_block_size(64).is_ok());
        assert_eq!(engine.block_size(), 64);
    }

    #[test]
    fn test_output_length_matches_input() {
        let mut engine = ProcessingEngine::new(48000.0);
        for len in [0, 1, 127, 128, 129, 1000] {
            let input = vec![0.1; len];
            assert_eq!(engine.process_file(&input, CvInputs::NONE).len(), len);
        }
    }

    #[test]
    fn test_matches_direct_filter() {
        let input: Vec<f32> = (0..640).map(|i| ((i as f32) * 0.07).sin() * 0.6).collect();
        let mut engine = ProcessingEngine::new(48000.0);
        let out = engine.process_file(&input, CvInputs::NONE);

        let mut filter = TangentsFilter::new(48000.0);
        let mut expected = vec![0.0; input.len()];
        for (i, o) in input.chunks(128).zip(expected.chunks_mut(128)) {
            filter.process_block_with(i, o, BlockCv::NONE, OutputCombine::Replace);
        }
        assert_eq!(out, expected);
    }

    #[test]
    fn test_cv_is_sampled_per_block() {
        let input = vec![0.0; 256];
        let cv = vec![0.2; 256];
        let mut engine = ProcessingEngine::new(48000.0);
        engine.process_file(
            &input,
            CvInputs {
                cutoff: Some(&cv),
                resonance: None,
            },
        );
        // two blocks toward 2000 Hz: 1000 -> 1100 -> 1190
        let cutoff = engine.algorithm().filter().smoothed().cutoff.get();
        assert!((cutoff - 1190.0).abs() < 0.01, "cutoff {cutoff}");
    }

    #[test]
    fn test_short_cv_holds_last_value() {
        let mut bus = [0.0; 4];
        fill_cv(&mut bus, Some(&[0.1, 0.2, 0.3]), 2);
        assert_eq!(bus, [0.3, 0.3, 0.3, 0.3]);
        fill_cv(&mut bus, Some(&[0.1, 0.2, 0.3]), 0);
        assert_eq!(bus, [0.1, 0.2, 0.3, 0.3]);
        fill_cv(&mut bus, None, 0);
        assert_eq!(bus, [0.0; 4]);
    }

    #[test]
    fn test_progress_reports_frames() {
        let mut engine = ProcessingEngine::new(48000.0);
        let mut seen = Vec::new();
        engine.process_file_with_progress(&[0.0; 300], CvInputs::NONE, |n| seen.push(n));
        assert_eq!(seen, vec![128, 256, 300]);
    }
}
