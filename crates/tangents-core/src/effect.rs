//! Block processing seam.
//!
//! Everything that drives the filter (the host adapter, the offline engine,
//! the benchmarks) goes through [`Effect`]. One call is one control period:
//! smoothers and coefficients step once per call, so splitting a stream
//! differently only changes the smoothing trajectory. The trait is object
//! safe and none of its methods allocate.

/// Mono effect processed a block at a time.
///
/// ```rust
/// use tangents_core::Effect;
///
/// struct Invert;
///
/// impl Effect for Invert {
///     fn process_block_inplace(&mut self, buffer: &mut [f32]) {
///         buffer.iter_mut().for_each(|s| *s = -*s);
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut fx: Box<dyn Effect> = Box::new(Invert);
/// let mut out = [0.0; 3];
/// fx.process_block(&[0.25, -0.5, 1.0], &mut out);
/// assert_eq!(out, [-0.25, 0.5, -1.0]);
/// assert_eq!(fx.latency_samples(), 0);
/// ```
pub trait Effect {
    /// Run `buffer` through the effect, overwriting it.
    fn process_block_inplace(&mut self, buffer: &mut [f32]);

    /// Run `input` through the effect into `output`.
    ///
    /// Slices of unequal length are a caller bug; in release builds only the
    /// shorter length is processed.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len(), "block length mismatch");
        let n = input.len().min(output.len());
        let out = &mut output[..n];
        out.copy_from_slice(&input[..n]);
        self.process_block_inplace(out);
    }

    /// Host sample rate in Hz.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Silence all internal state. Controls keep their values.
    fn reset(&mut self);

    /// Delay the effect adds, in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}
