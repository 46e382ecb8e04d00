//! Audio file I/O and offline processing for the Tangents filter.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for loading/saving audio files
//! - **Offline processing**: [`ProcessingEngine`] drives the host adapter over a
//!   whole signal, block by block, with optional CV signals
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tangents_io::{read_wav, write_wav, CvInputs, ProcessingEngine};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//!
//! let mut engine = ProcessingEngine::new(spec.sample_rate as f32);
//! let processed = engine.process_file(&samples, CvInputs::NONE);
//!
//! write_wav("output.wav", &processed, spec)?;
//! ```

mod engine;
mod wav;

pub use engine::{CvInputs, DEFAULT_BLOCK_SIZE, ProcessingEngine};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Block size is zero or not a multiple of four.
    #[error("invalid block size {0}: must be a non-zero multiple of 4")]
    InvalidBlockSize(usize),

    /// The requested bit depth cannot be written.
    #[error("unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
