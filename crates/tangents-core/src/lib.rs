//! Tangents Core - Steiner-Parker multimode filter
//!
//! A nonlinear trapezoidal state variable filter with three saturation
//! models, internal oversampling and block-rate control smoothing, built to
//! run inside a fixed-size real-time audio callback with no allocation.
//!
//! # Signal Flow
//!
//! ```text
//! controls ─► block smoothers ─► CV ─► coefficients @ rate × N      (per block)
//!
//! input ─► AGR × drive ─► [saturate ─► TPT step] × N ─► average      (per sample)
//!                                      ─► output saturation ─► meters
//! ```
//!
//! # Core Abstractions
//!
//! - [`TangentsFilter`] - One filter instance: controls, smoothers, state, meters
//! - [`host::Algorithm`] - Host adapter over raw integer parameters and a bus buffer
//! - [`Effect`] - Object-safe block processing trait
//! - [`ParameterInfo`] - Parameter introspection in engineering units
//!
//! ## Building Blocks
//!
//! - [`SvfCoefficients`], [`FilterState`] - Coefficient calculator and TPT step
//! - [`OversampledCore`] - Oversampled saturate/integrate loop with mode mixing
//! - [`Model`] - YU / MS / XX saturation character
//! - [`FilterMode`] - LP / BP / HP / AP output selection
//! - [`BlockSmoothedParam`] - One-pole smoother advanced once per block
//! - [`XorShift32`] - Deterministic noise for the AGR randomizer
//! - [`LevelMeter`] - Decaying block-peak meter
//!
//! ## Utilities
//!
//! - Saturation: [`fast_tanh`], [`diode_clip`], [`aggressive_sat`]
//! - Guards: [`sanitize`], [`soft_clamp`]
//! - Display: [`Status`], [`response_magnitude`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tangents-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tangents_core::{Effect, FilterMode, Model, TangentsFilter};
//!
//! let mut filter = TangentsFilter::new(48000.0);
//! filter.set_cutoff_hz(800.0);
//! filter.set_resonance(0.85);
//! filter.set_mode(FilterMode::Bandpass);
//! filter.set_model(Model::Ms);
//!
//! let input = [0.5_f32; 128];
//! let mut output = [0.0_f32; 128];
//! filter.process_block(&input, &mut output);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or panics in the audio path
//! - **Sanitized, not fallible**: Non-finite values are zeroed, ranges clamped
//! - **Two-phase blocks**: Block-rate snapshot, then a per-sample loop

#![cfg_attr(not(feature = "std"), no_std)]

pub mod agr;
pub mod display;
pub mod effect;
pub mod filter;
pub mod host;
pub mod math;
pub mod meter;
pub mod model;
pub mod oversample;
pub mod param;
pub mod param_info;
pub mod random;
pub mod svf;

// Re-export main types at crate root
pub use agr::{AgrZone, agr_gain, drive_gain};
pub use display::{Status, response_magnitude};
pub use effect::Effect;
pub use filter::{BlockCv, BlockSnapshot, Controls, OutputCombine, TangentsFilter};
pub use host::{Algorithm, HostParams, ParamIndex};
pub use math::{aggressive_sat, diode_clip, fast_tanh, sanitize, soft_clamp};
pub use meter::{LevelMeter, LevelMeters};
pub use model::Model;
pub use oversample::{MAX_OVERSAMPLE_FACTOR, Oversample, OversampledCore};
pub use param::{BlockSmoothedParam, SmoothedParameters};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use random::XorShift32;
pub use svf::{FilterMode, FilterState, SvfCoefficients};
