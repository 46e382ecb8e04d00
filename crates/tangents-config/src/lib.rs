//! Preset management for the Tangents filter.
//!
//! # Features
//!
//! - **Preset System**: Load and save filter presets from TOML files
//! - **Validation**: Range and spelling checks that report every problem at once
//! - **Factory Presets**: Built-in starting points
//! - **Overrides**: `key=value` strings applied on top of a preset
//!
//! # Example
//!
//! ```rust,no_run
//! use tangents_config::{Preset, get_factory_preset};
//! use tangents_core::TangentsFilter;
//!
//! let mut preset = get_factory_preset("acid").unwrap();
//! preset.filter.set("cutoff_hz", "650").unwrap();
//! preset.save("my_acid.toml").unwrap();
//!
//! let loaded = Preset::load("my_acid.toml").unwrap();
//! let mut filter = TangentsFilter::new(loaded.sample_rate as f32);
//! loaded.filter.apply_to(&mut filter).unwrap();
//! ```

mod error;
mod preset;

/// Preset and parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use preset::{FilterSettings, Preset};
pub use validation::{ValidationError, ValidationResult, validate_preset};
