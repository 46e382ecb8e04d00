//! Preset and parameter validation.
//!
//! Every continuous preset key has a fixed range in preset units (Hz or
//! percent). Enumerated keys (`mode`, `model`, `oversample`) are checked
//! against their allowed spellings. Validation collects every problem it
//! finds instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use tangents_config::validation::{parse_param_value, validate_value};
//!
//! let hz = parse_param_value("cutoff_hz", "800Hz").unwrap();
//! assert_eq!(validate_value("cutoff_hz", hz), Ok(800.0));
//! assert!(validate_value("resonance", 120.0).is_err());
//! ```

use tangents_core::{FilterMode, Model, Oversample};
use thiserror::Error;

use crate::preset::{FilterSettings, Preset};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// Name of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Value is not one of the allowed choices.
    #[error("invalid value '{value}' for '{param}', expected one of: {expected}")]
    InvalidChoice {
        /// Name of the parameter.
        param: String,
        /// The rejected value.
        value: String,
        /// Allowed spellings.
        expected: &'static str,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Range of one continuous preset key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Preset key.
    pub key: &'static str,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
}

/// Continuous preset keys and their ranges, in preset units.
pub const CONTINUOUS_PARAMS: &[ParamRange] = &[
    ParamRange {
        key: "cutoff_hz",
        min: 20.0,
        max: 20000.0,
    },
    ParamRange {
        key: "resonance",
        min: 0.0,
        max: 100.0,
    },
    ParamRange {
        key: "cv_cutoff_amount",
        min: -100.0,
        max: 100.0,
    },
    ParamRange {
        key: "cv_resonance_amount",
        min: -100.0,
        max: 100.0,
    },
    ParamRange {
        key: "agr",
        min: 0.0,
        max: 100.0,
    },
    ParamRange {
        key: "drive",
        min: 0.0,
        max: 100.0,
    },
];

/// Accepted sample rate hints.
pub const SAMPLE_RATE_RANGE: (u32, u32) = (8000, 384_000);

const MODE_CHOICES: &str = "lowpass, bandpass, highpass, allpass";
const MODEL_CHOICES: &str = "yu, ms, xx";
const OVERSAMPLE_CHOICES: &str = "1, 2, 4, 8, 16";

const MODE_KEYS: [(&str, FilterMode); 4] = [
    ("lowpass", FilterMode::Lowpass),
    ("bandpass", FilterMode::Bandpass),
    ("highpass", FilterMode::Highpass),
    ("allpass", FilterMode::Allpass),
];

/// Normalize a parameter name for lookup: lowercase, spaces and dashes to
/// underscores.
pub fn normalize_param_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Range of a continuous key, if it is one.
pub fn param_range(key: &str) -> Option<&'static ParamRange> {
    let key = normalize_param_name(key);
    CONTINUOUS_PARAMS.iter().find(|p| p.key == key)
}

/// Parse a number, accepting `Hz`, `%` and `x` unit suffixes.
pub fn parse_param_value(param_name: &str, value_str: &str) -> ValidationResult<f32> {
    let s = value_str.trim();
    let number = s
        .strip_suffix("Hz")
        .or_else(|| s.strip_suffix("hz"))
        .or_else(|| s.strip_suffix('%'))
        .or_else(|| s.strip_suffix('x'))
        .unwrap_or(s)
        .trim();

    number
        .parse::<f32>()
        .map_err(|_| ValidationError::InvalidFormat {
            param: param_name.to_string(),
            reason: format!("cannot parse '{}' as number", s),
        })
}

/// Check a continuous value against its key's range.
pub fn validate_value(param: &str, value: f32) -> ValidationResult<f32> {
    let range = param_range(param)
        .ok_or_else(|| ValidationError::UnknownParameter(param.to_string()))?;

    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            param: range.key.to_string(),
            reason: "value must be finite".to_string(),
        });
    }
    if value < range.min || value > range.max {
        return Err(ValidationError::OutOfRange {
            param: range.key.to_string(),
            value,
            min: range.min,
            max: range.max,
        });
    }
    Ok(value)
}

/// Preset spelling of a mode.
pub fn mode_key(mode: FilterMode) -> &'static str {
    MODE_KEYS
        .iter()
        .find(|(_, m)| *m == mode)
        .map_or("lowpass", |(k, _)| k)
}

/// Preset spelling of a model.
pub fn model_key(model: Model) -> &'static str {
    match model {
        Model::Yu => "yu",
        Model::Ms => "ms",
        Model::Xx => "xx",
    }
}

/// Parse a mode from its preset key, display name or two-letter name.
pub fn parse_mode(value: &str) -> ValidationResult<FilterMode> {
    let v = value.trim();
    MODE_KEYS
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(v))
        .map(|(_, m)| *m)
        .or_else(|| FilterMode::from_name(v))
        .ok_or_else(|| ValidationError::InvalidChoice {
            param: "mode".to_string(),
            value: value.to_string(),
            expected: MODE_CHOICES,
        })
}

/// Parse a model name.
pub fn parse_model(value: &str) -> ValidationResult<Model> {
    Model::from_name(value.trim()).ok_or_else(|| ValidationError::InvalidChoice {
        param: "model".to_string(),
        value: value.to_string(),
        expected: MODEL_CHOICES,
    })
}

/// Look up an oversampling factor.
pub fn parse_oversample(factor: u32) -> ValidationResult<Oversample> {
    Oversample::from_factor(factor as usize).ok_or_else(|| ValidationError::InvalidChoice {
        param: "oversample".to_string(),
        value: factor.to_string(),
        expected: OVERSAMPLE_CHOICES,
    })
}

/// Validate every key of a `[filter]` table.
pub fn validate_filter(filter: &FilterSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();
    collect_filter_errors(filter, &mut errors);
    into_result(errors)
}

/// Validate a whole preset, reporting every problem found.
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let (min_rate, max_rate) = SAMPLE_RATE_RANGE;
    if !(min_rate..=max_rate).contains(&preset.sample_rate) {
        errors.push(ValidationError::OutOfRange {
            param: "sample_rate".to_string(),
            value: preset.sample_rate as f32,
            min: min_rate as f32,
            max: max_rate as f32,
        });
    }
    collect_filter_errors(&preset.filter, &mut errors);

    into_result(errors)
}

fn collect_filter_errors(filter: &FilterSettings, errors: &mut Vec<ValidationError>) {
    let continuous = [
        ("cutoff_hz", filter.cutoff_hz),
        ("resonance", filter.resonance),
        ("cv_cutoff_amount", filter.cv_cutoff_amount),
        ("cv_resonance_amount", filter.cv_resonance_amount),
        ("agr", filter.agr),
        ("drive", filter.drive),
    ];
    for (key, value) in continuous {
        if let Err(e) = validate_value(key, value) {
            errors.push(e);
        }
    }
    if let Err(e) = parse_mode(&filter.mode) {
        errors.push(e);
    }
    if let Err(e) = parse_model(&filter.model) {
        errors.push(e);
    }
    if let Err(e) = parse_oversample(filter.oversample) {
        errors.push(e);
    }
}

fn into_result(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_value_units() {
        assert_eq!(parse_param_value("cutoff_hz", "440"), Ok(440.0));
        assert_eq!(parse_param_value("cutoff_hz", "440Hz"), Ok(440.0));
        assert_eq!(parse_param_value("cutoff_hz", " 2000 hz "), Ok(2000.0));
        assert_eq!(parse_param_value("resonance", "85%"), Ok(85.0));
        assert_eq!(parse_param_value("oversample", "4x"), Ok(4.0));
        assert!(matches!(
            parse_param_value("drive", "loud"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_value_ranges() {
        assert_eq!(validate_value("resonance", 100.0), Ok(100.0));
        assert_eq!(validate_value("CV-Cutoff-Amount", -100.0), Ok(-100.0));
        assert!(matches!(
            validate_value("cutoff_hz", 5.0),
            Err(ValidationError::OutOfRange { min, .. }) if min == 20.0
        ));
        assert!(matches!(
            validate_value("agr", f32::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(
            validate_value("tone", 0.5),
            Err(ValidationError::UnknownParameter("tone".to_string()))
        );
    }

    #[test]
    fn test_mode_spellings() {
        assert_eq!(parse_mode("allpass"), Ok(FilterMode::Allpass));
        assert_eq!(parse_mode("All-pass"), Ok(FilterMode::Allpass));
        assert_eq!(parse_mode("BP"), Ok(FilterMode::Bandpass));
        assert_eq!(parse_mode("HIGHPASS"), Ok(FilterMode::Highpass));
        assert!(parse_mode("notch").is_err());
        for mode in FilterMode::ALL {
            assert_eq!(parse_mode(mode_key(mode)), Ok(mode));
        }
    }

    #[test]
    fn test_model_and_oversample() {
        assert_eq!(parse_model("ms"), Ok(Model::Ms));
        assert_eq!(parse_model("XX"), Ok(Model::Xx));
        assert!(parse_model("zz").is_err());
        for model in Model::ALL {
            assert_eq!(parse_model(model_key(model)), Ok(model));
        }
        assert_eq!(parse_oversample(8), Ok(Oversample::X8));
        assert!(parse_oversample(3).is_err());
        assert!(parse_oversample(32).is_err());
    }

    #[test]
    fn test_validate_filter_collects_all_errors() {
        let filter = FilterSettings {
            cutoff_hz: 50000.0,
            resonance: -1.0,
            mode: "notch".to_string(),
            ..FilterSettings::default()
        };
        match validate_filter(&filter) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let filter = FilterSettings {
            drive: 101.0,
            ..FilterSettings::default()
        };
        assert!(matches!(
            validate_filter(&filter),
            Err(ValidationError::OutOfRange { ref param, .. }) if param == "drive"
        ));
    }

    #[test]
    fn test_validate_preset_sample_rate() {
        let mut preset = Preset::new("Rate");
        assert!(validate_preset(&preset).is_ok());
        preset.sample_rate = 1000;
        assert!(validate_preset(&preset).is_err());
    }
}
