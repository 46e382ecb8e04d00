//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tangents_core::host::{HostParams, ParamIndex};
use tangents_core::{Controls, TangentsFilter, drive_gain};

use crate::error::ConfigError;
use crate::validation::{
    ValidationError, ValidationResult, model_key, mode_key, normalize_param_name,
    parse_mode, parse_model, parse_oversample, parse_param_value, validate_filter,
    validate_preset, validate_value,
};

/// A saved filter setting.
///
/// Presets are stored as TOML files with a top-level header and a single
/// `[filter]` table. Continuous values use preset units: Hz for the cutoff,
/// percent for everything else.
///
/// # TOML Format
///
/// ```toml
/// name = "Acid"
/// description = "Squelchy bandpass"
/// sample_rate = 48000
///
/// [filter]
/// cutoff_hz = 800.0
/// resonance = 85.0
/// mode = "bandpass"
/// model = "ms"
/// oversample = 4
/// agr = 60.0
/// drive = 30.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Filter settings. Missing keys take their power-on values.
    #[serde(default)]
    pub filter: FilterSettings,
}

fn default_sample_rate() -> u32 {
    48000
}

/// The `[filter]` table of a preset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FilterSettings {
    /// Cutoff in Hz (20–20000).
    pub cutoff_hz: f32,
    /// Resonance in percent.
    pub resonance: f32,
    /// `lowpass`, `bandpass`, `highpass` or `allpass`.
    pub mode: String,
    /// `yu`, `ms` or `xx`.
    pub model: String,
    /// Oversampling factor: 1, 2, 4, 8 or 16.
    pub oversample: u32,
    /// Cutoff CV depth in percent (−100–100).
    pub cv_cutoff_amount: f32,
    /// Resonance CV depth in percent (−100–100).
    pub cv_resonance_amount: f32,
    /// Input AGR (0–100, 50 is unity).
    pub agr: f32,
    /// Drive in percent.
    pub drive: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::from_controls(&Controls::new())
    }
}

impl FilterSettings {
    /// Express engine controls in preset units.
    pub fn from_controls(controls: &Controls) -> Self {
        Self {
            cutoff_hz: controls.cutoff_hz,
            resonance: controls.resonance * 100.0,
            mode: mode_key(controls.mode).to_string(),
            model: model_key(controls.model).to_string(),
            oversample: controls.oversample.factor() as u32,
            cv_cutoff_amount: controls.cv_cutoff_amount * 100.0,
            cv_resonance_amount: controls.cv_resonance_amount * 100.0,
            agr: controls.agr,
            drive: (controls.drive - 1.0) * 25.0,
        }
    }

    /// Validate and convert to engine controls.
    pub fn controls(&self) -> ValidationResult<Controls> {
        validate_filter(self)?;
        Ok(Controls {
            cutoff_hz: self.cutoff_hz,
            resonance: self.resonance / 100.0,
            mode: parse_mode(&self.mode)?,
            model: parse_model(&self.model)?,
            oversample: parse_oversample(self.oversample)?,
            cv_cutoff_amount: self.cv_cutoff_amount / 100.0,
            cv_resonance_amount: self.cv_resonance_amount / 100.0,
            agr: self.agr,
            drive: drive_gain(self.drive),
        })
    }

    /// Validate and convert to raw host parameter values. Bus assignments keep
    /// their table defaults.
    pub fn host_params(&self) -> ValidationResult<HostParams> {
        let c = self.controls()?;
        let mut params = HostParams::new();
        params.set(ParamIndex::Cutoff, self.cutoff_hz.round() as i32);
        params.set(ParamIndex::Resonance, (self.resonance * 10.0).round() as i32);
        params.set(ParamIndex::Mode, c.mode.index());
        params.set(ParamIndex::Model, c.model.index());
        params.set(ParamIndex::Oversample, c.oversample.index());
        params.set(
            ParamIndex::CvCutoffAmount,
            (self.cv_cutoff_amount * 10.0).round() as i32,
        );
        params.set(
            ParamIndex::CvResonanceAmount,
            (self.cv_resonance_amount * 10.0).round() as i32,
        );
        params.set(ParamIndex::InputAgr, (self.agr * 10.0).round() as i32);
        params.set(ParamIndex::Drive, (self.drive * 10.0).round() as i32);
        Ok(params)
    }

    /// Load these settings into a filter instance.
    pub fn apply_to(&self, filter: &mut TangentsFilter) -> ValidationResult<()> {
        filter.set_controls(self.controls()?);
        Ok(())
    }

    /// Set one key from a string, as given on a command line.
    ///
    /// Keys are matched after normalization, so `"CV Cutoff Amount"` and
    /// `cv-cutoff-amount` both work. `cutoff` is accepted for `cutoff_hz`.
    pub fn set(&mut self, key: &str, value: &str) -> ValidationResult<()> {
        let key = normalize_param_name(key);
        match key.as_str() {
            "mode" => self.mode = mode_key(parse_mode(value)?).to_string(),
            "model" => self.model = model_key(parse_model(value)?).to_string(),
            "oversample" => {
                let factor = parse_param_value(&key, value)?;
                if factor.fract() != 0.0 || factor < 0.0 {
                    return Err(ValidationError::InvalidFormat {
                        param: key,
                        reason: format!("'{}' is not a whole factor", value),
                    });
                }
                self.oversample = parse_oversample(factor as u32)?.factor() as u32;
            }
            _ => {
                let key = if key == "cutoff" { "cutoff_hz" } else { key.as_str() };
                let v = validate_value(key, parse_param_value(key, value)?)?;
                match key {
                    "cutoff_hz" => self.cutoff_hz = v,
                    "resonance" => self.resonance = v,
                    "cv_cutoff_amount" => self.cv_cutoff_amount = v,
                    "cv_resonance_amount" => self.cv_resonance_amount = v,
                    "agr" => self.agr = v,
                    "drive" => self.drive = v,
                    _ => return Err(ValidationError::UnknownParameter(key.to_string())),
                }
            }
        }
        Ok(())
    }
}

impl Preset {
    /// Create a preset with power-on settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: 48000,
            filter: FilterSettings::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace the filter settings.
    pub fn with_filter(mut self, filter: FilterSettings) -> Self {
        self.filter = filter;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value, reporting all problems at once.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_preset(self)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tangents_core::{FilterMode, Model, Oversample};

    #[test]
    fn test_preset_new() {
        let preset = Preset::new("Test Preset");
        assert_eq!(preset.name, "Test Preset");
        assert!(preset.description.is_none());
        assert_eq!(preset.sample_rate, 48000);
        assert_eq!(preset.filter, FilterSettings::default());
    }

    #[test]
    fn test_default_settings_match_power_on() {
        let f = FilterSettings::default();
        assert_eq!(f.cutoff_hz, 1000.0);
        assert_eq!(f.resonance, 0.0);
        assert_eq!(f.mode, "lowpass");
        assert_eq!(f.model, "yu");
        assert_eq!(f.oversample, 2);
        assert_eq!(f.cv_cutoff_amount, 100.0);
        assert_eq!(f.agr, 50.0);
        assert_eq!(f.drive, 0.0);
        assert_eq!(f.controls().unwrap(), Controls::new());
    }

    #[test]
    fn test_preset_from_toml() {
        let toml = r#"
name = "Acid"
description = "Squelchy bandpass"
sample_rate = 44100

[filter]
cutoff_hz = 800.0
resonance = 85.0
mode = "bandpass"
model = "ms"
oversample = 4
drive = 30.0
"#;
        let preset = Preset::from_toml(toml).unwrap();
        assert_eq!(preset.name, "Acid");
        assert_eq!(preset.sample_rate, 44100);
        assert_eq!(preset.filter.cutoff_hz, 800.0);
        // missing keys take defaults
        assert_eq!(preset.filter.agr, 50.0);

        let c = preset.filter.controls().unwrap();
        assert_eq!(c.mode, FilterMode::Bandpass);
        assert_eq!(c.model, Model::Ms);
        assert_eq!(c.oversample, Oversample::X4);
        assert!((c.resonance - 0.85).abs() < 1e-6);
        assert!((c.drive - 2.2).abs() < 1e-6);
    }

    #[test]
    fn test_minimal_toml() {
        let preset = Preset::from_toml("name = \"Minimal\"\n").unwrap();
        assert_eq!(preset.name, "Minimal");
        assert_eq!(preset.sample_rate, 48000);
        assert_eq!(preset.filter, FilterSettings::default());
    }

    #[test]
    fn test_unknown_filter_key_is_rejected() {
        let toml = "name = \"Typo\"\n[filter]\ncutof_hz = 100.0\n";
        assert!(matches!(
            Preset::from_toml(toml),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_preset_roundtrip() {
        let mut filter = FilterSettings::default();
        filter.set("mode", "highpass").unwrap();
        filter.set("resonance", "42").unwrap();
        let original = Preset::new("Roundtrip")
            .with_description("Testing serialization")
            .with_sample_rate(96000)
            .with_filter(filter);

        let toml = original.to_toml().unwrap();
        assert!(toml.contains("mode = \"highpass\""));
        let parsed = Preset::from_toml(&toml).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_set_overrides() {
        let mut f = FilterSettings::default();
        f.set("cutoff", "440Hz").unwrap();
        f.set("CV Cutoff Amount", "-50%").unwrap();
        f.set("mode", "AP").unwrap();
        f.set("model", "XX").unwrap();
        f.set("oversample", "16x").unwrap();
        assert_eq!(f.cutoff_hz, 440.0);
        assert_eq!(f.cv_cutoff_amount, -50.0);
        assert_eq!(f.mode, "allpass");
        assert_eq!(f.model, "xx");
        assert_eq!(f.oversample, 16);

        assert!(f.set("resonance", "150").is_err());
        assert!(f.set("oversample", "2.5").is_err());
        assert!(f.set("oversample", "3").is_err());
        assert_eq!(
            f.set("tone", "1"),
            Err(ValidationError::UnknownParameter("tone".to_string()))
        );
        // failed overrides leave the settings untouched
        assert_eq!(f.oversample, 16);
    }

    #[test]
    fn test_host_params_conversion() {
        let mut f = FilterSettings::default();
        f.set("resonance", "85").unwrap();
        f.set("drive", "30").unwrap();
        f.set("agr", "60").unwrap();
        f.set("oversample", "4").unwrap();
        f.set("mode", "bandpass").unwrap();
        let p = f.host_params().unwrap();
        assert_eq!(p.get(ParamIndex::Resonance), 850);
        assert_eq!(p.get(ParamIndex::Drive), 300);
        assert_eq!(p.get(ParamIndex::InputAgr), 600);
        assert_eq!(p.get(ParamIndex::Oversample), 2);
        assert_eq!(p.get(ParamIndex::Mode), 1);
        assert_eq!(p.get(ParamIndex::Input), 1);

        let c = p.controls();
        assert_eq!(c.drive, 2.2);
        assert_eq!(c.agr, 60.0);
    }

    #[test]
    fn test_apply_to_filter() {
        let mut filter = TangentsFilter::new(48000.0);
        let mut f = FilterSettings::default();
        f.set("cutoff_hz", "2500").unwrap();
        f.apply_to(&mut filter).unwrap();
        assert_eq!(filter.controls().cutoff_hz, 2500.0);

        f.cutoff_hz = 1.0;
        assert!(f.apply_to(&mut filter).is_err());
        assert_eq!(filter.controls().cutoff_hz, 2500.0);
    }

    #[test]
    fn test_validate_reports_bad_values() {
        let mut preset = Preset::new("Bad");
        preset.filter.model = "qq".to_string();
        assert!(preset.validate().is_err());
    }
}
