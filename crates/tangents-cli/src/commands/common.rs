//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use std::path::Path;
use tangents_config::{FilterSettings, Preset, get_factory_preset};
use tangents_core::display::METER_BAR_CELLS;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{s}' (expected key=value)"
        ));
    }
    Ok((parts[0].trim().to_string(), parts[1].trim().to_string()))
}

/// Parse an output bit depth (16, 24 or 32).
pub fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("unsupported bit depth '{s}' (expected 16, 24 or 32)")),
    }
}

/// Load a preset by name or path.
///
/// Searches in this order:
/// 1. Factory presets (by internal or display name)
/// 2. File path (if it points at an existing TOML file)
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        return Preset::load(path).with_context(|| format!("loading preset {}", path.display()));
    }

    anyhow::bail!(
        "Preset '{name}' not found. Use 'tangents presets list' to see available presets."
    )
}

/// Apply `key=value` overrides on top of `settings`.
pub fn apply_overrides(
    settings: &mut FilterSettings,
    overrides: &[(String, String)],
) -> anyhow::Result<()> {
    for (key, value) in overrides {
        settings
            .set(key, value)
            .with_context(|| format!("invalid --param {key}={value}"))?;
    }
    Ok(())
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

/// Render a level bar `cells` wide out of [`METER_BAR_CELLS`].
pub fn meter_bar(cells: u32) -> String {
    let filled = cells.min(METER_BAR_CELLS) as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(METER_BAR_CELLS as usize - filled)
    )
}
