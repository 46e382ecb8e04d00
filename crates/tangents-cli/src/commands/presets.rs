//! Preset management commands.
//!
//! Provides commands to list, show and save filter presets.

use super::common::{apply_overrides, load_preset, parse_key_val};
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tangents_config::{Preset, factory_preset_names, get_factory_preset};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List the factory presets
    List,

    /// Show details of a preset
    Show {
        /// Factory preset name or path to a TOML file
        name: String,

        /// Print the preset as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Save a preset to a TOML file
    Save {
        /// Name for the new preset
        name: String,

        /// Destination file
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Start from this factory preset or preset file instead of the defaults
        #[arg(long)]
        from: Option<String>,

        /// Parameter overrides (e.g. "cutoff_hz=800", "mode=bandpass")
        #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
        param: Vec<(String, String)>,

        /// Description of the preset
        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite if the file already exists
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list_presets(),
        PresetsCommand::Show { name, toml } => show_preset(&name, toml),
        PresetsCommand::Save {
            name,
            path,
            from,
            param,
            description,
            force,
        } => save_preset(
            &name,
            &path,
            from.as_deref(),
            &param,
            description.as_deref(),
            force,
        ),
    }
}

fn list_presets() -> anyhow::Result<()> {
    println!("Factory Presets:");
    println!("================");
    for key in factory_preset_names() {
        let Some(preset) = get_factory_preset(key) else {
            continue;
        };
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:14} {:14} - {}", key, preset.name, desc);
    }
    println!();
    println!("Use 'tangents presets show <name>' for details.");
    Ok(())
}

fn show_preset(name: &str, as_toml: bool) -> anyhow::Result<()> {
    let preset = load_preset(name)?;

    if as_toml {
        print!("{}", preset.to_toml()?);
        return Ok(());
    }

    println!("{}", preset.name);
    println!("{}", "=".repeat(preset.name.len()));
    if let Some(desc) = &preset.description {
        println!("{desc}");
    }
    println!();

    let f = &preset.filter;
    println!("  Sample rate:         {} Hz", preset.sample_rate);
    println!("  Cutoff:              {} Hz", f.cutoff_hz);
    println!("  Resonance:           {}%", f.resonance);
    println!("  Mode:                {}", f.mode);
    println!("  Model:               {}", f.model);
    println!("  Oversample:          {}x", f.oversample);
    println!("  CV cutoff amount:    {}%", f.cv_cutoff_amount);
    println!("  CV resonance amount: {}%", f.cv_resonance_amount);
    println!("  Input AGR:           {}", f.agr);
    println!("  Drive:               {}%", f.drive);

    if let Err(e) = preset.validate() {
        println!();
        println!("  Warning: {e}");
    }
    Ok(())
}

fn save_preset(
    name: &str,
    path: &Path,
    from: Option<&str>,
    overrides: &[(String, String)],
    description: Option<&str>,
    force: bool,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    let mut preset = match from {
        Some(source) => load_preset(source)?,
        None => Preset::default(),
    };
    preset.name = name.to_string();
    if let Some(desc) = description {
        preset.description = Some(desc.to_string());
    }
    apply_overrides(&mut preset.filter, overrides)?;
    preset.validate()?;

    preset
        .save(path)
        .with_context(|| format!("saving preset to {}", path.display()))?;
    tracing::debug!(name, path = %path.display(), "preset saved");
    println!("Saved preset '{}' to {}", preset.name, path.display());
    Ok(())
}
