//! Parameter listing and WAV metadata command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tangents_core::host::{HOST_PARAMETERS, HostParameter};
use tangents_core::{ParamDescriptor, ParameterInfo, TangentsFilter};
use tangents_io::read_wav_info;

/// List filter parameters, or show WAV file information.
#[derive(Args)]
pub struct InfoArgs {
    /// WAV file to describe instead of listing parameters
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// One filter parameter as listed by `tangents info`.
#[derive(Debug, Serialize)]
struct ParamRow {
    index: usize,
    key: &'static str,
    name: &'static str,
    group: &'static str,
    unit: &'static str,
    min: f32,
    max: f32,
    default: f32,
    labels: &'static [&'static str],
}

impl ParamRow {
    fn new(index: usize, desc: &ParamDescriptor) -> Self {
        Self {
            index,
            key: desc.string_id,
            name: desc.name,
            group: desc.group,
            unit: desc.unit.suffix().trim(),
            min: desc.min,
            max: desc.max,
            default: desc.default,
            labels: desc.step_labels,
        }
    }

    fn default_text(&self, desc: &ParamDescriptor) -> String {
        match desc.step_label(self.default) {
            Some(label) => label.to_string(),
            None => format!("{}{}", self.default, desc.unit.suffix()),
        }
    }
}

/// One row of the module host's integer parameter table.
#[derive(Debug, Serialize)]
struct HostRow {
    index: usize,
    name: &'static str,
    kind: String,
    min: i32,
    max: i32,
    default: i32,
    display_divisor: i32,
    labels: &'static [&'static str],
}

impl HostRow {
    fn new(index: usize, param: &HostParameter) -> Self {
        Self {
            index,
            name: param.name,
            kind: format!("{:?}", param.kind),
            min: param.min,
            max: param.max,
            default: param.default,
            display_divisor: param.display_divisor,
            labels: param.labels,
        }
    }
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    match &args.file {
        Some(file) => show_wav(file, args.json),
        None => list_parameters(args.json),
    }
}

fn descriptors() -> Vec<ParamDescriptor> {
    let filter = TangentsFilter::new(48000.0);
    (0..filter.param_count())
        .filter_map(|i| filter.param_info(i))
        .collect()
}

fn list_parameters(json: bool) -> anyhow::Result<()> {
    let descs = descriptors();
    let params: Vec<ParamRow> = descs
        .iter()
        .enumerate()
        .map(|(i, d)| ParamRow::new(i, d))
        .collect();
    let host: Vec<HostRow> = HOST_PARAMETERS
        .iter()
        .enumerate()
        .map(|(i, p)| HostRow::new(i, p))
        .collect();

    if json {
        let json = serde_json::json!({
            "name": "Tangents",
            "parameters": params,
            "host_parameters": host,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("Tangents Parameters");
    println!("===================");
    println!();
    println!(
        "  {:20}  {:12}  {:>8}  {:>8}  {:12}  {}",
        "Key", "Name", "Min", "Max", "Default", "Choices"
    );
    println!(
        "  {:20}  {:12}  {:>8}  {:>8}  {:12}  {}",
        "---", "----", "---", "---", "-------", "-------"
    );
    for (row, desc) in params.iter().zip(&descs) {
        println!(
            "  {:20}  {:12}  {:>8}  {:>8}  {:12}  {}",
            row.key,
            row.name,
            row.min,
            row.max,
            row.default_text(desc),
            row.labels.join(", ")
        );
    }

    println!();
    println!("Host Parameters");
    println!("---------------");
    println!();
    for row in &host {
        let range = if row.labels.is_empty() {
            format!("{}..={}", row.min, row.max)
        } else {
            row.labels.join(" | ")
        };
        println!(
            "  {:2}  {:12}  {:12}  default {:5}  {}",
            row.index, row.name, row.kind, row.default, range
        );
    }

    println!();
    println!("Use 'tangents process in.wav out.wav --param <key>=<value>' to set a parameter.");
    Ok(())
}

fn show_wav(file: &Path, json: bool) -> anyhow::Result<()> {
    let info = read_wav_info(file)?;
    let file_size = std::fs::metadata(file)?.len();

    let format_str = info.format.label();

    if json {
        let json = serde_json::json!({
            "file": file.display().to_string(),
            "format": format_str,
            "bits_per_sample": info.bits_per_sample,
            "channels": info.channels,
            "sample_rate": info.sample_rate,
            "num_frames": info.num_frames,
            "duration_secs": info.duration_secs,
            "file_size": file_size,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("File:        {}", file.display());
    println!("Format:      {} {}-bit", format_str, info.bits_per_sample);
    println!("Channels:    {}", info.channels);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs, info.num_frames
    );
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_parameter_listed() {
        let descs = descriptors();
        assert_eq!(descs.len(), 9);
        let keys: Vec<_> = descs.iter().map(|d| d.string_id).collect();
        assert!(keys.contains(&"cutoff_hz"));
        assert!(keys.contains(&"oversample"));
    }

    #[test]
    fn test_selector_default_shows_label() {
        let descs = descriptors();
        let (i, mode) = descs
            .iter()
            .enumerate()
            .find(|(_, d)| d.string_id == "mode")
            .unwrap();
        assert_eq!(ParamRow::new(i, mode).default_text(mode), "Lowpass");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
