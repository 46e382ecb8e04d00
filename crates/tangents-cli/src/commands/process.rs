//! File-based filter processing command.

use super::common::{
    apply_overrides, linear_to_db, meter_bar, parse_bit_depth, parse_key_val, peak, rms,
};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tangents_config::{Preset, get_factory_preset};
use tangents_core::Status;
use tangents_io::{CvInputs, DEFAULT_BLOCK_SIZE, ProcessingEngine, WavSpec, read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset file (TOML)
    #[arg(short, long, conflicts_with = "factory")]
    preset: Option<PathBuf>,

    /// Factory preset name (e.g. "acid")
    #[arg(short, long)]
    factory: Option<String>,

    /// Parameter overrides (e.g. "cutoff_hz=800", "mode=bandpass")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// WAV file driving the cutoff CV input
    #[arg(long, value_name = "CV")]
    cv_cutoff: Option<PathBuf>,

    /// WAV file driving the resonance CV input
    #[arg(long, value_name = "CV")]
    cv_resonance: Option<PathBuf>,

    /// Processing block size (a multiple of 4)
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (samples, spec) =
        read_wav(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} samples, {} Hz, {:.2}s",
        samples.len(),
        spec.sample_rate,
        samples.len() as f32 / sample_rate
    );

    let mut preset = if let Some(path) = &args.preset {
        Preset::load(path).with_context(|| format!("loading preset {}", path.display()))?
    } else if let Some(name) = &args.factory {
        get_factory_preset(name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown factory preset '{name}'. Use 'tangents presets list' to see available presets."
            )
        })?
    } else {
        Preset::default()
    };
    apply_overrides(&mut preset.filter, &args.param)?;
    preset.validate()?;

    if preset.sample_rate != spec.sample_rate {
        tracing::warn!(
            preset_rate = preset.sample_rate,
            file_rate = spec.sample_rate,
            "preset sample rate differs from input; processing at the input rate"
        );
    }
    println!("Preset: {}", preset.name);

    let params = preset.filter.host_params()?;
    let mut engine = ProcessingEngine::with_params(sample_rate, &params);
    engine.set_block_size(args.block_size)?;

    let cv_cutoff = load_cv(args.cv_cutoff.as_deref(), &spec, samples.len())?;
    let cv_resonance = load_cv(args.cv_resonance.as_deref(), &spec, samples.len())?;
    let cv = CvInputs {
        cutoff: cv_cutoff.as_deref(),
        resonance: cv_resonance.as_deref(),
    };

    println!(
        "Processing: {} {} {}x, block size {}...",
        preset.filter.mode,
        preset.filter.model,
        preset.filter.oversample,
        engine.block_size()
    );

    let pb = ProgressBar::new(samples.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let output = engine.process_file_with_progress(&samples, cv, |done| {
        pb.set_position(done as u64);
    });

    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&samples)),
        linear_to_db(peak(&samples))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output)),
        linear_to_db(peak(&output))
    );

    print_meters(&engine.algorithm().draw());

    println!("\nWriting {}...", args.output.display());
    let out_spec = WavSpec::mono(spec.sample_rate, args.bit_depth);
    write_wav(&args.output, &output, out_spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Read a CV file, warning when it does not line up with the input.
fn load_cv(
    path: Option<&Path>,
    input: &WavSpec,
    frames: usize,
) -> anyhow::Result<Option<Vec<f32>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let (cv, spec) = read_wav(path).with_context(|| format!("reading CV {}", path.display()))?;

    if spec.sample_rate != input.sample_rate {
        tracing::warn!(
            path = %path.display(),
            cv_rate = spec.sample_rate,
            input_rate = input.sample_rate,
            "CV sample rate differs from input; frames are used as-is"
        );
    }
    if cv.len() < frames {
        tracing::warn!(
            path = %path.display(),
            cv_frames = cv.len(),
            input_frames = frames,
            "CV is shorter than input; holding its last value"
        );
    }
    Ok(Some(cv))
}

fn print_meters(status: &Status) {
    println!("\nMeters:");
    println!(
        "  In  {} {:.1} dB",
        meter_bar(status.input_bar()),
        linear_to_db(status.input_level)
    );
    println!(
        "  Out {} {:.1} dB",
        meter_bar(status.output_bar()),
        linear_to_db(status.output_level)
    );
    println!(
        "  {} / {} / {}x / {:.0} Hz / Res {:.1}% / AGR {:.1} ({})",
        status.mode.short_name(),
        status.model.name(),
        status.oversample.factor(),
        status.cutoff_hz,
        status.resonance_pct,
        status.agr,
        status.agr_zone.label()
    );
}
