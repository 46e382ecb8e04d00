//! Integration tests for tangents-io: WAV round trips and offline processing.

use tangents_core::host::{HostParams, ParamIndex};
use tangents_io::{
    CvInputs, Error, ProcessingEngine, WavFormat, WavSpec, read_wav, read_wav_info, write_wav,
};
use tempfile::NamedTempFile;

fn sine_wave(sample_rate: u32, freq_hz: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin())
        .collect()
}

#[test]
fn wav_roundtrip_pcm24() {
    let sr = 44100;
    let samples: Vec<f32> = sine_wave(sr, 440.0, 4410).iter().map(|s| s * 0.8).collect();
    let spec = WavSpec {
        channels: 1,
        sample_rate: sr,
        bits_per_sample: 24,
    };

    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, spec).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.format, WavFormat::Pcm);
    assert_eq!(info.bits_per_sample, 24);
    assert_eq!(info.num_frames, 4410);
    assert!((info.duration_secs - 0.1).abs() < 1e-9);

    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec, spec);
    for (a, b) in samples.iter().zip(&loaded) {
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }
}

#[test]
fn missing_file_is_wav_error() {
    let result = read_wav("/nonexistent/path/to/file.wav");
    assert!(matches!(result, Err(Error::Wav(_))));
}

#[test]
fn process_file_then_write() {
    let sr = 48000;
    let input = sine_wave(sr, 220.0, 4800);
    let mut params = HostParams::new();
    params.set(ParamIndex::Resonance, 700);
    params.set(ParamIndex::Model, 1);
    params.set(ParamIndex::Cutoff, 600);
    let mut engine = ProcessingEngine::with_params(sr as f32, &params);
    engine.set_block_size(64).unwrap();

    let output = engine.process_file(&input, CvInputs::NONE);
    assert_eq!(output.len(), input.len());
    assert!(output.iter().all(|s| s.is_finite() && (-0.5..=1.0).contains(s)));
    assert!(engine.algorithm().filter().meters().output.level() > 0.0);

    let file = NamedTempFile::new().unwrap();
    write_wav(
        file.path(),
        &output,
        WavSpec {
            sample_rate: sr,
            ..WavSpec::default()
        },
    )
    .unwrap();
    let (loaded, _) = read_wav(file.path()).unwrap();
    assert_eq!(loaded, output);
}

#[test]
fn with_params_starts_settled() {
    let mut params = HostParams::new();
    params.set(ParamIndex::Cutoff, 5000);
    params.set(ParamIndex::Output, 7);
    let engine = ProcessingEngine::with_params(48000.0, &params);

    let alg = engine.algorithm();
    assert_eq!(alg.filter().smoothed().cutoff.get(), 5000.0);
    // routing stays with the engine
    assert_eq!(alg.params().get(ParamIndex::Output), 2);
    assert_eq!(alg.params().get(ParamIndex::Cutoff), 5000);
}

#[test]
fn resonance_cv_changes_output() {
    let input = sine_wave(48000, 300.0, 8192);
    let cv = vec![1.0; 8192];

    let mut plain = ProcessingEngine::new(48000.0);
    let a = plain.process_file(&input, CvInputs::NONE);

    let mut modulated = ProcessingEngine::new(48000.0);
    let b = modulated.process_file(
        &input,
        CvInputs {
            cutoff: None,
            resonance: Some(&cv),
        },
    );

    assert_ne!(a, b);
    let res = modulated.algorithm().filter().smoothed().resonance.get();
    assert!(res > 0.49 && res <= 0.5, "resonance {res}");
}
