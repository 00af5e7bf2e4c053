//! Full render runs against real synthesized audio.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn write_staircase_wav(path: &Path, detune: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    let amplitudes = [0.05, 0.1, 0.4, 0.8];
    for second in 0..30 {
        let section = match second {
            0..=7 => 0,
            8..=14 => 1,
            15..=22 => 2,
            _ => 3,
        };
        for i in 0..8000u32 {
            let phase = 2.0 * std::f64::consts::PI * (220.0 + detune) * f64::from(i) / 8000.0;
            let value = amplitudes[section] * phase.sin() * 30_000.0;
            writer.write_sample(value as i16).expect("write sample");
        }
    }
    writer.finalize().expect("finalize");
}

#[test]
fn renders_a_mix_at_the_source_sample_rate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.wav");
    let output = dir.path().join("mix.wav");
    write_staircase_wav(&first, 0.0);
    write_staircase_wav(&second, 5.0);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&first)
        .arg(&second)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let reader = hound::WavReader::open(&output).expect("open mix");
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 8000);
    assert_eq!(spec.channels, 1);
    // Somewhere between one track and the straight concatenation,
    // depending on whether a crossfade was found.
    let len = reader.len() as usize;
    assert!(len >= 30 * 8000, "mix too short: {} samples", len);
    assert!(len <= 60 * 8000, "mix too long: {} samples", len);
}

#[test]
fn settings_file_feeds_the_analysis() {
    let dir = tempfile::tempdir().expect("tempdir");
    let only = dir.path().join("only.wav");
    let settings = dir.path().join("settings.json");
    write_staircase_wav(&only, 0.0);
    std::fs::write(&settings, r#"{ "min_seg_length": 4, "fade_out_secs": 5.5 }"#)
        .expect("write settings");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&only)
        .arg("--settings")
        .arg(&settings)
        .arg("--plan-only")
        .assert()
        .success();
}

#[test]
fn missing_input_files_fail() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg("/nonexistent/never.wav")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn malformed_settings_files_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let only = dir.path().join("only.wav");
    let settings = dir.path().join("broken.json");
    write_staircase_wav(&only, 0.0);
    std::fs::write(&settings, "{ not json").expect("write settings");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&only)
        .arg("--settings")
        .arg(&settings)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR"));
}

#[test]
fn non_numeric_fade_flags_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let only = dir.path().join("only.wav");
    write_staircase_wav(&only, 0.0);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&only)
        .args(["--fade-in", "plenty"])
        .assert()
        .failure();
}
