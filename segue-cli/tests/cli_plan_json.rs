//! Plan output checks against real synthesized audio.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// Thirty seconds of tone with four loudness plateaus, so the analyzer
/// has real structure to find.
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
fn plan_json_reports_every_track() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.wav");
    write_staircase_wav(&first, 0.0);
    write_staircase_wav(&second, 5.0);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&first)
        .arg(&second)
        .args(["--plan-only", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fade_in\""))
        .stdout(predicate::str::contains("\"fade_out\""))
        .stdout(predicate::str::contains("first"))
        .stdout(predicate::str::contains("second"));
}

#[test]
fn plan_table_lists_every_track() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("one.wav");
    let second = dir.path().join("two.wav");
    write_staircase_wav(&first, 0.0);
    write_staircase_wav(&second, 5.0);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&first)
        .arg(&second)
        .arg("--plan-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("one"))
        .stdout(predicate::str::contains("two"))
        .stdout(predicate::str::contains("fade in:"));
}

#[test]
fn quiet_suppresses_all_log_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let only = dir.path().join("only.wav");
    write_staircase_wav(&only, 0.0);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.arg(&only)
        .args(["--plan-only", "--quiet"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn missing_arguments_print_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("segue"));
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}
