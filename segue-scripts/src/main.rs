//! Developer utilities: synthesize test fixtures and smoke the pipeline.

use std::path::Path;

use segue_lib::audio::Track;
use segue_lib::extract::SpectralAnalyzer;
use segue_lib::mix::Mixer;
use segue_lib::settings::MixSettings;

const FIXTURE_RATE: u32 = 8000;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|arg| arg.as_str()) {
        Some("fixtures") => match args.get(2) {
            Some(dir) => fixtures(dir),
            None => {
                eprintln!("fixtures needs a target directory");
                std::process::exit(1);
            }
        },
        Some("smoke") => smoke(),
        _ => print_help(),
    }
}

fn print_help() {
    println!("segue-scripts <command>\n");
    println!("commands:");
    println!("  fixtures <dir>   write synthetic staircase WAVs for manual runs");
    println!("  smoke            plan and render a synthetic playlist in memory");
}

/// Four loudness plateaus over thirty seconds of tone. Enough structure
/// for the segmenter to find boundaries in every feature channel.
fn staircase_samples(detune: f64) -> Vec<f32> {
    let amplitudes = [0.05, 0.1, 0.4, 0.8];
    let mut samples = Vec::with_capacity(30 * FIXTURE_RATE as usize);
    for second in 0..30 {
        let section = match second {
            0..=7 => 0,
            8..=14 => 1,
            15..=22 => 2,
            _ => 3,
        };
        for i in 0..FIXTURE_RATE {
            let phase =
                2.0 * std::f64::consts::PI * (220.0 + detune) * f64::from(i) / f64::from(FIXTURE_RATE);
            samples.push((amplitudes[section] * phase.sin()) as f32);
        }
    }
    samples
}

fn fixtures(dir: &str) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("could not create {}: {}", dir, err);
        std::process::exit(1);
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: FIXTURE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    for (name, detune) in [("staircase-a.wav", 0.0), ("staircase-b.wav", 5.0), ("staircase-c.wav", 11.0)] {
        let path = Path::new(dir).join(name);
        let result = hound::WavWriter::create(&path, spec).and_then(|mut writer| {
            for sample in staircase_samples(detune) {
                writer.write_sample((sample * 30_000.0) as i16)?;
            }
            writer.finalize()
        });
        match result {
            Ok(()) => println!("wrote {}", path.display()),
            Err(err) => {
                eprintln!("could not write {}: {}", path.display(), err);
                std::process::exit(1);
            }
        }
    }
}

fn smoke() {
    let tracks = vec![
        Track::new("alpha", staircase_samples(0.0), FIXTURE_RATE),
        Track::new("beta", staircase_samples(5.0), FIXTURE_RATE),
        Track::new("gamma", staircase_samples(11.0), FIXTURE_RATE),
    ];

    let mixer = Mixer::new(MixSettings::default());
    let analyzer = SpectralAnalyzer::new();
    let plan = match mixer.plan(&tracks, &analyzer) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("plan failed: {}", err);
            std::process::exit(1);
        }
    };
    for (track, entry) in tracks.iter().zip(plan.entries.iter()) {
        println!(
            "{}: fade_in={:?} fade_out={:?}",
            track.name, entry.fade_in, entry.fade_out
        );
    }

    match mixer.render(&tracks, &plan) {
        Ok(rendered) => println!(
            "rendered {} samples ({:.1}s)",
            rendered.len(),
            rendered.len() as f64 / f64::from(FIXTURE_RATE)
        ),
        Err(err) => {
            eprintln!("render failed: {}", err);
            std::process::exit(1);
        }
    }
}
