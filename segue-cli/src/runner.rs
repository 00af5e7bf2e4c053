//! Decode the inputs, plan the mix, and write or play the result.

use clap::ArgMatches;
use log::info;
use serde::Serialize;

use segue_lib::audio::{decode_file, Track};
use segue_lib::encode::encode_pcm;
use segue_lib::extract::SpectralAnalyzer;
use segue_lib::mix::{MixPlan, Mixer};
use segue_lib::playback::play_buffer;
use segue_lib::settings::MixSettings;

use crate::wav::WavSink;

#[derive(Serialize)]
struct PlanReport<'a> {
    tracks: Vec<&'a str>,
    plan: &'a MixPlan,
}

pub fn run(args: &ArgMatches) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = load_settings(args)?;

    let inputs = args.get_many::<String>("INPUTS").unwrap();
    let mut tracks: Vec<Track> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let track = decode_file(input)?;
        info!(
            "decoded {}: {:.1}s at {} Hz",
            track.name,
            track.duration_secs(),
            track.sample_rate
        );
        tracks.push(track);
    }

    let mixer = Mixer::new(settings);
    let analyzer = SpectralAnalyzer::new();
    let plan = mixer.plan(&tracks, &analyzer)?;

    if args.get_flag("json") {
        let report = PlanReport {
            tracks: tracks.iter().map(|track| track.name.as_str()).collect(),
            plan: &plan,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.get_flag("plan-only") {
        print_plan(&tracks, &plan);
    }
    if args.get_flag("plan-only") {
        return Ok(0);
    }

    let rendered = mixer.render(&tracks, &plan)?;
    let sample_rate = tracks[0].sample_rate;

    let output = args.get_one::<String>("output").unwrap();
    let mut sink = WavSink::create(output, sample_rate)?;
    encode_pcm(&rendered, &mut sink)?;
    info!(
        "wrote {} ({:.1}s)",
        output,
        rendered.len() as f64 / f64::from(sample_rate)
    );

    if args.get_flag("play") {
        play_buffer(rendered, sample_rate)?;
    }

    Ok(0)
}

fn print_plan(tracks: &[Track], plan: &MixPlan) {
    for (track, entry) in tracks.iter().zip(plan.entries.iter()) {
        println!(
            "{:<30} fade in: {:>8}  fade out: {:>8}",
            track.name,
            format_fade(entry.fade_in),
            format_fade(entry.fade_out)
        );
    }
}

fn format_fade(fade: Option<f64>) -> String {
    match fade {
        Some(secs) => format!("{:.1}s", secs),
        None => "-".to_string(),
    }
}

fn load_settings(args: &ArgMatches) -> Result<MixSettings, Box<dyn std::error::Error>> {
    let mut settings = match args.get_one::<String>("settings") {
        Some(path) => MixSettings::from_file(path)?,
        None => MixSettings::default(),
    };

    if let Some(value) = args.get_one::<String>("fade-in") {
        settings.fade_in_secs = value.parse()?;
    }
    if let Some(value) = args.get_one::<String>("fade-out") {
        settings.fade_out_secs = value.parse()?;
    }
    if let Some(value) = args.get_one::<String>("pre-roll") {
        settings.pre_roll_secs = value.parse()?;
    }
    if let Some(value) = args.get_one::<String>("min-seg-length") {
        settings.min_seg_length = value.parse()?;
    }
    settings.validate()?;
    Ok(settings)
}
