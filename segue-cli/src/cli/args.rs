//! Argument definitions for the segue binary.

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("Segue")
        .version("0.2.0")
        .about("Automatically segment, match, and crossfade music files into one continuous mix")
        .arg_required_else_help(true)
        .arg(
            Arg::new("INPUTS")
                .help("Audio files to mix, in playback order")
                .num_args(1..)
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .default_value("mix.wav")
                .help("Path of the mixed WAV file to write"),
        )
        .arg(
            Arg::new("settings")
                .long("settings")
                .short('S')
                .value_name("PATH")
                .help("JSON settings file to start from"),
        )
        .arg(
            Arg::new("fade-in")
                .long("fade-in")
                .value_name("SECONDS")
                .help("Fade-in length, overriding the settings file"),
        )
        .arg(
            Arg::new("fade-out")
                .long("fade-out")
                .value_name("SECONDS")
                .help("Fade-out length, overriding the settings file"),
        )
        .arg(
            Arg::new("pre-roll")
                .long("pre-roll")
                .value_name("SECONDS")
                .help("How far before its matched segment the incoming track enters"),
        )
        .arg(
            Arg::new("min-seg-length")
                .long("min-seg-length")
                .value_name("FRAMES")
                .help("Minimum segment length used by the analysis"),
        )
        .arg(
            Arg::new("plan-only")
                .long("plan-only")
                .action(ArgAction::SetTrue)
                .help("Analyze and print the mix plan without rendering"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the mix plan as JSON"),
        )
        .arg(
            Arg::new("play")
                .long("play")
                .short('p')
                .action(ArgAction::SetTrue)
                .conflicts_with("plan-only")
                .help("Play the mix after writing it"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .action(ArgAction::SetTrue)
                .help("Suppress all log output"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet")
                .help("Enable debug logging"),
        )
}
