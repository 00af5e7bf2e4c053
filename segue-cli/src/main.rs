//! Command line front end for the Segue mixer.

use log::error;

mod cli;
mod logging;
mod runner;
mod wav;

fn main() {
    let args = cli::args::build_cli().get_matches();
    logging::init(&args);

    let code = match runner::run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            -1
        }
    };
    std::process::exit(code);
}
