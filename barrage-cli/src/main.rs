//! # Barrage
//!
//! A command-line bullet-comment overlay: messages scroll across the
//! terminal in parallel lanes, driven by the barrage engine.

use log::error;

mod cli;
mod controls;
mod logging;
mod runner;
mod surface;
mod ui;

fn main() {
    let args = cli::args::build_cli().get_matches();
    let log_buffer = logging::init();

    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            -1
        }
    };

    std::process::exit(code)
}
