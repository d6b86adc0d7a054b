// main.rs
mod app;
mod batch;
mod cli;
mod convert;
mod error;
mod utils;

use clap::{CommandFactory, Parser};
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    // GUI when requested or when launched with no arguments at all.
    if cli.gui || std::env::args().len() == 1 {
        app::launch();
        return;
    }

    let Some(input_dir) = cli.input_dir.as_deref() else {
        Cli::command().print_help().ok();
        return;
    };

    if let Err(e) = cli::run(input_dir, cli.output.as_deref(), cli.quality) {
        utils::print_error(&e.to_string());
        std::process::exit(1);
    }
}
