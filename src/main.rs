//! gleaner CLI entry point
//!
//! Parses the command line, sets up logging, runs the harvest and maps the
//! outcome to the process exit status.

use clap::Parser;
use gleaner::cli;
use gleaner::core::error::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();
    cli.build_config().init_logging();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
