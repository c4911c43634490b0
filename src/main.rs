#![forbid(unsafe_code)]

//! clean-entries — delete form entries older than a relative age.

use clap::Parser;

mod cli_app;

fn main() {
    let args = cli_app::Cli::parse();
    if let Err(e) = cli_app::run(&args) {
        entry_expiration::report::console::print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
