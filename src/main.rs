//! `schema-inspector` command-line entrypoint.

use std::io::{self, Write};

use clap::Parser;
use schema_inspector::cli::{Cli, exit_status, run};
use schema_inspector::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = run(&cli, &mut out);
    if let Err(error) = &result {
        eprintln!("error: {error}");
    }
    let _ = out.flush();
    std::process::exit(i32::from(exit_status(&result)));
}
