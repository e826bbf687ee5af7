//! envcheck - bind environment variables to typed fields and report the result
//!
//! Each `--field NAME=TYPE[=DEFAULT]` is converted eagerly; every failing
//! field is reported at once and the process exits non-zero.

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::process;
use typed_envconfig::{app::App, cli::Cli, error::ConfigError, PKG_NAME};

fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("{} panic: {}", PKG_NAME, panic_info);
        eprintln!("Please report this issue at: {}", env!("CARGO_PKG_REPOSITORY"));
        process::exit(101);
    }));

    let cli = Cli::parse();
    if let Err(message) = cli.validate() {
        Cli::command().error(ErrorKind::ArgumentConflict, message).exit();
    }

    match run_application(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            let use_color = typed_envconfig::cli::supports_color();
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                match cause.downcast_ref::<ConfigError>() {
                    Some(config_error) => eprintln!("Caused by: {}", config_error.format_for_console(use_color)),
                    None => eprintln!("Caused by: {}", cause),
                }
            }

            let code = e.downcast_ref::<ConfigError>().map_or(1, ConfigError::exit_code);
            process::exit(code);
        }
    }
}

/// Main application logic; returns the exit code of a completed run
fn run_application(cli: Cli) -> anyhow::Result<i32> {
    let json = cli.json_output();
    let app = App::new(cli).context("Failed to load envcheck settings")?;
    let report = app.run().context("Failed to check environment")?;

    if report.is_success() || json {
        println!("{}", report.output);
    } else {
        eprintln!("{}", report.output);
    }

    Ok(report.exit_code)
}
