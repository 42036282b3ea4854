// disview: side-by-side source and bytecode in the terminal

use clap::Parser;
use disview::cli::{self, Cli};
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};
use std::process::ExitCode;

/// Log to stderr; `RUST_LOG` wins over the `-v` count
fn init_logging(verbose: u8) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Logger::try_with_env_or_str(level)?.log_to_stderr().start()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match init_logging(cli.verbose) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Warning: logging disabled: {}", err);
            None
        }
    };

    match cli::run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            cli::report_error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
