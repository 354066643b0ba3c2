use colored::*;
use std::process::ExitCode;
use vigil::cli::{generic_exit_code, Cli};
use vigil::error::MonitorError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let fallback = generic_exit_code(&cli.command);
    match cli.run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            // Fatal monitor errors carry their own exit codes; other
            // failures take the subcommand's generic code.
            match err.downcast_ref::<MonitorError>() {
                Some(fatal) => ExitCode::from(fatal.exit_code()),
                None => ExitCode::from(fallback),
            }
        }
    }
}
