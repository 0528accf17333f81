use std::process::ExitCode;

use clap::Parser;
use parameter_study::cli::{self, Cli, RunStatus};

fn main() -> ExitCode {
    cli::init_logging();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli::run(cli, &mut out) {
        Ok(RunStatus::Success) => ExitCode::SUCCESS,
        Ok(RunStatus::Conflicts) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
