//! td - Todoist from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = td_cli::cli::run() {
        eprintln!("{}", td_cli::cli::format_error(&e));
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
