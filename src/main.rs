use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    match filter_query::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
