// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, set up logging and hand over to
//   `cli::run`.
// - Any error is printed with its context chain and turns into exit code 1.

use clap::Parser;
use scanserv_cli::{cli, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    logging::init_cli_logging(args.verbose, args.quiet);

    match cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
