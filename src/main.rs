mod cli;
mod output;

use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    bookmarker::logging::init_logging(args.verbose);

    let debug = args.debug;
    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e, debug);
            ExitCode::FAILURE
        }
    }
}
