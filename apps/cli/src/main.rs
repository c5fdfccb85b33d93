use guidelight_cli::args::Cli;
use guidelight_cli::commands::run;
use guidelight_cli::logger::initialize as LoggerInitialize;

use std::io::stdout;
use std::process::ExitCode;

use clap::Parser;
use log::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = LoggerInitialize(cli.global.verbose, cli.global.log_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli, &mut stdout().lock()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
