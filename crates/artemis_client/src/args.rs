use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use config::args::{AppMode, ArgsConfig};

use crate::build_info::build_info;

/// Defined in the binary crate so that clap reads name and
/// version from this crate's Cargo.toml.
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub args: ArgsConfig,
}

/// Returns exit code if there is nothing to run.
pub fn parse_args() -> Result<(ArgsConfig, AppMode), ExitCode> {
    let cli = Cli::parse();

    if cli.args.build_info {
        println!("{}", build_info());
        return Err(ExitCode::SUCCESS);
    }

    match cli.args.mode.clone() {
        Some(mode) => Ok((cli.args, mode)),
        None => {
            let _ = Cli::command().print_help();
            Err(ExitCode::FAILURE)
        }
    }
}
