#![deny(clippy::all)]
mod args;
mod config;
mod discover;
mod printer;
mod utils;

use anyhow::{Context, Result};
use log::{error, warn};
use std::{
    io::{self, IsTerminal, Write},
    process,
};
use structopt::StructOpt;

use crate::{
    args::Args,
    config::{MissingParameters, Prompts, RunConfig},
    utils::init_env_logger,
};

fn run(args: Args) -> Result<()> {
    let prompts = if io::stdin().is_terminal() {
        Prompts::Enabled
    } else {
        Prompts::Disabled
    };

    let config = match RunConfig::from_args(&args, prompts) {
        Ok(config) => config,
        Err(error) => {
            if error.is::<MissingParameters>() {
                print_usage()?;
            }
            return Err(error);
        }
    };

    if config.accept_invalid_certificates {
        warn!(
            "TLS certificate verification is disabled. Do NOT use this setting in \
             production."
        );
    }

    discover::run(&config)
}

fn print_usage() -> Result<()> {
    let mut stderr = io::stderr();
    Args::clap()
        .write_help(&mut stderr)
        .context("Failed to print usage.")?;
    writeln!(stderr).context("Failed to print usage.")
}

fn main() {
    let args = Args::from_args();
    init_env_logger(args.verbose);

    if let Err(error) = run(args) {
        error!("An error occurred:");
        for cause in error.chain() {
            error!(" |- {cause}");
        }

        #[cfg(feature = "backtrace")]
        {
            error!("{}", error.backtrace());
        }

        process::exit(1);
    }
}
