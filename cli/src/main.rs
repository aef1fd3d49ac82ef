//! otp
//!
//! Usage: otp -i <input> -o <output> -x <seed> -a <a> -c <c> -m <m>

mod args;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::debug;

use crate::args::Args;

fn main() -> ExitCode {
    // Usage errors exit with status 2 inside `parse`.
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    debug!("[CLI] {:?}", args);

    let snapshot = otp_core::orchestrator::run(args.request(), &args.config())
        .with_context(|| format!("transforming {:?} into {:?}", args.input, args.output))?;

    if args.report {
        println!("{}", snapshot.to_json().context("serializing run report")?);
    }
    Ok(())
}
