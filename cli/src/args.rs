use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::Verbosity;
use otp_core::{
    constants::DEFAULT_MAX_INPUT_SIZE,
    io::{InputSource, OutputSink},
    keystream::KeystreamParams,
    orchestrator::{RunConfig, RunRequest},
};

#[derive(Parser, Debug)]
#[command(name = "otp")]
#[command(about = "XOR a file with an LCG keystream across all CPU cores", long_about = None)]
#[command(after_help = "Example: otp -i plain.txt -o cipher.bin -x 4212 -a 84589 -c 45989 -m 217728\n\
Running the same command on the output restores the original file.")]
pub struct Args {
    /// Input file
    #[arg(short = 'i', long, value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (created or truncated)
    #[arg(short = 'o', long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Generator seed (x0)
    #[arg(short = 'x', long)]
    pub seed: u64,

    /// Generator multiplier (a)
    #[arg(short = 'a', long)]
    pub multiplier: u64,

    /// Generator increment (c)
    #[arg(short = 'c', long)]
    pub increment: u64,

    /// Generator modulus (m), must be non-zero
    #[arg(short = 'm', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub modulus: u64,

    /// Reject inputs larger than this many bytes
    #[arg(long, value_name = "BYTES", env = "OTP_MAX_SIZE", default_value_t = DEFAULT_MAX_INPUT_SIZE)]
    pub max_size: u64,

    /// Worker threads (defaults to the number of available processors)
    #[arg(short = 'j', long, value_name = "N", env = "OTP_WORKERS",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub report: bool,

    #[command(flatten)]
    pub verbose: Verbosity,
}

impl Args {
    pub fn params(&self) -> KeystreamParams {
        KeystreamParams {
            seed: self.seed,
            multiplier: self.multiplier,
            increment: self.increment,
            modulus: self.modulus,
        }
    }

    pub fn request(&self) -> RunRequest {
        RunRequest::new(
            InputSource::File(self.input.clone()),
            OutputSink::File(self.output.clone()),
            self.params(),
        )
    }

    pub fn config(&self) -> RunConfig {
        let workers = self.workers.map(|n| usize::try_from(n).unwrap_or(usize::MAX));
        RunConfig::new(Some(self.max_size), workers)
    }
}
