use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::{
    path::PathBuf,
    process::ExitCode,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, error, info_span};
use tracing_indicatif::{span_ext::IndicatifSpanExt, style::ProgressStyle, IndicatifLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[macro_use]
extern crate lazy_static;

mod cache;
mod error;
mod metric;
mod offsets;
mod options;
mod sampler;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
use linux as platform;

#[cfg(not(target_os = "linux"))]
mod other_os;
#[cfg(not(target_os = "linux"))]
use other_os as platform;

use metric::Metric;
use options::{Pattern, SampleOptions};

/// Display seek average latency of the given file(s) or block device(s).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files or block devices to measure, in order.
    targets: Vec<PathBuf>,

    /// Print the raw figures along with the derived value.
    #[clap(short, long)]
    verbose: bool,

    /// Number of blocks to read from each target.
    ///
    /// Accepts decimal, 0x-prefixed hex or 0-prefixed octal.
    #[clap(short = 'n', long = "nb-blocks", default_value = "1000", value_parser = options::parse_number)]
    nb_blocks: u64,

    /// Bytes read at each step, at most 1 GiB.
    #[clap(short = 's', long, default_value = "4096", value_parser = options::parse_block_size)]
    block_size: u64,

    /// Drop the page cache before reading each target (but not during the reads).
    #[clap(short, long)]
    drop_cache: bool,

    /// Scan forward from a random block instead of seeking at random.
    ///
    /// Reports throughput in bytes/second rather than seconds/seek.
    #[clap(short = 'l', long)]
    sequential: bool,

    /// Open targets with O_NOATIME.
    #[clap(short = 'a', long)]
    noatime: bool,

    /// Seed for the offset generator. Defaults to the current time in seconds.
    #[clap(long, value_parser = options::parse_number)]
    seed: Option<u64>,
}

impl Args {
    fn sample_options(&self) -> SampleOptions {
        SampleOptions {
            block_size: self.block_size,
            block_count: self.nb_blocks,
            pattern: if self.sequential {
                Pattern::Sequential
            } else {
                Pattern::Random
            },
            noatime: self.noatime,
            drop_cache: self.drop_cache,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version go to stdout and are not failures. If even
            // printing the message fails there is nowhere left to report it.
            err.print().ok();
            return Ok(if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };
    if args.targets.is_empty() {
        println!("nothing to do, done.");
        return Ok(ExitCode::FAILURE);
    }

    let seed = match args.seed {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is set before 1970")?
            .as_secs(),
    };
    debug!(seed, "Seeding offset generator");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let opts = args.sample_options();

    let bar_span = info_span!("measuring");
    bar_span.pb_set_style(&PROGRESS_STYLE);
    bar_span.pb_set_length(args.targets.len() as u64);
    let _bar_span_handle = bar_span.enter();

    // Per-target failures are reported but never change the exit status.
    for path in &args.targets {
        match sampler::measure(path, &opts, &mut rng)
            .with_context(|| format!("Measuring {:?}", path))
        {
            Ok(sample) => println!("{}", Metric::from(&sample).render(args.verbose)),
            Err(err) => error!("{:#}", err),
        }
        bar_span.pb_inc(1);
    }
    Ok(ExitCode::SUCCESS)
}

lazy_static! {
    pub(crate) static ref PROGRESS_STYLE: ProgressStyle = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.white/grey} {pos}/{len} targets {msg}",
    ).expect("Internal error in indicatif progress bar template syntax");
}
