use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tripfetch::config::Config;

#[derive(Parser, Debug)]
#[command(name = "tripfetch")]
#[command(about = "Download monthly trip-record files with a bounded worker pool", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $TRIPFETCH_CONFIG or config/tripfetch.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every file in the range (default)
    Fetch(FetchArgs),
    /// Print the URLs that would be fetched, in generation order
    List(RangeArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct RangeArgs {
    /// First year of the range
    #[arg(long)]
    pub start_year: Option<u16>,

    /// Last year of the range (inclusive)
    #[arg(long)]
    pub end_year: Option<u16>,
}

#[derive(clap::Args, Debug, Default)]
pub struct FetchArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Number of concurrent download workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Directory downloaded files are written into
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl RangeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(year) = self.start_year {
            config.source.start_year = year;
        }
        if let Some(year) = self.end_year {
            config.source.end_year = year;
        }
    }
}

impl FetchArgs {
    pub fn apply(&self, config: &mut Config) {
        self.range.apply(config);
        if let Some(workers) = self.workers {
            config.pool.workers = workers;
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
    }
}
