use crate::api::Catalog;
use crate::error::Error;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://gatherer.wizards.com/";
const DEFAULT_OUTPUT_DIR: &str = "output";
const DEFAULT_CONCURRENCY: u16 = 1;
const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Scrapes gatherer.wizards.com for MTG sets and cards and writes them as SQL
/// files: one for the list of sets and then one for each set.
#[derive(Parser, Debug)]
#[command(name = "gatherer_sql", version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Ignore file collisions and overwrite
    #[arg(short, long)]
    pub force: bool,

    /// Only download set info
    #[arg(short, long)]
    pub only_sets: bool,

    /// Comma delimited list of sets to retrieve
    #[arg(short, long, value_delimiter = ',')]
    pub sets: Vec<String>,

    /// Skip file collisions
    #[arg(short = 'S', long)]
    pub skip: bool,

    /// Run but do not output any files
    #[arg(short, long)]
    pub pretend: bool,

    /// Suppress status output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show extra output
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,

    /// Directory the SQL files are written to
    #[arg(long, env = "GATHERER_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Root of the card catalog
    #[arg(long, env = "GATHERER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Card pages fetched at once per listing page
    #[arg(long, env = "GATHERER_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY,
          value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,

    /// Retries for a failed request
    #[arg(long, env = "GATHERER_RETRIES", default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// Per-request timeout in seconds
    #[arg(long, env = "GATHERER_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Collision policy shared by every destination of a run. Answering "all"
/// at a prompt turns `force` on for the rest of the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritePolicy {
    pub force: bool,
    pub skip: bool,
    pub pretend: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: Catalog,
    pub sets: Vec<String>,
    pub only_sets: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub retries: u32,
    pub timeout: Duration,
    pub policy: WritePolicy,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, Error> {
        Ok(Config {
            catalog: Catalog::new(&args.base_url)?,
            sets: args.sets,
            only_sets: args.only_sets,
            verbose: args.verbose,
            quiet: args.quiet,
            output_dir: args.output_dir,
            concurrency: usize::from(args.concurrency),
            retries: args.retries,
            timeout: Duration::from_secs(args.timeout_secs),
            policy: WritePolicy {
                force: args.force,
                skip: args.skip,
                pretend: args.pretend,
            },
        })
    }

    /// Defaults for a run against `base_url`, as if no flags were given.
    /// The `GATHERER_*` environment variables are not consulted.
    pub fn for_catalog(base_url: &str) -> Result<Self, Error> {
        Ok(Config {
            catalog: Catalog::new(base_url)?,
            sets: Vec::new(),
            only_sets: false,
            verbose: false,
            quiet: false,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: usize::from(DEFAULT_CONCURRENCY),
            retries: DEFAULT_RETRIES,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            policy: WritePolicy::default(),
        })
    }
}
