use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use visualizer_core::{Difficulty, Quality};

pub const DEFAULT_CONFIG_FILE: &str = "visualizer.ron";

#[derive(Debug, Parser)]
#[command(
    name = "visualizer",
    version,
    about = "Request a generated math video or explanation for a passage of text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (RON).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Service base url, e.g. http://localhost:5000/api
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where log output goes.
    #[arg(long, global = true, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        let path = PathBuf::from(DEFAULT_LOG_FILE);
        match self.log {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(path),
            LogTarget::Both => LogDestination::Both(path),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a video or explanation for a passage.
    Visualize(VisualizeArgs),
    /// Check whether the service is ready.
    Check,
    /// List videos the service has generated.
    List,
    /// Show locally recorded completed results.
    History,
}

#[derive(Debug, Args)]
pub struct VisualizeArgs {
    /// Selected text; joined with spaces. Read from --file or stdin when empty.
    pub text: Vec<String>,

    /// Read the selection from a file ("-" for stdin).
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// beginner, intermediate or advanced.
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// low_quality, medium_quality or high_quality.
    #[arg(long)]
    pub quality: Option<Quality>,

    /// Target duration in seconds.
    #[arg(long)]
    pub duration: Option<u32>,

    /// Stop tracking the task after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Download the result into the output directory.
    #[arg(long)]
    pub save: bool,

    /// Output directory for saved results and history.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}
