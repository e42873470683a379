use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use mudlog_cleanup::data::export;
use mudlog_cleanup::{CleanupConfig, OutputFormat, pipeline};

#[derive(Parser)]
#[command(name = "mudlog-cleanup")]
#[command(
    about = "Clean a Bloodhound drilling-log export into a contiguous, depth-sorted table",
    version
)]
struct Cli {
    /// Bloodhound export to clean
    input: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shallowest depth to keep
    #[arg(long)]
    min_depth: Option<i64>,

    /// Deepest depth to keep
    #[arg(long)]
    max_depth: Option<i64>,

    /// Sort rows by depth before cleaning
    #[arg(long)]
    sort: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase verbosity (diagnostics go to stderr)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn resolve_config(&self) -> Result<CleanupConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let cfg = CleanupConfig::from_json(path)
                    .with_context(|| format!("loading config {}", path.display()))?;
                info!("loaded config from {}", path.display());
                cfg
            }
            None => CleanupConfig::default(),
        };
        if let Some(min) = self.min_depth {
            config.min_depth = min;
        }
        if let Some(max) = self.max_depth {
            config.max_depth = max;
        }
        if self.sort {
            config.sort_first = true;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 if std::env::var_os("RUST_LOG").is_some() => {}
        0 => {
            builder.filter_level(LevelFilter::Warn);
        }
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder
        .target(env_logger::Target::Stderr)
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    let cleaned = pipeline::run(&cli.input, &config)
        .with_context(|| format!("cleaning {}", cli.input.display()))?;

    export::export(&cleaned.working_set, config.format, cli.output.as_deref())
}
