use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tailwind_design_tokens_core::{Config, TokenPipeline};
use tracing_subscriber::EnvFilter;

/// Builds CSS variables and Tailwind typography utilities from design tokens.
#[derive(Debug, Parser)]
#[command(name = "tailwind-tokens", version, about)]
struct Args {
    /// JSON build config. Without it the built-in config is used with
    /// `tokens/tokens.json` as source and `build/` as output directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build only this platform.
    #[arg(short, long)]
    platform: Option<String>,

    /// Keep previous output files instead of removing them first.
    #[arg(long)]
    no_clean: bool,

    /// Increase logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn default_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.default_level())),
        )
        .with_target(false)
        .init();

    let config = match &args.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    let pipeline = TokenPipeline::new(config);

    if !args.no_clean {
        match &args.platform {
            Some(platform) => pipeline.clean_platform(platform),
            None => pipeline.clean_all_platforms(),
        }
        .context("failed to clean build output")?;
    }

    let written = match &args.platform {
        Some(platform) => pipeline.build_platform(platform),
        None => pipeline.build_all_platforms(),
    }
    .context("build failed")?;

    tracing::info!(files = written.len(), "build complete");
    Ok(())
}
