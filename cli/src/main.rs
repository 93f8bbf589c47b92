//! Lawyerify CLI - binary entry point.
//!
//! ```text
//! main() -> Args + LawyerifyConfig -> build_lookup() -> Replacer::run(surface)
//!                                                           |
//!                                                           v
//!                                         Completed (exit 0) | Interrupted (exit 2)
//! ```

mod args;
mod surface;

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lawyerify_config::LawyerifyConfig;
use lawyerify_engine::lawyerify_providers::{ApiKey, BigHugeClient, StaticThesaurus};
use lawyerify_engine::{QUOTA_NOTICE, Replacer, RunStatus, SynonymLookup, TextSurface};

use args::Args;
use surface::{FileSurface, StreamSurface};

/// Exit status when the thesaurus quota cut the run short.
const EXIT_INTERRUPTED: u8 = 2;

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    if verbose {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(env_filter)
            .init();
        return;
    }

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::debug!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Stdout may carry the rewritten text, so never log there.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
    for warning in init_warnings {
        tracing::warn!("{warning}");
    }
}

fn open_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.lawyerify/logs/lawyerify.log
    if let Some(config_dir) = lawyerify_config::config_dir() {
        candidates.push(config_dir.join("logs").join("lawyerify.log"));
    }

    // Fallback: ./.lawyerify/logs/lawyerify.log
    candidates.push(PathBuf::from(".lawyerify").join("logs").join("lawyerify.log"));

    candidates
}

fn load_config(args: &Args) -> Result<LawyerifyConfig> {
    let loaded = match &args.config {
        Some(path) => {
            let loaded = LawyerifyConfig::load_from(path)?;
            if loaded.is_none() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            loaded
        }
        None => LawyerifyConfig::load()?,
    };
    Ok(loaded.unwrap_or_default())
}

/// Offline file first, then the HTTP service.
fn build_lookup(args: &Args, config: &LawyerifyConfig) -> Result<Arc<dyn SynonymLookup>> {
    if let Some(path) = args.thesaurus_file(config) {
        let thesaurus = StaticThesaurus::load(&path)
            .with_context(|| format!("failed to load thesaurus {}", path.display()))?;
        tracing::debug!(path = %path.display(), entries = thesaurus.len(), "Using offline thesaurus");
        return Ok(Arc::new(thesaurus));
    }

    let raw = args.api_key(config).context(
        "no thesaurus configured: pass --api-key, set BIGHUGELABS_API_KEY, or use --thesaurus-file",
    )?;
    let key = ApiKey::new(raw).context("invalid thesaurus API key")?;
    let mut bighuge = config.thesaurus.bighuge_config(key);
    if let Some(base_url) = &args.base_url {
        bighuge = bighuge.with_base_url(base_url.clone());
    }
    let client = BigHugeClient::new(bighuge).context("failed to build thesaurus client")?;
    Ok(Arc::new(client))
}

fn open_surface(args: &Args) -> Result<Box<dyn TextSurface>> {
    let surface: Box<dyn TextSurface> = match (args.input_path(), &args.output) {
        (Some(input), _) if args.in_place => Box::new(FileSurface::in_place(input.clone())),
        (Some(input), Some(output)) => Box::new(FileSurface::new(input.clone(), output.clone())),
        (Some(input), None) => {
            let file = File::open(input)
                .with_context(|| format!("failed to open {}", input.display()))?;
            Box::new(StreamSurface::new(file, io::stdout()))
        }
        (None, Some(output)) => {
            let file = File::create(output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            Box::new(StreamSurface::new(io::stdin(), file))
        }
        (None, None) => Box::new(StreamSurface::stdio()),
    };
    Ok(surface)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let lookup = build_lookup(&args, &config)?;
    let replacer = Replacer::new(lookup)
        .with_overrides(args.overrides(&config))
        .with_policy(args.policy(&config));
    tracing::debug!(?replacer, "Session ready");

    let mut surface = open_surface(&args)?;
    let report = replacer.run(surface.as_mut()).await?;

    match report.status {
        RunStatus::Completed => Ok(ExitCode::SUCCESS),
        RunStatus::Interrupted => {
            eprintln!("{QUOTA_NOTICE}");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
    }
}
