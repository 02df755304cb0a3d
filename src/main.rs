//! Linkaudit main entry point
//!
//! This is the command-line interface for the Linkaudit sitemap link auditor.

use anyhow::{bail, Context};
use clap::Parser;
use linkaudit::audit::{self, AuditStatus, RunMode};
use linkaudit::checker::{
    CheckOptions, Checker, LycheeEngine, OptionOverrides, LYCHEE_INSTALL_URL,
};
use linkaudit::config::{
    load_config_or_default, validate_check_config, validate_engine_config, CheckConfig, Config,
    EngineConfig,
};
use linkaudit::output::OutputFormat;
use linkaudit::sitemap::SitemapResolver;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Linkaudit: audit all links from a website's sitemap
///
/// Linkaudit fetches a sitemap.xml (or sitemap index) and passes every page
/// URL to lychee for link checking.
///
/// Exit codes: 0 when all links pass, 1 on errors, 2 when broken links are found.
#[derive(Parser, Debug)]
#[command(name = "linkaudit")]
#[command(version)]
#[command(about = "Audit all links from a website's sitemap", long_about = None)]
struct Cli {
    /// Sitemap or sitemap index URL
    #[arg(value_name = "SITEMAP_URL")]
    sitemap_url: String,

    /// Write report to file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format: compact, json, markdown
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Maximum concurrent requests for lychee
    #[arg(short, long, value_name = "N")]
    concurrency: Option<u32>,

    /// Request timeout in seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Exclude URLs matching pattern (can be repeated)
    #[arg(short, long, value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Disable progress output
    #[arg(long)]
    no_progress: bool,

    /// Path to lychee config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to a linkaudit TOML settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Link-checking engine executable
    #[arg(long, value_name = "PROGRAM")]
    engine: Option<String>,

    /// Fail if lychee finishes without writing its JSON output
    #[arg(long)]
    require_output: bool,

    /// Fetch sitemap and list URLs without checking links
    #[arg(long)]
    dry_run: bool,

    /// Report results grouped by source sitemap
    #[arg(long)]
    per_sitemap: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(AuditStatus::ERROR_EXIT)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkaudit=info,warn"),
            1 => EnvFilter::new("linkaudit=debug,info"),
            2 => EnvFilter::new("linkaudit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<AuditStatus> {
    let config = load_config_or_default(cli.settings.as_deref()).with_context(|| {
        match &cli.settings {
            Some(path) => format!("failed to load settings from {}", path.display()),
            None => "invalid default settings".to_string(),
        }
    })?;

    let options = build_options(&cli, &config)?;
    let engine = LycheeEngine::new(
        cli.engine
            .clone()
            .unwrap_or_else(|| config.engine.program.clone()),
    );

    if !cli.dry_run && !engine.is_installed() {
        bail!(
            "{} is not installed. Install it from: {}",
            engine.program(),
            LYCHEE_INSTALL_URL
        );
    }

    let resolver =
        SitemapResolver::new(&config.sitemap).context("failed to build HTTP client")?;
    let mode = if cli.per_sitemap {
        RunMode::Grouped
    } else {
        RunMode::Merged
    };

    if cli.dry_run {
        println!("Fetching sitemap from {}...", cli.sitemap_url);
        let fetch = resolver
            .resolve(&cli.sitemap_url)
            .await
            .context("failed to fetch sitemap")?;
        println!(
            "Found {} pages in {} sitemap(s)\n",
            fetch.all_urls.len(),
            fetch.sitemaps.len()
        );
        audit::write_url_listing(&mut std::io::stdout().lock(), &fetch, mode)
            .context("failed to write URL listing")?;
        return Ok(AuditStatus::Clean);
    }

    let checker = Checker::new(engine);
    let status = audit::audit(&resolver, &checker, &cli.sitemap_url, mode, &options).await?;

    Ok(status)
}

/// Layers command-line flags over the settings file
fn build_options(cli: &Cli, config: &Config) -> anyhow::Result<CheckOptions> {
    let options = CheckOptions::from_config(config).with_overrides(OptionOverrides {
        max_concurrency: cli.concurrency,
        timeout: cli.timeout,
        excludes: cli.exclude.clone(),
        engine_config: cli.config.clone(),
        format: cli.format,
        output_file: cli.output.clone(),
        no_progress: cli.no_progress,
        verbose: cli.verbose > 0,
        require_output: cli.require_output,
    });

    // Flags bypass the settings file, so check them the same way
    validate_check_config(&CheckConfig {
        max_concurrency: options.max_concurrency,
        timeout: options.timeout,
        exclude: options.excludes.clone(),
    })?;
    validate_engine_config(&EngineConfig {
        program: cli
            .engine
            .clone()
            .unwrap_or_else(|| config.engine.program.clone()),
        config: options.engine_config.clone(),
        require_output: options.require_output,
    })?;

    Ok(options)
}
