//! nhkpg - NHK Program Guide API CLI.

/// Application configuration (TOML).
mod config;
/// Result reporting.
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Local, Utc};
use clap::{Parser, Subcommand};
use nhkpg_api::nhk::{NhkApi, NhkClient};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};

/// Environment variable holding the API key.
const API_KEY_ENV: &str = "NHK_API_KEY";

/// UTC offset of the broadcast schedule (JST).
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// API key (overrides `NHK_API_KEY` and config).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL of the API (overrides config).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API version path segment (overrides config, default "v1").
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Print the decoded response as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List programs of a service on a date.
    List(ListArgs),
    /// List programs of a genre on a date.
    Genre(GenreArgs),
    /// Show the description of a program.
    Info(InfoArgs),
    /// Show the previous, present and following programs.
    Now(NowArgs),
}

/// Area and service selection shared by all subcommands.
#[derive(clap::Args)]
struct ScopeArgs {
    /// Area code (e.g. "130" for Tokyo). Falls back to config.
    #[arg(long)]
    area: Option<String>,

    /// Service code (e.g. "g1", "e1", "s1"). Falls back to config.
    #[arg(long)]
    service: Option<String>,
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Area and service.
    #[command(flatten)]
    scope: ScopeArgs,

    /// Date as YYYY-MM-DD (default: today in JST).
    #[arg(long)]
    date: Option<String>,
}

/// Arguments for the `genre` subcommand.
#[derive(clap::Args)]
struct GenreArgs {
    /// Area and service.
    #[command(flatten)]
    scope: ScopeArgs,

    /// Genre code (e.g. "0000").
    #[arg(long, required = true)]
    genre: String,

    /// Date as YYYY-MM-DD (default: today in JST).
    #[arg(long)]
    date: Option<String>,
}

/// Arguments for the `info` subcommand.
#[derive(clap::Args)]
struct InfoArgs {
    /// Area and service.
    #[command(flatten)]
    scope: ScopeArgs,

    /// Program ID (as printed by `list`).
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `now` subcommand.
#[derive(clap::Args)]
struct NowArgs {
    /// Area and service.
    #[command(flatten)]
    scope: ScopeArgs,
}

/// Settings resolved from CLI flags and config.
#[derive(Debug)]
struct RunContext {
    /// API version path segment.
    version: String,
    /// Default area code.
    area: String,
    /// Default service code.
    service: String,
    /// Print JSON instead of tables.
    json: bool,
}

impl RunContext {
    /// Resolves area and service, preferring CLI arguments.
    fn scope<'a>(&'a self, args: &'a ScopeArgs) -> (&'a str, &'a str) {
        (
            args.area.as_deref().unwrap_or(&self.area),
            args.service.as_deref().unwrap_or(&self.service),
        )
    }
}

/// Resolves the API key: `--api-key`, then `NHK_API_KEY`, then config.
///
/// # Errors
///
/// Returns an error if no non-empty key is found.
fn resolve_api_key(
    flag: Option<String>,
    env: Option<String>,
    config: &AppConfig,
) -> Result<String> {
    flag.or(env)
        .or_else(|| config.api.key.clone())
        .filter(|key| !key.is_empty())
        .context("NHK API key is required (use --api-key, NHK_API_KEY or `key` in config.toml)")
}

/// Builds an `NhkClient` from CLI flags and config.
///
/// # Errors
///
/// Returns an error if the API key is missing, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_client(cli: &Cli, config: &AppConfig) -> Result<NhkClient> {
    let api_key = resolve_api_key(
        cli.api_key.clone(),
        std::env::var(API_KEY_ENV).ok(),
        config,
    )?;

    let mut builder = NhkClient::builder(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(base_url) = cli.base_url.as_ref().or(config.api.base_url.as_ref()) {
        let url = Url::parse(base_url).with_context(|| format!("invalid base URL: {base_url}"))?;
        builder = builder.base_url(url);
    }
    if let Some(timeout) = config.api.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().context("failed to build NHK API client")
}

/// Today's date in JST as `YYYY-MM-DD`.
fn today() -> String {
    FixedOffset::east_opt(JST_OFFSET_SECS).map_or_else(
        || Local::now().format("%Y-%m-%d").to_string(),
        |jst| Utc::now().with_timezone(&jst).format("%Y-%m-%d").to_string(),
    )
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
fn run_list(api: &impl NhkApi, ctx: &RunContext, args: &ListArgs) -> Result<()> {
    let (area, service) = ctx.scope(&args.scope);
    let date = args.date.clone().unwrap_or_else(today);

    let list = api
        .program_list(&ctx.version, area, service, &date)
        .with_context(|| format!("failed to fetch program list ({area}/{service}/{date})"))?;

    if ctx.json {
        output::write_json(&list, std::io::stdout().lock())?;
    } else {
        output::report_programs(&list);
    }
    output::report_credit();
    Ok(())
}

/// Runs the `genre` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
fn run_genre(api: &impl NhkApi, ctx: &RunContext, args: &GenreArgs) -> Result<()> {
    let (area, service) = ctx.scope(&args.scope);
    let date = args.date.clone().unwrap_or_else(today);

    let list = api
        .program_genre(&ctx.version, area, service, &args.genre, &date)
        .with_context(|| {
            format!(
                "failed to fetch genre list ({area}/{service}/{}/{date})",
                args.genre
            )
        })?;

    if ctx.json {
        output::write_json(&list, std::io::stdout().lock())?;
    } else {
        output::report_programs(&list);
    }
    output::report_credit();
    Ok(())
}

/// Runs the `info` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
fn run_info(api: &impl NhkApi, ctx: &RunContext, args: &InfoArgs) -> Result<()> {
    let (area, service) = ctx.scope(&args.scope);

    let list = api
        .program_info(&ctx.version, area, service, &args.id)
        .with_context(|| format!("failed to fetch program info ({area}/{service}/{})", args.id))?;

    if ctx.json {
        output::write_json(&list, std::io::stdout().lock())?;
    } else {
        output::report_descriptions(&list);
    }
    output::report_credit();
    Ok(())
}

/// Runs the `now` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
fn run_now(api: &impl NhkApi, ctx: &RunContext, args: &NowArgs) -> Result<()> {
    let (area, service) = ctx.scope(&args.scope);

    let list = api
        .now_on_air(&ctx.version, area, service)
        .with_context(|| format!("failed to fetch now on air ({area}/{service})"))?;

    if ctx.json {
        output::write_json(&list, std::io::stdout().lock())?;
    } else {
        output::report_now_on_air(&list);
    }
    output::report_credit();
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if config loading or subcommand execution fails.
fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();

    let config_path = resolve_config_path(cli.dir.as_ref()).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let client = build_client(&cli, &config)?;
    let ctx = RunContext {
        version: cli
            .api_version
            .clone()
            .unwrap_or_else(|| config.api.version.clone()),
        area: config.defaults.area.clone(),
        service: config.defaults.service.clone(),
        json: cli.json,
    };

    match &cli.command {
        Commands::List(args) => run_list(&client, &ctx, args),
        Commands::Genre(args) => run_genre(&client, &ctx, args),
        Commands::Info(args) => run_info(&client, &ctx, args),
        Commands::Now(args) => run_now(&client, &ctx, args),
    }
}
