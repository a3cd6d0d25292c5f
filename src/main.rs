use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_combine::{
    config::{Config, defaults},
    errors::AppError,
    services::CombineService,
    sources,
};

#[derive(Parser)]
#[command(name = "m3u-combine")]
#[command(version)]
#[command(about = "Combine multiple M3U playlists into one")]
#[command(long_about = None)]
struct Cli {
    /// Source URLs or paths; overrides the link list file and environment
    links: Vec<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Input file with M3U links, one per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Output M3U file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Disable deduplication of stream URLs
    #[arg(long)]
    no_dedupe: bool,

    /// Group output by group-title, sorted
    #[arg(short, long)]
    group: bool,

    /// Display name of an entry to pin to the front
    #[arg(long, value_name = "NAME")]
    pin: Option<String>,

    /// Append catchup-days=7 to HTTP(S) stream URLs
    #[arg(long)]
    catchup: bool,

    /// Fold #EXTVLCOPT/#EXTHTTP directives into the stream URL
    #[arg(long)]
    fold_headers: bool,

    /// Discard URL lines that have no #EXTINF metadata
    #[arg(long)]
    no_bare_urls: bool,

    /// HTTP fetch timeout (e.g. 10s, 1m)
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    timeout: Option<std::time::Duration>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(input) = &cli.input {
        config.sources.input_file = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output.file = output.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.sources.fetch_timeout = timeout;
    }
    if cli.no_dedupe {
        config.merge.dedupe = false;
    }
    if cli.group {
        config.merge.group = true;
    }
    if let Some(pin) = &cli.pin {
        config.merge.pin = Some(pin.clone());
    }
    if cli.catchup {
        config.annotate.catchup = true;
    }
    if cli.fold_headers {
        config.annotate.fold_headers = true;
    }
    if cli.no_bare_urls {
        config.merge.accept_bare_urls = false;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("m3u_combine={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load_from_file(&cli.config)?;
    apply_overrides(&mut config, &cli);

    let links =
        sources::resolve_links(&cli.links, &config.sources.input_file).map_err(AppError::Source)?;
    if links.is_empty() {
        anyhow::bail!(
            "no source links given (set {}, pass links as arguments, or fill {})",
            defaults::LINKS_ENV_VAR,
            config.sources.input_file
        );
    }

    let summary = CombineService::new(config).run(&links).await?;
    if !summary.output_written {
        tracing::warn!(
            "{} of {} source(s) failed; nothing to write",
            summary.sources_failed,
            links.len()
        );
    }

    Ok(())
}
