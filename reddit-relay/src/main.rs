use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use reddit_relay::publishers::twitter;
use reddit_relay::sources::reddit;
use reddit_relay::{
    DryRunPublisher, FetchConfig, Fetcher, Publisher, RedditSource, Relay, RelayConfig, TwitterPublisher,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Relay popular subreddit posts to X.
#[derive(Parser)]
#[command(name = "reddit-relay")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log instead of publishing
    #[arg(long, global = true, env = "RELAY_DRY_RUN")]
    dry_run: bool,

    #[command(flatten)]
    options: RelayOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll and publish forever
    Run,
    /// Run a single cycle (for cron use)
    Once,
    /// Print what the next cycle would publish, without publishing or saving state
    Preview,
}

#[derive(Args)]
pub struct RelayOptions {
    /// Subreddit to relay
    #[arg(long, global = true, env = "RELAY_CATEGORY", default_value = "aww")]
    category: String,

    /// Hashtag appended to every status (defaults to the subreddit name)
    #[arg(long, global = true, env = "RELAY_TAG")]
    tag: Option<String>,

    /// Posts fetched per cycle
    #[arg(long, global = true, env = "RELAY_BATCH_SIZE", default_value = "5")]
    batch_size: usize,

    /// Seconds between two published posts
    #[arg(long, global = true, env = "RELAY_POST_DELAY", default_value = "60")]
    post_delay: u64,

    /// Seconds between two cycles
    #[arg(long, global = true, env = "RELAY_CYCLE_DELAY", default_value = "3600")]
    cycle_delay: u64,

    /// Seconds between a media upload and the status that uses it
    #[arg(long, global = true, env = "RELAY_MEDIA_DELAY", default_value = "2")]
    media_delay: u64,

    /// Forwarded ids kept before trimming
    #[arg(long, global = true, env = "RELAY_DEDUP_MAX", default_value = "100")]
    dedup_max: usize,

    /// Forwarded ids left after trimming
    #[arg(long, global = true, env = "RELAY_DEDUP_RETAIN", default_value = "50")]
    dedup_retain: usize,

    /// Maximum status length in characters
    #[arg(long, global = true, env = "RELAY_MAX_LENGTH", default_value = "280")]
    max_length: usize,

    /// Hosts whose links render inline previews (comma separated)
    #[arg(long, global = true, env = "RELAY_EMBED_HOSTS", value_delimiter = ',', default_value = "imgur,gfycat")]
    embed_hosts: Vec<String>,

    /// JPEG quality for re-encoded uploads
    #[arg(long, global = true, env = "RELAY_JPEG_QUALITY", default_value = "90")]
    jpeg_quality: u8,

    /// File holding forwarded ids, one per line
    #[arg(long, global = true, env = "RELAY_DEDUP_PATH", default_value = "forwarded.txt")]
    dedup_path: PathBuf,

    /// User agent sent to Reddit
    #[arg(long, global = true, env = "REDDIT_USER_AGENT", default_value = "reddit-relay/0.1")]
    user_agent: String,

    #[arg(long, global = true, env = "REDDIT_BASE_URL", default_value = reddit::DEFAULT_BASE_URL)]
    reddit_base_url: String,

    #[arg(long, global = true, env = "TWITTER_BASE_URL", default_value = twitter::DEFAULT_BASE_URL)]
    twitter_base_url: String,

    /// User-context OAuth 2.0 token for the X API
    #[arg(long, global = true, env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
    bearer_token: Option<String>,
}

impl RelayOptions {
    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            category: self.category.clone(),
            tag: self.tag.clone().unwrap_or_else(|| self.category.clone()),
            batch_size: self.batch_size,
            post_delay_seconds: self.post_delay,
            cycle_delay_seconds: self.cycle_delay,
            media_delay_seconds: self.media_delay,
            dedup_max_size: self.dedup_max,
            dedup_retain: self.dedup_retain,
            max_text_length: self.max_length,
            embed_hosts: self.embed_hosts.iter().map(|h| h.trim().to_string()).filter(|h| !h.is_empty()).collect(),
            jpeg_quality: self.jpeg_quality,
            dedup_path: self.dedup_path.clone(),
        }
    }

    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.clone(),
            ..FetchConfig::default()
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
}

fn build_publisher(cli: &Cli) -> Result<Arc<dyn Publisher>> {
    if cli.dry_run || matches!(cli.command, Commands::Preview) {
        return Ok(Arc::new(DryRunPublisher::new()));
    }
    let token = cli
        .options
        .bearer_token
        .clone()
        .context("TWITTER_BEARER_TOKEN is required unless --dry-run is set")?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FetchConfig::default().timeout_seconds))
        .build()
        .context("Failed to build X API client")?;
    Ok(Arc::new(TwitterPublisher::with_base_url(
        client,
        token,
        cli.options.twitter_base_url.clone(),
    )))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let fetcher = Fetcher::new(cli.options.fetch_config()).context("Failed to build HTTP client")?;
    let source = Arc::new(RedditSource::with_base_url(
        fetcher.clone(),
        cli.options.reddit_base_url.clone(),
    ));
    let publisher = build_publisher(&cli)?;
    let relay = Relay::new(cli.options.relay_config(), source, publisher, fetcher)
        .context("Invalid relay configuration")?;

    match cli.command {
        Commands::Run => {
            tokio::select! {
                result = relay.run() => result.context("Relay stopped")?,
                _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
            }
        }
        Commands::Once => {
            let report = relay.run_cycle().await.context("Cycle failed")?;
            for failure in &report.failures {
                error!("{}", failure);
            }
            info!(
                "Published {} of {} selected posts",
                report.published.len(),
                report.selected
            );
        }
        Commands::Preview => {
            for (post, text) in relay.preview().await.context("Preview failed")? {
                match text {
                    Ok(text) => println!("{}\t{}", post.id, text),
                    Err(e) => println!("{}\t<skipped: {}>", post.id, e),
                }
            }
        }
    }

    Ok(())
}
