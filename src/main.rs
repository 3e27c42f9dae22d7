use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tweetfeed::config::{Config, BEARER_TOKEN_ENV};
use tweetfeed::feed::AtomRenderer;
use tweetfeed::links::{DomainBlacklist, ReqwestProbe, Resolver};
use tweetfeed::pipeline::{FeedRequest, FilterOrder, LinkPipeline};
use tweetfeed::source::{HttpPostSource, Resource};

/// Get the config directory path (~/.config/tweetfeed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("tweetfeed"))
}

/// Parses a `KEY=VALUE` pair for `--param`.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "tweetfeed",
    version,
    about = "Atom feed of the links shared in tweets"
)]
struct Args {
    /// Config file (default: ~/.config/tweetfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resolve shortened links to their final destination
    #[arg(long)]
    unshorten: bool,

    /// Number of tweets to request
    #[arg(long, value_name = "N")]
    count: Option<u32>,

    /// Extra API parameter, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Drop links to this host, repeatable (added to the config blacklist)
    #[arg(long = "blacklist", value_name = "HOST")]
    blacklist: Vec<String>,

    /// When to apply the blacklist: before_resolution, after_resolution or both
    #[arg(long, value_name = "ORDER")]
    filter_order: Option<FilterOrder>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tweets matching a search query
    Search { query: String },
    /// Tweets from a list
    List { owner: String, slug: String },
    /// Home timeline, or a user's tweets with --user
    Timeline {
        #[arg(long, value_name = "NAME")]
        user: Option<String>,
    },
    /// Tweets mentioning the authenticated user
    Mentions,
}

impl From<Command> for Resource {
    fn from(command: Command) -> Self {
        match command {
            Command::Search { query } => Resource::Search { query },
            Command::List { owner, slug } => Resource::List { owner, slug },
            Command::Timeline { user: Some(user) } => Resource::UserTimeline { user },
            Command::Timeline { user: None } => Resource::HomeTimeline,
            Command::Mentions => Resource::Mentions,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the feed, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let settings = config
        .resolver_settings()
        .context("Invalid resolver configuration")?;

    let mut params = args.params;
    if let Some(count) = args.count {
        params.push(("count".to_string(), count.to_string()));
    }
    let request = FeedRequest::new(args.command.into(), params);
    let unshorten = request.unshorten || args.unshorten || config.unshorten_links;
    let request = request.with_unshorten(unshorten);

    let client = reqwest::Client::builder()
        .user_agent(config.resolver.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;
    let mut source = HttpPostSource::new(client, config.api_base_url.clone());
    match config.effective_bearer_token() {
        Some(token) => source = source.with_bearer_token(SecretString::from(token)),
        None => tracing::warn!(
            env = BEARER_TOKEN_ENV,
            "No bearer token configured, requests will likely be rejected"
        ),
    }

    let hosts = config.blacklist.iter().chain(args.blacklist.iter());
    let mut pipeline = LinkPipeline::new(Arc::new(source))
        .with_blacklist(DomainBlacklist::new(hosts))
        .with_filter_order(args.filter_order.unwrap_or(config.filter_order));

    if request.unshorten {
        let probe = ReqwestProbe::new(
            config.resolver.max_redirects,
            config.resolver.allow_private_hosts,
        )
        .context("Failed to build link resolver")?;
        pipeline = pipeline.with_resolver(Resolver::new(Arc::new(probe), settings));
    }

    tracing::info!(resource = %request.resource, unshorten = request.unshorten, "Building feed");
    let xml = pipeline
        .render(&request, &AtomRenderer)
        .await
        .context("Failed to render feed")?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(xml.as_bytes())
        .and_then(|()| stdout.write_all(b"\n"))
        .and_then(|()| stdout.flush())
        .context("Failed to write feed to stdout")?;
    Ok(())
}
