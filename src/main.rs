use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lootwatch::{
    AppConfig, Dispatcher, EpicGamesClient, HeadlessRenderer, Invocation, PrimeGamingClient,
    Reply, SnapshotStore, SourceId,
};

#[derive(Parser)]
#[command(name = "lootwatch")]
#[command(about = "Watch and announce free game promotions from Epic Games and Prime Gaming")]
#[command(version)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Storefront to check (epic or prime)
    source: Option<String>,

    /// Fetch from the storefront and refresh the cache before replying
    #[arg(short, long)]
    fetch: bool,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List cached snapshots
    #[arg(long)]
    list_cache: bool,

    /// Clear all cached snapshots
    #[arg(long)]
    clear_cache: bool,

    /// Show cache info
    #[arg(long)]
    cache_info: bool,

    /// Remove one source's snapshot from cache
    #[arg(long, value_name = "SOURCE")]
    uncache: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Handle cache operations first
    if cli.list_cache {
        return list_cache();
    }
    if cli.clear_cache {
        return clear_cache();
    }
    if cli.cache_info {
        return cache_info();
    }
    if let Some(source) = &cli.uncache {
        return uncache_source(source);
    }

    // Default: check a storefront and print the reply
    if let Some(source) = &cli.source {
        return check_source(source, cli.fetch, cli.config.as_deref()).await;
    }

    Ok(())
}

/// Parse a source identifier or bail with the valid options
fn parse_source(source: &str) -> Result<SourceId> {
    SourceId::parse(source)
        .ok_or_else(|| anyhow::anyhow!("Unknown source '{}'. Use 'epic' or 'prime'.", source))
}

/// Run the pipeline for one storefront and print the reply to stdout
///
/// This is the dry-run transport: a real chat integration would deliver
/// the same `Reply` values through its own session instead
async fn check_source(source: &str, force: bool, config_file: Option<&std::path::Path>) -> Result<()> {
    let source = parse_source(source)?;
    let config = AppConfig::load(config_file)?;
    let store = SnapshotStore::new()?;

    let invocation = Invocation {
        source,
        style: config.style(source),
        force,
    };

    let reply = match source {
        SourceId::Epic => {
            let client = EpicGamesClient::new(&config.country)?;
            let dispatcher = Dispatcher::new(config, store);
            dispatcher.handle(invocation, &client).await
        }
        SourceId::Prime => {
            let renderer = HeadlessRenderer::new().await?;
            let client =
                PrimeGamingClient::new(renderer, Duration::from_secs(config.settle_delay_secs));
            let dispatcher = Dispatcher::new(config, store);
            dispatcher.handle(invocation, &client).await
        }
    };

    print_reply(&reply);
    Ok(())
}

/// Print a reply the way a chat transport would deliver it
fn print_reply(reply: &Reply) {
    match reply {
        Reply::Notice(notice) => println!("{}", notice),
        Reply::Embeds(embeds) => {
            for embed in embeds {
                println!("{}", embed.title);
                if let Some(url) = &embed.url {
                    println!("  {}", url);
                }
                for field in &embed.fields {
                    println!("  {}: {}", field.name, field.value);
                }
                if let Some(image) = &embed.image_url {
                    println!("  [image] {}", image);
                }
                println!();
            }
        }
    }
}

/// List cached snapshots with their age
fn list_cache() -> Result<()> {
    let store = SnapshotStore::new()?;
    let cached = store.list_cached();

    if cached.is_empty() {
        println!("Cache is empty");
        return Ok(());
    }

    println!("Cached snapshots ({}):\n", cached.len());

    for source in cached {
        match store.load(source) {
            Ok(Some(snapshot)) => println!(
                "{:<14}  {} offers, fetched {}",
                source.name(),
                snapshot.offers.len(),
                snapshot.timestamp.format("%Y-%m-%d %H:%M UTC")
            ),
            Ok(None) => {}
            Err(_) => println!("{:<14}  (unreadable)", source.name()),
        }
    }

    Ok(())
}

/// Clear all cached snapshots
fn clear_cache() -> Result<()> {
    let store = SnapshotStore::new()?;
    store.clear()?;
    println!("Cache cleared");
    Ok(())
}

/// Show cache info
fn cache_info() -> Result<()> {
    let store = SnapshotStore::new()?;
    let path = store.cache_dir();
    let cached = store.list_cached();

    println!("Cache directory: {}", path.display());
    println!("Cached snapshots: {}", cached.len());

    // Calculate total size
    if let Ok(entries) = std::fs::read_dir(path) {
        let total_size: u64 = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum();

        let size_str = if total_size < 1024 {
            format!("{} B", total_size)
        } else {
            format!("{:.1} KB", total_size as f64 / 1024.0)
        };

        println!("Total size: {}", size_str);
    }

    Ok(())
}

/// Remove one source's snapshot from cache
fn uncache_source(source: &str) -> Result<()> {
    let store = SnapshotStore::new()?;
    let source = parse_source(source)?;

    if store.remove(source)? {
        println!("Removed {} from cache", source);
    } else {
        println!("{} was not in cache", source);
    }

    Ok(())
}
