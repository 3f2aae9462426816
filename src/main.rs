//! Suspense Cache demo
//!
//! Renders a list of Pokemon names through the resource cache, the way a
//! suspense-aware UI would: request, poll, show a fallback, then render.

use std::env;

use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use suspense_cache::fetcher::{fetch_pokemon, FetchError};
use suspense_cache::models::Pokemon;
use suspense_cache::{render_until_settled, Config, RenderOutcome, ResourceCache};

const DEFAULT_NAMES: &[&str] = &["pikachu", "Pikachu", "mew", "missingno", "PIKACHU"];

/// Main entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the resource cache on the current runtime
/// 4. Run one render loop per requested name
/// 5. Print a snapshot of the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suspense_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}ms, poll_interval={}ms, render_timeout={}ms, fetch_latency={}ms",
        config.default_ttl_ms, config.poll_interval_ms, config.render_timeout_ms, config.fetch_latency_ms
    );

    let cache: ResourceCache<Pokemon, FetchError> = ResourceCache::from_config(&config, Handle::current());

    let mut names: Vec<String> = env::args().skip(1).collect();
    if names.is_empty() {
        names = DEFAULT_NAMES.iter().map(|n| n.to_string()).collect();
    }

    for name in &names {
        let latency = config.fetch_latency();
        let resource = cache.get(name, || fetch_pokemon(name.to_lowercase(), latency))?;

        let outcome = render_until_settled(
            &resource,
            config.poll_interval(),
            config.render_timeout(),
            Pokemon::summary,
        )
        .await;

        match outcome {
            RenderOutcome::Rendered(view) => info!(name = %name, "Rendered {}", view),
            RenderOutcome::Failed(error) => warn!(name = %name, error = %error, "Render failed"),
            RenderOutcome::TimedOut => warn!(name = %name, "Still loading, gave up rendering"),
        }
    }

    let snapshot = cache.snapshot();
    info!("Cache snapshot:\n{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
