//! sakha: Krishi Sakha command-line tool
//!
//! Ask questions through the offline cache, try demo matching, and inspect
//! or maintain the cache file.

use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::info;

use krishi_sakha::config::Config;
use krishi_sakha::demo::reference;
use krishi_sakha::{
    DemoMatcher, FileStorage, HttpAdviceBackend, OfflineAdvisor, ResponseCache, TopicTable,
};

/// Krishi Sakha command-line tool
#[derive(Parser)]
#[command(name = "sakha")]
#[command(about = "Farm advice with offline cache and demo answers")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question (cache, then backend, then demo answers)
    Ask {
        /// The question
        query: String,
        /// Language tag of the question
        #[arg(short, long, default_value = "en")]
        lang: String,
    },

    /// Look up a demo answer without touching the cache or backend
    Demo {
        /// The question
        query: String,
    },

    /// Show cache statistics
    Stats,

    /// Remove expired cache entries
    Cleanup,

    /// Remove all cache entries
    Clear,
}

/// Command definition with the build's full version (package, branch, sha).
fn cli() -> clap::Command {
    Args::command().version(krishi_sakha::version_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::from_arg_matches(&cli().get_matches()).unwrap_or_else(|e| e.exit());
    let config = Config::load(args.config.as_deref())?;

    let storage = Arc::new(FileStorage::new(config.cache_path()));
    let cache = ResponseCache::new(storage, config.cache_config());
    let matcher = DemoMatcher::new(
        reference::builtin_entries(),
        TopicTable::builtin(),
        config.matcher_config(),
    );

    info!(version = krishi_sakha::version_string(), "sakha starting");

    match args.command {
        Command::Ask { query, lang } => {
            let advisor = build_advisor(&config, cache, matcher)?;
            let advice = advisor.ask(&query, &lang).await?;
            println!("{}", advice.response.advice);
            if !advice.response.explanation.is_empty() {
                println!("\n{}", advice.response.explanation);
            }
            match advice.confidence {
                Some(c) => println!("\n[{}; confidence {c:.2}]", advice.source.as_str()),
                None => println!("\n[{}]", advice.source.as_str()),
            }
            for source in &advice.response.sources {
                println!("  source: {source}");
            }
        }

        Command::Demo { query } => match matcher.find_matching_question(&query) {
            Some(m) => {
                println!("{}", m.entry.answer);
                println!(
                    "\n[matched \"{}\" ({}); similarity {:.2}]",
                    m.entry.question, m.entry.language, m.similarity
                );
            }
            None => println!("no demo answer matched"),
        },

        Command::Stats => {
            let stats = cache.cache_stats();
            println!("entries:      {}", stats.total_responses);
            println!("size:         {}", stats.cache_size);
            match stats.last_updated {
                Some(t) => println!("last updated: {}", t.to_rfc3339()),
                None => println!("last updated: never"),
            }
        }

        Command::Cleanup => {
            let removed = cache.cleanup_cache();
            println!("removed {removed} expired entries");
        }

        Command::Clear => {
            cache.clear_cache();
            println!("cache cleared");
        }
    }

    Ok(())
}

/// Build an [`OfflineAdvisor`] from configuration.
fn build_advisor(
    config: &Config,
    cache: ResponseCache,
    matcher: DemoMatcher,
) -> Result<OfflineAdvisor, krishi_sakha::SakhaError> {
    let mut builder = OfflineAdvisor::builder()
        .cache(cache)
        .matcher(matcher)
        .demo_mode(config.demo.enabled)
        .demo_fallback(config.demo.fallback)
        .request_timeout(config.request_timeout());

    if let Some(ref base_url) = config.backend.base_url {
        let mut backend = HttpAdviceBackend::with_timeout(base_url, config.request_timeout())?;
        if let Some(key) = Config::api_key() {
            backend = backend.api_key(key);
        }
        builder = builder.backend(Arc::new(backend));
    }

    builder.build()
}
