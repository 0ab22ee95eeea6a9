//! Terminal front-end for store search.
//!
//! Reads lines from stdin: each plain line replaces the search term,
//! `:scope <names>` switches categories, `:quit` exits. Snapshots are
//! printed to stdout as they arrive; diagnostics go to stderr.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use store_search::Scope;
use storefront::{Ending, OutputFormat, Presenter, Session, StorefrontConfig, read_inputs};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Search the store catalogue as you type.
#[derive(Parser)]
#[command(name = "storefront", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial scope (all, movies, music, apps, books).
    #[arg(short, long)]
    scope: Option<Scope>,

    /// Print snapshots as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout carries results only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront=info,store_search=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = StorefrontConfig::load(cli.config.as_deref())?;
    if let Some(scope) = cli.scope {
        config.scope = scope;
    }
    if cli.json {
        config.format = OutputFormat::Json;
    }

    run(config).await
}

async fn run(config: StorefrontConfig) -> anyhow::Result<()> {
    let aggregator = store_search::itunes_aggregator(&config.search)?;
    let mut snapshots = aggregator.subscribe_channel();

    let format = config.format;
    let printer = tokio::spawn(async move {
        let mut presenter = Presenter::new(std::io::stdout(), format);
        while let Some(snapshot) = snapshots.recv().await {
            if let Err(e) = presenter.show(&snapshot) {
                warn!(error = %e, "failed to print results");
                break;
            }
        }
        presenter.shown()
    });

    info!(scope = %config.scope, "storefront ready, type to search");
    let mut session = Session::new(config.scope);
    let stdin = BufReader::new(tokio::io::stdin());
    let ending = tokio::select! {
        _ = tokio::signal::ctrl_c() => Ending::Quit,
        ending = read_inputs(stdin, &mut session, |query| aggregator.on_query(query)) => ending?,
    };

    if ending == Ending::Eof {
        // Stdin closed: let the last query settle before tearing down.
        let grace =
            config.search.debounce() + config.search.timeout() + Duration::from_millis(100);
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            () = aggregator.settled() => {}
            () = tokio::time::sleep(grace) => {}
        }
    }

    aggregator.cancel_all();
    drop(aggregator);

    let shown = printer.await?;
    info!(shown, "storefront shut down cleanly");
    Ok(())
}
