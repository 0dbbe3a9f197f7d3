use std::sync::Arc;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wander_app::{AppState, Command};
use wander_store::{Config, MemoryOfferStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Loading catalog from {}", config.catalog.fixture_path);
    let store = MemoryOfferStore::from_fixture(&config.catalog.fixture_path)
        .await
        .context("Failed to load catalog fixture")?;

    let mut state = AppState::new(config.triage.clone(), Arc::new(store));
    let mut events = state.session.subscribe();

    match state.dispatch(Command::Refresh, Instant::now()).await {
        Ok(out) => println!("{}", out),
        Err(e) => println!("error: {}", e.user_message()),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let debouncer = state.session.debouncer().clone();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("error: {}", e.user_message());
                        continue;
                    }
                };
                let quit = command == Command::Quit;
                match state.dispatch(command, Instant::now()).await {
                    Ok(out) => println!("{}", out),
                    Err(e) => println!("error: {}", e.user_message()),
                }
                if quit {
                    break;
                }
            }
            _ = debouncer.settled() => {
                match state.settle(Instant::now()).await {
                    Ok(Some(out)) => println!("{}", out),
                    Ok(None) => {}
                    Err(e) => println!("error: {}", e.user_message()),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => tracing::debug!(?event, "Session event"),
                    Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "Event log lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::info!("Session ended");
    Ok(())
}
