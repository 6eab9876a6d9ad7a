mod args;
mod commands;
mod output;

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use kaiviz_console::{Console, ConsoleConfig, HttpVisualizerApi, Route};

use crate::args::Args;
use crate::commands::Outcome;
use crate::output::print_view;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let otel_provider = kaiviz_common::telemetry::init_tracing(
        "kaiviz",
        args.otlp_url.as_deref(),
        args.otlp_token.as_deref(),
        &args.log_format,
    );

    let result = run(&args).await;

    if let Some(provider) = otel_provider {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "failed to flush traces");
        }
    }
    result
}

async fn run(args: &Args) -> Result<()> {
    let http = HttpVisualizerApi::build_client(
        Duration::from_secs(args.connect_timeout_secs),
        Duration::from_secs(args.request_timeout_secs),
    )?;
    let config = ConsoleConfig {
        refresh_interval: Duration::from_millis(args.interval_ms),
        namespace: args.namespace.clone(),
        page_size: args.page_size,
        error_clear: Duration::from_millis(args.error_clear_ms),
    };
    let console = Console::connect(config, http, &args.api_url);
    tracing::info!(api_url = %args.api_url, view = %args.view, "connecting to visualizer API");

    let mut view = console.open(&Route::parse(&args.view));

    if args.once {
        let deadline = Duration::from_secs(args.connect_timeout_secs + args.request_timeout_secs);
        tokio::time::timeout(deadline, async {
            while view.changed().await {
                if !view.loading() {
                    break;
                }
            }
        })
        .await
        .map_err(|_| anyhow!("no response from {} within {:?}", args.api_url, deadline))?;
        print_view(&console, &view);
        return match console.errors().current() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        };
    }

    let mut errors = console.errors().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("type 'help' for commands");
    loop {
        tokio::select! {
            alive = view.changed() => {
                if !alive {
                    tracing::warn!(view = view.name(), "view pipeline stopped");
                    break;
                }
                if !view.loading() {
                    print_view(&console, &view);
                }
            }
            changed = errors.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(message) = errors.borrow_and_update().clone() {
                    eprintln!("! {message}");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match commands::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{e}");
                        continue;
                    }
                };
                match commands::apply(&console, &mut view, command) {
                    Outcome::Quit => break,
                    Outcome::Navigate(route) => {
                        view = console.open(&route);
                        print_view(&console, &view);
                    }
                    Outcome::Render => print_view(&console, &view),
                    Outcome::Ignored => {}
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
        }
    }
    Ok(())
}
