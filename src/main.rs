mod api;
mod app;
mod config;
mod error;
mod models;
mod nav;
mod open_url;
mod page;
mod render;
mod session;
mod shell;
mod ui;
mod util;

use anyhow::{Context, Result};
use console::Term;
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse a minimal CLI: optional --config <path>, --api-url <url>
    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    let mut api_url_override: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_override = args.next(),
            "--api-url" => api_url_override = args.next(),
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            other => {
                eprintln!("unknown argument: {other}");
                print_help();
                return Ok(());
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cfg = config::load(config_override, api_url_override)?;
    let client = api::ApiClient::new(&cfg.api_url, Duration::from_secs(cfg.timeout_secs))
        .with_context(|| format!("invalid api url: {}", cfg.api_url))?;
    let store = session::SessionStore::new(cfg.session_file.clone());

    // Clear terminal at startup for a clean UI
    let _ = Term::stdout().clear_screen();
    println!("Loading stories from {} ...", cfg.api_url);

    let mut app = app::App::new(client, store);
    app.start().await?;
    shell::run(&cfg, &mut app).await
}

fn print_help() {
    println!("snooze-cli");
    println!("Usage: snooze-cli [--config <path>] [--api-url <url>]");
    println!("  --config <path>   Path to a config.toml");
    println!("  --api-url <url>   Stories backend to talk to (default {})", config::DEFAULT_API_URL);
    println!("Set RUST_LOG=debug to trace requests on stderr.");
}
