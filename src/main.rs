//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `link_resolver` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - One-shot resolution of URLs given on the command line, or serving HTTP
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;

use link_resolver::initialization::init_logger_with;
use link_resolver::{start_server, Config, Resolver, ServerState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if config.urls.is_empty() {
        let state = ServerState::from_config(&config).context("Failed to initialize server")?;
        return start_server(&config.listen, state).await;
    }

    let resolver = Resolver::from_config(&config).context("Failed to initialize resolver")?;
    let mut failures = 0usize;
    for url in &config.urls {
        let line = match resolver.resolve(url).await {
            Ok(result) => serde_json::to_string(&result)?,
            Err(e) => {
                failures += 1;
                serde_json::json!({ "original_url": url, "error": e.to_string() }).to_string()
            }
        };
        println!("{line}");
    }

    if failures > 0 {
        eprintln!(
            "link_resolver: {} of {} URL{} failed",
            failures,
            config.urls.len(),
            if config.urls.len() == 1 { "" } else { "s" }
        );
        std::process::exit(1);
    }
    Ok(())
}
