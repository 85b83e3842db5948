//! Config and browser commands

use crate::client::DebugClient;
use crate::config::{config_file, Config};
use anyhow::{Context, Result};
use console::style;

/// Show the effective config, or persist new values
pub async fn run(config: Config, server: Option<String>, timeout: Option<u64>) -> Result<()> {
    if server.is_none() && timeout.is_none() {
        println!("{} {}", style("Config file:").dim(), config_file().display());
        println!("{} {}", style("Server:").dim(), style(config.base_url()).cyan());
        println!("{} {}s", style("Timeout:").dim(), config.timeout_secs);
        return Ok(());
    }

    let mut config = config.with_server(server);
    if let Some(timeout) = timeout {
        config.timeout_secs = timeout;
    }
    config.save()?;

    println!("{} Saved {}", style("✓").green().bold(), config_file().display());
    Ok(())
}

/// Open the server-rendered viewer in the default browser
pub async fn web(config: &Config) -> Result<()> {
    let client = DebugClient::from_config(config)?;
    let health = client
        .health()
        .await
        .with_context(|| format!("No debug server reachable at {}", client.base_url()))?;
    tracing::debug!("Connected to {} {}", health.service, health.version);

    let url = format!("{}/", client.base_url());
    println!("Opening {}", style(&url).cyan().underlined());
    open::that(&url).context("Failed to open browser")?;
    Ok(())
}
