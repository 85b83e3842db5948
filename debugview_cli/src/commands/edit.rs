//! Key/value mutations (add, update, delete)

use crate::client::DebugClient;
use crate::config::Config;
use anyhow::{bail, Result};
use console::style;
use debugview_common::MutationResponse;

/// Which mutation to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Update,
    Delete,
}

/// Send one mutation and report the server's answer
pub async fn run(
    config: &Config,
    mutation: Mutation,
    db: &str,
    key: &str,
    value: Option<&str>,
) -> Result<()> {
    if key.is_empty() {
        bail!("Key must not be empty");
    }

    let client = DebugClient::from_config(config)?;
    let value = value.unwrap_or_default();

    let response = match mutation {
        Mutation::Add => client.add(db, key, value).await?,
        Mutation::Update => client.update(db, key, value).await?,
        Mutation::Delete => client.delete(db, key).await?,
    };

    report(db, key, &response)
}

fn report(db: &str, key: &str, response: &MutationResponse) -> Result<()> {
    if !response.success {
        bail!("{}", response.message);
    }

    println!(
        "{} {} {}",
        style("✓").green().bold(),
        response.message,
        style(format!("({}/{})", db, key)).dim()
    );
    Ok(())
}
