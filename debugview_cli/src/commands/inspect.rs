//! One-shot listing commands (dbs, tables, show)

use crate::client::DebugClient;
use crate::config::Config;
use crate::viewer::{Controller, DatabaseList, Msg};
use anyhow::{bail, Result};
use console::style;
use debugview_common::constants::NO_ENTRIES;
use debugview_common::render::table_html;
use std::sync::Arc;

/// List databases
pub async fn databases(config: &Config) -> Result<()> {
    let client = DebugClient::from_config(config)?;
    let databases = client.databases().await?;

    if databases.is_empty() {
        println!("No databases found.");
        return Ok(());
    }

    println!("{:<40} {:<16}", "NAME", "TYPE");
    println!("{}", "-".repeat(56));
    for db in databases {
        println!("{:<40} {:<16}", db.name, db.db_type);
    }

    Ok(())
}

/// List the tables of a database
pub async fn tables(config: &Config, db: &str) -> Result<()> {
    let client = DebugClient::from_config(config)?;
    let tables = client.tables(db).await?;

    if tables.is_empty() {
        println!("{} has no tables.", style(db).cyan());
        return Ok(());
    }

    for table in tables {
        println!("{}", table);
    }

    Ok(())
}

/// Options for `show`
pub struct ShowOptions {
    pub db: String,
    pub table: Option<String>,
    pub search: Option<String>,
    pub html: bool,
}

/// Load one table through the viewer and print it
pub async fn show(config: &Config, opts: ShowOptions) -> Result<()> {
    let client = DebugClient::from_config(config)?;
    let mut controller = Controller::new(Arc::new(client));

    controller.dispatch(Msg::Startup);
    controller.settle().await;

    if let DatabaseList::Failed(reason) = &controller.state().databases {
        bail!("Failed to fetch database list: {}", reason);
    }
    if !controller
        .state()
        .database_list()
        .iter()
        .any(|d| d.name == opts.db)
    {
        bail!("Database not found: {}", opts.db);
    }

    controller.dispatch(Msg::SelectDatabase(opts.db.clone()));
    controller.settle().await;

    if let Some(table) = opts.table {
        if !controller.state().tables.contains(&table) {
            bail!("Table not found: {}.{}", opts.db, table);
        }
        if controller.state().current_table.as_deref() != Some(table.as_str()) {
            controller.dispatch(Msg::SelectTable(table));
            controller.settle().await;
        }
    }

    if let Some(term) = opts.search {
        controller.dispatch(Msg::SearchChanged(term));
    }

    let state = controller.state();
    let rows = state.visible_rows();

    if opts.html {
        println!("{}", table_html(state.headers(), &rows));
    } else if state.headers().is_empty() {
        println!("{} has no tables.", style(&opts.db).cyan());
    } else {
        print!("{}", format_table(state.headers(), &rows));
    }

    Ok(())
}

/// Plain-text table with columns padded to their widest cell
pub fn format_table(headers: &[String], rows: &[&[String]]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers);
    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"-".repeat(rule));
    out.push('\n');

    if rows.is_empty() {
        out.push_str(NO_ENTRIES);
        out.push('\n');
        return out;
    }

    for row in rows {
        out.push_str(&line(*row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_format_table_pads_columns() {
        let headers = strings(&["Key", "Value"]);
        let a = strings(&["theme", "dark"]);
        let b = strings(&["lang", "en"]);
        let out = format_table(&headers, &[a.as_slice(), b.as_slice()]);
        assert_eq!(
            out,
            "Key    Value\n------------\ntheme  dark\nlang   en\n"
        );
    }

    #[test]
    fn test_format_table_placeholder() {
        let headers = strings(&["id", "name"]);
        let out = format_table(&headers, &[]);
        assert!(out.ends_with("No entries found\n"));
    }
}
