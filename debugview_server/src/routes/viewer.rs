//! Server-rendered browser viewer
//!
//! Walks the same flow as the terminal viewer: pick a database (the first
//! one unless `db` names another), pick a table the same way, load it, and
//! filter by `q`. Store failures degrade to empty lists instead of errors.

use super::AppState;
use crate::html::{render_page, Page};
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use debugview_common::{
    adapter::Adapter,
    render::{connection_failed_html, database_list_html, table_html, table_list_html},
    DataPayload,
};
use serde::Deserialize;

/// Build the viewer router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_viewer))
        .route("/index.html", get(serve_viewer))
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewerQuery {
    db: Option<String>,
    table: Option<String>,
    #[serde(default)]
    q: String,
}

async fn serve_viewer(
    State(state): State<AppState>,
    Query(query): Query<ViewerQuery>,
) -> Html<String> {
    let databases = match state.store.databases().await {
        Ok(dbs) => dbs,
        Err(e) => {
            tracing::error!("Failed to list databases: {}", e);
            return Html(render_page(&Page {
                app_name: &state.config.app_name,
                database_items: connection_failed_html(),
                table_items: String::new(),
                table: String::new(),
                db: None,
                table_name: None,
                search: &query.q,
                summary: String::new(),
            }));
        }
    };

    let selected = query
        .db
        .as_deref()
        .and_then(|name| databases.iter().find(|d| d.name == name))
        .or_else(|| databases.first());

    let Some(selected) = selected else {
        return Html(render_page(&Page {
            app_name: &state.config.app_name,
            database_items: database_list_html(&databases, None),
            table_items: String::new(),
            table: String::new(),
            db: None,
            table_name: None,
            search: &query.q,
            summary: String::new(),
        }));
    };

    let tables = state.store.tables(&selected.name).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to list tables of {}: {}", selected.name, e);
        Vec::new()
    });

    let table = query
        .table
        .as_deref()
        .and_then(|name| tables.iter().find(|t| t.as_str() == name))
        .or_else(|| tables.first());

    let (rendered, summary) = match table {
        Some(table) => {
            let payload = state
                .store
                .all_data(&selected.name, table)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to load {}.{}: {}", selected.name, table, e);
                    DataPayload::empty()
                });
            let adapter = Adapter::for_database(&selected.db_type, &payload);
            let rows = adapter.filter(&query.q);
            let summary = format!(
                "{} · {} of {} rows",
                selected.db_type,
                rows.len(),
                adapter.rows().len()
            );
            (table_html(adapter.headers(), &rows), summary)
        }
        None => (String::new(), selected.db_type.to_string()),
    };

    Html(render_page(&Page {
        app_name: &state.config.app_name,
        database_items: database_list_html(&databases, Some(&selected.name)),
        table_items: table_list_html(&selected.name, &tables, table.map(String::as_str)),
        table: rendered,
        db: Some(&selected.name),
        table_name: table.map(String::as_str),
        search: &query.q,
        summary,
    }))
}
