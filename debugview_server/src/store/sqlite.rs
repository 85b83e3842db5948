//! SQLite databases under `databases/`

use super::{check_name, list_files, Result, StoreError};
use dashmap::DashMap;
use debugview_common::{TableData, TableRow};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, ValueRef};
use std::path::PathBuf;

const EXTENSIONS: &[&str] = &["db", "sqlite"];

pub struct SqliteStore {
    dir: PathBuf,
    pools: DashMap<String, SqlitePool>,
}

impl SqliteStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            pools: DashMap::new(),
        }
    }

    /// Database names are file names, extension included (`app.db`)
    pub async fn names(&self) -> Result<Vec<String>> {
        let files = list_files(&self.dir, EXTENSIONS).await?;
        Ok(files
            .into_iter()
            .filter_map(|(_, path)| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.to_string())
            })
            .collect())
    }

    pub async fn contains(&self, db: &str) -> bool {
        if !EXTENSIONS.iter().any(|ext| db.ends_with(&format!(".{}", ext))) {
            return false;
        }
        tokio::fs::metadata(self.dir.join(db))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    pub async fn tables(&self, db: &str) -> Result<Vec<String>> {
        let pool = self.pool(db).await?;
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(StoreError::from))
            .collect()
    }

    /// Every row of `table` keyed by column; SQL NULLs are left out
    pub async fn table_data(&self, db: &str, table: &str) -> Result<TableData> {
        if !self.tables(db).await?.iter().any(|t| t == table) {
            return Err(StoreError::TableNotFound(table.to_string()));
        }

        let pool = self.pool(db).await?;
        let quoted = quote_ident(table);

        let columns = sqlx::query(&format!("PRAGMA table_info({})", quoted))
            .fetch_all(&pool)
            .await?
            .iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let rows = sqlx::query(&format!("SELECT * FROM {}", quoted))
            .fetch_all(&pool)
            .await?;

        tracing::debug!("Read {} rows from {}.{}", rows.len(), db, table);

        Ok(TableData {
            columns: columns.clone(),
            rows: rows
                .iter()
                .map(|row| TableRow::Keyed(row_to_map(row, &columns)))
                .collect(),
        })
    }

    async fn pool(&self, db: &str) -> Result<SqlitePool> {
        check_name(db)?;
        if let Some(pool) = self.pools.get(db) {
            return Ok(pool.clone());
        }

        let options = SqliteConnectOptions::new()
            .filename(self.dir.join(db))
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await?;

        self.pools.insert(db.to_string(), pool.clone());
        Ok(pool)
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_to_map(row: &SqliteRow, columns: &[String]) -> Map<String, Value> {
    let mut map = Map::new();
    for (idx, column) in columns.iter().enumerate() {
        if let Some(value) = cell_value(row, idx) {
            map.insert(column.clone(), value);
        }
    }
    map
}

fn cell_value(row: &SqliteRow, idx: usize) -> Option<Value> {
    if row.try_get_raw(idx).map(|raw| raw.is_null()).unwrap_or(true) {
        return None;
    }

    if let Ok(s) = row.try_get::<String, _>(idx) {
        Some(Value::String(s))
    } else if let Ok(i) = row.try_get::<i64, _>(idx) {
        Some(Value::String(i.to_string()))
    } else if let Ok(f) = row.try_get::<f64, _>(idx) {
        Some(Value::String(f.to_string()))
    } else if let Ok(bytes) = row.try_get::<Vec<u8>, _>(idx) {
        Some(Value::String(format!("<blob {} bytes>", bytes.len())))
    } else {
        None
    }
}
