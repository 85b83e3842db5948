//! On-disk app storage exposed through the debug endpoint
//!
//! Three kinds of store live under the data directory:
//!
//! - `shared_prefs/<name>.json`: one flat JSON object per preference file
//! - `databases/<name>.db` (or `.sqlite`): SQLite databases
//! - `paper/<book>/<key>.json`: one directory per Paper book
//!
//! A name that matches no SQLite file or Paper book is treated as a
//! preference file, so reading an unknown name yields no entries and writing
//! to it creates the file.

mod paper;
mod prefs;
mod sqlite;

use debugview_common::{DataPayload, DatabaseDescriptor, DbType};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("{0} stores are read-only")]
    ReadOnly(DbType),
}

impl StoreError {
    /// Whether the error was caused by the request rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidName(_) | StoreError::TableNotFound(_) | StoreError::ReadOnly(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// All stores under one data directory
pub struct Store {
    default_prefs: String,
    prefs: prefs::PrefsStore,
    sqlite: sqlite::SqliteStore,
    paper: paper::PaperStore,
    write_lock: Mutex<()>,
}

impl Store {
    pub fn new(data_dir: &Path, default_prefs: String) -> Self {
        Self {
            default_prefs,
            prefs: prefs::PrefsStore::new(data_dir.join("shared_prefs")),
            sqlite: sqlite::SqliteStore::new(data_dir.join("databases")),
            paper: paper::PaperStore::new(data_dir.join("paper")),
            write_lock: Mutex::new(()),
        }
    }

    /// Every database, preference files first
    pub async fn databases(&self) -> Result<Vec<DatabaseDescriptor>> {
        let mut rows: Vec<DatabaseDescriptor> = self
            .prefs
            .names()
            .await?
            .into_iter()
            .map(|name| DatabaseDescriptor::new(name, DbType::SharedPrefs))
            .collect();

        if rows.is_empty() {
            rows.push(DatabaseDescriptor::new(
                self.default_prefs.clone(),
                DbType::SharedPrefs,
            ));
        }

        rows.extend(
            self.sqlite
                .names()
                .await?
                .into_iter()
                .map(|name| DatabaseDescriptor::new(name, DbType::RoomSqlite)),
        );
        rows.extend(
            self.paper
                .names()
                .await?
                .into_iter()
                .map(|name| DatabaseDescriptor::new(name, DbType::PaperDb)),
        );

        tracing::debug!("Found {} databases", rows.len());
        Ok(rows)
    }

    /// Tables of a database; key/value stores have a single table named after themselves
    pub async fn tables(&self, db: &str) -> Result<Vec<String>> {
        let db = self.db_name(db)?;
        match self.resolve(&db).await {
            DbType::RoomSqlite => self.sqlite.tables(&db).await,
            _ => Ok(vec![db]),
        }
    }

    /// Full contents of one table
    pub async fn all_data(&self, db: &str, table: &str) -> Result<DataPayload> {
        let db = self.db_name(db)?;
        let payload = match self.resolve(&db).await {
            DbType::RoomSqlite => DataPayload::Table(self.sqlite.table_data(&db, table).await?),
            DbType::PaperDb => DataPayload::KeyValue(self.paper.entries(&db).await?),
            _ => DataPayload::KeyValue(self.prefs.entries(&db).await?),
        };
        Ok(payload)
    }

    /// Insert or overwrite a string value in a key/value store
    pub async fn put(&self, db: &str, key: &str, value: &str) -> Result<()> {
        let db = self.db_name(db)?;
        let _guard = self.write_lock.lock().await;
        match self.resolve(&db).await {
            DbType::RoomSqlite => Err(StoreError::ReadOnly(DbType::RoomSqlite)),
            DbType::PaperDb => self.paper.put(&db, key, value).await,
            _ => self.prefs.put(&db, key, value).await,
        }
    }

    /// Remove a key from a key/value store; removing a missing key is not an error
    pub async fn delete(&self, db: &str, key: &str) -> Result<()> {
        let db = self.db_name(db)?;
        let _guard = self.write_lock.lock().await;
        match self.resolve(&db).await {
            DbType::RoomSqlite => Err(StoreError::ReadOnly(DbType::RoomSqlite)),
            DbType::PaperDb => self.paper.delete(&db, key).await,
            _ => self.prefs.delete(&db, key).await,
        }
    }

    async fn resolve(&self, db: &str) -> DbType {
        if self.sqlite.contains(db).await {
            DbType::RoomSqlite
        } else if self.paper.contains(db).await {
            DbType::PaperDb
        } else {
            DbType::SharedPrefs
        }
    }

    /// An empty name means the default preference file
    fn db_name(&self, db: &str) -> Result<String> {
        if db.is_empty() {
            return Ok(self.default_prefs.clone());
        }
        check_name(db)?;
        Ok(db.to_string())
    }
}

/// Reject names that would escape their store directory
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Entries of a directory whose file name ends with one of `extensions`, sorted
pub(crate) async fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<(String, PathBuf)>> {
    let mut found = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(ext) = extensions
            .iter()
            .find(|ext| file_name.ends_with(&format!(".{}", ext)))
        {
            let stem = file_name[..file_name.len() - ext.len() - 1].to_string();
            found.push((stem, path));
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use debugview_common::KeyValueEntry;

    fn store(dir: &Path) -> Store {
        Store::new(dir, "app_preferences".to_string())
    }

    #[test]
    fn test_check_name() {
        assert!(check_name("settings").is_ok());
        assert!(check_name("app.db").is_ok());
        assert!(check_name("../etc").is_err());
        assert!(check_name("a/b").is_err());
        assert!(check_name(".hidden").is_err());
    }

    #[tokio::test]
    async fn test_default_prefs_advertised() {
        let dir = tempfile::tempdir().unwrap();
        let dbs = store(dir.path()).databases().await.unwrap();

        assert_eq!(
            dbs,
            vec![DatabaseDescriptor::new("app_preferences", DbType::SharedPrefs)]
        );
    }

    #[tokio::test]
    async fn test_prefs_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.put("settings", "theme", "dark").await.unwrap();
        store.put("settings", "lang", "en").await.unwrap();
        store.put("settings", "theme", "light").await.unwrap();

        let dbs = store.databases().await.unwrap();
        assert_eq!(dbs, vec![DatabaseDescriptor::new("settings", DbType::SharedPrefs)]);
        assert_eq!(store.tables("settings").await.unwrap(), vec!["settings"]);

        let data = store.all_data("settings", "settings").await.unwrap();
        assert_eq!(
            data,
            DataPayload::KeyValue(vec![
                KeyValueEntry::new("theme", "light"),
                KeyValueEntry::new("lang", "en"),
            ])
        );

        store.delete("settings", "theme").await.unwrap();
        store.delete("settings", "missing").await.unwrap();
        let data = store.all_data("settings", "settings").await.unwrap();
        assert_eq!(data, DataPayload::KeyValue(vec![KeyValueEntry::new("lang", "en")]));
    }

    #[tokio::test]
    async fn test_unknown_database_is_empty_prefs() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert_eq!(store.tables("nope").await.unwrap(), vec!["nope"]);
        assert_eq!(store.all_data("nope", "nope").await.unwrap(), DataPayload::empty());
        assert_eq!(store.tables("").await.unwrap(), vec!["app_preferences"]);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(dir.path()).put("../escape", "k", "v").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(err.is_client_error());
    }
}
