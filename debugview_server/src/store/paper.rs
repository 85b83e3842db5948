//! Paper books: `paper/<book>/<key>.json`, one JSON value per key

use super::{check_name, list_files, Result};
use debugview_common::{cell_text, KeyValueEntry};
use serde_json::Value;
use std::path::PathBuf;

pub struct PaperStore {
    dir: PathBuf,
}

impl PaperStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub async fn names(&self) -> Result<Vec<String>> {
        let mut books = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(books),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    books.push(name.to_string());
                }
            }
        }

        books.sort();
        Ok(books)
    }

    pub async fn contains(&self, book: &str) -> bool {
        tokio::fs::metadata(self.dir.join(book))
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Entries sorted by key; values that are not valid JSON are shown raw
    pub async fn entries(&self, book: &str) -> Result<Vec<KeyValueEntry>> {
        let mut entries = Vec::new();
        for (key, path) in list_files(&self.dir.join(book), &["json"]).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            let value = match serde_json::from_str::<Value>(&raw) {
                Ok(value) => cell_text(&value),
                Err(_) => raw,
            };
            entries.push(KeyValueEntry::new(key, value));
        }
        Ok(entries)
    }

    pub async fn put(&self, book: &str, key: &str, value: &str) -> Result<()> {
        check_name(key)?;
        let dir = self.dir.join(book);
        tokio::fs::create_dir_all(&dir).await?;
        let content = serde_json::to_vec(&Value::String(value.to_string()))?;
        tokio::fs::write(dir.join(format!("{}.json", key)), content).await?;
        Ok(())
    }

    pub async fn delete(&self, book: &str, key: &str) -> Result<()> {
        check_name(key)?;
        match tokio::fs::remove_file(self.dir.join(book).join(format!("{}.json", key))).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
