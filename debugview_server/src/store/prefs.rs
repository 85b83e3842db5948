//! Preference files: one flat JSON object per `shared_prefs/<name>.json`

use super::{list_files, Result};
use debugview_common::{cell_text, KeyValueEntry};
use serde_json::{Map, Value};
use std::path::PathBuf;

pub struct PrefsStore {
    dir: PathBuf,
}

impl PrefsStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub async fn names(&self) -> Result<Vec<String>> {
        let files = list_files(&self.dir, &["json"]).await?;
        for (name, _) in &files {
            tracing::debug!("Found shared preferences: {}", name);
        }
        Ok(files.into_iter().map(|(name, _)| name).collect())
    }

    /// Entries in file order; a missing file has none
    pub async fn entries(&self, name: &str) -> Result<Vec<KeyValueEntry>> {
        let map = self.load(name).await?;
        tracing::debug!("Found {} entries in shared preferences {}", map.len(), name);
        Ok(map
            .iter()
            .map(|(key, value)| KeyValueEntry::new(key.clone(), cell_text(value)))
            .collect())
    }

    pub async fn put(&self, name: &str, key: &str, value: &str) -> Result<()> {
        let mut map = self.load(name).await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.save(name, &map).await
    }

    pub async fn delete(&self, name: &str, key: &str) -> Result<()> {
        let mut map = self.load(name).await?;
        if map.shift_remove(key).is_some() {
            self.save(name, &map).await?;
        }
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    async fn load(&self, name: &str) -> Result<Map<String, Value>> {
        match tokio::fs::read(self.path(name)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, name: &str, map: &Map<String, Value>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(self.path(name), content).await?;
        Ok(())
    }
}
