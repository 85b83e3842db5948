//! Async driver for the viewer state machine
//!
//! Effects are spawned as tokio tasks and their results come back as
//! messages over an unbounded channel. Replies are applied one at a time,
//! so the state is only ever touched from the caller.

use super::state::{Effect, Msg, ViewerState};
use crate::client::ClientError;
use async_trait::async_trait;
use debugview_common::{DataPayload, DatabaseDescriptor};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Where the viewer reads databases, tables and rows from
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn databases(&self) -> Result<Vec<DatabaseDescriptor>, ClientError>;
    async fn tables(&self, db: &str) -> Result<Vec<String>, ClientError>;
    async fn all_data(&self, db: &str, table: &str) -> Result<DataPayload, ClientError>;
}

/// Run one effect against a source and turn the outcome into a message
///
/// A failed database list is reported as such; failed table or data
/// fetches degrade to empty results.
pub async fn perform(source: &dyn DataSource, effect: Effect) -> Msg {
    match effect {
        Effect::FetchDatabases { token } => {
            let result = source.databases().await.map_err(|e| {
                tracing::warn!("Failed to fetch database list: {}", e);
                e.to_string()
            });
            Msg::DatabasesLoaded { token, result }
        }
        Effect::FetchTables { token, db } => {
            let tables = source.tables(&db).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to fetch tables of {}: {}", db, e);
                Vec::new()
            });
            Msg::TablesLoaded { token, tables }
        }
        Effect::FetchData { token, db, table } => {
            let payload = source.all_data(&db, &table).await.unwrap_or_else(|e| {
                tracing::warn!("Failed to fetch {}.{}: {}", db, table, e);
                DataPayload::empty()
            });
            Msg::DataLoaded { token, payload }
        }
    }
}

/// Owns the state and the fetches in flight
pub struct Controller {
    state: ViewerState,
    source: Arc<dyn DataSource>,
    tx: mpsc::UnboundedSender<Msg>,
    rx: mpsc::UnboundedReceiver<Msg>,
    in_flight: usize,
}

impl Controller {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: ViewerState::new(),
            source,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Number of spawned fetches whose replies have not been applied
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Apply a message and start whatever it asks for
    pub fn dispatch(&mut self, msg: Msg) {
        for effect in self.state.update(msg) {
            self.spawn(effect);
        }
    }

    fn spawn(&mut self, effect: Effect) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let msg = perform(source.as_ref(), effect).await;
            // Receiver only goes away on shutdown
            let _ = tx.send(msg);
        });
    }

    /// Wait for the next reply and apply it
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn next(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(msg) => {
                self.in_flight -= 1;
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Apply replies until no fetch is left in flight
    pub async fn settle(&mut self) {
        while self.next().await {}
    }
}
