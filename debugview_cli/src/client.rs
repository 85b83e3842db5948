//! HTTP client for the debug server
//!
//! Every endpoint is a GET with query parameters; responses are JSON. Non-2xx
//! responses are surfaced as [`ClientError::Status`] with the server's
//! `{"error": ...}` message when one is present.

use crate::config::Config;
use crate::viewer::DataSource;
use async_trait::async_trait;
use debugview_common::{
    constants::{
        ADD_DATA_PATH, ALL_DATA_PATH, DB_LIST_PATH, DELETE_DATA_PATH, HEALTH_PATH,
        TABLE_LIST_PATH, UPDATE_DATA_PATH,
    },
    DataPayload, DataQuery, DatabaseDescriptor, DbListResponse, ErrorResponse, HealthResponse,
    MutationQuery, MutationResponse, ProtocolError, TableListQuery, TableListResponse,
};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

const NO_QUERY: [(&str, &str); 0] = [];

/// Errors talking to the debug server
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Unexpected response: {0}")]
    Protocol(#[from] ProtocolError),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Protocol(ProtocolError::Decode(e))
    }
}

/// Client for one debug server
#[derive(Clone)]
pub struct DebugClient {
    base_url: String,
    client: Client,
}

impl DebugClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("debugview/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a client from the CLI config
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(config.base_url(), Duration::from_secs(config.timeout_secs))
    }

    /// Get the server URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_bytes<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&bytes)
                .map(|e| e.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).trim().to_string());
            return Err(ClientError::Status { status, message });
        }

        Ok(bytes.to_vec())
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let bytes = self.get_bytes(path, query).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Check that the server is a debug server and reachable
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json(HEALTH_PATH, &NO_QUERY).await
    }

    /// Fetch the database list
    pub async fn databases(&self) -> Result<Vec<DatabaseDescriptor>, ClientError> {
        let response: DbListResponse = self.get_json(DB_LIST_PATH, &NO_QUERY).await?;
        Ok(response.rows)
    }

    /// Fetch the table names of a database
    pub async fn tables(&self, db: &str) -> Result<Vec<String>, ClientError> {
        let query = TableListQuery {
            db_name: db.to_string(),
        };
        let response: TableListResponse = self.get_json(TABLE_LIST_PATH, &query).await?;
        Ok(response.rows)
    }

    /// Fetch the full contents of a table
    pub async fn all_data(&self, db: &str, table: &str) -> Result<DataPayload, ClientError> {
        let query = DataQuery {
            db_name: db.to_string(),
            table_name: table.to_string(),
        };
        let bytes = self.get_bytes(ALL_DATA_PATH, &query).await?;
        Ok(DataPayload::from_slice(&bytes)?)
    }

    /// Add a key to a key/value database
    pub async fn add(&self, db: &str, key: &str, value: &str) -> Result<MutationResponse, ClientError> {
        self.mutate(ADD_DATA_PATH, db, key, Some(value)).await
    }

    /// Overwrite a key in a key/value database
    pub async fn update(
        &self,
        db: &str,
        key: &str,
        value: &str,
    ) -> Result<MutationResponse, ClientError> {
        self.mutate(UPDATE_DATA_PATH, db, key, Some(value)).await
    }

    /// Remove a key from a key/value database
    pub async fn delete(&self, db: &str, key: &str) -> Result<MutationResponse, ClientError> {
        self.mutate(DELETE_DATA_PATH, db, key, None).await
    }

    async fn mutate(
        &self,
        path: &str,
        db: &str,
        key: &str,
        value: Option<&str>,
    ) -> Result<MutationResponse, ClientError> {
        let query = MutationQuery {
            db_name: db.to_string(),
            key: key.to_string(),
            value: value.map(str::to_string),
        };
        self.get_json(path, &query).await
    }
}

#[async_trait]
impl DataSource for DebugClient {
    async fn databases(&self) -> Result<Vec<DatabaseDescriptor>, ClientError> {
        DebugClient::databases(self).await
    }

    async fn tables(&self, db: &str) -> Result<Vec<String>, ClientError> {
        DebugClient::tables(self, db).await
    }

    async fn all_data(&self, db: &str, table: &str) -> Result<DataPayload, ClientError> {
        DebugClient::all_data(self, db, table).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode as AxumStatus,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use debugview_common::{DbType, KeyValueEntry};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_fake(router: Router) -> DebugClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        DebugClient::new(format!("http://{}/", addr), Duration::from_secs(5)).unwrap()
    }

    fn fake_router() -> Router {
        Router::new()
            .route(
                "/getDbList",
                get(|| async {
                    Json(json!({"rows": [
                        {"name": "settings", "type": "SHARED_PREFS"},
                        {"name": "app.db", "type": "ROOM_SQLITE"}
                    ]}))
                }),
            )
            .route(
                "/getTableList",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let rows = match q.get("dbName").map(String::as_str) {
                        Some("app.db") => json!(["users"]),
                        _ => json!([]),
                    };
                    Json(json!({ "rows": rows }))
                }),
            )
            .route(
                "/getAllData",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    match q.get("tableName").map(String::as_str) {
                        Some("users") => Json(json!({
                            "columns": ["id", "name"],
                            "rows": [[1, "Ann"]]
                        }))
                        .into_response(),
                        Some("broken") => "not json".into_response(),
                        _ => Json(json!([{"key": "theme", "value": "dark"}])).into_response(),
                    }
                }),
            )
            .route(
                "/addData",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    if q.get("key").map_or(true, |k| k.is_empty()) {
                        return (AxumStatus::BAD_REQUEST, Json(json!({"error": "Missing key"})))
                            .into_response();
                    }
                    Json(json!({"success": true, "message": "Added successfully"})).into_response()
                }),
            )
    }

    #[tokio::test]
    async fn test_fetches_lists_and_payloads() {
        let client = spawn_fake(fake_router()).await;

        let dbs = client.databases().await.unwrap();
        assert_eq!(
            dbs,
            vec![
                DatabaseDescriptor::new("settings", DbType::SharedPrefs),
                DatabaseDescriptor::new("app.db", DbType::RoomSqlite),
            ]
        );

        assert_eq!(client.tables("app.db").await.unwrap(), vec!["users"]);
        assert!(client.tables("settings").await.unwrap().is_empty());

        match client.all_data("app.db", "users").await.unwrap() {
            DataPayload::Table(data) => assert_eq!(data.columns, vec!["id", "name"]),
            other => panic!("expected table payload, got {:?}", other),
        }
        assert_eq!(
            client.all_data("settings", "settings").await.unwrap(),
            DataPayload::KeyValue(vec![KeyValueEntry::new("theme", "dark")])
        );
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let client = spawn_fake(fake_router()).await;

        let err = client.add("settings", "", "x").await.unwrap_err();
        match err {
            ClientError::Status { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Missing key");
            }
            other => panic!("expected status error, got {:?}", other),
        }

        let ok = client.add("settings", "k", "v").await.unwrap();
        assert!(ok.success);

        let err = client.all_data("app.db", "broken").await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));

        let err = client.delete("settings", "k").await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = DebugClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = client.databases().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
