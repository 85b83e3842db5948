//! Debug View Common - Shared protocol library for the debug endpoint
//!
//! This crate contains the wire types exchanged between the debug server and
//! the viewer, the adapters that normalize raw payloads into headers and rows,
//! and the HTML renderer used by the browser view.

pub mod adapter;
pub mod render;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Storage type a database declares in the database list
///
/// Matching is exact and case-sensitive; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DbType {
    /// Android-style preference file (key/value)
    SharedPrefs,

    /// Embedded SQL database (tabular)
    RoomSqlite,

    /// Paper book storage (key/value)
    PaperDb,

    /// A type this viewer does not know about
    Other(String),
}

impl DbType {
    /// Get string representation
    pub fn as_str(&self) -> &str {
        match self {
            DbType::SharedPrefs => "SHARED_PREFS",
            DbType::RoomSqlite => "ROOM_SQLITE",
            DbType::PaperDb => "PAPER_DB",
            DbType::Other(s) => s.as_str(),
        }
    }

    /// Whether this type is one of the three known values
    pub fn is_known(&self) -> bool {
        !matches!(self, DbType::Other(_))
    }
}

impl From<String> for DbType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SHARED_PREFS" => DbType::SharedPrefs,
            "ROOM_SQLITE" => DbType::RoomSqlite,
            "PAPER_DB" => DbType::PaperDb,
            _ => DbType::Other(s),
        }
    }
}

impl From<&str> for DbType {
    fn from(s: &str) -> Self {
        DbType::from(s.to_string())
    }
}

impl From<DbType> for String {
    fn from(t: DbType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the database list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub db_type: DbType,
}

impl DatabaseDescriptor {
    pub fn new(name: impl Into<String>, db_type: DbType) -> Self {
        Self {
            name: name.into(),
            db_type,
        }
    }
}

/// Body of `GET /getDbList`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbListResponse {
    #[serde(default)]
    pub rows: Vec<DatabaseDescriptor>,
}

/// Body of `GET /getTableList`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableListResponse {
    #[serde(default)]
    pub rows: Vec<String>,
}

/// A key/value record from a preference-style store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub key: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

impl KeyValueEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single row of a tabular payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRow {
    /// Cells already in column order
    Ordered(Vec<Value>),

    /// Cells keyed by column name
    Keyed(Map<String, Value>),
}

/// Tabular payload: declared columns plus rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub rows: Vec<TableRow>,
}

/// Body of `GET /getAllData`, shaped by the store type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPayload {
    KeyValue(Vec<KeyValueEntry>),
    Table(TableData),
}

impl DataPayload {
    /// The payload a failed fetch collapses to
    pub fn empty() -> Self {
        DataPayload::KeyValue(Vec::new())
    }

    /// Decode a raw response body
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Default for DataPayload {
    fn default() -> Self {
        Self::empty()
    }
}

/// Query string of `GET /getTableList`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListQuery {
    #[serde(default)]
    pub db_name: String,
}

/// Query string of `GET /getAllData`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    #[serde(default)]
    pub db_name: String,

    #[serde(default)]
    pub table_name: String,
}

/// Query string of the mutation endpoints (`addData`, `updateData`, `deleteData`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationQuery {
    #[serde(default)]
    pub db_name: String,

    #[serde(default)]
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Success body of the mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

/// Error body returned by the debug server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub service: String,
    pub version: String,
    pub databases: usize,
}

/// Render a raw JSON cell as display text
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JavaScript-style falsiness: `null`, `false`, `0` and `""`
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map(|f| f == 0.0).unwrap_or(false),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(cell_text(&value))
}

/// Constants for the protocol
pub mod constants {
    /// Database list endpoint
    pub const DB_LIST_PATH: &str = "/getDbList";

    /// Table list endpoint
    pub const TABLE_LIST_PATH: &str = "/getTableList";

    /// Table data endpoint
    pub const ALL_DATA_PATH: &str = "/getAllData";

    pub const ADD_DATA_PATH: &str = "/addData";
    pub const UPDATE_DATA_PATH: &str = "/updateData";
    pub const DELETE_DATA_PATH: &str = "/deleteData";

    /// Health endpoint, also used to identify a debug server
    pub const HEALTH_PATH: &str = "/health";

    /// Service name reported by the health endpoint
    pub const SERVICE_NAME: &str = "debugview-server";

    /// Port the on-device server listens on
    pub const DEFAULT_PORT: u16 = 8080;

    /// Cell text substituted for missing or falsy table fields
    pub const NULL_CELL: &str = "NULL";

    /// Headers of every key/value store
    pub const KEY_VALUE_HEADERS: [&str; 2] = ["Key", "Value"];

    /// Placeholder shown when a filter leaves no rows
    pub const NO_ENTRIES: &str = "No entries found";

    /// Database list empty state
    pub const NO_DATABASES: &str = "No Databases Found";

    /// Database list error state
    pub const CONNECTION_FAILED: &str = "Connection Failed";
}
