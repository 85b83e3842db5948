//! Data-source adapters
//!
//! An [`Adapter`] turns whatever `/getAllData` returned into a uniform
//! record set of headers and string rows. The variant is chosen from the
//! database type declared in the database list, never from the payload.

use crate::constants::{KEY_VALUE_HEADERS, NULL_CELL};
use crate::{cell_text, is_falsy, DataPayload, DbType, KeyValueEntry, TableData, TableRow};

/// Normalized headers plus rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Which adapter variant produced a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Generic,
    KeyValue,
    Table,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Generic => "generic",
            AdapterKind::KeyValue => "key-value",
            AdapterKind::Table => "table",
        }
    }
}

/// The active data source for one (database, table) selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Adapter {
    /// No data; the default before anything is loaded
    #[default]
    Generic,

    /// Key/value store rendered as `Key | Value`
    KeyValue(RecordSet),

    /// Tabular store rendered with its declared columns
    Table(RecordSet),
}

impl Adapter {
    /// Build the adapter for a database type from a raw payload
    ///
    /// `SHARED_PREFS`, `PAPER_DB` and unknown types use the key/value
    /// variant; `ROOM_SQLITE` uses the table variant.
    pub fn for_database(db_type: &DbType, payload: &DataPayload) -> Self {
        match db_type {
            DbType::RoomSqlite => match payload {
                DataPayload::Table(data) => Self::table(data),
                DataPayload::KeyValue(_) => Self::table(&TableData::default()),
            },
            DbType::SharedPrefs | DbType::PaperDb | DbType::Other(_) => match payload {
                DataPayload::KeyValue(entries) => Self::key_value(entries),
                DataPayload::Table(_) => {
                    tracing::warn!("{} store returned a tabular payload, showing no entries", db_type);
                    Self::key_value(&[])
                }
            },
        }
    }

    /// Key/value variant, one `[key, value]` row per entry in input order
    pub fn key_value(entries: &[KeyValueEntry]) -> Self {
        Adapter::KeyValue(RecordSet {
            headers: KEY_VALUE_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: entries
                .iter()
                .map(|e| vec![e.key.clone(), e.value.clone()])
                .collect(),
        })
    }

    /// Table variant
    ///
    /// Ordered rows pass through unchanged. Keyed rows are projected into
    /// column order, with `"NULL"` for any column that is missing or falsy.
    pub fn table(data: &TableData) -> Self {
        let rows = data
            .rows
            .iter()
            .map(|row| match row {
                TableRow::Ordered(cells) => cells.iter().map(cell_text).collect(),
                TableRow::Keyed(map) => data
                    .columns
                    .iter()
                    .map(|column| match map.get(column) {
                        Some(value) if !is_falsy(value) => cell_text(value),
                        _ => NULL_CELL.to_string(),
                    })
                    .collect(),
            })
            .collect();

        Adapter::Table(RecordSet {
            headers: data.columns.clone(),
            rows,
        })
    }

    pub fn kind(&self) -> AdapterKind {
        match self {
            Adapter::Generic => AdapterKind::Generic,
            Adapter::KeyValue(_) => AdapterKind::KeyValue,
            Adapter::Table(_) => AdapterKind::Table,
        }
    }

    pub fn headers(&self) -> &[String] {
        match self {
            Adapter::Generic => &[],
            Adapter::KeyValue(set) | Adapter::Table(set) => &set.headers,
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        match self {
            Adapter::Generic => &[],
            Adapter::KeyValue(set) | Adapter::Table(set) => &set.rows,
        }
    }

    /// Rows with at least one cell containing `term`, case-insensitively
    pub fn filter(&self, term: &str) -> Vec<&[String]> {
        filter_rows(self.rows(), term)
    }
}

/// Keep rows where any cell contains `term`, ignoring case
///
/// An empty term keeps every row.
pub fn filter_rows<'a>(rows: &'a [Vec<String>], term: &str) -> Vec<&'a [String]> {
    if term.is_empty() {
        return rows.iter().map(Vec::as_slice).collect();
    }

    let needle = term.to_lowercase();
    rows.iter()
        .filter(|row| row.iter().any(|cell| cell.to_lowercase().contains(&needle)))
        .map(Vec::as_slice)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_data(value: serde_json::Value) -> TableData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_key_value_rows_keep_order() {
        let entries = vec![
            KeyValueEntry::new("zeta", "1"),
            KeyValueEntry::new("alpha", "2"),
            KeyValueEntry::new("mid", "3"),
        ];
        let adapter = Adapter::key_value(&entries);

        assert_eq!(adapter.kind(), AdapterKind::KeyValue);
        assert_eq!(adapter.headers(), ["Key", "Value"]);
        assert_eq!(adapter.rows().len(), 3);
        assert_eq!(adapter.rows()[0], ["zeta", "1"]);
        assert_eq!(adapter.rows()[1], ["alpha", "2"]);
        assert_eq!(adapter.rows()[2], ["mid", "3"]);
    }

    #[test]
    fn test_table_ordered_rows_pass_through() {
        let data = table_data(json!({
            "columns": ["id", "name"],
            "rows": [["1", "ada"], ["2", "grace"]]
        }));
        let adapter = Adapter::table(&data);

        assert_eq!(adapter.headers(), ["id", "name"]);
        assert_eq!(
            adapter.rows(),
            [vec!["1".to_string(), "ada".to_string()], vec!["2".to_string(), "grace".to_string()]]
        );
    }

    #[test]
    fn test_table_keyed_rows_fill_null() {
        let data = table_data(json!({
            "columns": ["id", "name", "age"],
            "rows": [{"id": "1"}, {"name": "bob", "id": "2", "age": 41}]
        }));
        let adapter = Adapter::table(&data);

        assert_eq!(adapter.rows()[0], ["1", "NULL", "NULL"]);
        assert_eq!(adapter.rows()[1], ["2", "bob", "41"]);
    }

    #[test]
    fn test_table_falsy_values_become_null() {
        let data = table_data(json!({
            "columns": ["a", "b", "c", "d", "e"],
            "rows": [{"a": "", "b": 0, "c": false, "d": null, "e": "0"}]
        }));
        let adapter = Adapter::table(&data);

        assert_eq!(adapter.rows()[0], ["NULL", "NULL", "NULL", "NULL", "0"]);
    }

    #[test]
    fn test_selection_by_db_type() {
        let kv = DataPayload::KeyValue(vec![KeyValueEntry::new("k", "v")]);
        let table = DataPayload::Table(table_data(json!({"columns": ["id"], "rows": [["1"]]})));

        assert_eq!(Adapter::for_database(&DbType::SharedPrefs, &kv).kind(), AdapterKind::KeyValue);
        assert_eq!(Adapter::for_database(&DbType::PaperDb, &kv).kind(), AdapterKind::KeyValue);
        assert_eq!(Adapter::for_database(&DbType::RoomSqlite, &table).kind(), AdapterKind::Table);

        let unknown = Adapter::for_database(&DbType::from("REALM"), &kv);
        assert_eq!(unknown.kind(), AdapterKind::KeyValue);
        assert_eq!(unknown.rows()[0], ["k", "v"]);
    }

    #[test]
    fn test_mismatched_payloads_are_empty() {
        let table = DataPayload::Table(table_data(json!({"columns": ["id"], "rows": [["1"]]})));
        let kv_from_table = Adapter::for_database(&DbType::SharedPrefs, &table);
        assert_eq!(kv_from_table.headers(), ["Key", "Value"]);
        assert!(kv_from_table.rows().is_empty());

        let table_from_failure = Adapter::for_database(&DbType::RoomSqlite, &DataPayload::empty());
        assert_eq!(table_from_failure.kind(), AdapterKind::Table);
        assert!(table_from_failure.headers().is_empty());
        assert!(table_from_failure.rows().is_empty());
    }

    #[test]
    fn test_generic_is_empty() {
        let adapter = Adapter::default();
        assert_eq!(adapter.kind(), AdapterKind::Generic);
        assert!(adapter.headers().is_empty());
        assert!(adapter.filter("").is_empty());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let adapter = Adapter::key_value(&[
            KeyValueEntry::new("theme", "Dark"),
            KeyValueEntry::new("lang", "en"),
        ]);

        let hits = adapter.filter("dAR");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], ["theme", "Dark"]);

        assert!(adapter.filter("zzz").is_empty());
        assert_eq!(adapter.filter("").len(), 2);
        assert_eq!(adapter.filter("E").len(), 2);
    }
}
