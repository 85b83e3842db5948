//! Viewer state machine
//!
//! All selection logic lives here as a pure reducer: [`ViewerState::update`]
//! applies a [`Msg`] and returns the fetches to perform next. Every fetch
//! carries a [`RequestToken`]; a response whose token is no longer the latest
//! one issued is dropped, so a slow reply for an old selection can never
//! overwrite a newer one.

use debugview_common::{adapter::Adapter, DataPayload, DatabaseDescriptor, DbType};

/// Sequence number of an issued fetch
pub type RequestToken = u64;

/// Database list as last loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseList {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<DatabaseDescriptor>),
    /// The list request failed; holds the error text
    Failed(String),
}

/// Inputs to the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// (Re)load the database list from scratch
    Startup,
    DatabasesLoaded {
        token: RequestToken,
        result: Result<Vec<DatabaseDescriptor>, String>,
    },
    SelectDatabase(String),
    TablesLoaded {
        token: RequestToken,
        tables: Vec<String>,
    },
    SelectTable(String),
    DataLoaded {
        token: RequestToken,
        payload: DataPayload,
    },
    SearchChanged(String),
}

/// Fetches requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchDatabases { token: RequestToken },
    FetchTables { token: RequestToken, db: String },
    FetchData { token: RequestToken, db: String, table: String },
}

#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    pub databases: DatabaseList,
    pub current_database: Option<String>,
    pub tables: Vec<String>,
    pub current_table: Option<String>,
    pub adapter: Adapter,
    /// Text in the search box
    pub search: String,
    /// Term the visible rows are filtered by
    pub applied_search: String,
    latest: RequestToken,
    pending: bool,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a message, returning the fetches it triggers
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Startup => {
                self.databases = DatabaseList::Loading;
                self.current_database = None;
                self.tables.clear();
                self.current_table = None;
                self.adapter = Adapter::Generic;
                let token = self.issue();
                vec![Effect::FetchDatabases { token }]
            }

            Msg::DatabasesLoaded { token, result } => {
                if !self.accept(token) {
                    return Vec::new();
                }
                match result {
                    Ok(list) => {
                        let first = list.first().map(|d| d.name.clone());
                        self.databases = DatabaseList::Loaded(list);
                        match first {
                            Some(name) => self.select_database(name),
                            None => Vec::new(),
                        }
                    }
                    Err(e) => {
                        self.databases = DatabaseList::Failed(e);
                        Vec::new()
                    }
                }
            }

            Msg::SelectDatabase(name) => {
                if !self.database_list().iter().any(|d| d.name == name) {
                    tracing::debug!("Ignoring selection of unknown database {}", name);
                    return Vec::new();
                }
                self.select_database(name)
            }

            Msg::TablesLoaded { token, tables } => {
                if !self.accept(token) {
                    return Vec::new();
                }
                self.tables = tables;
                match self.tables.first().cloned() {
                    Some(first) => self.select_table(first),
                    None => {
                        self.adapter = Adapter::Generic;
                        Vec::new()
                    }
                }
            }

            Msg::SelectTable(name) => {
                if self.current_database.is_none() || !self.tables.contains(&name) {
                    tracing::debug!("Ignoring selection of unknown table {}", name);
                    return Vec::new();
                }
                self.select_table(name)
            }

            Msg::DataLoaded { token, payload } => {
                if !self.accept(token) {
                    return Vec::new();
                }
                let db_type = self.current_db_type().cloned().unwrap_or(DbType::SharedPrefs);
                self.adapter = Adapter::for_database(&db_type, &payload);
                // A fresh load shows every row even if the box still holds text
                self.applied_search.clear();
                Vec::new()
            }

            Msg::SearchChanged(text) => {
                self.search = text.clone();
                self.applied_search = text;
                Vec::new()
            }
        }
    }

    fn select_database(&mut self, name: String) -> Vec<Effect> {
        self.current_database = Some(name.clone());
        self.tables.clear();
        self.current_table = None;
        let token = self.issue();
        vec![Effect::FetchTables { token, db: name }]
    }

    fn select_table(&mut self, name: String) -> Vec<Effect> {
        let Some(db) = self.current_database.clone() else {
            return Vec::new();
        };
        self.current_table = Some(name.clone());
        let token = self.issue();
        vec![Effect::FetchData {
            token,
            db,
            table: name,
        }]
    }

    fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        self.pending = true;
        self.latest
    }

    fn accept(&mut self, token: RequestToken) -> bool {
        if token != self.latest {
            tracing::debug!("Dropping stale response {} (latest {})", token, self.latest);
            return false;
        }
        self.pending = false;
        true
    }

    /// Loaded databases, empty while loading or after a failure
    pub fn database_list(&self) -> &[DatabaseDescriptor] {
        match &self.databases {
            DatabaseList::Loaded(list) => list,
            _ => &[],
        }
    }

    /// Declared type of the selected database
    pub fn current_db_type(&self) -> Option<&DbType> {
        let name = self.current_database.as_deref()?;
        self.database_list()
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.db_type)
    }

    /// Whether the latest fetch is still outstanding
    pub fn is_loading(&self) -> bool {
        self.pending
    }

    pub fn headers(&self) -> &[String] {
        self.adapter.headers()
    }

    /// Rows matching the applied search term
    pub fn visible_rows(&self) -> Vec<&[String]> {
        self.adapter.filter(&self.applied_search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debugview_common::{KeyValueEntry, TableData, TableRow};
    use serde_json::json;

    fn descriptors() -> Vec<DatabaseDescriptor> {
        vec![
            DatabaseDescriptor::new("settings", DbType::SharedPrefs),
            DatabaseDescriptor::new("app.db", DbType::RoomSqlite),
        ]
    }

    fn loaded_state() -> ViewerState {
        let mut state = ViewerState::new();
        let effects = state.update(Msg::Startup);
        assert_eq!(effects, vec![Effect::FetchDatabases { token: 1 }]);
        state.update(Msg::DatabasesLoaded {
            token: 1,
            result: Ok(descriptors()),
        });
        state
    }

    #[test]
    fn test_startup_selects_first_database() {
        let mut state = ViewerState::new();
        state.update(Msg::Startup);
        assert_eq!(state.databases, DatabaseList::Loading);
        assert!(state.is_loading());

        let effects = state.update(Msg::DatabasesLoaded {
            token: 1,
            result: Ok(descriptors()),
        });
        assert_eq!(
            effects,
            vec![Effect::FetchTables {
                token: 2,
                db: "settings".to_string()
            }]
        );
        assert_eq!(state.current_database.as_deref(), Some("settings"));
        assert_eq!(state.current_db_type(), Some(&DbType::SharedPrefs));
    }

    #[test]
    fn test_empty_and_failed_database_lists() {
        let mut state = ViewerState::new();
        state.update(Msg::Startup);
        let effects = state.update(Msg::DatabasesLoaded {
            token: 1,
            result: Ok(Vec::new()),
        });
        assert!(effects.is_empty());
        assert_eq!(state.databases, DatabaseList::Loaded(Vec::new()));
        assert!(state.current_database.is_none());

        state.update(Msg::Startup);
        let effects = state.update(Msg::DatabasesLoaded {
            token: 2,
            result: Err("connection refused".to_string()),
        });
        assert!(effects.is_empty());
        assert_eq!(
            state.databases,
            DatabaseList::Failed("connection refused".to_string())
        );
        assert!(!state.is_loading());
    }

    #[test]
    fn test_tables_loaded_selects_first_table() {
        let mut state = loaded_state();
        let effects = state.update(Msg::TablesLoaded {
            token: 2,
            tables: vec!["settings".to_string()],
        });
        assert_eq!(
            effects,
            vec![Effect::FetchData {
                token: 3,
                db: "settings".to_string(),
                table: "settings".to_string()
            }]
        );

        state.update(Msg::DataLoaded {
            token: 3,
            payload: DataPayload::KeyValue(vec![KeyValueEntry::new("theme", "dark")]),
        });
        assert_eq!(state.headers(), ["Key", "Value"]);
        assert_eq!(state.visible_rows().len(), 1);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_no_tables_clears_data() {
        let mut state = loaded_state();
        state.update(Msg::TablesLoaded {
            token: 2,
            tables: vec!["settings".to_string()],
        });
        state.update(Msg::DataLoaded {
            token: 3,
            payload: DataPayload::KeyValue(vec![KeyValueEntry::new("a", "1")]),
        });

        let effects = state.update(Msg::SelectDatabase("app.db".to_string()));
        assert_eq!(
            effects,
            vec![Effect::FetchTables {
                token: 4,
                db: "app.db".to_string()
            }]
        );
        let effects = state.update(Msg::TablesLoaded {
            token: 4,
            tables: Vec::new(),
        });
        assert!(effects.is_empty());
        assert_eq!(state.adapter, Adapter::Generic);
        assert!(state.headers().is_empty());
        assert!(state.current_table.is_none());
    }

    #[test]
    fn test_stale_responses_are_dropped() {
        let mut state = loaded_state();

        // User switches database before the first table list arrives
        state.update(Msg::SelectDatabase("app.db".to_string()));
        let effects = state.update(Msg::TablesLoaded {
            token: 2,
            tables: vec!["settings".to_string()],
        });
        assert!(effects.is_empty());
        assert!(state.tables.is_empty());

        state.update(Msg::TablesLoaded {
            token: 3,
            tables: vec!["users".to_string(), "orders".to_string()],
        });
        assert_eq!(state.current_table.as_deref(), Some("users"));

        // Switch table while "users" is in flight; the old payload must lose
        state.update(Msg::SelectTable("orders".to_string()));
        let orders = DataPayload::Table(TableData {
            columns: vec!["id".to_string()],
            rows: vec![TableRow::Ordered(vec![json!(7)])],
        });
        let users = DataPayload::Table(TableData {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![TableRow::Ordered(vec![json!(1), json!("Ann")])],
        });
        state.update(Msg::DataLoaded {
            token: 5,
            payload: orders,
        });
        state.update(Msg::DataLoaded {
            token: 4,
            payload: users,
        });
        assert_eq!(state.headers(), ["id"]);
        assert_eq!(state.visible_rows(), vec![&["7".to_string()][..]]);
    }

    #[test]
    fn test_unknown_selections_are_ignored() {
        let mut state = loaded_state();
        assert!(state.update(Msg::SelectDatabase("missing".to_string())).is_empty());
        assert_eq!(state.current_database.as_deref(), Some("settings"));

        state.update(Msg::TablesLoaded {
            token: 2,
            tables: vec!["settings".to_string()],
        });
        assert!(state.update(Msg::SelectTable("other".to_string())).is_empty());
        assert_eq!(state.current_table.as_deref(), Some("settings"));
    }

    #[test]
    fn test_search_filters_and_resets_on_reload() {
        let mut state = loaded_state();
        state.update(Msg::TablesLoaded {
            token: 2,
            tables: vec!["settings".to_string()],
        });
        let payload = DataPayload::KeyValue(vec![
            KeyValueEntry::new("theme", "dark"),
            KeyValueEntry::new("lang", "en"),
        ]);
        state.update(Msg::DataLoaded {
            token: 3,
            payload: payload.clone(),
        });

        state.update(Msg::SearchChanged("DAR".to_string()));
        assert_eq!(state.visible_rows().len(), 1);

        // Reloading the table keeps the text but shows all rows again
        state.update(Msg::SelectTable("settings".to_string()));
        state.update(Msg::DataLoaded { token: 4, payload });
        assert_eq!(state.search, "DAR");
        assert_eq!(state.visible_rows().len(), 2);
    }
}
