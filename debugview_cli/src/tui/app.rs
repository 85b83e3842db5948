//! TUI application state and event handling
//!
//! The TUI only owns cursor and focus state; selections and data live in
//! [`ViewerState`]. Key presses that change a selection are turned into
//! [`Msg`]s for the controller.

use crate::viewer::{Msg, ViewerState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Pane that receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Databases,
    Tables,
    Data,
    Search,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Databases => Focus::Tables,
            Focus::Tables => Focus::Data,
            Focus::Data => Focus::Search,
            Focus::Search => Focus::Databases,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Databases => Focus::Search,
            Focus::Tables => Focus::Databases,
            Focus::Data => Focus::Tables,
            Focus::Search => Focus::Data,
        }
    }
}

/// TUI application state
pub struct TuiApp {
    pub focus: Focus,
    pub server_url: String,
    pub db_cursor: usize,
    pub table_cursor: usize,
    pub row_cursor: usize,
    pub should_quit: bool,
    seen_database: Option<String>,
    seen_table: Option<String>,
}

impl TuiApp {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            focus: Focus::Databases,
            server_url: server_url.into(),
            db_cursor: 0,
            table_cursor: 0,
            row_cursor: 0,
            should_quit: false,
            seen_database: None,
            seen_table: None,
        }
    }

    /// Follow selection changes made by the controller and clamp cursors
    pub fn sync(&mut self, state: &ViewerState) {
        if state.current_database != self.seen_database {
            self.seen_database = state.current_database.clone();
            if let Some(name) = &state.current_database {
                if let Some(i) = state.database_list().iter().position(|d| &d.name == name) {
                    self.db_cursor = i;
                }
            }
        }

        if state.current_table != self.seen_table {
            self.seen_table = state.current_table.clone();
            self.row_cursor = 0;
            if let Some(name) = &state.current_table {
                if let Some(i) = state.tables.iter().position(|t| t == name) {
                    self.table_cursor = i;
                }
            }
        }

        self.db_cursor = clamp(self.db_cursor, state.database_list().len());
        self.table_cursor = clamp(self.table_cursor, state.tables.len());
        self.row_cursor = clamp(self.row_cursor, state.visible_rows().len());
    }

    /// Handle a key press, returning a message for the controller if any
    pub fn handle_key(&mut self, key: KeyEvent, state: &ViewerState) -> Option<Msg> {
        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
            self.should_quit = true;
            return None;
        }

        if self.focus == Focus::Search {
            return self.handle_search_key(key, state);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                None
            }
            KeyCode::Char('r') => Some(Msg::Startup),
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(state, -1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(state, 1);
                None
            }
            KeyCode::PageUp => {
                self.move_cursor(state, -10);
                None
            }
            KeyCode::PageDown => {
                self.move_cursor(state, 10);
                None
            }
            KeyCode::Home => {
                self.move_cursor(state, isize::MIN);
                None
            }
            KeyCode::End => {
                self.move_cursor(state, isize::MAX);
                None
            }
            KeyCode::Enter => self.activate(state),
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, state: &ViewerState) -> Option<Msg> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.focus = Focus::Data;
                None
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                None
            }
            KeyCode::Backspace => {
                let mut text = state.search.clone();
                text.pop()?;
                self.row_cursor = 0;
                Some(Msg::SearchChanged(text))
            }
            KeyCode::Char(c) => {
                let mut text = state.search.clone();
                text.push(c);
                self.row_cursor = 0;
                Some(Msg::SearchChanged(text))
            }
            _ => None,
        }
    }

    fn move_cursor(&mut self, state: &ViewerState, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Databases => (&mut self.db_cursor, state.database_list().len()),
            Focus::Tables => (&mut self.table_cursor, state.tables.len()),
            Focus::Data => (&mut self.row_cursor, state.visible_rows().len()),
            Focus::Search => return,
        };
        let moved = if delta < 0 {
            cursor.saturating_sub(delta.unsigned_abs())
        } else {
            cursor.saturating_add(delta as usize)
        };
        *cursor = clamp(moved, len);
    }

    fn activate(&mut self, state: &ViewerState) -> Option<Msg> {
        match self.focus {
            Focus::Databases => {
                let db = state.database_list().get(self.db_cursor)?;
                self.focus = Focus::Tables;
                Some(Msg::SelectDatabase(db.name.clone()))
            }
            Focus::Tables => {
                let table = state.tables.get(self.table_cursor)?;
                self.focus = Focus::Data;
                Some(Msg::SelectTable(table.clone()))
            }
            Focus::Data | Focus::Search => None,
        }
    }
}

fn clamp(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}
