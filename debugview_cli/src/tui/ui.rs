//! TUI rendering functions

use super::app::{Focus, TuiApp};
use crate::viewer::{DatabaseList, ViewerState};
use debugview_common::constants::{CONNECTION_FAILED, NO_DATABASES, NO_ENTRIES};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Table, TableState, Wrap,
    },
    Frame,
};

const HIGHLIGHT: Color = Color::Rgb(40, 40, 60);

/// Draw the TUI
pub fn draw(frame: &mut Frame, app: &TuiApp, state: &ViewerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(5),    // Panes
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    draw_title_bar(frame, app, state, chunks[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(chunks[1]);

    let lists = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(panes[0]);

    let data = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(panes[1]);

    draw_databases(frame, app, state, lists[0]);
    draw_tables(frame, app, state, lists[1]);
    draw_search(frame, app, state, data[0]);
    draw_data(frame, app, state, data[1]);
    draw_footer(frame, app, chunks[2]);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Title bar with server and current selection
fn draw_title_bar(frame: &mut Frame, app: &TuiApp, state: &ViewerState, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " DEBUG VIEW ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            truncate_str(&app.server_url, 40),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if let Some(db_type) = state.current_db_type() {
        spans.push(Span::styled("  │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            db_type.to_string(),
            Style::default().fg(Color::Magenta),
        ));
    }

    if state.current_table.is_some() {
        spans.push(Span::styled("  │ ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!(
                "{} of {} rows",
                state.visible_rows().len(),
                state.adapter.rows().len()
            ),
            Style::default().fg(Color::White),
        ));
    }

    if state.is_loading() {
        spans.push(Span::styled(
            "  loading…",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_databases(frame: &mut Frame, app: &TuiApp, state: &ViewerState, area: Rect) {
    let focused = app.focus == Focus::Databases;

    let databases = match &state.databases {
        DatabaseList::Idle | DatabaseList::Loading => {
            let block = pane_block(" Databases ".to_string(), focused);
            let text = Paragraph::new(Span::styled("Loading…", Style::default().fg(Color::DarkGray)))
                .block(block);
            frame.render_widget(text, area);
            return;
        }
        DatabaseList::Failed(reason) => {
            let block = pane_block(" Databases ".to_string(), focused);
            let lines = vec![
                Line::from(Span::styled(
                    CONNECTION_FAILED,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    reason.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "press r to retry",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let text = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(text, area);
            return;
        }
        DatabaseList::Loaded(list) => list,
    };

    let block = pane_block(format!(" Databases ({}) ", databases.len()), focused);
    if databases.is_empty() {
        let text = Paragraph::new(Span::styled(NO_DATABASES, Style::default().fg(Color::DarkGray)))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let name_width = (area.width as usize).saturating_sub(16).max(8);
    let items: Vec<ListItem> = databases
        .iter()
        .map(|db| {
            let active = state.current_database.as_deref() == Some(db.name.as_str());
            ListItem::new(Line::from(vec![
                active_marker(active),
                Span::styled(truncate_str(&db.name, name_width), name_style(active)),
                Span::styled(
                    format!(" {}", type_label(db.db_type.as_str())),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(HIGHLIGHT));

    let mut list_state = ListState::default();
    list_state.select(Some(app.db_cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_tables(frame: &mut Frame, app: &TuiApp, state: &ViewerState, area: Rect) {
    let focused = app.focus == Focus::Tables;
    let block = pane_block(format!(" Tables ({}) ", state.tables.len()), focused);

    let name_width = (area.width as usize).saturating_sub(6).max(8);
    let items: Vec<ListItem> = state
        .tables
        .iter()
        .map(|table| {
            let active = state.current_table.as_deref() == Some(table.as_str());
            ListItem::new(Line::from(vec![
                active_marker(active),
                Span::styled(truncate_str(table, name_width), name_style(active)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(HIGHLIGHT));

    let mut list_state = ListState::default();
    if !state.tables.is_empty() {
        list_state.select(Some(app.table_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_search(frame: &mut Frame, app: &TuiApp, state: &ViewerState, area: Rect) {
    let focused = app.focus == Focus::Search;
    let block = pane_block(" Search ".to_string(), focused);

    let line = if state.search.is_empty() && !focused {
        Line::from(Span::styled(
            "press / to filter rows",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(state.search.as_str())];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Draw the data table with scrolling and scrollbar
fn draw_data(frame: &mut Frame, app: &TuiApp, state: &ViewerState, area: Rect) {
    let focused = app.focus == Focus::Data;
    let title = match (&state.current_database, &state.current_table) {
        (Some(db), Some(table)) => format!(" {} / {} ", db, table),
        (Some(db), None) => format!(" {} ", db),
        _ => " Data ".to_string(),
    };
    let block = pane_block(title, focused);

    let headers = state.headers();
    if headers.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let rows = state.visible_rows();
    if rows.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let placeholder = Paragraph::new(Span::styled(NO_ENTRIES, Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center);
        frame.render_widget(placeholder, centered_line(inner));
        return;
    }

    let header = Row::new(headers.iter().map(|h| Cell::from(h.as_str())))
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .bottom_margin(0);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|cells| {
            Row::new(cells.iter().enumerate().map(|(i, cell)| {
                let style = if i == 0 {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Cell::from(cell.replace('\n', " ")).style(style)
            }))
        })
        .collect();

    // Split area to leave room for scrollbar
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let widths = vec![Constraint::Ratio(1, headers.len() as u32); headers.len()];
    let table = Table::new(table_rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(HIGHLIGHT));

    let mut table_state = TableState::default();
    table_state.select(Some(app.row_cursor));
    frame.render_stateful_widget(table, chunks[0], &mut table_state);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"))
        .track_symbol(Some("│"))
        .thumb_symbol("█");
    let mut scrollbar_state = ScrollbarState::new(rows.len()).position(app.row_cursor);
    frame.render_stateful_widget(scrollbar, chunks[1], &mut scrollbar_state);
}

/// Draw the footer with key hints
fn draw_footer(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(key, Style::default().fg(Color::Cyan)),
            Span::styled(label, Style::default().fg(Color::DarkGray)),
        ]
    };

    let mut spans = Vec::new();
    if app.focus == Focus::Search {
        spans.extend(hint("Esc", " Done  "));
        spans.extend(hint("Tab", " Next pane  "));
    } else {
        spans.extend(hint("Tab", " Next pane  "));
        spans.extend(hint("↑/↓", " Navigate  "));
        spans.extend(hint("Enter", " Open  "));
        spans.extend(hint("/", " Search  "));
        spans.extend(hint("r", " Reload  "));
        spans.extend(hint("q", " Quit"));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn active_marker(active: bool) -> Span<'static> {
    if active {
        Span::styled("● ", Style::default().fg(Color::Green))
    } else {
        Span::raw("  ")
    }
}

fn name_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Short label for a declared database type
fn type_label(db_type: &str) -> &str {
    match db_type {
        "SHARED_PREFS" => "prefs",
        "ROOM_SQLITE" => "sqlite",
        "PAPER_DB" => "paper",
        other => other,
    }
}

fn centered_line(area: Rect) -> Rect {
    let y = area.y + area.height / 2;
    Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1.min(area.height))
}

/// Truncate any string to max length, counted in characters
fn truncate_str(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::Msg;
    use debugview_common::{DataPayload, DatabaseDescriptor, DbType, KeyValueEntry};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &TuiApp, state: &ViewerState) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app, state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_truncate_str_is_char_safe() {
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("abcdef", 2), "ab");
    }

    #[test]
    fn test_draw_connection_failed() {
        let mut state = ViewerState::new();
        state.update(Msg::Startup);
        state.update(Msg::DatabasesLoaded {
            token: 1,
            result: Err("refused".to_string()),
        });
        let screen = render(&TuiApp::new("http://localhost:8080"), &state);
        assert!(screen.contains("Connection Failed"));
    }

    #[test]
    fn test_draw_rows_and_placeholder() {
        let mut state = ViewerState::new();
        state.update(Msg::Startup);
        state.update(Msg::DatabasesLoaded {
            token: 1,
            result: Ok(vec![DatabaseDescriptor::new("settings", DbType::SharedPrefs)]),
        });
        state.update(Msg::TablesLoaded {
            token: 2,
            tables: vec!["settings".to_string()],
        });
        state.update(Msg::DataLoaded {
            token: 3,
            payload: DataPayload::KeyValue(vec![KeyValueEntry::new("theme", "dark")]),
        });
        let app = TuiApp::new("http://localhost:8080");

        let screen = render(&app, &state);
        assert!(screen.contains("theme"));
        assert!(screen.contains("dark"));
        assert!(screen.contains("1 of 1 rows"));

        state.update(Msg::SearchChanged("zzz".to_string()));
        let screen = render(&app, &state);
        assert!(screen.contains("No entries found"));
    }
}
