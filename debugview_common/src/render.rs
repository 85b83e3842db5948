//! HTML fragments for the browser view
//!
//! Every function here is pure. Labels, names and cell values come from the
//! device and are escaped before they reach markup.

use crate::constants::{CONNECTION_FAILED, NO_DATABASES, NO_ENTRIES};
use crate::DatabaseDescriptor;

const KEY_CELL_STYLE: &str = "font-family: monospace; font-weight: 500;";
const VALUE_CELL_STYLE: &str = "color: #475569;";
const PLACEHOLDER_STYLE: &str = "text-align:center; color: #94a3b8; padding: 2rem;";

/// Escape text for use in element content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `<th>` per label, in order
pub fn header_html(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("<th>{}</th>", escape_html(label)))
        .collect()
}

/// One `<tr>` with a `<td>` per cell; the first cell gets the key style
pub fn row_html(cells: &[String]) -> String {
    let cells: String = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let style = if i == 0 { KEY_CELL_STYLE } else { VALUE_CELL_STYLE };
            format!("<td style=\"{}\">{}</td>", style, escape_html(cell))
        })
        .collect();
    format!("<tr>{}</tr>", cells)
}

/// Table body for already-filtered rows
///
/// No rows renders a single centered placeholder spanning every column.
pub fn body_html(column_count: usize, rows: &[&[String]]) -> String {
    if rows.is_empty() {
        return format!(
            "<tr><td colspan=\"{}\" style=\"{}\">{}</td></tr>",
            column_count, PLACEHOLDER_STYLE, NO_ENTRIES
        );
    }

    rows.iter().map(|row| row_html(row)).collect()
}

/// Complete `<table>` fragment: header row plus body
pub fn table_html(headers: &[String], rows: &[&[String]]) -> String {
    format!(
        "<table class=\"data-table\"><thead><tr>{}</tr></thead><tbody id=\"data-rows\">{}</tbody></table>",
        header_html(headers),
        body_html(headers.len(), rows)
    )
}

/// Link to the server-rendered viewer for a selection
pub fn viewer_href(db: &str, table: Option<&str>) -> String {
    match table {
        Some(table) => format!(
            "/?db={}&table={}",
            urlencoding::encode(db),
            urlencoding::encode(table)
        ),
        None => format!("/?db={}", urlencoding::encode(db)),
    }
}

/// Database list items; the entry named `current` is marked active
pub fn database_list_html(databases: &[DatabaseDescriptor], current: Option<&str>) -> String {
    if databases.is_empty() {
        return format!("<li class=\"list-item\">{}</li>", NO_DATABASES);
    }

    databases
        .iter()
        .map(|db| {
            let name = escape_html(&db.name);
            format!(
                "<li class=\"list-item{}\" data-name=\"{}\" data-type=\"{}\"><a href=\"{}\">{}</a></li>",
                active_class(current == Some(db.name.as_str())),
                name,
                escape_html(db.db_type.as_str()),
                escape_html(&viewer_href(&db.name, None)),
                name
            )
        })
        .collect()
}

/// Database list error state
pub fn connection_failed_html() -> String {
    format!(
        "<li class=\"list-item\" style=\"color:red\">{}</li>",
        CONNECTION_FAILED
    )
}

/// Table list items for `db`; exactly the entry equal to `current` is active
pub fn table_list_html(db: &str, tables: &[String], current: Option<&str>) -> String {
    tables
        .iter()
        .map(|table| {
            let name = escape_html(table);
            format!(
                "<li class=\"list-item{}\" data-value=\"{}\"><a href=\"{}\">{}</a></li>",
                active_class(current == Some(table.as_str())),
                name,
                escape_html(&viewer_href(db, Some(table))),
                name
            )
        })
        .collect()
}

fn active_class(active: bool) -> &'static str {
    if active {
        " active"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbType;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_html() {
        assert_eq!(
            header_html(&strings(&["Key", "Value"])),
            "<th>Key</th><th>Value</th>"
        );
        assert_eq!(header_html(&[]), "");
    }

    #[test]
    fn test_row_html_styles_first_cell() {
        let html = row_html(&strings(&["theme", "dark"]));
        assert_eq!(
            html,
            "<tr><td style=\"font-family: monospace; font-weight: 500;\">theme</td>\
             <td style=\"color: #475569;\">dark</td></tr>"
        );
    }

    #[test]
    fn test_cells_are_escaped() {
        let html = row_html(&strings(&["<script>alert(1)</script>", "a & \"b\""]));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("a &amp; &quot;b&quot;"));

        assert_eq!(header_html(&strings(&["<b>"])), "<th>&lt;b&gt;</th>");
    }

    #[test]
    fn test_empty_body_placeholder_spans_columns() {
        let html = body_html(2, &[]);
        assert!(html.contains("colspan=\"2\""));
        assert!(html.contains("No entries found"));
    }

    #[test]
    fn test_body_html_renders_rows() {
        let rows = vec![strings(&["a", "1"]), strings(&["b", "2"])];
        let refs: Vec<&[String]> = rows.iter().map(Vec::as_slice).collect();
        let html = body_html(2, &refs);
        assert_eq!(html.matches("<tr>").count(), 2);
        assert!(!html.contains("No entries found"));
    }

    #[test]
    fn test_database_list_marks_one_active() {
        let dbs = vec![
            DatabaseDescriptor::new("prefs", DbType::SharedPrefs),
            DatabaseDescriptor::new("app.db", DbType::RoomSqlite),
        ];
        let html = database_list_html(&dbs, Some("app.db"));

        assert_eq!(html.matches(" active\"").count(), 1);
        assert!(html.contains("class=\"list-item active\" data-name=\"app.db\" data-type=\"ROOM_SQLITE\""));
        assert!(html.contains("class=\"list-item\" data-name=\"prefs\""));
    }

    #[test]
    fn test_empty_database_list() {
        assert_eq!(
            database_list_html(&[], None),
            "<li class=\"list-item\">No Databases Found</li>"
        );
        assert!(connection_failed_html().contains("color:red"));
    }

    #[test]
    fn test_table_list_links_are_encoded() {
        let html = table_list_html("my prefs", &strings(&["a&b", "c"]), Some("a&b"));

        assert!(html.contains("href=\"/?db=my%20prefs&amp;table=a%26b\""));
        assert!(html.contains("class=\"list-item active\" data-value=\"a&amp;b\""));
        assert_eq!(html.matches(" active\"").count(), 1);
    }
}
