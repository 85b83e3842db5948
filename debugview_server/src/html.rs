//! Page shell for the browser viewer

use debugview_common::render::escape_html;

/// Pre-rendered fragments of one viewer page
pub struct Page<'a> {
    pub app_name: &'a str,
    pub database_items: String,
    pub table_items: String,
    pub table: String,
    pub db: Option<&'a str>,
    pub table_name: Option<&'a str>,
    pub search: &'a str,
    pub summary: String,
}

const STYLE: &str = r#"
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f8fafc;
            color: #0f172a;
            font-size: 14px;
        }
        header {
            background: #fff;
            border-bottom: 1px solid #e2e8f0;
            padding: 0.75rem 1rem;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        h1 { font-size: 1.1rem; font-weight: 600; }
        main { display: grid; grid-template-columns: 240px 240px 1fr; height: calc(100vh - 52px); }
        aside { border-right: 1px solid #e2e8f0; overflow-y: auto; background: #fff; }
        aside h2 {
            font-size: 0.75rem;
            text-transform: uppercase;
            color: #64748b;
            padding: 0.75rem 1rem 0.5rem;
        }
        .list { list-style: none; }
        .list-item a { display: block; padding: 0.5rem 1rem; color: inherit; text-decoration: none; }
        .list-item:hover { background: #f1f5f9; }
        .list-item.active { background: #e0e7ff; font-weight: 600; }
        section { overflow: auto; padding: 1rem; }
        form { margin-bottom: 1rem; display: flex; gap: 0.5rem; align-items: center; }
        #search-data {
            flex: 1;
            max-width: 360px;
            padding: 0.4rem 0.75rem;
            border: 1px solid #cbd5e1;
            border-radius: 4px;
        }
        .summary { color: #64748b; font-size: 0.8rem; }
        .data-table { width: 100%; border-collapse: collapse; background: #fff; }
        .data-table th {
            text-align: left;
            font-size: 0.75rem;
            color: #64748b;
            border-bottom: 1px solid #e2e8f0;
            padding: 0.5rem 0.75rem;
        }
        .data-table td { border-bottom: 1px solid #f1f5f9; padding: 0.5rem 0.75rem; word-break: break-all; }
"#;

/// Assemble the full HTML document
pub fn render_page(page: &Page<'_>) -> String {
    let hidden = |name: &str, value: Option<&str>| {
        value
            .map(|v| {
                format!(
                    r#"<input type="hidden" name="{}" value="{}">"#,
                    name,
                    escape_html(v)
                )
            })
            .unwrap_or_default()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Debug View</title>
    <style>{style}</style>
</head>
<body>
    <header>
        <h1>Debug View · {app_name}</h1>
        <span class="summary">{summary}</span>
    </header>
    <main>
        <aside>
            <h2>Databases</h2>
            <ul id="db-list" class="list">{databases}</ul>
        </aside>
        <aside>
            <h2>Tables</h2>
            <ul id="table-list" class="list">{tables}</ul>
        </aside>
        <section>
            <form method="get" action="/">
                {db_field}{table_field}
                <input id="search-data" type="search" name="q" placeholder="Search..." value="{search}">
            </form>
            {table}
        </section>
    </main>
</body>
</html>
"#,
        style = STYLE,
        app_name = escape_html(page.app_name),
        summary = escape_html(&page.summary),
        databases = page.database_items,
        tables = page.table_items,
        db_field = hidden("db", page.db),
        table_field = hidden("table", page.table_name),
        search = escape_html(page.search),
        table = page.table,
    )
}
