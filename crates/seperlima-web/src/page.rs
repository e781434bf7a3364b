//! HTML rendering for the dashboard pages.
//!
//! Pages are built by filling `<!-- NAME -->` markers in the const templates
//! at the bottom of this file. Charts are embedded as Vega-Lite specs and
//! drawn client-side by vega-embed.

use chrono::NaiveDate;
use seperlima_charts::{ChartOutput, NO_DATA_MESSAGE, to_vega_lite};
use seperlima_data::{Table, Value};

/// Top-level navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Loans,
    Members,
    Books,
}

impl View {
    const ALL: [View; 4] = [View::Overview, View::Loans, View::Members, View::Books];

    fn path(self) -> &'static str {
        match self {
            View::Overview => "/",
            View::Loans => "/loans",
            View::Members => "/members",
            View::Books => "/books",
        }
    }

    fn label(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Loans => "Loan records",
            View::Members => "Member records",
            View::Books => "Book records",
        }
    }
}

/// Wrap `body` in the shared layout with `active` highlighted in the nav.
pub fn layout(active: View, title: &str, body: &str) -> String {
    let mut nav = String::new();
    for view in View::ALL {
        let class = if view == active { " class=\"active\"" } else { "" };
        nav.push_str(&format!(
            r#"<a href="{}"{}>{}</a>"#,
            view.path(),
            class,
            view.label()
        ));
    }

    LAYOUT_HTML
        .replace("<!-- TITLE -->", &html_escape(title))
        .replace("<!-- NAV -->", &nav)
        .replace("<!-- BODY -->", body)
}

pub fn error_page(cause: &str) -> String {
    ERROR_HTML.replace("<!-- CAUSE -->", &html_escape(cause))
}

pub fn kpi_card(label: &str, value: &str, sub: &str) -> String {
    format!(
        r#"<div class="kpi"><div class="kpi-label">{}</div><div class="kpi-value">{}</div><div class="kpi-sub">{}</div></div>"#,
        html_escape(label),
        html_escape(value),
        html_escape(sub),
    )
}

pub fn kpi_row(cards: &[String]) -> String {
    format!(r#"<div class="kpis">{}</div>"#, cards.concat())
}

pub fn caption(text: &str) -> String {
    format!(r#"<p class="caption">{}</p>"#, html_escape(text))
}

pub fn notice(text: &str) -> String {
    format!(r#"<div class="notice">{}</div>"#, html_escape(text))
}

/// Charts on one page, each with an optional caption underneath.
#[derive(Debug, Default)]
pub struct ChartGrid {
    blocks: Vec<String>,
}

impl ChartGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chart. Empty-state charts show their message instead, and the
    /// caption is dropped with them.
    pub fn push(&mut self, output: &ChartOutput, note: Option<String>) {
        let block = if output.is_empty() {
            let message = output
                .spec
                .empty_message
                .as_deref()
                .unwrap_or(NO_DATA_MESSAGE);
            format!(
                r#"<section class="chart"><h3>{}</h3>{}</section>"#,
                html_escape(&output.spec.title),
                notice(message),
            )
        } else {
            let id = format!("chart-{}", self.blocks.len());
            let spec = to_vega_lite(output).to_string().replace("</", "<\\/");
            let note = note.map(|n| caption(&n)).unwrap_or_default();
            format!(
                r#"<section class="chart"><div id="{id}" class="vega"></div><script type="application/json" data-chart="{id}">{spec}</script>{note}</section>"#
            )
        };
        self.blocks.push(block);
    }

    pub fn render(&self) -> String {
        format!(r#"<div class="charts">{}</div>"#, self.blocks.concat())
    }
}

/// Scrollable table of every row, or the no-data notice.
pub fn table_html(table: &Table) -> String {
    if table.is_empty() {
        return notice(NO_DATA_MESSAGE);
    }

    let mut html = format!(r#"<p class="count">{} rows</p>"#, table.len());
    html.push_str(r#"<div class="table-wrap"><table><thead><tr>"#);
    for column in table.columns() {
        html.push_str(&format!("<th>{}</th>", html_escape(column)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in table.iter() {
        html.push_str("<tr>");
        for value in row.values() {
            let class = if matches!(value, Value::Int(_) | Value::Float(_)) {
                r#" class="num""#
            } else {
                ""
            };
            html.push_str(&format!("<td{}>{}</td>", class, html_escape(&value.to_string())));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

/// Form controls for one page's filters.
#[derive(Debug, Default)]
pub struct FilterForm {
    fields: String,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date input. `value` is only the bound the viewer set; `limits` (the
    /// data's own range) go into `min`/`max` so an untouched form stays open.
    pub fn date(
        mut self,
        name: &str,
        label: &str,
        value: Option<NaiveDate>,
        limits: Option<(NaiveDate, NaiveDate)>,
    ) -> Self {
        let value = value.map(|d| d.to_string()).unwrap_or_default();
        let limits = limits
            .map(|(lo, hi)| format!(r#" min="{lo}" max="{hi}""#))
            .unwrap_or_default();
        self.fields.push_str(&format!(
            r#"<label>{} <input type="date" name="{}" value="{}"{}></label>"#,
            html_escape(label),
            html_escape(name),
            value,
            limits,
        ));
        self
    }

    /// Whole-year input, shaped like [`FilterForm::date`].
    pub fn year(
        mut self,
        name: &str,
        label: &str,
        value: Option<i64>,
        limits: Option<(i64, i64)>,
    ) -> Self {
        let value = value.map(|y| y.to_string()).unwrap_or_default();
        let limits = limits
            .map(|(lo, hi)| format!(r#" min="{lo}" max="{hi}" placeholder="{lo}-{hi}""#))
            .unwrap_or_default();
        self.fields.push_str(&format!(
            r#"<label>{} <input type="number" step="1" name="{}" value="{}"{}></label>"#,
            html_escape(label),
            html_escape(name),
            value,
            limits,
        ));
        self
    }

    /// Drop-down over `options` with a leading "(All)" entry.
    pub fn select(mut self, name: &str, label: &str, options: &[Value], selected: Option<&str>) -> Self {
        let mut html = format!(
            r#"<label>{} <select name="{}"><option value="">(All)</option>"#,
            html_escape(label),
            html_escape(name)
        );
        for option in options {
            let text = option.to_string();
            let mark = if selected == Some(text.as_str()) { " selected" } else { "" };
            html.push_str(&format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                html_escape(&text),
                mark
            ));
        }
        html.push_str("</select></label>");
        self.fields.push_str(&html);
        self
    }

    pub fn search(mut self, name: &str, placeholder: &str, value: Option<&str>) -> Self {
        self.fields.push_str(&format!(
            r#"<label>Search <input type="search" name="{}" placeholder="{}" value="{}"></label>"#,
            html_escape(name),
            html_escape(placeholder),
            html_escape(value.unwrap_or_default()),
        ));
        self
    }

    pub fn render(&self, action: &str) -> String {
        format!(
            r#"<form class="filters" action="{}" method="get">{}<button type="submit">Apply</button></form>"#,
            html_escape(action),
            self.fields
        )
    }
}

/// Download button for `action` carrying the current filter as hidden fields.
pub fn export_button(action: &str, params: &[(&str, &str)]) -> String {
    let mut hidden = String::new();
    for (name, value) in params {
        hidden.push_str(&format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            html_escape(name),
            html_escape(value)
        ));
    }
    format!(
        r#"<form class="export" action="{}" method="get">{}<button type="submit">Download CSV</button></form>"#,
        html_escape(action),
        hidden
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// HTML Templates
// ============================================================================

const LAYOUT_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title><!-- TITLE --> - Seperlima Library</title>
    <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
    <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
    <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
        nav { display: flex; gap: 1rem; padding: 1rem 2rem; background: #1e293b; }
        nav a { color: #cbd5e1; text-decoration: none; }
        nav a.active { color: #ffffff; font-weight: bold; }
        main { max-width: 1200px; margin: 0 auto; padding: 2rem; }
        h1 { margin-top: 0; }
        .kpis { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
        .kpi { background: #ffffff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .kpi-label { color: #64748b; font-size: 0.85rem; }
        .kpi-value { font-size: 1.8rem; font-weight: bold; margin: 0.3rem 0; }
        .kpi-sub { color: #94a3b8; font-size: 0.8rem; }
        .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(480px, 1fr)); gap: 1.5rem; }
        .chart { background: #ffffff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
        .chart h3 { margin-top: 0; font-size: 1rem; }
        .vega { width: 100%; }
        .caption { color: #475569; font-size: 0.9rem; }
        .notice { background: #e0f2fe; color: #075985; border-radius: 6px; padding: 0.8rem 1rem; }
        .filters, .export { display: flex; flex-wrap: wrap; gap: 1rem; align-items: end; margin-bottom: 1rem; }
        .filters label { display: flex; flex-direction: column; font-size: 0.85rem; color: #475569; }
        .count { color: #64748b; }
        .table-wrap { max-height: 350px; overflow: auto; margin-bottom: 1rem; background: #ffffff; }
        table { border-collapse: collapse; width: 100%; font-size: 0.85rem; }
        th, td { border-bottom: 1px solid #e2e8f0; padding: 0.3rem 0.6rem; text-align: left; white-space: nowrap; }
        th { position: sticky; top: 0; background: #f1f5f9; }
        td.num { text-align: right; }
    </style>
</head>
<body>
    <nav><!-- NAV --></nav>
    <main>
        <h1><!-- TITLE --></h1>
        <!-- BODY -->
    </main>
    <script>
        document.querySelectorAll("script[data-chart]").forEach(function (node) {
            vegaEmbed("#" + node.dataset.chart, JSON.parse(node.textContent), { actions: false });
        });
    </script>
</body>
</html>"##;

const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Error - Seperlima Library</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 2rem; background: #f8fafc; color: #0f172a; }
        h1 { color: #b91c1c; }
        pre { background: #fee2e2; color: #7f1d1d; padding: 1rem; border-radius: 6px; white-space: pre-wrap; }
        a { color: #1d4ed8; }
    </style>
</head>
<body>
    <h1>Failed to load data</h1>
    <p>The library database could not be read. Check that it is reachable and try again.</p>
    <pre><!-- CAUSE --></pre>
    <a href="/">Back to overview</a>
</body>
</html>"#;
