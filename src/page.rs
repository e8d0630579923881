//! The dashboard page: selector form, header, chart grid and summary table.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::render::{escape_text, RenderedDashboard};
use crate::time_range::TimeRange;

pub const PAGE_TITLE: &str = "Commodity Overview Dashboard";
pub const CATEGORY_PROMPT: &str = "Select a commodity category";
pub const RANGE_PROMPT: &str = "Select time range";

/// Raw query parameters as submitted by the selector form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub category: Option<String>,
    pub range: Option<String>,
}

/// The two current selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSelection {
    pub category: String,
    pub time_range: TimeRange,
}

impl Default for PageSelection {
    fn default() -> Self {
        Self {
            category: catalog::default_category().name.to_string(),
            time_range: TimeRange::default(),
        }
    }
}

impl PageSelection {
    /// Resolve query parameters: unknown or missing categories select the
    /// first category, unknown or missing ranges select one year.
    pub fn from_query(query: &PageQuery) -> Self {
        let category = query
            .category
            .as_deref()
            .and_then(|name| catalog::lookup(name).ok())
            .unwrap_or_else(catalog::default_category);
        let time_range = query
            .range
            .as_deref()
            .map(TimeRange::resolve)
            .unwrap_or_default();
        Self {
            category: category.name.to_string(),
            time_range,
        }
    }

    /// Section header, e.g. `Metals Data Overview (2Y)`.
    pub fn header(&self) -> String {
        format!("{} Data Overview ({})", self.category, self.time_range)
    }
}

const STYLE: &str = "\
body { font-family: Helvetica, Arial, sans-serif; margin: 2rem; color: #222; }
form { display: flex; gap: 2rem; margin-bottom: 1.5rem; }
label { display: flex; flex-direction: column; gap: 0.3rem; font-size: 0.9rem; }
.grid svg { max-width: 100%; height: auto; }
.error { background: #fdecea; color: #611a15; padding: 1rem; border-radius: 4px; }
table.snapshot { border-collapse: collapse; margin-top: 1.5rem; font-size: 0.9rem; }
table.snapshot th, table.snapshot td { border: 1px solid #ddd; padding: 0.35rem 0.6rem; }
table.snapshot td.num { text-align: right; }
";

fn write_select<'a>(
    html: &mut String,
    name: &str,
    prompt: &str,
    options: impl Iterator<Item = &'a str>,
    selected: &str,
) {
    let _ = writeln!(html, "    <label>{}", escape_text(prompt));
    let _ = writeln!(
        html,
        "      <select name='{}' onchange='this.form.submit()'>",
        name
    );
    for option in options {
        let mark = if option == selected { " selected" } else { "" };
        let value = escape_text(option);
        let _ = writeln!(html, "        <option value='{value}'{mark}>{value}</option>");
    }
    let _ = writeln!(html, "      </select>");
    let _ = writeln!(html, "    </label>");
}

fn page_head(html: &mut String, selection: &PageSelection) {
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang='en'>");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "  <meta charset='utf-8'>");
    let _ = writeln!(html, "  <title>{}</title>", PAGE_TITLE);
    let _ = writeln!(html, "  <style>\n{}  </style>", STYLE);
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "  <h1>{}</h1>", PAGE_TITLE);
    let _ = writeln!(html, "  <form method='get' action='/'>");
    write_select(
        html,
        "category",
        CATEGORY_PROMPT,
        catalog::category_names().into_iter(),
        &selection.category,
    );
    write_select(
        html,
        "range",
        RANGE_PROMPT,
        TimeRange::ALL.iter().map(|r| r.token()),
        selection.time_range.token(),
    );
    let _ = writeln!(html, "    <noscript><button type='submit'>Show</button></noscript>");
    let _ = writeln!(html, "  </form>");
    let _ = writeln!(html, "  <h2>{}</h2>", escape_text(&selection.header()));
}

fn page_tail(html: &mut String) {
    let _ = writeln!(html, "</body>");
    let _ = writeln!(html, "</html>");
}

/// Full HTML page for a rendered category.
pub fn render_page(selection: &PageSelection, rendered: &RenderedDashboard) -> String {
    let mut html = String::new();
    page_head(&mut html, selection);
    let _ = writeln!(html, "  <div class='grid'>");
    html.push_str(&rendered.svg);
    let _ = writeln!(html, "  </div>");
    html.push_str(&rendered.table_html);
    page_tail(&mut html);
    html
}

/// The page shell with an error banner in place of the charts.
pub fn render_error_page(selection: &PageSelection, message: &str) -> String {
    let mut html = String::new();
    page_head(&mut html, selection);
    let _ = writeln!(html, "  <p class='error'>{}</p>", escape_text(message));
    page_tail(&mut html);
    html
}
