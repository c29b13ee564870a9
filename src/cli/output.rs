// Output formatting utilities

use crate::badge::{ColorToken, StatusCatalog};
use crate::dashboard::{BadgeSlot, Dashboard};
use crate::models::{Document, Status, StatusCount};
use chrono::{Local, TimeZone};
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

// ANSI foreground colors (standard 16-color palette)
const ANSI_FG_BLACK: &str = "\x1b[30m";
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_BLUE: &str = "\x1b[34m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_WHITE: &str = "\x1b[37m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

// ANSI background colors
const ANSI_BG_BLACK: &str = "\x1b[40m";
const ANSI_BG_RED: &str = "\x1b[41m";
const ANSI_BG_GREEN: &str = "\x1b[42m";
const ANSI_BG_YELLOW: &str = "\x1b[43m";
const ANSI_BG_BLUE: &str = "\x1b[44m";
const ANSI_BG_CYAN: &str = "\x1b[46m";
const ANSI_BG_WHITE: &str = "\x1b[47m";
const ANSI_BG_BRIGHT_BLACK: &str = "\x1b[100m";

/// Map a semantic color token to its ANSI foreground code
pub fn color_token_to_fg(color: ColorToken) -> &'static str {
    match color {
        ColorToken::Primary => ANSI_FG_BLUE,
        ColorToken::Secondary => ANSI_FG_BRIGHT_BLACK,
        ColorToken::Success => ANSI_FG_GREEN,
        ColorToken::Danger => ANSI_FG_RED,
        ColorToken::Warning => ANSI_FG_YELLOW,
        ColorToken::Info => ANSI_FG_CYAN,
        ColorToken::Light => ANSI_FG_WHITE,
        ColorToken::Dark => ANSI_FG_BLACK,
    }
}

/// Map a semantic color token to its ANSI background code
pub fn color_token_to_bg(color: ColorToken) -> &'static str {
    match color {
        ColorToken::Primary => ANSI_BG_BLUE,
        ColorToken::Secondary => ANSI_BG_BRIGHT_BLACK,
        ColorToken::Success => ANSI_BG_GREEN,
        ColorToken::Danger => ANSI_BG_RED,
        ColorToken::Warning => ANSI_BG_YELLOW,
        ColorToken::Info => ANSI_BG_CYAN,
        ColorToken::Light => ANSI_BG_WHITE,
        ColorToken::Dark => ANSI_BG_BLACK,
    }
}

/// Legible text color on top of a badge background
fn contrasting_fg(color: ColorToken) -> &'static str {
    match color {
        ColorToken::Warning | ColorToken::Light | ColorToken::Info => ANSI_FG_BLACK,
        _ => ANSI_FG_WHITE,
    }
}

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Label shown for a status, falling back to the raw key when the catalog
/// cannot style it
fn status_label(catalog: &StatusCatalog, status: Status, is_tty: bool) -> String {
    match catalog.lookup(status) {
        Ok(style) => {
            let text = if style.display_text.is_empty() { "-" } else { style.display_text.as_str() };
            if is_tty {
                format!("{}{}{}", color_token_to_fg(style.color), text, ANSI_RESET)
            } else {
                text.to_string()
            }
        }
        Err(e) => {
            log::warn!("{}", e);
            status.as_str().to_string()
        }
    }
}

/// Visible width of a string, ignoring ANSI escapes
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

fn pad(s: &str, width: usize) -> String {
    let visible = visible_width(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 2 {
        s.chars().take(max).collect()
    } else {
        format!("{}..", s.chars().take(max - 2).collect::<String>())
    }
}

/// Numeric labels for a tally, e.g. `open 1 · waiting 0 · finished 3`
pub fn format_counts(counts: &StatusCount) -> String {
    let mut parts: Vec<String> = [Status::Open, Status::Waiting, Status::Finished]
        .iter()
        .map(|s| format!("{} {}", s.as_str(), counts.get(*s)))
        .collect();
    let empty = counts.get(Status::Empty);
    if empty > 0 {
        parts.push(format!("unset {}", empty));
    }
    parts.join(" · ")
}

/// Render one badge slot. A failed slot renders as a placeholder; it never
/// aborts the surrounding output.
pub fn format_badge(slot: &BadgeSlot, is_tty: bool) -> String {
    match slot {
        BadgeSlot::Ready(badge) => {
            let text = if badge.display_text.is_empty() {
                badge.status.as_str().to_uppercase()
            } else {
                badge.display_text.clone()
            };
            let label = if is_tty {
                format!(
                    "{}{} {} {}",
                    color_token_to_bg(badge.color),
                    contrasting_fg(badge.color),
                    text,
                    ANSI_RESET
                )
            } else {
                format!("[{}]", text)
            };
            format!("{} {}", label, format_counts(&badge.counts))
        }
        BadgeSlot::Failed { counts, .. } => {
            format!("[?] {}", format_counts(counts))
        }
    }
}

/// Format a list of documents as a table
pub fn format_document_table(documents: &[Document], catalog: &StatusCatalog, is_tty: bool) -> String {
    if documents.is_empty() {
        return "No documents found.".to_string();
    }

    let headers = ["ID", "Date", "Type", "Impact", "Category", "Source", "Status", "Document"];
    let rows: Vec<Vec<String>> = documents
        .iter()
        .map(|doc| {
            vec![
                doc.id.map(|id| id.to_string()).unwrap_or_default(),
                doc.date.format("%Y-%m-%d").to_string(),
                doc.doc_type.clone(),
                doc.impact.as_str().to_string(),
                doc.category.clone(),
                truncate(&doc.source, 30),
                status_label(catalog, doc.status, is_tty),
                doc.title.clone(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    // The title column gets whatever is left of the terminal
    let last = headers.len() - 1;
    let fixed: usize = widths[..last].iter().map(|w| w + 2).sum();
    let title_width = get_terminal_width().saturating_sub(fixed).max(20);

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| if i == last { h.to_string() } else { pad(h, widths[i]) })
        .collect();
    out.push_str(&bold_if_tty(&header_line.join("  "), is_tty));
    out.push('\n');

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| if i == last { truncate(cell, title_width) } else { pad(cell, widths[i]) })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }

    out.trim_end().to_string()
}

/// Detailed view of one document
pub fn format_document_summary(doc: &Document, catalog: &StatusCatalog, is_tty: bool) -> String {
    let fields = [
        ("ID", doc.id.map(|id| id.to_string()).unwrap_or_default()),
        ("UUID", doc.uuid.clone()),
        ("Document", doc.title.clone()),
        ("Date", doc.date.format("%Y-%m-%d").to_string()),
        ("Type", doc.doc_type.clone()),
        ("Impact", doc.impact.as_str().to_string()),
        ("Category", doc.category.clone()),
        ("Source", doc.source.clone()),
        ("Status", status_label(catalog, doc.status, is_tty)),
        ("Created", format_timestamp(doc.created_ts)),
        ("Modified", format_timestamp(doc.modified_ts)),
    ];
    fields
        .iter()
        .map(|(name, value)| format!("{} {}", bold_if_tty(&format!("{:<10}", name), is_tty), value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the whole dashboard
pub fn format_dashboard(dashboard: &Dashboard, catalog: &StatusCatalog, is_tty: bool) -> String {
    let mut out = String::new();

    out.push_str(&bold_if_tty(
        &format!("CRAWLBOARD DASHBOARD {}", dashboard.date.format("%d/%m/%Y")),
        is_tty,
    ));
    out.push('\n');
    out.push_str(&format_badge(&dashboard.header, is_tty));
    out.push_str("\n\n");

    out.push_str(&bold_if_tty(
        &format!(
            "DOCUMENTS (sorted by {}, {})",
            dashboard.sort_by,
            if dashboard.descending { "desc" } else { "asc" }
        ),
        is_tty,
    ));
    out.push('\n');
    out.push_str(&format_document_table(&dashboard.documents, catalog, is_tty));
    out.push_str("\n\n");

    out.push_str(&bold_if_tty("CATEGORIES", is_tty));
    out.push('\n');
    if dashboard.categories.is_empty() {
        out.push_str("  no documents on this day\n");
    }
    let name_width = dashboard.categories.iter().map(|c| c.name.chars().count()).max().unwrap_or(0);
    for category in &dashboard.categories {
        out.push_str(&format!(
            "  {}  {}\n",
            pad(&category.name, name_width),
            format_badge(&category.badge, is_tty)
        ));
    }
    out.push('\n');

    out.push_str(&bold_if_tty(
        &format!(
            "CALENDAR {} .. {}",
            dashboard.range_start.format("%Y-%m-%d"),
            dashboard.range_end.format("%Y-%m-%d")
        ),
        is_tty,
    ));
    out.push('\n');
    let label_width = dashboard.calendar.iter().map(|m| m.label.chars().count()).max().unwrap_or(0);
    for month in &dashboard.calendar {
        out.push_str(&format!(
            "  {}  {}\n",
            pad(&month.label, label_width),
            format_badge(&month.badge, is_tty)
        ));
    }
    out.push_str(&format!("  {}  {}", pad("Total", label_width), format_badge(&dashboard.overall, is_tty)));

    out
}

/// Render the active status catalog
pub fn format_catalog(catalog: &StatusCatalog, is_tty: bool) -> String {
    let mut out = bold_if_tty(&format!("{:<10} {:<12} {:<10} {}", "Status", "Text", "Color", "Rank"), is_tty);
    for (status, style) in catalog.entries() {
        let key = if status.as_str().is_empty() { "(empty)" } else { status.as_str() };
        let rank = style.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
        let text = if is_tty {
            pad(
                &format!("{}{}{}", color_token_to_fg(style.color), style.display_text, ANSI_RESET),
                12,
            )
        } else {
            format!("{:<12}", style.display_text)
        };
        out.push_str(&format!("\n{:<10} {} {:<10} {}", key, text, style.color.as_str(), rank));
    }
    out
}

/// Format timestamp for display
pub fn format_timestamp(ts: i64) -> String {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}
