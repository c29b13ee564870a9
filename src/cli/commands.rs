use clap::{Parser, Subcommand};
use rusqlite::Connection;
use chrono::NaiveDate;
use serde_json::json;
use crate::badge::StatusCatalog;
use crate::config::Config;
use crate::dashboard::{sort_documents, BadgeSlot, Dashboard, DashboardOptions, SortKey};
use crate::db::DbConnection;
use crate::models::{Document, Impact, Status, StatusCount};
use crate::repo::{DocumentRepo, StatusUpdateError};
use crate::cli::abbrev;
use crate::cli::error::{user_error, validate_category, validate_document_id, validate_non_empty};
use crate::cli::output::{
    format_badge, format_catalog, format_dashboard, format_document_summary, format_document_table, is_tty,
};
use crate::utils::{fuzzy, parse_date_arg, today};
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "crawlboard")]
#[command(about = "Crawlboard - review dashboard for crawled documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a crawled document
    Add {
        /// Document category (e.g. "Securities")
        #[arg(long)]
        category: Option<String>,
        /// Impact: high, medium or low
        #[arg(long)]
        impact: Option<String>,
        /// Document type (e.g. "Regulation", "Guideline", "FAQ")
        #[arg(long = "type")]
        doc_type: Option<String>,
        /// Where the document was crawled from
        #[arg(long)]
        source: Option<String>,
        /// Crawl date (YYYY-MM-DD, today, yesterday); defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Initial status: open, waiting or finished
        #[arg(long)]
        status: Option<String>,
        /// Document title
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        title: Vec<String>,
    },
    /// List documents
    List {
        /// Only documents crawled on this day
        #[arg(long)]
        date: Option<String>,
        /// Sort column: type, impact, category, source, document, status
        #[arg(long)]
        sort: Option<String>,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show detailed summary of a document
    Show {
        /// Document ID
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Change the review status of a document
    SetStatus {
        /// Document ID
        id: String,
        /// New status: open, waiting or finished
        status: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Change impact, type or category of a document
    Modify {
        /// Document ID
        id: String,
        #[arg(long)]
        impact: Option<String>,
        #[arg(long = "type")]
        doc_type: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
    /// Daily dashboard with status badges per category and month
    Dashboard {
        /// Day to show (YYYY-MM-DD, today, yesterday); defaults to today
        date: Option<String>,
        /// Sort column: type, impact, category, source, document, status
        #[arg(long)]
        sort: Option<String>,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show the status catalog (display text, color, rank)
    Catalog {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => user_error(&e),
    };

    let cli = Cli::parse_from(std::iter::once("crawlboard".to_string()).chain(args));

    let config = Config::load()?;
    let conn = DbConnection::connect(&config)
        .context("Failed to connect to database")?;

    handle_command(cli.command, &conn, &config.catalog)
}

fn handle_command(command: Commands, conn: &Connection, catalog: &StatusCatalog) -> Result<()> {
    match command {
        Commands::Add { category, impact, doc_type, source, date, status, title } => {
            handle_add(conn, title, category, impact, doc_type, source, date, status)
        }
        Commands::List { date, sort, asc, json } => handle_list(conn, catalog, date, sort, asc, json),
        Commands::Show { id, json } => handle_show(conn, catalog, &id, json),
        Commands::SetStatus { id, status, json } => handle_set_status(conn, catalog, &id, &status, json),
        Commands::Modify { id, impact, doc_type, category } => {
            handle_modify(conn, &id, impact, doc_type, category)
        }
        Commands::Delete { id } => handle_delete(conn, &id),
        Commands::Dashboard { date, sort, asc, json } => handle_dashboard(conn, catalog, date, sort, asc, json),
        Commands::Catalog { json } => handle_catalog(catalog, json),
    }
}

fn parse_id_or_exit(id: &str) -> i64 {
    validate_document_id(id).unwrap_or_else(|e| user_error(&e))
}

fn parse_date_or_exit(expr: Option<&str>) -> NaiveDate {
    let today = today();
    match expr {
        Some(expr) => parse_date_arg(expr, today).unwrap_or_else(|e| user_error(&e.to_string())),
        None => today,
    }
}

fn parse_impact_or_exit(value: &str) -> Impact {
    Impact::from_str(&value.to_lowercase()).unwrap_or_else(|| {
        user_error(&format!("Invalid impact '{}'. Impact must be one of: high, medium, low", value))
    })
}

fn parse_sort_or_exit(value: Option<&str>) -> SortKey {
    match value {
        None => SortKey::default(),
        Some(value) => SortKey::from_str(value).unwrap_or_else(|| {
            let mut message = format!("Unknown sort column '{}'", value);
            if let Some(suggestion) = fuzzy::closest_match(value, &SortKey::NAMES, 2) {
                message.push_str(&format!("\n  Did you mean '{}'?", suggestion));
            }
            user_error(&message)
        }),
    }
}

fn invalid_status_message(value: &str) -> String {
    let mut message = StatusUpdateError::InvalidStatus(value.to_string()).to_string();
    if let Some(suggestion) = fuzzy::closest_match(value, &["open", "waiting", "finished"], 2) {
        message.push_str(&format!("\n  Did you mean '{}'?", suggestion));
    }
    message
}

fn load_or_exit(conn: &Connection, id: i64) -> Result<Document> {
    match DocumentRepo::get_by_id(conn, id)? {
        Some(doc) => Ok(doc),
        None => user_error(&format!("Document {} not found", id)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Warn when a new category looks like a typo of an existing one
fn warn_near_categories(conn: &Connection, category: &str) -> Result<()> {
    let mut existing: Vec<String> = DocumentRepo::list_all(conn)?
        .into_iter()
        .map(|d| d.category)
        .collect();
    existing.sort();
    existing.dedup();
    if existing.iter().any(|c| c == category) {
        return Ok(());
    }
    let near = fuzzy::find_near_category_matches(category, &existing, 2);
    if !near.is_empty() {
        let names: Vec<String> = near.into_iter().map(|(name, _)| format!("'{}'", name)).collect();
        eprintln!("Note: '{}' is a new category. Similar existing: {}", category, names.join(", "));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_add(
    conn: &Connection,
    title: Vec<String>,
    category: Option<String>,
    impact: Option<String>,
    doc_type: Option<String>,
    source: Option<String>,
    date: Option<String>,
    status: Option<String>,
) -> Result<()> {
    let title = title.join(" ");
    if let Err(e) = validate_non_empty(&title, "Document title") {
        user_error(&e);
    }

    let mut document = Document::new(title.trim().to_string(), parse_date_or_exit(date.as_deref()));

    if let Some(category) = category {
        if let Err(e) = validate_category(&category) {
            user_error(&e);
        }
        warn_near_categories(conn, &category)?;
        document.category = category;
    }
    if let Some(impact) = impact {
        document.impact = parse_impact_or_exit(&impact);
    }
    if let Some(doc_type) = doc_type {
        if let Err(e) = validate_non_empty(&doc_type, "Document type") {
            user_error(&e);
        }
        document.doc_type = doc_type;
    }
    if let Some(source) = source {
        document.source = source;
    }
    if let Some(status) = status {
        document.status = Status::from_str(&status)
            .filter(Status::is_assignable)
            .unwrap_or_else(|| user_error(&invalid_status_message(&status)));
    }

    let document = DocumentRepo::create(conn, document)?;
    println!(
        "Created document {}: {}",
        document.id.unwrap_or_default(),
        document.title
    );
    Ok(())
}

fn handle_list(
    conn: &Connection,
    catalog: &StatusCatalog,
    date: Option<String>,
    sort: Option<String>,
    asc: bool,
    json: bool,
) -> Result<()> {
    let mut documents = match date.as_deref() {
        Some(expr) => DocumentRepo::list_by_date(conn, parse_date_or_exit(Some(expr)))?,
        None => DocumentRepo::list_all(conn)?,
    };
    if sort.is_some() {
        sort_documents(&mut documents, parse_sort_or_exit(sort.as_deref()), !asc);
    }

    if json {
        let counts = StatusCount::tally(documents.iter().map(|d| d.status));
        return print_json(&json!({
            "documents": documents,
            "counts": counts,
            "badge": BadgeSlot::from_counts(catalog, counts.clone(), "document list"),
        }));
    }

    println!("{}", format_document_table(&documents, catalog, is_tty()));
    Ok(())
}

fn handle_show(conn: &Connection, catalog: &StatusCatalog, id: &str, json: bool) -> Result<()> {
    let document = load_or_exit(conn, parse_id_or_exit(id))?;
    if json {
        return print_json(&document);
    }
    println!("{}", format_document_summary(&document, catalog, is_tty()));
    Ok(())
}

/// Accept a status change, then recompute the badge of the document's day
/// from the updated list.
fn handle_set_status(
    conn: &Connection,
    catalog: &StatusCatalog,
    id: &str,
    status: &str,
    json: bool,
) -> Result<()> {
    let id = parse_id_or_exit(id);

    let accepted = match DocumentRepo::set_status(conn, id, status) {
        Ok(accepted) => accepted,
        Err(e) => match e.downcast_ref::<StatusUpdateError>() {
            Some(StatusUpdateError::InvalidStatus(value)) => {
                if json {
                    print_json(&json!({ "success": false }))?;
                    std::process::exit(1);
                }
                user_error(&invalid_status_message(value))
            }
            Some(StatusUpdateError::NotFound(_)) => user_error(&e.to_string()),
            None => return Err(e),
        },
    };

    let document = load_or_exit(conn, id)?;
    let day_docs = DocumentRepo::list_by_date(conn, document.date)?;
    let badge = BadgeSlot::from_counts(
        catalog,
        StatusCount::tally(day_docs.iter().map(|d| d.status)),
        &format!("day {}", document.date),
    );

    if json {
        return print_json(&json!({
            "success": true,
            "update": { "status": accepted },
            "badge": badge,
        }));
    }

    println!("Document {} status set to {}", id, accepted.as_str());
    println!("{}: {}", document.date.format("%Y-%m-%d"), format_badge(&badge, is_tty()));
    Ok(())
}

fn handle_modify(
    conn: &Connection,
    id: &str,
    impact: Option<String>,
    doc_type: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let id = parse_id_or_exit(id);
    if impact.is_none() && doc_type.is_none() && category.is_none() {
        user_error("Nothing to modify. Use --impact, --type or --category.");
    }

    let impact = impact.as_deref().map(parse_impact_or_exit);
    if let Some(category) = category.as_deref() {
        if let Err(e) = validate_category(category) {
            user_error(&e);
        }
        warn_near_categories(conn, category)?;
    }
    if let Some(doc_type) = doc_type.as_deref() {
        if let Err(e) = validate_non_empty(doc_type, "Document type") {
            user_error(&e);
        }
    }

    load_or_exit(conn, id)?;
    let document = DocumentRepo::update_properties(conn, id, impact, doc_type.as_deref(), category.as_deref())?;
    println!(
        "Modified document {}: impact={}, type={}, category={}",
        id,
        document.impact.as_str(),
        document.doc_type,
        document.category
    );
    Ok(())
}

fn handle_delete(conn: &Connection, id: &str) -> Result<()> {
    let id = parse_id_or_exit(id);
    let document = load_or_exit(conn, id)?;
    DocumentRepo::delete(conn, id)?;
    println!("Deleted document {}: {}", id, document.title);
    Ok(())
}

fn handle_dashboard(
    conn: &Connection,
    catalog: &StatusCatalog,
    date: Option<String>,
    sort: Option<String>,
    asc: bool,
    json: bool,
) -> Result<()> {
    let today = today();
    let date = match date.as_deref() {
        // An unparseable day falls back to today, like a bad dashboard URL
        Some(expr) => parse_date_arg(expr, today).unwrap_or_else(|e| {
            log::warn!("{}; showing today instead", e);
            today
        }),
        None => today,
    };
    let options = DashboardOptions {
        sort_by: parse_sort_or_exit(sort.as_deref()),
        ascending: asc,
    };

    // A future day lies outside the calendar window but still lists its documents
    let (start, end) = Dashboard::window(date, today);
    let documents = DocumentRepo::list_between(conn, start.min(date), end.max(date))?;

    let dashboard = Dashboard::build(catalog, &documents, date, today, options);

    if json {
        return print_json(&dashboard);
    }
    println!("{}", format_dashboard(&dashboard, catalog, is_tty()));
    Ok(())
}

fn handle_catalog(catalog: &StatusCatalog, json: bool) -> Result<()> {
    if json {
        let entries: Vec<serde_json::Value> = catalog
            .entries()
            .map(|(status, style)| {
                json!({
                    "status": status,
                    "display_text": style.display_text,
                    "color": style.color,
                    "rank": style.rank,
                })
            })
            .collect();
        return print_json(&entries);
    }
    println!("{}", format_catalog(catalog, is_tty()));
    Ok(())
}
