//! Dashboard view model
//!
//! Partitions documents into the groupings the dashboard shows (the selected
//! day, its categories, and the calendar of months around it) and attaches a
//! status badge to each grouping. Day tallies are rolled up into months with
//! [`aggregate_counts`], and months into the overall range badge.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::badge::{aggregate_counts, Badge, StatusCatalog};
use crate::models::{Document, Status, StatusCount};
use crate::utils::{date_range, year_range};

/// Column a document list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Type,
    Impact,
    Category,
    Source,
    Document,
    Status,
}

impl SortKey {
    pub const NAMES: [&'static str; 6] = ["type", "impact", "category", "source", "document", "status"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Type => "type",
            SortKey::Impact => "impact",
            SortKey::Category => "category",
            SortKey::Source => "source",
            SortKey::Document => "document",
            SortKey::Status => "status",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "type" => Some(SortKey::Type),
            "impact" => Some(SortKey::Impact),
            "category" => Some(SortKey::Category),
            "source" => Some(SortKey::Source),
            "document" | "title" => Some(SortKey::Document),
            "status" => Some(SortKey::Status),
            _ => None,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Impact
    }
}

/// Sort weight of a status in document tables (open first when descending)
fn status_sort_order(status: Status) -> i64 {
    match status {
        Status::Open => 2,
        Status::Waiting => 1,
        Status::Finished => 0,
        Status::Empty => -1,
    }
}

fn compare_by(key: SortKey, a: &Document, b: &Document) -> Ordering {
    match key {
        SortKey::Type => a.doc_type.cmp(&b.doc_type),
        SortKey::Impact => a.impact.sort_order().cmp(&b.impact.sort_order()),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Source => a.source.cmp(&b.source),
        SortKey::Document => a.title.cmp(&b.title),
        SortKey::Status => status_sort_order(a.status).cmp(&status_sort_order(b.status)),
    }
}

/// Stable sort of documents by a column; ties keep their input order
pub fn sort_documents(documents: &mut [Document], key: SortKey, desc: bool) {
    documents.sort_by(|a, b| {
        let ord = compare_by(key, a, b);
        if desc { ord.reverse() } else { ord }
    });
}

/// A badge slot in the view. Catalog failures stay confined to their slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum BadgeSlot {
    Ready(Badge),
    Failed { counts: StatusCount, error: String },
}

impl BadgeSlot {
    pub fn from_counts(catalog: &StatusCatalog, counts: StatusCount, grouping: &str) -> Self {
        match Badge::for_counts(catalog, counts.clone()) {
            Ok(badge) => BadgeSlot::Ready(badge),
            Err(e) => {
                log::warn!("Cannot render badge for {}: {}", grouping, e);
                BadgeSlot::Failed {
                    counts,
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn counts(&self) -> &StatusCount {
        match self {
            BadgeSlot::Ready(badge) => &badge.counts,
            BadgeSlot::Failed { counts, .. } => counts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub badge: BadgeSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub counts: StatusCount,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    /// `YYYY-MM`
    pub month: String,
    /// e.g. `May 2024`
    pub label: String,
    /// Days of the month that have documents, newest first
    pub days: Vec<DaySummary>,
    pub badge: BadgeSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub sort_by: &'static str,
    pub descending: bool,
    /// Badge for the selected day
    pub header: BadgeSlot,
    pub documents: Vec<Document>,
    pub categories: Vec<CategorySummary>,
    pub calendar: Vec<MonthSummary>,
    /// Roll-up of every month in the calendar
    pub overall: BadgeSlot,
}

/// Options controlling how the selected day's documents are listed
#[derive(Debug, Clone, Copy, Default)]
pub struct DashboardOptions {
    pub sort_by: SortKey,
    pub ascending: bool,
}

impl Dashboard {
    /// Calendar window for a selected day
    pub fn window(date: NaiveDate, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        year_range(Some(date), today)
    }

    /// Build the view from the documents of the calendar window.
    ///
    /// Documents outside the window are ignored for the calendar; the
    /// selected day is always taken from `documents` as given.
    pub fn build(
        catalog: &StatusCatalog,
        documents: &[Document],
        date: NaiveDate,
        today: NaiveDate,
        options: DashboardOptions,
    ) -> Self {
        let (range_start, range_end) = Self::window(date, today);

        let mut day_docs: Vec<Document> = documents.iter().filter(|d| d.date == date).cloned().collect();
        sort_documents(&mut day_docs, options.sort_by, !options.ascending);

        let header = BadgeSlot::from_counts(
            catalog,
            StatusCount::tally(day_docs.iter().map(|d| d.status)),
            &format!("day {}", date),
        );

        let mut by_category: BTreeMap<&str, StatusCount> = BTreeMap::new();
        for doc in &day_docs {
            by_category.entry(doc.category.as_str()).or_default().increment(doc.status, 1);
        }
        let categories = by_category
            .into_iter()
            .map(|(name, counts)| CategorySummary {
                name: name.to_string(),
                badge: BadgeSlot::from_counts(catalog, counts, &format!("category '{}'", name)),
            })
            .collect();

        let calendar = build_calendar(catalog, documents, range_start, range_end);
        let overall = BadgeSlot::from_counts(
            catalog,
            aggregate_counts(calendar.iter().map(|m| m.badge.counts())),
            "calendar",
        );

        Dashboard {
            date,
            range_start,
            range_end,
            sort_by: options.sort_by.as_str(),
            descending: !options.ascending,
            header,
            documents: day_docs,
            categories,
            calendar,
            overall,
        }
    }
}

fn build_calendar(
    catalog: &StatusCatalog,
    documents: &[Document],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<MonthSummary> {
    let mut per_day: BTreeMap<NaiveDate, StatusCount> = BTreeMap::new();
    for doc in documents.iter().filter(|d| d.date >= start && d.date <= end) {
        per_day.entry(doc.date).or_default().increment(doc.status, 1);
    }

    let mut months: Vec<(NaiveDate, Vec<DaySummary>)> = Vec::new();
    for day in date_range(start, end, true) {
        let same_month = months
            .last()
            .map_or(false, |(first, _)| first.year() == day.year() && first.month() == day.month());
        if !same_month {
            months.push((day, Vec::new()));
        }
        if let (Some(counts), Some((_, days))) = (per_day.get(&day), months.last_mut()) {
            days.push(DaySummary {
                date: day,
                counts: counts.clone(),
            });
        }
    }

    months
        .into_iter()
        .map(|(first_day, days)| {
            let month = first_day.format("%Y-%m").to_string();
            let counts = aggregate_counts(days.iter().map(|d| &d.counts));
            let badge = BadgeSlot::from_counts(catalog, counts, &format!("month {}", month));
            MonthSummary {
                label: first_day.format("%B %Y").to_string(),
                month,
                days,
                badge,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::{ColorToken, StatusStyle};
    use crate::models::Impact;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn doc(title: &str, date: NaiveDate, status: Status, category: &str, impact: Impact) -> Document {
        let mut d = Document::new(title.to_string(), date);
        d.status = status;
        d.category = category.to_string();
        d.impact = impact;
        d
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::from_str("Impact"), Some(SortKey::Impact));
        assert_eq!(SortKey::from_str("title"), Some(SortKey::Document));
        assert_eq!(SortKey::from_str("quantity"), None);
        for name in SortKey::NAMES {
            assert_eq!(SortKey::from_str(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn test_sort_by_status_descending_puts_open_first() {
        let day = ymd(2024, 5, 2);
        let mut docs = vec![
            doc("a", day, Status::Finished, "General", Impact::Low),
            doc("b", day, Status::Open, "General", Impact::Low),
            doc("c", day, Status::Waiting, "General", Impact::Low),
        ];
        sort_documents(&mut docs, SortKey::Status, true);
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let day = ymd(2024, 5, 2);
        let mut docs = vec![
            doc("first", day, Status::Open, "General", Impact::High),
            doc("low", day, Status::Open, "General", Impact::Low),
            doc("second", day, Status::Open, "General", Impact::High),
        ];
        sort_documents(&mut docs, SortKey::Impact, true);
        let titles: Vec<&str> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "low"]);

        sort_documents(&mut docs, SortKey::Impact, false);
        assert_eq!(docs[0].title, "low");
    }

    #[test]
    fn test_build_groups_day_and_categories() {
        let catalog = StatusCatalog::standard();
        let today = ymd(2024, 6, 30);
        let day = ymd(2024, 6, 10);
        let docs = vec![
            doc("a", day, Status::Finished, "Securities", Impact::High),
            doc("b", day, Status::Waiting, "Securities", Impact::Low),
            doc("c", day, Status::Finished, "General", Impact::Medium),
            doc("d", ymd(2024, 6, 9), Status::Open, "General", Impact::Medium),
        ];

        let dashboard = Dashboard::build(&catalog, &docs, day, today, DashboardOptions::default());
        assert_eq!(dashboard.documents.len(), 3);
        assert_eq!(dashboard.documents[0].title, "a");

        match &dashboard.header {
            BadgeSlot::Ready(badge) => {
                assert_eq!(badge.status, Status::Waiting);
                assert_eq!(badge.counts.total(), 3);
            }
            other => panic!("unexpected slot {:?}", other),
        }

        let names: Vec<&str> = dashboard.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["General", "Securities"]);
        match &dashboard.categories[0].badge {
            BadgeSlot::Ready(badge) => assert_eq!(badge.status, Status::Finished),
            other => panic!("unexpected slot {:?}", other),
        }
    }

    #[test]
    fn test_calendar_rolls_days_into_months() {
        let catalog = StatusCatalog::standard();
        let today = ymd(2024, 6, 30);
        let docs = vec![
            doc("a", ymd(2024, 6, 10), Status::Finished, "General", Impact::Low),
            doc("b", ymd(2024, 6, 12), Status::Waiting, "General", Impact::Low),
            doc("c", ymd(2024, 6, 12), Status::Finished, "General", Impact::Low),
            doc("d", ymd(2024, 5, 3), Status::Open, "General", Impact::Low),
        ];

        let dashboard = Dashboard::build(&catalog, &docs, ymd(2024, 6, 10), today, DashboardOptions::default());

        let june = &dashboard.calendar[0];
        assert_eq!(june.month, "2024-06");
        assert_eq!(june.label, "June 2024");
        assert_eq!(june.days.len(), 2);
        assert_eq!(june.days[0].date, ymd(2024, 6, 12));
        assert_eq!(june.badge.counts().get(Status::Finished), 2);
        assert_eq!(june.badge.counts().get(Status::Waiting), 1);

        let may = &dashboard.calendar[1];
        assert_eq!(may.month, "2024-05");
        match &may.badge {
            BadgeSlot::Ready(badge) => assert_eq!(badge.status, Status::Open),
            other => panic!("unexpected slot {:?}", other),
        }

        // a month without documents shows the baseline
        let april = &dashboard.calendar[2];
        assert!(april.days.is_empty());
        match &april.badge {
            BadgeSlot::Ready(badge) => assert_eq!(badge.status, Status::Finished),
            other => panic!("unexpected slot {:?}", other),
        }

        assert_eq!(dashboard.overall.counts().total(), 4);
    }

    #[test]
    fn test_calendar_covers_window_months() {
        let catalog = StatusCatalog::standard();
        let today = ymd(2024, 6, 30);
        let dashboard = Dashboard::build(&catalog, &[], today, today, DashboardOptions::default());
        assert_eq!(dashboard.range_end, today);
        assert_eq!(dashboard.calendar.first().unwrap().month, "2024-06");
        assert_eq!(dashboard.calendar.last().unwrap().month, "2023-07");
        assert_eq!(dashboard.calendar.len(), 12);
    }

    #[test]
    fn test_failed_badge_is_isolated() {
        // No style for Finished: groupings that resolve to it fail alone
        let catalog = StatusCatalog::builder()
            .with_entry(Status::Open, StatusStyle::new("UNREAD", ColorToken::Danger, Some(0)))
            .with_entry(Status::Waiting, StatusStyle::new("ON HOLD", ColorToken::Warning, Some(1)))
            .build();
        let today = ymd(2024, 6, 30);
        let day = ymd(2024, 6, 10);
        let docs = vec![
            doc("a", day, Status::Open, "Securities", Impact::High),
            doc("b", day, Status::Finished, "General", Impact::Low),
        ];

        let dashboard = Dashboard::build(&catalog, &docs, day, today, DashboardOptions::default());
        assert!(matches!(dashboard.header, BadgeSlot::Ready(_)));
        assert!(matches!(dashboard.categories[0].badge, BadgeSlot::Failed { .. }));
        assert!(matches!(dashboard.categories[1].badge, BadgeSlot::Ready(_)));
        assert_eq!(dashboard.categories[0].badge.counts().get(Status::Finished), 1);
    }
}
