// Reduction of status tallies to a single dominant status

use serde::Serialize;

use super::catalog::{CatalogError, ColorToken, StatusCatalog};
use crate::models::{Status, StatusCount};

/// Pick the most urgent status present in `counts`.
///
/// Starts from `Finished` and only moves to a status with a non-zero count
/// whose rank is strictly lower than the current one. Unranked statuses and
/// statuses missing from the catalog never dominate. Empty or all-zero
/// tallies resolve to `Finished`.
pub fn dominant(catalog: &StatusCatalog, counts: &StatusCount) -> Status {
    let mut dominant = Status::Finished;
    let mut dominant_rank = catalog.rank(Status::Finished);

    for (status, style) in catalog.entries() {
        if counts.get(status) == 0 {
            continue;
        }
        let Some(rank) = style.rank else {
            continue;
        };
        if dominant_rank.map_or(true, |current| rank < current) {
            dominant = status;
            dominant_rank = Some(rank);
        }
    }

    dominant
}

/// Dominant status of a list of raw statuses
pub fn dominant_of<I>(catalog: &StatusCatalog, statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    dominant(catalog, &StatusCount::tally(statuses))
}

/// Element-wise sum of child tallies (e.g. days rolled into a month)
pub fn aggregate_counts<'a, I>(children: I) -> StatusCount
where
    I: IntoIterator<Item = &'a StatusCount>,
{
    children.into_iter().sum()
}

/// Everything the render layer needs for one summary badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub status: Status,
    pub display_text: String,
    pub color: ColorToken,
    pub counts: StatusCount,
}

impl Badge {
    pub fn for_counts(catalog: &StatusCatalog, counts: StatusCount) -> Result<Self, CatalogError> {
        let status = dominant(catalog, &counts);
        let style = catalog.lookup(status)?;
        Ok(Self {
            status,
            display_text: style.display_text.clone(),
            color: style.color,
            counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::catalog::StatusStyle;

    fn counts(open: u64, waiting: u64, finished: u64) -> StatusCount {
        [(Status::Open, open), (Status::Waiting, waiting), (Status::Finished, finished)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_empty_and_all_zero_resolve_to_finished() {
        let catalog = StatusCatalog::standard();
        assert_eq!(dominant(&catalog, &StatusCount::new()), Status::Finished);
        assert_eq!(dominant(&catalog, &counts(0, 0, 0)), Status::Finished);
    }

    #[test]
    fn test_waiting_beats_finished() {
        let catalog = StatusCatalog::standard();
        assert_eq!(dominant(&catalog, &counts(0, 3, 5)), Status::Waiting);
    }

    #[test]
    fn test_rank_not_count_decides() {
        let catalog = StatusCatalog::standard();
        assert_eq!(dominant(&catalog, &counts(1, 0, 100)), Status::Open);
    }

    #[test]
    fn test_empty_status_never_dominates() {
        let catalog = StatusCatalog::standard();
        let only_empty = StatusCount::tally([Status::Empty, Status::Empty]);
        assert_eq!(dominant(&catalog, &only_empty), Status::Finished);

        let mixed = StatusCount::tally([Status::Empty, Status::Waiting]);
        assert_eq!(dominant(&catalog, &mixed), Status::Waiting);
    }

    #[test]
    fn test_duplicate_ranks_first_declared_wins() {
        let catalog = StatusCatalog::builder()
            .with_entry(Status::Waiting, StatusStyle::new("HOLD", ColorToken::Warning, Some(0)))
            .with_entry(Status::Open, StatusStyle::new("NEW", ColorToken::Danger, Some(0)))
            .with_entry(Status::Finished, StatusStyle::new("DONE", ColorToken::Success, Some(2)))
            .build();
        assert_eq!(dominant(&catalog, &counts(1, 1, 0)), Status::Waiting);
    }

    #[test]
    fn test_status_missing_from_catalog_is_skipped() {
        let catalog = StatusCatalog::builder()
            .with_entry(Status::Finished, StatusStyle::new("DONE", ColorToken::Success, Some(2)))
            .build();
        assert_eq!(dominant(&catalog, &counts(4, 0, 0)), Status::Finished);
    }

    #[test]
    fn test_dominant_of_raw_statuses() {
        let catalog = StatusCatalog::standard();
        assert_eq!(
            dominant_of(&catalog, [Status::Finished, Status::Waiting, Status::Finished]),
            Status::Waiting
        );
        assert_eq!(dominant_of(&catalog, []), Status::Finished);
    }

    #[test]
    fn test_aggregate_counts_sums_children() {
        let days = vec![counts(1, 0, 2), counts(0, 3, 1), StatusCount::new()];
        let month = aggregate_counts(&days);
        assert_eq!(month, counts(1, 3, 3));
        assert_eq!(month.total(), 7);
    }

    #[test]
    fn test_badge_for_counts() {
        let catalog = StatusCatalog::standard();
        let badge = Badge::for_counts(&catalog, counts(0, 2, 1)).unwrap();
        assert_eq!(badge.status, Status::Waiting);
        assert_eq!(badge.display_text, "ON HOLD");
        assert_eq!(badge.color, ColorToken::Warning);
        assert_eq!(badge.counts.total(), 3);
    }

    #[test]
    fn test_badge_fails_when_dominant_has_no_style() {
        // Finished is the fallback but this catalog cannot render it
        let catalog = StatusCatalog::builder()
            .with_entry(Status::Open, StatusStyle::new("NEW", ColorToken::Danger, Some(0)))
            .build();
        assert_eq!(
            Badge::for_counts(&catalog, counts(0, 0, 3)),
            Err(CatalogError::UnknownStatus("finished".to_string()))
        );
        assert!(Badge::for_counts(&catalog, counts(1, 0, 3)).is_ok());
    }
}
