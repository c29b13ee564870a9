use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

/// Review status of a crawled document
///
/// - Open: nobody has looked at the document yet
/// - Waiting: put on hold
/// - Finished: assigned / resolved
/// - Empty: no status assigned (e.g. while an update is in flight)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Waiting,
    Finished,
    #[serde(rename = "")]
    Empty,
}

impl Status {
    /// All variants in declaration order
    pub const ALL: [Status; 4] = [Status::Open, Status::Waiting, Status::Finished, Status::Empty];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Waiting => "waiting",
            Status::Finished => "finished",
            Status::Empty => "",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Status::Open),
            "waiting" => Some(Status::Waiting),
            "finished" => Some(Status::Finished),
            "" => Some(Status::Empty),
            _ => None,
        }
    }

    /// Statuses a document can be moved to through a status update
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Status::Empty)
    }
}

/// Per-status tally for a grouping of documents.
///
/// Derived on demand from the documents of a grouping, never stored.
/// A status that was never counted and a status counted zero times compare
/// equal. Counts saturate at `u64::MAX`.
#[derive(Debug, Clone, Default)]
pub struct StatusCount {
    counts: BTreeMap<Status, u64>,
}

impl StatusCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count each status in `statuses`
    pub fn tally<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        let mut count = Self::new();
        for status in statuses {
            count.increment(status, 1);
        }
        count
    }

    pub fn get(&self, status: Status) -> u64 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, status: Status, n: u64) {
        let slot = self.counts.entry(status).or_insert(0);
        *slot = slot.saturating_add(n);
    }

    /// Number of documents in the grouping
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, n| acc.saturating_add(*n))
    }

    /// True when every count is zero (or nothing was counted)
    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|&n| n == 0)
    }

    /// Iterate over the stored (status, count) pairs, zero counts included
    pub fn iter(&self) -> impl Iterator<Item = (Status, u64)> + '_ {
        self.counts.iter().map(|(status, n)| (*status, *n))
    }
}

impl PartialEq for StatusCount {
    fn eq(&self, other: &Self) -> bool {
        Status::ALL.iter().all(|s| self.get(*s) == other.get(*s))
    }
}

impl Eq for StatusCount {}

impl FromIterator<(Status, u64)> for StatusCount {
    fn from_iter<I: IntoIterator<Item = (Status, u64)>>(iter: I) -> Self {
        let mut count = Self::new();
        for (status, n) in iter {
            count.increment(status, n);
        }
        count
    }
}

impl AddAssign<&StatusCount> for StatusCount {
    fn add_assign(&mut self, rhs: &StatusCount) {
        for (status, n) in rhs.iter() {
            self.increment(status, n);
        }
    }
}

impl AddAssign for StatusCount {
    fn add_assign(&mut self, rhs: StatusCount) {
        *self += &rhs;
    }
}

impl Add for StatusCount {
    type Output = StatusCount;

    fn add(mut self, rhs: StatusCount) -> StatusCount {
        self += &rhs;
        self
    }
}

impl<'a> std::iter::Sum<&'a StatusCount> for StatusCount {
    fn sum<I: Iterator<Item = &'a StatusCount>>(iter: I) -> Self {
        let mut total = StatusCount::new();
        for count in iter {
            total += count;
        }
        total
    }
}

impl std::iter::Sum for StatusCount {
    fn sum<I: Iterator<Item = StatusCount>>(iter: I) -> Self {
        iter.fold(StatusCount::new(), |acc, count| acc + count)
    }
}

// Always emits the three assignable statuses so the render layer can fill
// every numeric label, even for groupings that never saw one of them.
impl Serialize for StatusCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let empty = self.get(Status::Empty);
        let len = if empty > 0 { 4 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        for status in [Status::Open, Status::Waiting, Status::Finished] {
            map.serialize_entry(status.as_str(), &self.get(status))?;
        }
        if empty > 0 {
            map.serialize_entry(Status::Empty.as_str(), &empty)?;
        }
        map.end()
    }
}
