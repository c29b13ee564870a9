use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Status;

/// Estimated impact of a document change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "high",
            Impact::Medium => "medium",
            Impact::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Impact::High),
            "medium" => Some(Impact::Medium),
            "low" => Some(Impact::Low),
            _ => None,
        }
    }

    /// Sort weight (higher = more important)
    pub fn sort_order(&self) -> i64 {
        match self {
            Impact::High => 2,
            Impact::Medium => 1,
            Impact::Low => 0,
        }
    }
}

/// Crawled document awaiting review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<i64>,
    pub uuid: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub impact: Impact,
    pub category: String,
    pub source: String,
    pub status: Status,
    pub date: NaiveDate,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Document {
    /// Create a new, unreviewed document for the given crawl date
    pub fn new(title: String, date: NaiveDate) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            title,
            doc_type: "Regulation".to_string(),
            impact: Impact::Medium,
            category: "General".to_string(),
            source: "Inhouse".to_string(),
            status: Status::Open,
            date,
            created_ts: now,
            modified_ts: now,
        }
    }
}
