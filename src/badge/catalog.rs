// Status catalog: display text, color and precedence per status

use serde::Serialize;
use thiserror::Error;

use crate::models::Status;

/// Errors raised by catalog lookups and catalog construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
    #[error("Unknown color '{0}'. Expected one of: primary, secondary, success, danger, warning, info, light, dark")]
    UnknownColor(String),
}

/// Semantic color token used for badges and status buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    Info,
    Light,
    Dark,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Primary => "primary",
            ColorToken::Secondary => "secondary",
            ColorToken::Success => "success",
            ColorToken::Danger => "danger",
            ColorToken::Warning => "warning",
            ColorToken::Info => "info",
            ColorToken::Light => "light",
            ColorToken::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s.trim().to_lowercase().as_str() {
            "primary" => Ok(ColorToken::Primary),
            "secondary" => Ok(ColorToken::Secondary),
            "success" => Ok(ColorToken::Success),
            "danger" => Ok(ColorToken::Danger),
            "warning" => Ok(ColorToken::Warning),
            "info" => Ok(ColorToken::Info),
            "light" => Ok(ColorToken::Light),
            "dark" => Ok(ColorToken::Dark),
            _ => Err(CatalogError::UnknownColor(s.to_string())),
        }
    }
}

/// Presentation of a single status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusStyle {
    pub display_text: String,
    pub color: ColorToken,
    /// Precedence, lower dominates. `None` never dominates.
    pub rank: Option<u32>,
}

impl StatusStyle {
    pub fn new(display_text: &str, color: ColorToken, rank: Option<u32>) -> Self {
        Self {
            display_text: display_text.to_string(),
            color,
            rank,
        }
    }
}

/// Immutable lookup table from status to style.
///
/// Entries keep their declaration order; aggregation walks them in that
/// order, so with duplicate ranks the earlier entry wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCatalog {
    entries: Vec<(Status, StatusStyle)>,
}

impl StatusCatalog {
    /// The catalog used by the dashboard unless the rc file overrides it
    pub fn standard() -> Self {
        Self::builder()
            .with_entry(Status::Open, StatusStyle::new("UNREAD", ColorToken::Danger, Some(0)))
            .with_entry(Status::Waiting, StatusStyle::new("ON HOLD", ColorToken::Warning, Some(1)))
            .with_entry(Status::Finished, StatusStyle::new("ASSIGNED", ColorToken::Success, Some(2)))
            .with_entry(Status::Empty, StatusStyle::new("", ColorToken::Secondary, None))
            .build()
    }

    pub fn builder() -> StatusCatalogBuilder {
        StatusCatalogBuilder::default()
    }

    /// Start a builder pre-filled with this catalog's entries
    pub fn to_builder(&self) -> StatusCatalogBuilder {
        StatusCatalogBuilder {
            entries: self.entries.clone(),
        }
    }

    pub fn lookup(&self, status: Status) -> Result<&StatusStyle, CatalogError> {
        self.entries
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, style)| style)
            .ok_or_else(|| CatalogError::UnknownStatus(status.as_str().to_string()))
    }

    /// Look up a raw status key as received from storage or the command line
    pub fn lookup_key(&self, key: &str) -> Result<(Status, &StatusStyle), CatalogError> {
        let status = Status::from_str(key)
            .ok_or_else(|| CatalogError::UnknownStatus(key.to_string()))?;
        Ok((status, self.lookup(status)?))
    }

    pub fn rank(&self, status: Status) -> Option<u32> {
        self.lookup(status).ok().and_then(|style| style.rank)
    }

    /// Entries in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (Status, &StatusStyle)> + '_ {
        self.entries.iter().map(|(status, style)| (*status, style))
    }
}

impl Default for StatusCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Default)]
pub struct StatusCatalogBuilder {
    entries: Vec<(Status, StatusStyle)>,
}

impl StatusCatalogBuilder {
    /// Add an entry, or replace the style of an existing one in place
    pub fn with_entry(mut self, status: Status, style: StatusStyle) -> Self {
        match self.entries.iter_mut().find(|(s, _)| *s == status) {
            Some(entry) => entry.1 = style,
            None => self.entries.push((status, style)),
        }
        self
    }

    /// Mutable access to an already declared entry
    pub fn style_mut(&mut self, status: Status) -> Option<&mut StatusStyle> {
        self.entries
            .iter_mut()
            .find(|(s, _)| *s == status)
            .map(|(_, style)| style)
    }

    pub fn build(self) -> StatusCatalog {
        StatusCatalog {
            entries: self.entries,
        }
    }
}
