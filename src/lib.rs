//! Crawlboard - review dashboard for crawled documents
//!
//! This library provides the core functionality for Crawlboard, including:
//! - The status catalog and the aggregation that picks a grouping's badge
//! - Data models for documents and per-status tallies
//! - Database operations, migrations and the document repository
//! - Dashboard grouping (day, category, month) and sorting
//! - CLI command parsing, execution and terminal output
//!
//! # Example
//!
//! ```
//! use crawlboard::badge::{dominant, StatusCatalog};
//! use crawlboard::models::{Status, StatusCount};
//!
//! let catalog = StatusCatalog::standard();
//! let counts = StatusCount::tally([Status::Finished, Status::Waiting]);
//! assert_eq!(dominant(&catalog, &counts), Status::Waiting);
//! ```

pub mod badge;
pub mod config;
pub mod db;
pub mod models;
pub mod repo;
pub mod dashboard;
pub mod cli;
pub mod utils;
