// Core data models for Crawlboard
// These structs represent the domain entities

pub mod status;
pub mod document;

pub use status::*;
pub use document::*;
