// Status badges: the catalog of status styles and the aggregation that
// picks which style a summary badge shows.

pub mod catalog;
pub mod aggregate;

pub use catalog::*;
pub use aggregate::*;
