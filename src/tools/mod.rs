/// MCP tools for kennel management
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call to manage dogs, litters, customers, and daily kennel work.

pub mod care;
pub mod customers;
pub mod dogs;
pub mod heat;
pub mod litters;
pub mod milestones;
pub mod puppies;
pub mod vaccinations;
pub mod waitlist;

// Re-export tool functions for easy access
pub use care::*;
pub use customers::*;
pub use dogs::*;
pub use heat::*;
pub use litters::*;
pub use milestones::*;
pub use puppies::*;
pub use vaccinations::*;
pub use waitlist::*;

use chrono::NaiveDate;

use crate::storage::StorageError;

/// Parse a `YYYY-MM-DD` parameter value
pub(crate) fn parse_date_param(value: &str, what: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        StorageError::InvalidInput(format!(
            "Invalid {} '{}'. Expected YYYY-MM-DD",
            what, value
        ))
    })
}

/// Parse an optional `YYYY-MM-DD` parameter value
pub(crate) fn parse_opt_date_param(
    value: &Option<String>,
    what: &str,
) -> Result<Option<NaiveDate>, StorageError> {
    value
        .as_deref()
        .map(|s| parse_date_param(s, what))
        .transpose()
}
