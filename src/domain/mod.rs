/// Domain module containing core business logic and data types
///
/// This module defines the kennel entities (Dog, Litter, Puppy, Customer,
/// WaitlistEntry, CareLog, Milestone, HeatCycle, Vaccination) and their
/// validation rules.

pub mod care;
pub mod customer;
pub mod dog;
pub mod heat;
pub mod litter;
pub mod milestone;
pub mod puppy;
pub mod types;
pub mod vaccination;
pub mod waitlist;

// Re-export public types for easy access
pub use care::*;
pub use customer::*;
pub use dog::*;
pub use heat::*;
pub use litter::*;
pub use milestone::*;
pub use puppy::*;
pub use types::*;
pub use vaccination::*;
pub use waitlist::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}

/// Validate a required display name (1-100 characters after trimming)
///
/// Shared by every entity that has a name field.
pub(crate) fn validate_name(name: &str, what: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(format!(
            "{} name cannot be empty",
            what
        )));
    }

    if trimmed.len() > 100 {
        return Err(DomainError::InvalidName(format!(
            "{} name cannot be longer than 100 characters",
            what
        )));
    }

    Ok(())
}

/// Validate an optional free-text notes field
pub(crate) fn validate_notes(
    notes: &Option<String>,
    max_len: usize,
) -> Result<(), DomainError> {
    if let Some(text) = notes {
        if text.len() > max_len {
            return Err(DomainError::Validation {
                message: format!("Notes cannot be longer than {} characters", max_len),
            });
        }
    }
    Ok(())
}

/// Validate that a date is not in the future
pub(crate) fn validate_not_future(
    date: NaiveDate,
    today: NaiveDate,
    what: &str,
) -> Result<(), DomainError> {
    if date > today {
        return Err(DomainError::InvalidDate(format!(
            "{} cannot be in the future",
            what
        )));
    }
    Ok(())
}
