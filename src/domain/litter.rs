/// Litter entity and related functionality
///
/// A litter ties a dam (and optionally a sire) to a set of puppies and to
/// waitlist entries. A litter can be created before breeding even happens,
/// as an "open future litter" customers can join the waitlist for.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DogId, DomainError, LitterId};

/// A planned or whelped litter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Litter {
    /// Unique identifier for this litter
    pub id: LitterId,
    /// Display name or theme (e.g. "Spring 2026 B-litter")
    pub name: String,
    /// The mother
    pub dam_id: DogId,
    /// The father, if decided
    pub sire_id: Option<DogId>,
    /// Expected whelping date, if projected
    pub expected_on: Option<NaiveDate>,
    /// Actual whelping date, once the litter is born
    pub whelped_on: Option<NaiveDate>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When this litter record was created
    pub created_at: DateTime<Utc>,
    /// Whether this litter is currently active (can be archived)
    pub is_active: bool,
}

impl Litter {
    /// Create a new litter with validation
    ///
    /// Both dates are optional: a litter with neither is an open future
    /// litter that only exists so customers can wait on it.
    pub fn new(
        name: String,
        dam_id: DogId,
        sire_id: Option<DogId>,
        expected_on: Option<NaiveDate>,
        whelped_on: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        crate::domain::validate_name(&name, "Litter")?;
        Self::validate_dates(expected_on, whelped_on)?;
        crate::domain::validate_notes(&notes, 1000)?;

        Ok(Self {
            id: LitterId::new(),
            name,
            dam_id,
            sire_id,
            expected_on,
            whelped_on,
            notes,
            created_at: Utc::now(),
            is_active: true,
        })
    }

    /// Create a litter from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: LitterId,
        name: String,
        dam_id: DogId,
        sire_id: Option<DogId>,
        expected_on: Option<NaiveDate>,
        whelped_on: Option<NaiveDate>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            dam_id,
            sire_id,
            expected_on,
            whelped_on,
            notes,
            created_at,
            is_active,
        }
    }

    /// Update the litter's properties with validation
    pub fn update(
        &mut self,
        name: Option<String>,
        sire_id: Option<Option<DogId>>,
        expected_on: Option<Option<NaiveDate>>,
        whelped_on: Option<Option<NaiveDate>>,
        notes: Option<Option<String>>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            crate::domain::validate_name(new_name, "Litter")?;
        }
        if let Some(ref new_notes) = notes {
            crate::domain::validate_notes(new_notes, 1000)?;
        }

        let new_expected = expected_on.unwrap_or(self.expected_on);
        let new_whelped = whelped_on.unwrap_or(self.whelped_on);
        Self::validate_dates(new_expected, new_whelped)?;

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_sire) = sire_id {
            self.sire_id = new_sire;
        }
        self.expected_on = new_expected;
        self.whelped_on = new_whelped;
        if let Some(new_notes) = notes {
            self.notes = new_notes;
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    /// Whether the litter has been born
    pub fn is_whelped(&self) -> bool {
        self.whelped_on.is_some()
    }

    // Validation helper methods

    /// A whelping date may precede the expected date by at most 14 days
    /// (litters come early, but not by weeks)
    fn validate_dates(
        expected_on: Option<NaiveDate>,
        whelped_on: Option<NaiveDate>,
    ) -> Result<(), DomainError> {
        if let Some(whelped) = whelped_on {
            let today = Utc::now().naive_utc().date();
            crate::domain::validate_not_future(whelped, today, "Whelping date")?;

            if let Some(expected) = expected_on {
                if whelped < expected - Duration::days(14) {
                    return Err(DomainError::InvalidDate(
                        "Whelping date is more than 14 days before the expected date"
                            .to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_future_litter() {
        let litter = Litter::new(
            "Spring 2026 B-litter".to_string(),
            DogId::new(),
            None,
            None,
            None,
            None,
        );
        assert!(litter.is_ok());
        assert!(!litter.unwrap().is_whelped());
    }

    #[test]
    fn test_whelped_too_early_invalid() {
        let expected = Utc::now().naive_utc().date();
        let result = Litter::new(
            "B-litter".to_string(),
            DogId::new(),
            Some(DogId::new()),
            Some(expected),
            Some(expected - Duration::days(20)),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_whelping_via_update() {
        let today = Utc::now().naive_utc().date();
        let mut litter = Litter::new(
            "B-litter".to_string(),
            DogId::new(),
            None,
            Some(today),
            None,
            None,
        )
        .unwrap();

        litter
            .update(None, None, None, Some(Some(today)), None, None)
            .unwrap();
        assert!(litter.is_whelped());
    }
}
