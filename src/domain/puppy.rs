/// Puppy entity and related functionality
///
/// Puppies belong to a litter and carry a placement status that moves from
/// available through reserved to placed as customers claim them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerId, DomainError, LitterId, PuppyId, PuppyStatus, Sex};

/// A puppy in a litter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puppy {
    /// Unique identifier for this puppy
    pub id: PuppyId,
    /// Which litter this puppy belongs to
    pub litter_id: LitterId,
    /// Call name or temporary identifier (e.g. "Green collar boy")
    pub name: String,
    /// Biological sex
    pub sex: Sex,
    /// Collar color used to tell littermates apart
    pub collar_color: Option<String>,
    /// Placement status
    pub status: PuppyStatus,
    /// Which customer this puppy is reserved for or placed with
    pub reserved_for: Option<CustomerId>,
    /// Birth date; when absent, the litter's whelping date applies
    pub birth_date: Option<NaiveDate>,
    /// Free-form notes (markings, weights at birth, vet remarks)
    pub notes: Option<String>,
    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl Puppy {
    /// Create a new puppy with validation
    pub fn new(
        litter_id: LitterId,
        name: String,
        sex: Sex,
        collar_color: Option<String>,
        birth_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        crate::domain::validate_name(&name, "Puppy")?;
        if let Some(date) = birth_date {
            let today = Utc::now().naive_utc().date();
            crate::domain::validate_not_future(date, today, "Birth date")?;
        }
        crate::domain::validate_notes(&notes, 1000)?;

        Ok(Self {
            id: PuppyId::new(),
            litter_id,
            name,
            sex,
            collar_color,
            status: PuppyStatus::Available,
            reserved_for: None,
            birth_date,
            notes,
            created_at: Utc::now(),
        })
    }

    /// Create a puppy from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: PuppyId,
        litter_id: LitterId,
        name: String,
        sex: Sex,
        collar_color: Option<String>,
        status: PuppyStatus,
        reserved_for: Option<CustomerId>,
        birth_date: Option<NaiveDate>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            litter_id,
            name,
            sex,
            collar_color,
            status,
            reserved_for,
            birth_date,
            notes,
            created_at,
        }
    }

    /// Update the puppy's properties with validation
    ///
    /// Status transitions are validated: a reserved or placed puppy must
    /// name the customer it is held for.
    pub fn update(
        &mut self,
        name: Option<String>,
        collar_color: Option<Option<String>>,
        status: Option<PuppyStatus>,
        reserved_for: Option<Option<CustomerId>>,
        notes: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            crate::domain::validate_name(new_name, "Puppy")?;
        }
        if let Some(ref new_notes) = notes {
            crate::domain::validate_notes(new_notes, 1000)?;
        }

        let new_status = status.unwrap_or(self.status);
        let new_reserved = reserved_for.clone().unwrap_or(self.reserved_for.clone());
        if new_status != PuppyStatus::Available && new_reserved.is_none() {
            return Err(DomainError::Validation {
                message: "A reserved or placed puppy must reference a customer"
                    .to_string(),
            });
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_collar) = collar_color {
            self.collar_color = new_collar;
        }
        self.status = new_status;
        self.reserved_for = new_reserved;
        if let Some(new_notes) = notes {
            self.notes = new_notes;
        }

        Ok(())
    }

    /// Birth date, falling back to the litter's whelping date
    pub fn effective_birth_date(&self, litter_whelped_on: Option<NaiveDate>) -> Option<NaiveDate> {
        self.birth_date.or(litter_whelped_on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_puppy() -> Puppy {
        Puppy::new(
            LitterId::new(),
            "Green collar boy".to_string(),
            Sex::Male,
            Some("green".to_string()),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_new_puppy_starts_available() {
        let puppy = valid_puppy();
        assert_eq!(puppy.status, PuppyStatus::Available);
        assert!(puppy.reserved_for.is_none());
    }

    #[test]
    fn test_reserve_requires_customer() {
        let mut puppy = valid_puppy();
        let result = puppy.update(None, None, Some(PuppyStatus::Reserved), None, None);
        assert!(result.is_err());

        let customer = CustomerId::new();
        puppy
            .update(
                None,
                None,
                Some(PuppyStatus::Reserved),
                Some(Some(customer.clone())),
                None,
            )
            .unwrap();
        assert_eq!(puppy.status, PuppyStatus::Reserved);
        assert_eq!(puppy.reserved_for, Some(customer));
    }

    #[test]
    fn test_effective_birth_date_falls_back_to_litter() {
        let puppy = valid_puppy();
        let whelped = Utc::now().naive_utc().date();
        assert_eq!(puppy.effective_birth_date(Some(whelped)), Some(whelped));
        assert_eq!(puppy.effective_birth_date(None), None);
    }
}
