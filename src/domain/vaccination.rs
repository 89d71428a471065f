/// Vaccination entity
///
/// Vaccination rows serve two purposes: a vet history for each dog, and a
/// source of upcoming due dates the heat-cycle engine checks for conflicts
/// with projected heats.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DogId, DomainError, VaccinationId};

/// A vaccination that was given or is due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vaccination {
    /// Unique identifier for this record
    pub id: VaccinationId,
    /// Which dog this vaccination is for
    pub dog_id: DogId,
    /// Vaccine name (e.g. "Rabies", "DHPP booster")
    pub vaccine: String,
    /// The day it was administered, once given
    pub administered_on: Option<NaiveDate>,
    /// The day it is due
    pub due_on: Option<NaiveDate>,
    /// Free-form notes (batch number, vet, reactions)
    pub notes: Option<String>,
    /// When this record was created
    pub recorded_at: DateTime<Utc>,
}

impl Vaccination {
    /// Create a new vaccination record with validation
    ///
    /// At least one of administered_on/due_on must be present, otherwise the
    /// record says nothing.
    pub fn new(
        dog_id: DogId,
        vaccine: String,
        administered_on: Option<NaiveDate>,
        due_on: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        crate::domain::validate_name(&vaccine, "Vaccine")?;

        if administered_on.is_none() && due_on.is_none() {
            return Err(DomainError::Validation {
                message: "A vaccination needs an administered date, a due date, or both"
                    .to_string(),
            });
        }

        if let Some(given) = administered_on {
            let today = Utc::now().naive_utc().date();
            crate::domain::validate_not_future(given, today, "Administered date")?;
        }

        crate::domain::validate_notes(&notes, 500)?;

        Ok(Self {
            id: VaccinationId::new(),
            dog_id,
            vaccine,
            administered_on,
            due_on,
            notes,
            recorded_at: Utc::now(),
        })
    }

    /// Create a vaccination from existing data (used when loading from database)
    pub fn from_existing(
        id: VaccinationId,
        dog_id: DogId,
        vaccine: String,
        administered_on: Option<NaiveDate>,
        due_on: Option<NaiveDate>,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            dog_id,
            vaccine,
            administered_on,
            due_on,
            notes,
            recorded_at,
        }
    }

    /// Whether this vaccination is still pending as of the given date
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.administered_on.is_none()
            && self.due_on.map(|due| due >= today).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_needs_at_least_one_date() {
        let result = Vaccination::new(DogId::new(), "Rabies".to_string(), None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_upcoming_vaccination() {
        let today = Utc::now().naive_utc().date();
        let vaccination = Vaccination::new(
            DogId::new(),
            "DHPP booster".to_string(),
            None,
            Some(today + Duration::days(30)),
            None,
        )
        .unwrap();

        assert!(vaccination.is_upcoming(today));
        assert!(!vaccination.is_upcoming(today + Duration::days(31)));
    }

    #[test]
    fn test_administered_is_not_upcoming() {
        let today = Utc::now().naive_utc().date();
        let vaccination = Vaccination::new(
            DogId::new(),
            "Rabies".to_string(),
            Some(today - Duration::days(1)),
            Some(today + Duration::days(365)),
            None,
        )
        .unwrap();

        assert!(!vaccination.is_upcoming(today));
    }
}
