/// CareLog entity for recording daily-care actions
///
/// Each feeding, potty break, medication dose and so on becomes a CareLog
/// row. Several logs of the same action on the same day are expected, so
/// there is deliberately no uniqueness constraint on (dog, action, date).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CareAction, CareLogId, DogId, DomainError};

/// A record of one daily-care action performed for a dog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareLog {
    /// Unique identifier for this log entry
    pub id: CareLogId,
    /// Which dog this care was for
    pub dog_id: DogId,
    /// What was done
    pub action: CareAction,
    /// Which day the action happened (can differ from recorded_at)
    pub performed_on: NaiveDate,
    /// When this entry was recorded
    pub recorded_at: DateTime<Utc>,
    /// Optional amount (grams of food, minutes of exercise, weight reading)
    pub quantity: Option<u32>,
    /// Unit for the quantity (e.g. "g", "minutes", "kg")
    pub unit: Option<String>,
    /// Free-form notes about this action
    pub notes: Option<String>,
}

impl CareLog {
    /// Create a new care log entry with validation
    pub fn new(
        dog_id: DogId,
        action: CareAction,
        performed_on: NaiveDate,
        quantity: Option<u32>,
        unit: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_performed_on(performed_on)?;
        Self::validate_quantity_and_unit(&quantity, &unit)?;
        crate::domain::validate_notes(&notes, 500)?;

        Ok(Self {
            id: CareLogId::new(),
            dog_id,
            action,
            performed_on,
            recorded_at: Utc::now(),
            quantity,
            unit,
            notes,
        })
    }

    /// Create a log entry from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: CareLogId,
        dog_id: DogId,
        action: CareAction,
        performed_on: NaiveDate,
        recorded_at: DateTime<Utc>,
        quantity: Option<u32>,
        unit: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            dog_id,
            action,
            performed_on,
            recorded_at,
            quantity,
            unit,
            notes,
        }
    }

    /// Check if this entry has a quantity reading
    pub fn has_quantity(&self) -> bool {
        self.quantity.is_some()
    }

    /// Get a display string for the quantity (e.g. "250 g")
    pub fn quantity_display(&self) -> Option<String> {
        match (self.quantity, &self.unit) {
            (Some(value), Some(unit)) => Some(format!("{} {}", value, unit)),
            (Some(value), None) => Some(value.to_string()),
            _ => None,
        }
    }

    // Validation helper methods

    /// Validate that the performed_on date is not in the future and not more
    /// than a year back
    fn validate_performed_on(date: NaiveDate) -> Result<(), DomainError> {
        let today = Utc::now().naive_utc().date();

        crate::domain::validate_not_future(date, today, "Care date")?;

        let one_year_ago = today - chrono::Duration::days(365);
        if date < one_year_ago {
            return Err(DomainError::InvalidDate(
                "Cannot log care more than 1 year in the past".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate quantity and unit together
    fn validate_quantity_and_unit(
        quantity: &Option<u32>,
        unit: &Option<String>,
    ) -> Result<(), DomainError> {
        if let Some(value) = quantity {
            if *value == 0 {
                return Err(DomainError::InvalidValue {
                    message: "Quantity must be greater than 0".to_string(),
                });
            }
            if *value > 100000 {
                return Err(DomainError::InvalidValue {
                    message: "Quantity cannot exceed 100000".to_string(),
                });
            }
        }

        if let Some(unit_str) = unit {
            let trimmed = unit_str.trim();
            if trimmed.is_empty() {
                return Err(DomainError::InvalidValue {
                    message: "Unit cannot be empty if specified".to_string(),
                });
            }
            if trimmed.len() > 20 {
                return Err(DomainError::InvalidValue {
                    message: "Unit cannot be longer than 20 characters".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_valid_care_log() {
        let dog_id = DogId::new();
        let today = Utc::now().naive_utc().date();

        let log = CareLog::new(
            dog_id.clone(),
            CareAction::Feeding,
            today,
            Some(250),
            Some("g".to_string()),
            Some("Ate everything".to_string()),
        );

        assert!(log.is_ok());
        let log = log.unwrap();
        assert_eq!(log.dog_id, dog_id);
        assert_eq!(log.performed_on, today);
        assert!(log.has_quantity());
        assert_eq!(log.quantity_display(), Some("250 g".to_string()));
    }

    #[test]
    fn test_future_date_invalid() {
        let future = Utc::now().naive_utc().date() + chrono::Duration::days(1);
        let result = CareLog::new(DogId::new(), CareAction::PottyBreak, future, None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_quantity_invalid() {
        let today = Utc::now().naive_utc().date();
        let result = CareLog::new(
            DogId::new(),
            CareAction::Feeding,
            today,
            Some(0),
            Some("g".to_string()),
            None,
        );
        assert!(result.is_err());
    }
}
