/// Dog entity and related functionality
///
/// This module defines the Dog struct that represents an adult dog in the
/// kennel (dams, sires, retirees, companions), along with its validation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DogId, DogRole, DomainError, Sex};

/// An adult dog in the kennel program
///
/// This is the central profile record. Care logs, heat cycles and
/// vaccinations all hang off a dog, and litters reference a dam and sire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
    /// Unique identifier for this dog
    pub id: DogId,
    /// Call name (e.g. "Willow", "Atlas")
    pub name: String,
    /// Breed (e.g. "Bernese Mountain Dog")
    pub breed: String,
    /// Biological sex
    pub sex: Sex,
    /// Role in the breeding program
    pub role: DogRole,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Coat color/markings
    pub color: Option<String>,
    /// Most recent weight in kilograms
    pub weight_kg: Option<f64>,
    /// Free-form notes (temperament, health remarks, registry numbers)
    pub notes: Option<String>,
    /// When this profile was created
    pub created_at: DateTime<Utc>,
    /// Whether this profile is currently active (can be archived)
    pub is_active: bool,
}

impl Dog {
    /// Create a new dog profile with validation
    pub fn new(
        name: String,
        breed: String,
        sex: Sex,
        role: DogRole,
        birth_date: NaiveDate,
        color: Option<String>,
        weight_kg: Option<f64>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        crate::domain::validate_name(&name, "Dog")?;
        crate::domain::validate_name(&breed, "Breed")?;
        Self::validate_birth_date(birth_date)?;
        Self::validate_weight(&weight_kg)?;
        crate::domain::validate_notes(&notes, 1000)?;

        Ok(Self {
            id: DogId::new(),
            name,
            breed,
            sex,
            role,
            birth_date,
            color,
            weight_kg,
            notes,
            created_at: Utc::now(),
            is_active: true,
        })
    }

    /// Create a dog from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: DogId,
        name: String,
        breed: String,
        sex: Sex,
        role: DogRole,
        birth_date: NaiveDate,
        color: Option<String>,
        weight_kg: Option<f64>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            breed,
            sex,
            role,
            birth_date,
            color,
            weight_kg,
            notes,
            created_at,
            is_active,
        }
    }

    /// Update the dog's properties with validation
    ///
    /// Each `Some` applies the contained value; `None` leaves the field
    /// untouched. The outer/inner Option split follows the usual partial
    /// update pattern so optional fields can also be cleared.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        name: Option<String>,
        role: Option<DogRole>,
        color: Option<Option<String>>,
        weight_kg: Option<Option<f64>>,
        notes: Option<Option<String>>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            crate::domain::validate_name(new_name, "Dog")?;
        }
        if let Some(ref new_weight) = weight_kg {
            Self::validate_weight(new_weight)?;
        }
        if let Some(ref new_notes) = notes {
            crate::domain::validate_notes(new_notes, 1000)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_role) = role {
            self.role = new_role;
        }
        if let Some(new_color) = color {
            self.color = new_color;
        }
        if let Some(new_weight) = weight_kg {
            self.weight_kg = new_weight;
        }
        if let Some(new_notes) = notes {
            self.notes = new_notes;
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    /// Age in whole days as of the given date
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.birth_date).num_days()
    }

    /// Whether this dog is a female in the breeding program
    ///
    /// Only these dogs appear in heat-cycle reports.
    pub fn is_breeding_female(&self) -> bool {
        self.is_active && self.sex == Sex::Female && self.role == DogRole::Breeding
    }

    // Validation helper methods

    /// Birth date must not be in the future and not absurdly far in the past
    fn validate_birth_date(birth_date: NaiveDate) -> Result<(), DomainError> {
        let today = Utc::now().naive_utc().date();

        crate::domain::validate_not_future(birth_date, today, "Birth date")?;

        if today.year() - birth_date.year() > 25 {
            return Err(DomainError::InvalidDate(
                "Birth date is more than 25 years in the past".to_string(),
            ));
        }

        Ok(())
    }

    /// Weight must be a positive, plausible number of kilograms
    fn validate_weight(weight_kg: &Option<f64>) -> Result<(), DomainError> {
        if let Some(kg) = weight_kg {
            if !kg.is_finite() || *kg <= 0.0 {
                return Err(DomainError::InvalidValue {
                    message: "Weight must be greater than 0".to_string(),
                });
            }
            if *kg > 120.0 {
                return Err(DomainError::InvalidValue {
                    message: "Weight cannot exceed 120 kg".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_dog() -> Result<Dog, DomainError> {
        Dog::new(
            "Willow".to_string(),
            "Bernese Mountain Dog".to_string(),
            Sex::Female,
            DogRole::Breeding,
            Utc::now().naive_utc().date() - Duration::days(3 * 365),
            Some("tricolor".to_string()),
            Some(38.5),
            None,
        )
    }

    #[test]
    fn test_create_valid_dog() {
        let dog = valid_dog();
        assert!(dog.is_ok());
        let dog = dog.unwrap();
        assert_eq!(dog.name, "Willow");
        assert!(dog.is_active);
        assert!(dog.is_breeding_female());
    }

    #[test]
    fn test_future_birth_date_invalid() {
        let result = Dog::new(
            "Willow".to_string(),
            "Bernese Mountain Dog".to_string(),
            Sex::Female,
            DogRole::Breeding,
            Utc::now().naive_utc().date() + Duration::days(1),
            None,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_weight() {
        let result = Dog::new(
            "Atlas".to_string(),
            "Bernese Mountain Dog".to_string(),
            Sex::Male,
            DogRole::Breeding,
            Utc::now().naive_utc().date() - Duration::days(2 * 365),
            None,
            Some(0.0),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_role_and_archive() {
        let mut dog = valid_dog().unwrap();
        dog.update(None, Some(DogRole::Retired), None, None, None, Some(false))
            .unwrap();
        assert_eq!(dog.role, DogRole::Retired);
        assert!(!dog.is_active);
        assert!(!dog.is_breeding_female());
    }
}
