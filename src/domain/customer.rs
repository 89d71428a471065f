/// Customer entity and related functionality
///
/// Customers are the CRM side of the kennel: people who have bought a puppy
/// or are waiting for one. Contact details are all optional except the name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerId, DomainError};

/// A customer or prospective puppy buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier for this customer
    pub id: CustomerId,
    /// Full name
    pub name: String,
    /// Email address
    pub email: Option<String>,
    /// Phone number, free-form
    pub phone: Option<String>,
    /// City or region, for travel planning
    pub city: Option<String>,
    /// Free-form notes (home situation, preferences, references)
    pub notes: Option<String>,
    /// When this customer record was created
    pub created_at: DateTime<Utc>,
    /// Whether this record is currently active (can be archived)
    pub is_active: bool,
}

impl Customer {
    /// Create a new customer with validation
    pub fn new(
        name: String,
        email: Option<String>,
        phone: Option<String>,
        city: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        crate::domain::validate_name(&name, "Customer")?;
        Self::validate_email(&email)?;
        crate::domain::validate_notes(&notes, 1000)?;

        Ok(Self {
            id: CustomerId::new(),
            name,
            email,
            phone,
            city,
            notes,
            created_at: Utc::now(),
            is_active: true,
        })
    }

    /// Create a customer from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: CustomerId,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        city: Option<String>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            city,
            notes,
            created_at,
            is_active,
        }
    }

    /// Update the customer's properties with validation
    pub fn update(
        &mut self,
        name: Option<String>,
        email: Option<Option<String>>,
        phone: Option<Option<String>>,
        city: Option<Option<String>>,
        notes: Option<Option<String>>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_name) = name {
            crate::domain::validate_name(new_name, "Customer")?;
        }
        if let Some(ref new_email) = email {
            Self::validate_email(new_email)?;
        }
        if let Some(ref new_notes) = notes {
            crate::domain::validate_notes(new_notes, 1000)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_email) = email {
            self.email = new_email;
        }
        if let Some(new_phone) = phone {
            self.phone = new_phone;
        }
        if let Some(new_city) = city {
            self.city = new_city;
        }
        if let Some(new_notes) = notes {
            self.notes = new_notes;
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    // Validation helper methods

    /// Minimal sanity check, real validation is the mail server's problem
    fn validate_email(email: &Option<String>) -> Result<(), DomainError> {
        if let Some(addr) = email {
            let trimmed = addr.trim();
            if trimmed.is_empty() || !trimmed.contains('@') || trimmed.len() > 254 {
                return Err(DomainError::InvalidValue {
                    message: format!("'{}' is not a valid email address", addr),
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
    fn test_create_valid_customer() {
        let customer = Customer::new(
            "Jordan Avery".to_string(),
            Some("jordan@example.com".to_string()),
            Some("+1 555 0100".to_string()),
            Some("Portland".to_string()),
            None,
        );
        assert!(customer.is_ok());
        assert!(customer.unwrap().is_active);
    }

    #[test]
    fn test_invalid_email() {
        let result = Customer::new(
            "Jordan Avery".to_string(),
            Some("not-an-email".to_string()),
            None,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_clear_email_via_update() {
        let mut customer = Customer::new(
            "Jordan Avery".to_string(),
            Some("jordan@example.com".to_string()),
            None,
            None,
            None,
        )
        .unwrap();

        customer
            .update(None, Some(None), None, None, None, None)
            .unwrap();
        assert!(customer.email.is_none());
    }
}
