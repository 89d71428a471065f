/// Waitlist entity and related functionality
///
/// A waitlist entry puts a customer in the queue for a specific litter, or
/// on the open list when no litter has been chosen yet. Queue order is by
/// join time, oldest first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerId, DomainError, LitterId, Sex, WaitlistEntryId, WaitlistStatus};

/// A customer's place in the puppy waitlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Unique identifier for this entry
    pub id: WaitlistEntryId,
    /// Which customer is waiting
    pub customer_id: CustomerId,
    /// Which litter they are waiting on; None means the open list
    pub litter_id: Option<LitterId>,
    /// Where they stand in the process
    pub status: WaitlistStatus,
    /// Whether a deposit has been received
    pub deposit_paid: bool,
    /// Preferred sex, if any
    pub sex_preference: Option<Sex>,
    /// Preferred color/markings, free-form
    pub color_preference: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// When the customer joined the list; queue position derives from this
    pub joined_at: DateTime<Utc>,
}

impl WaitlistEntry {
    /// Create a new waitlist entry
    ///
    /// New entries always start in Waiting with no deposit.
    pub fn new(
        customer_id: CustomerId,
        litter_id: Option<LitterId>,
        sex_preference: Option<Sex>,
        color_preference: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        crate::domain::validate_notes(&notes, 1000)?;

        Ok(Self {
            id: WaitlistEntryId::new(),
            customer_id,
            litter_id,
            status: WaitlistStatus::Waiting,
            deposit_paid: false,
            sex_preference,
            color_preference,
            notes,
            joined_at: Utc::now(),
        })
    }

    /// Create an entry from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: WaitlistEntryId,
        customer_id: CustomerId,
        litter_id: Option<LitterId>,
        status: WaitlistStatus,
        deposit_paid: bool,
        sex_preference: Option<Sex>,
        color_preference: Option<String>,
        notes: Option<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            litter_id,
            status,
            deposit_paid,
            sex_preference,
            color_preference,
            notes,
            joined_at,
        }
    }

    /// Update the entry with validation
    ///
    /// Status may only move forward through the offer flow; a removed entry
    /// stays removed (re-joining means a fresh entry at the back of the
    /// queue, not a resurrected position).
    pub fn update(
        &mut self,
        litter_id: Option<Option<LitterId>>,
        status: Option<WaitlistStatus>,
        deposit_paid: Option<bool>,
        sex_preference: Option<Option<Sex>>,
        color_preference: Option<Option<String>>,
        notes: Option<Option<String>>,
    ) -> Result<(), DomainError> {
        if let Some(ref new_notes) = notes {
            crate::domain::validate_notes(new_notes, 1000)?;
        }

        if let Some(new_status) = status {
            Self::validate_transition(self.status, new_status)?;
            self.status = new_status;
        }

        if let Some(new_litter) = litter_id {
            self.litter_id = new_litter;
        }
        if let Some(new_deposit) = deposit_paid {
            self.deposit_paid = new_deposit;
        }
        if let Some(new_sex) = sex_preference {
            self.sex_preference = new_sex;
        }
        if let Some(new_color) = color_preference {
            self.color_preference = new_color;
        }
        if let Some(new_notes) = notes {
            self.notes = new_notes;
        }

        Ok(())
    }

    // Validation helper methods

    fn validate_transition(
        from: WaitlistStatus,
        to: WaitlistStatus,
    ) -> Result<(), DomainError> {
        use WaitlistStatus::*;

        let allowed = match (from, to) {
            (same_from, same_to) if same_from == same_to => true,
            (Waiting, Offered) | (Waiting, Removed) => true,
            (Offered, Accepted) | (Offered, Waiting) | (Offered, Removed) => true,
            (Accepted, Removed) => true,
            _ => false,
        };

        if !allowed {
            return Err(DomainError::Validation {
                message: format!(
                    "Cannot move waitlist entry from {} to {}",
                    from.display_name(),
                    to.display_name()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_entry() -> WaitlistEntry {
        WaitlistEntry::new(CustomerId::new(), None, Some(Sex::Female), None, None).unwrap()
    }

    #[test]
    fn test_new_entry_starts_waiting() {
        let entry = open_entry();
        assert_eq!(entry.status, WaitlistStatus::Waiting);
        assert!(!entry.deposit_paid);
        assert!(entry.litter_id.is_none());
    }

    #[test]
    fn test_offer_flow() {
        let mut entry = open_entry();
        entry
            .update(None, Some(WaitlistStatus::Offered), Some(true), None, None, None)
            .unwrap();
        entry
            .update(None, Some(WaitlistStatus::Accepted), None, None, None, None)
            .unwrap();
        assert_eq!(entry.status, WaitlistStatus::Accepted);
        assert!(entry.deposit_paid);
    }

    #[test]
    fn test_removed_is_terminal() {
        let mut entry = open_entry();
        entry
            .update(None, Some(WaitlistStatus::Removed), None, None, None, None)
            .unwrap();
        let result =
            entry.update(None, Some(WaitlistStatus::Waiting), None, None, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_cannot_skip_offer() {
        let mut entry = open_entry();
        let result =
            entry.update(None, Some(WaitlistStatus::Accepted), None, None, None, None);
        assert!(result.is_err());
    }
}
