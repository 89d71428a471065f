/// Tools for the puppy waitlist
///
/// This module implements the waitlist_add, waitlist_update and
/// waitlist_list MCP tools. The list is kept in join order so the
/// longest-waiting customer is always first in line.

use serde::{Deserialize, Serialize};

use crate::domain::{CustomerId, LitterId, WaitlistEntry, WaitlistEntryId, WaitlistStatus};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for adding a waitlist entry
#[derive(Debug, Deserialize)]
pub struct AddWaitlistParams {
    pub customer_id: String,
    pub litter_id: Option<String>, // Omit for the general list
    pub sex_preference: Option<String>,
    pub color_preference: Option<String>,
    pub notes: Option<String>,
}

/// Response from adding a waitlist entry
#[derive(Debug, Serialize)]
pub struct AddWaitlistResponse {
    pub success: bool,
    pub entry_id: Option<String>,
    pub position: usize,
    pub message: String,
}

/// Parameters for updating a waitlist entry
#[derive(Debug, Deserialize)]
pub struct UpdateWaitlistParams {
    pub entry_id: String,
    pub litter_id: Option<String>,
    pub status: Option<String>, // waiting, offered, accepted, removed
    pub deposit_paid: Option<bool>,
    pub sex_preference: Option<String>,
    pub color_preference: Option<String>,
    pub notes: Option<String>,
}

/// Response from updating a waitlist entry
#[derive(Debug, Serialize)]
pub struct UpdateWaitlistResponse {
    pub success: bool,
    pub message: String,
}

/// Parameters for listing the waitlist
#[derive(Debug, Deserialize)]
pub struct ListWaitlistParams {
    pub litter_id: Option<String>,
    pub status: Option<String>,
}

/// One entry in a waitlist listing, in queue order
#[derive(Debug, Serialize)]
pub struct WaitlistSummary {
    pub entry_id: String,
    pub position: usize,
    pub customer_name: String,
    pub status: String,
    pub deposit_paid: bool,
    pub sex_preference: Option<String>,
    pub color_preference: Option<String>,
    pub joined_at: String,
}

/// Response from listing the waitlist
#[derive(Debug, Serialize)]
pub struct ListWaitlistResponse {
    pub entries: Vec<WaitlistSummary>,
    pub total_count: usize,
}

fn parse_status(value: &str) -> Result<WaitlistStatus, StorageError> {
    WaitlistStatus::parse(value).ok_or_else(|| {
        StorageError::InvalidInput(format!(
            "Invalid waitlist status '{}'. Valid options: waiting, offered, accepted, removed",
            value
        ))
    })
}

fn parse_litter_ref(value: &str) -> Result<LitterId, StorageError> {
    LitterId::from_string(value).map_err(|_| StorageError::LitterNotFound {
        litter_id: value.to_string(),
    })
}

/// Add a customer to the waitlist using the provided storage
pub fn add_waitlist_entry<S: KennelStorage>(
    storage: &S,
    params: AddWaitlistParams,
) -> Result<AddWaitlistResponse, StorageError> {
    let customer_id = CustomerId::from_string(&params.customer_id).map_err(|_| {
        StorageError::CustomerNotFound {
            customer_id: params.customer_id.clone(),
        }
    })?;
    let customer = storage.get_customer(&customer_id)?;

    let litter_id = match &params.litter_id {
        Some(litter_str) => {
            let litter_id = parse_litter_ref(litter_str)?;
            storage.get_litter(&litter_id)?;
            Some(litter_id)
        }
        None => None,
    };

    let sex_preference = match &params.sex_preference {
        Some(sex_str) => Some(super::dogs::parse_sex(sex_str)?),
        None => None,
    };

    let entry = WaitlistEntry::new(
        customer_id,
        litter_id.clone(),
        sex_preference,
        params.color_preference,
        params.notes,
    )?;

    let entry_id = entry.id.to_string();
    storage.create_waitlist_entry(&entry)?;

    // Report where the new entry landed in its queue
    let queue = storage.list_waitlist(litter_id.as_ref(), None)?;
    let position = queue
        .iter()
        .position(|e| e.id == entry.id)
        .map(|idx| idx + 1)
        .unwrap_or(queue.len());

    Ok(AddWaitlistResponse {
        success: true,
        entry_id: Some(entry_id),
        position,
        message: format!("{} joined the waitlist at position {}", customer.name, position),
    })
}

/// Update a waitlist entry: offer, accept, remove, or record a deposit
pub fn update_waitlist_entry<S: KennelStorage>(
    storage: &S,
    params: UpdateWaitlistParams,
) -> Result<UpdateWaitlistResponse, StorageError> {
    let entry_id = WaitlistEntryId::from_string(&params.entry_id).map_err(|_| {
        StorageError::WaitlistEntryNotFound {
            entry_id: params.entry_id.clone(),
        }
    })?;

    let mut entry = storage.get_waitlist_entry(&entry_id)?;

    let litter_id = match &params.litter_id {
        Some(litter_str) => {
            let litter_id = parse_litter_ref(litter_str)?;
            storage.get_litter(&litter_id)?;
            Some(Some(litter_id))
        }
        None => None,
    };
    let status = match &params.status {
        Some(status_str) => Some(parse_status(status_str)?),
        None => None,
    };
    let sex_preference = match &params.sex_preference {
        Some(sex_str) => Some(Some(super::dogs::parse_sex(sex_str)?)),
        None => None,
    };

    entry.update(
        litter_id,
        status,
        params.deposit_paid,
        sex_preference,
        params.color_preference.map(Some),
        params.notes.map(Some),
    )?;

    storage.update_waitlist_entry(&entry)?;

    let message = match status {
        Some(WaitlistStatus::Offered) => "Puppy offered to this customer".to_string(),
        Some(WaitlistStatus::Accepted) => "Offer accepted".to_string(),
        Some(WaitlistStatus::Removed) => "Entry removed from the waitlist".to_string(),
        Some(WaitlistStatus::Waiting) => "Entry returned to waiting".to_string(),
        None if params.deposit_paid == Some(true) => "Deposit recorded".to_string(),
        None => "Waitlist entry updated".to_string(),
    };

    Ok(UpdateWaitlistResponse {
        success: true,
        message,
    })
}

/// List the waitlist in queue order
pub fn list_waitlist<S: KennelStorage>(
    storage: &S,
    params: ListWaitlistParams,
) -> Result<ListWaitlistResponse, StorageError> {
    let litter_id = match &params.litter_id {
        Some(litter_str) => Some(parse_litter_ref(litter_str)?),
        None => None,
    };
    let status = match &params.status {
        Some(status_str) => Some(parse_status(status_str)?),
        None => None,
    };

    let entries = storage.list_waitlist(litter_id.as_ref(), status)?;

    let mut summaries = Vec::new();
    for (idx, entry) in entries.into_iter().enumerate() {
        let customer = storage.get_customer(&entry.customer_id)?;
        summaries.push(WaitlistSummary {
            entry_id: entry.id.to_string(),
            position: idx + 1,
            customer_name: customer.name,
            status: entry.status.display_name().to_string(),
            deposit_paid: entry.deposit_paid,
            sex_preference: entry.sex_preference.map(|s| s.display_name().to_string()),
            color_preference: entry.color_preference,
            joined_at: entry.joined_at.to_rfc3339(),
        });
    }

    let total_count = summaries.len();

    Ok(ListWaitlistResponse {
        entries: summaries,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::tools::customers::{add_customer, AddCustomerParams};
    use tempfile::tempdir;

    fn test_storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db")).unwrap();
        (dir, storage)
    }

    fn add_test_customer(storage: &SqliteStorage, name: &str) -> String {
        add_customer(
            storage,
            AddCustomerParams {
                name: name.to_string(),
                email: None,
                phone: None,
                city: None,
                notes: None,
            },
        )
        .unwrap()
        .customer_id
        .unwrap()
    }

    #[test]
    fn test_waitlist_positions() {
        let (_dir, storage) = test_storage();
        let first = add_test_customer(&storage, "First Family");
        let second = add_test_customer(&storage, "Second Family");

        let response = add_waitlist_entry(
            &storage,
            AddWaitlistParams {
                customer_id: first,
                litter_id: None,
                sex_preference: Some("female".to_string()),
                color_preference: None,
                notes: None,
            },
        )
        .unwrap();
        assert_eq!(response.position, 1);

        let response = add_waitlist_entry(
            &storage,
            AddWaitlistParams {
                customer_id: second,
                litter_id: None,
                sex_preference: None,
                color_preference: None,
                notes: None,
            },
        )
        .unwrap();
        assert_eq!(response.position, 2);
    }

    #[test]
    fn test_offer_accept_flow() {
        let (_dir, storage) = test_storage();
        let customer = add_test_customer(&storage, "Family");

        let entry_id = add_waitlist_entry(
            &storage,
            AddWaitlistParams {
                customer_id: customer,
                litter_id: None,
                sex_preference: None,
                color_preference: None,
                notes: None,
            },
        )
        .unwrap()
        .entry_id
        .unwrap();

        update_waitlist_entry(
            &storage,
            UpdateWaitlistParams {
                entry_id: entry_id.clone(),
                litter_id: None,
                status: Some("offered".to_string()),
                deposit_paid: Some(true),
                sex_preference: None,
                color_preference: None,
                notes: None,
            },
        )
        .unwrap();

        let response = update_waitlist_entry(
            &storage,
            UpdateWaitlistParams {
                entry_id: entry_id.clone(),
                litter_id: None,
                status: Some("accepted".to_string()),
                deposit_paid: None,
                sex_preference: None,
                color_preference: None,
                notes: None,
            },
        )
        .unwrap();
        assert!(response.message.contains("accepted"));

        // Waiting is not reachable from accepted
        let result = update_waitlist_entry(
            &storage,
            UpdateWaitlistParams {
                entry_id,
                litter_id: None,
                status: Some("waiting".to_string()),
                deposit_paid: None,
                sex_preference: None,
                color_preference: None,
                notes: None,
            },
        );
        assert!(result.is_err());
    }
}
