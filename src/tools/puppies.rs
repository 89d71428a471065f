/// Tools for managing puppies within a litter
///
/// This module implements the puppy_add, puppy_update and puppy_list
/// MCP tools.

use serde::{Deserialize, Serialize};

use crate::domain::{CustomerId, LitterId, Puppy, PuppyId, PuppyStatus};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for adding a puppy
#[derive(Debug, Deserialize)]
pub struct AddPuppyParams {
    pub litter_id: String,
    pub name: String,
    pub sex: String,
    pub collar_color: Option<String>,
    pub birth_date: Option<String>, // YYYY-MM-DD, falls back to the litter's whelp date
    pub notes: Option<String>,
}

/// Response from adding a puppy
#[derive(Debug, Serialize)]
pub struct AddPuppyResponse {
    pub success: bool,
    pub puppy_id: Option<String>,
    pub message: String,
}

/// Parameters for updating a puppy
#[derive(Debug, Deserialize)]
pub struct UpdatePuppyParams {
    pub puppy_id: String,
    pub name: Option<String>,
    pub collar_color: Option<String>,
    pub status: Option<String>, // available, reserved, placed
    pub reserved_for: Option<String>, // customer id
    pub notes: Option<String>,
}

/// Response from updating a puppy
#[derive(Debug, Serialize)]
pub struct UpdatePuppyResponse {
    pub success: bool,
    pub message: String,
}

/// Parameters for listing a litter's puppies
#[derive(Debug, Deserialize)]
pub struct ListPuppiesParams {
    pub litter_id: String,
}

/// One puppy in a listing response
#[derive(Debug, Serialize)]
pub struct PuppySummary {
    pub puppy_id: String,
    pub name: String,
    pub sex: String,
    pub collar_color: Option<String>,
    pub status: String,
    pub reserved_for: Option<String>,
    pub birth_date: Option<String>,
}

/// Response from listing puppies
#[derive(Debug, Serialize)]
pub struct ListPuppiesResponse {
    pub puppies: Vec<PuppySummary>,
    pub total_count: usize,
}

fn parse_status(value: &str) -> Result<PuppyStatus, StorageError> {
    PuppyStatus::parse(value).ok_or_else(|| {
        StorageError::InvalidInput(format!(
            "Invalid puppy status '{}'. Valid options: available, reserved, placed",
            value
        ))
    })
}

/// Add a puppy to a litter using the provided storage
pub fn add_puppy<S: KennelStorage>(
    storage: &S,
    params: AddPuppyParams,
) -> Result<AddPuppyResponse, StorageError> {
    let litter_id =
        LitterId::from_string(&params.litter_id).map_err(|_| StorageError::LitterNotFound {
            litter_id: params.litter_id.clone(),
        })?;

    let litter = storage.get_litter(&litter_id)?;
    let sex = super::dogs::parse_sex(&params.sex)?;
    let birth_date = super::parse_opt_date_param(&params.birth_date, "birth date")?;

    let puppy = Puppy::new(
        litter_id,
        params.name.clone(),
        sex,
        params.collar_color,
        birth_date,
        params.notes,
    )?;

    let puppy_id = puppy.id.to_string();
    storage.create_puppy(&puppy)?;

    Ok(AddPuppyResponse {
        success: true,
        puppy_id: Some(puppy_id),
        message: format!("Added {} to litter '{}'", params.name, litter.name),
    })
}

/// Update a puppy, including reservation and placement
pub fn update_puppy<S: KennelStorage>(
    storage: &S,
    params: UpdatePuppyParams,
) -> Result<UpdatePuppyResponse, StorageError> {
    let puppy_id =
        PuppyId::from_string(&params.puppy_id).map_err(|_| StorageError::PuppyNotFound {
            puppy_id: params.puppy_id.clone(),
        })?;

    let mut puppy = storage.get_puppy(&puppy_id)?;

    let status = match &params.status {
        Some(status_str) => Some(parse_status(status_str)?),
        None => None,
    };

    let reserved_for = match &params.reserved_for {
        Some(customer_str) => {
            let customer_id = CustomerId::from_string(customer_str).map_err(|_| {
                StorageError::CustomerNotFound {
                    customer_id: customer_str.clone(),
                }
            })?;
            // Confirm the customer exists before tying the puppy to them
            storage.get_customer(&customer_id)?;
            Some(Some(customer_id))
        }
        None => None,
    };

    puppy.update(
        params.name,
        params.collar_color.map(Some),
        status,
        reserved_for,
        params.notes.map(Some),
    )?;

    storage.update_puppy(&puppy)?;

    let message = match status {
        Some(PuppyStatus::Reserved) => format!("Reserved {}", puppy.name),
        Some(PuppyStatus::Placed) => format!("Placed {} with their new family", puppy.name),
        Some(PuppyStatus::Available) => format!("{} is back to available", puppy.name),
        None => format!("Updated {}", puppy.name),
    };

    Ok(UpdatePuppyResponse {
        success: true,
        message,
    })
}

/// List all puppies in a litter
pub fn list_puppies<S: KennelStorage>(
    storage: &S,
    params: ListPuppiesParams,
) -> Result<ListPuppiesResponse, StorageError> {
    let litter_id =
        LitterId::from_string(&params.litter_id).map_err(|_| StorageError::LitterNotFound {
            litter_id: params.litter_id.clone(),
        })?;

    // Resolving the litter first gives a clean not-found error and lets
    // puppies without their own birth date inherit the whelp date.
    let litter = storage.get_litter(&litter_id)?;
    let puppies = storage.list_puppies_for_litter(&litter_id)?;

    let summaries: Vec<PuppySummary> = puppies
        .into_iter()
        .map(|puppy| {
            let birth_date = puppy.effective_birth_date(litter.whelped_on);
            PuppySummary {
                puppy_id: puppy.id.to_string(),
                name: puppy.name,
                sex: puppy.sex.display_name().to_string(),
                collar_color: puppy.collar_color,
                status: puppy.status.display_name().to_string(),
                reserved_for: puppy.reserved_for.map(|id| id.to_string()),
                birth_date: birth_date.map(|d| d.to_string()),
            }
        })
        .collect();

    let total_count = summaries.len();

    Ok(ListPuppiesResponse {
        puppies: summaries,
        total_count,
    })
}
