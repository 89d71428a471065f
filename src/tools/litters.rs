/// Tools for managing litters
///
/// This module implements the litter_add, litter_update and litter_list
/// MCP tools.

use serde::{Deserialize, Serialize};

use crate::domain::{DogId, Litter, LitterId};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for adding a litter
#[derive(Debug, Deserialize)]
pub struct AddLitterParams {
    pub name: String,
    pub dam_id: String,
    pub sire_id: Option<String>,
    pub expected_on: Option<String>, // YYYY-MM-DD
    pub whelped_on: Option<String>,  // YYYY-MM-DD
    pub notes: Option<String>,
}

/// Response from adding a litter
#[derive(Debug, Serialize)]
pub struct AddLitterResponse {
    pub success: bool,
    pub litter_id: Option<String>,
    pub message: String,
}

/// Parameters for updating a litter
#[derive(Debug, Deserialize)]
pub struct UpdateLitterParams {
    pub litter_id: String,
    pub name: Option<String>,
    pub sire_id: Option<String>,
    pub expected_on: Option<String>,
    pub whelped_on: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Response from updating a litter
#[derive(Debug, Serialize)]
pub struct UpdateLitterResponse {
    pub success: bool,
    pub message: String,
}

/// Parameters for listing litters
#[derive(Debug, Deserialize)]
pub struct ListLittersParams {
    pub include_inactive: Option<bool>,
}

/// One litter in a listing response
#[derive(Debug, Serialize)]
pub struct LitterSummary {
    pub litter_id: String,
    pub name: String,
    pub dam_name: String,
    pub sire_name: Option<String>,
    pub expected_on: Option<String>,
    pub whelped_on: Option<String>,
    pub puppy_count: usize,
    pub is_active: bool,
}

/// Response from listing litters
#[derive(Debug, Serialize)]
pub struct ListLittersResponse {
    pub litters: Vec<LitterSummary>,
    pub total_count: usize,
}

fn parse_dog_ref(value: &str) -> Result<DogId, StorageError> {
    DogId::from_string(value).map_err(|_| StorageError::DogNotFound {
        dog_id: value.to_string(),
    })
}

/// Add a litter using the provided storage
///
/// The dam must exist; a sire is optional (outside studs may not be
/// in the kennel's records).
pub fn add_litter<S: KennelStorage>(
    storage: &S,
    params: AddLitterParams,
) -> Result<AddLitterResponse, StorageError> {
    let dam_id = parse_dog_ref(&params.dam_id)?;
    // Confirm the dam exists before creating anything
    let dam = storage.get_dog(&dam_id)?;

    let sire_id = match &params.sire_id {
        Some(sire_str) => {
            let sire_id = parse_dog_ref(sire_str)?;
            storage.get_dog(&sire_id)?;
            Some(sire_id)
        }
        None => None,
    };

    let expected_on = super::parse_opt_date_param(&params.expected_on, "expected date")?;
    let whelped_on = super::parse_opt_date_param(&params.whelped_on, "whelp date")?;

    let litter = Litter::new(
        params.name.clone(),
        dam_id,
        sire_id,
        expected_on,
        whelped_on,
        params.notes,
    )?;

    let litter_id = litter.id.to_string();
    storage.create_litter(&litter)?;

    Ok(AddLitterResponse {
        success: true,
        litter_id: Some(litter_id),
        message: format!("Added litter '{}' out of {}", params.name, dam.name),
    })
}

/// Update an existing litter using the provided storage
pub fn update_litter<S: KennelStorage>(
    storage: &S,
    params: UpdateLitterParams,
) -> Result<UpdateLitterResponse, StorageError> {
    let litter_id =
        LitterId::from_string(&params.litter_id).map_err(|_| StorageError::LitterNotFound {
            litter_id: params.litter_id.clone(),
        })?;

    let mut litter = storage.get_litter(&litter_id)?;

    let sire_id = match &params.sire_id {
        Some(sire_str) => {
            let sire_id = parse_dog_ref(sire_str)?;
            storage.get_dog(&sire_id)?;
            Some(Some(sire_id))
        }
        None => None,
    };
    let expected_on = super::parse_opt_date_param(&params.expected_on, "expected date")?;
    let whelped_on = super::parse_opt_date_param(&params.whelped_on, "whelp date")?;

    litter.update(
        params.name,
        sire_id,
        expected_on.map(Some),
        whelped_on.map(Some),
        params.notes.map(Some),
        params.is_active,
    )?;

    storage.update_litter(&litter)?;

    let message = if whelped_on.is_some() {
        format!("Marked litter '{}' as whelped", litter.name)
    } else {
        format!("Updated litter '{}'", litter.name)
    };

    Ok(UpdateLitterResponse {
        success: true,
        message,
    })
}

/// List litters with dam and sire names resolved
pub fn list_litters<S: KennelStorage>(
    storage: &S,
    params: ListLittersParams,
) -> Result<ListLittersResponse, StorageError> {
    let active_only = !params.include_inactive.unwrap_or(false);
    let litters = storage.list_litters(active_only)?;

    let mut summaries = Vec::new();
    for litter in litters {
        let dam = storage.get_dog(&litter.dam_id)?;
        let sire_name = match &litter.sire_id {
            Some(sire_id) => Some(storage.get_dog(sire_id)?.name),
            None => None,
        };
        let puppy_count = storage.list_puppies_for_litter(&litter.id)?.len();

        summaries.push(LitterSummary {
            litter_id: litter.id.to_string(),
            name: litter.name,
            dam_name: dam.name,
            sire_name,
            expected_on: litter.expected_on.map(|d| d.to_string()),
            whelped_on: litter.whelped_on.map(|d| d.to_string()),
            puppy_count,
            is_active: litter.is_active,
        });
    }

    let total_count = summaries.len();

    Ok(ListLittersResponse {
        litters: summaries,
        total_count,
    })
}
