/// Tools for vaccination records
///
/// This module implements the vaccination_add and vaccination_list MCP
/// tools. Due dates feed the heat projection's conflict check, so a shot
/// can be either a history entry (administered) or a reminder (due).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{DogId, Vaccination};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for adding a vaccination record
#[derive(Debug, Deserialize)]
pub struct AddVaccinationParams {
    pub dog_id: String,
    pub vaccine: String,
    pub administered_on: Option<String>, // YYYY-MM-DD
    pub due_on: Option<String>,          // YYYY-MM-DD
    pub notes: Option<String>,
}

/// Response from adding a vaccination record
#[derive(Debug, Serialize)]
pub struct AddVaccinationResponse {
    pub success: bool,
    pub vaccination_id: Option<String>,
    pub message: String,
}

/// Parameters for listing vaccination records
#[derive(Debug, Deserialize)]
pub struct ListVaccinationsParams {
    pub dog_id: String,
    /// Only records still waiting to be given, with a due date from today on
    pub upcoming_only: Option<bool>,
}

/// One vaccination in a listing response
#[derive(Debug, Serialize)]
pub struct VaccinationSummary {
    pub vaccination_id: String,
    pub vaccine: String,
    pub administered_on: Option<String>,
    pub due_on: Option<String>,
    pub notes: Option<String>,
}

/// Response from listing vaccination records
#[derive(Debug, Serialize)]
pub struct ListVaccinationsResponse {
    pub dog_name: String,
    pub vaccinations: Vec<VaccinationSummary>,
    pub total_count: usize,
}

/// Add a vaccination record for a dog
pub fn add_vaccination<S: KennelStorage>(
    storage: &S,
    params: AddVaccinationParams,
) -> Result<AddVaccinationResponse, StorageError> {
    let dog_id = DogId::from_string(&params.dog_id).map_err(|_| StorageError::DogNotFound {
        dog_id: params.dog_id.clone(),
    })?;
    let dog = storage.get_dog(&dog_id)?;

    let administered_on =
        super::parse_opt_date_param(&params.administered_on, "administered date")?;
    let due_on = super::parse_opt_date_param(&params.due_on, "due date")?;

    let vaccination = Vaccination::new(
        dog_id,
        params.vaccine.clone(),
        administered_on,
        due_on,
        params.notes,
    )?;

    let vaccination_id = vaccination.id.to_string();
    storage.create_vaccination(&vaccination)?;

    let message = match (administered_on, due_on) {
        (Some(given), _) => format!("Recorded {} given to {} on {}", params.vaccine, dog.name, given),
        (None, Some(due)) => format!("{} is due {} on {}", dog.name, params.vaccine, due),
        // Vaccination::new rejects the dateless case before we get here
        (None, None) => format!("Recorded {} for {}", params.vaccine, dog.name),
    };

    Ok(AddVaccinationResponse {
        success: true,
        vaccination_id: Some(vaccination_id),
        message,
    })
}

/// List a dog's vaccination records
pub fn list_vaccinations<S: KennelStorage>(
    storage: &S,
    params: ListVaccinationsParams,
) -> Result<ListVaccinationsResponse, StorageError> {
    let dog_id = DogId::from_string(&params.dog_id).map_err(|_| StorageError::DogNotFound {
        dog_id: params.dog_id.clone(),
    })?;
    let dog = storage.get_dog(&dog_id)?;

    let records = if params.upcoming_only.unwrap_or(false) {
        let today = Utc::now().naive_utc().date();
        storage.upcoming_vaccinations_for_dog(&dog_id, today)?
    } else {
        storage.list_vaccinations_for_dog(&dog_id)?
    };

    let summaries: Vec<VaccinationSummary> = records
        .into_iter()
        .map(|record| VaccinationSummary {
            vaccination_id: record.id.to_string(),
            vaccine: record.vaccine,
            administered_on: record.administered_on.map(|d| d.to_string()),
            due_on: record.due_on.map(|d| d.to_string()),
            notes: record.notes,
        })
        .collect();

    let total_count = summaries.len();

    Ok(ListVaccinationsResponse {
        dog_name: dog.name,
        vaccinations: summaries,
        total_count,
    })
}
