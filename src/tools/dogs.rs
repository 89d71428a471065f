/// Tools for managing adult dogs
///
/// This module implements the dog_add, dog_update and dog_list MCP tools.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Dog, DogId, DogRole, Sex};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for adding a dog
#[derive(Debug, Deserialize)]
pub struct AddDogParams {
    pub name: String,
    pub breed: String,
    pub sex: String,       // We'll parse this to the Sex enum
    pub role: Option<String>, // Defaults to "breeding"
    pub birth_date: String, // YYYY-MM-DD
    pub color: Option<String>,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
}

/// Response from adding a dog
#[derive(Debug, Serialize)]
pub struct AddDogResponse {
    pub success: bool,
    pub dog_id: Option<String>,
    pub message: String,
}

/// Parameters for updating a dog
#[derive(Debug, Deserialize)]
pub struct UpdateDogParams {
    pub dog_id: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub color: Option<String>,
    pub weight_kg: Option<f64>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Response from updating a dog
#[derive(Debug, Serialize)]
pub struct UpdateDogResponse {
    pub success: bool,
    pub message: String,
}

/// Parameters for listing dogs
#[derive(Debug, Deserialize)]
pub struct ListDogsParams {
    pub sex: Option<String>,
    pub role: Option<String>,
    pub include_inactive: Option<bool>,
}

/// One dog in a listing response
#[derive(Debug, Serialize)]
pub struct DogSummary {
    pub dog_id: String,
    pub name: String,
    pub breed: String,
    pub sex: String,
    pub role: String,
    pub birth_date: String,
    pub age_days: i64,
    pub color: Option<String>,
    pub weight_kg: Option<f64>,
    pub is_active: bool,
}

/// Response from listing dogs
#[derive(Debug, Serialize)]
pub struct ListDogsResponse {
    pub dogs: Vec<DogSummary>,
    pub total_count: usize,
}

/// Parse a sex parameter string
pub(crate) fn parse_sex(value: &str) -> Result<Sex, StorageError> {
    Sex::parse(value).ok_or_else(|| {
        StorageError::InvalidInput(format!(
            "Invalid sex '{}'. Valid options: female, male",
            value
        ))
    })
}

/// Parse a role parameter string
fn parse_role(value: &str) -> Result<DogRole, StorageError> {
    DogRole::parse(value).ok_or_else(|| {
        StorageError::InvalidInput(format!(
            "Invalid role '{}'. Valid options: breeding, retired, companion",
            value
        ))
    })
}

/// Add a dog using the provided storage
pub fn add_dog<S: KennelStorage>(
    storage: &S,
    params: AddDogParams,
) -> Result<AddDogResponse, StorageError> {
    let sex = parse_sex(&params.sex)?;
    let role = match &params.role {
        Some(role_str) => parse_role(role_str)?,
        None => DogRole::Breeding,
    };
    let birth_date = super::parse_date_param(&params.birth_date, "birth date")?;

    let dog = Dog::new(
        params.name.clone(),
        params.breed,
        sex,
        role,
        birth_date,
        params.color,
        params.weight_kg,
        params.notes,
    )?;

    let dog_id = dog.id.to_string();
    storage.create_dog(&dog)?;

    Ok(AddDogResponse {
        success: true,
        dog_id: Some(dog_id),
        message: format!("Added {} ({})", params.name, dog.breed),
    })
}

/// Update an existing dog using the provided storage
pub fn update_dog<S: KennelStorage>(
    storage: &S,
    params: UpdateDogParams,
) -> Result<UpdateDogResponse, StorageError> {
    let dog_id = DogId::from_string(&params.dog_id).map_err(|_| StorageError::DogNotFound {
        dog_id: params.dog_id.clone(),
    })?;

    let mut dog = storage.get_dog(&dog_id)?;

    let role = match &params.role {
        Some(role_str) => Some(parse_role(role_str)?),
        None => None,
    };

    dog.update(
        params.name,
        role,
        params.color.map(Some),
        params.weight_kg.map(Some),
        params.notes.map(Some),
        params.is_active,
    )?;

    storage.update_dog(&dog)?;

    let message = match params.is_active {
        Some(false) => format!("Archived {}", dog.name),
        Some(true) => format!("Reactivated {}", dog.name),
        None => format!("Updated {}", dog.name),
    };

    Ok(UpdateDogResponse {
        success: true,
        message,
    })
}

/// List dogs, optionally filtered by sex and role
pub fn list_dogs<S: KennelStorage>(
    storage: &S,
    params: ListDogsParams,
) -> Result<ListDogsResponse, StorageError> {
    let sex = match &params.sex {
        Some(sex_str) => Some(parse_sex(sex_str)?),
        None => None,
    };
    let role = match &params.role {
        Some(role_str) => Some(parse_role(role_str)?),
        None => None,
    };
    let active_only = !params.include_inactive.unwrap_or(false);

    let dogs = storage.list_dogs(sex, role, active_only)?;
    let today = Utc::now().naive_utc().date();

    let summaries: Vec<DogSummary> = dogs
        .into_iter()
        .map(|dog| {
            let age_days = dog.age_days(today);
            DogSummary {
                dog_id: dog.id.to_string(),
                name: dog.name,
                breed: dog.breed,
                sex: dog.sex.display_name().to_string(),
                role: dog.role.display_name().to_string(),
                birth_date: dog.birth_date.to_string(),
                age_days,
                color: dog.color,
                weight_kg: dog.weight_kg,
                is_active: dog.is_active,
            }
        })
        .collect();

    let total_count = summaries.len();

    Ok(ListDogsResponse {
        dogs: summaries,
        total_count,
    })
}
