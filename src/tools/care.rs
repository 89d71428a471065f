/// Tools for daily care logging
///
/// This module implements the care_log and care_history MCP tools.
/// Repeated logs for the same dog, action and day are allowed on
/// purpose: a puppy gets fed more than once.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{CareAction, CareLog, DogId};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for logging a care action
#[derive(Debug, Deserialize)]
pub struct LogCareParams {
    pub dog_id: String,
    pub action: String, // feeding, potty_break, medication, grooming, exercise, weight_check, custom:<name>
    pub performed_on: Option<String>, // YYYY-MM-DD, defaults to today
    pub quantity: Option<u32>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

/// Response from logging a care action
#[derive(Debug, Serialize)]
pub struct LogCareResponse {
    pub success: bool,
    pub log_id: Option<String>,
    pub message: String,
}

/// Parameters for reading care history
///
/// With a dog_id the history is per dog; without one it is a day sheet
/// across the whole kennel for the given date range.
#[derive(Debug, Deserialize)]
pub struct CareHistoryParams {
    pub dog_id: Option<String>,
    pub start_date: Option<String>, // YYYY-MM-DD
    pub end_date: Option<String>,   // YYYY-MM-DD
    pub limit: Option<u32>,
}

/// One care log in a history response
#[derive(Debug, Serialize)]
pub struct CareLogSummary {
    pub log_id: String,
    pub dog_id: String,
    pub action: String,
    pub performed_on: String,
    pub quantity: Option<String>,
    pub notes: Option<String>,
}

/// Response from reading care history
#[derive(Debug, Serialize)]
pub struct CareHistoryResponse {
    pub logs: Vec<CareLogSummary>,
    pub total_count: usize,
}

fn parse_action(value: &str) -> Result<CareAction, StorageError> {
    CareAction::parse(value).ok_or_else(|| {
        StorageError::InvalidInput(format!(
            "Invalid care action '{}'. Valid options: feeding, potty_break, medication, \
             grooming, exercise, weight_check, or custom:name",
            value
        ))
    })
}

fn parse_dog_ref(value: &str) -> Result<DogId, StorageError> {
    DogId::from_string(value).map_err(|_| StorageError::DogNotFound {
        dog_id: value.to_string(),
    })
}

fn summarize(log: CareLog) -> CareLogSummary {
    CareLogSummary {
        log_id: log.id.to_string(),
        dog_id: log.dog_id.to_string(),
        action: log.action.display_name().to_string(),
        performed_on: log.performed_on.to_string(),
        quantity: log.quantity_display(),
        notes: log.notes,
    }
}

/// Record a care action for a dog
pub fn log_care<S: KennelStorage>(
    storage: &S,
    params: LogCareParams,
) -> Result<LogCareResponse, StorageError> {
    let dog_id = parse_dog_ref(&params.dog_id)?;
    let dog = storage.get_dog(&dog_id)?;

    let action = parse_action(&params.action)?;
    let performed_on = match super::parse_opt_date_param(&params.performed_on, "date")? {
        Some(date) => date,
        None => Utc::now().naive_utc().date(),
    };

    let log = CareLog::new(
        dog_id,
        action.clone(),
        performed_on,
        params.quantity,
        params.unit,
        params.notes,
    )?;

    let log_id = log.id.to_string();
    storage.create_care_log(&log)?;

    Ok(LogCareResponse {
        success: true,
        log_id: Some(log_id),
        message: format!(
            "Logged {} for {} on {}",
            action.display_name(),
            dog.name,
            performed_on
        ),
    })
}

/// Read care history for one dog or the whole kennel
pub fn care_history<S: KennelStorage>(
    storage: &S,
    params: CareHistoryParams,
) -> Result<CareHistoryResponse, StorageError> {
    let start_date = super::parse_opt_date_param(&params.start_date, "start date")?;
    let end_date = super::parse_opt_date_param(&params.end_date, "end date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            return Err(StorageError::InvalidInput(
                "End date cannot precede start date".to_string(),
            ));
        }
    }

    let logs = match &params.dog_id {
        Some(dog_str) => {
            let dog_id = parse_dog_ref(dog_str)?;
            storage.get_dog(&dog_id)?;

            let mut logs = storage.list_care_logs_for_dog(&dog_id, None)?;
            if let Some(start) = start_date {
                logs.retain(|log| log.performed_on >= start);
            }
            if let Some(end) = end_date {
                logs.retain(|log| log.performed_on <= end);
            }
            if let Some(limit) = params.limit {
                logs.truncate(limit as usize);
            }
            logs
        }
        None => {
            // Day sheet across all dogs, defaulting to today
            let today = Utc::now().naive_utc().date();
            let start = start_date.unwrap_or(today);
            let end = end_date.unwrap_or(start.max(today));
            let mut logs = storage.list_care_logs_by_date_range(start, end)?;
            if let Some(limit) = params.limit {
                logs.truncate(limit as usize);
            }
            logs
        }
    };

    let summaries: Vec<CareLogSummary> = logs.into_iter().map(summarize).collect();
    let total_count = summaries.len();

    Ok(CareHistoryResponse {
        logs: summaries,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::tools::dogs::{add_dog, AddDogParams};
    use tempfile::tempdir;

    fn test_storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db")).unwrap();
        (dir, storage)
    }

    fn add_test_dog(storage: &SqliteStorage) -> String {
        add_dog(
            storage,
            AddDogParams {
                name: "Maple".to_string(),
                breed: "Golden Retriever".to_string(),
                sex: "female".to_string(),
                role: None,
                birth_date: "2022-05-01".to_string(),
                color: None,
                weight_kg: None,
                notes: None,
            },
        )
        .unwrap()
        .dog_id
        .unwrap()
    }

    #[test]
    fn test_log_defaults_to_today() {
        let (_dir, storage) = test_storage();
        let dog_id = add_test_dog(&storage);

        let response = log_care(
            &storage,
            LogCareParams {
                dog_id: dog_id.clone(),
                action: "feeding".to_string(),
                performed_on: None,
                quantity: Some(2),
                unit: Some("cups".to_string()),
                notes: None,
            },
        )
        .unwrap();
        assert!(response.success);

        let history = care_history(
            &storage,
            CareHistoryParams {
                dog_id: Some(dog_id),
                start_date: None,
                end_date: None,
                limit: None,
            },
        )
        .unwrap();
        assert_eq!(history.total_count, 1);
        assert_eq!(history.logs[0].quantity.as_deref(), Some("2 cups"));
    }

    #[test]
    fn test_duplicate_logs_allowed() {
        let (_dir, storage) = test_storage();
        let dog_id = add_test_dog(&storage);
        let day = (Utc::now().naive_utc().date() - chrono::Duration::days(3)).to_string();

        for _ in 0..3 {
            log_care(
                &storage,
                LogCareParams {
                    dog_id: dog_id.clone(),
                    action: "feeding".to_string(),
                    performed_on: Some(day.clone()),
                    quantity: None,
                    unit: None,
                    notes: None,
                },
            )
            .unwrap();
        }

        let history = care_history(
            &storage,
            CareHistoryParams {
                dog_id: Some(dog_id),
                start_date: Some(day.clone()),
                end_date: Some(day),
                limit: None,
            },
        )
        .unwrap();
        assert_eq!(history.total_count, 3);
    }

    #[test]
    fn test_day_sheet_without_dog() {
        let (_dir, storage) = test_storage();
        let dog_id = add_test_dog(&storage);
        let day = (Utc::now().naive_utc().date() - chrono::Duration::days(1)).to_string();

        log_care(
            &storage,
            LogCareParams {
                dog_id,
                action: "custom:crate training".to_string(),
                performed_on: Some(day.clone()),
                quantity: None,
                unit: None,
                notes: None,
            },
        )
        .unwrap();

        let sheet = care_history(
            &storage,
            CareHistoryParams {
                dog_id: None,
                start_date: Some(day.clone()),
                end_date: Some(day),
                limit: None,
            },
        )
        .unwrap();
        assert_eq!(sheet.total_count, 1);
        assert_eq!(sheet.logs[0].action, "crate training");
    }
}
