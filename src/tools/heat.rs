/// Tools for heat cycle tracking and projection
///
/// This module implements the heat_record and heat_status MCP tools.
/// heat_record either starts a new cycle or closes the latest open one;
/// heat_status produces the projection report (stage, windows, next heat,
/// vaccination conflicts) for one dog or every active breeding female.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::cycles::{CycleEngine, DogCycleReport};
use crate::domain::{DogId, HeatCycle, Sex};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for recording a heat event
///
/// Provide started_on (or nothing, for today) to open a new cycle.
/// Provide ended_on alone to close the latest recorded cycle.
#[derive(Debug, Deserialize)]
pub struct RecordHeatParams {
    pub dog_id: String,
    pub started_on: Option<String>, // YYYY-MM-DD
    pub ended_on: Option<String>,   // YYYY-MM-DD
    pub cycle_length_days: Option<u16>,
    pub notes: Option<String>,
}

/// Response from recording a heat event
#[derive(Debug, Serialize)]
pub struct RecordHeatResponse {
    pub success: bool,
    pub cycle_id: Option<String>,
    pub next_heat_on: Option<String>,
    pub message: String,
}

/// Parameters for the heat status report
#[derive(Debug, Deserialize)]
pub struct HeatStatusParams {
    /// One dog, or every active breeding female when omitted
    pub dog_id: Option<String>,
    /// Report date, defaults to today. Useful for planning ahead.
    pub as_of: Option<String>,
}

/// Response from the heat status report
#[derive(Debug, Serialize)]
pub struct HeatStatusResponse {
    pub as_of: String,
    pub reports: Vec<DogCycleReport>,
    pub total_count: usize,
}

fn parse_dog_ref(value: &str) -> Result<DogId, StorageError> {
    DogId::from_string(value).map_err(|_| StorageError::DogNotFound {
        dog_id: value.to_string(),
    })
}

/// Record a heat start or close the latest cycle
pub fn record_heat<S: KennelStorage>(
    storage: &S,
    params: RecordHeatParams,
) -> Result<RecordHeatResponse, StorageError> {
    let dog_id = parse_dog_ref(&params.dog_id)?;
    let dog = storage.get_dog(&dog_id)?;

    if dog.sex != Sex::Female {
        return Err(StorageError::InvalidInput(format!(
            "{} is male; heat cycles are tracked for females only",
            dog.name
        )));
    }

    let started_on = super::parse_opt_date_param(&params.started_on, "heat start date")?;
    let ended_on = super::parse_opt_date_param(&params.ended_on, "heat end date")?;

    // An end date without a start date closes the latest cycle
    if started_on.is_none() {
        if let Some(end) = ended_on {
            let Some(mut cycle) = storage.latest_heat_cycle_for_dog(&dog_id)? else {
                return Err(StorageError::InvalidInput(format!(
                    "No heat recorded for {}; nothing to close",
                    dog.name
                )));
            };
            cycle.close(end)?;
            if params.cycle_length_days.is_some() {
                cycle.cycle_length_days = params.cycle_length_days;
            }
            storage.update_heat_cycle(&cycle)?;

            return Ok(RecordHeatResponse {
                success: true,
                cycle_id: Some(cycle.id.to_string()),
                next_heat_on: None,
                message: format!("Closed {}'s heat on {}", dog.name, end),
            });
        }
    }

    let start = started_on.unwrap_or_else(|| Utc::now().naive_utc().date());
    let mut cycle = HeatCycle::new(dog_id, start, params.cycle_length_days, params.notes)?;
    if let Some(end) = ended_on {
        cycle.close(end)?;
    }

    let next_heat_on = crate::domain::heat::next_heat_start(start, cycle.effective_cycle_length());

    let cycle_id = cycle.id.to_string();
    storage.create_heat_cycle(&cycle)?;

    Ok(RecordHeatResponse {
        success: true,
        cycle_id: Some(cycle_id),
        next_heat_on: Some(next_heat_on.to_string()),
        message: format!(
            "Recorded heat for {} starting {}; next expected around {}",
            dog.name, start, next_heat_on
        ),
    })
}

/// Build the projection report for one dog or the whole breeding roster
pub fn heat_status<S: KennelStorage>(
    storage: &S,
    engine: &CycleEngine,
    params: HeatStatusParams,
) -> Result<HeatStatusResponse, StorageError> {
    let as_of = match super::parse_opt_date_param(&params.as_of, "report date")? {
        Some(date) => date,
        None => Utc::now().naive_utc().date(),
    };

    let reports = match &params.dog_id {
        Some(dog_str) => {
            let dog_id = parse_dog_ref(dog_str)?;
            let dog = storage.get_dog(&dog_id)?;
            if dog.sex != Sex::Female {
                return Err(StorageError::InvalidInput(format!(
                    "{} is male; heat cycles are tracked for females only",
                    dog.name
                )));
            }
            vec![engine.report_for_dog(storage, &dog, as_of)?]
        }
        None => engine.report_all(storage, as_of)?,
    };

    let total_count = reports.len();

    Ok(HeatStatusResponse {
        as_of: as_of.to_string(),
        reports,
        total_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::tools::dogs::{add_dog, AddDogParams};
    use crate::tools::vaccinations::{add_vaccination, AddVaccinationParams};
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    fn test_storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db")).unwrap();
        (dir, storage)
    }

    fn add_female(storage: &SqliteStorage, name: &str) -> String {
        add_dog(
            storage,
            AddDogParams {
                name: name.to_string(),
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
    fn test_record_heat_projects_next() {
        let (_dir, storage) = test_storage();
        let dog_id = add_female(&storage, "Maple");

        let start = Utc::now().naive_utc().date() - Duration::days(5);
        let response = record_heat(
            &storage,
            RecordHeatParams {
                dog_id,
                started_on: Some(start.to_string()),
                ended_on: None,
                cycle_length_days: Some(180),
                notes: None,
            },
        )
        .unwrap();

        assert!(response.success);
        let expected = (start + Duration::days(180)).to_string();
        assert_eq!(response.next_heat_on, Some(expected));
    }

    #[test]
    fn test_record_heat_rejects_male() {
        let (_dir, storage) = test_storage();
        let dog_id = add_dog(
            &storage,
            AddDogParams {
                name: "Bruno".to_string(),
                breed: "Golden Retriever".to_string(),
                sex: "male".to_string(),
                role: None,
                birth_date: "2021-01-01".to_string(),
                color: None,
                weight_kg: None,
                notes: None,
            },
        )
        .unwrap()
        .dog_id
        .unwrap();

        let result = record_heat(
            &storage,
            RecordHeatParams {
                dog_id,
                started_on: None,
                ended_on: None,
                cycle_length_days: None,
                notes: None,
            },
        );
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn test_close_latest_cycle() {
        let (_dir, storage) = test_storage();
        let dog_id = add_female(&storage, "Maple");

        let start = Utc::now().naive_utc().date() - Duration::days(18);
        record_heat(
            &storage,
            RecordHeatParams {
                dog_id: dog_id.clone(),
                started_on: Some(start.to_string()),
                ended_on: None,
                cycle_length_days: None,
                notes: None,
            },
        )
        .unwrap();

        let end = start + Duration::days(17);
        let response = record_heat(
            &storage,
            RecordHeatParams {
                dog_id,
                started_on: None,
                ended_on: Some(end.to_string()),
                cycle_length_days: None,
                notes: None,
            },
        )
        .unwrap();
        assert!(response.message.contains("Closed"));
    }

    #[test]
    fn test_status_flags_vaccination_conflict() {
        let (_dir, storage) = test_storage();
        let engine = CycleEngine::new();
        let dog_id = add_female(&storage, "Maple");

        let today = Utc::now().naive_utc().date();
        let start = today - Duration::days(170); // next heat in 10 days
        record_heat(
            &storage,
            RecordHeatParams {
                dog_id: dog_id.clone(),
                started_on: Some(start.to_string()),
                ended_on: None,
                cycle_length_days: Some(180),
                notes: None,
            },
        )
        .unwrap();

        // Due 5 days after the projected start, inside the conflict window
        add_vaccination(
            &storage,
            AddVaccinationParams {
                dog_id: dog_id.clone(),
                vaccine: "Rabies".to_string(),
                administered_on: None,
                due_on: Some((today + Duration::days(15)).to_string()),
                notes: None,
            },
        )
        .unwrap();

        let status = heat_status(
            &storage,
            &engine,
            HeatStatusParams {
                dog_id: Some(dog_id),
                as_of: None,
            },
        )
        .unwrap();

        assert_eq!(status.total_count, 1);
        let report = &status.reports[0];
        let projection = report.projection.as_ref().unwrap();
        assert!(projection.in_pre_heat);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].vaccine, "Rabies");
    }

    #[test]
    fn test_status_for_all_breeding_females() {
        let (_dir, storage) = test_storage();
        let engine = CycleEngine::new();
        add_female(&storage, "Maple");
        add_female(&storage, "Willow");

        let status = heat_status(
            &storage,
            &engine,
            HeatStatusParams {
                dog_id: None,
                as_of: None,
            },
        )
        .unwrap();

        assert_eq!(status.total_count, 2);
        for report in &status.reports {
            assert!(report.projection.is_none());
            assert!(report.summary.contains("no heat recorded"));
        }
    }
}
