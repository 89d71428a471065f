/// Cycle engine for reproductive planning reports
///
/// This module turns stored heat cycles and vaccinations into per-dog
/// projection reports: where a dog is in her cycle, when the next heat is
/// expected, and which vaccination due dates collide with it. The date math
/// itself lives in [`crate::domain::heat`]; this engine only wires it to
/// storage.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{heat, Dog, HeatProjection};
use crate::storage::{KennelStorage, StorageError};

/// A vaccination due date that collides with a projected heat
#[derive(Debug, Clone, Serialize)]
pub struct VaccinationConflict {
    pub vaccination_id: String,
    pub vaccine: String,
    pub due_on: NaiveDate,
}

/// Projection report for one female dog
#[derive(Debug, Clone, Serialize)]
pub struct DogCycleReport {
    pub dog_id: String,
    pub dog_name: String,
    /// None when no heat has ever been recorded for this dog
    pub projection: Option<HeatProjection>,
    /// Upcoming vaccinations that fall in the conflict window of the
    /// projected next heat
    pub conflicts: Vec<VaccinationConflict>,
    /// Human-readable one-line summary of the report
    pub summary: String,
}

/// Engine that assembles cycle reports from stored records
pub struct CycleEngine;

impl CycleEngine {
    /// Create a new cycle engine
    pub fn new() -> Self {
        Self
    }

    /// Build the projection report for one dog
    ///
    /// A dog with no recorded heat gets an empty report rather than an
    /// error; "we don't know her cycle yet" is a normal state.
    pub fn report_for_dog<S: KennelStorage>(
        &self,
        storage: &S,
        dog: &Dog,
        today: NaiveDate,
    ) -> Result<DogCycleReport, StorageError> {
        let latest = storage.latest_heat_cycle_for_dog(&dog.id)?;

        let Some(cycle) = latest else {
            return Ok(DogCycleReport {
                dog_id: dog.id.to_string(),
                dog_name: dog.name.clone(),
                projection: None,
                conflicts: Vec::new(),
                summary: format!("{}: no heat recorded yet", dog.name),
            });
        };

        let projection = HeatProjection::project(
            cycle.started_on,
            cycle.ended_on,
            cycle.cycle_length_days,
            today,
        );

        let conflicts = self.find_conflicts(storage, dog, projection.next_heat_on, today)?;
        let summary = Self::summarize(dog, &projection, &conflicts);

        Ok(DogCycleReport {
            dog_id: dog.id.to_string(),
            dog_name: dog.name.clone(),
            projection: Some(projection),
            conflicts,
            summary,
        })
    }

    /// Build reports for every active breeding female
    pub fn report_all<S: KennelStorage>(
        &self,
        storage: &S,
        today: NaiveDate,
    ) -> Result<Vec<DogCycleReport>, StorageError> {
        let dogs = storage.list_dogs(None, None, true)?;

        let mut reports = Vec::new();
        for dog in dogs.iter().filter(|d| d.is_breeding_female()) {
            reports.push(self.report_for_dog(storage, dog, today)?);
        }

        Ok(reports)
    }

    /// Check upcoming vaccinations against the projected next heat
    fn find_conflicts<S: KennelStorage>(
        &self,
        storage: &S,
        dog: &Dog,
        next_heat_on: NaiveDate,
        today: NaiveDate,
    ) -> Result<Vec<VaccinationConflict>, StorageError> {
        let upcoming = storage.upcoming_vaccinations_for_dog(&dog.id, today)?;

        let conflicts = upcoming
            .into_iter()
            .filter_map(|vaccination| {
                let due_on = vaccination.due_on?;
                if heat::vaccination_conflict(next_heat_on, due_on) {
                    Some(VaccinationConflict {
                        vaccination_id: vaccination.id.to_string(),
                        vaccine: vaccination.vaccine,
                        due_on,
                    })
                } else {
                    None
                }
            })
            .collect();

        Ok(conflicts)
    }

    fn summarize(
        dog: &Dog,
        projection: &HeatProjection,
        conflicts: &[VaccinationConflict],
    ) -> String {
        let mut summary = if projection.in_heat {
            format!(
                "{}: in heat, day {} ({})",
                dog.name,
                projection.day_of_heat.unwrap_or(0),
                projection.stage.display_name()
            )
        } else if projection.in_pre_heat {
            format!(
                "{}: pre-heat window, next heat expected {}",
                dog.name, projection.next_heat_on
            )
        } else {
            format!(
                "{}: anestrus, next heat expected {}",
                dog.name, projection.next_heat_on
            )
        };

        if !conflicts.is_empty() {
            summary.push_str(&format!(
                " ({} vaccination conflict{})",
                conflicts.len(),
                if conflicts.len() == 1 { "" } else { "s" }
            ));
        }

        summary
    }
}

impl Default for CycleEngine {
    fn default() -> Self {
        Self::new()
    }
}
