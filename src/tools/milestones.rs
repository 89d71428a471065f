/// Tools for puppy developmental milestones
///
/// This module implements the milestone_record and milestone_list MCP
/// tools. When the puppy's birth date is known (directly or through the
/// litter's whelp date) the response grades the milestone against the
/// typical age range.

use serde::{Deserialize, Serialize};

use crate::domain::{Milestone, MilestoneKind, Puppy, PuppyId};
use crate::storage::{KennelStorage, StorageError};

/// Parameters for recording a milestone
#[derive(Debug, Deserialize)]
pub struct RecordMilestoneParams {
    pub puppy_id: String,
    pub kind: String, // eyes_open, ears_open, first_walk, first_bark, weaned, first_vaccine, custom:<name>
    pub achieved_on: String, // YYYY-MM-DD
    pub notes: Option<String>,
}

/// Response from recording a milestone
#[derive(Debug, Serialize)]
pub struct RecordMilestoneResponse {
    pub success: bool,
    pub milestone_id: Option<String>,
    pub age_days: Option<u32>,
    pub assessment: Option<String>, // early, on time, late
    pub message: String,
}

/// Parameters for listing a puppy's milestones
#[derive(Debug, Deserialize)]
pub struct ListMilestonesParams {
    pub puppy_id: String,
}

/// One milestone in a listing response
#[derive(Debug, Serialize)]
pub struct MilestoneSummary {
    pub milestone_id: String,
    pub kind: String,
    pub achieved_on: String,
    pub age_days: Option<u32>,
    pub assessment: Option<String>,
    pub notes: Option<String>,
}

/// Response from listing milestones
#[derive(Debug, Serialize)]
pub struct ListMilestonesResponse {
    pub puppy_name: String,
    pub milestones: Vec<MilestoneSummary>,
    pub total_count: usize,
}

fn parse_kind(value: &str) -> Result<MilestoneKind, StorageError> {
    MilestoneKind::parse(value).ok_or_else(|| {
        StorageError::InvalidInput(format!(
            "Invalid milestone '{}'. Valid options: eyes_open, ears_open, first_walk, \
             first_bark, weaned, first_vaccine, or custom:name",
            value
        ))
    })
}

fn resolve_puppy<S: KennelStorage>(
    storage: &S,
    puppy_id: &str,
) -> Result<(Puppy, Option<chrono::NaiveDate>), StorageError> {
    let puppy_id = PuppyId::from_string(puppy_id).map_err(|_| StorageError::PuppyNotFound {
        puppy_id: puppy_id.to_string(),
    })?;
    let puppy = storage.get_puppy(&puppy_id)?;
    let litter = storage.get_litter(&puppy.litter_id)?;
    let birth_date = puppy.effective_birth_date(litter.whelped_on);
    Ok((puppy, birth_date))
}

/// Record a milestone for a puppy
pub fn record_milestone<S: KennelStorage>(
    storage: &S,
    params: RecordMilestoneParams,
) -> Result<RecordMilestoneResponse, StorageError> {
    let (puppy, birth_date) = resolve_puppy(storage, &params.puppy_id)?;
    let kind = parse_kind(&params.kind)?;
    let achieved_on = super::parse_date_param(&params.achieved_on, "milestone date")?;

    let milestone = Milestone::new(puppy.id.clone(), kind.clone(), achieved_on, params.notes)?;

    let age_days = birth_date.and_then(|birth| milestone.age_at_achievement(birth));
    let assessment = birth_date.and_then(|birth| milestone.age_assessment(birth));

    let milestone_id = milestone.id.to_string();
    storage.create_milestone(&milestone)?;

    let message = match (&assessment, age_days) {
        (Some(grade), Some(days)) => format!(
            "{} hit '{}' at {} days, {}",
            puppy.name,
            kind.display_name(),
            days,
            grade.display_name()
        ),
        _ => format!("Recorded '{}' for {}", kind.display_name(), puppy.name),
    };

    Ok(RecordMilestoneResponse {
        success: true,
        milestone_id: Some(milestone_id),
        age_days,
        assessment: assessment.map(|a| a.display_name().to_string()),
        message,
    })
}

/// List a puppy's milestones in the order they were achieved
pub fn list_milestones<S: KennelStorage>(
    storage: &S,
    params: ListMilestonesParams,
) -> Result<ListMilestonesResponse, StorageError> {
    let (puppy, birth_date) = resolve_puppy(storage, &params.puppy_id)?;
    let milestones = storage.list_milestones_for_puppy(&puppy.id)?;

    let summaries: Vec<MilestoneSummary> = milestones
        .into_iter()
        .map(|milestone| {
            let age_days = birth_date.and_then(|birth| milestone.age_at_achievement(birth));
            let assessment = birth_date
                .and_then(|birth| milestone.age_assessment(birth))
                .map(|a| a.display_name().to_string());
            MilestoneSummary {
                milestone_id: milestone.id.to_string(),
                kind: milestone.kind.display_name().to_string(),
                achieved_on: milestone.achieved_on.to_string(),
                age_days,
                assessment,
                notes: milestone.notes,
            }
        })
        .collect();

    let total_count = summaries.len();

    Ok(ListMilestonesResponse {
        puppy_name: puppy.name,
        milestones: summaries,
        total_count,
    })
}
