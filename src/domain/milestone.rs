/// Milestone entity for tracking puppy development
///
/// Milestones record when a puppy hit a developmental event (eyes open,
/// first walk, weaned). When the puppy's birth date is known, the recorded
/// date is assessed against the kind's expected age range.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, MilestoneId, MilestoneKind, PuppyId};

/// How a milestone's timing compares to its expected age range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeAssessment {
    /// Hit before the expected range opened
    Early,
    /// Inside the expected range
    OnTime,
    /// Hit after the expected range closed
    Late,
}

impl AgeAssessment {
    /// Get the display name for this assessment
    pub fn display_name(&self) -> &str {
        match self {
            AgeAssessment::Early => "early",
            AgeAssessment::OnTime => "on time",
            AgeAssessment::Late => "late",
        }
    }
}

/// A developmental event recorded against a puppy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique identifier for this record
    pub id: MilestoneId,
    /// Which puppy hit the milestone
    pub puppy_id: PuppyId,
    /// What kind of milestone
    pub kind: MilestoneKind,
    /// The day it was observed
    pub achieved_on: NaiveDate,
    /// Free-form notes
    pub notes: Option<String>,
    /// When this record was created
    pub recorded_at: DateTime<Utc>,
}

impl Milestone {
    /// Create a new milestone record with validation
    pub fn new(
        puppy_id: PuppyId,
        kind: MilestoneKind,
        achieved_on: NaiveDate,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        let today = Utc::now().naive_utc().date();
        crate::domain::validate_not_future(achieved_on, today, "Milestone date")?;
        crate::domain::validate_notes(&notes, 500)?;

        Ok(Self {
            id: MilestoneId::new(),
            puppy_id,
            kind,
            achieved_on,
            notes,
            recorded_at: Utc::now(),
        })
    }

    /// Create a milestone from existing data (used when loading from database)
    pub fn from_existing(
        id: MilestoneId,
        puppy_id: PuppyId,
        kind: MilestoneKind,
        achieved_on: NaiveDate,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            puppy_id,
            kind,
            achieved_on,
            notes,
            recorded_at,
        }
    }

    /// Age in days at which the milestone was hit
    ///
    /// Returns None when the achievement predates the given birth date,
    /// which means one of the two dates is wrong.
    pub fn age_at_achievement(&self, birth_date: NaiveDate) -> Option<u32> {
        let days = (self.achieved_on - birth_date).num_days();
        if days < 0 {
            None
        } else {
            Some(days as u32)
        }
    }

    /// Assess the timing against the kind's expected age range
    ///
    /// Returns None for custom milestones (no range) or when the age can't
    /// be computed.
    pub fn age_assessment(&self, birth_date: NaiveDate) -> Option<AgeAssessment> {
        let (min_days, max_days) = self.kind.expected_age_range()?;
        let age = self.age_at_achievement(birth_date)?;

        Some(if age < min_days {
            AgeAssessment::Early
        } else if age > max_days {
            AgeAssessment::Late
        } else {
            AgeAssessment::OnTime
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn milestone_at_age(kind: MilestoneKind, age_days: i64) -> (Milestone, NaiveDate) {
        let today = Utc::now().naive_utc().date();
        let achieved_on = today - Duration::days(7);
        let birth_date = achieved_on - Duration::days(age_days);
        let milestone = Milestone::new(PuppyId::new(), kind, achieved_on, None).unwrap();
        (milestone, birth_date)
    }

    #[test]
    fn test_on_time_assessment() {
        let (milestone, birth) = milestone_at_age(MilestoneKind::EyesOpen, 12);
        assert_eq!(milestone.age_at_achievement(birth), Some(12));
        assert_eq!(milestone.age_assessment(birth), Some(AgeAssessment::OnTime));
    }

    #[test]
    fn test_early_and_late_assessment() {
        let (early, birth) = milestone_at_age(MilestoneKind::EyesOpen, 7);
        assert_eq!(early.age_assessment(birth), Some(AgeAssessment::Early));

        let (late, birth) = milestone_at_age(MilestoneKind::EyesOpen, 20);
        assert_eq!(late.age_assessment(birth), Some(AgeAssessment::Late));
    }

    #[test]
    fn test_custom_kind_has_no_assessment() {
        let (milestone, birth) =
            milestone_at_age(MilestoneKind::Custom("first swim".to_string()), 30);
        assert_eq!(milestone.age_assessment(birth), None);
    }

    #[test]
    fn test_achievement_before_birth() {
        let (milestone, _) = milestone_at_age(MilestoneKind::EyesOpen, 12);
        let birth_after = milestone.achieved_on + Duration::days(1);
        assert_eq!(milestone.age_at_achievement(birth_after), None);
        assert_eq!(milestone.age_assessment(birth_after), None);
    }
}
