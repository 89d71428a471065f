/// Heat cycle tracking and projection
///
/// This module defines the HeatCycle record (one observed heat per row) and
/// the pure date math that projects the next heat, the current stage, the
/// fertile window and vaccination conflicts from a single last-heat date.
/// Everything here is a derivation over stored dates; no I/O, no mutation.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DogId, DomainError, HeatCycleId};

/// How long a heat typically lasts, in days
pub const HEAT_DURATION_DAYS: i64 = 21;

/// Average gap between heat starts when no per-dog override is recorded
/// (canine cycles run roughly every six months)
pub const DEFAULT_CYCLE_LENGTH_DAYS: u16 = 180;

/// How many days before a projected heat the advisory pre-heat window opens
pub const PRE_HEAT_WINDOW_DAYS: i64 = 30;

/// Day offset at which proestrus gives way to estrus
const ESTRUS_START_DAY: i64 = 9;

/// Day offset at which estrus gives way to diestrus
const DIESTRUS_START_DAY: i64 = 13;

/// First recommended breeding day within estrus
const BREEDING_START_DAY: i64 = 10;

/// A vaccination due within this many days before a projected heat conflicts
const VACCINE_CONFLICT_BEFORE_DAYS: i64 = 14;

/// A vaccination due within this many days after a projected heat conflicts
const VACCINE_CONFLICT_AFTER_DAYS: i64 = 21;

/// One observed heat for a female dog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCycle {
    /// Unique identifier for this record
    pub id: HeatCycleId,
    /// Which dog this heat belongs to
    pub dog_id: DogId,
    /// The day the heat started
    pub started_on: NaiveDate,
    /// The day it visibly ended, once known
    pub ended_on: Option<NaiveDate>,
    /// Per-dog override for the average days between heat starts
    pub cycle_length_days: Option<u16>,
    /// Free-form notes (discharge, behavior, vet observations)
    pub notes: Option<String>,
    /// When this record was created
    pub recorded_at: DateTime<Utc>,
}

impl HeatCycle {
    /// Create a new heat record with validation
    pub fn new(
        dog_id: DogId,
        started_on: NaiveDate,
        cycle_length_days: Option<u16>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        let today = Utc::now().naive_utc().date();
        crate::domain::validate_not_future(started_on, today, "Heat start date")?;
        Self::validate_cycle_length(&cycle_length_days)?;
        crate::domain::validate_notes(&notes, 500)?;

        Ok(Self {
            id: HeatCycleId::new(),
            dog_id,
            started_on,
            ended_on: None,
            cycle_length_days,
            notes,
            recorded_at: Utc::now(),
        })
    }

    /// Create a heat record from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HeatCycleId,
        dog_id: DogId,
        started_on: NaiveDate,
        ended_on: Option<NaiveDate>,
        cycle_length_days: Option<u16>,
        notes: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            dog_id,
            started_on,
            ended_on,
            cycle_length_days,
            notes,
            recorded_at,
        }
    }

    /// Close out the heat with its observed end date
    pub fn close(&mut self, ended_on: NaiveDate) -> Result<(), DomainError> {
        if ended_on < self.started_on {
            return Err(DomainError::InvalidDate(
                "Heat end date cannot precede its start date".to_string(),
            ));
        }
        self.ended_on = Some(ended_on);
        Ok(())
    }

    /// The effective cycle length for projection, falling back to the default
    pub fn effective_cycle_length(&self) -> u16 {
        self.cycle_length_days.unwrap_or(DEFAULT_CYCLE_LENGTH_DAYS)
    }

    /// The last day of the active heat window
    ///
    /// Uses the observed end date when recorded, otherwise day 20 of the
    /// standard 21-day duration.
    pub fn window_end(&self) -> NaiveDate {
        self.ended_on
            .unwrap_or(self.started_on + Duration::days(HEAT_DURATION_DAYS - 1))
    }

    // Validation helper methods

    /// Cycle length overrides must stay in a plausible canine range
    fn validate_cycle_length(cycle_length_days: &Option<u16>) -> Result<(), DomainError> {
        if let Some(days) = cycle_length_days {
            if *days < 90 || *days > 365 {
                return Err(DomainError::InvalidValue {
                    message: format!(
                        "Cycle length must be between 90 and 365 days, got {}",
                        days
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Stage of the canine reproductive cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeatStage {
    /// Days 0-8 from heat start: swelling and discharge, not yet fertile
    Proestrus,
    /// Days 9-12: the fertile stage
    Estrus,
    /// Days 13-20: winding down
    Diestrus,
    /// Between heats
    Anestrus,
}

impl HeatStage {
    /// Get the display name for this stage
    pub fn display_name(&self) -> &str {
        match self {
            HeatStage::Proestrus => "proestrus",
            HeatStage::Estrus => "estrus",
            HeatStage::Diestrus => "diestrus",
            HeatStage::Anestrus => "anestrus",
        }
    }

    /// Whether this stage is the fertile part of the cycle
    pub fn is_fertile(&self) -> bool {
        matches!(self, HeatStage::Estrus)
    }
}

/// An inclusive range of days, used for fertile and breeding windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Whether a date falls inside the window (inclusive on both ends)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Everything that can be derived from one last-heat date
///
/// Produced by [`HeatProjection::project`]; all fields are pure functions of
/// the inputs so the same inputs always yield the same projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatProjection {
    /// The heat start the projection is anchored on
    pub last_heat_on: NaiveDate,
    /// Days between heat starts used for the projection
    pub cycle_length_days: u16,
    /// Projected start of the next heat
    pub next_heat_on: NaiveDate,
    /// Day offset into the current heat, when inside the active window
    pub day_of_heat: Option<i64>,
    /// Whether "today" falls inside the active heat window
    pub in_heat: bool,
    /// Whether "today" falls in the pre-heat advisory window
    pub in_pre_heat: bool,
    /// Current stage of the cycle
    pub stage: HeatStage,
    /// Fertile window of the current (or most recent) heat
    pub fertile_window: DateWindow,
    /// Recommended breeding sub-range within the fertile window
    pub breeding_window: DateWindow,
}

impl HeatProjection {
    /// Project the cycle from a last-heat date
    ///
    /// `today` is passed explicitly so the projection is deterministic and
    /// testable. `ended_on`, when recorded, truncates the active window
    /// early.
    pub fn project(
        last_heat_on: NaiveDate,
        ended_on: Option<NaiveDate>,
        cycle_length_days: Option<u16>,
        today: NaiveDate,
    ) -> Self {
        let cycle_len = cycle_length_days.unwrap_or(DEFAULT_CYCLE_LENGTH_DAYS);
        let next_heat_on = next_heat_start(last_heat_on, cycle_len);

        let day_offset = (today - last_heat_on).num_days();

        // A recorded end date is the last day of heat. Without one the
        // projected window covers day 0 through day 20.
        let in_heat = match ended_on {
            Some(end) => last_heat_on <= today && today <= end,
            None => (0..HEAT_DURATION_DAYS).contains(&day_offset),
        };

        let day_of_heat = if in_heat { Some(day_offset) } else { None };

        // An observed heat running past day 20 stays in diestrus until it ends
        let stage = if in_heat {
            stage_for_day(day_offset.min(HEAT_DURATION_DAYS - 1))
        } else {
            HeatStage::Anestrus
        };

        let pre_heat_opens = next_heat_on - Duration::days(PRE_HEAT_WINDOW_DAYS);
        let in_pre_heat = !in_heat && pre_heat_opens <= today && today <= next_heat_on;

        Self {
            last_heat_on,
            cycle_length_days: cycle_len,
            next_heat_on,
            day_of_heat,
            in_heat,
            in_pre_heat,
            stage,
            fertile_window: fertile_window(last_heat_on),
            breeding_window: breeding_window(last_heat_on),
        }
    }
}

/// Projected start of the next heat: last start plus the average cycle length
pub fn next_heat_start(last_heat_on: NaiveDate, cycle_length_days: u16) -> NaiveDate {
    last_heat_on + Duration::days(cycle_length_days as i64)
}

/// Stage by day offset from heat start
///
/// Negative offsets (a heat recorded in the future should never reach here,
/// the domain layer rejects it) and offsets past the heat duration both map
/// to anestrus.
pub fn stage_for_day(day_offset: i64) -> HeatStage {
    if day_offset < 0 || day_offset >= HEAT_DURATION_DAYS {
        HeatStage::Anestrus
    } else if day_offset < ESTRUS_START_DAY {
        HeatStage::Proestrus
    } else if day_offset < DIESTRUS_START_DAY {
        HeatStage::Estrus
    } else {
        HeatStage::Diestrus
    }
}

/// The fertile window: the estrus days of the heat
pub fn fertile_window(last_heat_on: NaiveDate) -> DateWindow {
    DateWindow {
        start: last_heat_on + Duration::days(ESTRUS_START_DAY),
        end: last_heat_on + Duration::days(DIESTRUS_START_DAY - 1),
    }
}

/// The recommended breeding sub-range within the fertile window
pub fn breeding_window(last_heat_on: NaiveDate) -> DateWindow {
    DateWindow {
        start: last_heat_on + Duration::days(BREEDING_START_DAY),
        end: last_heat_on + Duration::days(DIESTRUS_START_DAY - 1),
    }
}

/// Whether a vaccination due date collides with a projected heat
///
/// A due date inside [next_heat - 14, next_heat + 21] is flagged: vaccines
/// should not be given in the run-up to or during a heat.
pub fn vaccination_conflict(next_heat_on: NaiveDate, due_on: NaiveDate) -> bool {
    let window = DateWindow {
        start: next_heat_on - Duration::days(VACCINE_CONFLICT_BEFORE_DAYS),
        end: next_heat_on + Duration::days(VACCINE_CONFLICT_AFTER_DAYS),
    };
    window.contains(due_on)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_heat_start_default_cycle() {
        let last = date(2026, 1, 1);
        assert_eq!(
            next_heat_start(last, DEFAULT_CYCLE_LENGTH_DAYS),
            date(2026, 6, 30)
        );
    }

    #[test]
    fn test_stage_thresholds() {
        assert_eq!(stage_for_day(0), HeatStage::Proestrus);
        assert_eq!(stage_for_day(8), HeatStage::Proestrus);
        assert_eq!(stage_for_day(9), HeatStage::Estrus);
        assert_eq!(stage_for_day(12), HeatStage::Estrus);
        assert_eq!(stage_for_day(13), HeatStage::Diestrus);
        assert_eq!(stage_for_day(20), HeatStage::Diestrus);
        assert_eq!(stage_for_day(21), HeatStage::Anestrus);
        assert_eq!(stage_for_day(-1), HeatStage::Anestrus);
    }

    #[test]
    fn test_projection_inside_heat() {
        let last = date(2026, 3, 1);
        let projection = HeatProjection::project(last, None, None, date(2026, 3, 11));

        assert!(projection.in_heat);
        assert!(!projection.in_pre_heat);
        assert_eq!(projection.day_of_heat, Some(10));
        assert_eq!(projection.stage, HeatStage::Estrus);
        assert!(projection.stage.is_fertile());
        assert!(projection.fertile_window.contains(date(2026, 3, 11)));
        assert!(projection.breeding_window.contains(date(2026, 3, 11)));
        // Day 9 is fertile but before the recommended breeding start
        assert!(projection.fertile_window.contains(date(2026, 3, 10)));
        assert!(!projection.breeding_window.contains(date(2026, 3, 10)));
    }

    #[test]
    fn test_projection_window_boundaries() {
        let last = date(2026, 3, 1);

        let on_start = HeatProjection::project(last, None, None, last);
        assert!(on_start.in_heat);
        assert_eq!(on_start.stage, HeatStage::Proestrus);

        // Day 20 is the last day of the default 21-day window
        let on_end = HeatProjection::project(last, None, None, date(2026, 3, 21));
        assert!(on_end.in_heat);
        assert_eq!(on_end.stage, HeatStage::Diestrus);

        let after = HeatProjection::project(last, None, None, date(2026, 3, 22));
        assert!(!after.in_heat);
        assert_eq!(after.stage, HeatStage::Anestrus);
    }

    #[test]
    fn test_recorded_end_truncates_window() {
        let last = date(2026, 3, 1);
        let ended = Some(date(2026, 3, 15));

        let projection = HeatProjection::project(last, ended, None, date(2026, 3, 18));
        assert!(!projection.in_heat);
        assert_eq!(projection.stage, HeatStage::Anestrus);
    }

    #[test]
    fn test_pre_heat_window() {
        let last = date(2026, 1, 1);
        let next = next_heat_start(last, DEFAULT_CYCLE_LENGTH_DAYS);

        let before_window = HeatProjection::project(
            last,
            None,
            None,
            next - Duration::days(PRE_HEAT_WINDOW_DAYS + 1),
        );
        assert!(!before_window.in_pre_heat);

        let inside = HeatProjection::project(last, None, None, next - Duration::days(10));
        assert!(inside.in_pre_heat);
        assert!(!inside.in_heat);

        let on_projected_day = HeatProjection::project(last, None, None, next);
        assert!(on_projected_day.in_pre_heat);
    }

    #[test]
    fn test_custom_cycle_length() {
        let last = date(2026, 1, 1);
        let projection = HeatProjection::project(last, None, Some(200), date(2026, 2, 1));
        assert_eq!(projection.cycle_length_days, 200);
        assert_eq!(projection.next_heat_on, last + Duration::days(200));
    }

    #[test]
    fn test_vaccination_conflict_window() {
        let next = date(2026, 6, 30);

        assert!(vaccination_conflict(next, next));
        assert!(vaccination_conflict(next, next - Duration::days(14)));
        assert!(vaccination_conflict(next, next + Duration::days(21)));
        assert!(!vaccination_conflict(next, next - Duration::days(15)));
        assert!(!vaccination_conflict(next, next + Duration::days(22)));
    }

    #[test]
    fn test_heat_cycle_close_and_window_end() {
        let mut cycle = HeatCycle::new(
            DogId::new(),
            Utc::now().naive_utc().date() - Duration::days(10),
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            cycle.window_end(),
            cycle.started_on + Duration::days(HEAT_DURATION_DAYS - 1)
        );

        let ended = cycle.started_on + Duration::days(5);
        cycle.close(ended).unwrap();
        assert_eq!(cycle.window_end(), ended);

        let mut other = cycle.clone();
        assert!(other.close(cycle.started_on - Duration::days(1)).is_err());
    }

    #[test]
    fn test_cycle_length_validation() {
        let started = Utc::now().naive_utc().date() - Duration::days(1);
        assert!(HeatCycle::new(DogId::new(), started, Some(60), None).is_err());
        assert!(HeatCycle::new(DogId::new(), started, Some(400), None).is_err());
        assert!(HeatCycle::new(DogId::new(), started, Some(180), None).is_ok());
    }
}
