/// Core types and enums used throughout the domain layer
///
/// This module defines the typed identifiers and shared enums (Sex, DogRole,
/// PuppyStatus, WaitlistStatus, CareAction, MilestoneKind) that are used by
/// the kennel entities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declare a UUID-backed identifier type
///
/// Every entity gets its own id newtype so you can't accidentally pass a
/// customer id where a dog id is expected.
macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an id from a string (useful for database loading)
            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a dog
    DogId
);
entity_id!(
    /// Unique identifier for a litter
    LitterId
);
entity_id!(
    /// Unique identifier for a puppy
    PuppyId
);
entity_id!(
    /// Unique identifier for a customer
    CustomerId
);
entity_id!(
    /// Unique identifier for a waitlist entry
    WaitlistEntryId
);
entity_id!(
    /// Unique identifier for a care log record
    CareLogId
);
entity_id!(
    /// Unique identifier for a puppy milestone record
    MilestoneId
);
entity_id!(
    /// Unique identifier for a heat cycle record
    HeatCycleId
);
entity_id!(
    /// Unique identifier for a vaccination record
    VaccinationId
);

/// Biological sex of a dog or puppy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Parse a sex from user input ("female"/"f" or "male"/"m")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "female" | "f" => Some(Sex::Female),
            "male" | "m" => Some(Sex::Male),
            _ => None,
        }
    }

    /// Get the display name for this sex
    pub fn display_name(&self) -> &str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

/// What role an adult dog plays in the kennel program
///
/// Breeding dogs show up in heat-cycle reports; retired and companion dogs
/// keep their history but are excluded from reproductive planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DogRole {
    /// Actively part of the breeding program
    Breeding,
    /// Formerly breeding, now retired
    Retired,
    /// Pet or guardian-home dog, never bred
    Companion,
}

impl DogRole {
    /// Parse a role from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breeding" => Some(DogRole::Breeding),
            "retired" => Some(DogRole::Retired),
            "companion" => Some(DogRole::Companion),
            _ => None,
        }
    }

    /// Get the display name for this role
    pub fn display_name(&self) -> &str {
        match self {
            DogRole::Breeding => "breeding",
            DogRole::Retired => "retired",
            DogRole::Companion => "companion",
        }
    }
}

/// Placement status of a puppy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuppyStatus {
    /// Not yet spoken for
    Available,
    /// Held for a specific customer
    Reserved,
    /// Gone home with its new family
    Placed,
}

impl PuppyStatus {
    /// Parse a status from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(PuppyStatus::Available),
            "reserved" => Some(PuppyStatus::Reserved),
            "placed" => Some(PuppyStatus::Placed),
            _ => None,
        }
    }

    /// Get the display name for this status
    pub fn display_name(&self) -> &str {
        match self {
            PuppyStatus::Available => "available",
            PuppyStatus::Reserved => "reserved",
            PuppyStatus::Placed => "placed",
        }
    }
}

/// Where a customer stands on the waitlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitlistStatus {
    /// In the queue, waiting for an offer
    Waiting,
    /// A puppy has been offered, awaiting an answer
    Offered,
    /// Offer accepted, matched to a puppy
    Accepted,
    /// Withdrew or was removed from the list
    Removed,
}

impl WaitlistStatus {
    /// Parse a status from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "waiting" => Some(WaitlistStatus::Waiting),
            "offered" => Some(WaitlistStatus::Offered),
            "accepted" => Some(WaitlistStatus::Accepted),
            "removed" => Some(WaitlistStatus::Removed),
            _ => None,
        }
    }

    /// Get the display name for this status
    pub fn display_name(&self) -> &str {
        match self {
            WaitlistStatus::Waiting => "waiting",
            WaitlistStatus::Offered => "offered",
            WaitlistStatus::Accepted => "accepted",
            WaitlistStatus::Removed => "removed",
        }
    }
}

/// Kinds of daily-care actions that can be logged for a dog
///
/// These cover the routine chores of a kennel day. Anything that doesn't fit
/// can be logged as a custom action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CareAction {
    /// A meal or bottle feeding
    Feeding,
    /// A potty/toilet break
    PottyBreak,
    /// Medication given (dewormer, antibiotics, etc.)
    Medication,
    /// Brushing, bathing, nail trims
    Grooming,
    /// A walk, play session, or other exercise
    Exercise,
    /// A weight measurement
    WeightCheck,
    /// User-defined action with a custom name
    Custom(String),
}

impl CareAction {
    /// Parse an action from user input
    ///
    /// Custom actions are written as "custom:name".
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "feeding" => Some(CareAction::Feeding),
            "potty_break" | "potty" => Some(CareAction::PottyBreak),
            "medication" => Some(CareAction::Medication),
            "grooming" => Some(CareAction::Grooming),
            "exercise" => Some(CareAction::Exercise),
            "weight_check" | "weight" => Some(CareAction::WeightCheck),
            custom if custom.starts_with("custom:") => {
                let name = trimmed[7..].trim();
                if name.is_empty() {
                    None
                } else {
                    Some(CareAction::Custom(name.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Get the display name for this action
    pub fn display_name(&self) -> &str {
        match self {
            CareAction::Feeding => "feeding",
            CareAction::PottyBreak => "potty_break",
            CareAction::Medication => "medication",
            CareAction::Grooming => "grooming",
            CareAction::Exercise => "exercise",
            CareAction::WeightCheck => "weight_check",
            CareAction::Custom(name) => name,
        }
    }
}

/// Developmental milestones tracked for puppies
///
/// Each predefined kind carries an expected age range (in days from birth)
/// so a recorded achievement can be assessed as early, on time, or late.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneKind {
    /// Eyes fully open
    EyesOpen,
    /// Ear canals open, responds to sound
    EarsOpen,
    /// First steady walk
    FirstWalk,
    /// First bark or vocal play
    FirstBark,
    /// Fully weaned off the dam
    Weaned,
    /// First vaccination given
    FirstVaccine,
    /// User-defined milestone with a custom name
    Custom(String),
}

impl MilestoneKind {
    /// Expected age range in days from birth, if this kind has one
    ///
    /// Custom milestones have no predefined range.
    pub fn expected_age_range(&self) -> Option<(u32, u32)> {
        match self {
            MilestoneKind::EyesOpen => Some((10, 16)),
            MilestoneKind::EarsOpen => Some((14, 21)),
            MilestoneKind::FirstWalk => Some((21, 28)),
            MilestoneKind::FirstBark => Some((21, 35)),
            MilestoneKind::Weaned => Some((42, 56)),
            MilestoneKind::FirstVaccine => Some((42, 56)),
            MilestoneKind::Custom(_) => None,
        }
    }

    /// Parse a milestone kind from user input
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "eyes_open" => Some(MilestoneKind::EyesOpen),
            "ears_open" => Some(MilestoneKind::EarsOpen),
            "first_walk" => Some(MilestoneKind::FirstWalk),
            "first_bark" => Some(MilestoneKind::FirstBark),
            "weaned" => Some(MilestoneKind::Weaned),
            "first_vaccine" => Some(MilestoneKind::FirstVaccine),
            custom if custom.starts_with("custom:") => {
                let name = trimmed[7..].trim();
                if name.is_empty() {
                    None
                } else {
                    Some(MilestoneKind::Custom(name.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Get the display name for this milestone kind
    pub fn display_name(&self) -> &str {
        match self {
            MilestoneKind::EyesOpen => "eyes_open",
            MilestoneKind::EarsOpen => "ears_open",
            MilestoneKind::FirstWalk => "first_walk",
            MilestoneKind::FirstBark => "first_bark",
            MilestoneKind::Weaned => "weaned",
            MilestoneKind::FirstVaccine => "first_vaccine",
            MilestoneKind::Custom(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_parsing() {
        assert_eq!(Sex::parse("female"), Some(Sex::Female));
        assert_eq!(Sex::parse("M"), Some(Sex::Male));
        assert_eq!(Sex::parse("spayed"), None);
    }

    #[test]
    fn test_care_action_custom() {
        let action = CareAction::parse("custom:crate training").unwrap();
        assert_eq!(action, CareAction::Custom("crate training".to_string()));
        assert!(CareAction::parse("custom:  ").is_none());
    }

    #[test]
    fn test_milestone_expected_ranges() {
        assert_eq!(MilestoneKind::EyesOpen.expected_age_range(), Some((10, 16)));
        assert_eq!(
            MilestoneKind::Custom("first swim".to_string()).expected_age_range(),
            None
        );
    }

    #[test]
    fn test_id_round_trip() {
        let id = DogId::new();
        let parsed = DogId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
