//! Activity domain model.
//!
//! # Responsibility
//! - Define one recorded exercise session and its nested routines/sets.
//! - Separate client input (`ActivityDraft`) from stored records
//!   (`Activity`): identifiers are always server-assigned.
//!
//! # Invariants
//! - `activity_id` is stable and never reused for another activity.
//! - An activity is never mutated in place; it is appended and removed whole.
//! - Draft validation runs before any aggregate mutation (all-or-nothing).

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one recorded activity.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ActivityId = Uuid;

/// Magnitude of one weighted set.
///
/// The wire format carries weights both as JSON numbers and as strings
/// (`20` and `"20"` are both accepted), so this stays a sum type instead of
/// forcing a lossy conversion at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Number(f64),
    Text(String),
}

/// One unit of weighted repetition within a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub weight: Weight,
}

/// One exercise type within an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    /// Exercise label, serialized as `type` to match the external schema.
    #[serde(rename = "type")]
    pub exercise: String,
    /// Repetition count. `u32` keeps negative counts unrepresentable.
    pub reps: u32,
    pub sets: Vec<Set>,
}

/// One recorded exercise session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Server-assigned stable id, serialized as `activityId`.
    #[serde(rename = "activityId")]
    pub activity_id: ActivityId,
    pub aerobic: bool,
    pub routines: Vec<Routine>,
}

/// Client input for one activity, before the server assigns an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub aerobic: bool,
    pub routines: Vec<Routine>,
}

/// Validation failure for an activity draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    /// A routine carries an empty exercise label.
    EmptyExerciseLabel { routine_index: usize },
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyExerciseLabel { routine_index } => write!(
                f,
                "routine {routine_index} has an empty exercise label"
            ),
        }
    }
}

impl Error for ActivityValidationError {}

impl ActivityDraft {
    /// Checks the draft before it is admitted into the aggregate.
    ///
    /// # Invariants
    /// - Runs before any mutation; a failing draft leaves the aggregate
    ///   untouched.
    /// - Only structural shape is checked; semantic rules (reps ranges,
    ///   plausible weights) are not this layer's concern.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        for (routine_index, routine) in self.routines.iter().enumerate() {
            if routine.exercise.trim().is_empty() {
                return Err(ActivityValidationError::EmptyExerciseLabel { routine_index });
            }
        }
        Ok(())
    }

    /// Promotes the draft to a stored activity with a fresh stable id.
    pub fn into_activity(self) -> Activity {
        Activity {
            activity_id: Uuid::new_v4(),
            aerobic: self.aerobic,
            routines: self.routines,
        }
    }
}
