use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An activity on the itinerary. `day_id = None` means it lives in the
/// trip-wide "general" bucket, not scheduled on any particular day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,

    #[serde(rename = "travelId", default)]
    pub trip_id: Option<i64>,

    #[serde(rename = "travelDayId", default)]
    pub day_id: Option<i64>,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Time-of-day label as the backend stores it (e.g., "14:30").
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub completed: bool,
}

/// Payload for creating an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

impl NewActivity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            time: None,
        }
    }
}

/// Partial update for an activity. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// One day of a trip with its scheduled activities.
///
/// `day_number` is the 1-based position the server last reported. After a
/// local reorder it is provisional until the backend confirms the move and
/// the list is re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: i64,

    #[serde(rename = "travelId")]
    pub trip_id: i64,

    #[serde(default)]
    pub day_number: Option<u32>,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub activities: Vec<Activity>,
}

/// The itinerary as one owned, immutable value: the ordered day list plus
/// the unscheduled bucket. Reorders never mutate a snapshot in place —
/// they build a new one that is swapped in with a single assignment, so a
/// half-applied permutation is never visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItinerarySnapshot {
    pub days: Vec<Day>,
    pub general: Vec<Activity>,
}

impl ItinerarySnapshot {
    pub fn new(days: Vec<Day>, general: Vec<Activity>) -> Self {
        Self { days, general }
    }

    /// Position of a day in the ordered sequence.
    pub fn day_index(&self, day_id: i64) -> Option<usize> {
        self.days.iter().position(|d| d.id == day_id)
    }

    pub fn day(&self, day_id: i64) -> Option<&Day> {
        self.days.iter().find(|d| d.id == day_id)
    }

    /// The activity list of a bucket: a day's schedule, or the general
    /// bucket for `None`.
    pub fn bucket(&self, day_id: Option<i64>) -> Option<&[Activity]> {
        match day_id {
            Some(id) => self.day(id).map(|d| d.activities.as_slice()),
            None => Some(self.general.as_slice()),
        }
    }
}

/// A drag gesture moving an activity between (or within) buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityMove {
    pub activity_id: i64,
    /// Bucket the activity currently belongs to; `None` = general.
    pub source_day: Option<i64>,
    /// Bucket it was dropped into; `None` = general.
    pub dest_day: Option<i64>,
    /// Drop position within the destination bucket (clamped to its length).
    pub dest_index: usize,
}

/// Lifecycle of a single reorder gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderPhase {
    Idle,
    /// The local list shows the new order; the backend has not confirmed.
    OptimisticallyApplied,
    /// The backend confirmed and the authoritative list was re-fetched.
    Reconciled,
    /// The confirm failed; the optimistic order was discarded.
    RolledBack,
}

/// What a reorder gesture resolved to. Network failures during the
/// confirm step do not surface as `Err` — the reconciler always resolves
/// to either `Reconciled` or `RolledBack`, and the rendering layer turns
/// that into a brief notification.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Correlates the gesture across log lines.
    pub gesture: Uuid,
    /// Terminal phase: `Reconciled` or `RolledBack`.
    pub phase: ReorderPhase,
    /// Cause message when rolled back. Not meant for end users verbatim.
    pub failure: Option<String>,
    /// The itinerary now visible after the gesture resolved.
    pub snapshot: ItinerarySnapshot,
}

impl MoveOutcome {
    pub fn reconciled(gesture: Uuid, snapshot: ItinerarySnapshot) -> Self {
        Self {
            gesture,
            phase: ReorderPhase::Reconciled,
            failure: None,
            snapshot,
        }
    }

    pub fn rolled_back(
        gesture: Uuid,
        cause: impl Into<String>,
        snapshot: ItinerarySnapshot,
    ) -> Self {
        Self {
            gesture,
            phase: ReorderPhase::RolledBack,
            failure: Some(cause.into()),
            snapshot,
        }
    }

    pub fn is_reconciled(&self) -> bool {
        self.phase == ReorderPhase::Reconciled
    }
}
