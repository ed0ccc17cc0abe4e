use crate::errors::CoreError;
use crate::models::itinerary::{Activity, ActivityMove, ItinerarySnapshot};

/// Pure reorder permutations over itinerary snapshots.
///
/// Every method takes the current snapshot by reference and returns a
/// new one; nothing here touches the network. The facade swaps the
/// returned snapshot in optimistically and runs the confirm/reconcile
/// steps around it.
pub struct ItineraryService;

impl ItineraryService {
    pub fn new() -> Self {
        Self
    }

    /// Clamp a 1-based day target position to `[1, day_count]`.
    pub fn clamp_day_target(&self, snapshot: &ItinerarySnapshot, target_position: u32) -> u32 {
        let len = snapshot.days.len().max(1) as u32;
        target_position.clamp(1, len)
    }

    /// Move a day to a 1-based target position.
    ///
    /// The returned snapshot carries provisional `day_number`s (1..n in
    /// the new order); they are authoritative only after the backend
    /// confirms the move and the list is re-fetched.
    pub fn apply_day_move(
        &self,
        snapshot: &ItinerarySnapshot,
        day_id: i64,
        target_position: u32,
    ) -> Result<ItinerarySnapshot, CoreError> {
        let from = snapshot
            .day_index(day_id)
            .ok_or(CoreError::DayNotFound(day_id))?;
        let target = self.clamp_day_target(snapshot, target_position) as usize;

        let mut days = snapshot.days.clone();
        let moved = days.remove(from);
        days.insert(target - 1, moved);

        for (idx, day) in days.iter_mut().enumerate() {
            day.day_number = Some(idx as u32 + 1);
        }

        Ok(ItinerarySnapshot::new(days, snapshot.general.clone()))
    }

    /// Move an activity within a bucket or across buckets (a day's
    /// schedule, or the general bucket for `None`).
    ///
    /// The activity is spliced out of its source list and inserted into
    /// the destination at the drop index (clamped to the list length);
    /// all other activities keep their relative order.
    pub fn apply_activity_move(
        &self,
        snapshot: &ItinerarySnapshot,
        mv: &ActivityMove,
    ) -> Result<ItinerarySnapshot, CoreError> {
        let mut next = snapshot.clone();

        let mut activity = {
            let source = bucket_mut(&mut next, mv.source_day)?;
            let idx = source
                .iter()
                .position(|a| a.id == mv.activity_id)
                .ok_or(CoreError::ActivityNotFound(mv.activity_id))?;
            source.remove(idx)
        };
        activity.day_id = mv.dest_day;

        let dest = bucket_mut(&mut next, mv.dest_day)?;
        let at = mv.dest_index.min(dest.len());
        dest.insert(at, activity);

        Ok(next)
    }

    /// Whether a move changes buckets. Same-bucket moves are visual-only:
    /// the backend does not model intra-day order, so there is nothing
    /// to confirm.
    pub fn is_cross_bucket(&self, mv: &ActivityMove) -> bool {
        mv.source_day != mv.dest_day
    }
}

impl Default for ItineraryService {
    fn default() -> Self {
        Self::new()
    }
}

fn bucket_mut(
    snapshot: &mut ItinerarySnapshot,
    day_id: Option<i64>,
) -> Result<&mut Vec<Activity>, CoreError> {
    match day_id {
        Some(id) => snapshot
            .days
            .iter_mut()
            .find(|d| d.id == id)
            .map(|d| &mut d.activities)
            .ok_or(CoreError::DayNotFound(id)),
        None => Ok(&mut snapshot.general),
    }
}
