use std::collections::HashMap;

use crate::backend::traits::TripBackend;
use crate::errors::CoreError;
use crate::models::itinerary::ItinerarySnapshot;

/// Per-trip cache of the current itinerary snapshot.
///
/// The snapshot is one owned value. A reorder builds a new snapshot and
/// `swap`s it in with a single assignment — the cached value is never
/// mutated in place, so readers only ever observe a fully applied order.
#[derive(Debug, Default)]
pub struct ItineraryStore {
    snapshots: HashMap<i64, ItinerarySnapshot>,
}

impl ItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot for a trip, fetching on cache miss.
    pub async fn snapshot(
        &mut self,
        backend: &dyn TripBackend,
        trip_id: i64,
    ) -> Result<ItinerarySnapshot, CoreError> {
        if !self.snapshots.contains_key(&trip_id) {
            let fetched = Self::fetch(backend, trip_id).await?;
            self.snapshots.insert(trip_id, fetched);
        }
        Ok(self.snapshots[&trip_id].clone())
    }

    /// Discard whatever is cached and re-fetch the authoritative lists.
    pub async fn refresh(
        &mut self,
        backend: &dyn TripBackend,
        trip_id: i64,
    ) -> Result<ItinerarySnapshot, CoreError> {
        let fetched = Self::fetch(backend, trip_id).await?;
        self.snapshots.insert(trip_id, fetched.clone());
        Ok(fetched)
    }

    /// Install a new snapshot (optimistic or authoritative) atomically.
    pub fn swap(&mut self, trip_id: i64, snapshot: ItinerarySnapshot) {
        self.snapshots.insert(trip_id, snapshot);
    }

    /// The last snapshot installed for a trip, if any.
    pub fn last_known(&self, trip_id: i64) -> Option<&ItinerarySnapshot> {
        self.snapshots.get(&trip_id)
    }

    pub fn invalidate(&mut self, trip_id: i64) {
        self.snapshots.remove(&trip_id);
    }

    async fn fetch(
        backend: &dyn TripBackend,
        trip_id: i64,
    ) -> Result<ItinerarySnapshot, CoreError> {
        let days = backend.list_days(trip_id).await?;
        let general = backend
            .list_general_activities(trip_id)
            .await?
            .into_iter()
            // The general endpoint may echo day-assigned activities too;
            // the general bucket holds only unassigned ones.
            .filter(|a| a.day_id.is_none())
            .collect();
        Ok(ItinerarySnapshot::new(days, general))
    }
}
