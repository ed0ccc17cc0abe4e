use std::collections::HashMap;

use crate::backend::traits::TripBackend;
use crate::errors::CoreError;
use crate::models::expense::Expense;

/// Per-trip cache of expense records.
///
/// Reads go through the cache; every mutation elsewhere must
/// `invalidate` the trip so the next read is authoritative. The backend
/// is passed in per call so tests can hand an in-memory fake.
#[derive(Debug, Default)]
pub struct ExpenseStore {
    cache: HashMap<i64, Vec<Expense>>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All expenses of a trip, fetching on cache miss.
    pub async fn list(
        &mut self,
        backend: &dyn TripBackend,
        trip_id: i64,
    ) -> Result<Vec<Expense>, CoreError> {
        if !self.cache.contains_key(&trip_id) {
            let fetched = backend.list_expenses(trip_id).await?;
            self.cache.insert(trip_id, fetched);
        }
        Ok(self.cache[&trip_id].clone())
    }

    /// A single cached expense, if the trip has been fetched.
    pub fn get(&self, trip_id: i64, expense_id: i64) -> Option<&Expense> {
        self.cache
            .get(&trip_id)?
            .iter()
            .find(|e| e.id == Some(expense_id))
    }

    /// Drop the cached list for a trip.
    pub fn invalidate(&mut self, trip_id: i64) {
        self.cache.remove(&trip_id);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
