use crate::backend::traits::TripBackend;
use crate::errors::CoreError;
use crate::models::traveler::Traveler;

/// Cache of the traveler list.
///
/// The backend serves one flat list across trips; trip rosters are
/// filtered out of it client-side (that is the wire contract).
#[derive(Debug, Default)]
pub struct TravelerStore {
    cache: Option<Vec<Traveler>>,
}

impl TravelerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every traveler visible to the caller, fetching on cache miss.
    pub async fn all(&mut self, backend: &dyn TripBackend) -> Result<Vec<Traveler>, CoreError> {
        if self.cache.is_none() {
            self.cache = Some(backend.list_travelers().await?);
        }
        Ok(self.cache.clone().unwrap_or_default())
    }

    /// The roster of one trip.
    pub async fn roster(
        &mut self,
        backend: &dyn TripBackend,
        trip_id: i64,
    ) -> Result<Vec<Traveler>, CoreError> {
        let all = self.all(backend).await?;
        Ok(all
            .into_iter()
            .filter(|t| t.trip_id == Some(trip_id))
            .collect())
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}
