use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::expense::{Expense, NewExpense};
use crate::models::itinerary::{Activity, ActivityPatch, Day, NewActivity};
use crate::models::traveler::{NewTraveler, Traveler};
use crate::models::trip::{NewTrip, Trip};

/// The single seam to the remote trip/expense backend.
///
/// Everything that leaves the process goes through this trait, so the
/// stores and the reorder reconciler can be exercised against an
/// in-memory fake. [`RestBackend`](super::rest::RestBackend) is the
/// production implementation.
///
/// All persistence, token issuance and business validation live on the
/// server side of this trait; the client treats its own state as
/// provisional until a fresh list is fetched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TripBackend: Send + Sync {
    // ── Trips ───────────────────────────────────────────────────────

    async fn list_trips(&self) -> Result<Vec<Trip>, CoreError>;

    async fn get_trip(&self, trip_id: i64) -> Result<Trip, CoreError>;

    async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, CoreError>;

    // ── Expenses ────────────────────────────────────────────────────

    async fn list_expenses(&self, trip_id: i64) -> Result<Vec<Expense>, CoreError>;

    async fn create_expense(
        &self,
        trip_id: i64,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError>;

    async fn update_expense(
        &self,
        trip_id: i64,
        expense_id: i64,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError>;

    async fn delete_expense(&self, trip_id: i64, expense_id: i64) -> Result<(), CoreError>;

    /// Settlement suggestions the server precomputed, as expense-shaped
    /// records pending confirmation.
    async fn list_refund_suggestions(&self, trip_id: i64) -> Result<Vec<Expense>, CoreError>;

    // ── Travelers ───────────────────────────────────────────────────

    /// All travelers visible to the caller, across trips. Callers filter
    /// by trip id (that is the wire contract, not an oversight here).
    async fn list_travelers(&self) -> Result<Vec<Traveler>, CoreError>;

    async fn add_traveler(&self, traveler: &NewTraveler) -> Result<Traveler, CoreError>;

    // ── Itinerary ───────────────────────────────────────────────────

    /// Ordered day list, each with its nested activities.
    async fn list_days(&self, trip_id: i64) -> Result<Vec<Day>, CoreError>;

    async fn create_day(&self, trip_id: i64, day_number: u32) -> Result<Day, CoreError>;

    /// Activities not attached to any day (the "general" bucket).
    async fn list_general_activities(&self, trip_id: i64) -> Result<Vec<Activity>, CoreError>;

    async fn create_activity(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity: &NewActivity,
    ) -> Result<Activity, CoreError>;

    async fn update_activity(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
        patch: &ActivityPatch,
    ) -> Result<Activity, CoreError>;

    async fn delete_activity(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
    ) -> Result<(), CoreError>;

    async fn set_activity_completed(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
        completed: bool,
    ) -> Result<Activity, CoreError>;

    /// Move a day to a 1-based position. The server renumbers the whole
    /// sequence; the client must re-fetch to learn the result.
    async fn move_day(
        &self,
        trip_id: i64,
        day_id: i64,
        new_day_number: u32,
    ) -> Result<(), CoreError>;

    /// Move an activity to another day, or to/from the general bucket
    /// (`None`). Only the bucket is persisted, not a position within it.
    async fn move_activity(
        &self,
        trip_id: i64,
        source_day: Option<i64>,
        activity_id: i64,
        target_day: Option<i64>,
    ) -> Result<(), CoreError>;
}
