pub mod backend;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;

use tracing::{info, warn};
use uuid::Uuid;

use backend::rest::RestBackend;
use backend::traits::TripBackend;
use errors::CoreError;
use models::expense::{Expense, NewExpense};
use models::itinerary::{
    Activity, ActivityMove, ActivityPatch, Day, ItinerarySnapshot, MoveOutcome, NewActivity,
};
use models::settlement::{Balance, SettlementTransaction};
use models::traveler::{NewTraveler, Traveler};
use models::trip::{NewTrip, Trip};
use services::itinerary_service::ItineraryService;
use services::settlement_service::{round2, SettlementService};
use store::expense_store::ExpenseStore;
use store::itinerary_store::ItineraryStore;
use store::traveler_store::TravelerStore;

/// Main entry point for the Wayplan core library.
///
/// Owns the backend connection, the per-entity caches and the two
/// computation engines (settlement, itinerary reordering). One instance
/// serves one signed-in user; the embedding UI calls it from its
/// single-threaded event loop.
///
/// Reorder gestures take `&mut self` for their whole lifetime, so a
/// second gesture cannot start while one is outstanding — the exclusive
/// borrow is the overlap guard.
#[must_use]
pub struct TripPlanner {
    backend: Box<dyn TripBackend>,
    expenses: ExpenseStore,
    travelers: TravelerStore,
    itinerary: ItineraryStore,
    settlement_service: SettlementService,
    itinerary_service: ItineraryService,
}

impl std::fmt::Debug for TripPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPlanner").finish_non_exhaustive()
    }
}

impl TripPlanner {
    /// Build a planner over any backend (tests pass an in-memory fake).
    pub fn new(backend: Box<dyn TripBackend>) -> Self {
        Self {
            backend,
            expenses: ExpenseStore::new(),
            travelers: TravelerStore::new(),
            itinerary: ItineraryStore::new(),
            settlement_service: SettlementService::new(),
            itinerary_service: ItineraryService::new(),
        }
    }

    /// Build a planner over the REST backend with a bearer token.
    pub fn connect(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::new(Box::new(
            RestBackend::new(base_url).with_bearer_token(bearer_token),
        ))
    }

    // ── Trips ───────────────────────────────────────────────────────

    pub async fn trips(&self) -> Result<Vec<Trip>, CoreError> {
        self.backend.list_trips().await
    }

    pub async fn trip(&self, trip_id: i64) -> Result<Trip, CoreError> {
        self.backend.get_trip(trip_id).await
    }

    pub async fn add_trip(&self, trip: NewTrip) -> Result<Trip, CoreError> {
        self.backend.create_trip(&trip).await
    }

    // ── Travelers ───────────────────────────────────────────────────

    /// The roster of a trip (cached until a traveler is added).
    pub async fn travelers(&mut self, trip_id: i64) -> Result<Vec<Traveler>, CoreError> {
        self.travelers.roster(self.backend.as_ref(), trip_id).await
    }

    pub async fn add_traveler(&mut self, traveler: NewTraveler) -> Result<Traveler, CoreError> {
        let created = self.backend.add_traveler(&traveler).await?;
        self.travelers.invalidate();
        Ok(created)
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// All cost and refund records of a trip (cached until mutated).
    pub async fn expenses(&mut self, trip_id: i64) -> Result<Vec<Expense>, CoreError> {
        self.expenses.list(self.backend.as_ref(), trip_id).await
    }

    /// Validate and create an expense, then drop the cached list so the
    /// next read is authoritative.
    pub async fn add_expense(
        &mut self,
        trip_id: i64,
        expense: NewExpense,
    ) -> Result<Expense, CoreError> {
        expense.validate()?;
        let created = self.backend.create_expense(trip_id, &expense).await?;
        self.expenses.invalidate(trip_id);
        Ok(created)
    }

    pub async fn update_expense(
        &mut self,
        trip_id: i64,
        expense_id: i64,
        expense: NewExpense,
    ) -> Result<Expense, CoreError> {
        expense.validate()?;
        let updated = self
            .backend
            .update_expense(trip_id, expense_id, &expense)
            .await?;
        self.expenses.invalidate(trip_id);
        Ok(updated)
    }

    pub async fn remove_expense(&mut self, trip_id: i64, expense_id: i64) -> Result<(), CoreError> {
        self.backend.delete_expense(trip_id, expense_id).await?;
        self.expenses.invalidate(trip_id);
        Ok(())
    }

    // ── Settlement ──────────────────────────────────────────────────

    /// Net balance per participant: positive = owed money, negative =
    /// owes money. Computed fresh from the full expense list.
    pub async fn balances(&mut self, trip_id: i64) -> Result<Vec<Balance>, CoreError> {
        let expenses = self.expenses.list(self.backend.as_ref(), trip_id).await?;
        let roster = self.travelers.roster(self.backend.as_ref(), trip_id).await?;
        self.settlement_service.compute_balances(&expenses, &roster)
    }

    /// The client-computed settlement plan — the canonical reference
    /// implementation of the greedy algorithm.
    pub async fn settlement_transactions(
        &mut self,
        trip_id: i64,
    ) -> Result<Vec<SettlementTransaction>, CoreError> {
        let expenses = self.expenses.list(self.backend.as_ref(), trip_id).await?;
        let roster = self.travelers.roster(self.backend.as_ref(), trip_id).await?;
        self.settlement_service
            .compute_transactions(&expenses, &roster)
    }

    /// Settlement suggestions, preferring the server's precomputed list
    /// and falling back to the local algorithm when the server cannot
    /// serve one. Both paths yield the same plan for a conforming server.
    pub async fn refund_suggestions(
        &mut self,
        trip_id: i64,
    ) -> Result<Vec<SettlementTransaction>, CoreError> {
        let server = self.backend.list_refund_suggestions(trip_id).await;
        match server {
            Ok(records) => Ok(records
                .iter()
                .flat_map(|record| {
                    record.shares.iter().map(move |share| {
                        SettlementTransaction::new(
                            record.paid_by.clone(),
                            share.participant.clone(),
                            round2(share.amount),
                        )
                    })
                })
                .collect()),
            Err(err) => {
                warn!(trip_id, error = %err, "server refund suggestions unavailable, computing locally");
                self.settlement_transactions(trip_id).await
            }
        }
    }

    /// Promote a suggested transaction to a recorded refund expense,
    /// confirming the payment actually happened. The next balance
    /// computation will see the refund and treat that debt as retired.
    pub async fn record_settlement(
        &mut self,
        trip_id: i64,
        transaction: SettlementTransaction,
        currency: impl Into<String>,
    ) -> Result<Expense, CoreError> {
        let draft = transaction.into_refund(trip_id, currency);
        self.add_expense(trip_id, draft).await
    }

    // ── Itinerary ───────────────────────────────────────────────────

    /// The current itinerary snapshot: ordered days plus the general
    /// (unscheduled) activity bucket.
    pub async fn itinerary(&mut self, trip_id: i64) -> Result<ItinerarySnapshot, CoreError> {
        self.itinerary.snapshot(self.backend.as_ref(), trip_id).await
    }

    /// Force a re-fetch of the authoritative itinerary.
    pub async fn refresh_itinerary(
        &mut self,
        trip_id: i64,
    ) -> Result<ItinerarySnapshot, CoreError> {
        self.itinerary.refresh(self.backend.as_ref(), trip_id).await
    }

    /// Insert a new day at a 1-based position (the server renumbers).
    pub async fn add_day(&mut self, trip_id: i64, day_number: u32) -> Result<Day, CoreError> {
        let created = self.backend.create_day(trip_id, day_number).await?;
        self.itinerary.invalidate(trip_id);
        Ok(created)
    }

    /// Create an activity on a day, or in the general bucket (`None`).
    pub async fn add_activity(
        &mut self,
        trip_id: i64,
        day_id: Option<i64>,
        activity: NewActivity,
    ) -> Result<Activity, CoreError> {
        let created = self
            .backend
            .create_activity(trip_id, day_id, &activity)
            .await?;
        self.itinerary.invalidate(trip_id);
        Ok(created)
    }

    pub async fn update_activity(
        &mut self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
        patch: ActivityPatch,
    ) -> Result<Activity, CoreError> {
        let updated = self
            .backend
            .update_activity(trip_id, day_id, activity_id, &patch)
            .await?;
        self.itinerary.invalidate(trip_id);
        Ok(updated)
    }

    pub async fn remove_activity(
        &mut self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
    ) -> Result<(), CoreError> {
        self.backend
            .delete_activity(trip_id, day_id, activity_id)
            .await?;
        self.itinerary.invalidate(trip_id);
        Ok(())
    }

    pub async fn set_activity_completed(
        &mut self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
        completed: bool,
    ) -> Result<Activity, CoreError> {
        let updated = self
            .backend
            .set_activity_completed(trip_id, day_id, activity_id, completed)
            .await?;
        self.itinerary.invalidate(trip_id);
        Ok(updated)
    }

    // ── Reorder gestures ────────────────────────────────────────────

    /// Move a day to a 1-based target position (clamped to the current
    /// day count).
    ///
    /// The new order is applied locally first so the UI re-renders
    /// immediately, then confirmed with the backend. On success the
    /// authoritative list is re-fetched (server renumbering wins); on
    /// failure the optimistic order is discarded and the authoritative
    /// list re-fetched. Confirm failures never surface as `Err` — they
    /// resolve to a `RolledBack` outcome.
    pub async fn move_day(
        &mut self,
        trip_id: i64,
        day_id: i64,
        target_position: u32,
    ) -> Result<MoveOutcome, CoreError> {
        let gesture = Uuid::new_v4();
        let before = self.itinerary.snapshot(self.backend.as_ref(), trip_id).await?;

        let optimistic = self
            .itinerary_service
            .apply_day_move(&before, day_id, target_position)?;
        self.itinerary.swap(trip_id, optimistic);

        let target = self.itinerary_service.clamp_day_target(&before, target_position);
        info!(%gesture, trip_id, day_id, target, "day move applied optimistically");

        let confirm = self.backend.move_day(trip_id, day_id, target).await;
        match confirm {
            Ok(()) => self.reconcile(gesture, trip_id).await,
            Err(cause) => self.roll_back(gesture, trip_id, before, cause).await,
        }
    }

    /// Move an activity within a bucket or across buckets.
    ///
    /// A same-bucket move is a pure local reorder: the backend does not
    /// model intra-day order, so there is nothing to confirm and no
    /// network call is made. A cross-bucket move is confirmed with the
    /// backend (which persists the new bucket, not the index) and then
    /// reconciled or rolled back like a day move.
    pub async fn move_activity(
        &mut self,
        trip_id: i64,
        mv: ActivityMove,
    ) -> Result<MoveOutcome, CoreError> {
        let gesture = Uuid::new_v4();
        let before = self.itinerary.snapshot(self.backend.as_ref(), trip_id).await?;

        let optimistic = self.itinerary_service.apply_activity_move(&before, &mv)?;
        self.itinerary.swap(trip_id, optimistic.clone());

        if !self.itinerary_service.is_cross_bucket(&mv) {
            info!(%gesture, trip_id, activity_id = mv.activity_id, "same-bucket reorder applied locally");
            return Ok(MoveOutcome::reconciled(gesture, optimistic));
        }

        info!(
            %gesture, trip_id, activity_id = mv.activity_id,
            source_day = ?mv.source_day, dest_day = ?mv.dest_day,
            "activity move applied optimistically"
        );

        let confirm = self
            .backend
            .move_activity(trip_id, mv.source_day, mv.activity_id, mv.dest_day)
            .await;
        match confirm {
            Ok(()) => self.reconcile(gesture, trip_id).await,
            Err(cause) => self.roll_back(gesture, trip_id, before, cause).await,
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Confirm succeeded: re-fetch so any server-side renumbering wins
    /// over the provisional local order.
    async fn reconcile(&mut self, gesture: Uuid, trip_id: i64) -> Result<MoveOutcome, CoreError> {
        let refreshed = self.itinerary.refresh(self.backend.as_ref(), trip_id).await;
        match refreshed {
            Ok(snapshot) => {
                info!(%gesture, trip_id, "reorder reconciled");
                Ok(MoveOutcome::reconciled(gesture, snapshot))
            }
            Err(err) => {
                // The move is confirmed; only the re-fetch failed. Keep
                // showing the optimistic order but drop it from the cache
                // so the next read goes back to the server.
                warn!(%gesture, trip_id, error = %err, "reconcile re-fetch failed, keeping optimistic view");
                let snapshot = self
                    .itinerary
                    .last_known(trip_id)
                    .cloned()
                    .unwrap_or_default();
                self.itinerary.invalidate(trip_id);
                Ok(MoveOutcome::reconciled(gesture, snapshot))
            }
        }
    }

    /// Confirm failed: discard the optimistic order and converge on
    /// server truth. If even the re-fetch fails, restore the pre-gesture
    /// snapshot, so the visible list is always either the optimistic
    /// view or a server view.
    async fn roll_back(
        &mut self,
        gesture: Uuid,
        trip_id: i64,
        before: ItinerarySnapshot,
        cause: CoreError,
    ) -> Result<MoveOutcome, CoreError> {
        warn!(%gesture, trip_id, error = %cause, "move rejected, discarding optimistic order");
        let refreshed = self.itinerary.refresh(self.backend.as_ref(), trip_id).await;
        let snapshot = match refreshed {
            Ok(snapshot) => snapshot,
            Err(refetch_err) => {
                warn!(
                    %gesture, trip_id, error = %refetch_err,
                    "authoritative re-fetch failed, restoring last known server view"
                );
                self.itinerary.swap(trip_id, before.clone());
                before
            }
        };
        Ok(MoveOutcome::rolled_back(gesture, cause.to_string(), snapshot))
    }
}
