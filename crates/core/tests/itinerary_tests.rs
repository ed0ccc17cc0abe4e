// ═══════════════════════════════════════════════════════════════════
// Itinerary & Facade Tests — optimistic reorder with reconciliation,
// rollback on failure, settlement through the TripPlanner facade
// ═══════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use wayplan_core::backend::traits::TripBackend;
use wayplan_core::errors::CoreError;
use wayplan_core::models::expense::{Expense, ExpenseKind, ExpenseShare, NewExpense};
use wayplan_core::models::itinerary::{
    Activity, ActivityMove, ActivityPatch, Day, ItinerarySnapshot, NewActivity, ReorderPhase,
};
use wayplan_core::models::settlement::SettlementTransaction;
use wayplan_core::models::traveler::{NewTraveler, Traveler, TravelerRole};
use wayplan_core::models::trip::{NewTrip, Trip};
use wayplan_core::services::itinerary_service::ItineraryService;
use wayplan_core::TripPlanner;

const TRIP: i64 = 1;

fn act(id: i64, day_id: Option<i64>, name: &str) -> Activity {
    Activity {
        id,
        trip_id: Some(TRIP),
        day_id,
        name: name.to_string(),
        description: None,
        time: None,
        completed: false,
    }
}

fn day(id: i64, number: u32, activities: Vec<Activity>) -> Day {
    Day {
        id,
        trip_id: TRIP,
        day_number: Some(number),
        date: None,
        activities,
    }
}

fn traveler(username: &str) -> Traveler {
    Traveler {
        id: None,
        username: username.to_string(),
        role: Some(TravelerRole::Member),
        trip_id: Some(TRIP),
    }
}

fn cost(reason: &str, paid_by: &str, total: f64, shares: &[(&str, f64)]) -> Expense {
    Expense {
        id: Some(1),
        kind: ExpenseKind::Cost,
        reason: reason.to_string(),
        total_amount: total,
        currency: "EUR".to_string(),
        paid_by: paid_by.to_string(),
        shares: shares
            .iter()
            .map(|(who, amount)| ExpenseShare::new(*who, *amount, "EUR"))
            .collect(),
        payers: vec![paid_by.to_string()],
        date: None,
        trip_id: TRIP,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Mock Backend
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct MockState {
    days: Mutex<Vec<Day>>,
    general: Mutex<Vec<Activity>>,
    expenses: Mutex<Vec<Expense>>,
    travelers: Mutex<Vec<Traveler>>,
    refund_suggestions: Mutex<Option<Vec<Expense>>>,
    fail_moves: AtomicBool,
    fail_fetches: AtomicBool,
    day_fetches: AtomicUsize,
    move_day_calls: Mutex<Vec<(i64, i64, u32)>>,
    move_activity_calls: Mutex<Vec<(i64, Option<i64>, i64, Option<i64>)>>,
}

/// In-memory backend with a scriptable failure switch. Successful moves
/// are applied to the server-side state the way the real backend would
/// (days renumbered, activities re-bucketed with no intra-day order).
///
/// Clones share state, so a test can keep a handle after giving the
/// planner its copy.
#[derive(Clone, Default)]
struct MockBackend {
    state: Arc<MockState>,
}

impl MockBackend {
    fn new(days: Vec<Day>, general: Vec<Activity>) -> Self {
        let backend = Self::default();
        *backend.state.days.lock().unwrap() = days;
        *backend.state.general.lock().unwrap() = general;
        backend
    }

    fn with_expenses(self, expenses: Vec<Expense>, travelers: Vec<Traveler>) -> Self {
        *self.state.expenses.lock().unwrap() = expenses;
        *self.state.travelers.lock().unwrap() = travelers;
        self
    }

    fn with_refund_suggestions(self, suggestions: Vec<Expense>) -> Self {
        *self.state.refund_suggestions.lock().unwrap() = Some(suggestions);
        self
    }

    fn fail_moves(&self) {
        self.state.fail_moves.store(true, Ordering::SeqCst);
    }

    fn fail_fetches(&self) {
        self.state.fail_fetches.store(true, Ordering::SeqCst);
    }

    fn day_fetches(&self) -> usize {
        self.state.day_fetches.load(Ordering::SeqCst)
    }

    fn move_day_calls(&self) -> Vec<(i64, i64, u32)> {
        self.state.move_day_calls.lock().unwrap().clone()
    }

    fn move_activity_calls(&self) -> Vec<(i64, Option<i64>, i64, Option<i64>)> {
        self.state.move_activity_calls.lock().unwrap().clone()
    }

    fn gate_fetch(&self) -> Result<(), CoreError> {
        if self.state.fail_fetches.load(Ordering::SeqCst) {
            Err(CoreError::Network("connection reset".to_string()))
        } else {
            Ok(())
        }
    }

    fn take_out(&self, day_id: Option<i64>, activity_id: i64) -> Option<Activity> {
        match day_id {
            Some(id) => {
                let mut days = self.state.days.lock().unwrap();
                let day = days.iter_mut().find(|d| d.id == id)?;
                let idx = day.activities.iter().position(|a| a.id == activity_id)?;
                Some(day.activities.remove(idx))
            }
            None => {
                let mut general = self.state.general.lock().unwrap();
                let idx = general.iter().position(|a| a.id == activity_id)?;
                Some(general.remove(idx))
            }
        }
    }
}

#[async_trait]
impl TripBackend for MockBackend {
    async fn list_trips(&self) -> Result<Vec<Trip>, CoreError> {
        unimplemented!("not exercised")
    }

    async fn get_trip(&self, _trip_id: i64) -> Result<Trip, CoreError> {
        unimplemented!("not exercised")
    }

    async fn create_trip(&self, _trip: &NewTrip) -> Result<Trip, CoreError> {
        unimplemented!("not exercised")
    }

    async fn list_expenses(&self, _trip_id: i64) -> Result<Vec<Expense>, CoreError> {
        self.gate_fetch()?;
        Ok(self.state.expenses.lock().unwrap().clone())
    }

    async fn create_expense(
        &self,
        trip_id: i64,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError> {
        let mut expenses = self.state.expenses.lock().unwrap();
        let created = Expense {
            id: Some(expenses.len() as i64 + 100),
            kind: expense.kind,
            reason: expense.reason.clone(),
            total_amount: expense.total_amount,
            currency: expense.currency.clone(),
            paid_by: expense.paid_by.clone(),
            shares: expense.shares.clone(),
            payers: expense.payers.clone(),
            date: expense.date,
            trip_id,
        };
        expenses.push(created.clone());
        Ok(created)
    }

    async fn update_expense(
        &self,
        _trip_id: i64,
        _expense_id: i64,
        _expense: &NewExpense,
    ) -> Result<Expense, CoreError> {
        unimplemented!("not exercised")
    }

    async fn delete_expense(&self, _trip_id: i64, _expense_id: i64) -> Result<(), CoreError> {
        unimplemented!("not exercised")
    }

    async fn list_refund_suggestions(&self, _trip_id: i64) -> Result<Vec<Expense>, CoreError> {
        match self.state.refund_suggestions.lock().unwrap().clone() {
            Some(suggestions) => Ok(suggestions),
            None => Err(CoreError::Api {
                endpoint: "/costs/refunds".to_string(),
                message: "suggestions not supported".to_string(),
            }),
        }
    }

    async fn list_travelers(&self) -> Result<Vec<Traveler>, CoreError> {
        Ok(self.state.travelers.lock().unwrap().clone())
    }

    async fn add_traveler(&self, _traveler: &NewTraveler) -> Result<Traveler, CoreError> {
        unimplemented!("not exercised")
    }

    async fn list_days(&self, _trip_id: i64) -> Result<Vec<Day>, CoreError> {
        self.gate_fetch()?;
        self.state.day_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.days.lock().unwrap().clone())
    }

    async fn create_day(&self, _trip_id: i64, _day_number: u32) -> Result<Day, CoreError> {
        unimplemented!("not exercised")
    }

    async fn list_general_activities(&self, _trip_id: i64) -> Result<Vec<Activity>, CoreError> {
        self.gate_fetch()?;
        Ok(self.state.general.lock().unwrap().clone())
    }

    async fn create_activity(
        &self,
        _trip_id: i64,
        _day_id: Option<i64>,
        _activity: &NewActivity,
    ) -> Result<Activity, CoreError> {
        unimplemented!("not exercised")
    }

    async fn update_activity(
        &self,
        _trip_id: i64,
        _day_id: Option<i64>,
        _activity_id: i64,
        _patch: &ActivityPatch,
    ) -> Result<Activity, CoreError> {
        unimplemented!("not exercised")
    }

    async fn delete_activity(
        &self,
        _trip_id: i64,
        _day_id: Option<i64>,
        _activity_id: i64,
    ) -> Result<(), CoreError> {
        unimplemented!("not exercised")
    }

    async fn set_activity_completed(
        &self,
        _trip_id: i64,
        _day_id: Option<i64>,
        _activity_id: i64,
        _completed: bool,
    ) -> Result<Activity, CoreError> {
        unimplemented!("not exercised")
    }

    async fn move_day(
        &self,
        trip_id: i64,
        day_id: i64,
        new_day_number: u32,
    ) -> Result<(), CoreError> {
        self.state
            .move_day_calls
            .lock()
            .unwrap()
            .push((trip_id, day_id, new_day_number));
        if self.state.fail_moves.load(Ordering::SeqCst) {
            return Err(CoreError::Network("connection reset".to_string()));
        }
        let mut days = self.state.days.lock().unwrap();
        let from = days
            .iter()
            .position(|d| d.id == day_id)
            .ok_or_else(|| CoreError::ValidationConflict("no such day".to_string()))?;
        let moved = days.remove(from);
        let to = (new_day_number as usize).clamp(1, days.len() + 1);
        days.insert(to - 1, moved);
        for (idx, d) in days.iter_mut().enumerate() {
            d.day_number = Some(idx as u32 + 1);
        }
        Ok(())
    }

    async fn move_activity(
        &self,
        trip_id: i64,
        source_day: Option<i64>,
        activity_id: i64,
        target_day: Option<i64>,
    ) -> Result<(), CoreError> {
        self.state
            .move_activity_calls
            .lock()
            .unwrap()
            .push((trip_id, source_day, activity_id, target_day));
        if self.state.fail_moves.load(Ordering::SeqCst) {
            return Err(CoreError::Network("connection reset".to_string()));
        }
        let mut activity = self
            .take_out(source_day, activity_id)
            .ok_or_else(|| CoreError::ValidationConflict("no such activity".to_string()))?;
        activity.day_id = target_day;
        // The server persists the bucket only; new arrivals go at the end.
        match target_day {
            Some(id) => {
                let mut days = self.state.days.lock().unwrap();
                let dest = days
                    .iter_mut()
                    .find(|d| d.id == id)
                    .ok_or_else(|| CoreError::ValidationConflict("no such day".to_string()))?;
                dest.activities.push(activity);
            }
            None => self.state.general.lock().unwrap().push(activity),
        }
        Ok(())
    }
}

fn three_day_backend() -> MockBackend {
    MockBackend::new(
        vec![
            day(1, 1, vec![act(10, Some(1), "Harbour walk"), act(11, Some(1), "Market")]),
            day(2, 2, vec![act(20, Some(2), "Museum")]),
            day(3, 3, vec![]),
        ],
        vec![act(90, None, "Buy sunscreen")],
    )
}

fn day_ids(snapshot: &ItinerarySnapshot) -> Vec<i64> {
    snapshot.days.iter().map(|d| d.id).collect()
}

fn activity_ids(activities: &[Activity]) -> Vec<i64> {
    activities.iter().map(|a| a.id).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Pure permutations — ItineraryService
// ═══════════════════════════════════════════════════════════════════

mod pure_permutations {
    use super::*;

    fn snapshot() -> ItinerarySnapshot {
        ItinerarySnapshot::new(
            vec![
                day(1, 1, vec![act(10, Some(1), "a"), act(11, Some(1), "b"), act(12, Some(1), "c")]),
                day(2, 2, vec![act(20, Some(2), "d"), act(21, Some(2), "e")]),
            ],
            vec![act(90, None, "g")],
        )
    }

    #[test]
    fn day_move_to_end_renumbers() {
        let svc = ItineraryService::new();
        let next = svc.apply_day_move(&snapshot(), 1, 2).unwrap();
        assert_eq!(day_ids(&next), vec![2, 1]);
        assert_eq!(next.days[0].day_number, Some(1));
        assert_eq!(next.days[1].day_number, Some(2));
    }

    #[test]
    fn day_move_target_is_clamped() {
        let svc = ItineraryService::new();
        let next = svc.apply_day_move(&snapshot(), 1, 99).unwrap();
        assert_eq!(day_ids(&next), vec![2, 1]);
        let next = svc.apply_day_move(&snapshot(), 2, 0).unwrap();
        assert_eq!(day_ids(&next), vec![2, 1]);
    }

    #[test]
    fn day_move_unknown_day() {
        let svc = ItineraryService::new();
        match svc.apply_day_move(&snapshot(), 42, 1) {
            Err(CoreError::DayNotFound(42)) => {}
            other => panic!("expected DayNotFound, got {other:?}"),
        }
    }

    // Cross-bucket move lands at the drop index and leaves the other
    // activities of both buckets in relative order.
    #[test]
    fn cross_bucket_move_inserts_at_index() {
        let svc = ItineraryService::new();
        let mv = ActivityMove {
            activity_id: 11,
            source_day: Some(1),
            dest_day: Some(2),
            dest_index: 1,
        };
        let next = svc.apply_activity_move(&snapshot(), &mv).unwrap();
        assert_eq!(activity_ids(&next.days[0].activities), vec![10, 12]);
        assert_eq!(activity_ids(&next.days[1].activities), vec![20, 11, 21]);
        assert_eq!(next.days[1].activities[1].day_id, Some(2));
    }

    #[test]
    fn same_bucket_move_reorders() {
        let svc = ItineraryService::new();
        let mv = ActivityMove {
            activity_id: 10,
            source_day: Some(1),
            dest_day: Some(1),
            dest_index: 2,
        };
        let next = svc.apply_activity_move(&snapshot(), &mv).unwrap();
        assert_eq!(activity_ids(&next.days[0].activities), vec![11, 12, 10]);
        assert!(!svc.is_cross_bucket(&mv));
    }

    #[test]
    fn move_to_general_bucket() {
        let svc = ItineraryService::new();
        let mv = ActivityMove {
            activity_id: 20,
            source_day: Some(2),
            dest_day: None,
            dest_index: 0,
        };
        let next = svc.apply_activity_move(&snapshot(), &mv).unwrap();
        assert_eq!(activity_ids(&next.general), vec![20, 90]);
        assert_eq!(next.general[0].day_id, None);
        assert!(next.days[1].activities.is_empty());
    }

    #[test]
    fn drop_index_is_clamped_to_bucket_length() {
        let svc = ItineraryService::new();
        let mv = ActivityMove {
            activity_id: 90,
            source_day: None,
            dest_day: Some(2),
            dest_index: 99,
        };
        let next = svc.apply_activity_move(&snapshot(), &mv).unwrap();
        assert_eq!(activity_ids(&next.days[1].activities), vec![20, 21, 90]);
        assert!(next.general.is_empty());
    }

    #[test]
    fn unknown_activity_or_day() {
        let svc = ItineraryService::new();
        let mv = ActivityMove {
            activity_id: 999,
            source_day: Some(1),
            dest_day: Some(2),
            dest_index: 0,
        };
        assert!(matches!(
            svc.apply_activity_move(&snapshot(), &mv),
            Err(CoreError::ActivityNotFound(999))
        ));

        let mv = ActivityMove {
            activity_id: 10,
            source_day: Some(1),
            dest_day: Some(42),
            dest_index: 0,
        };
        assert!(matches!(
            svc.apply_activity_move(&snapshot(), &mv),
            Err(CoreError::DayNotFound(42))
        ));
    }

    // The input snapshot is untouched; only the returned one changes.
    #[test]
    fn input_snapshot_is_not_mutated() {
        let svc = ItineraryService::new();
        let original = snapshot();
        let pristine = original.clone();
        svc.apply_day_move(&original, 1, 2).unwrap();
        assert_eq!(original, pristine);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Reorder reconciliation — TripPlanner over the mock backend
// ═══════════════════════════════════════════════════════════════════

mod reorder_reconciliation {
    use super::*;

    #[tokio::test]
    async fn day_move_reconciles_with_server_order() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let outcome = planner.move_day(TRIP, 1, 3).await.unwrap();
        assert_eq!(outcome.phase, ReorderPhase::Reconciled);
        assert!(outcome.failure.is_none());
        assert_eq!(day_ids(&outcome.snapshot), vec![2, 3, 1]);
        // Server renumbering won over the provisional local numbers.
        let numbers: Vec<_> = outcome.snapshot.days.iter().map(|d| d.day_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(backend.move_day_calls(), vec![(TRIP, 1, 3)]);
    }

    #[tokio::test]
    async fn day_move_sends_clamped_target() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let outcome = planner.move_day(TRIP, 1, 99).await.unwrap();
        assert!(outcome.is_reconciled());
        assert_eq!(day_ids(&outcome.snapshot), vec![2, 3, 1]);
        assert_eq!(backend.move_day_calls(), vec![(TRIP, 1, 3)]);
    }

    // A failed confirm must not let the optimistic order survive: the
    // next successful re-fetch wins.
    #[tokio::test]
    async fn day_move_rolls_back_on_failure() {
        let backend = three_day_backend();
        backend.fail_moves();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let outcome = planner.move_day(TRIP, 1, 3).await.unwrap();
        assert_eq!(outcome.phase, ReorderPhase::RolledBack);
        assert!(outcome.failure.is_some());
        assert_eq!(day_ids(&outcome.snapshot), vec![1, 2, 3]);

        // The cached view converged back to server truth too.
        let cached = planner.itinerary(TRIP).await.unwrap();
        assert_eq!(day_ids(&cached), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn unknown_day_fails_locally_without_backend_call() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        // Prime the cache, then try to move a day that does not exist.
        planner.itinerary(TRIP).await.unwrap();
        assert!(matches!(
            planner.move_day(TRIP, 42, 1).await,
            Err(CoreError::DayNotFound(42))
        ));
        assert!(backend.move_day_calls().is_empty());

        let unchanged = planner.itinerary(TRIP).await.unwrap();
        assert_eq!(day_ids(&unchanged), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn cross_bucket_activity_move_reconciles() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let mv = ActivityMove {
            activity_id: 11,
            source_day: Some(1),
            dest_day: Some(2),
            dest_index: 0,
        };
        let outcome = planner.move_activity(TRIP, mv).await.unwrap();
        assert!(outcome.is_reconciled());
        assert_eq!(
            backend.move_activity_calls(),
            vec![(TRIP, Some(1), 11, Some(2))]
        );

        let day1 = outcome.snapshot.day(1).unwrap();
        let day2 = outcome.snapshot.day(2).unwrap();
        assert_eq!(activity_ids(&day1.activities), vec![10]);
        assert!(day2.activities.iter().any(|a| a.id == 11));
        assert!(day2.activities.iter().all(|a| a.day_id == Some(2)));
    }

    #[tokio::test]
    async fn activity_move_to_general_bucket() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let mv = ActivityMove {
            activity_id: 20,
            source_day: Some(2),
            dest_day: None,
            dest_index: 0,
        };
        let outcome = planner.move_activity(TRIP, mv).await.unwrap();
        assert!(outcome.is_reconciled());
        assert_eq!(backend.move_activity_calls(), vec![(TRIP, Some(2), 20, None)]);
        assert!(outcome.snapshot.general.iter().any(|a| a.id == 20));
        assert!(outcome.snapshot.day(2).unwrap().activities.is_empty());
    }

    // Same-bucket moves are visual-only: no confirm, no re-fetch.
    #[tokio::test]
    async fn same_bucket_move_makes_no_backend_call() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let mv = ActivityMove {
            activity_id: 10,
            source_day: Some(1),
            dest_day: Some(1),
            dest_index: 1,
        };
        let outcome = planner.move_activity(TRIP, mv).await.unwrap();
        assert!(outcome.is_reconciled());
        assert_eq!(
            activity_ids(&outcome.snapshot.day(1).unwrap().activities),
            vec![11, 10]
        );
        assert!(backend.move_activity_calls().is_empty());
        assert_eq!(backend.day_fetches(), 1);
    }

    #[tokio::test]
    async fn activity_move_rolls_back_on_failure() {
        let backend = three_day_backend();
        backend.fail_moves();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let mv = ActivityMove {
            activity_id: 11,
            source_day: Some(1),
            dest_day: Some(2),
            dest_index: 0,
        };
        let outcome = planner.move_activity(TRIP, mv).await.unwrap();
        assert_eq!(outcome.phase, ReorderPhase::RolledBack);
        assert_eq!(
            activity_ids(&outcome.snapshot.day(1).unwrap().activities),
            vec![10, 11]
        );
    }

    // If even the rollback re-fetch fails, the pre-gesture snapshot (the
    // last known server view) is restored.
    #[tokio::test]
    async fn rollback_refetch_failure_restores_last_known_view() {
        let backend = three_day_backend();
        let mut planner = TripPlanner::new(Box::new(backend.clone()));

        let before = planner.itinerary(TRIP).await.unwrap();

        backend.fail_moves();
        backend.fail_fetches();

        let outcome = planner.move_day(TRIP, 1, 3).await.unwrap();
        assert_eq!(outcome.phase, ReorderPhase::RolledBack);
        assert_eq!(outcome.snapshot, before);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settlement through the facade
// ═══════════════════════════════════════════════════════════════════

mod facade_settlement {
    use super::*;

    fn split_backend() -> MockBackend {
        MockBackend::new(Vec::new(), Vec::new()).with_expenses(
            vec![cost("Hotel", "alice", 100.0, &[("alice", 50.0), ("bob", 50.0)])],
            vec![traveler("alice"), traveler("bob"), traveler("carol")],
        )
    }

    #[tokio::test]
    async fn balances_from_expenses_and_roster() {
        let mut planner = TripPlanner::new(Box::new(split_backend()));
        let balances = planner.balances(TRIP).await.unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].participant, "alice");
        assert!((balances[0].amount - 50.0).abs() < 1e-9);
        assert_eq!(balances[1].participant, "bob");
        assert!((balances[1].amount + 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn refund_suggestions_fall_back_to_local_algorithm() {
        let mut planner = TripPlanner::new(Box::new(split_backend()));
        let suggestions = planner.refund_suggestions(TRIP).await.unwrap();
        let local = planner.settlement_transactions(TRIP).await.unwrap();
        assert_eq!(suggestions, local);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].from, "bob");
        assert_eq!(suggestions[0].to, "alice");
    }

    #[tokio::test]
    async fn refund_suggestions_prefer_the_server() {
        let suggested = Expense {
            kind: ExpenseKind::Refund,
            reason: "Suggested settlement".to_string(),
            paid_by: "bob".to_string(),
            shares: vec![ExpenseShare::new("alice", 50.0, "EUR")],
            ..cost("unused", "bob", 50.0, &[])
        };
        let backend = split_backend().with_refund_suggestions(vec![suggested]);
        let mut planner = TripPlanner::new(Box::new(backend));

        let suggestions = planner.refund_suggestions(TRIP).await.unwrap();
        assert_eq!(
            suggestions,
            vec![SettlementTransaction::new("bob", "alice", 50.0)]
        );
    }

    // Recording a settlement creates a refund server-side and the next
    // balance computation sees the debt as retired.
    #[tokio::test]
    async fn record_settlement_retires_debt() {
        let mut planner = TripPlanner::new(Box::new(split_backend()));

        let transactions = planner.settlement_transactions(TRIP).await.unwrap();
        assert_eq!(transactions.len(), 1);

        let recorded = planner
            .record_settlement(TRIP, transactions[0].clone(), "EUR")
            .await
            .unwrap();
        assert_eq!(recorded.kind, ExpenseKind::Refund);
        assert_eq!(recorded.paid_by, "bob");

        let balances = planner.balances(TRIP).await.unwrap();
        assert!(balances.is_empty(), "expected settled trip, got {balances:?}");
        assert!(planner.settlement_transactions(TRIP).await.unwrap().is_empty());
    }
}
