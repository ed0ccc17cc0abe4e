use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use super::traits::TripBackend;
use crate::errors::CoreError;
use crate::models::expense::{Expense, NewExpense};
use crate::models::itinerary::{Activity, ActivityPatch, Day, NewActivity};
use crate::models::traveler::{NewTraveler, Traveler};
use crate::models::trip::{NewTrip, Trip};

/// How long a request (including the reorder confirm step) may take
/// before it counts as failed and triggers rollback. The browser governs
/// this on wasm32, so the limit only applies to native builds.
#[cfg(not(target_arch = "wasm32"))]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP implementation of [`TripBackend`].
///
/// Speaks the backend's JSON REST contract with a bearer token attached
/// per request. Authentication itself (obtaining the token) is the
/// embedding application's problem; the token is an opaque string here.
///
/// Note the wire quirk: expense routes live under `/api/travel/{id}`
/// (singular) while everything else is under `/api/travels/{id}`.
pub struct RestBackend {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(REQUEST_TIMEOUT);
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Replace (or clear) the bearer token, e.g. after a session refresh.
    pub fn set_bearer_token(&mut self, token: Option<String>) {
        self.bearer_token = token;
    }

    // ── Request plumbing ────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%path, method = %method, "backend request");
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, CoreError> {
        let response = self.request(method, path).send().await?;
        Self::parse(response, path).await
    }

    async fn fetch_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, CoreError> {
        let response = self.request(method, path).json(body).send().await?;
        Self::parse(response, path).await
    }

    async fn execute(&self, method: Method, path: &str) -> Result<(), CoreError> {
        let response = self.request(method, path).send().await?;
        Self::check_status(response, path).await?;
        Ok(())
    }

    async fn parse<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, CoreError> {
        let response = Self::check_status(response, endpoint).await?;
        response.json::<T>().await.map_err(|e| CoreError::Api {
            endpoint: endpoint.to_string(),
            message: format!("failed to parse response: {e}"),
        })
    }

    /// 2xx passes through; 4xx means the server rejected the operation as
    /// structurally invalid; anything else is a transport-level failure.
    async fn check_status(response: Response, endpoint: &str) -> Result<Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(200).collect();
        if status.is_client_error() {
            Err(CoreError::ValidationConflict(format!(
                "{endpoint}: {status}: {snippet}"
            )))
        } else {
            Err(CoreError::Network(format!("{endpoint}: {status}: {snippet}")))
        }
    }

    /// Activity routes exist in two shapes: day-scoped and trip-general.
    fn activity_base(trip_id: i64, day_id: Option<i64>) -> String {
        match day_id {
            Some(day) => format!("/api/travels/{trip_id}/travelDays/{day}/activities"),
            None => format!("/api/travels/{trip_id}/activities"),
        }
    }
}

#[derive(Serialize)]
struct CreateDayBody {
    day: u32,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TripBackend for RestBackend {
    // ── Trips ───────────────────────────────────────────────────────

    async fn list_trips(&self) -> Result<Vec<Trip>, CoreError> {
        self.fetch(Method::GET, "/api/travels").await
    }

    async fn get_trip(&self, trip_id: i64) -> Result<Trip, CoreError> {
        self.fetch(Method::GET, &format!("/api/travels/{trip_id}")).await
    }

    async fn create_trip(&self, trip: &NewTrip) -> Result<Trip, CoreError> {
        self.fetch_with_body(Method::POST, "/api/travels", trip).await
    }

    // ── Expenses ────────────────────────────────────────────────────

    async fn list_expenses(&self, trip_id: i64) -> Result<Vec<Expense>, CoreError> {
        self.fetch(Method::GET, &format!("/api/travel/{trip_id}/costs"))
            .await
    }

    async fn create_expense(
        &self,
        trip_id: i64,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError> {
        self.fetch_with_body(Method::POST, &format!("/api/travel/{trip_id}/costs"), expense)
            .await
    }

    async fn update_expense(
        &self,
        trip_id: i64,
        expense_id: i64,
        expense: &NewExpense,
    ) -> Result<Expense, CoreError> {
        self.fetch_with_body(
            Method::PUT,
            &format!("/api/travel/{trip_id}/costs/{expense_id}"),
            expense,
        )
        .await
    }

    async fn delete_expense(&self, trip_id: i64, expense_id: i64) -> Result<(), CoreError> {
        self.execute(
            Method::DELETE,
            &format!("/api/travel/{trip_id}/costs/{expense_id}"),
        )
        .await
    }

    async fn list_refund_suggestions(&self, trip_id: i64) -> Result<Vec<Expense>, CoreError> {
        self.fetch(Method::GET, &format!("/api/travel/{trip_id}/costs/refunds"))
            .await
    }

    // ── Travelers ───────────────────────────────────────────────────

    async fn list_travelers(&self) -> Result<Vec<Traveler>, CoreError> {
        self.fetch(Method::GET, "/api/travelers").await
    }

    async fn add_traveler(&self, traveler: &NewTraveler) -> Result<Traveler, CoreError> {
        self.fetch_with_body(Method::POST, "/api/travelers", traveler)
            .await
    }

    // ── Itinerary ───────────────────────────────────────────────────

    async fn list_days(&self, trip_id: i64) -> Result<Vec<Day>, CoreError> {
        self.fetch(Method::GET, &format!("/api/travels/{trip_id}/travelDays"))
            .await
    }

    async fn create_day(&self, trip_id: i64, day_number: u32) -> Result<Day, CoreError> {
        self.fetch_with_body(
            Method::POST,
            &format!("/api/travels/{trip_id}/travelDays"),
            &CreateDayBody { day: day_number },
        )
        .await
    }

    async fn list_general_activities(&self, trip_id: i64) -> Result<Vec<Activity>, CoreError> {
        self.fetch(Method::GET, &format!("/api/travels/{trip_id}/activities"))
            .await
    }

    async fn create_activity(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity: &NewActivity,
    ) -> Result<Activity, CoreError> {
        self.fetch_with_body(
            Method::POST,
            &Self::activity_base(trip_id, day_id),
            activity,
        )
        .await
    }

    async fn update_activity(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
        patch: &ActivityPatch,
    ) -> Result<Activity, CoreError> {
        let path = format!("{}/{activity_id}", Self::activity_base(trip_id, day_id));
        self.fetch_with_body(Method::PUT, &path, patch).await
    }

    async fn delete_activity(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
    ) -> Result<(), CoreError> {
        let path = format!("{}/{activity_id}", Self::activity_base(trip_id, day_id));
        self.execute(Method::DELETE, &path).await
    }

    async fn set_activity_completed(
        &self,
        trip_id: i64,
        day_id: Option<i64>,
        activity_id: i64,
        completed: bool,
    ) -> Result<Activity, CoreError> {
        let path = format!("{}/{activity_id}", Self::activity_base(trip_id, day_id));
        self.fetch_with_body(Method::PATCH, &path, &completed).await
    }

    async fn move_day(
        &self,
        trip_id: i64,
        day_id: i64,
        new_day_number: u32,
    ) -> Result<(), CoreError> {
        self.execute(
            Method::PUT,
            &format!(
                "/api/travels/{trip_id}/travelDays/{day_id}/move?newDayNumber={new_day_number}"
            ),
        )
        .await
    }

    async fn move_activity(
        &self,
        trip_id: i64,
        source_day: Option<i64>,
        activity_id: i64,
        target_day: Option<i64>,
    ) -> Result<(), CoreError> {
        let mut path = format!(
            "{}/{activity_id}/move",
            Self::activity_base(trip_id, source_day)
        );
        if let Some(target) = target_day {
            path.push_str(&format!("?targetTravelDayId={target}"));
        }
        self.execute(Method::PUT, &path).await
    }
}
