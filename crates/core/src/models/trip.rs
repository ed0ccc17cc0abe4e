use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::itinerary::Day;

/// The top-level entity grouping days, expenses and travelers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Option<i64>,

    pub name: String,

    pub destination: String,

    #[serde(default)]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Number of itinerary days the server reports.
    #[serde(rename = "days", default)]
    pub day_count: Option<u32>,

    /// Nested day list, present on detail responses.
    #[serde(rename = "travelDays", default)]
    pub days: Option<Vec<Day>>,
}

/// Payload for creating a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub name: String,
    pub destination: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}
