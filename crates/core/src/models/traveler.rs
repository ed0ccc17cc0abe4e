use serde::{Deserialize, Serialize};

/// A traveler's role within a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelerRole {
    Admin,
    Member,
}

impl std::fmt::Display for TravelerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelerRole::Admin => write!(f, "Admin"),
            TravelerRole::Member => write!(f, "Member"),
        }
    }
}

/// A person associated with a trip. The username is the identity used
/// everywhere else (expenses, balances, settlements).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traveler {
    pub id: Option<i64>,

    pub username: String,

    #[serde(default)]
    pub role: Option<TravelerRole>,

    #[serde(rename = "travelId", default)]
    pub trip_id: Option<i64>,
}

/// Payload for adding a traveler to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTraveler {
    pub username: String,

    #[serde(rename = "travelId", skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TravelerRole>,
}

impl NewTraveler {
    pub fn new(username: impl Into<String>, trip_id: i64) -> Self {
        Self {
            username: username.into(),
            trip_id: Some(trip_id),
            role: Some(TravelerRole::Member),
        }
    }
}
