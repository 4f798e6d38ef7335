use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{Event, UserPreferences};

/// Request for personalized recommendations
///
/// Preferences are taken from the body when present, otherwise from the
/// stored profile of `userId`. The catalog defaults to the upcoming events in
/// the store unless `events` is supplied.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
    #[serde(default)]
    pub events: Option<Vec<Event>>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request for trending events
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrendingRequest {
    #[serde(default)]
    pub events: Option<Vec<Event>>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Query string for the GET ranking endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LimitQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
}

/// Request to store a user's preference profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPreferencesRequest {
    pub preferences: UserPreferences,
}
