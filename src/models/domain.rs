use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Event category tag
///
/// The six known categories are matched exactly (lowercase). Any other tag is
/// kept verbatim in `Other` so that category membership still compares the
/// original strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventCategory {
    Gala,
    Concert,
    Marathon,
    Webinar,
    Conference,
    Workshop,
    Other(String),
}

impl EventCategory {
    pub fn as_str(&self) -> &str {
        match self {
            EventCategory::Gala => "gala",
            EventCategory::Concert => "concert",
            EventCategory::Marathon => "marathon",
            EventCategory::Webinar => "webinar",
            EventCategory::Conference => "conference",
            EventCategory::Workshop => "workshop",
            EventCategory::Other(tag) => tag,
        }
    }
}

impl Default for EventCategory {
    fn default() -> Self {
        EventCategory::Other(String::new())
    }
}

impl From<&str> for EventCategory {
    fn from(value: &str) -> Self {
        match value {
            "gala" => EventCategory::Gala,
            "concert" => EventCategory::Concert,
            "marathon" => EventCategory::Marathon,
            "webinar" => EventCategory::Webinar,
            "conference" => EventCategory::Conference,
            "workshop" => EventCategory::Workshop,
            other => EventCategory::Other(other.to_string()),
        }
    }
}

impl From<String> for EventCategory {
    fn from(value: String) -> Self {
        match EventCategory::from(value.as_str()) {
            EventCategory::Other(_) => EventCategory::Other(value),
            known => known,
        }
    }
}

impl From<EventCategory> for String {
    fn from(value: EventCategory) -> Self {
        match value {
            EventCategory::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of an event in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    #[default]
    Upcoming,
    Live,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Upcoming => "upcoming",
            EventStatus::Live => "live",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Unknown => "unknown",
        }
    }
}

/// Event as stored in the catalog
///
/// Only `ticket_price`, `max_attendees`, `category`, `location` and `date`
/// take part in ranking; the remaining fields are carried through to callers.
/// The document store sends unset attributes as `null`, which reads the same
/// as a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "$id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "ticketPrice", default, deserialize_with = "null_as_default")]
    pub ticket_price: f64,
    #[serde(rename = "maxAttendees", default)]
    pub max_attendees: Option<u32>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub category: EventCategory,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    pub date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: EventStatus,
    #[serde(rename = "isVirtual", default, deserialize_with = "null_as_default")]
    pub is_virtual: bool,
    #[serde(rename = "organizerUid", default)]
    pub organizer_uid: Option<String>,
}

impl Event {
    /// Event date as milliseconds since the Unix epoch
    #[inline]
    pub fn epoch_millis(&self) -> i64 {
        self.date.timestamp_millis()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Epoch-millis bounds sent as integers or as floats (`1.7e12`)
///
/// Fractional bounds are narrowed to whole milliseconds so the closed
/// interval keeps exactly the same event dates.
fn millis_range<'de, D>(deserializer: D) -> Result<[i64; 2], D::Error>
where
    D: Deserializer<'de>,
{
    let [start, end] = <[f64; 2]>::deserialize(deserializer)?;
    Ok([start.ceil() as i64, end.floor() as i64])
}

/// Preferences used for personalized recommendations
///
/// Ranges are closed intervals written as `[min, max]`. They are not
/// validated: an inverted range simply never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(rename = "priceRange")]
    pub price_range: [f64; 2],
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<EventCategory>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    /// Epoch milliseconds
    #[serde(rename = "dateRange", deserialize_with = "millis_range")]
    pub date_range: [i64; 2],
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            price_range: [0.0, f64::MAX],
            categories: Vec::new(),
            location: String::new(),
            date_range: [i64::MIN, i64::MAX],
        }
    }
}

/// Stored preference profile for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub preferences: UserPreferences,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// An event paired with its score for the duration of one ranking call
#[derive(Debug, Clone, Copy)]
pub struct ScoredEvent<'a> {
    pub event: &'a Event,
    pub score: u32,
}

/// Ranking strategy applied to a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingStrategy {
    Personalized,
    Trending,
}
