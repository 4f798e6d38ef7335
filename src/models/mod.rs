// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Event, EventCategory, EventStatus, UserPreferences, PreferenceProfile, ScoredEvent, RankingStrategy};
pub use requests::{RecommendRequest, TrendingRequest, LimitQuery, UpsertPreferencesRequest};
pub use responses::{RankedEvent, RankedEventsResponse, HealthResponse, ErrorResponse};
