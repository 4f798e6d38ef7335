use serde::{Deserialize, Serialize};
use crate::models::domain::{Event, RankingStrategy, ScoredEvent};

/// A ranked event as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEvent {
    #[serde(flatten)]
    pub event: Event,
    pub score: u32,
}

impl From<ScoredEvent<'_>> for RankedEvent {
    fn from(scored: ScoredEvent<'_>) -> Self {
        Self {
            event: scored.event.clone(),
            score: scored.score,
        }
    }
}

/// Response for the recommendation and trending endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEventsResponse {
    #[serde(rename = "requestId")]
    pub request_id: String,
    pub events: Vec<RankedEvent>,
    pub strategy: RankingStrategy,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
