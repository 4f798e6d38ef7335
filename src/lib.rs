//! Spotlight - event recommendation service for the Spotlight ticketing app
//!
//! This library provides the ranking engine behind the attendee dashboard:
//! personalized recommendations scored against user preferences, and a
//! trending list scored from each event's own attributes.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{RankingEngine, similarity_score, trending_score};
pub use crate::models::{Event, EventCategory, UserPreferences, ScoredEvent, RankedEventsResponse};
