use chrono::{DateTime, Utc};
use crate::models::{Event, ScoredEvent, UserPreferences};
use crate::core::{similarity::similarity_score, trending::trending_score};

/// Ranking engine for the event catalog
///
/// Stateless and pure: both strategies score every event in the catalog,
/// sort by score descending while keeping the catalog order between equal
/// scores, and return at most `limit` events borrowed from the input slice.
#[derive(Debug, Clone, Copy)]
pub struct RankingEngine {
    default_limit: usize,
}

impl RankingEngine {
    pub const DEFAULT_LIMIT: usize = 3;

    pub fn new(default_limit: usize) -> Self {
        Self { default_limit }
    }

    /// Limit used when a caller does not ask for one
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Personalized recommendations for the given preferences
    ///
    /// # Arguments
    /// * `preferences` - Price, category, location and date preferences
    /// * `events` - The candidate catalog
    /// * `limit` - Maximum number of events to return
    ///
    /// # Returns
    /// The top `min(limit, events.len())` events, best first
    pub fn recommend<'a>(
        &self,
        preferences: &UserPreferences,
        events: &'a [Event],
        limit: usize,
    ) -> Vec<&'a Event> {
        into_events(self.score_recommendations(preferences, events, limit))
    }

    /// Same as [`recommend`](Self::recommend) but keeps the scores
    pub fn score_recommendations<'a>(
        &self,
        preferences: &UserPreferences,
        events: &'a [Event],
        limit: usize,
    ) -> Vec<ScoredEvent<'a>> {
        rank_by(events, limit, |event| similarity_score(event, preferences))
    }

    /// Trending events as of `now`
    ///
    /// # Arguments
    /// * `events` - The candidate catalog
    /// * `limit` - Maximum number of events to return
    /// * `now` - Reference time for the date proximity tiers
    pub fn trending<'a>(
        &self,
        events: &'a [Event],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<&'a Event> {
        into_events(self.score_trending(events, limit, now))
    }

    /// Same as [`trending`](Self::trending) but keeps the scores
    pub fn score_trending<'a>(
        &self,
        events: &'a [Event],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<ScoredEvent<'a>> {
        rank_by(events, limit, |event| trending_score(event, now))
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

fn rank_by<'a, F>(events: &'a [Event], limit: usize, score: F) -> Vec<ScoredEvent<'a>>
where
    F: Fn(&Event) -> u32,
{
    if events.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredEvent<'a>> = events
        .iter()
        .map(|event| ScoredEvent {
            event,
            score: score(event),
        })
        .collect();

    // sort_by is stable: ties keep catalog order
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);

    scored
}

#[inline]
fn into_events<'a>(scored: Vec<ScoredEvent<'a>>) -> Vec<&'a Event> {
    scored.into_iter().map(|s| s.event).collect()
}
