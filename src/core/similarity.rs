use crate::models::{Event, UserPreferences};

/// Points for a ticket price inside the preferred price range
pub const PRICE_POINTS: u32 = 2;
/// Points for an event type listed in the preferred categories
pub const CATEGORY_POINTS: u32 = 3;
/// Points for a location containing the preferred location
pub const LOCATION_POINTS: u32 = 2;
/// Points for an event date inside the preferred date range
pub const DATE_POINTS: u32 = 2;

/// Highest similarity score an event can reach
pub const MAX_SIMILARITY_SCORE: u32 = PRICE_POINTS + CATEGORY_POINTS + LOCATION_POINTS + DATE_POINTS;

/// Calculate the similarity score (0-9) of an event against user preferences
///
/// Scoring table (each condition is independent):
/// - price within `priceRange` (inclusive): +2
/// - type in `categories`: +3
/// - location contains preferred location, case-insensitive: +2
/// - date within `dateRange` (inclusive, epoch millis): +2
pub fn similarity_score(event: &Event, preferences: &UserPreferences) -> u32 {
    let mut score = 0;

    if price_in_range(event.ticket_price, preferences.price_range) {
        score += PRICE_POINTS;
    }

    if preferences.categories.contains(&event.category) {
        score += CATEGORY_POINTS;
    }

    if location_matches(&event.location, &preferences.location) {
        score += LOCATION_POINTS;
    }

    if date_in_range(event.epoch_millis(), preferences.date_range) {
        score += DATE_POINTS;
    }

    score
}

#[inline]
fn price_in_range(price: f64, [min, max]: [f64; 2]) -> bool {
    price >= min && price <= max
}

/// An empty preferred location never matches
#[inline]
fn location_matches(event_location: &str, preferred: &str) -> bool {
    if preferred.is_empty() || event_location.is_empty() {
        return false;
    }

    event_location
        .to_lowercase()
        .contains(&preferred.to_lowercase())
}

#[inline]
fn date_in_range(epoch_millis: i64, [start, end]: [i64; 2]) -> bool {
    epoch_millis >= start && epoch_millis <= end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;
    use chrono::{TimeZone, Utc};

    fn create_test_event(price: f64, category: &str, location: &str) -> Event {
        Event {
            id: "evt".to_string(),
            title: "Test Event".to_string(),
            ticket_price: price,
            max_attendees: None,
            category: EventCategory::from(category),
            location: location.to_string(),
            date: Utc.with_ymd_and_hms(2026, 11, 1, 19, 0, 0).unwrap(),
            status: Default::default(),
            is_virtual: false,
            organizer_uid: None,
        }
    }

    fn create_test_preferences() -> UserPreferences {
        UserPreferences {
            price_range: [0.0, 100.0],
            categories: vec![EventCategory::Concert],
            location: "Berlin".to_string(),
            date_range: [
                Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap().timestamp_millis(),
                Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap().timestamp_millis(),
            ],
        }
    }

    #[test]
    fn test_full_match_scores_maximum() {
        let event = create_test_event(50.0, "concert", "Tempodrom, berlin");
        let preferences = create_test_preferences();

        assert_eq!(similarity_score(&event, &preferences), MAX_SIMILARITY_SCORE);
    }

    #[test]
    fn test_no_match_scores_zero() {
        let mut event = create_test_event(500.0, "gala", "Paris");
        event.date = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(similarity_score(&event, &create_test_preferences()), 0);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        assert!(price_in_range(0.0, [0.0, 100.0]));
        assert!(price_in_range(100.0, [0.0, 100.0]));
        assert!(!price_in_range(100.01, [0.0, 100.0]));
    }

    #[test]
    fn test_inverted_price_range_never_matches() {
        assert!(!price_in_range(50.0, [100.0, 0.0]));
    }

    #[test]
    fn test_empty_preferred_location_never_matches() {
        assert!(!location_matches("Berlin", ""));
        assert!(!location_matches("", "Berlin"));
        assert!(location_matches("BERLIN Mitte", "berlin"));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        assert!(date_in_range(10, [10, 20]));
        assert!(date_in_range(20, [10, 20]));
        assert!(!date_in_range(21, [10, 20]));
    }

    #[test]
    fn test_unknown_category_matches_same_tag() {
        let event = create_test_event(500.0, "meetup", "");
        let mut preferences = create_test_preferences();
        preferences.categories = vec![EventCategory::from("meetup")];
        preferences.date_range = [0, 0];

        assert_eq!(similarity_score(&event, &preferences), CATEGORY_POINTS);
    }
}
