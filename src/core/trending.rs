use chrono::{DateTime, Utc};
use crate::models::Event;

const MILLIS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Calculate the trending score (0-8) of an event relative to `now`
///
/// Scoring formula:
/// score = (
///     proximity_points +   # 3 if within a week, 2 if within a month
///     capacity_points +    # 3 above 100 seats, 2 above 50, 1 above 20
///     price_points         # 2 above 100, 1 above 50
/// )
pub fn trending_score(event: &Event, now: DateTime<Utc>) -> u32 {
    proximity_points(days_until(event.date, now))
        + capacity_points(event.max_attendees)
        + price_points(event.ticket_price)
}

/// Fractional days from `now` until `date`; negative for past events
#[inline]
pub fn days_until(date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (date - now).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Events that already started, or are more than 30 days out, get nothing
#[inline]
fn proximity_points(days: f64) -> u32 {
    if days > 0.0 && days <= 7.0 {
        3
    } else if days > 7.0 && days <= 30.0 {
        2
    } else {
        0
    }
}

#[inline]
fn capacity_points(max_attendees: Option<u32>) -> u32 {
    match max_attendees {
        Some(n) if n > 100 => 3,
        Some(n) if n > 50 => 2,
        Some(n) if n > 20 => 1,
        _ => 0,
    }
}

#[inline]
fn price_points(ticket_price: f64) -> u32 {
    if ticket_price > 100.0 {
        2
    } else if ticket_price > 50.0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCategory;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn create_test_event(days_out: i64, max_attendees: Option<u32>, price: f64) -> Event {
        Event {
            id: "evt".to_string(),
            title: "Test Event".to_string(),
            ticket_price: price,
            max_attendees,
            category: EventCategory::Conference,
            location: String::new(),
            date: now() + Duration::days(days_out),
            status: Default::default(),
            is_virtual: false,
            organizer_uid: None,
        }
    }

    #[test]
    fn test_days_until() {
        let date = now() + Duration::hours(36);
        assert!((days_until(date, now()) - 1.5).abs() < 1e-9);
        assert!(days_until(now() - Duration::days(2), now()) < 0.0);
    }

    #[test]
    fn test_proximity_tiers() {
        assert_eq!(proximity_points(0.0), 0);
        assert_eq!(proximity_points(0.5), 3);
        assert_eq!(proximity_points(7.0), 3);
        assert_eq!(proximity_points(7.5), 2);
        assert_eq!(proximity_points(30.0), 2);
        assert_eq!(proximity_points(30.5), 0);
        assert_eq!(proximity_points(-3.0), 0);
    }

    #[test]
    fn test_capacity_tiers() {
        assert_eq!(capacity_points(None), 0);
        assert_eq!(capacity_points(Some(20)), 0);
        assert_eq!(capacity_points(Some(21)), 1);
        assert_eq!(capacity_points(Some(50)), 1);
        assert_eq!(capacity_points(Some(51)), 2);
        assert_eq!(capacity_points(Some(100)), 2);
        assert_eq!(capacity_points(Some(101)), 3);
    }

    #[test]
    fn test_price_tiers() {
        assert_eq!(price_points(0.0), 0);
        assert_eq!(price_points(50.0), 0);
        assert_eq!(price_points(75.0), 1);
        assert_eq!(price_points(100.0), 1);
        assert_eq!(price_points(150.0), 2);
    }

    #[test]
    fn test_trending_score_combines_tiers() {
        let event = create_test_event(3, Some(150), 120.0);
        assert_eq!(trending_score(&event, now()), 8);

        let past = create_test_event(-1, Some(150), 120.0);
        assert_eq!(trending_score(&past, now()), 5);
    }

    #[test]
    fn test_score_depends_on_supplied_now() {
        let event = create_test_event(10, None, 0.0);
        assert_eq!(trending_score(&event, now()), 2);
        assert_eq!(trending_score(&event, now() + Duration::days(5)), 3);
        assert_eq!(trending_score(&event, now() + Duration::days(11)), 0);
    }
}
