// Event store client tests against a mocked document API

use mockito::Matcher;
use serde_json::json;
use spotlight::models::{EventCategory, EventStatus};
use spotlight::services::{EventStore, EventStoreError};

const DOCUMENTS_PATH: &str = "/databases/test_db/collections/events/documents";

fn create_store(server: &mockito::ServerGuard) -> EventStore {
    EventStore::new(
        server.url(),
        "test_key".to_string(),
        "test_project".to_string(),
        "test_db".to_string(),
        "events".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_list_upcoming_events() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_header("X-Appwrite-Key", "test_key")
        .match_header("X-Appwrite-Project", "test_project")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("queries[]".into(), "equal(\"status\", [\"upcoming\"])".into()),
            Matcher::UrlEncoded("queries[]".into(), "limit(20)".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 3,
                "documents": [
                    {
                        "$id": "evt_1",
                        "title": "Harbour Concert",
                        "ticketPrice": 45,
                        "maxAttendees": 300,
                        "type": "concert",
                        "location": "Hamburg",
                        "date": "2026-10-25T19:00:00Z",
                        "status": "upcoming"
                    },
                    { "$id": "evt_broken", "date": 12 },
                    {
                        "$id": "evt_2",
                        "ticketPrice": 0,
                        "type": "meetup",
                        "date": "2026-11-02T09:00:00Z",
                        "status": "upcoming",
                        "isVirtual": true
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = create_store(&server);
    let events = store.list_events(EventStatus::Upcoming, 20).await.unwrap();

    mock.assert_async().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "evt_1");
    assert_eq!(events[0].max_attendees, Some(300));
    assert_eq!(events[1].category, EventCategory::from("meetup"));
    assert!(events[1].is_virtual);
}

#[tokio::test]
async fn test_list_events_by_organizer() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::UrlEncoded(
            "queries[]".into(),
            "equal(\"organizerUid\", [\"org_42\"])".into(),
        ))
        .with_status(200)
        .with_body(
            json!({
                "total": 1,
                "documents": [{
                    "$id": "evt_9",
                    "type": "workshop",
                    "date": "2026-12-01T10:00:00Z",
                    "organizerUid": "org_42"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = create_store(&server);
    let events = store.list_events_by_organizer("org_42").await.unwrap();

    mock.assert_async().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].organizer_uid.as_deref(), Some("org_42"));
}

#[tokio::test]
async fn test_get_event_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", format!("{}/missing", DOCUMENTS_PATH).as_str())
        .with_status(404)
        .create_async()
        .await;

    let store = create_store(&server);
    let result = store.get_event("missing").await;

    assert!(matches!(result, Err(EventStoreError::NotFound(_))));
}

#[tokio::test]
async fn test_get_event() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", format!("{}/evt_1", DOCUMENTS_PATH).as_str())
        .with_status(200)
        .with_body(
            json!({
                "$id": "evt_1",
                "ticketPrice": 120,
                "type": "gala",
                "date": "2026-11-20T20:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = create_store(&server);
    let event = store.get_event("evt_1").await.unwrap();

    assert_eq!(event.category, EventCategory::Gala);
    assert_eq!(event.ticket_price, 120.0);
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let store = create_store(&server);
    let result = store.list_events(EventStatus::Upcoming, 5).await;

    assert!(matches!(result, Err(EventStoreError::Unauthorized)));
}

#[tokio::test]
async fn test_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let store = create_store(&server);
    let result = store.list_events(EventStatus::Upcoming, 5).await;

    assert!(matches!(result, Err(EventStoreError::ApiError(_))));
}

#[tokio::test]
async fn test_missing_documents_array() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "total": 0 }).to_string())
        .create_async()
        .await;

    let store = create_store(&server);
    let result = store.list_events(EventStatus::Live, 5).await;

    assert!(matches!(result, Err(EventStoreError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_null_attributes_are_ranked_not_dropped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "total": 2,
                "documents": [
                    {
                        "$id": "evt_no_location",
                        "title": null,
                        "ticketPrice": 10,
                        "maxAttendees": null,
                        "type": null,
                        "location": null,
                        "date": "2026-11-01T20:00:00Z",
                        "status": "upcoming",
                        "isVirtual": null,
                        "organizerUid": null
                    },
                    {
                        "$id": "evt_offset_date",
                        "type": "webinar",
                        "location": "Online",
                        "date": "2026-11-01T20:00:00.000+00:00"
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = create_store(&server);
    let events = store.list_events(EventStatus::Upcoming, 20).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "evt_no_location");
    assert!(events[0].location.is_empty());
    assert_eq!(events[0].ticket_price, 10.0);
    assert_eq!(events[0].category, EventCategory::default());
    assert_eq!(events[1].category, EventCategory::Webinar);
}

#[tokio::test]
async fn test_organizer_uid_cannot_rewrite_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::UrlEncoded(
            "queries[]".into(),
            r#"equal("organizerUid", ["x\"]),limit(1000"])"#.into(),
        ))
        .with_status(200)
        .with_body(json!({ "total": 0, "documents": [] }).to_string())
        .create_async()
        .await;

    let store = create_store(&server);
    let events = store
        .list_events_by_organizer(r#"x"]),limit(1000"#)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(events.is_empty());
}
