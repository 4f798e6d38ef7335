use crate::models::{Event, EventStatus};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading the event catalog
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Read-only client for the event catalog
///
/// Talks to the document database's REST API (Appwrite databases API):
/// - Listing events by status (the attendee catalog)
/// - Listing events by organizer
/// - Fetching a single event
pub struct EventStore {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    events_collection: String,
    client: Client,
}

impl EventStore {
    /// Create a new event store client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        events_collection: String,
    ) -> Result<Self, EventStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            events_collection,
            client,
        })
    }

    /// List events with the given status, at most `limit` of them
    pub async fn list_events(
        &self,
        status: EventStatus,
        limit: usize,
    ) -> Result<Vec<Event>, EventStoreError> {
        let queries = vec![
            equal_query("status", status.as_str()),
            format!("limit({})", limit),
        ];

        let events = self.query_documents(&queries).await?;

        tracing::debug!("Listed {} {} events", events.len(), status.as_str());

        Ok(events)
    }

    /// List every event created by an organizer
    pub async fn list_events_by_organizer(
        &self,
        organizer_uid: &str,
    ) -> Result<Vec<Event>, EventStoreError> {
        let queries = vec![equal_query("organizerUid", organizer_uid)];

        let events = self.query_documents(&queries).await?;

        tracing::debug!("Organizer {} has {} events", organizer_uid, events.len());

        Ok(events)
    }

    /// Get a single event by its document ID
    pub async fn get_event(&self, event_id: &str) -> Result<Event, EventStoreError> {
        let url = format!("{}/{}", self.documents_url(), urlencoding::encode(event_id));

        let response = self.authorized_get(&url).send().await?;

        match response.status() {
            s if s == reqwest::StatusCode::NOT_FOUND => {
                return Err(EventStoreError::NotFound(format!("Event {} not found", event_id)));
            }
            s if s == reqwest::StatusCode::UNAUTHORIZED => return Err(EventStoreError::Unauthorized),
            s if !s.is_success() => {
                return Err(EventStoreError::ApiError(format!("Failed to fetch event: {}", s)));
            }
            _ => {}
        }

        let doc: Value = response.json().await?;
        let data = doc.get("data").unwrap_or(&doc);

        serde_json::from_value(data.clone())
            .map_err(|e| EventStoreError::InvalidResponse(format!("Failed to parse event: {}", e)))
    }

    async fn query_documents(&self, queries: &[String]) -> Result<Vec<Event>, EventStoreError> {
        let query_string = queries
            .iter()
            .map(|q| format!("queries[]={}", urlencoding::encode(q)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", self.documents_url(), query_string);

        tracing::debug!("Querying events: {}", url);

        let response = self.authorized_get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(EventStoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Event query failed: {} - {}", status, body);
            return Err(EventStoreError::ApiError(format!("Failed to query events: {}", status)));
        }

        let json: Value = response.json().await?;

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| EventStoreError::InvalidResponse("Missing documents array".into()))?;

        Ok(parse_documents(documents))
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.events_collection
        )
    }

    fn authorized_get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }
}

/// `equal` query on one attribute
///
/// Attribute and value are written as JSON string literals, so quotes and
/// brackets in a value stay inside the value.
fn equal_query(attribute: &str, value: &str) -> String {
    format!("equal({}, [{}])", Value::from(attribute), Value::from(value))
}

/// Parse store documents into events, skipping malformed ones
fn parse_documents(documents: &[Value]) -> Vec<Event> {
    documents
        .iter()
        .filter_map(|doc| {
            let data = doc.get("data").unwrap_or(doc);
            match serde_json::from_value::<Event>(data.clone()) {
                Ok(event) => Some(event),
                Err(e) => {
                    let id = doc.get("$id").and_then(|v| v.as_str()).unwrap_or("<unknown>");
                    tracing::warn!("Skipping malformed event document {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}
