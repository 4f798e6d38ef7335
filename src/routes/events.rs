use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::future::Future;
use std::sync::Arc;
use validator::Validate;
use crate::config::RankingSettings;
use crate::core::RankingEngine;
use crate::models::{
    ErrorResponse, Event, EventStatus, HealthResponse, LimitQuery, RankedEvent,
    RankedEventsResponse, RankingStrategy, RecommendRequest, TrendingRequest,
    UpsertPreferencesRequest, UserPreferences,
};
use crate::services::{CacheKey, CacheManager, EventStore, EventStoreError, PostgresClient, PostgresError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub engine: RankingEngine,
    pub ranking: RankingSettings,
}

/// Configure all event ranking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/events/recommend", web::post().to(recommend))
        .route("/events/trending", web::post().to(trending))
        .route("/events/trending", web::get().to(trending_catalog))
        .route("/events/{event_id}", web::get().to(get_event))
        .route("/organizers/{organizer_uid}/trending", web::get().to(organizer_trending))
        .route("/preferences/{user_id}", web::put().to(put_preferences))
        .route("/preferences/{user_id}", web::get().to(get_preferences))
        .route("/preferences/{user_id}", web::delete().to(delete_preferences));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Personalized recommendations
///
/// POST /api/v1/events/recommend
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "preferences": {
///     "priceRange": [0, 100],
///     "categories": ["concert"],
///     "location": "berlin",
///     "dateRange": [0, 1900000000000]
///   },
///   "events": [],
///   "limit": 3
/// }
/// ```
/// Every field is optional, but either `preferences` or `userId` is needed.
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    if let Some(Err(response)) = req.user_id.as_deref().map(check_user_id) {
        return response;
    }

    let limit = resolve_limit(req.limit, state.engine.default_limit(), state.ranking.max_limit);

    let app: &AppState = &state;
    let preferences = match resolve_preferences(req.preferences, req.user_id.as_deref(), |user_id| async move {
        stored_preferences(app, &user_id).await
    })
    .await
    {
        Ok(preferences) => preferences,
        Err(response) => return response,
    };

    let catalog = match resolve_catalog(req.events, || upcoming_catalog(app)).await {
        Ok(events) => events,
        Err(response) => return response,
    };

    let events: Vec<RankedEvent> = state
        .engine
        .score_recommendations(&preferences, &catalog, limit)
        .into_iter()
        .map(RankedEvent::from)
        .collect();

    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Returning {} recommendations (from {} candidates, user: {}, request: {})",
        events.len(),
        catalog.len(),
        req.user_id.as_deref().unwrap_or("anonymous"),
        request_id
    );

    HttpResponse::Ok().json(RankedEventsResponse {
        request_id,
        events,
        strategy: RankingStrategy::Personalized,
        total_candidates: catalog.len(),
    })
}

/// Trending events over a supplied or stored catalog
///
/// POST /api/v1/events/trending
///
/// Request body:
/// ```json
/// { "events": [], "limit": 3 }
/// ```
async fn trending(
    state: web::Data<AppState>,
    req: web::Json<TrendingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let limit = resolve_limit(req.limit, state.engine.default_limit(), state.ranking.max_limit);

    let catalog = match resolve_catalog(req.events, || upcoming_catalog(&state)).await {
        Ok(events) => events,
        Err(response) => return response,
    };

    trending_response(&state, &catalog, limit)
}

/// Trending events over the upcoming catalog
///
/// GET /api/v1/events/trending?limit={limit}
async fn trending_catalog(
    state: web::Data<AppState>,
    query: web::Query<LimitQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let limit = resolve_limit(query.limit, state.engine.default_limit(), state.ranking.max_limit);

    match upcoming_catalog(&state).await {
        Ok(catalog) => trending_response(&state, &catalog, limit),
        Err(e) => catalog_unavailable(e),
    }
}

/// A single catalog event
///
/// GET /api/v1/events/{eventId}
async fn get_event(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let event_id = path.into_inner();

    match state.store.get_event(&event_id).await {
        Ok(event) => HttpResponse::Ok().json(event),
        Err(EventStoreError::NotFound(message)) => {
            error_response(StatusCode::NOT_FOUND, "Event not found", message)
        }
        Err(e) => {
            tracing::error!("Failed to fetch event {}: {}", event_id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to fetch event", e.to_string())
        }
    }
}

/// Trending events of one organizer
///
/// GET /api/v1/organizers/{organizerUid}/trending?limit={limit}
async fn organizer_trending(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let organizer_uid = path.into_inner();
    let limit = resolve_limit(query.limit, state.engine.default_limit(), state.ranking.max_limit);

    let key = CacheKey::organizer_catalog(&organizer_uid);
    let catalog = cached_catalog(&state.cache, &key, || {
        state.store.list_events_by_organizer(&organizer_uid)
    })
    .await;

    match catalog {
        Ok(catalog) => trending_response(&state, &catalog, limit),
        Err(e) => catalog_unavailable(e),
    }
}

/// Store a preference profile
///
/// PUT /api/v1/preferences/{userId}
async fn put_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpsertPreferencesRequest>,
) -> impl Responder {
    let user_id = path.into_inner();
    if let Err(response) = check_user_id(&user_id) {
        return response;
    }

    match state.postgres.upsert_preferences(&user_id, &req.preferences).await {
        Ok(profile) => {
            if let Err(e) = state.cache.delete(&CacheKey::preferences(&user_id)).await {
                tracing::warn!("Failed to invalidate cached preferences for {}: {}", user_id, e);
            }
            tracing::info!("Stored preferences for user {}", user_id);
            HttpResponse::Ok().json(profile)
        }
        Err(e) => {
            tracing::error!("Failed to store preferences for {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store preferences", e.to_string())
        }
    }
}

/// Fetch a stored preference profile
///
/// GET /api/v1/preferences/{userId}
async fn get_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.postgres.get_preferences(&user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(PostgresError::NotFound(message)) => {
            error_response(StatusCode::NOT_FOUND, "Preferences not found", message)
        }
        Err(e) => {
            tracing::error!("Failed to fetch preferences for {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch preferences", e.to_string())
        }
    }
}

/// Remove a stored preference profile
///
/// DELETE /api/v1/preferences/{userId}
async fn delete_preferences(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = path.into_inner();

    match state.postgres.delete_preferences(&user_id).await {
        Ok(true) => {
            if let Err(e) = state.cache.delete(&CacheKey::preferences(&user_id)).await {
                tracing::warn!("Failed to invalidate cached preferences for {}: {}", user_id, e);
            }
            tracing::info!("Deleted preferences for user {}", user_id);
            HttpResponse::NoContent().finish()
        }
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            "Preferences not found",
            format!("No preferences stored for user {}", user_id),
        ),
        Err(e) => {
            tracing::error!("Failed to delete preferences for {}: {}", user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete preferences", e.to_string())
        }
    }
}

fn trending_response(state: &AppState, catalog: &[Event], limit: usize) -> HttpResponse {
    let now = chrono::Utc::now();

    let events: Vec<RankedEvent> = state
        .engine
        .score_trending(catalog, limit, now)
        .into_iter()
        .map(RankedEvent::from)
        .collect();

    let request_id = uuid::Uuid::new_v4().to_string();

    tracing::info!(
        "Returning {} trending events (from {} candidates, request: {})",
        events.len(),
        catalog.len(),
        request_id
    );

    HttpResponse::Ok().json(RankedEventsResponse {
        request_id,
        events,
        strategy: RankingStrategy::Trending,
        total_candidates: catalog.len(),
    })
}

/// Preferences for a recommend request
///
/// Inline preferences win. Otherwise the stored profile of `user_id` is
/// loaded (404 when there is none). Without either the request is a 400.
async fn resolve_preferences<F, Fut>(
    inline: Option<UserPreferences>,
    user_id: Option<&str>,
    load_stored: F,
) -> Result<UserPreferences, HttpResponse>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<UserPreferences, PostgresError>>,
{
    match (inline, user_id) {
        (Some(preferences), _) => Ok(preferences),
        (None, Some(user_id)) => match load_stored(user_id.to_string()).await {
            Ok(preferences) => Ok(preferences),
            Err(PostgresError::NotFound(message)) => {
                Err(error_response(StatusCode::NOT_FOUND, "Preferences not found", message))
            }
            Err(e) => {
                tracing::error!("Failed to load preferences for {}: {}", user_id, e);
                Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load preferences",
                    e.to_string(),
                ))
            }
        },
        (None, None) => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Missing preferences",
            "Either preferences or userId is required",
        )),
    }
}

/// Catalog for a ranking request: inline events win over the stored catalog
async fn resolve_catalog<F, Fut>(
    inline: Option<Vec<Event>>,
    fetch_stored: F,
) -> Result<Vec<Event>, HttpResponse>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Event>, EventStoreError>>,
{
    match inline {
        Some(events) => Ok(events),
        None => fetch_stored().await.map_err(catalog_unavailable),
    }
}

fn check_user_id(user_id: &str) -> Result<(), HttpResponse> {
    if user_id.trim().is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "userId must not be empty",
        ));
    }
    Ok(())
}

/// Upcoming events, served from cache when possible
async fn upcoming_catalog(state: &AppState) -> Result<Vec<Event>, EventStoreError> {
    let limit = state.ranking.catalog_limit;
    let key = CacheKey::upcoming_catalog(limit);

    cached_catalog(&state.cache, &key, || {
        state.store.list_events(EventStatus::Upcoming, limit)
    })
    .await
}

/// Read a catalog through the cache, falling back to the store
///
/// Cache failures are logged and never fail the request.
async fn cached_catalog<F, Fut>(
    cache: &CacheManager,
    key: &str,
    fetch: F,
) -> Result<Vec<Event>, EventStoreError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<Event>, EventStoreError>>,
{
    match cache.get::<Vec<Event>>(key).await {
        Ok(events) => {
            tracing::debug!("Catalog cache hit: {} ({} events)", key, events.len());
            return Ok(events);
        }
        Err(e) if e.is_miss() => {}
        Err(e) => tracing::warn!("Catalog cache read failed for {}, using store: {}", key, e),
    }

    let events = fetch().await?;

    if let Err(e) = cache.set(key, &events).await {
        tracing::warn!("Failed to cache catalog {}: {}", key, e);
    }

    Ok(events)
}

/// Stored preferences, served from cache when possible
async fn stored_preferences(state: &AppState, user_id: &str) -> Result<UserPreferences, PostgresError> {
    let key = CacheKey::preferences(user_id);

    if let Ok(preferences) = state.cache.get::<UserPreferences>(&key).await {
        return Ok(preferences);
    }

    let profile = state.postgres.get_preferences(user_id).await?;

    if let Err(e) = state.cache.set(&key, &profile.preferences).await {
        tracing::warn!("Failed to cache preferences for {}: {}", user_id, e);
    }

    Ok(profile.preferences)
}

/// Requested limit, falling back to the default and capped at `max_limit`
fn resolve_limit(requested: Option<u16>, default_limit: usize, max_limit: usize) -> usize {
    requested
        .map(usize::from)
        .unwrap_or(default_limit)
        .min(max_limit)
}

fn catalog_unavailable(e: EventStoreError) -> HttpResponse {
    tracing::error!("Failed to load event catalog: {}", e);
    error_response(StatusCode::BAD_GATEWAY, "Failed to load event catalog", e.to_string())
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    tracing::info!("Validation failed: {:?}", errors);
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string())
}

fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(error, message, status.as_u16()))
}
