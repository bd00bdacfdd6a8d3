use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{DeliveryStatus, Submission};
use crate::services::sessions;
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/status
#[derive(Serialize)]
pub struct StatusResponse {
    active_sessions: usize,
    submissions_last_24h: i64,
    failed_deliveries: i64,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let active_sessions = {
        let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions::purge_expired(&mut sessions);
        sessions.len()
    };

    let since = chrono::Utc::now().naive_utc() - chrono::Duration::hours(24);
    let (submissions_last_24h, failed_deliveries) = {
        let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
        let recent = queries::count_submissions_since(&db, &since)?;
        let failed = queries::count_submissions_with_status(&db, DeliveryStatus::Failed)?;
        (recent, failed)
    };

    Ok(Json(StatusResponse {
        active_sessions,
        submissions_last_24h,
        failed_deliveries,
    }))
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Submission>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let status_filter = match query.status.as_deref() {
        Some(raw) => Some(
            raw.parse::<DeliveryStatus>()
                .map_err(|_| AppError::BadRequest(format!("unknown status: {raw}")))?,
        ),
        None => None,
    };

    let submissions = {
        let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
        queries::list_submissions(&db, status_filter, limit)?
    };

    Ok(Json(submissions))
}

// GET /api/admin/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Submission>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let submission = {
        let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
        queries::get_submission(&db, &id)?
    };

    submission
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

// GET /api/admin/events — SSE stream of new submissions
#[derive(Deserialize)]
pub struct SseQuery {
    pub token: Option<String>,
}

pub async fn events_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SseQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Auth via query param (EventSource can't set headers)
    let token = query.token.as_deref().unwrap_or("");
    if token != state.config.admin_token {
        return Err(AppError::Unauthorized);
    }

    let rx = state.submissions_tx.subscribe();

    let live_stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(submission) => {
            let data = serde_json::to_string(&submission).unwrap_or_default();
            Some(Ok(Event::default().data(data).event("booking")))
        }
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "admin event stream lagged");
            None
        }
    });

    let keepalive_stream = tokio_stream::StreamExt::map(
        tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(Duration::from_secs(30))),
        |_| Ok(Event::default().comment("keepalive")),
    );

    Ok(Sse::new(StreamExt::merge(live_stream, keepalive_stream)))
}
