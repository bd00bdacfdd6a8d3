use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DeliveryStatus, FieldUpdate, Locale};
use crate::services::sessions::{self, WizardSession};
use crate::services::submissions;
use crate::services::views::{self, WizardView};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    id: Uuid,
    locale: Locale,
    #[serde(flatten)]
    view: WizardView,
}

#[derive(Serialize)]
pub struct MoveResponse {
    moved: bool,
    #[serde(flatten)]
    session: SessionResponse,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    submission_id: String,
    delivery_status: DeliveryStatus,
    #[serde(flatten)]
    session: SessionResponse,
}

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub locale: Option<String>,
}

fn respond(state: &AppState, id: Uuid, session: &WizardSession) -> SessionResponse {
    SessionResponse {
        id,
        locale: session.locale,
        view: views::render(&session.wizard, state.catalogs.get(session.locale)),
    }
}

// POST /api/wizard
pub async fn create(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSessionRequest>>,
) -> (StatusCode, Json<SessionResponse>) {
    let request = body.map(|Json(b)| b).unwrap_or_default();
    let locale = Locale::parse(
        request
            .locale
            .as_deref()
            .unwrap_or(&state.config.default_locale),
    );

    let (id, session) = sessions::create_session(&state, locale);
    (StatusCode::CREATED, Json(respond(&state, id, &session)))
}

// GET /api/wizard/:id
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = sessions::with_session(&state, id, |session| respond(&state, id, session))?;
    Ok(Json(response))
}

// POST /api/wizard/:id/field
pub async fn set_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = sessions::with_session(&state, id, |session| {
        if session.wizard.set_field(update) {
            Ok(respond(&state, id, session))
        } else {
            Err(AppError::BadRequest(
                "booking was already submitted".to_string(),
            ))
        }
    })??;
    Ok(Json(response))
}

// POST /api/wizard/:id/advance
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MoveResponse>, AppError> {
    let response = sessions::with_session(&state, id, |session| {
        let moved = session.wizard.advance();
        MoveResponse {
            moved,
            session: respond(&state, id, session),
        }
    })?;
    Ok(Json(response))
}

// POST /api/wizard/:id/retreat
pub async fn retreat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MoveResponse>, AppError> {
    let response = sessions::with_session(&state, id, |session| {
        let moved = session.wizard.retreat();
        MoveResponse {
            moved,
            session: respond(&state, id, session),
        }
    })?;
    Ok(Json(response))
}

// POST /api/wizard/:id/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    let (outcome, locale) = sessions::with_session(&state, id, |session| {
        (session.wizard.prepare_submit(), session.locale)
    })?;
    let payload = outcome?;

    // The draft stays editable until the booking is stored, so a failed
    // insert can be retried.
    let submission = submissions::accept(&state, payload.clone(), locale).await?;

    let session = sessions::with_session(&state, id, |session| {
        session.wizard.confirm_submit(&payload);
        respond(&state, id, session)
    })?;
    Ok(Json(SubmitResponse {
        submission_id: submission.id,
        delivery_status: submission.delivery_status,
        session,
    }))
}

// POST /api/wizard/:id/reset
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let response = sessions::with_session(&state, id, |session| {
        session.wizard.reset();
        respond(&state, id, session)
    })?;
    Ok(Json(response))
}
