use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{BookingDraft, DeliveryStatus, Locale};
use crate::services::{i18n, masking, submissions, wizard};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub locale: Option<String>,
    #[serde(flatten)]
    pub draft: BookingDraft,
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    delivery_status: DeliveryStatus,
    summary: String,
}

// POST /api/bookings — whole form in one request, for clients that keep the
// draft themselves.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let locale = Locale::parse(
        request
            .locale
            .as_deref()
            .unwrap_or(&state.config.default_locale),
    );

    let mut draft = request.draft;
    draft.phone = masking::mask_phone(&draft.phone, draft.phone_country);
    let payload = wizard::build_payload(&draft).map_err(AppError::Validation)?;

    let summary = i18n::slot_summary(
        state.catalogs.get(locale),
        payload.selected_day,
        payload.selected_time,
    );
    let submission = submissions::accept(&state, payload, locale).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            id: submission.id,
            delivery_status: submission.delivery_status,
            summary,
        }),
    ))
}
