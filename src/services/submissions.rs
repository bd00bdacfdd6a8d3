use std::sync::Arc;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingPayload, DeliveryStatus, Locale, Submission};
use crate::state::AppState;

/// Stores an accepted booking, announces it to admin listeners and hands it
/// to the sink. A failed delivery is recorded on the submission; the booking
/// itself still counts as accepted.
pub async fn accept(
    state: &Arc<AppState>,
    payload: BookingPayload,
    locale: Locale,
) -> Result<Submission, AppError> {
    let mut submission = Submission::new(payload, locale);

    {
        let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
        queries::insert_submission(&db, &submission)?;
    }

    tracing::info!(
        id = %submission.id,
        day = %submission.payload.selected_day,
        time = %submission.payload.selected_time,
        %locale,
        "booking accepted"
    );

    let status = match state.sink.deliver(&submission).await {
        Ok(()) => DeliveryStatus::Delivered,
        Err(e) => {
            tracing::error!(id = %submission.id, error = %e, "failed to deliver booking");
            DeliveryStatus::Failed
        }
    };

    {
        let db = state.db.lock().unwrap_or_else(|e| e.into_inner());
        queries::update_delivery_status(&db, &submission.id, status)?;
    }
    submission.delivery_status = status;

    // No admin listeners is fine.
    let _ = state.submissions_tx.send(submission.clone());

    Ok(submission)
}
