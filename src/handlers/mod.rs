pub mod admin;
pub mod bookings;
pub mod health;
pub mod options;
pub mod phone;
pub mod wizard;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/options", get(options::get_options))
        .route("/api/phone/mask", post(phone::mask))
        .route("/api/wizard", post(wizard::create))
        .route("/api/wizard/:id", get(wizard::show))
        .route("/api/wizard/:id/field", post(wizard::set_field))
        .route("/api/wizard/:id/advance", post(wizard::advance))
        .route("/api/wizard/:id/retreat", post(wizard::retreat))
        .route("/api/wizard/:id/submit", post(wizard::submit))
        .route("/api/wizard/:id/reset", post(wizard::reset))
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/admin/status", get(admin::get_status))
        .route("/api/admin/bookings", get(admin::get_bookings))
        .route("/api/admin/bookings/:id", get(admin::get_booking))
        .route("/api/admin/events", get(admin::events_stream))
        .with_state(state)
}
