use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tokio::sync::broadcast;
use tower::ServiceExt;

use kelme_booking::config::AppConfig;
use kelme_booking::db;
use kelme_booking::handlers;
use kelme_booking::models::Submission;
use kelme_booking::services::delivery::BookingSink;
use kelme_booking::services::i18n::Catalogs;
use kelme_booking::state::AppState;

// ── Mock Sinks ──

struct MockSink {
    delivered: Arc<Mutex<Vec<Submission>>>,
}

#[async_trait]
impl BookingSink for MockSink {
    async fn deliver(&self, submission: &Submission) -> anyhow::Result<()> {
        self.delivered.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

struct FailingSink;

#[async_trait]
impl BookingSink for FailingSink {
    async fn deliver(&self, _submission: &Submission) -> anyhow::Result<()> {
        anyhow::bail!("CRM unavailable")
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        default_locale: "en".to_string(),
        webhook_url: None,
        webhook_secret: String::new(),
        allowed_origin: None,
        session_ttl_minutes: 30,
    }
}

fn state_with_sink(sink: Box<dyn BookingSink>) -> Arc<AppState> {
    let (submissions_tx, _) = broadcast::channel(16);
    Arc::new(AppState {
        db: Arc::new(Mutex::new(db::init_db(":memory:").unwrap())),
        config: test_config(),
        sink,
        catalogs: Catalogs::load().unwrap(),
        sessions: Mutex::new(HashMap::new()),
        submissions_tx,
    })
}

fn test_state() -> (Arc<AppState>, Arc<Mutex<Vec<Submission>>>) {
    let delivered = Arc::new(Mutex::new(vec![]));
    let state = state_with_sink(Box::new(MockSink {
        delivered: Arc::clone(&delivered),
    }));
    (state, delivered)
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_session(state: &Arc<AppState>, locale: &str) -> String {
    let (status, json) = send(
        state,
        post_json("/api/wizard", serde_json::json!({ "locale": locale })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

async fn set_field(
    state: &Arc<AppState>,
    id: &str,
    field: &str,
    value: serde_json::Value,
) -> serde_json::Value {
    let (status, json) = send(
        state,
        post_json(
            &format!("/api/wizard/{id}/field"),
            serde_json::json!({ "field": field, "value": value }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    json
}

async fn fill_contact(state: &Arc<AppState>, id: &str) {
    set_field(state, id, "phoneCountry", "BR".into()).await;
    set_field(state, id, "name", "Ana Souza".into()).await;
    set_field(state, id, "email", "ana@kelme.studio".into()).await;
    set_field(state, id, "phone", "11999998888".into()).await;
}

// ── Basic Endpoints ──

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let (status, json) = send(&state, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_options_per_locale() {
    let (state, _) = test_state();

    let (status, json) = send(&state, get("/api/options")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["variant"], "US");
    assert_eq!(json["layout"], "stepped");
    assert_eq!(json["default_country"], "US");
    assert_eq!(json["days"].as_array().unwrap().len(), 6);
    assert_eq!(json["times"].as_array().unwrap().len(), 9);
    assert_eq!(json["times"][5]["label"], "2 PM");

    let (_, json) = send(&state, get("/api/options?locale=pt-BR")).await;
    assert_eq!(json["variant"], "BR");
    assert_eq!(json["layout"], "single_page");
    assert_eq!(json["default_country"], "BR");
    let brazil = json["countries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["code"] == "BR")
        .unwrap();
    assert_eq!(brazil["dial_code"], "+55");
    assert_eq!(brazil["max_digits"], 11);
    assert_eq!(brazil["mask"], "(##) #####-####");
}

#[tokio::test]
async fn test_phone_mask_endpoint() {
    let (state, _) = test_state();
    let (status, json) = send(
        &state,
        post_json(
            "/api/phone/mask",
            serde_json::json!({ "country": "BR", "input": "11999998888" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["masked"], "(11) 99999-8888");
    assert_eq!(json["digits"], 11);
    assert_eq!(json["complete"], true);

    let (_, json) = send(
        &state,
        post_json(
            "/api/phone/mask",
            serde_json::json!({ "country": "US", "input": "555" }),
        ),
    )
    .await;
    assert_eq!(json["masked"], "(555");
    assert_eq!(json["complete"], false);
}

// ── Wizard Sessions ──

#[tokio::test]
async fn test_create_session_defaults_to_english_stepped() {
    let (state, _) = test_state();
    let (status, json) = send(&state, post_empty("/api/wizard")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["locale"], "en");
    assert_eq!(json["step"], 1);
    assert_eq!(json["total_steps"], 3);
    assert_eq!(json["sections"][0]["section"], "schedule");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (state, _) = test_state();
    let (status, _) = send(
        &state,
        get("/api/wizard/00000000-0000-0000-0000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_advance_blocked_until_day_and_time() {
    let (state, _) = test_state();
    let id = create_session(&state, "en").await;

    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["moved"], false);
    assert_eq!(json["step"], 1);
    assert_eq!(json["sections"][0]["day_error"], "This field is required");

    set_field(&state, &id, "selectedDay", "tuesday".into()).await;
    let json = set_field(&state, &id, "selectedTime", "14:00".into()).await;
    assert!(json["sections"][0].get("day_error").is_none());

    let (_, json) = send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;
    assert_eq!(json["moved"], true);
    assert_eq!(json["step"], 2);
    assert_eq!(json["direction"], "forward");
    assert_eq!(json["sections"][0]["section"], "contact");
}

#[tokio::test]
async fn test_bad_email_blocks_contact_step() {
    let (state, _) = test_state();
    let id = create_session(&state, "en").await;
    set_field(&state, &id, "selectedDay", "tuesday".into()).await;
    set_field(&state, &id, "selectedTime", "14:00".into()).await;
    send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;

    fill_contact(&state, &id).await;
    set_field(&state, &id, "email", "not-an-email".into()).await;

    let (_, json) = send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;
    assert_eq!(json["moved"], false);
    assert_eq!(json["step"], 2);
    let contact = &json["sections"][0];
    assert_eq!(contact["email"]["error"], "Please enter a valid email address");
    assert!(contact["name"].get("error").is_none());
    assert!(contact["phone"].get("error").is_none());
}

#[tokio::test]
async fn test_country_change_clears_phone() {
    let (state, _) = test_state();
    let id = create_session(&state, "en").await;
    set_field(&state, &id, "selectedDay", "monday".into()).await;
    set_field(&state, &id, "selectedTime", "09:00".into()).await;
    send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;

    let json = set_field(&state, &id, "phone", "5551234567".into()).await;
    assert_eq!(json["sections"][0]["phone"]["value"], "(555) 123-4567");

    let json = set_field(&state, &id, "phoneCountry", "PT".into()).await;
    assert_eq!(json["sections"][0]["phone"]["value"], "");
    assert_eq!(json["sections"][0]["phone"]["placeholder"], "912 345 678");
}

#[tokio::test]
async fn test_full_wizard_flow_submits_and_resets() {
    let (state, delivered) = test_state();
    let id = create_session(&state, "en").await;

    set_field(&state, &id, "selectedDay", "tuesday".into()).await;
    set_field(&state, &id, "selectedTime", "14:00".into()).await;
    send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;
    fill_contact(&state, &id).await;
    let (_, json) = send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;
    assert_eq!(json["step"], 3);
    assert_eq!(json["sections"][0]["summary"], "Tuesday at 2 PM");

    set_field(&state, &id, "message", "New site for our studio".into()).await;

    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["submitted"], true);
    assert_eq!(json["delivery_status"], "delivered");
    assert_eq!(json["success"]["summary"], "Tuesday at 2 PM");
    assert_eq!(json["progress"], 1.0);

    {
        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        let payload = &delivered[0].payload;
        assert_eq!(payload.phone, "+55 (11) 99999-8888");
        assert_eq!(payload.company, None);
        assert_eq!(payload.message.as_deref(), Some("New site for our studio"));
    }

    // A second submit is rejected and nothing more is delivered.
    let (status, _) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(delivered.lock().unwrap().len(), 1);

    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/reset"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["step"], 1);
    assert_eq!(json["submitted"], false);
    let schedule = &json["sections"][0];
    assert!(schedule["days"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["selected"] == false));
}

#[tokio::test]
async fn test_submit_can_be_retried_after_storage_failure() {
    let (state, delivered) = test_state();
    let id = create_session(&state, "en").await;
    set_field(&state, &id, "selectedDay", "tuesday".into()).await;
    set_field(&state, &id, "selectedTime", "14:00".into()).await;
    send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;
    fill_contact(&state, &id).await;
    send(&state, post_empty(&format!("/api/wizard/{id}/advance"))).await;

    state
        .db
        .lock()
        .unwrap()
        .execute_batch("ALTER TABLE submissions RENAME TO submissions_offline")
        .unwrap();

    let (status, _) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(delivered.lock().unwrap().is_empty());

    let (_, json) = send(&state, get(&format!("/api/wizard/{id}"))).await;
    assert_eq!(json["submitted"], false);
    assert_eq!(json["step"], 3);
    assert_eq!(json["sections"][0]["summary"], "Tuesday at 2 PM");

    state
        .db
        .lock()
        .unwrap()
        .execute_batch("ALTER TABLE submissions_offline RENAME TO submissions")
        .unwrap();

    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["submitted"], true);
    assert_eq!(json["delivery_status"], "delivered");
    assert_eq!(delivered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_before_last_step_rejected() {
    let (state, delivered) = test_state();
    let id = create_session(&state, "en").await;
    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("last step"));
    assert!(delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_single_page_submit_reports_all_errors() {
    let (state, delivered) = test_state();
    let id = create_session(&state, "pt").await;

    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["fields"].as_array().unwrap().len(), 5);

    let (_, json) = send(&state, get(&format!("/api/wizard/{id}"))).await;
    assert_eq!(json["layout"], "single_page");
    assert_eq!(json["sections"].as_array().unwrap().len(), 3);
    assert_eq!(json["sections"][1]["name"]["error"], "Campo obrigatório");

    set_field(&state, &id, "selectedDay", "friday".into()).await;
    set_field(&state, &id, "selectedTime", "10:00".into()).await;
    set_field(&state, &id, "name", "Ana".into()).await;
    set_field(&state, &id, "email", "ana@kelme.studio".into()).await;
    set_field(&state, &id, "phone", "(11) 99999-8888".into()).await;

    let (status, json) = send(&state, post_empty(&format!("/api/wizard/{id}/submit"))).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["success"]["summary"], "Sexta-feira às 10h");
    assert_eq!(delivered.lock().unwrap()[0].locale.to_string(), "pt");
}

// ── Stateless Bookings ──

#[tokio::test]
async fn test_create_booking_stateless() {
    let (state, delivered) = test_state();
    let (status, json) = send(
        &state,
        post_json(
            "/api/bookings",
            serde_json::json!({
                "selectedDay": "tuesday",
                "selectedTime": "14:00",
                "name": "Jo Smith",
                "email": "jo@example.com",
                "phone": "5551234567",
                "phoneCountry": "US",
                "company": "Acme"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["summary"], "Tuesday at 2 PM");
    assert_eq!(json["delivery_status"], "delivered");

    let delivered = delivered.lock().unwrap();
    assert_eq!(delivered[0].payload.phone, "+1 (555) 123-4567");
    assert_eq!(delivered[0].payload.company.as_deref(), Some("Acme"));
}

#[tokio::test]
async fn test_create_booking_validation_errors() {
    let (state, delivered) = test_state();
    let (status, json) = send(
        &state,
        post_json(
            "/api/bookings",
            serde_json::json!({
                "selectedDay": "tuesday",
                "selectedTime": "14:00",
                "name": "Jo",
                "email": "not-an-email",
                "phone": "555123",
                "phoneCountry": "US"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = json["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["field"], "email");
    assert_eq!(fields[0]["kind"], "invalid_email");
    assert_eq!(fields[1]["field"], "phone");
    assert_eq!(fields[1]["kind"], "incomplete_phone");
    assert!(delivered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_delivery_still_accepts_booking() {
    let state = state_with_sink(Box::new(FailingSink));
    let (status, json) = send(
        &state,
        post_json(
            "/api/bookings",
            serde_json::json!({
                "locale": "pt",
                "selectedDay": "monday",
                "selectedTime": "09:00",
                "name": "Ana",
                "email": "ana@kelme.studio",
                "phone": "11999998888",
                "phoneCountry": "BR"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["delivery_status"], "failed");

    let req = Request::builder()
        .uri("/api/admin/bookings?status=failed")
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&state, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["locale"], "pt");
}

// ── Admin API ──

#[tokio::test]
async fn test_admin_requires_auth() {
    let (state, _) = test_state();
    let (status, _) = send(&state, get("/api/admin/bookings")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/admin/status")
        .header("Authorization", "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&state, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&state, get("/api/admin/events?token=nope")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_status_and_listing() {
    let (state, _) = test_state();
    create_session(&state, "en").await;
    send(
        &state,
        post_json(
            "/api/bookings",
            serde_json::json!({
                "selectedDay": "wednesday",
                "selectedTime": "11:00",
                "name": "Jo Smith",
                "email": "jo@example.com",
                "phone": "7400123456",
                "phoneCountry": "GB"
            }),
        ),
    )
    .await;

    let req = Request::builder()
        .uri("/api/admin/status")
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&state, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["active_sessions"], 1);
    assert_eq!(json["submissions_last_24h"], 1);
    assert_eq!(json["failed_deliveries"], 0);

    let req = Request::builder()
        .uri("/api/admin/bookings")
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (_, json) = send(&state, req).await;
    let listed = json.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["phone"], "+44 7400 123456");
    assert_eq!(listed[0]["selectedDay"], "wednesday");
    let id = listed[0]["id"].as_str().unwrap().to_string();

    let req = Request::builder()
        .uri(format!("/api/admin/bookings/{id}"))
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&state, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["delivery_status"], "delivered");

    let req = Request::builder()
        .uri("/api/admin/bookings?status=bogus")
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&state, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_accepted_booking_is_broadcast() {
    let (state, _) = test_state();
    let mut rx = state.submissions_tx.subscribe();

    send(
        &state,
        post_json(
            "/api/bookings",
            serde_json::json!({
                "selectedDay": "saturday",
                "selectedTime": "17:00",
                "name": "Jo Smith",
                "email": "jo@example.com",
                "phone": "912345678",
                "phoneCountry": "PT"
            }),
        ),
    )
    .await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.payload.phone, "+351 912 345 678");
}
