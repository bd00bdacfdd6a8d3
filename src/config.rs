use std::env;

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;
/// One week.
pub const MAX_SESSION_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub default_locale: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: String,
    pub allowed_origin: Option<String>,
    pub session_ttl_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "bookings.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            webhook_url: env::var("BOOKING_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            webhook_secret: env::var("BOOKING_WEBHOOK_SECRET").unwrap_or_default(),
            allowed_origin: env::var("ALLOWED_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            session_ttl_minutes: parse_session_ttl(env::var("SESSION_TTL_MINUTES").ok().as_deref()),
        }
    }
}

/// Unparsable values use the default; the rest are clamped to 1 minute..1 week.
fn parse_session_ttl(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|minutes| minutes.clamp(1, MAX_SESSION_TTL_MINUTES))
        .unwrap_or(DEFAULT_SESSION_TTL_MINUTES)
}
