use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{FormVariant, Locale};
use crate::services::wizard::Wizard;
use crate::state::AppState;

/// One visitor's in-progress form. Lives in memory only.
#[derive(Debug, Clone)]
pub struct WizardSession {
    pub wizard: Wizard,
    pub locale: Locale,
    pub last_activity: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl WizardSession {
    pub fn new(locale: Locale, ttl_minutes: i64) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            wizard: Wizard::new(FormVariant::for_locale(locale)),
            locale,
            last_activity: now,
            expires_at: expiry(now, ttl_minutes),
        }
    }

    fn touch(&mut self, ttl_minutes: i64) {
        let now = Utc::now().naive_utc();
        self.last_activity = now;
        self.expires_at = expiry(now, ttl_minutes);
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Saturates instead of overflowing on out-of-range TTLs.
fn expiry(now: NaiveDateTime, ttl_minutes: i64) -> NaiveDateTime {
    Duration::try_minutes(ttl_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(NaiveDateTime::MAX)
}

pub fn purge_expired(sessions: &mut HashMap<Uuid, WizardSession>) -> usize {
    let now = Utc::now().naive_utc();
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired(now));
    before - sessions.len()
}

pub fn create_session(state: &AppState, locale: Locale) -> (Uuid, WizardSession) {
    let id = Uuid::new_v4();
    let session = WizardSession::new(locale, state.config.session_ttl_minutes);

    let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let purged = purge_expired(&mut sessions);
    if purged > 0 {
        tracing::debug!(purged, "expired wizard sessions removed");
    }
    sessions.insert(id, session.clone());
    tracing::info!(session = %id, %locale, "wizard session created");

    (id, session)
}

/// Runs `f` against a live session and refreshes its expiry. Expired
/// sessions are dropped and reported as not found.
pub fn with_session<R>(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut WizardSession) -> R,
) -> Result<R, AppError> {
    let mut sessions = state.sessions.lock().unwrap_or_else(|e| e.into_inner());
    let now = Utc::now().naive_utc();

    let expired = match sessions.get(&id) {
        Some(session) => session.is_expired(now),
        None => return Err(AppError::NotFound(format!("wizard session {id}"))),
    };
    if expired {
        sessions.remove(&id);
        return Err(AppError::NotFound(format!("wizard session {id}")));
    }

    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("wizard session {id}")))?;
    session.touch(state.config.session_ttl_minutes);
    Ok(f(session))
}
