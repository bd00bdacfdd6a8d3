use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::models::{BookingDraft, Country, DraftField};
use crate::services::masking;

pub const MIN_NAME_LEN: usize = 2;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooShort,
    InvalidEmail,
    IncompletePhone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {kind}")]
pub struct FieldError {
    pub field: DraftField,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: DraftField, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// Translation key for the inline message, e.g. `errors.invalid_email`.
    pub fn message_key(&self) -> String {
        format!("errors.{}", self.kind.as_ref())
    }
}

pub fn validate_name(name: &str) -> Result<(), FieldErrorKind> {
    let len = name.trim().chars().count();
    if len == 0 {
        Err(FieldErrorKind::Required)
    } else if len < MIN_NAME_LEN {
        Err(FieldErrorKind::TooShort)
    } else {
        Ok(())
    }
}

/// Matches the raw value; surrounding whitespace makes an address invalid.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), FieldErrorKind> {
    if email.trim().is_empty() {
        Err(FieldErrorKind::Required)
    } else if !is_valid_email(email) {
        Err(FieldErrorKind::InvalidEmail)
    } else {
        Ok(())
    }
}

pub fn validate_phone(phone: &str, country: Country) -> Result<(), FieldErrorKind> {
    if masking::digit_count(phone) == 0 {
        Err(FieldErrorKind::Required)
    } else if !masking::is_complete(phone, country) {
        Err(FieldErrorKind::IncompletePhone)
    } else {
        Ok(())
    }
}

pub fn schedule_errors(draft: &BookingDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if draft.selected_day.is_none() {
        errors.push(FieldError::new(DraftField::SelectedDay, FieldErrorKind::Required));
    }
    if draft.selected_time.is_none() {
        errors.push(FieldError::new(DraftField::SelectedTime, FieldErrorKind::Required));
    }
    errors
}

pub fn contact_errors(draft: &BookingDraft) -> Vec<FieldError> {
    let checks = [
        (DraftField::Name, validate_name(&draft.name)),
        (DraftField::Email, validate_email(&draft.email)),
        (
            DraftField::Phone,
            validate_phone(&draft.phone, draft.phone_country),
        ),
    ];
    checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|kind| FieldError::new(field, kind)))
        .collect()
}
