use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::{BookingPayload, Locale};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Delivered,
    Failed,
}

/// An accepted booking as stored by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    #[serde(flatten)]
    pub payload: BookingPayload,
    pub locale: Locale,
    pub delivery_status: DeliveryStatus,
    pub created_at: NaiveDateTime,
}

impl Submission {
    pub fn new(payload: BookingPayload, locale: Locale) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            payload,
            locale,
            delivery_status: DeliveryStatus::Pending,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}
