use serde::{Deserialize, Serialize};

use super::{TimeSlot, Weekday};

/// What a completed form hands to the delivery side.
///
/// `phone` already carries the country's dial code, e.g. `+55 (11) 99999-8888`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub selected_day: Weekday,
    pub selected_time: TimeSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
