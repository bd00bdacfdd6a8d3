use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::Country;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn label_key(self) -> String {
        format!("days.{}", self.as_ref())
    }
}

/// Bookable call slots, hourly from 09:00 to 17:00.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum TimeSlot {
    #[serde(rename = "09:00")]
    #[strum(serialize = "09:00")]
    H09,
    #[serde(rename = "10:00")]
    #[strum(serialize = "10:00")]
    H10,
    #[serde(rename = "11:00")]
    #[strum(serialize = "11:00")]
    H11,
    #[serde(rename = "12:00")]
    #[strum(serialize = "12:00")]
    H12,
    #[serde(rename = "13:00")]
    #[strum(serialize = "13:00")]
    H13,
    #[serde(rename = "14:00")]
    #[strum(serialize = "14:00")]
    H14,
    #[serde(rename = "15:00")]
    #[strum(serialize = "15:00")]
    H15,
    #[serde(rename = "16:00")]
    #[strum(serialize = "16:00")]
    H16,
    #[serde(rename = "17:00")]
    #[strum(serialize = "17:00")]
    H17,
}

impl TimeSlot {
    pub fn hour(self) -> u32 {
        match self {
            TimeSlot::H09 => 9,
            TimeSlot::H10 => 10,
            TimeSlot::H11 => 11,
            TimeSlot::H12 => 12,
            TimeSlot::H13 => 13,
            TimeSlot::H14 => 14,
            TimeSlot::H15 => 15,
            TimeSlot::H16 => 16,
            TimeSlot::H17 => 17,
        }
    }

    pub fn as_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Names of the draft's fields, used to attach validation errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum DraftField {
    SelectedDay,
    SelectedTime,
    Name,
    Email,
    Phone,
    PhoneCountry,
    Company,
    Message,
}

/// A single write into the draft, as sent by the form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    SelectedDay(Option<Weekday>),
    SelectedTime(Option<TimeSlot>),
    Name(String),
    Email(String),
    Phone(String),
    PhoneCountry(Country),
    Company(String),
    Message(String),
}

impl FieldUpdate {
    pub fn field(&self) -> DraftField {
        match self {
            FieldUpdate::SelectedDay(_) => DraftField::SelectedDay,
            FieldUpdate::SelectedTime(_) => DraftField::SelectedTime,
            FieldUpdate::Name(_) => DraftField::Name,
            FieldUpdate::Email(_) => DraftField::Email,
            FieldUpdate::Phone(_) => DraftField::Phone,
            FieldUpdate::PhoneCountry(_) => DraftField::PhoneCountry,
            FieldUpdate::Company(_) => DraftField::Company,
            FieldUpdate::Message(_) => DraftField::Message,
        }
    }
}

/// Everything the booking form collects before submission.
///
/// `phone` holds the masked display string for `phone_country`, never raw
/// digits. Writes should go through [`crate::services::wizard::Wizard`] so the
/// mask and the country-change rule are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraft {
    pub selected_day: Option<Weekday>,
    pub selected_time: Option<TimeSlot>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub phone_country: Country,
    pub company: String,
    pub message: String,
}

impl BookingDraft {
    pub fn new(phone_country: Country) -> Self {
        Self {
            phone_country,
            ..Self::default()
        }
    }
}
