use serde::Serialize;

use super::{Country, Locale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Schedule, contact and details on three pages.
    Stepped,
    /// Everything on one page, validated together on submit.
    SinglePage,
}

/// Per-market form shape, picked once when a form is opened.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FormVariant {
    US,
    BR,
}

impl FormVariant {
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => FormVariant::US,
            Locale::Pt => FormVariant::BR,
        }
    }

    pub fn locale(self) -> Locale {
        match self {
            FormVariant::US => Locale::En,
            FormVariant::BR => Locale::Pt,
        }
    }

    pub fn default_country(self) -> Country {
        match self {
            FormVariant::US => Country::US,
            FormVariant::BR => Country::BR,
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            FormVariant::US => Layout::Stepped,
            FormVariant::BR => Layout::SinglePage,
        }
    }
}
