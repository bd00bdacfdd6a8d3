use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::models::{Country, FormVariant, Layout, Locale, PhoneFormat, TimeSlot, Weekday};
use crate::services::i18n::{self, Translator};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

impl LocaleQuery {
    pub fn resolve(&self, state: &AppState) -> Locale {
        Locale::parse(self.locale.as_deref().unwrap_or(&state.config.default_locale))
    }
}

#[derive(Serialize)]
pub struct LabeledValue {
    value: String,
    label: String,
}

#[derive(Serialize)]
pub struct CountryOption {
    code: Country,
    label: String,
    #[serde(flatten)]
    format: PhoneFormat,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    locale: Locale,
    variant: FormVariant,
    layout: Layout,
    default_country: Country,
    days: Vec<LabeledValue>,
    times: Vec<LabeledValue>,
    countries: Vec<CountryOption>,
}

// GET /api/options
pub async fn get_options(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocaleQuery>,
) -> Json<OptionsResponse> {
    let locale = query.resolve(&state);
    let variant = FormVariant::for_locale(locale);
    let t = state.catalogs.get(locale);

    Json(OptionsResponse {
        locale,
        variant,
        layout: variant.layout(),
        default_country: variant.default_country(),
        days: Weekday::iter()
            .map(|day| LabeledValue {
                value: day.to_string(),
                label: i18n::day_label(t, day),
            })
            .collect(),
        times: TimeSlot::iter()
            .map(|slot| LabeledValue {
                value: slot.to_string(),
                label: i18n::time_label(t, slot),
            })
            .collect(),
        countries: Country::iter()
            .map(|code| CountryOption {
                code,
                label: t.t(&code.label_key()),
                format: *code.phone_format(),
            })
            .collect(),
    })
}
