use std::collections::HashMap;
use std::fmt::Write;

use anyhow::Context;

use crate::models::{Locale, TimeSlot, Weekday};

static EN_MESSAGES: &str = include_str!("../../locales/en.json");
static PT_MESSAGES: &str = include_str!("../../locales/pt.json");

/// Message lookup handed to everything that renders user-facing text.
pub trait Translator: Send + Sync {
    fn locale(&self) -> Locale;

    fn t(&self, key: &str) -> String;

    /// `t` with `{name}` placeholders substituted.
    fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(key), |text, &(name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

/// Flattened message catalog (`"days.monday" -> "Monday"`).
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: Locale,
    messages: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl Catalog {
    /// Parses a nested JSON catalog. Keys missing from `json` are looked up in
    /// `fallback_json`, then returned as-is.
    pub fn from_json(locale: Locale, json: &str, fallback_json: Option<&str>) -> anyhow::Result<Self> {
        let messages = parse_messages(json)
            .with_context(|| format!("invalid message catalog for locale {locale}"))?;
        let fallback = match fallback_json {
            Some(fallback) => parse_messages(fallback).context("invalid fallback catalog")?,
            None => HashMap::new(),
        };
        Ok(Self {
            locale,
            messages,
            fallback,
        })
    }

    pub fn embedded(locale: Locale) -> anyhow::Result<Self> {
        match locale {
            Locale::En => Self::from_json(Locale::En, EN_MESSAGES, None),
            Locale::Pt => Self::from_json(Locale::Pt, PT_MESSAGES, Some(EN_MESSAGES)),
        }
    }
}

impl Translator for Catalog {
    fn locale(&self) -> Locale {
        self.locale
    }

    fn t(&self, key: &str) -> String {
        match self.messages.get(key).or_else(|| self.fallback.get(key)) {
            Some(text) => text.clone(),
            None => {
                tracing::warn!(key, locale = %self.locale, "missing translation");
                key.to_string()
            }
        }
    }
}

fn parse_messages(json: &str) -> anyhow::Result<HashMap<String, String>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let mut out = HashMap::new();
    flatten("", &value, &mut out);
    Ok(out)
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

/// Both embedded catalogs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Catalogs {
    en: Catalog,
    pt: Catalog,
}

impl Catalogs {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            en: Catalog::embedded(Locale::En)?,
            pt: Catalog::embedded(Locale::Pt)?,
        })
    }

    pub fn get(&self, locale: Locale) -> &Catalog {
        match locale {
            Locale::En => &self.en,
            Locale::Pt => &self.pt,
        }
    }
}

pub fn day_label(t: &dyn Translator, day: Weekday) -> String {
    t.t(&day.label_key())
}

/// Locale-formatted slot label ("2 PM", "14h"). Falls back to "14:00" when
/// the catalog's time format is not a valid strftime pattern.
pub fn time_label(t: &dyn Translator, slot: TimeSlot) -> String {
    let pattern = t.t("formats.time");
    let mut label = String::new();
    if write!(label, "{}", slot.as_time().format(&pattern)).is_err() {
        return slot.to_string();
    }
    label
}

/// "Tuesday at 2 PM".
pub fn slot_summary(t: &dyn Translator, day: Weekday, time: TimeSlot) -> String {
    let day = day_label(t, day);
    let time = time_label(t, time);
    t.t_with("summary.slot", &[("day", day.as_str()), ("time", time.as_str())])
}
