//! Serializable view models for each page of the booking form.
//!
//! Every function here is pure: the frontend renders whatever comes back and
//! sends field writes to the wizard. Nothing in a view carries state of its own.

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::models::{BookingDraft, Country, DraftField, FormVariant, Layout, TimeSlot, Weekday};
use crate::services::i18n::{self, Translator};
use crate::services::validation::FieldError;
use crate::services::wizard::{Confirmation, Direction, Step, Wizard};

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputView {
    pub name: DraftField,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub heading: String,
    pub days: Vec<OptionView>,
    pub times: Vec<OptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactView {
    pub heading: String,
    pub name: InputView,
    pub email: InputView,
    pub phone: InputView,
    pub countries: Vec<OptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub company: InputView,
    pub message: InputView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum SectionView {
    Schedule(ScheduleView),
    Contact(ContactView),
    Details(DetailsView),
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessView {
    pub heading: String,
    pub summary: String,
    pub body: String,
    pub send_another: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionsView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub variant: FormVariant,
    pub layout: Layout,
    pub title: String,
    pub step: u8,
    pub total_steps: u8,
    pub direction: Direction,
    pub progress: f32,
    pub submitted: bool,
    pub sections: Vec<SectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<SuccessView>,
    pub actions: ActionsView,
}

fn error_text(t: &dyn Translator, errors: &[FieldError], field: DraftField) -> Option<String> {
    errors
        .iter()
        .find(|e| e.field == field)
        .map(|e| t.t(&e.message_key()))
}

fn input(
    t: &dyn Translator,
    errors: &[FieldError],
    field: DraftField,
    key: &str,
    value: &str,
    required: bool,
) -> InputView {
    InputView {
        name: field,
        label: t.t(&format!("fields.{key}")),
        value: value.to_string(),
        placeholder: Some(t.t(&format!("placeholders.{key}"))),
        required,
        error: error_text(t, errors, field),
    }
}

pub fn schedule_view(t: &dyn Translator, draft: &BookingDraft, errors: &[FieldError]) -> ScheduleView {
    ScheduleView {
        heading: t.t("steps.schedule"),
        days: Weekday::iter()
            .map(|day| OptionView {
                value: day.to_string(),
                label: i18n::day_label(t, day),
                selected: draft.selected_day == Some(day),
            })
            .collect(),
        times: TimeSlot::iter()
            .map(|slot| OptionView {
                value: slot.to_string(),
                label: i18n::time_label(t, slot),
                selected: draft.selected_time == Some(slot),
            })
            .collect(),
        day_error: error_text(t, errors, DraftField::SelectedDay),
        time_error: error_text(t, errors, DraftField::SelectedTime),
    }
}

pub fn contact_view(t: &dyn Translator, draft: &BookingDraft, errors: &[FieldError]) -> ContactView {
    let phone = InputView {
        name: DraftField::Phone,
        label: t.t("fields.phone"),
        value: draft.phone.clone(),
        placeholder: Some(draft.phone_country.phone_format().placeholder.to_string()),
        required: true,
        error: error_text(t, errors, DraftField::Phone),
    };

    ContactView {
        heading: t.t("steps.contact"),
        name: input(t, errors, DraftField::Name, "name", &draft.name, true),
        email: input(t, errors, DraftField::Email, "email", &draft.email, true),
        phone,
        countries: Country::iter()
            .map(|country| OptionView {
                value: country.to_string(),
                label: format!("{} ({})", t.t(&country.label_key()), country.dial_code()),
                selected: draft.phone_country == country,
            })
            .collect(),
    }
}

pub fn details_view(t: &dyn Translator, draft: &BookingDraft, errors: &[FieldError]) -> DetailsView {
    let summary = match (draft.selected_day, draft.selected_time) {
        (Some(day), Some(time)) => Some(i18n::slot_summary(t, day, time)),
        _ => None,
    };
    DetailsView {
        heading: t.t("steps.details"),
        summary,
        company: input(t, errors, DraftField::Company, "company", &draft.company, false),
        message: input(t, errors, DraftField::Message, "message", &draft.message, false),
    }
}

pub fn success_view(t: &dyn Translator, confirmation: Confirmation) -> SuccessView {
    let summary = i18n::slot_summary(t, confirmation.day, confirmation.time);
    SuccessView {
        heading: t.t("success.title"),
        body: t.t_with("success.body", &[("slot", summary.as_str())]),
        summary,
        send_another: t.t("success.send_another"),
    }
}

pub fn render(wizard: &Wizard, t: &dyn Translator) -> WizardView {
    let layout = wizard.variant().layout();
    let title = match layout {
        Layout::Stepped => t.t("form.title"),
        Layout::SinglePage => t.t("form.single_page_title"),
    };
    let errors = wizard.errors();

    let (sections, success) = match (wizard.draft(), wizard.confirmation()) {
        (Some(draft), _) => {
            let sections = match layout {
                Layout::Stepped => vec![match wizard.step() {
                    Step::Schedule => SectionView::Schedule(schedule_view(t, draft, errors)),
                    Step::Contact => SectionView::Contact(contact_view(t, draft, errors)),
                    Step::Details => SectionView::Details(details_view(t, draft, errors)),
                }],
                Layout::SinglePage => vec![
                    SectionView::Schedule(schedule_view(t, draft, errors)),
                    SectionView::Contact(contact_view(t, draft, errors)),
                    SectionView::Details(details_view(t, draft, errors)),
                ],
            };
            (sections, None)
        }
        (None, Some(confirmation)) => (Vec::new(), Some(success_view(t, confirmation))),
        (None, None) => (Vec::new(), None),
    };

    let submitted = wizard.is_submitted();
    let step = wizard.step();
    let actions = match layout {
        _ if submitted => ActionsView {
            back: None,
            next: None,
            submit: None,
        },
        Layout::SinglePage => ActionsView {
            back: None,
            next: None,
            submit: Some(t.t("form.submit")),
        },
        Layout::Stepped => ActionsView {
            back: (step != Step::Schedule).then(|| t.t("form.back")),
            next: (step != Step::Details).then(|| t.t("form.next")),
            submit: (step == Step::Details).then(|| t.t("form.submit")),
        },
    };

    WizardView {
        variant: wizard.variant(),
        layout,
        title,
        step: step.number(),
        total_steps: match layout {
            Layout::Stepped => Step::COUNT,
            Layout::SinglePage => 1,
        },
        direction: wizard.direction(),
        progress: wizard.progress(),
        submitted,
        sections,
        success,
        actions,
    }
}
