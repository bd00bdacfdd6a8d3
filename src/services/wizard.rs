use serde::Serialize;

use crate::models::{
    BookingDraft, BookingPayload, DraftField, FieldUpdate, FormVariant, Layout, TimeSlot, Weekday,
};
use crate::services::masking;
use crate::services::validation::{self, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Schedule,
    Contact,
    Details,
}

impl Step {
    pub const COUNT: u8 = 3;

    pub fn number(self) -> u8 {
        match self {
            Step::Schedule => 1,
            Step::Contact => 2,
            Step::Details => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Step::Schedule),
            2 => Some(Step::Contact),
            3 => Some(Step::Details),
            _ => None,
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn prev(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }
}

/// Which way the last step change went; drives the slide transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// What is left after a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub day: Weekday,
    pub time: TimeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Drafting(BookingDraft),
    Submitted(Confirmation),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("submit is only available on the last step (currently on step {})", .0.number())]
    WrongStep(Step),

    #[error("booking was already submitted")]
    AlreadySubmitted,

    #[error("{} field(s) failed validation", .0.len())]
    Invalid(Vec<FieldError>),
}

/// Required-field check for one step. Details never has required fields.
pub fn step_errors(draft: &BookingDraft, step: Step) -> Vec<FieldError> {
    match step {
        Step::Schedule => validation::schedule_errors(draft),
        Step::Contact => validation::contact_errors(draft),
        Step::Details => Vec::new(),
    }
}

pub fn is_step_valid(draft: &BookingDraft, step: Step) -> bool {
    step_errors(draft, step).is_empty()
}

/// Validates every required step and packages the draft for delivery.
pub fn build_payload(draft: &BookingDraft) -> Result<BookingPayload, Vec<FieldError>> {
    let mut errors = step_errors(draft, Step::Schedule);
    errors.extend(step_errors(draft, Step::Contact));

    match (draft.selected_day, draft.selected_time) {
        (Some(day), Some(time)) if errors.is_empty() => Ok(BookingPayload {
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: masking::with_dial_code(&draft.phone, draft.phone_country),
            company: non_empty(&draft.company),
            selected_day: day,
            selected_time: time,
            message: non_empty(&draft.message),
        }),
        _ => Err(errors),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The booking form's state machine.
///
/// Holds the current step, the transition direction and the draft. Field
/// errors are only recorded when the user tries to move on, and are cleared
/// field by field as the user edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    variant: FormVariant,
    step: Step,
    direction: Direction,
    phase: Phase,
    errors: Vec<FieldError>,
}

impl Wizard {
    pub fn new(variant: FormVariant) -> Self {
        Self {
            variant,
            step: Step::Schedule,
            direction: Direction::Forward,
            phase: Phase::Drafting(BookingDraft::new(variant.default_country())),
            errors: Vec::new(),
        }
    }

    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: DraftField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// `None` once the booking has been submitted.
    pub fn draft(&self) -> Option<&BookingDraft> {
        match &self.phase {
            Phase::Drafting(draft) => Some(draft),
            Phase::Submitted(_) => None,
        }
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        match &self.phase {
            Phase::Submitted(confirmation) => Some(*confirmation),
            Phase::Drafting(_) => None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted(_))
    }

    pub fn is_step_valid(&self, step: Step) -> bool {
        self.draft().is_some_and(|draft| is_step_valid(draft, step))
    }

    /// Completion ratio for the progress bar.
    pub fn progress(&self) -> f32 {
        if self.is_submitted() || self.variant.layout() == Layout::SinglePage {
            return 1.0;
        }
        f32::from(self.step.number()) / f32::from(Step::COUNT)
    }

    /// Writes one field. Returns `false` when there is no draft to write to.
    pub fn set_field(&mut self, update: FieldUpdate) -> bool {
        let Phase::Drafting(draft) = &mut self.phase else {
            return false;
        };

        let field = update.field();
        match update {
            FieldUpdate::SelectedDay(day) => draft.selected_day = day,
            FieldUpdate::SelectedTime(time) => draft.selected_time = time,
            FieldUpdate::Name(name) => draft.name = name,
            FieldUpdate::Email(email) => draft.email = email,
            FieldUpdate::Phone(raw) => draft.phone = masking::mask_phone(&raw, draft.phone_country),
            FieldUpdate::PhoneCountry(country) => {
                draft.phone_country = country;
                draft.phone.clear();
                self.errors.retain(|e| e.field != DraftField::Phone);
            }
            FieldUpdate::Company(company) => draft.company = company,
            FieldUpdate::Message(message) => draft.message = message,
        }
        self.errors.retain(|e| e.field != field);
        true
    }

    /// Moves to the next step if the current one is valid. Returns whether
    /// the step changed.
    pub fn advance(&mut self) -> bool {
        if self.variant.layout() == Layout::SinglePage {
            return false;
        }
        let Some(draft) = self.draft() else {
            return false;
        };

        let errors = step_errors(draft, self.step);
        if !errors.is_empty() {
            tracing::debug!(step = self.step.number(), errors = errors.len(), "advance blocked");
            self.errors = errors;
            return false;
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                self.direction = Direction::Forward;
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    pub fn retreat(&mut self) -> bool {
        if self.variant.layout() == Layout::SinglePage || self.is_submitted() {
            return false;
        }
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                self.direction = Direction::Backward;
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// Validates the whole draft and builds the payload. The draft is kept
    /// until [`Wizard::confirm_submit`] is called, so a booking that fails to
    /// persist can be submitted again.
    pub fn prepare_submit(&mut self) -> Result<BookingPayload, SubmitError> {
        let draft = match &self.phase {
            Phase::Drafting(draft) => draft,
            Phase::Submitted(_) => return Err(SubmitError::AlreadySubmitted),
        };
        if self.variant.layout() == Layout::Stepped && self.step != Step::Details {
            return Err(SubmitError::WrongStep(self.step));
        }

        build_payload(draft).map_err(|errors| {
            self.errors = errors.clone();
            SubmitError::Invalid(errors)
        })
    }

    /// Discards the draft in favour of the terminal submitted state.
    pub fn confirm_submit(&mut self, payload: &BookingPayload) {
        self.phase = Phase::Submitted(Confirmation {
            day: payload.selected_day,
            time: payload.selected_time,
        });
        self.errors.clear();
    }

    pub fn submit(&mut self) -> Result<BookingPayload, SubmitError> {
        let payload = self.prepare_submit()?;
        self.confirm_submit(&payload);
        Ok(payload)
    }

    /// "Send another": empty draft, first step.
    pub fn reset(&mut self) {
        *self = Self::new(self.variant);
    }
}
