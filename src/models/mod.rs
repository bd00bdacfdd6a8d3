pub mod country;
pub mod draft;
pub mod locale;
pub mod payload;
pub mod submission;
pub mod variant;

pub use country::{Country, PhoneFormat};
pub use draft::{BookingDraft, DraftField, FieldUpdate, TimeSlot, Weekday};
pub use locale::Locale;
pub use payload::BookingPayload;
pub use submission::{DeliveryStatus, Submission};
pub use variant::{FormVariant, Layout};
