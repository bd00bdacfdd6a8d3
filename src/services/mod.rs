pub mod delivery;
pub mod i18n;
pub mod masking;
pub mod sessions;
pub mod submissions;
pub mod validation;
pub mod views;
pub mod wizard;
