//! Resource operations, one `impl FarmClient` block per resource group

mod activity;
mod auth;
mod plots;
mod reference;
mod reminders;
mod reports;

/// Encode a single path segment
pub(crate) fn segment(value: impl std::fmt::Display) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}
