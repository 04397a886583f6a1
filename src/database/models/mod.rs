pub mod company;
pub mod job;
pub mod user;

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

pub use company::{Company, CompanyDetail, CompanyListing, CompanySummary, CompanyUpdate, NewCompany};
pub use job::{Job, JobUpdate, NewJob};
pub use user::{ApplicationReceipt, NewUser, User, UserDetail, UserRecord, UserUpdate};

/// Distinguishes an absent field (`None`) from an explicit null (`Some(None)`).
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Per-field validation messages collected before a request reaches storage.
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn check_len(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.add(field, format!("must be between {} and {} characters", min, max));
        }
    }

    pub fn check_non_negative(&mut self, field: &str, value: Option<i32>) {
        if matches!(value, Some(v) if v < 0) {
            self.add(field, "must be greater than or equal to 0");
        }
    }

    pub fn check_email(&mut self, field: &str, value: &str) {
        // Mirrors the storage CHECK: something before the '@'
        if !matches!(value.find('@'), Some(i) if i > 0) {
            self.add(field, "must be a valid email address");
        }
    }

    /// NOT NULL columns may be omitted from an update but never set to null.
    pub fn check_not_null<T>(&mut self, field: &str, value: &Option<Option<T>>) {
        if matches!(value, Some(None)) {
            self.add(field, "cannot be null");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), HashMap<String, String>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}
