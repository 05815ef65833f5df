//! Email and phone number values together with their confirmation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    value: String,
    confirmed_on: Option<DateTime<Utc>>,
}

impl ContactRecord {
    /// An unconfirmed contact value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            confirmed_on: None,
        }
    }

    pub(crate) fn restore(value: String, confirmed_on: Option<DateTime<Utc>>) -> Self {
        Self {
            value,
            confirmed_on,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn confirmed_on(&self) -> Option<DateTime<Utc>> {
        self.confirmed_on
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed_on.is_some()
    }

    pub(crate) fn confirm(&mut self, at: DateTime<Utc>) {
        self.confirmed_on = Some(at);
    }
}
