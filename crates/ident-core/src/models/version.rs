use serde::{Deserialize, Serialize};

/// Optimistic-concurrency token stamped on a record by the persistence layer.
///
/// Records built in memory carry no version; one appears only after the first
/// successful write, by way of [`crate::UserDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(i64);

impl Version {
    pub(crate) fn from_raw(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
