//! Lookup-key normalization for user names and emails.
//!
//! Secondary-index lookups only work when every writer and every reader folds
//! the same raw value to the same key, so this is the single place that does it.

/// Fold a raw user name or email into its indexed lookup form.
///
/// Unicode-aware uppercase; deterministic for a given input.
pub fn fold(value: &str) -> String {
    value.to_uppercase()
}
