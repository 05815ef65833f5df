//! Claims collection codec.
//!
//! In memory a user's claims are an ordered list of groups, one per distinct
//! claim type, each holding that type's values in insertion order. At the
//! persistence boundary the groups flatten into two parallel sequences:
//!
//! ```text
//! ClaimTypes  = ["role",               "email"]
//! ClaimValues = ["[\"admin\",\"ops\"]", "[\"a@x.com\"]"]
//! ```
//!
//! `ClaimValues[i]` is the JSON array of values for `ClaimTypes[i]`, so the
//! stored sequences grow with the number of distinct types rather than the
//! number of claims. A type whose last value is removed loses its slot; an
//! empty value list is never stored.

use crate::{Claim, CoreError, Result as CoreErrorResult};

use std::collections::HashSet;

/// Transient view of one claim type's group.
///
/// `index` is the group's slot in the set, or `None` when the type is not
/// stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsEntry {
    pub index: Option<usize>,
    pub claim_type: String,
    pub claim_values: Vec<String>,
}

impl ClaimsEntry {
    fn absent(claim_type: &str) -> Self {
        Self {
            index: None,
            claim_type: claim_type.to_string(),
            claim_values: Vec::new(),
        }
    }

    pub fn claims(&self) -> impl Iterator<Item = Claim> + '_ {
        self.claim_values
            .iter()
            .map(|value| Claim::new(self.claim_type.clone(), value.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClaimGroup {
    claim_type: String,
    values: Vec<String>,
}

/// Flat parallel-sequence form of a [`ClaimSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedClaims {
    pub claim_types: Vec<String>,
    pub claim_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSet {
    groups: Vec<ClaimGroup>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct claim types.
    pub fn type_count(&self) -> usize {
        self.groups.len()
    }

    pub fn claim_types(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.claim_type.as_str())
    }

    /// Locate the group for `claim_type`; an absent type yields an entry with
    /// no index and no values.
    pub fn entry_by_type(&self, claim_type: &str) -> ClaimsEntry {
        self.position(claim_type)
            .map(|index| ClaimsEntry {
                index: Some(index),
                claim_type: claim_type.to_string(),
                claim_values: self.groups[index].values.clone(),
            })
            .unwrap_or_else(|| ClaimsEntry::absent(claim_type))
    }

    /// Write an entry back.
    ///
    /// A non-empty entry either overwrites its type's slot in place or, when
    /// the type has no slot, is appended. An empty entry removes the type's
    /// slot and shifts later groups down by one.
    ///
    /// The slot is resolved from `claim_type`. An `index` that no longer
    /// points at a group of that type is ignored, so a stale entry cannot
    /// touch another type's group or store its type twice.
    pub fn save_entry(&mut self, entry: ClaimsEntry) {
        let slot = match entry.index {
            Some(index)
                if self
                    .groups
                    .get(index)
                    .is_some_and(|g| g.claim_type == entry.claim_type) =>
            {
                Some(index)
            }
            _ => self.position(&entry.claim_type),
        };

        match (slot, entry.claim_values.is_empty()) {
            (None, false) => self.groups.push(ClaimGroup {
                claim_type: entry.claim_type,
                values: entry.claim_values,
            }),
            (Some(index), false) => self.groups[index].values = entry.claim_values,
            (Some(index), true) => {
                self.groups.remove(index);
            }
            (None, true) => {}
        }
    }

    fn position(&self, claim_type: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.claim_type == claim_type)
    }

    pub fn contains(&self, claim: &Claim) -> bool {
        self.groups
            .iter()
            .find(|g| g.claim_type == claim.claim_type)
            .is_some_and(|g| g.values.contains(&claim.value))
    }

    /// Every (type, value) pair: groups in first-seen order, values in
    /// insertion order within a group.
    pub fn claims(&self) -> Vec<Claim> {
        self.groups
            .iter()
            .flat_map(|g| {
                g.values
                    .iter()
                    .map(|v| Claim::new(g.claim_type.clone(), v.clone()))
            })
            .collect()
    }

    /// Append a value to the claim's type group. Duplicate values are kept.
    pub fn add(&mut self, claim: &Claim) {
        let mut entry = self.entry_by_type(&claim.claim_type);
        entry.claim_values.push(claim.value.clone());
        self.save_entry(entry);
    }

    /// Remove the first occurrence of the claim's value. Missing types and
    /// values are left alone.
    pub fn remove(&mut self, claim: &Claim) {
        let mut entry = self.entry_by_type(&claim.claim_type);
        if let Some(position) = entry.claim_values.iter().position(|v| *v == claim.value) {
            entry.claim_values.remove(position);
            self.save_entry(entry);
        }
    }

    pub fn encode(&self) -> CoreErrorResult<EncodedClaims> {
        let mut encoded = EncodedClaims {
            claim_types: Vec::with_capacity(self.groups.len()),
            claim_values: Vec::with_capacity(self.groups.len()),
        };

        for group in &self.groups {
            encoded.claim_types.push(group.claim_type.clone());
            encoded
                .claim_values
                .push(serde_json::to_string(&group.values)?);
        }

        Ok(encoded)
    }

    pub fn decode(encoded: EncodedClaims) -> CoreErrorResult<Self> {
        let EncodedClaims {
            claim_types,
            claim_values,
        } = encoded;

        if claim_types.len() != claim_values.len() {
            return Err(CoreError::corrupt_document(format!(
                "ClaimTypes has {} entries but ClaimValues has {}",
                claim_types.len(),
                claim_values.len()
            )));
        }

        let mut seen = HashSet::with_capacity(claim_types.len());
        let mut groups = Vec::with_capacity(claim_types.len());

        for (claim_type, raw_values) in claim_types.into_iter().zip(claim_values) {
            if !seen.insert(claim_type.clone()) {
                return Err(CoreError::corrupt_document(format!(
                    "claim type '{claim_type}' is stored more than once"
                )));
            }

            let values: Vec<String> = serde_json::from_str(&raw_values).map_err(|e| {
                CoreError::corrupt_document(format!(
                    "ClaimValues for '{claim_type}' is not a JSON string array: {e}"
                ))
            })?;
            if values.is_empty() {
                return Err(CoreError::corrupt_document(format!(
                    "claim type '{claim_type}' is stored with no values"
                )));
            }

            groups.push(ClaimGroup { claim_type, values });
        }

        Ok(Self { groups })
    }
}
