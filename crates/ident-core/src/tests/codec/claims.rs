use crate::{Claim, ClaimSet, ClaimsEntry, CoreError, EncodedClaims};

use googletest::assert_that;
use googletest::prelude::none;
use proptest::prelude::*;

fn set_of(claims: &[(&str, &str)]) -> ClaimSet {
    let mut set = ClaimSet::new();
    for (t, v) in claims {
        set.add(&Claim::new(*t, *v));
    }
    set
}

fn pairs(set: &ClaimSet) -> Vec<(String, String)> {
    set.claims()
        .into_iter()
        .map(|c| (c.claim_type, c.value))
        .collect()
}

// =========================================================================
// Entry lookup and rewrite
// =========================================================================

#[test]
fn given_absent_type_when_entry_by_type_then_entry_has_no_index_and_no_values() {
    let set = set_of(&[("role", "admin")]);

    let entry = set.entry_by_type("email");

    assert_that!(entry.index, none());
    assert_eq!(entry.claim_type, "email");
    assert!(entry.claim_values.is_empty());
}

#[test]
fn given_stored_type_when_entry_by_type_then_entry_carries_slot_and_values() {
    let set = set_of(&[("role", "admin"), ("email", "a@x.com"), ("role", "ops")]);

    let entry = set.entry_by_type("role");

    assert_eq!(entry.index, Some(0));
    assert_eq!(entry.claim_values, vec!["admin", "ops"]);
}

#[test]
fn given_existing_entry_when_saved_with_more_values_then_slot_is_rewritten_in_place() {
    let mut set = set_of(&[("role", "admin"), ("email", "a@x.com")]);
    let mut entry = set.entry_by_type("role");
    entry.claim_values.push("ops".to_string());

    set.save_entry(entry);

    let types: Vec<&str> = set.claim_types().collect();
    assert_eq!(types, vec!["role", "email"]);
    assert_eq!(set.entry_by_type("role").claim_values, vec!["admin", "ops"]);
}

#[test]
fn given_emptied_entry_when_saved_then_slot_is_removed_and_later_slots_shift_down() {
    let mut set = set_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
    let mut entry = set.entry_by_type("b");
    entry.claim_values.clear();

    set.save_entry(entry);

    let types: Vec<&str> = set.claim_types().collect();
    assert_eq!(types, vec!["a", "c"]);
    assert_eq!(set.entry_by_type("c").index, Some(1));
}

#[test]
fn given_absent_empty_entry_when_saved_then_nothing_is_stored() {
    let mut set = ClaimSet::new();

    set.save_entry(ClaimsEntry {
        index: None,
        claim_type: "role".to_string(),
        claim_values: Vec::new(),
    });

    assert!(set.is_empty());
}

#[test]
fn given_stale_entry_whose_slot_was_removed_when_saved_then_type_is_appended() {
    // Given: an entry taken before its group's last value was removed
    let mut set = set_of(&[("role", "admin")]);
    let stale = set.entry_by_type("role");
    set.remove(&Claim::new("role", "admin"));

    // When
    set.save_entry(stale);

    // Then
    let types: Vec<&str> = set.claim_types().collect();
    assert_eq!(types, vec!["role"]);
    assert_eq!(set.entry_by_type("role").claim_values, vec!["admin"]);
}

#[test]
fn given_stale_empty_entry_pointing_past_end_when_saved_then_nothing_changes() {
    let mut set = set_of(&[("role", "admin")]);

    set.save_entry(ClaimsEntry {
        index: Some(5),
        claim_type: "scope".to_string(),
        claim_values: Vec::new(),
    });

    assert_eq!(pairs(&set), vec![("role".to_string(), "admin".to_string())]);
}

#[test]
fn given_index_pointing_at_another_type_when_saved_then_only_own_type_changes() {
    // Given: slot 0 now belongs to "email" after "role" was dropped
    let mut set = set_of(&[("role", "admin"), ("email", "a@x.com")]);
    let mut stale = set.entry_by_type("role");
    set.remove(&Claim::new("role", "admin"));
    stale.claim_values.clear();

    // When
    set.save_entry(stale);

    // Then
    assert_eq!(pairs(&set), vec![("email".to_string(), "a@x.com".to_string())]);
}

#[test]
fn given_unindexed_entry_for_stored_type_when_saved_then_slot_is_reused_and_set_still_decodes() {
    // Given
    let mut set = set_of(&[("role", "admin"), ("email", "a@x.com")]);

    // When
    set.save_entry(ClaimsEntry {
        index: None,
        claim_type: "role".to_string(),
        claim_values: vec!["ops".to_string()],
    });

    // Then
    let types: Vec<&str> = set.claim_types().collect();
    assert_eq!(types, vec!["role", "email"]);
    assert_eq!(set.entry_by_type("role").claim_values, vec!["ops"]);
    let decoded = ClaimSet::decode(set.encode().unwrap()).unwrap();
    assert_eq!(decoded, set);
}

#[test]
fn given_entry_when_claims_then_yields_one_claim_per_value() {
    let set = set_of(&[("role", "admin"), ("role", "ops")]);

    let claims: Vec<Claim> = set.entry_by_type("role").claims().collect();

    assert_eq!(
        claims,
        vec![Claim::new("role", "admin"), Claim::new("role", "ops")]
    );
}

// =========================================================================
// Add / remove
// =========================================================================

#[test]
fn given_duplicate_value_when_added_then_both_copies_are_kept() {
    let set = set_of(&[("role", "admin"), ("role", "admin")]);

    assert_eq!(set.claims().len(), 2);
    assert_eq!(set.type_count(), 1);
}

#[test]
fn given_duplicate_value_when_removed_once_then_one_copy_remains() {
    let mut set = set_of(&[("role", "admin"), ("role", "admin")]);

    set.remove(&Claim::new("role", "admin"));

    assert!(set.contains(&Claim::new("role", "admin")));
    assert_eq!(set.claims().len(), 1);
}

#[test]
fn given_missing_value_when_removed_then_set_is_unchanged() {
    let mut set = set_of(&[("role", "admin")]);
    let before = set.clone();

    set.remove(&Claim::new("role", "ops"));
    set.remove(&Claim::new("email", "a@x.com"));

    assert_eq!(set, before);
}

#[test]
fn given_mixed_claims_when_listed_then_types_in_first_seen_order_and_values_in_insertion_order() {
    let set = set_of(&[
        ("role", "admin"),
        ("email", "a@x.com"),
        ("role", "ops"),
        ("email", "b@x.com"),
    ]);

    assert_eq!(
        pairs(&set),
        vec![
            ("role".to_string(), "admin".to_string()),
            ("role".to_string(), "ops".to_string()),
            ("email".to_string(), "a@x.com".to_string()),
            ("email".to_string(), "b@x.com".to_string()),
        ]
    );
}

// =========================================================================
// Encoding
// =========================================================================

#[test]
fn given_claims_when_encoded_then_values_are_json_arrays_per_type() {
    let set = set_of(&[("role", "admin"), ("role", "ops"), ("email", "a@x.com")]);

    let encoded = set.encode().unwrap();

    assert_eq!(encoded.claim_types, vec!["role", "email"]);
    assert_eq!(
        encoded.claim_values,
        vec![r#"["admin","ops"]"#, r#"["a@x.com"]"#]
    );
}

#[test]
fn given_no_claims_when_encoded_then_sequences_are_empty() {
    let encoded = ClaimSet::new().encode().unwrap();

    assert_eq!(encoded, EncodedClaims::default());
}

#[test]
fn given_mismatched_lengths_when_decoded_then_corrupt_document() {
    let result = ClaimSet::decode(EncodedClaims {
        claim_types: vec!["role".to_string()],
        claim_values: vec![],
    });

    assert!(matches!(result, Err(CoreError::CorruptDocument { .. })));
}

#[test]
fn given_repeated_type_when_decoded_then_corrupt_document() {
    let result = ClaimSet::decode(EncodedClaims {
        claim_types: vec!["role".to_string(), "role".to_string()],
        claim_values: vec![r#"["a"]"#.to_string(), r#"["b"]"#.to_string()],
    });

    assert!(matches!(result, Err(CoreError::CorruptDocument { .. })));
}

#[test]
fn given_stored_empty_value_list_when_decoded_then_corrupt_document() {
    let result = ClaimSet::decode(EncodedClaims {
        claim_types: vec!["role".to_string()],
        claim_values: vec!["[]".to_string()],
    });

    assert!(matches!(result, Err(CoreError::CorruptDocument { .. })));
}

#[test]
fn given_malformed_values_when_decoded_then_corrupt_document() {
    let result = ClaimSet::decode(EncodedClaims {
        claim_types: vec!["role".to_string()],
        claim_values: vec!["admin".to_string()],
    });

    assert!(matches!(result, Err(CoreError::CorruptDocument { .. })));
}

#[test]
fn given_one_type_with_many_values_when_round_tripped_then_pairs_are_preserved() {
    let values: Vec<String> = (0..50).map(|i| format!("v{i}")).collect();
    let mut set = ClaimSet::new();
    for v in &values {
        set.add(&Claim::new("scope", v.as_str()));
    }

    let decoded = ClaimSet::decode(set.encode().unwrap()).unwrap();

    assert_eq!(decoded.type_count(), 1);
    assert_eq!(pairs(&decoded), pairs(&set));
}

#[test]
fn given_many_types_with_one_value_when_round_tripped_then_pairs_are_preserved() {
    let mut set = ClaimSet::new();
    for i in 0..50 {
        set.add(&Claim::new(format!("type-{i}"), "x"));
    }

    let decoded = ClaimSet::decode(set.encode().unwrap()).unwrap();

    assert_eq!(decoded.type_count(), 50);
    assert_eq!(decoded, set);
}

// =========================================================================
// Property-Based Tests
// =========================================================================

fn claim_strategy() -> impl Strategy<Value = (String, String)> {
    (
        prop_oneof![
            Just("role".to_string()),
            Just("email".to_string()),
            Just("scope".to_string()),
            "[a-z]{1,8}",
        ],
        "[a-zA-Z0-9 \"\\\\]{0,12}",
    )
}

proptest! {
    #[test]
    fn given_any_claims_when_round_tripped_then_decoded_set_is_identical(
        claims in prop::collection::vec(claim_strategy(), 0..40)
    ) {
        let mut set = ClaimSet::new();
        for (t, v) in &claims {
            set.add(&Claim::new(t.as_str(), v.as_str()));
        }

        let decoded = ClaimSet::decode(set.encode().unwrap()).unwrap();

        prop_assert_eq!(pairs(&decoded), pairs(&set));
        prop_assert_eq!(decoded, set);
    }

    #[test]
    fn given_any_set_when_claim_added_then_it_is_present_exactly_once_more(
        claims in prop::collection::vec(claim_strategy(), 0..20),
        (t, v) in claim_strategy(),
    ) {
        let mut set = ClaimSet::new();
        for (ct, cv) in &claims {
            set.add(&Claim::new(ct.as_str(), cv.as_str()));
        }
        let claim = Claim::new(t.as_str(), v.as_str());
        let before = set.claims().iter().filter(|c| **c == claim).count();

        set.add(&claim);

        let after = set.claims().iter().filter(|c| **c == claim).count();
        prop_assert!(set.contains(&claim));
        prop_assert_eq!(after, before + 1);
    }

    #[test]
    fn given_any_set_when_existing_claim_removed_then_one_copy_is_gone(
        claims in prop::collection::vec(claim_strategy(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut set = ClaimSet::new();
        for (ct, cv) in &claims {
            set.add(&Claim::new(ct.as_str(), cv.as_str()));
        }
        let (t, v) = &claims[pick.index(claims.len())];
        let claim = Claim::new(t.as_str(), v.as_str());
        let before = set.claims().iter().filter(|c| **c == claim).count();

        set.remove(&claim);

        let after = set.claims().iter().filter(|c| **c == claim).count();
        prop_assert_eq!(after, before - 1);
        prop_assert_eq!(set.contains(&claim), after > 0);
        let type_remains = set.claim_types().any(|ct| ct == t.as_str());
        prop_assert_eq!(type_remains, !set.entry_by_type(t).claim_values.is_empty());
    }
}
