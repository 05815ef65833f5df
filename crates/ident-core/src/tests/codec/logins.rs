use crate::{CoreError, EncodedLogins, LoginSet, UserLoginInfo};

fn login(provider: &str, key: &str) -> UserLoginInfo {
    UserLoginInfo::new(provider, key, None)
}

#[test]
fn given_login_without_display_name_when_added_then_display_name_defaults_to_provider() {
    let mut set = LoginSet::new();

    set.add(&login("github", "123"));

    assert_eq!(
        set.logins()[0].provider_display_name.as_deref(),
        Some("github")
    );
}

#[test]
fn given_login_with_display_name_when_added_then_display_name_is_kept() {
    let mut set = LoginSet::new();

    set.add(&UserLoginInfo::new(
        "github",
        "123",
        Some("GitHub".to_string()),
    ));

    assert_eq!(
        set.logins()[0].provider_display_name.as_deref(),
        Some("GitHub")
    );
}

#[test]
fn given_logins_when_encoded_then_three_parallel_sequences_in_insertion_order() {
    let mut set = LoginSet::new();
    set.add(&login("github", "123"));
    set.add(&UserLoginInfo::new("google", "abc", Some("Google".to_string())));

    let encoded = set.encode();

    assert_eq!(encoded.login_providers, vec!["github", "google"]);
    assert_eq!(encoded.login_provider_keys, vec!["123", "abc"]);
    assert_eq!(encoded.login_provider_display_names, vec!["github", "Google"]);
}

#[test]
fn given_encoded_logins_when_decoded_then_triples_are_zipped_by_position() {
    let mut set = LoginSet::new();
    set.add(&login("github", "123"));
    set.add(&login("google", "abc"));

    let decoded = LoginSet::decode(set.encode()).unwrap();

    assert_eq!(decoded, set);
}

#[test]
fn given_sequences_of_different_length_when_decoded_then_corrupt_document() {
    let result = LoginSet::decode(EncodedLogins {
        login_providers: vec!["github".to_string()],
        login_provider_keys: vec!["123".to_string()],
        login_provider_display_names: vec![],
    });

    assert!(matches!(result, Err(CoreError::CorruptDocument { .. })));
}

#[test]
fn given_two_bindings_from_one_provider_when_removing_second_key_then_first_stored_binding_is_removed()
 {
    let mut set = LoginSet::new();
    set.add(&login("github", "key1"));
    set.add(&login("github", "key2"));

    set.remove(&login("github", "key2"));

    assert_eq!(set.len(), 1);
    assert!(!set.contains("github", "key1"));
    assert!(set.contains("github", "key2"));
}

#[test]
fn given_unknown_provider_when_removed_then_set_is_unchanged() {
    let mut set = LoginSet::new();
    set.add(&login("github", "123"));
    let before = set.clone();

    set.remove(&login("google", "123"));

    assert_eq!(set, before);
}

#[test]
fn given_middle_binding_when_removed_then_remaining_triples_stay_aligned() {
    let mut set = LoginSet::new();
    set.add(&login("github", "1"));
    set.add(&login("google", "2"));
    set.add(&login("gitlab", "3"));

    set.remove(&login("google", "2"));

    let encoded = set.encode();
    assert_eq!(encoded.login_providers, vec!["github", "gitlab"]);
    assert_eq!(encoded.login_provider_keys, vec!["1", "3"]);
    assert_eq!(encoded.login_provider_display_names, vec!["github", "gitlab"]);
}
