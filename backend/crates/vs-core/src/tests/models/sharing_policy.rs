use crate::{ContextLevel, SharingPolicy};

#[test]
fn given_default_policy_then_private_to_creator() {
    let policy = SharingPolicy::default();

    assert!(!policy.is_public);
    assert!(policy.allowed_users.is_empty());
    assert!(policy.is_private_to_creator());
}

#[test]
fn given_allowed_users_then_not_private_to_creator() {
    let policy = SharingPolicy::private().with_allowed_users(["bob"]);

    assert!(!policy.is_private_to_creator());
}

#[test]
fn given_creator_when_level_for_then_full_regardless_of_policy() {
    let policy = SharingPolicy::public(ContextLevel::None);

    assert_eq!(policy.level_for("alice", "alice"), ContextLevel::Full);
    assert_eq!(policy.level_for("bob", "alice"), ContextLevel::None);
}

#[test]
fn given_empty_creator_when_level_for_empty_recipient_then_policy_level() {
    let policy = SharingPolicy::public(ContextLevel::Partial);

    assert_eq!(policy.level_for("", ""), ContextLevel::Partial);
}

#[test]
fn given_json_without_fields_when_deserialized_then_defaults() {
    let policy: SharingPolicy = serde_json::from_str("{}").unwrap();

    assert_eq!(policy, SharingPolicy::private());
}
