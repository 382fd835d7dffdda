use crate::ContextLevel;

use std::str::FromStr;

#[test]
fn given_levels_when_compared_then_ordered_none_partial_full() {
    assert!(ContextLevel::None < ContextLevel::Partial);
    assert!(ContextLevel::Partial < ContextLevel::Full);
}

#[test]
fn given_levels_when_checking_field_groups_then_tiers_nest() {
    assert!(!ContextLevel::None.includes_core());
    assert!(ContextLevel::Partial.includes_core());
    assert!(!ContextLevel::Partial.includes_detail());
    assert!(ContextLevel::Full.includes_detail());
}

#[test]
fn given_level_when_round_tripped_through_str_then_unchanged() {
    for level in [ContextLevel::None, ContextLevel::Partial, ContextLevel::Full] {
        assert_eq!(ContextLevel::from_str(level.as_str()).unwrap(), level);
    }
    assert!(ContextLevel::from_str("everything").is_err());
}
