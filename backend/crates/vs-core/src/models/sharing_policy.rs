use crate::ContextLevel;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Who may receive a moment and how much of it they see.
///
/// A policy that is not public and names no allowed users is private to the
/// moment's creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SharingPolicy {
    pub is_public: bool,
    pub allowed_users: BTreeSet<String>,
    pub context_level: ContextLevel,
}

impl SharingPolicy {
    /// Visible only to the creator
    pub fn private() -> Self {
        Self::default()
    }

    pub fn public(context_level: ContextLevel) -> Self {
        Self {
            is_public: true,
            allowed_users: BTreeSet::new(),
            context_level,
        }
    }

    pub fn with_allowed_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_users.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn is_private_to_creator(&self) -> bool {
        !self.is_public && self.allowed_users.is_empty()
    }

    /// Context level a recipient gets. The creator always gets `Full`.
    pub fn level_for(&self, recipient: &str, creator_id: &str) -> ContextLevel {
        if !creator_id.is_empty() && recipient == creator_id {
            ContextLevel::Full
        } else {
            self.context_level
        }
    }
}
