//! Subject (topic) construction.
//!
//! Public: `{stream}.world.{kind}.{world}`
//! Per user: `{stream}.world.{kind}.{world}.user.{user}`
//!
//! Everything here is pure and needs no broker connection.

use crate::{Result as StreamErrorResult, StreamError};

use serde::Serialize;
use vs_core::{ContextLevel, Moment, SharingPolicy};

pub const MOMENT_KIND: &str = "moment";
pub const VIBE_KIND: &str = "vibe";

/// Who a subject is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "user_id", rename_all = "snake_case")]
pub enum Audience {
    Public,
    Creator(String),
    User(String),
}

impl Audience {
    /// How much of a moment this audience may see
    pub fn context_level(&self, sharing: &SharingPolicy) -> ContextLevel {
        match self {
            Self::Creator(_) => ContextLevel::Full,
            Self::Public | Self::User(_) => sharing.context_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub name: String,
    pub audience: Audience,
}

/// Reject empty tokens and anything that would change the subject hierarchy
#[track_caller]
pub fn validate_token(value: &str, field: &str) -> StreamErrorResult<()> {
    if value.is_empty() {
        return Err(StreamError::validation(
            format!("{field} is required"),
            Some(field),
        ));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '.' | '*' | '>'))
    {
        return Err(StreamError::validation(
            format!("{field} '{value}' contains whitespace, '.', '*' or '>'"),
            Some(field),
        ));
    }
    Ok(())
}

pub fn public_subject(stream_id: &str, kind: &str, world_id: &str) -> String {
    format!("{stream_id}.world.{kind}.{world_id}")
}

pub fn user_subject(stream_id: &str, kind: &str, world_id: &str, user_id: &str) -> String {
    format!("{stream_id}.world.{kind}.{world_id}.user.{user_id}")
}

/// Full fan-out for one world update.
///
/// The public subject only when the policy is public, the creator's own
/// subject when a creator is set, then one subject per allowed user other
/// than the creator.
pub fn create_subjects(
    stream_id: &str,
    kind: &str,
    world_id: &str,
    creator_id: &str,
    sharing: &SharingPolicy,
) -> StreamErrorResult<Vec<Subject>> {
    if world_id.is_empty() {
        return Err(StreamError::validation(
            "world ID is required",
            Some("world_id"),
        ));
    }
    validate_token(world_id, "world ID")?;
    validate_token(stream_id, "stream ID")?;

    let mut subjects = Vec::with_capacity(2 + sharing.allowed_users.len());

    if sharing.is_public {
        subjects.push(Subject {
            name: public_subject(stream_id, kind, world_id),
            audience: Audience::Public,
        });
    }

    if !creator_id.is_empty() {
        validate_token(creator_id, "creator ID")?;
        subjects.push(Subject {
            name: user_subject(stream_id, kind, world_id, creator_id),
            audience: Audience::Creator(creator_id.to_string()),
        });
    }

    // BTreeSet: already unique and ordered
    for user_id in &sharing.allowed_users {
        if user_id == creator_id {
            continue;
        }
        validate_token(user_id, "user ID")?;
        subjects.push(Subject {
            name: user_subject(stream_id, kind, world_id, user_id),
            audience: Audience::User(user_id.clone()),
        });
    }

    Ok(subjects)
}

pub fn moment_subjects(stream_id: &str, moment: &Moment) -> StreamErrorResult<Vec<Subject>> {
    create_subjects(
        stream_id,
        MOMENT_KIND,
        &moment.world_id,
        &moment.creator_id,
        &moment.sharing,
    )
}

pub fn vibe_subjects(
    stream_id: &str,
    world_id: &str,
    creator_id: &str,
    sharing: &SharingPolicy,
) -> StreamErrorResult<Vec<Subject>> {
    create_subjects(stream_id, VIBE_KIND, world_id, creator_id, sharing)
}
