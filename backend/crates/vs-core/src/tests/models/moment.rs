use crate::{
    BinaryAttachment, BinaryEncoding, ContextLevel, CustomPayload, Moment, MomentView,
    SensorReadings, SharingPolicy, Vibe, WorldCore, WorldKind,
};

use chrono::Utc;

fn sample_moment(level: ContextLevel) -> Moment {
    let core = WorldCore {
        name: "Office".to_string(),
        kind: WorldKind::Physical,
        occupancy: 5,
        activity_level: 0.4,
    };

    Moment::new("office", core, Utc::now())
        .with_creator("alice")
        .with_viewers(["alice", "bob"])
        .with_sharing(SharingPolicy::public(level))
        .with_vibe(Some(Vibe::new("focus", "Focus", "calm", 0.3).snapshot()))
        .with_sensors(Some(SensorReadings {
            temperature: Some(21.5),
            movement: Some(0.2),
            ..SensorReadings::default()
        }))
        .with_custom(Some(CustomPayload::Note("standup at 10".to_string())))
        .with_attachment(Some(BinaryAttachment::new(
            b"hi".to_vec(),
            BinaryEncoding::Base64,
            "text/plain",
        )))
}

#[test]
fn given_duplicate_viewers_when_added_then_kept_once_in_order() {
    let moment = sample_moment(ContextLevel::Full)
        .with_viewer("carol")
        .with_viewer("alice");

    assert_eq!(moment.viewers(), ["alice", "bob", "carol"]);
}

#[test]
fn given_empty_viewer_when_added_then_ignored() {
    let moment = sample_moment(ContextLevel::Full).with_viewer("");

    assert_eq!(moment.viewers().len(), 2);
}

#[test]
fn given_none_level_when_projected_then_only_identifier_and_timestamp() {
    let moment = sample_moment(ContextLevel::None);

    let view = moment.project(ContextLevel::None).unwrap();

    assert_eq!(view.world_id, "office");
    assert_eq!(view.timestamp, moment.timestamp);
    assert!(view.creator_id.is_none());
    assert!(view.world.is_none());
    assert!(view.vibe.is_none());
    assert!(view.viewers.is_none());
    assert!(view.sensors.is_none());
    assert!(view.custom.is_none());
    assert!(view.attachment.is_none());
}

#[test]
fn given_partial_level_when_projected_then_core_without_detail() {
    let moment = sample_moment(ContextLevel::Partial);

    let view = moment.project(ContextLevel::Partial).unwrap();

    assert_eq!(view.creator_id.as_deref(), Some("alice"));
    assert_eq!(view.world.as_ref().map(|w| w.occupancy), Some(5));
    assert!(view.vibe.is_some());
    assert!(view.viewers.is_none());
    assert!(view.sensors.is_none());
    assert!(view.custom.is_none());
    assert!(view.attachment.is_none());
}

#[test]
fn given_full_level_when_projected_then_everything_included() {
    let moment = sample_moment(ContextLevel::Full);

    let view = moment.project(ContextLevel::Full).unwrap();

    assert_eq!(view.viewers.as_deref(), Some(&["alice".to_string(), "bob".to_string()][..]));
    assert!(view.sharing.is_some());
    assert_eq!(view.sensors.and_then(|s| s.temperature), Some(21.5));
    assert!(view.custom.is_some());
    assert_eq!(view.attachment.map(|a| a.data), Some("aGk=".to_string()));
}

#[test]
fn given_creator_when_project_for_then_full_even_if_policy_none() {
    let moment = sample_moment(ContextLevel::None);

    let creator_view = moment.project_for("alice").unwrap();
    let other_view = moment.project_for("bob").unwrap();

    assert_eq!(creator_view.context_level, ContextLevel::Full);
    assert_eq!(other_view.context_level, ContextLevel::None);
}

#[test]
fn given_invalid_raw_attachment_when_projected_full_then_error() {
    let moment = sample_moment(ContextLevel::Full).with_attachment(Some(BinaryAttachment::new(
        vec![0xff],
        BinaryEncoding::Raw,
        "bin",
    )));

    assert!(moment.project(ContextLevel::Full).is_err());
    // Attachments are not part of partial projections, so no encoding happens
    assert!(moment.project(ContextLevel::Partial).is_ok());
}

#[test]
fn given_view_when_serialized_then_decodes_to_same_view() {
    let view = sample_moment(ContextLevel::Partial)
        .project(ContextLevel::Partial)
        .unwrap();

    let bytes = view.to_json_bytes().unwrap();
    let decoded = MomentView::from_json_slice(&bytes).unwrap();

    assert_eq!(decoded, view);
    let text = String::from_utf8(bytes).unwrap();
    assert!(!text.contains("sensors"));
}
