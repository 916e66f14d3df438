use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use matryx_e2ee_entity::types::{CreateRoomRequest, PowerLevelsContent};
use matryx_e2ee_filter::{
    EncryptedRoomFilter,
    FilterConfig,
    ThirdPartyEventRules,
    Verdict,
    room::{REQUESTER_DOMAIN_DENIED, ROOM_DOMAIN_DENIED, synthesize_power_levels},
};

fn filter(users_of: &[&str], rooms_of: &[&str], patch_power_levels: bool) -> EncryptedRoomFilter {
    let config = FilterConfig::new(
        users_of.iter().map(|d| d.to_string()).collect(),
        rooms_of.iter().map(|d| d.to_string()).collect(),
        patch_power_levels,
    );
    EncryptedRoomFilter::new(Arc::new(config))
}

fn encryption_event(sender: &str, room_id: &str) -> Value {
    json!({
        "type": "m.room.encryption",
        "state_key": "",
        "sender": sender,
        "room_id": room_id,
        "content": {"algorithm": "m.megolm.v1.aes-sha2"}
    })
}

#[test]
fn scenario_a_room_created_without_deny_lists() {
    let rules = filter(&[], &[], false);
    let request = CreateRoomRequest::from_value(json!({
        "initial_state": [
            {"type": "m.room.name", "state_key": "", "content": {"name": "Team"}}
        ]
    }))
    .unwrap();

    let output = rules.on_create_room("@alice:good.org", false, request).unwrap();

    assert_eq!(output.initial_state.len(), 2);
    assert_eq!(output.initial_state[0].event_type, "m.room.name");
    assert_eq!(output.initial_state[0].content, json!({"name": "Team"}));

    let power_levels = &output.initial_state[1];
    assert_eq!(power_levels.event_type, "m.room.power_levels");
    assert_eq!(power_levels.content["users"], json!({"@alice:good.org": 100}));
    assert_eq!(power_levels.content["events"]["m.room.encryption"], json!(150));
}

#[test]
fn scenario_b_requester_domain_denied() {
    let rules = filter(&["example.org"], &[], false);
    let verdict = rules.check_event_allowed(&encryption_event("@bob:example.org", "!x:good.org"));

    assert_eq!(verdict, Verdict::deny(REQUESTER_DOMAIN_DENIED));
    assert_eq!(verdict.reason(), Some("encryption not allowed: requester domain denied"));
}

#[test]
fn scenario_c_room_domain_denied() {
    let rules = filter(&[], &["example.org"], false);
    let verdict = rules.check_event_allowed(&encryption_event("@alice:good.org", "!x:example.org"));

    assert_eq!(verdict, Verdict::deny(ROOM_DOMAIN_DENIED));
}

#[test]
fn scenario_d_seed_with_elevated_co_owner() {
    let rules = filter(&[], &[], true);
    let request = CreateRoomRequest::from_value(json!({
        "initial_state": [{
            "type": "m.room.power_levels",
            "state_key": "",
            "content": {"users": {"@alice:x": 100, "@carol:x": 150}}
        }]
    }))
    .unwrap();

    let output = rules.on_create_room("@alice:x", false, request).unwrap();

    assert_eq!(output.initial_state.len(), 1);
    let content = &output.initial_state[0].content;
    assert_eq!(content["users"], json!({"@alice:x": 100, "@carol:x": 150}));
    assert_eq!(content["events"]["m.room.encryption"], json!(200));
}

#[rstest]
#[case("!x:good.org")]
#[case("!x:example.org")]
#[case("!x:elsewhere.net:8448")]
fn denied_requester_is_denied_in_any_room(#[case] room_id: &str) {
    let rules = filter(&["example.org"], &["example.org"], false);
    let verdict = rules.check_event_allowed(&encryption_event("@bob:example.org", room_id));

    assert_eq!(verdict, Verdict::deny(REQUESTER_DOMAIN_DENIED));
}

#[rstest]
#[case("@alice:good.org")]
#[case("@carol:third.example")]
fn denied_room_blocks_allowed_requesters(#[case] sender: &str) {
    let rules = filter(&["example.org"], &["rooms.example"], false);
    let verdict = rules.check_event_allowed(&encryption_event(sender, "!abc:rooms.example"));

    assert_eq!(verdict, Verdict::deny(ROOM_DOMAIN_DENIED));
}

#[rstest]
#[case(json!({"type": "m.room.name", "sender": "@bob:example.org", "room_id": "!x:example.org", "content": {"name": "n"}}))]
#[case(json!({"type": "m.room.power_levels", "sender": "@bob:example.org", "room_id": "!x:example.org", "content": {}}))]
#[case(json!({"type": "m.room.message", "sender": "@bob:example.org", "room_id": "!x:example.org", "content": {"body": "hi"}}))]
#[case(json!({"type": "m.room.encrypted", "room_id": "!x:example.org"}))]
fn non_encryption_events_are_allowed(#[case] event: Value) {
    let rules = filter(&["example.org"], &["example.org"], false);
    assert_eq!(rules.check_event_allowed(&event), Verdict::Allow);
}

#[rstest]
#[case(None)]
#[case(Some(json!({})))]
#[case(Some(json!({"users": {"@alice:x": 100}})))]
#[case(Some(json!({"users": {"@alice:x": 100, "@bob:x": 99, "@carol:x": 250}})))]
#[case(Some(json!({"users": {}, "users_default": 60})))]
#[case(Some(json!({"users": {"@alice:x": -10}, "events": {"m.room.encryption": 0}})))]
fn encryption_threshold_exceeds_every_member(#[case] seed: Option<Value>) {
    let levels = synthesize_power_levels(seed, "@alice:x").unwrap();

    let required = levels.event_level("m.room.encryption").unwrap();
    let users = levels.users.as_ref().unwrap();
    assert!(users.values().all(|level| required > *level));
    assert!(required > levels.users_default.unwrap_or(0));
}

#[test]
fn synthesis_is_stable_when_fed_back() {
    let rules = filter(&[], &[], true);
    let first = rules
        .on_create_room("@alice:good.org", false, CreateRoomRequest::default())
        .unwrap();

    let second = rules.on_create_room("@alice:good.org", false, first.clone()).unwrap();

    assert_eq!(second, first);
    let levels = PowerLevelsContent::from_value(second.initial_state[0].content.clone()).unwrap();
    assert_eq!(levels.event_level("m.room.encryption"), Some(150));
}

#[test]
fn creator_cannot_enable_encryption_after_creation() {
    let rules = filter(&[], &[], false);
    let request = CreateRoomRequest::from_value(json!({
        "initial_state": [
            {"type": "m.room.encryption", "state_key": "", "content": {"algorithm": "m.megolm.v1.aes-sha2"}}
        ]
    }))
    .unwrap();

    let output = rules.on_create_room("@alice:good.org", true, request).unwrap();
    let levels = PowerLevelsContent::from_value(output.initial_state[0].content.clone()).unwrap();

    assert!(!levels.user_can_send_state("@alice:good.org", "m.room.encryption"));
    assert!(levels.user_can_send_state("@alice:good.org", "m.room.power_levels"));
}

#[test]
fn malformed_creation_request_fails_fast() {
    let rules = filter(&[], &[], false);
    let request = CreateRoomRequest::from_value(json!({"initial_state": []})).unwrap();

    assert!(rules.on_create_room("not-a-user-id", false, request).is_err());
    assert!(
        CreateRoomRequest::from_value(json!({"initial_state": [{"content": {}}]})).is_err()
    );
}
