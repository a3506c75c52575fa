//! Event streams applied through the dispatcher

use pretty_assertions::assert_eq;

use gateway_state::application::DispatchOutcome;
use gateway_state::domain::CacheEvent;

use crate::common::{dispatcher, CHANNEL_ID, GUILD_ID};

fn event(raw: &str) -> CacheEvent {
    serde_json::from_str(raw).unwrap()
}

#[test]
fn test_guild_create_seeds_members_and_users() {
    let dispatcher = dispatcher(50);

    dispatcher
        .dispatch(
            0,
            event(
                r#"{"t":"GUILD_CREATE","d":{
                    "id":"g1","name":"guild","member_count":2,
                    "channels":[{"id":"c1","name":"general"}],
                    "members":[
                        {"guild_id":"g1","user":{"id":"u1","username":"alice"}},
                        {"guild_id":"g1","user":{"id":"u2","username":"bob"}}
                    ]
                }}"#,
            ),
        )
        .unwrap();

    let state = dispatcher.state();
    let shard = state.shard(0).unwrap();
    assert_eq!(shard.members(GUILD_ID).unwrap().len(), 2);
    assert_eq!(state.user("u2").unwrap().read().username, "bob");

    let channel = shard.channel(GUILD_ID, CHANNEL_ID).unwrap();
    assert_eq!(channel.read().guild_id.as_deref(), Some(GUILD_ID));
}

#[test]
fn test_guild_update_does_not_reset_members() {
    let dispatcher = dispatcher(50);
    dispatcher
        .dispatch(0, event(r#"{"t":"GUILD_CREATE","d":{"id":"g1","name":"guild"}}"#))
        .unwrap();
    dispatcher
        .dispatch(
            0,
            event(r#"{"t":"GUILD_MEMBER_ADD","d":{"guild_id":"g1","user":{"id":"u1","username":"alice"}}}"#),
        )
        .unwrap();

    dispatcher
        .dispatch(0, event(r#"{"t":"GUILD_UPDATE","d":{"id":"g1","name":"renamed"}}"#))
        .unwrap();

    let shard = dispatcher.state().shard(0).unwrap();
    assert_eq!(shard.members(GUILD_ID).unwrap().len(), 1);
    let guild = shard.guild(GUILD_ID).unwrap();
    assert_eq!(guild.read().name, "renamed");
    assert_eq!(guild.read().member_count, 1);
}

#[test]
fn test_message_stream_through_dispatcher() {
    let dispatcher = dispatcher(2);
    let stream = [
        r#"{"t":"GUILD_CREATE","d":{"id":"g1","channels":[{"id":"c1","name":"general"}]}}"#,
        r#"{"t":"MESSAGE_CREATE","d":{"id":"m1","channel_id":"c1","guild_id":"g1","content":"a","timestamp":"2024-01-01T00:00:00Z","author":{"id":"u1","username":"alice"}}}"#,
        r#"{"t":"MESSAGE_CREATE","d":{"id":"m2","channel_id":"c1","guild_id":"g1","content":"b","timestamp":"2024-01-01T00:00:01Z"}}"#,
        r#"{"t":"MESSAGE_CREATE","d":{"id":"m3","channel_id":"c1","guild_id":"g1","content":"c","timestamp":"2024-01-01T00:00:02Z"}}"#,
        r#"{"t":"MESSAGE_UPDATE","d":{"id":"m3","channel_id":"c1","guild_id":"g1","content":"c2"}}"#,
    ];

    for raw in stream {
        assert_eq!(dispatcher.dispatch(0, event(raw)).unwrap(), DispatchOutcome::Applied);
    }

    let state = dispatcher.state();
    let shard = state.shard(0).unwrap();
    let channel = shard.channel(GUILD_ID, CHANNEL_ID).unwrap();
    assert_eq!(channel.read().message_ids(), vec!["m2", "m3"]);
    assert_eq!(shard.message(GUILD_ID, CHANNEL_ID, "m3").unwrap().read().content, "c2");
    assert_eq!(state.user("u1").unwrap().read().username, "alice");

    // m1 was evicted, so updating it is a no-op
    let outcome = dispatcher
        .dispatch(
            0,
            event(r#"{"t":"MESSAGE_UPDATE","d":{"id":"m1","channel_id":"c1","guild_id":"g1","content":"late"}}"#),
        )
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn test_bulk_delete_removes_known_messages() {
    let dispatcher = dispatcher(50);
    dispatcher
        .dispatch(
            0,
            event(r#"{"t":"GUILD_CREATE","d":{"id":"g1","channels":[{"id":"c1","name":"general"}]}}"#),
        )
        .unwrap();
    for id in ["m1", "m2", "m3"] {
        let raw = format!(
            r#"{{"t":"MESSAGE_CREATE","d":{{"id":"{}","channel_id":"c1","guild_id":"g1","content":"x","timestamp":"2024-01-01T00:00:00Z"}}}}"#,
            id
        );
        dispatcher.dispatch(0, event(&raw)).unwrap();
    }

    let outcome = dispatcher
        .dispatch(
            0,
            event(r#"{"t":"MESSAGE_DELETE_BULK","d":{"ids":["m1","m3","m9"],"channel_id":"c1","guild_id":"g1"}}"#),
        )
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied);
    let channel = dispatcher.state().shard(0).unwrap().channel(GUILD_ID, CHANNEL_ID).unwrap();
    assert_eq!(channel.read().message_ids(), vec!["m2"]);
}

#[test]
fn test_role_and_emoji_events() {
    let dispatcher = dispatcher(50);
    let stream = [
        r#"{"t":"GUILD_CREATE","d":{"id":"g1"}}"#,
        r#"{"t":"GUILD_ROLE_CREATE","d":{"guild_id":"g1","role":{"id":"r1","name":"mods"}}}"#,
        r#"{"t":"GUILD_ROLE_UPDATE","d":{"guild_id":"g1","role":{"id":"r1","name":"admins"}}}"#,
        r#"{"t":"GUILD_EMOJIS_UPDATE","d":{"guild_id":"g1","emojis":[{"id":"e1","name":"wave"}]}}"#,
    ];
    for raw in stream {
        dispatcher.dispatch(0, event(raw)).unwrap();
    }

    let shard = dispatcher.state().shard(0).unwrap();
    assert_eq!(shard.role(GUILD_ID, "r1").unwrap().name, "admins");
    assert_eq!(shard.guild(GUILD_ID).unwrap().read().roles.len(), 1);
    assert_eq!(shard.emoji_by_name(GUILD_ID, "wave", false).unwrap().id, "e1");

    let outcome = dispatcher
        .dispatch(0, event(r#"{"t":"GUILD_ROLE_DELETE","d":{"guild_id":"g1","role_id":"r2"}}"#))
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Skipped);
}

#[test]
fn test_voice_leave_for_unknown_user_is_applied() {
    let dispatcher = dispatcher(50);
    dispatcher
        .dispatch(0, event(r#"{"t":"GUILD_CREATE","d":{"id":"g1"}}"#))
        .unwrap();

    let outcome = dispatcher
        .dispatch(
            0,
            event(r#"{"t":"VOICE_STATE_UPDATE","d":{"guild_id":"g1","user_id":"u1","channel_id":null}}"#),
        )
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied);
    let guild = dispatcher.state().shard(0).unwrap().guild(GUILD_ID).unwrap();
    assert!(guild.read().voice_states.is_empty());
}

#[test]
fn test_members_chunk_scopes_members_to_its_guild() {
    let dispatcher = dispatcher(50);
    dispatcher
        .dispatch(0, event(r#"{"t":"GUILD_CREATE","d":{"id":"g1","name":"guild","member_count":1}}"#))
        .unwrap();

    let outcome = dispatcher
        .dispatch(
            0,
            event(
                r#"{"t":"GUILD_MEMBERS_CHUNK","d":{"guild_id":"g1","members":[
                    {"user":{"id":"u1","username":"alice"}},
                    {"guild_id":"g1","user":{"id":"u2","username":"bob"},"nick":"bobby"}
                ]}}"#,
            ),
        )
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied);
    let state = dispatcher.state();
    let shard = state.shard(0).unwrap();
    assert_eq!(shard.member(GUILD_ID, "u1").unwrap().read().guild_id, GUILD_ID);
    assert_eq!(shard.member(GUILD_ID, "u2").unwrap().read().nick.as_deref(), Some("bobby"));
    assert_eq!(state.user("u1").unwrap().read().username, "alice");
    assert_eq!(shard.members(GUILD_ID).unwrap().len(), 2);
    assert_eq!(shard.guild(GUILD_ID).unwrap().read().member_count, 1);
}

#[test]
fn test_duplicate_member_add_counts_once() {
    let dispatcher = dispatcher(50);
    dispatcher
        .dispatch(0, event(r#"{"t":"GUILD_CREATE","d":{"id":"g1","name":"guild","member_count":1}}"#))
        .unwrap();

    let add = r#"{"t":"GUILD_MEMBER_ADD","d":{"guild_id":"g1","user":{"id":"u1","username":"alice"}}}"#;
    for _ in 0..3 {
        dispatcher.dispatch(0, event(add)).unwrap();
    }

    let shard = dispatcher.state().shard(0).unwrap();
    assert_eq!(shard.members(GUILD_ID).unwrap().len(), 1);
    assert_eq!(shard.guild(GUILD_ID).unwrap().read().member_count, 2);
}
