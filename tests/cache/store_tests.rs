//! Shard and global store behaviour

use pretty_assertions::assert_eq;
use test_case::test_case;

use gateway_state::domain::{Channel, Emoji, GuildPatch, Role, User, VoiceState};
use gateway_state::infrastructure::cache::State;
use gateway_state::shared::{CacheError, EntityKind, Shared};

use crate::common::{at, member, seeded_shard, state_with_shard, CHANNEL_ID, GUILD_ID};

#[test]
fn test_unknown_guild_on_fresh_shard() {
    let (_, shard) = state_with_shard(50);

    assert_eq!(
        shard.guild("999").unwrap_err(),
        CacheError::not_found(EntityKind::Guild, "999")
    );
}

#[test]
fn test_missing_shard_is_not_instantiated() {
    let state = State::new();

    assert_eq!(state.shard(3).unwrap_err(), CacheError::NotInstantiated);
}

#[test]
fn test_removed_shard_handle_is_not_instantiated() {
    let (state, shard) = seeded_shard(50);
    state.remove_shard(0).unwrap();

    assert!(!shard.is_live());
    assert_eq!(shard.guild(GUILD_ID).unwrap_err(), CacheError::NotInstantiated);
    assert_eq!(shard.member_add(member("u1")).unwrap_err(), CacheError::NotInstantiated);
}

#[test]
fn test_recreated_shard_replaces_previous_store() {
    let (state, old) = seeded_shard(50);
    let new = state.create_shard(0);

    assert!(!old.is_live());
    assert_eq!(new.guild_count().unwrap(), 0);
    assert_eq!(state.shard_count(), 1);
}

#[test]
fn test_guild_handle_observes_updates() {
    let (_, shard) = seeded_shard(50);
    let handle = shard.guild(GUILD_ID).unwrap();

    let mut update = GuildPatch::new(GUILD_ID);
    update.name = "renamed".into();
    shard.guild_add(update).unwrap();

    assert_eq!(handle.read().name, "renamed");
    assert!(Shared::ptr_eq(&handle, &shard.guild(GUILD_ID).unwrap()));
}

#[test]
fn test_guild_update_keeps_omitted_collections() {
    let (_, shard) = seeded_shard(50);
    shard.role_add(GUILD_ID, Role::new("r1", "mods")).unwrap();

    shard.guild_add(GuildPatch::new(GUILD_ID)).unwrap();

    let guild = shard.guild(GUILD_ID).unwrap();
    let guild = guild.read();
    assert_eq!(guild.roles.len(), 1);
    assert_eq!(guild.channels.len(), 1);
}

#[test]
fn test_member_join_time_survives_update_without_one() {
    let (_, shard) = seeded_shard(50);
    let mut joined = member("u1");
    joined.joined_at = Some(at(1_600_000_000));
    shard.member_add(joined).unwrap();

    let mut update = member("u1");
    update.nick = Some("nick".into());
    shard.member_add(update).unwrap();

    let stored = shard.member(GUILD_ID, "u1").unwrap();
    let stored = stored.read();
    assert_eq!(stored.joined_at, Some(at(1_600_000_000)));
    assert_eq!(stored.nick.as_deref(), Some("nick"));
}

#[test]
fn test_member_remove_twice() {
    let (_, shard) = seeded_shard(50);
    shard.member_add(member("u1")).unwrap();

    assert_eq!(shard.member_remove(GUILD_ID, "u1"), Ok(()));
    assert_eq!(
        shard.member_remove(GUILD_ID, "u1").unwrap_err(),
        CacheError::not_found(EntityKind::Member, "u1")
    );
}

#[test]
fn test_members_listed_in_user_order() {
    let (_, shard) = seeded_shard(50);
    for id in ["u3", "u1", "u2"] {
        shard.member_add(member(id)).unwrap();
    }

    let ids: Vec<String> = shard
        .members(GUILD_ID)
        .unwrap()
        .iter()
        .map(|m| m.read().user.id.clone())
        .collect();
    assert_eq!(ids, vec!["u1", "u2", "u3"]);
}

#[test]
fn test_guild_remove_drops_member_map() {
    let (_, shard) = seeded_shard(50);
    shard.member_add(member("u1")).unwrap();

    shard.guild_remove(GUILD_ID).unwrap();

    assert!(shard.member(GUILD_ID, "u1").unwrap_err().is_not_found());
    assert!(shard.guild_remove(GUILD_ID).unwrap_err().is_not_found());
}

#[test]
fn test_leaving_voice_when_not_connected_is_a_no_op() {
    let (_, shard) = seeded_shard(50);

    shard.voice_state_update(VoiceState::left(GUILD_ID, "u1")).unwrap();

    assert!(shard.guild(GUILD_ID).unwrap().read().voice_states.is_empty());
}

#[test]
fn test_voice_state_join_move_leave() {
    let (_, shard) = seeded_shard(50);

    shard
        .voice_state_update(VoiceState::joined(GUILD_ID, "u1", "v1"))
        .unwrap();
    shard
        .voice_state_update(VoiceState::joined(GUILD_ID, "u1", "v2"))
        .unwrap();
    assert_eq!(
        shard.voice_state(GUILD_ID, "u1").unwrap().channel_id.as_deref(),
        Some("v2")
    );
    assert_eq!(shard.guild(GUILD_ID).unwrap().read().voice_states.len(), 1);

    shard.voice_state_update(VoiceState::left(GUILD_ID, "u1")).unwrap();
    assert!(shard.voice_state(GUILD_ID, "u1").unwrap_err().is_not_found());
}

#[test_case(EntityKind::Guild ; "unknown guild")]
#[test_case(EntityKind::Channel ; "unknown channel")]
fn test_channel_lookup_reports_missing_level(kind: EntityKind) {
    let (_, shard) = seeded_shard(50);
    let (guild_id, channel_id) = match kind {
        EntityKind::Guild => ("nope", CHANNEL_ID),
        _ => (GUILD_ID, "nope"),
    };

    let err = shard.channel(guild_id, channel_id).unwrap_err();
    assert_eq!(err.missing_kind(), Some(kind));
}

#[test]
fn test_channel_update_keeps_history() {
    let (_, shard) = seeded_shard(50);
    shard.message_add(GUILD_ID, crate::common::message("m1")).unwrap();

    let mut renamed = Channel::new(CHANNEL_ID, "renamed");
    renamed.topic = Some("news".into());
    shard.channel_add(GUILD_ID, renamed).unwrap();

    let channel = shard.channel(GUILD_ID, CHANNEL_ID).unwrap();
    let channel = channel.read();
    assert_eq!(channel.name, "renamed");
    assert_eq!(channel.message_ids(), vec!["m1"]);
}

#[test]
fn test_user_handle_observes_updates() {
    let state = State::new();
    let handle = state.user_add(User::new("u1", "before"));

    state.user_add(User::new("u1", "after"));

    assert_eq!(handle.read().username, "after");
    assert_eq!(state.user_count(), 1);
}

#[test]
fn test_private_channel_map() {
    let (_, shard) = state_with_shard(50);

    shard.add_private_channel("u1", "dm1").unwrap();
    assert_eq!(shard.private_channel("u1").unwrap().as_deref(), Some("dm1"));

    assert_eq!(shard.remove_private_channel("u1").unwrap().as_deref(), Some("dm1"));
    assert_eq!(shard.remove_private_channel("u1").unwrap(), None);
}

#[test]
fn test_channel_remove_twice() {
    let (_, shard) = seeded_shard(50);

    assert_eq!(shard.channel_remove(GUILD_ID, CHANNEL_ID), Ok(()));
    assert_eq!(
        shard.channel_remove(GUILD_ID, CHANNEL_ID).unwrap_err(),
        CacheError::not_found(EntityKind::Channel, CHANNEL_ID)
    );
    assert!(shard.guild(GUILD_ID).unwrap().read().channels.is_empty());
}

#[test]
fn test_emoji_remove_twice() {
    let (_, shard) = seeded_shard(50);
    shard.emoji_add(GUILD_ID, Emoji::new("e1", "wave")).unwrap();

    assert_eq!(shard.emoji_remove(GUILD_ID, "e1"), Ok(()));
    assert_eq!(
        shard.emoji_remove(GUILD_ID, "e1").unwrap_err(),
        CacheError::not_found(EntityKind::Emoji, "e1")
    );
    assert!(shard.guild(GUILD_ID).unwrap().read().emojis.is_empty());
}
