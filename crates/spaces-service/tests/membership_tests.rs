//! Membership engine behaviour against the in-memory store

mod common;

use chrono::Duration;

use spaces_core::traits::Store;
use spaces_core::{
    DomainError, ModerationPolicy, PolicyViolation, RestraintKind, Scope, SpaceRole,
};
use spaces_service::dto::RestrainRequest;
use spaces_service::ServiceError;

use common::Harness;

fn mute_for(hours: i64, h: &Harness) -> RestrainRequest {
    RestrainRequest {
        kind: RestraintKind::Mute,
        expires_at: Some(h.ctx.now() + Duration::hours(hours)),
        reason: None,
    }
}

// ============================================================================
// Space membership
// ============================================================================

#[tokio::test]
async fn test_concurrent_space_joins_admit_exactly_one() {
    let h = Harness::new();
    let owner = h.user("owner").await;
    let joiner = h.user("joiner").await;
    let space = h.space(&owner, "S1").await;

    let membership = h.membership();
    let attempts = (0..8).map(|_| membership.add_space_member(space.id, joiner.id, SpaceRole::Member));
    let results = futures::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(ServiceError::is_conflict));

    let members = h.membership().space_members(space.id).await.unwrap();
    assert_eq!(members.iter().filter(|m| m.user_id == joiner.id).count(), 1);
}

#[tokio::test]
async fn test_space_creator_is_owner_member() {
    let h = Harness::new();
    let owner = h.user("owner").await;
    let space = h.space(&owner, "S1").await;

    let members = h.membership().space_members(space.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, owner.id);
    assert_eq!(members[0].role, SpaceRole::Owner);
}

#[tokio::test]
async fn test_add_space_member_not_found_cases() {
    let h = Harness::new();
    let owner = h.user("owner").await;
    let space = h.space(&owner, "S1").await;
    let ghost = h.ctx.generate_id();

    let err = h
        .membership()
        .add_space_member(space.id, ghost, SpaceRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::UserNotFound(id)) if id == ghost));

    let joiner = h.user("joiner").await;
    h.content()
        .soft_delete(spaces_service::ContentKind::Space, space.id)
        .await
        .unwrap();
    let err = h
        .membership()
        .add_space_member(space.id, joiner.id, SpaceRole::Member)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_set_space_role() {
    let h = Harness::new();
    let s = h.scenario().await;

    let promoted = h
        .membership()
        .set_space_role(s.space.id, s.u1.id, SpaceRole::Admin)
        .await
        .unwrap();
    assert!(promoted.can_moderate());

    let stranger = h.user("stranger").await;
    let err = h
        .membership()
        .set_space_role(s.space.id, stranger.id, SpaceRole::Admin)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Channel membership
// ============================================================================

#[tokio::test]
async fn test_channel_join_requires_space_membership() {
    let h = Harness::new();
    let s = h.scenario().await;
    let u2 = h.user("u2").await;

    let err = h
        .membership()
        .add_channel_member(s.channel.id, u2.id)
        .await
        .unwrap_err();
    assert!(err.is_policy_violation());
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::Policy(PolicyViolation::NotSpaceMember { space_id }))
            if space_id == s.space.id
    ));

    // Accepted once admitted to the space
    h.membership()
        .add_space_member(s.space.id, u2.id, SpaceRole::Member)
        .await
        .unwrap();
    h.membership().add_channel_member(s.channel.id, u2.id).await.unwrap();

    let err = h
        .membership()
        .add_channel_member(s.channel.id, u2.id)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn test_channel_join_on_deleted_channel_is_not_found() {
    let h = Harness::new();
    let s = h.scenario().await;
    let u2 = h.user("u2").await;
    h.membership()
        .add_space_member(s.space.id, u2.id, SpaceRole::Member)
        .await
        .unwrap();
    h.content()
        .soft_delete(spaces_service::ContentKind::Channel, s.channel.id)
        .await
        .unwrap();

    let err = h
        .membership()
        .add_channel_member(s.channel.id, u2.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::ChannelNotFound(_))));
}

#[tokio::test]
async fn test_leaving_space_drops_channel_memberships() {
    let h = Harness::new();
    let s = h.scenario().await;
    let second = h.channel(&s.space, "C2").await;
    h.membership().add_channel_member(second.id, s.u1.id).await.unwrap();

    assert!(h.membership().remove_member(Scope::Space(s.space.id), s.u1.id).await.unwrap());

    assert!(h.membership().channel_members(s.channel.id).await.unwrap().is_empty());
    assert!(h.membership().channel_members(second.id).await.unwrap().is_empty());
    assert!(!h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());

    // Idempotent
    assert!(!h.membership().remove_member(Scope::Space(s.space.id), s.u1.id).await.unwrap());
    assert!(!h.membership().remove_member(Scope::Channel(s.channel.id), s.u1.id).await.unwrap());
}

#[tokio::test]
async fn test_channel_join_racing_space_removal_keeps_membership_implication() {
    let h = Harness::new();
    let owner = h.user("owner").await;
    let space = h.space(&owner, "S1").await;
    let channel = h.channel(&space, "C1").await;

    for round in 0..4 {
        let joiner = h.user(&format!("joiner{round}")).await;
        h.membership()
            .add_space_member(space.id, joiner.id, SpaceRole::Member)
            .await
            .unwrap();

        let membership = h.membership();
        let (joined, removed) = tokio::join!(
            membership.add_channel_member(channel.id, joiner.id),
            membership.remove_member(Scope::Space(space.id), joiner.id),
        );
        assert!(removed.unwrap());

        // Whichever ran first, no channel membership outlives the space one
        if let Err(err) = joined {
            assert!(err.is_policy_violation());
        }
        let in_space = h
            .membership()
            .space_members(space.id)
            .await
            .unwrap()
            .iter()
            .any(|m| m.user_id == joiner.id);
        let in_channel = h
            .membership()
            .channel_members(channel.id)
            .await
            .unwrap()
            .iter()
            .any(|m| m.user_id == joiner.id);
        assert!(!in_space);
        assert!(!in_channel);
    }
}

// ============================================================================
// Restraints
// ============================================================================

#[tokio::test]
async fn test_mute_blocks_posting_until_expiry() {
    let h = Harness::new();
    let s = h.scenario().await;
    assert!(h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());

    h.membership()
        .restrain(Scope::Channel(s.channel.id), s.u1.id, s.owner.id, mute_for(1, &h))
        .await
        .unwrap();
    assert!(!h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());

    h.advance(Duration::minutes(59));
    assert!(!h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());

    h.advance(Duration::minutes(2));
    assert!(h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());
}

#[tokio::test]
async fn test_lazy_expiry_boundary() {
    let h = Harness::new();
    let s = h.scenario().await;
    let scope = Scope::Channel(s.channel.id);

    let restraint = h
        .membership()
        .restrain(scope, s.u1.id, s.owner.id, mute_for(1, &h))
        .await
        .unwrap();
    let expires_at = restraint.expires_at.unwrap();
    let membership = h.membership();

    assert!(membership.is_restrained(scope, s.u1.id, h.ctx.now()).await.unwrap());
    assert!(membership
        .is_restrained(scope, s.u1.id, expires_at - Duration::milliseconds(1))
        .await
        .unwrap());
    assert!(!membership.is_restrained(scope, s.u1.id, expires_at).await.unwrap());
    assert!(!membership
        .is_restrained(scope, s.u1.id, expires_at + Duration::days(1))
        .await
        .unwrap());

    // The row is still stored: nothing cleaned it up
    let stored = membership
        .restraints_in_scope(scope, h.ctx.now())
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_space_restraint_blocks_every_channel() {
    let h = Harness::new();
    let s = h.scenario().await;

    let ban = RestrainRequest {
        kind: RestraintKind::Ban,
        expires_at: None,
        reason: Some("spam".into()),
    };
    h.membership()
        .restrain(Scope::Space(s.space.id), s.u1.id, s.owner.id, ban)
        .await
        .unwrap();

    assert!(!h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());

    assert!(h
        .membership()
        .revoke_restraint(Scope::Space(s.space.id), s.u1.id)
        .await
        .unwrap());
    assert!(h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());
    assert!(!h
        .membership()
        .revoke_restraint(Scope::Space(s.space.id), s.u1.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_restrain_is_most_recent_wins() {
    let h = Harness::new();
    let s = h.scenario().await;
    let scope = Scope::Channel(s.channel.id);

    h.membership()
        .restrain(scope, s.u1.id, s.owner.id, mute_for(24, &h))
        .await
        .unwrap();
    h.membership()
        .restrain(scope, s.u1.id, s.owner.id, RestrainRequest {
            kind: RestraintKind::Timeout,
            expires_at: Some(h.ctx.now() + Duration::minutes(5)),
            reason: None,
        })
        .await
        .unwrap();

    let active = h
        .membership()
        .active_restraint(scope, s.u1.id, h.ctx.now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.kind, RestraintKind::Timeout);

    h.advance(Duration::minutes(10));
    assert!(h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());
}

#[tokio::test]
async fn test_restrain_unknown_scope_is_not_found() {
    let h = Harness::new();
    let s = h.scenario().await;
    let missing = h.ctx.generate_id();

    let err = h
        .membership()
        .restrain(Scope::Channel(missing), s.u1.id, s.owner.id, mute_for(1, &h))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    h.content()
        .soft_delete(spaces_service::ContentKind::Space, s.space.id)
        .await
        .unwrap();
    let err = h
        .membership()
        .restrain(Scope::Space(s.space.id), s.u1.id, s.owner.id, mute_for(1, &h))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_policy_decides_which_kinds_block() {
    let h = Harness::with_policy(ModerationPolicy::new([RestraintKind::Ban]));
    let s = h.scenario().await;

    h.membership()
        .restrain(Scope::Channel(s.channel.id), s.u1.id, s.owner.id, mute_for(1, &h))
        .await
        .unwrap();

    // Restrained, but a mute does not block posting under this policy
    assert!(h
        .membership()
        .is_restrained(Scope::Channel(s.channel.id), s.u1.id, h.ctx.now())
        .await
        .unwrap());
    assert!(h.membership().can_post(s.channel.id, s.u1.id).await.unwrap());
}

#[tokio::test]
async fn test_purge_removes_only_expired() {
    let h = Harness::new();
    let s = h.scenario().await;
    let u2 = h.user("u2").await;
    let scope = Scope::Space(s.space.id);

    h.membership()
        .restrain(scope, s.u1.id, s.owner.id, mute_for(1, &h))
        .await
        .unwrap();
    h.membership()
        .restrain(scope, u2.id, s.owner.id, RestrainRequest {
            kind: RestraintKind::Ban,
            expires_at: None,
            reason: None,
        })
        .await
        .unwrap();

    h.advance(Duration::hours(2));
    assert_eq!(h.membership().purge_expired_restraints().await.unwrap(), 1);
    assert_eq!(h.membership().purge_expired_restraints().await.unwrap(), 0);

    let remaining = h.membership().restraints_in_scope(scope, h.ctx.now()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, u2.id);
}

// ============================================================================
// Store lifecycle
// ============================================================================

#[tokio::test]
async fn test_teardown_twice_on_empty_store() {
    let h = Harness::new();

    h.store.teardown().await.unwrap();
    h.store.teardown().await.unwrap();

    h.store.provision().await.unwrap();
    let user = h.user("after").await;
    h.store.teardown().await.unwrap();
    assert!(h.users().get_user(user.id).await.unwrap_err().is_not_found());
}
