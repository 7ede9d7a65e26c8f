//! Membership engine
//!
//! Admits users to spaces and channels, records restraints and answers
//! whether a user may post. Restraints expire lazily: a row whose expiry has
//! passed is simply ignored by every check.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use spaces_core::entities::{ChannelMember, ChannelWithSpace, Restraint, SpaceMember};
use spaces_core::policy::{check_posting, PostingContext};
use spaces_core::traits::UnitOfWork;
use spaces_core::{
    DomainError, ModerationPolicy, PolicyViolation, Scope, Snowflake, SpaceRole, Visibility,
};

use crate::dto::RestrainRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Membership service
pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    /// Create a new MembershipService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Space and channel membership
    // ========================================================================

    /// Admit a user to a live space
    #[instrument(skip(self))]
    pub async fn add_space_member(
        &self,
        space_id: Snowflake,
        user_id: Snowflake,
        role: SpaceRole,
    ) -> ServiceResult<SpaceMember> {
        let mut uow = self.ctx.begin().await?;

        uow.find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;
        uow.find_user(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let member = SpaceMember::new(space_id, user_id, role, self.ctx.now());
        uow.insert_space_member(&member).await?;
        uow.commit().await?;

        info!(space_id = %space_id, user_id = %user_id, role = role.as_str(), "Member added to space");
        Ok(member)
    }

    /// Admit a space member to one of the space's live channels
    #[instrument(skip(self))]
    pub async fn add_channel_member(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<ChannelMember> {
        let mut uow = self.ctx.begin().await?;
        // A concurrent space removal for this user waits until we commit
        uow.lock_user(user_id).await?;

        let channel = uow
            .find_channel(channel_id, Visibility::Live)
            .await?
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        uow.find_user(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        if uow.find_space_member(channel.space_id, user_id).await?.is_none() {
            warn!(channel_id = %channel_id, user_id = %user_id, "Channel join without space membership");
            return Err(DomainError::from(PolicyViolation::NotSpaceMember {
                space_id: channel.space_id,
            })
            .into());
        }

        let member = ChannelMember::new(channel_id, user_id, self.ctx.now());
        uow.insert_channel_member(&member).await?;
        uow.commit().await?;

        info!(channel_id = %channel_id, user_id = %user_id, "Member added to channel");
        Ok(member)
    }

    /// Remove a membership; returns whether a row was removed
    ///
    /// Leaving a space also drops the user's memberships in its channels.
    #[instrument(skip(self))]
    pub async fn remove_member(&self, scope: Scope, user_id: Snowflake) -> ServiceResult<bool> {
        let mut uow = self.ctx.begin().await?;
        // Serialised against channel joins and posts by the same user
        uow.lock_user(user_id).await?;

        let removed = match scope {
            Scope::Space(space_id) => {
                let removed = uow.delete_space_member(space_id, user_id).await?;
                let channels = uow.delete_channel_members_in_space(space_id, user_id).await?;
                if channels > 0 {
                    info!(space_id = %space_id, user_id = %user_id, channels, "Dropped channel memberships");
                }
                removed
            }
            Scope::Channel(channel_id) => uow.delete_channel_member(channel_id, user_id).await?,
        };
        uow.commit().await?;

        if removed {
            info!(scope = %scope, user_id = %user_id, "Member removed");
        }
        Ok(removed)
    }

    /// Change a space member's role
    #[instrument(skip(self))]
    pub async fn set_space_role(
        &self,
        space_id: Snowflake,
        user_id: Snowflake,
        role: SpaceRole,
    ) -> ServiceResult<SpaceMember> {
        let mut uow = self.ctx.begin().await?;

        uow.find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;
        let member = uow
            .update_space_role(space_id, user_id, role)
            .await?
            .ok_or_else(|| ServiceError::not_found("SpaceMember", format!("{space_id}/{user_id}")))?;
        uow.commit().await?;

        info!(space_id = %space_id, user_id = %user_id, role = role.as_str(), "Space role changed");
        Ok(member)
    }

    /// Members of a live space
    #[instrument(skip(self))]
    pub async fn space_members(&self, space_id: Snowflake) -> ServiceResult<Vec<SpaceMember>> {
        let mut uow = self.ctx.begin().await?;

        uow.find_space(space_id, Visibility::Live)
            .await?
            .ok_or(DomainError::SpaceNotFound(space_id))?;
        Ok(uow.find_space_members(space_id).await?)
    }

    /// Members of a live channel
    #[instrument(skip(self))]
    pub async fn channel_members(&self, channel_id: Snowflake) -> ServiceResult<Vec<ChannelMember>> {
        let mut uow = self.ctx.begin().await?;

        uow.find_channel(channel_id, Visibility::Live)
            .await?
            .ok_or(DomainError::ChannelNotFound(channel_id))?;
        Ok(uow.find_channel_members(channel_id).await?)
    }

    // ========================================================================
    // Restraints
    // ========================================================================

    /// Record a restraint, replacing any earlier one for the same scope and user
    #[instrument(skip(self, request), fields(kind = %request.kind))]
    pub async fn restrain(
        &self,
        scope: Scope,
        user_id: Snowflake,
        issued_by: Snowflake,
        request: RestrainRequest,
    ) -> ServiceResult<Restraint> {
        request.validate()?;

        let mut uow = self.ctx.begin().await?;
        // Serialised against post_message for the same user
        uow.lock_user(user_id).await?;

        require_live_scope(uow.as_mut(), scope).await?;
        uow.find_user(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let restraint = Restraint {
            scope,
            user_id,
            kind: request.kind,
            expires_at: request.expires_at,
            issued_by,
            issued_at: self.ctx.now(),
            reason: request.reason,
        };
        uow.upsert_restraint(&restraint).await?;
        uow.commit().await?;

        info!(
            scope = %scope,
            user_id = %user_id,
            issued_by = %issued_by,
            expires_at = ?restraint.expires_at,
            "Restraint recorded"
        );
        Ok(restraint)
    }

    /// Revoke a restraint; returns whether one existed
    #[instrument(skip(self))]
    pub async fn revoke_restraint(&self, scope: Scope, user_id: Snowflake) -> ServiceResult<bool> {
        let mut uow = self.ctx.begin().await?;
        uow.lock_user(user_id).await?;

        let removed = uow.delete_restraint(scope, user_id).await?;
        uow.commit().await?;

        if removed {
            info!(scope = %scope, user_id = %user_id, "Restraint revoked");
        }
        Ok(removed)
    }

    /// Restraint in force at `at`, if any
    #[instrument(skip(self))]
    pub async fn active_restraint(
        &self,
        scope: Scope,
        user_id: Snowflake,
        at: DateTime<Utc>,
    ) -> ServiceResult<Option<Restraint>> {
        let mut uow = self.ctx.begin().await?;
        let restraint = uow.find_restraint(scope, user_id).await?;

        Ok(restraint.filter(|r| r.is_active_at(at)))
    }

    /// Whether a restraint of any kind is in force at `at`
    pub async fn is_restrained(
        &self,
        scope: Scope,
        user_id: Snowflake,
        at: DateTime<Utc>,
    ) -> ServiceResult<bool> {
        Ok(self.active_restraint(scope, user_id, at).await?.is_some())
    }

    /// Restraints in force at `at` for a scope
    #[instrument(skip(self))]
    pub async fn restraints_in_scope(
        &self,
        scope: Scope,
        at: DateTime<Utc>,
    ) -> ServiceResult<Vec<Restraint>> {
        let mut uow = self.ctx.begin().await?;
        let mut restraints = uow.find_restraints_by_scope(scope).await?;
        restraints.retain(|r| r.is_active_at(at));

        Ok(restraints)
    }

    /// Compaction: hard-delete every restraint that has expired by now
    #[instrument(skip(self))]
    pub async fn purge_expired_restraints(&self) -> ServiceResult<u64> {
        let now = self.ctx.now();

        let mut uow = self.ctx.begin().await?;
        let purged = uow.delete_expired_restraints(now).await?;
        uow.commit().await?;

        info!(purged, "Expired restraints purged");
        Ok(purged)
    }

    // ========================================================================
    // Posting rights
    // ========================================================================

    /// Whether the user may post into the channel right now
    #[instrument(skip(self))]
    pub async fn can_post(&self, channel_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        let mut uow = self.ctx.begin().await?;
        let verdict = evaluate_posting(
            uow.as_mut(),
            self.ctx.moderation(),
            channel_id,
            user_id,
            self.ctx.now(),
        )
        .await?;

        Ok(matches!(verdict, Some(Ok(_))))
    }
}

/// Posting verdict read inside `uow`
///
/// `None` when the channel is absent or soft-deleted. Restraints on both the
/// channel and its parent space are considered.
pub(super) async fn evaluate_posting(
    uow: &mut dyn UnitOfWork,
    policy: &ModerationPolicy,
    channel_id: Snowflake,
    user_id: Snowflake,
    now: DateTime<Utc>,
) -> ServiceResult<Option<Result<ChannelWithSpace, PolicyViolation>>> {
    let Some(joined) = uow.find_channel_with_space(channel_id, Visibility::Live).await? else {
        return Ok(None);
    };

    let is_channel_member = uow.find_channel_member(channel_id, user_id).await?.is_some();

    let mut restraints = Vec::with_capacity(2);
    restraints.extend(uow.find_restraint(Scope::Channel(channel_id), user_id).await?);
    restraints.extend(uow.find_restraint(Scope::Space(joined.space.id), user_id).await?);

    let ctx = PostingContext {
        channel: &joined.channel,
        space: Some(&joined.space),
        is_channel_member,
        restraints: &restraints,
        now,
    };

    Ok(Some(check_posting(&ctx, policy).map(|()| joined)))
}

/// NotFound unless the scope's space or channel exists and is live
async fn require_live_scope(uow: &mut dyn UnitOfWork, scope: Scope) -> ServiceResult<()> {
    match scope {
        Scope::Space(space_id) => {
            uow.find_space(space_id, Visibility::Live)
                .await?
                .ok_or(DomainError::SpaceNotFound(space_id))?;
        }
        Scope::Channel(channel_id) => {
            uow.find_channel(channel_id, Visibility::Live)
                .await?
                .ok_or(DomainError::ChannelNotFound(channel_id))?;
        }
    }
    Ok(())
}
