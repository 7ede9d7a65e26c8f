//! Posting gate
//!
//! Decides whether a user may post into a channel from a snapshot read
//! inside the same transaction that performs the insert.

use chrono::{DateTime, Utc};

use crate::entities::{Channel, Restraint, Space};
use crate::error::PolicyViolation;
use crate::value_objects::ModerationPolicy;

/// Everything the posting gate needs, loaded by the caller
#[derive(Debug, Clone, Copy)]
pub struct PostingContext<'a> {
    /// The live channel being posted into
    pub channel: &'a Channel,
    /// Its parent space as stored (may be soft-deleted)
    pub space: Option<&'a Space>,
    pub is_channel_member: bool,
    /// Restraints on the channel scope and on the parent space scope
    pub restraints: &'a [Restraint],
    pub now: DateTime<Utc>,
}

/// First restraint in `restraints` still active at `at`
pub fn first_active_restraint(restraints: &[Restraint], at: DateTime<Utc>) -> Option<&Restraint> {
    restraints.iter().find(|r| r.is_active_at(at))
}

/// Check posting rights
///
/// Order matters for the reported reason: an unavailable space outranks a
/// missing membership, which outranks a restraint.
pub fn check_posting(
    ctx: &PostingContext<'_>,
    policy: &ModerationPolicy,
) -> Result<(), PolicyViolation> {
    match ctx.space {
        Some(space) if !space.deleted => {}
        _ => {
            return Err(PolicyViolation::SpaceUnavailable {
                space_id: ctx.channel.space_id,
            })
        }
    }

    if !ctx.is_channel_member {
        return Err(PolicyViolation::NotChannelMember {
            channel_id: ctx.channel.id,
        });
    }

    let blocking = ctx
        .restraints
        .iter()
        .filter(|r| policy.blocks_posting(r.kind))
        .find(|r| r.is_active_at(ctx.now));

    if let Some(restraint) = blocking {
        return Err(PolicyViolation::Restrained {
            scope: restraint.scope,
            kind: restraint.kind,
            expires_at: restraint.expires_at,
        });
    }

    Ok(())
}
