//! Shared helpers for the member-targeting moderation handlers.

use super::super::Context;
use crate::commands::Reply;
use crate::error::HandlerError;
use crate::platform::Member;
use tracing::{debug, warn};

pub(super) const MEMBER_NOT_FOUND: &str = "❌ Could not find that member.";

/// Resolve the `user` option as a member of the invocation's guild.
///
/// When the member cannot be resolved (not in the guild, or the lookup
/// itself failed) the not-found reply is sent and `None` returned; the
/// caller must then stop without calling the platform.
pub(super) async fn resolve_target(ctx: &mut Context<'_>) -> Result<Option<Member>, HandlerError> {
    let target = ctx.user("user")?;
    let guild_id = ctx.guild_id()?;

    match ctx.platform.fetch_member(guild_id, target).await {
        Ok(Some(member)) => return Ok(Some(member)),
        Ok(None) => {
            debug!(target = %target.id, guild = %guild_id, "Target is not a guild member");
        }
        Err(e) => {
            warn!(target = %target.id, guild = %guild_id, error = %e, "Member lookup failed");
        }
    }

    ctx.reply(Reply::public(MEMBER_NOT_FOUND)).await?;
    Ok(None)
}
