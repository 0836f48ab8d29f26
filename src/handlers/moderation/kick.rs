use super::super::{Context, Handler};
use super::common::resolve_target;
use crate::commands::Reply;
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::info;

pub struct KickHandler;

#[async_trait]
impl Handler for KickHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let reason = ctx.reason();
        let Some(member) = resolve_target(ctx).await? else {
            return Ok(());
        };

        ctx.platform.kick(&member, reason).await?;
        info!(
            target = %member.user.id,
            guild = %member.guild_id,
            by = %ctx.invocation.invoker.id,
            reason,
            "Member kicked"
        );

        ctx.reply(Reply::public(format!(
            "👢 Kicked **{}** | Reason: {reason}",
            member.user.tag
        )))
        .await
    }
}
