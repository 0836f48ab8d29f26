use super::super::{Context, Handler};
use super::common::resolve_target;
use crate::commands::Reply;
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::info;

pub struct BanHandler;

#[async_trait]
impl Handler for BanHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let reason = ctx.reason();
        let Some(member) = resolve_target(ctx).await? else {
            return Ok(());
        };

        ctx.platform.ban(&member, reason).await?;
        info!(
            target = %member.user.id,
            guild = %member.guild_id,
            by = %ctx.invocation.invoker.id,
            reason,
            "Member banned"
        );

        ctx.reply(Reply::public(format!(
            "🔨 Banned **{}** | Reason: {reason}",
            member.user.tag
        )))
        .await
    }
}
