use super::super::{Context, Handler};
use super::common::resolve_target;
use crate::commands::{Reply, TIMEOUT_MAX_MINUTES};
use crate::error::HandlerResult;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

pub struct TimeoutHandler;

#[async_trait]
impl Handler for TimeoutHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let minutes = ctx.integer("minutes")?;
        if !(1..=TIMEOUT_MAX_MINUTES).contains(&minutes) {
            return ctx
                .reply(Reply::private(format!(
                    "❌ Duration must be between 1 and {TIMEOUT_MAX_MINUTES} minutes (28 days)."
                )))
                .await;
        }
        let reason = ctx.reason();

        let Some(member) = resolve_target(ctx).await? else {
            return Ok(());
        };

        // Range-checked above, so the cast cannot wrap.
        let duration = Duration::from_millis(minutes as u64 * 60_000);
        ctx.platform.timeout(&member, duration, reason).await?;
        info!(
            target = %member.user.id,
            guild = %member.guild_id,
            by = %ctx.invocation.invoker.id,
            minutes,
            reason,
            "Member timed out"
        );

        ctx.reply(Reply::public(format!(
            "⏱️ Timed out **{}** for **{minutes}** minutes | Reason: {reason}",
            member.user.tag
        )))
        .await
    }
}
