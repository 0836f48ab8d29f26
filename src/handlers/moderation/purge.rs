use super::super::{Context, Handler};
use crate::commands::{PURGE_MAX, PURGE_MIN, Reply};
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::{info, warn};

pub struct PurgeHandler;

#[async_trait]
impl Handler for PurgeHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let amount = ctx.integer("amount")?;
        let Some(amount) = u8::try_from(amount)
            .ok()
            .filter(|n| (PURGE_MIN..=PURGE_MAX).contains(&i64::from(*n)))
        else {
            return ctx
                .reply(Reply::private(format!(
                    "❌ Amount must be between {PURGE_MIN} and {PURGE_MAX}."
                )))
                .await;
        };
        let channel_id = ctx.channel_id()?;

        let content = match ctx.platform.bulk_delete(channel_id, amount).await {
            Ok(deleted) => {
                info!(
                    channel = %channel_id,
                    requested = amount,
                    deleted,
                    by = %ctx.invocation.invoker.id,
                    "Messages purged"
                );
                format!("🧹 Deleted **{deleted}** messages.")
            }
            Err(e) => {
                warn!(channel = %channel_id, requested = amount, error = %e, "Bulk delete failed");
                "❌ Failed to delete messages (messages may be too old).".to_string()
            }
        };

        ctx.reply(Reply::public(content)).await
    }
}
