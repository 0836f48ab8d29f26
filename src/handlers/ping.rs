//! `/ping`: reports how long the invocation took to reach the bot.

use super::{Context, Handler};
use crate::commands::Reply;
use crate::error::HandlerResult;
use async_trait::async_trait;
use chrono::Utc;

pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let elapsed = Utc::now() - ctx.invocation.issued_at();
        let latency = elapsed.num_milliseconds().max(0);

        ctx.reply(Reply::public(format!("🏓 Pong! Latency: {latency}ms")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::Harness;
    use chrono::{Duration, Utc};
    use warden_proto::Snowflake;

    #[tokio::test]
    async fn latency_is_measured_from_the_invocation_id() {
        let h = Harness::new();
        let mut inv = h.invocation("ping");
        inv.id = Snowflake::from_timestamp(Utc::now() - Duration::milliseconds(250));

        let (_, replies) = h.run(inv).await;
        let content = &replies[0].content;
        let ms: i64 = content
            .strip_prefix("🏓 Pong! Latency: ")
            .and_then(|s| s.strip_suffix("ms"))
            .unwrap()
            .parse()
            .unwrap();
        assert!(ms >= 250, "{content}");
    }

    #[tokio::test]
    async fn clock_skew_is_clamped_to_zero() {
        let h = Harness::new();
        let mut inv = h.invocation("ping");
        inv.id = Snowflake::from_timestamp(Utc::now() + Duration::seconds(30));

        let (_, replies) = h.run(inv).await;
        assert_eq!(replies[0].content, "🏓 Pong! Latency: 0ms");
    }
}
