//! Allow-list management: `/whitelist add|remove|list`.
//!
//! A persistence failure propagates to the failure boundary; the store has
//! already rolled the change back by then.

use super::{Context, Handler};
use crate::commands::Reply;
use crate::error::HandlerResult;
use async_trait::async_trait;
use tracing::info;

pub struct AddHandler;

#[async_trait]
impl Handler for AddHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let target = ctx.user("user")?;

        let content = if ctx.allowlist.add(target.id)? {
            info!(
                principal = %target.id,
                by = %ctx.invocation.invoker.id,
                "Principal added to allow-list"
            );
            format!("✅ **{}** has been added to the whitelist.", target.tag)
        } else {
            format!("⚠️ **{}** is already whitelisted.", target.tag)
        };

        ctx.reply(Reply::public(content)).await
    }
}

pub struct RemoveHandler;

#[async_trait]
impl Handler for RemoveHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let target = ctx.user("user")?;

        let content = if ctx.allowlist.remove(target.id)? {
            info!(
                principal = %target.id,
                by = %ctx.invocation.invoker.id,
                "Principal removed from allow-list"
            );
            format!("🗑️ **{}** has been removed from the whitelist.", target.tag)
        } else {
            format!("⚠️ **{}** is not whitelisted.", target.tag)
        };

        ctx.reply(Reply::public(content)).await
    }
}

pub struct ListHandler;

#[async_trait]
impl Handler for ListHandler {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult {
        let users = ctx.allowlist.list();

        let content = if users.is_empty() {
            "📭 Whitelist is empty.".to_string()
        } else {
            let mentions: Vec<String> = users.into_iter().map(|p| p.mention()).collect();
            format!("📜 **Whitelisted Users:**\n{}", mentions.join("\n"))
        };

        ctx.reply(Reply::public(content)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::{ParamValue, UserRef};
    use crate::handlers::test_support::Harness;
    use crate::state::Principal;

    fn user(id: u64, tag: &str) -> ParamValue {
        ParamValue::User(UserRef::new(id, tag))
    }

    #[tokio::test]
    async fn add_then_add_again() {
        let h = Harness::new();
        let inv = h.invocation("whitelist").with_subcommand("add").with_param("user", user(2, "bob"));

        let (result, replies) = h.run(inv.clone()).await;
        assert!(result.is_ok());
        assert_eq!(replies[0].content, "✅ **bob** has been added to the whitelist.");
        assert!(!replies[0].private);
        assert!(h.allowlist.contains(Principal::from(2u64)));

        let (_, replies) = h.run(inv).await;
        assert_eq!(replies[0].content, "⚠️ **bob** is already whitelisted.");
        assert_eq!(h.allowlist.len(), 2);
    }

    #[tokio::test]
    async fn remove_present_and_absent() {
        let h = Harness::new();
        h.allowlist.add(Principal::from(2u64)).unwrap();
        let inv = h
            .invocation("whitelist")
            .with_subcommand("remove")
            .with_param("user", user(2, "bob"));

        let (_, replies) = h.run(inv.clone()).await;
        assert_eq!(replies[0].content, "🗑️ **bob** has been removed from the whitelist.");

        let (_, replies) = h.run(inv).await;
        assert_eq!(replies[0].content, "⚠️ **bob** is not whitelisted.");
    }

    #[tokio::test]
    async fn list_mentions_in_insertion_order() {
        let h = Harness::new();
        h.allowlist.add(Principal::from(30u64)).unwrap();
        h.allowlist.add(Principal::from(20u64)).unwrap();

        let (_, replies) = h.run(h.invocation("whitelist").with_subcommand("list")).await;
        assert_eq!(
            replies[0].content,
            "📜 **Whitelisted Users:**\n<@1>\n<@30>\n<@20>"
        );
    }

    #[tokio::test]
    async fn invoker_may_remove_themselves() {
        let h = Harness::new();
        let inv = h
            .invocation("whitelist")
            .with_subcommand("remove")
            .with_param("user", user(1, "me"));
        let (result, _) = h.run(inv).await;
        assert!(result.is_ok());
        assert!(h.allowlist.is_empty());
    }
}
