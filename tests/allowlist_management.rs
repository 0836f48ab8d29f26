//! Allow-list management through the full command pipeline.

mod common;

use common::{Fixture, invocation, user};
use warden::Outcome;
use warden::caps::Denial;
use warden::state::{AllowList, Principal};
use warden_proto::Permissions;

#[tokio::test]
async fn allowlisted_member_adds_another() {
    let fx = Fixture::new(&[10], &[]);

    let add = invocation("whitelist", 10, Permissions::NONE)
        .with_subcommand("add")
        .with_param("user", user(20));
    assert!(matches!(fx.bot.handle(&add).await, Outcome::Completed));

    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].content, "✅ **user20** has been added to the whitelist.");
    assert!(!replies[0].private);

    // Durable: a fresh load of the file sees both principals.
    let reloaded = AllowList::load(&fx.path).unwrap();
    assert_eq!(reloaded.list(), vec![Principal::from(10u64), Principal::from(20u64)]);

    // The new member can now manage the list too.
    fx.platform.clear();
    let list = invocation("whitelist", 20, Permissions::NONE).with_subcommand("list");
    assert!(matches!(fx.bot.handle(&list).await, Outcome::Completed));
    assert_eq!(
        fx.platform.replies()[0].content,
        "📜 **Whitelisted Users:**\n<@10>\n<@20>"
    );
}

#[tokio::test]
async fn outsider_cannot_touch_the_list() {
    let fx = Fixture::new(&[10], &[]);

    let add = invocation("whitelist", 99, Permissions::ADMINISTRATOR)
        .with_subcommand("add")
        .with_param("user", user(99));
    let outcome = fx.bot.handle(&add).await;

    assert!(matches!(outcome, Outcome::Denied(Denial::NotAllowListAdmin)));
    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].content, "❌ You are not allowed to manage the whitelist.");
    assert!(replies[0].private);
    assert!(!fx.allowlist.contains(Principal::from(99u64)));
    assert!(fx.platform.calls().is_empty());
}

#[tokio::test]
async fn self_removal_is_allowed() {
    let fx = Fixture::new(&[10], &[]);

    let remove = invocation("whitelist", 10, Permissions::NONE)
        .with_subcommand("remove")
        .with_param("user", user(10));
    assert!(matches!(fx.bot.handle(&remove).await, Outcome::Completed));
    assert!(fx.allowlist.is_empty());

    // Locked out afterwards.
    fx.platform.clear();
    let ping = invocation("ping", 10, Permissions::NONE);
    assert!(matches!(
        fx.bot.handle(&ping).await,
        Outcome::Denied(Denial::NotAllowListed)
    ));
}

#[tokio::test]
async fn missing_subcommand_is_rejected() {
    let fx = Fixture::new(&[10], &[]);

    let bare = invocation("whitelist", 10, Permissions::NONE);
    assert!(matches!(fx.bot.handle(&bare).await, Outcome::Invalid(_)));

    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert!(replies[0].private);
    assert!(replies[0].content.starts_with("❌ Invalid options for /whitelist"));
}
