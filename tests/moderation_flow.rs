//! Moderation commands through the full command pipeline.

mod common;

use common::{CHANNEL, Call, Fixture, invocation, user};
use std::time::Duration;
use warden::Outcome;
use warden::caps::{Denial, Permission};
use warden::commands::ParamValue;
use warden::handlers::Registry;
use warden::handlers::RegistryError;
use warden::state::Principal;
use warden::Bot;
use warden_proto::{Permissions, Snowflake};

#[tokio::test]
async fn ping_from_outsider_makes_no_platform_calls() {
    let fx = Fixture::new(&[10], &[]);

    let outcome = fx.bot.handle(&invocation("ping", 99, Permissions::ADMINISTRATOR)).await;

    assert!(matches!(outcome, Outcome::Denied(Denial::NotAllowListed)));
    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].content, "❌ You are not whitelisted to use this bot.");
    assert!(replies[0].private);
    assert!(fx.platform.calls().is_empty());
}

#[tokio::test]
async fn ban_requires_platform_permission() {
    let fx = Fixture::new(&[10], &[50]);

    let ban = invocation("ban", 10, Permissions::KICK_MEMBERS).with_param("user", user(50));
    let outcome = fx.bot.handle(&ban).await;

    assert!(matches!(
        outcome,
        Outcome::Denied(Denial::MissingPermission(Permission::BanMembers))
    ));
    assert_eq!(fx.platform.replies()[0].content, "❌ You lack **Ban Members** permission.");
    assert!(fx.platform.side_effects().is_empty());
}

#[tokio::test]
async fn ban_records_reason() {
    let fx = Fixture::new(&[10], &[50]);

    let ban = invocation("ban", 10, Permissions::BAN_MEMBERS)
        .with_param("user", user(50))
        .with_param("reason", ParamValue::Text("raiding".into()));
    assert!(matches!(fx.bot.handle(&ban).await, Outcome::Completed));

    assert_eq!(
        fx.platform.side_effects(),
        vec![
            Call::FetchMember(Principal::from(50u64)),
            Call::Ban(Principal::from(50u64), "raiding".into()),
        ]
    );
    assert_eq!(
        fx.platform.replies()[0].content,
        "🔨 Banned **user50** | Reason: raiding"
    );
}

#[tokio::test]
async fn kick_of_non_member_replies_publicly() {
    let fx = Fixture::new(&[10], &[]);

    let kick = invocation("kick", 10, Permissions::KICK_MEMBERS).with_param("user", user(77));
    assert!(matches!(fx.bot.handle(&kick).await, Outcome::Completed));

    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].content, "❌ Could not find that member.");
    assert!(!replies[0].private);
    assert_eq!(fx.platform.side_effects(), vec![Call::FetchMember(Principal::from(77u64))]);
}

#[tokio::test]
async fn timeout_converts_minutes() {
    let fx = Fixture::new(&[10], &[50]);

    let timeout = invocation("timeout", 10, Permissions::MODERATE_MEMBERS)
        .with_param("user", user(50))
        .with_param("minutes", ParamValue::Integer(90));
    assert!(matches!(fx.bot.handle(&timeout).await, Outcome::Completed));

    assert!(fx.platform.side_effects().contains(&Call::Timeout(
        Principal::from(50u64),
        Duration::from_secs(90 * 60),
        "No reason provided".into(),
    )));
}

#[tokio::test]
async fn purge_out_of_range_deletes_nothing() {
    let fx = Fixture::new(&[10], &[]);

    let purge = invocation("purge", 10, Permissions::MANAGE_MESSAGES)
        .with_param("amount", ParamValue::Integer(150));
    fx.bot.handle(&purge).await;

    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].content, "❌ Amount must be between 1 and 100.");
    assert!(replies[0].private);
    assert!(fx.platform.side_effects().is_empty());
}

#[tokio::test]
async fn purge_in_range_deletes_in_invoking_channel() {
    let fx = Fixture::new(&[10], &[]);

    let purge = invocation("purge", 10, Permissions::MANAGE_MESSAGES)
        .with_param("amount", ParamValue::Integer(25));
    assert!(matches!(fx.bot.handle(&purge).await, Outcome::Completed));

    assert_eq!(
        fx.platform.side_effects(),
        vec![Call::BulkDelete(Snowflake::new(CHANNEL), 25)]
    );
    assert_eq!(fx.platform.replies()[0].content, "🧹 Deleted **25** messages.");
}

#[tokio::test]
async fn every_path_replies_exactly_once() {
    let fx = Fixture::new(&[10], &[50]);

    let cases = vec![
        invocation("ping", 10, Permissions::NONE),
        invocation("ping", 99, Permissions::NONE),
        invocation("nonsense", 10, Permissions::ADMINISTRATOR),
        invocation("ban", 10, Permissions::NONE).with_param("user", user(50)),
        invocation("ban", 10, Permissions::ADMINISTRATOR),
        invocation("kick", 10, Permissions::ADMINISTRATOR).with_param("user", user(51)),
        invocation("timeout", 10, Permissions::ADMINISTRATOR)
            .with_param("user", user(50))
            .with_param("minutes", ParamValue::Integer(0)),
        invocation("purge", 10, Permissions::ADMINISTRATOR)
            .with_param("amount", ParamValue::Integer(5)),
        invocation("whitelist", 10, Permissions::NONE).with_subcommand("list"),
    ];

    for inv in cases {
        fx.platform.clear();
        fx.bot.handle(&inv).await;
        assert_eq!(
            fx.platform.replies().len(),
            1,
            "{} should reply exactly once",
            inv.command
        );
    }
}

#[tokio::test]
async fn unknown_command_gets_generic_failure() {
    let fx = Fixture::new(&[10], &[]);

    let outcome = fx.bot.handle(&invocation("nonsense", 10, Permissions::ADMINISTRATOR)).await;

    assert!(matches!(outcome, Outcome::Unknown));
    let replies = fx.platform.replies();
    assert_eq!(
        replies[0].content,
        "❌ An error occurred while executing that command."
    );
    assert!(replies[0].private);
}

#[tokio::test]
async fn unknown_command_from_outsider_gets_allowlist_denial() {
    let fx = Fixture::new(&[10], &[]);

    let outcome = fx.bot.handle(&invocation("nonsense", 99, Permissions::ADMINISTRATOR)).await;

    assert!(matches!(outcome, Outcome::Denied(Denial::NotAllowListed)));
    let replies = fx.platform.replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].content, "❌ You are not whitelisted to use this bot.");
    assert!(replies[0].private);
    assert!(fx.platform.calls().is_empty());
}

#[test]
fn incomplete_registry_is_rejected_at_startup() {
    let fx = Fixture::new(&[], &[]);

    let result = Bot::with_registry(fx.allowlist.clone(), fx.platform.clone(), Registry::empty());
    assert!(matches!(result, Err(RegistryError::MissingHandler(_))));
}
