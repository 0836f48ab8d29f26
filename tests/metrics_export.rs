//! Metrics exported while the bot runs.
//!
//! Kept in its own test binary: the prometheus registry is process-global.

mod common;

use common::{Fixture, invocation, user};
use warden::Outcome;
use warden_proto::Permissions;

#[tokio::test]
async fn allowlist_gauge_follows_mutations() {
    warden::metrics::init();
    let fx = Fixture::new(&[10], &[]);

    let add = invocation("whitelist", 10, Permissions::NONE)
        .with_subcommand("add")
        .with_param("user", user(20));
    assert!(matches!(fx.bot.handle(&add).await, Outcome::Completed));
    assert!(warden::metrics::gather_metrics().contains("warden_allowlist_size 2\n"));

    let remove = invocation("whitelist", 10, Permissions::NONE)
        .with_subcommand("remove")
        .with_param("user", user(10));
    assert!(matches!(fx.bot.handle(&remove).await, Outcome::Completed));
    assert!(warden::metrics::gather_metrics().contains("warden_allowlist_size 1\n"));
}
