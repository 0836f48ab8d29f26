//! Command handlers.
//!
//! One handler per (command, subcommand) route. Each performs at most one
//! external side effect and sends exactly one reply through its [`Context`].
//! Authorization and structural validation have already happened by the
//! time a handler runs.

pub mod allowlist;
pub mod core;
pub mod moderation;
pub mod ping;

pub use self::core::{Context, Handler, Registry, RegistryError, ResponseMiddleware};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Context, Registry, ResponseMiddleware};
    use crate::caps::CapabilityAuthority;
    use crate::commands::{CommandInvocation, InvocationContext, Reply, UserRef, resolve, validate};
    use crate::error::HandlerResult;
    use crate::platform::testing::RecordingPlatform;
    use crate::state::{AllowList, Principal};
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;
    use warden_proto::{Permissions, Snowflake};

    /// Allow-listed invoker used by every harness invocation.
    pub const INVOKER: u64 = 1;

    /// Runs single handlers against a recording platform with invoker
    /// [`INVOKER`] allow-listed and holding every permission.
    pub struct Harness {
        _dir: TempDir,
        pub allowlist: Arc<AllowList>,
        pub platform: Arc<RecordingPlatform>,
        authority: CapabilityAuthority,
        registry: Registry,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_members([])
        }

        pub fn with_members(members: impl IntoIterator<Item = u64>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let allowlist = Arc::new(AllowList::load(dir.path().join("wl.json")).unwrap());
            allowlist.add(Principal::from(INVOKER)).unwrap();
            let platform = Arc::new(RecordingPlatform::with_members(members));
            let authority = CapabilityAuthority::new(allowlist.clone(), platform.clone());
            Self {
                _dir: dir,
                allowlist,
                platform,
                authority,
                registry: Registry::new(),
            }
        }

        pub fn invocation(&self, command: &str) -> CommandInvocation {
            CommandInvocation::new(
                Snowflake::from_timestamp(Utc::now()),
                command,
                UserRef::new(INVOKER, "moderator"),
            )
            .with_context(InvocationContext {
                guild_id: Some(Snowflake::new(100)),
                channel_id: Some(Snowflake::new(200)),
                permissions: Some(Permissions::ADMINISTRATOR),
            })
        }

        /// Authorize, validate and dispatch `invocation`, returning the raw
        /// handler result and the captured replies.
        pub async fn run(&self, invocation: CommandInvocation) -> (HandlerResult, Vec<Reply>) {
            let spec = resolve(&invocation.command).unwrap();
            let route = validate(spec, &invocation).unwrap();
            let grant = self.authority.authorize(spec, &invocation).await.unwrap();

            let replies = Mutex::new(Vec::new());
            let result = {
                let mut ctx = Context::new(
                    &invocation,
                    self.platform.as_ref(),
                    &self.allowlist,
                    ResponseMiddleware::Capturing(&replies),
                    grant,
                );
                self.registry.dispatch(&mut ctx, route).await
            };
            (result, replies.into_inner())
        }
    }
}
