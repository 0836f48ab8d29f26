//! Handler context and the `Handler` trait.

use super::middleware::ResponseMiddleware;
use crate::caps::{Cap, Grant, InvokeCap};
use crate::commands::{CommandInvocation, DEFAULT_REASON, Reply, UserRef};
use crate::error::{HandlerError, HandlerResult};
use crate::platform::{Platform, PlatformError};
use crate::state::AllowList;
use async_trait::async_trait;
use warden_proto::Snowflake;

/// A command handler for one (command, subcommand) route.
///
/// Handlers assume authorization already passed; they never consult the
/// allow-list or platform permissions to decide whether to run.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>) -> HandlerResult;
}

/// Everything a handler may touch while serving one invocation.
pub struct Context<'a> {
    pub invocation: &'a CommandInvocation,
    pub platform: &'a dyn Platform,
    pub allowlist: &'a AllowList,
    /// What the gate authorized.
    pub grant: Grant,
    sender: ResponseMiddleware<'a>,
    replied: bool,
}

impl<'a> Context<'a> {
    /// Only an authorization token opens a context.
    pub fn new(
        invocation: &'a CommandInvocation,
        platform: &'a dyn Platform,
        allowlist: &'a AllowList,
        sender: ResponseMiddleware<'a>,
        grant: Cap<InvokeCap>,
    ) -> Self {
        Self {
            invocation,
            platform,
            allowlist,
            grant: grant.into_scope(),
            sender,
            replied: false,
        }
    }

    /// Send the one reply for this invocation.
    ///
    /// A second call returns [`HandlerError::AlreadyReplied`] without sending.
    /// The invocation counts as answered even when delivery fails, so the
    /// failure boundary does not try again.
    pub async fn reply(&mut self, reply: Reply) -> HandlerResult {
        if self.replied {
            return Err(HandlerError::AlreadyReplied);
        }
        self.replied = true;
        self.sender
            .send(self.invocation, reply)
            .await
            .map_err(HandlerError::Send)
    }

    pub fn replied(&self) -> bool {
        self.replied
    }

    pub fn user(&self, name: &'static str) -> Result<&'a UserRef, HandlerError> {
        self.invocation
            .user(name)
            .ok_or(HandlerError::MissingOption(name))
    }

    pub fn integer(&self, name: &'static str) -> Result<i64, HandlerError> {
        self.invocation
            .integer(name)
            .ok_or(HandlerError::MissingOption(name))
    }

    /// The `reason` option, or the default when absent or blank.
    pub fn reason(&self) -> &'a str {
        match self.invocation.text("reason").map(str::trim) {
            Some(reason) if !reason.is_empty() => reason,
            _ => DEFAULT_REASON,
        }
    }

    pub fn guild_id(&self) -> Result<Snowflake, HandlerError> {
        self.invocation
            .context
            .guild_id
            .ok_or(HandlerError::Platform(PlatformError::MissingContext("guild")))
    }

    pub fn channel_id(&self) -> Result<Snowflake, HandlerError> {
        self.invocation
            .context
            .channel_id
            .ok_or(HandlerError::Platform(PlatformError::MissingContext("channel")))
    }
}
