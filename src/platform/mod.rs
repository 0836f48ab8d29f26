//! Platform boundary.
//!
//! The core never talks HTTP or websockets itself. Everything it needs from the
//! chat platform goes through the [`Platform`] trait: member lookup, the four
//! moderation actions, the invoker's permission grants, and delivering the
//! reply. [`discord`] is the production implementation.

pub mod discord;
#[cfg(test)]
pub(crate) mod testing;

use crate::commands::{CommandInvocation, Reply, UserRef};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use warden_proto::{Permissions, Snowflake};

/// Errors surfaced by the platform client.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("resource not found")]
    NotFound,

    #[error("platform rejected request with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invocation has no {0}")]
    MissingContext(&'static str),
}

/// A principal resolved as a member of the invocation's guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user: UserRef,
}

/// Operations the core needs from the chat platform.
///
/// Every call is fallible and may suspend; the core never retries.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Resolve `user` as a member of `guild_id`. `Ok(None)` when not a member.
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user: &UserRef,
    ) -> Result<Option<Member>, PlatformError>;

    async fn ban(&self, member: &Member, reason: &str) -> Result<(), PlatformError>;

    async fn kick(&self, member: &Member, reason: &str) -> Result<(), PlatformError>;

    async fn timeout(
        &self,
        member: &Member,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError>;

    /// Delete up to `amount` recent messages in `channel_id`, returning how
    /// many were actually deleted.
    async fn bulk_delete(&self, channel_id: Snowflake, amount: u8) -> Result<usize, PlatformError>;

    /// Permissions granted to the invoker in the invocation's context.
    async fn invoker_permissions(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<Permissions, PlatformError>;

    /// Deliver the reply for `invocation`.
    async fn respond(
        &self,
        invocation: &CommandInvocation,
        reply: &Reply,
    ) -> Result<(), PlatformError>;
}
