//! Discord implementation of [`Platform`].
//!
//! Moderation calls act on the configured guild via the REST client; the
//! invoker's permissions come from the interaction itself, which the platform
//! computes for the invoking member and channel.

mod convert;
mod rest;

pub use convert::to_invocation;
pub use rest::{API_BASE, BULK_DELETE_MAX_AGE_DAYS, MessageStub, RestClient};

use super::{Member, Platform, PlatformError};
use crate::commands::{self, CommandInvocation, Reply, UserRef};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::info;
use warden_proto::{InteractionResponse, Permissions, Snowflake};

pub struct DiscordPlatform {
    rest: RestClient,
    application_id: Snowflake,
    guild_id: Snowflake,
}

impl DiscordPlatform {
    pub fn new(rest: RestClient, application_id: Snowflake, guild_id: Snowflake) -> Self {
        Self {
            rest,
            application_id,
            guild_id,
        }
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Publish the command catalog to the configured guild.
    pub async fn register_commands(&self) -> Result<usize, PlatformError> {
        let commands = commands::application_commands();
        let count = self
            .rest
            .register_guild_commands(self.application_id, self.guild_id, &commands)
            .await?;
        info!(guild = %self.guild_id, count, "Commands registered.");
        Ok(count)
    }

    /// Answer an interaction that never became an invocation.
    pub async fn respond_raw(
        &self,
        interaction_id: Snowflake,
        interaction_token: &str,
        reply: &Reply,
    ) -> Result<(), PlatformError> {
        let response = InteractionResponse::message(reply.content.clone(), reply.private);
        self.rest
            .create_interaction_response(interaction_id, interaction_token, &response)
            .await
    }
}

#[async_trait]
impl Platform for DiscordPlatform {
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user: &UserRef,
    ) -> Result<Option<Member>, PlatformError> {
        let member = self.rest.get_guild_member(guild_id, user.id.id()).await?;
        Ok(member.map(|_| Member {
            guild_id,
            user: user.clone(),
        }))
    }

    async fn ban(&self, member: &Member, reason: &str) -> Result<(), PlatformError> {
        self.rest
            .create_guild_ban(member.guild_id, member.user.id.id(), reason)
            .await
    }

    async fn kick(&self, member: &Member, reason: &str) -> Result<(), PlatformError> {
        self.rest
            .remove_guild_member(member.guild_id, member.user.id.id(), reason)
            .await
    }

    async fn timeout(
        &self,
        member: &Member,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let duration = chrono::Duration::from_std(duration)
            .map_err(|_| PlatformError::Decode("timeout duration out of range".to_string()))?;
        self.rest
            .timeout_guild_member(member.guild_id, member.user.id.id(), Utc::now() + duration, reason)
            .await
    }

    async fn bulk_delete(&self, channel_id: Snowflake, amount: u8) -> Result<usize, PlatformError> {
        self.rest.purge_recent(channel_id, amount).await
    }

    async fn invoker_permissions(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<Permissions, PlatformError> {
        invocation
            .context
            .permissions
            .ok_or(PlatformError::MissingContext("member permissions"))
    }

    async fn respond(
        &self,
        invocation: &CommandInvocation,
        reply: &Reply,
    ) -> Result<(), PlatformError> {
        self.respond_raw(invocation.id, &invocation.token, reply).await
    }
}
