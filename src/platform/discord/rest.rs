//! Discord REST API v10 client.
//!
//! Thin typed wrappers over the handful of endpoints the bot needs. A 404 is
//! reported as [`PlatformError::NotFound`]; any other non-2xx status as
//! [`PlatformError::Status`] with the response body.

use crate::config::BotToken;
use crate::platform::PlatformError;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use warden_proto::{ApplicationCommand, InteractionMember, InteractionResponse, Snowflake};

pub const API_BASE: &str = "https://discord.com/api/v10";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/warden-bot/warden, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// Header carrying the reason shown in the guild's audit log.
const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

/// The platform refuses reasons longer than this many characters.
const AUDIT_LOG_REASON_MAX: usize = 512;

/// Messages at least this many days old cannot be bulk-deleted.
pub const BULK_DELETE_MAX_AGE_DAYS: i64 = 14;

/// A fetched message; only its id is needed.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageStub {
    pub id: Snowflake,
}

#[derive(Debug, Deserialize)]
struct GatewayBot {
    url: String,
}

pub struct RestClient {
    http: Client,
    base_url: String,
    token: BotToken,
}

impl RestClient {
    pub fn new(token: BotToken) -> Result<Self, PlatformError> {
        Self::with_base_url(token, API_BASE)
    }

    /// Client against an alternative API root (tests, proxies).
    pub fn with_base_url(token: BotToken, base_url: impl Into<String>) -> Result<Self, PlatformError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn token(&self) -> &BotToken {
        &self.token
    }

    /// Replace the guild's command set with `commands`. Returns how many the
    /// platform acknowledged.
    pub async fn register_guild_commands(
        &self,
        application_id: Snowflake,
        guild_id: Snowflake,
        commands: &[ApplicationCommand],
    ) -> Result<usize, PlatformError> {
        let path = format!("/applications/{application_id}/guilds/{guild_id}/commands");
        let response = self.execute(self.request(Method::PUT, &path).json(commands)).await?;
        let registered: Vec<serde_json::Value> = decode(response).await?;
        Ok(registered.len())
    }

    /// `Ok(None)` when the user is not a member of the guild.
    pub async fn get_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<Option<InteractionMember>, PlatformError> {
        let path = format!("/guilds/{guild_id}/members/{user_id}");
        match self.execute(self.request(Method::GET, &path)).await {
            Ok(response) => decode(response).await.map(Some),
            Err(PlatformError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_guild_ban(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let path = format!("/guilds/{guild_id}/bans/{user_id}");
        let request = self
            .request(Method::PUT, &path)
            .header(AUDIT_LOG_REASON, encode_reason(reason))
            .json(&json!({}));
        self.execute(request).await.map(drop)
    }

    pub async fn remove_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let path = format!("/guilds/{guild_id}/members/{user_id}");
        let request = self
            .request(Method::DELETE, &path)
            .header(AUDIT_LOG_REASON, encode_reason(reason));
        self.execute(request).await.map(drop)
    }

    /// Disable communication for the member until `until`.
    pub async fn timeout_guild_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        until: DateTime<Utc>,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let path = format!("/guilds/{guild_id}/members/{user_id}");
        let request = self
            .request(Method::PATCH, &path)
            .header(AUDIT_LOG_REASON, encode_reason(reason))
            .json(&json!({ "communication_disabled_until": until.to_rfc3339() }));
        self.execute(request).await.map(drop)
    }

    /// The newest `limit` (1..=100) messages in the channel, newest first.
    pub async fn channel_messages(
        &self,
        channel_id: Snowflake,
        limit: u8,
    ) -> Result<Vec<MessageStub>, PlatformError> {
        let path = format!("/channels/{channel_id}/messages");
        let request = self
            .request(Method::GET, &path)
            .query(&[("limit", limit.to_string())]);
        decode(self.execute(request).await?).await
    }

    pub async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<(), PlatformError> {
        let path = format!("/channels/{channel_id}/messages/{message_id}");
        self.execute(self.request(Method::DELETE, &path))
            .await
            .map(drop)
    }

    /// Delete 2..=100 messages younger than [`BULK_DELETE_MAX_AGE_DAYS`].
    pub async fn bulk_delete_messages(
        &self,
        channel_id: Snowflake,
        message_ids: &[Snowflake],
    ) -> Result<(), PlatformError> {
        let path = format!("/channels/{channel_id}/messages/bulk-delete");
        let request = self
            .request(Method::POST, &path)
            .json(&json!({ "messages": message_ids }));
        self.execute(request).await.map(drop)
    }

    /// Delete up to `amount` recent messages, skipping any too old to
    /// bulk-delete. Returns how many were deleted.
    pub async fn purge_recent(&self, channel_id: Snowflake, amount: u8) -> Result<usize, PlatformError> {
        let messages = self.channel_messages(channel_id, amount).await?;
        let cutoff = Utc::now() - chrono::Duration::days(BULK_DELETE_MAX_AGE_DAYS);
        let ids: Vec<Snowflake> = messages
            .into_iter()
            .map(|m| m.id)
            .filter(|id| id.timestamp() > cutoff)
            .collect();

        match ids.as_slice() {
            [] => {}
            [only] => self.delete_message(channel_id, *only).await?,
            many => self.bulk_delete_messages(channel_id, many).await?,
        }

        debug!(channel = %channel_id, requested = amount, deleted = ids.len(), "Purged messages");
        Ok(ids.len())
    }

    /// Answer an interaction.
    pub async fn create_interaction_response(
        &self,
        interaction_id: Snowflake,
        interaction_token: &str,
        response: &InteractionResponse,
    ) -> Result<(), PlatformError> {
        let path = format!("/interactions/{interaction_id}/{interaction_token}/callback");
        self.execute(self.request(Method::POST, &path).json(response))
            .await
            .map(drop)
    }

    /// WebSocket URL to open the gateway session on.
    pub async fn gateway_url(&self) -> Result<String, PlatformError> {
        let response = self.execute(self.request(Method::GET, "/gateway/bot")).await?;
        let gateway: GatewayBot = decode(response).await?;
        Ok(gateway.url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, format!("Bot {}", self.token.as_str()))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, PlatformError> {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, PlatformError> {
    response
        .json()
        .await
        .map_err(|e| PlatformError::Decode(e.to_string()))
}

/// Percent-encode an audit-log reason, truncated to the platform limit.
///
/// Unreserved characters (RFC 3986) pass through; every other byte of the
/// UTF-8 encoding becomes `%XX`.
fn encode_reason(reason: &str) -> String {
    let truncated: String = reason.chars().take(AUDIT_LOG_REASON_MAX).collect();
    let mut out = String::with_capacity(truncated.len() * 3);
    for byte in truncated.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_percent_encoded() {
        assert_eq!(encode_reason("spam links"), "spam%20links");
        assert_eq!(encode_reason("No_reason-1.0~"), "No_reason-1.0~");
        assert_eq!(encode_reason("é"), "%C3%A9");
        assert_eq!(encode_reason("a\nb"), "a%0Ab");
    }

    #[test]
    fn reason_is_truncated_by_characters() {
        let long = "x".repeat(600);
        assert_eq!(encode_reason(&long).len(), AUDIT_LOG_REASON_MAX);
    }

    #[test]
    fn user_agent_names_the_bot() {
        assert!(USER_AGENT.starts_with("DiscordBot ("));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = RestClient::with_base_url(BotToken::new("t"), "http://localhost:1/api/").unwrap();
        assert_eq!(client.base_url, "http://localhost:1/api");
    }
}
