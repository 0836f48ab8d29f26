//! Interaction payloads and responses.
//!
//! An interaction is delivered as the body of an `INTERACTION_CREATE`
//! dispatch. Only application (slash) commands are modelled in detail; other
//! interaction kinds deserialize but carry no command data.

use crate::command::CommandOptionType;
use crate::permissions::Permissions;
use crate::snowflake::Snowflake;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Message flag that makes a reply visible only to the invoking user.
pub const MESSAGE_FLAG_EPHEMERAL: u64 = 1 << 6;

/// Interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionType {
    /// Gateway liveness check (HTTP interactions only).
    Ping,
    /// A slash command.
    ApplicationCommand,
    /// Any other interaction kind.
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::Ping,
            2 => Self::ApplicationCommand,
            other => Self::Other(other),
        }
    }
}

impl From<InteractionType> for u8 {
    fn from(kind: InteractionType) -> Self {
        match kind {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::Other(raw) => raw,
        }
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: Snowflake,
    /// Account name.
    pub username: String,
    /// Legacy four-digit discriminator; `"0"` for migrated accounts.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Display name, if set.
    #[serde(default)]
    pub global_name: Option<String>,
    /// Whether this is a bot account.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Human-readable tag: `name#1234` for legacy accounts, `name` otherwise.
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

/// The invoking member inside a guild.
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionMember {
    /// The member's user.
    pub user: User,
    /// Permissions of the member in the channel the interaction came from.
    #[serde(default)]
    pub permissions: Option<Permissions>,
    /// Guild nickname.
    #[serde(default)]
    pub nick: Option<String>,
}

/// Value of a leaf command option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean option.
    Bool(bool),
    /// Integer option.
    Integer(i64),
    /// Floating point option.
    Number(f64),
    /// String option, and the id of user/channel/role options.
    String(String),
}

/// One option in the (possibly nested) option tree of a command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDataOption {
    /// Option name.
    pub name: String,
    /// Option type.
    #[serde(rename = "type")]
    pub kind: CommandOptionType,
    /// Value for leaf options.
    #[serde(default)]
    pub value: Option<OptionValue>,
    /// Nested options for subcommands and groups.
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
}

/// Objects referenced by options, keyed by id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedData {
    /// Users referenced by USER options.
    #[serde(default)]
    pub users: HashMap<Snowflake, User>,
}

/// Command-specific interaction data.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    /// Registered command id.
    pub id: Snowflake,
    /// Command name.
    pub name: String,
    /// Top-level options.
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
    /// Resolved objects.
    #[serde(default)]
    pub resolved: ResolvedData,
}

/// An `INTERACTION_CREATE` body.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    /// Interaction id. Its timestamp is when the user issued the command.
    pub id: Snowflake,
    /// Application the interaction targets.
    pub application_id: Snowflake,
    /// Interaction kind.
    #[serde(rename = "type")]
    pub kind: InteractionType,
    /// Continuation token for responding.
    pub token: String,
    /// Guild the command was issued in, absent in DMs.
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Channel the command was issued in.
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    /// Invoking member (guild interactions).
    #[serde(default)]
    pub member: Option<InteractionMember>,
    /// Invoking user (DM interactions).
    #[serde(default)]
    pub user: Option<User>,
    /// Command data for application commands.
    #[serde(default)]
    pub data: Option<CommandData>,
}

impl Interaction {
    /// The invoking user, whether in a guild or a DM.
    pub fn invoker(&self) -> Option<&User> {
        self.member.as_ref().map(|m| &m.user).or(self.user.as_ref())
    }

    /// The invoker's permissions in the channel. `None` outside guilds.
    pub fn invoker_permissions(&self) -> Option<Permissions> {
        self.member.as_ref().and_then(|m| m.permissions)
    }
}

/// Body of an interaction response message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionCallbackData {
    /// Message text.
    pub content: String,
    /// Message flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

/// Response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    /// Callback type; 4 = CHANNEL_MESSAGE_WITH_SOURCE.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Message body.
    pub data: InteractionCallbackData,
}

impl InteractionResponse {
    /// Callback type for an immediate message reply.
    pub const CHANNEL_MESSAGE_WITH_SOURCE: u8 = 4;

    /// An immediate message reply, optionally visible to the invoker only.
    pub fn message(content: impl Into<String>, ephemeral: bool) -> Self {
        Self {
            kind: Self::CHANNEL_MESSAGE_WITH_SOURCE,
            data: InteractionCallbackData {
                content: content.into(),
                flags: ephemeral.then_some(MESSAGE_FLAG_EPHEMERAL),
            },
        }
    }
}
