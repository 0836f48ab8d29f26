//! Gateway frames.
//!
//! The gateway is a JSON-over-websocket stream. Every frame is a
//! [`GatewayPayload`]; its `op` decides how `d` is interpreted, and for
//! dispatch frames (`op = 0`) the event name travels in `t`.

use crate::error::ProtoError;
use crate::interaction::User;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gateway opcodes the bot sends or understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// An event was dispatched.
    Dispatch = 0,
    /// Keepalive, sent by us or requested by the gateway.
    Heartbeat = 1,
    /// Start a new session.
    Identify = 2,
    /// Resume a dropped session.
    Resume = 6,
    /// The gateway asks us to reconnect and resume.
    Reconnect = 7,
    /// The session is invalid; `d` says whether it is resumable.
    InvalidSession = 9,
    /// First frame after connecting; carries the heartbeat interval.
    Hello = 10,
    /// Acknowledges a heartbeat.
    HeartbeatAck = 11,
}

impl TryFrom<u8> for OpCode {
    type Error = ProtoError;

    fn try_from(op: u8) -> Result<Self, Self::Error> {
        Ok(match op {
            0 => Self::Dispatch,
            1 => Self::Heartbeat,
            2 => Self::Identify,
            6 => Self::Resume,
            7 => Self::Reconnect,
            9 => Self::InvalidSession,
            10 => Self::Hello,
            11 => Self::HeartbeatAck,
            other => return Err(ProtoError::UnknownOpcode(other)),
        })
    }
}

/// Gateway intents (event subscriptions) requested at IDENTIFY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intents(u64);

impl Intents {
    /// Guild lifecycle, channels and roles.
    pub const GUILDS: Self = Self(1 << 0);
    /// Member add/update/remove events.
    pub const GUILD_MEMBERS: Self = Self(1 << 1);

    /// Raw intent bits.
    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Union of two intent sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// A single gateway frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayload {
    /// Opcode.
    pub op: u8,
    /// Opcode-specific body. `null` for some frames, and must be sent as such.
    #[serde(default)]
    pub d: Value,
    /// Sequence number, dispatch frames only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,
    /// Event name, dispatch frames only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewayPayload {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, ProtoError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to a text frame.
    pub fn to_json(&self) -> Result<String, ProtoError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Typed opcode.
    pub fn opcode(&self) -> Result<OpCode, ProtoError> {
        OpCode::try_from(self.op)
    }

    /// Decode the body into a typed struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProtoError> {
        if self.d.is_null() {
            return Err(ProtoError::MissingPayload(self.op));
        }
        Ok(T::deserialize(&self.d)?)
    }

    /// Heartbeat frame carrying the last sequence number seen.
    pub fn heartbeat(seq: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat as u8,
            d: seq.map_or(Value::Null, Value::from),
            s: None,
            t: None,
        }
    }

    /// IDENTIFY frame.
    pub fn identify(identify: &Identify) -> Result<Self, ProtoError> {
        Ok(Self {
            op: OpCode::Identify as u8,
            d: serde_json::to_value(identify)?,
            s: None,
            t: None,
        })
    }

    /// RESUME frame.
    pub fn resume(resume: &Resume) -> Result<Self, ProtoError> {
        Ok(Self {
            op: OpCode::Resume as u8,
            d: serde_json::to_value(resume)?,
            s: None,
            t: None,
        })
    }
}

/// Body of the HELLO frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Hello {
    /// Milliseconds between heartbeats.
    pub heartbeat_interval: u64,
}

/// Body of the IDENTIFY frame.
#[derive(Debug, Clone, Serialize)]
pub struct Identify {
    /// Bot token (without the `Bot ` prefix).
    pub token: String,
    /// Requested intents.
    pub intents: u64,
    /// Client properties.
    pub properties: IdentifyProperties,
}

/// Client properties reported at IDENTIFY.
#[derive(Debug, Clone, Serialize)]
pub struct IdentifyProperties {
    /// Operating system.
    pub os: String,
    /// Library name.
    pub browser: String,
    /// Library name.
    pub device: String,
}

impl IdentifyProperties {
    /// Properties describing this library on the current OS.
    pub fn for_library(name: &str) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: name.to_string(),
            device: name.to_string(),
        }
    }
}

/// Body of the RESUME frame.
#[derive(Debug, Clone, Serialize)]
pub struct Resume {
    /// Bot token.
    pub token: String,
    /// Session being resumed.
    pub session_id: String,
    /// Last sequence number received.
    pub seq: Option<u64>,
}

/// Body of the READY dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct Ready {
    /// Gateway protocol version.
    #[serde(default)]
    pub v: u8,
    /// The bot's own user.
    pub user: User,
    /// Session identifier used for RESUME.
    pub session_id: String,
    /// Gateway URL to use when resuming.
    #[serde(default)]
    pub resume_gateway_url: Option<String>,
}
