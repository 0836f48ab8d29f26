//! Inbound command requests and their replies.

use super::spec::ParamKind;
use crate::state::Principal;
use chrono::{DateTime, Utc};
use warden_proto::{Permissions, Snowflake};

/// A user referenced by an invocation, with the tag shown in replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: Principal,
    pub tag: String,
}

impl UserRef {
    pub fn new(id: impl Into<Principal>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
        }
    }
}

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    User(UserRef),
    Text(String),
    Integer(i64),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::User(_) => ParamKind::Principal,
            Self::Text(_) => ParamKind::Text,
            Self::Integer(_) => ParamKind::Integer,
        }
    }
}

/// Where an invocation was issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub guild_id: Option<Snowflake>,
    pub channel_id: Option<Snowflake>,
    /// Invoker's permissions as reported with the event; `None` outside guilds.
    pub permissions: Option<Permissions>,
}

/// One inbound command request. Lives only while it is being handled.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    /// Platform id of the request; its timestamp is when the user issued it.
    pub id: Snowflake,
    /// Continuation token the platform needs to accept the reply.
    pub token: String,
    pub command: String,
    pub subcommand: Option<String>,
    pub params: Vec<(String, ParamValue)>,
    pub invoker: UserRef,
    pub context: InvocationContext,
}

impl CommandInvocation {
    pub fn new(id: Snowflake, command: impl Into<String>, invoker: UserRef) -> Self {
        Self {
            id,
            token: String::new(),
            command: command.into(),
            subcommand: None,
            params: Vec::new(),
            invoker,
            context: InvocationContext::default(),
        }
    }

    pub fn with_subcommand(mut self, subcommand: impl Into<String>) -> Self {
        self.subcommand = Some(subcommand.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.push((name.into(), value));
        self
    }

    pub fn with_context(mut self, context: InvocationContext) -> Self {
        self.context = context;
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn user(&self, name: &str) -> Option<&UserRef> {
        match self.param(name)? {
            ParamValue::User(user) => Some(user),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.param(name)? {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.param(name)? {
            ParamValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// When the user issued the command.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.id.timestamp()
    }
}

/// The single textual response to an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    /// Visible to the invoker only.
    pub private: bool,
}

impl Reply {
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            private: false,
        }
    }

    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            private: true,
        }
    }

    /// Generic reply emitted by the failure boundary.
    pub fn failure() -> Self {
        Self::private("❌ An error occurred while executing that command.")
    }
}
