//! Integration test common infrastructure.
//!
//! Provides an in-memory [`Platform`] that records every call, and a
//! fixture that wires it into a [`Bot`] with a temporary allow-list file.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use warden::Bot;
use warden::commands::{CommandInvocation, InvocationContext, ParamValue, Reply, UserRef};
use warden::platform::{Member, Platform, PlatformError};
use warden::state::{AllowList, Principal};
use warden_proto::{Permissions, Snowflake};

pub const GUILD: u64 = 100;
pub const CHANNEL: u64 = 200;

/// One recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchMember(Principal),
    Ban(Principal, String),
    Kick(Principal, String),
    Timeout(Principal, Duration, String),
    BulkDelete(Snowflake, u8),
    Permissions(Principal),
}

#[derive(Default)]
pub struct MockPlatform {
    members: Mutex<HashSet<Principal>>,
    calls: Mutex<Vec<Call>>,
    replies: Mutex<Vec<Reply>>,
}

impl MockPlatform {
    pub fn with_members(ids: impl IntoIterator<Item = u64>) -> Self {
        let platform = Self::default();
        platform
            .members
            .lock()
            .extend(ids.into_iter().map(Principal::from));
        platform
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls other than permission lookups.
    pub fn side_effects(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Permissions(_)))
            .collect()
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
        self.replies.lock().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user: &UserRef,
    ) -> Result<Option<Member>, PlatformError> {
        self.record(Call::FetchMember(user.id));
        Ok(self.members.lock().contains(&user.id).then(|| Member {
            guild_id,
            user: user.clone(),
        }))
    }

    async fn ban(&self, member: &Member, reason: &str) -> Result<(), PlatformError> {
        self.record(Call::Ban(member.user.id, reason.to_string()));
        Ok(())
    }

    async fn kick(&self, member: &Member, reason: &str) -> Result<(), PlatformError> {
        self.record(Call::Kick(member.user.id, reason.to_string()));
        Ok(())
    }

    async fn timeout(
        &self,
        member: &Member,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.record(Call::Timeout(member.user.id, duration, reason.to_string()));
        Ok(())
    }

    async fn bulk_delete(&self, channel_id: Snowflake, amount: u8) -> Result<usize, PlatformError> {
        self.record(Call::BulkDelete(channel_id, amount));
        Ok(amount as usize)
    }

    async fn invoker_permissions(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<Permissions, PlatformError> {
        self.record(Call::Permissions(invocation.invoker.id));
        invocation
            .context
            .permissions
            .ok_or(PlatformError::MissingContext("member permissions"))
    }

    async fn respond(
        &self,
        _invocation: &CommandInvocation,
        reply: &Reply,
    ) -> Result<(), PlatformError> {
        self.replies.lock().push(reply.clone());
        Ok(())
    }
}

/// A bot over a [`MockPlatform`] and a temporary allow-list.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
    pub allowlist: Arc<AllowList>,
    pub platform: Arc<MockPlatform>,
    pub bot: Bot,
}

impl Fixture {
    /// Allow-list `allowed`; `members` are resolvable guild members.
    pub fn new(allowed: &[u64], members: &[u64]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whitelist.json");
        let allowlist = Arc::new(AllowList::load(&path).unwrap());
        for id in allowed {
            allowlist.add(Principal::from(*id)).unwrap();
        }
        let platform = Arc::new(MockPlatform::with_members(members.iter().copied()));
        let bot = Bot::new(allowlist.clone(), platform.clone()).unwrap();
        Self {
            _dir: dir,
            path,
            allowlist,
            platform,
            bot,
        }
    }
}

/// Invocation of `command` by `invoker` inside the test guild.
pub fn invocation(command: &str, invoker: u64, permissions: Permissions) -> CommandInvocation {
    CommandInvocation::new(
        Snowflake::from_timestamp(Utc::now()),
        command,
        UserRef::new(invoker, format!("user{invoker}")),
    )
    .with_context(InvocationContext {
        guild_id: Some(Snowflake::new(GUILD)),
        channel_id: Some(Snowflake::new(CHANNEL)),
        permissions: Some(permissions),
    })
}

pub fn user(id: u64) -> ParamValue {
    ParamValue::User(UserRef::new(id, format!("user{id}")))
}
