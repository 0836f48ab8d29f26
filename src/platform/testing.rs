//! In-memory platform for unit tests.

use super::{Member, Platform, PlatformError};
use crate::commands::{CommandInvocation, Reply, UserRef};
use crate::state::Principal;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use warden_proto::{Permissions, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Ban(Principal, String),
    Kick(Principal, String),
    Timeout(Principal, Duration, String),
    BulkDelete(Snowflake, u8),
}

#[derive(Default)]
pub(crate) struct RecordingPlatform {
    pub members: Mutex<HashSet<Principal>>,
    pub actions: Mutex<Vec<Action>>,
    pub replies: Mutex<Vec<Reply>>,
    /// Messages available for a purge; `bulk_delete` deletes at most this many.
    pub deletable: AtomicUsize,
    pub fail_actions: AtomicBool,
    pub fail_lookup: AtomicBool,
    pub fail_permissions: AtomicBool,
    pub fail_respond: AtomicBool,
    /// Every `respond` call, delivered or not.
    pub respond_attempts: AtomicUsize,
}

impl RecordingPlatform {
    pub fn with_members(ids: impl IntoIterator<Item = u64>) -> Self {
        let platform = Self::default();
        platform
            .members
            .lock()
            .extend(ids.into_iter().map(Principal::from));
        platform
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().clone()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().clone()
    }

    fn act(&self, action: Action) -> Result<(), PlatformError> {
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(PlatformError::Status {
                status: 403,
                body: "Missing Permissions".into(),
            });
        }
        self.actions.lock().push(action);
        Ok(())
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn fetch_member(
        &self,
        guild_id: Snowflake,
        user: &UserRef,
    ) -> Result<Option<Member>, PlatformError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(PlatformError::Transport("connection reset".into()));
        }
        Ok(self.members.lock().contains(&user.id).then(|| Member {
            guild_id,
            user: user.clone(),
        }))
    }

    async fn ban(&self, member: &Member, reason: &str) -> Result<(), PlatformError> {
        self.act(Action::Ban(member.user.id, reason.to_string()))
    }

    async fn kick(&self, member: &Member, reason: &str) -> Result<(), PlatformError> {
        self.act(Action::Kick(member.user.id, reason.to_string()))
    }

    async fn timeout(
        &self,
        member: &Member,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError> {
        self.act(Action::Timeout(member.user.id, duration, reason.to_string()))
    }

    async fn bulk_delete(&self, channel_id: Snowflake, amount: u8) -> Result<usize, PlatformError> {
        self.act(Action::BulkDelete(channel_id, amount))?;
        Ok(self.deletable.load(Ordering::SeqCst).min(amount as usize))
    }

    async fn invoker_permissions(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<Permissions, PlatformError> {
        if self.fail_permissions.load(Ordering::SeqCst) {
            return Err(PlatformError::Transport("timed out".into()));
        }
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
        self.respond_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_respond.load(Ordering::SeqCst) {
            return Err(PlatformError::Status {
                status: 404,
                body: "Unknown interaction".into(),
            });
        }
        self.replies.lock().push(reply.clone());
        Ok(())
    }
}
