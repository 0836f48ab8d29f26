//! The capability mint.
//!
//! [`CapabilityAuthority`] is the only code that can create [`Cap`] tokens.
//! It answers the two gate questions for every invocation: is the invoker on
//! the allow-list (or allowed to administer it), and do they hold the platform
//! permission the command needs. Grants are logged at debug, denials at trace.

use super::perms::*;
use super::tokens::{Cap, Capability};
use crate::commands::{Access, CommandInvocation, CommandSpec, Reply};
use crate::metrics;
use crate::platform::Platform;
use crate::state::{AllowList, Principal};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Why the gate refused an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAllowListed,
    NotAllowListAdmin,
    MissingPermission(Permission),
}

impl Denial {
    /// The private reply shown to the invoker.
    pub fn reply(&self) -> Reply {
        Reply::private(match self {
            Self::NotAllowListed => "❌ You are not whitelisted to use this bot.".to_string(),
            Self::NotAllowListAdmin => "❌ You are not allowed to manage the whitelist.".to_string(),
            Self::MissingPermission(p) => {
                format!("❌ You lack **{}** permission.", p.display_name())
            }
        })
    }

    /// Metric label.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NotAllowListed => "not_allowlisted",
            Self::NotAllowListAdmin => "not_allowlist_admin",
            Self::MissingPermission(_) => "missing_permission",
        }
    }
}

/// Sole minter of capability tokens.
pub struct CapabilityAuthority {
    allowlist: Arc<AllowList>,
    platform: Arc<dyn Platform>,
}

impl CapabilityAuthority {
    #[inline]
    pub fn new(allowlist: Arc<AllowList>, platform: Arc<dyn Platform>) -> Self {
        Self {
            allowlist,
            platform,
        }
    }

    pub fn request_allowlisted_cap(&self, principal: Principal) -> Option<Cap<AllowListedCap>> {
        self.allowlist_check::<AllowListedCap>(principal)
    }

    pub fn request_admin_cap(&self, principal: Principal) -> Option<Cap<AllowListAdminCap>> {
        self.allowlist_check::<AllowListAdminCap>(principal)
    }

    /// Request proof that the invoker holds `permission`.
    ///
    /// A failed lookup counts as not held.
    pub async fn request_permission_cap(
        &self,
        invocation: &CommandInvocation,
        permission: Permission,
    ) -> Option<Cap<PermissionCap>> {
        let principal = invocation.invoker.id;
        let granted = match self.platform.invoker_permissions(invocation).await {
            Ok(held) => held.contains(permission.bits()),
            Err(e) => {
                warn!(
                    principal = %principal,
                    permission = %permission,
                    error = %e,
                    "Permission lookup failed; denying"
                );
                false
            }
        };

        if granted {
            log_grant::<PermissionCap>(principal, &permission);
            Some(Cap::new(permission))
        } else {
            log_denial::<PermissionCap>(principal, &permission);
            None
        }
    }

    /// Run every gate `spec` declares for `invocation`.
    ///
    /// Allow-list membership is checked first; the permission lookup only
    /// happens for allow-listed invokers.
    pub async fn authorize(
        &self,
        spec: &'static CommandSpec,
        invocation: &CommandInvocation,
    ) -> Result<Cap<InvokeCap>, Denial> {
        let principal = invocation.invoker.id;

        let result = self.check(spec, invocation).await;
        match result {
            Ok(permission) => {
                let grant = Grant {
                    command: spec.name,
                    principal,
                    permission,
                };
                log_grant::<InvokeCap>(principal, &grant);
                Ok(Cap::new(grant))
            }
            Err(denial) => {
                metrics::record_denial(spec.name, denial.reason_code());
                Err(denial)
            }
        }
    }

    async fn check(
        &self,
        spec: &'static CommandSpec,
        invocation: &CommandInvocation,
    ) -> Result<Option<Permission>, Denial> {
        let principal = invocation.invoker.id;

        match spec.access {
            Access::AllowListed => {
                self.request_allowlisted_cap(principal)
                    .ok_or(Denial::NotAllowListed)?;
            }
            Access::AllowListAdmin => {
                self.request_admin_cap(principal)
                    .ok_or(Denial::NotAllowListAdmin)?;
            }
        }

        match spec.permission {
            Some(permission) => self
                .request_permission_cap(invocation, permission)
                .await
                .map(|cap| Some(cap.into_scope()))
                .ok_or(Denial::MissingPermission(permission)),
            None => Ok(None),
        }
    }

    fn allowlist_check<T>(&self, principal: Principal) -> Option<Cap<T>>
    where
        T: Capability<Scope = Principal>,
    {
        if self.allowlist.contains(principal) {
            log_grant::<T>(principal, &principal);
            Some(Cap::new(principal))
        } else {
            log_denial::<T>(principal, &principal);
            None
        }
    }
}

fn log_grant<T: Capability>(principal: Principal, scope: &T::Scope)
where
    T::Scope: fmt::Display,
{
    debug!(
        capability = T::NAME,
        principal = %principal,
        scope = %scope,
        "Capability granted"
    );
}

fn log_denial<T: Capability>(principal: Principal, scope: &T::Scope)
where
    T::Scope: fmt::Display,
{
    trace!(
        capability = T::NAME,
        principal = %principal,
        scope = %scope,
        "Capability denied"
    );
}
