//! The command pipeline.
//!
//! [`Bot::handle`] takes one invocation from delivery to reply:
//!
//! 1. screen the invoker against the allow-list, then resolve the command
//!    in the catalog,
//! 2. authorize it (allow-list tier, then platform permission),
//! 3. validate its options,
//! 4. dispatch to the route's handler,
//! 5. turn any handler error into the generic failure reply.
//!
//! Every path ends with exactly one reply attempt.

use crate::caps::{CapabilityAuthority, Denial};
use crate::commands::{self, Access, CommandInvocation, OptionError, Reply};
use crate::error::HandlerError;
use crate::handlers::{Context, Registry, RegistryError, ResponseMiddleware};
use crate::metrics;
use crate::platform::Platform;
use crate::state::AllowList;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// How an invocation ended.
#[derive(Debug)]
pub enum Outcome {
    /// The command name is not in the catalog.
    Unknown,
    Denied(Denial),
    Invalid(OptionError),
    Completed,
    Failed(HandlerError),
}

pub struct Bot {
    allowlist: Arc<AllowList>,
    platform: Arc<dyn Platform>,
    authority: CapabilityAuthority,
    registry: Registry,
}

impl Bot {
    /// Build a bot with the built-in handlers.
    pub fn new(allowlist: Arc<AllowList>, platform: Arc<dyn Platform>) -> Result<Self, RegistryError> {
        Self::with_registry(allowlist, platform, Registry::new())
    }

    /// Build a bot around `registry`, which must cover the catalog exactly.
    pub fn with_registry(
        allowlist: Arc<AllowList>,
        platform: Arc<dyn Platform>,
        registry: Registry,
    ) -> Result<Self, RegistryError> {
        registry.verify(commands::catalog())?;
        let authority = CapabilityAuthority::new(allowlist.clone(), platform.clone());
        Ok(Self {
            allowlist,
            platform,
            authority,
            registry,
        })
    }

    pub fn allowlist(&self) -> &AllowList {
        &self.allowlist
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle `invocation`, replying through the platform.
    pub async fn handle(&self, invocation: &CommandInvocation) -> Outcome {
        self.handle_with(invocation, ResponseMiddleware::Direct(self.platform.as_ref()))
            .await
    }

    /// Handle `invocation`, replying through `sender`.
    pub async fn handle_with(
        &self,
        invocation: &CommandInvocation,
        sender: ResponseMiddleware<'_>,
    ) -> Outcome {
        let spec = commands::resolve(&invocation.command);

        // Outsiders are refused before the command name matters, so an
        // unknown name leaks nothing to them.
        let screened = spec.is_none_or(|s| s.access == Access::AllowListed);
        if screened
            && self
                .authority
                .request_allowlisted_cap(invocation.invoker.id)
                .is_none()
        {
            let denial = Denial::NotAllowListed;
            let label = spec.map_or("unknown", |s| s.name);
            metrics::record_denial(label, denial.reason_code());
            return deny(&sender, invocation, label, denial).await;
        }

        let Some(spec) = spec else {
            warn!(command = %invocation.command, invoker = %invocation.invoker.id, "Unknown command");
            send_or_log(&sender, invocation, Reply::failure()).await;
            return Outcome::Unknown;
        };

        let grant = match self.authority.authorize(spec, invocation).await {
            Ok(grant) => grant,
            Err(denial) => return deny(&sender, invocation, spec.name, denial).await,
        };

        let route = match commands::validate(spec, invocation) {
            Ok(route) => route,
            Err(e) => {
                debug!(command = spec.name, error = %e, "Invalid options");
                send_or_log(&sender, invocation, Reply::private(e.reply_text(spec.name))).await;
                return Outcome::Invalid(e);
            }
        };

        let mut ctx = Context::new(
            invocation,
            self.platform.as_ref(),
            &self.allowlist,
            sender,
            grant,
        );

        match self.registry.dispatch(&mut ctx, route).await {
            Ok(()) => {
                if !ctx.replied() {
                    error!(route = %route, "Handler finished without replying");
                    send_or_log(&sender, invocation, Reply::failure()).await;
                }
                Outcome::Completed
            }
            Err(e) => {
                error!(route = %route, code = e.error_code(), error = %e, "Command failed");
                if !ctx.replied() {
                    send_or_log(&sender, invocation, Reply::failure()).await;
                }
                Outcome::Failed(e)
            }
        }
    }
}

async fn deny(
    sender: &ResponseMiddleware<'_>,
    invocation: &CommandInvocation,
    command: &str,
    denial: Denial,
) -> Outcome {
    debug!(
        command,
        invoker = %invocation.invoker.id,
        reason = denial.reason_code(),
        "Invocation denied"
    );
    send_or_log(sender, invocation, denial.reply()).await;
    Outcome::Denied(denial)
}

async fn send_or_log(sender: &ResponseMiddleware<'_>, invocation: &CommandInvocation, reply: Reply) {
    if let Err(e) = sender.send(invocation, reply).await {
        warn!(invocation = %invocation.id, error = %e, "Failed to deliver reply");
    }
}
