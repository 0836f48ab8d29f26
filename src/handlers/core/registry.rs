//! Command handler registry and dispatch.
//!
//! The `Registry` maps every (command, subcommand) route to exactly one
//! handler, checks that mapping against the catalog at startup, and counts
//! how often each route runs.

use super::context::{Context, Handler};
use crate::commands::{CommandSpec, Route};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    allowlist::{AddHandler, ListHandler, RemoveHandler},
    moderation::{BanHandler, KickHandler, PurgeHandler, TimeoutHandler},
    ping::PingHandler,
};
use crate::telemetry::CommandTimer;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::{Instrument, Level, debug, error, span};

/// Mismatch between the catalog and the registered handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no handler registered for `{0}`")]
    MissingHandler(Route),

    #[error("handler registered for `{0}`, which the catalog does not declare")]
    UndeclaredHandler(Route),
}

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<Route, Box<dyn Handler>>,
    /// Usage counters, one per registered route.
    command_counts: HashMap<Route, AtomicU64>,
}

impl Registry {
    /// Create a registry with every built-in handler.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        // Allow-list management
        registry.register(Route::new("whitelist", Some("add")), AddHandler);
        registry.register(Route::new("whitelist", Some("remove")), RemoveHandler);
        registry.register(Route::new("whitelist", Some("list")), ListHandler);

        registry.register(Route::new("ping", None), PingHandler);

        // Moderation
        registry.register(Route::new("ban", None), BanHandler);
        registry.register(Route::new("kick", None), KickHandler);
        registry.register(Route::new("timeout", None), TimeoutHandler);
        registry.register(Route::new("purge", None), PurgeHandler);

        registry
    }

    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            command_counts: HashMap::new(),
        }
    }

    /// Register `handler` for `route`, replacing any previous one.
    pub fn register(&mut self, route: Route, handler: impl Handler + 'static) {
        self.handlers.insert(route, Box::new(handler));
        self.command_counts.insert(route, AtomicU64::new(0));
    }

    /// Check that every declared route has a handler and every handler a
    /// declaration.
    pub fn verify(&self, catalog: &'static [CommandSpec]) -> Result<(), RegistryError> {
        let declared: HashSet<Route> = catalog.iter().flat_map(CommandSpec::routes).collect();

        if let Some(route) = declared.iter().find(|r| !self.handlers.contains_key(r)) {
            return Err(RegistryError::MissingHandler(*route));
        }
        if let Some(route) = self.handlers.keys().find(|r| !declared.contains(r)) {
            return Err(RegistryError::UndeclaredHandler(*route));
        }
        Ok(())
    }

    /// Per-route usage counts, most used first. Unused routes are omitted.
    pub fn get_command_stats(&self) -> Vec<(Route, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(route, count)| (*route, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1));
        stats
    }

    /// Run the handler for `route` inside a span, timing it and recording
    /// errors. Replies are left to the caller's failure boundary.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, route: Route) -> HandlerResult {
        let Some(handler) = self.handlers.get(&route) else {
            error!(route = %route, "No handler registered for declared route");
            crate::metrics::record_command_error(route.command, "no_handler");
            return Err(HandlerError::NoHandler {
                command: route.command.to_string(),
                subcommand: route.subcommand.map(str::to_string),
            });
        };

        if let Some(counter) = self.command_counts.get(&route) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let invocation = ctx.invocation;
        let command_span = span!(
            Level::DEBUG,
            "bot.command",
            command = route.command,
            subcommand = route.subcommand,
            invoker = %invocation.invoker.id,
            guild = invocation.context.guild_id.map(|g| g.get()),
            channel = invocation.context.channel_id.map(|c| c.get()),
        );

        let _timer = CommandTimer::new(route.command);

        let result = handler.handle(ctx).instrument(command_span).await;

        if let Err(ref e) = result {
            crate::metrics::record_command_error(route.command, e.error_code());
            debug!(route = %route, error = %e, "Command error");
        }

        result
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::catalog;

    #[test]
    fn builtin_registry_matches_catalog() {
        assert_eq!(Registry::new().verify(catalog()), Ok(()));
    }

    #[test]
    fn verify_reports_missing_handler() {
        let mut registry = Registry::empty();
        registry.register(Route::new("ping", None), PingHandler);
        assert!(matches!(
            registry.verify(catalog()),
            Err(RegistryError::MissingHandler(_))
        ));
    }

    #[test]
    fn verify_reports_undeclared_handler() {
        let mut registry = Registry::new();
        registry.register(Route::new("ping", Some("loud")), PingHandler);
        assert_eq!(
            registry.verify(catalog()),
            Err(RegistryError::UndeclaredHandler(Route::new("ping", Some("loud"))))
        );
    }

    #[test]
    fn stats_start_empty() {
        assert!(Registry::new().get_command_stats().is_empty());
    }
}
