//! warden - allow-listed moderation bot.
//!
//! A single-guild chat bot that lets a small, explicitly trusted group run
//! moderation commands (ban, kick, timeout, purge) and manage who belongs to
//! that group. Every command passes two gates before it runs: the invoker
//! must be on the allow-list, and must hold the platform permission the
//! command needs.
//!
//! The crate is split along the request path:
//!
//! - [`network`] keeps the gateway session alive and turns interactions into
//!   [`commands::CommandInvocation`]s
//! - [`bot`] runs the pipeline: resolve, authorize ([`caps`]), validate,
//!   dispatch ([`handlers`])
//! - [`platform`] is the boundary to the chat platform's REST API
//! - [`state`] holds the durable allow-list

pub mod bot;
pub mod caps;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod metrics;
pub mod network;
pub mod platform;
pub mod state;
pub mod telemetry;

pub use bot::{Bot, Outcome};
