//! Network module.
//!
//! Contains the gateway client that keeps the websocket session alive and
//! feeds interactions into the command pipeline.

mod gateway;

pub use gateway::{Backoff, CloseAction, GatewayClient, GatewayError, classify_close};
