//! # warden-proto
//!
//! Wire model for the chat platform that `warden` moderates.
//!
//! ## Features
//!
//! - Snowflake identifiers with creation-time extraction
//! - Permission bit sets with the platform's administrator override
//! - Gateway frames (opcodes, HELLO / IDENTIFY / RESUME / READY bodies)
//! - Interaction payloads with recursive command options
//! - Interaction responses and the application-command registration schema
//!
//! Everything in this crate is plain data: no sockets, no HTTP. The daemon
//! owns all I/O and uses these types only to (de)serialize JSON.
//!
//! ## Quick Start
//!
//! ```rust
//! use warden_proto::{Permissions, Snowflake};
//!
//! let id: Snowflake = "175928847299117063".parse().expect("valid snowflake");
//! assert_eq!(id.timestamp_millis(), 1_462_015_105_796);
//!
//! let perms = Permissions::ADMINISTRATOR;
//! assert!(perms.contains(Permissions::BAN_MEMBERS));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod gateway;
pub mod interaction;
pub mod permissions;
pub mod snowflake;

pub use command::{ApplicationCommand, CommandOption, CommandOptionType};
pub use error::ProtoError;
pub use gateway::{GatewayPayload, Hello, Identify, IdentifyProperties, Intents, OpCode, Ready, Resume};
pub use interaction::{
    CommandData, CommandDataOption, Interaction, InteractionCallbackData, InteractionMember,
    InteractionResponse, InteractionType, OptionValue, ResolvedData, User, MESSAGE_FLAG_EPHEMERAL,
};
pub use permissions::Permissions;
pub use snowflake::Snowflake;
