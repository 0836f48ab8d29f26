//! Error types for wire model decoding.

use thiserror::Error;

/// Errors produced while decoding platform payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// A snowflake string was not a valid unsigned 64-bit integer.
    #[error("invalid snowflake: {0:?}")]
    InvalidSnowflake(String),

    /// A permission string was not a valid unsigned 64-bit integer.
    #[error("invalid permission set: {0:?}")]
    InvalidPermissions(String),

    /// A gateway opcode outside the known set.
    #[error("unknown gateway opcode: {0}")]
    UnknownOpcode(u8),

    /// A gateway frame arrived without the body its opcode requires.
    #[error("gateway frame for opcode {0} is missing its payload")]
    MissingPayload(u8),

    /// JSON body did not match the expected shape.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ProtoError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
