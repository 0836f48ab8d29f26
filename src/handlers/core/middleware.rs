//! Response middleware for routing handler replies.
//!
//! Direct forwards the reply to the platform; Capturing buffers it so callers
//! (tests, dry runs) can inspect what would have been sent.

use crate::commands::{CommandInvocation, Reply};
use crate::platform::{Platform, PlatformError};
use std::time::Duration;
use tokio::sync::Mutex;

/// The platform drops an interaction that is not answered within three
/// seconds of delivery; waiting longer than that cannot succeed.
const SEND_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Copy)]
pub enum ResponseMiddleware<'a> {
    Direct(&'a dyn Platform),
    Capturing(&'a Mutex<Vec<Reply>>),
}

impl ResponseMiddleware<'_> {
    /// Deliver or buffer `reply` for `invocation`.
    pub async fn send(
        &self,
        invocation: &CommandInvocation,
        reply: Reply,
    ) -> Result<(), PlatformError> {
        match self {
            Self::Direct(platform) => {
                match tokio::time::timeout(SEND_TIMEOUT, platform.respond(invocation, &reply)).await
                {
                    Ok(result) => result,
                    Err(_elapsed) => {
                        tracing::warn!(
                            invocation = %invocation.id,
                            "Reply not accepted within {:?}",
                            SEND_TIMEOUT
                        );
                        Err(PlatformError::Transport("reply timed out".to_string()))
                    }
                }
            }
            Self::Capturing(buf) => {
                buf.lock().await.push(reply);
                Ok(())
            }
        }
    }
}
