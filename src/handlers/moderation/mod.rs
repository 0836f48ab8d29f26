//! Moderation handlers: ban, kick, timeout and purge.
//!
//! Ban, kick and timeout first resolve their target as a guild member; an
//! unresolvable target gets the not-found reply and no mutating call.
//! Platform rejections of the action itself propagate to the failure boundary.

mod ban;
mod common;
mod kick;
mod purge;
mod timeout;

pub use ban::BanHandler;
pub use kick::KickHandler;
pub use purge::PurgeHandler;
pub use timeout::TimeoutHandler;
