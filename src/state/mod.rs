//! Mutable domain state.
//!
//! The allow-list is the only state that outlives a single invocation; it is
//! owned by the process and shared with the gate and the management handlers.

mod allowlist;
mod principal;

pub use allowlist::AllowList;
pub use principal::Principal;
