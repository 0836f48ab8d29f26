//! Authorization via capability tokens.
//!
//! Handlers never check the allow-list or platform permissions themselves.
//! The dispatcher asks [`CapabilityAuthority`] to authorize an invocation and
//! only a returned [`Cap<InvokeCap>`](InvokeCap) lets it reach a handler.
//!
//! - [`Cap<T>`] is unforgeable: only the authority can construct one.
//! - [`Capability`] types name what a token proves and what it is scoped to.
//! - [`Denial`] carries the reply shown when a gate refuses.

mod authority;
mod perms;
mod tokens;

pub use authority::{CapabilityAuthority, Denial};
pub use perms::{AllowListAdminCap, AllowListedCap, Grant, InvokeCap, Permission, PermissionCap};
pub use tokens::{Cap, Capability};
