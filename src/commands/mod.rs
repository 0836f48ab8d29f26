//! Command catalog, invocation model, and structural validation.

mod catalog;
mod invocation;
mod spec;
mod validation;

pub use catalog::{
    DEFAULT_REASON, PURGE_MAX, PURGE_MIN, TIMEOUT_MAX_MINUTES, application_commands, catalog,
    resolve,
};
pub use invocation::{CommandInvocation, InvocationContext, ParamValue, Reply, UserRef};
pub use spec::{Access, CommandSpec, ParamKind, ParamSpec, Route, SubcommandSpec};
pub use validation::{OptionError, validate};
