//! Structural checks on an invocation against its descriptor.
//!
//! Validation only looks at shape: the subcommand exists, required parameters
//! are present, and each value has the declared kind. Domain ranges (purge
//! amount, timeout length) are left to the handlers, which answer with their
//! own messages.

use super::invocation::CommandInvocation;
use super::spec::{CommandSpec, ParamKind, ParamSpec, Route};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("a subcommand is required")]
    MissingSubcommand,

    #[error("unknown subcommand `{0}`")]
    UnknownSubcommand(String),

    #[error("`{0}` takes no subcommand")]
    UnexpectedSubcommand(String),

    #[error("missing required option `{0}`")]
    MissingRequired(&'static str),

    #[error("option `{name}` must be {expected}")]
    WrongKind {
        name: &'static str,
        expected: ParamKind,
    },

    #[error("unknown option `{0}`")]
    Unknown(String),

    #[error("option `{0}` given more than once")]
    Duplicate(String),
}

impl OptionError {
    /// Reply text shown to the invoker.
    pub fn reply_text(&self, command: &str) -> String {
        format!("❌ Invalid options for /{command}: {self}.")
    }
}

/// Check `invocation` against `spec`, returning the route to dispatch.
pub fn validate(
    spec: &'static CommandSpec,
    invocation: &CommandInvocation,
) -> Result<Route, OptionError> {
    let (route, params) = match (spec.subcommands.is_empty(), invocation.subcommand.as_deref()) {
        (true, None) => (Route::new(spec.name, None), spec.params),
        (true, Some(sub)) => return Err(OptionError::UnexpectedSubcommand(sub.to_string())),
        (false, None) => return Err(OptionError::MissingSubcommand),
        (false, Some(sub)) => {
            let sub = spec
                .subcommand(sub)
                .ok_or_else(|| OptionError::UnknownSubcommand(sub.to_string()))?;
            (Route::new(spec.name, Some(sub.name)), sub.params)
        }
    };

    check_params(params, invocation)?;
    Ok(route)
}

fn check_params(params: &'static [ParamSpec], invocation: &CommandInvocation) -> Result<(), OptionError> {
    for (index, (name, value)) in invocation.params.iter().enumerate() {
        let Some(param) = params.iter().find(|p| p.name == name) else {
            return Err(OptionError::Unknown(name.clone()));
        };
        if invocation.params[..index].iter().any(|(n, _)| n == name) {
            return Err(OptionError::Duplicate(name.clone()));
        }
        if value.kind() != param.kind {
            return Err(OptionError::WrongKind {
                name: param.name,
                expected: param.kind,
            });
        }
    }

    for param in params.iter().filter(|p| p.required) {
        if invocation.param(param.name).is_none() {
            return Err(OptionError::MissingRequired(param.name));
        }
    }

    Ok(())
}
