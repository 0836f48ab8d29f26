//! Static command descriptors.
//!
//! A [`CommandSpec`] names a command, its parameters (or subcommands), the
//! platform permission it needs on top of allow-list membership, and which
//! allow-list tier gates it. Descriptors are `'static` so routes built from
//! them can key the handler registry directly.

use crate::caps::Permission;
use std::fmt;
use warden_proto::{ApplicationCommand, CommandOption, CommandOptionType};

/// Value type a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Principal,
    Text,
    Integer,
}

impl ParamKind {
    fn option_type(self) -> CommandOptionType {
        match self {
            Self::Principal => CommandOptionType::User,
            Self::Text => CommandOptionType::String,
            Self::Integer => CommandOptionType::Integer,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Principal => "a user",
            Self::Text => "text",
            Self::Integer => "an integer",
        })
    }
}

#[derive(Debug)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Inclusive bounds advertised to the client. Handlers enforce their own.
    pub range: Option<(i64, i64)>,
}

#[derive(Debug)]
pub struct SubcommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

/// Which allow-list tier an invoker must hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any allow-listed principal.
    AllowListed,
    /// Principals allowed to administer the allow-list itself.
    AllowListAdmin,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Non-empty for grouped commands; `params` is then unused.
    pub subcommands: &'static [SubcommandSpec],
    pub params: &'static [ParamSpec],
    pub permission: Option<Permission>,
    pub access: Access,
}

impl CommandSpec {
    pub fn subcommand(&self, name: &str) -> Option<&'static SubcommandSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Every route this command can resolve to.
    pub fn routes(&'static self) -> Vec<Route> {
        if self.subcommands.is_empty() {
            return vec![Route::new(self.name, None)];
        }
        self.subcommands
            .iter()
            .map(|s| Route::new(self.name, Some(s.name)))
            .collect()
    }

    /// Registration payload for the platform.
    pub fn to_application_command(&self) -> ApplicationCommand {
        let options = if self.subcommands.is_empty() {
            self.params.iter().map(param_option).collect()
        } else {
            self.subcommands
                .iter()
                .map(|s| {
                    CommandOption::subcommand(
                        s.name,
                        s.description,
                        s.params.iter().map(param_option).collect(),
                    )
                })
                .collect()
        };

        ApplicationCommand {
            name: self.name.to_string(),
            description: self.description.to_string(),
            options,
        }
    }
}

fn param_option(param: &ParamSpec) -> CommandOption {
    let option = CommandOption::new(
        param.kind.option_type(),
        param.name,
        param.description,
        param.required,
    );
    match param.range {
        Some((min, max)) => option.with_range(min, max),
        None => option,
    }
}

/// A validated (command, subcommand) pair drawn from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    pub command: &'static str,
    pub subcommand: Option<&'static str>,
}

impl Route {
    pub const fn new(command: &'static str, subcommand: Option<&'static str>) -> Self {
        Self {
            command,
            subcommand,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subcommand {
            Some(sub) => write!(f, "{} {}", self.command, sub),
            None => f.write_str(self.command),
        }
    }
}
