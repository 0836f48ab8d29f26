//! The fixed command catalog.

use super::spec::{Access, CommandSpec, ParamKind, ParamSpec, SubcommandSpec};
use crate::caps::Permission;
use warden_proto::ApplicationCommand;

/// Smallest and largest number of messages one purge may delete.
pub const PURGE_MIN: i64 = 1;
pub const PURGE_MAX: i64 = 100;

/// Upper bound on a timeout, in minutes (28 days).
pub const TIMEOUT_MAX_MINUTES: i64 = 40_320;

/// Reason recorded when the invoker gives none.
pub const DEFAULT_REASON: &str = "No reason provided";

const USER_TO_ADD: ParamSpec = ParamSpec {
    name: "user",
    description: "User to add",
    kind: ParamKind::Principal,
    required: true,
    range: None,
};

const USER_TO_REMOVE: ParamSpec = ParamSpec {
    name: "user",
    description: "User to remove",
    kind: ParamKind::Principal,
    required: true,
    range: None,
};

const REASON: ParamSpec = ParamSpec {
    name: "reason",
    description: "Reason",
    kind: ParamKind::Text,
    required: false,
    range: None,
};

static CATALOG: &[CommandSpec] = &[
    CommandSpec {
        name: "whitelist",
        description: "Manage the bot whitelist",
        subcommands: &[
            SubcommandSpec {
                name: "add",
                description: "Add a user to the whitelist",
                params: &[USER_TO_ADD],
            },
            SubcommandSpec {
                name: "remove",
                description: "Remove a user from the whitelist",
                params: &[USER_TO_REMOVE],
            },
            SubcommandSpec {
                name: "list",
                description: "Show all whitelisted users",
                params: &[],
            },
        ],
        params: &[],
        permission: None,
        access: Access::AllowListAdmin,
    },
    CommandSpec {
        name: "ping",
        description: "Check bot latency",
        subcommands: &[],
        params: &[],
        permission: None,
        access: Access::AllowListed,
    },
    CommandSpec {
        name: "ban",
        description: "Ban a member",
        subcommands: &[],
        params: &[
            ParamSpec {
                name: "user",
                description: "User to ban",
                kind: ParamKind::Principal,
                required: true,
                range: None,
            },
            REASON,
        ],
        permission: Some(Permission::BanMembers),
        access: Access::AllowListed,
    },
    CommandSpec {
        name: "kick",
        description: "Kick a member",
        subcommands: &[],
        params: &[
            ParamSpec {
                name: "user",
                description: "User to kick",
                kind: ParamKind::Principal,
                required: true,
                range: None,
            },
            REASON,
        ],
        permission: Some(Permission::KickMembers),
        access: Access::AllowListed,
    },
    CommandSpec {
        name: "timeout",
        description: "Timeout a member",
        subcommands: &[],
        params: &[
            ParamSpec {
                name: "user",
                description: "User to timeout",
                kind: ParamKind::Principal,
                required: true,
                range: None,
            },
            ParamSpec {
                name: "minutes",
                description: "Duration in minutes",
                kind: ParamKind::Integer,
                required: true,
                range: Some((1, TIMEOUT_MAX_MINUTES)),
            },
            REASON,
        ],
        permission: Some(Permission::ModerateMembers),
        access: Access::AllowListed,
    },
    CommandSpec {
        name: "purge",
        description: "Bulk delete messages",
        subcommands: &[],
        params: &[ParamSpec {
            name: "amount",
            description: "Number of messages (1-100)",
            kind: ParamKind::Integer,
            required: true,
            range: Some((PURGE_MIN, PURGE_MAX)),
        }],
        permission: Some(Permission::ManageMessages),
        access: Access::AllowListed,
    },
];

/// All commands the bot exposes.
pub fn catalog() -> &'static [CommandSpec] {
    CATALOG
}

/// Look up a command by its invocation name.
pub fn resolve(name: &str) -> Option<&'static CommandSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// Registration payload for every catalog command.
pub fn application_commands() -> Vec<ApplicationCommand> {
    CATALOG.iter().map(CommandSpec::to_application_command).collect()
}
