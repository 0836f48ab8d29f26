//! Capability types for the command gate.

use super::tokens::Capability;
use crate::state::Principal;
use std::fmt;
use warden_proto::Permissions;

/// Platform permissions a command may require on top of allow-list membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    BanMembers,
    KickMembers,
    /// Shown to users as "Timeout Members".
    ModerateMembers,
    ManageMessages,
}

impl Permission {
    pub const fn bits(self) -> Permissions {
        match self {
            Self::BanMembers => Permissions::BAN_MEMBERS,
            Self::KickMembers => Permissions::KICK_MEMBERS,
            Self::ModerateMembers => Permissions::MODERATE_MEMBERS,
            Self::ManageMessages => Permissions::MANAGE_MESSAGES,
        }
    }

    /// Stable identifier used in logs and metric labels.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BanMembers => "ban_members",
            Self::KickMembers => "kick_members",
            Self::ModerateMembers => "moderate_members",
            Self::ManageMessages => "manage_messages",
        }
    }

    /// Human-readable name used in denial replies.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::BanMembers => "Ban Members",
            Self::KickMembers => "Kick Members",
            Self::ModerateMembers => "Timeout Members",
            Self::ManageMessages => "Manage Messages",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Principal is on the allow-list.
pub struct AllowListedCap;

impl Capability for AllowListedCap {
    type Scope = Principal;
    const NAME: &'static str = "allowlist:member";
}

/// Principal may add, remove and list allow-list entries.
pub struct AllowListAdminCap;

impl Capability for AllowListAdminCap {
    type Scope = Principal;
    const NAME: &'static str = "allowlist:admin";
}

/// Invoker holds a platform permission in the invocation's guild.
pub struct PermissionCap;

impl Capability for PermissionCap {
    type Scope = Permission;
    const NAME: &'static str = "platform:permission";
}

/// What a successful gate check covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub command: &'static str,
    pub principal: Principal,
    pub permission: Option<Permission>,
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.command, self.principal)?;
        if let Some(permission) = self.permission {
            write!(f, " with {permission}")?;
        }
        Ok(())
    }
}

/// Invoker passed every gate for one command.
pub struct InvokeCap;

impl Capability for InvokeCap {
    type Scope = Grant;
    const NAME: &'static str = "command:invoke";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_implies_every_permission() {
        for permission in [
            Permission::BanMembers,
            Permission::KickMembers,
            Permission::ModerateMembers,
            Permission::ManageMessages,
        ] {
            assert!(Permissions::ADMINISTRATOR.contains(permission.bits()));
            assert!(!Permissions::NONE.contains(permission.bits()));
        }
    }

    #[test]
    fn display_names_match_replies() {
        assert_eq!(Permission::ModerateMembers.display_name(), "Timeout Members");
        assert_eq!(Permission::ManageMessages.display_name(), "Manage Messages");
    }
}
