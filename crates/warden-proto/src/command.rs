//! Application-command registration schema.
//!
//! These types are serialized into the body of the bulk-overwrite endpoint
//! that publishes slash commands to a guild.

use serde::{Deserialize, Serialize};

/// Option types understood by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum CommandOptionType {
    /// A subcommand with its own options.
    SubCommand,
    /// A group of subcommands.
    SubCommandGroup,
    /// Free text.
    String,
    /// Signed integer.
    Integer,
    /// Boolean.
    Boolean,
    /// A user reference (value is the user id).
    User,
    /// A channel reference.
    Channel,
    /// A role reference.
    Role,
    /// Floating point number.
    Number,
    /// Any type this crate does not model.
    Other(u8),
}

impl From<u8> for CommandOptionType {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Self::SubCommand,
            2 => Self::SubCommandGroup,
            3 => Self::String,
            4 => Self::Integer,
            5 => Self::Boolean,
            6 => Self::User,
            7 => Self::Channel,
            8 => Self::Role,
            10 => Self::Number,
            other => Self::Other(other),
        }
    }
}

impl From<CommandOptionType> for u8 {
    fn from(kind: CommandOptionType) -> Self {
        match kind {
            CommandOptionType::SubCommand => 1,
            CommandOptionType::SubCommandGroup => 2,
            CommandOptionType::String => 3,
            CommandOptionType::Integer => 4,
            CommandOptionType::Boolean => 5,
            CommandOptionType::User => 6,
            CommandOptionType::Channel => 7,
            CommandOptionType::Role => 8,
            CommandOptionType::Number => 10,
            CommandOptionType::Other(raw) => raw,
        }
    }
}

/// One option in a command definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    /// Option type.
    #[serde(rename = "type")]
    pub kind: CommandOptionType,
    /// Option name (lowercase, 1-32 chars).
    pub name: String,
    /// Description shown in the client.
    pub description: String,
    /// Whether the user must supply this option.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Lower bound for integer options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    /// Upper bound for integer options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    /// Nested options (subcommands only).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    /// A leaf option.
    pub fn new(kind: CommandOptionType, name: &str, description: &str, required: bool) -> Self {
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
            required,
            min_value: None,
            max_value: None,
            options: Vec::new(),
        }
    }

    /// A subcommand wrapping its own options.
    pub fn subcommand(name: &str, description: &str, options: Vec<CommandOption>) -> Self {
        Self {
            options,
            ..Self::new(CommandOptionType::SubCommand, name, description, false)
        }
    }

    /// Advertise an inclusive integer range to the client.
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }
}

/// A slash command definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationCommand {
    /// Command name.
    pub name: String,
    /// Description shown in the client.
    pub description: String,
    /// Options or subcommands.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_registration_body() {
        let cmd = ApplicationCommand {
            name: "purge".into(),
            description: "Delete a number of messages".into(),
            options: vec![
                CommandOption::new(CommandOptionType::Integer, "amount", "1-100", true)
                    .with_range(1, 100),
            ],
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["options"][0]["type"], 4);
        assert_eq!(json["options"][0]["required"], true);
        assert_eq!(json["options"][0]["max_value"], 100);
    }

    #[test]
    fn optional_flags_are_omitted() {
        let opt = CommandOption::new(CommandOptionType::String, "reason", "Reason", false);
        let json = serde_json::to_value(&opt).unwrap();
        assert!(json.get("required").is_none());
        assert!(json.get("options").is_none());
        assert!(json.get("min_value").is_none());
    }

    #[test]
    fn subcommand_nests_options() {
        let sub = CommandOption::subcommand(
            "add",
            "Add a user",
            vec![CommandOption::new(CommandOptionType::User, "user", "User", true)],
        );
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["type"], 1);
        assert_eq!(json["options"][0]["type"], 6);
    }

    #[test]
    fn unknown_option_type_round_trips() {
        let kind: CommandOptionType = serde_json::from_str("11").unwrap();
        assert_eq!(kind, CommandOptionType::Other(11));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "11");
    }
}
