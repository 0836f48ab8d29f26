//! Interaction payload → [`CommandInvocation`].

use crate::commands::{CommandInvocation, InvocationContext, ParamValue, UserRef};
use crate::platform::PlatformError;
use warden_proto::{
    CommandDataOption, CommandOptionType, Interaction, InteractionType, OptionValue, ResolvedData,
    Snowflake,
};

/// Convert an interaction into an invocation.
///
/// `Ok(None)` for interactions that are not application commands.
pub fn to_invocation(interaction: &Interaction) -> Result<Option<CommandInvocation>, PlatformError> {
    if interaction.kind != InteractionType::ApplicationCommand {
        return Ok(None);
    }
    let data = interaction
        .data
        .as_ref()
        .ok_or_else(|| malformed("command interaction without data"))?;
    let invoker = interaction
        .invoker()
        .ok_or_else(|| malformed("interaction without a user"))?;

    let (subcommand, options) = match data.options.as_slice() {
        [only] if only.kind == CommandOptionType::SubCommand => {
            (Some(only.name.clone()), only.options.as_slice())
        }
        [only] if only.kind == CommandOptionType::SubCommandGroup => {
            return Err(malformed("subcommand groups are not supported"));
        }
        options => (None, options),
    };

    let params = options
        .iter()
        .map(|option| Ok((option.name.clone(), param_value(option, &data.resolved)?)))
        .collect::<Result<Vec<_>, PlatformError>>()?;

    Ok(Some(CommandInvocation {
        id: interaction.id,
        token: interaction.token.clone(),
        command: data.name.clone(),
        subcommand,
        params,
        invoker: UserRef::new(invoker.id, invoker.tag()),
        context: InvocationContext {
            guild_id: interaction.guild_id,
            channel_id: interaction.channel_id,
            permissions: interaction.invoker_permissions(),
        },
    }))
}

fn param_value(option: &CommandDataOption, resolved: &ResolvedData) -> Result<ParamValue, PlatformError> {
    let value = option
        .value
        .as_ref()
        .ok_or_else(|| malformed(format!("option `{}` has no value", option.name)))?;

    match (option.kind, value) {
        (CommandOptionType::User, OptionValue::String(raw)) => {
            let id: Snowflake = raw
                .parse()
                .map_err(|_| malformed(format!("option `{}` is not a user id", option.name)))?;
            let tag = resolved
                .users
                .get(&id)
                .map(|u| u.tag())
                .unwrap_or_else(|| id.to_string());
            Ok(ParamValue::User(UserRef::new(id, tag)))
        }
        (CommandOptionType::String, OptionValue::String(text)) => Ok(ParamValue::Text(text.clone())),
        (CommandOptionType::Integer, OptionValue::Integer(n)) => Ok(ParamValue::Integer(*n)),
        (kind, _) => Err(malformed(format!(
            "option `{}` has unsupported type {}",
            option.name,
            u8::from(kind)
        ))),
    }
}

fn malformed(detail: impl Into<String>) -> PlatformError {
    PlatformError::Decode(detail.into())
}
