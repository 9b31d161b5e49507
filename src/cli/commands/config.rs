use std::str::FromStr;

use rust_decimal::Decimal;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const SET_USAGE: &str =
    "usage: config set <color|quiet|rate|transaction-id|send-address|account-name> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage checkout preferences",
        "config [show|path|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = args.first().map(|arg| arg.to_ascii_lowercase());
    match action.as_deref() {
        None | Some("show") => {
            output::section("Configuration");
            output::plain(serde_json::to_string_pretty(&context.config)?);
            Ok(())
        }
        Some("path") => {
            output::info(context.config_manager.config_path().display());
            Ok(())
        }
        Some("set") => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(SET_USAGE.into()));
            }
            let value = args[2..].join(" ");
            set_config_value(context, args[1], value.trim())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`; usage: config [show|path|set <key> <value>]",
            other
        ))),
    }
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    let mut rebuild = true;

    match key.to_ascii_lowercase().as_str() {
        "color" | "colour" => {
            updated.ui_color_enabled = parse_toggle(value)?;
            rebuild = false;
        }
        "quiet" => {
            updated.quiet_mode = parse_toggle(value)?;
            rebuild = false;
        }
        "rate" => {
            updated.conversion.default_rate = if value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(Decimal::from_str(value).map_err(|_| {
                    CommandError::InvalidArguments(format!("`{}` is not a valid rate", value))
                })?)
            };
        }
        "transaction-id" => updated.placeholders.transaction_id = optional(value),
        "send-address" => updated.placeholders.send_address = optional(value),
        "account-name" => updated.placeholders.account_display_name = optional(value),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`; {}",
                other, SET_USAGE
            )))
        }
    }

    context.config_manager.save(&updated)?;
    context.config = updated;
    output::apply_config(&context.config);
    if rebuild {
        context.session_stale = true;
        output::success(format!(
            "Saved {}. It applies from the next `restart`.",
            key
        ));
    } else {
        output::success(format!("Saved {}.", key));
    }
    Ok(())
}

fn parse_toggle(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{}`",
            other
        ))),
    }
}

/// `default` restores the built-in placeholder.
fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value.eq_ignore_ascii_case("default") {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_accept_common_spellings() {
        assert!(parse_toggle("ON").unwrap());
        assert!(!parse_toggle("no").unwrap());
        assert!(parse_toggle("maybe").is_err());
    }

    #[test]
    fn default_clears_a_placeholder() {
        assert_eq!(optional("default"), None);
        assert_eq!(optional("NC42"), Some("NC42".to_string()));
    }
}
