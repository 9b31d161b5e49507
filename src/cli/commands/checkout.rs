use checkout_core::EditError;
use checkout_domain::{is_account_name_key, Field, Tab};
use dialoguer::Select;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{output, render};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("show", "Render the active screen", "show [json]", cmd_show),
        CommandEntry::new(
            "set",
            "Edit a field on the active screen",
            "set <field> <value...>",
            cmd_set,
        ),
        CommandEntry::new(
            "pick",
            "Choose a value for a select field from a list",
            "pick <field>",
            cmd_pick,
        ),
        CommandEntry::new(
            "options",
            "List the values a select field accepts",
            "options <field>",
            cmd_options,
        ),
        CommandEntry::new(
            "next",
            "Continue to the next step, or join the waitlist",
            "next",
            cmd_next,
        ),
        CommandEntry::new("back", "Return to the previous step", "back", cmd_back),
        CommandEntry::new(
            "tab",
            "Switch between checkout tabs",
            "tab <crypto-to-cash|cash-to-crypto|crypto-to-fiat-loan>",
            cmd_tab,
        ),
        CommandEntry::new("restart", "Start a new checkout", "restart", cmd_restart),
    ]
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => {
            render::render_session(&context.session);
            Ok(())
        }
        Some("json") => {
            let json = serde_json::to_string_pretty(&context.session.view())?;
            output::plain(json);
            Ok(())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown format `{}`; usage: show [json]",
            other
        ))),
    }
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((key, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: set <field> <value...>".into(),
        ));
    };
    let value = rest.join(" ");
    context.session.edit_key(key, &value)?;
    let field = parse_field(key)?;
    report_edit(context, field);
    Ok(())
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = required_field(args, "pick <field>")?;
    if !context.is_interactive() {
        return Err(CommandError::InvalidArguments(format!(
            "`pick` needs an interactive terminal; use `set {} <value>`",
            field
        )));
    }
    let choices = select_choices(context, field)?;
    let current = context.session.field_value(field).unwrap_or_default();
    let default = choices
        .iter()
        .position(|(id, _)| id == current)
        .unwrap_or(0);
    let labels: Vec<&str> = choices.iter().map(|(_, label)| label.as_str()).collect();

    let selection = Select::with_theme(&context.theme)
        .with_prompt(field.label())
        .items(&labels)
        .default(default)
        .interact_opt()?;

    match selection {
        Some(index) => {
            let id = choices[index].0.clone();
            context.session.edit(field, &id)?;
            report_edit(context, field);
        }
        None => output::info("Selection cancelled."),
    }
    Ok(())
}

fn cmd_options(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = required_field(args, "options <field>")?;
    let choices = select_choices(context, field)?;
    let current = context.session.field_value(field).unwrap_or_default();
    output::section(format!("Options for {}", field));
    for (id, label) in &choices {
        let marker = if id == current { "*" } else { " " };
        output::info(format!("{} {:<14} {}", marker, id, label));
    }
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.placeholder().is_some() {
        let email = context.session.submit_waitlist()?;
        output::success(format!(
            "We'll notify {} when this feature is available!",
            email
        ));
        return Ok(());
    }
    context.session.advance()?;
    render::render_session(&context.session);
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.retreat()?;
    render::render_session(&context.session);
    Ok(())
}

fn cmd_tab(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    let tab = name.parse::<Tab>().map_err(|_| {
        let known: Vec<&str> = Tab::ALL.iter().map(|tab| tab.key()).collect();
        CommandError::InvalidArguments(format!(
            "unknown tab `{}`; expected one of: {}",
            name.trim(),
            known.join(", ")
        ))
    })?;
    context.session.switch_tab(tab)?;
    render::render_session(&context.session);
    Ok(())
}

fn cmd_restart(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.restart_session()?;
    output::success("Checkout restarted.");
    render::render_session(&context.session);
    Ok(())
}

fn required_field(args: &[&str], usage: &str) -> Result<Field, CommandError> {
    match args.first() {
        Some(key) => parse_field(key),
        None => Err(CommandError::InvalidArguments(format!("usage: {}", usage))),
    }
}

fn parse_field(key: &str) -> Result<Field, CommandError> {
    if is_account_name_key(key) {
        return Err(EditError::ReadOnlyField(key.trim().to_string()).into());
    }
    key.parse::<Field>()
        .map_err(|err| CommandError::from(EditError::UnknownField(err.input)))
}

/// `(id, "label (id)")` pairs for a select field.
fn select_choices(
    context: &ShellContext,
    field: Field,
) -> Result<Vec<(String, String)>, CommandError> {
    let options = context.session.reference().options_for(field).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{}` is free text; use `set {} <value>`",
            field, field
        ))
    })?;
    Ok(options
        .into_iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect())
}

fn report_edit(context: &ShellContext, field: Field) {
    let session = &context.session;
    output::success(format!(
        "{} = {}",
        field,
        render::display_value(session, field)
    ));
    let dependent = match field {
        Field::ReceiveAmount => Some(Field::PayAmount),
        Field::PayAmount | Field::PayCurrency | Field::ReceiveCurrency => {
            Some(Field::ReceiveAmount)
        }
        _ => None,
    };
    if let Some(other) = dependent {
        output::info(format!(
            "{} = {}",
            other,
            render::display_value(session, other)
        ));
    }
    if field == Field::AccountNumber {
        if let Some(name) = &session.bank().account_name {
            output::info(format!("accountName = {}", name));
        }
    }
}
