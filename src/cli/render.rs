//! Text rendering of the active checkout screen.

use checkout_core::{AccountNameState, CheckoutSession, Screen};
use checkout_domain::{Field, FormKind, Step, Tab};
use chrono::SecondsFormat;

use super::output;

pub fn render_session(session: &CheckoutSession) {
    let screen = session.screen();
    output::section(heading(session, &screen));
    if session.tabs_visible() {
        output::info(tab_strip(session.tab()));
    }

    match &screen {
        Screen::PaymentDetails { .. } => {
            render_fields(session, FormKind::PaymentDetails);
        }
        Screen::RecipientBank { account_name, .. } => {
            render_fields(session, FormKind::RecipientBank);
            output::info(format!(
                "  {:<16} {:<24} {}",
                "accountName",
                "Account name",
                describe_account_name(account_name)
            ));
        }
        Screen::RecipientContact { .. } => {
            render_fields(session, FormKind::RecipientContact);
        }
        Screen::SendPayment { instructions } => {
            output::info(format!("Send {} to the address below.", instructions.amount_to_send));
            output::info(format!("  Address : {}", instructions.address));
            output::info(format!("  Network : {}", instructions.network));
            output::info(format!("  Wallet  : {}", instructions.wallet));
            output::info("Only send on this network. Type `next` once the payment is sent.");
        }
        Screen::Processing { record } => {
            output::success("Your transaction is processing.");
            output::info(format!("  Transaction ID : {}", record.transaction_id));
            output::info(format!(
                "  Sent           : {} {}",
                record.pay_amount, record.pay_currency
            ));
            output::info(format!(
                "  Recipient gets : {} {}",
                record.receive_amount, record.receive_currency
            ));
            output::info(format!(
                "  Account        : {} {} {}",
                record.bank,
                record.account_number,
                record.account_name.as_deref().unwrap_or("")
            ));
            output::info(format!(
                "  Submitted at   : {}",
                record.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
            output::info("Type `restart` to begin a new checkout.");
        }
        Screen::Waitlist {
            title, description, ..
        } => {
            output::info(*title);
            output::info(description);
            render_fields(session, FormKind::Waitlist);
            output::info("Type `next` to join the waitlist.");
        }
    }

    render_errors(session);
}

fn heading(session: &CheckoutSession, screen: &Screen<'_>) -> String {
    match screen {
        Screen::Waitlist { tab, .. } => tab.title().to_string(),
        _ => {
            let step = session.step();
            format!(
                "{} | Step {}/{}: {}",
                session.tab().title(),
                step.ordinal(),
                Step::ALL.len(),
                step
            )
        }
    }
}

fn tab_strip(active: Tab) -> String {
    let labels: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            }
        })
        .collect();
    format!("Tabs: {}", labels.join("  "))
}

fn render_fields(session: &CheckoutSession, form: FormKind) {
    for field in Field::for_form(form) {
        output::info(format!(
            "  {:<16} {:<24} {}",
            field.key(),
            field.label(),
            display_value(session, field)
        ));
    }
}

/// Raw value with the catalog label appended for select fields.
pub(crate) fn display_value(session: &CheckoutSession, field: Field) -> String {
    let raw = session.field_value(field).unwrap_or_default();
    if raw.is_empty() {
        return "-".to_string();
    }
    match session.reference().label_for(field, raw) {
        Some(label) if label != raw => format!("{} ({})", raw, label),
        _ => raw.to_string(),
    }
}

fn describe_account_name(state: &AccountNameState) -> String {
    match state {
        AccountNameState::Absent => "-".to_string(),
        AccountNameState::Pending => "(looking up...)".to_string(),
        AccountNameState::Resolved(name) => name.clone(),
        AccountNameState::Unavailable => "(unavailable)".to_string(),
    }
}

fn render_errors(session: &CheckoutSession) {
    for (field, message) in session.errors().iter() {
        output::warning(format!("{}: {}", field, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_values_show_their_label() {
        let mut session = CheckoutSession::default();
        session.edit(Field::PayFrom, "metamask").unwrap();
        assert_eq!(display_value(&session, Field::PayFrom), "metamask (Metamask)");
        assert_eq!(display_value(&session, Field::PayTo), "-");
        assert_eq!(display_value(&session, Field::PayAmount), "1.00");
    }

    #[test]
    fn tab_strip_marks_the_active_tab() {
        insta::assert_snapshot!(
            tab_strip(Tab::CashToCrypto),
            @"Tabs: Crypto to cash  [Cash to crypto]  Crypto to fiat loan"
        );
    }
}
