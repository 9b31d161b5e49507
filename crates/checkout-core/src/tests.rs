use checkout_domain::{Field, ReferenceData, Step, Tab};
use rust_decimal::Decimal;

use crate::{
    account_name::{AccountNameResolver, AccountNameState},
    conversion::{ConversionRate, RateBook},
    error::{EditError, LookupError, NavigationError},
    validation::FieldErrors,
    wizard::{CheckoutSession, Screen, SessionOptions},
};

fn session() -> CheckoutSession {
    CheckoutSession::new(ReferenceData::builtin(), SessionOptions::default())
}

fn fill_payment(session: &mut CheckoutSession) {
    session.edit(Field::PayFrom, "metamask").expect("pay from");
    session.edit(Field::PayTo, "bank").expect("pay to");
}

fn fill_bank(session: &mut CheckoutSession) {
    session.edit(Field::Bank, "gtb").expect("bank");
    session
        .edit(Field::AccountNumber, "1234567890")
        .expect("account number");
}

fn fill_contact(session: &mut CheckoutSession) {
    session.edit(Field::Email, "ada@example.com").expect("email");
    session
        .edit(Field::PhoneNumber, "000-000-0000")
        .expect("phone");
}

fn walk_to(session: &mut CheckoutSession, target: Step) {
    while session.step() < target {
        match session.step() {
            Step::PaymentDetails => fill_payment(session),
            Step::RecipientBank => fill_bank(session),
            Step::RecipientContact => fill_contact(session),
            _ => {}
        }
        session.advance().expect("advance");
    }
}

#[test]
fn new_session_is_seeded_from_defaults() {
    let session = session();

    assert_eq!(session.tab(), Tab::CryptoToCash);
    assert_eq!(session.step(), Step::PaymentDetails);
    assert_eq!(session.payment().pay_amount, "1.00");
    assert_eq!(session.payment().pay_currency, "ETH");
    assert_eq!(session.payment().receive_amount, "1500.00");
    assert_eq!(session.payment().receive_currency, "NGN");
    assert_eq!(session.contact().country_code, "+234");
    assert!(session.errors().is_empty());
    assert!(session.tabs_visible());
}

#[test]
fn missing_wallet_and_method_block_exactly_those_fields() {
    let mut session = session();

    let err = session.advance().unwrap_err();
    let NavigationError::Blocked(errors) = err else {
        panic!("expected blocked advance");
    };
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![Field::PayFrom, Field::PayTo]
    );
    assert_eq!(errors.get(Field::PayFrom), Some("Please select a wallet"));
    assert_eq!(session.errors(), &errors);
    assert_eq!(session.step(), Step::PaymentDetails);
}

#[test]
fn every_single_payment_violation_blocks_advance() {
    let cases = [
        (Field::PayAmount, "", "Amount is required"),
        (Field::PayAmount, "0", "Amount must be greater than 0"),
        (Field::PayAmount, "-3", "Amount must be greater than 0"),
        (Field::PayAmount, "12abc", "Amount must be greater than 0"),
        (Field::PayCurrency, " ", "Please select a currency to pay"),
        (Field::ReceiveCurrency, "", "Please select a currency to receive"),
        (Field::PayFrom, "", "Please select a wallet"),
        (Field::PayTo, "", "Please select a payment method"),
    ];
    for (field, value, message) in cases {
        let mut session = session();
        fill_payment(&mut session);
        session.edit(field, value).expect("edit");

        let err = session.advance().unwrap_err();
        let NavigationError::Blocked(errors) = err else {
            panic!("expected blocked advance for {field}");
        };
        assert_eq!(errors.get(field), Some(message), "{field}={value:?}");
        assert!(!session.can_advance());
    }
}

#[test]
fn unknown_rate_leaves_the_other_amount_alone() {
    let options = SessionOptions {
        rates: crate::conversion::RateBook::new(None),
        ..SessionOptions::default()
    };
    let mut session = CheckoutSession::new(ReferenceData::builtin(), options);
    assert_eq!(session.payment().receive_amount, "");

    session.edit(Field::PayAmount, "3").unwrap();
    assert_eq!(session.payment().receive_amount, "");
}

#[test]
fn cleared_receive_amount_blocks_advance() {
    let mut session = session();
    fill_payment(&mut session);
    session.edit(Field::PayAmount, "abc").unwrap();

    assert_eq!(session.payment().pay_amount, "abc");
    assert_eq!(session.payment().receive_amount, "");
    let Err(NavigationError::Blocked(errors)) = session.advance() else {
        panic!("expected blocked advance");
    };
    assert!(errors.contains(Field::PayAmount));
    assert!(errors.contains(Field::ReceiveAmount));
}

#[test]
fn amount_edits_keep_both_sides_consistent() {
    let mut session = session();

    session.edit(Field::PayAmount, "0.37").unwrap();
    assert_eq!(session.payment().receive_amount, "555.00");

    session.edit(Field::ReceiveAmount, "555.00").unwrap();
    assert_eq!(session.payment().pay_amount, "0.37");

    session.edit(Field::ReceiveAmount, "1000").unwrap();
    assert_eq!(session.payment().pay_amount, "0.67");

    session.edit(Field::PayCurrency, "BTC").unwrap();
    assert_eq!(session.payment().pay_amount, "0.67");
    assert_eq!(session.payment().receive_amount, "1000");

    session.edit(Field::PayAmount, "0.67").unwrap();
    session.edit(Field::ReceiveCurrency, "USD").unwrap();
    assert_eq!(session.payment().receive_amount, "1005.00");
}

#[test]
fn currency_edits_keep_a_typed_receive_amount() {
    let rates = RateBook::default().with_pair(
        "ETH",
        "USD",
        ConversionRate::new(Decimal::from(2000)).unwrap(),
    );
    let mut session = CheckoutSession::new(
        ReferenceData::builtin(),
        SessionOptions {
            rates,
            ..SessionOptions::default()
        },
    );

    session.edit(Field::ReceiveAmount, "1000").unwrap();
    session.edit(Field::ReceiveCurrency, "USD").unwrap();
    assert_eq!(session.payment().receive_amount, "1000");
    assert_eq!(session.payment().pay_amount, "0.50");

    session.restart();
    session.edit(Field::ReceiveCurrency, "USD").unwrap();
    assert_eq!(session.payment().pay_amount, "1.00");
    assert_eq!(session.payment().receive_amount, "2000.00");
}

#[test]
fn recomputed_amount_drops_its_stale_error() {
    let mut session = session();
    fill_payment(&mut session);
    session.edit(Field::PayAmount, "abc").unwrap();
    session.advance().unwrap_err();
    assert!(session.errors().contains(Field::ReceiveAmount));

    session.edit(Field::PayAmount, "2").unwrap();
    assert_eq!(session.payment().receive_amount, "3000.00");
    assert!(session.errors().is_empty());

    session.edit(Field::PayAmount, "0").unwrap();
    session.advance().unwrap_err();
    session.edit(Field::PayAmount, "0.00").unwrap();
    assert_eq!(
        session.errors().get(Field::ReceiveAmount),
        Some("Amount must be greater than 0")
    );
}

#[test]
fn editing_a_field_clears_only_its_error() {
    let mut session = session();
    session.advance().unwrap_err();
    assert_eq!(session.errors().len(), 2);

    session.edit(Field::PayFrom, "rainbow").unwrap();
    assert!(!session.errors().contains(Field::PayFrom));
    assert!(session.errors().contains(Field::PayTo));
}

#[test]
fn can_advance_tracks_current_data() {
    let mut session = session();
    assert!(!session.can_advance());
    fill_payment(&mut session);
    assert!(session.can_advance());
    session.edit(Field::PayAmount, "").unwrap();
    assert!(!session.can_advance());
}

#[test]
fn account_name_follows_account_number_length() {
    let mut session = session();
    walk_to(&mut session, Step::RecipientBank);
    assert!(!session.tabs_visible());

    session.edit(Field::AccountNumber, "12345").unwrap();
    assert_eq!(session.bank().account_name, None);
    assert_eq!(session.account_name_state(), &AccountNameState::Absent);

    session.edit(Field::Bank, "gtb").unwrap();
    let Err(NavigationError::Blocked(errors)) = session.advance() else {
        panic!("expected blocked advance");
    };
    assert_eq!(
        errors.get(Field::AccountNumber),
        Some("Account number must be at least 10 digits")
    );

    session.edit(Field::AccountNumber, "1234567890").unwrap();
    assert_eq!(session.bank().account_name.as_deref(), Some("ODUTUGA GBEKE"));
    assert!(session.can_advance());
}

#[test]
fn non_digit_account_number_is_rejected_even_with_a_name() {
    let mut session = session();
    walk_to(&mut session, Step::RecipientBank);
    session.edit(Field::Bank, "gtb").unwrap();
    session.edit(Field::AccountNumber, "12345abcde").unwrap();

    assert!(session.bank().account_name.is_some());
    let Err(NavigationError::Blocked(errors)) = session.advance() else {
        panic!("expected blocked advance");
    };
    assert_eq!(
        errors.get(Field::AccountNumber),
        Some("Account number must contain only numbers")
    );
}

#[test]
fn account_name_is_read_only() {
    let mut session = session();
    walk_to(&mut session, Step::RecipientBank);
    assert_eq!(
        session.edit_key("accountName", "MALLORY"),
        Err(EditError::ReadOnlyField("accountName".into()))
    );
    assert_eq!(
        session.edit_key("acount", "x"),
        Err(EditError::UnknownField("acount".into()))
    );
    session.edit_key("account_number", "1234567890").unwrap();
    assert_eq!(session.bank().account_number, "1234567890");
}

#[test]
fn edits_outside_the_active_screen_are_rejected() {
    let mut session = session();
    assert_eq!(
        session.edit(Field::Email, "ada@example.com"),
        Err(EditError::FieldNotOnScreen {
            field: Field::Email,
            screen: "payment-details",
        })
    );
    assert!(session.contact().email.is_empty());
}

#[test]
fn retreat_keeps_entered_data() {
    let mut session = session();
    session.edit(Field::PayAmount, "2.5").unwrap();
    walk_to(&mut session, Step::RecipientBank);

    assert_eq!(session.retreat(), Ok(Step::PaymentDetails));
    assert_eq!(session.payment().pay_amount, "2.5");
    assert_eq!(session.payment().receive_amount, "3750.00");
    assert_eq!(session.payment().pay_from, "metamask");
    assert_eq!(session.payment().pay_to, "bank");
    assert_eq!(session.retreat(), Err(NavigationError::AtFirstStep));
}

#[test]
fn retreat_reresolves_account_name_on_the_bank_step() {
    let mut session = session();
    walk_to(&mut session, Step::RecipientContact);
    assert_eq!(session.bank().account_name.as_deref(), Some("ODUTUGA GBEKE"));

    session.retreat().unwrap();
    assert_eq!(session.step(), Step::RecipientBank);
    assert_eq!(session.bank().account_number, "1234567890");
    assert_eq!(session.bank().account_name.as_deref(), Some("ODUTUGA GBEKE"));
}

#[test]
fn transitions_clear_errors() {
    let mut session = session();
    session.advance().unwrap_err();
    assert!(!session.errors().is_empty());
    fill_payment(&mut session);
    session.advance().unwrap();
    assert!(session.errors().is_empty());

    session.advance().unwrap_err();
    assert!(!session.errors().is_empty());
    session.retreat().unwrap();
    assert!(session.errors().is_empty());
}

#[test]
fn full_flow_builds_a_transaction_record() {
    let mut session = session();
    walk_to(&mut session, Step::SendPayment);

    let instructions = session.send_instructions();
    assert_eq!(instructions.network, "ETH");
    assert_eq!(instructions.amount_to_send, "1.00 ETH");
    assert_eq!(instructions.wallet, "Metamask");
    assert_eq!(instructions.address, "4LiV4YjbxsL6739MKghUd");
    assert!(session.transaction().is_none());

    assert_eq!(session.advance(), Ok(Step::Processing));
    let record = session.transaction().expect("record");
    assert_eq!(record.transaction_id, "NC123456789");
    assert_eq!(record.receive_amount, "1500.00");
    assert_eq!(record.account_name.as_deref(), Some("ODUTUGA GBEKE"));
    assert_eq!(record.recipient_phone, "+234 000-000-0000");
    assert!(matches!(session.screen(), Screen::Processing { .. }));
    assert!(!session.can_advance());
}

#[test]
fn processing_is_terminal_until_restart() {
    let mut session = session();
    walk_to(&mut session, Step::Processing);

    assert_eq!(session.advance(), Err(NavigationError::TerminalStep));
    assert_eq!(session.retreat(), Err(NavigationError::TerminalStep));
    assert_eq!(
        session.switch_tab(Tab::CashToCrypto),
        Err(NavigationError::TerminalStep)
    );

    session.restart();
    assert_eq!(session.step(), Step::PaymentDetails);
    assert_eq!(session.payment().pay_from, "");
    assert_eq!(session.payment().receive_amount, "1500.00");
    assert_eq!(session.bank().account_number, "");
    assert_eq!(session.bank().account_name, None);
    assert_eq!(session.contact().email, "");
    assert!(session.transaction().is_none());
}

#[test]
fn switching_to_a_placeholder_shows_the_waitlist() {
    for target in [Step::PaymentDetails, Step::RecipientContact, Step::SendPayment] {
        let mut session = session();
        fill_payment(&mut session);
        walk_to(&mut session, target);

        session.switch_tab(Tab::CashToCrypto).unwrap();
        assert_eq!(session.tab(), Tab::CashToCrypto);
        assert!(matches!(session.screen(), Screen::Waitlist { .. }));
        assert!(session.tabs_visible());
        assert_eq!(session.advance(), Err(NavigationError::PlaceholderActive));
        assert_eq!(session.retreat(), Err(NavigationError::PlaceholderActive));

        session.switch_tab(Tab::CryptoToCash).unwrap();
        assert_eq!(session.step(), Step::PaymentDetails);
        assert_eq!(session.payment().pay_from, "metamask");
    }
}

#[test]
fn waitlist_signup_records_the_email() {
    let mut session = session();
    assert_eq!(
        session.submit_waitlist(),
        Err(NavigationError::NotOnPlaceholder)
    );

    session.switch_tab(Tab::CryptoToFiatLoan).unwrap();
    let Err(NavigationError::Blocked(errors)) = session.submit_waitlist() else {
        panic!("expected blocked signup");
    };
    assert_eq!(errors.get(Field::WaitlistEmail), Some("Email is required"));

    session.edit(Field::WaitlistEmail, "not-an-email").unwrap();
    assert!(!session.can_advance());
    session.edit(Field::WaitlistEmail, " ada@example.com ").unwrap();
    assert!(session.errors().is_empty());

    assert_eq!(session.submit_waitlist(), Ok("ada@example.com".to_string()));
    assert_eq!(session.waitlist(), ["ada@example.com".to_string()]);
    assert_eq!(session.field_value(Field::WaitlistEmail), Some(""));

    session.restart();
    assert!(session.waitlist().is_empty());
    assert_eq!(session.tab(), Tab::CryptoToCash);
}

#[derive(Debug)]
struct OfflineResolver;

impl AccountNameResolver for OfflineResolver {
    fn resolve(&self, _bank: &str, account_number: &str) -> Result<String, LookupError> {
        Err(LookupError::Unavailable(format!("no route for {account_number}")))
    }
}

#[test]
fn failed_lookup_leaves_the_name_unavailable() {
    let mut session = session().with_resolver(Some(Box::new(OfflineResolver)));
    walk_to(&mut session, Step::RecipientBank);
    session.edit(Field::AccountNumber, "1234567890").unwrap();

    assert_eq!(session.account_name_state(), &AccountNameState::Unavailable);
    assert_eq!(session.bank().account_name, None);
}

#[test]
fn host_driven_lookup_discards_stale_results() {
    let mut session = session().with_resolver(None);
    walk_to(&mut session, Step::RecipientBank);

    session.edit(Field::AccountNumber, "1111111111").unwrap();
    let first = session.pending_lookup().cloned().expect("pending");
    session.edit(Field::AccountNumber, "2222222222").unwrap();
    let second = session.pending_lookup().cloned().expect("pending");

    assert!(!session.complete_account_lookup(&first, Ok("FIRST".into())));
    assert_eq!(session.account_name_state(), &AccountNameState::Pending);
    assert!(session.complete_account_lookup(&second, Ok("SECOND".into())));
    assert_eq!(session.bank().account_name.as_deref(), Some("SECOND"));
}

#[test]
fn leaving_the_step_abandons_a_pending_lookup() {
    let mut session = session().with_resolver(None);
    walk_to(&mut session, Step::RecipientBank);
    session.edit(Field::AccountNumber, "1111111111").unwrap();
    let ticket = session.pending_lookup().cloned().expect("pending");

    session.retreat().unwrap();
    assert!(session.pending_lookup().is_none());
    assert!(!session.complete_account_lookup(&ticket, Ok("LATE".into())));
    assert_eq!(session.bank().account_name, None);
}

#[test]
fn view_serializes_with_wire_names() {
    let mut session = session();
    session.advance().unwrap_err();

    let json = serde_json::to_value(session.view()).expect("serialize view");
    assert_eq!(json["tab"], "crypto-to-cash");
    assert_eq!(json["step"], "payment-details");
    assert_eq!(json["screen"]["screen"], "payment-details");
    assert_eq!(json["screen"]["details"]["receiveAmount"], "1500.00");
    assert_eq!(json["errors"]["payFrom"], "Please select a wallet");
    assert_eq!(json["canAdvance"], false);
    assert_eq!(json["tabsVisible"], true);
}

#[test]
fn blocked_message_lists_fields() {
    let mut errors = FieldErrors::new();
    errors.insert(Field::Bank, "Please select a bank");
    insta::assert_snapshot!(
        NavigationError::Blocked(errors).to_string(),
        @"Step is incomplete: bank: Please select a bank"
    );
}
