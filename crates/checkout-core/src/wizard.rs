//! Step/tab state machine for the checkout wizard.
//!
//! [`CheckoutSession`] owns every record the user fills in and is the only
//! place transitions happen. Screen adapters feed it edits and navigation
//! requests and re-render from [`CheckoutSession::view`].

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use checkout_domain::{
    is_account_name_key, CheckoutDefaults, Field, FormKind, PaymentDetails, RecipientBankDetails,
    RecipientContactDetails, ReferenceData, SendInstructions, Step, Tab, TransactionRecord,
    WaitlistSignup,
};

use crate::account_name::{
    AccountNameLookup, AccountNameResolver, AccountNameState, LookupTicket, MockResolver,
    DEFAULT_ACCOUNT_DISPLAY_NAME,
};
use crate::conversion::{pay_to_receive, receive_to_pay, RateBook};
use crate::error::{EditError, LookupError, NavigationError};
use crate::validation::{FieldErrors, Validate, ACCOUNT_NUMBER_LENGTH};

pub const DEFAULT_SEND_ADDRESS: &str = "4LiV4YjbxsL6739MKghUd";
pub const DEFAULT_TRANSACTION_ID: &str = "NC123456789";

/// Per-session settings, usually built from the user's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub defaults: CheckoutDefaults,
    pub rates: RateBook,
    pub send_address: String,
    pub transaction_id: String,
    pub account_display_name: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            defaults: CheckoutDefaults::default(),
            rates: RateBook::default(),
            send_address: DEFAULT_SEND_ADDRESS.to_string(),
            transaction_id: DEFAULT_TRANSACTION_ID.to_string(),
            account_display_name: DEFAULT_ACCOUNT_DISPLAY_NAME.to_string(),
        }
    }
}

/// Waitlist capture shown instead of the steps on tabs without a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderFlow {
    pub tab: Tab,
    pub form: WaitlistSignup,
}

impl PlaceholderFlow {
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            form: WaitlistSignup::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        "Coming Soon!"
    }

    pub fn description(&self) -> String {
        format!(
            "{} is almost here. Enter your email and we'll let you know the moment it's live.",
            self.tab.title()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum StepState {
    PaymentDetails,
    RecipientBank,
    RecipientContact,
    SendPayment,
    Processing(Box<TransactionRecord>),
}

impl StepState {
    fn step(&self) -> Step {
        match self {
            StepState::PaymentDetails => Step::PaymentDetails,
            StepState::RecipientBank => Step::RecipientBank,
            StepState::RecipientContact => Step::RecipientContact,
            StepState::SendPayment => Step::SendPayment,
            StepState::Processing(_) => Step::Processing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Flow {
    Checkout(StepState),
    Placeholder(PlaceholderFlow),
}

/// The active screen with a borrowed snapshot of its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "kebab-case")]
pub enum Screen<'a> {
    PaymentDetails {
        details: &'a PaymentDetails,
    },
    RecipientBank {
        details: &'a RecipientBankDetails,
        #[serde(rename = "accountName")]
        account_name: &'a AccountNameState,
    },
    RecipientContact {
        details: &'a RecipientContactDetails,
    },
    SendPayment {
        instructions: SendInstructions,
    },
    Processing {
        record: &'a TransactionRecord,
    },
    Waitlist {
        tab: Tab,
        title: &'static str,
        description: String,
        details: &'a WaitlistSignup,
    },
}

impl Screen<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::PaymentDetails { .. } => Step::PaymentDetails.key(),
            Screen::RecipientBank { .. } => Step::RecipientBank.key(),
            Screen::RecipientContact { .. } => Step::RecipientContact.key(),
            Screen::SendPayment { .. } => Step::SendPayment.key(),
            Screen::Processing { .. } => Step::Processing.key(),
            Screen::Waitlist { .. } => "waitlist",
        }
    }
}

/// Everything a screen adapter needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<'a> {
    pub tab: Tab,
    pub step: Step,
    pub screen: Screen<'a>,
    pub errors: &'a FieldErrors,
    pub can_advance: bool,
    pub tabs_visible: bool,
}

#[derive(Debug)]
pub struct CheckoutSession {
    reference: ReferenceData,
    options: SessionOptions,
    flow: Flow,
    payment: PaymentDetails,
    bank: RecipientBankDetails,
    contact: RecipientContactDetails,
    errors: FieldErrors,
    /// Amount field last typed by the user; currency edits recompute from it.
    amount_driver: Field,
    lookup: AccountNameLookup,
    resolver: Option<Box<dyn AccountNameResolver>>,
    waitlisted: Vec<String>,
}

impl CheckoutSession {
    /// Starts on crypto-to-cash / payment-details with seeded records.
    pub fn new(reference: ReferenceData, options: SessionOptions) -> Self {
        let resolver = MockResolver::new(options.account_display_name.clone());
        let mut session = Self {
            reference,
            options,
            flow: Flow::Checkout(StepState::PaymentDetails),
            payment: PaymentDetails::default(),
            bank: RecipientBankDetails::default(),
            contact: RecipientContactDetails::default(),
            errors: FieldErrors::new(),
            amount_driver: Field::PayAmount,
            lookup: AccountNameLookup::new(),
            resolver: Some(Box::new(resolver)),
            waitlisted: Vec::new(),
        };
        session.reset_records();
        session
    }

    /// Replaces the account name resolver. With `None`, lookups stay pending
    /// until the host calls [`CheckoutSession::complete_account_lookup`].
    pub fn with_resolver(mut self, resolver: Option<Box<dyn AccountNameResolver>>) -> Self {
        self.resolver = resolver;
        self
    }

    // ----- inputs -----

    pub fn edit(&mut self, field: Field, raw: &str) -> Result<(), EditError> {
        if self.active_form() != Some(field.form()) {
            return Err(EditError::FieldNotOnScreen {
                field,
                screen: self.screen_name(),
            });
        }
        self.errors.remove(field);
        debug!(field = %field, "field edited");

        match field.form() {
            FormKind::PaymentDetails => {
                if let Some(slot) = self.payment.slot_mut(field) {
                    *slot = raw.to_string();
                }
                self.recompute_amounts(field);
            }
            FormKind::RecipientBank => {
                if let Some(slot) = self.bank.slot_mut(field) {
                    *slot = raw.to_string();
                }
                if field == Field::AccountNumber {
                    self.refresh_account_name();
                }
            }
            FormKind::RecipientContact => {
                if let Some(slot) = self.contact.slot_mut(field) {
                    *slot = raw.to_string();
                }
            }
            FormKind::Waitlist => {
                if let Flow::Placeholder(placeholder) = &mut self.flow {
                    placeholder.form.email = raw.to_string();
                }
            }
        }
        Ok(())
    }

    /// Like [`CheckoutSession::edit`], addressing the field by its key.
    pub fn edit_key(&mut self, key: &str, raw: &str) -> Result<(), EditError> {
        if is_account_name_key(key) {
            return Err(EditError::ReadOnlyField(key.trim().to_string()));
        }
        let field = key
            .parse::<Field>()
            .map_err(|err| EditError::UnknownField(err.input))?;
        self.edit(field, raw)
    }

    pub fn advance(&mut self) -> Result<Step, NavigationError> {
        let step = match &self.flow {
            Flow::Placeholder(_) => return Err(NavigationError::PlaceholderActive),
            Flow::Checkout(state) => state.step(),
        };
        let errors = match step {
            Step::PaymentDetails => self.payment.field_errors(),
            Step::RecipientBank => self.bank.field_errors(),
            Step::RecipientContact => self.contact.field_errors(),
            Step::SendPayment => FieldErrors::new(),
            Step::Processing => return Err(NavigationError::TerminalStep),
        };
        if !errors.is_empty() {
            warn!(step = %step, errors = %errors, "advance blocked");
            self.errors = errors.clone();
            return Err(NavigationError::Blocked(errors));
        }

        let next = match step {
            Step::PaymentDetails => StepState::RecipientBank,
            Step::RecipientBank => StepState::RecipientContact,
            Step::RecipientContact => StepState::SendPayment,
            _ => StepState::Processing(Box::new(self.build_record())),
        };
        Ok(self.enter(next))
    }

    pub fn retreat(&mut self) -> Result<Step, NavigationError> {
        let previous = match &self.flow {
            Flow::Placeholder(_) => return Err(NavigationError::PlaceholderActive),
            Flow::Checkout(StepState::Processing(_)) => return Err(NavigationError::TerminalStep),
            Flow::Checkout(StepState::PaymentDetails) => {
                return Err(NavigationError::AtFirstStep)
            }
            Flow::Checkout(StepState::RecipientBank) => StepState::PaymentDetails,
            Flow::Checkout(StepState::RecipientContact) => StepState::RecipientBank,
            Flow::Checkout(StepState::SendPayment) => StepState::RecipientContact,
        };
        Ok(self.enter(previous))
    }

    /// Always lands on payment-details or a fresh waitlist form; collected
    /// data is kept.
    pub fn switch_tab(&mut self, tab: Tab) -> Result<(), NavigationError> {
        if matches!(self.flow, Flow::Checkout(StepState::Processing(_))) {
            return Err(NavigationError::TerminalStep);
        }
        self.errors.clear();
        self.lookup.invalidate();
        self.sync_account_name();
        self.flow = if tab.is_placeholder() {
            Flow::Placeholder(PlaceholderFlow::new(tab))
        } else {
            Flow::Checkout(StepState::PaymentDetails)
        };
        info!(tab = %tab, "tab switched");
        Ok(())
    }

    pub fn restart(&mut self) {
        self.flow = Flow::Checkout(StepState::PaymentDetails);
        self.errors.clear();
        self.lookup.clear();
        self.waitlisted.clear();
        self.reset_records();
        info!("checkout restarted");
    }

    /// Records the waitlist email and returns it, trimmed.
    pub fn submit_waitlist(&mut self) -> Result<String, NavigationError> {
        let Flow::Placeholder(placeholder) = &mut self.flow else {
            return Err(NavigationError::NotOnPlaceholder);
        };
        let errors = placeholder.form.field_errors();
        if !errors.is_empty() {
            warn!(tab = %placeholder.tab, "waitlist signup rejected");
            self.errors = errors.clone();
            return Err(NavigationError::Blocked(errors));
        }
        let email = placeholder.form.email.trim().to_string();
        placeholder.form.email.clear();
        info!(tab = %placeholder.tab, "waitlist signup recorded");
        self.errors.clear();
        self.waitlisted.push(email.clone());
        Ok(email)
    }

    /// Applies the result of a host-driven account name lookup. Returns
    /// `false` when the ticket has been superseded or abandoned.
    pub fn complete_account_lookup(
        &mut self,
        ticket: &LookupTicket,
        result: Result<String, LookupError>,
    ) -> bool {
        let applied = self.lookup.complete(ticket, result);
        self.sync_account_name();
        applied
    }

    // ----- outputs -----

    pub fn tab(&self) -> Tab {
        match &self.flow {
            Flow::Checkout(_) => Tab::CryptoToCash,
            Flow::Placeholder(placeholder) => placeholder.tab,
        }
    }

    /// The checkout step. Placeholder tabs report payment-details, which is
    /// where switching back lands.
    pub fn step(&self) -> Step {
        match &self.flow {
            Flow::Checkout(state) => state.step(),
            Flow::Placeholder(_) => Step::PaymentDetails,
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        match &self.flow {
            Flow::Placeholder(placeholder) => Screen::Waitlist {
                tab: placeholder.tab,
                title: placeholder.title(),
                description: placeholder.description(),
                details: &placeholder.form,
            },
            Flow::Checkout(StepState::PaymentDetails) => Screen::PaymentDetails {
                details: &self.payment,
            },
            Flow::Checkout(StepState::RecipientBank) => Screen::RecipientBank {
                details: &self.bank,
                account_name: self.lookup.state(),
            },
            Flow::Checkout(StepState::RecipientContact) => Screen::RecipientContact {
                details: &self.contact,
            },
            Flow::Checkout(StepState::SendPayment) => Screen::SendPayment {
                instructions: self.send_instructions(),
            },
            Flow::Checkout(StepState::Processing(record)) => Screen::Processing {
                record: &**record,
            },
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validator verdict for the current data of the active screen.
    pub fn can_advance(&self) -> bool {
        match &self.flow {
            Flow::Placeholder(placeholder) => placeholder.form.is_valid(),
            Flow::Checkout(state) => match state.step() {
                Step::PaymentDetails => self.payment.is_valid(),
                Step::RecipientBank => self.bank.is_valid(),
                Step::RecipientContact => self.contact.is_valid(),
                Step::SendPayment => true,
                Step::Processing => false,
            },
        }
    }

    pub fn tabs_visible(&self) -> bool {
        match &self.flow {
            Flow::Placeholder(_) => true,
            Flow::Checkout(state) => state.step() == Step::PaymentDetails,
        }
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            tab: self.tab(),
            step: self.step(),
            screen: self.screen(),
            errors: &self.errors,
            can_advance: self.can_advance(),
            tabs_visible: self.tabs_visible(),
        }
    }

    pub fn send_instructions(&self) -> SendInstructions {
        SendInstructions::derive(&self.payment, &self.reference, &self.options.send_address)
    }

    pub fn transaction(&self) -> Option<&TransactionRecord> {
        match &self.flow {
            Flow::Checkout(StepState::Processing(record)) => Some(&**record),
            _ => None,
        }
    }

    /// Emails captured by waitlist signups since the last restart.
    pub fn waitlist(&self) -> &[String] {
        &self.waitlisted
    }

    pub fn placeholder(&self) -> Option<&PlaceholderFlow> {
        match &self.flow {
            Flow::Placeholder(placeholder) => Some(placeholder),
            Flow::Checkout(_) => None,
        }
    }

    pub fn payment(&self) -> &PaymentDetails {
        &self.payment
    }

    pub fn bank(&self) -> &RecipientBankDetails {
        &self.bank
    }

    pub fn contact(&self) -> &RecipientContactDetails {
        &self.contact
    }

    pub fn account_name_state(&self) -> &AccountNameState {
        self.lookup.state()
    }

    /// Ticket of a lookup still waiting for the host.
    pub fn pending_lookup(&self) -> Option<&LookupTicket> {
        self.lookup.outstanding()
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Current raw value of any field, wherever it lives.
    pub fn field_value(&self, field: Field) -> Option<&str> {
        match field.form() {
            FormKind::PaymentDetails => self.payment.value(field),
            FormKind::RecipientBank => self.bank.value(field),
            FormKind::RecipientContact => self.contact.value(field),
            FormKind::Waitlist => self
                .placeholder()
                .map(|placeholder| placeholder.form.email.as_str()),
        }
    }

    /// Form edited on the active screen, if it has one.
    pub fn active_form(&self) -> Option<FormKind> {
        match &self.flow {
            Flow::Placeholder(_) => Some(FormKind::Waitlist),
            Flow::Checkout(state) => state.step().form(),
        }
    }

    // ----- internals -----

    fn screen_name(&self) -> &'static str {
        match &self.flow {
            Flow::Placeholder(_) => "waitlist",
            Flow::Checkout(state) => state.step().key(),
        }
    }

    fn enter(&mut self, state: StepState) -> Step {
        let from = self.step();
        let to = state.step();
        self.errors.clear();
        self.lookup.invalidate();
        self.flow = Flow::Checkout(state);

        if to == Step::RecipientBank && *self.lookup.state() == AccountNameState::Absent {
            self.refresh_account_name();
        } else {
            self.sync_account_name();
        }
        info!(from = %from, to = %to, "step changed");
        to
    }

    fn reset_records(&mut self) {
        let defaults = &self.options.defaults;
        self.payment = PaymentDetails::seeded(defaults);
        self.bank = RecipientBankDetails::default();
        self.contact = RecipientContactDetails::seeded(defaults);
        self.amount_driver = Field::PayAmount;
        self.recompute_amounts(Field::PayAmount);
    }

    /// Writes the amount not being driven. Amount edits make the edited side
    /// the driver; currency edits recompute from the current driver.
    fn recompute_amounts(&mut self, edited: Field) {
        match edited {
            Field::PayAmount | Field::ReceiveAmount => self.amount_driver = edited,
            Field::PayCurrency | Field::ReceiveCurrency => {}
            _ => return,
        }
        let Some(rate) = self
            .options
            .rates
            .rate(&self.payment.pay_currency, &self.payment.receive_currency)
        else {
            debug!(
                pay = %self.payment.pay_currency,
                receive = %self.payment.receive_currency,
                "no conversion rate for pair"
            );
            return;
        };
        let derived = if self.amount_driver == Field::ReceiveAmount {
            self.payment.pay_amount =
                receive_to_pay(&self.payment.receive_amount, rate).into_field_value();
            Field::PayAmount
        } else {
            self.payment.receive_amount =
                pay_to_receive(&self.payment.pay_amount, rate).into_field_value();
            Field::ReceiveAmount
        };
        if !self.payment.field_errors().contains(derived) {
            self.errors.remove(derived);
        }
    }

    fn refresh_account_name(&mut self) {
        if self.bank.account_number.chars().count() < ACCOUNT_NUMBER_LENGTH {
            self.lookup.clear();
            self.bank.account_name = None;
            return;
        }
        let ticket = self.lookup.begin(&self.bank.account_number);
        if let Some(resolver) = &self.resolver {
            let result = resolver.resolve(&self.bank.bank, &ticket.account_number);
            self.lookup.complete(&ticket, result);
        }
        self.sync_account_name();
    }

    fn sync_account_name(&mut self) {
        self.bank.account_name = self.lookup.account_name().map(str::to_string);
    }

    fn build_record(&self) -> TransactionRecord {
        let instructions = self.send_instructions();
        TransactionRecord::derive(
            &self.options.transaction_id,
            &instructions,
            &self.payment,
            &self.bank,
            &self.contact,
            Utc::now(),
        )
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new(ReferenceData::builtin(), SessionOptions::default())
    }
}
