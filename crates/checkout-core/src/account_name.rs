//! Recipient account name derivation and lookup tracking.
//!
//! The name is never typed by the user. It appears once the account number
//! reaches [`ACCOUNT_NUMBER_LENGTH`] characters and is produced by an
//! [`AccountNameResolver`]. Results are applied through generation-stamped
//! tickets so a late answer for an outdated number cannot overwrite a newer one.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::LookupError;
use crate::validation::ACCOUNT_NUMBER_LENGTH;

/// Name returned by the built-in resolver.
pub const DEFAULT_ACCOUNT_DISPLAY_NAME: &str = "ODUTUGA GBEKE";

/// `Some(display_name)` once `account_number` has at least ten characters.
pub fn derive_account_name(account_number: &str, display_name: &str) -> Option<String> {
    (account_number.chars().count() >= ACCOUNT_NUMBER_LENGTH).then(|| display_name.to_string())
}

pub trait AccountNameResolver: fmt::Debug {
    fn resolve(&self, bank: &str, account_number: &str) -> Result<String, LookupError>;
}

/// Answers every sufficiently long number with a fixed display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResolver {
    pub display_name: String,
}

impl MockResolver {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT_DISPLAY_NAME)
    }
}

impl AccountNameResolver for MockResolver {
    fn resolve(&self, _bank: &str, account_number: &str) -> Result<String, LookupError> {
        derive_account_name(account_number, &self.display_name)
            .ok_or_else(|| LookupError::NotFound(account_number.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "name", rename_all = "kebab-case")]
pub enum AccountNameState {
    #[default]
    Absent,
    Pending,
    Resolved(String),
    Unavailable,
}

/// Handle for one outstanding lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: u64,
    pub account_number: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountNameLookup {
    generation: u64,
    outstanding: Option<LookupTicket>,
    state: AccountNameState,
}

impl AccountNameLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a lookup for `account_number`, superseding any earlier ticket.
    pub fn begin(&mut self, account_number: &str) -> LookupTicket {
        self.generation += 1;
        let ticket = LookupTicket {
            generation: self.generation,
            account_number: account_number.to_string(),
        };
        self.outstanding = Some(ticket.clone());
        self.state = AccountNameState::Pending;
        debug!(generation = self.generation, "account name lookup started");
        ticket
    }

    /// Applies a lookup result. Returns `false` when the ticket is stale.
    pub fn complete(&mut self, ticket: &LookupTicket, result: Result<String, LookupError>) -> bool {
        if self.outstanding.as_ref() != Some(ticket) {
            warn!(
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale account name lookup"
            );
            return false;
        }
        self.outstanding = None;
        self.state = match result {
            Ok(name) => AccountNameState::Resolved(name),
            Err(err) => {
                warn!(error = %err, "account name lookup failed");
                AccountNameState::Unavailable
            }
        };
        true
    }

    /// Abandons the outstanding request, if any.
    pub fn invalidate(&mut self) {
        if self.outstanding.take().is_some() {
            debug!(generation = self.generation, "account name lookup abandoned");
            self.state = AccountNameState::Absent;
        }
    }

    /// Forgets any result and abandons the outstanding request.
    pub fn clear(&mut self) {
        self.outstanding = None;
        self.state = AccountNameState::Absent;
    }

    pub fn state(&self) -> &AccountNameState {
        &self.state
    }

    pub fn account_name(&self) -> Option<&str> {
        match &self.state {
            AccountNameState::Resolved(name) => Some(name),
            _ => None,
        }
    }

    pub fn pending(&self) -> bool {
        self.outstanding.is_some()
    }

    /// The ticket an asynchronous host still has to complete.
    pub fn outstanding(&self) -> Option<&LookupTicket> {
        self.outstanding.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_needs_ten_characters() {
        assert_eq!(derive_account_name("012345678", "NAME"), None);
        assert_eq!(
            derive_account_name("0123456789", "NAME"),
            Some("NAME".to_string())
        );
        assert_eq!(
            derive_account_name("01234567890", "NAME"),
            Some("NAME".to_string())
        );
    }

    #[test]
    fn mock_resolver_reports_short_numbers_as_not_found() {
        let resolver = MockResolver::default();
        assert_eq!(
            resolver.resolve("gtb", "0123456789"),
            Ok(DEFAULT_ACCOUNT_DISPLAY_NAME.to_string())
        );
        assert_eq!(
            resolver.resolve("gtb", "123"),
            Err(LookupError::NotFound("123".into()))
        );
    }

    #[test]
    fn latest_ticket_wins() {
        let mut lookup = AccountNameLookup::new();
        let first = lookup.begin("0123456789");
        let second = lookup.begin("9876543210");

        assert!(!lookup.complete(&first, Ok("OLD".into())));
        assert_eq!(lookup.state(), &AccountNameState::Pending);

        assert!(lookup.complete(&second, Ok("NEW".into())));
        assert_eq!(lookup.account_name(), Some("NEW"));
        assert!(!lookup.pending());
    }

    #[test]
    fn failures_become_unavailable() {
        let mut lookup = AccountNameLookup::new();
        let ticket = lookup.begin("0123456789");
        lookup.complete(&ticket, Err(LookupError::Unavailable("offline".into())));
        assert_eq!(lookup.state(), &AccountNameState::Unavailable);
        assert_eq!(lookup.account_name(), None);
    }

    #[test]
    fn invalidated_tickets_are_ignored() {
        let mut lookup = AccountNameLookup::new();
        let ticket = lookup.begin("0123456789");
        lookup.invalidate();
        assert_eq!(lookup.state(), &AccountNameState::Absent);
        assert!(!lookup.complete(&ticket, Ok("LATE".into())));
        assert_eq!(lookup.state(), &AccountNameState::Absent);
    }

    #[test]
    fn invalidate_keeps_a_resolved_name() {
        let mut lookup = AccountNameLookup::new();
        let ticket = lookup.begin("0123456789");
        lookup.complete(&ticket, Ok("KEPT".into()));
        lookup.invalidate();
        assert_eq!(lookup.account_name(), Some("KEPT"));
    }

    #[test]
    fn state_serializes_with_a_tag() {
        let json = serde_json::to_value(AccountNameState::Resolved("A".into())).unwrap();
        assert_eq!(json, serde_json::json!({"state": "resolved", "name": "A"}));
        let json = serde_json::to_value(AccountNameState::Absent).unwrap();
        assert_eq!(json, serde_json::json!({"state": "absent"}));
    }
}
