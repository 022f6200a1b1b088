//! Transfer drafts: the editable form and the validated request built from it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::transaction::Currency;

/// Raw user input on the send screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub amount: String,
    pub recipient: String,
    pub currency: Currency,
}

impl DraftForm {
    /// Parsed amount when it is a positive finite number.
    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value > 0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.parsed_amount().is_some() && !self.recipient.trim().is_empty()
    }

    /// Builds a transfer request with a fresh request id, or explains why
    /// the form cannot be submitted yet.
    pub fn validate(&self) -> Result<DraftTransfer, DraftRejection> {
        let amount = self.parsed_amount().ok_or(DraftRejection::Amount)?;
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(DraftRejection::Recipient);
        }
        Ok(DraftTransfer {
            request_id: Uuid::new_v4(),
            amount,
            recipient: recipient.to_string(),
            currency: self.currency,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftRejection {
    Amount,
    Recipient,
}

impl DraftRejection {
    pub fn message(&self) -> &'static str {
        match self {
            DraftRejection::Amount => "amount must be a positive number",
            DraftRejection::Recipient => "recipient must not be empty",
        }
    }
}

/// Validated, not-yet-committed transfer. The request id is the
/// idempotency key used by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DraftTransfer {
    pub request_id: Uuid,
    pub amount: f64,
    pub recipient: String,
    pub currency: Currency,
}

impl DraftTransfer {
    pub fn new(amount: f64, recipient: impl Into<String>, currency: Currency) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            amount,
            recipient: recipient.into(),
            currency,
        }
    }

    /// Re-checks the preconditions a mutation relies on.
    pub fn check(&self) -> Result<(), DraftRejection> {
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(DraftRejection::Amount);
        }
        if self.recipient.trim().is_empty() {
            return Err(DraftRejection::Recipient);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: &str, recipient: &str) -> DraftForm {
        DraftForm {
            amount: amount.into(),
            recipient: recipient.into(),
            currency: Currency::Usdc,
        }
    }

    #[test]
    fn zero_amount_is_rejected() {
        assert_eq!(form("0", "@x").validate(), Err(DraftRejection::Amount));
    }

    #[test]
    fn non_numeric_and_non_finite_amounts_are_rejected() {
        assert_eq!(form("abc", "@x").validate(), Err(DraftRejection::Amount));
        assert_eq!(form("inf", "@x").validate(), Err(DraftRejection::Amount));
        assert_eq!(form("-5", "@x").validate(), Err(DraftRejection::Amount));
    }

    #[test]
    fn blank_recipient_is_rejected() {
        assert_eq!(form("10", "   ").validate(), Err(DraftRejection::Recipient));
    }

    #[test]
    fn valid_form_trims_recipient() {
        let draft = form(" 50.00 ", "  @kwame_tech ").validate().unwrap();
        assert_eq!(draft.amount, 50.0);
        assert_eq!(draft.recipient, "@kwame_tech");
        assert!(!draft.request_id.is_nil());
    }

    #[test]
    fn each_validation_gets_a_fresh_request_id() {
        let input = form("1", "@x");
        let first = input.validate().unwrap();
        let second = input.validate().unwrap();
        assert_ne!(first.request_id, second.request_id);
    }
}
