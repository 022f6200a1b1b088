use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::services::{FixedImpactPolicy, ImpactPolicy};
use crate::currency::{round_cents, CENT_TOLERANCE};
use crate::domain::{
    seed::{initial_transactions, seed_user},
    DraftTransfer, Transaction, User,
};
use crate::errors::LedgerError;

/// Authoritative balance and transaction history for one session.
///
/// `apply_transfer` is the only way balances change. It either performs
/// every effect of a transfer or none of them.
pub struct LedgerStore {
    user: Option<User>,
    transactions: Vec<Transaction>,
    applied: HashMap<Uuid, Transaction>,
    policy: Box<dyn ImpactPolicy>,
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new(Box::new(FixedImpactPolicy::default()))
    }
}

impl LedgerStore {
    pub fn new(policy: Box<dyn ImpactPolicy>) -> Self {
        Self {
            user: None,
            transactions: initial_transactions(Utc::now()),
            applied: HashMap::new(),
            policy,
        }
    }

    /// Starts a session with the seeded user. Any previous user is replaced
    /// wholesale.
    pub fn authenticate(&mut self) -> User {
        let user = seed_user();
        info!(user = %user.id, "session authenticated");
        self.user = Some(user.clone());
        user
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Transactions, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Transaction previously produced for `request_id`, if any.
    pub fn applied(&self, request_id: Uuid) -> Option<&Transaction> {
        self.applied.get(&request_id)
    }

    /// Records a completed transfer.
    ///
    /// Re-applying a request id that already succeeded returns the original
    /// record and leaves the ledger untouched.
    pub fn apply_transfer(&mut self, draft: &DraftTransfer) -> Result<Transaction, LedgerError> {
        if let Some(existing) = self.applied.get(&draft.request_id) {
            debug!(request = %draft.request_id, "transfer already applied; returning stored record");
            return Ok(existing.clone());
        }
        draft
            .check()
            .map_err(|rejection| LedgerError::InvalidDraft(rejection.message().into()))?;

        let user = self.user.as_mut().ok_or(LedgerError::NotAuthenticated)?;
        if draft.amount - user.balance_usdc > CENT_TOLERANCE {
            warn!(
                request = %draft.request_id,
                requested = draft.amount,
                available = user.balance_usdc,
                "transfer rejected: insufficient balance"
            );
            return Err(LedgerError::InsufficientFunds {
                requested: draft.amount,
                available: user.balance_usdc,
            });
        }

        let now = Utc::now();
        let impact = self.policy.attribute(draft, now);
        let transaction = Transaction::new(
            draft.recipient.clone(),
            draft.amount,
            draft.currency,
            now,
            impact,
        )
        .with_request_id(draft.request_id);

        user.balance_usdc = round_cents(user.balance_usdc - draft.amount);
        user.trees_planted += 1;
        self.transactions.insert(0, transaction.clone());
        self.applied.insert(draft.request_id, transaction.clone());

        info!(
            tx = %transaction.id,
            amount = transaction.amount,
            currency = %transaction.currency,
            balance = user.balance_usdc,
            trees = user.trees_planted,
            "transfer applied"
        );
        Ok(transaction)
    }

    pub fn set_black_falcon_mode(&mut self, enabled: bool) -> Result<(), LedgerError> {
        let user = self.user.as_mut().ok_or(LedgerError::NotAuthenticated)?;
        user.is_black_falcon_mode = enabled;
        Ok(())
    }

    /// Ends the session: no user, seed history, no remembered requests.
    pub fn reset_session(&mut self) {
        self.user = None;
        self.transactions = initial_transactions(Utc::now());
        self.applied.clear();
        info!("session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;

    fn authenticated() -> LedgerStore {
        let mut store = LedgerStore::default();
        store.authenticate();
        store
    }

    #[test]
    fn transfer_requires_authentication() {
        let mut store = LedgerStore::default();
        let draft = DraftTransfer::new(5.0, "@x", Currency::Usdc);
        assert_eq!(
            store.apply_transfer(&draft),
            Err(LedgerError::NotAuthenticated)
        );
        assert_eq!(store.transaction_count(), 2);
    }

    #[test]
    fn invalid_draft_leaves_ledger_untouched() {
        let mut store = authenticated();
        let draft = DraftTransfer::new(0.0, "@x", Currency::Usdc);
        let err = store.apply_transfer(&draft).expect_err("zero amount");
        assert!(matches!(err, LedgerError::InvalidDraft(_)));
        assert_eq!(store.user().unwrap().balance_usdc, 450.0);
        assert_eq!(store.transaction_count(), 2);
    }

    #[test]
    fn overdraft_is_rejected_without_mutation() {
        let mut store = authenticated();
        let draft = DraftTransfer::new(450.01, "@x", Currency::Usdc);
        let err = store.apply_transfer(&draft).expect_err("overdraft");
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
        let user = store.user().unwrap();
        assert_eq!(user.balance_usdc, 450.0);
        assert_eq!(user.trees_planted, 12);
        assert!(store.applied(draft.request_id).is_none());
    }

    #[test]
    fn full_balance_can_be_sent() {
        let mut store = authenticated();
        let draft = DraftTransfer::new(450.0, "@x", Currency::CUsd);
        store.apply_transfer(&draft).unwrap();
        assert_eq!(store.user().unwrap().balance_usdc, 0.0);
    }

    #[test]
    fn black_falcon_mode_needs_a_user() {
        let mut store = LedgerStore::default();
        assert!(store.set_black_falcon_mode(true).is_err());
        store.authenticate();
        store.set_black_falcon_mode(true).unwrap();
        assert!(store.user().unwrap().is_black_falcon_mode);
    }
}
