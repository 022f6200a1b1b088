//! Session orchestration: the view state machine plus the side effects each
//! transition triggers.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::config::LatencyConfig;
use crate::core::services::{ForestSummary, HomeSummary, SummaryService};
use crate::core::view::{transition, GuardContext, NavTarget, ViewEvent, ViewState};
use crate::domain::{Currency, DraftForm, DraftTransfer, Transaction, User};
use crate::errors::{SessionError, SessionResult, TransitionError};
use crate::ledger::SharedLedger;
use crate::narrative::{
    EnrichmentScope, NarrativeKind, NarrativeUpdate, Narrator, FOREST_PLACEHOLDER,
};

/// Read-only view of whether a simulated operation is running.
#[derive(Debug, Clone)]
pub struct Activity(Arc<AtomicBool>);

impl Activity {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Marks the session busy until dropped, including when the owning
/// future is dropped mid-operation.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn begin(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Session {
    view: ViewState,
    ledger: SharedLedger,
    form: DraftForm,
    pending: Option<DraftTransfer>,
    busy: Arc<AtomicBool>,
    last_error: Option<String>,
    last_success: Option<Transaction>,
    impact_note: Option<String>,
    forest_story: Option<String>,
    narrator: Narrator,
    enrichment: EnrichmentScope,
    latency: LatencyConfig,
}

impl Session {
    pub fn new(
        ledger: SharedLedger,
        narrator: Narrator,
        latency: LatencyConfig,
        handle: Handle,
    ) -> Self {
        Self {
            view: ViewState::Onboarding,
            ledger,
            form: DraftForm::default(),
            pending: None,
            busy: Arc::new(AtomicBool::new(false)),
            last_error: None,
            last_success: None,
            impact_note: None,
            forest_story: None,
            narrator,
            enrichment: EnrichmentScope::new(handle),
            latency,
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn form(&self) -> &DraftForm {
        &self.form
    }

    /// Validated draft awaiting signature.
    pub fn pending(&self) -> Option<&DraftTransfer> {
        self.pending.as_ref()
    }

    /// Error shown on the confirm screen after a failed signature.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success(&self) -> Option<&Transaction> {
        self.last_success.as_ref()
    }

    pub fn impact_note(&self) -> Option<&str> {
        self.impact_note.as_deref()
    }

    pub fn forest_story(&self) -> &str {
        self.forest_story.as_deref().unwrap_or(FOREST_PLACEHOLDER)
    }

    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    pub fn ledger(&self) -> SharedLedger {
        Arc::clone(&self.ledger)
    }

    pub fn activity(&self) -> Activity {
        Activity(Arc::clone(&self.busy))
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Whether the send screen's review affordance is enabled.
    pub fn can_submit(&self) -> bool {
        self.view == ViewState::Send && !self.is_busy() && self.form.is_complete()
    }

    fn guard(&self) -> GuardContext {
        GuardContext {
            in_flight: self.is_busy(),
            draft_problem: self
                .form
                .validate()
                .err()
                .map(|rejection| rejection.message().to_string()),
            draft_signed: false,
        }
    }

    fn fire(&mut self, event: ViewEvent, guard: &GuardContext) -> SessionResult<ViewState> {
        match transition(self.view, event, guard) {
            Ok(next) => {
                debug!(from = %self.view, to = %next, %event, "view transition");
                self.view = next;
                Ok(next)
            }
            Err(err) => {
                debug!(from = %self.view, %event, "transition refused: {err}");
                Err(err.into())
            }
        }
    }

    /// Checks that `event` would be accepted right now without firing it.
    fn precheck(&self, event: ViewEvent) -> SessionResult<()> {
        transition(self.view, event, &self.guard())
            .map(|_| ())
            .map_err(SessionError::from)
    }

    pub async fn authenticate(&mut self) -> SessionResult<User> {
        self.precheck(ViewEvent::Authenticated)?;
        let user = {
            let _busy = InFlight::begin(&self.busy);
            tokio::time::sleep(self.latency.auth()).await;
            self.ledger.lock().await.authenticate()
        };
        self.fire(ViewEvent::Authenticated, &self.guard())?;
        Ok(user)
    }

    pub fn open_send(&mut self) -> SessionResult<ViewState> {
        let next = self.fire(ViewEvent::OpenSend, &self.guard())?;
        self.last_error = None;
        Ok(next)
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) -> SessionResult<()> {
        self.ensure_editing()?;
        self.form.amount = amount.into();
        Ok(())
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) -> SessionResult<()> {
        self.ensure_editing()?;
        self.form.recipient = recipient.into();
        Ok(())
    }

    pub fn set_currency(&mut self, currency: Currency) -> SessionResult<()> {
        self.ensure_editing()?;
        self.form.currency = currency;
        Ok(())
    }

    fn ensure_editing(&self) -> SessionResult<()> {
        if self.view != ViewState::Send {
            return Err(TransitionError::Guard(
                "the draft can only be edited on the send screen".into(),
            )
            .into());
        }
        Ok(())
    }

    /// Moves a valid draft to the confirm screen.
    pub fn submit_draft(&mut self) -> SessionResult<&DraftTransfer> {
        let guard = self.guard();
        self.fire(ViewEvent::SubmitDraft, &guard)?;
        let draft = self
            .form
            .validate()
            .map_err(|rejection| TransitionError::Guard(rejection.message().into()))?;
        info!(request = %draft.request_id, amount = draft.amount, "draft submitted for review");
        self.last_error = None;
        Ok(self.pending.insert(draft))
    }

    /// Signs the pending draft. On failure the session stays on the confirm
    /// screen with the error recorded and the ledger unchanged.
    pub async fn confirm(&mut self) -> SessionResult<Transaction> {
        let draft = self.pending.clone().ok_or_else(|| {
            SessionError::from(TransitionError::NotAllowed {
                from: self.view,
                event: ViewEvent::Signed,
            })
        })?;
        let mut guard = self.guard();
        guard.draft_signed = self.ledger.lock().await.applied(draft.request_id).is_some();
        transition(self.view, ViewEvent::Signed, &guard)?;

        let outcome = {
            let _busy = InFlight::begin(&self.busy);
            tokio::time::sleep(self.latency.sign()).await;
            self.ledger.lock().await.apply_transfer(&draft)
        };

        match outcome {
            Ok(transaction) => {
                self.fire(ViewEvent::Signed, &self.guard())?;
                self.pending = None;
                self.form = DraftForm::default();
                self.last_error = None;
                self.impact_note = None;
                self.last_success = Some(transaction.clone());
                self.enrichment
                    .spawn_impact(&self.narrator, transaction.clone());
                Ok(transaction)
            }
            Err(err) => {
                warn!(request = %draft.request_id, "signature failed: {err}");
                self.fire(ViewEvent::SignFailed, &self.guard())?;
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    pub fn acknowledge(&mut self) -> SessionResult<ViewState> {
        self.fire(ViewEvent::Acknowledge, &self.guard())
    }

    /// Leaves the send flow and discards the draft.
    pub fn cancel(&mut self) -> SessionResult<ViewState> {
        let next = self.fire(ViewEvent::Cancel, &self.guard())?;
        self.pending = None;
        self.form = DraftForm::default();
        self.last_error = None;
        Ok(next)
    }

    pub async fn navigate(&mut self, target: NavTarget) -> SessionResult<ViewState> {
        let next = self.fire(ViewEvent::Navigate(target), &self.guard())?;
        if next == ViewState::Forest {
            let transactions = self.ledger.lock().await.transactions().to_vec();
            self.forest_story = None;
            self.enrichment
                .spawn_forest_summary(&self.narrator, transactions);
        }
        Ok(next)
    }

    /// Ends the session and returns to onboarding. Background results that
    /// arrive afterwards are discarded.
    pub async fn disconnect(&mut self) -> SessionResult<ViewState> {
        let next = self.fire(ViewEvent::Disconnect, &self.guard())?;
        self.enrichment.reset();
        self.ledger.lock().await.reset_session();
        self.form = DraftForm::default();
        self.pending = None;
        self.last_error = None;
        self.last_success = None;
        self.impact_note = None;
        self.forest_story = None;
        info!("session disconnected");
        Ok(next)
    }

    pub async fn toggle_black_falcon(&mut self) -> SessionResult<bool> {
        let mut ledger = self.ledger.lock().await;
        let enabled = !ledger
            .user()
            .map(|user| user.is_black_falcon_mode)
            .unwrap_or_default();
        ledger.set_black_falcon_mode(enabled)?;
        Ok(enabled)
    }

    /// Applies finished narrative results and returns them.
    pub fn poll_updates(&mut self) -> Vec<NarrativeUpdate> {
        let updates = self.enrichment.drain();
        for update in &updates {
            match update.kind {
                NarrativeKind::ForestSummary => self.forest_story = Some(update.text.clone()),
                NarrativeKind::Impact => {
                    let matches_success = self.last_success.as_ref().map(|tx| tx.id.as_str())
                        == update.transaction_id.as_deref();
                    if matches_success {
                        self.impact_note = Some(update.text.clone());
                    }
                }
            }
        }
        updates
    }

    pub async fn user(&self) -> Option<User> {
        self.ledger.lock().await.user().cloned()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.ledger.lock().await.transactions().to_vec()
    }

    pub async fn home_summary(&self) -> HomeSummary {
        let ledger = self.ledger.lock().await;
        SummaryService::home(ledger.user(), ledger.transactions())
    }

    pub async fn forest_summary(&self) -> ForestSummary {
        let ledger = self.ledger.lock().await;
        SummaryService::forest(ledger.user(), ledger.transactions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{shared, LedgerStore};

    fn session() -> Session {
        Session::new(
            shared(LedgerStore::default()),
            Narrator::offline(),
            LatencyConfig::instant(),
            Handle::current(),
        )
    }

    #[tokio::test]
    async fn drafts_cannot_be_edited_off_the_send_screen() {
        let mut session = session();
        assert!(session.set_amount("5").is_err());
        session.authenticate().await.unwrap();
        session.open_send().unwrap();
        session.set_amount("5").unwrap();
        assert_eq!(session.form().amount, "5");
    }

    #[tokio::test]
    async fn confirm_without_pending_draft_is_refused() {
        let mut session = session();
        session.authenticate().await.unwrap();
        let err = session.confirm().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transition(TransitionError::NotAllowed { .. })
        ));
    }

    #[tokio::test]
    async fn can_submit_tracks_form_validity() {
        let mut session = session();
        session.authenticate().await.unwrap();
        session.open_send().unwrap();
        assert!(!session.can_submit());
        session.set_amount("12.5").unwrap();
        session.set_recipient("@ama").unwrap();
        assert!(session.can_submit());
    }

    #[tokio::test]
    async fn cancel_discards_the_draft() {
        let mut session = session();
        session.authenticate().await.unwrap();
        session.open_send().unwrap();
        session.set_amount("10").unwrap();
        session.set_recipient("@ama").unwrap();
        session.submit_draft().unwrap();
        assert_eq!(session.cancel().unwrap(), ViewState::Home);
        assert!(session.pending().is_none());
        assert_eq!(session.form(), &DraftForm::default());
    }

    #[tokio::test]
    async fn forest_story_starts_as_placeholder() {
        let mut session = session();
        session.authenticate().await.unwrap();
        session.navigate(NavTarget::Forest).await.unwrap();
        assert_eq!(session.forest_story(), FOREST_PLACEHOLDER);
    }
}
