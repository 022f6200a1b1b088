mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::offline_session;
use heru_core::{
    config::LatencyConfig,
    core::{NavTarget, Session, ViewState},
    domain::Currency,
    errors::{LedgerError, NarrativeError, SessionError, TransitionError},
    ledger::{shared, LedgerStore},
    narrative::{NarrativeCollaborator, NarrativeKind, Narrator, FOREST_PLACEHOLDER},
};
use tokio::runtime::Handle;
use tokio::time::{sleep, Instant};

struct SlowOracle(Duration);

#[async_trait]
impl NarrativeCollaborator for SlowOracle {
    async fn generate(&self, _prompt: &str) -> Result<String, NarrativeError> {
        sleep(self.0).await;
        Ok("The baobab remembers.".into())
    }
}

fn slow_session(delay: Duration) -> Session {
    let narrator = Narrator::new(Some(Arc::new(SlowOracle(delay))), Duration::from_secs(10));
    Session::new(
        shared(LedgerStore::default()),
        narrator,
        LatencyConfig::instant(),
        Handle::current(),
    )
}

async fn at_confirm(session: &mut Session, amount: &str, recipient: &str) {
    session.authenticate().await.unwrap();
    session.open_send().unwrap();
    session.set_amount(amount).unwrap();
    session.set_recipient(recipient).unwrap();
    session.submit_draft().unwrap();
}

#[tokio::test(start_paused = true)]
async fn authentication_waits_and_reports_busy() {
    let (mut session, _ledger) = offline_session(LatencyConfig::default());
    let activity = session.activity();
    let started = Instant::now();

    let mut auth = Box::pin(session.authenticate());
    let busy_midway = tokio::select! {
        biased;
        _ = &mut auth => None,
        _ = sleep(Duration::from_millis(100)) => Some(activity.is_busy()),
    };
    assert_eq!(busy_midway, Some(true));

    let user = auth.await.unwrap();
    assert_eq!(user.username, "heru_builder");
    assert!(started.elapsed() >= Duration::from_millis(1_500));
    assert!(!activity.is_busy());
    assert_eq!(session.view(), ViewState::Home);
}

#[tokio::test(start_paused = true)]
async fn abandoned_operation_clears_busy_flag() {
    let (mut session, _ledger) = offline_session(LatencyConfig::default());
    let activity = session.activity();
    {
        let mut auth = Box::pin(session.authenticate());
        tokio::select! {
            biased;
            _ = &mut auth => {}
            _ = sleep(Duration::from_millis(10)) => {}
        }
        assert!(activity.is_busy());
    }
    assert!(!activity.is_busy());
    assert_eq!(session.view(), ViewState::Onboarding);
}

#[tokio::test(start_paused = true)]
async fn signing_takes_the_configured_latency() {
    let (mut session, ledger) = offline_session(LatencyConfig {
        auth_ms: 0,
        sign_ms: 2_000,
    });
    at_confirm(&mut session, "50", "@kwame_tech").await;
    let started = Instant::now();

    let tx = session.confirm().await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(2_000));
    assert_eq!(session.view(), ViewState::Success);
    assert_eq!(session.last_success(), Some(&tx));
    let store = ledger.lock().await;
    assert_eq!(store.user().unwrap().balance_usdc, 400.0);
    assert_eq!(store.user().unwrap().trees_planted, 13);
}

#[tokio::test]
async fn full_flow_returns_home_with_a_clean_form() {
    let (mut session, _ledger) = offline_session(LatencyConfig::instant());
    at_confirm(&mut session, "12.5", "+234 801 234 5678").await;
    session.confirm().await.unwrap();
    assert_eq!(session.acknowledge().unwrap(), ViewState::Home);
    assert!(session.form().amount.is_empty());
    assert!(session.pending().is_none());

    let summary = session.home_summary().await;
    assert_eq!(summary.recent.len(), 3);
    assert_eq!(summary.recent[0].recipient, "+234 801 234 5678");
}

#[tokio::test]
async fn overdraft_returns_to_confirm_with_error() {
    let (mut session, ledger) = offline_session(LatencyConfig::instant());
    at_confirm(&mut session, "900", "@ama").await;

    let err = session.confirm().await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Ledger(LedgerError::InsufficientFunds { .. })
    ));
    assert_eq!(session.view(), ViewState::Confirm);
    assert!(session.last_error().is_some());
    assert!(session.pending().is_some());
    assert_eq!(ledger.lock().await.user().unwrap().balance_usdc, 450.0);
}

#[tokio::test]
async fn invalid_drafts_cannot_be_reviewed() {
    let (mut session, _ledger) = offline_session(LatencyConfig::instant());
    session.authenticate().await.unwrap();
    session.open_send().unwrap();
    session.set_amount("-3").unwrap();
    session.set_recipient("@ama").unwrap();

    let err = session.submit_draft().unwrap_err();

    assert!(matches!(err, SessionError::Transition(TransitionError::Guard(_))));
    assert_eq!(session.view(), ViewState::Send);
}

#[tokio::test]
async fn currency_choice_reaches_the_ledger() {
    let (mut session, _ledger) = offline_session(LatencyConfig::instant());
    session.authenticate().await.unwrap();
    session.open_send().unwrap();
    session.set_currency(Currency::CUsd).unwrap();
    session.set_amount("5").unwrap();
    session.set_recipient("@ama").unwrap();
    session.submit_draft().unwrap();
    let tx = session.confirm().await.unwrap();
    assert_eq!(tx.currency, Currency::CUsd);
}

#[tokio::test]
async fn impact_note_arrives_after_polling() {
    let (mut session, _ledger) = offline_session(LatencyConfig::instant());
    at_confirm(&mut session, "10", "@ama").await;
    session.confirm().await.unwrap();
    assert!(session.impact_note().is_none());

    sleep(Duration::from_millis(10)).await;
    let updates = session.poll_updates();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].kind, NarrativeKind::Impact);
    assert_eq!(session.impact_note(), Some("Impact data syncing..."));
}

#[tokio::test(start_paused = true)]
async fn forest_story_replaces_placeholder_when_ready() {
    let mut session = slow_session(Duration::from_millis(500));
    session.authenticate().await.unwrap();
    session.navigate(NavTarget::Forest).await.unwrap();
    assert_eq!(session.forest_story(), FOREST_PLACEHOLDER);

    sleep(Duration::from_secs(1)).await;
    session.poll_updates();

    assert_eq!(session.forest_story(), "The baobab remembers.");
}

#[tokio::test(start_paused = true)]
async fn results_after_disconnect_are_discarded() {
    let mut session = slow_session(Duration::from_secs(5));
    session.authenticate().await.unwrap();
    session.navigate(NavTarget::Forest).await.unwrap();
    session.navigate(NavTarget::Settings).await.unwrap();
    session.disconnect().await.unwrap();

    sleep(Duration::from_secs(6)).await;

    assert!(session.poll_updates().is_empty());
    assert_eq!(session.forest_story(), FOREST_PLACEHOLDER);
    assert_eq!(session.view(), ViewState::Onboarding);
    assert!(session.user().await.is_none());
}

#[tokio::test]
async fn lateral_navigation_is_blocked_mid_flow() {
    let (mut session, _ledger) = offline_session(LatencyConfig::instant());
    at_confirm(&mut session, "10", "@ama").await;
    let err = session.navigate(NavTarget::Map).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Transition(TransitionError::NotAllowed { .. })
    ));
    assert_eq!(session.view(), ViewState::Confirm);
}

#[tokio::test]
async fn black_falcon_toggles_and_resets_on_disconnect() {
    let (mut session, _ledger) = offline_session(LatencyConfig::instant());
    session.authenticate().await.unwrap();
    assert!(session.toggle_black_falcon().await.unwrap());
    assert!(session.user().await.unwrap().is_black_falcon_mode);

    session.navigate(NavTarget::Settings).await.unwrap();
    session.disconnect().await.unwrap();
    session.authenticate().await.unwrap();
    assert!(!session.user().await.unwrap().is_black_falcon_mode);
}
