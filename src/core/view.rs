//! Screens and the legal moves between them.
//!
//! The table here is pure: it takes the current screen, an event and the
//! facts the guards need, and answers with the next screen or the reason
//! the move is refused. Side effects live in [`Session`](super::session::Session).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::TransitionError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ViewState {
    #[default]
    Onboarding,
    Home,
    Send,
    Confirm,
    Success,
    Forest,
    Map,
    Settings,
}

impl ViewState {
    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Onboarding => "onboarding",
            ViewState::Home => "home",
            ViewState::Send => "send",
            ViewState::Confirm => "confirm",
            ViewState::Success => "success",
            ViewState::Forest => "forest",
            ViewState::Map => "map",
            ViewState::Settings => "settings",
        }
    }

    /// Screens reachable from the navigation bar.
    pub fn is_lateral(&self) -> bool {
        matches!(
            self,
            ViewState::Home | ViewState::Forest | ViewState::Map | ViewState::Settings
        )
    }
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Navigation bar destinations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NavTarget {
    Home,
    Forest,
    Map,
    Settings,
}

impl NavTarget {
    pub fn view(&self) -> ViewState {
        match self {
            NavTarget::Home => ViewState::Home,
            NavTarget::Forest => ViewState::Forest,
            NavTarget::Map => ViewState::Map,
            NavTarget::Settings => ViewState::Settings,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Some(NavTarget::Home),
            "forest" => Some(NavTarget::Forest),
            "map" => Some(NavTarget::Map),
            "settings" | "me" => Some(NavTarget::Settings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ViewEvent {
    Authenticated,
    OpenSend,
    SubmitDraft,
    Signed,
    SignFailed,
    Acknowledge,
    Navigate(NavTarget),
    Disconnect,
    Cancel,
}

impl fmt::Display for ViewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewEvent::Authenticated => f.write_str("authenticate"),
            ViewEvent::OpenSend => f.write_str("send"),
            ViewEvent::SubmitDraft => f.write_str("review"),
            ViewEvent::Signed => f.write_str("sign"),
            ViewEvent::SignFailed => f.write_str("sign (failed)"),
            ViewEvent::Acknowledge => f.write_str("done"),
            ViewEvent::Navigate(target) => write!(f, "go {}", target.view()),
            ViewEvent::Disconnect => f.write_str("disconnect"),
            ViewEvent::Cancel => f.write_str("cancel"),
        }
    }
}

/// Facts the guards consult.
#[derive(Debug, Clone, Default)]
pub struct GuardContext {
    /// An authentication or signing operation has not finished yet.
    pub in_flight: bool,
    /// Why the current draft cannot be submitted, if it cannot.
    pub draft_problem: Option<String>,
    /// The pending draft has already been committed to the ledger.
    pub draft_signed: bool,
}

/// Computes the screen `event` leads to from `from`.
pub fn transition(
    from: ViewState,
    event: ViewEvent,
    guard: &GuardContext,
) -> Result<ViewState, TransitionError> {
    if guard.in_flight {
        return Err(TransitionError::Busy);
    }
    let not_allowed = || TransitionError::NotAllowed { from, event };

    match (from, event) {
        (ViewState::Onboarding, ViewEvent::Authenticated) => Ok(ViewState::Home),
        (state, ViewEvent::OpenSend) if state.is_lateral() => Ok(ViewState::Send),
        (ViewState::Send, ViewEvent::SubmitDraft) => match &guard.draft_problem {
            Some(problem) => Err(TransitionError::Guard(problem.clone())),
            None => Ok(ViewState::Confirm),
        },
        (ViewState::Confirm, ViewEvent::Signed) => {
            if guard.draft_signed {
                Err(TransitionError::Guard(
                    "this transfer has already been signed".into(),
                ))
            } else {
                Ok(ViewState::Success)
            }
        }
        (ViewState::Confirm, ViewEvent::SignFailed) => Ok(ViewState::Confirm),
        (ViewState::Success, ViewEvent::Acknowledge) => Ok(ViewState::Home),
        (state, ViewEvent::Navigate(target)) if state.is_lateral() => Ok(target.view()),
        (ViewState::Settings, ViewEvent::Disconnect) => Ok(ViewState::Onboarding),
        (ViewState::Send | ViewState::Confirm, ViewEvent::Cancel) => Ok(ViewState::Home),
        _ => Err(not_allowed()),
    }
}
