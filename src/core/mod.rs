//! Session core: the view state machine, its orchestration, and read models.

pub mod services;
pub mod session;
pub mod view;

pub use session::{Activity, Session};
pub use view::{transition, GuardContext, NavTarget, ViewEvent, ViewState};
