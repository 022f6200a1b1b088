#![doc(test(attr(deny(warnings))))]

//! Heru Core models a remittance wallet session: a ledger whose transfers
//! each plant a tree, the screen-level state machine that drives it, and a
//! best-effort narrative service that writes flavour text about the
//! resulting forest.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod narrative;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Heru Core tracing initialized.");
    });
}
