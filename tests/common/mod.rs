#![allow(dead_code)]

use std::path::Path;

use heru_core::{
    config::{Config, ConfigManager, LatencyConfig, NarrativeConfig},
    core::Session,
    domain::{Currency, DraftTransfer},
    ledger::{shared, LedgerStore, SharedLedger},
    narrative::Narrator,
};
use tempfile::TempDir;
use tokio::runtime::Handle;

/// Credential variable no test environment defines.
pub const UNSET_KEY_ENV: &str = "HERU_CORE_TEST_UNSET_KEY";

pub fn authenticated_store() -> LedgerStore {
    let mut store = LedgerStore::default();
    store.authenticate();
    store
}

pub fn draft(amount: f64, recipient: &str) -> DraftTransfer {
    DraftTransfer::new(amount, recipient, Currency::Usdc)
}

pub fn offline_session(latency: LatencyConfig) -> (Session, SharedLedger) {
    let ledger = shared(LedgerStore::default());
    let session = Session::new(
        ledger.clone(),
        Narrator::offline(),
        latency,
        Handle::current(),
    );
    (session, ledger)
}

/// Config for script runs: no waiting and no credential.
pub fn script_config() -> Config {
    Config {
        narrative: NarrativeConfig {
            api_key_env: UNSET_KEY_ENV.into(),
            ..NarrativeConfig::default()
        },
        latency: LatencyConfig::instant(),
    }
}

/// Temporary `HERU_HOME` with `config` already saved.
pub fn home_with(config: &Config) -> TempDir {
    let temp = TempDir::new().expect("create temp dir");
    write_config(temp.path(), config);
    temp
}

pub fn write_config(base: &Path, config: &Config) {
    let manager =
        ConfigManager::with_base_dir(base.to_path_buf()).expect("create config manager");
    manager.save(config).expect("save config");
}
