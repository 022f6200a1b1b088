use std::future::Future;

use tokio::runtime::{Builder, Runtime};

use crate::{
    config::{Config, ConfigManager},
    core::Session,
    errors::CliError,
    ledger::{shared, LedgerStore},
    narrative::Narrator,
};

use super::commands;
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach.
///
/// `session` is declared before `runtime` so background tasks are
/// cancelled before the runtime shuts down.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: Session,
    pub config: Config,
    pub running: bool,
    pub(crate) runtime: Runtime,
}

impl ShellContext {
    /// Loads configuration from disk and starts a fresh session.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        Self::with_config(mode, config)
    }

    pub fn with_config(mode: CliMode, config: Config) -> Result<Self, CliError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let narrator = Narrator::from_config(&config.narrative);
        let session = Session::new(
            shared(LedgerStore::default()),
            narrator,
            config.latency.clone(),
            runtime.handle().clone(),
        );

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            session,
            config,
            running: true,
            runtime,
        })
    }

    /// Runs `future` to completion on the shell's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn prompt(&self) -> String {
        let busy = if self.session.is_busy() { "*" } else { "" };
        format!("heru[{}{}]> ", self.session.view(), busy)
    }
}
