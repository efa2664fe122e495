use tokio::runtime::{Builder, Runtime};

use crate::{
    api::{BankApi, HttpBankApi},
    config::{validate_api_url, Config, ConfigManager},
    core::Bank,
    errors::CliError,
};

use super::commands;
use super::forms::{AccountForm, TransactionForm};
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Startup options resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct CliOptions {
    pub mode: CliMode,
    /// Overrides the configured API URL for this session only.
    pub api_url: Option<String>,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub bank: Bank<Box<dyn BankApi>>,
    pub account_form: AccountForm,
    pub transaction_form: TransactionForm,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// URL the current transport was built from.
    pub active_api_url: String,
    pub last_command: Option<String>,
    pub running: bool,
    pub(crate) runtime: Runtime,
    pub(crate) announced_revision: u64,
}

impl ShellContext {
    pub fn new(options: CliOptions) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let api_url = match options.api_url.as_deref() {
            Some(url) => validate_api_url(url)?,
            None => config.api_url.clone(),
        };
        let api = HttpBankApi::new(&api_url)?;
        tracing::info!(api_url = %api_url, mode = ?options.mode, "starting shell");
        Self::with_api(options.mode, Box::new(api), api_url, config_manager, config)
    }

    /// Builds a context around an arbitrary transport.
    pub fn with_api(
        mode: CliMode,
        api: Box<dyn BankApi>,
        active_api_url: String,
        config_manager: ConfigManager,
        config: Config,
    ) -> Result<Self, CliError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::Runtime)?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut bank = Bank::new(api);
        bank.set_status_ttl(config.status_ttl());

        Ok(Self {
            mode,
            registry,
            bank,
            account_form: AccountForm::default(),
            transaction_form: TransactionForm::default(),
            config_manager,
            config,
            active_api_url,
            last_command: None,
            running: true,
            runtime,
            announced_revision: 0,
        })
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match self.bank.selected() {
            Some(account) => format!("bank [{}]> ", account.owner),
            None => "bank> ".to_string(),
        }
    }
}
