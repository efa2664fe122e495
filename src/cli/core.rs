use std::io;

use strsim::levenshtein;
use thiserror::Error;

use crate::api::HttpBankApi;
use crate::core::Outcome;
use crate::domain::{Account, TransactionKind};
use crate::errors::{ApiError, CliError, ConfigError};

use super::forms::AMOUNT_FIELD;
use super::io as cli_io;
use super::output;
use super::registry::CommandEntry;
use super::ui::list_selector::{ListSelectionResult, ListSelector};
use super::views;

pub use super::shell_context::{CliMode, CliOptions, ShellContext};

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

impl ShellContext {
    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Loads the account list once before the first prompt.
    pub(crate) fn startup(&mut self) {
        let loaded = self.runtime.block_on(self.bank.refresh());
        if loaded {
            tracing::debug!(count = self.bank.accounts().len(), "initial accounts loaded");
        }
        self.announce_status();
    }

    /// Prints the status message once per post. Later commands do not repeat
    /// it, and an expired message is never shown.
    pub(crate) fn announce_status(&mut self) {
        let revision = self.bank.status_revision();
        if revision == self.announced_revision {
            return;
        }
        self.announced_revision = revision;
        if let Some(message) = self.bank.status() {
            output::status(message);
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            let result = handler(self, args);
            self.announce_status();
            match result {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit shell?").map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                output::info("Use `help <command>` for usage details.");
            }
            other => self.print_error(&other.to_string()),
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        output::error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.bank.selected()?;
        self.bank
            .accounts()
            .iter()
            .position(|account| account.id == selected.id)
    }

    /// Interactive row picker over the account table. Returns the chosen id.
    fn pick_account(&self) -> Result<Option<String>, CommandError> {
        let accounts = self.bank.accounts();
        let table = views::account_table(accounts, self.bank.selected().map(|a| a.id.as_str()));
        let selector = ListSelector::new(&table).starting_at(self.selected_index().unwrap_or(0));
        match selector.run()? {
            ListSelectionResult::Selected(index) => {
                Ok(accounts.get(index).map(|account| account.id.clone()))
            }
            ListSelectionResult::Escaped | ListSelectionResult::Empty => Ok(None),
        }
    }

    fn resolve_account_arg(&self, arg: &str) -> Result<Account, CommandError> {
        views::resolve_account(self.bank.accounts(), arg)
            .cloned()
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "No account matches `{}`. Use `list` to see indexes and ids.",
                    arg
                ))
            })
    }

    pub(crate) fn list_accounts(&mut self) -> CommandResult {
        output::section("Accounts");
        if self.bank.accounts().is_empty() {
            output::info(views::EMPTY_STATE);
            return Ok(());
        }
        if !self.can_prompt() {
            let selected = self.bank.selected().map(|account| account.id.as_str());
            output::block(&views::render_account_list(self.bank.accounts(), selected));
            return Ok(());
        }
        if let Some(id) = self.pick_account()? {
            self.apply_selection(&id);
        }
        Ok(())
    }

    pub(crate) fn refresh_accounts(&mut self) -> CommandResult {
        if self.runtime.block_on(self.bank.refresh()) {
            output::info(format!("Loaded {} account(s).", self.bank.accounts().len()));
        }
        Ok(())
    }

    pub(crate) fn select_account(&mut self, arg: Option<&str>) -> CommandResult {
        let id = match arg {
            Some(arg) => self.resolve_account_arg(arg)?.id,
            None if self.can_prompt() => match self.pick_account()? {
                Some(id) => id,
                None => {
                    output::info("Selection unchanged.");
                    return Ok(());
                }
            },
            None => {
                return Err(CommandError::InvalidArguments(
                    "usage: select <index|id>".into(),
                ))
            }
        };
        self.apply_selection(&id);
        Ok(())
    }

    fn apply_selection(&mut self, id: &str) {
        if let Some(account) = self.bank.select(id) {
            output::success(format!("Selected {}.", account.display_label()));
        }
        self.show_form();
    }

    pub(crate) fn create_account(&mut self, args: &[&str]) -> CommandResult {
        if let Some(owner) = args.first() {
            self.account_form.owner = owner.to_string();
        }
        if let Some(deposit) = args.get(1) {
            self.account_form.initial_deposit = deposit.to_string();
        }

        if self.can_prompt() {
            for field in self.account_form.fields_needing_input() {
                let value = cli_io::prompt_field(field)?;
                self.account_form.set_field(field.key, value);
            }
        }

        let Some(request) = self.account_form.submit() else {
            self.print_warning(
                "Nothing submitted: an owner and a numeric initial deposit are required.",
            );
            return Ok(());
        };

        if self.runtime.block_on(self.bank.create_account(request)) == Outcome::Applied {
            tracing::debug!(count = self.bank.accounts().len(), "account list after create");
        }
        Ok(())
    }

    pub(crate) fn set_transaction_mode(&mut self, raw: &str) -> CommandResult {
        let mode: TransactionKind = raw.parse().map_err(|_| {
            CommandError::InvalidArguments(format!(
                "unknown mode `{}` (expected deposit, withdraw, or transfer)",
                raw
            ))
        })?;
        self.transaction_form.set_mode(mode);
        self.show_form();
        Ok(())
    }

    pub(crate) fn set_transaction_amount(&mut self, args: &[&str]) -> CommandResult {
        let amount = match args.first() {
            Some(raw) => raw.to_string(),
            None if self.can_prompt() => cli_io::prompt_field(&AMOUNT_FIELD)?,
            None => return Err(CommandError::InvalidArguments("usage: amount <value>".into())),
        };
        self.transaction_form.set_amount(amount);
        Ok(())
    }

    pub(crate) fn set_transfer_destination(&mut self, arg: Option<&str>) -> CommandResult {
        let Some(source) = self.bank.selected().cloned() else {
            self.print_warning(views::NO_SELECTION);
            return Ok(());
        };

        let destination = match arg {
            Some(arg) => self.resolve_account_arg(arg)?,
            None if self.can_prompt() => {
                let choices = destination_accounts(self.bank.accounts(), &source);
                let labels: Vec<String> = choices.iter().map(Account::display_label).collect();
                match cli_io::choose("Transfer to", &labels)? {
                    Some(index) => choices[index].clone(),
                    None => return Ok(()),
                }
            }
            None => return Err(CommandError::InvalidArguments("usage: to <index|id>".into())),
        };

        if destination.id == source.id {
            return Err(CommandError::InvalidArguments(
                "The destination must differ from the selected account.".into(),
            ));
        }
        self.transaction_form.set_destination(destination.id);
        Ok(())
    }

    /// Submits the transaction form. Validation failures dispatch nothing.
    pub(crate) fn submit_transaction(&mut self) -> CommandResult {
        if self.bank.selected().is_none() {
            self.print_warning(views::NO_SELECTION);
            return Ok(());
        }
        if !self.transaction_form.can_submit() {
            self.print_warning("Choose a destination account with `to` before submitting.");
            return Ok(());
        }

        let Some(request) = self.transaction_form.submit(self.bank.selected()) else {
            self.print_warning("Nothing submitted: enter an amount greater than zero.");
            return Ok(());
        };

        let outcome = self.runtime.block_on(self.bank.execute(request));
        if outcome == Outcome::Applied {
            if let Some(account) = self.bank.selected() {
                output::info(format!("Balance: {}", account.formatted_balance()));
            }
        }
        Ok(())
    }

    /// `deposit 10`, `withdraw 5`, `transfer 20 <to>`.
    pub(crate) fn quick_transaction(&mut self, kind: TransactionKind, args: &[&str]) -> CommandResult {
        let Some(amount) = args.first() else {
            let usage = match kind {
                TransactionKind::Transfer => "usage: transfer <amount> <to>".to_string(),
                other => format!("usage: {} <amount>", other.as_str()),
            };
            return Err(CommandError::InvalidArguments(usage));
        };

        self.transaction_form.set_mode(kind);
        self.transaction_form.set_amount(*amount);
        if kind == TransactionKind::Transfer {
            self.transaction_form.set_destination("");
            if self.bank.selected().is_some() {
                self.set_transfer_destination(args.get(1).copied())?;
            }
        }
        self.submit_transaction()
    }

    pub(crate) fn show_form(&self) {
        output::section("Transaction");
        output::block(&views::render_transaction_form(
            &self.transaction_form,
            self.bank.selected(),
            self.bank.accounts(),
        ));
    }

    pub(crate) fn show_status(&self) {
        match (self.bank.status(), self.bank.status_remaining()) {
            (Some(message), Some(remaining)) => {
                output::status(message);
                output::info(format!("(clears in {:.1}s)", remaining.as_secs_f64()));
            }
            _ => output::info("No status message."),
        }
    }

    pub(crate) fn show_config(&self) {
        output::section("Configuration");
        output::info(format!("  api_url    : {}", self.config.api_url));
        if self.active_api_url != self.config.api_url {
            output::info(format!("  (session)  : {}", self.active_api_url));
        }
        output::info(format!("  status_ttl : {}s", self.config.status_ttl_secs));
        output::info(format!("  file       : {}", self.config_manager.path().display()));
    }

    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set(key, value)?;

        let api_changed = key == "api_url" && updated.api_url != self.active_api_url;
        let new_api = if api_changed {
            Some(HttpBankApi::new(&updated.api_url)?)
        } else {
            None
        };

        // Nothing reaches the session unless the file write succeeded.
        self.config_manager.save(&updated)?;

        if let Some(api) = new_api {
            self.bank.set_api(Box::new(api));
            self.active_api_url = updated.api_url.clone();
        }
        self.bank.set_status_ttl(updated.status_ttl());
        self.config = updated;
        output::success("Configuration updated.");

        if api_changed {
            self.refresh_accounts()?;
        }
        Ok(())
    }
}

fn destination_accounts(accounts: &[Account], source: &Account) -> Vec<Account> {
    super::forms::TransactionForm::destination_choices(accounts, source)
        .into_iter()
        .cloned()
        .collect()
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Io(err) => CliError::Io(err),
            CommandError::Config(err) => CliError::Config(err),
            CommandError::Api(err) => CliError::Api(err),
            other => CliError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())),
        }
    }
}
