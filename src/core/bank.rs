//! Root coordinator: owns the account collection, the selection, and the
//! status message, and reconciles API results back into them.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{BankApi, CreateOutcome};
use crate::domain::{Account, NewAccount, TransactionKind, TransactionRequest, TransactionResult};
use crate::errors::ApiResult;

use super::clock::{Clock, SystemClock};
use super::status::{StatusMessage, StatusSlot, DEFAULT_STATUS_TTL};

pub const FETCH_FAILED: &str = "Failed to fetch accounts";
pub const CREATE_FAILED: &str = "Failed to create account";
pub const CREATE_SUCCEEDED: &str = "Account created successfully";

/// How a coordinator action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted the action and local state was reconciled.
    Applied,
    /// The server answered with a business rejection.
    Rejected,
    /// Transport or parse failure; local state is untouched.
    Failed,
}

pub struct Bank<A, C = SystemClock> {
    api: A,
    clock: C,
    accounts: Vec<Account>,
    selected: Option<Account>,
    status: StatusSlot,
}

impl<A: BankApi> Bank<A, SystemClock> {
    pub fn new(api: A) -> Self {
        Self::with_clock(api, SystemClock, DEFAULT_STATUS_TTL)
    }
}

impl<A: BankApi, C: Clock> Bank<A, C> {
    pub fn with_clock(api: A, clock: C, status_ttl: Duration) -> Self {
        Self {
            api,
            clock,
            accounts: Vec::new(),
            selected: None,
            status: StatusSlot::new(status_ttl),
        }
    }

    /// Swaps the transport, e.g. after the API URL changes. Cached state is
    /// kept until the next refresh.
    pub fn set_api(&mut self, api: A) {
        self.api = api;
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// The selected account with its cached (possibly optimistic) balance.
    pub fn selected(&self) -> Option<&Account> {
        self.selected.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current(self.clock.now())
    }

    pub fn status_remaining(&self) -> Option<Duration> {
        self.status.remaining(self.clock.now())
    }

    pub fn status_revision(&self) -> u64 {
        self.status.revision()
    }

    pub fn set_status_ttl(&mut self, ttl: Duration) {
        self.status.set_ttl(ttl);
    }

    pub fn post_status(&mut self, message: StatusMessage) {
        let now = self.clock.now();
        self.status.post(message, now);
    }

    fn post_success(&mut self, text: impl Into<String>) {
        self.post_status(StatusMessage::success(text));
    }

    fn post_error(&mut self, text: impl Into<String>) {
        self.post_status(StatusMessage::error(text));
    }

    /// Replaces the selection by looking `id` up in the current collection.
    /// Unknown ids clear the selection.
    pub fn select(&mut self, id: &str) -> Option<&Account> {
        self.selected = self.account(id).cloned();
        debug!(id, found = self.selected.is_some(), "selection changed");
        self.selected.as_ref()
    }

    /// Re-fetches the whole collection. Returns `false` when the fetch failed.
    pub async fn refresh(&mut self) -> bool {
        match self.api.list_accounts().await {
            Ok(accounts) => {
                debug!(count = accounts.len(), "accounts refreshed");
                self.replace_accounts(accounts);
                true
            }
            Err(err) => {
                warn!(error = %err, "account refresh failed");
                self.post_error(FETCH_FAILED);
                false
            }
        }
    }

    fn replace_accounts(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts;
        if let Some(current) = self.selected.take() {
            self.selected = self.account(&current.id).cloned();
            if self.selected.is_none() {
                debug!(id = %current.id, "selected account vanished from refresh");
            }
        }
    }

    pub async fn create_account(&mut self, request: NewAccount) -> Outcome {
        debug!(owner = %request.owner, deposit = request.initial_deposit, "creating account");
        match self.api.create_account(&request).await {
            Err(err) => {
                warn!(error = %err, "account creation request failed");
                self.post_error(CREATE_FAILED);
                Outcome::Failed
            }
            Ok(CreateOutcome::Rejected { error }) => {
                let text = error
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| CREATE_FAILED.to_string());
                info!(reason = %text, "account creation rejected");
                self.post_error(text);
                Outcome::Rejected
            }
            Ok(CreateOutcome::Created(account)) => {
                info!(id = %account.id, owner = %account.owner, "account created");
                self.refresh().await;
                if self.account(&account.id).is_none() {
                    self.accounts.push(account);
                }
                self.post_success(CREATE_SUCCEEDED);
                Outcome::Applied
            }
        }
    }

    pub async fn deposit(&mut self, account_id: &str, amount: f64) -> Outcome {
        debug!(account_id, amount, "deposit");
        let result = self.api.deposit(account_id, amount).await;
        self.reconcile(TransactionKind::Deposit, account_id, result)
            .await
    }

    pub async fn withdraw(&mut self, account_id: &str, amount: f64) -> Outcome {
        debug!(account_id, amount, "withdraw");
        let result = self.api.withdraw(account_id, amount).await;
        self.reconcile(TransactionKind::Withdraw, account_id, result)
            .await
    }

    pub async fn transfer(&mut self, from_id: &str, to_id: &str, amount: f64) -> Outcome {
        debug!(from_id, to_id, amount, "transfer");
        let result = self.api.transfer(from_id, to_id, amount).await;
        self.reconcile(TransactionKind::Transfer, from_id, result)
            .await
    }

    /// Dispatches a submitted transaction form to the matching operation.
    pub async fn execute(&mut self, request: TransactionRequest) -> Outcome {
        debug!(
            action = request.kind().as_str(),
            source = request.source_id(),
            amount = request.amount(),
            "submitting transaction form"
        );
        match request {
            TransactionRequest::Deposit { account_id, amount } => {
                self.deposit(&account_id, amount).await
            }
            TransactionRequest::Withdraw { account_id, amount } => {
                self.withdraw(&account_id, amount).await
            }
            TransactionRequest::Transfer {
                from_id,
                to_id,
                amount,
            } => self.transfer(&from_id, &to_id, amount).await,
        }
    }

    /// The mutation result is applied before the refresh so a refresh can only
    /// ever overwrite the optimistic balance with newer server data.
    async fn reconcile(
        &mut self,
        kind: TransactionKind,
        account_id: &str,
        result: ApiResult<TransactionResult>,
    ) -> Outcome {
        let result = match result {
            Ok(result) => result,
            Err(err) => {
                warn!(action = kind.as_str(), account_id, error = %err, "transaction request failed");
                self.post_error(kind.failure_message());
                return Outcome::Failed;
            }
        };

        if !result.success {
            let text = result
                .rejection_text()
                .unwrap_or(kind.failure_message())
                .to_string();
            info!(action = kind.as_str(), account_id, reason = %text, "transaction rejected");
            self.post_error(text);
            return Outcome::Rejected;
        }

        if let Some(balance) = result.balance {
            self.patch_selected_balance(account_id, balance);
        }
        self.refresh().await;

        let text = result
            .success_text()
            .unwrap_or(kind.success_fallback())
            .to_string();
        info!(action = kind.as_str(), account_id, balance = ?result.balance, "transaction applied");
        self.post_success(text);
        Outcome::Applied
    }

    fn patch_selected_balance(&mut self, account_id: &str, balance: f64) {
        if let Some(selected) = self.selected.as_mut().filter(|s| s.id == account_id) {
            selected.balance = balance;
        }
    }
}
