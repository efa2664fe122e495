//! Banking API client.
//!
//! [`BankApi`] is the seam between the coordinator and the transport.
//! [`HttpBankApi`] talks JSON over HTTP; tests substitute in-memory fakes.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Account, NewAccount, TransactionResult};
use crate::errors::ApiResult;

pub use http::HttpBankApi;

/// Result of `POST /accounts`.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Account),
    /// Non-2xx reply; `error` is the server's human-readable reason, if any.
    Rejected { error: Option<String> },
}

#[async_trait]
pub trait BankApi: Send + Sync {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>>;

    async fn create_account(&self, request: &NewAccount) -> ApiResult<CreateOutcome>;

    async fn deposit(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult>;

    async fn withdraw(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult>;

    async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> ApiResult<TransactionResult>;
}

#[async_trait]
impl<T: BankApi + ?Sized> BankApi for Box<T> {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        (**self).list_accounts().await
    }

    async fn create_account(&self, request: &NewAccount) -> ApiResult<CreateOutcome> {
        (**self).create_account(request).await
    }

    async fn deposit(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        (**self).deposit(account_id, amount).await
    }

    async fn withdraw(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        (**self).withdraw(account_id, amount).await
    }

    async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> ApiResult<TransactionResult> {
        (**self).transfer(from_id, to_id, amount).await
    }
}

#[async_trait]
impl<T: BankApi + ?Sized> BankApi for Arc<T> {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        (**self).list_accounts().await
    }

    async fn create_account(&self, request: &NewAccount) -> ApiResult<CreateOutcome> {
        (**self).create_account(request).await
    }

    async fn deposit(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        (**self).deposit(account_id, amount).await
    }

    async fn withdraw(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        (**self).withdraw(account_id, amount).await
    }

    async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> ApiResult<TransactionResult> {
        (**self).transfer(from_id, to_id, amount).await
    }
}
