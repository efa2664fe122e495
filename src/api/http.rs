//! reqwest-backed [`BankApi`]. Pure parsing lives in the `parse_*` helpers so
//! response handling is testable without a server.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

use super::{BankApi, CreateOutcome};
use crate::domain::{Account, AmountRequest, NewAccount, TransactionKind, TransactionResult};
use crate::errors::{ApiError, ApiResult};

const ACCOUNTS: &str = "accounts";

/// HTTP client for the banking API rooted at a base URL such as
/// `http://localhost:3001/api`.
///
/// No retries and no timeouts: a failed call is reported once.
#[derive(Debug, Clone)]
pub struct HttpBankApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpBankApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn post_amount(
        &self,
        kind: TransactionKind,
        url: Url,
        amount: f64,
    ) -> ApiResult<TransactionResult> {
        tracing::debug!(%url, amount, action = kind.as_str(), "posting transaction");
        let response = self
            .http
            .post(url)
            .json(&AmountRequest { amount })
            .send()
            .await?;
        let ok = response.status().is_success();
        let body = response.text().await?;
        parse_transaction_result(ok, &body)
    }
}

#[async_trait]
impl BankApi for HttpBankApi {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        let url = self.endpoint(&[ACCOUNTS])?;
        tracing::debug!(%url, "fetching accounts");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        parse_account_list(status.is_success(), status.as_u16(), &body)
    }

    async fn create_account(&self, request: &NewAccount) -> ApiResult<CreateOutcome> {
        let url = self.endpoint(&[ACCOUNTS])?;
        tracing::debug!(%url, owner = %request.owner, "creating account");
        let response = self.http.post(url).json(request).send().await?;
        let ok = response.status().is_success();
        let body = response.text().await?;
        parse_create_response(ok, &body)
    }

    async fn deposit(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        let url = self.endpoint(&[ACCOUNTS, account_id, "deposit"])?;
        self.post_amount(TransactionKind::Deposit, url, amount).await
    }

    async fn withdraw(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        let url = self.endpoint(&[ACCOUNTS, account_id, "withdraw"])?;
        self.post_amount(TransactionKind::Withdraw, url, amount).await
    }

    async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> ApiResult<TransactionResult> {
        let url = self.endpoint(&[ACCOUNTS, from_id, "transfer", to_id])?;
        self.post_amount(TransactionKind::Transfer, url, amount).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

fn parse_account_list(ok: bool, status: u16, body: &str) -> ApiResult<Vec<Account>> {
    if !ok {
        return Err(ApiError::Status(status));
    }
    Ok(serde_json::from_str(body)?)
}

fn parse_create_response(ok: bool, body: &str) -> ApiResult<CreateOutcome> {
    if ok {
        return Ok(CreateOutcome::Created(serde_json::from_str(body)?));
    }
    let rejected: ErrorBody = serde_json::from_str(body)?;
    Ok(CreateOutcome::Rejected {
        error: rejected.error,
    })
}

/// Non-2xx replies are rejections even if the body claims success.
fn parse_transaction_result(ok: bool, body: &str) -> ApiResult<TransactionResult> {
    let mut result: TransactionResult = serde_json::from_str(body)?;
    if !ok {
        result.success = false;
    }
    Ok(result)
}
