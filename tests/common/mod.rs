#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::TcpListener as StdTcpListener;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bank_client::api::{BankApi, CreateOutcome};
use bank_client::domain::{Account, NewAccount, TransactionResult};
use bank_client::errors::{ApiError, ApiResult};
use chrono::Utc;
use serde_json::{json, Value};

pub fn account(id: &str, owner: &str, balance: f64) -> Account {
    Account::new(id, owner, balance, Utc::now())
}

/// In-memory [`BankApi`] whose replies can be queued ahead of time.
///
/// Clones share state, so a test can keep one handle while the coordinator
/// owns another. Unqueued mutations apply to the in-memory accounts.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    pub accounts: Arc<Mutex<Vec<Account>>>,
    pub create_replies: Arc<Mutex<VecDeque<ApiResult<CreateOutcome>>>>,
    pub transaction_replies: Arc<Mutex<VecDeque<ApiResult<TransactionResult>>>>,
    pub fail_list: Arc<AtomicBool>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedApi {
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let api = Self::default();
        *api.accounts.lock().unwrap() = accounts;
        api
    }

    pub fn queue_create(&self, reply: ApiResult<CreateOutcome>) {
        self.create_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_transaction(&self, reply: ApiResult<TransactionResult>) {
        self.transaction_replies.lock().unwrap().push_back(reply);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_balance(&self, id: &str, balance: f64) {
        if let Some(account) = self
            .accounts
            .lock()
            .unwrap()
            .iter_mut()
            .find(|account| account.id == id)
        {
            account.balance = balance;
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call != "list")
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn apply(&self, id: &str, delta: f64, message: &str) -> ApiResult<TransactionResult> {
        if let Some(reply) = self.transaction_replies.lock().unwrap().pop_front() {
            return reply;
        }
        let mut accounts = self.accounts.lock().unwrap();
        let Some(account) = accounts.iter_mut().find(|account| account.id == id) else {
            return Ok(TransactionResult {
                success: false,
                message: None,
                balance: None,
                error: Some("Account not found".into()),
            });
        };
        if account.balance + delta < 0.0 {
            return Ok(TransactionResult::rejected("Insufficient funds"));
        }
        account.balance += delta;
        Ok(TransactionResult::accepted(message, Some(account.balance)))
    }
}

#[async_trait]
impl BankApi for ScriptedApi {
    async fn list_accounts(&self) -> ApiResult<Vec<Account>> {
        self.record("list".into());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ApiError::Status(503));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn create_account(&self, request: &NewAccount) -> ApiResult<CreateOutcome> {
        self.record(format!("create {} {}", request.owner, request.initial_deposit));
        if let Some(reply) = self.create_replies.lock().unwrap().pop_front() {
            if let Ok(CreateOutcome::Created(account)) = &reply {
                self.accounts.lock().unwrap().push(account.clone());
            }
            return reply;
        }
        let mut accounts = self.accounts.lock().unwrap();
        let created = account(
            &format!("acc-{}", accounts.len() + 1),
            &request.owner,
            request.initial_deposit,
        );
        accounts.push(created.clone());
        Ok(CreateOutcome::Created(created))
    }

    async fn deposit(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        self.record(format!("deposit {account_id} {amount}"));
        self.apply(account_id, amount, "Deposit successful")
    }

    async fn withdraw(&self, account_id: &str, amount: f64) -> ApiResult<TransactionResult> {
        self.record(format!("withdraw {account_id} {amount}"));
        self.apply(account_id, -amount, "Withdrawal successful")
    }

    async fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> ApiResult<TransactionResult> {
        self.record(format!("transfer {from_id} {to_id} {amount}"));
        let result = self.apply(from_id, -amount, "Transfer successful")?;
        if result.success {
            let current = self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|account| account.id == to_id)
                .map(|account| account.balance);
            if let Some(balance) = current {
                self.set_balance(to_id, balance + amount);
            }
        }
        Ok(result)
    }
}

/// Shared state behind the fake HTTP bank.
#[derive(Clone, Default)]
pub struct FakeBank {
    pub accounts: Arc<Mutex<Vec<Account>>>,
    pub fail_list: Arc<AtomicBool>,
}

impl FakeBank {
    fn find_balance(&self, id: &str) -> Option<f64> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.id == id)
            .map(|account| account.balance)
    }

    fn adjust(&self, id: &str, delta: f64) -> Option<f64> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts.iter_mut().find(|account| account.id == id)?;
        account.balance += delta;
        Some(account.balance)
    }
}

pub struct FakeServer {
    pub base_url: String,
    pub bank: FakeBank,
}

impl FakeServer {
    /// Serves the fake bank on an ephemeral port from a background thread,
    /// usable from both sync and async tests.
    pub fn start(accounts: Vec<Account>) -> Self {
        let bank = FakeBank::default();
        *bank.accounts.lock().unwrap() = accounts;

        let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind fake bank");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");
        let app = router(bank.clone());

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("fake bank runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("fake bank server");
            });
        });

        Self {
            base_url: format!("http://{addr}/api"),
            bank,
        }
    }

    pub fn balance(&self, id: &str) -> Option<f64> {
        self.bank.find_balance(id)
    }

    pub fn account_count(&self) -> usize {
        self.bank.accounts.lock().unwrap().len()
    }
}

fn router(bank: FakeBank) -> Router {
    Router::new()
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts/{id}/deposit", post(deposit))
        .route("/api/accounts/{id}/withdraw", post(withdraw))
        .route("/api/accounts/{from}/transfer/{to}", post(transfer))
        .with_state(bank)
}

fn rejection(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn amount_of(body: &Value) -> Option<f64> {
    body.get("amount")
        .and_then(Value::as_f64)
        .filter(|amount| *amount > 0.0)
}

async fn list_accounts(State(bank): State<FakeBank>) -> Response {
    if bank.fail_list.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "database unavailable" })),
        )
            .into_response();
    }
    let accounts = bank.accounts.lock().unwrap().clone();
    Json(accounts).into_response()
}

async fn create_account(State(bank): State<FakeBank>, Json(body): Json<Value>) -> Response {
    let owner = body
        .get("owner")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();
    if owner.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Owner is required" })),
        )
            .into_response();
    }
    let deposit = body
        .get("initialDeposit")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);
    if deposit < 0.0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Initial deposit cannot be negative" })),
        )
            .into_response();
    }

    let mut accounts = bank.accounts.lock().unwrap();
    let created = account(&format!("acc-{}", accounts.len() + 1), &owner, deposit);
    accounts.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn deposit(
    State(bank): State<FakeBank>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(amount) = amount_of(&body) else {
        return rejection(StatusCode::BAD_REQUEST, "Amount must be positive");
    };
    match bank.adjust(&id, amount) {
        Some(balance) => Json(json!({
            "success": true,
            "message": "Deposit successful",
            "balance": balance
        }))
        .into_response(),
        None => rejection(StatusCode::NOT_FOUND, "Account not found"),
    }
}

async fn withdraw(
    State(bank): State<FakeBank>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(amount) = amount_of(&body) else {
        return rejection(StatusCode::BAD_REQUEST, "Amount must be positive");
    };
    match bank.find_balance(&id) {
        None => rejection(StatusCode::NOT_FOUND, "Account not found"),
        Some(balance) if balance < amount => {
            rejection(StatusCode::BAD_REQUEST, "Insufficient funds")
        }
        Some(_) => {
            let balance = bank.adjust(&id, -amount).unwrap_or_default();
            Json(json!({
                "success": true,
                "message": "Withdrawal successful",
                "balance": balance
            }))
            .into_response()
        }
    }
}

async fn transfer(
    State(bank): State<FakeBank>,
    Path((from, to)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let Some(amount) = amount_of(&body) else {
        return rejection(StatusCode::BAD_REQUEST, "Amount must be positive");
    };
    let (Some(balance), Some(_)) = (bank.find_balance(&from), bank.find_balance(&to)) else {
        return rejection(StatusCode::NOT_FOUND, "Account not found");
    };
    if balance < amount {
        return rejection(StatusCode::BAD_REQUEST, "Insufficient funds");
    }
    let balance = bank.adjust(&from, -amount).unwrap_or_default();
    bank.adjust(&to, amount);
    Json(json!({
        "success": true,
        "message": "Transfer successful",
        "balance": balance
    }))
    .into_response()
}
