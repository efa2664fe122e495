mod common;

use std::time::Duration;

use bank_client::api::CreateOutcome;
use bank_client::core::{Bank, ManualClock, Outcome, StatusMessage};
use bank_client::domain::{NewAccount, TransactionRequest, TransactionResult};
use bank_client::errors::ApiError;

use common::{account, ScriptedApi};

const TTL: Duration = Duration::from_secs(3);

async fn bank_with(api: &ScriptedApi) -> (Bank<ScriptedApi, ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut bank = Bank::with_clock(api.clone(), clock.clone(), TTL);
    bank.refresh().await;
    (bank, clock)
}

#[tokio::test]
async fn creating_an_account_adds_exactly_one() {
    let api = ScriptedApi::default();
    let (mut bank, _clock) = bank_with(&api).await;

    let outcome = bank.create_account(NewAccount::new("Alice", 100.0)).await;

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(bank.accounts().len(), 1);
    let created = &bank.accounts()[0];
    assert_eq!(created.id, "acc-1");
    assert_eq!(created.owner, "Alice");
    assert_eq!(created.balance, 100.0);
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::success("Account created successfully"))
    );
}

#[tokio::test]
async fn created_account_is_appended_when_refresh_fails() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 5.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    api.set_fail_list(true);

    let outcome = bank.create_account(NewAccount::new("Bob", 20.0)).await;

    assert_eq!(outcome, Outcome::Applied);
    let owners: Vec<&str> = bank.accounts().iter().map(|a| a.owner.as_str()).collect();
    assert_eq!(owners, vec!["Alice", "Bob"]);
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::success("Account created successfully"))
    );
}

#[tokio::test]
async fn rejected_creation_surfaces_server_reason() {
    let api = ScriptedApi::default();
    api.queue_create(Ok(CreateOutcome::Rejected {
        error: Some("Owner is required".into()),
    }));
    api.queue_create(Ok(CreateOutcome::Rejected { error: None }));
    let (mut bank, _clock) = bank_with(&api).await;

    assert_eq!(
        bank.create_account(NewAccount::new(" ", 1.0)).await,
        Outcome::Rejected
    );
    assert_eq!(bank.status(), Some(&StatusMessage::error("Owner is required")));

    assert_eq!(
        bank.create_account(NewAccount::new("Zed", 1.0)).await,
        Outcome::Rejected
    );
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::error("Failed to create account"))
    );
    assert!(bank.accounts().is_empty());
}

#[tokio::test]
async fn deposit_patches_selected_balance_before_refresh() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 100.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    bank.select("a");

    // The refresh after the mutation fails, so only the patch is visible.
    api.set_fail_list(true);
    api.queue_transaction(Ok(TransactionResult::accepted(
        "Deposit successful",
        Some(150.0),
    )));

    assert_eq!(bank.deposit("a", 50.0).await, Outcome::Applied);
    assert_eq!(bank.selected().map(|a| a.balance), Some(150.0));
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::success("Deposit successful"))
    );
}

#[tokio::test]
async fn refresh_after_deposit_brings_server_balances() {
    let api = ScriptedApi::with_accounts(vec![
        account("a", "Alice", 100.0),
        account("b", "Bob", 1.0),
    ]);
    let (mut bank, _clock) = bank_with(&api).await;
    bank.select("a");

    assert_eq!(bank.deposit("a", 50.0).await, Outcome::Applied);
    assert_eq!(bank.selected().map(|a| a.balance), Some(150.0));
    assert_eq!(bank.account("a").map(|a| a.balance), Some(150.0));
    assert_eq!(api.mutation_calls(), vec!["deposit a 50"]);
}

#[tokio::test]
async fn rejected_withdraw_leaves_balances_unchanged() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 10.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    bank.select("a");
    api.queue_transaction(Ok(TransactionResult::rejected("Insufficient funds")));

    assert_eq!(bank.withdraw("a", 500.0).await, Outcome::Rejected);
    assert_eq!(bank.selected().map(|a| a.balance), Some(10.0));
    assert_eq!(bank.account("a").map(|a| a.balance), Some(10.0));
    assert_eq!(bank.status(), Some(&StatusMessage::error("Insufficient funds")));
}

#[tokio::test]
async fn rejection_prefers_error_field_and_falls_back_to_generic() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 10.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    api.queue_transaction(Ok(TransactionResult {
        success: false,
        message: Some("ignored".into()),
        balance: None,
        error: Some("Account not found".into()),
    }));
    api.queue_transaction(Ok(TransactionResult {
        success: false,
        ..TransactionResult::default()
    }));

    bank.transfer("a", "zzz", 1.0).await;
    assert_eq!(bank.status(), Some(&StatusMessage::error("Account not found")));

    bank.transfer("a", "zzz", 1.0).await;
    assert_eq!(bank.status(), Some(&StatusMessage::error("Failed to transfer")));
}

#[tokio::test]
async fn network_failure_posts_one_generic_message() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 10.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    bank.select("a");
    let before = bank.status_revision();

    api.queue_transaction(Err(ApiError::Status(502)));
    assert_eq!(bank.withdraw("a", 5.0).await, Outcome::Failed);

    assert_eq!(bank.status_revision(), before + 1);
    assert_eq!(bank.status(), Some(&StatusMessage::error("Failed to withdraw")));
    assert_eq!(bank.selected().map(|a| a.balance), Some(10.0));
    // No refresh follows a failed mutation.
    assert_eq!(api.calls().iter().filter(|c| *c == "list").count(), 1);
}

#[tokio::test]
async fn network_failure_on_create_posts_one_generic_message() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 10.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    let before = bank.status_revision();

    api.queue_create(Err(ApiError::Status(502)));
    assert_eq!(
        bank.create_account(NewAccount::new("Bob", 20.0)).await,
        Outcome::Failed
    );

    assert_eq!(bank.status_revision(), before + 1);
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::error("Failed to create account"))
    );
    let owners: Vec<&str> = bank.accounts().iter().map(|a| a.owner.as_str()).collect();
    assert_eq!(owners, vec!["Alice"]);
    assert_eq!(api.calls().iter().filter(|c| *c == "list").count(), 1);
}

#[tokio::test]
async fn failed_fetch_keeps_cached_accounts() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 10.0)]);
    let (mut bank, _clock) = bank_with(&api).await;
    api.set_fail_list(true);

    assert!(!bank.refresh().await);
    assert_eq!(bank.accounts().len(), 1);
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::error("Failed to fetch accounts"))
    );
}

#[tokio::test]
async fn transfer_request_targets_both_accounts() {
    let api = ScriptedApi::with_accounts(vec![
        account("a", "Alice", 100.0),
        account("b", "Bob", 0.0),
    ]);
    let (mut bank, _clock) = bank_with(&api).await;
    bank.select("a");

    let outcome = bank
        .execute(TransactionRequest::Transfer {
            from_id: "a".into(),
            to_id: "b".into(),
            amount: 40.0,
        })
        .await;

    assert_eq!(outcome, Outcome::Applied);
    assert_eq!(bank.selected().map(|a| a.balance), Some(60.0));
    assert_eq!(bank.account("b").map(|a| a.balance), Some(40.0));
    assert_eq!(
        bank.status(),
        Some(&StatusMessage::success("Transfer successful"))
    );
}

#[tokio::test]
async fn status_expires_after_ttl_and_new_posts_reset_timer() {
    let api = ScriptedApi::with_accounts(vec![account("a", "Alice", 10.0)]);
    let (mut bank, clock) = bank_with(&api).await;

    bank.post_status(StatusMessage::success("first"));
    clock.advance(Duration::from_secs(2));
    assert_eq!(bank.status(), Some(&StatusMessage::success("first")));

    bank.post_status(StatusMessage::error("second"));
    clock.advance(Duration::from_secs(2));
    assert_eq!(bank.status(), Some(&StatusMessage::error("second")));

    clock.advance(Duration::from_secs(1));
    assert_eq!(bank.status(), None);
}

#[tokio::test]
async fn vanished_selection_is_cleared_on_refresh() {
    let api = ScriptedApi::with_accounts(vec![
        account("a", "Alice", 10.0),
        account("b", "Bob", 20.0),
    ]);
    let (mut bank, _clock) = bank_with(&api).await;
    bank.select("b");

    api.accounts.lock().unwrap().retain(|account| account.id != "b");
    assert!(bank.refresh().await);
    assert!(bank.selected().is_none());
}
