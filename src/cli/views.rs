//! Plain-text renderings of the account list and the transaction form.

use crate::cli::forms::TransactionForm;
use crate::cli::ui::table_renderer::{Alignment, Table, TableColumn};
use crate::domain::{Account, TransactionKind};

pub const EMPTY_STATE: &str = "No accounts found";
pub const NO_SELECTION: &str = "Please select an account to perform transactions";

const SELECTED_MARKER: &str = "*";

/// Table of accounts in server order; the selected row carries a marker.
pub fn account_table(accounts: &[Account], selected_id: Option<&str>) -> Table {
    let mut table = Table::new(vec![
        TableColumn::new("", Alignment::Left),
        TableColumn::new("#", Alignment::Right),
        TableColumn::new("Owner", Alignment::Left).with_max_width(32),
        TableColumn::new("Account ID", Alignment::Left).with_max_width(40),
        TableColumn::new("Balance", Alignment::Right),
    ]);
    table.rows = accounts
        .iter()
        .enumerate()
        .map(|(idx, account)| {
            let marker = if Some(account.id.as_str()) == selected_id {
                SELECTED_MARKER
            } else {
                ""
            };
            vec![
                marker.to_string(),
                (idx + 1).to_string(),
                account.owner.clone(),
                account.id.clone(),
                account.formatted_balance(),
            ]
        })
        .collect();
    table
}

pub fn render_account_list(accounts: &[Account], selected_id: Option<&str>) -> String {
    if accounts.is_empty() {
        return EMPTY_STATE.to_string();
    }
    account_table(accounts, selected_id).render()
}

/// The transaction panel for the current selection, or the placeholder when
/// nothing is selected.
pub fn render_transaction_form(
    form: &TransactionForm,
    selected: Option<&Account>,
    accounts: &[Account],
) -> String {
    let Some(account) = selected else {
        return NO_SELECTION.to_string();
    };

    let mut lines = vec![
        format!("Account: {}", account.owner),
        format!("Balance: {}", account.formatted_balance()),
        format!("Mode:    {}", mode_tabs(form.mode)),
        format!("Amount:  {}", blank_or(&form.amount)),
    ];

    if form.mode == TransactionKind::Transfer {
        let destination = accounts
            .iter()
            .find(|candidate| candidate.id == form.destination.trim())
            .map(Account::display_label)
            .unwrap_or_else(|| blank_or(&form.destination));
        lines.push(format!("To:      {}", destination));
        let choices = TransactionForm::destination_choices(accounts, account);
        if choices.is_empty() {
            lines.push("         (no other accounts)".to_string());
        }
    }

    if !form.can_submit() {
        lines.push("Choose a destination account before submitting.".to_string());
    }

    lines.join("\n")
}

fn mode_tabs(active: TransactionKind) -> String {
    TransactionKind::ALL
        .iter()
        .map(|kind| {
            if *kind == active {
                format!("[{}]", kind.label())
            } else {
                kind.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn blank_or(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.trim().to_string()
    }
}

/// Resolves a user argument to an account: an exact id match wins, otherwise
/// a 1-based index into the list.
pub fn resolve_account<'a>(accounts: &'a [Account], arg: &str) -> Option<&'a Account> {
    let arg = arg.trim();
    if let Some(account) = accounts.iter().find(|account| account.id == arg) {
        return Some(account);
    }
    arg.parse::<usize>()
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| accounts.get(index))
}
