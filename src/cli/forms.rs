//! Input forms for account creation and transactions.
//!
//! Forms hold raw text exactly as typed and only turn it into typed requests
//! on `submit`. A submission that fails validation is a no-op: nothing is
//! dispatched and the fields keep their contents.

use std::fmt;

use crate::domain::{Account, NewAccount, TransactionKind, TransactionRequest};

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Built-in validation helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    NonEmpty,
    /// Any finite number, negative values included.
    Decimal,
    /// A finite number strictly greater than zero.
    PositiveNumber,
}

impl Validator {
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::NonEmpty => {
                if input.trim().is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(input.trim().to_string())
                }
            }
            Validator::Decimal | Validator::PositiveNumber => {
                self.parse_amount(input).map(|value| value.to_string())
            }
        }
    }

    pub fn parse_amount(&self, input: &str) -> Result<f64, ValidationError> {
        let value = input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ValidationError::new("Enter a numeric value"))?;
        if *self == Validator::PositiveNumber && value <= 0.0 {
            return Err(ValidationError::new("Value must be greater than zero"));
        }
        Ok(value)
    }
}

/// Declarative description of a single form field, used to prompt for it.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub const fn new(key: &'static str, label: &'static str, validator: Validator) -> Self {
        Self {
            key,
            label,
            help: None,
            validator,
        }
    }
}

pub const OWNER_FIELD: FieldDescriptor =
    FieldDescriptor::new("owner", "Owner name", Validator::NonEmpty);
pub const INITIAL_DEPOSIT_FIELD: FieldDescriptor = FieldDescriptor {
    key: "initial_deposit",
    label: "Initial deposit",
    help: Some("The server decides whether the amount is acceptable."),
    validator: Validator::Decimal,
};
pub const AMOUNT_FIELD: FieldDescriptor =
    FieldDescriptor::new("amount", "Amount", Validator::PositiveNumber);

/// Account-creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    pub owner: String,
    pub initial_deposit: String,
}

impl AccountForm {
    pub fn new(owner: impl Into<String>, initial_deposit: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            initial_deposit: initial_deposit.into(),
        }
    }

    /// Returns the request and clears the form, or `None` when either field is
    /// empty or the deposit is not a finite number.
    pub fn submit(&mut self) -> Option<NewAccount> {
        let owner = OWNER_FIELD.validator.validate(&self.owner).ok()?;
        let deposit = INITIAL_DEPOSIT_FIELD
            .validator
            .parse_amount(&self.initial_deposit)
            .ok()?;
        self.clear();
        Some(NewAccount::new(owner, deposit))
    }

    pub fn clear(&mut self) {
        self.owner.clear();
        self.initial_deposit.clear();
    }

    /// Fields whose current text would make `submit` fail. A value kept from
    /// an earlier failed submit counts as needing input again.
    pub fn fields_needing_input(&self) -> Vec<&'static FieldDescriptor> {
        let mut pending = Vec::new();
        if OWNER_FIELD.validator.validate(&self.owner).is_err() {
            pending.push(&OWNER_FIELD);
        }
        if INITIAL_DEPOSIT_FIELD
            .validator
            .parse_amount(&self.initial_deposit)
            .is_err()
        {
            pending.push(&INITIAL_DEPOSIT_FIELD);
        }
        pending
    }

    pub fn set_field(&mut self, key: &str, value: String) {
        match key {
            "owner" => self.owner = value,
            "initial_deposit" => self.initial_deposit = value,
            _ => tracing::warn!(key, "unknown account form field"),
        }
    }
}

/// Transaction form targeting the selected account.
///
/// `mode` can move between any of the three kinds at any time; it only decides
/// which fields apply and which request `submit` builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub mode: TransactionKind,
    pub amount: String,
    pub destination: String,
}

impl TransactionForm {
    pub fn set_mode(&mut self, mode: TransactionKind) {
        self.mode = mode;
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn set_destination(&mut self, account_id: impl Into<String>) {
        self.destination = account_id.into();
    }

    /// Transfers cannot be submitted until a destination is chosen.
    pub fn can_submit(&self) -> bool {
        self.mode != TransactionKind::Transfer || !self.destination.trim().is_empty()
    }

    /// Builds the request for the current mode and clears amount and
    /// destination. Returns `None` without touching the fields when nothing is
    /// selected, the amount is not a positive number, or a transfer has no
    /// destination.
    pub fn submit(&mut self, selected: Option<&Account>) -> Option<TransactionRequest> {
        let account = selected?;
        let amount = AMOUNT_FIELD.validator.parse_amount(&self.amount).ok()?;
        let account_id = account.id.clone();
        let request = match self.mode {
            TransactionKind::Deposit => TransactionRequest::Deposit { account_id, amount },
            TransactionKind::Withdraw => TransactionRequest::Withdraw { account_id, amount },
            TransactionKind::Transfer => {
                let to_id = self.destination.trim();
                if to_id.is_empty() {
                    return None;
                }
                TransactionRequest::Transfer {
                    from_id: account_id,
                    to_id: to_id.to_string(),
                    amount,
                }
            }
        };
        self.amount.clear();
        self.destination.clear();
        Some(request)
    }

    /// Every account except the source.
    pub fn destination_choices<'a>(accounts: &'a [Account], selected: &Account) -> Vec<&'a Account> {
        accounts
            .iter()
            .filter(|account| account.id != selected.id)
            .collect()
    }
}
