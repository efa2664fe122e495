use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The three money movements the server exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Deposit,
        TransactionKind::Withdraw,
        TransactionKind::Transfer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Transfer => "transfer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit",
            TransactionKind::Withdraw => "Withdraw",
            TransactionKind::Transfer => "Transfer",
        }
    }

    /// Fixed message shown when the request never produced a usable response.
    pub fn failure_message(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Failed to deposit",
            TransactionKind::Withdraw => "Failed to withdraw",
            TransactionKind::Transfer => "Failed to transfer",
        }
    }

    /// Shown when the server accepts the operation without a message.
    pub fn success_fallback(self) -> &'static str {
        match self {
            TransactionKind::Deposit => "Deposit successful",
            TransactionKind::Withdraw => "Withdrawal successful",
            TransactionKind::Transfer => "Transfer successful",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" | "withdrawal" => Ok(TransactionKind::Withdraw),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(format!(
                "unknown transaction type `{}` (expected deposit, withdraw, or transfer)",
                other
            )),
        }
    }
}

/// A validated transaction ready to be sent to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionRequest {
    Deposit {
        account_id: String,
        amount: f64,
    },
    Withdraw {
        account_id: String,
        amount: f64,
    },
    Transfer {
        from_id: String,
        to_id: String,
        amount: f64,
    },
}

impl TransactionRequest {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionRequest::Deposit { .. } => TransactionKind::Deposit,
            TransactionRequest::Withdraw { .. } => TransactionKind::Withdraw,
            TransactionRequest::Transfer { .. } => TransactionKind::Transfer,
        }
    }

    /// The account whose balance the server reports back.
    pub fn source_id(&self) -> &str {
        match self {
            TransactionRequest::Deposit { account_id, .. }
            | TransactionRequest::Withdraw { account_id, .. } => account_id,
            TransactionRequest::Transfer { from_id, .. } => from_id,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            TransactionRequest::Deposit { amount, .. }
            | TransactionRequest::Withdraw { amount, .. }
            | TransactionRequest::Transfer { amount, .. } => *amount,
        }
    }
}

/// Body of every account-scoped `POST`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AmountRequest {
    pub amount: f64,
}

/// Server reply to deposit, withdraw, and transfer.
///
/// `success: false` is a business rejection such as insufficient funds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionResult {
    pub fn accepted(message: impl Into<String>, balance: Option<f64>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            balance,
            error: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            balance: None,
            error: None,
        }
    }

    /// Text to surface for a rejection: `error` wins over `message`.
    pub fn rejection_text(&self) -> Option<&str> {
        non_empty(self.error.as_deref()).or_else(|| non_empty(self.message.as_deref()))
    }

    pub fn success_text(&self) -> Option<&str> {
        non_empty(self.message.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
