pub mod account;
pub mod transaction;

pub use account::{format_amount, Account, NewAccount};
pub use transaction::{AmountRequest, TransactionKind, TransactionRequest, TransactionResult};
