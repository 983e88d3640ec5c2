//! Minimal prelude for application code.
//!
//! Brings in the client, the request builders and the extension traits that
//! give them `execute`.

pub use crate::client::{Client, ClientBuilder, RetryPolicy};
pub use crate::hbar::Hbar;
pub use crate::ids::{AccountId, ContractId, FileId, TransactionId};
pub use crate::key::{PublicKey, Signer};
pub use crate::query::{
    AccountBalanceQuery, ContractInfoQuery, FileInfoQuery, QueryExt, TransactionReceiptQuery,
};
pub use crate::receipt::{ReceiptPoller, ReceiptState, TransactionReceipt};
pub use crate::status::Status;
pub use crate::transaction::{
    ContractCreateTransaction, ContractDeleteTransaction, FileCreateTransaction,
    FileDeleteTransaction, TransactionExt, TransactionResponse, TransferTransaction,
};
pub use crate::{Error, Result};
