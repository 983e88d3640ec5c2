//! # ledger-exec
//!
//! Client-side execution engine for a replicated ledger network.
//!
//! ## Overview
//!
//! Every request type the network understands is dispatched the same way:
//! pick a node, send, read the node's provisional precheck code, retry or
//! stop. Paid queries are priced first with a cost-answer request and then
//! carry a signed fee transfer to the answering node. Transactions that a node
//! accepts are followed up by polling for their receipt.
//!
//! ## Key Features
//!
//! - **Unified Client**: [`Client`] holds the endpoint set, operator and limits
//! - **Execution Engine**: one retry/backoff state machine for all requests ([`client::execution`])
//! - **Query Payments**: cost estimation with a 25 tinybar floor and a payment ceiling ([`query`])
//! - **Receipts**: [`receipt::ReceiptPoller`] turns provisional acceptance into a final outcome
//! - **Node Health**: nodes failing at the transport level are skipped for a cooldown ([`network`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledger_exec::prelude::*;
//! use std::sync::Arc;
//!
//! # struct MySigner;
//! # impl Signer for MySigner {
//! #     fn public_key(&self) -> PublicKey { PublicKey::from_bytes(vec![0u8; 32]) }
//! #     fn sign(&self, _m: &[u8]) -> Vec<u8> { vec![] }
//! # }
//! #[tokio::main]
//! async fn main() -> ledger_exec::Result<()> {
//!     let client = Client::builder()
//!         .node(AccountId::new(0, 0, 3), "http://127.0.0.1:50211")
//!         .operator(AccountId::new(0, 0, 2), Arc::new(MySigner))
//!         .build()?;
//!
//!     let query = FileInfoQuery::new().file_id(FileId::new(0, 0, 150));
//!     let cost = query.get_cost(&client).await?;
//!     let info = query.query_payment(cost).execute(&client).await?;
//!     println!("{} is {} bytes", info.file_id, info.size);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, retry policy and the execution engine |
//! | [`network`] | Endpoint set, node selection and node health |
//! | [`query`] | Query builders, cost estimation and payments |
//! | [`transaction`] | Transaction builders and [`transaction::TransactionResponse`] |
//! | [`receipt`] | Receipts and the receipt poller |
//! | [`status`] | Response codes and their classification |
//! | [`transport`] | Channel abstraction and the HTTP gateway channel |
//! | [`wire`] | Request and response envelopes |
//! | [`config`] | YAML/JSON client configuration |

pub mod client;
pub mod config;
pub mod hbar;
pub mod ids;
pub mod key;
pub mod network;
pub mod prelude;
pub mod query;
pub mod receipt;
pub mod status;
pub mod transaction;
pub mod transport;
pub mod wire;

// Re-export main types for convenience
pub use client::{Client, ClientBuilder, RetryPolicy};
pub use config::ClientConfig;
pub use hbar::Hbar;
pub use ids::{AccountId, ContractId, FileId, TransactionId};
pub use key::{Operator, PublicKey, Signer};
pub use network::Network;
pub use query::{QueryExt, MIN_QUERY_COST};
pub use receipt::{ReceiptPoller, ReceiptState, TransactionReceipt};
pub use status::{Status, StatusClass};
pub use transaction::{TransactionExt, TransactionResponse};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
