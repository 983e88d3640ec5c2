//! State-changing transactions.
//!
//! A transaction is signed once per candidate node before the first attempt;
//! the engine then sends the copy bound to whichever node it selects.
//! Acceptance at precheck yields a [`TransactionResponse`], from which the
//! durable outcome is fetched with [`TransactionResponse::get_receipt`].

pub mod contract;
pub mod file;
pub mod transfer;

pub use contract::{ContractCreateTransaction, ContractDeleteTransaction};
pub use file::{FileCreateTransaction, FileDeleteTransaction};
pub use transfer::TransferTransaction;

use crate::client::{execute, Client, Executable};
use crate::hbar::Hbar;
use crate::ids::{AccountId, TransactionId};
use crate::key::Operator;
use crate::query::{QueryExt, TransactionReceiptQuery};
use crate::receipt::{ReceiptPoller, TransactionReceipt};
use crate::wire::{Method, SignedTransaction, TransactionBody, TransactionData, WireRequest, WireResponse};
use crate::{Error, ErrorContext, Result};
use sha2::{Digest, Sha384};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MAX_TRANSACTION_FEE: Hbar = Hbar::new(2);
pub const DEFAULT_VALID_DURATION: Duration = Duration::from_secs(120);

/// State shared by every transaction builder.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBase {
    pub node_account_ids: Vec<AccountId>,
    /// Generated from the operator at execution time when unset.
    pub transaction_id: Option<TransactionId>,
    pub max_transaction_fee: Option<Hbar>,
    pub memo: String,
    pub valid_duration: Duration,
}

impl Default for TransactionBase {
    fn default() -> Self {
        Self {
            node_account_ids: Vec::new(),
            transaction_id: None,
            max_transaction_fee: None,
            memo: String::new(),
            valid_duration: DEFAULT_VALID_DURATION,
        }
    }
}

/// The schema-specific half of a transaction.
pub trait TransactionKind: Send + Sync {
    fn base(&self) -> &TransactionBase;

    fn base_mut(&mut self) -> &mut TransactionBase;

    fn data(&self) -> Result<TransactionData>;

    fn method(&self) -> Method;

    fn default_max_transaction_fee(&self) -> Hbar {
        DEFAULT_MAX_TRANSACTION_FEE
    }
}

/// What a node returns when it accepts a transaction at precheck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    pub node_id: AccountId,
    pub transaction_id: TransactionId,
    /// SHA-384 of the signed body that was accepted.
    pub transaction_hash: Vec<u8>,
}

impl TransactionResponse {
    /// Wait for the receipt; a failed receipt is an [`Error::ReceiptStatus`].
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        ReceiptPoller::new(client, self.transaction_id, self.node_id)
            .poll()
            .await
    }

    pub fn receipt_poller<'a>(&self, client: &'a Client) -> ReceiptPoller<'a> {
        ReceiptPoller::new(client, self.transaction_id, self.node_id)
    }

    /// The bare receipt query, without status validation or polling.
    pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
        TransactionReceiptQuery::new(self.transaction_id).node_account_ids(vec![self.node_id])
    }
}

struct TransactionExecution {
    method: Method,
    node_account_ids: Vec<AccountId>,
    transaction_id: TransactionId,
    signed: HashMap<AccountId, SignedTransaction>,
}

impl TransactionExecution {
    fn signed_for(&self, node_account_id: &AccountId) -> Result<&SignedTransaction> {
        self.signed.get(node_account_id).ok_or_else(|| {
            Error::validation_with_context(
                format!("transaction was not signed for node {node_account_id}"),
                ErrorContext::new()
                    .with_field_path("node_account_ids")
                    .with_source("transaction_execution"),
            )
        })
    }
}

impl Executable for TransactionExecution {
    type Output = TransactionResponse;

    fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    fn method(&self) -> Method {
        self.method
    }

    fn make_request(&self, node_account_id: AccountId) -> Result<WireRequest> {
        Ok(WireRequest::Transaction(
            self.signed_for(&node_account_id)?.clone(),
        ))
    }

    fn map_response(
        &self,
        response: WireResponse,
        node_account_id: AccountId,
    ) -> Result<TransactionResponse> {
        if let WireResponse::Query(_) = response {
            return Err(Error::validation_with_context(
                "node answered a transaction with a query response",
                ErrorContext::new()
                    .with_details(node_account_id.to_string())
                    .with_source("transaction_execution"),
            ));
        }
        let signed = self.signed_for(&node_account_id)?;
        Ok(TransactionResponse {
            node_id: node_account_id,
            transaction_id: self.transaction_id,
            transaction_hash: Sha384::digest(&signed.body_bytes).to_vec(),
        })
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }
}

/// Freeze `tx` into one signed copy per node.
fn sign_for_nodes<T: TransactionKind>(
    tx: &T,
    operator: &Operator,
    transaction_id: TransactionId,
    nodes: &[AccountId],
) -> Result<HashMap<AccountId, SignedTransaction>> {
    let base = tx.base();
    let data = tx.data()?;
    let fee = base
        .max_transaction_fee
        .unwrap_or_else(|| tx.default_max_transaction_fee());

    nodes
        .iter()
        .map(|node| {
            let body = TransactionBody {
                transaction_id,
                node_account_id: *node,
                transaction_fee: fee,
                transaction_valid_duration_secs: base.valid_duration.as_secs(),
                memo: base.memo.clone(),
                data: data.clone(),
            };
            let body_bytes = serde_json::to_vec(&body)?;
            let sig = operator.sign(&body_bytes);
            Ok((
                *node,
                SignedTransaction {
                    body_bytes,
                    sig_map: vec![sig],
                },
            ))
        })
        .collect()
}

/// Shared transaction surface. Every [`TransactionKind`] gets it for free.
pub trait TransactionExt: TransactionKind + Sized {
    fn node_account_ids(mut self, ids: Vec<AccountId>) -> Self {
        self.base_mut().node_account_ids = ids;
        self
    }

    fn transaction_id(mut self, id: TransactionId) -> Self {
        self.base_mut().transaction_id = Some(id);
        self
    }

    fn max_transaction_fee(mut self, fee: Hbar) -> Self {
        self.base_mut().max_transaction_fee = Some(fee);
        self
    }

    fn transaction_memo(mut self, memo: impl Into<String>) -> Self {
        self.base_mut().memo = memo.into();
        self
    }

    fn transaction_valid_duration(mut self, duration: Duration) -> Self {
        self.base_mut().valid_duration = duration;
        self
    }

    /// Sign and submit. Resolves once a node accepts at precheck; the
    /// returned future is `Send`.
    fn execute<'a>(
        &'a self,
        client: &'a Client,
    ) -> impl Future<Output = Result<TransactionResponse>> + Send + 'a;
}

impl<T: TransactionKind> TransactionExt for T {
    async fn execute<'a>(&'a self, client: &'a Client) -> Result<TransactionResponse> {
        let operator = client.require_operator()?;
        let nodes = client.network().candidates(&self.base().node_account_ids)?;
        let transaction_id = self
            .base()
            .transaction_id
            .unwrap_or_else(|| TransactionId::generate(operator.account_id));
        let signed = sign_for_nodes(self, operator, transaction_id, &nodes)?;

        debug!(
            method = %self.method(),
            transaction_id = %transaction_id,
            nodes = nodes.len(),
            "submitting transaction"
        );
        let run = TransactionExecution {
            method: self.method(),
            node_account_ids: nodes,
            transaction_id,
            signed,
        };
        execute(client, &run).await
    }
}
