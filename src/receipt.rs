//! Receipts and the poller that waits for them.
//!
//! A node accepting a transaction at precheck only means it will be submitted
//! to consensus. The durable outcome arrives later as a receipt, which the
//! [`ReceiptPoller`] fetches until it leaves the pending state.

use crate::client::Client;
use crate::ids::{AccountId, ContractId, FileId, TransactionId};
use crate::query::{QueryExt, TransactionReceiptQuery};
use crate::status::{classify, Status, StatusClass};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Finalized outcome of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<ContractId>,
}

/// Where a transaction stands from the poller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptState {
    /// Not final yet (`UNKNOWN`, or the node has no receipt yet).
    Pending,
    Success(TransactionReceipt),
    /// Reached consensus with a failure status.
    KnownFailure(TransactionReceipt),
    /// Poll budget or deadline ran out while still pending.
    TimedOut,
}

impl ReceiptState {
    pub fn is_final(&self) -> bool {
        !matches!(self, ReceiptState::Pending)
    }

    fn from_receipt(receipt: TransactionReceipt) -> Self {
        match classify(receipt.status) {
            StatusClass::Success => ReceiptState::Success(receipt),
            StatusClass::Retryable => ReceiptState::Pending,
            StatusClass::Fatal => ReceiptState::KnownFailure(receipt),
        }
    }
}

/// Polls one node for the receipt of one transaction.
///
/// Each poll is a single request: a node that has no receipt yet, or is busy,
/// costs one poll from the budget rather than a full retry cycle.
pub struct ReceiptPoller<'a> {
    client: &'a Client,
    /// Same network and limits as `client`, restricted to one attempt per request.
    single_attempt: Client,
    transaction_id: TransactionId,
    node_account_id: AccountId,
    max_polls: u32,
    interval: Duration,
    deadline: Option<Duration>,
}

impl<'a> ReceiptPoller<'a> {
    /// Poll budget, interval and deadline default to the client's settings.
    pub fn new(client: &'a Client, transaction_id: TransactionId, node_account_id: AccountId) -> Self {
        let mut single_attempt = client.clone();
        single_attempt.policy = client.policy.clone().with_max_attempts(1);
        Self {
            client,
            single_attempt,
            transaction_id,
            node_account_id,
            max_polls: client.max_receipt_polls(),
            interval: client.receipt_poll_interval(),
            deadline: client.request_timeout(),
        }
    }

    pub fn max_polls(mut self, n: u32) -> Self {
        self.max_polls = n.max(1);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// One receipt request. Never returns [`ReceiptState::TimedOut`].
    pub async fn poll_once(&self) -> Result<ReceiptState> {
        let query = TransactionReceiptQuery::new(self.transaction_id)
            .node_account_ids(vec![self.node_account_id]);
        match query.execute(&self.single_attempt).await {
            Ok(receipt) => Ok(ReceiptState::from_receipt(receipt)),
            // RECEIPT_NOT_FOUND, BUSY and friends.
            Err(e @ Error::MaxAttemptsExceeded { .. })
                if e.status().map(classify) == Some(StatusClass::Retryable) =>
            {
                debug!(transaction_id = %self.transaction_id, error = %e, "receipt not available yet");
                Ok(ReceiptState::Pending)
            }
            // The node did not answer this time; the next poll tries again.
            Err(Error::MaxAttemptsExceeded { last, .. }) if matches!(*last, Error::Transport(_)) => {
                warn!(
                    transaction_id = %self.transaction_id,
                    node = %self.node_account_id,
                    error = %last,
                    "receipt poll failed"
                );
                Ok(ReceiptState::Pending)
            }
            Err(e) => Err(e),
        }
    }

    /// Poll until the receipt is final or the budget runs out. Never returns
    /// [`ReceiptState::Pending`].
    pub async fn wait(&self) -> Result<ReceiptState> {
        let polling = self.poll_until_final();
        match self.deadline {
            Some(limit) => match tokio::time::timeout(limit, polling).await {
                Ok(state) => state,
                Err(_) => Ok(ReceiptState::TimedOut),
            },
            None => polling.await,
        }
    }

    async fn poll_until_final(&self) -> Result<ReceiptState> {
        let max_interval = self.client.retry_policy().max_backoff.max(self.interval);
        let mut interval = self.interval;

        for poll in 0..self.max_polls {
            let state = match self.poll_once().await {
                Ok(state) => state,
                Err(Error::Timeout { .. }) => return Ok(ReceiptState::TimedOut),
                Err(e) => return Err(e),
            };
            if state.is_final() {
                return Ok(state);
            }
            if poll + 1 < self.max_polls {
                debug!(
                    transaction_id = %self.transaction_id,
                    node = %self.node_account_id,
                    poll,
                    delay_ms = interval.as_millis(),
                    "receipt pending"
                );
                tokio::time::sleep(interval).await;
                interval = interval.saturating_mul(2).min(max_interval);
            }
        }
        Ok(ReceiptState::TimedOut)
    }

    /// Wait for the receipt and require it to be successful.
    ///
    /// A failed receipt becomes [`Error::ReceiptStatus`], rendered as
    /// `exceptional precheck status <CODE>`.
    pub async fn poll(&self) -> Result<TransactionReceipt> {
        let start = Instant::now();
        match self.wait().await? {
            ReceiptState::Success(receipt) => {
                info!(transaction_id = %self.transaction_id, status = %receipt.status, "receipt final");
                Ok(receipt)
            }
            ReceiptState::KnownFailure(receipt) => {
                info!(transaction_id = %self.transaction_id, status = %receipt.status, "transaction failed");
                Err(Error::ReceiptStatus {
                    status: receipt.status,
                    transaction_id: self.transaction_id,
                })
            }
            ReceiptState::TimedOut | ReceiptState::Pending => {
                warn!(
                    transaction_id = %self.transaction_id,
                    elapsed_ms = start.elapsed().as_millis(),
                    "gave up waiting for receipt"
                );
                Err(Error::Timeout {
                    elapsed: start.elapsed(),
                })
            }
        }
    }
}
