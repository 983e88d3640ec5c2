use super::{unexpected_answer, QueryBase, QueryKind};
use crate::ids::TransactionId;
use crate::receipt::TransactionReceipt;
use crate::wire::{Answer, Method, QueryBody};
use crate::Result;

/// Free query for a transaction's receipt.
///
/// Returns whatever receipt the node currently has, including a pending
/// (`UNKNOWN`) or failed one; status interpretation is left to the caller or
/// to [`ReceiptPoller`](crate::receipt::ReceiptPoller).
#[derive(Debug, Clone)]
pub struct TransactionReceiptQuery {
    base: QueryBase,
    transaction_id: TransactionId,
}

impl TransactionReceiptQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            base: QueryBase::default(),
            transaction_id,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }
}

impl QueryKind for TransactionReceiptQuery {
    type Output = TransactionReceipt;

    fn base(&self) -> &QueryBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.base
    }

    fn body(&self) -> Result<QueryBody> {
        Ok(QueryBody::TransactionGetReceipt {
            transaction_id: self.transaction_id,
        })
    }

    fn method(&self) -> Method {
        Method::GetTransactionReceipts
    }

    fn is_payment_required(&self) -> bool {
        false
    }

    fn map_answer(&self, answer: Option<Answer>) -> Result<TransactionReceipt> {
        match answer {
            Some(Answer::TransactionGetReceipt { receipt }) => Ok(receipt),
            other => Err(unexpected_answer(self.method(), other.as_ref())),
        }
    }
}
