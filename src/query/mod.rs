//! Queries: read-only requests, optionally paid for with a fee-transfer sub-transaction.
//!
//! A concrete query embeds a [`QueryBase`] and implements [`QueryKind`]; the
//! [`QueryExt`] extension trait supplies the shared setters, cost estimation
//! and execution.

pub mod balance;
pub mod contract_info;
pub mod cost;
pub mod file_info;
pub mod payment;
pub mod receipt_query;

pub use balance::{AccountBalance, AccountBalanceQuery};
pub use contract_info::{ContractInfo, ContractInfoQuery};
pub use cost::MIN_QUERY_COST;
pub use file_info::{FileInfo, FileInfoQuery};
pub use receipt_query::TransactionReceiptQuery;

use crate::client::{execute, Client, Executable};
use crate::hbar::Hbar;
use crate::ids::{AccountId, TransactionId};
use crate::status::{classify, Status, StatusClass};
use crate::wire::{
    Answer, Method, Query, QueryBody, QueryHeader, Response, ResponseType, SignedTransaction,
    WireRequest, WireResponse,
};
use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// State shared by every query builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBase {
    pub node_account_ids: Vec<AccountId>,
    /// Explicit payment. When set, no cost estimate is made.
    pub payment_amount: Option<Hbar>,
    /// Per-query ceiling for estimated payments; falls back to the client's.
    pub max_query_payment: Option<Hbar>,
    pub payment_transaction_id: Option<TransactionId>,
}

/// The schema-specific half of a query.
pub trait QueryKind: Send + Sync {
    type Output: Send;

    fn base(&self) -> &QueryBase;

    fn base_mut(&mut self) -> &mut QueryBase;

    fn body(&self) -> Result<QueryBody>;

    fn method(&self) -> Method;

    /// Free queries carry no payment and skip cost estimation.
    fn is_payment_required(&self) -> bool {
        true
    }

    fn map_answer(&self, answer: Option<Answer>) -> Result<Self::Output>;
}

pub(crate) enum Payments {
    None,
    /// One payment reused for every node (cost-answer requests).
    Shared(SignedTransaction),
    PerNode(HashMap<AccountId, SignedTransaction>),
}

/// A query bound to a node list, response type and payments for one engine run.
pub(crate) struct QueryExecution<'a, Q: QueryKind> {
    pub(crate) query: &'a Q,
    pub(crate) node_account_ids: Vec<AccountId>,
    pub(crate) response_type: ResponseType,
    pub(crate) payments: Payments,
}

impl<Q: QueryKind> Executable for QueryExecution<'_, Q> {
    type Output = Response;

    fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    fn method(&self) -> Method {
        self.query.method()
    }

    fn make_request(&self, node_account_id: AccountId) -> Result<WireRequest> {
        let payment = match &self.payments {
            Payments::None => None,
            Payments::Shared(payment) => Some(payment.clone()),
            Payments::PerNode(by_node) => {
                let payment = by_node.get(&node_account_id).cloned().ok_or_else(|| {
                    Error::validation_with_context(
                        format!("no payment generated for node {node_account_id}"),
                        ErrorContext::new()
                            .with_field_path("payment")
                            .with_source("query_payment"),
                    )
                })?;
                Some(payment)
            }
        };
        Ok(WireRequest::Query(Query {
            header: QueryHeader {
                payment,
                response_type: self.response_type,
            },
            body: self.query.body()?,
        }))
    }

    fn classify(&self, status: Status) -> StatusClass {
        // A cost-answer reply still carries the cost even when the attached
        // zero payment is reported as insufficient.
        if self.response_type == ResponseType::CostAnswer && status == Status::InsufficientTxFee {
            return StatusClass::Success;
        }
        classify(status)
    }

    fn map_response(&self, response: WireResponse, node_account_id: AccountId) -> Result<Response> {
        match response {
            WireResponse::Query(response) => Ok(response),
            WireResponse::Transaction(_) => Err(Error::validation_with_context(
                "node answered a query with a transaction response",
                ErrorContext::new()
                    .with_details(node_account_id.to_string())
                    .with_source("query_execution"),
            )),
        }
    }
}

/// Shared query surface. Every [`QueryKind`] gets it for free.
pub trait QueryExt: QueryKind + Sized {
    /// Restrict execution to these nodes, tried in order.
    fn node_account_ids(mut self, ids: Vec<AccountId>) -> Self {
        self.base_mut().node_account_ids = ids;
        self
    }

    /// Pay exactly `amount` without estimating. An amount below the real cost
    /// is rejected by the node.
    fn query_payment(mut self, amount: Hbar) -> Self {
        self.base_mut().payment_amount = Some(amount);
        self
    }

    fn max_query_payment(mut self, max: Hbar) -> Self {
        self.base_mut().max_query_payment = Some(max);
        self
    }

    fn payment_transaction_id(mut self, id: TransactionId) -> Self {
        self.base_mut().payment_transaction_id = Some(id);
        self
    }

    /// Ask the network what this query costs. The returned future is `Send`.
    fn get_cost<'a>(&'a self, client: &'a Client) -> impl Future<Output = Result<Hbar>> + Send + 'a;

    /// Pay for (if needed) and run the query. The returned future is `Send`.
    fn execute<'a>(
        &'a self,
        client: &'a Client,
    ) -> impl Future<Output = Result<Self::Output>> + Send + 'a;
}

impl<Q: QueryKind> QueryExt for Q {
    async fn get_cost<'a>(&'a self, client: &'a Client) -> Result<Hbar> {
        cost::estimate(self, client).await
    }

    async fn execute<'a>(&'a self, client: &'a Client) -> Result<Q::Output> {
        let nodes = client.network().candidates(&self.base().node_account_ids)?;

        let payments = if self.is_payment_required() {
            let operator = client.require_operator()?;
            let amount = cost::resolve_payment(self, client).await?;
            let transaction_id = self
                .base()
                .payment_transaction_id
                .unwrap_or_else(|| TransactionId::generate(operator.account_id));
            debug!(
                method = %self.method(),
                amount = %amount,
                transaction_id = %transaction_id,
                nodes = nodes.len(),
                "generating query payments"
            );
            Payments::PerNode(payment::generate_payments(
                operator,
                transaction_id,
                &nodes,
                amount,
            )?)
        } else {
            Payments::None
        };

        let run = QueryExecution {
            query: self,
            node_account_ids: nodes,
            response_type: ResponseType::AnswerOnly,
            payments,
        };
        let response = execute(client, &run).await?;
        self.map_answer(response.answer)
    }
}

/// Error for a successful reply whose answer is missing or of another kind.
pub(crate) fn unexpected_answer(method: Method, answer: Option<&Answer>) -> Error {
    let details = match answer {
        Some(_) => "answer does not match the query",
        None => "answer missing",
    };
    Error::validation_with_context(
        format!("unexpected response to {method}"),
        ErrorContext::new()
            .with_details(details)
            .with_source("query_execution"),
    )
}
