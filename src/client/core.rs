use crate::client::builder::ClientBuilder;
use crate::client::policy::RetryPolicy;
use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::key::Operator;
use crate::network::Network;
use crate::query::{AccountBalance, AccountBalanceQuery, QueryExt};
use crate::{Error, Result};
use std::time::Duration;

pub const DEFAULT_MAX_QUERY_PAYMENT: Hbar = Hbar::new(1);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_RECEIPT_POLLS: u32 = 30;
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Shared handle to a network plus the caller's operator and execution limits.
///
/// Cloning is cheap; clones share the same endpoints and node health.
#[derive(Clone)]
pub struct Client {
    pub(crate) network: Network,
    pub(crate) operator: Option<Operator>,
    pub(crate) max_query_payment: Hbar,
    pub(crate) policy: RetryPolicy,
    pub(crate) request_timeout: Option<Duration>,
    pub(crate) attempt_timeout: Option<Duration>,
    pub(crate) max_receipt_polls: u32,
    pub(crate) receipt_poll_interval: Duration,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    /// The operator, or [`Error::NoClientConfigured`] for anything that must be paid or signed.
    pub fn require_operator(&self) -> Result<&Operator> {
        self.operator.as_ref().ok_or(Error::NoClientConfigured)
    }

    /// Ceiling for automatically priced queries.
    pub fn max_query_payment(&self) -> Hbar {
        self.max_query_payment
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    pub fn max_receipt_polls(&self) -> u32 {
        self.max_receipt_polls
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        self.receipt_poll_interval
    }

    /// Free balance query pinned to one node; succeeds iff the node answers.
    pub async fn ping(&self, node_account_id: AccountId) -> Result<AccountBalance> {
        AccountBalanceQuery::new(node_account_id)
            .node_account_ids(vec![node_account_id])
            .execute(self)
            .await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("network", &self.network)
            .field("operator", &self.operator)
            .field("max_query_payment", &self.max_query_payment)
            .field("policy", &self.policy)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
