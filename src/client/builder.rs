use crate::client::core::{
    Client, DEFAULT_MAX_QUERY_PAYMENT, DEFAULT_MAX_RECEIPT_POLLS, DEFAULT_RECEIPT_POLL_INTERVAL,
    DEFAULT_REQUEST_TIMEOUT,
};
use crate::client::policy::RetryPolicy;
use crate::config::ClientConfig;
use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::key::{Operator, Signer};
use crate::network::{Network, NodeHealthConfig};
use crate::{Error, ErrorContext, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`Client`].
///
/// Values set explicitly win; otherwise these env vars apply:
/// - `LEDGER_MAX_ATTEMPTS`
/// - `LEDGER_REQUEST_TIMEOUT_SECS` (`0` disables the deadline)
pub struct ClientBuilder {
    network: Option<Network>,
    addresses: BTreeMap<AccountId, String>,
    operator_account_id: Option<AccountId>,
    signer: Option<Arc<dyn Signer>>,
    max_query_payment: Option<Hbar>,
    policy: RetryPolicy,
    max_attempts: Option<u32>,
    request_timeout: Option<Option<Duration>>,
    attempt_timeout: Option<Duration>,
    max_receipt_polls: Option<u32>,
    receipt_poll_interval: Option<Duration>,
    node_health: NodeHealthConfig,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            network: None,
            addresses: BTreeMap::new(),
            operator_account_id: None,
            signer: None,
            max_query_payment: None,
            policy: RetryPolicy::default(),
            max_attempts: None,
            request_timeout: None,
            attempt_timeout: None,
            max_receipt_polls: None,
            receipt_poll_interval: None,
            node_health: NodeHealthConfig::default(),
        }
    }

    /// Seed a builder from a loaded config file. The signing key still has to
    /// be provided with [`ClientBuilder::signer`].
    pub fn from_config(cfg: &ClientConfig) -> Self {
        let mut b = Self::new();
        b.addresses = cfg.network.clone();
        b.operator_account_id = cfg.operator_account_id;
        b.max_query_payment = cfg.max_query_payment;
        b.max_attempts = cfg.max_attempts;
        if cfg.min_backoff_ms.is_some() || cfg.max_backoff_ms.is_some() {
            let min = cfg
                .min_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(b.policy.min_backoff);
            let max = cfg
                .max_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(b.policy.max_backoff);
            b.policy = b.policy.with_backoff(min, max);
        }
        b.request_timeout = cfg
            .request_timeout_ms
            .map(|ms| (ms > 0).then(|| Duration::from_millis(ms)));
        b.attempt_timeout = cfg
            .attempt_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis);
        b.max_receipt_polls = cfg.max_receipt_polls;
        b.receipt_poll_interval = cfg.receipt_poll_interval_ms.map(Duration::from_millis);
        b
    }

    /// Use a prebuilt endpoint set. Takes precedence over [`ClientBuilder::node`].
    pub fn network(mut self, network: Network) -> Self {
        self.network = Some(network);
        self
    }

    /// Add an HTTP gateway node.
    pub fn node(mut self, node_account_id: AccountId, address: impl Into<String>) -> Self {
        self.addresses.insert(node_account_id, address.into());
        self
    }

    pub fn operator(mut self, account_id: AccountId, signer: Arc<dyn Signer>) -> Self {
        self.operator_account_id = Some(account_id);
        self.signer = Some(signer);
        self
    }

    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn max_query_payment(mut self, max: Hbar) -> Self {
        self.max_query_payment = Some(max);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.max_attempts = Some(policy.max_attempts);
        self.policy = policy;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n.max(1));
        self
    }

    pub fn backoff(mut self, min: Duration, max: Duration) -> Self {
        self.policy = self.policy.with_backoff(min, max);
        self
    }

    /// Overall deadline for one execution. `None` disables it.
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn max_receipt_polls(mut self, n: u32) -> Self {
        self.max_receipt_polls = Some(n.max(1));
        self
    }

    pub fn receipt_poll_interval(mut self, interval: Duration) -> Self {
        self.receipt_poll_interval = Some(interval);
        self
    }

    pub fn node_health(mut self, cfg: NodeHealthConfig) -> Self {
        self.node_health = cfg;
        self
    }

    pub fn build(self) -> Result<Client> {
        let network = match self.network {
            Some(network) => network,
            None => Network::from_addresses(&self.addresses, self.node_health)?,
        };
        if network.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one network node is required",
                ErrorContext::new()
                    .with_field_path("network")
                    .with_source("client_builder"),
            ));
        }

        let operator = match (self.operator_account_id, self.signer) {
            (Some(account_id), Some(signer)) => Some(Operator::new(account_id, signer)),
            (None, None) => None,
            (Some(account_id), None) => {
                return Err(Error::configuration_with_context(
                    "operator account has no signer",
                    ErrorContext::new()
                        .with_field_path("operator")
                        .with_details(account_id.to_string())
                        .with_source("client_builder"),
                ))
            }
            (None, Some(_)) => {
                return Err(Error::configuration_with_context(
                    "signer provided without an operator account",
                    ErrorContext::new()
                        .with_field_path("operator_account_id")
                        .with_source("client_builder"),
                ))
            }
        };

        let max_attempts = self.max_attempts.or_else(|| {
            std::env::var("LEDGER_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
        });
        let policy = match max_attempts {
            Some(n) => self.policy.with_max_attempts(n),
            None => self.policy,
        };

        let request_timeout = self.request_timeout.unwrap_or_else(|| {
            match std::env::var("LEDGER_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
            {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => Some(DEFAULT_REQUEST_TIMEOUT),
            }
        });

        let max_query_payment = self.max_query_payment.unwrap_or(DEFAULT_MAX_QUERY_PAYMENT);
        if max_query_payment.to_tinybars() < 0 {
            return Err(Error::configuration_with_context(
                "max_query_payment must not be negative",
                ErrorContext::new()
                    .with_field_path("max_query_payment")
                    .with_source("client_builder"),
            ));
        }

        Ok(Client {
            network,
            operator,
            max_query_payment,
            policy,
            request_timeout,
            attempt_timeout: self.attempt_timeout,
            max_receipt_polls: self.max_receipt_polls.unwrap_or(DEFAULT_MAX_RECEIPT_POLLS),
            receipt_poll_interval: self
                .receipt_poll_interval
                .unwrap_or(DEFAULT_RECEIPT_POLL_INTERVAL),
        })
    }
}
