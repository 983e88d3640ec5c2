//! Endpoint set: the nodes a request may be sent to.

pub mod health;

pub use health::{NodeHealth, NodeHealthConfig, NodeHealthSnapshot};

use crate::ids::AccountId;
use crate::transport::{Channel, HttpChannel};
use crate::{Error, ErrorContext, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A node and the channel used to reach it.
pub struct Endpoint {
    node_account_id: AccountId,
    channel: Arc<dyn Channel>,
    health: NodeHealth,
}

impl Endpoint {
    pub fn node_account_id(&self) -> AccountId {
        self.node_account_id
    }

    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    pub fn health(&self) -> &NodeHealth {
        &self.health
    }
}

/// Ordered, immutable set of endpoints shared by all operations of a client.
#[derive(Clone)]
pub struct Network {
    endpoints: Arc<Vec<Endpoint>>,
}

impl Network {
    pub fn new(nodes: impl IntoIterator<Item = (AccountId, Arc<dyn Channel>)>) -> Self {
        Self::with_health(nodes, NodeHealthConfig::default())
    }

    /// Duplicate node ids keep their first channel.
    pub fn with_health(
        nodes: impl IntoIterator<Item = (AccountId, Arc<dyn Channel>)>,
        health: NodeHealthConfig,
    ) -> Self {
        let mut endpoints: Vec<Endpoint> = Vec::new();
        for (node_account_id, channel) in nodes {
            if endpoints.iter().any(|e| e.node_account_id == node_account_id) {
                continue;
            }
            endpoints.push(Endpoint {
                node_account_id,
                channel,
                health: NodeHealth::new(health.clone()),
            });
        }
        Self {
            endpoints: Arc::new(endpoints),
        }
    }

    /// Build HTTP gateway channels from a `node -> address` map.
    pub fn from_addresses(
        addresses: &BTreeMap<AccountId, String>,
        health: NodeHealthConfig,
    ) -> Result<Self> {
        let mut nodes: Vec<(AccountId, Arc<dyn Channel>)> = Vec::with_capacity(addresses.len());
        for (id, address) in addresses {
            let channel: Arc<dyn Channel> = Arc::new(HttpChannel::new(address)?);
            nodes.push((*id, channel));
        }
        Ok(Self::with_health(nodes, health))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// All node ids, in configuration order.
    pub fn node_account_ids(&self) -> Vec<AccountId> {
        self.endpoints.iter().map(|e| e.node_account_id).collect()
    }

    pub fn endpoint(&self, node_account_id: &AccountId) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.node_account_id == *node_account_id)
    }

    /// Resolve the nodes a request may use: the explicit list if given, otherwise every node.
    pub fn candidates(&self, explicit: &[AccountId]) -> Result<Vec<AccountId>> {
        if explicit.is_empty() {
            if self.is_empty() {
                return Err(Error::configuration_with_context(
                    "network has no nodes",
                    ErrorContext::new()
                        .with_field_path("network")
                        .with_source("node_selector"),
                ));
            }
            return Ok(self.node_account_ids());
        }

        for id in explicit {
            if self.endpoint(id).is_none() {
                return Err(Error::configuration_with_context(
                    format!("node {id} is not part of the network"),
                    ErrorContext::new()
                        .with_field_path("node_account_ids")
                        .with_source("node_selector"),
                ));
            }
        }
        Ok(explicit.to_vec())
    }

    /// Pick the endpoint for `attempt`: round-robin over `candidates`, skipping
    /// nodes whose health breaker is open while a healthy one remains.
    pub fn select(&self, candidates: &[AccountId], attempt: usize) -> Option<&Endpoint> {
        if candidates.is_empty() {
            return None;
        }
        let start = attempt % candidates.len();
        let rotation = (0..candidates.len())
            .map(|offset| candidates[(start + offset) % candidates.len()])
            .filter_map(|id| self.endpoint(&id));

        let mut first = None;
        for endpoint in rotation {
            if endpoint.health.is_healthy() {
                return Some(endpoint);
            }
            first.get_or_insert(endpoint);
        }
        first
    }

    /// True once `attempt` completes a full rotation over `candidates`.
    pub fn is_exhausted(candidates: &[AccountId], attempt: usize) -> bool {
        !candidates.is_empty() && (attempt + 1) % candidates.len() == 0
    }

    pub fn health(&self) -> Vec<(AccountId, NodeHealthSnapshot)> {
        self.endpoints
            .iter()
            .map(|e| (e.node_account_id, e.health.snapshot()))
            .collect()
    }
}

impl std::fmt::Debug for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.node_account_ids()).finish()
    }
}
