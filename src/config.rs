//! File-based client configuration.
//!
//! ```yaml
//! network:
//!   "0.0.3": "http://127.0.0.1:50211"
//!   "0.0.4": "http://127.0.0.1:50212"
//! operator_account_id: "0.0.2"
//! max_query_payment: 100000000   # tinybars
//! max_attempts: 10
//! min_backoff_ms: 250
//! max_backoff_ms: 8000
//! request_timeout_ms: 120000
//! ```
//!
//! YAML and JSON are both accepted; the format is picked from the file
//! extension (`.json` is JSON, anything else is YAML).

use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Node account id -> gateway address.
    pub network: BTreeMap<AccountId, String>,
    /// Paying account. The signing key is supplied separately through the builder.
    #[serde(default)]
    pub operator_account_id: Option<AccountId>,
    #[serde(default)]
    pub max_query_payment: Option<Hbar>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub min_backoff_ms: Option<u64>,
    #[serde(default)]
    pub max_backoff_ms: Option<u64>,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub attempt_timeout_ms: Option<u64>,
    #[serde(default)]
    pub max_receipt_polls: Option<u32>,
    #[serde(default)]
    pub receipt_poll_interval_ms: Option<u64>,
}

impl ClientConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: ClientConfig = serde_yaml::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                "failed to parse YAML client config",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: ClientConfig = serde_json::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                "failed to parse JSON client config",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("config_loader"),
            )
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.network.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one network node is required",
                ErrorContext::new()
                    .with_field_path("network")
                    .with_source("config_loader"),
            ));
        }
        if let Some(max) = self.max_query_payment {
            if max.to_tinybars() < 0 {
                return Err(Error::configuration_with_context(
                    "max_query_payment must not be negative",
                    ErrorContext::new()
                        .with_field_path("max_query_payment")
                        .with_source("config_loader"),
                ));
            }
        }
        if self.max_attempts == Some(0) {
            return Err(Error::configuration_with_context(
                "max_attempts must be at least 1",
                ErrorContext::new()
                    .with_field_path("max_attempts")
                    .with_source("config_loader"),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_backoff_ms, self.max_backoff_ms) {
            if min > max {
                return Err(Error::configuration_with_context(
                    "min_backoff_ms must not exceed max_backoff_ms",
                    ErrorContext::new()
                        .with_field_path("min_backoff_ms")
                        .with_details(format!("{min} > {max}"))
                        .with_source("config_loader"),
                ));
            }
        }
        Ok(())
    }
}
