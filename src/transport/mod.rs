//! Transport channels: one remote call per invocation.

pub mod http;

pub use http::HttpChannel;

use crate::wire::{Method, WireRequest, WireResponse};
use async_trait::async_trait;

/// A connection to a single node.
///
/// Implementations must be safe to share between concurrent operations; the
/// execution engine never holds a lock while a call is in flight.
#[async_trait]
pub trait Channel: Send + Sync {
    async fn call(
        &self,
        method: Method,
        request: WireRequest,
    ) -> std::result::Result<WireResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("node returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("attempt timed out after {0}ms")]
    Timeout(u128),

    #[error("node unavailable: {0}")]
    Unavailable(String),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Other(String),
}
