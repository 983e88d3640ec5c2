use crate::ids::TransactionId;
use crate::status::Status;
use crate::transport::TransportError;
use crate::Hbar;
use std::time::Duration;
use thiserror::Error;

/// Structured context attached to locally detected errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Configuration key or builder field that caused the error (e.g. "network.0.0.3")
    pub field_path: Option<String>,
    /// Additional detail (expected value, offending input)
    pub details: Option<String>,
    /// Component that raised the error (e.g. "config_loader", "node_selector")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Unified error type for request execution.
///
/// Network rejections keep the node's status text verbatim; local
/// misconfiguration is reported before anything is sent (and paid for).
#[derive(Debug, Error)]
pub enum Error {
    /// A paid request was attempted on a client without an operator.
    #[error("no client configured")]
    NoClientConfigured,

    /// The estimated query cost is above the allowed ceiling. Nothing was paid.
    #[error("cost of {cost} without explicit payment is greater than the max query payment of {max}")]
    MaxQueryPaymentExceeded { cost: Hbar, max: Hbar },

    /// A node rejected the request at precheck with a non-retryable status.
    #[error("exceptional precheck status {status}")]
    Precheck {
        status: Status,
        transaction_id: Option<TransactionId>,
    },

    /// The transaction reached consensus but finalized with a failure status.
    #[error("exceptional precheck status {status}")]
    ReceiptStatus {
        status: Status,
        transaction_id: TransactionId,
    },

    /// Every allowed attempt hit a retryable status or a transport failure.
    #[error("max attempts exceeded ({attempts}): {last}")]
    MaxAttemptsExceeded { attempts: u32, last: Box<Error> },

    /// The caller's deadline or poll budget elapsed.
    ///
    /// A transaction may still have been accepted by the network; that state is
    /// not reconciled by the client.
    #[error("operation timed out after {}ms", .elapsed.as_millis())]
    Timeout { elapsed: Duration },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// The network status carried by this error, if it came from a node.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Precheck { status, .. } | Error::ReceiptStatus { status, .. } => Some(*status),
            Error::MaxAttemptsExceeded { last, .. } => last.status(),
            _ => None,
        }
    }

    /// True for errors raised before any request reached the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::NoClientConfigured
                | Error::MaxQueryPaymentExceeded { .. }
                | Error::Configuration { .. }
                | Error::Validation { .. }
        )
    }
}
