use crate::transport::{Channel, TransportError};
use crate::wire::{Method, RequestKind, Response, TransactionResponseBody, WireRequest, WireResponse};
use async_trait::async_trait;
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Channel to a node exposed through an HTTP/JSON gateway.
///
/// Each call is `POST {base_url}/{service}/{method}` with the JSON envelope as
/// body. The underlying `reqwest::Client` pools connections and is cheap to
/// share across concurrent operations.
pub struct HttpChannel {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChannel {
    pub fn new(base_url: &str) -> crate::Result<Self> {
        let parsed = url::Url::parse(base_url).map_err(|e| {
            crate::Error::configuration_with_context(
                format!("invalid node address {base_url:?}"),
                crate::ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("http_channel"),
            )
        })?;

        // Minimal production-friendly defaults (env-overridable).
        let timeout_secs = env::var("LEDGER_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(
                env::var("LEDGER_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(8),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Ok(proxy_url) = env::var("LEDGER_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, method: Method) -> String {
        format!("{}{}", self.base_url, method)
    }
}

#[async_trait]
impl Channel for HttpChannel {
    async fn call(
        &self,
        method: Method,
        request: WireRequest,
    ) -> Result<WireResponse, TransportError> {
        let url = self.url_for(method);
        let request_id = Uuid::new_v4().to_string();

        let req = match &request {
            WireRequest::Query(q) => self.client.post(&url).json(q),
            WireRequest::Transaction(t) => self.client.post(&url).json(t),
        };

        let resp = req
            .header("x-ledger-request-id", request_id.as_str())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            debug!(
                http_status = status.as_u16(),
                request_id = request_id.as_str(),
                url = url.as_str(),
                "node gateway rejected request"
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        match method.kind() {
            RequestKind::Query => serde_json::from_slice::<Response>(&bytes)
                .map(WireResponse::Query)
                .map_err(|e| TransportError::Decode(e.to_string())),
            RequestKind::Transaction => serde_json::from_slice::<TransactionResponseBody>(&bytes)
                .map(WireResponse::Transaction)
                .map_err(|e| TransportError::Decode(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_address() {
        assert!(HttpChannel::new("not a url").is_err());
    }

    #[test]
    fn builds_method_urls() {
        let ch = HttpChannel::new("http://127.0.0.1:50211/").unwrap();
        assert_eq!(ch.base_url(), "http://127.0.0.1:50211");
        assert_eq!(
            ch.url_for(Method::GetFileInfo),
            "http://127.0.0.1:50211/FileService/getFileInfo"
        );
    }
}
