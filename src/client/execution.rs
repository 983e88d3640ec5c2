//! Request execution: the attempt loop shared by every query and transaction.
//!
//! One execution walks an explicit state machine:
//!
//! ```text
//! Selecting -> Sending -> Classifying -> Terminal
//!     ^           |            |
//!     |           v            v
//!     +------- Backoff <-------+
//! ```
//!
//! Attempts are strictly sequential. The optional per-attempt timeout bounds a
//! single call; the client's request timeout bounds the whole loop, including
//! backoff sleeps.

use crate::client::policy::{AttemptFailure, Decision};
use crate::client::Client;
use crate::ids::{AccountId, TransactionId};
use crate::network::Network;
use crate::status::{classify, Status, StatusClass};
use crate::transport::TransportError;
use crate::wire::{Method, WireRequest, WireResponse};
use crate::{Error, ErrorContext, Result};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What the engine needs from a concrete request kind.
///
/// Implementations stay schema-specific; the engine never looks inside the
/// payload.
pub trait Executable: Send + Sync {
    type Output: Send;

    /// Explicitly requested nodes. Empty means "any node in the network".
    fn node_account_ids(&self) -> &[AccountId];

    fn method(&self) -> Method;

    /// Serialize the envelope addressed to `node_account_id`.
    fn make_request(&self, node_account_id: AccountId) -> Result<WireRequest>;

    fn response_status(&self, response: &WireResponse) -> Status {
        response.precheck_code()
    }

    fn classify(&self, status: Status) -> StatusClass {
        classify(status)
    }

    fn map_response(&self, response: WireResponse, node_account_id: AccountId)
        -> Result<Self::Output>;

    /// Transaction id reported with precheck errors, if any.
    fn transaction_id(&self) -> Option<TransactionId> {
        None
    }
}

enum State<T> {
    Selecting,
    Sending { node: AccountId },
    Classifying { node: AccountId, response: WireResponse },
    Backoff { delay: Duration },
    /// Attempt budget spent; `last` is the failure of the final attempt.
    Exhausted { last: Error },
    Terminal(Result<T>),
}

/// Drive `request` to a terminal outcome.
pub async fn execute<E: Executable>(client: &Client, request: &E) -> Result<E::Output> {
    let start = Instant::now();
    let attempts = run(client, request);

    match client.request_timeout {
        Some(limit) => match tokio::time::timeout(limit, attempts).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    method = %request.method(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "request deadline elapsed"
                );
                Err(Error::Timeout {
                    elapsed: start.elapsed(),
                })
            }
        },
        None => attempts.await,
    }
}

async fn run<E: Executable>(client: &Client, request: &E) -> Result<E::Output> {
    let candidates = client.network.candidates(request.node_account_ids())?;
    let policy = &client.policy;
    let method = request.method();

    let mut attempt: u32 = 0;
    let mut state: State<E::Output> = State::Selecting;

    loop {
        state = match state {
            State::Selecting => match client.network.select(&candidates, attempt as usize) {
                Some(endpoint) => State::Sending {
                    node: endpoint.node_account_id(),
                },
                None => State::Terminal(Err(Error::configuration_with_context(
                    "no node available for request",
                    ErrorContext::new().with_source("node_selector"),
                ))),
            },

            State::Sending { node } => {
                let Some(endpoint) = client.network.endpoint(&node) else {
                    return Err(Error::configuration_with_context(
                        format!("node {node} is not part of the network"),
                        ErrorContext::new().with_source("node_selector"),
                    ));
                };
                let wire = request.make_request(node)?;

                debug!(method = %method, node = %node, attempt, "sending request");
                let call_start = Instant::now();
                let call = endpoint.channel().call(method, wire);
                let outcome = match client.attempt_timeout {
                    Some(limit) => tokio::time::timeout(limit, call)
                        .await
                        .unwrap_or_else(|_| Err(TransportError::Timeout(limit.as_millis()))),
                    None => call.await,
                };

                match outcome {
                    Ok(response) => {
                        endpoint.health().on_success();
                        State::Classifying { node, response }
                    }
                    Err(e) => {
                        endpoint.health().on_failure();
                        warn!(
                            method = %method,
                            node = %node,
                            attempt,
                            duration_ms = call_start.elapsed().as_millis(),
                            error = %e,
                            "transport failure, moving to next node"
                        );
                        let rotation_complete =
                            Network::is_exhausted(&candidates, attempt as usize);
                        let rotation = attempt / candidates.len().max(1) as u32;
                        let failure = AttemptFailure::Transport { rotation_complete };
                        let decision = policy.decide(failure, attempt, rotation);
                        after_failure(decision, Error::Transport(e))
                    }
                }
            }

            State::Classifying { node, response } => {
                let status = request.response_status(&response);
                match request.classify(status) {
                    StatusClass::Success => {
                        debug!(method = %method, node = %node, attempt, status = %status, "request accepted");
                        State::Terminal(request.map_response(response, node))
                    }
                    StatusClass::Retryable => {
                        debug!(method = %method, node = %node, attempt, status = %status, "retryable precheck status");
                        let decision = policy.decide(AttemptFailure::RetryableStatus, attempt, 0);
                        let failure = Error::Precheck {
                            status,
                            transaction_id: request.transaction_id(),
                        };
                        after_failure(decision, failure)
                    }
                    StatusClass::Fatal => {
                        info!(method = %method, node = %node, attempt, status = %status, "request rejected at precheck");
                        State::Terminal(Err(Error::Precheck {
                            status,
                            transaction_id: request.transaction_id(),
                        }))
                    }
                }
            }

            State::Backoff { delay } => {
                if !delay.is_zero() {
                    debug!(method = %method, attempt, delay_ms = delay.as_millis(), "backing off");
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
                State::Selecting
            }

            State::Exhausted { last } => {
                info!(method = %method, attempts = attempt + 1, error = %last, "attempt budget exhausted");
                return Err(Error::MaxAttemptsExceeded {
                    attempts: attempt + 1,
                    last: Box::new(last),
                });
            }

            State::Terminal(result) => return result,
        };
    }
}

fn after_failure<T>(decision: Decision, failure: Error) -> State<T> {
    match decision {
        Decision::Retry { delay } => State::Backoff { delay },
        Decision::Fail => State::Exhausted { last: failure },
    }
}
