//! Cost estimation for paid queries.

use super::{payment, Payments, QueryExecution, QueryKind};
use crate::client::{execute, Client};
use crate::hbar::Hbar;
use crate::ids::{AccountId, TransactionId};
use crate::wire::ResponseType;
use crate::{Error, Result};
use tracing::{debug, info};

/// The smallest fee the network accepts for any paid query, in tinybars.
pub const MIN_QUERY_COST: Hbar = Hbar::from_tinybars(25);

/// Price `query` with a cost-answer request.
///
/// The request carries a zero-amount payment signed by the operator; nothing
/// is transferred. Answers below [`MIN_QUERY_COST`] are raised to it.
pub async fn estimate<Q: QueryKind>(query: &Q, client: &Client) -> Result<Hbar> {
    if !query.is_payment_required() {
        return Ok(Hbar::ZERO);
    }
    let operator = client.require_operator()?;
    let nodes = client.network().candidates(&query.base().node_account_ids)?;

    let zero_payment = payment::make_payment_transaction(
        operator,
        TransactionId::default(),
        AccountId::default(),
        Hbar::ZERO,
    )?;
    let run = QueryExecution {
        query,
        node_account_ids: nodes,
        response_type: ResponseType::CostAnswer,
        payments: Payments::Shared(zero_payment),
    };
    let response = execute(client, &run).await?;

    let reported = Hbar::from_tinybars(i64::try_from(response.header.cost).unwrap_or(i64::MAX));
    let cost = reported.max(MIN_QUERY_COST);
    debug!(method = %query.method(), reported = %reported, cost = %cost, "estimated query cost");
    Ok(cost)
}

/// Decide how much to pay for `query`.
///
/// An explicit payment is used as is. Otherwise the estimate must not exceed
/// the query's ceiling (or the client's); exceeding it fails before any
/// payment-bearing request is sent.
pub async fn resolve_payment<Q: QueryKind>(query: &Q, client: &Client) -> Result<Hbar> {
    if let Some(amount) = query.base().payment_amount {
        return Ok(amount);
    }

    let max = query
        .base()
        .max_query_payment
        .unwrap_or_else(|| client.max_query_payment());
    let cost = estimate(query, client).await?;
    if cost > max {
        info!(method = %query.method(), cost = %cost, max = %max, "query cost above ceiling");
        return Err(Error::MaxQueryPaymentExceeded { cost, max });
    }
    Ok(cost)
}
