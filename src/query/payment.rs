//! Fee-transfer sub-transactions attached to paid queries.

use crate::hbar::Hbar;
use crate::ids::{AccountId, TransactionId};
use crate::key::Operator;
use crate::wire::{AccountAmount, SignedTransaction, TransactionBody, TransactionData};
use crate::Result;
use std::collections::HashMap;

/// Network fee offered for the payment transfer itself.
pub const PAYMENT_TRANSACTION_FEE: Hbar = Hbar::new(1);
pub const PAYMENT_VALID_DURATION_SECS: u64 = 120;

/// Build and sign a transfer of `amount` from the operator to `node_account_id`.
pub fn make_payment_transaction(
    operator: &Operator,
    transaction_id: TransactionId,
    node_account_id: AccountId,
    amount: Hbar,
) -> Result<SignedTransaction> {
    let body = TransactionBody {
        transaction_id,
        node_account_id,
        transaction_fee: PAYMENT_TRANSACTION_FEE,
        transaction_valid_duration_secs: PAYMENT_VALID_DURATION_SECS,
        memo: String::new(),
        data: TransactionData::CryptoTransfer {
            transfers: vec![
                AccountAmount {
                    account_id: operator.account_id,
                    amount: -amount,
                },
                AccountAmount {
                    account_id: node_account_id,
                    amount,
                },
            ],
        },
    };
    let body_bytes = serde_json::to_vec(&body)?;
    let sig = operator.sign(&body_bytes);
    Ok(SignedTransaction {
        body_bytes,
        sig_map: vec![sig],
    })
}

/// One payment per node, all sharing `transaction_id`. Only the node that
/// answers ever submits its copy.
pub fn generate_payments(
    operator: &Operator,
    transaction_id: TransactionId,
    nodes: &[AccountId],
    amount: Hbar,
) -> Result<HashMap<AccountId, SignedTransaction>> {
    nodes
        .iter()
        .map(|node| {
            make_payment_transaction(operator, transaction_id, *node, amount)
                .map(|payment| (*node, payment))
        })
        .collect()
}
