use super::{TransactionBase, TransactionKind};
use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::wire::{AccountAmount, Method, TransactionData};
use crate::{Error, ErrorContext, Result};

/// Move hbars between accounts. Amounts must balance to zero.
#[derive(Debug, Clone, Default)]
pub struct TransferTransaction {
    base: TransactionBase,
    transfers: Vec<AccountAmount>,
}

impl TransferTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `account_id`'s side of the transfer. Repeated accounts are merged.
    pub fn hbar_transfer(mut self, account_id: AccountId, amount: Hbar) -> Self {
        match self.transfers.iter_mut().find(|t| t.account_id == account_id) {
            Some(existing) => existing.amount = existing.amount + amount,
            None => self.transfers.push(AccountAmount { account_id, amount }),
        }
        self
    }

    pub fn transfers(&self) -> &[AccountAmount] {
        &self.transfers
    }
}

impl TransactionKind for TransferTransaction {
    fn base(&self) -> &TransactionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TransactionBase {
        &mut self.base
    }

    fn data(&self) -> Result<TransactionData> {
        let net = self
            .transfers
            .iter()
            .fold(Hbar::ZERO, |acc, t| acc + t.amount);
        if !net.is_zero() {
            return Err(Error::validation_with_context(
                "transfers do not balance",
                ErrorContext::new()
                    .with_field_path("transfers")
                    .with_details(format!("net {net}"))
                    .with_source("transfer_transaction"),
            ));
        }
        Ok(TransactionData::CryptoTransfer {
            transfers: self.transfers.clone(),
        })
    }

    fn method(&self) -> Method {
        Method::CryptoTransfer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_repeated_accounts() {
        let a = AccountId::new(0, 0, 2);
        let b = AccountId::new(0, 0, 1001);
        let tx = TransferTransaction::new()
            .hbar_transfer(a, Hbar::from_tinybars(-10))
            .hbar_transfer(b, Hbar::from_tinybars(10))
            .hbar_transfer(a, Hbar::from_tinybars(-5))
            .hbar_transfer(b, Hbar::from_tinybars(5));
        assert_eq!(tx.transfers().len(), 2);
        assert_eq!(tx.transfers()[0].amount, Hbar::from_tinybars(-15));
        assert!(tx.data().is_ok());
    }

    #[test]
    fn unbalanced_transfer_is_rejected_locally() {
        let tx = TransferTransaction::new()
            .hbar_transfer(AccountId::new(0, 0, 2), Hbar::from_tinybars(-10));
        assert!(tx.data().unwrap_err().is_local());
    }
}
