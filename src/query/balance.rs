use super::{unexpected_answer, QueryBase, QueryKind};
use crate::hbar::Hbar;
use crate::ids::AccountId;
use crate::wire::{Answer, Method, QueryBody};
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub hbars: Hbar,
}

/// Free query for an account's balance. Never carries a payment.
#[derive(Debug, Clone)]
pub struct AccountBalanceQuery {
    base: QueryBase,
    account_id: AccountId,
}

impl AccountBalanceQuery {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            base: QueryBase::default(),
            account_id,
        }
    }
}

impl QueryKind for AccountBalanceQuery {
    type Output = AccountBalance;

    fn base(&self) -> &QueryBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.base
    }

    fn body(&self) -> Result<QueryBody> {
        Ok(QueryBody::CryptoGetBalance {
            account_id: self.account_id,
        })
    }

    fn method(&self) -> Method {
        Method::CryptoGetBalance
    }

    fn is_payment_required(&self) -> bool {
        false
    }

    fn map_answer(&self, answer: Option<Answer>) -> Result<AccountBalance> {
        match answer {
            Some(Answer::CryptoGetBalance { balance }) => Ok(balance),
            other => Err(unexpected_answer(self.method(), other.as_ref())),
        }
    }
}
