use super::{unexpected_answer, QueryBase, QueryKind};
use crate::hbar::Hbar;
use crate::ids::{AccountId, ContractId};
use crate::key::PublicKey;
use crate::wire::{Answer, Method, QueryBody};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Metadata of a deployed contract.
///
/// `admin_key` is `None` for an immutable contract; such a contract cannot be
/// updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub contract_id: ContractId,
    pub account_id: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_key: Option<PublicKey>,
    #[serde(default)]
    pub expiration_time_seconds: i64,
    #[serde(default)]
    pub storage: u64,
    #[serde(default)]
    pub contract_memo: String,
    #[serde(default)]
    pub balance: Hbar,
}

impl ContractInfo {
    pub fn is_immutable(&self) -> bool {
        self.admin_key.is_none()
    }
}

/// Paid query for [`ContractInfo`].
#[derive(Debug, Clone, Default)]
pub struct ContractInfoQuery {
    base: QueryBase,
    contract_id: Option<ContractId>,
}

impl ContractInfoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract_id(mut self, contract_id: ContractId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }
}

impl QueryKind for ContractInfoQuery {
    type Output = ContractInfo;

    fn base(&self) -> &QueryBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.base
    }

    fn body(&self) -> Result<QueryBody> {
        let contract_id = self.contract_id.ok_or_else(|| {
            Error::validation_with_context(
                "contract id is required",
                ErrorContext::new()
                    .with_field_path("contract_id")
                    .with_source("contract_info_query"),
            )
        })?;
        Ok(QueryBody::ContractGetInfo { contract_id })
    }

    fn method(&self) -> Method {
        Method::GetContractInfo
    }

    fn map_answer(&self, answer: Option<Answer>) -> Result<ContractInfo> {
        match answer {
            Some(Answer::ContractGetInfo { contract_info }) => Ok(contract_info),
            other => Err(unexpected_answer(self.method(), other.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn immutable_contract_has_no_admin_key() {
        let info: ContractInfo = serde_json::from_value(json!({
            "contract_id": "0.0.1001",
            "account_id": "0.0.1001",
            "balance": 0
        }))
        .unwrap();
        assert!(info.is_immutable());
        assert_eq!(info.contract_memo, "");
    }
}
