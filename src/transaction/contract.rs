use super::{TransactionBase, TransactionKind};
use crate::hbar::Hbar;
use crate::ids::{AccountId, ContractId, FileId};
use crate::key::PublicKey;
use crate::wire::{Method, TransactionData};
use crate::{Error, ErrorContext, Result};

/// Deploy a contract from bytecode previously stored in a file.
///
/// Nothing is checked locally: a missing bytecode file or too little gas is
/// reported by the network in the receipt (`INVALID_FILE_ID`,
/// `INSUFFICIENT_GAS`). Without an admin key the contract is immutable.
#[derive(Debug, Clone, Default)]
pub struct ContractCreateTransaction {
    base: TransactionBase,
    bytecode_file_id: Option<FileId>,
    admin_key: Option<PublicKey>,
    gas: u64,
    initial_balance: Hbar,
    constructor_parameters: Vec<u8>,
    contract_memo: String,
}

impl ContractCreateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytecode_file_id(mut self, file_id: FileId) -> Self {
        self.bytecode_file_id = Some(file_id);
        self
    }

    pub fn admin_key(mut self, key: PublicKey) -> Self {
        self.admin_key = Some(key);
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn initial_balance(mut self, balance: Hbar) -> Self {
        self.initial_balance = balance;
        self
    }

    pub fn constructor_parameters(mut self, params: impl Into<Vec<u8>>) -> Self {
        self.constructor_parameters = params.into();
        self
    }

    pub fn contract_memo(mut self, memo: impl Into<String>) -> Self {
        self.contract_memo = memo.into();
        self
    }
}

impl TransactionKind for ContractCreateTransaction {
    fn base(&self) -> &TransactionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TransactionBase {
        &mut self.base
    }

    fn data(&self) -> Result<TransactionData> {
        Ok(TransactionData::ContractCreate {
            file_id: self.bytecode_file_id,
            admin_key: self.admin_key.clone(),
            gas: self.gas,
            initial_balance: self.initial_balance,
            constructor_parameters: self.constructor_parameters.clone(),
            memo: self.contract_memo.clone(),
        })
    }

    fn method(&self) -> Method {
        Method::CreateContract
    }

    fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::new(20)
    }
}

/// Delete a contract, optionally sweeping its balance to an account.
#[derive(Debug, Clone, Default)]
pub struct ContractDeleteTransaction {
    base: TransactionBase,
    contract_id: Option<ContractId>,
    transfer_account_id: Option<AccountId>,
}

impl ContractDeleteTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract_id(mut self, contract_id: ContractId) -> Self {
        self.contract_id = Some(contract_id);
        self
    }

    pub fn transfer_account_id(mut self, account_id: AccountId) -> Self {
        self.transfer_account_id = Some(account_id);
        self
    }
}

impl TransactionKind for ContractDeleteTransaction {
    fn base(&self) -> &TransactionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TransactionBase {
        &mut self.base
    }

    fn data(&self) -> Result<TransactionData> {
        let contract_id = self.contract_id.ok_or_else(|| {
            Error::validation_with_context(
                "contract id is required",
                ErrorContext::new()
                    .with_field_path("contract_id")
                    .with_source("contract_delete_transaction"),
            )
        })?;
        Ok(TransactionData::ContractDelete {
            contract_id,
            transfer_account_id: self.transfer_account_id,
        })
    }

    fn method(&self) -> Method {
        Method::DeleteContract
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_without_bytecode_is_forwarded() {
        let data = ContractCreateTransaction::new().gas(2000).data().unwrap();
        match data {
            TransactionData::ContractCreate { file_id, admin_key, gas, .. } => {
                assert_eq!(file_id, None);
                assert_eq!(admin_key, None);
                assert_eq!(gas, 2000);
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[test]
    fn delete_requires_contract_id() {
        let err = ContractDeleteTransaction::new().data().unwrap_err();
        assert!(err.is_local());
    }
}
