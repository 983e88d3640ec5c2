//! End-to-end contract and file flows against the in-process ledger.

mod common;

use common::{client, MockLedger};
use ledger_exec::prelude::*;
use ledger_exec::MIN_QUERY_COST;

async fn upload_bytecode(client: &Client) -> FileId {
    FileCreateTransaction::new()
        .keys([common::TestSigner.public_key()])
        .contents(vec![0x60, 0x80, 0x60, 0x40, 0x52])
        .execute(client)
        .await
        .unwrap()
        .get_receipt(client)
        .await
        .unwrap()
        .file_id
        .unwrap()
}

#[tokio::test]
async fn deleting_an_immutable_contract_fails() {
    let ledger = MockLedger::new();
    let client = client(&ledger, 2);
    let bytecode = upload_bytecode(&client).await;

    let contract_id = ContractCreateTransaction::new()
        .bytecode_file_id(bytecode)
        .gas(100_000)
        .contract_memo("immutable")
        .execute(&client)
        .await
        .unwrap()
        .get_receipt(&client)
        .await
        .unwrap()
        .contract_id
        .unwrap();

    let info = ContractInfoQuery::new()
        .contract_id(contract_id)
        .execute(&client)
        .await
        .unwrap();
    assert_eq!(info.contract_id, contract_id);
    assert!(info.is_immutable());
    assert_eq!(info.contract_memo, "immutable");

    let response = ContractDeleteTransaction::new()
        .contract_id(contract_id)
        .execute(&client)
        .await
        .unwrap();
    let err = response.get_receipt(&client).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "exceptional precheck status MODIFYING_IMMUTABLE_CONTRACT"
    );
    assert!(ledger.contract(contract_id).is_some());
}

#[tokio::test]
async fn contract_with_admin_key_can_be_deleted() {
    let ledger = MockLedger::new();
    let client = client(&ledger, 2);
    let bytecode = upload_bytecode(&client).await;

    let contract_id = ContractCreateTransaction::new()
        .bytecode_file_id(bytecode)
        .admin_key(common::TestSigner.public_key())
        .gas(100_000)
        .execute(&client)
        .await
        .unwrap()
        .get_receipt(&client)
        .await
        .unwrap()
        .contract_id
        .unwrap();

    let receipt = ContractDeleteTransaction::new()
        .contract_id(contract_id)
        .transfer_account_id(common::OPERATOR)
        .execute(&client)
        .await
        .unwrap()
        .get_receipt(&client)
        .await
        .unwrap();
    assert_eq!(receipt.status, Status::Success);
    assert!(ledger.contract(contract_id).is_none());
}

#[tokio::test]
async fn too_little_gas_fails_in_the_receipt() {
    let ledger = MockLedger::new();
    let client = client(&ledger, 2);
    let bytecode = upload_bytecode(&client).await;

    let response = ContractCreateTransaction::new()
        .bytecode_file_id(bytecode)
        .gas(2000)
        .execute(&client)
        .await
        .unwrap();
    let err = response.get_receipt(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "exceptional precheck status INSUFFICIENT_GAS");
}

#[tokio::test]
async fn missing_bytecode_file_fails_in_the_receipt() {
    let ledger = MockLedger::new();
    let client = client(&ledger, 2);

    let response = ContractCreateTransaction::new()
        .gas(100_000)
        .execute(&client)
        .await
        .unwrap();
    let err = response.get_receipt(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "exceptional precheck status INVALID_FILE_ID");
}

#[tokio::test]
async fn file_info_paid_at_its_estimate() {
    let ledger = MockLedger::new();
    let client = client(&ledger, 3);

    let file_id = FileCreateTransaction::new()
        .keys([common::TestSigner.public_key()])
        .contents(b"Hello, World".to_vec())
        .transaction_memo("file info test")
        .execute(&client)
        .await
        .unwrap()
        .get_receipt(&client)
        .await
        .unwrap()
        .file_id
        .unwrap();

    let query = FileInfoQuery::new().file_id(file_id);
    let cost = query.get_cost(&client).await.unwrap();
    assert!(cost >= MIN_QUERY_COST);

    let info = query.query_payment(cost).execute(&client).await.unwrap();
    assert_eq!(info.file_id, file_id);
    assert_eq!(info.size, 12);
    assert!(!info.deleted);
    assert_eq!(info.keys, vec![common::TestSigner.public_key()]);
}

#[tokio::test]
async fn deleted_file_is_reported_as_deleted() {
    let ledger = MockLedger::new();
    let client = client(&ledger, 1);
    let file_id = upload_bytecode(&client).await;

    let receipt = FileDeleteTransaction::new()
        .file_id(file_id)
        .execute(&client)
        .await
        .unwrap()
        .get_receipt(&client)
        .await
        .unwrap();
    assert_eq!(receipt.status, Status::Success);

    let info = FileInfoQuery::new()
        .file_id(file_id)
        .execute(&client)
        .await
        .unwrap();
    assert!(info.deleted);
}
