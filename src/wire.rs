//! Wire envelopes exchanged with network nodes.
//!
//! Queries travel as a [`Query`] (header + tagged body); transactions travel as
//! a [`SignedTransaction`] whose `body_bytes` are the serialized
//! [`TransactionBody`] that was signed. Binary fields are base64 in JSON.

use crate::hbar::Hbar;
use crate::ids::{AccountId, ContractId, FileId, TransactionId};
use crate::key::PublicKey;
use crate::query::{AccountBalance, ContractInfo, FileInfo};
use crate::receipt::TransactionReceipt;
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote procedures exposed by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GetFileInfo,
    GetContractInfo,
    CryptoGetBalance,
    GetTransactionReceipts,
    CreateFile,
    DeleteFile,
    CreateContract,
    DeleteContract,
    CryptoTransfer,
}

/// Whether a method expects a [`Query`] or a [`SignedTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Query,
    Transaction,
}

impl Method {
    pub fn service(&self) -> &'static str {
        match self {
            Method::GetFileInfo | Method::CreateFile | Method::DeleteFile => "FileService",
            Method::GetContractInfo | Method::CreateContract | Method::DeleteContract => {
                "SmartContractService"
            }
            Method::CryptoGetBalance | Method::GetTransactionReceipts | Method::CryptoTransfer => {
                "CryptoService"
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::GetFileInfo => "getFileInfo",
            Method::GetContractInfo => "getContractInfo",
            Method::CryptoGetBalance => "cryptoGetBalance",
            Method::GetTransactionReceipts => "getTransactionReceipts",
            Method::CreateFile => "createFile",
            Method::DeleteFile => "deleteFile",
            Method::CreateContract => "createContract",
            Method::DeleteContract => "deleteContract",
            Method::CryptoTransfer => "cryptoTransfer",
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Method::GetFileInfo
            | Method::GetContractInfo
            | Method::CryptoGetBalance
            | Method::GetTransactionReceipts => RequestKind::Query,
            _ => RequestKind::Transaction,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.service(), self.name())
    }
}

/// Whether a query should be answered or only priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseType {
    #[default]
    AnswerOnly,
    CostAnswer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<SignedTransaction>,
    #[serde(default)]
    pub response_type: ResponseType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryBody {
    FileGetInfo { file_id: FileId },
    ContractGetInfo { contract_id: ContractId },
    CryptoGetBalance { account_id: AccountId },
    TransactionGetReceipt { transaction_id: TransactionId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub header: QueryHeader,
    pub body: QueryBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub node_transaction_precheck_code: Status,
    #[serde(default)]
    pub response_type: ResponseType,
    /// Fee in tinybars the node requires to answer the query.
    #[serde(default)]
    pub cost: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Answer {
    FileGetInfo { file_info: FileInfo },
    ContractGetInfo { contract_info: ContractInfo },
    CryptoGetBalance { balance: AccountBalance },
    TransactionGetReceipt { receipt: TransactionReceipt },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub header: ResponseHeader,
    /// Absent for cost-answer queries and rejected queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAmount {
    pub account_id: AccountId,
    pub amount: Hbar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionData {
    CryptoTransfer {
        transfers: Vec<AccountAmount>,
    },
    FileCreate {
        keys: Vec<PublicKey>,
        #[serde(with = "base64_bytes")]
        contents: Vec<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expiration_time_seconds: Option<i64>,
    },
    FileDelete {
        file_id: FileId,
    },
    ContractCreate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_id: Option<FileId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        admin_key: Option<PublicKey>,
        gas: u64,
        initial_balance: Hbar,
        #[serde(with = "base64_bytes")]
        constructor_parameters: Vec<u8>,
        memo: String,
    },
    ContractDelete {
        contract_id: ContractId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transfer_account_id: Option<AccountId>,
    },
}

/// The signed portion of a transaction, bound to one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub transaction_id: TransactionId,
    pub node_account_id: AccountId,
    pub transaction_fee: Hbar,
    pub transaction_valid_duration_secs: u64,
    #[serde(default)]
    pub memo: String,
    pub data: TransactionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key: PublicKey,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    #[serde(with = "base64_bytes")]
    pub body_bytes: Vec<u8>,
    pub sig_map: Vec<SignaturePair>,
}

impl SignedTransaction {
    /// Decode the signed body.
    pub fn body(&self) -> crate::Result<TransactionBody> {
        Ok(serde_json::from_slice(&self.body_bytes)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponseBody {
    pub node_transaction_precheck_code: Status,
    #[serde(default)]
    pub cost: u64,
}

/// One request as handed to a [`Channel`](crate::transport::Channel).
#[derive(Debug, Clone, PartialEq)]
pub enum WireRequest {
    Query(Query),
    Transaction(SignedTransaction),
}

/// One decoded reply from a [`Channel`](crate::transport::Channel).
#[derive(Debug, Clone, PartialEq)]
pub enum WireResponse {
    Query(Response),
    Transaction(TransactionResponseBody),
}

impl WireResponse {
    pub fn precheck_code(&self) -> Status {
        match self {
            WireResponse::Query(r) => r.header.node_transaction_precheck_code,
            WireResponse::Transaction(r) => r.node_transaction_precheck_code,
        }
    }
}

/// serde adapter for binary fields as standard base64 strings.
pub mod base64_bytes {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
