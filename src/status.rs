//! Network response codes and their retry classification.
//!
//! Every response from a node carries one of these codes, either as the
//! precheck result of a query/transaction or as the final status inside a
//! receipt. Codes travel on the wire either as their numeric value or as the
//! canonical `SCREAMING_SNAKE_CASE` name.
//!
//! ```rust
//! use ledger_exec::status::{classify, Status, StatusClass};
//!
//! let status = Status::from_code(67);
//! assert_eq!(status, Status::PlatformNotActive);
//! assert_eq!(status.to_string(), "PLATFORM_NOT_ACTIVE");
//! assert_eq!(classify(status), StatusClass::Retryable);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

/// A response code reported by a network node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Ok,
    InvalidTransaction,
    PayerAccountNotFound,
    InvalidNodeAccount,
    TransactionExpired,
    InvalidTransactionStart,
    InvalidTransactionDuration,
    InvalidSignature,
    MemoTooLong,
    InsufficientTxFee,
    InsufficientPayerBalance,
    DuplicateTransaction,
    Busy,
    NotSupported,
    InvalidFileId,
    InvalidAccountId,
    InvalidContractId,
    InvalidTransactionId,
    ReceiptNotFound,
    RecordNotFound,
    InvalidSolidityId,
    Unknown,
    Success,
    FailInvalid,
    FailFee,
    FailBalance,
    KeyRequired,
    BadEncoding,
    InsufficientAccountBalance,
    InvalidSolidityAddress,
    InsufficientGas,
    ContractSizeLimitExceeded,
    LocalCallModificationException,
    ContractRevertExecuted,
    ContractExecutionException,
    InvalidReceivingNodeAccount,
    MissingQueryHeader,
    InvalidQueryHeader,
    InvalidFeeSubmitted,
    InvalidPayerSignature,
    KeyNotProvided,
    InvalidExpirationTime,
    FileContentEmpty,
    InvalidAccountAmounts,
    EmptyTransactionBody,
    InvalidTransactionBody,
    ContractDeleted,
    PlatformNotActive,
    PlatformTransactionNotCreated,
    InvalidPayerAccountId,
    AccountDeleted,
    FileDeleted,
    AccountRepeatedInAccountAmounts,
    ObtainerSameContractId,
    ModifyingImmutableContract,
    ContractFileEmpty,
    ContractBytecodeEmpty,
    InvalidInitialBalance,
    PayerAccountUnauthorized,
    EntityNotAllowedToDelete,
    AuthorizationFailed,
    MaxGasLimitExceeded,
    MaxFileSizeExceeded,
    /// A code this client does not know about. Kept so that it can be reported verbatim.
    Unrecognized(i32),
    /// A status name this client does not know about, as sent by the node.
    UnrecognizedName(&'static str),
}

/// `(status, numeric code, canonical name)`
const STATUS_TABLE: &[(Status, i32, &str)] = &[
    (Status::Ok, 0, "OK"),
    (Status::InvalidTransaction, 1, "INVALID_TRANSACTION"),
    (Status::PayerAccountNotFound, 2, "PAYER_ACCOUNT_NOT_FOUND"),
    (Status::InvalidNodeAccount, 3, "INVALID_NODE_ACCOUNT"),
    (Status::TransactionExpired, 4, "TRANSACTION_EXPIRED"),
    (Status::InvalidTransactionStart, 5, "INVALID_TRANSACTION_START"),
    (Status::InvalidTransactionDuration, 6, "INVALID_TRANSACTION_DURATION"),
    (Status::InvalidSignature, 7, "INVALID_SIGNATURE"),
    (Status::MemoTooLong, 8, "MEMO_TOO_LONG"),
    (Status::InsufficientTxFee, 9, "INSUFFICIENT_TX_FEE"),
    (Status::InsufficientPayerBalance, 10, "INSUFFICIENT_PAYER_BALANCE"),
    (Status::DuplicateTransaction, 11, "DUPLICATE_TRANSACTION"),
    (Status::Busy, 12, "BUSY"),
    (Status::NotSupported, 13, "NOT_SUPPORTED"),
    (Status::InvalidFileId, 14, "INVALID_FILE_ID"),
    (Status::InvalidAccountId, 15, "INVALID_ACCOUNT_ID"),
    (Status::InvalidContractId, 16, "INVALID_CONTRACT_ID"),
    (Status::InvalidTransactionId, 17, "INVALID_TRANSACTION_ID"),
    (Status::ReceiptNotFound, 18, "RECEIPT_NOT_FOUND"),
    (Status::RecordNotFound, 19, "RECORD_NOT_FOUND"),
    (Status::InvalidSolidityId, 20, "INVALID_SOLIDITY_ID"),
    (Status::Unknown, 21, "UNKNOWN"),
    (Status::Success, 22, "SUCCESS"),
    (Status::FailInvalid, 23, "FAIL_INVALID"),
    (Status::FailFee, 24, "FAIL_FEE"),
    (Status::FailBalance, 25, "FAIL_BALANCE"),
    (Status::KeyRequired, 26, "KEY_REQUIRED"),
    (Status::BadEncoding, 27, "BAD_ENCODING"),
    (Status::InsufficientAccountBalance, 28, "INSUFFICIENT_ACCOUNT_BALANCE"),
    (Status::InvalidSolidityAddress, 29, "INVALID_SOLIDITY_ADDRESS"),
    (Status::InsufficientGas, 30, "INSUFFICIENT_GAS"),
    (Status::ContractSizeLimitExceeded, 31, "CONTRACT_SIZE_LIMIT_EXCEEDED"),
    (Status::LocalCallModificationException, 32, "LOCAL_CALL_MODIFICATION_EXCEPTION"),
    (Status::ContractRevertExecuted, 33, "CONTRACT_REVERT_EXECUTED"),
    (Status::ContractExecutionException, 34, "CONTRACT_EXECUTION_EXCEPTION"),
    (Status::InvalidReceivingNodeAccount, 35, "INVALID_RECEIVING_NODE_ACCOUNT"),
    (Status::MissingQueryHeader, 36, "MISSING_QUERY_HEADER"),
    (Status::InvalidQueryHeader, 41, "INVALID_QUERY_HEADER"),
    (Status::InvalidFeeSubmitted, 42, "INVALID_FEE_SUBMITTED"),
    (Status::InvalidPayerSignature, 43, "INVALID_PAYER_SIGNATURE"),
    (Status::KeyNotProvided, 44, "KEY_NOT_PROVIDED"),
    (Status::InvalidExpirationTime, 45, "INVALID_EXPIRATION_TIME"),
    (Status::FileContentEmpty, 47, "FILE_CONTENT_EMPTY"),
    (Status::InvalidAccountAmounts, 48, "INVALID_ACCOUNT_AMOUNTS"),
    (Status::EmptyTransactionBody, 49, "EMPTY_TRANSACTION_BODY"),
    (Status::InvalidTransactionBody, 50, "INVALID_TRANSACTION_BODY"),
    (Status::ContractDeleted, 66, "CONTRACT_DELETED"),
    (Status::PlatformNotActive, 67, "PLATFORM_NOT_ACTIVE"),
    (Status::PlatformTransactionNotCreated, 69, "PLATFORM_TRANSACTION_NOT_CREATED"),
    (Status::InvalidPayerAccountId, 71, "INVALID_PAYER_ACCOUNT_ID"),
    (Status::AccountDeleted, 72, "ACCOUNT_DELETED"),
    (Status::FileDeleted, 73, "FILE_DELETED"),
    (Status::AccountRepeatedInAccountAmounts, 74, "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS"),
    (Status::ObtainerSameContractId, 77, "OBTAINER_SAME_CONTRACT_ID"),
    (Status::ModifyingImmutableContract, 79, "MODIFYING_IMMUTABLE_CONTRACT"),
    (Status::ContractFileEmpty, 83, "CONTRACT_FILE_EMPTY"),
    (Status::ContractBytecodeEmpty, 84, "CONTRACT_BYTECODE_EMPTY"),
    (Status::InvalidInitialBalance, 85, "INVALID_INITIAL_BALANCE"),
    (Status::PayerAccountUnauthorized, 89, "PAYER_ACCOUNT_UNAUTHORIZED"),
    (Status::EntityNotAllowedToDelete, 100, "ENTITY_NOT_ALLOWED_TO_DELETE"),
    (Status::AuthorizationFailed, 101, "AUTHORIZATION_FAILED"),
    (Status::MaxGasLimitExceeded, 111, "MAX_GAS_LIMIT_EXCEEDED"),
    (Status::MaxFileSizeExceeded, 112, "MAX_FILE_SIZE_EXCEEDED"),
];

static BY_CODE: Lazy<HashMap<i32, Status>> =
    Lazy::new(|| STATUS_TABLE.iter().map(|(s, c, _)| (*c, *s)).collect());

static BY_NAME: Lazy<HashMap<&'static str, Status>> =
    Lazy::new(|| STATUS_TABLE.iter().map(|(s, _, n)| (*n, *s)).collect());

static BY_STATUS: Lazy<HashMap<Status, (i32, &'static str)>> =
    Lazy::new(|| STATUS_TABLE.iter().map(|(s, c, n)| (*s, (*c, *n))).collect());

/// Distinct unknown names kept before further ones collapse to [`UNRECOGNIZED_OVERFLOW`].
const MAX_UNRECOGNIZED_NAMES: usize = 256;
const UNRECOGNIZED_OVERFLOW: &str = "UNRECOGNIZED";

static UNRECOGNIZED_NAMES: Lazy<Mutex<HashSet<&'static str>>> =
    Lazy::new(|| Mutex::new(HashSet::new()));

/// Intern an unknown status name so that `Status` stays `Copy`.
fn intern_unrecognized(name: &str) -> &'static str {
    let Ok(mut names) = UNRECOGNIZED_NAMES.lock() else {
        return UNRECOGNIZED_OVERFLOW;
    };
    if let Some(known) = names.get(name) {
        return *known;
    }
    if names.len() >= MAX_UNRECOGNIZED_NAMES {
        return UNRECOGNIZED_OVERFLOW;
    }
    let leaked: &'static str = Box::leak(name.to_owned().into_boxed_str());
    names.insert(leaked);
    leaked
}

impl Status {
    /// Decodes a numeric wire code. Unknown codes are preserved as [`Status::Unrecognized`].
    pub fn from_code(code: i32) -> Self {
        BY_CODE
            .get(&code)
            .copied()
            .unwrap_or(Status::Unrecognized(code))
    }

    /// Looks up a status by its canonical name (e.g. `"INSUFFICIENT_GAS"`).
    pub fn from_name(name: &str) -> Option<Self> {
        BY_NAME.get(name).copied()
    }

    /// Decodes a status name as sent on the wire. Unknown names are kept as
    /// [`Status::UnrecognizedName`].
    pub fn from_wire_name(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| Status::UnrecognizedName(intern_unrecognized(name)))
    }

    /// Numeric wire code, `-1` for an unrecognized name.
    pub fn code(&self) -> i32 {
        match self {
            Status::Unrecognized(code) => *code,
            other => BY_STATUS.get(other).map(|(c, _)| *c).unwrap_or(-1),
        }
    }

    /// Name as reported by the network, or `None` for [`Status::Unrecognized`].
    pub fn name(&self) -> Option<&'static str> {
        match self {
            Status::UnrecognizedName(name) => Some(*name),
            other => BY_STATUS.get(other).map(|(_, n)| *n),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Ok | Status::Success)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "UNRECOGNIZED({})", self.code()),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_i32(self.code()),
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i32),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Ok(Status::from_code(code)),
            Repr::Name(name) => Ok(Status::from_wire_name(&name)),
        }
    }
}

/// How the execution engine reacts to a precheck code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The node accepted the request.
    Success,
    /// Transient rejection; try again (possibly on another node) after a delay.
    Retryable,
    /// Terminal rejection; the request itself must change before it can succeed.
    Fatal,
}

/// Statuses that accept the request. Everything absent from both lists is fatal.
const SUCCESS_STATUSES: &[Status] = &[Status::Ok, Status::Success];

/// Transient, node-local conditions.
const RETRYABLE_STATUSES: &[Status] = &[
    Status::Busy,
    Status::PlatformNotActive,
    Status::PlatformTransactionNotCreated,
    Status::Unknown,
    Status::ReceiptNotFound,
    Status::RecordNotFound,
];

static CLASSIFICATION: Lazy<HashMap<Status, StatusClass>> = Lazy::new(|| {
    SUCCESS_STATUSES
        .iter()
        .map(|s| (*s, StatusClass::Success))
        .chain(RETRYABLE_STATUSES.iter().map(|s| (*s, StatusClass::Retryable)))
        .collect()
});

/// Classify a precheck code.
pub fn classify(status: Status) -> StatusClass {
    CLASSIFICATION
        .get(&status)
        .copied()
        .unwrap_or(StatusClass::Fatal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_unique_codes_and_names() {
        assert_eq!(BY_CODE.len(), STATUS_TABLE.len());
        assert_eq!(BY_NAME.len(), STATUS_TABLE.len());
        assert_eq!(BY_STATUS.len(), STATUS_TABLE.len());
    }

    #[test]
    fn code_round_trip_through_table() {
        for (status, code, name) in STATUS_TABLE {
            assert_eq!(Status::from_code(*code), *status);
            assert_eq!(status.code(), *code);
            assert_eq!(status.to_string(), *name);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let status = Status::from_code(9999);
        assert_eq!(status, Status::Unrecognized(9999));
        assert_eq!(status.code(), 9999);
        assert_eq!(status.to_string(), "UNRECOGNIZED(9999)");
        assert_eq!(classify(status), StatusClass::Fatal);
    }

    #[test]
    fn named_classifications() {
        assert_eq!(classify(Status::Ok), StatusClass::Success);
        assert_eq!(classify(Status::Success), StatusClass::Success);
        assert_eq!(classify(Status::PlatformNotActive), StatusClass::Retryable);
        assert_eq!(classify(Status::Busy), StatusClass::Retryable);
        assert_eq!(classify(Status::InsufficientGas), StatusClass::Fatal);
        assert_eq!(classify(Status::InvalidFileId), StatusClass::Fatal);
        assert_eq!(classify(Status::InvalidSignature), StatusClass::Fatal);
        assert_eq!(classify(Status::InsufficientPayerBalance), StatusClass::Fatal);
    }

    #[test]
    fn serde_accepts_name_or_code() {
        let by_name: Status = serde_json::from_str("\"INVALID_FILE_ID\"").unwrap();
        let by_code: Status = serde_json::from_str("14").unwrap();
        assert_eq!(by_name, Status::InvalidFileId);
        assert_eq!(by_code, Status::InvalidFileId);
        assert_eq!(
            serde_json::to_string(&Status::Busy).unwrap(),
            "\"BUSY\""
        );
        assert_eq!(
            serde_json::to_string(&Status::Unrecognized(4242)).unwrap(),
            "4242"
        );
    }

    #[test]
    fn unknown_name_is_preserved_and_fatal() {
        let status: Status = serde_json::from_str("\"INVALID_TOKEN_ID\"").unwrap();
        assert_eq!(status, Status::UnrecognizedName("INVALID_TOKEN_ID"));
        assert_eq!(status.to_string(), "INVALID_TOKEN_ID");
        assert_eq!(status.code(), -1);
        assert_eq!(classify(status), StatusClass::Fatal);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"INVALID_TOKEN_ID\"");
        assert_eq!(Status::from_name("INVALID_TOKEN_ID"), None);

        let again = Status::from_wire_name("INVALID_TOKEN_ID");
        assert_eq!(again, status);
    }
}
