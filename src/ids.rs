//! Entity and transaction identifiers.
//!
//! Entities are addressed as `shard.realm.num`; transactions as
//! `<payer account>@<valid start seconds>.<nanos>`.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

fn parse_entity(s: &str, kind: &'static str) -> Result<(u64, u64, u64)> {
    let invalid = || {
        Error::validation_with_context(
            format!("invalid {kind} id"),
            ErrorContext::new()
                .with_details(format!("expected shard.realm.num, got {s:?}"))
                .with_source("id_parser"),
        )
    };

    let mut parts = s.trim().split('.');
    let (Some(shard), Some(realm), Some(num), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    Ok((
        shard.parse().map_err(|_| invalid())?,
        realm.parse().map_err(|_| invalid())?,
        num.parse().map_err(|_| invalid())?,
    ))
}

/// An account on the network. Nodes are identified by their account too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

/// A file stored on the network (contract bytecode lives in files).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

/// A deployed smart contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl AccountId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl FileId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl ContractId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, num) = parse_entity(s, "account")?;
        Ok(Self::new(shard, realm, num))
    }
}

impl FromStr for FileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, num) = parse_entity(s, "file")?;
        Ok(Self::new(shard, realm, num))
    }
}

impl FromStr for ContractId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, num) = parse_entity(s, "contract")?;
        Ok(Self::new(shard, realm, num))
    }
}

impl TryFrom<String> for AccountId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl TryFrom<String> for FileId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl TryFrom<String> for ContractId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> String {
        id.to_string()
    }
}

impl From<FileId> for String {
    fn from(id: FileId) -> String {
        id.to_string()
    }
}

impl From<ContractId> for String {
    fn from(id: ContractId) -> String {
        id.to_string()
    }
}

/// Identifies a transaction: the paying account plus the start of its validity window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start_seconds: i64,
    pub valid_start_nanos: u32,
}

impl TransactionId {
    /// A new id for `account_id` whose validity starts now.
    pub fn generate(account_id: AccountId) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            account_id,
            valid_start_seconds: now.as_secs() as i64,
            valid_start_nanos: now.subsec_nanos(),
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id, self.valid_start_seconds, self.valid_start_nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::validation_with_context(
                "invalid transaction id",
                ErrorContext::new()
                    .with_details(format!("expected account@seconds.nanos, got {s:?}"))
                    .with_source("id_parser"),
            )
        };

        let (account, start) = s.trim().split_once('@').ok_or_else(invalid)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(invalid)?;

        Ok(Self {
            account_id: account.parse()?,
            valid_start_seconds: seconds.parse().map_err(|_| invalid())?,
            valid_start_nanos: nanos.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for TransactionId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> String {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_entities() {
        let account: AccountId = "0.0.3".parse().unwrap();
        assert_eq!(account, AccountId::new(0, 0, 3));
        assert_eq!(account.to_string(), "0.0.3");

        let file: FileId = "1.2.345".parse().unwrap();
        assert_eq!(file, FileId::new(1, 2, 345));
    }

    #[test]
    fn rejects_malformed_entities() {
        assert!("0.0".parse::<AccountId>().is_err());
        assert!("0.0.3.4".parse::<AccountId>().is_err());
        assert!("a.b.c".parse::<FileId>().is_err());
        assert!("".parse::<ContractId>().is_err());
    }

    #[test]
    fn transaction_id_round_trip() {
        let id = TransactionId {
            account_id: AccountId::new(0, 0, 1001),
            valid_start_seconds: 1_690_000_000,
            valid_start_nanos: 42,
        };
        let text = id.to_string();
        assert_eq!(text, "0.0.1001@1690000000.000000042");
        assert_eq!(text.parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn serde_uses_string_form() {
        let id = AccountId::new(0, 0, 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"0.0.7\"");
        let back: AccountId = serde_json::from_str("\"0.0.7\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn generate_uses_payer() {
        let payer = AccountId::new(0, 0, 2);
        let id = TransactionId::generate(payer);
        assert_eq!(id.account_id, payer);
        assert!(id.valid_start_seconds > 0);
    }
}
