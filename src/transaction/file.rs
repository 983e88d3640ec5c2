use super::{TransactionBase, TransactionKind};
use crate::ids::FileId;
use crate::key::PublicKey;
use crate::wire::{Method, TransactionData};
use crate::{Error, ErrorContext, Result};

/// Store a new file. The receipt carries the new [`FileId`].
#[derive(Debug, Clone, Default)]
pub struct FileCreateTransaction {
    base: TransactionBase,
    keys: Vec<PublicKey>,
    contents: Vec<u8>,
    expiration_time_seconds: Option<i64>,
}

impl FileCreateTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys that must sign updates and deletion. No keys makes the file immutable.
    pub fn keys(mut self, keys: impl IntoIterator<Item = PublicKey>) -> Self {
        self.keys = keys.into_iter().collect();
        self
    }

    pub fn contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = contents.into();
        self
    }

    pub fn expiration_time_seconds(mut self, seconds: i64) -> Self {
        self.expiration_time_seconds = Some(seconds);
        self
    }
}

impl TransactionKind for FileCreateTransaction {
    fn base(&self) -> &TransactionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TransactionBase {
        &mut self.base
    }

    fn data(&self) -> Result<TransactionData> {
        Ok(TransactionData::FileCreate {
            keys: self.keys.clone(),
            contents: self.contents.clone(),
            expiration_time_seconds: self.expiration_time_seconds,
        })
    }

    fn method(&self) -> Method {
        Method::CreateFile
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileDeleteTransaction {
    base: TransactionBase,
    file_id: Option<FileId>,
}

impl FileDeleteTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_id(mut self, file_id: FileId) -> Self {
        self.file_id = Some(file_id);
        self
    }
}

impl TransactionKind for FileDeleteTransaction {
    fn base(&self) -> &TransactionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TransactionBase {
        &mut self.base
    }

    fn data(&self) -> Result<TransactionData> {
        let file_id = self.file_id.ok_or_else(|| {
            Error::validation_with_context(
                "file id is required",
                ErrorContext::new()
                    .with_field_path("file_id")
                    .with_source("file_delete_transaction"),
            )
        })?;
        Ok(TransactionData::FileDelete { file_id })
    }

    fn method(&self) -> Method {
        Method::DeleteFile
    }
}
