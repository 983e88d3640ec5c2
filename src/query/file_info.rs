use super::{unexpected_answer, QueryBase, QueryKind};
use crate::ids::FileId;
use crate::key::PublicKey;
use crate::wire::{Answer, Method, QueryBody};
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

/// Metadata of a stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub file_id: FileId,
    pub size: u64,
    #[serde(default)]
    pub expiration_time_seconds: i64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub keys: Vec<PublicKey>,
}

/// Paid query for [`FileInfo`].
#[derive(Debug, Clone, Default)]
pub struct FileInfoQuery {
    base: QueryBase,
    file_id: Option<FileId>,
}

impl FileInfoQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_id(mut self, file_id: FileId) -> Self {
        self.file_id = Some(file_id);
        self
    }

    pub fn get_file_id(&self) -> Option<FileId> {
        self.file_id
    }
}

impl QueryKind for FileInfoQuery {
    type Output = FileInfo;

    fn base(&self) -> &QueryBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut QueryBase {
        &mut self.base
    }

    fn body(&self) -> Result<QueryBody> {
        let file_id = self.file_id.ok_or_else(|| {
            Error::validation_with_context(
                "file id is required",
                ErrorContext::new()
                    .with_field_path("file_id")
                    .with_source("file_info_query"),
            )
        })?;
        Ok(QueryBody::FileGetInfo { file_id })
    }

    fn method(&self) -> Method {
        Method::GetFileInfo
    }

    fn map_answer(&self, answer: Option<Answer>) -> Result<FileInfo> {
        match answer {
            Some(Answer::FileGetInfo { file_info }) => Ok(file_info),
            other => Err(unexpected_answer(self.method(), other.as_ref())),
        }
    }
}
