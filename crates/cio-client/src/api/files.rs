//! Files found as email attachments.

use crate::api::SearchParams;
use crate::params::{EncodeParams, Params};
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const FILES: &str = "2.0/accounts/{account_id}/files";
const FILE: &str = "2.0/accounts/{account_id}/files/{file_id}";
const FILE_CHANGES: &str = "2.0/accounts/{account_id}/files/{file_id}/changes";
const FILE_CONTENT: &str = "2.0/accounts/{account_id}/files/{file_id}/content";
const FILE_RELATED: &str = "2.0/accounts/{account_id}/files/{file_id}/related";
const FILE_REVISIONS: &str = "2.0/accounts/{account_id}/files/{file_id}/revisions";

/// Filters for [`list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesParams {
    pub search: SearchParams,
    /// Exact name, or a `/regex/`.
    pub file_name: Option<String>,
    /// Minimum size in bytes.
    pub file_size_min: Option<u64>,
    /// Maximum size in bytes.
    pub file_size_max: Option<u64>,
    /// Group revisions of the same document together.
    pub group_by_revisions: Option<bool>,
}

impl EncodeParams for FilesParams {
    fn encode_into(&self, params: &mut Params) {
        self.search.encode_into(params);
        params.opt_str("file_name", self.file_name.as_deref());
        params.opt_int("file_size_min", self.file_size_min);
        params.opt_int("file_size_max", self.file_size_max);
        params.opt_bool("group_by_revisions", self.group_by_revisions);
    }
}

pub fn list(account_id: &str, params: &FilesParams) -> RequestDescriptor {
    RequestDescriptor::from_template(HttpMethod::Get, FILES, &[account_id], ResponseShape::Array)
        .with_params(params)
}

pub fn get(account_id: &str, file_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FILE,
        &[account_id, file_id],
        ResponseShape::Dictionary,
    )
}

/// Files that can be compared with this one.
pub fn changes(account_id: &str, file_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FILE_CHANGES,
        &[account_id, file_id],
        ResponseShape::Array,
    )
}

/// A public URL the file can be downloaded from.
pub fn content_url(account_id: &str, file_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FILE_CONTENT,
        &[account_id, file_id],
        ResponseShape::String,
    )
    .with_param("as_link", "1")
}

/// The file's bytes.
pub fn content(account_id: &str, file_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FILE_CONTENT,
        &[account_id, file_id],
        ResponseShape::Raw,
    )
}

/// Files with similar names.
pub fn related(account_id: &str, file_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FILE_RELATED,
        &[account_id, file_id],
        ResponseShape::Array,
    )
}

/// Other revisions of the same document found in the mailbox.
pub fn revisions(account_id: &str, file_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FILE_REVISIONS,
        &[account_id, file_id],
        ResponseShape::Array,
    )
}
