//! IMAP sources, their folders, and sync control.
//!
//! A source label of `"0"` is accepted by the server as an alias for the
//! account's first source. Folder paths use `/` as the hierarchy delimiter
//! unless a `delim` is supplied.

use crate::params::{EncodeParams, IncludeHeaders, Params, WireToken};
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const SOURCES: &str = "2.0/accounts/{account_id}/sources";
const SOURCE: &str = "2.0/accounts/{account_id}/sources/{label}";
const SOURCE_FOLDERS: &str = "2.0/accounts/{account_id}/sources/{label}/folders";
const SOURCE_FOLDER: &str = "2.0/accounts/{account_id}/sources/{label}/folders/{folder}";
const FOLDER_EXPUNGE: &str =
    "2.0/accounts/{account_id}/sources/{label}/folders/{folder}/expunge";
const FOLDER_MESSAGES: &str =
    "2.0/accounts/{account_id}/sources/{label}/folders/{folder}/messages";
const SOURCE_SYNC: &str = "2.0/accounts/{account_id}/sources/{label}/sync";
const SYNC: &str = "2.0/accounts/{account_id}/sync";

/// Connection status reported for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    InvalidCredentials,
    ConnectionImpossible,
    NoAccessToAllMail,
    Ok,
    TempDisabled,
    Disabled,
}

impl WireToken for SourceStatus {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::ConnectionImpossible => "CONNECTION_IMPOSSIBLE",
            Self::NoAccessToAllMail => "NO_ACCESS_TO_ALL_MAIL",
            Self::Ok => "OK",
            Self::TempDisabled => "TEMP_DISABLED",
            Self::Disabled => "DISABLED",
        }
    }
}

/// Protocol of a source. IMAP is the only one the API supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceType {
    #[default]
    Imap,
}

impl WireToken for SourceType {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::Imap => "IMAP",
        }
    }
}

/// Filters for [`list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcesParams {
    pub status: Option<SourceStatus>,
    /// Only sources whose status is (or is not) `OK`.
    pub status_ok: Option<bool>,
}

impl EncodeParams for SourcesParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_token("status", self.status);
        params.opt_bool("status_ok", self.status_ok);
    }
}

/// A source to attach with [`create`].
///
/// Connect tokens are usually the better way to add a mailbox; this is for
/// callers that already hold the IMAP settings and a password or provider
/// refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSource {
    pub email: String,
    /// IMAP host name or address.
    pub server: String,
    pub username: String,
    pub use_ssl: bool,
    pub port: u16,
    pub source_type: SourceType,
    pub origin_ip: Option<String>,
    pub expunge_on_deleted_flag: Option<bool>,
    pub sync_all_folders: Option<bool>,
    /// Folders to sync, comma-joined on the wire.
    pub sync_folders: Option<Vec<String>>,
    pub sync_flags: Option<bool>,
    pub raw_file_list: Option<bool>,
    pub password: Option<String>,
    pub provider_refresh_token: Option<String>,
    pub provider_consumer_key: Option<String>,
    pub callback_url: Option<String>,
    pub status_callback_url: Option<String>,
}

impl NewSource {
    pub fn new(
        email: impl Into<String>,
        server: impl Into<String>,
        username: impl Into<String>,
        use_ssl: bool,
        port: u16,
    ) -> Self {
        Self {
            email: email.into(),
            server: server.into(),
            username: username.into(),
            use_ssl,
            port,
            source_type: SourceType::Imap,
            origin_ip: None,
            expunge_on_deleted_flag: None,
            sync_all_folders: None,
            sync_folders: None,
            sync_flags: None,
            raw_file_list: None,
            password: None,
            provider_refresh_token: None,
            provider_consumer_key: None,
            callback_url: None,
            status_callback_url: None,
        }
    }
}

impl EncodeParams for NewSource {
    fn encode_into(&self, params: &mut Params) {
        params.insert("email", self.email.as_str());
        params.insert("server", self.server.as_str());
        params.insert("username", self.username.as_str());
        params.opt_bool("use_ssl", Some(self.use_ssl));
        params.opt_int("port", Some(self.port));
        params.opt_token("type", Some(self.source_type));
        params.opt_str("origin_ip", self.origin_ip.as_deref());
        params.opt_bool("expunge_on_deleted_flag", self.expunge_on_deleted_flag);
        params.opt_bool("sync_all_folders", self.sync_all_folders);
        params.opt_list("sync_folders", self.sync_folders.as_deref());
        params.opt_bool("sync_flags", self.sync_flags);
        params.opt_bool("raw_file_list", self.raw_file_list);
        params.opt_str("password", self.password.as_deref());
        params.opt_str(
            "provider_refresh_token",
            self.provider_refresh_token.as_deref(),
        );
        params.opt_str("provider_consumer_key", self.provider_consumer_key.as_deref());
        params.opt_str("callback_url", self.callback_url.as_deref());
        params.opt_str("status_callback_url", self.status_callback_url.as_deref());
    }
}

/// Changes for [`update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceUpdateParams {
    /// `Some(true)` re-enables a disabled source.
    pub status: Option<bool>,
    pub sync_all_folders: Option<bool>,
    pub expunge_on_deleted_flag: Option<bool>,
    pub password: Option<String>,
    pub provider_refresh_token: Option<String>,
    pub provider_consumer_key: Option<String>,
    pub status_callback_url: Option<String>,
}

impl EncodeParams for SourceUpdateParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_bool("status", self.status);
        params.opt_bool("sync_all_folders", self.sync_all_folders);
        params.opt_bool("expunge_on_deleted_flag", self.expunge_on_deleted_flag);
        params.opt_str("password", self.password.as_deref());
        params.opt_str(
            "provider_refresh_token",
            self.provider_refresh_token.as_deref(),
        );
        params.opt_str("provider_consumer_key", self.provider_consumer_key.as_deref());
        params.opt_str("status_callback_url", self.status_callback_url.as_deref());
    }
}

/// Options for [`folder_messages`], which reads the IMAP server live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderMessagesParams {
    pub include_thread_size: Option<bool>,
    pub include_body: Option<bool>,
    pub body_type: Option<String>,
    pub include_headers: Option<IncludeHeaders>,
    pub include_flags: Option<bool>,
    /// Only seen (`true`) or unseen (`false`) messages.
    pub flag_seen: Option<bool>,
    /// Return immediately and let the server fetch in the background.
    pub async_fetch: Option<bool>,
}

impl EncodeParams for FolderMessagesParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_bool("include_thread_size", self.include_thread_size);
        params.opt_bool("include_body", self.include_body);
        params.opt_str("body_type", self.body_type.as_deref());
        params.opt_token("include_headers", self.include_headers);
        params.opt_bool("include_flags", self.include_flags);
        params.opt_bool("flag_seen", self.flag_seen);
        params.opt_bool("async", self.async_fetch);
    }
}

pub fn list(account_id: &str, params: &SourcesParams) -> RequestDescriptor {
    RequestDescriptor::from_template(HttpMethod::Get, SOURCES, &[account_id], ResponseShape::Array)
        .with_params(params)
}

pub fn create(account_id: &str, source: &NewSource) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        SOURCES,
        &[account_id],
        ResponseShape::Dictionary,
    )
    .with_params(source)
}

pub fn get(account_id: &str, label: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        SOURCE,
        &[account_id, label],
        ResponseShape::Dictionary,
    )
}

pub fn update(account_id: &str, label: &str, params: &SourceUpdateParams) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        SOURCE,
        &[account_id, label],
        ResponseShape::Dictionary,
    )
    .with_params(params)
}

pub fn delete(account_id: &str, label: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Delete,
        SOURCE,
        &[account_id, label],
        ResponseShape::Dictionary,
    )
}

/// Folders of a source. Both switches cost a round trip to the IMAP server.
pub fn folders(
    account_id: &str,
    label: &str,
    include_extended_counts: bool,
    no_cache: bool,
) -> RequestDescriptor {
    let mut params = Params::new();
    params.opt_bool("include_extended_counts", Some(include_extended_counts));
    params.opt_bool("no_cache", Some(no_cache));
    RequestDescriptor::from_template(
        HttpMethod::Get,
        SOURCE_FOLDERS,
        &[account_id, label],
        ResponseShape::Array,
    )
    .with_params(&params)
}

pub fn folder(
    account_id: &str,
    label: &str,
    folder_path: &str,
    include_extended_counts: bool,
    delim: Option<&str>,
) -> RequestDescriptor {
    let mut params = Params::new();
    params.opt_bool("include_extended_counts", Some(include_extended_counts));
    params.opt_str("delim", delim);
    RequestDescriptor::from_template(
        HttpMethod::Get,
        SOURCE_FOLDER,
        &[account_id, label, folder_path],
        ResponseShape::Dictionary,
    )
    .with_params(&params)
}

pub fn create_folder(
    account_id: &str,
    label: &str,
    folder_path: &str,
    delim: Option<&str>,
) -> RequestDescriptor {
    let mut params = Params::new();
    params.opt_str("delim", delim);
    RequestDescriptor::from_template(
        HttpMethod::Put,
        SOURCE_FOLDER,
        &[account_id, label, folder_path],
        ResponseShape::Dictionary,
    )
    .with_params(&params)
}

/// Remove a folder and every message in it. Not reversible.
pub fn delete_folder(account_id: &str, label: &str, folder_path: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Delete,
        SOURCE_FOLDER,
        &[account_id, label, folder_path],
        ResponseShape::Dictionary,
    )
}

/// Run `EXPUNGE` on the folder.
pub fn expunge_folder(account_id: &str, label: &str, folder_path: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        FOLDER_EXPUNGE,
        &[account_id, label, folder_path],
        ResponseShape::Dictionary,
    )
}

pub fn folder_messages(
    account_id: &str,
    label: &str,
    folder_path: &str,
    params: &FolderMessagesParams,
) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        FOLDER_MESSAGES,
        &[account_id, label, folder_path],
        ResponseShape::Array,
    )
    .with_params(params)
}

pub fn sync_status(account_id: &str, label: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        SOURCE_SYNC,
        &[account_id, label],
        ResponseShape::Dictionary,
    )
}

pub fn force_sync(account_id: &str, label: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        SOURCE_SYNC,
        &[account_id, label],
        ResponseShape::Dictionary,
    )
}

/// Sync status of every source on the account.
pub fn account_sync_status(account_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        SYNC,
        &[account_id],
        ResponseShape::Dictionary,
    )
}

/// Start a sync job for every source on the account.
pub fn force_account_sync(account_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        SYNC,
        &[account_id],
        ResponseShape::Dictionary,
    )
}
