//! Messages and their sub-resources (body, flags, folders, headers, source,
//! thread).
//!
//! Message ids may be the `message_id`, the `email_message_id`, or a Gmail
//! id prefixed with `gm-`. They are passed through without validation.

use crate::api::SearchParams;
use crate::params::{EncodeParams, IncludeHeaders, Params};
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const MESSAGES: &str = "2.0/accounts/{account_id}/messages";
const MESSAGE: &str = "2.0/accounts/{account_id}/messages/{message_id}";
const MESSAGE_BODY: &str = "2.0/accounts/{account_id}/messages/{message_id}/body";
const MESSAGE_FLAGS: &str = "2.0/accounts/{account_id}/messages/{message_id}/flags";
const MESSAGE_FOLDERS: &str = "2.0/accounts/{account_id}/messages/{message_id}/folders";
const MESSAGE_HEADERS: &str = "2.0/accounts/{account_id}/messages/{message_id}/headers";
const MESSAGE_SOURCE: &str = "2.0/accounts/{account_id}/messages/{message_id}/source";
const MESSAGE_THREAD: &str = "2.0/accounts/{account_id}/messages/{message_id}/thread";

/// Filters and inclusion switches for [`list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagesParams {
    pub search: SearchParams,
    /// Exact subject, or a `/regex/`.
    pub subject: Option<String>,
    /// Restrict to messages in this folder.
    pub folder: Option<String>,
    /// Restrict to messages with an attachment of this name.
    pub file_name: Option<String>,
    pub include_thread_size: Option<bool>,
    pub include_body: Option<bool>,
    pub include_headers: Option<IncludeHeaders>,
    pub include_flags: Option<bool>,
    /// `text/plain` or `text/html`; only meaningful with `include_body`.
    pub body_type: Option<String>,
    pub include_source: Option<bool>,
}

impl EncodeParams for MessagesParams {
    fn encode_into(&self, params: &mut Params) {
        self.search.encode_into(params);
        params.opt_str("subject", self.subject.as_deref());
        params.opt_str("folder", self.folder.as_deref());
        params.opt_str("file_name", self.file_name.as_deref());
        params.opt_bool("include_thread_size", self.include_thread_size);
        params.opt_bool("include_body", self.include_body);
        params.opt_token("include_headers", self.include_headers);
        params.opt_bool("include_flags", self.include_flags);
        params.opt_str("body_type", self.body_type.as_deref());
        params.opt_bool("include_source", self.include_source);
    }
}

/// Inclusion switches for [`thread`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadParams {
    pub include_body: Option<bool>,
    pub include_headers: Option<IncludeHeaders>,
    pub include_flags: Option<bool>,
    pub body_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl EncodeParams for ThreadParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_bool("include_body", self.include_body);
        params.opt_token("include_headers", self.include_headers);
        params.opt_bool("include_flags", self.include_flags);
        params.opt_str("body_type", self.body_type.as_deref());
        params.opt_int("limit", self.limit);
        params.opt_int("offset", self.offset);
    }
}

/// Inclusion switches for [`get`]: everything [`ThreadParams`] accepts plus
/// thread size and raw source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageParams {
    pub thread: ThreadParams,
    pub include_thread_size: Option<bool>,
    pub include_source: Option<bool>,
}

impl EncodeParams for MessageParams {
    fn encode_into(&self, params: &mut Params) {
        self.thread.encode_into(params);
        params.opt_bool("include_thread_size", self.include_thread_size);
        params.opt_bool("include_source", self.include_source);
    }
}

/// IMAP flags to set (`Some(true)`), clear (`Some(false)`), or leave alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFlags {
    pub seen: Option<bool>,
    pub answered: Option<bool>,
    pub flagged: Option<bool>,
    pub deleted: Option<bool>,
    pub draft: Option<bool>,
}

impl MessageFlags {
    /// Write each set flag as `<prefix><flag>`.
    pub fn encode_prefixed(&self, prefix: &str, params: &mut Params) {
        let flags = [
            ("seen", self.seen),
            ("answered", self.answered),
            ("flagged", self.flagged),
            ("deleted", self.deleted),
            ("draft", self.draft),
        ];
        for (name, value) in flags {
            params.opt_bool(&format!("{prefix}{name}"), value);
        }
    }
}

impl EncodeParams for MessageFlags {
    fn encode_into(&self, params: &mut Params) {
        self.encode_prefixed("", params);
    }
}

/// Options for [`update`] (copy or move).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageUpdateParams {
    /// Label of the destination source when the account has several.
    pub dst_source: Option<String>,
    /// Move rather than copy.
    pub move_message: Option<bool>,
    /// Flags applied to the copy, sent as `flag_<name>`.
    pub flags: MessageFlags,
}

impl EncodeParams for MessageUpdateParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_str("dst_source", self.dst_source.as_deref());
        params.opt_bool("move", self.move_message);
        self.flags.encode_prefixed("flag_", params);
    }
}

pub fn list(account_id: &str, params: &MessagesParams) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGES,
        &[account_id],
        ResponseShape::Array,
    )
    .with_params(params)
}

pub fn get(account_id: &str, message_id: &str, params: &MessageParams) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
    .with_params(params)
}

/// Copy (or with `move_message`, move) a message into `dst_folder`.
pub fn update(
    account_id: &str,
    message_id: &str,
    dst_folder: &str,
    params: &MessageUpdateParams,
) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        MESSAGE,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
    .with_param("dst_folder", dst_folder)
    .with_params(params)
}

/// Delete a message on the mail server. Gmail messages go to the trash.
pub fn delete(account_id: &str, message_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Delete,
        MESSAGE,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
}

/// Text parts of the message. `body_type` narrows to `text/plain` or
/// `text/html`.
pub fn body(account_id: &str, message_id: &str, body_type: Option<&str>) -> RequestDescriptor {
    let d = RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_BODY,
        &[account_id, message_id],
        ResponseShape::Array,
    );
    match body_type {
        Some(t) => d.with_param("type", t),
        None => d,
    }
}

pub fn flags(account_id: &str, message_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_FLAGS,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
}

pub fn update_flags(account_id: &str, message_id: &str, flags: &MessageFlags) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        MESSAGE_FLAGS,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
    .with_params(flags)
}

/// Folders (Gmail labels) the message appears in.
pub fn folders(account_id: &str, message_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_FOLDERS,
        &[account_id, message_id],
        ResponseShape::Array,
    )
}

/// Add the message to one folder and/or remove it from another.
pub fn update_folders(
    account_id: &str,
    message_id: &str,
    add: Option<&str>,
    remove: Option<&str>,
) -> RequestDescriptor {
    let mut params = Params::new();
    params.opt_str("add", add);
    params.opt_str("remove", remove);
    RequestDescriptor::from_template(
        HttpMethod::Post,
        MESSAGE_FOLDERS,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
    .with_params(&params)
}

/// Replace the full set of folders the message appears in.
///
/// Folders may be named by IMAP name, by special-use symbolic name, or
/// both. Empty lists are not sent. The server's handling of this call's
/// signature is not confirmed, so the descriptor is marked unverified.
pub fn set_folders<S: AsRef<str>>(
    account_id: &str,
    message_id: &str,
    names: &[S],
    symbolic_names: &[S],
) -> RequestDescriptor {
    let mut params = Params::new();
    params.opt_list("name", (!names.is_empty()).then_some(names));
    params.opt_list(
        "symbolic_name",
        (!symbolic_names.is_empty()).then_some(symbolic_names),
    );
    RequestDescriptor::from_template(
        HttpMethod::Put,
        MESSAGE_FOLDERS,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
    .with_params(&params)
    .unverified()
}

/// Parsed headers, every value wrapped in an array.
pub fn headers(account_id: &str, message_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_HEADERS,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
}

/// Headers as one unparsed string.
pub fn raw_headers(account_id: &str, message_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_HEADERS,
        &[account_id, message_id],
        ResponseShape::String,
    )
    .with_param("raw", "1")
}

/// RFC-822 source including attachments.
pub fn source(account_id: &str, message_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_SOURCE,
        &[account_id, message_id],
        ResponseShape::Raw,
    )
}

/// Every message in the same thread.
pub fn thread(account_id: &str, message_id: &str, params: &ThreadParams) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        MESSAGE_THREAD,
        &[account_id, message_id],
        ResponseShape::Dictionary,
    )
    .with_params(params)
}
