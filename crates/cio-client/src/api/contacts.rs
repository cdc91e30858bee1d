//! Contacts and the messages, files, and threads exchanged with them.

use chrono::{DateTime, Utc};

use crate::params::{EncodeParams, Params, SortOrder, WireToken};
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const CONTACTS: &str = "2.0/accounts/{account_id}/contacts";
const CONTACT: &str = "2.0/accounts/{account_id}/contacts/{email}";
const CONTACT_FILES: &str = "2.0/accounts/{account_id}/contacts/{email}/files";
const CONTACT_MESSAGES: &str = "2.0/accounts/{account_id}/contacts/{email}/messages";
const CONTACT_THREADS: &str = "2.0/accounts/{account_id}/contacts/{email}/threads";

/// Sort key for the contact listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSortBy {
    Email,
    Count,
    ReceivedCount,
    SentCount,
    LastReceived,
    LastSent,
}

impl WireToken for ContactSortBy {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Count => "count",
            Self::ReceivedCount => "received_count",
            Self::SentCount => "sent_count",
            Self::LastReceived => "last_received",
            Self::LastSent => "last_sent",
        }
    }
}

/// Filters for [`list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactsParams {
    /// Substring matched against names and addresses.
    pub search: Option<String>,
    pub active_before: Option<DateTime<Utc>>,
    pub active_after: Option<DateTime<Utc>>,
    pub sort_by: Option<ContactSortBy>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl EncodeParams for ContactsParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_str("search", self.search.as_deref());
        params.opt_time("active_before", self.active_before);
        params.opt_time("active_after", self.active_after);
        params.opt_token("sort_by", self.sort_by);
        params.opt_token("sort_order", self.sort_order);
        params.opt_int("limit", self.limit);
        params.opt_int("offset", self.offset);
    }
}

/// The account's contacts.
pub fn list(account_id: &str, params: &ContactsParams) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        CONTACTS,
        &[account_id],
        ResponseShape::Dictionary,
    )
    .with_params(params)
}

/// One contact by address.
pub fn get(account_id: &str, email: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        CONTACT,
        &[account_id, email],
        ResponseShape::Dictionary,
    )
}

/// Latest attachments exchanged with the contact.
pub fn files(account_id: &str, email: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        CONTACT_FILES,
        &[account_id, email],
        ResponseShape::Array,
    )
}

/// Latest messages exchanged with the contact.
pub fn messages(account_id: &str, email: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        CONTACT_MESSAGES,
        &[account_id, email],
        ResponseShape::Array,
    )
}

/// Latest threads the contact takes part in.
pub fn threads(account_id: &str, email: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        CONTACT_THREADS,
        &[account_id, email],
        ResponseShape::Array,
    )
}
