//! Descriptor builders, one module per API resource.
//!
//! Each function takes the account id, the path parameters of the
//! operation, and (where the API accepts them) a typed parameter set, and
//! returns a [`RequestDescriptor`](crate::request::RequestDescriptor).
//! Nothing here performs I/O or validates ids; message ids, `gm-` ids and
//! the source label alias `"0"` are all passed through as given.

pub mod account;
pub mod connect_tokens;
pub mod contacts;
pub mod email_addresses;
pub mod files;
pub mod messages;
pub mod sources;
pub mod threads;
pub mod webhooks;

use chrono::{DateTime, Utc};

use crate::params::{EncodeParams, Params, SortOrder};

/// Filters shared by the message and file listings.
///
/// `email`, `to`, `from`, `cc` and `bcc` each accept a comma-separated list
/// of addresses, combined with OR. Different fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub email: Option<String>,
    pub to: Option<String>,
    pub from: Option<String>,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    /// Restrict to one source label.
    pub source: Option<String>,
    pub date_before: Option<DateTime<Utc>>,
    pub date_after: Option<DateTime<Utc>>,
    pub indexed_before: Option<DateTime<Utc>>,
    pub indexed_after: Option<DateTime<Utc>>,
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Zero-based start offset.
    pub offset: Option<u32>,
}

impl EncodeParams for SearchParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_str("email", self.email.as_deref());
        params.opt_str("to", self.to.as_deref());
        params.opt_str("from", self.from.as_deref());
        params.opt_str("cc", self.cc.as_deref());
        params.opt_str("bcc", self.bcc.as_deref());
        params.opt_str("source", self.source.as_deref());
        params.opt_time("date_before", self.date_before);
        params.opt_time("date_after", self.date_after);
        params.opt_time("indexed_before", self.indexed_before);
        params.opt_time("indexed_after", self.indexed_after);
        params.opt_token("sort_order", self.sort_order);
        params.opt_int("limit", self.limit);
        params.opt_int("offset", self.offset);
    }
}
