//! Account webhooks.
//!
//! Delivery is handled entirely by the server; these builders only register,
//! inspect, and remove callbacks.

use crate::params::{EncodeParams, Params};
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const WEBHOOKS: &str = "2.0/accounts/{account_id}/webhooks";
const WEBHOOK: &str = "2.0/accounts/{account_id}/webhooks/{webhook_id}";

/// Filters and payload options for [`create`]. A webhook fires only for
/// messages matching every filter that is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookParams {
    pub filter_to: Option<String>,
    pub filter_from: Option<String>,
    pub filter_cc: Option<String>,
    pub filter_subject: Option<String>,
    pub filter_thread: Option<String>,
    pub filter_new_important: Option<bool>,
    pub filter_file_name: Option<String>,
    pub filter_folder_added: Option<String>,
    pub filter_folder_removed: Option<String>,
    pub filter_to_domain: Option<String>,
    pub filter_from_domain: Option<String>,
    pub include_body: Option<bool>,
    pub body_type: Option<String>,
}

impl EncodeParams for WebhookParams {
    fn encode_into(&self, params: &mut Params) {
        params.opt_str("filter_to", self.filter_to.as_deref());
        params.opt_str("filter_from", self.filter_from.as_deref());
        params.opt_str("filter_cc", self.filter_cc.as_deref());
        params.opt_str("filter_subject", self.filter_subject.as_deref());
        params.opt_str("filter_thread", self.filter_thread.as_deref());
        params.opt_bool("filter_new_important", self.filter_new_important);
        params.opt_str("filter_file_name", self.filter_file_name.as_deref());
        params.opt_str("filter_folder_added", self.filter_folder_added.as_deref());
        params.opt_str("filter_folder_removed", self.filter_folder_removed.as_deref());
        params.opt_str("filter_to_domain", self.filter_to_domain.as_deref());
        params.opt_str("filter_from_domain", self.filter_from_domain.as_deref());
        params.opt_bool("include_body", self.include_body);
        params.opt_str("body_type", self.body_type.as_deref());
    }
}

pub fn list(account_id: &str, extra: &Params) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        WEBHOOKS,
        &[account_id],
        ResponseShape::Array,
    )
    .with_params(extra)
}

/// Register a webhook. `failure_notif_url` is called when the server gives
/// up on delivering to `callback_url`.
pub fn create(
    account_id: &str,
    callback_url: &str,
    failure_notif_url: &str,
    params: &WebhookParams,
) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Put,
        WEBHOOKS,
        &[account_id],
        ResponseShape::Dictionary,
    )
    .with_param("callback_url", callback_url)
    .with_param("failure_notif_url", failure_notif_url)
    .with_params(params)
}

pub fn get(account_id: &str, webhook_id: &str, extra: &Params) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        WEBHOOK,
        &[account_id, webhook_id],
        ResponseShape::Dictionary,
    )
    .with_params(extra)
}

/// Change a webhook, e.g. `active=0` to pause it.
pub fn update(account_id: &str, webhook_id: &str, extra: &Params) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        WEBHOOK,
        &[account_id, webhook_id],
        ResponseShape::Dictionary,
    )
    .with_params(extra)
}

pub fn delete(account_id: &str, webhook_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Delete,
        WEBHOOK,
        &[account_id, webhook_id],
        ResponseShape::Dictionary,
    )
}
