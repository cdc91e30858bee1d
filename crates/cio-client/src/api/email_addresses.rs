//! Email address aliases of an account.

use crate::params::encode_bool;
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const EMAIL_ADDRESSES: &str = "2.0/accounts/{account_id}/email_addresses";
const EMAIL_ADDRESS: &str = "2.0/accounts/{account_id}/email_addresses/{email}";

pub fn list(account_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        EMAIL_ADDRESSES,
        &[account_id],
        ResponseShape::Array,
    )
}

/// Associate a new address with the account.
pub fn add(account_id: &str, email: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        EMAIL_ADDRESSES,
        &[account_id],
        ResponseShape::Dictionary,
    )
    .with_param("email_address", email)
}

/// Mark (or unmark) an address as the account's primary one.
pub fn update(account_id: &str, email: &str, primary: bool) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Post,
        EMAIL_ADDRESS,
        &[account_id, email],
        ResponseShape::Dictionary,
    )
    .with_param("primary", encode_bool(primary))
}

pub fn delete(account_id: &str, email: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Delete,
        EMAIL_ADDRESS,
        &[account_id, email],
        ResponseShape::Dictionary,
    )
}
