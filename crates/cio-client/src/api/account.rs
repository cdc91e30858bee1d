//! The account resource itself.

use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const ACCOUNT: &str = "2.0/accounts/{account_id}";

/// Account details.
pub fn get(account_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        ACCOUNT,
        &[account_id],
        ResponseShape::Dictionary,
    )
}

/// Change the account holder's name. Omitted names are left unchanged.
pub fn update(
    account_id: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> RequestDescriptor {
    let mut d = RequestDescriptor::from_template(
        HttpMethod::Post,
        ACCOUNT,
        &[account_id],
        ResponseShape::Dictionary,
    );
    if let Some(first) = first_name {
        d = d.with_param("first_name", first);
    }
    if let Some(last) = last_name {
        d = d.with_param("last_name", last);
    }
    d
}

/// Delete the account.
pub fn delete(account_id: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Delete,
        ACCOUNT,
        &[account_id],
        ResponseShape::Dictionary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_account() {
        let d = get("acc");
        assert_eq!(d.method(), HttpMethod::Get);
        assert_eq!(d.path(), "2.0/accounts/acc");
        assert!(d.params().is_empty());
    }

    #[test]
    fn update_only_sends_given_names() {
        let d = update("acc", Some("Ada"), None);
        assert_eq!(d.method(), HttpMethod::Post);
        assert_eq!(d.params().get("first_name"), Some("Ada"));
        assert!(!d.params().contains_key("last_name"));
    }

    #[test]
    fn delete_account() {
        assert_eq!(delete("acc").method(), HttpMethod::Delete);
    }
}
