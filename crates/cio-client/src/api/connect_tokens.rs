//! Connect tokens: the handshake that adds a mailbox and yields OAuth
//! credentials for its account.
//!
//! Unlike the rest of [`crate::api`], connect tokens can be created outside
//! any account, so the account id is optional here.

use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const CONNECT_TOKENS: &str = "2.0/connect_tokens";
const ACCOUNT_CONNECT_TOKENS: &str = "2.0/accounts/{account_id}/connect_tokens";
const CONNECT_TOKEN: &str = "2.0/connect_tokens/{token}";

/// Mail provider the user is about to sign in to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    GenericImap,
    Gmail,
    Yahoo,
    Aol,
    Hotmail,
}

impl EmailProvider {
    /// Address hint that makes the connect UI jump to the provider's login.
    pub fn email_hint(&self) -> Option<&'static str> {
        match self {
            Self::GenericImap => None,
            Self::Gmail => Some("@gmail.com"),
            Self::Yahoo => Some("@yahoo.com"),
            Self::Aol => Some("@aol.com"),
            Self::Hotmail => Some("@hotmail.com"),
        }
    }
}

/// Create a connect token. With an account id the new source is attached to
/// that account; without one a new account is created.
pub fn create(
    account_id: Option<&str>,
    provider: EmailProvider,
    callback_url: &str,
) -> RequestDescriptor {
    let d = match account_id {
        Some(id) => RequestDescriptor::from_template(
            HttpMethod::Post,
            ACCOUNT_CONNECT_TOKENS,
            &[id],
            ResponseShape::Dictionary,
        ),
        None => RequestDescriptor::new(
            HttpMethod::Post,
            CONNECT_TOKENS,
            CONNECT_TOKENS,
            ResponseShape::Dictionary,
        ),
    };
    let d = d.with_param("callback_url", callback_url);
    match provider.email_hint() {
        Some(hint) => d.with_param("email", hint),
        None => d,
    }
}

/// Look up a connect token after the user has been redirected back.
pub fn get(token: &str) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        CONNECT_TOKEN,
        &[token],
        ResponseShape::Dictionary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_without_account() {
        let d = create(None, EmailProvider::GenericImap, "myapp://cb");
        assert_eq!(d.method(), HttpMethod::Post);
        assert_eq!(d.path(), "2.0/connect_tokens");
        assert_eq!(d.params().get("callback_url"), Some("myapp://cb"));
        assert!(!d.params().contains_key("email"));
    }

    #[test]
    fn create_for_account_with_gmail_hint() {
        let d = create(Some("acc"), EmailProvider::Gmail, "myapp://cb");
        assert_eq!(d.path(), "2.0/accounts/acc/connect_tokens");
        assert_eq!(d.params().get("email"), Some("@gmail.com"));
    }

    #[test]
    fn get_token() {
        let d = get("tok123");
        assert_eq!(d.method(), HttpMethod::Get);
        assert_eq!(d.path(), "2.0/connect_tokens/tok123");
    }
}
