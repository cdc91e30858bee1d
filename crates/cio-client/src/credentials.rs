//! OAuth credentials and the authentication state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Consumer key/secret plus the per-account token, secret, and account id.
///
/// The consumer pair identifies the API key and is always present; the
/// remaining fields are filled in by the connect-token handshake. Only the
/// account part is ever persisted, as [`StoredTokens`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: Option<String>,
    pub token_secret: Option<String>,
    pub account_id: Option<String>,
}

/// The account half of [`Credentials`], as written to a credential store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub token: String,
    pub token_secret: String,
    pub account_id: String,
}

impl fmt::Debug for StoredTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredTokens")
            .field("token", &"***")
            .field("token_secret", &"***")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl Credentials {
    /// Consumer credentials only (unauthenticated).
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Self::default()
        }
    }

    /// Attach an access token and token secret.
    pub fn with_token(mut self, token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Attach the account id requests are scoped to.
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// True iff token, token secret, and account id are all present.
    pub fn is_authorized(&self) -> bool {
        present(&self.token) && present(&self.token_secret) && present(&self.account_id)
    }

    /// The persistable account tokens, when authorized.
    pub fn stored_tokens(&self) -> Option<StoredTokens> {
        match (&self.token, &self.token_secret, &self.account_id) {
            (Some(token), Some(token_secret), Some(account_id)) if self.is_authorized() => {
                Some(StoredTokens {
                    token: token.clone(),
                    token_secret: token_secret.clone(),
                    account_id: account_id.clone(),
                })
            }
            _ => None,
        }
    }

    /// Replace the account part with previously stored tokens.
    pub fn apply_tokens(&mut self, tokens: StoredTokens) {
        self.token = Some(tokens.token);
        self.token_secret = Some(tokens.token_secret);
        self.account_id = Some(tokens.account_id);
    }

    /// Drop everything except the consumer pair.
    pub fn clear_account(&mut self) {
        self.token = None;
        self.token_secret = None;
        self.account_id = None;
    }
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("token_secret", &self.token_secret.as_ref().map(|_| "***"))
            .field("account_id", &self.account_id)
            .finish()
    }
}

/// Where a client is in the connect-token handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No account token.
    Unauthenticated,
    /// A connect token was requested; waiting for the login to complete.
    PendingToken,
    /// Token, token secret, and account id are all known.
    Authorized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_only_is_not_authorized() {
        assert!(!Credentials::new("k", "s").is_authorized());
    }

    #[test]
    fn token_without_account_is_not_authorized() {
        let creds = Credentials::new("k", "s").with_token("t", "ts");
        assert!(!creds.is_authorized());
    }

    #[test]
    fn full_set_is_authorized() {
        let creds = Credentials::new("k", "s")
            .with_token("t", "ts")
            .with_account_id("acc");
        assert!(creds.is_authorized());
    }

    #[test]
    fn empty_strings_do_not_count() {
        let creds = Credentials::new("k", "s")
            .with_token("", "ts")
            .with_account_id("acc");
        assert!(!creds.is_authorized());
    }

    #[test]
    fn clear_account_keeps_consumer_pair() {
        let mut creds = Credentials::new("k", "s")
            .with_token("t", "ts")
            .with_account_id("acc");
        creds.clear_account();
        assert_eq!(creds, Credentials::new("k", "s"));
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::new("consumer", "consumer-secret-value")
            .with_token("token-value", "token-secret-value")
            .with_account_id("acc");
        let out = format!("{creds:?}");
        assert!(out.contains("consumer"));
        assert!(out.contains("acc"));
        assert!(!out.contains("consumer-secret-value"));
        assert!(!out.contains("token-value"));
        assert!(!out.contains("token-secret-value"));
    }

    #[test]
    fn stored_tokens_need_authorization() {
        assert!(Credentials::new("k", "s").with_token("t", "ts").stored_tokens().is_none());

        let tokens = Credentials::new("k", "s")
            .with_token("t", "ts")
            .with_account_id("acc")
            .stored_tokens()
            .unwrap();
        assert_eq!(tokens.account_id, "acc");

        let mut creds = Credentials::new("k", "s");
        creds.apply_tokens(tokens);
        assert!(creds.is_authorized());
        assert_eq!(creds.consumer_secret, "s");
    }

    #[test]
    fn stored_tokens_serialize_without_consumer_pair() {
        let tokens = Credentials::new("k", "consumer-secret-value")
            .with_token("t", "ts")
            .with_account_id("acc")
            .stored_tokens()
            .unwrap();
        let json = serde_json::to_string(&tokens).unwrap();
        assert_eq!(json, r#"{"token":"t","token_secret":"ts","account_id":"acc"}"#);
        assert!(format!("{tokens:?}").contains("token_secret: \"***\""));
    }
}
