//! The client façade.
//!
//! [`CioClient`] owns the credentials and the account they are scoped to,
//! builds descriptors for every API operation, signs them, and executes them
//! through a [`Transport`]. Methods that change credentials take `&mut self`;
//! share a client across tasks behind a lock.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::connect_tokens::EmailProvider;
use crate::api::contacts::ContactsParams;
use crate::api::files::FilesParams;
use crate::api::messages::{
    MessageFlags, MessageParams, MessageUpdateParams, MessagesParams, ThreadParams,
};
use crate::api::sources::{FolderMessagesParams, NewSource, SourceUpdateParams, SourcesParams};
use crate::api::webhooks::WebhookParams;
use crate::api::{
    account, connect_tokens, contacts, email_addresses, files, messages, sources, threads,
    webhooks,
};
use crate::config::ClientConfig;
use crate::credentials::{AuthState, Credentials};
use crate::error::{ClientError, Result};
use crate::oauth::{OAuthSigner, SignedRequest};
use crate::params::Params;
use crate::request::RequestDescriptor;
use crate::retry::{RetryConfig, compute_delay, is_retryable};
use crate::store::CredentialStore;
use crate::transport::{ApiResponse, ReqwestTransport, Transport};

/// Context.IO API client.
pub struct CioClient {
    config: ClientConfig,
    credentials: Credentials,
    auth_state: AuthState,
    signer: OAuthSigner,
    transport: Arc<dyn Transport>,
    store: Option<Arc<dyn CredentialStore>>,
}

impl std::fmt::Debug for CioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CioClient")
            .field("base_url", &self.config.base_url)
            .field("credentials", &self.credentials)
            .field("auth_state", &self.auth_state)
            .field("store", &self.store.is_some())
            .finish()
    }
}

impl CioClient {
    /// Create a client with the default reqwest transport and no store.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        let signer = OAuthSigner::new(&config.base_url)?;
        let transport = Arc::new(ReqwestTransport::from_config(&config)?);
        let auth_state = if credentials.is_authorized() {
            AuthState::Authorized
        } else {
            AuthState::Unauthenticated
        };
        Ok(Self {
            config,
            credentials,
            auth_state,
            signer,
            transport,
            store: None,
        })
    }

    /// Create a client whose consumer pair comes from the environment
    /// variables named in `config`.
    pub fn from_env(config: ClientConfig) -> Result<Self> {
        let credentials = config.consumer_credentials()?;
        Self::new(config, credentials)
    }

    /// Persist credentials through `store`.
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Send requests through `transport` instead of reqwest.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn account_id(&self) -> Option<&str> {
        self.credentials.account_id.as_deref()
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    /// True iff token, token secret, and account id are all known.
    pub fn is_authorized(&self) -> bool {
        self.credentials.is_authorized()
    }

    /// Load saved credentials for this consumer key from the store.
    ///
    /// Returns `Ok(false)` when there is no store or nothing saved. The
    /// consumer pair given at construction is kept.
    pub fn restore_credentials(&mut self) -> Result<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        let Some(saved) = store.load(&self.credentials.consumer_key)? else {
            return Ok(false);
        };
        self.credentials.apply_tokens(saved);
        self.auth_state = if self.credentials.is_authorized() {
            AuthState::Authorized
        } else {
            AuthState::Unauthenticated
        };
        debug!(state = ?self.auth_state, "restored credentials");
        Ok(true)
    }

    fn account(&self) -> Result<&str> {
        self.account_id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::MissingCredentials("account id".into()))
    }

    // -- signing and execution --

    /// Sign with a fresh nonce and timestamp.
    pub fn sign(&self, descriptor: &RequestDescriptor) -> Result<SignedRequest> {
        self.signer.sign(descriptor, &self.credentials)
    }

    /// Sign, send, and interpret the response by the descriptor's shape.
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<ApiResponse> {
        let signed = self.sign(descriptor)?;
        let response = self.transport.send(&signed).await?.error_for_status()?;
        ApiResponse::from_body(descriptor.shape(), response.body)
    }

    /// [`execute`](Self::execute), retrying transient failures with
    /// exponential backoff. Every attempt is signed again.
    pub async fn execute_with_retry(
        &self,
        descriptor: &RequestDescriptor,
        retry: &RetryConfig,
    ) -> Result<ApiResponse> {
        let mut attempt = 0;
        loop {
            match self.execute(descriptor).await {
                Ok(response) => {
                    if attempt > 0 {
                        debug!(path = %descriptor.path(), attempt, "request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(err) if is_retryable(&err) && attempt < retry.max_retries => {
                    let delay = compute_delay(retry, attempt);
                    warn!(
                        path = %descriptor.path(),
                        attempt = attempt + 1,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    // -- authentication --

    /// Start the connect-token handshake.
    ///
    /// When the client is already authorized the new mailbox is attached to
    /// the current account. Execute the returned descriptor and pass the
    /// response to [`redirect_url_from_response`](Self::redirect_url_from_response).
    pub fn begin_auth(
        &mut self,
        provider: EmailProvider,
        callback_url: &str,
        extra: &Params,
    ) -> RequestDescriptor {
        let account_id = if self.is_authorized() {
            self.account_id()
        } else {
            None
        };
        let descriptor =
            connect_tokens::create(account_id, provider, callback_url).with_params(extra);
        self.auth_state = AuthState::PendingToken;
        debug!(?provider, "connect token requested");
        descriptor
    }

    /// Pull the browser URL out of a connect-token response.
    ///
    /// If the response also carries a temporary `access_token` /
    /// `access_token_secret`, they are kept so the token lookup that follows
    /// is signed with them.
    pub fn redirect_url_from_response(&mut self, response: &Value) -> Option<String> {
        let token = str_field(response, "access_token");
        let secret = str_field(response, "access_token_secret");
        if let (Some(token), Some(secret)) = (token, secret) {
            self.credentials.token = Some(token.to_string());
            self.credentials.token_secret = Some(secret.to_string());
        }
        str_field(response, "browser_redirect_url").map(str::to_string)
    }

    /// Look up a connect token after the user was sent back to the callback.
    pub fn fetch_account_with_connect_token(&self, token: &str) -> RequestDescriptor {
        connect_tokens::get(token)
    }

    /// Finish the handshake from a connect-token lookup response.
    ///
    /// Reads `access_token`, `access_token_secret` and `account.id`. A
    /// response missing any of them returns `Ok(false)` and leaves the
    /// credentials as they were. With `save`, the new credentials are
    /// written to the store; only a store failure is an error.
    pub fn complete_login(&mut self, response: &Value, save: bool) -> Result<bool> {
        let token = str_field(response, "access_token");
        let secret = str_field(response, "access_token_secret");
        let account_id = response
            .get("account")
            .and_then(|account| str_field(account, "id"));

        let (Some(token), Some(secret), Some(account_id)) = (token, secret, account_id) else {
            warn!("connect token response missing access token, secret, or account id");
            return Ok(false);
        };

        self.credentials.token = Some(token.to_string());
        self.credentials.token_secret = Some(secret.to_string());
        self.credentials.account_id = Some(account_id.to_string());
        self.auth_state = AuthState::Authorized;
        info!(account_id, "login complete");

        if save {
            match (&self.store, self.credentials.stored_tokens()) {
                (Some(store), Some(tokens)) => store.save(&self.credentials.consumer_key, &tokens)?,
                _ => debug!("no credential store configured; not saving"),
            }
        }
        Ok(true)
    }

    /// Forget the account token and id, here and in the store.
    pub fn clear_credentials(&mut self) -> Result<()> {
        self.credentials.clear_account();
        self.auth_state = AuthState::Unauthenticated;
        if let Some(store) = &self.store {
            store.clear(&self.credentials.consumer_key)?;
        }
        debug!("credentials cleared");
        Ok(())
    }

    // -- account --

    pub fn get_account(&self) -> Result<RequestDescriptor> {
        Ok(account::get(self.account()?))
    }

    pub fn update_account(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<RequestDescriptor> {
        Ok(account::update(self.account()?, first_name, last_name))
    }

    pub fn delete_account(&self) -> Result<RequestDescriptor> {
        Ok(account::delete(self.account()?))
    }

    // -- contacts --

    pub fn get_contacts(&self, params: &ContactsParams) -> Result<RequestDescriptor> {
        Ok(contacts::list(self.account()?, params))
    }

    pub fn get_contact(&self, email: &str) -> Result<RequestDescriptor> {
        Ok(contacts::get(self.account()?, email))
    }

    pub fn get_contact_files(&self, email: &str) -> Result<RequestDescriptor> {
        Ok(contacts::files(self.account()?, email))
    }

    pub fn get_contact_messages(&self, email: &str) -> Result<RequestDescriptor> {
        Ok(contacts::messages(self.account()?, email))
    }

    pub fn get_contact_threads(&self, email: &str) -> Result<RequestDescriptor> {
        Ok(contacts::threads(self.account()?, email))
    }

    // -- email addresses --

    pub fn get_email_addresses(&self) -> Result<RequestDescriptor> {
        Ok(email_addresses::list(self.account()?))
    }

    pub fn add_email_address(&self, email: &str) -> Result<RequestDescriptor> {
        Ok(email_addresses::add(self.account()?, email))
    }

    pub fn update_email_address(&self, email: &str, primary: bool) -> Result<RequestDescriptor> {
        Ok(email_addresses::update(self.account()?, email, primary))
    }

    pub fn delete_email_address(&self, email: &str) -> Result<RequestDescriptor> {
        Ok(email_addresses::delete(self.account()?, email))
    }

    // -- files --

    pub fn get_files(&self, params: &FilesParams) -> Result<RequestDescriptor> {
        Ok(files::list(self.account()?, params))
    }

    pub fn get_file(&self, file_id: &str) -> Result<RequestDescriptor> {
        Ok(files::get(self.account()?, file_id))
    }

    pub fn get_file_changes(&self, file_id: &str) -> Result<RequestDescriptor> {
        Ok(files::changes(self.account()?, file_id))
    }

    pub fn get_file_content_url(&self, file_id: &str) -> Result<RequestDescriptor> {
        Ok(files::content_url(self.account()?, file_id))
    }

    pub fn download_file_content(&self, file_id: &str) -> Result<RequestDescriptor> {
        Ok(files::content(self.account()?, file_id))
    }

    pub fn get_related_files(&self, file_id: &str) -> Result<RequestDescriptor> {
        Ok(files::related(self.account()?, file_id))
    }

    pub fn get_file_revisions(&self, file_id: &str) -> Result<RequestDescriptor> {
        Ok(files::revisions(self.account()?, file_id))
    }

    // -- messages --

    pub fn get_messages(&self, params: &MessagesParams) -> Result<RequestDescriptor> {
        Ok(messages::list(self.account()?, params))
    }

    pub fn get_message(&self, message_id: &str, params: &MessageParams) -> Result<RequestDescriptor> {
        Ok(messages::get(self.account()?, message_id, params))
    }

    pub fn update_message(
        &self,
        message_id: &str,
        dst_folder: &str,
        params: &MessageUpdateParams,
    ) -> Result<RequestDescriptor> {
        Ok(messages::update(self.account()?, message_id, dst_folder, params))
    }

    pub fn delete_message(&self, message_id: &str) -> Result<RequestDescriptor> {
        Ok(messages::delete(self.account()?, message_id))
    }

    pub fn get_message_body(
        &self,
        message_id: &str,
        body_type: Option<&str>,
    ) -> Result<RequestDescriptor> {
        Ok(messages::body(self.account()?, message_id, body_type))
    }

    pub fn get_message_flags(&self, message_id: &str) -> Result<RequestDescriptor> {
        Ok(messages::flags(self.account()?, message_id))
    }

    pub fn update_message_flags(
        &self,
        message_id: &str,
        flags: &MessageFlags,
    ) -> Result<RequestDescriptor> {
        Ok(messages::update_flags(self.account()?, message_id, flags))
    }

    pub fn get_message_folders(&self, message_id: &str) -> Result<RequestDescriptor> {
        Ok(messages::folders(self.account()?, message_id))
    }

    pub fn update_message_folders(
        &self,
        message_id: &str,
        add: Option<&str>,
        remove: Option<&str>,
    ) -> Result<RequestDescriptor> {
        Ok(messages::update_folders(self.account()?, message_id, add, remove))
    }

    /// See [`messages::set_folders`]; the descriptor is marked unverified.
    pub fn set_message_folders<S: AsRef<str>>(
        &self,
        message_id: &str,
        names: &[S],
        symbolic_names: &[S],
    ) -> Result<RequestDescriptor> {
        Ok(messages::set_folders(
            self.account()?,
            message_id,
            names,
            symbolic_names,
        ))
    }

    pub fn get_message_headers(&self, message_id: &str) -> Result<RequestDescriptor> {
        Ok(messages::headers(self.account()?, message_id))
    }

    pub fn get_message_raw_headers(&self, message_id: &str) -> Result<RequestDescriptor> {
        Ok(messages::raw_headers(self.account()?, message_id))
    }

    pub fn get_message_source(&self, message_id: &str) -> Result<RequestDescriptor> {
        Ok(messages::source(self.account()?, message_id))
    }

    pub fn get_message_thread(
        &self,
        message_id: &str,
        params: &ThreadParams,
    ) -> Result<RequestDescriptor> {
        Ok(messages::thread(self.account()?, message_id, params))
    }

    // -- sources --

    pub fn get_sources(&self, params: &SourcesParams) -> Result<RequestDescriptor> {
        Ok(sources::list(self.account()?, params))
    }

    pub fn create_source(&self, source: &NewSource) -> Result<RequestDescriptor> {
        Ok(sources::create(self.account()?, source))
    }

    pub fn get_source(&self, label: &str) -> Result<RequestDescriptor> {
        Ok(sources::get(self.account()?, label))
    }

    pub fn update_source(
        &self,
        label: &str,
        params: &SourceUpdateParams,
    ) -> Result<RequestDescriptor> {
        Ok(sources::update(self.account()?, label, params))
    }

    pub fn delete_source(&self, label: &str) -> Result<RequestDescriptor> {
        Ok(sources::delete(self.account()?, label))
    }

    pub fn get_source_folders(
        &self,
        label: &str,
        include_extended_counts: bool,
        no_cache: bool,
    ) -> Result<RequestDescriptor> {
        Ok(sources::folders(
            self.account()?,
            label,
            include_extended_counts,
            no_cache,
        ))
    }

    pub fn get_folder(
        &self,
        folder_path: &str,
        label: &str,
        include_extended_counts: bool,
        delim: Option<&str>,
    ) -> Result<RequestDescriptor> {
        Ok(sources::folder(
            self.account()?,
            label,
            folder_path,
            include_extended_counts,
            delim,
        ))
    }

    pub fn create_folder(
        &self,
        folder_path: &str,
        label: &str,
        delim: Option<&str>,
    ) -> Result<RequestDescriptor> {
        Ok(sources::create_folder(self.account()?, label, folder_path, delim))
    }

    pub fn delete_folder(&self, folder_path: &str, label: &str) -> Result<RequestDescriptor> {
        Ok(sources::delete_folder(self.account()?, label, folder_path))
    }

    pub fn expunge_folder(&self, folder_path: &str, label: &str) -> Result<RequestDescriptor> {
        Ok(sources::expunge_folder(self.account()?, label, folder_path))
    }

    pub fn get_folder_messages(
        &self,
        folder_path: &str,
        label: &str,
        params: &FolderMessagesParams,
    ) -> Result<RequestDescriptor> {
        Ok(sources::folder_messages(
            self.account()?,
            label,
            folder_path,
            params,
        ))
    }

    pub fn get_source_sync_status(&self, label: &str) -> Result<RequestDescriptor> {
        Ok(sources::sync_status(self.account()?, label))
    }

    pub fn force_source_sync(&self, label: &str) -> Result<RequestDescriptor> {
        Ok(sources::force_sync(self.account()?, label))
    }

    pub fn get_sync_status(&self) -> Result<RequestDescriptor> {
        Ok(sources::account_sync_status(self.account()?))
    }

    pub fn force_sync(&self) -> Result<RequestDescriptor> {
        Ok(sources::force_account_sync(self.account()?))
    }

    // -- threads --

    pub fn get_threads(&self, extra: &Params) -> Result<RequestDescriptor> {
        Ok(threads::list(self.account()?, extra))
    }

    pub fn get_thread(&self, thread_id: &str, extra: &Params) -> Result<RequestDescriptor> {
        Ok(threads::get(self.account()?, thread_id, extra))
    }

    // -- webhooks --

    pub fn get_webhooks(&self, extra: &Params) -> Result<RequestDescriptor> {
        Ok(webhooks::list(self.account()?, extra))
    }

    pub fn create_webhook(
        &self,
        callback_url: &str,
        failure_notif_url: &str,
        params: &WebhookParams,
    ) -> Result<RequestDescriptor> {
        Ok(webhooks::create(
            self.account()?,
            callback_url,
            failure_notif_url,
            params,
        ))
    }

    pub fn get_webhook(&self, webhook_id: &str, extra: &Params) -> Result<RequestDescriptor> {
        Ok(webhooks::get(self.account()?, webhook_id, extra))
    }

    pub fn update_webhook(&self, webhook_id: &str, extra: &Params) -> Result<RequestDescriptor> {
        Ok(webhooks::update(self.account()?, webhook_id, extra))
    }

    pub fn delete_webhook(&self, webhook_id: &str) -> Result<RequestDescriptor> {
        Ok(webhooks::delete(self.account()?, webhook_id))
    }
}

/// Non-empty string field of a JSON object.
fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}
