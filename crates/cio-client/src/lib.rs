//! Client for the Context.IO 2.0 email-metadata REST API.
//!
//! The API exposes accounts, messages, threads, files, sources, contacts,
//! email addresses, webhooks and connect tokens. Everything interesting
//! happens server-side; this crate builds correctly shaped requests, signs
//! them with OAuth 1.0 HMAC-SHA1, and interprets the responses.
//!
//! # Architecture
//!
//! - [`params`] turns typed parameter sets into wire `name → value` maps
//! - [`api`] has one descriptor builder per operation, grouped by resource
//! - [`OAuthSigner`] computes the signature and `Authorization` header
//! - [`Transport`] executes signed requests ([`ReqwestTransport`] by default)
//! - [`CredentialStore`] persists tokens between runs
//! - [`CioClient`] ties these together and runs the connect-token handshake
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cio_client::{CioClient, ClientConfig, Credentials, MessageParams};
//!
//! let credentials = Credentials::new("key", "secret")
//!     .with_token("token", "token-secret")
//!     .with_account_id("4f01234567890abcdef09876");
//! let client = CioClient::new(ClientConfig::default(), credentials)?;
//!
//! let request = client.get_message("gm-1503a2b4c5d6e7f8", &MessageParams::default())?;
//! let message = client.execute(&request).await?;
//! println!("{:?}", message.as_dictionary());
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod params;
pub mod request;
pub mod retry;
pub mod store;
pub mod transport;

pub use api::SearchParams;
pub use api::connect_tokens::EmailProvider;
pub use api::contacts::{ContactSortBy, ContactsParams};
pub use api::files::FilesParams;
pub use api::messages::{
    MessageFlags, MessageParams, MessageUpdateParams, MessagesParams, ThreadParams,
};
pub use api::sources::{
    FolderMessagesParams, NewSource, SourceStatus, SourceType, SourceUpdateParams, SourcesParams,
};
pub use api::webhooks::WebhookParams;
pub use client::CioClient;
pub use config::ClientConfig;
pub use credentials::{AuthState, Credentials, StoredTokens};
pub use error::{ClientError, Result};
pub use oauth::{OAuthSigner, OAuthStamp, SignedRequest};
pub use params::{EncodeParams, IncludeHeaders, Params, SortOrder};
pub use request::{HttpMethod, RequestDescriptor, ResponseShape};
pub use retry::RetryConfig;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use transport::{ApiResponse, RawResponse, ReqwestTransport, Transport};
