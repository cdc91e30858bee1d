//! OAuth 1.0 HMAC-SHA1 request signing.
//!
//! The server verifies every request against the same normalization, so
//! everything here is a hard wire contract:
//!
//! 1. Protocol parameters: consumer key, nonce, timestamp, signature
//!    method `HMAC-SHA1`, version `1.0`, and the token when present.
//! 2. Merged with the request's own parameters, every key and value is
//!    percent-encoded (RFC 3986 unreserved characters kept), sorted by key
//!    then value, and joined as `k=v` pairs with `&`.
//! 3. Base string: `METHOD&enc(base_url)&enc(param_string)`.
//! 4. Key: `enc(consumer_secret)&enc(token_secret)`.
//! 5. Signature: `base64(HMAC-SHA1(key, base_string))`.
//!
//! GET parameters go in the query string; other methods send them as an
//! `application/x-www-form-urlencoded` body.

use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;
use tracing::{debug, warn};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{ClientError, Result};
use crate::request::{HttpMethod, RequestDescriptor};

type HmacSha1 = Hmac<Sha1>;

/// Characters left alone by OAuth encoding: ALPHA, DIGIT, `-`, `.`, `_`, `~`.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Same as [`UNRESERVED`] but keeps `/` for folder hierarchies.
const UNRESERVED_PATH: &AsciiSet = &UNRESERVED.remove(b'/');

const NONCE_LEN: usize = 32;

pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const OAUTH_VERSION: &str = "1.0";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Percent-encode per the OAuth unreserved-character rule (uppercase hex).
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED).to_string()
}

/// Percent-encode a folder path, keeping `/` as the delimiter.
pub fn percent_encode_path(input: &str) -> String {
    utf8_percent_encode(input, UNRESERVED_PATH).to_string()
}

/// Nonce and timestamp for one signing pass.
///
/// A stamp must never be reused: a retried request gets a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthStamp {
    pub nonce: String,
    pub timestamp: i64,
}

impl OAuthStamp {
    /// A random alphanumeric nonce and the current Unix time.
    pub fn fresh() -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        Self {
            nonce,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn new(nonce: impl Into<String>, timestamp: i64) -> Self {
        Self {
            nonce: nonce.into(),
            timestamp,
        }
    }
}

/// A signed request, ready for a transport.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    descriptor: RequestDescriptor,
    url: Url,
    authorization: String,
    body: Option<String>,
}

impl SignedRequest {
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn method(&self) -> HttpMethod {
        self.descriptor.method()
    }

    /// Final URL including the query string for GET requests.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Form-encoded body for non-GET requests with parameters.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// `Content-Type` to send alongside [`body`](Self::body).
    pub fn content_type(&self) -> Option<&'static str> {
        self.body.as_ref().map(|_| FORM_CONTENT_TYPE)
    }

    /// Headers the transport must send.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Authorization", self.authorization.clone())];
        if let Some(ct) = self.content_type() {
            headers.push(("Content-Type", ct.to_string()));
        }
        headers
    }
}

/// Signs descriptors against a fixed API base URL.
#[derive(Debug, Clone)]
pub struct OAuthSigner {
    base_url: Url,
}

impl OAuthSigner {
    /// Create a signer for `base_url` (e.g. `https://api.context.io`).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url =
            Url::parse(&base).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sign with a fresh nonce and timestamp.
    pub fn sign(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &Credentials,
    ) -> Result<SignedRequest> {
        self.sign_with(descriptor, credentials, &OAuthStamp::fresh())
    }

    /// Sign with an explicit nonce and timestamp.
    pub fn sign_with(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &Credentials,
        stamp: &OAuthStamp,
    ) -> Result<SignedRequest> {
        if credentials.consumer_key.is_empty() {
            return Err(ClientError::MissingCredentials("consumer key".into()));
        }
        if credentials.consumer_secret.is_empty() {
            return Err(ClientError::MissingCredentials("consumer secret".into()));
        }
        if descriptor.is_unverified() {
            warn!(
                path = %descriptor.path(),
                "signing operation with an unverified wire contract"
            );
        }

        let url = self.endpoint(descriptor)?;
        let base_url = normalized_base_url(&url);

        let oauth = protocol_params(credentials, stamp);
        let request_params: Vec<(&str, &str)> = descriptor.params().iter().collect();
        let all = oauth
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(request_params.iter().copied());
        let param_string = normalize_parameters(all);

        let base_string = signature_base_string(descriptor.method(), &base_url, &param_string);
        let signature = hmac_sha1_signature(
            &credentials.consumer_secret,
            credentials.token_secret.as_deref(),
            &base_string,
        );

        let authorization = authorization_header(&oauth, &signature);

        let encoded_params = normalize_parameters(request_params.iter().copied());
        let (url, body) = if descriptor.method().params_in_query() {
            let mut url = url;
            if !encoded_params.is_empty() {
                url.set_query(Some(&encoded_params));
            }
            (url, None)
        } else if encoded_params.is_empty() {
            (url, None)
        } else {
            (url, Some(encoded_params))
        };

        debug!(
            method = %descriptor.method(),
            path = %descriptor.path(),
            params = descriptor.params().len(),
            "signed request"
        );

        Ok(SignedRequest {
            descriptor: descriptor.clone(),
            url,
            authorization,
            body,
        })
    }

    /// Absolute URL for `descriptor`.
    ///
    /// The joined URL must carry the descriptor's path verbatim: `.`/`..`
    /// segments, queries and fragments would send (and sign) the request for
    /// a different resource, so they are rejected.
    fn endpoint(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        let path = descriptor.path().trim_start_matches('/');
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("{path}: {e}")))?;

        let expected = format!("{}{path}", self.base_url.path());
        if url.path() != expected || url.query().is_some() || url.fragment().is_some() {
            return Err(ClientError::InvalidUrl(format!(
                "{path}: resolves to {} instead",
                url.path()
            )));
        }
        Ok(url)
    }
}

/// OAuth protocol parameters, in a fixed order for header rendering.
fn protocol_params(credentials: &Credentials, stamp: &OAuthStamp) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("oauth_consumer_key", credentials.consumer_key.clone()),
        ("oauth_nonce", stamp.nonce.clone()),
        ("oauth_signature_method", SIGNATURE_METHOD.to_string()),
        ("oauth_timestamp", stamp.timestamp.to_string()),
    ];
    if let Some(token) = credentials.token.as_deref().filter(|t| !t.is_empty()) {
        params.push(("oauth_token", token.to_string()));
    }
    params.push(("oauth_version", OAUTH_VERSION.to_string()));
    params
}

/// `scheme://host[:port]/path`, lowercase scheme and host, no default port,
/// no query or fragment.
pub fn normalized_base_url(url: &Url) -> String {
    let scheme = url.scheme().to_ascii_lowercase();
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    match url.port() {
        Some(port) => format!("{scheme}://{host}:{port}{}", url.path()),
        None => format!("{scheme}://{host}{}", url.path()),
    }
}

/// Percent-encode, sort by key then value, and join as `k=v&k=v`.
///
/// The result does not depend on the order the pairs arrive in.
pub fn normalize_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD&enc(base_url)&enc(param_string)`.
pub fn signature_base_string(method: HttpMethod, base_url: &str, param_string: &str) -> String {
    format!(
        "{}&{}&{}",
        method.as_str(),
        percent_encode(base_url),
        percent_encode(param_string)
    )
}

/// `base64(HMAC-SHA1(enc(consumer_secret)&enc(token_secret), base_string))`.
pub fn hmac_sha1_signature(
    consumer_secret: &str,
    token_secret: Option<&str>,
    base_string: &str,
) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take a key of any size");
    mac.update(base_string.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

fn authorization_header(oauth: &[(&'static str, String)], signature: &str) -> String {
    let pairs = oauth
        .iter()
        .map(|(k, v)| (*k, v.as_str()))
        .chain(std::iter::once(("oauth_signature", signature)))
        .map(|(k, v)| format!("{k}=\"{}\"", percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {pairs}")
}
