//! `cio auth` -- connect a mailbox and manage saved credentials.
//!
//! The handshake has two halves because the user finishes it in a browser:
//!
//! ```text
//! cio auth begin --provider gmail --callback https://app.example.com/done
//! # user signs in, browser lands on the callback with ?contextio_token=...
//! cio auth complete <contextio_token>
//! ```

use clap::{Args, ValueEnum};
use cio_client::{AuthState, CioClient, EmailProvider, Params};

/// Mail provider choices for `cio auth begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Imap,
    Gmail,
    Yahoo,
    Aol,
    Hotmail,
}

impl From<ProviderArg> for EmailProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Imap => Self::GenericImap,
            ProviderArg::Gmail => Self::Gmail,
            ProviderArg::Yahoo => Self::Yahoo,
            ProviderArg::Aol => Self::Aol,
            ProviderArg::Hotmail => Self::Hotmail,
        }
    }
}

/// Arguments for `cio auth begin`.
#[derive(Args, Debug)]
pub struct BeginArgs {
    /// Provider the user will sign in to.
    #[arg(long, value_enum, default_value = "imap")]
    pub provider: ProviderArg,

    /// URL the browser is sent to after sign-in.
    #[arg(long)]
    pub callback: String,

    /// Extra connect-token parameters (key=value, repeatable).
    #[arg(short = 'p', long = "param")]
    pub params: Vec<String>,
}

/// Arguments for `cio auth complete`.
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Connect token from the callback URL.
    pub token: String,

    /// Do not save the resulting credentials.
    #[arg(long)]
    pub no_save: bool,
}

/// Request a connect token and print the URL the user must open.
pub async fn begin(client: &mut CioClient, args: BeginArgs) -> anyhow::Result<()> {
    let extra: Params = super::parse_params(&args.params)?;
    let descriptor = client.begin_auth(args.provider.into(), &args.callback, &extra);
    let response = client.execute(&descriptor).await?.into_value();

    match client.redirect_url_from_response(&response) {
        Some(url) => {
            println!("Open this URL to connect the mailbox:");
            println!("  {url}");
            if let Some(token) = response.get("token").and_then(|t| t.as_str()) {
                println!();
                println!("Then run: cio auth complete {token}");
            }
            Ok(())
        }
        None => anyhow::bail!("connect token response has no browser_redirect_url"),
    }
}

/// Look up a connect token and store the account credentials it carries.
pub async fn complete(client: &mut CioClient, args: CompleteArgs) -> anyhow::Result<()> {
    let descriptor = client.fetch_account_with_connect_token(&args.token);
    let response = client.execute(&descriptor).await?.into_value();

    if !client.complete_login(&response, !args.no_save)? {
        anyhow::bail!("connect token {} has not been completed yet", args.token);
    }
    println!(
        "Authorized account {}",
        client.account_id().unwrap_or_default()
    );
    if args.no_save {
        println!("(credentials not saved)");
    }
    Ok(())
}

/// Print the current authentication state.
pub fn status(client: &CioClient) {
    let state = match client.auth_state() {
        AuthState::Unauthenticated => "not connected",
        AuthState::PendingToken => "waiting for connect token",
        AuthState::Authorized => "authorized",
    };
    println!("consumer key: {}", client.credentials().consumer_key);
    println!("state:        {state}");
    if let Some(account_id) = client.account_id() {
        println!("account:      {account_id}");
    }
}

/// Forget saved credentials.
pub fn clear(client: &mut CioClient) -> anyhow::Result<()> {
    client.clear_credentials()?;
    println!("Cleared saved credentials for {}", client.credentials().consumer_key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_mapping() {
        assert_eq!(EmailProvider::from(ProviderArg::Imap), EmailProvider::GenericImap);
        assert_eq!(EmailProvider::from(ProviderArg::Hotmail), EmailProvider::Hotmail);
    }
}
