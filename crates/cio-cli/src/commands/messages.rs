//! `cio messages` -- list and inspect messages of the connected account.

use clap::{Args, ValueEnum};
use cio_client::{
    CioClient, IncludeHeaders, MessageParams, MessagesParams, SearchParams, ThreadParams,
};

/// `--headers` choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeadersArg {
    Off,
    Parsed,
    Raw,
}

impl From<HeadersArg> for IncludeHeaders {
    fn from(arg: HeadersArg) -> Self {
        match arg {
            HeadersArg::Off => Self::No,
            HeadersArg::Parsed => Self::Parsed,
            HeadersArg::Raw => Self::Raw,
        }
    }
}

/// Arguments for `cio messages list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Sender address(es), comma-separated.
    #[arg(long)]
    pub from: Option<String>,

    /// Recipient address(es), comma-separated.
    #[arg(long)]
    pub to: Option<String>,

    /// Subject, or a `/regex/`.
    #[arg(long)]
    pub subject: Option<String>,

    /// Only messages in this folder.
    #[arg(long)]
    pub folder: Option<String>,

    /// Include message bodies.
    #[arg(long)]
    pub body: bool,

    #[arg(long, default_value = "20")]
    pub limit: u32,

    #[arg(long)]
    pub offset: Option<u32>,
}

impl ListArgs {
    fn params(&self) -> MessagesParams {
        MessagesParams {
            search: SearchParams {
                from: self.from.clone(),
                to: self.to.clone(),
                limit: Some(self.limit),
                offset: self.offset,
                ..SearchParams::default()
            },
            subject: self.subject.clone(),
            folder: self.folder.clone(),
            include_body: self.body.then_some(true),
            ..MessagesParams::default()
        }
    }
}

/// Arguments for `cio messages get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Message id, email message id, or `gm-` Gmail id.
    pub id: String,

    /// Include the body.
    #[arg(long)]
    pub body: bool,

    /// Include headers.
    #[arg(long, value_enum)]
    pub headers: Option<HeadersArg>,

    /// Include IMAP flags.
    #[arg(long)]
    pub flags: bool,
}

impl GetArgs {
    fn params(&self) -> MessageParams {
        MessageParams {
            thread: ThreadParams {
                include_body: self.body.then_some(true),
                include_headers: self.headers.map(Into::into),
                include_flags: self.flags.then_some(true),
                ..ThreadParams::default()
            },
            ..MessageParams::default()
        }
    }
}

pub async fn list(client: &CioClient, args: ListArgs) -> anyhow::Result<()> {
    let descriptor = client.get_messages(&args.params())?;
    let response = client.execute(&descriptor).await?;
    super::print_response(response, None)
}

pub async fn get(client: &CioClient, args: GetArgs) -> anyhow::Result<()> {
    let descriptor = client.get_message(&args.id, &args.params())?;
    let response = client.execute(&descriptor).await?;
    super::print_response(response, None)
}
