//! `cio` -- command-line client for the Context.IO 2.0 API.
//!
//! Provides the following subcommands:
//!
//! - `cio auth` -- Connect a mailbox and manage saved credentials.
//! - `cio messages` -- List and inspect messages.
//! - `cio sign` -- Print a signed request without sending it.
//! - `cio request` -- Send an arbitrary signed request.
//! - `cio config` -- Show resolved configuration.
//!
//! The consumer key and secret are read from `CIO_CONSUMER_KEY` and
//! `CIO_CONSUMER_SECRET` unless the config names other variables.

use clap::{Parser, Subcommand};

mod commands;

/// Context.IO API CLI.
#[derive(Parser)]
#[command(name = "cio", about = "Context.IO API CLI", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (overrides auto-discovery).
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Connect a mailbox and manage saved credentials.
    Auth {
        #[command(subcommand)]
        action: AuthCmd,
    },

    /// List and inspect messages.
    Messages {
        #[command(subcommand)]
        action: MessagesCmd,
    },

    /// Print the signed form of a request without sending it.
    Sign(commands::request::SignArgs),

    /// Send a signed request and print the response.
    Request(commands::request::RequestArgs),

    /// Show resolved configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCmd,
    },
}

/// Subcommands for `cio auth`.
#[derive(Subcommand)]
enum AuthCmd {
    /// Request a connect token and print the sign-in URL.
    Begin(commands::auth::BeginArgs),

    /// Finish sign-in with the connect token from the callback.
    Complete(commands::auth::CompleteArgs),

    /// Show the current authentication state.
    Status,

    /// Forget saved credentials.
    Clear,
}

/// Subcommands for `cio messages`.
#[derive(Subcommand)]
enum MessagesCmd {
    /// List messages.
    List(commands::messages::ListArgs),

    /// Show one message.
    Get(commands::messages::GetArgs),
}

/// Subcommands for `cio config`.
#[derive(Subcommand)]
enum ConfigCmd {
    /// Show the full resolved configuration.
    Show,

    /// Show which config file and credentials directory are in use.
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Config { action } => match action {
            ConfigCmd::Show => commands::config_cmd::config_show(&config),
            ConfigCmd::Path => commands::config_cmd::config_path(&config),
        },
        Commands::Auth { action } => {
            let mut client = commands::build_client(config)?;
            match action {
                AuthCmd::Begin(args) => commands::auth::begin(&mut client, args).await?,
                AuthCmd::Complete(args) => commands::auth::complete(&mut client, args).await?,
                AuthCmd::Status => commands::auth::status(&client),
                AuthCmd::Clear => commands::auth::clear(&mut client)?,
            }
        }
        Commands::Messages { action } => {
            let client = commands::build_client(config)?;
            match action {
                MessagesCmd::List(args) => commands::messages::list(&client, args).await?,
                MessagesCmd::Get(args) => commands::messages::get(&client, args).await?,
            }
        }
        Commands::Sign(args) => {
            let client = commands::build_client(config)?;
            commands::request::sign(&client, args)?;
        }
        Commands::Request(args) => {
            let client = commands::build_client(config)?;
            commands::request::request(&client, args).await?;
        }
    }

    Ok(())
}
