//! authsession - log in to, register with and hold a session against a
//! token-issuing authentication service from the terminal.
//!
//! Each subcommand is one UI action. Notices are printed to stdout and
//! navigation shows up as `-> <view>`.

mod terminal;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authsession_core::auth::{ExternalToken, LoginForm, RegistrationForm};
use authsession_core::session::LoginOutcome;
use authsession_core::{Action, Config, Dispatcher, Outcome, SessionClient, StoreBackend};

use terminal::TerminalFrontend;

// ============================================================================
// Constants
// ============================================================================

const PASSWORD_ENV: &str = "AUTHSESSION_PASSWORD";
const GITHUB_TOKEN_ENV: &str = "AUTHSESSION_GITHUB_TOKEN";
const LOG_DIR_ENV: &str = "AUTHSESSION_LOG_DIR";
const LOG_FILE: &str = "authsession.log";

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "authsession", version, about = "Session client for a token authentication service")]
struct Cli {
    /// Authentication service URL (overrides config and AUTHSESSION_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Token store backend: file, keyring or memory
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in with username and password
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(short, long)]
        username: String,
    },
    /// Exchange a GitHub token for a session (the page-load step)
    Exchange {
        #[arg(env = GITHUB_TOKEN_ENV)]
        token: Option<String>,
    },
    /// Check the stored access token, refreshing it once if it expired
    Validate,
    /// Forget the stored tokens
    Logout,
    /// Show which tokens are stored
    Status,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    config.apply_env()?;
    apply_cli_overrides(&mut config, &cli)?;
    info!(base_url = %config.base_url, store = %config.store, "authsession starting");

    if config.store == StoreBackend::Memory {
        warn!("Memory token store selected; tokens are lost when the command exits");
    }

    let frontend = std::sync::Arc::new(TerminalFrontend::new());
    let session = SessionClient::new(config.client()?, config.open_store()?, frontend);
    let dispatcher = Dispatcher::new(session);

    let login_username = match &cli.command {
        Command::Login { username } => Some(resolve_username(username.clone(), &config)?),
        _ => None,
    };

    let action = match cli.command {
        Command::Login { .. } => {
            let username = login_username.clone().unwrap_or_default();
            Action::Login(LoginForm::new(username, read_password()?))
        }
        Command::Register { email, username } => {
            Action::Register(RegistrationForm::new(email, username, read_password()?))
        }
        Command::Exchange { token } => Action::PageLoaded {
            external_token: ExternalToken(token.unwrap_or_default()),
        },
        Command::Validate => Action::ValidateToken,
        Command::Logout => Action::Logout,
        Command::Status => Action::Status,
    };

    let outcome = dispatcher.dispatch(action).await;

    match outcome {
        Outcome::Login(LoginOutcome::LoggedIn) => {
            if let Some(ref username) = login_username {
                if let Err(e) = Config::remember_username(username) {
                    warn!(error = %format!("{:#}", e), "Failed to remember username");
                }
            }
        }
        Outcome::Status(status) => terminal::print_status(&status),
        _ => {}
    }

    info!(?outcome, "authsession finished");
    Ok(())
}

fn apply_cli_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(ref url) = cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(ref store) = cli.store {
        config.store = store.parse().context("Invalid --store")?;
    }
    Ok(())
}

fn resolve_username(arg: Option<String>, config: &Config) -> Result<String> {
    if let Some(username) = arg {
        return Ok(username);
    }
    match config.last_username {
        Some(ref last_user) => {
            print!("Username [{}]: ", last_user);
            io::stdout().flush()?;
            let input = read_line()?;
            Ok(if input.is_empty() {
                last_user.clone()
            } else {
                input
            })
        }
        None => {
            print!("Username: ");
            io::stdout().flush()?;
            read_line()
        }
    }
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    rpassword::prompt_password("Password: ").context("Failed to read password")
}
