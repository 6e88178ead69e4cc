//! Device-local session manager.
//!
//! Persists the session user as `<state-dir>/electoral_user.json`, the
//! command-line counterpart of the browser's local storage.
//!
//! ```text
//! session-cli login lider@campana.com --password 12345678
//! session-cli can messaging
//! session-cli open /dashboard
//! session-cli logout
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use campaign_auth::domain::{
    AuthState, DEFAULT_LOGIN_PATH, GuardDecision, LoginCredentials, LoginPath, PasswordHasher,
    Permission, SessionManager, guard,
};
use campaign_auth::outbound::credentials::RegistryCredentialRepository;
use campaign_auth::outbound::storage::FileSessionStore;
use campaign_auth::settings::default_registry_path;

#[derive(Debug, Parser)]
#[command(name = "session-cli", about = "Manage the local campaign session")]
struct Cli {
    /// Directory holding the session file.
    #[arg(long, default_value = ".campaign-auth")]
    state_dir: Utf8PathBuf,
    /// Credential registry file; defaults to the bundled demo registry.
    #[arg(long)]
    registry: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in with a username or email address.
    Login {
        identifier: String,
        /// Password; read from the first line of stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove the stored session.
    Logout,
    /// Print the logged-in user as JSON.
    Whoami,
    /// Check whether the logged-in user holds a permission.
    Can { permission: String },
    /// Decide whether a protected route renders or redirects.
    Open {
        route: String,
        #[arg(long, default_value = DEFAULT_LOGIN_PATH)]
        login_path: String,
    },
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build tokio runtime")?;
    let stdout = io::stdout();
    let succeeded = runtime.block_on(run(cli, &mut stdout.lock()))?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Execute one command, returning whether it succeeded.
async fn run(cli: Cli, out: &mut impl Write) -> Result<bool> {
    let store = FileSessionStore::open(&cli.state_dir)
        .wrap_err_with(|| format!("open state directory {}", cli.state_dir))?;
    let hasher = PasswordHasher::default();
    let registry_path = cli.registry.unwrap_or_else(default_registry_path);
    let credentials = RegistryCredentialRepository::load(&registry_path, &hasher)
        .wrap_err_with(|| format!("load credential registry {}", registry_path.display()))?;
    let mut manager = SessionManager::new(Arc::new(credentials), hasher, store);
    manager.restore().wrap_err("restore session")?;

    match cli.command {
        Command::Login {
            identifier,
            password,
        } => {
            let password = match password {
                Some(password) => password,
                None => read_password_line()?,
            };
            let credentials = LoginCredentials::try_from_parts(&identifier, &password)?;
            match manager.login(&credentials).await {
                Ok(user) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&user)?)?;
                    Ok(true)
                }
                Err(error) => {
                    writeln!(out, "{}", error.message())?;
                    Ok(false)
                }
            }
        }
        Command::Logout => {
            manager.logout()?;
            Ok(true)
        }
        Command::Whoami => match manager.current_user() {
            Some(user) => {
                writeln!(out, "{}", serde_json::to_string_pretty(user)?)?;
                Ok(true)
            }
            None => {
                writeln!(out, "not logged in")?;
                Ok(false)
            }
        },
        Command::Can { permission } => {
            let permission = Permission::new(permission)?;
            let granted = manager.has_permission(&permission);
            writeln!(out, "{}", if granted { "granted" } else { "denied" })?;
            Ok(granted)
        }
        Command::Open { route, login_path } => {
            let login_path = LoginPath::new(login_path)?;
            Ok(open(manager.state(), &route, &login_path, out)?)
        }
    }
}

fn open(
    state: &AuthState,
    route: &str,
    login_path: &LoginPath,
    out: &mut impl Write,
) -> io::Result<bool> {
    match guard(state, login_path) {
        GuardDecision::Render => {
            writeln!(out, "render {route}")?;
            Ok(true)
        }
        GuardDecision::Redirect(target) => {
            writeln!(out, "redirect {target}")?;
            Ok(false)
        }
        GuardDecision::Pending => {
            writeln!(out, "pending")?;
            Ok(false)
        }
    }
}

/// Read one line from stdin without trimming spaces; only the line ending is dropped.
fn read_password_line() -> Result<String> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("read password from stdin")?;
    Ok(strip_line_ending(&line).to_owned())
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}
