//! CLI entry and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use urhobo_core::api::ApiClient;
use urhobo_core::config::{Config, Language};
use urhobo_core::guard::{self, GuardDecision, Route};
use urhobo_core::session::{SessionHandle, SessionStorage};
use urhobo_core::store::LanguageAction;

mod commands;
mod logging;
mod prompt;

#[derive(Parser)]
#[command(name = "urhobo")]
#[command(version)]
#[command(about = "Urhobo dictionary in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Keep the session in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "URHOBO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out (clears the local session)
    Logout,

    /// Create an account
    Signup {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, env = "URHOBO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Confirm the sign-up email with the 6-digit code
    VerifyEmail {
        #[arg(value_name = "CODE")]
        code: Option<String>,
        /// Email to verify (defaults to the one used at sign-up)
        #[arg(long)]
        email: Option<String>,
    },

    /// Send a new sign-up verification code
    ResendCode {
        #[arg(long)]
        email: Option<String>,
    },

    /// Show the signed-in account
    Whoami,

    /// Edit the signed-in account
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Reset a forgotten password (interactive)
    ForgotPassword {
        /// Pre-fill the account email
        #[arg(long)]
        email: Option<String>,
    },

    /// Show suggestions for a prefix
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
        /// Open the best match like pressing Enter
        #[arg(long)]
        open: bool,
    },

    /// Show the full entry for a word
    Word {
        #[arg(value_name = "TERM")]
        term: String,
    },

    /// Show the word of the day
    WordOfDay,

    /// Show or change the interface language
    Language {
        #[command(subcommand)]
        command: LanguageCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ProfileCommands {
    /// Change first and last name
    Name {
        #[arg(value_name = "FULL_NAME", num_args = 1..)]
        name: Vec<String>,
    },
    /// Change username
    Username {
        #[arg(value_name = "USERNAME")]
        username: String,
    },
    /// Upload a profile picture
    Picture {
        #[arg(value_name = "IMAGE")]
        path: PathBuf,
    },
}

#[derive(clap::Subcommand)]
enum LanguageCommands {
    /// Print the active language
    Show,
    /// Set the language (en or urhobo)
    Set {
        #[arg(value_name = "LANGUAGE")]
        language: Language,
    },
    /// Switch between en and urhobo
    Toggle,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

/// Everything a command needs: configuration, the shared session, and the
/// backend client bound to it.
pub struct App {
    pub config: Config,
    pub session: Arc<SessionHandle>,
    pub api: ApiClient,
}

impl App {
    fn open(config: Config, ephemeral: bool) -> Result<Self> {
        let storage = if ephemeral {
            SessionStorage::in_memory()
        } else {
            SessionStorage::open_default().context("open session storage")?
        };
        let session = Arc::new(SessionHandle::new(storage));
        session.bootstrap();
        session.dispatch(LanguageAction::SetLanguage(config.language));

        let api = ApiClient::from_config(&config, Arc::clone(&session))?;
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// Applies the route guard before a command runs.
    ///
    /// # Errors
    /// Fails with a hint when the route redirects.
    pub async fn enter(&self, route: Route) -> Result<()> {
        let decision = self.session.read(|state| guard::guard(route, state));
        tracing::debug!(%route, ?decision, "route guard");
        match decision {
            GuardDecision::Render => Ok(()),
            GuardDecision::Redirect(Route::Landing) => {
                anyhow::bail!("Not signed in. Run `urhobo login` first.")
            }
            GuardDecision::Redirect(Route::Home) => {
                let who = self
                    .session
                    .current_user()
                    .map(|user| user.email)
                    .unwrap_or_default();
                anyhow::bail!("Already signed in as {who}. Run `urhobo logout` first.")
            }
            GuardDecision::Redirect(other) => anyhow::bail!("Redirected to {other}"),
            GuardDecision::Loading => {
                urhobo_core::account::load_profile(&self.api)
                    .await
                    .context("load profile")?;
                Ok(())
            }
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    // Config commands work without a session.
    if let Commands::Config { command } = &cli.command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let config = Config::load().context("load config")?;
    let app = App::open(config, cli.ephemeral)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&app, email, password).await
        }
        Commands::Logout => commands::auth::logout(&app),
        Commands::Signup {
            first_name,
            last_name,
            username,
            email,
            password,
        } => {
            let form = commands::auth::SignupArgs {
                first_name,
                last_name,
                username,
                email,
                password,
            };
            commands::auth::signup(&app, form).await
        }
        Commands::VerifyEmail { code, email } => {
            commands::auth::verify_email(&app, code, email).await
        }
        Commands::ResendCode { email } => commands::auth::resend_code(&app, email).await,
        Commands::Whoami => commands::account::whoami(&app).await,
        Commands::Profile { command } => match command {
            ProfileCommands::Name { name } => {
                commands::account::update_name(&app, &name.join(" ")).await
            }
            ProfileCommands::Username { username } => {
                commands::account::update_username(&app, &username).await
            }
            ProfileCommands::Picture { path } => {
                commands::account::upload_picture(&app, &path).await
            }
        },
        Commands::ForgotPassword { email } => commands::reset::run(&app, email).await,
        Commands::Search { query, open } => commands::search::suggest(&app, &query, open).await,
        Commands::Word { term } => commands::search::word(&app, &term).await,
        Commands::WordOfDay => commands::word::word_of_day(&app).await,
        Commands::Language { command } => match command {
            LanguageCommands::Show => {
                commands::language::show(&app);
                Ok(())
            }
            LanguageCommands::Set { language } => commands::language::set(&app, language),
            LanguageCommands::Toggle => commands::language::toggle(&app),
        },
        Commands::Config { .. } => Ok(()),
    }
}
