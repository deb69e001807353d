use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remiaq_client::filter::ListFilter;

mod commands;
mod config;
mod view;

use commands::{App, CreateArgs, EditArgs};

// Default server URL
const DEFAULT_SERVER: &str = "http://127.0.0.1:8090";

#[derive(Parser)]
#[command(name = "remiaq")]
#[command(about = "Reminder client - manage personal reminders on a remote service")]
#[command(version)]
struct Cli {
    /// Server URL (overrides config)
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a new account
    Register {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Password confirmation (must match --password)
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Log out (clears the local session, no network call)
    Logout,
    /// Show current login status
    Whoami,
    /// List reminders
    List {
        /// Horizon for the upcoming section
        #[arg(long, value_enum, default_value_t = FilterArg::SevenDays)]
        filter: FilterArg,
    },
    /// Show one reminder
    Show { id: String },
    /// Create a reminder
    Create(CreateArgs),
    /// Edit a reminder
    Edit(EditArgs),
    /// Mark a reminder completed
    Complete { id: String },
    /// Snooze a reminder
    Snooze {
        id: String,
        /// Snooze duration in seconds
        seconds: u64,
    },
    /// Delete a reminder
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    /// Next 7 days
    #[value(name = "7d")]
    SevenDays,
    /// One month out
    #[value(name = "1m")]
    OneMonth,
    /// Everything
    All,
}

impl From<FilterArg> for ListFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::SevenDays => ListFilter::SevenDays,
            FilterArg::OneMonth => ListFilter::OneMonth,
            FilterArg::All => ListFilter::All,
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (server)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Get the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "remiaq=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Config management needs no server or session.
    let command = match cli.command {
        Commands::Config { action } => return handle_config_command(action),
        command => command,
    };

    let config = config::Config::load().unwrap_or_default();
    let server = cli
        .server
        .or(config.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    tracing::debug!(%server, "using server");
    let mut app = App::new(&server)?;

    match command {
        Commands::Login { email, password } => app.login(&email, password).await,
        Commands::Register {
            email,
            password,
            confirm,
        } => app.register(&email, password, confirm).await,
        Commands::Logout => app.logout(),
        Commands::Whoami => {
            app.whoami();
            Ok(())
        }
        Commands::List { filter } => app.list(filter.into()).await,
        Commands::Show { id } => app.show(&id).await,
        Commands::Create(args) => app.create(args).await,
        Commands::Edit(args) => app.edit(args).await,
        Commands::Complete { id } => app.complete(&id).await,
        Commands::Snooze { id, seconds } => app.snooze(&id, seconds).await,
        Commands::Delete { id, yes } => app.delete(&id, yes).await,
        Commands::Config { .. } => unreachable!("handled above"),
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = config::Config::load().unwrap_or_default();
            match key.as_str() {
                "server" => config.server = Some(value),
                _ => anyhow::bail!("Unknown config key: {}. Valid keys: server", key),
            }
            config.save()?;
            println!("Configuration saved");
        }
        ConfigAction::Get { key } => {
            let config = config::Config::load()?;
            let value = match key.as_str() {
                "server" => config.server.unwrap_or_default(),
                _ => anyhow::bail!("Unknown config key: {}", key),
            };
            println!("{}", value);
        }
        ConfigAction::Show => {
            let config = config::Config::load()?;
            println!("server: {}", config.server.unwrap_or_default());
        }
        ConfigAction::Path => {
            let path = config::Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
