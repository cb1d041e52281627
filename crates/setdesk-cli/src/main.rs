mod cmd;
mod context;
mod output;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, import::ImportSubcommand, setting::SettingSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "setdesk",
    about = "Onboarding PC setting requests and their quick actions",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (default: built-in defaults plus SETDESK_* env)
    #[arg(long, global = true, env = "SETDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind address (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on, 0 = OS-assigned (default: server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create settings for inventory computers in SETTING status
    Sync,

    /// Show which quick actions apply per onboarding type and OS
    Catalog,

    /// Manage settings
    Setting {
        #[command(subcommand)]
        subcommand: SettingSubcommand,
    },

    /// Run a quick action (okta-setting, win-setting, o365-intune,
    /// password-notice, pickup-notice, okta-activate)
    Action {
        kind: String,
        /// Setting id; repeat for a batch
        #[arg(long = "id", value_name = "ID", required = true)]
        ids: Vec<String>,
        /// Who requested the action
        #[arg(long = "by", value_name = "NAME")]
        requested_by: String,
    },

    /// Load employees or inventory computers
    Import {
        #[command(subcommand)]
        subcommand: ImportSubcommand,
    },

    /// Validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Sync => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve { host, port } => cmd::serve::run(config, host, port),
        Commands::Sync => cmd::sync::run(config, cli.json),
        Commands::Catalog => cmd::catalog::run(cli.json),
        Commands::Setting { subcommand } => cmd::setting::run(config, subcommand, cli.json),
        Commands::Action {
            kind,
            ids,
            requested_by,
        } => cmd::action::run(config, &kind, ids, &requested_by, cli.json),
        Commands::Import { subcommand } => cmd::import::run(config, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(config, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
