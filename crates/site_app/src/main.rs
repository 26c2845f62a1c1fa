mod platform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "site")]
#[command(about = "Account recovery and loading overlay driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(short, long, global = true, default_value = "site.ron")]
    config: PathBuf,

    /// Also write logs to ./site.log
    #[arg(long, global = true)]
    log_file: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a password recovery email
    Forgot {
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password from a recovery link
    Reset {
        /// Link from the recovery email (must carry uid and token)
        #[arg(short, long)]
        link: String,

        #[arg(short, long)]
        password: String,

        /// Repeated password
        #[arg(long)]
        confirm: String,
    },

    /// Play the loading overlay until its clip ends
    Loading,

    /// Remove the session keys from the local store
    Logout,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = if cli.log_file {
        platform::logging::LogDestination::Both
    } else {
        platform::logging::LogDestination::Terminal
    };
    platform::logging::initialize(destination);

    let config = platform::config::SiteConfig::load(&cli.config)?;
    let scenario = match cli.command {
        Commands::Forgot { email } => platform::app::Scenario::Forgot { email },
        Commands::Reset {
            link,
            password,
            confirm,
        } => platform::app::Scenario::Reset {
            link,
            password,
            confirmation: confirm,
        },
        Commands::Loading => platform::app::Scenario::Loading,
        Commands::Logout => platform::app::Scenario::Logout,
    };
    platform::app::run(config, scenario)
}
