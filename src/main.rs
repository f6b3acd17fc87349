use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinpeek::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinpeek::AppCommand {
    fn from(cmd: Commands) -> coinpeek::AppCommand {
        match cmd {
            Commands::Lookup {
                address,
                address_type,
                json,
            } => coinpeek::AppCommand::Lookup {
                address,
                address_type,
                json,
            },
            Commands::Serve => coinpeek::AppCommand::Serve,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Look up the balance and USD value of an address
    Lookup {
        address: String,
        /// One of bitcoin, ethereum, bitcoincash
        #[arg(short = 't', long = "type", default_value = "bitcoin")]
        address_type: String,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Answer newline-delimited JSON requests on stdin
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => coinpeek::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;
    use coinpeek::core::config::AppConfig;

    let path = AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = AppConfig::default().to_yaml()?;
    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
