use clap::{Parser, Subcommand};
use configuration::{Config, LogFormat};
use database::PoolConfig;

/// The main entry point for the bank registry service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config()?;
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    let _guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config);
            config.validate()?;
            web_server::run_server(&config).await
        }
        Commands::Migrate => handle_migrate(&config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// HTTP service for bank and branch records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides `logging.format` from the configuration.
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Apply the database migrations and exit.
    Migrate,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

// ==============================================================================
// Migrate Command Logic
// ==============================================================================

async fn handle_migrate(config: &Config) -> anyhow::Result<()> {
    let database_url = config.database.connection_url()?;
    let pool_config = PoolConfig {
        max_connections: 1,
        acquire_timeout: config.database.acquire_timeout(),
    };

    let pool = database::connect(&database_url, &pool_config).await?;
    database::run_migrations(&pool).await?;
    tracing::info!("Migrations applied.");
    database::disconnect(&pool).await;
    Ok(())
}
