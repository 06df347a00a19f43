use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

/// Libris operator commands
#[derive(Debug, Parser)]
#[command(name = "libris-cli", version, about)]
struct Cli {
    /// Override the configured database URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load().with_context(|| "failed to load Libris settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    libris_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            tracing::info!(env = ?settings.environment, "serving from CLI");
            libris_app::run(settings).await
        }
        Command::Migrate => {
            let applied = libris_app::migrate(&settings).await?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
    }
}
