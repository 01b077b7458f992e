use anyhow::Context;
use clap::{Parser, Subcommand};

use shelf_kernel::settings::Settings;
use shelf_store::BookStore;

#[derive(Parser)]
#[command(name = "shelf", about = "SHELF book collection service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Validate configuration and the collection file, then exit
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load SHELF settings")?;
    shelf_telemetry::init(&settings.telemetry, settings.server.debug);

    match cli.command {
        Command::Serve => shelf_app::run(settings).await,
        Command::Check => check(&settings),
    }
}

fn check(settings: &Settings) -> anyhow::Result<()> {
    let store = BookStore::new(&settings.storage.data_file);
    let books = store
        .load()
        .with_context(|| "collection file failed to load")?;

    tracing::info!(
        env = ?settings.environment,
        data_file = %settings.storage.data_file,
        count = books.len(),
        "collection file OK"
    );

    Ok(())
}
