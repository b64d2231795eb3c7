use clap::Parser;
use pgsite::core::Settings;
use pgsite::server::{AppState, serve};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pgsite")]
#[command(about = "Session-aware web site over PostgreSQL", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.listen`
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Public host name, overrides `base.host`
    #[arg(long)]
    base_host: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Логирование
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pgsite=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Настройки: файл, затем ENV, затем аргументы
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        settings.server.listen = listen;
    }
    if let Some(host) = args.base_host {
        settings.base.host = host;
    }
    tracing::info!("Base URL {}", settings.base.url());

    let listen = settings.server.listen.clone();
    serve(AppState::new(settings), &listen).await?;

    Ok(())
}
