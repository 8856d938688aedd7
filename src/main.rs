use chatpulse::App;
use chatpulse_core::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chatpulse", about = "Chat analytics — ingest, classify, aggregate")]
struct Cli {
    /// Config file (defaults to ~/.config/chatpulse/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/chatpulse-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest JSON-lines events and serve the dashboard API.
    Serve {
        /// Event source; `-` reads stdin.
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Print the current summary view as JSON and exit.
    Summary {
        /// Leaderboard length (defaults to `[dashboard].top_n`).
        #[arg(long)]
        top: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = Config::load(cli.config.as_deref())?;
    let app = App::from_config(config)?;

    match cli.command {
        Command::Serve { input } => serve(app, &input).await,
        Command::Summary { top } => {
            let top = top.unwrap_or(app.config.dashboard.top_n);
            let view = app.aggregator.summary(top)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
    }
}

async fn serve(app: App, input: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(&app.config.dashboard.bind).await?;
    let server = tokio::spawn(chatpulse_dashboard::serve(
        listener,
        app.dashboard_state(),
        shutdown_signal(),
    ));

    let stats = if input == "-" {
        chatpulse_feeds::pump(tokio::io::stdin(), &app.coordinator).await?
    } else {
        chatpulse_feeds::pump(tokio::fs::File::open(input).await?, &app.coordinator).await?
    };
    tracing::info!(?stats, "input exhausted, dashboard still serving until Ctrl+C");

    server.await?
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/chatpulse-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("chatpulse debug log started (tail -f /tmp/chatpulse-debug.log)");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
    Ok(())
}
