use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use sparknomad_core::{Config, GeminiClient};

mod app;
mod clipboard;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use clipboard::SystemClipboard;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "sparknomad")]
#[command(version, about = "Generate startup names and taglines for an industry with Gemini")]
struct Cli {
    /// Pre-fill the industry input
    #[arg(short, long)]
    industry: Option<String>,
    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,
    /// Log file (defaults to the config directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Config::load_dotenv();
    let log_path = logging::init(cli.log_file.as_deref())?;
    tracing::info!(log = %log_path.display(), "starting sparknomad");

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        Config::new()
    });

    let api_key = config.resolve_api_key();
    if api_key.is_none() {
        tracing::warn!("No Gemini API key found in GEMINI_API_KEY, API_KEY or config");
    }
    let client = GeminiClient::with_base_url(
        api_key.as_deref(),
        &config.resolve_model(cli.model.as_deref()),
        &config.resolve_base_url(),
    );

    let mut events = EventHandler::new();
    let mut app = App::new(client, cli.industry, events.sender(), Box::new(SystemClipboard::new()));

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app, &mut events).await;
    tui::restore()?;

    if let Err(e) = &result {
        tracing::error!("exiting with error: {}", e);
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }

    Ok(())
}
