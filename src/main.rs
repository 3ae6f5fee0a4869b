mod audio;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod playback;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::{Context, Result};
use std::time::Duration;
use clap::Parser;
use tokio::sync::{mpsc, Mutex};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use view::AppView;
use audio::RodioTransport;
use config::Args;
use controller::{AppController, Player};
use model::{AppModel, QuranClient, SavedAyahStore, UiState};
use playback::PlaybackController;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(&args.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== quran-tui starting ===");

    let http = reqwest::Client::builder()
        .user_agent(concat!("quran-tui/", env!("CARGO_PKG_VERSION")))
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;
    let client = QuranClient::new(http.clone(), &args.api_url);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let transport = RodioTransport::new(http, event_tx).context("Audio init failed")?;
    let player: Player = PlaybackController::new(Arc::new(transport), Arc::new(client.clone()));
    player.spawn_event_loop(event_rx);

    let saved = SavedAyahStore::load(args.saved_ayahs_path())
        .with_context(|| format!("Failed to load {}", args.saved_ayahs_path().display()))?;
    tracing::info!(count = saved.len(), path = %saved.path().display(), "Saved verses loaded");

    let app_model = AppModel::new(UiState::new(&args.translation, &args.reciter), saved);
    let model = Arc::new(Mutex::new(app_model));

    let controller = AppController::new(model.clone(), client, player);
    controller.start_player_listeners();

    controller.load_surahs().await;
    controller.spawn_open_surah(args.surah);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller.clone()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.player.stop_all().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("quran-tui shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Get current state
        let (ui_state, content_state, saved, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_ui_state().await,
                model_guard.get_content_state().await,
                model_guard.get_saved_ayahs().await,
                model_guard.should_quit().await,
            )
        };
        let playback = controller.player.state();

        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &content_state, &saved);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
