//! SocketFight client runtime
//!
//! This is the main entry point for the headless game client. It handles:
//! - The WebSocket connection and game channel join
//! - Relaying input events to the server
//! - Applying server snapshots to the local scene and stats overlay
//! - A fixed-rate frame loop feeding the attached renderer

mod app;
mod channel;
mod config;
mod input;
mod overlay;
mod scene;
mod util;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::ClientState;
use crate::channel::session::run_session;
use crate::channel::GameSocket;
use crate::config::Config;
use crate::input::keymap::code_for_name;
use crate::input::{InputEvent, KeyTracker};
use crate::scene::frame::{run_frame_loop, TraceRenderer};
use crate::util::time::{init_client_time, uptime_secs, Timer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    // Initialize client time tracking
    init_client_time();

    info!("Starting SocketFight client");
    info!("Server: {}", config.server_url);
    info!("Topic: {}", config.game_topic);

    // Create shared client state
    let state = ClientState::new(config);

    // Connect and join the game channel
    let join_timer = Timer::new();
    let mut socket = GameSocket::connect(&state.config.server_url).await?;
    if let Err(e) = socket
        .join(&state.config.game_topic, &state.config.user_token)
        .await
    {
        // No retry and no reconnect: a refused join is terminal
        error!(error = %e, "Server connection failed, nothing will work");
        return Err(e.into());
    }
    info!(elapsed_ms = join_timer.elapsed_ms(), "Connected and joined");
    let (ws_sink, ws_source, pending) = socket.into_parts();

    // Outbound input queue
    let (event_tx, event_rx) = mpsc::channel::<InputEvent>(64);

    // Spawn the stdin input driver
    let input_handle = tokio::spawn(run_stdin_input(event_tx));

    // Spawn the frame loop with the logging renderer
    let frame_handle = tokio::spawn(run_frame_loop(
        state.scene.clone(),
        state.overlay.clone(),
        Box::new(TraceRenderer),
    ));

    // Run the session until the server closes or we are interrupted
    tokio::select! {
        _ = run_session(
            ws_sink,
            ws_source,
            pending,
            state.scene.clone(),
            state.overlay.clone(),
            event_rx,
        ) => {
            info!("Session ended");
        }
        _ = shutdown_signal() => {}
    }

    input_handle.abort();
    frame_handle.abort();

    info!(uptime_secs = uptime_secs(), "Client shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Read `+<key>` / `-<key>` lines from stdin and relay input transitions
///
/// A stand-in frontend for running the client without a window; graphical
/// frontends feed the same queue with real key events.
async fn run_stdin_input(event_tx: mpsc::Sender<InputEvent>) {
    let mut tracker = KeyTracker::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();

        let (pressed, name) = if let Some(rest) = line.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = line.strip_prefix('-') {
            (false, rest)
        } else {
            if !line.is_empty() {
                warn!(input = %line, "Ignoring unrecognized input line");
            }
            continue;
        };

        let Some(code) = code_for_name(name) else {
            warn!(key = %name, "Unknown key name");
            continue;
        };

        let event = if pressed {
            tracker.key_down(code)
        } else {
            tracker.key_up(code)
        };

        if let Some(event) = event {
            if event_tx.send(event).await.is_err() {
                break;
            }
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
