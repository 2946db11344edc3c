//! `Kandan` — task board with optimistic updates and rollback.
//!
//! Runs a scripted demo session against the simulated backend: actions
//! apply to the board immediately, then commit or roll back when the
//! remote settles. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/kandan/config.toml`).
//!
//! ```bash
//! # Log in and run the demo
//! cargo run --bin kandan -- --user riya
//!
//! # Deterministic backend, empty board
//! cargo run --bin kandan -- --user riya --failure-probability 0 --no-seed
//! ```

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kandan::app::App;
use kandan::board::{BoardEvent, BoardManager};
use kandan::config::{BoardConfig, CliArgs};
use kandan::notify::ToastCenter;
use kandan::remote::SimulatedRemote;
use kandan::session::{FileIdentityStore, Session};
use kandan_core::{BoardState, Column};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    init_logging(&cli.log_level);

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match BoardConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            BoardConfig::default()
        }
    };

    tracing::info!("kandan starting");

    // Restore the login session; --user logs in for this and future runs.
    let mut session = match FileIdentityStore::at_default_path().and_then(Session::restore) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: could not restore session: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(name) = &cli.user {
        if let Err(e) = session.login(name) {
            eprintln!("Error: login failed: {e}");
            return ExitCode::FAILURE;
        }
    }
    let Some(user) = session.user().map(String::from) else {
        eprintln!("Not logged in. Pass --user <name> to log in.");
        return ExitCode::FAILURE;
    };

    let initial = if config.seed {
        kandan::board::seed::demo_board()
    } else {
        BoardState::new()
    };
    let remote = SimulatedRemote::new(
        config.failure_probability,
        config.min_delay,
        config.max_delay,
    );
    let (manager, mut events) = BoardManager::new(initial, remote, config.event_buffer);

    // Pump board events into the toast center; log the rest.
    let toasts = Arc::new(ToastCenter::new(config.toast_duration));
    let pump_toasts = Arc::clone(&toasts);
    let pump = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                BoardEvent::Notice { message, kind } => {
                    pump_toasts.push(message, kind);
                }
                other => tracing::debug!(?other, "board event"),
            }
        }
    });

    run_demo(&manager).await;

    render_board(&manager, &user);
    for toast in toasts.active() {
        println!("[{:?}] {}", toast.kind, toast.message);
    }

    drop(manager);
    let _ = pump.await;
    tracing::info!("kandan exiting");
    ExitCode::SUCCESS
}

/// Initialize stdout logging with the requested level filter.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A short scripted session: one create, and when the board is seeded,
/// a move and a delete settling concurrently with it.
async fn run_demo(manager: &BoardManager<SimulatedRemote>) {
    let state = manager.state();
    let move_target = state.in_column(Column::Todo).first().map(|t| t.id);
    let delete_target = state.in_column(Column::Done).first().map(|t| t.id);

    let create = manager.create_task("Plan next sprint", "Rough cut of the backlog");
    let move_fut = async {
        if let Some(id) = move_target {
            match manager.move_task(id, Column::Progress).await {
                Ok(settlement) => tracing::info!(?settlement, "move settled"),
                Err(e) => tracing::warn!("move rejected: {e}"),
            }
        }
    };
    let delete_fut = async {
        if let Some(id) = delete_target {
            match manager.delete_task(id).await {
                Ok(settlement) => tracing::info!(?settlement, "delete settled"),
                Err(e) => tracing::warn!("delete rejected: {e}"),
            }
        }
    };

    let (created, (), ()) = tokio::join!(create, move_fut, delete_fut);
    match created {
        Ok(settlement) => tracing::info!(?settlement, "create settled"),
        Err(e) => tracing::warn!("create rejected: {e}"),
    }
}

/// Print the final board grouped by column.
fn render_board(manager: &BoardManager<SimulatedRemote>, user: &str) {
    let mut app = App::new(Some(user.to_string()));
    app.refresh(manager);
    let now = now_ms();

    println!("Board — {user}");
    for column in Column::ALL {
        let cards = app.cards(column, now);
        println!("  {} ({})", column.label(), cards.len());
        for card in cards {
            let marker = if card.pending { "~" } else { "-" };
            println!("    {marker} {} ({})", card.title, card.age);
        }
    }
}

/// Current time in milliseconds since epoch.
fn now_ms() -> u64 {
    u64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
    )
    .unwrap_or(u64::MAX)
}
