//! Binary entry point: terminal setup and the client event loop.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use client::api::ApiClient;
use client::app::{App, Panel};
use client::event::AppEvent;
use client::list::ItemAction;
use client::ui;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use db::models::bug::{CreateBug, UpdateBug};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Command-line options for the client.
#[derive(Parser, Debug)]
#[command(name = "bugboard", about = "Terminal client for the bugboard tracker")]
struct Options {
    /// Base URL of the bugboard server.
    #[arg(long, default_value = "http://127.0.0.1:8787")]
    server_url: String,
    /// Log file; the terminal itself is reserved for the UI.
    #[arg(long, default_value = "bugboard-client.log")]
    log_file: PathBuf,
}

/// Restores the terminal even when the event loop unwinds.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::parse();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&options.log_file)
        .with_context(|| format!("failed to open log file {}", options.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    // Route panic reports to the log so a contained rendering failure never
    // writes over the live screen.
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic raised");
    }));

    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
    let _guard = TerminalGuard;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal")?;

    let api = ApiClient::new(options.server_url);
    let (tx, rx) = mpsc::channel::<AppEvent>(64);

    spawn_input_thread(tx.clone());
    spawn_tick_task(tx.clone());

    let mut app = App::new();
    spawn_fetch(api.clone(), tx.clone());

    run(&mut terminal, &mut app, rx, tx, api).await
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
    api: ApiClient,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        match event {
            AppEvent::Input(key) => handle_key(app, key, &api, &tx),
            AppEvent::Tick => {}
            AppEvent::BugsLoaded(result) => app.on_bugs_loaded(result),
            AppEvent::BugCreated(result) => app.on_bug_created(result),
            AppEvent::BugUpdated(result) => app.on_bug_updated(result),
            AppEvent::BugDeleted { id, result } => app.on_bug_deleted(id, result),
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, api: &ApiClient, tx: &mpsc::Sender<AppEvent>) {
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        app.should_quit = true;
        return;
    }

    // A failed boundary swallows everything except the recovery key.
    if app.any_boundary_failed() {
        if key.code == KeyCode::Char('r') {
            app.reset_boundaries();
        }
        return;
    }

    if key.code == KeyCode::Tab {
        app.toggle_focus();
        return;
    }

    match app.focus {
        Panel::Form => handle_form_key(app, key, api, tx),
        Panel::List => handle_list_key(app, key, api, tx),
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent, api: &ApiClient, tx: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Enter => {
            let mut submitted = None;
            app.form.submit(app.submitting, |payload, reset| {
                submitted = Some((payload, reset));
            });
            if let Some((payload, reset)) = submitted {
                app.submitting = true;
                app.submit_error = None;
                app.pending_reset = Some(reset);
                spawn_create(api.clone(), tx.clone(), payload);
            }
        }
        KeyCode::Up => app.form.focus_prev(),
        KeyCode::Down => app.form.focus_next(),
        KeyCode::Left => app.form.cycle_status(-1),
        KeyCode::Right => app.form.cycle_status(1),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.input_char(c),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent, api: &ApiClient, tx: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.list.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.list.select_next(app.bugs.len()),
        KeyCode::Char('r') => {
            app.loading = true;
            app.list_error = None;
            spawn_fetch(api.clone(), tx.clone());
        }
        code => {
            if let Some(action) = app.list.action_for_key(&app.bugs, code) {
                match action {
                    ItemAction::SetStatus(id, status) => spawn_update(
                        api.clone(),
                        tx.clone(),
                        id,
                        UpdateBug {
                            status: Some(status),
                            ..Default::default()
                        },
                    ),
                    ItemAction::Delete(id) => spawn_delete(api.clone(), tx.clone(), id),
                }
            }
        }
    }
}

fn spawn_input_thread(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.blocking_send(AppEvent::Input(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

fn spawn_tick_task(tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

fn spawn_fetch(api: ApiClient, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = api.list_bugs().await;
        let _ = tx.send(AppEvent::BugsLoaded(result)).await;
    });
}

fn spawn_create(api: ApiClient, tx: mpsc::Sender<AppEvent>, payload: CreateBug) {
    tokio::spawn(async move {
        let result = api.create_bug(&payload).await;
        let _ = tx.send(AppEvent::BugCreated(result)).await;
    });
}

fn spawn_update(api: ApiClient, tx: mpsc::Sender<AppEvent>, id: Uuid, payload: UpdateBug) {
    tokio::spawn(async move {
        let result = api.update_bug(id, &payload).await;
        let _ = tx.send(AppEvent::BugUpdated(result)).await;
    });
}

fn spawn_delete(api: ApiClient, tx: mpsc::Sender<AppEvent>, id: Uuid) {
    tokio::spawn(async move {
        let result = api.delete_bug(id).await;
        let _ = tx.send(AppEvent::BugDeleted { id, result }).await;
    });
}
