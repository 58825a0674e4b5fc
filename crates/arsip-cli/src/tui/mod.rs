//! Terminal user interface
//!
//! Single table of arsip records with client-side search and pagination.
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - h/l or ←/→: Previous/next page
//! - /: Search by name or description
//! - a / e / d: Add, edit or delete a record
//! - r: Refresh from the server
//! - q: Quit

mod app;
mod ui;

use std::future::Future;
use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::debug;

use arsip_core::{ArchiveRecord, ArchiveStore, Config, HttpArchiveClient};

use crate::editor;
use crate::logging;
use app::{App, InputMode};

type Store = ArchiveStore<HttpArchiveClient>;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI until the user quits
pub async fn run(config: Config) -> Result<()> {
    logging::init_file(&config);

    let client = HttpArchiveClient::from_config(&config)
        .with_context(|| format!("Invalid base_url: {}", config.base_url))?;
    let store = ArchiveStore::new(client);
    let mut app = App::new(config.page_size);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_app(&mut terminal, &mut app, &store).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, store: &Store) -> Result<()> {
    // Initial load, drawing the loading state while it runs
    terminal.draw(|frame| ui::draw(frame, app, &store.state()))?;
    with_redraw(terminal, app, store, store.refresh()).await?;

    loop {
        app.check_notification_timeout();

        let state = store.state();
        app.sync(&state.records);
        terminal.draw(|frame| ui::draw(frame, app, &state))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(terminal, app, store, key).await?;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Drive a store operation, redrawing whenever the store state changes
async fn with_redraw<B, F>(
    terminal: &mut Terminal<B>,
    app: &App,
    store: &Store,
    operation: F,
) -> Result<F::Output>
where
    B: Backend,
    F: Future,
{
    let mut changes = store.subscribe();
    tokio::pin!(operation);

    loop {
        tokio::select! {
            output = &mut operation => return Ok(output),
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(operation.await);
                }
                let state = changes.borrow_and_update().clone();
                terminal.draw(|frame| ui::draw(frame, app, &state))?;
            }
        }
    }
}

async fn handle_key<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &Store,
    key: KeyEvent,
) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    // Any key closes the help overlay
    if app.show_help {
        app.toggle_help();
        return Ok(());
    }

    match app.input_mode {
        InputMode::Search => handle_search_key(app, key),
        InputMode::ConfirmDelete => handle_confirm_key(terminal, app, store, key).await?,
        InputMode::Normal => handle_normal_key(terminal, app, store, key).await?,
    }

    Ok(())
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.confirm_search(),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

async fn handle_confirm_key<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &Store,
    key: KeyEvent,
) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            let Some(record) = app.take_pending_delete() else {
                return Ok(());
            };
            match with_redraw(terminal, app, store, store.delete(record.id)).await? {
                Ok(()) => app.notify_success(format!("Arsip \"{}\" deleted", record.nama)),
                Err(e) => {
                    // Keep the dialog open so the delete can be retried
                    app.notify_failure(failure_message(store, &e));
                    app.restore_pending_delete(record);
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.take_pending_delete();
        }
        _ => {}
    }

    Ok(())
}

async fn handle_normal_key<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &Store,
    key: KeyEvent,
) -> Result<()> {
    let records = store.records();

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(&records),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_first(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_last(&records),
        KeyCode::Char('h') | KeyCode::Left => app.prev_page(&records),
        KeyCode::Char('l') | KeyCode::Right => app.next_page(&records),

        KeyCode::Char('/') => app.enter_search_mode(),

        KeyCode::Char('a') => edit_record(terminal, app, store, None).await?,
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(record) = app.selected_record(&records).cloned() {
                edit_record(terminal, app, store, Some(record)).await?;
            }
        }
        KeyCode::Char('d') => {
            app.request_delete(&records);
        }

        KeyCode::Char('r') => {
            with_redraw(terminal, app, store, store.refresh()).await?;
            if store.last_error().is_none() {
                app.notify_success("Refreshed");
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }

    Ok(())
}

/// Add (`target` is `None`) or edit a record through the editor form
///
/// A form that fails to parse or save is kept as a draft and reopened
/// the next time the same record is added or edited.
async fn edit_record<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &Store,
    target: Option<ArchiveRecord>,
) -> Result<()> {
    let target_id = target.as_ref().map(|record| record.id);
    let initial = app
        .take_draft(target_id)
        .unwrap_or_else(|| editor::record_template(target.as_ref()));

    let content = match suspend(terminal, || editor::edit_text(&initial))? {
        Ok(content) => content,
        Err(e) => {
            app.notify_failure(format!("Editor failed: {}", e));
            return Ok(());
        }
    };

    let input = match editor::parse_record_form(&content) {
        Ok(Some(input)) => input,
        Ok(None) => {
            debug!("Form left empty, nothing saved");
            return Ok(());
        }
        Err(e) => {
            app.keep_draft(target_id, content);
            app.notify_failure(e.to_string());
            return Ok(());
        }
    };

    let result = match &target {
        Some(record) if record.has_fields(&input) => {
            app.notify_success("No changes");
            return Ok(());
        }
        Some(record) => with_redraw(terminal, app, store, store.update(record.id, &input))
            .await?
            .map(|_| format!("Arsip \"{}\" updated", input.nama)),
        None => with_redraw(terminal, app, store, store.create(&input))
            .await?
            .map(|_| format!("Arsip \"{}\" added", input.nama)),
    };

    match result {
        Ok(message) => app.notify_success(message),
        Err(e) => {
            app.keep_draft(target_id, content);
            app.notify_failure(failure_message(store, &e));
        }
    }

    Ok(())
}

/// Leave the alternate screen while `f` runs (e.g. an external editor)
fn suspend<B: Backend, T>(terminal: &mut Terminal<B>, f: impl FnOnce() -> T) -> Result<T> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(cursor::Show)?;

    let output = f();

    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;

    Ok(output)
}

/// The store's message for the failed mutation, falling back to the error itself
fn failure_message(store: &Store, error: &impl std::fmt::Display) -> String {
    store
        .last_error()
        .map(|info| info.message)
        .unwrap_or_else(|| error.to_string())
}
