use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::App;
use crate::config;
use crate::library::ManifestError;
use crate::player::MediaResource;
use crate::ui;

use super::keys::{Action, KeyContext, action_for_key};
use super::startup::{ManifestResult, manifest_source, spawn_manifest_fetch};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Pending manifest fetch, if one is in flight.
    manifest_rx: Option<Receiver<ManifestResult>>,
}

impl EventLoopState {
    pub fn new(manifest_rx: Receiver<ManifestResult>) -> Self {
        Self {
            manifest_rx: Some(manifest_rx),
        }
    }
}

/// Main terminal event loop: handles input, UI drawing and the hand-off
/// from the manifest worker. Returns `Ok(())` when shutdown is requested.
pub fn run<R: MediaResource>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<R>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        poll_manifest(app, state);
        app.player.pump();

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
            }
        }
    }

    let fade_out = Duration::from_millis(settings.audio.quit_fade_out_ms);
    app.player.shutdown(fade_out);
    Ok(())
}

fn poll_manifest<R: MediaResource>(app: &mut App<R>, state: &mut EventLoopState) {
    let Some(rx) = state.manifest_rx.as_ref() else {
        return;
    };
    let result = match rx.try_recv() {
        Ok(result) => result,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => Err(ManifestError::Transport(
            "manifest worker exited without a result".to_string(),
        )),
    };
    state.manifest_rx = None;

    match result {
        Ok(tracks) => app.set_tracks(tracks),
        Err(err) => app.set_manifest_error(err),
    }
}

fn key_context<R: MediaResource>(app: &App<R>) -> KeyContext {
    let reach = app.reach();
    KeyContext {
        has_tracks: app.has_tracks(),
        has_current_track: app.has_current_track(),
        standalone: app.standalone(),
        can_go_previous: reach.can_go_previous(),
        can_go_next: reach.can_go_next(),
        manifest_failed: app.manifest_failed(),
    }
}

/// Returns `true` when the app should quit.
fn handle_key_event<R: MediaResource>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<R>,
    state: &mut EventLoopState,
) -> bool {
    let Some(action) = action_for_key(&key, &key_context(app)) else {
        return false;
    };
    debug!(?action, "key action");

    match action {
        Action::Quit => {
            info!("quit requested");
            return true;
        }
        Action::TogglePlay => app.toggle_play(),
        Action::Previous => app.previous(),
        Action::Next => app.next(),
        Action::VolumeUp => app.volume_up(),
        Action::VolumeDown => app.volume_down(),
        Action::CursorDown => app.cursor_down(),
        Action::CursorUp => app.cursor_up(),
        Action::SelectCursor => app.select_cursor(),
        Action::Stop => app.stop(),
        Action::ScrubBack => app.scrub_back(),
        Action::ScrubForward => app.scrub_forward(),
        Action::RetryManifest => {
            if app.retry() {
                let source = manifest_source(settings, &app.location);
                let timeout = Duration::from_secs(settings.manifest.timeout_secs);
                state.manifest_rx = Some(spawn_manifest_fetch(source, timeout));
            }
        }
    }
    false
}
