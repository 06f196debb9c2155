use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the app to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    TogglePlay,
    Previous,
    Next,
    VolumeUp,
    VolumeDown,
    CursorDown,
    CursorUp,
    SelectCursor,
    Stop,
    ScrubBack,
    ScrubForward,
    RetryManifest,
    Quit,
}

/// The bits of app state that decide whether a key does anything.
#[derive(Debug, Default, Copy, Clone)]
pub struct KeyContext {
    pub has_tracks: bool,
    pub has_current_track: bool,
    pub standalone: bool,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub manifest_failed: bool,
}

/// Map a key press to an action, or `None` when the key is inert right now.
pub fn action_for_key(key: &KeyEvent, ctx: &KeyContext) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    let playback = ctx.has_tracks && ctx.has_current_track;
    let playlist = ctx.has_tracks && !ctx.standalone;

    let action = match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('r') if ctx.manifest_failed => return Some(Action::RetryManifest),

        KeyCode::Char(' ') => Action::TogglePlay,
        KeyCode::Left if ctx.can_go_previous => Action::Previous,
        KeyCode::Right if ctx.can_go_next => Action::Next,
        KeyCode::Up => Action::VolumeUp,
        KeyCode::Down => Action::VolumeDown,
        KeyCode::Char('s') => Action::Stop,
        KeyCode::Char('H') => Action::ScrubBack,
        KeyCode::Char('L') => Action::ScrubForward,

        KeyCode::Char('j') if playlist => return Some(Action::CursorDown),
        KeyCode::Char('k') if playlist => return Some(Action::CursorUp),
        KeyCode::Enter if playlist => return Some(Action::SelectCursor),
        _ => return None,
    };

    playback.then_some(action)
}
