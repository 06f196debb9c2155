//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use url::Url;

use crate::app::{App, ManifestStatus};
use crate::config::{ControlsSettings, UiSettings};
use crate::library::display_from_fields;
use crate::player::{MediaResource, PlayerState};

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64, standalone: bool) -> String {
    let mut entries = vec![
        "[space] play/pause".to_string(),
        "[←/→] prev/next".to_string(),
        "[↑/↓] volume".to_string(),
        format!("[H/L] scrub -/+{scrub_seconds}s"),
        "[s] stop".to_string(),
    ];
    if !standalone {
        entries.push("[j/k] up/down".to_string());
        entries.push("[enter] play selected".to_string());
    }
    entries.push("[q] quit".to_string());
    entries.join(" | ")
}

/// Format seconds as `MM:SS`; unknown or invalid values render as `--:--`.
fn format_mmss(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "--:--".to_string();
    }
    let secs = seconds.floor() as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn state_text(state: &PlayerState) -> &'static str {
    if state.is_loading {
        "Loading…"
    } else if state.is_buffering && state.is_playing {
        "Buffering…"
    } else if state.is_playing {
        "Playing"
    } else {
        "Paused"
    }
}

fn time_text(state: &PlayerState) -> String {
    if state.duration > 0.0 {
        format!("{} / {}", format_mmss(state.current_time), format_mmss(state.duration))
    } else {
        format!("{} / --:--", format_mmss(state.current_time))
    }
}

/// The message shown on the error line, most severe first.
fn error_text<R: MediaResource>(app: &App<R>) -> Option<String> {
    if let ManifestStatus::Failed(err) = &app.manifest {
        return Some(format!("{err} Press r to retry."));
    }
    if let Some(err) = &app.nav_error {
        return Some(err.to_string());
    }
    app.player.state().error.clone()
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw<R: MediaResource>(
    frame: &mut Frame,
    app: &App<R>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let standalone = app.standalone();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" podplay ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Now playing
    let state = app.player.state();
    let mut lines: Vec<Line> = Vec::new();
    match (&app.manifest, state.current_track.as_ref()) {
        (ManifestStatus::Loading, _) => lines.push(Line::from("Loading tracks…")),
        (_, Some(track)) => {
            let song = display_from_fields(
                track,
                &ui_settings.now_playing_track_fields,
                &ui_settings.now_playing_track_separator,
            );
            lines.push(Line::from(song).bold());
            lines.push(Line::from(format!("{} • {}", state_text(state), time_text(state))));

            let reach = app.reach();
            let prev = if reach.can_go_previous() { "◀ prev" } else { "      " };
            let next = if reach.can_go_next() { "next ▶" } else { "      " };
            lines.push(Line::from(format!(
                "Loaded: {:>3.0}% • Volume: {:>3.0}% • {prev} {next}",
                state.load_progress,
                state.volume * 100.0
            )));
        }
        (_, None) => lines.push(Line::from("No track loaded")),
    }
    if let Some(err) = error_text(app) {
        lines.push(Line::from(err).fg(Color::Red));
    }

    let now_playing = Paragraph::new(lines)
        .block(Block::bordered().padding(LEFT_PAD).title(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(now_playing, chunks[1]);

    // Playlist
    if standalone {
        let note = Paragraph::new("Standalone link: the playlist is hidden.")
            .block(Block::bordered().padding(LEFT_PAD).title(" tracks "));
        frame.render_widget(note, chunks[2]);
    } else {
        let tracks = app.visible_tracks();
        let current_id = state.current_track_id();

        // Center the selected item when possible by creating a visible window.
        let total = tracks.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = tracks[start..end]
            .iter()
            .map(|t| {
                let marker = if Some(t.id.as_str()) == current_id { "♪ " } else { "  " };
                let text = display_from_fields(
                    t,
                    &ui_settings.now_playing_track_fields,
                    &ui_settings.now_playing_track_separator,
                );
                ListItem::new(format!("{marker}{text}"))
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if total > 0 {
            list_state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut list_state);
    }

    // Share link
    let base = ui_settings
        .share_base_url
        .as_deref()
        .and_then(|s| Url::parse(s).ok());
    let share = Paragraph::new(app.share_link(base.as_ref()))
        .block(Block::bordered().padding(LEFT_PAD).title(" share "));
    frame.render_widget(share, chunks[3]);

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds, standalone))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
