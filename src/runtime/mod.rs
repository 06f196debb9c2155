use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::logging;
use crate::nav::Location;
use crate::player::PlaybackController;

mod event_loop;
mod keys;
mod settings;
mod startup;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    match logging::init(&settings.log) {
        Ok(Some(path)) => info!(path = %path.display(), "logging started"),
        Ok(None) => {}
        Err(e) => eprintln!("podplay: logging disabled: {e}"),
    }
    settings::report_config_problem(config_problem.as_deref());

    // `podplay [LINK]`: a page URL with a fragment, or just the fragment.
    let link = env::args().nth(1).unwrap_or_default();
    let location = Location::parse(&link);
    info!(%link, fragment = location.fragment(), "starting");

    let mut player = PlaybackController::new(AudioPlayer::new(settings.audio.clone()));
    player.set_volume(settings.playback.volume);
    let mut app = App::new(player, location, &settings.controls);

    let source = startup::manifest_source(&settings, &app.location);
    let timeout = Duration::from_secs(settings.manifest.timeout_secs);
    let manifest_rx = startup::spawn_manifest_fetch(source, timeout);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(manifest_rx);
        event_loop::run(&mut terminal, &settings, &mut app, &mut state)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        warn!(error = %e, "event loop failed");
    }
    run_result
}
