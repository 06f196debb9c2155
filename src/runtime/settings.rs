use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults when the config is unusable.
///
/// Returns the problem alongside the settings so it can be logged once the
/// subscriber is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

pub fn report_config_problem(problem: Option<&str>) {
    if let Some(problem) = problem {
        eprintln!("podplay: {problem}");
        warn!("{problem}");
    }
}
