use super::load::resolve_config_path;
use super::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_podplay_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("PODPLAY_CONFIG_PATH", "/tmp/podplay-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/podplay-test-config.toml")
    );
}

#[test]
fn default_paths_prefer_xdg_homes() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state-home");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("podplay")
            .join("config.toml")
    );
    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state-home")
            .join("podplay")
            .join("podplay.log")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("podplay")
            .join("config.toml")
    );
}

#[test]
fn defaults_are_valid_and_match_documented_values() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.manifest.url, "tracks.json");
    assert_eq!(s.manifest.timeout_secs, 15);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.playback.volume, 1.0);
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[manifest]
url = "https://impressto.ca/homelab/tracks.json"
timeout_secs = 5

[audio]
quit_fade_out_ms = 0
tick_ms = 100
stall_timeout_secs = 45

[playback]
volume = 0.5

[controls]
volume_step = 0.05
scrub_seconds = 30

[ui]
header_text = "hello"
share_base_url = "https://impressto.ca/homelab/"
now_playing_track_fields = ["artist", "title"]
now_playing_track_separator = " • "

[log]
level = "debug"
file = "/tmp/podplay-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PODPLAY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("PODPLAY__MANIFEST__URL");

    let s = Settings::load().unwrap();
    assert_eq!(s.manifest.url, "https://impressto.ca/homelab/tracks.json");
    assert_eq!(s.manifest.timeout_secs, 5);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.stall_timeout_secs, 45);
    assert_eq!(s.playback.volume, 0.5);
    assert_eq!(s.controls.volume_step, 0.05);
    assert_eq!(s.controls.scrub_seconds, 30);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.share_base_url.as_deref(), Some("https://impressto.ca/homelab/"));
    assert_eq!(
        s.ui.now_playing_track_fields,
        vec![TrackDisplayField::Artist, TrackDisplayField::Title]
    );
    assert_eq!(s.ui.now_playing_track_separator, " • ");
    assert_eq!(s.log.level, "debug");
    assert_eq!(
        s.log.file.as_deref(),
        Some(std::path::Path::new("/tmp/podplay-test.log"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn manifest_url_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[manifest]
url = "from-file.json"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("PODPLAY_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("PODPLAY__MANIFEST__URL", "https://cdn.example/list.json");

    let s = Settings::load().unwrap();
    assert_eq!(s.manifest.url, "https://cdn.example/list.json");
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.manifest.timeout_secs = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.stall_timeout_secs = 0;
    assert!(s.validate().is_err());
}
