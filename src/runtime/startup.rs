use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crate::config;
use crate::library::{AudioTrack, ManifestError, ManifestSource, fetch_manifest};
use crate::nav::Location;

pub type ManifestResult = Result<Vec<AudioTrack>, ManifestError>;

/// Work out where the manifest lives for this `location`.
pub fn manifest_source(settings: &config::Settings, location: &Location) -> ManifestSource {
    ManifestSource::resolve(&settings.manifest.url, location.page())
}

/// Fetch the manifest on a worker thread; the result arrives on the returned
/// channel exactly once.
pub fn spawn_manifest_fetch(source: ManifestSource, timeout: Duration) -> Receiver<ManifestResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(fetch_manifest(&source, timeout));
    });
    rx
}
