//! Application model: the track list, the page location and the playback
//! controller, glued together by the navigation rules.

use tracing::{debug, info, warn};

use crate::config::ControlsSettings;
use crate::library::{AudioTrack, ManifestError, public_tracks};
use crate::nav::{
    Location, NavigationError, NavigationOutcome, NavigationResolver, Reach, fragment_for_selection, reach,
};
use crate::player::{MediaResource, PlaybackController};

/// Where the track list currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestStatus {
    Loading,
    Ready,
    Failed(ManifestError),
}

/// The main application model.
pub struct App<R: MediaResource> {
    pub player: PlaybackController<R>,
    pub tracks: Vec<AudioTrack>,
    pub manifest: ManifestStatus,
    pub location: Location,
    pub nav_error: Option<NavigationError>,
    /// Playlist cursor, as an index into the public tracks.
    pub selected: usize,
    resolver: NavigationResolver,
    volume_step: f64,
    scrub_seconds: f64,
}

/// Round to hundredths so repeated steps don't drift.
fn round_volume(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl<R: MediaResource> App<R> {
    pub fn new(player: PlaybackController<R>, location: Location, controls: &ControlsSettings) -> Self {
        let mut resolver = NavigationResolver::default();
        // Mirror the standalone flag before any tracks exist.
        resolver.on_fragment(location.fragment(), &[], None);

        Self {
            player,
            tracks: Vec::new(),
            manifest: ManifestStatus::Loading,
            location,
            nav_error: None,
            selected: 0,
            resolver,
            volume_step: controls.volume_step,
            scrub_seconds: controls.scrub_seconds as f64,
        }
    }

    pub fn standalone(&self) -> bool {
        self.resolver.standalone()
    }

    /// A track list has been published.
    pub fn has_tracks(&self) -> bool {
        self.manifest == ManifestStatus::Ready && !self.tracks.is_empty()
    }

    pub fn has_current_track(&self) -> bool {
        self.player.current_track().is_some()
    }

    pub fn manifest_failed(&self) -> bool {
        matches!(self.manifest, ManifestStatus::Failed(_))
    }

    /// Publish the fetched track list and run navigation against it.
    pub fn set_tracks(&mut self, tracks: Vec<AudioTrack>) {
        info!(count = tracks.len(), "track list ready");
        self.tracks = tracks;
        self.manifest = ManifestStatus::Ready;
        self.nav_error = None;
        self.selected = 0;
        self.on_fragment_change();
    }

    pub fn set_manifest_error(&mut self, err: ManifestError) {
        warn!(error = %err, "manifest failed");
        self.manifest = ManifestStatus::Failed(err);
    }

    /// Reset to the freshly started state so the manifest can be fetched
    /// again. Returns `false` when there is nothing to retry.
    pub fn retry(&mut self) -> bool {
        if !self.manifest_failed() {
            return false;
        }
        info!("retrying manifest load");
        self.tracks.clear();
        self.manifest = ManifestStatus::Loading;
        self.nav_error = None;
        self.selected = 0;
        self.resolver.reset();
        self.resolver.on_fragment(self.location.fragment(), &[], None);
        true
    }

    /// React to the current fragment: mirror the standalone flag and, at
    /// most once per fragment, load the track it names.
    pub fn on_fragment_change(&mut self) {
        let current = self.player.current_track().cloned();
        let outcome = self
            .resolver
            .on_fragment(self.location.fragment(), &self.tracks, current.as_ref());

        match outcome {
            NavigationOutcome::Load(track) => {
                let track = track.clone();
                self.nav_error = None;
                self.player.load_track(&track);
                self.follow_current();
            }
            NavigationOutcome::Failed(err) => self.nav_error = Some(err),
            NavigationOutcome::Unchanged | NavigationOutcome::Empty => {}
        }
    }

    /// Rewrite the location for `track` and load it.
    pub fn select_track(&mut self, track: &AudioTrack) {
        let fragment = fragment_for_selection(&track.id, self.standalone());
        debug!(%fragment, generation = self.player.generation().0, "rewriting location");
        self.location.replace_fragment(fragment);
        self.nav_error = None;
        self.player.load_track(track);
        self.follow_current();
    }

    pub fn reach(&self) -> Reach<'_> {
        reach(&self.tracks, self.player.state().current_track_id(), self.standalone())
    }

    pub fn next(&mut self) {
        let Some(track) = self.reach().next.cloned() else {
            return;
        };
        self.switch_to(&track);
    }

    pub fn previous(&mut self) {
        let Some(track) = self.reach().previous.cloned() else {
            return;
        };
        self.switch_to(&track);
    }

    /// Select `track`, carrying playback over when something was playing.
    fn switch_to(&mut self, track: &AudioTrack) {
        let was_playing = self.player.state().is_playing || self.player.play_pending();
        self.select_track(track);
        if was_playing {
            self.player.play();
        }
    }

    pub fn toggle_play(&mut self) {
        self.player.toggle();
    }

    pub fn stop(&mut self) {
        self.player.stop();
    }

    pub fn volume_up(&mut self) {
        let v = round_volume(self.player.state().volume + self.volume_step);
        self.player.set_volume(v);
    }

    pub fn volume_down(&mut self) {
        let v = round_volume(self.player.state().volume - self.volume_step);
        self.player.set_volume(v);
    }

    pub fn scrub_forward(&mut self) {
        self.scrub(self.scrub_seconds);
    }

    pub fn scrub_back(&mut self) {
        self.scrub(-self.scrub_seconds);
    }

    fn scrub(&mut self, delta: f64) {
        let state = self.player.state();
        let mut target = (state.current_time + delta).max(0.0);
        if state.duration > 0.0 {
            target = target.min(state.duration);
        }
        self.player.seek(target);
    }

    /// The tracks shown in the playlist.
    pub fn visible_tracks(&self) -> Vec<&AudioTrack> {
        public_tracks(&self.tracks).collect()
    }

    pub fn cursor_down(&mut self) {
        let len = public_tracks(&self.tracks).count();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn cursor_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Load and play the track under the cursor.
    pub fn select_cursor(&mut self) {
        let Some(track) = public_tracks(&self.tracks).nth(self.selected).cloned() else {
            return;
        };
        self.select_track(&track);
        self.player.play();
    }

    /// Put the cursor on the current track when it is listed.
    fn follow_current(&mut self) {
        let Some(id) = self.player.state().current_track_id() else {
            return;
        };
        if let Some(pos) = public_tracks(&self.tracks).position(|t| t.id == id) {
            self.selected = pos;
        }
    }

    /// The link that reproduces the current view.
    pub fn share_link(&self, base: Option<&url::Url>) -> String {
        self.location.href(base)
    }
}
