use super::*;
use crate::library::AudioTrack;
use proptest::prelude::*;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(String, LoadGeneration),
    Play(PlayTicket),
    Pause,
    Seek(f64),
    Volume(f64),
    Shutdown,
}

#[derive(Default)]
struct FakeResource {
    calls: Vec<Call>,
    notices: VecDeque<ResourceNotice>,
}

impl FakeResource {
    fn loads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Load(..)))
            .count()
    }

    fn last_ticket(&self) -> PlayTicket {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::Play(t) => Some(*t),
                _ => None,
            })
            .expect("no play request recorded")
    }

    fn emit(&mut self, generation: LoadGeneration, event: MediaEvent) {
        self.notices
            .push_back(ResourceNotice::Event { generation, event });
    }

    fn settle(&mut self, ticket: PlayTicket, result: Result<(), PlayFailure>) {
        self.notices
            .push_back(ResourceNotice::PlaySettled { ticket, result });
    }
}

impl MediaResource for FakeResource {
    fn load(&mut self, src: &str, generation: LoadGeneration, _duration_hint: Option<f64>) {
        self.calls.push(Call::Load(src.to_string(), generation));
        self.emit(generation, MediaEvent::LoadStart);
    }

    fn play(&mut self, ticket: PlayTicket) {
        self.calls.push(Call::Play(ticket));
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.calls.push(Call::Volume(volume));
    }

    fn poll_notice(&mut self) -> Option<ResourceNotice> {
        self.notices.pop_front()
    }

    fn shutdown(&mut self, _fade_out: Duration) {
        self.calls.push(Call::Shutdown);
    }
}

fn track(id: &str) -> AudioTrack {
    AudioTrack {
        id: id.into(),
        title: format!("Title {id}"),
        artist: None,
        genre: None,
        src: format!("https://example.com/{id}.m4a"),
        duration: None,
        unlisted: false,
    }
}

fn loaded(id: &str) -> PlaybackController<FakeResource> {
    let mut c = PlaybackController::new(FakeResource::default());
    c.load_track(&track(id));
    c.pump();
    c
}

#[test]
fn initial_state_has_full_volume_and_no_track() {
    let c = PlaybackController::new(FakeResource::default());
    let s = c.state();
    assert_eq!(s.volume, 1.0);
    assert!(s.current_track.is_none());
    assert!(!s.is_playing && !s.is_loading && !s.is_buffering);
    assert_eq!(s.error, None);
}

#[test]
fn load_track_resets_state_and_hands_src_to_resource() {
    let mut c = loaded("a");
    let g = c.generation();
    c.resource_mut().emit(g, MediaEvent::TimeUpdate { current_time: 42.0 });
    c.resource_mut().emit(
        g,
        MediaEvent::Error(MediaError::Network {
            detail: "reset".into(),
        }),
    );
    c.pump();
    assert!(c.state().error.is_some());

    c.load_track(&track("b"));
    let s = c.state();
    assert_eq!(s.current_track_id(), Some("b"));
    assert_eq!(s.current_time, 0.0);
    assert!(s.is_loading && s.is_buffering);
    assert!(!s.is_playing);
    assert_eq!(s.load_progress, 0.0);
    assert_eq!(s.error, None);

    let calls = &c.resource_mut().calls;
    assert_eq!(
        calls.last(),
        Some(&Call::Load("https://example.com/b.m4a".into(), g.next()))
    );
    // Stop the old source before switching.
    let n = calls.len();
    assert_eq!(calls[n - 3], Call::Pause);
    assert_eq!(calls[n - 2], Call::Seek(0.0));
}

#[test]
fn reloading_the_same_track_is_idempotent() {
    let mut c = loaded("a");
    let g = c.generation();
    c.resource_mut().emit(g, MediaEvent::CanPlay);
    c.resource_mut().emit(g, MediaEvent::TimeUpdate { current_time: 12.5 });
    c.pump();
    let before = c.state().clone();

    c.load_track(&track("a"));
    assert_eq!(c.resource_mut().loads(), 1);
    assert_eq!(c.generation(), g);
    assert!(c.resource_mut().notices.is_empty(), "no second load-start");
    assert_eq!(c.state(), &before);
    assert_eq!(c.state().current_time, 12.5);
}

#[test]
fn successful_play_sets_playing_and_clears_loading() {
    let mut c = loaded("a");
    c.play();
    assert!(c.state().is_loading);
    assert!(c.play_pending());

    let ticket = c.resource_mut().last_ticket();
    c.resource_mut().settle(ticket, Ok(()));
    c.pump();

    assert!(c.state().is_playing);
    assert!(!c.state().is_loading);
    assert!(!c.play_pending());
}

#[test]
fn autoplay_rejection_surfaces_a_distinct_message() {
    let mut c = loaded("a");
    c.play();
    let ticket = c.resource_mut().last_ticket();
    c.resource_mut().settle(ticket, Err(PlayFailure::NotAllowed));
    c.pump();

    let s = c.state();
    assert!(!s.is_playing);
    assert!(!s.is_loading);
    assert!(!s.is_buffering);
    let msg = s.error.clone().unwrap();
    assert!(msg.contains("Autoplay"));
    assert_ne!(msg, PlayFailure::Unknown("x".into()).to_string());
    assert_ne!(msg, PlayFailure::Aborted.to_string());
}

#[test]
fn play_clears_a_previous_error() {
    let mut c = loaded("a");
    c.play();
    let ticket = c.resource_mut().last_ticket();
    c.resource_mut()
        .settle(ticket, Err(PlayFailure::Unknown("boom".into())));
    c.pump();
    assert_eq!(c.state().error.as_deref(), Some("Play failed: boom"));

    c.play();
    assert_eq!(c.state().error, None);
    assert!(c.state().is_loading);
}

#[test]
fn stale_play_settlement_cannot_clobber_pause() {
    let mut c = loaded("a");
    c.play();
    let ticket = c.resource_mut().last_ticket();
    c.pause();
    assert!(!c.state().is_loading);

    c.resource_mut().settle(ticket, Ok(()));
    assert_eq!(c.pump(), 0);
    assert!(!c.state().is_playing);
}

#[test]
fn stale_play_settlement_cannot_clobber_new_track() {
    let mut c = loaded("a");
    c.play();
    let ticket = c.resource_mut().last_ticket();
    c.load_track(&track("b"));
    c.pump();

    c.resource_mut().settle(ticket, Err(PlayFailure::Aborted));
    assert_eq!(c.pump(), 0);
    assert_eq!(c.state().error, None);
    assert_eq!(c.state().current_track_id(), Some("b"));
}

#[test]
fn events_from_a_superseded_load_are_ignored() {
    let mut c = loaded("a");
    let old = c.generation();
    c.load_track(&track("b"));
    c.pump();

    c.resource_mut().emit(old, MediaEvent::DurationChange { duration: 999.0 });
    c.resource_mut().emit(
        old,
        MediaEvent::Error(MediaError::Decode {
            detail: "old".into(),
        }),
    );
    assert_eq!(c.pump(), 0);
    assert_eq!(c.state().duration, 0.0);
    assert_eq!(c.state().error, None);
    assert!(c.state().is_loading);
}

#[test]
fn ended_rewinds_and_stops() {
    let mut c = loaded("a");
    let g = c.generation();
    c.play();
    let ticket = c.resource_mut().last_ticket();
    c.resource_mut().settle(ticket, Ok(()));
    c.resource_mut().emit(g, MediaEvent::TimeUpdate { current_time: 300.0 });
    c.resource_mut().emit(g, MediaEvent::Ended);
    c.pump();

    let s = c.state();
    assert!(!s.is_playing);
    assert_eq!(s.current_time, 0.0);
    assert!(!s.is_buffering && !s.is_loading);
}

#[test]
fn media_errors_clear_loading_flags() {
    let mut c = loaded("a");
    assert!(c.state().is_loading && c.state().is_buffering);
    let g = c.generation();
    c.resource_mut().emit(
        g,
        MediaError::from_code(MediaError::SRC_NOT_SUPPORTED, None).into_event(),
    );
    c.pump();

    let s = c.state();
    assert!(!s.is_loading && !s.is_buffering && !s.is_playing);
    assert!(s.error.as_deref().unwrap().contains("not supported"));
}

#[test]
fn seek_and_stop_mirror_position_immediately() {
    let mut c = loaded("a");
    c.seek(95.0);
    assert_eq!(c.state().current_time, 95.0);
    assert_eq!(c.resource_mut().calls.last(), Some(&Call::Seek(95.0)));

    c.seek(f64::NAN);
    assert_eq!(c.state().current_time, 95.0);

    c.stop();
    assert_eq!(c.state().current_time, 0.0);
    assert!(!c.state().is_playing);
    assert_eq!(c.resource_mut().calls.last(), Some(&Call::Seek(0.0)));
}

#[test]
fn intents_never_change_the_current_track() {
    let mut c = loaded("a");
    c.play();
    c.pause();
    c.stop();
    c.seek(3.0);
    c.set_volume(0.2);
    c.toggle();
    assert_eq!(c.state().current_track_id(), Some("a"));
}

#[test]
fn play_without_a_track_is_a_no_op() {
    let mut c = PlaybackController::new(FakeResource::default());
    c.play();
    assert!(c.resource_mut().calls.is_empty());
    assert!(!c.state().is_loading);
}

#[test]
fn shutdown_releases_the_resource() {
    let mut c = loaded("a");
    c.shutdown(Duration::ZERO);
    assert_eq!(c.resource_mut().calls.last(), Some(&Call::Shutdown));
}

#[test]
fn media_error_codes_map_to_categories() {
    assert_eq!(MediaError::from_code(1, None), MediaError::Aborted);
    assert!(matches!(MediaError::from_code(2, None), MediaError::Network { .. }));
    assert!(matches!(MediaError::from_code(3, None), MediaError::Decode { .. }));
    assert!(matches!(MediaError::from_code(4, None), MediaError::SrcNotSupported { .. }));
    assert_eq!(
        MediaError::from_code(9, None).to_string(),
        "Error playing podcast: Unknown error (code 9)"
    );
    assert_eq!(MediaError::from_code(9, Some("weird".into())).code(), 9);
}

#[test]
fn reducer_progress_needs_a_known_duration() {
    let s = reduce(
        PlayerState::default(),
        &MediaEvent::Progress {
            buffered_end: Some(10.0),
            duration: 0.0,
        },
    );
    assert_eq!(s.load_progress, 0.0);

    let s = reduce(
        s,
        &MediaEvent::Progress {
            buffered_end: Some(25.0),
            duration: 100.0,
        },
    );
    assert_eq!(s.load_progress, 25.0);

    let s = reduce(
        s,
        &MediaEvent::Progress {
            buffered_end: Some(250.0),
            duration: 100.0,
        },
    );
    assert_eq!(s.load_progress, 100.0);
}

#[test]
fn reducer_duration_change_treats_unknown_as_zero() {
    let s = reduce(
        PlayerState::default(),
        &MediaEvent::DurationChange { duration: f64::INFINITY },
    );
    assert_eq!(s.duration, 0.0);
    let s = reduce(s, &MediaEvent::DurationChange { duration: 61.0 });
    assert_eq!(s.duration, 61.0);
}

#[test]
fn buffering_and_loading_are_independent() {
    let s = PlayerState {
        is_playing: true,
        ..PlayerState::default()
    };
    let s = reduce(s, &MediaEvent::Waiting);
    assert!(s.is_buffering);
    assert!(!s.is_loading);

    let s = reduce(s, &MediaEvent::Playing);
    assert!(!s.is_buffering && !s.is_loading);

    let s = reduce(s, &MediaEvent::LoadStart);
    let s = reduce(s, &MediaEvent::LoadedData);
    assert!(!s.is_loading);
    assert!(s.is_buffering);
    assert_eq!(s.load_progress, 100.0);
}

impl MediaError {
    fn into_event(self) -> MediaEvent {
        MediaEvent::Error(self)
    }
}

proptest! {
    #[test]
    fn volume_is_always_clamped(v in -10.0f64..10.0) {
        let mut c = loaded("a");
        c.set_volume(v);
        prop_assert_eq!(c.state().volume, v.clamp(0.0, 1.0));
        prop_assert_eq!(
            c.resource_mut().calls.last(),
            Some(&Call::Volume(v.clamp(0.0, 1.0)))
        );
    }

    #[test]
    fn load_progress_never_regresses_within_a_load(
        ends in prop::collection::vec(0.0f64..200.0, 1..40),
        duration in 1.0f64..150.0,
    ) {
        let mut c = loaded("a");
        let g = c.generation();
        let mut last = c.state().load_progress;
        for end in ends {
            c.resource_mut().emit(g, MediaEvent::Progress { buffered_end: Some(end), duration });
            c.pump();
            let now = c.state().load_progress;
            prop_assert!(now >= last);
            prop_assert!((0.0..=100.0).contains(&now));
            last = now;
        }

        c.load_track(&track("b"));
        prop_assert_eq!(c.state().load_progress, 0.0);
    }
}
