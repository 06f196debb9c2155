use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::player::{LoadGeneration, MediaError, MediaEvent, PlayFailure, PlayTicket, ResourceNotice};

use super::fetch::{LoadJob, spawn_loader};
use super::sink::{create_sink_at, decoded_duration, fade_out_sink};
use super::types::AudioCmd;

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    loader_tx: Sender<AudioCmd>,
    notices: Sender<ResourceNotice>,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in
                // debugging, but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device; playback requests will be rejected");
                None
            }
        };

        let tick = Duration::from_millis(audio_settings.tick_ms.max(10));
        let stall_timeout = Duration::from_secs(audio_settings.stall_timeout_secs.max(1));
        let mut state = AudioThreadState::new(stream, notices, loader_tx, stall_timeout);

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    state.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => state.handle(cmd),
                Err(RecvTimeoutError::Timeout) => state.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("audio thread exiting");
    })
}

/// What the audio thread knows about the current source.
enum SourceState {
    Empty,
    Loading,
    Ready {
        bytes: Arc<[u8]>,
        duration: Option<Duration>,
    },
    Failed,
}

pub(super) struct AudioThreadState {
    stream: Option<OutputStream>,
    notices: Sender<ResourceNotice>,
    loader_tx: Sender<AudioCmd>,
    /// Generation loaders compare against to detect they were superseded.
    current: Arc<AtomicU64>,
    generation: LoadGeneration,
    source: SourceState,
    sink: Option<Sink>,
    /// Source position at which `sink` started.
    offset: Duration,
    playing: bool,
    pending_play: Option<PlayTicket>,
    volume: f32,
    /// Handed to every loader; see `LoadJob::stall_timeout`.
    stall_timeout: Duration,
}

impl AudioThreadState {
    pub(super) fn new(
        stream: Option<OutputStream>,
        notices: Sender<ResourceNotice>,
        loader_tx: Sender<AudioCmd>,
        stall_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            notices,
            loader_tx,
            current: Arc::new(AtomicU64::new(0)),
            generation: LoadGeneration::default(),
            source: SourceState::Empty,
            sink: None,
            offset: Duration::ZERO,
            playing: false,
            pending_play: None,
            volume: 1.0,
            stall_timeout,
        }
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load {
                src,
                generation,
                duration_hint,
            } => self.load(src, generation, duration_hint),
            AudioCmd::Fetched { generation, result } => self.fetched(generation, result),
            AudioCmd::Play(ticket) => self.play(ticket),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(seconds) => self.seek(seconds),
            AudioCmd::SetVolume(volume) => {
                self.volume = volume;
                if let Some(sink) = self.sink.as_ref() {
                    sink.set_volume(volume);
                }
            }
            AudioCmd::Quit { fade_out_ms } => self.quit(fade_out_ms),
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.notices.send(ResourceNotice::Event {
            generation: self.generation,
            event,
        });
    }

    fn settle(&self, ticket: PlayTicket, result: Result<(), PlayFailure>) {
        let _ = self.notices.send(ResourceNotice::PlaySettled { ticket, result });
    }

    fn abort_pending(&mut self) {
        if let Some(ticket) = self.pending_play.take() {
            self.settle(ticket, Err(PlayFailure::Aborted));
        }
    }

    fn drop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.playing = false;
    }

    fn load(&mut self, src: String, generation: LoadGeneration, duration_hint: Option<f64>) {
        self.abort_pending();
        self.drop_sink();
        self.offset = Duration::ZERO;
        self.generation = generation;
        self.current.store(generation.0, Ordering::SeqCst);
        self.source = SourceState::Loading;

        info!(%src, generation = generation.0, "loading track");
        spawn_loader(
            LoadJob {
                src,
                generation,
                duration_hint,
                stall_timeout: self.stall_timeout,
            },
            Arc::clone(&self.current),
            self.notices.clone(),
            self.loader_tx.clone(),
        );
    }

    fn fetched(&mut self, generation: LoadGeneration, result: Result<Arc<[u8]>, MediaError>) {
        if generation != self.generation {
            debug!(generation = generation.0, "dropping superseded fetch");
            return;
        }

        let decoded =
            result.and_then(|bytes| decoded_duration(&bytes).map(|duration| (bytes, duration)));
        let (bytes, duration) = match decoded {
            Ok(ok) => ok,
            Err(err) => {
                self.source = SourceState::Failed;
                if let Some(ticket) = self.pending_play.take() {
                    self.settle(
                        ticket,
                        Err(PlayFailure::Rejected {
                            name: "NotSupportedError".to_string(),
                        }),
                    );
                }
                // Reported after the rejection so the media error is what stays visible.
                self.emit(MediaEvent::Error(err));
                return;
            }
        };

        let seconds = duration.map_or(0.0, |d| d.as_secs_f64());
        self.emit(MediaEvent::DurationChange { duration: seconds });
        if seconds > 0.0 {
            self.emit(MediaEvent::Progress {
                buffered_end: Some(seconds),
                duration: seconds,
            });
        }
        if let Some(d) = duration {
            self.offset = self.offset.min(d);
        }
        self.source = SourceState::Ready { bytes, duration };
        self.emit(MediaEvent::LoadedData);
        self.emit(MediaEvent::CanPlay);

        if let Some(ticket) = self.pending_play.take() {
            self.start(ticket);
        }
    }

    /// Make sure a paused sink exists for the ready source at `offset`.
    fn ensure_sink(&mut self) -> Result<(), PlayFailure> {
        if self.sink.is_some() {
            return Ok(());
        }
        let SourceState::Ready { bytes, .. } = &self.source else {
            return Err(PlayFailure::Rejected {
                name: "NotSupportedError".to_string(),
            });
        };
        let Some(stream) = self.stream.as_ref() else {
            return Err(PlayFailure::Rejected {
                name: "NoOutputDevice".to_string(),
            });
        };
        let sink = create_sink_at(stream, bytes, self.offset, self.volume).map_err(|e| {
            warn!(error = %e.detail(), "failed to build sink");
            PlayFailure::Rejected {
                name: "DecodeError".to_string(),
            }
        })?;
        self.sink = Some(sink);
        Ok(())
    }

    fn start(&mut self, ticket: PlayTicket) {
        match self.ensure_sink() {
            Ok(()) => {
                if let Some(sink) = self.sink.as_ref() {
                    sink.play();
                }
                self.playing = true;
                self.emit(MediaEvent::Playing);
                self.settle(ticket, Ok(()));
            }
            Err(failure) => self.settle(ticket, Err(failure)),
        }
    }

    fn play(&mut self, ticket: PlayTicket) {
        if ticket.generation != self.generation {
            self.settle(ticket, Err(PlayFailure::Aborted));
            return;
        }
        self.abort_pending();

        match self.source {
            SourceState::Loading => {
                self.pending_play = Some(ticket);
                self.emit(MediaEvent::Waiting);
            }
            SourceState::Ready { .. } if self.playing => self.settle(ticket, Ok(())),
            SourceState::Ready { .. } => self.start(ticket),
            SourceState::Empty | SourceState::Failed => self.settle(
                ticket,
                Err(PlayFailure::Rejected {
                    name: "NotSupportedError".to_string(),
                }),
            ),
        }
    }

    fn position(&self) -> Duration {
        match self.sink.as_ref() {
            Some(sink) => self.offset.saturating_add(sink.get_pos()),
            None => self.offset,
        }
    }

    fn pause(&mut self) {
        self.abort_pending();
        if !self.playing {
            return;
        }
        let position = self.position();
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        self.playing = false;
        self.emit(MediaEvent::TimeUpdate {
            current_time: position.as_secs_f64(),
        });
    }

    fn seek(&mut self, seconds: f64) {
        // Anything past `Duration::MAX` saturates instead of panicking.
        let mut target = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX);
        if let SourceState::Ready {
            duration: Some(d), ..
        } = &self.source
        {
            target = target.min(*d);
        }

        let was_playing = self.playing;
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.offset = target;

        // Scrubbing while playing: rebuild the sink and skip into the source.
        // A paused sink is rebuilt lazily by the next play.
        if was_playing {
            let resumed = self.ensure_sink().map(|()| {
                if let Some(sink) = self.sink.as_ref() {
                    sink.play();
                }
            });
            if let Err(failure) = resumed {
                warn!(?failure, "seek failed to rebuild sink");
                self.playing = false;
            }
        }
        self.emit(MediaEvent::TimeUpdate {
            current_time: target.as_secs_f64(),
        });
    }

    #[cfg(test)]
    pub(super) fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub(super) fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if sink.empty() {
            // Rewind so a later play starts from the top.
            self.drop_sink();
            self.offset = Duration::ZERO;
            self.emit(MediaEvent::Ended);
            return;
        }
        self.emit(MediaEvent::TimeUpdate {
            current_time: self.position().as_secs_f64(),
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        self.abort_pending();
        // Strand any loader still running.
        self.current.store(u64::MAX, Ordering::SeqCst);
        if let Some(sink) = self.sink.take() {
            if self.playing {
                fade_out_sink(&sink, fade_out_ms);
            }
            sink.stop();
        }
        self.playing = false;
    }
}
