use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;
use crate::player::{LoadGeneration, MediaResource, PlayFailure, PlayTicket, ResourceNotice};

use super::thread::spawn_audio_thread;
use super::types::AudioCmd;

/// The production [`MediaResource`]: commands go to the audio thread,
/// notices come back over a channel.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    notices: Receiver<ResourceNotice>,
    /// Notices synthesized locally when the audio thread is unreachable.
    local: VecDeque<ResourceNotice>,
    join: Option<JoinHandle<()>>,
}

impl AudioPlayer {
    pub fn new(audio_settings: AudioSettings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (notice_tx, notice_rx) = mpsc::channel::<ResourceNotice>();

        let audio_handle = spawn_audio_thread(rx, tx.clone(), notice_tx, audio_settings);

        Self {
            tx,
            notices: notice_rx,
            local: VecDeque::new(),
            join: Some(audio_handle),
        }
    }

    fn send(&self, cmd: AudioCmd) -> bool {
        match self.tx.send(cmd) {
            Ok(()) => true,
            Err(_) => {
                warn!("audio thread is gone; dropping command");
                false
            }
        }
    }
}

impl MediaResource for AudioPlayer {
    fn load(&mut self, src: &str, generation: LoadGeneration, duration_hint: Option<f64>) {
        self.send(AudioCmd::Load {
            src: src.to_string(),
            generation,
            duration_hint,
        });
    }

    fn play(&mut self, ticket: PlayTicket) {
        if !self.send(AudioCmd::Play(ticket)) {
            self.local.push_back(ResourceNotice::PlaySettled {
                ticket,
                result: Err(PlayFailure::Rejected {
                    name: "NoOutputDevice".to_string(),
                }),
            });
        }
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.send(AudioCmd::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.send(AudioCmd::SetVolume(volume.clamp(0.0, 1.0) as f32));
    }

    fn poll_notice(&mut self) -> Option<ResourceNotice> {
        self.local
            .pop_front()
            .or_else(|| self.notices.try_recv().ok())
    }

    fn shutdown(&mut self, fade_out: Duration) {
        let Some(handle) = self.join.take() else {
            return;
        };
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });
        let _ = handle.join();
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.shutdown(Duration::ZERO);
    }
}
