//! Decoding helpers and `rodio` sink construction for in-memory sources.
//!
//! Sources are fully buffered before decoding, so every sink is built from a
//! cheap `Arc<[u8]>` clone. Seeking rebuilds the sink and skips into the
//! decoded stream.

use std::io::Cursor;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::player::MediaError;

fn decoder_for(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>, MediaError> {
    Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(media_error_from_decoder)
}

pub(super) fn media_error_from_decoder(err: DecoderError) -> MediaError {
    match err {
        DecoderError::UnrecognizedFormat => MediaError::SrcNotSupported {
            detail: "unrecognized audio format".to_string(),
        },
        other => MediaError::Decode {
            detail: other.to_string(),
        },
    }
}

/// Check that `bytes` decode and work out their duration.
///
/// The decoder's own estimate wins; tag metadata is consulted when the
/// container does not announce a length (common for VBR mp3).
pub(super) fn decoded_duration(bytes: &Arc<[u8]>) -> Result<Option<Duration>, MediaError> {
    let decoder = decoder_for(bytes)?;
    Ok(decoder
        .total_duration()
        .or_else(|| tagged_duration(bytes))
        .filter(|d| !d.is_zero()))
}

fn tagged_duration(bytes: &Arc<[u8]>) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(Arc::clone(bytes)))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    Some(tagged.properties().duration())
}

/// Create a paused `Sink` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &Arc<[u8]>,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, MediaError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder_for(bytes)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Ramp `sink` down to silence over `fade_out_ms`, blocking the caller.
pub(super) fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
