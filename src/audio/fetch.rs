//! Background download of a track's bytes.
//!
//! One loader thread runs per `Load`. It reports `LoadStart`/`Progress`
//! events directly and hands the finished buffer back to the audio thread.
//! A loader whose generation is no longer current stops at the next chunk
//! boundary and reports nothing further.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::player::{LoadGeneration, MediaError, MediaEvent, ResourceNotice};

use super::types::AudioCmd;

const CHUNK_SIZE: usize = 64 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub(super) struct LoadJob {
    pub src: String,
    pub generation: LoadGeneration,
    pub duration_hint: Option<f64>,
    /// Longest wait for the response headers or for any single body read.
    pub stall_timeout: Duration,
}

/// Where a track's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocation {
    pub(super) fn parse(src: &str) -> Result<Self, MediaError> {
        match Url::parse(src) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Local)
                    .map_err(|()| unsupported(format!("invalid file URL {src}"))),
                other => Err(unsupported(format!("unsupported scheme {other}"))),
            },
            // Bare paths are read from the filesystem.
            Err(_) => Ok(Self::Local(PathBuf::from(src))),
        }
    }
}

fn unsupported(detail: String) -> MediaError {
    MediaError::SrcNotSupported { detail }
}

/// Map an HTTP status to the media error a failed fetch reports.
pub(super) fn status_error(status: u16) -> Option<MediaError> {
    let code = match status {
        200..=299 => return None,
        404 | 410 | 415 => MediaError::SRC_NOT_SUPPORTED,
        _ => MediaError::NETWORK,
    };
    Some(MediaError::from_code(code, Some(format!("HTTP {status}"))))
}

/// Build the `Progress` event for `read` of `total` bytes.
///
/// With a known duration the buffered end is expressed in seconds; without
/// one the event carries a plain fraction over a unit duration.
pub(super) fn progress_event(read: u64, total: u64, duration_hint: Option<f64>) -> Option<MediaEvent> {
    if total == 0 {
        return None;
    }
    let fraction = (read as f64 / total as f64).clamp(0.0, 1.0);
    Some(match duration_hint.filter(|d| d.is_finite() && *d > 0.0) {
        Some(duration) => MediaEvent::Progress {
            buffered_end: Some(fraction * duration),
            duration,
        },
        None => MediaEvent::Progress {
            buffered_end: Some(fraction),
            duration: 1.0,
        },
    })
}

pub(super) fn spawn_loader(
    job: LoadJob,
    current: Arc<AtomicU64>,
    notices: Sender<ResourceNotice>,
    done: Sender<AudioCmd>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let generation = job.generation;
        let _ = notices.send(ResourceNotice::Event {
            generation,
            event: MediaEvent::LoadStart,
        });

        let is_current = || current.load(Ordering::SeqCst) == generation.0;
        let result = download(&job, &is_current, &notices);

        match result {
            Ok(None) => debug!(src = %job.src, "load superseded"),
            Ok(Some(bytes)) => {
                debug!(src = %job.src, bytes = bytes.len(), "load finished");
                let _ = done.send(AudioCmd::Fetched {
                    generation,
                    result: Ok(bytes),
                });
            }
            Err(err) => {
                warn!(src = %job.src, error = %err.detail(), "load failed");
                if is_current() {
                    let _ = done.send(AudioCmd::Fetched {
                        generation,
                        result: Err(err),
                    });
                }
            }
        }
    })
}

/// `Ok(None)` means the load was superseded before it finished.
fn download(
    job: &LoadJob,
    is_current: &dyn Fn() -> bool,
    notices: &Sender<ResourceNotice>,
) -> Result<Option<Arc<[u8]>>, MediaError> {
    let (mut reader, total) = open(&SourceLocation::parse(&job.src)?, job.stall_timeout)?;

    let mut buf = Vec::with_capacity(total.unwrap_or(0).min(64 * 1024 * 1024) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut last_percent = None;

    loop {
        if !is_current() {
            return Ok(None);
        }
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(MediaError::Network {
                    detail: e.to_string(),
                });
            }
        };
        buf.extend_from_slice(&chunk[..n]);

        let Some(total) = total else { continue };
        let percent = (buf.len() as u64).saturating_mul(100) / total.max(1);
        if last_percent == Some(percent) {
            continue;
        }
        last_percent = Some(percent);
        if let Some(event) = progress_event(buf.len() as u64, total, job.duration_hint) {
            let _ = notices.send(ResourceNotice::Event {
                generation: job.generation,
                event,
            });
        }
    }

    if !is_current() {
        return Ok(None);
    }
    Ok(Some(Arc::from(buf)))
}

type Body = Box<dyn Read + Send>;

fn open(location: &SourceLocation, stall_timeout: Duration) -> Result<(Body, Option<u64>), MediaError> {
    match location {
        SourceLocation::Remote(url) => {
            let client = reqwest::blocking::Client::builder()
                .connect_timeout(CONNECT_TIMEOUT.min(stall_timeout))
                // The blocking client applies this to the headers and to each
                // body read, so a long download only fails when it stalls.
                .timeout(stall_timeout)
                .build()
                .map_err(|e| MediaError::Network {
                    detail: e.to_string(),
                })?;
            let response = client
                .get(url.clone())
                .send()
                .map_err(|e| MediaError::Network {
                    detail: e.to_string(),
                })?;
            if let Some(err) = status_error(response.status().as_u16()) {
                return Err(err);
            }
            let total = response.content_length();
            Ok((Box::new(response), total))
        }
        SourceLocation::Local(path) => {
            let file = File::open(path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => unsupported(format!("{} not found", path.display())),
                _ => MediaError::Network {
                    detail: format!("{}: {e}", path.display()),
                },
            })?;
            let total = file.metadata().ok().map(|m| m.len());
            Ok((Box::new(file), total))
        }
    }
}
