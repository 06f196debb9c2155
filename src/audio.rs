//! rodio-backed media resource.
//!
//! A dedicated audio thread owns the output stream and the current `Sink`;
//! a short-lived loader thread per track fetches the source bytes. Both talk
//! back to the controller through the notice channel drained by
//! `MediaResource::poll_notice`.

mod fetch;
mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
