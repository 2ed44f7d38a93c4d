//! Audio module - the playback facade and the recording stub
//!
//! This module provides:
//! - Track loading and playback via symphonia + cpal
//! - The (unimplemented) recording surface

mod player;
mod recorder;

pub use player::{AudioPlayer, PlaybackState, PlayerError, PlayerEvent, TrackInfo};
pub use recorder::Recorder;

#[cfg(test)]
pub(crate) use player::write_test_wav;
