//! Audio playback facade
//!
//! Wraps the host audio stack (symphonia for decoding, cpal for output)
//! behind a play/pause/seek/position surface. A decode thread reads packets
//! and feeds interleaved stereo f32 frames into a bounded ring buffer; the
//! cpal output callback drains it in real time. Completion and fatal decode
//! errors are delivered to the UI thread as [`PlayerEvent`]s; the UI drains
//! them on its own thread and never gets called back directly.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{unbounded, Receiver, Sender};
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapRb,
};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};
use thiserror::Error;

/// Ring buffer size in interleaved stereo samples (~250ms at 48kHz).
const RING_CAPACITY: usize = 24_000;

/// How long the decode thread sleeps when the ring buffer is full.
const FEED_SLEEP: Duration = Duration::from_millis(5);

/// How long the decode thread sleeps while paused.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Errors that can occur in the playback facade
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Failed to open file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to probe audio format: {0}")]
    Probe(String),

    #[error("No audio tracks found")]
    NoTracks,

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("No output device available")]
    NoDevice,

    #[error("Audio output error: {0}")]
    Output(String),
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Asynchronous notifications from the decode thread, drained on the UI
/// thread once per frame.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The track played to its end (loop disabled).
    Finished,
    /// The decode thread died on an unrecoverable error.
    Error(String),
}

/// Loaded track metadata
#[derive(Debug, Clone)]
pub struct TrackInfo {
    pub path: PathBuf,
    pub filename: String,
    pub duration: Duration,
    pub sample_rate: u32,
    pub channels: u32,
    pub format: String,
}

/// State shared between the UI thread, the decode thread, and the output
/// callback.
#[derive(Clone)]
struct Shared {
    state: Arc<Mutex<PlaybackState>>,
    /// Decoded position in frames.
    position: Arc<AtomicU64>,
    is_running: Arc<AtomicBool>,
    seek_frame: Arc<AtomicU64>,
    seek_pending: Arc<AtomicBool>,
    /// Tells the output callback to drain stale samples after a seek.
    clear_flag: Arc<AtomicBool>,
    loop_flag: Arc<AtomicBool>,
    events: Sender<PlayerEvent>,
    sample_rate: u32,
}

/// Audio player facade
pub struct AudioPlayer {
    /// Current track info
    pub info: Option<TrackInfo>,

    state: Arc<Mutex<PlaybackState>>,
    position: Arc<AtomicU64>,
    total_frames: u64,
    sample_rate: u32,

    is_running: Arc<AtomicBool>,
    /// Output callback emits silence while this is false, so pause is
    /// audible immediately even with samples still buffered.
    audible: Arc<AtomicBool>,
    seek_frame: Arc<AtomicU64>,
    seek_pending: Arc<AtomicBool>,
    clear_flag: Arc<AtomicBool>,

    /// Shared volume for the output callback (AtomicU32 with f32 bits)
    volume_atomic: Arc<AtomicU32>,
    loop_flag: Arc<AtomicBool>,

    events_tx: Sender<PlayerEvent>,
    events_rx: Receiver<PlayerEvent>,

    thread_handle: Option<thread::JoinHandle<()>>,
    output_stream: Option<cpal::Stream>,

    /// Volume/gain for UI binding
    pub volume: f32,

    /// Loop playback
    pub loop_playback: bool,

    /// Status message
    pub status: String,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            info: None,
            state: Arc::new(Mutex::new(PlaybackState::Stopped)),
            position: Arc::new(AtomicU64::new(0)),
            total_frames: 0,
            sample_rate: 44100,
            is_running: Arc::new(AtomicBool::new(false)),
            audible: Arc::new(AtomicBool::new(false)),
            seek_frame: Arc::new(AtomicU64::new(0)),
            seek_pending: Arc::new(AtomicBool::new(false)),
            clear_flag: Arc::new(AtomicBool::new(false)),
            volume_atomic: Arc::new(AtomicU32::new(1.0_f32.to_bits())),
            loop_flag: Arc::new(AtomicBool::new(false)),
            events_tx,
            events_rx,
            thread_handle: None,
            output_stream: None,
            volume: 1.0,
            loop_playback: false,
            status: "No track loaded".to_string(),
        }
    }

    /// Load a track, replacing the current one.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), PlayerError> {
        self.stop();
        self.info = None;
        self.total_frames = 0;

        let path = path.as_ref();
        let opened = open_track(path)?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
            .to_string();

        self.info = Some(TrackInfo {
            path: path.to_path_buf(),
            filename: filename.clone(),
            duration: opened.duration,
            sample_rate: opened.sample_rate,
            channels: opened.channels as u32,
            format: opened.codec_name,
        });
        self.total_frames = opened.n_frames.unwrap_or(0);
        self.sample_rate = opened.sample_rate;
        self.position.store(0, Ordering::Relaxed);

        self.status = format!("Loaded: {}", filename);
        log::info!("Loaded track: {:?}", path);

        Ok(())
    }

    /// Start or resume playback. A no-op with no track loaded.
    pub fn play(&mut self) {
        if self.info.is_none() {
            return;
        }

        {
            let mut state = self.state.lock().unwrap();
            match *state {
                PlaybackState::Playing => return,
                PlaybackState::Paused => {
                    *state = PlaybackState::Playing;
                    drop(state);
                    self.audible.store(true, Ordering::Relaxed);
                    self.status = "Playing".to_string();
                    return;
                }
                PlaybackState::Stopped => {}
            }
        }

        let (stream, producer) = match self.start_output() {
            Ok(pair) => pair,
            Err(e) => {
                log::error!("Failed to start audio output: {}", e);
                self.status = format!("Error: {}", e);
                let _ = self.events_tx.send(PlayerEvent::Error(e.to_string()));
                return;
            }
        };
        self.output_stream = Some(stream);

        self.sync_volume();
        self.sync_loop();
        self.is_running.store(true, Ordering::Relaxed);
        self.audible.store(true, Ordering::Relaxed);
        self.seek_pending.store(false, Ordering::Relaxed);

        *self.state.lock().unwrap() = PlaybackState::Playing;
        self.status = "Playing".to_string();

        let path = self.info.as_ref().map(|i| i.path.clone()).unwrap_or_default();
        let shared = Shared {
            state: Arc::clone(&self.state),
            position: Arc::clone(&self.position),
            is_running: Arc::clone(&self.is_running),
            seek_frame: Arc::clone(&self.seek_frame),
            seek_pending: Arc::clone(&self.seek_pending),
            clear_flag: Arc::clone(&self.clear_flag),
            loop_flag: Arc::clone(&self.loop_flag),
            events: self.events_tx.clone(),
            sample_rate: self.sample_rate,
        };

        self.thread_handle = Some(thread::spawn(move || {
            if let Err(e) = playback_thread(&path, producer, &shared) {
                log::error!("Playback error: {}", e);
                *shared.state.lock().unwrap() = PlaybackState::Stopped;
                let _ = shared.events.send(PlayerEvent::Error(e.to_string()));
            }
        }));
    }

    /// Pause playback; buffered audio falls silent immediately.
    pub fn pause(&mut self) {
        let paused = {
            let mut state = self.state.lock().unwrap();
            if *state == PlaybackState::Playing {
                *state = PlaybackState::Paused;
                true
            } else {
                false
            }
        };
        if paused {
            self.audible.store(false, Ordering::Relaxed);
            self.status = "Paused".to_string();
        }
    }

    /// Stop playback and rewind to the start.
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::Relaxed);
        self.audible.store(false, Ordering::Relaxed);
        *self.state.lock().unwrap() = PlaybackState::Stopped;

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.output_stream = None;
        self.seek_pending.store(false, Ordering::Relaxed);
        self.position.store(0, Ordering::Relaxed);

        self.status = if self.info.is_some() {
            "Stopped".to_string()
        } else {
            "No track loaded".to_string()
        };
    }

    /// Toggle play/pause
    pub fn toggle(&mut self) {
        match self.state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Stopped | PlaybackState::Paused => self.play(),
        }
    }

    /// Move the play head. Takes effect in the decode thread while playing;
    /// otherwise the next `play` starts from here.
    pub fn seek_to(&mut self, position: Duration) {
        if self.info.is_none() {
            return;
        }
        let duration_secs = self.duration().as_secs_f64();
        let secs = position.as_secs_f64().clamp(0.0, duration_secs);
        let mut frame = (secs * self.sample_rate as f64) as u64;
        if self.total_frames > 0 {
            frame = frame.min(self.total_frames);
        }

        self.position.store(frame, Ordering::Relaxed);
        if self.is_running.load(Ordering::Relaxed) {
            self.seek_frame.store(frame, Ordering::Relaxed);
            self.seek_pending.store(true, Ordering::Relaxed);
        }
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock().unwrap()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    pub fn has_track(&self) -> bool {
        self.info.is_some()
    }

    /// Current play head position.
    pub fn position(&self) -> Duration {
        let frames = self.position.load(Ordering::Relaxed);
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }

    /// Duration of the loaded track, zero with no track.
    pub fn duration(&self) -> Duration {
        self.info
            .as_ref()
            .map(|i| i.duration)
            .unwrap_or(Duration::ZERO)
    }

    /// Sync UI volume to the output callback.
    pub fn sync_volume(&self) {
        self.volume_atomic
            .store(self.volume.to_bits(), Ordering::Relaxed);
    }

    /// Sync the loop checkbox to the decode thread.
    pub fn sync_loop(&self) {
        self.loop_flag.store(self.loop_playback, Ordering::Relaxed);
    }

    /// Next pending notification from the decode thread, if any.
    pub fn poll_event(&self) -> Option<PlayerEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Open the default output device and wire its callback to a fresh ring
    /// buffer. Returns the stream and the producer half for the decode
    /// thread.
    fn start_output(&self) -> Result<(cpal::Stream, ringbuf::HeapProd<f32>), PlayerError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(PlayerError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|e| PlayerError::Output(e.to_string()))?;
        let sample_format = config.sample_format();
        let stream_config: cpal::StreamConfig = config.into();

        let rb = HeapRb::<f32>::new(RING_CAPACITY);
        let (producer, consumer) = rb.split();

        let volume = Arc::clone(&self.volume_atomic);
        let audible = Arc::clone(&self.audible);
        let clear_flag = Arc::clone(&self.clear_flag);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, consumer, volume, audible, clear_flag)
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, consumer, volume, audible, clear_flag)
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, consumer, volume, audible, clear_flag)
            }
            format => {
                return Err(PlayerError::Output(format!(
                    "unsupported sample format {:?}",
                    format
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| PlayerError::Output(e.to_string()))?;

        Ok((stream, producer))
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build the output stream for a concrete sample format. The callback pops
/// interleaved stereo from the ring buffer, applies volume, and maps onto
/// however many channels the device has. It never blocks.
fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut consumer: ringbuf::HeapCons<f32>,
    volume: Arc<AtomicU32>,
    audible: Arc<AtomicBool>,
    clear_flag: Arc<AtomicBool>,
) -> Result<cpal::Stream, PlayerError> {
    let channels = config.channels as usize;

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // After a seek, drop whatever was decoded before it.
                if clear_flag.swap(false, Ordering::SeqCst) {
                    while consumer.try_pop().is_some() {}
                }

                if !audible.load(Ordering::Relaxed) {
                    data.fill(T::from_sample(0.0));
                    return;
                }

                let vol = f32::from_bits(volume.load(Ordering::Relaxed));
                for frame in data.chunks_mut(channels) {
                    let left = consumer.try_pop().unwrap_or(0.0) * vol;
                    let right = consumer.try_pop().unwrap_or(0.0) * vol;
                    if channels >= 2 {
                        frame[0] = T::from_sample(left);
                        frame[1] = T::from_sample(right);
                        for ch in frame.iter_mut().skip(2) {
                            *ch = T::from_sample(0.0);
                        }
                    } else {
                        frame[0] = T::from_sample((left + right) * 0.5);
                    }
                }
            },
            |err| log::error!("Audio output error: {}", err),
            None,
        )
        .map_err(|e| PlayerError::Output(e.to_string()))?;

    Ok(stream)
}

/// A probed and decodable track.
struct OpenedTrack {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: usize,
    n_frames: Option<u64>,
    duration: Duration,
    codec_name: String,
}

/// Probe a file and set up a decoder for its default audio track.
fn open_track(path: &Path) -> Result<OpenedTrack, PlayerError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlayerError::Probe(e.to_string()))?;

    let format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(PlayerError::NoTracks)?;

    let track_id = track.id;
    let codec_params = &track.codec_params;
    let sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(2);
    let n_frames = codec_params.n_frames;

    let duration = if let Some(frames) = n_frames {
        let time_base = codec_params
            .time_base
            .unwrap_or(TimeBase::new(1, sample_rate));
        let time = time_base.calc_time(frames);
        Duration::from_secs_f64(time.seconds as f64 + time.frac)
    } else {
        Duration::ZERO
    };

    let codec_name = format!("{:?}", codec_params.codec).replace("CODEC_TYPE_", "");

    let decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|e| PlayerError::Decoder(e.to_string()))?;

    Ok(OpenedTrack {
        format,
        decoder,
        track_id,
        sample_rate,
        channels,
        n_frames,
        duration,
        codec_name,
    })
}

/// Decode loop. Runs until stopped, the track ends (loop disabled), or an
/// unrecoverable error occurs.
fn playback_thread(
    path: &Path,
    mut producer: ringbuf::HeapProd<f32>,
    shared: &Shared,
) -> Result<(), PlayerError> {
    let opened = open_track(path)?;
    let mut format = opened.format;
    let mut decoder = opened.decoder;
    let track_id = opened.track_id;
    let sample_rate = shared.sample_rate;

    // Resume from wherever the play head was left.
    let mut current_frame = shared.position.load(Ordering::Relaxed);
    if current_frame > 0 {
        seek_format(&mut format, track_id, current_frame, sample_rate);
        decoder.reset();
    }

    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        if !shared.is_running.load(Ordering::Relaxed) {
            return Ok(());
        }

        {
            let state = shared.state.lock().unwrap();
            match *state {
                PlaybackState::Paused => {
                    drop(state);
                    thread::sleep(PAUSE_POLL);
                    continue;
                }
                PlaybackState::Stopped => return Ok(()),
                PlaybackState::Playing => {}
            }
        }

        if shared.seek_pending.swap(false, Ordering::Relaxed) {
            let frame = shared.seek_frame.load(Ordering::Relaxed);
            if seek_format(&mut format, track_id, frame, sample_rate) {
                decoder.reset();
                current_frame = frame;
                shared.position.store(frame, Ordering::Relaxed);
                shared.clear_flag.store(true, Ordering::SeqCst);
            }
        }

        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                // End of track
                if shared.loop_flag.load(Ordering::Relaxed) {
                    if seek_format(&mut format, track_id, 0, sample_rate) {
                        decoder.reset();
                        current_frame = 0;
                        shared.position.store(0, Ordering::Relaxed);
                        continue;
                    }
                }
                *shared.state.lock().unwrap() = PlaybackState::Stopped;
                shared.position.store(0, Ordering::Relaxed);
                let _ = shared.events.send(PlayerEvent::Finished);
                return Ok(());
            }
            Err(e) => return Err(PlayerError::Decoder(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(PlayerError::Decoder(e.to_string())),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            sample_buf = Some(SampleBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        let buf = sample_buf.as_mut().unwrap();
        let channels = decoded.spec().channels.count();
        buf.copy_interleaved_ref(decoded);

        // Re-interleave to stereo pairs for the output callback.
        let samples = buf.samples();
        let frames = samples.len() / channels;
        let mut stereo = Vec::with_capacity(frames * 2);
        for frame in samples.chunks_exact(channels) {
            let left = frame[0];
            let right = if channels > 1 { frame[1] } else { left };
            stereo.push(left);
            stereo.push(right);
        }

        // Feed the ring buffer, yielding while it's full. The output
        // callback drains at real-time rate, so this paces decoding.
        let mut idx = 0;
        while idx < stereo.len() {
            if !shared.is_running.load(Ordering::Relaxed) {
                return Ok(());
            }
            if shared.seek_pending.load(Ordering::Relaxed) {
                // Remaining samples predate the seek target; drop them.
                break;
            }
            {
                let state = shared.state.lock().unwrap();
                match *state {
                    PlaybackState::Paused => {
                        drop(state);
                        thread::sleep(PAUSE_POLL);
                        continue;
                    }
                    PlaybackState::Stopped => return Ok(()),
                    PlaybackState::Playing => {}
                }
            }

            while idx < stereo.len() && producer.try_push(stereo[idx]).is_ok() {
                idx += 1;
            }
            if idx < stereo.len() {
                thread::sleep(FEED_SLEEP);
            }
        }

        current_frame += frames as u64;
        shared.position.store(current_frame, Ordering::Relaxed);
    }
}

/// Seek the container to a frame offset. Returns false (and logs) when the
/// format doesn't support it.
fn seek_format(
    format: &mut Box<dyn FormatReader>,
    track_id: u32,
    frame: u64,
    sample_rate: u32,
) -> bool {
    let time = Time::from(frame as f64 / sample_rate as f64);
    match format.seek(
        SeekMode::Accurate,
        SeekTo::Time {
            time,
            track_id: Some(track_id),
        },
    ) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Seek failed: {}", e);
            false
        }
    }
}

/// Minimal mono 16-bit PCM WAV, one second at 8kHz. Test fixture shared
/// with the controller tests.
#[cfg(test)]
pub(crate) fn write_test_wav(path: &Path) {
    let sample_rate: u32 = 8000;
    let frames: u32 = sample_rate;
    let data_len: u32 = frames * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for i in 0..frames {
        let sample = ((i % 64) as i16 - 32) * 256;
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(path, bytes).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_without_track_is_inert() {
        let mut player = AudioPlayer::new();
        player.toggle();
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(!player.is_playing());
        assert_eq!(player.position(), Duration::ZERO);
        assert_eq!(player.duration(), Duration::ZERO);

        // And again, to cover both toggle directions from Stopped.
        player.toggle();
        assert_eq!(player.state(), PlaybackState::Stopped);
    }

    #[test]
    fn load_missing_file_errors() {
        let mut player = AudioPlayer::new();
        let err = player.load("/definitely/not/here.mp3").unwrap_err();
        assert!(matches!(err, PlayerError::Io(_)));
        assert!(!player.has_track());
    }

    #[test]
    fn load_reads_track_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path);

        let mut player = AudioPlayer::new();
        player.load(&path).unwrap();

        let info = player.info.as_ref().unwrap();
        assert_eq!(info.sample_rate, 8000);
        assert_eq!(info.channels, 1);
        assert_eq!(player.duration(), Duration::from_secs(1));
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.position(), Duration::ZERO);
        assert!(player.status.starts_with("Loaded"));
    }

    #[test]
    fn seek_clamps_to_track_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path);

        let mut player = AudioPlayer::new();
        player.load(&path).unwrap();

        player.seek_to(Duration::from_secs(10));
        assert_eq!(player.position(), player.duration());

        player.seek_to(Duration::ZERO);
        assert_eq!(player.position(), Duration::ZERO);
    }

    #[test]
    fn seek_without_track_is_inert() {
        let mut player = AudioPlayer::new();
        player.seek_to(Duration::from_secs(5));
        assert_eq!(player.position(), Duration::ZERO);
    }

    #[test]
    fn position_is_monotonic_as_frames_advance() {
        let player = AudioPlayer::new();
        let mut last = Duration::ZERO;
        for frames in [0u64, 441, 4410, 44100, 88200] {
            player.position.store(frames, Ordering::Relaxed);
            let pos = player.position();
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn stop_rewinds_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_test_wav(&path);

        let mut player = AudioPlayer::new();
        player.load(&path).unwrap();
        player.position.store(4000, Ordering::Relaxed);

        player.stop();
        assert_eq!(player.position(), Duration::ZERO);
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.status, "Stopped");
    }
}
