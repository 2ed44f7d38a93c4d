//! Recording control
//!
//! The record button exists in the UI but capture is not implemented; the
//! handlers only resolve where a recording would land and report that.
// TODO: capture the default input via cpal and write frames to new_recording_path()

use std::path::PathBuf;

use chrono::Local;

/// Recording stub. `start`/`stop` are placeholders with no capture behavior.
pub struct Recorder {
    /// Status message
    pub status: String,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            status: String::new(),
        }
    }

    pub fn start(&mut self) {
        let target = new_recording_path();
        log::info!("Recording requested; would write to {}", target.display());
        self.status = "Recording is not implemented".to_string();
    }

    pub fn stop(&mut self) {}

    pub fn toggle(&mut self) {
        if self.is_recording() {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn is_recording(&self) -> bool {
        false
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamped output path for a new recording, under the platform audio
/// directory (falling back to the data dir, then the working directory).
pub fn new_recording_path() -> PathBuf {
    let base = dirs::audio_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = Local::now().format("%Y-%m-%dT%H-%M-%S");
    base.join(format!("{}.wav", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_path_is_a_timestamped_wav() {
        let path = new_recording_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();
        // YYYY-MM-DDTHH-MM-SS
        assert_eq!(stem.len(), 19);
        assert_eq!(&stem[4..5], "-");
        assert_eq!(&stem[10..11], "T");
    }

    #[test]
    fn recorder_never_reports_recording() {
        let mut recorder = Recorder::new();
        recorder.toggle();
        assert!(!recorder.is_recording());
        assert!(!recorder.status.is_empty());

        recorder.toggle();
        assert!(!recorder.is_recording());
    }
}
