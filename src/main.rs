//! tapedeck - minimal desktop audio player
//!
//! Plays a single track: play/pause toggle, elapsed/remaining time labels
//! and a scrub slider, refreshed on a fixed 30 ms schedule while audio is
//! playing. Recording is declared in the UI but stubbed out.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

mod assets;
mod audio;
mod refresh;
mod settings;

use audio::{AudioPlayer, PlayerEvent, Recorder};
use refresh::{RefreshTimer, REFRESH_INTERVAL};
use settings::{AppSettings, LoadPolicy};

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("Starting tapedeck");

    let settings = AppSettings::load();

    let mut player = AudioPlayer::new();
    match startup_track(&settings) {
        Some(path) => {
            if let Err(e) = player.load(&path) {
                match settings.load_policy {
                    LoadPolicy::Fatal => {
                        log::error!("Failed to load startup track {}: {}", path.display(), e);
                        std::process::exit(1);
                    }
                    LoadPolicy::Lenient => {
                        log::warn!("Failed to load startup track {}: {}", path.display(), e);
                        player.status = format!("Error: {}", e);
                    }
                }
            }
        }
        None => match settings.load_policy {
            LoadPolicy::Fatal => {
                log::error!("Startup track {} not found", assets::DEFAULT_TRACK);
                std::process::exit(1);
            }
            LoadPolicy::Lenient => log::info!("No startup track found"),
        },
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 220.0])
            .with_title("tapedeck"),
        ..Default::default()
    };

    eframe::run_native(
        "tapedeck",
        options,
        Box::new(move |_cc| Ok(Box::new(PlayerApp::new(settings, player)))),
    )
}

/// Track to load at startup: the settings override if set, else the bundled
/// sample.
fn startup_track(settings: &AppSettings) -> Option<PathBuf> {
    if let Some(track) = &settings.track {
        return Some(track.clone());
    }
    assets::bundled_track()
}

/// Display values the transport widgets render.
///
/// Rebuilt only by refresh ticks and one-shot refreshes - the view never
/// reads the player directly, so pausing freezes the labels for real.
#[derive(Debug, Clone, PartialEq)]
struct TransportDisplay {
    playing: bool,
    elapsed: String,
    remaining: String,
    slider_pos: f32,
    slider_max: f32,
}

impl Default for TransportDisplay {
    fn default() -> Self {
        Self {
            playing: false,
            elapsed: format_duration(Duration::ZERO),
            remaining: format_duration(Duration::ZERO),
            slider_pos: 0.0,
            slider_max: 0.0,
        }
    }
}

pub struct PlayerApp {
    player: AudioPlayer,
    recorder: Recorder,
    refresh: RefreshTimer,
    display: TransportDisplay,
    load_policy: LoadPolicy,
    track_override: Option<PathBuf>,
}

impl PlayerApp {
    fn new(settings: AppSettings, player: AudioPlayer) -> Self {
        let mut app = Self {
            player,
            recorder: Recorder::new(),
            refresh: RefreshTimer::new(REFRESH_INTERVAL),
            display: TransportDisplay::default(),
            load_policy: LoadPolicy::default(),
            track_override: None,
        };
        settings.apply(&mut app);
        app.refresh_display();
        app
    }

    /// Flip between playing and not playing. Starts the refresh loop on
    /// play, cancels it on pause.
    fn toggle_playback(&mut self, now: Instant) {
        if self.player.is_playing() {
            self.player.pause();
            self.refresh.cancel();
        } else {
            self.player.play();
            if self.player.is_playing() {
                self.refresh.start(now);
            } else {
                self.refresh.cancel();
            }
        }
        self.refresh_display();
    }

    /// Apply one facade notification on the UI thread: stop the refresh
    /// loop and push one final snapshot.
    fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Finished => {
                log::info!("Track finished");
                self.player.status = "Stopped".to_string();
            }
            PlayerEvent::Error(e) => {
                log::error!("Playback failed: {}", e);
                self.player.status = format!("Error: {}", e);
            }
        }
        self.refresh.cancel();
        self.refresh_display();
    }

    fn drain_player_events(&mut self) {
        while let Some(event) = self.player.poll_event() {
            self.handle_event(event);
        }
    }

    fn open_track(&mut self, path: PathBuf) {
        self.refresh.cancel();
        match self.player.load(&path) {
            Ok(()) => self.track_override = Some(path),
            Err(e) => {
                log::error!("Failed to load file: {}", e);
                self.player.status = format!("Error: {}", e);
            }
        }
        self.refresh_display();
    }

    /// Re-read position/duration from the facade into the snapshot.
    fn refresh_display(&mut self) {
        let elapsed = self.player.position();
        let duration = self.player.duration();
        // Remaining counts down from the whole-second duration so it lands
        // on 00:00 exactly when the elapsed label reaches the end.
        let remaining = Duration::from_secs(duration.as_secs_f64().round() as u64)
            .saturating_sub(elapsed);

        self.display = TransportDisplay {
            playing: self.player.is_playing(),
            elapsed: format_duration(elapsed),
            remaining: format_duration(remaining),
            slider_pos: elapsed.as_secs_f64() as f32,
            slider_max: duration.as_secs_f64() as f32,
        };
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.drain_player_events();
        if self.refresh.tick(now) {
            self.refresh_display();
        }
        if let Some(wait) = self.refresh.time_until(now) {
            ctx.request_repaint_after(wait);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("tapedeck");
                ui.separator();

                if ui.button("📂 Open").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Audio", &["wav", "mp3", "flac", "ogg", "m4a", "aac", "aiff"])
                        .pick_file()
                    {
                        self.open_track(path);
                    }
                }

                ui.separator();
                ui.label(&self.player.status);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);

            match &self.player.info {
                Some(info) => {
                    ui.label(&info.filename);
                    ui.small(format!(
                        "{} · {} Hz · {} ch",
                        info.format, info.sample_rate, info.channels
                    ));
                }
                None => {
                    ui.label("No track loaded");
                }
            }

            ui.add_space(8.0);

            // Transport row
            ui.horizontal(|ui| {
                let play_text = if self.display.playing { "⏸" } else { "▶" };
                if ui.button(play_text).clicked() {
                    self.toggle_playback(now);
                }

                if ui.button("⏺").clicked() {
                    self.recorder.toggle();
                }

                if !self.recorder.status.is_empty() {
                    ui.label(&self.recorder.status);
                }
            });

            ui.add_space(4.0);

            // Time row: elapsed | scrub slider | remaining
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(self.display.elapsed.as_str()).monospace());

                let slider_max = if self.display.slider_max > 0.0 {
                    self.display.slider_max
                } else {
                    1.0
                };
                let mut pos = self.display.slider_pos;
                let response = ui.add_enabled(
                    self.player.has_track(),
                    egui::Slider::new(&mut pos, 0.0..=slider_max).show_value(false),
                );
                if response.changed() {
                    self.player.seek_to(Duration::from_secs_f64(pos as f64));
                    self.refresh_display();
                }

                ui.label(egui::RichText::new(self.display.remaining.as_str()).monospace());
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Vol:");
                if ui
                    .add(egui::Slider::new(&mut self.player.volume, 0.0..=1.0).show_value(false))
                    .changed()
                {
                    self.player.sync_volume();
                }

                ui.separator();

                if ui.checkbox(&mut self.player.loop_playback, "Loop").changed() {
                    self.player.sync_loop();
                }
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        AppSettings::from_app(self).save();
        self.refresh.cancel();
        self.player.stop();
    }
}

/// Format a duration as MM:SS, zero-padded; minutes are not wrapped at 59.
fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let mins = secs / 60;
    let secs = secs % 60;
    format!("{:02}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> PlayerApp {
        PlayerApp::new(AppSettings::default(), AudioPlayer::new())
    }

    #[test]
    fn format_duration_is_zero_padded_mm_ss() {
        assert_eq!(format_duration(Duration::ZERO), "00:00");
        assert_eq!(format_duration(Duration::from_secs(9)), "00:09");
        assert_eq!(format_duration(Duration::from_secs(65)), "01:05");
        assert_eq!(format_duration(Duration::from_secs(600)), "10:00");
        // Sub-second positions truncate down.
        assert_eq!(format_duration(Duration::from_millis(59_900)), "00:59");
        // Minutes keep counting past the hour.
        assert_eq!(format_duration(Duration::from_secs(73 * 60 + 9)), "73:09");
    }

    #[test]
    fn toggle_without_track_keeps_zero_display() {
        let mut app = test_app();
        app.toggle_playback(Instant::now());

        assert!(!app.display.playing);
        assert_eq!(app.display.elapsed, "00:00");
        assert_eq!(app.display.remaining, "00:00");
        assert_eq!(app.display.slider_pos, 0.0);
        assert_eq!(app.display.slider_max, 0.0);
        assert!(!app.refresh.is_active());

        // Toggling again still never faults.
        app.toggle_playback(Instant::now());
        assert!(!app.display.playing);
    }

    #[test]
    fn finished_event_stops_the_refresh_loop() {
        let mut app = test_app();
        app.refresh.start(Instant::now());

        app.handle_event(PlayerEvent::Finished);
        assert!(!app.refresh.is_active());
        assert!(!app.display.playing);
        assert_eq!(app.player.status, "Stopped");
    }

    #[test]
    fn error_event_surfaces_in_status() {
        let mut app = test_app();
        app.handle_event(PlayerEvent::Error("decode failed".to_string()));
        assert!(app.player.status.contains("decode failed"));
        assert!(!app.display.playing);
        assert!(!app.refresh.is_active());
    }

    #[test]
    fn display_reflects_loaded_track() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        audio::write_test_wav(&path);

        let mut app = test_app();
        app.open_track(path.clone());

        assert_eq!(app.display.slider_max, 1.0);
        assert_eq!(app.display.elapsed, "00:00");
        assert_eq!(app.display.remaining, "00:01");
        assert_eq!(app.track_override, Some(path));
    }

    #[test]
    fn failed_open_keeps_previous_override() {
        let mut app = test_app();
        app.open_track(PathBuf::from("/nope.mp3"));

        assert!(app.player.status.starts_with("Error"));
        assert!(app.track_override.is_none());
        assert_eq!(app.display.slider_max, 0.0);
    }

    #[test]
    fn startup_track_prefers_settings_override() {
        let settings = AppSettings {
            track: Some(PathBuf::from("/music/song.flac")),
            ..Default::default()
        };
        assert_eq!(
            startup_track(&settings),
            Some(PathBuf::from("/music/song.flac"))
        );
    }
}
