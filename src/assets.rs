//! Bundled track resolution
//!
//! The app ships with a sample track and loads it on startup. The file is
//! looked up in an `assets/` directory next to the executable first, then
//! relative to the working directory, so both installed and `cargo run`
//! layouts work.

use std::path::PathBuf;

/// File name of the track bundled with the app.
pub const DEFAULT_TRACK: &str = "piano.mp3";

/// Locate the bundled startup track, if present.
pub fn bundled_track() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
    {
        candidates.push(exe_dir.join("assets"));
        candidates.push(exe_dir);
    }
    candidates.push(PathBuf::from("assets"));
    candidates.push(PathBuf::from("."));

    find_in(&candidates, DEFAULT_TRACK)
}

/// First directory in `dirs` that contains `name`.
fn find_in(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            log::info!("Found bundled track at {}", candidate.display());
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_in_returns_first_hit() {
        let empty = tempfile::tempdir().unwrap();
        let full = tempfile::tempdir().unwrap();
        std::fs::write(full.path().join("track.mp3"), b"x").unwrap();

        let dirs = vec![empty.path().to_path_buf(), full.path().to_path_buf()];
        let found = find_in(&dirs, "track.mp3").unwrap();
        assert_eq!(found, full.path().join("track.mp3"));
    }

    #[test]
    fn find_in_misses_cleanly() {
        let empty = tempfile::tempdir().unwrap();
        assert!(find_in(&[empty.path().to_path_buf()], "nope.mp3").is_none());
    }

    #[test]
    fn find_in_skips_directories_with_matching_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("track.mp3")).unwrap();
        assert!(find_in(&[dir.path().to_path_buf()], "track.mp3").is_none());
    }
}
