//! Fixed-interval refresh task
//!
//! The transport display is rebuilt on a recurring schedule while audio is
//! playing, rather than on every frame. `RefreshTimer` owns that schedule:
//! it is started on play, cancelled on pause/completion, and polled from the
//! UI loop with `tick()`. `time_until()` tells the event loop when to wake
//! up next so idle frames are not burned between ticks.

use std::time::{Duration, Instant};

/// How often the transport display is resampled while playing.
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(30);

/// A recurring deadline with an explicit start/cancel lifecycle.
///
/// At most one deadline is pending at a time; restarting an active timer
/// reschedules it from the new start point.
#[derive(Debug)]
pub struct RefreshTimer {
    interval: Duration,
    next_tick: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: None,
        }
    }

    /// Schedule the first tick one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_tick = Some(now + self.interval);
    }

    /// Drop the pending deadline. `tick()` reports nothing until the next
    /// `start()`.
    pub fn cancel(&mut self) {
        self.next_tick = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Returns true if a tick is due at `now` and schedules the next one.
    ///
    /// Missed intervals are coalesced into a single tick; the next deadline
    /// is always in the future relative to `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(deadline) if now >= deadline => {
                let mut next = deadline + self.interval;
                while next <= now {
                    next += self.interval;
                }
                self.next_tick = Some(next);
                true
            }
            _ => false,
        }
    }

    /// Time remaining until the pending deadline, if any.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next_tick
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(30);

    #[test]
    fn inactive_timer_never_ticks() {
        let mut timer = RefreshTimer::new(TICK);
        assert!(!timer.is_active());
        assert!(!timer.tick(Instant::now()));
        assert_eq!(timer.time_until(Instant::now()), None);
    }

    #[test]
    fn first_tick_due_one_interval_after_start() {
        let mut timer = RefreshTimer::new(TICK);
        let t0 = Instant::now();
        timer.start(t0);

        assert!(!timer.tick(t0));
        assert!(!timer.tick(t0 + TICK / 2));
        assert!(timer.tick(t0 + TICK));
    }

    #[test]
    fn ticks_repeat_on_the_interval() {
        let mut timer = RefreshTimer::new(TICK);
        let t0 = Instant::now();
        timer.start(t0);

        assert!(timer.tick(t0 + TICK));
        // Just ticked - not due again until another interval passes.
        assert!(!timer.tick(t0 + TICK));
        assert!(timer.tick(t0 + TICK * 2));
    }

    #[test]
    fn missed_intervals_coalesce_into_one_tick() {
        let mut timer = RefreshTimer::new(TICK);
        let t0 = Instant::now();
        timer.start(t0);

        // Stall for ten intervals; only one tick is reported and the next
        // deadline lands in the future.
        assert!(timer.tick(t0 + TICK * 10));
        assert!(!timer.tick(t0 + TICK * 10));
        assert!(timer.tick(t0 + TICK * 11));
    }

    #[test]
    fn cancel_stops_all_further_ticks() {
        let mut timer = RefreshTimer::new(TICK);
        let t0 = Instant::now();
        timer.start(t0);
        timer.cancel();

        assert!(!timer.is_active());
        assert!(!timer.tick(t0 + TICK * 100));
    }

    #[test]
    fn restart_reschedules_from_new_origin() {
        let mut timer = RefreshTimer::new(TICK);
        let t0 = Instant::now();
        timer.start(t0);
        timer.start(t0 + TICK * 5);

        assert!(!timer.tick(t0 + TICK));
        assert!(timer.tick(t0 + TICK * 6));
    }

    #[test]
    fn time_until_counts_down_to_deadline() {
        let mut timer = RefreshTimer::new(TICK);
        let t0 = Instant::now();
        timer.start(t0);

        assert_eq!(timer.time_until(t0), Some(TICK));
        assert_eq!(timer.time_until(t0 + TICK / 3), Some(TICK - TICK / 3));
        // Past the deadline the remaining time saturates at zero.
        assert_eq!(timer.time_until(t0 + TICK * 2), Some(Duration::ZERO));
    }
}
