use std::time::{Duration, Instant};

use crate::constants::TIMER_HZ;

/// Interval between timer decrements.
const TICK: Duration = Duration::from_nanos(1_000_000_000 / TIMER_HZ as u64);

/// The delay and sound countdown pair.
///
/// Both decrement toward 0 at 60 Hz of monotonic wall time, independent
/// of instruction throughput; the host calls [`Timers::tick`] with the
/// current instant as often as it likes and leftover time below one
/// interval is carried forward so the rate does not drift.
pub(crate) struct Timers {
    pub(crate) delay: u8,
    pub(crate) sound: u8,
    last: Option<Instant>,
    carry: Duration,
}

impl Timers {
    pub(crate) fn new() -> Self {
        Timers {
            delay: 0,
            sound: 0,
            last: None,
            carry: Duration::from_secs(0),
        }
    }

    /// Advances both timers by however many whole intervals have
    /// elapsed since the previous call. The first call only anchors the
    /// clock.
    pub(crate) fn tick(&mut self, now: Instant) {
        let last = match self.last.replace(now) {
            Some(last) => last,
            None => return,
        };
        self.carry += now.saturating_duration_since(last);
        while self.carry >= TICK {
            self.carry -= TICK;
            self.delay = self.delay.saturating_sub(1);
            self.sound = self.sound.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod test_timers {
    use super::*;

    #[test]
    fn test_first_tick_only_anchors() {
        let mut timers = Timers::new();
        timers.delay = 5;
        timers.tick(Instant::now());
        assert_eq!(timers.delay, 5);
    }

    #[test]
    fn test_decrements_once_per_interval() {
        let mut timers = Timers::new();
        timers.delay = 5;
        timers.sound = 2;
        let t0 = Instant::now();
        timers.tick(t0);
        timers.tick(t0 + TICK * 3);
        assert_eq!(timers.delay, 2);
        assert_eq!(timers.sound, 0);
    }

    #[test]
    fn test_floors_at_zero() {
        let mut timers = Timers::new();
        timers.delay = 2;
        let t0 = Instant::now();
        timers.tick(t0);
        timers.tick(t0 + TICK * 10);
        assert_eq!(timers.delay, 0);
        assert_eq!(timers.sound, 0);
    }

    #[test]
    fn test_carries_partial_intervals() {
        let mut timers = Timers::new();
        timers.delay = 5;
        let t0 = Instant::now();
        timers.tick(t0);
        timers.tick(t0 + TICK / 2);
        assert_eq!(timers.delay, 5);
        // The two half intervals add up to exactly one decrement.
        timers.tick(t0 + TICK);
        assert_eq!(timers.delay, 4);
    }

    #[test]
    fn test_five_from_five_intervals() {
        let mut timers = Timers::new();
        timers.delay = 5;
        let t0 = Instant::now();
        timers.tick(t0);
        timers.tick(t0 + TICK * 5);
        assert_eq!(timers.delay, 0);
    }
}
