//! Repeating timer built on a single deferred message, the way a UI message
//! loop re-posts a delayed message from its own handler.
//!
//! There is never more than one pending message. Handling a message re-posts
//! the next one an interval after the time it was handled at, so a late poll
//! fires once and pushes the rest of the schedule back. Missed ticks are not
//! replayed.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Clock time the tick was due at.
    pub due: Duration,
    /// Clock time the tick was handled at. Never earlier than `due`.
    pub handled_at: Duration,
    /// Zero-based count of ticks fired by this scheduler.
    pub sequence: u64,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    running: bool,
    pending: Option<Duration>,
    fired: u64,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            running: false,
            pending: None,
            fired: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// First tick fires as soon as the scheduler is polled at `now`.
    pub fn start(&mut self, now: Duration) {
        self.start_at(now);
    }

    /// First tick fires one interval after `now`.
    pub fn delay_start(&mut self, now: Duration) {
        self.start_at(now + self.interval);
    }

    fn start_at(&mut self, due: Duration) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(due);
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.pending = None;
    }

    /// Takes the pending message if it is due and, while running, re-posts
    /// the next one an interval after `now`.
    pub fn poll(&mut self, now: Duration) -> Option<Tick> {
        let due = self.pending.filter(|due| *due <= now)?;
        self.pending = None;

        // message handled after a stop
        if !self.running {
            return None;
        }

        self.pending = Some(now + self.interval);
        let tick = Tick {
            due,
            handled_at: now,
            sequence: self.fired,
        };
        self.fired += 1;
        Some(tick)
    }

    /// Fires the tick due at or before `now`, if any. Returns how many fired,
    /// which is at most one since the next message lands after `now`.
    pub fn dispatch(&mut self, now: Duration, mut on_tick: impl FnMut(Tick)) -> usize {
        let mut count = 0;
        while let Some(tick) = self.poll(now) {
            on_tick(tick);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_start_stop_flags() {
        let mut scheduler = Scheduler::new(ms(1500));
        assert!(!scheduler.is_running());

        scheduler.start(ms(0));
        assert!(scheduler.is_running());

        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.next_due(), None);

        // stopping twice changes nothing
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_double_start_keeps_one_timer() {
        let mut scheduler = Scheduler::new(ms(1500));
        scheduler.start(ms(0));
        scheduler.start(ms(700));
        assert_eq!(scheduler.next_due(), Some(ms(0)));

        let mut ticks = Vec::new();
        scheduler.dispatch(ms(0), |t| ticks.push(t.due));
        scheduler.dispatch(ms(1500), |t| ticks.push(t.due));
        assert_eq!(ticks, vec![ms(0), ms(1500)]);
        assert_eq!(scheduler.next_due(), Some(ms(3000)));
    }

    #[test]
    fn test_late_poll_fires_once_and_reschedules_from_now() {
        let mut scheduler = Scheduler::new(ms(1500));
        scheduler.start(ms(0));

        let mut ticks = Vec::new();
        let fired = scheduler.dispatch(ms(5000), |t| ticks.push(t));
        assert_eq!(fired, 1);
        assert_eq!(ticks[0].due, ms(0));
        assert_eq!(ticks[0].handled_at, ms(5000));
        assert_eq!(scheduler.fired(), 1);
        assert_eq!(scheduler.next_due(), Some(ms(6500)));

        // nothing more until a full interval after the late handling
        assert_eq!(scheduler.dispatch(ms(6499), |_| {}), 0);
        assert_eq!(scheduler.dispatch(ms(6500), |_| {}), 1);
    }

    #[test]
    fn test_slightly_late_poll_shifts_the_schedule() {
        let mut scheduler = Scheduler::new(ms(1000));
        scheduler.start(ms(0));
        scheduler.dispatch(ms(16), |_| {});
        assert_eq!(scheduler.next_due(), Some(ms(1016)));
    }

    #[test]
    fn test_ticks_wait_for_their_interval() {
        let mut scheduler = Scheduler::new(ms(1500));
        scheduler.start(ms(0));

        assert_eq!(scheduler.dispatch(ms(0), |_| {}), 1);
        assert_eq!(scheduler.dispatch(ms(1499), |_| {}), 0);
        assert_eq!(scheduler.dispatch(ms(1500), |_| {}), 1);
        assert_eq!(scheduler.fired(), 2);
    }

    #[test]
    fn test_delay_start_waits_one_interval() {
        let mut scheduler = Scheduler::new(ms(1000));
        scheduler.delay_start(ms(200));
        assert!(scheduler.is_running());
        assert!(scheduler.poll(ms(1199)).is_none());

        let tick = scheduler.poll(ms(1200)).unwrap();
        assert_eq!(tick.due, ms(1200));
        assert_eq!(tick.handled_at, ms(1200));
        assert_eq!(tick.sequence, 0);
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let mut scheduler = Scheduler::new(ms(1000));
        scheduler.start(ms(0));
        assert!(scheduler.poll(ms(0)).is_some());

        scheduler.stop();
        assert_eq!(scheduler.dispatch(ms(10_000), |_| {}), 0);
    }

    #[test]
    fn test_in_flight_message_checks_running_flag() {
        let mut scheduler = Scheduler::new(ms(1000));
        scheduler.start(ms(0));
        // a message that survived the stop must not fire
        scheduler.running = false;
        assert!(scheduler.poll(ms(0)).is_none());
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut scheduler = Scheduler::new(ms(1000));
        scheduler.start(ms(0));
        scheduler.dispatch(ms(0), |_| {});
        scheduler.stop();

        scheduler.start(ms(5000));
        let mut ticks = Vec::new();
        scheduler.dispatch(ms(5000), |t| ticks.push((t.due, t.sequence)));
        scheduler.dispatch(ms(6000), |t| ticks.push((t.due, t.sequence)));
        assert_eq!(ticks, vec![(ms(5000), 1), (ms(6000), 2)]);
    }
}
