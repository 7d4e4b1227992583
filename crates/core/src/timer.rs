#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Expired,
    /// Resting state after `cancel`; `start` leaves it like `Idle`.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    None,
    TimeUp,
}

/// Round countdown. Driven by explicit ticks, never by the wall clock.
#[derive(Debug, Clone)]
pub struct RoundTimer {
    state: TimerState,
    remaining: f32,
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            remaining: 0.0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start(&mut self, limit: f32) {
        self.remaining = limit;
        self.state = TimerState::Running;
    }

    pub fn tick(&mut self, delta: f32) -> TimerSignal {
        if self.state != TimerState::Running {
            return TimerSignal::None;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.state = TimerState::Expired;
            return TimerSignal::TimeUp;
        }
        TimerSignal::None
    }

    /// Stops a running countdown without raising time-up. Returns the time
    /// that was left so the caller can resume from it.
    pub fn cancel(&mut self) -> Option<f32> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Cancelled;
        Some(self.remaining())
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn display_seconds(&self) -> u32 {
        self.remaining().ceil() as u32
    }

    pub fn format_remaining(&self) -> String {
        format!("Time left: {}s", self.display_seconds())
    }
}

/// One-shot deferred callback, cancelled by dropping or `cancel`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delay<T> {
    remaining: f32,
    payload: Option<T>,
}

impl<T> Delay<T> {
    pub fn new(after: f32, payload: T) -> Self {
        Self {
            remaining: after,
            payload: Some(payload),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.payload.is_some()
    }

    pub fn cancel(&mut self) {
        self.payload = None;
    }

    /// Returns the payload on the tick the delay elapses, then never again.
    pub fn tick(&mut self, delta: f32) -> Option<T> {
        self.payload.as_ref()?;
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            return self.payload.take();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_exactly_once() {
        let mut timer = RoundTimer::new();
        timer.start(5.0);
        let mut fired = 0;
        for _ in 0..51 {
            if timer.tick(0.1) == TimerSignal::TimeUp {
                fired += 1;
            }
        }
        for _ in 0..10 {
            if timer.tick(0.1) == TimerSignal::TimeUp {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn single_large_tick_expires() {
        let mut timer = RoundTimer::new();
        timer.start(5.0);
        assert_eq!(timer.tick(5.1), TimerSignal::TimeUp);
        assert_eq!(timer.tick(1.0), TimerSignal::None);
        assert_eq!(timer.display_seconds(), 0);
    }

    #[test]
    fn cancel_is_silent_and_reports_remaining() {
        let mut timer = RoundTimer::new();
        timer.start(4.0);
        timer.tick(0.8);
        let left = timer.cancel().expect("running");
        assert!((left - 3.2).abs() < 1e-5);
        assert_eq!(timer.state(), TimerState::Cancelled);
        assert_eq!(timer.tick(10.0), TimerSignal::None);
        assert_eq!(timer.cancel(), None);
    }

    #[test]
    fn restart_from_any_state() {
        let mut timer = RoundTimer::new();
        timer.start(1.0);
        timer.tick(2.0);
        timer.start(3.0);
        assert!(timer.is_running());
        assert_eq!(timer.format_remaining(), "Time left: 3s");
        timer.tick(0.5);
        assert_eq!(timer.display_seconds(), 3);
    }

    #[test]
    fn idle_timer_ignores_ticks() {
        let mut timer = RoundTimer::new();
        assert_eq!(timer.tick(1.0), TimerSignal::None);
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn delay_fires_once_unless_cancelled() {
        let mut delay = Delay::new(2.0, "round-end");
        assert_eq!(delay.tick(1.5), None);
        assert_eq!(delay.tick(0.5), Some("round-end"));
        assert_eq!(delay.tick(1.0), None);
        assert!(!delay.is_pending());

        let mut cancelled = Delay::new(2.0, 1u8);
        cancelled.cancel();
        assert_eq!(cancelled.tick(5.0), None);
    }
}
