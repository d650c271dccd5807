use std::time::Duration;

/// Handle to a periodic timer registered with a [`Scheduler`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Periodic {
    handle: TimerHandle,
    period: Duration,
    next_due: Duration,
}

/// Single-threaded timer facility running on a virtual clock.
///
/// Time only moves when the owner polls with a deadline. Timers fire one at
/// a time in due order; ties go to the timer registered first. Between two
/// firings the owner may cancel any timer, and a cancelled timer never fires
/// again.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<Periodic>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Register a timer firing every `period`, first one `period` from now
    pub fn every(&mut self, period: Duration) -> TimerHandle {
        let period = period.max(Duration::from_millis(1));
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Periodic {
            handle,
            period,
            next_due: self.now + period,
        });
        handle
    }

    /// Returns false if the handle was not registered (already cancelled)
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Fire the next timer due at or before `deadline`, moving the clock to
    /// its due time. Returns None once nothing else is due.
    pub fn poll(&mut self, deadline: Duration) -> Option<TimerHandle> {
        // timers are kept in registration order, so min_by_key picks the
        // earliest-registered timer among equal due times
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due <= deadline)
            .min_by_key(|t| t.next_due)?;

        self.now = self.now.max(timer.next_due);
        timer.next_due += timer.period;
        Some(timer.handle)
    }

    /// Move the clock to `deadline` once every due timer has been polled
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }
}
