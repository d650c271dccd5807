use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Something the game loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaceEvent {
    Key(KeyEvent),
    Resize,
    /// No input arrived within one frame
    Frame,
}

/// One turn of the game loop: the event plus the game time that passed
/// since the previous turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub event: RaceEvent,
    pub dt: Duration,
}

/// Where keyboard and terminal events come from
pub trait RaceEventSource {
    /// Wait up to `timeout` for the next event
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<RaceEvent>>;
}

/// Reads the real terminal through crossterm
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl RaceEventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<RaceEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(translate(event::read()?))
    }
}

/// Map a terminal event onto the game's events. Key releases are reported on
/// some platforms; only presses and repeats type.
pub fn translate(event: CtEvent) -> Option<RaceEvent> {
    match event {
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(RaceEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(RaceEvent::Resize),
        _ => None,
    }
}

/// Replays queued events, then reports nothing
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<RaceEvent>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RaceEvent) {
        self.queue.push_back(event);
    }
}

impl RaceEventSource for ScriptedEvents {
    fn next_event(&mut self, _timeout: Duration) -> io::Result<Option<RaceEvent>> {
        Ok(self.queue.pop_front())
    }
}

/// Source of the game time handed to the session each step
pub trait GameClock {
    /// Time since the previous lap (or since creation)
    fn lap(&mut self) -> Duration;
}

/// Wall-clock time between loop turns
#[derive(Debug)]
pub struct WallClock {
    last: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock for WallClock {
    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        dt
    }
}

/// Every lap takes exactly `step`, so headless runs are repeatable
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    pub step: Duration,
}

impl FixedClock {
    pub fn new(step: Duration) -> Self {
        Self { step }
    }
}

impl GameClock for FixedClock {
    fn lap(&mut self) -> Duration {
        self.step
    }
}

/// Drives the game loop: waits at most one frame for input, then reports it
/// together with the time that passed
pub struct Runner<E: RaceEventSource, C: GameClock> {
    events: E,
    clock: C,
    frame: Duration,
}

impl<E: RaceEventSource, C: GameClock> Runner<E, C> {
    pub fn new(events: E, clock: C, frame: Duration) -> Self {
        Self {
            events,
            clock,
            frame,
        }
    }

    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn step(&mut self) -> io::Result<Step> {
        let event = self.events.next_event(self.frame)?.unwrap_or(RaceEvent::Frame);
        let dt = self.clock.lap();
        if let RaceEvent::Key(key) = &event {
            tracing::trace!(code = ?key.code, ?dt, "key");
        }
        Ok(Step { event, dt })
    }
}
