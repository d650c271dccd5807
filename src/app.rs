use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::runtime::{RaceEvent, Step};
use crate::session::{Session, SessionState};
use crate::stats::GameEvent;

/// Whether the event loop keeps going after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Feedback line shown under the input box
#[derive(Debug, Clone, PartialEq)]
pub enum Flash {
    Completed { word: String, points: u64 },
    Missed(String),
    Mismatch,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub flash: Option<Flash>,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            flash: None,
        }
    }

    /// Let the step's time pass on the session clock, then handle its event
    pub fn on_step(&mut self, step: Step) -> Control {
        let events = self.session.advance(step.dt);
        self.note(events.last());

        match step.event {
            RaceEvent::Key(key) => self.on_key(key),
            RaceEvent::Resize | RaceEvent::Frame => Control::Continue,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.session.state() {
            SessionState::Waiting => match key.code {
                KeyCode::Enter => self.start(),
                KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
                _ => {}
            },
            SessionState::Playing => match key.code {
                KeyCode::Enter => {
                    let event = self.session.submit();
                    self.note(event.as_ref());
                }
                KeyCode::Backspace => self.session.backspace(),
                KeyCode::Esc => self.session.end(),
                KeyCode::Char(c) => self.session.type_char(c),
                _ => {}
            },
            SessionState::GameOver => match key.code {
                KeyCode::Enter => {
                    self.flash = None;
                    self.session.reset();
                }
                KeyCode::Char(' ') => self.start(),
                KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
                _ => {}
            },
        }

        Control::Continue
    }

    fn start(&mut self) {
        self.flash = None;
        self.session.start();
    }

    fn note(&mut self, event: Option<&GameEvent>) {
        let Some(event) = event else {
            return;
        };
        self.flash = Some(match event {
            GameEvent::Completed(word) => Flash::Completed {
                word: word.text.clone(),
                points: word.len() as u64 * 10,
            },
            GameEvent::Missed(word) => Flash::Missed(word.text.clone()),
            GameEvent::Mismatch => Flash::Mismatch,
        });
    }
}
