use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::runtime::AppEvent;
use crate::scheduler::{Clock, SystemClock, TimerQueue};
use crate::session::{Phase, Session, SessionConfig, SubmitOutcome};
use crate::stats::{BestScores, Metrics};
use crate::words::WordList;

/// What the results area shows after the last submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Feedback {
    Correct { metrics: Metrics, best: BestScores },
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock, R: Rng = ThreadRng> {
    pub session: Session<R>,
    pub timers: TimerQueue<C>,
    /// Contents of the text-entry field.
    pub entry: String,
    pub feedback: Option<Feedback>,
}

impl App {
    pub fn new(words: WordList, config: SessionConfig) -> Self {
        Self::with_parts(
            Session::new(words, config, rand::thread_rng()),
            TimerQueue::new(),
        )
    }
}

impl<C: Clock, R: Rng> App<C, R> {
    pub fn with_parts(session: Session<R>, timers: TimerQueue<C>) -> Self {
        Self {
            session,
            timers,
            entry: String::new(),
            feedback: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// The entry field accepts text only while a test runs.
    pub fn input_enabled(&self) -> bool {
        self.session.is_running()
    }

    pub fn can_start(&self) -> bool {
        !self.session.is_running()
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Control {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Timer(handle) => {
                self.session.on_tick(handle, &mut self.timers);
                Control::Continue
            }
            AppEvent::Resize | AppEvent::Idle => Control::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Enter => self.start(),
            KeyCode::Backspace if self.input_enabled() => {
                self.entry.pop();
            }
            KeyCode::Char(' ') if self.input_enabled() => self.submit(),
            KeyCode::Char(c) if self.input_enabled() && !ctrl => self.entry.push(c),
            _ => {}
        }
        Control::Continue
    }

    pub fn start(&mut self) {
        if !self.can_start() {
            return;
        }
        self.entry.clear();
        self.feedback = None;
        self.session.start(&mut self.timers);
    }

    pub fn reset(&mut self) {
        self.entry.clear();
        self.feedback = None;
        self.session.reset(&mut self.timers);
    }

    fn submit(&mut self) {
        let text = std::mem::take(&mut self.entry);
        self.feedback = match self.session.submit(&text, &self.timers) {
            SubmitOutcome::Correct(metrics) => Some(Feedback::Correct {
                metrics,
                best: self.session.state.best,
            }),
            SubmitOutcome::Incorrect(_) => Some(Feedback::Incorrect),
            SubmitOutcome::Ignored => self.feedback,
        };
    }
}
