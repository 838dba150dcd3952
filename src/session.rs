use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::scheduler::{Scheduler, TimerHandle};
use crate::stats::{self, BestScores, Metrics};
use crate::words::WordList;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_SECONDS: u32 = 60;
pub const MAX_QUEUE_LEN: usize = 2;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub number_of_secs: u32,
    /// Words shown at once: the current one plus optional previews.
    pub queue_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_of_secs: DEFAULT_SECONDS,
            queue_len: MAX_QUEUE_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitOutcome {
    /// Session not running; nothing changed.
    Ignored,
    Correct(Metrics),
    Incorrect(Metrics),
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: Phase,
    pub started_at: Option<Instant>,
    pub seconds_remaining: u32,
    pub characters_typed: usize,
    pub uncorrected_errors: usize,
    pub last: Metrics,
    pub best: BestScores,
    pub queue: VecDeque<String>,
    pending_tick: Option<TimerHandle>,
}

impl SessionState {
    fn new(number_of_secs: u32) -> Self {
        Self {
            phase: Phase::Idle,
            started_at: None,
            seconds_remaining: number_of_secs,
            characters_typed: 0,
            uncorrected_errors: 0,
            last: Metrics::default(),
            best: BestScores::default(),
            queue: VecDeque::new(),
            pending_tick: None,
        }
    }
}

/// One typing test: word queue, countdown and running statistics.
#[derive(Debug)]
pub struct Session<R: Rng> {
    pub config: SessionConfig,
    pub state: SessionState,
    words: WordList,
    rng: R,
}

impl<R: Rng> Session<R> {
    pub fn new(words: WordList, config: SessionConfig, rng: R) -> Self {
        let mut session = Self {
            state: SessionState::new(config.number_of_secs),
            config,
            words,
            rng,
        };
        session.refill_queue();
        session
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.phase == Phase::Running
    }

    pub fn current_word(&self) -> Option<&str> {
        self.state.queue.front().map(String::as_str)
    }

    pub fn queue(&self) -> impl Iterator<Item = &str> {
        self.state.queue.iter().map(String::as_str)
    }

    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S) {
        if self.is_running() {
            return;
        }
        self.cancel_pending(scheduler);

        self.state.queue.clear();
        self.refill_queue();
        self.state.characters_typed = 0;
        self.state.uncorrected_errors = 0;
        self.state.last = Metrics::default();
        self.state.seconds_remaining = self.config.number_of_secs;
        self.state.started_at = Some(scheduler.now());

        if self.state.seconds_remaining == 0 {
            self.state.phase = Phase::Expired;
            return;
        }
        self.state.phase = Phase::Running;
        self.state.pending_tick = Some(scheduler.schedule(TICK_INTERVAL));
        info!(
            phase = %self.state.phase,
            seconds = self.config.number_of_secs,
            "test started"
        );
    }

    /// Judge one space-terminated entry against the head of the queue.
    pub fn submit<S: Scheduler>(&mut self, text: &str, scheduler: &S) -> SubmitOutcome {
        if !self.is_running() {
            return SubmitOutcome::Ignored;
        }
        let Some(started_at) = self.state.started_at else {
            return SubmitOutcome::Ignored;
        };

        let typed = text.trim();
        self.state.characters_typed += typed.chars().count();
        let elapsed = scheduler.now().saturating_duration_since(started_at);
        let metrics = stats::compute(
            self.state.characters_typed,
            elapsed,
            self.state.uncorrected_errors,
        );
        self.state.last = metrics;
        self.state.best.update(&metrics);

        if self.current_word() == Some(typed) {
            self.state.queue.pop_front();
            self.refill_queue();
            debug!(word = typed, gross_wpm = metrics.gross_wpm, "correct word");
            SubmitOutcome::Correct(metrics)
        } else {
            self.state.uncorrected_errors += 1;
            debug!(
                typed,
                errors = self.state.uncorrected_errors,
                "incorrect word"
            );
            SubmitOutcome::Incorrect(metrics)
        }
    }

    /// Handle one countdown firing. Stale handles are ignored.
    pub fn on_tick<S: Scheduler>(&mut self, handle: TimerHandle, scheduler: &mut S) {
        if self.state.pending_tick != Some(handle) || !self.is_running() {
            debug!(?handle, "ignoring stale tick");
            return;
        }
        self.state.pending_tick = None;
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);

        if self.state.seconds_remaining == 0 {
            self.state.phase = Phase::Expired;
            info!(
                phase = %self.state.phase,
                characters = self.state.characters_typed,
                errors = self.state.uncorrected_errors,
                best_gross_wpm = self.state.best.gross_wpm,
                "test expired"
            );
        } else {
            self.state.pending_tick = Some(scheduler.schedule(TICK_INTERVAL));
        }
    }

    pub fn reset<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.cancel_pending(scheduler);
        self.state = SessionState::new(self.config.number_of_secs);
        self.refill_queue();
        info!(phase = %self.state.phase, "session reset");
    }

    fn cancel_pending<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.state.pending_tick.take() {
            scheduler.cancel(handle);
        }
    }

    fn refill_queue(&mut self) {
        let target = self.config.queue_len.clamp(1, MAX_QUEUE_LEN);
        while self.state.queue.len() < target {
            match self.words.sample(&mut self.rng) {
                Some(w) => self.state.queue.push_back(w.to_string()),
                None => break,
            }
        }
    }
}
