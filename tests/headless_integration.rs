use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use typespeed::app::{App, Control, Feedback};
use typespeed::runtime::{AppEvent, Runner, TestEventSource};
use typespeed::scheduler::{ManualClock, TimerQueue};
use typespeed::session::{Phase, Session, SessionConfig};
use typespeed::words::WordList;

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn code(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless flow through Runner/TestEventSource with the real clock.
#[test]
fn headless_session_runs_until_expiry() {
    let words: WordList = ["go"].into_iter().collect();
    let config = SessionConfig {
        number_of_secs: 1,
        queue_len: 1,
    };
    let mut app = App::with_parts(
        Session::new(words, config, StdRng::seed_from_u64(5)),
        TimerQueue::new(),
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::with_idle_poll(TestEventSource::new(rx), Duration::from_millis(20));

    tx.send(code(KeyCode::Enter)).unwrap();
    for c in "go go ".chars() {
        tx.send(key(c)).unwrap();
    }

    // ~3s upper bound
    for _ in 0..150u32 {
        let ev = runner.step(&mut app.timers);
        assert_eq!(app.handle_event(ev), Control::Continue);
        if app.phase() == Phase::Expired {
            break;
        }
    }

    assert_eq!(app.phase(), Phase::Expired);
    assert_eq!(app.session.state.seconds_remaining, 0);
    assert_eq!(app.session.state.characters_typed, 4);
    assert_eq!(app.session.state.uncorrected_errors, 0);
    assert!(app.timers.is_empty());
}

#[test]
fn full_test_with_manual_clock() {
    let clock = ManualClock::new();
    let words: WordList = ["alpha", "beta", "gamma"].into_iter().collect();
    let mut app = App::with_parts(
        Session::new(words, SessionConfig::default(), StdRng::seed_from_u64(11)),
        TimerQueue::with_clock(clock.clone()),
    );

    app.handle_event(code(KeyCode::Enter));
    assert_eq!(app.phase(), Phase::Running);

    let mut correct = 0;
    for second in 0..60u32 {
        clock.advance(Duration::from_secs(1));
        while let Some(h) = app.timers.pop_due() {
            app.handle_event(AppEvent::Timer(h));
        }
        if app.phase() != Phase::Running {
            break;
        }

        let word = if second % 10 == 9 {
            "typo".to_string()
        } else {
            correct += 1;
            app.session.current_word().unwrap().to_string()
        };
        for c in word.chars() {
            app.handle_event(key(c));
        }
        app.handle_event(key(' '));
        if second % 10 == 9 {
            assert_eq!(app.feedback, Some(Feedback::Incorrect));
        }
    }

    assert_eq!(app.phase(), Phase::Expired);
    assert!(correct > 0);
    assert_eq!(app.session.state.uncorrected_errors, 5);
    assert!(app.session.state.best.gross_wpm > 0);

    // locked after expiry
    let typed = app.session.state.characters_typed;
    for c in "alpha ".chars() {
        app.handle_event(key(c));
    }
    assert_eq!(app.session.state.characters_typed, typed);

    // reset clears everything
    app.handle_event(AppEvent::Key(KeyEvent::new(
        KeyCode::Char('r'),
        KeyModifiers::CONTROL,
    )));
    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(app.session.state.characters_typed, 0);
    assert_eq!(app.session.state.best.gross_wpm, 0);
    assert_eq!(app.session.state.seconds_remaining, 60);
}

#[test]
fn reset_mid_test_drops_countdown() {
    let clock = ManualClock::new();
    let words: WordList = ["one"].into_iter().collect();
    let mut app = App::with_parts(
        Session::new(words, SessionConfig::default(), StdRng::seed_from_u64(2)),
        TimerQueue::with_clock(clock.clone()),
    );

    app.start();
    clock.advance(Duration::from_secs(1));
    let due = app.timers.pop_due().unwrap();

    app.reset();
    // the firing popped before the reset is delivered late
    app.handle_event(AppEvent::Timer(due));
    clock.advance(Duration::from_secs(5));

    assert!(app.timers.pop_due().is_none());
    assert_eq!(app.phase(), Phase::Idle);
    assert_eq!(app.session.state.seconds_remaining, 60);
}
