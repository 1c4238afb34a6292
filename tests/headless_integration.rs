use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use alphabet_typer::app::App;
use alphabet_typer::config::Config;
use alphabet_typer::router::ScreenState;
use alphabet_typer::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use alphabet_typer::session::COUNTDOWN_PERIOD;
use alphabet_typer::timer::ManualClock;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn headless_app(letters: &str) -> (App, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new());
    let app = App::with_alphabet(Config::default(), letters.parse().unwrap(), clock.clone());
    (app, clock)
}

// Headless run of the whole game through Runner/TestEventSource, no TTY needed.
#[test]
fn headless_game_reaches_score_board() {
    let (mut app, clock) = headless_app("abc");
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Enter)).unwrap();
    app.handle_event(runner.step(app.until_next_timer()));
    assert_eq!(app.state(), ScreenState::Game(1));

    // countdown: nothing queued, so every step times out into a Tick
    for _ in 0..3 {
        clock.advance(COUNTDOWN_PERIOD);
        assert_eq!(runner.step(app.until_next_timer()), AppEvent::Tick);
        app.handle_event(AppEvent::Tick);
    }
    assert!(app.session().unwrap().is_active());

    clock.advance(Duration::from_millis(2500));
    for c in "abc".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    for _ in 0..10 {
        app.handle_event(runner.step(app.until_next_timer()));
        if matches!(app.state(), ScreenState::ScoreBoard { .. }) {
            break;
        }
    }

    assert_eq!(app.state(), ScreenState::ScoreBoard { elapsed_ms: 2500 });
    assert!(app.session().is_none());
    assert_eq!(app.scheduler().active_count(), 0);
}

#[test]
fn headless_paste_is_rejected() {
    let (mut app, clock) = headless_app("abc");
    app.handle_event(key(KeyCode::Enter));
    for _ in 0..3 {
        clock.advance(COUNTDOWN_PERIOD);
        app.handle_event(AppEvent::Tick);
    }

    app.handle_event(AppEvent::Paste("abc".to_string()));

    assert_eq!(app.session().unwrap().input(), "");
    assert!(matches!(app.state(), ScreenState::Game(_)));
}

#[test]
fn headless_typing_during_countdown_is_ignored() {
    let (mut app, clock) = headless_app("abc");
    app.handle_event(key(KeyCode::Enter));

    app.handle_event(key(KeyCode::Char('a')));
    assert_eq!(app.session().unwrap().input(), "");

    for _ in 0..3 {
        clock.advance(COUNTDOWN_PERIOD);
        app.handle_event(AppEvent::Tick);
    }
    app.handle_event(key(KeyCode::Char('a')));
    assert_eq!(app.session().unwrap().input(), "a");
}

#[test]
fn headless_mistakes_must_be_corrected() {
    let (mut app, clock) = headless_app("abc");
    app.handle_event(key(KeyCode::Enter));
    for _ in 0..3 {
        clock.advance(COUNTDOWN_PERIOD);
        app.handle_event(AppEvent::Tick);
    }

    // one wrong letter, then the rest: longer than the alphabet, never complete
    for c in "abxc".chars() {
        app.handle_event(key(KeyCode::Char(c)));
    }
    assert!(matches!(app.state(), ScreenState::Game(_)));

    app.handle_event(key(KeyCode::Backspace));
    app.handle_event(key(KeyCode::Backspace));
    assert_eq!(app.session().unwrap().input(), "ab");

    app.handle_event(key(KeyCode::Char('c')));
    assert!(matches!(app.state(), ScreenState::ScoreBoard { .. }));
}

#[test]
fn headless_uppercase_input_counts() {
    let (mut app, clock) = headless_app("abc");
    app.handle_event(key(KeyCode::Enter));
    for _ in 0..3 {
        clock.advance(COUNTDOWN_PERIOD);
        app.handle_event(AppEvent::Tick);
    }

    for c in "ABC".chars() {
        app.handle_event(AppEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::SHIFT,
        )));
    }

    assert!(matches!(app.state(), ScreenState::ScoreBoard { .. }));
}
