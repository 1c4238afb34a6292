use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, error, info, warn};

use crate::alphabet::{AlphabetSequence, BuiltinAlphabet};
use crate::config::Config;
use crate::error::{AlphabetError, TransitionError};
use crate::router::{ScreenRouter, ScreenState};
use crate::runtime::AppEvent;
use crate::session::{GameSession, SessionEvent};
use crate::share;
use crate::timer::{Clock, Scheduler};

/// Everything the game needs between two events: the router, the timers and
/// at most one live session.
pub struct App {
    router: ScreenRouter,
    scheduler: Scheduler,
    session: Option<GameSession>,
    config: Config,
    alphabet: AlphabetSequence,
    /// `None` while playing letters given on the command line
    builtin: Option<BuiltinAlphabet>,
    clock: Rc<dyn Clock>,
    pending_share: Option<String>,
    should_quit: bool,
}

impl App {
    /// Build the app around the built-in alphabet named in `config`.
    pub fn new(config: Config, clock: Rc<dyn Clock>) -> Result<Self, AlphabetError> {
        let builtin = config.alphabet;
        let alphabet = builtin.load()?;
        Ok(Self {
            builtin: Some(builtin),
            ..Self::with_alphabet(config, alphabet, clock)
        })
    }

    /// Build the app around a custom alphabet. The menu will not cycle away from it.
    pub fn with_alphabet(config: Config, alphabet: AlphabetSequence, clock: Rc<dyn Clock>) -> Self {
        Self {
            builtin: None,
            router: ScreenRouter::new(),
            scheduler: Scheduler::new(),
            session: None,
            config: config.sanitized(),
            alphabet,
            clock,
            pending_share: None,
            should_quit: false,
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn state(&self) -> ScreenState {
        self.router.state()
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn alphabet(&self) -> &AlphabetSequence {
        &self.alphabet
    }

    pub fn is_custom_alphabet(&self) -> bool {
        self.builtin.is_none()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Share link requested on the score board, handed to the caller once.
    pub fn take_share_request(&mut self) -> Option<String> {
        self.pending_share.take()
    }

    pub fn share_url(&self) -> Option<String> {
        match self.router.state() {
            ScreenState::ScoreBoard { elapsed_ms } => Some(share::tweet_url(
                self.alphabet.title(),
                elapsed_ms,
                &self.config.promo_url,
            )),
            _ => None,
        }
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        let id = self.router.start()?;
        self.spawn_session(id);
        Ok(())
    }

    /// Throw away the current session (and its timers) and begin a fresh one.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        self.dispose_session();
        let id = self.router.restart()?;
        self.spawn_session(id);
        Ok(())
    }

    fn spawn_session(&mut self, id: u64) {
        let now = self.now();
        self.session = Some(GameSession::new(
            id,
            self.alphabet.clone(),
            self.config.session_config(),
            &mut self.scheduler,
            now,
        ));
    }

    fn dispose_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.dispose(&mut self.scheduler);
        }
    }

    /// Switch to the next or previous built-in alphabet. Menu only.
    pub fn cycle_alphabet(&mut self, forward: bool) -> Result<(), AlphabetError> {
        if self.router.state() != ScreenState::MainMenu {
            return Ok(());
        }
        let Some(current) = self.builtin else {
            debug!("custom alphabet, nothing to cycle");
            return Ok(());
        };
        let next = if forward {
            current.next()
        } else {
            current.prev()
        };
        self.alphabet = next.load()?;
        self.builtin = Some(next);
        self.config.alphabet = next;
        info!(alphabet = %next, "alphabet selected");
        Ok(())
    }

    /// How long the event loop may sleep before a timer needs attention.
    pub fn until_next_timer(&self) -> Option<Duration> {
        let now = self.now();
        self.scheduler
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Deliver every due timer to the session that owns it. Returns true if the
    /// screen needs a redraw.
    pub fn fire_timers(&mut self) -> bool {
        let now = self.now();
        let mut redraw = false;

        for fired in self.scheduler.due(now) {
            let event = match self.session.as_mut() {
                Some(session) if session.id() == fired.owner => {
                    session.on_timer(fired, &mut self.scheduler, now)
                }
                _ => {
                    warn!(owner = fired.owner, kind = ?fired.kind, "timer without live session dropped");
                    self.scheduler.cancel(fired.id);
                    None
                }
            };
            if let Some(event) = event {
                redraw |= self.apply_session_event(event);
            }
        }
        redraw
    }

    /// Handle one event from the runner. Returns true if the screen needs a redraw.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        let mut redraw = self.fire_timers();
        redraw |= match event {
            AppEvent::Tick => false,
            AppEvent::Resize => true,
            AppEvent::Paste(text) => {
                match &self.session {
                    Some(session) => session.reject_paste(&text),
                    None => debug!("paste outside a game ignored"),
                }
                false
            }
            AppEvent::Key(key) => self.handle_key(key),
        };
        redraw
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return true;
        }

        match self.router.state() {
            ScreenState::MainMenu => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let result = self.start();
                    report(result)
                }
                KeyCode::Left | KeyCode::Right => {
                    if let Err(err) = self.cycle_alphabet(key.code == KeyCode::Right) {
                        error!(%err, "failed to switch alphabet");
                    }
                    !self.is_custom_alphabet()
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.should_quit = true;
                    true
                }
                _ => false,
            },
            ScreenState::Game(_) => match key.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                    true
                }
                KeyCode::Tab => {
                    let result = self.restart();
                    report(result)
                }
                KeyCode::Char('r') if ctrl => {
                    let result = self.restart();
                    report(result)
                }
                KeyCode::Backspace => {
                    let now = self.now();
                    let event = self
                        .session
                        .as_mut()
                        .and_then(|s| s.backspace(&mut self.scheduler, now));
                    self.after_input(event)
                }
                KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                    let now = self.now();
                    let event = self
                        .session
                        .as_mut()
                        .and_then(|s| s.type_char(c, &mut self.scheduler, now));
                    self.after_input(event)
                }
                _ => false,
            },
            ScreenState::ScoreBoard { .. } => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => {
                    let result = self.restart();
                    report(result)
                }
                KeyCode::Char('t') => {
                    self.pending_share = self.share_url();
                    false
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.should_quit = true;
                    true
                }
                _ => false,
            },
        }
    }

    fn after_input(&mut self, event: Option<SessionEvent>) -> bool {
        if let Some(event) = event {
            self.apply_session_event(event);
        }
        true
    }

    fn apply_session_event(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::CountdownTick { .. } | SessionEvent::Started | SessionEvent::Redraw => {
                true
            }
            SessionEvent::Finished {
                session_id,
                elapsed_ms,
            } => {
                match self.router.finish(session_id, elapsed_ms) {
                    Ok(()) => self.dispose_session(),
                    Err(err) => warn!(%err, "finish rejected"),
                }
                true
            }
        }
    }
}

fn report(result: Result<(), TransitionError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "transition refused");
            false
        }
    }
}
