use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::alphabet::AlphabetSequence;
use crate::matcher::{self, Evaluation};
use crate::timer::{Fired, Scheduler, TimerId, TimerKind};

pub type SessionId = u64;

pub const DEFAULT_COUNTDOWN_TICKS: u8 = 3;
pub const COUNTDOWN_PERIOD: Duration = Duration::from_millis(1000);
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub countdown_ticks: u8,
    pub refresh_period: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_ticks: DEFAULT_COUNTDOWN_TICKS,
            refresh_period: DEFAULT_REFRESH_PERIOD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Countdown { ticks_remaining: u8 },
    Active { started_at: Instant },
    Finished { elapsed: Duration },
}

/// What the rest of the app needs to react to after a session transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    CountdownTick { ticks_remaining: u8 },
    Started,
    Redraw,
    Finished { session_id: SessionId, elapsed_ms: u64 },
}

/// One play-through: countdown, then typing until the buffer matches the alphabet.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    alphabet: AlphabetSequence,
    config: SessionConfig,
    state: SessionState,
    input: String,
    countdown_timer: Option<TimerId>,
    refresh_timer: Option<TimerId>,
}

impl GameSession {
    pub fn new(
        id: SessionId,
        alphabet: AlphabetSequence,
        config: SessionConfig,
        scheduler: &mut Scheduler,
        now: Instant,
    ) -> Self {
        let ticks = config.countdown_ticks.max(1);
        let countdown_timer =
            scheduler.schedule(id, TimerKind::Countdown, COUNTDOWN_PERIOD, now);
        info!(session = id, ticks, alphabet = alphabet.title(), "session created");

        Self {
            id,
            alphabet,
            config,
            state: SessionState::Countdown {
                ticks_remaining: ticks,
            },
            input: String::new(),
            countdown_timer: Some(countdown_timer),
            refresh_timer: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn alphabet(&self) -> &AlphabetSequence {
        &self.alphabet
    }

    pub fn ticks_remaining(&self) -> Option<u8> {
        match self.state {
            SessionState::Countdown { ticks_remaining } => Some(ticks_remaining),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished { .. })
    }

    /// Time spent typing so far; zero during the countdown.
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.state {
            SessionState::Countdown { .. } => Duration::ZERO,
            SessionState::Active { started_at } => now.saturating_duration_since(started_at),
            SessionState::Finished { elapsed } => elapsed,
        }
    }

    pub fn evaluation(&self) -> Evaluation {
        matcher::evaluate(&self.input, &self.alphabet)
    }

    /// Number of timers this session currently has armed.
    pub fn armed_timers(&self, scheduler: &Scheduler) -> usize {
        [self.countdown_timer, self.refresh_timer]
            .into_iter()
            .flatten()
            .filter(|id| scheduler.is_armed(*id))
            .count()
    }

    pub fn on_timer(
        &mut self,
        fired: Fired,
        scheduler: &mut Scheduler,
        now: Instant,
    ) -> Option<SessionEvent> {
        if fired.owner != self.id {
            warn!(session = self.id, owner = fired.owner, "timer for another session ignored");
            return None;
        }

        match (fired.kind, self.state) {
            (TimerKind::Countdown, SessionState::Countdown { ticks_remaining: before }) => {
                let step = u8::try_from(fired.periods).unwrap_or(u8::MAX);
                let ticks_remaining = before.saturating_sub(step);
                debug!(session = self.id, ticks_remaining, "countdown tick");

                if ticks_remaining == 0 {
                    // the clock starts at the deadline that reached zero, not at the poll
                    let reached_zero =
                        fired.deadline + COUNTDOWN_PERIOD * u32::from(before.saturating_sub(1));
                    self.begin_typing(scheduler, reached_zero.min(now), now);
                    Some(SessionEvent::Started)
                } else {
                    self.state = SessionState::Countdown { ticks_remaining };
                    Some(SessionEvent::CountdownTick { ticks_remaining })
                }
            }
            (TimerKind::DisplayRefresh, SessionState::Active { .. }) => Some(SessionEvent::Redraw),
            (kind, state) => {
                warn!(session = self.id, ?kind, ?state, "timer fired in wrong state");
                None
            }
        }
    }

    fn begin_typing(&mut self, scheduler: &mut Scheduler, started_at: Instant, now: Instant) {
        if let Some(id) = self.countdown_timer.take() {
            scheduler.cancel(id);
        }
        self.refresh_timer = Some(scheduler.schedule(
            self.id,
            TimerKind::DisplayRefresh,
            self.config.refresh_period,
            now,
        ));
        self.input.clear();
        self.state = SessionState::Active { started_at };
        info!(session = self.id, "typing started");
    }

    /// Append a typed character. Ignored unless the session is active.
    pub fn type_char(
        &mut self,
        c: char,
        scheduler: &mut Scheduler,
        now: Instant,
    ) -> Option<SessionEvent> {
        if !self.is_active() {
            debug!(session = self.id, ?c, "keystroke outside active play ignored");
            return None;
        }
        self.input.push(c);
        self.check_complete(scheduler, now)
    }

    pub fn backspace(&mut self, scheduler: &mut Scheduler, now: Instant) -> Option<SessionEvent> {
        if !self.is_active() {
            return None;
        }
        self.input.pop();
        self.check_complete(scheduler, now)
    }

    /// Pasted text never reaches the buffer.
    pub fn reject_paste(&self, text: &str) {
        debug!(session = self.id, len = text.chars().count(), "paste rejected");
    }

    fn check_complete(&mut self, scheduler: &mut Scheduler, now: Instant) -> Option<SessionEvent> {
        let SessionState::Active { started_at } = self.state else {
            return None;
        };
        if !matcher::is_complete(&self.input, &self.alphabet) {
            return None;
        }

        if let Some(id) = self.refresh_timer.take() {
            scheduler.cancel(id);
        }
        let elapsed = now.saturating_duration_since(started_at);
        self.state = SessionState::Finished { elapsed };
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        info!(session = self.id, elapsed_ms, "alphabet completed");

        Some(SessionEvent::Finished {
            session_id: self.id,
            elapsed_ms,
        })
    }

    /// Tear the session down, cancelling every timer it still owns.
    pub fn dispose(mut self, scheduler: &mut Scheduler) -> usize {
        self.countdown_timer = None;
        self.refresh_timer = None;
        let cancelled = scheduler.cancel_owner(self.id);
        debug!(session = self.id, cancelled, "session disposed");
        cancelled
    }
}
