use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::session::SessionId;

/// Source of "now" for the game. Production reads the monotonic clock,
/// tests drive a [`ManualClock`].
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    Countdown,
    DisplayRefresh,
}

/// A timer that came due during [`Scheduler::due`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub owner: SessionId,
    pub kind: TimerKind,
    /// Earliest deadline covered by this fire, at or before the poll.
    pub deadline: Instant,
    /// Whole periods elapsed since the previous fire, at least 1.
    pub periods: u32,
}

#[derive(Debug)]
struct Entry {
    id: TimerId,
    owner: SessionId,
    kind: TimerKind,
    period: Duration,
    next_fire: Instant,
}

/// Periodic timers for every live session, polled from the event loop.
///
/// Nothing runs in the background: a timer only "fires" when the loop calls
/// [`Scheduler::due`], and a cancelled timer is gone immediately, so it can never
/// be reported afterwards.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a periodic timer; the first fire is one `period` after `now`.
    pub fn schedule(
        &mut self,
        owner: SessionId,
        kind: TimerKind,
        period: Duration,
        now: Instant,
    ) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(Entry {
            id,
            owner,
            kind,
            period,
            next_fire: now + period,
        });
        debug!(?id, owner, ?kind, ?period, "timer scheduled");
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!(?id, "timer cancelled");
        }
        removed
    }

    /// Cancel every timer belonging to `owner`, returning how many were armed.
    pub fn cancel_owner(&mut self, owner: SessionId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(owner, removed, "session timers cancelled");
        }
        removed
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn active_for(&self, owner: SessionId) -> usize {
        self.entries.iter().filter(|e| e.owner == owner).count()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.next_fire).min()
    }

    /// Collect every timer whose deadline is at or before `now`, advancing each
    /// past `now`. Results are ordered by deadline.
    pub fn due(&mut self, now: Instant) -> Vec<Fired> {
        let mut fired: Vec<(Instant, Fired)> = Vec::new();

        for entry in self.entries.iter_mut() {
            if entry.next_fire > now {
                continue;
            }
            let late = now.duration_since(entry.next_fire);
            let periods = 1 + late.as_nanos() / entry.period.as_nanos();
            let periods = u32::try_from(periods).unwrap_or(u32::MAX);
            let deadline = entry.next_fire;
            entry.next_fire += entry.period * periods;

            fired.push((
                deadline,
                Fired {
                    id: entry.id,
                    owner: entry.owner,
                    kind: entry.kind,
                    deadline,
                    periods,
                },
            ));
        }

        fired.sort_by_key(|(deadline, _)| *deadline);
        fired.into_iter().map(|(_, f)| f).collect()
    }
}
