use tracing::info;

use crate::error::TransitionError;
use crate::session::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    MainMenu,
    Game(SessionId),
    ScoreBoard { elapsed_ms: u64 },
}

/// Top-level screen state machine.
///
/// Owns the session counter: every entry into [`ScreenState::Game`] gets a fresh,
/// strictly larger id, which is what forces a brand new `GameSession`.
#[derive(Debug)]
pub struct ScreenRouter {
    state: ScreenState,
    last_session_id: SessionId,
}

impl Default for ScreenRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenRouter {
    pub fn new() -> Self {
        Self {
            state: ScreenState::MainMenu,
            last_session_id: 0,
        }
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn live_session(&self) -> Option<SessionId> {
        match self.state {
            ScreenState::Game(id) => Some(id),
            _ => None,
        }
    }

    fn allocate_session(&mut self) -> SessionId {
        self.last_session_id += 1;
        self.last_session_id
    }

    pub fn start(&mut self) -> Result<SessionId, TransitionError> {
        match self.state {
            ScreenState::MainMenu => {
                let id = self.allocate_session();
                self.state = ScreenState::Game(id);
                info!(session = id, "game started");
                Ok(id)
            }
            from => Err(TransitionError::Invalid {
                action: "start",
                from,
            }),
        }
    }

    pub fn restart(&mut self) -> Result<SessionId, TransitionError> {
        match self.state {
            ScreenState::Game(_) | ScreenState::ScoreBoard { .. } => {
                let id = self.allocate_session();
                self.state = ScreenState::Game(id);
                info!(session = id, "game restarted");
                Ok(id)
            }
            from @ ScreenState::MainMenu => Err(TransitionError::Invalid {
                action: "restart",
                from,
            }),
        }
    }

    /// Move to the score board. Only the live session may finish.
    pub fn finish(&mut self, session_id: SessionId, elapsed_ms: u64) -> Result<(), TransitionError> {
        match self.state {
            ScreenState::Game(live) if live == session_id => {
                self.state = ScreenState::ScoreBoard { elapsed_ms };
                info!(session = session_id, elapsed_ms, "game finished");
                Ok(())
            }
            ScreenState::Game(live) => Err(TransitionError::StaleSession {
                got: session_id,
                live: Some(live),
            }),
            _ => Err(TransitionError::StaleSession {
                got: session_id,
                live: None,
            }),
        }
    }
}
