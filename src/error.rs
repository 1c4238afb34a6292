use crate::router::ScreenState;
use crate::session::SessionId;

/// Errors raised while building an alphabet.
#[derive(Debug, thiserror::Error)]
pub enum AlphabetError {
    #[error("alphabet must contain at least one letter")]
    Empty,

    #[error("letter {0:?} is not in lowercase form")]
    NotLowercase(char),

    #[error("alphabet may not contain whitespace ({0:?})")]
    Whitespace(char),

    #[error("no built-in alphabet named {0:?}")]
    UnknownBuiltin(String),

    #[error("built-in alphabet {name} is not valid UTF-8")]
    Encoding { name: String },

    #[error("failed to parse built-in alphabet {name}: {source}")]
    Parse {
        name: String,
        source: serde_json::Error,
    },
}

/// Errors raised by the screen router when asked for a transition it does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot {action} from {from:?}")]
    Invalid {
        action: &'static str,
        from: ScreenState,
    },

    #[error("finish from session {got} ignored, live session is {live:?}")]
    StaleSession {
        got: SessionId,
        live: Option<SessionId>,
    },
}
