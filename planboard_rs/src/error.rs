use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanboardErrorKind {
    NotFound,
    Auth,
    Validation,
    Server,
    Stream,
    Transport,
    Serialization,
}

#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct PlanboardError {
    pub kind: PlanboardErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl PlanboardError {
    pub fn new(kind: PlanboardErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for PlanboardError {
    fn from(e: reqwest::Error) -> Self {
        PlanboardError::new(PlanboardErrorKind::Transport, None, e.to_string())
    }
}

impl From<serde_json::Error> for PlanboardError {
    fn from(e: serde_json::Error) -> Self {
        PlanboardError::new(PlanboardErrorKind::Serialization, None, e.to_string())
    }
}
