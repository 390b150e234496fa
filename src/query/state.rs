use std::fmt;

use tracing::debug;

/// Lifecycle of one query.
///
/// `Created -> Validating -> Streaming -> {Completed | Failed | Cancelled}`.
/// Validation may also end directly in `Failed`, and cancellation may be
/// observed from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryState {
    Created,
    Validating,
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl QueryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryState::Created => "created",
            QueryState::Validating => "validating",
            QueryState::Streaming => "streaming",
            QueryState::Completed => "completed",
            QueryState::Failed => "failed",
            QueryState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QueryState::Completed | QueryState::Failed | QueryState::Cancelled
        )
    }

    pub fn can_transition_to(&self, next: QueryState) -> bool {
        use QueryState::*;
        match (self, next) {
            (Created, Validating) => true,
            (Validating, Streaming) | (Validating, Failed) => true,
            (Streaming, Completed) | (Streaming, Failed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks and logs state changes for one `execute` call.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: QueryState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: QueryState::Created,
        }
    }

    pub fn advance(&mut self, next: QueryState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal query transition {} -> {}",
            self.state,
            next
        );
        debug!("Query state {} -> {}", self.state, next);
        self.state = next;
    }

    #[cfg(test)]
    pub fn state(&self) -> QueryState {
        self.state
    }
}
