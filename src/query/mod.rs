//! Query orchestration.
//!
//! - [`QueryOrchestrator`] - runs one streaming exchange end to end
//! - [`QueryResponse`] - terminal result of a query
//! - [`QueryState`] - lifecycle states, logged as a query progresses

mod orchestrator;
mod response;
mod state;

pub use orchestrator::{EventCallback, QueryOrchestrator};
pub use response::{FailureKind, QueryResponse};
pub use state::QueryState;
