//! Replay of recorded backend streams
//!
//! Plays a captured trace back with its original cadence (optionally sped
//! up), so the whole pipeline can run without a live backend.
//!
//! - `trace` - trace file model and loading
//! - `pacer` - cancellable deadline waits
//! - `simulator` - SSE emission at recorded offsets
//! - `transport` - `StreamingTransport` implementation over a trace

mod pacer;
mod simulator;
mod trace;
mod transport;

pub use pacer::{sleep_until_deadline, validate_speed, Pacer};
pub use simulator::ReplaySimulator;
pub use trace::{RecordingTrace, TraceEvent};
pub use transport::{ReplayTransport, REPLAY_CONNECTION_DELAY};
