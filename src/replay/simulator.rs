//! Timing-faithful playback of recorded traces.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::ReplayError;
use crate::sse::{DATA_PREFIX, DONE_MARKER};
use crate::traits::RawLineSink;

use super::pacer::{scaled_duration, validate_speed, Pacer};
use super::trace::RecordingTrace;

/// Replays a [`RecordingTrace`] as a stream of SSE lines.
///
/// Each event is delivered at `start + timestamp / speed`. Deadlines are
/// absolute, so slow consumers do not accumulate drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySimulator {
    speed: f64,
}

impl Default for ReplaySimulator {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl ReplaySimulator {
    /// Create a simulator. `speed` must be finite and positive.
    pub fn new(speed: f64) -> Result<Self, ReplayError> {
        Ok(Self {
            speed: validate_speed(speed)?,
        })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Recorded duration scaled by the playback speed.
    pub fn adjusted_duration_ms(&self, recorded_ms: f64) -> f64 {
        recorded_ms / self.speed
    }

    /// Recorded duration as wall-clock time, saturating at `Duration::MAX`.
    pub fn adjusted_time(&self, recorded_ms: f64) -> Duration {
        scaled_duration(recorded_ms, self.speed)
    }

    /// Play `trace` into `on_line`, finishing with the end marker.
    ///
    /// Returns everything emitted. On cancellation nothing further is
    /// emitted and `ReplayError::Cancelled` is returned.
    pub async fn replay(
        &self,
        trace: &RecordingTrace,
        on_line: &mut RawLineSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, ReplayError> {
        let pacer = Pacer::start(self.speed)?;
        let mut body = String::new();

        info!(
            "Replaying {} events at {}x",
            trace.events().len(),
            self.speed
        );

        for (index, event) in trace.events().iter().enumerate() {
            pacer.wait_for(event.timestamp, cancel).await?;
            if cancel.is_cancelled() {
                return Err(ReplayError::Cancelled);
            }

            let line = format!(
                "{}{}\n\n",
                DATA_PREFIX,
                event.to_wire_json(Utc::now().timestamp())
            );
            debug!(
                "Replay event {}/{}: {} at {}ms",
                index + 1,
                trace.events().len(),
                event.event_type,
                event.timestamp
            );
            on_line(&line);
            body.push_str(&line);
        }

        if cancel.is_cancelled() {
            return Err(ReplayError::Cancelled);
        }
        let done = format!("{}{}\n\n", DATA_PREFIX, DONE_MARKER);
        on_line(&done);
        body.push_str(&done);

        info!("Replay finished");
        Ok(body)
    }
}
