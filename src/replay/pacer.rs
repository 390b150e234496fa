//! Cancellable timing primitives for replay.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ReplayError;

/// Sleep until `deadline`, or return at once if it already passed.
///
/// Fails with `Cancelled` as soon as `cancel` fires.
pub async fn sleep_until_deadline(
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<(), ReplayError> {
    if cancel.is_cancelled() {
        return Err(ReplayError::Cancelled);
    }
    if deadline <= Instant::now() {
        return Ok(());
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ReplayError::Cancelled),
        _ = tokio::time::sleep_until(deadline) => Ok(()),
    }
}

/// Stand-in deadline for offsets too large to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Scale a recorded interval to wall-clock time, saturating at `Duration::MAX`.
///
/// Negative intervals map to zero.
pub(crate) fn scaled_duration(recorded_ms: f64, speed: f64) -> Duration {
    let secs = recorded_ms.max(0.0) / speed / 1000.0;
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

fn deadline_after(base: Instant, offset: Duration) -> Instant {
    base.checked_add(offset).unwrap_or_else(|| base + FAR_FUTURE)
}

/// Check a playback speed: finite and strictly positive.
pub fn validate_speed(speed: f64) -> Result<f64, ReplayError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(speed)
    } else {
        Err(ReplayError::InvalidSpeed { speed })
    }
}

/// Maps recording timestamps onto wall-clock deadlines.
///
/// Deadlines are computed from a fixed start instant, so time spent
/// delivering one event does not delay the next.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    start: Instant,
    speed: f64,
}

impl Pacer {
    /// Start pacing now.
    pub fn start(speed: f64) -> Result<Self, ReplayError> {
        Self::with_start(Instant::now(), speed)
    }

    pub fn with_start(start: Instant, speed: f64) -> Result<Self, ReplayError> {
        Ok(Self {
            start,
            speed: validate_speed(speed)?,
        })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Wall-clock offset for a recording timestamp. Negative stamps map to zero.
    pub fn offset_for(&self, timestamp_ms: f64) -> Duration {
        scaled_duration(timestamp_ms, self.speed)
    }

    /// Deadline for a recording timestamp. Unrepresentable deadlines are
    /// pushed decades ahead instead.
    pub fn deadline_for(&self, timestamp_ms: f64) -> Instant {
        deadline_after(self.start, self.offset_for(timestamp_ms))
    }

    /// Wait until the deadline of `timestamp_ms`.
    pub async fn wait_for(
        &self,
        timestamp_ms: f64,
        cancel: &CancellationToken,
    ) -> Result<(), ReplayError> {
        if cancel.is_cancelled() {
            return Err(ReplayError::Cancelled);
        }
        sleep_until_deadline(self.deadline_for(timestamp_ms), cancel).await
    }

    /// Wait for the scaled gap between two timestamps, measured from now.
    ///
    /// Non-positive gaps return immediately.
    pub async fn wait_interval(
        &self,
        previous_ms: f64,
        current_ms: f64,
        cancel: &CancellationToken,
    ) -> Result<(), ReplayError> {
        if cancel.is_cancelled() {
            return Err(ReplayError::Cancelled);
        }
        let gap = current_ms - previous_ms;
        if gap <= 0.0 {
            return Ok(());
        }
        let deadline = deadline_after(Instant::now(), scaled_duration(gap, self.speed));
        sleep_until_deadline(deadline, cancel).await
    }
}
