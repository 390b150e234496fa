//! Response processor trait abstraction.

use crate::sse::StreamEvent;

/// Downstream consumer of audio and text events.
///
/// Called synchronously from the orchestrator, in stream order. Keep
/// implementations cheap; hand heavy work to another task.
pub trait ResponseProcessor: Send + Sync {
    /// Handle an audio event.
    fn process_audio(&self, event: &StreamEvent);

    /// Handle a text (message) event.
    fn process_text(&self, event: &StreamEvent);
}
