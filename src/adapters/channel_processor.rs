//! Channel-backed response processor.
//!
//! Forwards processor calls over an unbounded tokio channel so a consumer
//! task (audio playback, subtitle rendering) can run independently of the
//! stream.

use tokio::sync::mpsc;
use tracing::debug;

use crate::sse::StreamEvent;
use crate::traits::ResponseProcessor;

/// Event delivered to the consumer side.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorEvent {
    Audio(StreamEvent),
    Text(StreamEvent),
}

/// Processor that sends every call to a channel.
#[derive(Debug, Clone)]
pub struct ChannelProcessor {
    tx: mpsc::UnboundedSender<ProcessorEvent>,
}

impl ChannelProcessor {
    /// Create a processor and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProcessorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: ProcessorEvent) {
        if self.tx.send(event).is_err() {
            debug!("Processor channel closed; dropping event");
        }
    }
}

impl ResponseProcessor for ChannelProcessor {
    fn process_audio(&self, event: &StreamEvent) {
        self.send(ProcessorEvent::Audio(event.clone()));
    }

    fn process_text(&self, event: &StreamEvent) {
        self.send(ProcessorEvent::Text(event.clone()));
    }
}
