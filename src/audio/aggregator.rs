use bytes::Bytes;
use tracing::warn;

use super::decode::{decode, AudioError};
use super::stats::{concatenate, statistics, AudioChunkStatistics};

/// Per-query accumulator of decoded audio fragments, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct AudioAggregator {
    chunks: Vec<Bytes>,
    rejected: usize,
}

impl AudioAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and append a base64 fragment. Returns the decoded length.
    ///
    /// A fragment that fails to decode is counted and logged; nothing is
    /// appended.
    pub fn push_base64(&mut self, payload: &str) -> Result<usize, AudioError> {
        match decode(payload) {
            Ok(chunk) => {
                let len = chunk.len();
                self.chunks.push(chunk);
                Ok(len)
            }
            Err(e) => {
                self.rejected += 1;
                warn!("Dropping audio fragment: {}", e);
                Err(e)
            }
        }
    }

    /// Append an already decoded chunk. Empty chunks are ignored.
    pub fn push_chunk(&mut self, chunk: Bytes) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Fragments that failed to decode.
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    pub fn statistics(&self) -> AudioChunkStatistics {
        statistics(&self.chunks)
    }

    /// All chunks joined into one buffer.
    pub fn concatenated(&self) -> Result<Bytes, AudioError> {
        concatenate(&self.chunks)
    }

    pub fn into_chunks(self) -> Vec<Bytes> {
        self.chunks
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.rejected = 0;
    }
}
