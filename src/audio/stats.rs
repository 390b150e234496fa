use bytes::Bytes;
use serde::Serialize;

use super::decode::AudioError;

/// Anything that may hold a chunk of decoded audio.
///
/// `None` and zero-length chunks count as absent.
pub trait AudioChunk {
    fn audio_bytes(&self) -> Option<&[u8]>;
}

impl AudioChunk for &[u8] {
    fn audio_bytes(&self) -> Option<&[u8]> {
        Some(*self)
    }
}

impl AudioChunk for Vec<u8> {
    fn audio_bytes(&self) -> Option<&[u8]> {
        Some(self.as_slice())
    }
}

impl AudioChunk for Bytes {
    fn audio_bytes(&self) -> Option<&[u8]> {
        Some(self.as_ref())
    }
}

impl<T: AudioChunk> AudioChunk for Option<T> {
    fn audio_bytes(&self) -> Option<&[u8]> {
        self.as_ref().and_then(AudioChunk::audio_bytes)
    }
}

fn present<C: AudioChunk>(chunk: &C) -> Option<&[u8]> {
    chunk.audio_bytes().filter(|b| !b.is_empty())
}

/// Join chunks in order, skipping absent ones.
pub fn concatenate<C: AudioChunk>(chunks: &[C]) -> Result<Bytes, AudioError> {
    let total: usize = chunks.iter().filter_map(present).map(<[u8]>::len).sum();
    if total == 0 {
        return Err(AudioError::NoValidData);
    }

    let mut joined = Vec::new();
    joined
        .try_reserve_exact(total)
        .map_err(|e| AudioError::Allocation(e.to_string()))?;
    for chunk in chunks.iter().filter_map(present) {
        joined.extend_from_slice(chunk);
    }
    Ok(Bytes::from(joined))
}

/// Size summary over a chunk list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AudioChunkStatistics {
    pub total_chunks: usize,
    pub valid_chunks: usize,
    pub empty_or_null_chunks: usize,
    pub total_bytes: u64,
    /// Zero when there are no valid chunks
    pub smallest_chunk_bytes: usize,
    pub largest_chunk_bytes: usize,
    pub average_chunk_bytes: f64,
}

impl AudioChunkStatistics {
    pub fn has_valid_data(&self) -> bool {
        self.valid_chunks > 0 && self.total_bytes > 0
    }
}

/// Summarize chunk sizes.
pub fn statistics<C: AudioChunk>(chunks: &[C]) -> AudioChunkStatistics {
    let mut stats = AudioChunkStatistics {
        total_chunks: chunks.len(),
        ..Default::default()
    };

    for chunk in chunks {
        match present(chunk) {
            Some(bytes) => {
                let len = bytes.len();
                stats.valid_chunks += 1;
                stats.total_bytes += len as u64;
                stats.largest_chunk_bytes = stats.largest_chunk_bytes.max(len);
                if stats.smallest_chunk_bytes == 0 || len < stats.smallest_chunk_bytes {
                    stats.smallest_chunk_bytes = len;
                }
            }
            None => stats.empty_or_null_chunks += 1,
        }
    }

    if stats.valid_chunks > 0 {
        stats.average_chunk_bytes = stats.total_bytes as f64 / stats.valid_chunks as f64;
    }
    stats
}
