//! Audio payload handling
//!
//! Audio arrives as base64 fragments inside `tts_message` events. This module
//! decodes fragments, joins them, and reports size statistics.

mod aggregator;
mod decode;
mod stats;

pub use aggregator::AudioAggregator;
pub use decode::{decode, is_valid_base64, AudioError};
pub use stats::{concatenate, statistics, AudioChunk, AudioChunkStatistics};
