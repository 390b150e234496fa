//! Result type alias for streaming-client operations.

use super::dify_error::DifyError;

/// Type alias for Results using DifyError.
///
/// # Example
///
/// ```ignore
/// use dify_stream::error::DifyResult;
///
/// fn load() -> DifyResult<RecordingTrace> {
///     Ok(RecordingTrace::load("trace.json")?)
/// }
/// ```
pub type DifyResult<T> = Result<T, DifyError>;
