//! Unified error handling for the streaming client.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Domain-specific Errors**: Stream, Transport and Replay errors
//! - **Unified Error Type**: `DifyError` consolidates all error types
//! - **Result Type Alias**: `DifyResult<T>` for consistent return types
//!
//! # Error Categories
//!
//! | Category | Raised by | Surfaced as |
//! |----------|-----------|-------------|
//! | Client | null/blank arguments | `Err` |
//! | User | blank query/user | failed `QueryResponse` |
//! | Data | malformed SSE line, trace, audio | counted / `Err` |
//! | Network, Server | transport | failed `QueryResponse` |
//! | Cancelled | cancellation token | `Err(DifyError::Cancelled)` |

mod category;
mod dify_error;
mod replay;
mod result;
mod stream;
mod transport;

pub use category::ErrorCategory;
pub use dify_error::DifyError;
pub use replay::ReplayError;
pub use result::DifyResult;
pub use stream::StreamError;
pub use transport::TransportError;
