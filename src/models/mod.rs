//! Request models for the chat-messages endpoint.

mod request;

pub use request::{QueryRequest, ResponseMode, WireRequestBody};
