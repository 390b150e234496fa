use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DifyError;

/// Response mode for chat-message calls. Only streaming is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    #[default]
    Streaming,
}

/// One user utterance addressed to the workflow backend.
///
/// `QueryRequest::new` validates eagerly. A request obtained through serde is
/// not validated; the orchestrator checks `is_valid` before any network call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user utterance
    query: String,
    /// Stable user identifier
    user: String,
    /// Empty string starts a new conversation
    #[serde(default)]
    conversation_id: String,
    #[serde(default)]
    response_mode: ResponseMode,
}

impl QueryRequest {
    /// Create a request, trimming `query` and `user`.
    ///
    /// Fails with `InvalidArgument` when either is blank.
    pub fn new(
        query: impl Into<String>,
        user: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Result<Self, DifyError> {
        let query = query.into();
        let user = user.into();
        if query.trim().is_empty() {
            return Err(DifyError::invalid_argument("query", "Query cannot be empty"));
        }
        if user.trim().is_empty() {
            return Err(DifyError::invalid_argument("user", "User cannot be empty"));
        }
        Ok(Self {
            query: query.trim().to_string(),
            user: user.trim().to_string(),
            conversation_id: conversation_id.into(),
            response_mode: ResponseMode::Streaming,
        })
    }

    /// Create a request that starts a new conversation.
    pub fn new_conversation(
        query: impl Into<String>,
        user: impl Into<String>,
    ) -> Result<Self, DifyError> {
        Self::new(query, user, "")
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn response_mode(&self) -> ResponseMode {
        self.response_mode
    }

    /// True when this request continues an existing conversation.
    pub fn continues_conversation(&self) -> bool {
        !self.conversation_id.is_empty()
    }

    /// Both query and user are non-blank.
    pub fn is_valid(&self) -> bool {
        !self.query.trim().is_empty() && !self.user.trim().is_empty()
    }

    /// JSON body for the chat-messages endpoint.
    pub fn to_wire_body(&self) -> WireRequestBody<'_> {
        WireRequestBody {
            inputs: BTreeMap::new(),
            query: &self.query,
            response_mode: self.response_mode,
            conversation_id: &self.conversation_id,
            user: &self.user,
            auto_generate_name: false,
        }
    }
}

/// Serialized shape of a chat-messages request.
#[derive(Debug, Serialize)]
pub struct WireRequestBody<'a> {
    pub inputs: BTreeMap<String, serde_json::Value>,
    pub query: &'a str,
    pub response_mode: ResponseMode,
    pub conversation_id: &'a str,
    pub user: &'a str,
    pub auto_generate_name: bool,
}
