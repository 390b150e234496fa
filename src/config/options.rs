//! Tuning knobs for the query orchestrator.

use serde::{Deserialize, Serialize};

use crate::sse::ParserOptions;

/// How elapsed time is reported when the transport itself errors out.
///
/// A transport that returns an unsuccessful result always reports measured
/// time. This flag only governs the case where the transport call fails with
/// an error instead of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureTiming {
    /// Report zero elapsed time.
    #[default]
    Zero,
    /// Report wall-clock time measured up to the failure.
    Measured,
}

/// Options for [`crate::query::QueryOrchestrator`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorOptions {
    #[serde(default)]
    pub failure_timing: FailureTiming,
    #[serde(default)]
    pub parser: ParserOptions,
}

impl OrchestratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the elapsed-time policy for transport errors.
    pub fn with_failure_timing(mut self, timing: FailureTiming) -> Self {
        self.failure_timing = timing;
        self
    }

    /// Set the line parser options used for the raw feed.
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reports_zero() {
        assert_eq!(OrchestratorOptions::default().failure_timing, FailureTiming::Zero);
    }

    #[test]
    fn test_failure_timing_serde_names() {
        let json = serde_json::to_string(&FailureTiming::Measured).unwrap();
        assert_eq!(json, "\"measured\"");
        let back: FailureTiming = serde_json::from_str("\"zero\"").unwrap();
        assert_eq!(back, FailureTiming::Zero);
    }
}
