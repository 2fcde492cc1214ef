//! Wire types for the remote compile endpoint

use serde::{Deserialize, Serialize};

/// Body of a compile request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileRequest {
    pub code: String,
    pub input: String,
}

impl CompileRequest {
    /// Build a request, trimming surrounding whitespace from the stdin text
    pub fn new(code: impl Into<String>, input: &str) -> Self {
        CompileRequest {
            code: code.into(),
            input: input.trim().to_string(),
        }
    }
}

/// Body of a well-formed response, successful or not
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CompileResponse {
    /// Only an explicit `false` marks a failure
    pub success: Option<bool>,
    pub output: Option<String>,
    pub message: Option<String>,
}

/// What a backend reports back for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The program built and ran
    Success { output: Option<String> },
    /// The service answered but the build or run failed
    Failure {
        message: Option<String>,
        output: Option<String>,
    },
    /// No usable response (network error, unreadable body)
    Transport { output: Option<String> },
}

impl From<CompileResponse> for CompileOutcome {
    fn from(response: CompileResponse) -> Self {
        if response.success != Some(false) {
            CompileOutcome::Success {
                output: response.output,
            }
        } else {
            CompileOutcome::Failure {
                message: response.message,
                output: response.output,
            }
        }
    }
}
