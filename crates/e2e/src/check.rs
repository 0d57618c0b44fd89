//! Check abstraction

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HarnessResult;

/// Terminal disposition of a check
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
    pub response: Option<Value>,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            response: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            response: None,
        }
    }

    /// Pass when `found >= required`, choosing the message accordingly
    pub fn threshold(found: usize, required: usize, pass: String, fail: String) -> Self {
        if found >= required {
            Self::pass(pass)
        } else {
            Self::fail(fail)
        }
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }
}

/// One named verification against the target
///
/// `C` is the suite context: the HTTP client, the WebDriver session and any
/// state an earlier check hands to a later one.
#[async_trait]
pub trait Check<C: Send>: Send + Sync {
    fn name(&self) -> &str;

    /// Prefix for the FAIL message when [`Check::run`] returns an error
    fn error_prefix(&self) -> &str {
        "Request failed"
    }

    async fn run(&self, ctx: &mut C) -> HarnessResult<Verdict>;
}
