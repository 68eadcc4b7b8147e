//! The external math engine seam.
//!
//! Parsing markup, semantic analysis and speech generation happen elsewhere; a view only needs
//! the conversions listed on [`SemanticEngine`].

use crate::tree::{NodeId, SemanticTree};
use crate::{Error, Result};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputFormat {
    #[default]
    Tex,
    /// TeX typeset in display style.
    DisplayTex,
    MathMl,
    /// Already annotated semantic markup; only reformatted.
    Semantic,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait SemanticEngine {
    /// Engines that load asynchronously report readiness here.
    fn is_ready(&self) -> bool {
        true
    }

    /// Normalises user input into the markup the other conversions consume.
    fn to_markup(
        &self,
        input: &str,
        format: InputFormat,
    ) -> std::result::Result<String, EngineError>;

    /// Semantic tree JSON (`{"stree": ...}`) for normalised markup.
    fn to_json(&self, markup: &str) -> std::result::Result<Value, EngineError>;

    fn annotate(&self, markup: &str) -> std::result::Result<String, EngineError>;

    fn semantic_dump(&self, markup: &str) -> std::result::Result<String, EngineError>;

    /// Spoken description of one node, shown on hover.
    fn describe(&self, _tree: &SemanticTree, _id: NodeId) -> Option<String> {
        None
    }
}

/// Bounded polling budget for engines that are still starting up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(250),
        }
    }
}

/// Polls `engine` until it is ready or the attempts are used up.
pub fn wait_until_ready(engine: &dyn SemanticEngine, policy: ReadyPolicy) -> Result<()> {
    for attempt in 0..policy.attempts {
        if engine.is_ready() {
            tracing::debug!(attempt, "semantic engine ready");
            return Ok(());
        }
        if attempt + 1 < policy.attempts {
            std::thread::sleep(policy.interval);
        }
    }
    tracing::warn!(attempts = policy.attempts, "semantic engine did not become ready");
    Err(Error::EngineNotReady {
        attempts: policy.attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct SlowStart {
        polls_left: Cell<u32>,
    }

    impl SemanticEngine for SlowStart {
        fn is_ready(&self) -> bool {
            let left = self.polls_left.get();
            if left == 0 {
                return true;
            }
            self.polls_left.set(left - 1);
            false
        }

        fn to_markup(
            &self,
            input: &str,
            _: InputFormat,
        ) -> std::result::Result<String, EngineError> {
            Ok(input.to_string())
        }

        fn to_json(&self, _: &str) -> std::result::Result<Value, EngineError> {
            Ok(Value::Null)
        }

        fn annotate(&self, markup: &str) -> std::result::Result<String, EngineError> {
            Ok(markup.to_string())
        }

        fn semantic_dump(&self, markup: &str) -> std::result::Result<String, EngineError> {
            Ok(markup.to_string())
        }
    }

    fn policy(attempts: u32) -> ReadyPolicy {
        ReadyPolicy {
            attempts,
            interval: Duration::ZERO,
        }
    }

    #[test]
    fn ready_after_a_few_polls() {
        let engine = SlowStart {
            polls_left: Cell::new(3),
        };
        wait_until_ready(&engine, policy(5)).unwrap();
    }

    #[test]
    fn gives_up_after_the_budget() {
        let engine = SlowStart {
            polls_left: Cell::new(10),
        };
        let err = wait_until_ready(&engine, policy(4)).unwrap_err();
        assert!(matches!(err, Error::EngineNotReady { attempts: 4 }));
        assert_eq!(engine.polls_left.get(), 6);
    }
}
