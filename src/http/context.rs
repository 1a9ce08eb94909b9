//! Per-request correlation context.
//!
//! The correlation id is minted exactly once, at the outermost pipeline
//! layer, and threaded to every later stage through request extensions as
//! an immutable value. There is no shared mutable bag to look ids up from:
//! a stage either received the context or it did not.

use uuid::Uuid;

/// Immutable call-scoped context shared by all pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    correlation_id: Uuid,
}

impl RequestContext {
    /// Mint a fresh context with a new correlation id.
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
        }
    }

    /// Identifier joining all records produced while servicing this call.
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_context_gets_a_distinct_id() {
        assert_ne!(
            RequestContext::new().correlation_id(),
            RequestContext::new().correlation_id()
        );
    }
}
