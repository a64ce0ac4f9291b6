//! Nesting guard shared by the decoder and the encoder

use crate::{
    config::DEFAULT_MAX_DEPTH,
    error::{Error, Position, Result},
};

/// JSON depth tracker for bounding container nesting
#[derive(Debug, Clone)]
pub struct DepthTracker {
    current_depth: usize,
    max_depth: usize,
}

impl DepthTracker {
    /// Create a new depth tracker with custom limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            current_depth: 0,
            max_depth,
        }
    }

    /// Enter a new nesting level (array/object)
    pub fn enter(&mut self) -> Result<()> {
        self.enter_at(None)
    }

    /// Enter a new nesting level, tagging a failure with the input position
    pub fn enter_at(&mut self, position: Option<Position>) -> Result<()> {
        if self.current_depth >= self.max_depth {
            return Err(Error::too_deep(self.max_depth, position));
        }
        self.current_depth += 1;
        Ok(())
    }

    /// Exit a nesting level
    pub fn exit(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }

    /// Get current depth
    pub fn current_depth(&self) -> usize {
        self.current_depth
    }

    /// Get the configured limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for DepthTracker {
    fn default() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }
}
