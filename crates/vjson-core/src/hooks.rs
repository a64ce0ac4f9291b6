//! User callbacks injected into a single decode or encode call
//!
//! Both hooks are plain traits with blanket implementations for closures, so
//! callers pass either a closure or a stateful strategy object.

use crate::encoder::Source;
use vjson_rs_domain::{Map, Value};

/// Error type a hook reports failure with
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Substitution applied to every decoded object, innermost first
pub trait ObjectHook {
    /// Receive a completed object and return the value that replaces it
    fn call(&mut self, object: Map) -> Result<Value, HookError>;
}

impl<F> ObjectHook for F
where
    F: FnMut(Map) -> Result<Value, HookError>,
{
    fn call(&mut self, object: Map) -> Result<Value, HookError> {
        self(object)
    }
}

/// Fallback for host values the encoder cannot represent natively
pub trait DefaultHook {
    /// Return an encodable substitute for `value`
    fn call(&mut self, value: &dyn Source) -> Result<Value, HookError>;
}

impl<F> DefaultHook for F
where
    F: FnMut(&dyn Source) -> Result<Value, HookError>,
{
    fn call(&mut self, value: &dyn Source) -> Result<Value, HookError> {
        self(value)
    }
}
