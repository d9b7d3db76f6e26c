//! Method descriptors and method name rules.

use super::param::ParamType;
use crate::core::error::ValidationError;
use serde::Serialize;

/// Longest method name the C runtime accepts (its copy buffer is 33 bytes)
pub const MAX_KEY_LEN: usize = 32;

/// Longest parameter list a method may declare
pub const MAX_ARITY: usize = 32;

/// A method name plus its ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    /// Method name as sent on the wire
    pub name: String,
    /// Ordered parameter types; arity is the length
    pub params: Vec<ParamType>,
}

impl MethodDescriptor {
    /// Create a descriptor without validating the name.
    pub fn new(name: impl Into<String>, params: Vec<ParamType>) -> Self {
        Self { name: name.into(), params }
    }

    /// Number of arguments the method takes
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Hidden methods (leading `_`) are left out of the `__funcs` listing.
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('_')
    }
}

/// Check a method name against the rules shared by the hash and the C emitter.
///
/// Names become both C string literals and the `rpc_<name>` handler symbol, so
/// they are restricted to C identifier characters.
pub fn validate_key(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyKey);
    }
    if name.len() > MAX_KEY_LEN {
        return Err(ValidationError::KeyTooLong {
            name: name.to_string(),
            len: name.len(),
            max: MAX_KEY_LEN,
        });
    }
    if let Some(ch) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(ValidationError::InvalidKeyChar { name: name.to_string(), ch });
    }
    if name.as_bytes()[0].is_ascii_digit() {
        return Err(ValidationError::LeadingDigit { name: name.to_string() });
    }
    Ok(())
}
