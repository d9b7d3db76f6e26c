//! Key set construction: reserved system methods followed by user methods.

use ahash::AHashSet;

use crate::core::config::MethodEntry;
use crate::core::error::{Error, Result, ValidationError};
use crate::log_debug;
use crate::types::param::UnknownParamType;
use crate::types::{validate_key, MethodDescriptor, ParamType, MAX_ARITY};

/// System methods every generated server answers, in logical index order.
///
/// `__funcs` lists the public methods, `__ping` answers `"pong"`, and
/// `__version` reports the protocol version.
pub const RESERVED_METHODS: [&str; 3] = ["__funcs", "__ping", "__version"];

/// Ordered method descriptors for one generation run.
///
/// Reserved methods occupy indices `0..reserved_count()`, user methods follow
/// in the order they were declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet {
    methods: Vec<MethodDescriptor>,
    reserved: usize,
}

impl KeySet {
    /// Validate `methods` and merge them behind the `reserved` names.
    ///
    /// Fails on the first invalid name or tag, or on any duplicate, before
    /// anything is hashed. Names are compared case-folded: `echo` and `ECHO`
    /// would emit the same C handle constant.
    pub fn build<S: AsRef<str>>(reserved: &[S], methods: &[MethodEntry]) -> Result<Self> {
        let mut seen: AHashSet<String> = AHashSet::with_capacity(reserved.len() + methods.len());
        let mut out = Vec::with_capacity(reserved.len() + methods.len());

        for name in reserved {
            let name = name.as_ref();
            validate_key(name)?;
            if !seen.insert(name.to_ascii_uppercase()) {
                return Err(Error::DuplicateKey { name: name.to_string() });
            }
            out.push(MethodDescriptor::new(name, Vec::new()));
        }

        for entry in methods {
            validate_key(&entry.name)?;
            if !seen.insert(entry.name.to_ascii_uppercase()) {
                return Err(Error::DuplicateKey { name: entry.name.clone() });
            }
            out.push(MethodDescriptor::new(entry.name.as_str(), parse_params(entry)?));
        }

        log_debug!("key set: {} reserved + {} user methods", reserved.len(), methods.len());

        Ok(Self { methods: out, reserved: reserved.len() })
    }

    /// Build with the fixed [`RESERVED_METHODS`].
    pub fn with_system_methods(methods: &[MethodEntry]) -> Result<Self> {
        Self::build(&RESERVED_METHODS, methods)
    }

    /// Total number of keys, reserved included
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// True when there are no keys at all
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Number of reserved methods at the head of the ordering
    pub fn reserved_count(&self) -> usize {
        self.reserved
    }

    /// Descriptor at a logical index
    pub fn get(&self, index: usize) -> Option<&MethodDescriptor> {
        self.methods.get(index)
    }

    /// Descriptors in logical order
    pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter()
    }

    /// Method names in logical order
    pub fn names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }
}

fn parse_params(entry: &MethodEntry) -> std::result::Result<Vec<ParamType>, ValidationError> {
    if entry.params.len() > MAX_ARITY {
        return Err(ValidationError::TooManyParams {
            method: entry.name.clone(),
            count: entry.params.len(),
            max: MAX_ARITY,
        });
    }
    entry
        .params
        .iter()
        .map(|tag| {
            tag.parse::<ParamType>().map_err(|UnknownParamType(tag)| {
                ValidationError::UnknownParamType { method: entry.name.clone(), tag }
            })
        })
        .collect()
}
