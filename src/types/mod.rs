/// Type definitions shared by the generator stages

/// CBOR argument type tags
pub mod param;
/// Method descriptors and name rules
pub mod method;

// Re-export commonly used types for convenience
pub use method::{validate_key, MethodDescriptor, MAX_ARITY, MAX_KEY_LEN};
pub use param::ParamType;
