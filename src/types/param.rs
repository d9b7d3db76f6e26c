//! CBOR argument type tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix used by the C runtime's `rpc_argument_type_t` constants
pub const C_TYPE_PREFIX: &str = "CBOR_TYPE_";

/// Argument type tags - one-to-one with the C runtime's `rpc_argument_type_t`
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamType {
    // Simple values
    /// CBOR null
    Null = 0,
    /// CBOR true/false
    Bool = 1,
    /// Any other CBOR simple value
    Simple = 2,

    // Integers
    /// Any CBOR integer
    SignedInteger = 3,
    /// Major type 0 integer
    UnsignedInteger = 4,
    /// Major type 1 integer
    NegativeInteger = 5,

    // Floats
    /// IEEE 754 half precision
    HalfFloat = 6,
    /// IEEE 754 single precision
    Float = 7,
    /// IEEE 754 double precision
    Double = 8,

    // Strings
    /// UTF-8 text string
    TextString = 9,
    /// Raw byte string
    ByteString = 10,

    // Containers
    /// CBOR array
    Array = 11,
    /// CBOR map
    Map = 12,
}

impl ParamType {
    /// Every tag in wire order
    pub const ALL: [ParamType; 13] = [
        ParamType::Null,
        ParamType::Bool,
        ParamType::Simple,
        ParamType::SignedInteger,
        ParamType::UnsignedInteger,
        ParamType::NegativeInteger,
        ParamType::HalfFloat,
        ParamType::Float,
        ParamType::Double,
        ParamType::TextString,
        ParamType::ByteString,
        ParamType::Array,
        ParamType::Map,
    ];

    /// Short tag name, e.g. `TEXT_STRING`
    pub const fn name(self) -> &'static str {
        match self {
            ParamType::Null => "NULL",
            ParamType::Bool => "BOOL",
            ParamType::Simple => "SIMPLE",
            ParamType::SignedInteger => "SIGNED_INTEGER",
            ParamType::UnsignedInteger => "UNSIGNED_INTEGER",
            ParamType::NegativeInteger => "NEGATIVE_INTEGER",
            ParamType::HalfFloat => "HALF_FLOAT",
            ParamType::Float => "FLOAT",
            ParamType::Double => "DOUBLE",
            ParamType::TextString => "TEXT_STRING",
            ParamType::ByteString => "BYTE_STRING",
            ParamType::Array => "ARRAY",
            ParamType::Map => "MAP",
        }
    }

    /// Constant name in the C runtime, e.g. `CBOR_TYPE_TEXT_STRING`
    pub fn c_name(self) -> String {
        format!("{}{}", C_TYPE_PREFIX, self.name())
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tag text that names no known type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown parameter type {0:?}")]
pub struct UnknownParamType(pub String);

impl FromStr for ParamType {
    type Err = UnknownParamType;

    /// Accepts `TEXT_STRING` or `CBOR_TYPE_TEXT_STRING`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix(C_TYPE_PREFIX).unwrap_or(&upper);
        ParamType::ALL
            .iter()
            .copied()
            .find(|t| t.name() == short)
            .ok_or_else(|| UnknownParamType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_spellings() {
        assert_eq!("TEXT_STRING".parse::<ParamType>(), Ok(ParamType::TextString));
        assert_eq!("CBOR_TYPE_ARRAY".parse::<ParamType>(), Ok(ParamType::Array));
        assert_eq!("half_float".parse::<ParamType>(), Ok(ParamType::HalfFloat));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "UNDEFINED".parse::<ParamType>().unwrap_err();
        assert_eq!(err, UnknownParamType("UNDEFINED".to_string()));
        assert_eq!(err.to_string(), "unknown parameter type \"UNDEFINED\"");
        assert!("CBOR_TYPE_".parse::<ParamType>().is_err());
        assert!("".parse::<ParamType>().is_err());
    }

    #[test]
    fn test_discriminants_follow_wire_order() {
        for (i, t) in ParamType::ALL.iter().enumerate() {
            assert_eq!(*t as u8 as usize, i);
        }
        assert_eq!(ParamType::Map.c_name(), "CBOR_TYPE_MAP");
    }
}
