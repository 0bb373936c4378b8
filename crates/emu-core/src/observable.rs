//! Read-only state inspection.
//!
//! Components answer dotted path queries (`cpu.a`, `memory.$0300`) with a
//! small dynamically typed [`Value`]. Answering a query never changes
//! emulation state, so hosts and tests may query at any point.

use std::collections::BTreeMap;
use std::fmt;

/// Answer to a state query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    String(String),
    /// Named sub-values, e.g. every status flag at once.
    Map(BTreeMap<String, Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v:#04X}"),
            Value::U16(v) => write!(f, "{v:#06X}"),
            Value::U32(v) => write!(f, "{v:#010X}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    String => String,
}

/// A component whose state can be inspected by path.
pub trait Observable {
    /// Look up one property. Paths are dot separated, e.g. `flags.z` or
    /// `memory.$0300`.
    ///
    /// Returns `None` for an unrecognised path.
    fn query(&self, path: &str) -> Option<Value>;

    /// The path patterns `query` understands, for help output.
    fn query_paths(&self) -> &'static [&'static str];
}

/// Parse the address part of a `memory.<addr>` style query.
///
/// Accepts `0x1234`, `$1234` or decimal.
#[must_use]
pub fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
