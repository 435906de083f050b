//! Overflow policy for numeric operations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VarError;

/// How a numeric operation handles a result that does not fit the operands'
/// native width.
///
/// Deserializes from `"throw"`, `"promote"`, `"wrap"` or `"raw_no_check"`, so a
/// host can carry it in its own configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Fail with `VarError::Overflow`.
    #[default]
    Throw,
    /// Return the narrowest tag that represents the exact result.
    Promote,
    /// Two's-complement truncation to the native width.
    Wrap,
    /// Native arithmetic with no check at all. Overflow panics in builds with
    /// `overflow-checks` enabled and wraps otherwise.
    RawNoCheck,
}

impl Policy {
    /// Policy used by the named functions in [`ops`](crate::ops).
    pub const NAMED_DEFAULT: Policy = Policy::Throw;

    /// Policy used by the `std::ops` operator impls on `Value`.
    pub const OPERATOR_DEFAULT: Policy = Policy::RawNoCheck;

    pub const ALL: [Policy; 4] = [
        Policy::Throw,
        Policy::Promote,
        Policy::Wrap,
        Policy::RawNoCheck,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Policy::Throw => "throw",
            Policy::Promote => "promote",
            Policy::Wrap => "wrap",
            Policy::RawNoCheck => "raw_no_check",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = VarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "throw" => Ok(Policy::Throw),
            "promote" => Ok(Policy::Promote),
            "wrap" => Ok(Policy::Wrap),
            "raw_no_check" | "raw" | "none" => Ok(Policy::RawNoCheck),
            other => Err(VarError::InvalidValue(format!(
                "unknown overflow policy '{other}'"
            ))),
        }
    }
}
