//! Proof types for validated content.
//!
//! These types enforce invariants at construction time. Once you hold a value,
//! you know it satisfies all required constraints.

use std::fmt;

use serde::Serialize;

/// A compile-time checked non-empty static string.
///
/// Every flavor string the engine can show a player is one of these, so an
/// empty narrative is rejected by the compiler rather than discovered in play.
/// Does not trim whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NonEmptyStaticStr(&'static str);

impl NonEmptyStaticStr {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        assert!(!value.is_empty(), "NonEmptyStaticStr must not be empty");
        Self(value)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl AsRef<str> for NonEmptyStaticStr {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Display for NonEmptyStaticStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
