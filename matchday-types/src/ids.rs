//! Identity types for Matchday.
//!
//! All identifiers are opaque strings assigned by the community API. They
//! end up as URL path segments, so parsing from untrusted input rejects
//! anything that would change the shape of a request path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier received from the API.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Parse an identifier from user input.
            pub fn parse(value: &str) -> Result<Self, TypesError> {
                validate_segment($kind, value)?;
                Ok(Self(value.to_string()))
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a community member.
    UserId,
    "user id"
);

string_id!(
    /// Identifier of a friendship entity. Stable once created.
    FriendshipId,
    "friendship id"
);

string_id!(
    /// Public handle of a member, used to address profile pages.
    Username,
    "username"
);

fn validate_segment(kind: &'static str, value: &str) -> Result<(), TypesError> {
    if value.is_empty() {
        return Err(TypesError::EmptyId { kind });
    }
    let bad = value
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'));
    if bad {
        return Err(TypesError::InvalidId {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}
