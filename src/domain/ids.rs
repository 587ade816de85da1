//! Type-safe numeric identifiers.
//!
//! Users, service orders and comments are addressed by monotonically
//! assigned integers. Each gets its own newtype so that an order id can
//! never be passed where a user id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw integer identifier.
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw integer value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Returns the identifier that follows this one.
            #[must_use]
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

numeric_id!(
    /// Identifier of a [`super::User`]. Never reused after deletion.
    UserId
);

numeric_id!(
    /// Identifier of a [`super::ServiceOrder`]. Never reused after deletion.
    OrderId
);

numeric_id!(
    /// Identifier of a [`super::Comment`], unique within its parent order.
    CommentId
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn next_increments() {
        assert_eq!(OrderId::new(4).next(), OrderId::new(5));
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&UserId::new(2)).unwrap_or_default();
        assert_eq!(json, "2");
    }

    #[test]
    fn deserializes_from_integer() {
        let Ok(id) = serde_json::from_str::<OrderId>("17") else {
            panic!("expected integer id to parse");
        };
        assert_eq!(id.get(), 17);
    }

    #[test]
    fn display_is_plain_number() {
        assert_eq!(CommentId::new(3).to_string(), "3");
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(UserId::new(1) < UserId::new(2));
    }
}
