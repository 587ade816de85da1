//! Open string labels: status, priority and role.
//!
//! Each label has a handful of well-known values, but records store
//! whatever the client sent. An unrecognised wire name lands in `Other`
//! and is written back exactly as received.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads any JSON value as text. Strings are taken as-is, `null` becomes
/// the empty string and anything else its compact JSON rendering.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

pub(crate) fn value_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

macro_rules! open_label {
    (
        $(#[$meta:meta])*
        $name:ident (default $default:ident) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Any other wire name, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Wire name of the label.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(raw) => raw.as_str(),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $( $wire => Self::$variant, )+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        // `null` falls back to the default; other non-strings keep their
        // JSON text.
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match <serde_json::Value as serde::Deserialize>::deserialize(deserializer)? {
                    serde_json::Value::Null => Ok(Self::default()),
                    value => Ok(Self::from($crate::domain::label::value_text(value))),
                }
            }
        }

        impl utoipa::PartialSchema for $name {
            fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
                utoipa::openapi::schema::ObjectBuilder::new()
                    .schema_type(utoipa::openapi::schema::Type::String)
                    .description(Some(concat!(
                        "Well-known values: ",
                        $( $wire, " ", )+
                        "(any other string is stored as sent)"
                    )))
                    .examples([$( $wire ),+])
                    .into()
            }
        }

        impl utoipa::ToSchema for $name {}
    };
}

pub(crate) use open_label;

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    open_label!(
        /// Traffic light.
        Light (default Red) {
            /// Stop.
            Red => "red",
            /// Go.
            Green => "green",
        }
    );

    #[test]
    fn known_names_map_to_variants() {
        assert_eq!(Light::from("green"), Light::Green);
        assert_eq!(Light::Green.as_str(), "green");
    }

    #[test]
    fn unknown_names_round_trip() {
        let Ok(light) = serde_json::from_str::<Light>(r#""amber""#) else {
            panic!("any string is accepted");
        };
        assert_eq!(light, Light::Other("amber".to_string()));
        assert_eq!(serde_json::to_string(&light).unwrap_or_default(), r#""amber""#);
    }

    #[test]
    fn non_strings_keep_their_json_text() {
        let Ok(light) = serde_json::from_str::<Light>("3") else {
            panic!("numbers are accepted");
        };
        assert_eq!(light.as_str(), "3");

        let Ok(light) = serde_json::from_str::<Light>("null") else {
            panic!("null is accepted");
        };
        assert_eq!(light, Light::Red);
    }

    #[test]
    fn lenient_text_reads_any_value() {
        let read = |raw: &str| {
            let mut de = serde_json::Deserializer::from_str(raw);
            lenient_text(&mut de).unwrap_or_else(|_| panic!("{raw} should read"))
        };
        assert_eq!(read(r#""x""#), "x");
        assert_eq!(read("123"), "123");
        assert_eq!(read("null"), "");
        assert_eq!(read("true"), "true");
    }
}
