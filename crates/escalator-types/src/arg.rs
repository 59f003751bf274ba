//! Event argument values.

use serde::{Deserialize, Serialize};

/// A single argument attached to a logged event.
///
/// Arguments are opaque to the trigger: they only feed key derivation and
/// the optional key filter, which may inspect the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventArg {
    /// Free-form text, typically the message or a message fragment.
    Text(String),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A floating point value.
    Float(f64),
    /// A boolean flag.
    Bool(bool),
    /// An error captured at the logging call site.
    Error(ErrorArg),
}

/// An error value captured as its type name and rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorArg {
    /// Fully qualified Rust type name of the error.
    pub type_name: String,
    /// The error's `Display` output.
    pub message: String,
}

impl EventArg {
    /// Captures an error value.
    ///
    /// The type name is the static type `E`. Behind `&dyn Error` or
    /// `Box<dyn Error>` that is the trait object itself, so every such error
    /// records the same name; use [`EventArg::error_with_type`] there.
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::error_with_type(std::any::type_name::<E>(), err)
    }

    /// Captures an error under an explicit type name.
    pub fn error_with_type<E>(type_name: impl Into<String>, err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::Error(ErrorArg {
            type_name: type_name.into(),
            message: err.to_string(),
        })
    }

    /// Returns `true` if this argument holds an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the captured error, if any.
    pub fn as_error(&self) -> Option<&ErrorArg> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Error(err) => write!(f, "{}: {}", err.type_name, err.message),
        }
    }
}

impl From<&str> for EventArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EventArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for EventArg {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for EventArg {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for EventArg {
    fn from(value: u32) -> Self {
        Self::UInt(value.into())
    }
}

impl From<u64> for EventArg {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<f64> for EventArg {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for EventArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<std::io::Error> for EventArg {
    fn from(value: std::io::Error) -> Self {
        Self::error(&value)
    }
}
