//! Tweak Values
//!
//! The closed set of value types a tweak can carry, shared by the schema
//! model and the runtime provider interface.

use std::fmt;

/// Declared type of a tweak variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Integer,
    Float,
    String,
}

impl ValueType {
    /// Resolve a type tag from a tweaks document (case-insensitive)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Some(Self::Bool),
            "int" | "integer" => Some(Self::Integer),
            "float" | "double" => Some(Self::Float),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// Rust type returned by a generated accessor
    pub fn rust_type(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::String => "String",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed tweak value
#[derive(Debug, Clone, PartialEq)]
pub enum TweakValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl TweakValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Bool(_) => ValueType::Bool,
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::String(_) => ValueType::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Float view of the value; integers widen
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Render the value as a Rust literal of its accessor's return type
    pub fn to_rust_literal(&self) -> String {
        match self {
            Self::Bool(value) => value.to_string(),
            Self::Integer(value) => value.to_string(),
            // Debug keeps the fractional part ("1.0") so the literal stays f64
            Self::Float(value) => format!("{:?}", value),
            Self::String(value) => format!("{:?}", value),
        }
    }
}

impl fmt::Display for TweakValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{:?}", value),
            Self::String(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<bool> for TweakValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for TweakValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for TweakValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for TweakValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for TweakValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(ValueType::from_tag("bool"), Some(ValueType::Bool));
        assert_eq!(ValueType::from_tag("Boolean"), Some(ValueType::Bool));
        assert_eq!(ValueType::from_tag("int"), Some(ValueType::Integer));
        assert_eq!(ValueType::from_tag("double"), Some(ValueType::Float));
        assert_eq!(ValueType::from_tag("string"), Some(ValueType::String));
        assert_eq!(ValueType::from_tag("number"), None);
        assert_eq!(ValueType::from_tag("date"), None);
        assert_eq!(ValueType::from_tag(""), None);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(TweakValue::Bool(true).as_bool(), Some(true));
        assert_eq!(TweakValue::Integer(3).as_bool(), None);
        assert_eq!(TweakValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(TweakValue::Float(0.5).as_i64(), None);
        assert_eq!(TweakValue::from("hi").as_str(), Some("hi"));
        assert_eq!(TweakValue::from("hi").into_string(), Some("hi".to_string()));
        assert_eq!(TweakValue::Bool(false).into_string(), None);
    }

    #[test]
    fn test_rust_literals() {
        assert_eq!(TweakValue::Bool(true).to_rust_literal(), "true");
        assert_eq!(TweakValue::Integer(-5).to_rust_literal(), "-5");
        assert_eq!(TweakValue::Float(1.0).to_rust_literal(), "1.0");
        assert_eq!(TweakValue::Float(0.25).to_rust_literal(), "0.25");
        assert_eq!(
            TweakValue::from("say \"hi\"\n").to_rust_literal(),
            "\"say \\\"hi\\\"\\n\""
        );
    }
}
