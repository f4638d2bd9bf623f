//! Tweaks Schema Types
//!
//! Validated, immutable representation of a tweaks document. Values of these
//! types only come out of the loader, so every descriptor already carries a
//! resolved type and a default of that type.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::value::{TweakValue, ValueType};

pub type FeatureKey = String;
pub type VariableKey = String;

/// Inclusive numeric bounds declared for an integer or float tweak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(min) = self.min {
            write!(f, "{}", min)?;
        }
        f.write_str("..")?;
        if let Some(max) = self.max {
            write!(f, "={}", max)?;
        }
        Ok(())
    }
}

/// Metadata and default for one tweak variable
#[derive(Debug, Clone, PartialEq)]
pub struct TweakDescriptor {
    pub value_type: ValueType,
    pub default: TweakValue,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    /// Explicit accessor name overriding the derived one
    pub property_name: Option<String>,
    pub range: Option<ValueRange>,
    /// Properties the generator does not interpret, kept verbatim
    pub metadata: BTreeMap<String, Value>,
}

impl TweakDescriptor {
    pub fn new(default: TweakValue) -> Self {
        Self {
            value_type: default.value_type(),
            default,
            title: None,
            description: None,
            group: None,
            property_name: None,
            range: None,
            metadata: BTreeMap::new(),
        }
    }
}

/// Variables of one feature, ordered by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFormat {
    variables: BTreeMap<VariableKey, TweakDescriptor>,
}

impl FeatureFormat {
    pub(crate) fn new(variables: BTreeMap<VariableKey, TweakDescriptor>) -> Self {
        Self { variables }
    }

    pub fn variables(&self) -> impl Iterator<Item = (&VariableKey, &TweakDescriptor)> {
        self.variables.iter()
    }

    pub fn variable(&self, key: &str) -> Option<&TweakDescriptor> {
        self.variables.get(key)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Root of the schema: every feature of the document, ordered by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TweaksFormat {
    features: BTreeMap<FeatureKey, FeatureFormat>,
}

impl TweaksFormat {
    pub(crate) fn new(features: BTreeMap<FeatureKey, FeatureFormat>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> impl Iterator<Item = (&FeatureKey, &FeatureFormat)> {
        self.features.iter()
    }

    pub fn feature(&self, key: &str) -> Option<&FeatureFormat> {
        self.features.get(key)
    }

    /// Look up a single descriptor by (feature, variable)
    pub fn get(&self, feature: &str, variable: &str) -> Option<&TweakDescriptor> {
        self.feature(feature)?.variable(variable)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Total number of variables across all features
    pub fn variable_count(&self) -> usize {
        self.features.values().map(FeatureFormat::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TweaksFormat {
        let mut variables = BTreeMap::new();
        variables.insert(
            "showWelcome".to_string(),
            TweakDescriptor::new(TweakValue::Bool(true)),
        );
        variables.insert(
            "greeting".to_string(),
            TweakDescriptor::new(TweakValue::from("hello")),
        );

        let mut features = BTreeMap::new();
        features.insert("onboarding".to_string(), FeatureFormat::new(variables));
        features.insert("empty".to_string(), FeatureFormat::default());
        TweaksFormat::new(features)
    }

    #[test]
    fn test_lookup_and_counts() {
        let tweaks = sample();
        assert_eq!(tweaks.len(), 2);
        assert_eq!(tweaks.variable_count(), 2);

        let descriptor = tweaks.get("onboarding", "showWelcome").unwrap();
        assert_eq!(descriptor.value_type, ValueType::Bool);
        assert_eq!(descriptor.default, TweakValue::Bool(true));
        assert!(tweaks.get("onboarding", "missing").is_none());
        assert!(tweaks.get("missing", "showWelcome").is_none());
    }

    #[test]
    fn test_iteration_is_sorted() {
        let tweaks = sample();
        let features: Vec<_> = tweaks.features().map(|(key, _)| key.as_str()).collect();
        assert_eq!(features, vec!["empty", "onboarding"]);

        let variables: Vec<_> = tweaks
            .feature("onboarding")
            .unwrap()
            .variables()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(variables, vec!["greeting", "showWelcome"]);
    }

    #[test]
    fn test_range() {
        let range = ValueRange {
            min: Some(0.0),
            max: Some(10.0),
        };
        assert!(range.contains(0.0));
        assert!(range.contains(10.0));
        assert!(!range.contains(10.5));
        assert_eq!(range.to_string(), "0..=10");

        let open = ValueRange {
            min: Some(1.5),
            max: None,
        };
        assert!(open.contains(1e9));
        assert_eq!(open.to_string(), "1.5..");
    }
}
