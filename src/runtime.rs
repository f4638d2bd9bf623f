//! Runtime Support
//!
//! Types referenced by generated accessors. An accessor owns whatever
//! [`TweakProvider`] it is constructed with; there is no global instance.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

pub use crate::value::{TweakValue, ValueType};

/// Source of runtime overrides for tweak values
pub trait TweakProvider {
    /// Override for `(feature, variable)`, or `None` to use the default
    fn value(&self, feature: &str, variable: &str) -> Option<TweakValue>;
}

impl<T: TweakProvider + ?Sized> TweakProvider for &T {
    fn value(&self, feature: &str, variable: &str) -> Option<TweakValue> {
        (**self).value(feature, variable)
    }
}

impl<T: TweakProvider + ?Sized> TweakProvider for Box<T> {
    fn value(&self, feature: &str, variable: &str) -> Option<TweakValue> {
        (**self).value(feature, variable)
    }
}

impl<T: TweakProvider + ?Sized> TweakProvider for Rc<T> {
    fn value(&self, feature: &str, variable: &str) -> Option<TweakValue> {
        (**self).value(feature, variable)
    }
}

impl<T: TweakProvider + ?Sized> TweakProvider for Arc<T> {
    fn value(&self, feature: &str, variable: &str) -> Option<TweakValue> {
        (**self).value(feature, variable)
    }
}

/// Provider without overrides; every accessor returns its default
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl TweakProvider for NoOverrides {
    fn value(&self, _feature: &str, _variable: &str) -> Option<TweakValue> {
        None
    }
}

/// In-memory override table
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    overrides: HashMap<(String, String), TweakValue>,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override, returning the previous one
    pub fn set(
        &mut self,
        feature: &str,
        variable: &str,
        value: impl Into<TweakValue>,
    ) -> Option<TweakValue> {
        self.overrides
            .insert((feature.to_string(), variable.to_string()), value.into())
    }

    pub fn with(mut self, feature: &str, variable: &str, value: impl Into<TweakValue>) -> Self {
        self.set(feature, variable, value);
        self
    }

    pub fn remove(&mut self, feature: &str, variable: &str) -> Option<TweakValue> {
        self.overrides
            .remove(&(feature.to_string(), variable.to_string()))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

impl TweakProvider for MapProvider {
    fn value(&self, feature: &str, variable: &str) -> Option<TweakValue> {
        self.overrides
            .get(&(feature.to_string(), variable.to_string()))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_provider_overrides() {
        let mut provider = MapProvider::new().with("onboarding", "showWelcome", false);
        assert_eq!(
            provider.value("onboarding", "showWelcome"),
            Some(TweakValue::Bool(false))
        );
        assert_eq!(provider.value("onboarding", "other"), None);

        let previous = provider.set("onboarding", "showWelcome", true);
        assert_eq!(previous, Some(TweakValue::Bool(false)));
        assert_eq!(provider.len(), 1);

        provider.remove("onboarding", "showWelcome");
        assert!(provider.is_empty());
    }

    #[test]
    fn test_provider_through_smart_pointers() {
        let provider = MapProvider::new().with("a", "b", 7_i64);
        let shared: Arc<dyn TweakProvider> = Arc::new(provider.clone());
        let boxed: Box<dyn TweakProvider> = Box::new(provider.clone());

        assert_eq!(shared.value("a", "b"), Some(TweakValue::Integer(7)));
        assert_eq!(boxed.value("a", "b"), Some(TweakValue::Integer(7)));
        assert_eq!((&provider).value("a", "b"), Some(TweakValue::Integer(7)));
        assert_eq!(NoOverrides.value("a", "b"), None);
    }
}
