//! Tweaks Loader
//!
//! Reads a tweaks document and validates it into a [`TweaksFormat`]. The
//! checks run as whole-document passes in a fixed order (shape, feature
//! keys, variable keys, type tags, defaults) and stop at the first failure.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::{Map, Value};

use super::schema::{FeatureFormat, TweakDescriptor, TweaksFormat, ValueRange};
use crate::error::TweakError;
use crate::value::{TweakValue, ValueType};

/// Characters that may not appear in feature or variable keys
const PATH_SEPARATORS: [char; 3] = ['/', '\\', '.'];

/// Syntax of a tweaks document
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Map entries in document order, duplicates included
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
    type Value = Entries<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, V>()? {
            entries.push(entry);
        }
        Ok(Entries(entries))
    }
}

type RawDocument = Entries<Entries<Value>>;

/// Load and validate a tweaks document from disk
///
/// Without an explicit format, the file extension decides.
pub fn load_path(path: &Path, format: Option<DocumentFormat>) -> Result<TweaksFormat, TweakError> {
    let format = match format.or_else(|| DocumentFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(TweakError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
    };

    let text = std::fs::read_to_string(path).map_err(|e| TweakError::io(path, e))?;
    log::debug!("Read {} bytes from {}", text.len(), path.display());

    load_str(&text, format)
}

/// Load and validate a tweaks document from text
pub fn load_str(text: &str, format: DocumentFormat) -> Result<TweaksFormat, TweakError> {
    let document = parse_document(text, format)?;
    check_shape(&document)?;
    check_feature_keys(&document)?;
    check_variable_keys(&document)?;
    let types = resolve_types(&document)?;
    let tweaks = build_schema(document, &types)?;

    log::debug!(
        "Loaded {} features with {} variables",
        tweaks.len(),
        tweaks.variable_count()
    );
    Ok(tweaks)
}

fn parse_document(text: &str, format: DocumentFormat) -> Result<RawDocument, TweakError> {
    let parsed = match format {
        DocumentFormat::Json => serde_json::from_str::<RawDocument>(text).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str::<RawDocument>(text).map_err(|e| e.to_string()),
    };

    parsed.map_err(|reason| TweakError::MalformedDocument {
        reason: reason.trim_end().to_string(),
    })
}

/// Every descriptor must itself be a mapping
fn check_shape(document: &RawDocument) -> Result<(), TweakError> {
    for (feature, variables) in &document.0 {
        for (variable, descriptor) in &variables.0 {
            if !descriptor.is_object() {
                return Err(TweakError::MalformedDocument {
                    reason: format!(
                        "descriptor of `{}.{}` must be a mapping, found {}",
                        feature,
                        variable,
                        describe(descriptor)
                    ),
                });
            }
        }
    }
    Ok(())
}

fn check_feature_keys(document: &RawDocument) -> Result<(), TweakError> {
    let mut seen = HashSet::new();
    for (feature, _) in &document.0 {
        check_key(feature, "top level")?;
        if !seen.insert(feature.as_str()) {
            return Err(TweakError::DuplicateFeature {
                feature: feature.clone(),
            });
        }
    }
    log::debug!("Feature keys valid ({} features)", seen.len());
    Ok(())
}

fn check_variable_keys(document: &RawDocument) -> Result<(), TweakError> {
    for (feature, variables) in &document.0 {
        let mut seen = HashSet::new();
        for (variable, _) in &variables.0 {
            check_key(variable, &format!("feature `{}`", feature))?;
            if !seen.insert(variable.as_str()) {
                return Err(TweakError::DuplicateVariable {
                    feature: feature.clone(),
                    variable: variable.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_key(key: &str, location: &str) -> Result<(), TweakError> {
    let reason = if key.trim().is_empty() {
        "keys must not be empty"
    } else if key.contains(PATH_SEPARATORS) {
        "keys must not contain '/', '\\' or '.'"
    } else {
        return Ok(());
    };

    Err(TweakError::InvalidKey {
        location: location.to_string(),
        key: key.to_string(),
        reason,
    })
}

/// Resolve every type tag, indexed like the document
fn resolve_types(document: &RawDocument) -> Result<Vec<Vec<ValueType>>, TweakError> {
    document
        .0
        .iter()
        .map(|(feature, variables)| {
            variables
                .0
                .iter()
                .map(|(variable, descriptor)| {
                    let tag = descriptor.as_object().and_then(|props| property(props, "type"));
                    let found = match tag {
                        Some(Value::String(tag)) => match ValueType::from_tag(tag) {
                            Some(value_type) => return Ok(value_type),
                            None => format!("{:?}", tag),
                        },
                        Some(other) => describe(other),
                        None => "(missing)".to_string(),
                    };
                    Err(TweakError::UnsupportedType {
                        feature: feature.clone(),
                        variable: variable.clone(),
                        found,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn build_schema(document: RawDocument, types: &[Vec<ValueType>]) -> Result<TweaksFormat, TweakError> {
    let mut features = BTreeMap::new();

    for ((feature, variables), feature_types) in document.0.into_iter().zip(types) {
        let mut descriptors = BTreeMap::new();
        for ((variable, descriptor), value_type) in variables.0.into_iter().zip(feature_types) {
            let props = match descriptor {
                Value::Object(props) => props,
                other => {
                    return Err(TweakError::MalformedDocument {
                        reason: format!("descriptor of `{}.{}` is {}", feature, variable, describe(&other)),
                    });
                }
            };
            let descriptor = build_descriptor(&feature, &variable, *value_type, props)?;
            descriptors.insert(variable, descriptor);
        }
        features.insert(feature, FeatureFormat::new(descriptors));
    }

    Ok(TweaksFormat::new(features))
}

fn build_descriptor(
    feature: &str,
    variable: &str,
    value_type: ValueType,
    props: Map<String, Value>,
) -> Result<TweakDescriptor, TweakError> {
    let mismatch = |property: &'static str, expected: ValueType, found: String| {
        TweakError::TypeMismatch {
            feature: feature.to_string(),
            variable: variable.to_string(),
            property,
            expected,
            found,
        }
    };
    let numeric = matches!(value_type, ValueType::Integer | ValueType::Float);

    let mut default = None;
    let mut legacy_value = None;
    let mut text = BTreeMap::new();
    let mut bounds: [Option<f64>; 2] = [None, None];
    let mut metadata = BTreeMap::new();

    for (name, value) in props {
        match name.to_ascii_lowercase().as_str() {
            "type" => {}
            "default" => default = Some(value),
            "value" => legacy_value = Some(value),
            key @ ("title" | "description" | "group" | "generatedpropertyname") => {
                let property = match key {
                    "title" => "title",
                    "description" => "description",
                    "group" => "group",
                    _ => "generatedPropertyName",
                };
                match value {
                    Value::String(s) => {
                        text.insert(property, s);
                    }
                    other => return Err(mismatch(property, ValueType::String, describe(&other))),
                }
            }
            key @ ("min" | "max") if numeric => {
                let (property, slot) = if key == "min" { ("min", 0) } else { ("max", 1) };
                match value.as_f64() {
                    Some(bound) => bounds[slot] = Some(bound),
                    None => return Err(mismatch(property, value_type, describe(&value))),
                }
            }
            _ => {
                metadata.insert(name, value);
            }
        }
    }

    let raw_default = match (default, legacy_value) {
        (Some(default), Some(_)) => {
            log::warn!(
                "`{}.{}` declares both `default` and `value`; using `default`",
                feature,
                variable
            );
            default
        }
        (Some(value), None) | (None, Some(value)) => value,
        (None, None) => return Err(mismatch("default", value_type, "missing".to_string())),
    };

    let default = typed_default(value_type, &raw_default)
        .ok_or_else(|| mismatch("default", value_type, describe(&raw_default)))?;

    let range = match bounds {
        [None, None] => None,
        [Some(min), Some(max)] if min > max => {
            return Err(TweakError::InvertedRange {
                feature: feature.to_string(),
                variable: variable.to_string(),
                min,
                max,
            });
        }
        [min, max] => Some(ValueRange { min, max }),
    };
    if let (Some(range), Some(value)) = (range, default.as_f64()) {
        if !range.contains(value) {
            return Err(TweakError::DefaultOutOfRange {
                feature: feature.to_string(),
                variable: variable.to_string(),
                range: range.to_string(),
            });
        }
    }

    Ok(TweakDescriptor {
        value_type,
        default,
        title: text.remove("title"),
        description: text.remove("description"),
        group: text.remove("group"),
        property_name: text.remove("generatedPropertyName"),
        range,
        metadata,
    })
}

fn typed_default(value_type: ValueType, value: &Value) -> Option<TweakValue> {
    match value_type {
        ValueType::Bool => value.as_bool().map(TweakValue::Bool),
        ValueType::Integer => value.as_i64().map(TweakValue::Integer),
        ValueType::Float => value.as_f64().map(TweakValue::Float),
        ValueType::String => value.as_str().map(TweakValue::from),
    }
}

/// Case-insensitive descriptor property lookup
fn property<'a>(props: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    props
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("a boolean ({})", b),
        Value::Number(n) => format!("a number ({})", n),
        Value::String(s) => format!("a string ({:?})", s),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "a mapping".to_string(),
    }
}
