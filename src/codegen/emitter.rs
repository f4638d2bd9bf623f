//! Accessor Emitter
//!
//! Renders a [`TweaksFormat`] into Rust source. Every identifier is planned
//! and checked for collisions before any text is produced, and the output
//! depends only on the schema and the [`EmitTarget`]: features and variables
//! are visited in key order, so key order in the document never matters.

use std::collections::HashMap;
use std::fmt::Write;

use super::ident::{self, Identifier};
use crate::error::TweakError;
use crate::tweaks::{TweakDescriptor, TweaksFormat};
use crate::value::ValueType;

pub const DEFAULT_ACCESSOR_NAME: &str = "GeneratedTweakAccessor";
pub const DEFAULT_RUNTIME_PATH: &str = "tweakgen::runtime";

/// Constant holding the feature key inside each `keys` module
const FEATURE_CONSTANT: &str = "FEATURE";

/// Inherent methods every accessor defines
const RESERVED_METHODS: [&str; 3] = ["new", "provider", "into_provider"];

const RESERVED: &str = "(reserved)";

/// Names the generated source already uses at the accessor's scope
const RESERVED_TYPE_NAMES: [&str; 3] = ["TweakProvider", "keys", "P"];

/// What to do with a document that declares no features
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptySchemaPolicy {
    /// Emit an accessor without tweak methods
    #[default]
    Allow,
    /// Fail with [`TweakError::EmptySchema`]
    Reject,
}

/// Output target descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitTarget {
    /// Name of the generated accessor struct
    pub accessor_name: String,
    /// Module path providing `TweakProvider`
    pub runtime_path: String,
    /// File name recorded in the header comment
    pub source_name: Option<String>,
    pub empty_schema: EmptySchemaPolicy,
}

impl Default for EmitTarget {
    fn default() -> Self {
        Self {
            accessor_name: DEFAULT_ACCESSOR_NAME.to_string(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            source_name: None,
            empty_schema: EmptySchemaPolicy::default(),
        }
    }
}

impl EmitTarget {
    pub fn new(accessor_name: impl Into<String>) -> Self {
        Self {
            accessor_name: accessor_name.into(),
            ..Self::default()
        }
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    pub fn with_empty_schema(mut self, policy: EmptySchemaPolicy) -> Self {
        self.empty_schema = policy;
        self
    }
}

struct FeaturePlan<'a> {
    key: &'a str,
    module: String,
    variables: Vec<VariablePlan<'a>>,
}

struct VariablePlan<'a> {
    key: &'a str,
    constant: String,
    method: String,
    descriptor: &'a TweakDescriptor,
}

/// Identifiers claimed so far, with the key that claimed each
#[derive(Default)]
struct NameTable {
    owners: HashMap<String, String>,
}

impl NameTable {
    fn reserve(&mut self, name: &str) {
        self.owners.insert(name.to_string(), RESERVED.to_string());
    }

    fn claim(&mut self, name: &str, owner: String) -> Result<(), TweakError> {
        match self.owners.get(name) {
            Some(first) => Err(TweakError::IdentifierCollision {
                identifier: name.to_string(),
                first: first.clone(),
                second: owner,
            }),
            None => {
                self.owners.insert(name.to_string(), owner);
                Ok(())
            }
        }
    }
}

fn derive(key: &str) -> Result<Identifier, TweakError> {
    Identifier::derive(key).ok_or_else(|| TweakError::InvalidIdentifier {
        key: key.to_string(),
    })
}

/// Render the accessor source for `tweaks`
pub fn render(tweaks: &TweaksFormat, target: &EmitTarget) -> Result<String, TweakError> {
    check_target(target)?;

    if tweaks.is_empty() {
        match target.empty_schema {
            EmptySchemaPolicy::Reject => return Err(TweakError::EmptySchema),
            EmptySchemaPolicy::Allow => log::warn!("Tweaks document declares no features"),
        }
    }

    let features = plan(tweaks)?;

    let mut out = String::new();
    write_header(&mut out, target);
    write_keys(&mut out, &features);
    write_accessor(&mut out, target, &features);

    log::debug!(
        "Rendered {} with {} accessor methods ({} bytes)",
        target.accessor_name,
        tweaks.variable_count(),
        out.len()
    );
    Ok(out)
}

fn check_target(target: &EmitTarget) -> Result<(), TweakError> {
    let name = target.accessor_name.as_str();
    if !ident::is_type_name(name) || RESERVED_TYPE_NAMES.contains(&name) {
        return Err(TweakError::InvalidIdentifier {
            key: target.accessor_name.clone(),
        });
    }
    if !ident::is_module_path(&target.runtime_path) {
        return Err(TweakError::InvalidIdentifier {
            key: target.runtime_path.clone(),
        });
    }
    Ok(())
}

fn plan(tweaks: &TweaksFormat) -> Result<Vec<FeaturePlan<'_>>, TweakError> {
    let mut modules = NameTable::default();
    let mut methods = NameTable::default();
    for name in RESERVED_METHODS {
        methods.reserve(name);
    }

    let mut features = Vec::with_capacity(tweaks.len());
    for (feature_key, feature) in tweaks.features() {
        let feature_ident = derive(feature_key)?;
        let module = ident::escape_keyword(feature_ident.snake_case());
        modules.claim(&module, feature_key.clone())?;

        let mut constants = NameTable::default();
        constants.reserve(FEATURE_CONSTANT);

        let mut variables = Vec::with_capacity(feature.len());
        for (variable_key, descriptor) in feature.variables() {
            let owner = format!("{}.{}", feature_key, variable_key);

            let variable_ident = derive(variable_key)?;
            let constant = variable_ident.screaming_case();
            constants.claim(&constant, owner.clone())?;

            let method = match &descriptor.property_name {
                Some(name) => ident::escape_keyword(derive(name)?.snake_case()),
                None => format!(
                    "{}_{}",
                    feature_ident.snake_case(),
                    variable_ident.snake_case()
                ),
            };
            methods.claim(&method, owner)?;

            variables.push(VariablePlan {
                key: variable_key,
                constant,
                method,
                descriptor,
            });
        }

        log::debug!(
            "Planned feature `{}` as module `{}` ({} variables)",
            feature_key,
            module,
            variables.len()
        );
        features.push(FeaturePlan {
            key: feature_key,
            module,
            variables,
        });
    }

    Ok(features)
}

fn write_header(out: &mut String, target: &EmitTarget) {
    match &target.source_name {
        Some(source) => {
            let _ = writeln!(
                out,
                "// @generated by tweakgen from {}. Do not edit.",
                source.escape_debug()
            );
        }
        None => out.push_str("// @generated by tweakgen. Do not edit.\n"),
    }
    out.push('\n');
    let _ = writeln!(out, "use {}::TweakProvider;", target.runtime_path);
    out.push('\n');
}

fn write_keys(out: &mut String, features: &[FeaturePlan<'_>]) {
    out.push_str("/// Feature and variable keys declared in the tweaks document.\n");
    if features.is_empty() {
        out.push_str("pub mod keys {}\n");
        return;
    }

    out.push_str("pub mod keys {\n");
    for (index, feature) in features.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "    pub mod {} {{", feature.module);
        let _ = writeln!(
            out,
            "        pub const {}: &str = {:?};",
            FEATURE_CONSTANT, feature.key
        );
        for variable in &feature.variables {
            let _ = writeln!(
                out,
                "        pub const {}: &str = {:?};",
                variable.constant, variable.key
            );
        }
        out.push_str("    }\n");
    }
    out.push_str("}\n");
}

fn write_accessor(out: &mut String, target: &EmitTarget, features: &[FeaturePlan<'_>]) {
    let name = &target.accessor_name;

    out.push('\n');
    out.push_str("/// Typed accessors for the tweaks declared in the tweaks document.\n");
    out.push_str("#[derive(Debug, Clone)]\n");
    let _ = writeln!(out, "pub struct {}<P> {{", name);
    out.push_str("    provider: P,\n");
    out.push_str("}\n");
    out.push('\n');
    let _ = writeln!(out, "impl<P: TweakProvider> {}<P> {{", name);
    out.push_str("    pub fn new(provider: P) -> Self {\n");
    out.push_str("        Self { provider }\n");
    out.push_str("    }\n");
    out.push('\n');
    out.push_str("    pub fn provider(&self) -> &P {\n");
    out.push_str("        &self.provider\n");
    out.push_str("    }\n");
    out.push('\n');
    out.push_str("    pub fn into_provider(self) -> P {\n");
    out.push_str("        self.provider\n");
    out.push_str("    }\n");

    for feature in features {
        for variable in &feature.variables {
            out.push('\n');
            write_method(out, feature, variable);
        }
    }
    out.push_str("}\n");
}

fn write_method(out: &mut String, feature: &FeaturePlan<'_>, variable: &VariablePlan<'_>) {
    let descriptor = variable.descriptor;

    for line in doc_lines(feature.key, variable.key, descriptor) {
        if line.is_empty() {
            out.push_str("    ///\n");
        } else {
            let _ = writeln!(out, "    /// {}", line);
        }
    }

    let (extract, fallback) = match descriptor.value_type {
        ValueType::Bool => ("value.as_bool()", "unwrap_or"),
        ValueType::Integer => ("value.as_i64()", "unwrap_or"),
        ValueType::Float => ("value.as_f64()", "unwrap_or"),
        ValueType::String => ("value.into_string()", "unwrap_or_else"),
    };
    let default = match descriptor.value_type {
        ValueType::String => format!("|| {}.to_string()", descriptor.default.to_rust_literal()),
        _ => descriptor.default.to_rust_literal(),
    };

    let _ = writeln!(
        out,
        "    pub fn {}(&self) -> {} {{",
        variable.method,
        descriptor.value_type.rust_type()
    );
    out.push_str("        self.provider\n");
    let _ = writeln!(
        out,
        "            .value(keys::{module}::{feature}, keys::{module}::{variable})",
        module = feature.module,
        feature = FEATURE_CONSTANT,
        variable = variable.constant
    );
    let _ = writeln!(out, "            .and_then(|value| {})", extract);
    let _ = writeln!(out, "            .{}({})", fallback, default);
    out.push_str("    }\n");
}

/// Split document text into pieces that fit on a `///` line
///
/// Any control character other than a tab ends a line, so neither a line
/// break nor a bare carriage return reaches the generated comment.
fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_control() && c != '\t')
        .map(str::trim_end)
        .filter(|line| !line.trim_start().is_empty())
}

/// Doc comment paragraphs for one accessor, blank strings separating them
fn doc_lines(feature: &str, variable: &str, descriptor: &TweakDescriptor) -> Vec<String> {
    let mut paragraphs: Vec<Vec<String>> = Vec::new();

    for text in [&descriptor.title, &descriptor.description].into_iter().flatten() {
        let lines: Vec<String> = text_lines(text).map(str::to_string).collect();
        if !lines.is_empty() {
            paragraphs.push(lines);
        }
    }

    let mut details = vec![format!(
        "Feature `{}`, variable `{}`.",
        feature.escape_debug(),
        variable.escape_debug()
    )];
    if let Some(group) = &descriptor.group {
        let group: Vec<&str> = text_lines(group).map(str::trim).collect();
        if !group.is_empty() {
            details.push(format!("Group: {}.", group.join(" ")));
        }
    }
    if let Some(range) = &descriptor.range {
        details.push(format!("Range: `{}`.", range));
    }
    details.push(format!(
        "Defaults to `{}`.",
        descriptor.default.to_rust_literal()
    ));
    paragraphs.push(details);

    let mut lines = Vec::new();
    for (index, paragraph) in paragraphs.into_iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.extend(paragraph);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweaks::{load_str, DocumentFormat};

    fn load(text: &str) -> TweaksFormat {
        load_str(text, DocumentFormat::Json).expect("valid document")
    }

    #[test]
    fn test_reserved_method_names() {
        let tweaks = load(r#"{"misc": {"x": {"type": "bool", "default": true, "generatedPropertyName": "provider"}}}"#);
        let err = render(&tweaks, &EmitTarget::default()).unwrap_err();
        assert!(matches!(
            err,
            TweakError::IdentifierCollision { ref identifier, ref first, .. }
                if identifier == "provider" && first == RESERVED
        ));
    }

    #[test]
    fn test_reserved_feature_constant() {
        let tweaks = load(r#"{"misc": {"feature": {"type": "bool", "default": true}}}"#);
        let err = render(&tweaks, &EmitTarget::default()).unwrap_err();
        assert!(matches!(
            err,
            TweakError::IdentifierCollision { ref identifier, .. } if identifier == "FEATURE"
        ));
    }

    #[test]
    fn test_cross_feature_method_collision() {
        // "a" + "bC" and "aB" + "c" both give a_b_c
        let tweaks = load(
            r#"{"a": {"bC": {"type": "int", "default": 1}},
                "aB": {"c": {"type": "int", "default": 2}}}"#,
        );
        let err = render(&tweaks, &EmitTarget::default()).unwrap_err();
        assert!(matches!(
            err,
            TweakError::IdentifierCollision { ref identifier, .. } if identifier == "a_b_c"
        ));
    }

    #[test]
    fn test_keyword_feature_module() {
        let tweaks = load(r#"{"type": {"enabled": {"type": "bool", "default": false}}}"#);
        let source = render(&tweaks, &EmitTarget::default()).unwrap();
        assert!(source.contains("    pub mod type_ {\n"));
        assert!(source.contains("keys::type_::FEATURE, keys::type_::ENABLED"));
        assert!(source.contains("pub fn type_enabled(&self) -> bool {"));
    }

    #[test]
    fn test_invalid_target() {
        let tweaks = TweaksFormat::default();
        let err = render(&tweaks, &EmitTarget::new("Not-A-Type")).unwrap_err();
        assert!(matches!(err, TweakError::InvalidIdentifier { .. }));

        for name in ["Self", "TweakProvider", "keys", "P"] {
            assert!(
                matches!(
                    render(&tweaks, &EmitTarget::new(name)),
                    Err(TweakError::InvalidIdentifier { ref key }) if key == name
                ),
                "{} accepted as accessor name",
                name
            );
        }

        let target = EmitTarget {
            runtime_path: "tweakgen::".to_string(),
            ..EmitTarget::default()
        };
        assert!(matches!(
            render(&tweaks, &target),
            Err(TweakError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn test_doc_lines() {
        let tweaks = load(
            r#"{"ui": {"columns": {"type": "int", "default": 3, "title": "Columns",
                "description": "How many columns\nto show.", "group": "Layout", "min": 1, "max": 6}}}"#,
        );
        let descriptor = tweaks.get("ui", "columns").unwrap();
        assert_eq!(
            doc_lines("ui", "columns", descriptor),
            vec![
                "Columns",
                "",
                "How many columns",
                "to show.",
                "",
                "Feature `ui`, variable `columns`.",
                "Group: Layout.",
                "Range: `1..=6`.",
                "Defaults to `3`.",
            ]
        );
    }

    #[test]
    fn test_doc_lines_confine_document_text() {
        let tweaks = load(
            r#"{"ui": {"a\nb": {"type": "bool", "default": true, "title": "one\rtwo",
                "group": "Layout\n}\nfn injected() {"}}}"#,
        );
        let descriptor = tweaks.get("ui", "a\nb").unwrap();
        assert_eq!(
            doc_lines("ui", "a\nb", descriptor),
            vec![
                "one",
                "two",
                "",
                "Feature `ui`, variable `a\\nb`.",
                "Group: Layout } fn injected() {.",
                "Defaults to `true`.",
            ]
        );

        let source = render(&tweaks, &EmitTarget::default()).unwrap();
        assert!(!source.contains('\r'));
        for line in source.lines().filter(|line| line.contains("injected") || line.contains("two")) {
            assert!(line.starts_with("    /// "), "{:?} escaped its doc comment", line);
        }
    }
}
