//! Tweak Accessor Generator
//!
//! Turns a declarative tweaks document (features, each with typed
//! variables) into Rust source exposing one strongly-typed accessor per
//! variable.
//!
//! This library provides:
//! - Loading and validating tweaks documents (JSON or TOML)
//! - Deterministic accessor code generation
//! - Runtime support types used by the generated code
//! - Configuration management for the command-line tool

pub mod codegen;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod runtime;
pub mod tweaks;
pub mod value;

// Re-exports for clean public API
pub use codegen::{render, EmitTarget, EmptySchemaPolicy};
pub use config::Config;
pub use error::TweakError;
pub use pipeline::{generate, generate_file};
pub use tweaks::{load_path, load_str, DocumentFormat, TweaksFormat};
pub use value::{TweakValue, ValueType};
