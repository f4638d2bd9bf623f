//! Tweaks Documents
//!
//! Schema model and the loader that validates documents into it.

pub mod loader;
pub mod schema;

pub use loader::{load_path, load_str, DocumentFormat};
pub use schema::{FeatureFormat, FeatureKey, TweakDescriptor, TweaksFormat, ValueRange, VariableKey};
