//! Code Generation
//!
//! Identifier derivation and the accessor emitter.

pub mod emitter;
pub mod ident;

pub use emitter::{render, EmitTarget, EmptySchemaPolicy, DEFAULT_ACCESSOR_NAME, DEFAULT_RUNTIME_PATH};
pub use ident::Identifier;
