//! # snapstore-serialize
//!
//! Serialization pipeline for snapstore.
//!
//! This crate provides:
//! - The [`Serializer`] trait and closure adapters
//! - [`SerializerChain`], a left-to-right fold turning a value into snapshot text
//! - Built-in serializers and a name-based [`SerializerRegistry`]
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on snapstore-core.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod pipeline;
pub mod registry;

// Re-export commonly used types
pub use builtin::{JsonSerializer, PrettyJsonSerializer, StringSerializer, TrimSerializer};
pub use pipeline::{serializer_fn, FnSerializer, Serializer, SerializerChain, Stage};
pub use registry::{builtin_registry, default_chain, SerializerRegistry};
