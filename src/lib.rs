//! # objkopy - Structural Object Copies
//!
//! Clone records and project them into other record shapes by matching
//! fields by name.
//!
//! Types opt in with the [`copyable!`] and [`copyable_enum!`] macros, which
//! generate a static field table. A [`Copier`] walks that table, coerces each
//! value to the destination's declared type and deep-copies nested values
//! through a serialization backend, so a copy never shares mutable state with
//! its source.

// Module declarations
pub mod codec;
pub mod coerce;
pub mod commands;
pub mod config;
pub mod engine;
pub mod introspect;
pub mod types;

// Re-export commonly used types
pub use codec::{DeepCloneable, JsonBackend, SerializationBackend};
pub use config::Config;
pub use engine::{CopyPlan, Copier};
pub use introspect::{Copyable, CopyableEnum, FieldKind, Introspector, NullableKind};
pub use types::{
    CopyError, EnumInfo, ErrorKind, FieldDescriptor, FieldType, FieldValue, TypeCategory,
    TypeDescriptor, TypeKey,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
