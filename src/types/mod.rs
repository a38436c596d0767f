//! Core type definitions for objkopy

mod category;
mod descriptor;
mod error;
mod value;

pub use category::{ContainerKind, PrimitiveKind, TypeCategory, WrapperKind};
pub use descriptor::{
    names_match, ElementType, EnumInfo, ExclusionSet, FieldDescriptor, FieldType, TypeDescriptor,
    TypeKey, TypeShape,
};
pub use error::{BoxError, CopyError, ErrorKind, Result};
pub use value::{EnumValue, FieldValue, Payload, Primitive, Scalar};
