//! Field kinds: static type information plus conversion to and from
//! runtime [`FieldValue`]s

use super::copyable::{Copyable, CopyableEnum};
use crate::codec::{Bytes, SerializationBackend};
use crate::types::{
    ContainerKind, CopyError, ElementType, EnumValue, FieldType, FieldValue, Payload, Primitive,
    PrimitiveKind, Result, Scalar, TypeKey, TypeShape, WrapperKind,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use uuid::Uuid;

/// A type that can appear as a field of a [`Copyable`] record
///
/// `to_value` is the getter side of a copy: scalars are read as-is, while
/// nested records and containers are serialized into a [`Payload`].
/// `from_value` is the setter side: it turns a (possibly coerced) value into
/// the field's own declared type. Assigning [`FieldValue::Absent`] yields the
/// type's zero value.
pub trait FieldKind: Sized + 'static {
    /// Declared type of the field, known without an instance
    fn field_type() -> FieldType;

    fn to_value<B: SerializationBackend>(&self, backend: &B) -> Result<FieldValue>;

    fn from_value<B: SerializationBackend>(value: FieldValue, backend: &B) -> Result<Self>;
}

/// A field type that may also be declared as `Option<Self>`
///
/// `Option<T>` reads `None` as absent and assigns absent as `None`; any other
/// value goes through `T` itself. The [`copyable!`](crate::copyable) and
/// [`copyable_enum!`](crate::copyable_enum) macros implement this for the
/// types they declare.
pub trait NullableKind: FieldKind {
    /// Shape of `Option<Self>`, the same as `Self` unless overridden
    fn nullable_shape() -> TypeShape {
        Self::field_type().shape()
    }
}

impl<T: NullableKind> FieldKind for Option<T> {
    fn field_type() -> FieldType {
        FieldType::new(TypeKey::of::<Self>(), T::nullable_shape())
    }

    fn to_value<B: SerializationBackend>(&self, backend: &B) -> Result<FieldValue> {
        match self {
            Some(inner) => inner.to_value(backend),
            None => Ok(FieldValue::Absent),
        }
    }

    fn from_value<B: SerializationBackend>(value: FieldValue, backend: &B) -> Result<Self> {
        match value {
            FieldValue::Absent => Ok(None),
            value => T::from_value(value, backend).map(Some),
        }
    }
}

/// Error for a value that cannot be assigned to a `T`
pub(crate) fn mismatch<T: ?Sized>(found: &FieldValue) -> CopyError {
    CopyError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: found.describe(),
    }
}

/// Serialize a nested record into a payload
pub fn object_to_value<T, B>(value: &T, backend: &B) -> Result<FieldValue>
where
    T: Serialize + ?Sized,
    B: SerializationBackend,
{
    backend
        .serialize(value)
        .map(|text| FieldValue::Serialized(Payload::object(text)))
}

/// Materialize a nested record; absent values produce a fresh instance
pub fn object_from_value<T, B>(value: FieldValue, backend: &B) -> Result<T>
where
    T: Copyable,
    B: SerializationBackend,
{
    decode(value, backend, T::instantiate)
}

pub fn enum_to_value<E: CopyableEnum>(value: &E) -> FieldValue {
    FieldValue::Enum(EnumValue {
        enum_name: E::enum_info().name,
        constant: value.constant_name(),
    })
}

pub fn enum_from_value<E: CopyableEnum>(value: FieldValue) -> Result<E> {
    match value {
        FieldValue::Absent => Ok(E::default()),
        FieldValue::Enum(constant) => E::from_constant(constant.constant)
            .ok_or_else(|| mismatch::<E>(&FieldValue::Enum(constant))),
        other => Err(mismatch::<E>(&other)),
    }
}

fn decode<T, B>(value: FieldValue, backend: &B, zero: impl FnOnce() -> Result<T>) -> Result<T>
where
    T: DeserializeOwned,
    B: SerializationBackend,
{
    match value {
        FieldValue::Absent => zero(),
        FieldValue::Serialized(payload) => backend.deserialize(payload.text()),
        other => Err(mismatch::<T>(&other)),
    }
}

fn container_to_value<C, B>(container: &C, len: usize, backend: &B) -> Result<FieldValue>
where
    C: Serialize,
    B: SerializationBackend,
{
    backend
        .serialize(container)
        .map(|text| FieldValue::Serialized(Payload::container(text, len)))
}

// ============================================================================
// Primitives and Option<primitive>
// ============================================================================

macro_rules! impl_primitive_kind {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldKind for $ty {
                fn field_type() -> FieldType {
                    FieldType::primitive::<$ty>(PrimitiveKind::$variant)
                }

                fn to_value<B: SerializationBackend>(&self, _backend: &B) -> Result<FieldValue> {
                    Ok(FieldValue::Primitive(Primitive::$variant(*self)))
                }

                fn from_value<B: SerializationBackend>(value: FieldValue, _backend: &B) -> Result<Self> {
                    match value {
                        FieldValue::Absent => Ok(<$ty>::default()),
                        FieldValue::Primitive(primitive) => {
                            match primitive.widen_to(PrimitiveKind::$variant) {
                                Some(Primitive::$variant(v)) => Ok(v),
                                _ => Err(mismatch::<$ty>(&FieldValue::Primitive(primitive))),
                            }
                        }
                        other => Err(mismatch::<$ty>(&other)),
                    }
                }
            }

            impl NullableKind for $ty {
                fn nullable_shape() -> TypeShape {
                    TypeShape::Boxed(WrapperKind::Boxed(PrimitiveKind::$variant))
                }
            }
        )*
    };
}

impl_primitive_kind!(
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
);

// ============================================================================
// Text, date/time and identifier wrappers
// ============================================================================

macro_rules! impl_scalar_kind {
    ($($ty:ty => $variant:ident, zero = $zero:expr);* $(;)?) => {
        $(
            impl FieldKind for $ty {
                fn field_type() -> FieldType {
                    FieldType::boxed::<$ty>(WrapperKind::$variant)
                }

                fn to_value<B: SerializationBackend>(&self, _backend: &B) -> Result<FieldValue> {
                    Ok(FieldValue::Scalar(Scalar::$variant(self.clone())))
                }

                fn from_value<B: SerializationBackend>(value: FieldValue, _backend: &B) -> Result<Self> {
                    match value {
                        FieldValue::Absent => Ok($zero),
                        FieldValue::Scalar(Scalar::$variant(v)) => Ok(v),
                        other => Err(mismatch::<$ty>(&other)),
                    }
                }
            }

            impl NullableKind for $ty {}
        )*
    };
}

impl_scalar_kind!(
    String => Text, zero = String::new();
    NaiveDate => Date, zero = NaiveDate::default();
    NaiveTime => Time, zero = NaiveTime::default();
    NaiveDateTime => DateTime, zero = NaiveDateTime::default();
    DateTime<Utc> => Instant, zero = DateTime::<Utc>::default();
    Uuid => Uuid, zero = Uuid::nil();
);

// ============================================================================
// Collections and maps
// ============================================================================

macro_rules! impl_collection_kind {
    ($($container:ident => $kind:ident [$($bound:tt)*]),* $(,)?) => {
        $(
            impl<T> FieldKind for $container<T>
            where
                T: Serialize + DeserializeOwned + 'static $($bound)*,
            {
                fn field_type() -> FieldType {
                    FieldType::collection::<Self>(ContainerKind::$kind, ElementType::of::<T>())
                }

                fn to_value<B: SerializationBackend>(&self, backend: &B) -> Result<FieldValue> {
                    container_to_value(self, self.len(), backend)
                }

                fn from_value<B: SerializationBackend>(value: FieldValue, backend: &B) -> Result<Self> {
                    decode(value, backend, || Ok(Self::default()))
                }
            }
        )*
    };
}

impl_collection_kind!(
    Vec => Vec [],
    VecDeque => VecDeque [],
    HashSet => HashSet [+ Eq + Hash],
    BTreeSet => BTreeSet [+ Ord],
);

macro_rules! impl_map_kind {
    ($($container:ident => $kind:ident [$($bound:tt)*]),* $(,)?) => {
        $(
            impl<K, V> FieldKind for $container<K, V>
            where
                K: Serialize + DeserializeOwned + 'static $($bound)*,
                V: Serialize + DeserializeOwned + 'static,
            {
                fn field_type() -> FieldType {
                    FieldType::map::<Self>(
                        ContainerKind::$kind,
                        ElementType::of::<K>(),
                        ElementType::of::<V>(),
                    )
                }

                fn to_value<B: SerializationBackend>(&self, backend: &B) -> Result<FieldValue> {
                    container_to_value(self, self.len(), backend)
                }

                fn from_value<B: SerializationBackend>(value: FieldValue, backend: &B) -> Result<Self> {
                    decode(value, backend, || Ok(Self::default()))
                }
            }
        )*
    };
}

impl_map_kind!(
    HashMap => HashMap [+ Eq + Hash],
    BTreeMap => BTreeMap [+ Ord],
);

// ============================================================================
// Opaque values
// ============================================================================

impl FieldKind for Bytes {
    fn field_type() -> FieldType {
        FieldType::object::<Self>()
    }

    fn to_value<B: SerializationBackend>(&self, backend: &B) -> Result<FieldValue> {
        object_to_value(self, backend)
    }

    fn from_value<B: SerializationBackend>(value: FieldValue, backend: &B) -> Result<Self> {
        decode(value, backend, || Ok(Bytes::default()))
    }
}

impl FieldKind for serde_json::Value {
    fn field_type() -> FieldType {
        FieldType::object::<Self>()
    }

    fn to_value<B: SerializationBackend>(&self, backend: &B) -> Result<FieldValue> {
        match self {
            serde_json::Value::Null => Ok(FieldValue::Absent),
            document => object_to_value(document, backend),
        }
    }

    fn from_value<B: SerializationBackend>(value: FieldValue, backend: &B) -> Result<Self> {
        decode(value, backend, || Ok(serde_json::Value::Null))
    }
}
