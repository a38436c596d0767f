//! Wrapper-type registry
//!
//! Types listed here are copied by value through the serialization backend
//! instead of being walked field by field.

use crate::types::{FieldType, PrimitiveKind, TypeKey, WrapperKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::any::TypeId;
use std::collections::HashMap;
use uuid::Uuid;

/// Fixed table of wrapper types
#[derive(Debug, Clone)]
pub struct WrapperRegistry {
    kinds: HashMap<TypeId, WrapperKind>,
}

macro_rules! register_wrappers {
    ($registry:expr, $($ty:ty => $kind:expr),* $(,)?) => {
        $(
            $registry.insert::<$ty>($kind);
            $registry.insert::<Option<$ty>>($kind);
        )*
    };
}

macro_rules! register_boxed {
    ($registry:expr, $($ty:ty => $kind:ident),* $(,)?) => {
        $(
            $registry.insert::<Option<$ty>>(WrapperKind::Boxed(PrimitiveKind::$kind));
        )*
    };
}

impl WrapperRegistry {
    /// Boxed primitives, text, date/time types and identifiers
    pub fn standard() -> Self {
        let mut registry = Self {
            kinds: HashMap::new(),
        };

        register_boxed!(
            registry,
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

        register_wrappers!(
            registry,
            String => WrapperKind::Text,
            NaiveDate => WrapperKind::Date,
            NaiveTime => WrapperKind::Time,
            NaiveDateTime => WrapperKind::DateTime,
            DateTime<Utc> => WrapperKind::Instant,
            Uuid => WrapperKind::Uuid,
        );

        registry
    }

    fn insert<T: 'static>(&mut self, kind: WrapperKind) {
        self.kinds.insert(TypeId::of::<T>(), kind);
    }

    pub fn kind_of(&self, key: &TypeKey) -> Option<WrapperKind> {
        self.kinds.get(&key.id()).copied()
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.kinds.contains_key(&key.id())
    }

    /// Registered and declared with the same wrapper kind
    pub fn is_wrapper(&self, ty: &FieldType) -> bool {
        match (self.kind_of(&ty.key()), ty.wrapper_kind()) {
            (Some(registered), Some(declared)) => registered == declared,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for WrapperRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
