//! Default-value table: zero value of every primitive kind

use crate::types::{Primitive, PrimitiveKind};
use std::collections::HashMap;

const ZERO_VALUES: [(PrimitiveKind, Primitive); 12] = [
    (PrimitiveKind::Bool, Primitive::Bool(false)),
    (PrimitiveKind::Char, Primitive::Char('\0')),
    (PrimitiveKind::I8, Primitive::I8(0)),
    (PrimitiveKind::I16, Primitive::I16(0)),
    (PrimitiveKind::I32, Primitive::I32(0)),
    (PrimitiveKind::I64, Primitive::I64(0)),
    (PrimitiveKind::U8, Primitive::U8(0)),
    (PrimitiveKind::U16, Primitive::U16(0)),
    (PrimitiveKind::U32, Primitive::U32(0)),
    (PrimitiveKind::U64, Primitive::U64(0)),
    (PrimitiveKind::F32, Primitive::F32(0.0)),
    (PrimitiveKind::F64, Primitive::F64(0.0)),
];

/// Zero value of each primitive kind, built once and shared
#[derive(Debug, Clone)]
pub struct DefaultValues {
    table: HashMap<PrimitiveKind, Primitive>,
}

impl DefaultValues {
    pub fn standard() -> Self {
        Self {
            table: ZERO_VALUES.into_iter().collect(),
        }
    }

    pub fn get(&self, kind: PrimitiveKind) -> Option<Primitive> {
        self.table.get(&kind).copied()
    }

    /// True when `value` is exactly its kind's zero value (`-0.0` is not)
    pub fn is_default(&self, value: &Primitive) -> bool {
        self.get(value.kind()).as_ref() == Some(value)
    }
}

impl Default for DefaultValues {
    fn default() -> Self {
        Self::standard()
    }
}
