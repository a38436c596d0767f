//! Runtime field values moved between source and destination

use super::category::{PrimitiveKind, WrapperKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A primitive scalar value
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Primitive {
    /// Kind of this value
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Bool(_) => PrimitiveKind::Bool,
            Primitive::Char(_) => PrimitiveKind::Char,
            Primitive::I8(_) => PrimitiveKind::I8,
            Primitive::I16(_) => PrimitiveKind::I16,
            Primitive::I32(_) => PrimitiveKind::I32,
            Primitive::I64(_) => PrimitiveKind::I64,
            Primitive::U8(_) => PrimitiveKind::U8,
            Primitive::U16(_) => PrimitiveKind::U16,
            Primitive::U32(_) => PrimitiveKind::U32,
            Primitive::U64(_) => PrimitiveKind::U64,
            Primitive::F32(_) => PrimitiveKind::F32,
            Primitive::F64(_) => PrimitiveKind::F64,
        }
    }

    /// False only for NaN and infinite floats
    pub fn is_finite(&self) -> bool {
        match self {
            Primitive::F32(v) => v.is_finite(),
            Primitive::F64(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Convert to `target` when the conversion is a widening one.
    ///
    /// Signed integers widen to larger signed integers and to both float
    /// kinds, unsigned integers widen to any integer or float that holds every
    /// value, `char` widens to 32/64-bit integers and `f64`, and `f32` widens
    /// to `f64`. Narrowing or sign-changing conversions return `None`.
    pub fn widen_to(self, target: PrimitiveKind) -> Option<Primitive> {
        use Primitive as P;
        use PrimitiveKind as K;

        if self.kind() == target {
            return Some(self);
        }

        let widened = match (self, target) {
            (P::I8(v), K::I16) => P::I16(v.into()),
            (P::I8(v), K::I32) => P::I32(v.into()),
            (P::I8(v), K::I64) => P::I64(v.into()),
            (P::I8(v), K::F32) => P::F32(v.into()),
            (P::I8(v), K::F64) => P::F64(v.into()),
            (P::I16(v), K::I32) => P::I32(v.into()),
            (P::I16(v), K::I64) => P::I64(v.into()),
            (P::I16(v), K::F32) => P::F32(v.into()),
            (P::I16(v), K::F64) => P::F64(v.into()),
            (P::I32(v), K::I64) => P::I64(v.into()),
            (P::I32(v), K::F32) => P::F32(v as f32),
            (P::I32(v), K::F64) => P::F64(v.into()),
            (P::I64(v), K::F32) => P::F32(v as f32),
            (P::I64(v), K::F64) => P::F64(v as f64),
            (P::U8(v), K::Char) => P::Char(v.into()),
            (P::U8(v), K::I16) => P::I16(v.into()),
            (P::U8(v), K::I32) => P::I32(v.into()),
            (P::U8(v), K::I64) => P::I64(v.into()),
            (P::U8(v), K::U16) => P::U16(v.into()),
            (P::U8(v), K::U32) => P::U32(v.into()),
            (P::U8(v), K::U64) => P::U64(v.into()),
            (P::U8(v), K::F32) => P::F32(v.into()),
            (P::U8(v), K::F64) => P::F64(v.into()),
            (P::U16(v), K::I32) => P::I32(v.into()),
            (P::U16(v), K::I64) => P::I64(v.into()),
            (P::U16(v), K::U32) => P::U32(v.into()),
            (P::U16(v), K::U64) => P::U64(v.into()),
            (P::U16(v), K::F32) => P::F32(v.into()),
            (P::U16(v), K::F64) => P::F64(v.into()),
            (P::U32(v), K::I64) => P::I64(v.into()),
            (P::U32(v), K::U64) => P::U64(v.into()),
            (P::U32(v), K::F64) => P::F64(v.into()),
            (P::Char(c), K::I32) => P::I32(c as i32),
            (P::Char(c), K::I64) => P::I64(c as i64),
            (P::Char(c), K::U32) => P::U32(c.into()),
            (P::Char(c), K::U64) => P::U64(c.into()),
            (P::Char(c), K::F64) => P::F64(u32::from(c).into()),
            (P::F32(v), K::F64) => P::F64(v.into()),
            _ => return None,
        };
        Some(widened)
    }
}

// Floats compare by bit pattern so that `-0.0` and `0.0` stay distinct and
// NaN equals itself; this is the equality the default-value rule relies on.
impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Primitive::F32(a), Primitive::F32(b)) => a.to_bits() == b.to_bits(),
            (Primitive::F64(a), Primitive::F64(b)) => a.to_bits() == b.to_bits(),
            (Primitive::Bool(a), Primitive::Bool(b)) => a == b,
            (Primitive::Char(a), Primitive::Char(b)) => a == b,
            (Primitive::I8(a), Primitive::I8(b)) => a == b,
            (Primitive::I16(a), Primitive::I16(b)) => a == b,
            (Primitive::I32(a), Primitive::I32(b)) => a == b,
            (Primitive::I64(a), Primitive::I64(b)) => a == b,
            (Primitive::U8(a), Primitive::U8(b)) => a == b,
            (Primitive::U16(a), Primitive::U16(b)) => a == b,
            (Primitive::U32(a), Primitive::U32(b)) => a == b,
            (Primitive::U64(a), Primitive::U64(b)) => a == b,
            _ => false,
        }
    }
}

/// Immutable value-type payloads (text, date/time, identifiers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    Uuid(Uuid),
}

impl Scalar {
    /// Wrapper kind this scalar belongs to
    pub fn wrapper_kind(&self) -> WrapperKind {
        match self {
            Scalar::Text(_) => WrapperKind::Text,
            Scalar::Date(_) => WrapperKind::Date,
            Scalar::Time(_) => WrapperKind::Time,
            Scalar::DateTime(_) => WrapperKind::DateTime,
            Scalar::Instant(_) => WrapperKind::Instant,
            Scalar::Uuid(_) => WrapperKind::Uuid,
        }
    }
}

/// An enum constant, identified by its canonical name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    /// Name of the enum type the constant belongs to
    pub enum_name: &'static str,
    /// Canonical constant name
    pub constant: &'static str,
}

/// Serialized form of a nested object, collection or map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    text: String,
    len: Option<usize>,
}

impl Payload {
    /// Payload of a single nested value
    pub fn object(text: String) -> Self {
        Self { text, len: None }
    }

    /// Payload of a container holding `len` elements
    pub fn container(text: String, len: usize) -> Self {
        Self {
            text,
            len: Some(len),
        }
    }

    /// Serialized text produced by the backend
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Element count, for containers
    pub fn len(&self) -> Option<usize> {
        self.len
    }

    /// True for containers with no elements
    pub fn is_empty(&self) -> bool {
        self.len == Some(0)
    }
}

/// Value read from a source field and written into a destination field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value (`None`, or a degraded coercion); assigning it leaves the
    /// destination field at its zero value
    Absent,
    Primitive(Primitive),
    Scalar(Scalar),
    Enum(EnumValue),
    Serialized(Payload),
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Text content, when this is a text scalar
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(Scalar::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Short label used in mismatch messages
    pub fn describe(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Primitive(p) => p.kind().name(),
            FieldValue::Scalar(Scalar::Text(_)) => "text",
            FieldValue::Scalar(Scalar::Date(_)) => "date",
            FieldValue::Scalar(Scalar::Time(_)) => "time",
            FieldValue::Scalar(Scalar::DateTime(_)) => "datetime",
            FieldValue::Scalar(Scalar::Instant(_)) => "instant",
            FieldValue::Scalar(Scalar::Uuid(_)) => "uuid",
            FieldValue::Enum(_) => "enum constant",
            FieldValue::Serialized(_) => "serialized value",
        }
    }
}
