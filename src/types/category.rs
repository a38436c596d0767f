//! Type categories used to pick copy and coercion rules

use std::fmt;

/// Category of a declared field type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Non-nullable scalar copied by identity
    Primitive,
    /// Nullable scalar or immutable value type (text, date/time, identifiers)
    Boxed,
    /// Unit-only enumeration matched by constant name
    Enum,
    /// Ordered or set-like sequence
    Collection,
    /// Key/value container
    Map,
    /// Anything else: nested records and opaque values
    Object,
}

impl TypeCategory {
    /// Collections and maps
    pub fn is_container(self) -> bool {
        matches!(self, TypeCategory::Collection | TypeCategory::Map)
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeCategory::Primitive => "primitive",
            TypeCategory::Boxed => "boxed",
            TypeCategory::Enum => "enum",
            TypeCategory::Collection => "collection",
            TypeCategory::Map => "map",
            TypeCategory::Object => "object",
        };
        f.write_str(name)
    }
}

/// Primitive scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Every primitive kind, in declaration order
    pub const ALL: [PrimitiveKind; 12] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::I8,
        PrimitiveKind::I16,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::U8,
        PrimitiveKind::U16,
        PrimitiveKind::U32,
        PrimitiveKind::U64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
    ];

    /// Rust spelling of the kind
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }
}

/// Kinds of registered wrapper types (copied by value through the backend)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// `Option<primitive>`
    Boxed(PrimitiveKind),
    /// `String`
    Text,
    /// `chrono::NaiveDate`
    Date,
    /// `chrono::NaiveTime`
    Time,
    /// `chrono::NaiveDateTime`
    DateTime,
    /// `chrono::DateTime<Utc>`
    Instant,
    /// `uuid::Uuid`
    Uuid,
}

impl WrapperKind {
    pub fn is_text(self) -> bool {
        matches!(self, WrapperKind::Text)
    }
}

/// Concrete container kinds; container identity ignores element parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Vec,
    VecDeque,
    HashSet,
    BTreeSet,
    HashMap,
    BTreeMap,
}

impl ContainerKind {
    /// Set-like containers deduplicate equal elements
    pub fn is_set(self) -> bool {
        matches!(self, ContainerKind::HashSet | ContainerKind::BTreeSet)
    }

    pub fn is_map(self) -> bool {
        matches!(self, ContainerKind::HashMap | ContainerKind::BTreeMap)
    }
}
