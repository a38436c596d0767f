//! Value coercion between differently declared source and destination fields
//!
//! The resolver never fails. A value it cannot adapt comes back as
//! [`Coercion::Unresolved`] and the engine leaves the destination field at
//! its zero value.

mod defaults;
mod rule;

pub use defaults::DefaultValues;
pub use rule::CoercionRule;

use crate::types::{EnumInfo, EnumValue, FieldType, FieldValue, PrimitiveKind, Scalar};
use std::fmt;

/// Outcome of resolving one field value
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// Hand the value to the raw copy strategy
    RawCopy(FieldValue),
    /// Assign this value as-is
    Coerced(FieldValue),
    /// No safe coercion exists
    Unresolved(UnresolvedCoercion),
}

/// Why a value could not be coerced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedCoercion {
    /// No enum constant of the destination carries this name
    NoMatchingConstant {
        enum_name: &'static str,
        name: String,
    },
    /// The source value was absent or not of its declared shape
    MissingValue,
    /// Enum matching between two types that are neither enums nor text
    UnsupportedEnumConversion {
        source: &'static str,
        dest: &'static str,
    },
    /// Different container declarations
    ContainerMismatch {
        source: &'static str,
        dest: &'static str,
    },
    /// Primitive kind with no zero value registered
    NoDefault(PrimitiveKind),
}

impl fmt::Display for UnresolvedCoercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedCoercion::NoMatchingConstant { enum_name, name } => {
                write!(f, "{} has no constant named '{}'", enum_name, name)
            }
            UnresolvedCoercion::MissingValue => f.write_str("source value is absent"),
            UnresolvedCoercion::UnsupportedEnumConversion { source, dest } => {
                write!(f, "no enum conversion from {} to {}", source, dest)
            }
            UnresolvedCoercion::ContainerMismatch { source, dest } => {
                write!(f, "cannot copy container {} into {}", source, dest)
            }
            UnresolvedCoercion::NoDefault(kind) => {
                write!(f, "no default value for {}", kind.name())
            }
        }
    }
}

/// Decides how a source value must change to fit a destination field
#[derive(Debug, Clone, Default)]
pub struct CoercionResolver {
    defaults: DefaultValues,
}

impl CoercionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: DefaultValues) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &DefaultValues {
        &self.defaults
    }

    /// Rule for a pair of declared types; depends on types only
    pub fn rule(&self, source: &FieldType, dest: &FieldType) -> CoercionRule {
        CoercionRule::select(source, dest)
    }

    /// Select the rule and apply it to `value`
    pub fn resolve(&self, source: &FieldType, dest: &FieldType, value: FieldValue) -> Coercion {
        self.apply(self.rule(source, dest), source, dest, value)
    }

    /// Apply a previously selected rule to a source value
    pub fn apply(
        &self,
        rule: CoercionRule,
        source: &FieldType,
        dest: &FieldType,
        value: FieldValue,
    ) -> Coercion {
        match rule {
            CoercionRule::SameType | CoercionRule::Fallback => Coercion::RawCopy(value),
            CoercionRule::BoxedToPrimitive => self.unbox(dest, value),
            CoercionRule::PrimitiveToBoxed => self.rebox(value),
            CoercionRule::EnumMatch => match_enum(source, dest, value),
            CoercionRule::ContainerMismatch => {
                Coercion::Unresolved(UnresolvedCoercion::ContainerMismatch {
                    source: source.type_name(),
                    dest: dest.type_name(),
                })
            }
        }
    }

    fn unbox(&self, dest: &FieldType, value: FieldValue) -> Coercion {
        if !value.is_absent() {
            return Coercion::RawCopy(value);
        }
        let zero = dest.primitive_kind().map(|kind| (kind, self.defaults.get(kind)));
        match zero {
            Some((_, Some(zero))) => Coercion::Coerced(FieldValue::Primitive(zero)),
            Some((kind, None)) => Coercion::Unresolved(UnresolvedCoercion::NoDefault(kind)),
            None => Coercion::Unresolved(UnresolvedCoercion::MissingValue),
        }
    }

    // Lossy: an explicit zero and "never set" both end up absent.
    fn rebox(&self, value: FieldValue) -> Coercion {
        match value {
            FieldValue::Primitive(primitive) if self.defaults.is_default(&primitive) => {
                Coercion::Coerced(FieldValue::Absent)
            }
            value => Coercion::RawCopy(value),
        }
    }
}

fn match_enum(source: &FieldType, dest: &FieldType, value: FieldValue) -> Coercion {
    if let Some(info) = dest.enum_info() {
        if source.is_text() {
            return match value.as_text() {
                Some(text) => constant_of(info, text),
                None => Coercion::Unresolved(UnresolvedCoercion::MissingValue),
            };
        }
        if source.enum_info().is_some() {
            return match value {
                FieldValue::Enum(constant) => constant_of(info, constant.constant),
                _ => Coercion::Unresolved(UnresolvedCoercion::MissingValue),
            };
        }
    } else if source.enum_info().is_some() && dest.is_text() {
        if let FieldValue::Enum(constant) = value {
            return Coercion::Coerced(FieldValue::Scalar(Scalar::Text(
                constant.constant.to_string(),
            )));
        }
        return Coercion::Unresolved(UnresolvedCoercion::MissingValue);
    }

    Coercion::Unresolved(UnresolvedCoercion::UnsupportedEnumConversion {
        source: source.type_name(),
        dest: dest.type_name(),
    })
}

fn constant_of(info: &'static EnumInfo, name: &str) -> Coercion {
    match info.constant(name) {
        Some(constant) => Coercion::Coerced(FieldValue::Enum(EnumValue {
            enum_name: info.name,
            constant,
        })),
        None => Coercion::Unresolved(UnresolvedCoercion::NoMatchingConstant {
            enum_name: info.name,
            name: name.to_string(),
        }),
    }
}
