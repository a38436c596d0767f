//! Coercion rule selection

use crate::types::{FieldType, TypeCategory};
use std::fmt;

/// Rule chosen for one (source field, destination field) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoercionRule {
    /// Same declared type: raw value copy
    SameType,
    /// Boxed source into a primitive destination; absent becomes the zero value
    BoxedToPrimitive,
    /// Primitive source into a boxed destination; the zero value becomes absent
    PrimitiveToBoxed,
    /// Either side is an enum: match constants by canonical name
    EnumMatch,
    /// Different container declarations: never copied
    ContainerMismatch,
    /// Anything else: raw value copy
    Fallback,
}

impl CoercionRule {
    /// Pick the rule for a pair of declared types
    ///
    /// Checks run in a fixed order and the first match wins. The boxed and
    /// primitive rules only change the value in edge cases; for other values
    /// they behave like [`CoercionRule::Fallback`].
    pub fn select(source: &FieldType, dest: &FieldType) -> Self {
        let source_category = source.category();
        let dest_category = dest.category();

        if source.same_declared_type(dest) {
            CoercionRule::SameType
        } else if source_category == TypeCategory::Boxed
            && dest_category == TypeCategory::Primitive
        {
            CoercionRule::BoxedToPrimitive
        } else if source_category == TypeCategory::Primitive
            && dest_category == TypeCategory::Boxed
        {
            CoercionRule::PrimitiveToBoxed
        } else if source_category == TypeCategory::Enum || dest_category == TypeCategory::Enum {
            CoercionRule::EnumMatch
        } else if source_category.is_container() || dest_category.is_container() {
            CoercionRule::ContainerMismatch
        } else {
            CoercionRule::Fallback
        }
    }
}

impl fmt::Display for CoercionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoercionRule::SameType => "same-type",
            CoercionRule::BoxedToPrimitive => "boxed-to-primitive",
            CoercionRule::PrimitiveToBoxed => "primitive-to-boxed",
            CoercionRule::EnumMatch => "enum-match",
            CoercionRule::ContainerMismatch => "container-mismatch",
            CoercionRule::Fallback => "fallback",
        };
        f.write_str(name)
    }
}
