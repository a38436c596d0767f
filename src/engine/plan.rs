//! Copy plans: which fields move between a source and a destination type

use crate::coerce::{CoercionResolver, CoercionRule};
use crate::types::{ExclusionSet, FieldDescriptor, TypeDescriptor};
use std::fmt;

/// One planned field transfer
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    source: FieldDescriptor,
    dest: FieldDescriptor,
    rule: CoercionRule,
}

impl PlanStep {
    pub fn source(&self) -> &FieldDescriptor {
        &self.source
    }

    pub fn dest(&self) -> &FieldDescriptor {
        &self.dest
    }

    pub fn rule(&self) -> CoercionRule {
        self.rule
    }
}

/// Why a source field is not transferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Constant-like field on the source side
    Constant,
    /// Listed in the destination's exclusion set
    Excluded,
    /// No assignable destination field with a matching name
    NoCounterpart,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::Constant => "constant",
            SkipReason::Excluded => "excluded",
            SkipReason::NoCounterpart => "no counterpart",
        };
        f.write_str(reason)
    }
}

/// A source field left out of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedField {
    pub name: &'static str,
    pub reason: SkipReason,
}

/// Ordered field transfers for one (source type, destination type) pair
///
/// Built fresh for every copy call. Building depends only on the two
/// descriptors and the exclusion set, so the same pair always yields the
/// same plan.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyPlan {
    source_type: &'static str,
    dest_type: &'static str,
    steps: Vec<PlanStep>,
    skipped: Vec<SkippedField>,
}

impl CopyPlan {
    /// Plan a copy from `source` into `dest`
    ///
    /// Source fields are visited in descriptor order. Constant-like fields
    /// and fields excluded by the destination are dropped, then each
    /// remaining field is paired with the first assignable destination field
    /// whose name matches case-insensitively.
    pub fn build(
        source: &TypeDescriptor,
        dest: &TypeDescriptor,
        excluded: &ExclusionSet,
        resolver: &CoercionResolver,
    ) -> Self {
        let mut plan = Self {
            source_type: source.name(),
            dest_type: dest.name(),
            steps: Vec::new(),
            skipped: Vec::new(),
        };

        for field in source.fields() {
            if field.is_constant() {
                plan.skip(field.name(), SkipReason::Constant);
                continue;
            }
            if excluded.contains(field.name()) {
                plan.skip(field.name(), SkipReason::Excluded);
                continue;
            }
            match dest.find_field(field.name()) {
                Some(target) => {
                    let rule = resolver.rule(field.field_type(), target.field_type());
                    plan.steps.push(PlanStep {
                        source: field.clone(),
                        dest: target.clone(),
                        rule,
                    });
                }
                None => plan.skip(field.name(), SkipReason::NoCounterpart),
            }
        }

        plan
    }

    fn skip(&mut self, name: &'static str, reason: SkipReason) {
        self.skipped.push(SkippedField { name, reason });
    }

    pub fn source_type(&self) -> &'static str {
        self.source_type
    }

    pub fn dest_type(&self) -> &'static str {
        self.dest_type
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn skipped(&self) -> &[SkippedField] {
        &self.skipped
    }

    /// Destination names of the planned fields, in order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.dest.name()).collect()
    }

    /// Rule chosen for the source field `name`
    pub fn rule_for(&self, name: &str) -> Option<CoercionRule> {
        self.steps
            .iter()
            .find(|step| step.source.matches_name(name))
            .map(|step| step.rule)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, PrimitiveKind, TypeKey, WrapperKind};

    struct Source;
    struct Dest;

    fn int() -> FieldType {
        FieldType::primitive::<i32>(PrimitiveKind::I32)
    }

    fn boxed_int() -> FieldType {
        FieldType::boxed::<Option<i32>>(WrapperKind::Boxed(PrimitiveKind::I32))
    }

    fn descriptors() -> (TypeDescriptor, TypeDescriptor) {
        let source = TypeDescriptor::new(TypeKey::of::<Source>(), "Source").with_fields(vec![
            FieldDescriptor::new("id", int()),
            FieldDescriptor::new("count", boxed_int()),
            FieldDescriptor::new("extra", int()),
            FieldDescriptor::constant("LIMIT", int()),
        ]);
        let dest = TypeDescriptor::new(TypeKey::of::<Dest>(), "Dest").with_fields(vec![
            FieldDescriptor::new("ID", int()),
            FieldDescriptor::new("Count", int()),
            FieldDescriptor::constant("limit", int()),
        ]);
        (source, dest)
    }

    #[test]
    fn test_build_matches_names_case_insensitively() {
        let (source, dest) = descriptors();
        let plan = CopyPlan::build(&source, &dest, &ExclusionSet::new(), &CoercionResolver::new());

        assert_eq!(plan.field_names(), vec!["ID", "Count"]);
        assert_eq!(plan.rule_for("id"), Some(CoercionRule::SameType));
        assert_eq!(plan.rule_for("count"), Some(CoercionRule::BoxedToPrimitive));
        assert_eq!(plan.source_type(), "Source");
        assert_eq!(plan.dest_type(), "Dest");
    }

    #[test]
    fn test_build_records_skipped_fields() {
        let (source, dest) = descriptors();
        let plan = CopyPlan::build(&source, &dest, &ExclusionSet::new(), &CoercionResolver::new());

        assert_eq!(
            plan.skipped(),
            &[
                SkippedField {
                    name: "extra",
                    reason: SkipReason::NoCounterpart
                },
                SkippedField {
                    name: "LIMIT",
                    reason: SkipReason::Constant
                },
            ]
        );
    }

    #[test]
    fn test_build_applies_exclusions() {
        let (source, dest) = descriptors();
        let excluded = ExclusionSet::from_names(["Id"]);
        let plan = CopyPlan::build(&source, &dest, &excluded, &CoercionResolver::new());

        assert_eq!(plan.field_names(), vec!["Count"]);
        assert_eq!(plan.skipped()[0].reason, SkipReason::Excluded);
    }

    #[test]
    fn test_build_is_deterministic() {
        let (source, dest) = descriptors();
        let resolver = CoercionResolver::new();
        let first = CopyPlan::build(&source, &dest, &ExclusionSet::new(), &resolver);
        let second = CopyPlan::build(&source, &dest, &ExclusionSet::new(), &resolver);
        assert_eq!(first, second);
    }
}
