//! Copy engine
//!
//! A [`Copier`] instantiates the destination, plans which fields to move,
//! resolves each value through the coercion resolver and assigns it. Any
//! field failure aborts the whole call; no partially copied object is ever
//! returned.

mod batch;
mod plan;

pub use plan::{CopyPlan, PlanStep, SkipReason, SkippedField};

use crate::codec::{JsonBackend, SerializationBackend};
use crate::coerce::{Coercion, CoercionResolver, CoercionRule};
use crate::config::Config;
use crate::introspect::{Copyable, Introspector};
use crate::types::{CopyError, FieldType, FieldValue, Result, TypeCategory};
use std::sync::Arc;
use tracing::{debug, trace};

/// Structural copy engine
///
/// Stateless per call. The introspector behind it is shared and may be used
/// by several copiers and threads at once.
///
/// # Example
/// ```
/// use objkopy::{copyable, Copier};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct UserSummary {
///     name: String,
/// }
///
/// copyable!(User { fields { id: u32; name: String; } });
/// copyable!(UserSummary { fields { name: String; } });
///
/// let user = User { id: 1, name: "grace".to_string() };
/// let summary: UserSummary = Copier::new().copy_as(&user)?;
/// assert_eq!(summary.name, "grace");
/// # Ok::<(), objkopy::CopyError>(())
/// ```
#[derive(Debug)]
pub struct Copier<B: SerializationBackend = JsonBackend> {
    introspector: Arc<Introspector>,
    resolver: CoercionResolver,
    backend: B,
}

impl Copier<JsonBackend> {
    /// Copier over a private introspector and the compact JSON backend
    pub fn new() -> Self {
        Self::with_backend(Arc::new(Introspector::new()), JsonBackend::new())
    }

    /// Copier with the configured exclusions
    ///
    /// The copy transport is always compact JSON; `pretty_json` only
    /// affects how callers display results.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut builder = Introspector::builder();
        for (type_name, fields) in &config.exclusions {
            builder = builder.exclude_named(type_name, fields);
        }
        Ok(Self::with_backend(Arc::new(builder.build()), JsonBackend::new()))
    }
}

impl Default for Copier<JsonBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: SerializationBackend> Copier<B> {
    pub fn with_backend(introspector: Arc<Introspector>, backend: B) -> Self {
        debug!("Copier using the {} backend", backend.name());
        Self {
            introspector,
            resolver: CoercionResolver::new(),
            backend,
        }
    }

    pub fn introspector(&self) -> &Arc<Introspector> {
        &self.introspector
    }

    pub fn resolver(&self) -> &CoercionResolver {
        &self.resolver
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Plan a copy from `S` into `D` without copying anything
    pub fn plan<S: Copyable, D: Copyable>(&self) -> CopyPlan {
        let source = self.introspector.describe::<S>();
        let dest = self.introspector.describe::<D>();
        let excluded = self.introspector.excluded_fields::<D>();
        let plan = CopyPlan::build(&source, &dest, &excluded, &self.resolver);

        debug!(
            "Planned {} -> {}: {} fields, {} skipped",
            plan.source_type(),
            plan.dest_type(),
            plan.len(),
            plan.skipped().len()
        );
        for skipped in plan.skipped() {
            trace!("Skipping {}.{} ({})", plan.source_type(), skipped.name, skipped.reason);
        }

        plan
    }

    /// Copy `source` into a new instance of the same type
    ///
    /// # Errors
    /// `NullSource` for an absent source, `Uninstantiable` when the type has
    /// no default form, and any field failure wrapped with the field's name.
    pub fn copy<'a, T: Copyable>(&self, source: impl Into<Option<&'a T>>) -> Result<T> {
        self.copy_as::<T, T>(source)
    }

    /// Copy `source` into a new instance of a different type
    ///
    /// Fields are matched by name case-insensitively; source fields with no
    /// counterpart in `D` are ignored.
    pub fn copy_as<'a, S: Copyable, D: Copyable>(
        &self,
        source: impl Into<Option<&'a S>>,
    ) -> Result<D> {
        let source = source.into().ok_or(CopyError::NullSource)?;
        let plan = self.plan::<S, D>();
        let mut dest = D::instantiate()?;
        self.execute(&plan, source, &mut dest)?;
        Ok(dest)
    }

    /// Copy `source` into an existing destination
    ///
    /// Fields are written into a staged clone of `dest` which replaces it
    /// only once every field has been copied, so a failed call leaves `dest`
    /// untouched.
    pub fn copy_into<'a, 'b, S: Copyable, D: Copyable + Clone>(
        &self,
        source: impl Into<Option<&'a S>>,
        dest: impl Into<Option<&'b mut D>>,
    ) -> Result<()> {
        let source = source.into().ok_or(CopyError::NullSource)?;
        let dest = dest.into().ok_or(CopyError::NullDestination)?;
        let plan = self.plan::<S, D>();

        let mut staged = dest.clone();
        self.execute(&plan, source, &mut staged)?;
        *dest = staged;
        Ok(())
    }

    fn execute<S: Copyable, D: Copyable>(&self, plan: &CopyPlan, source: &S, dest: &mut D) -> Result<()> {
        for step in plan.steps() {
            let field = step.dest().name();
            let value = self
                .resolve_step(plan, step, source)
                .map_err(|e| e.in_field(plan.dest_type(), field))?;

            let assigned = dest
                .write_field(field, value, &self.backend)
                .map_err(|e| e.in_field(plan.dest_type(), field))?;
            if !assigned {
                return Err(CopyError::UnknownField {
                    type_name: plan.dest_type(),
                    field,
                });
            }
        }
        Ok(())
    }

    fn resolve_step<S: Copyable>(&self, plan: &CopyPlan, step: &PlanStep, source: &S) -> Result<FieldValue> {
        let source_type = step.source().field_type();
        let dest_type = step.dest().field_type();

        // Decided from the declarations alone; skip reading the value.
        if step.rule() == CoercionRule::ContainerMismatch {
            debug!(
                "Not copying {}.{}: {} and {} are different containers",
                plan.source_type(),
                step.source().name(),
                source_type.type_name(),
                dest_type.type_name()
            );
            return Ok(FieldValue::Absent);
        }

        let value = source
            .read_field(step.source().name(), &self.backend)?
            .ok_or(CopyError::UnknownField {
                type_name: plan.source_type(),
                field: step.source().name(),
            })?;

        match self.resolver.apply(step.rule(), source_type, dest_type, value) {
            Coercion::RawCopy(value) => self.copy_raw(source_type, dest_type, value),
            Coercion::Coerced(value) => Ok(value),
            Coercion::Unresolved(reason) => {
                debug!(
                    "Leaving {}.{} at its zero value: {}",
                    plan.dest_type(),
                    step.dest().name(),
                    reason
                );
                Ok(FieldValue::Absent)
            }
        }
    }

    /// Raw value copy strategy, chosen by the source field's declared type
    ///
    /// - primitives and enums are returned unchanged
    /// - registered wrapper values are round-tripped through the backend
    /// - containers arrive serialized and are materialized by the
    ///   destination field in its own element type; an empty container with
    ///   dynamic destination elements becomes absent
    /// - nested records arrive serialized and are materialized the same way
    pub fn copy_raw(&self, source: &FieldType, dest: &FieldType, value: FieldValue) -> Result<FieldValue> {
        match self.introspector.classify_field(source) {
            TypeCategory::Primitive | TypeCategory::Enum => Ok(value),
            TypeCategory::Boxed => self.clone_wrapper(value),
            TypeCategory::Collection | TypeCategory::Map => Ok(clone_container(dest, value)),
            TypeCategory::Object => Ok(value),
        }
    }

    fn clone_wrapper(&self, value: FieldValue) -> Result<FieldValue> {
        match value {
            // Non-finite floats have no JSON form
            FieldValue::Primitive(primitive) if primitive.is_finite() => {
                self.backend.round_trip(&primitive).map(FieldValue::Primitive)
            }
            FieldValue::Scalar(scalar) => self.backend.round_trip(&scalar).map(FieldValue::Scalar),
            other => Ok(other),
        }
    }
}

fn clone_container(dest: &FieldType, value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Serialized(payload) if payload.is_empty() && dest.has_dynamic_elements() => {
            trace!("Empty container into {} copied as absent", dest.type_name());
            FieldValue::Absent
        }
        other => other,
    }
}
