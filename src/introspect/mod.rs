//! Structural introspection
//!
//! The [`Introspector`] answers what the copy engine needs to know about a
//! type: its fields (own first, then every ancestor's), the category of each
//! declared field type, its methods, and which fields are excluded when the
//! type is a copy destination. Descriptors are computed once per type and
//! shared afterwards.

mod copyable;
mod kind;
mod wrappers;

pub use copyable::{Copyable, CopyableEnum};
pub use kind::{
    enum_from_value, enum_to_value, object_from_value, object_to_value, FieldKind, NullableKind,
};
pub use wrappers::WrapperRegistry;

use crate::types::{ExclusionSet, FieldDescriptor, FieldType, TypeCategory, TypeDescriptor};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{trace, warn};

/// Field descriptor cache plus the static tables consulted with it
///
/// Safe to share between threads. Population is idempotent: two threads
/// describing the same type at once compute identical descriptors and the
/// first one stored wins.
#[derive(Debug)]
pub struct Introspector {
    descriptors: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
    wrappers: WrapperRegistry,
    exclusions: HashMap<TypeId, ExclusionSet>,
    named_exclusions: HashMap<String, ExclusionSet>,
}

impl Introspector {
    /// Introspector with the standard wrapper table and no extra exclusions
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> IntrospectorBuilder {
        IntrospectorBuilder::default()
    }

    /// Descriptor of `T`, computed on first use
    pub fn describe<T: Copyable>(&self) -> Arc<TypeDescriptor> {
        let id = TypeId::of::<T>();
        if let Some(descriptor) = self.read_cache().get(&id) {
            return Arc::clone(descriptor);
        }

        let descriptor = Arc::new(T::describe());
        trace!(
            type_name = descriptor.name(),
            fields = descriptor.fields().len(),
            "Caching type descriptor"
        );
        for name in self.unmatched_exclusions(id, &descriptor) {
            warn!(
                "Exclusion '{}' matches no field of {}; exclusions name Rust fields, e.g. 'foo_id'",
                name,
                descriptor.name()
            );
        }
        Arc::clone(self.write_cache().entry(id).or_insert(descriptor))
    }

    /// Fields of `T` and of every ancestor, most-derived first
    pub fn fields<T: Copyable>(&self) -> Vec<FieldDescriptor> {
        self.describe::<T>().fields().to_vec()
    }

    pub fn methods<T: Copyable>(&self) -> Vec<&'static str> {
        self.describe::<T>().methods().to_vec()
    }

    /// Category of a field type, from static information only
    pub fn classify<T: FieldKind>(&self) -> TypeCategory {
        self.classify_field(&T::field_type())
    }

    /// Category of a declared field type
    ///
    /// A boxed declaration that is not in the wrapper table is treated as a
    /// plain object.
    pub fn classify_field(&self, ty: &FieldType) -> TypeCategory {
        match ty.category() {
            TypeCategory::Boxed if !self.wrappers.is_wrapper(ty) => TypeCategory::Object,
            category => category,
        }
    }

    /// Every field name never copied into `T`, from its declaration, from
    /// [`IntrospectorBuilder::exclude`] and from configuration
    pub fn excluded_fields<T: Copyable>(&self) -> ExclusionSet {
        let descriptor = self.describe::<T>();
        let mut excluded = descriptor.exclusions().clone();
        if let Some(extra) = self.exclusions.get(&TypeId::of::<T>()) {
            excluded.merge(extra);
        }
        if let Some(named) = self.named_exclusions.get(descriptor.name()) {
            excluded.merge(named);
        }
        excluded
    }

    pub fn wrappers(&self) -> &WrapperRegistry {
        &self.wrappers
    }

    pub fn is_wrapper(&self, ty: &FieldType) -> bool {
        self.wrappers.is_wrapper(ty)
    }

    /// Configured exclusions for a type that name none of its fields
    fn unmatched_exclusions(&self, id: TypeId, descriptor: &TypeDescriptor) -> Vec<String> {
        let configured = self
            .exclusions
            .get(&id)
            .into_iter()
            .chain(self.named_exclusions.get(descriptor.name()));
        configured
            .flat_map(|set| set.iter())
            .filter(|name| !descriptor.fields().iter().any(|field| field.matches_name(name)))
            .map(str::to_string)
            .collect()
    }

    /// Number of types currently cached
    pub fn cached_types(&self) -> usize {
        self.read_cache().len()
    }

    // A panic while holding the lock cannot leave a half-written entry, so a
    // poisoned cache is still consistent.
    fn read_cache(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Arc<TypeDescriptor>>> {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Arc<TypeDescriptor>>> {
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Introspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an [`Introspector`] with pre-registered types and exclusions
#[derive(Debug, Default)]
pub struct IntrospectorBuilder {
    registered: Vec<(TypeId, fn() -> TypeDescriptor)>,
    exclusions: HashMap<TypeId, ExclusionSet>,
    named_exclusions: HashMap<String, ExclusionSet>,
}

impl IntrospectorBuilder {
    /// Describe `T` eagerly when the introspector is built
    pub fn register<T: Copyable>(mut self) -> Self {
        let describe: fn() -> TypeDescriptor = T::describe;
        self.registered.push((TypeId::of::<T>(), describe));
        self
    }

    /// Exclude extra fields whenever `T` is the destination
    pub fn exclude<T: Copyable, I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.exclusions.entry(TypeId::of::<T>()).or_default();
        for name in names {
            set.insert(name.as_ref());
        }
        self
    }

    /// Exclude extra fields for the copyable type declared as `type_name`
    pub fn exclude_named<I, S>(mut self, type_name: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self
            .named_exclusions
            .entry(type_name.to_string())
            .or_default();
        for name in names {
            set.insert(name.as_ref());
        }
        self
    }

    pub fn build(self) -> Introspector {
        let descriptors = self
            .registered
            .into_iter()
            .map(|(id, describe)| (id, Arc::new(describe())))
            .collect();

        Introspector {
            descriptors: RwLock::new(descriptors),
            wrappers: WrapperRegistry::standard(),
            exclusions: self.exclusions,
            named_exclusions: self.named_exclusions,
        }
    }
}
