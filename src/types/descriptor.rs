//! Static field and type metadata

use super::category::{ContainerKind, PrimitiveKind, TypeCategory, WrapperKind};
use std::any::TypeId;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Identity of a Rust type plus its readable name
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Declared element (or map key/value) type of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// Concrete element type known at compile time
    Resolved(TypeKey),
    /// Untyped document element; the concrete shape is only known per value
    Dynamic,
}

impl ElementType {
    pub fn of<T: 'static>() -> Self {
        if TypeId::of::<T>() == TypeId::of::<serde_json::Value>() {
            ElementType::Dynamic
        } else {
            ElementType::Resolved(TypeKey::of::<T>())
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ElementType::Dynamic)
    }
}

/// Constants of a unit-only enum, in declaration order
#[derive(Debug, PartialEq, Eq)]
pub struct EnumInfo {
    pub name: &'static str,
    pub constants: &'static [&'static str],
}

impl EnumInfo {
    /// Constant whose canonical name equals `name` exactly
    pub fn constant(&self, name: &str) -> Option<&'static str> {
        self.constants.iter().copied().find(|constant| *constant == name)
    }
}

/// Structural shape of a declared field type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeShape {
    Primitive(PrimitiveKind),
    Boxed(WrapperKind),
    Enum(&'static EnumInfo),
    Collection {
        container: ContainerKind,
        element: ElementType,
    },
    Map {
        container: ContainerKind,
        key: ElementType,
        value: ElementType,
    },
    Object,
}

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldType {
    key: TypeKey,
    shape: TypeShape,
}

impl FieldType {
    pub fn new(key: TypeKey, shape: TypeShape) -> Self {
        Self { key, shape }
    }

    pub fn primitive<T: 'static>(kind: PrimitiveKind) -> Self {
        Self::new(TypeKey::of::<T>(), TypeShape::Primitive(kind))
    }

    pub fn boxed<T: 'static>(wrapper: WrapperKind) -> Self {
        Self::new(TypeKey::of::<T>(), TypeShape::Boxed(wrapper))
    }

    pub fn enumeration<T: 'static>(info: &'static EnumInfo) -> Self {
        Self::new(TypeKey::of::<T>(), TypeShape::Enum(info))
    }

    pub fn collection<T: 'static>(container: ContainerKind, element: ElementType) -> Self {
        Self::new(
            TypeKey::of::<T>(),
            TypeShape::Collection { container, element },
        )
    }

    pub fn map<T: 'static>(container: ContainerKind, key: ElementType, value: ElementType) -> Self {
        Self::new(
            TypeKey::of::<T>(),
            TypeShape::Map {
                container,
                key,
                value,
            },
        )
    }

    pub fn object<T: 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeShape::Object)
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn shape(&self) -> TypeShape {
        self.shape
    }

    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    pub fn category(&self) -> TypeCategory {
        match self.shape {
            TypeShape::Primitive(_) => TypeCategory::Primitive,
            TypeShape::Boxed(_) => TypeCategory::Boxed,
            TypeShape::Enum(_) => TypeCategory::Enum,
            TypeShape::Collection { .. } => TypeCategory::Collection,
            TypeShape::Map { .. } => TypeCategory::Map,
            TypeShape::Object => TypeCategory::Object,
        }
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.shape {
            TypeShape::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn wrapper_kind(&self) -> Option<WrapperKind> {
        match self.shape {
            TypeShape::Boxed(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    pub fn enum_info(&self) -> Option<&'static EnumInfo> {
        match self.shape {
            TypeShape::Enum(info) => Some(info),
            _ => None,
        }
    }

    pub fn container(&self) -> Option<ContainerKind> {
        match self.shape {
            TypeShape::Collection { container, .. } | TypeShape::Map { container, .. } => {
                Some(container)
            }
            _ => None,
        }
    }

    /// `String` or `Option<String>`
    pub fn is_text(&self) -> bool {
        matches!(self.wrapper_kind(), Some(WrapperKind::Text))
    }

    /// True when any declared element, key or value type is dynamic
    pub fn has_dynamic_elements(&self) -> bool {
        match self.shape {
            TypeShape::Collection { element, .. } => element.is_dynamic(),
            TypeShape::Map { key, value, .. } => key.is_dynamic() || value.is_dynamic(),
            _ => false,
        }
    }

    /// Same declared type. Containers compare by container kind only, so
    /// `Vec<A>` and `Vec<B>` are the same declared type.
    pub fn same_declared_type(&self, other: &FieldType) -> bool {
        match (self.container(), other.container()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.key == other.key,
            _ => false,
        }
    }
}

/// Case-insensitive field name comparison
pub fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || (!a.is_ascii() && a.to_lowercase() == b.to_lowercase())
}

/// Static metadata describing one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: &'static str,
    ty: FieldType,
    constant: bool,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            constant: false,
        }
    }

    /// Constant-like field: readable, never copied or assigned
    pub fn constant(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            constant: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }

    pub fn category(&self) -> TypeCategory {
        self.ty.category()
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn matches_name(&self, name: &str) -> bool {
        names_match(self.name, name)
    }
}

/// Field names never copied into a type, matched case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    pub fn insert(&mut self, name: &str) {
        self.names.insert(name.to_lowercase());
    }

    pub fn merge(&mut self, other: &ExclusionSet) {
        self.names.extend(other.names.iter().cloned());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Folded (lowercase) names
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Everything the engine needs to know about a copyable type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    key: TypeKey,
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    exclusions: ExclusionSet,
    methods: Vec<&'static str>,
    parent: Option<TypeKey>,
}

impl TypeDescriptor {
    pub fn new(key: TypeKey, name: &'static str) -> Self {
        Self {
            key,
            name,
            fields: Vec::new(),
            exclusions: ExclusionSet::new(),
            methods: Vec::new(),
            parent: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn with_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.exclusions.insert(name.as_ref());
        }
        self
    }

    pub fn with_methods(mut self, methods: &[&'static str]) -> Self {
        self.methods.extend_from_slice(methods);
        self
    }

    /// Append the ancestor's fields and methods after this type's own
    pub fn with_parent(mut self, parent: TypeDescriptor) -> Self {
        self.parent = Some(parent.key);
        self.fields.extend(parent.fields);
        self.methods.extend(parent.methods);
        self
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Own fields first, then every ancestor's
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn methods(&self) -> &[&'static str] {
        &self.methods
    }

    pub fn parent(&self) -> Option<TypeKey> {
        self.parent
    }

    /// First assignable field whose name matches case-insensitively
    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| !field.is_constant() && field.matches_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<i32>(), TypeKey::of::<i32>());
        assert_ne!(TypeKey::of::<i32>(), TypeKey::of::<i64>());
        assert!(TypeKey::of::<Marker>().name().ends_with("Marker"));
    }

    #[test]
    fn test_element_type_dynamic() {
        assert!(ElementType::of::<serde_json::Value>().is_dynamic());
        assert!(!ElementType::of::<String>().is_dynamic());
    }

    #[test]
    fn test_same_declared_type_for_containers() {
        let a = FieldType::collection::<Vec<i32>>(
            ContainerKind::Vec,
            ElementType::of::<i32>(),
        );
        let b = FieldType::collection::<Vec<String>>(
            ContainerKind::Vec,
            ElementType::of::<String>(),
        );
        let c = FieldType::collection::<std::collections::HashSet<i32>>(
            ContainerKind::HashSet,
            ElementType::of::<i32>(),
        );

        assert!(a.same_declared_type(&b));
        assert!(!a.same_declared_type(&c));
    }

    #[test]
    fn test_same_declared_type_for_scalars() {
        let a = FieldType::primitive::<i32>(PrimitiveKind::I32);
        let b = FieldType::boxed::<Option<i32>>(WrapperKind::Boxed(PrimitiveKind::I32));
        assert!(a.same_declared_type(&a));
        assert!(!a.same_declared_type(&b));
    }

    #[test]
    fn test_names_match_case_insensitively() {
        assert!(names_match("fooId", "FOOID"));
        assert!(names_match("Ärger", "äRGER"));
        assert!(!names_match("foo_id", "fooId"));
    }

    #[test]
    fn test_exclusion_set() {
        let set = ExclusionSet::from_names(["fooId", "Secret"]);
        assert!(set.contains("FOOID"));
        assert!(set.contains("secret"));
        assert!(!set.contains("name"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_find_field_skips_constants() {
        let ty = FieldType::primitive::<i64>(PrimitiveKind::I64);
        let descriptor = TypeDescriptor::new(TypeKey::of::<Marker>(), "Marker").with_fields(vec![
            FieldDescriptor::constant("VERSION", ty),
            FieldDescriptor::new("version", ty),
        ]);

        let found = descriptor.find_field("Version").expect("field should be found");
        assert!(!found.is_constant());
    }

    #[test]
    fn test_with_parent_appends_after_own_fields() {
        let ty = FieldType::primitive::<i64>(PrimitiveKind::I64);
        let parent = TypeDescriptor::new(TypeKey::of::<u8>(), "Parent")
            .with_fields(vec![FieldDescriptor::new("id", ty)])
            .with_methods(&["describe"]);
        let child = TypeDescriptor::new(TypeKey::of::<Marker>(), "Child")
            .with_fields(vec![FieldDescriptor::new("name", ty)])
            .with_methods(&["rename"])
            .with_parent(parent);

        let names: Vec<&str> = child.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["name", "id"]);
        assert_eq!(child.methods(), &["rename", "describe"]);
        assert_eq!(child.parent(), Some(TypeKey::of::<u8>()));
    }
}
