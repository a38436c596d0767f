//! Copyable records and enums, and the macros that declare them

use crate::codec::SerializationBackend;
use crate::types::{EnumInfo, FieldValue, Result, TypeDescriptor};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record whose fields the copy engine can enumerate, read and assign
///
/// Implementations are normally generated with [`copyable!`](crate::copyable).
/// Field access goes through names rather than visibility, so the engine can
/// fill private fields of types declared in other modules.
pub trait Copyable: Serialize + DeserializeOwned + Sized + 'static {
    /// Static description: own fields, then every ancestor's
    fn describe() -> TypeDescriptor;

    /// Fresh instance in its default form
    fn instantiate() -> Result<Self>;

    /// Read the field named `name` (exact declared name)
    ///
    /// Returns `Ok(None)` when the type has no such field.
    fn read_field<B: SerializationBackend>(
        &self,
        name: &str,
        backend: &B,
    ) -> Result<Option<FieldValue>>;

    /// Assign `value` to the field named `name` (exact declared name)
    ///
    /// Returns `Ok(false)` when the type has no such assignable field.
    fn write_field<B: SerializationBackend>(
        &mut self,
        name: &str,
        value: FieldValue,
        backend: &B,
    ) -> Result<bool>;
}

/// A unit-only enum whose constants are matched by canonical name
pub trait CopyableEnum: Sized + Default + 'static {
    fn enum_info() -> &'static EnumInfo;

    /// Canonical name of this constant
    fn constant_name(&self) -> &'static str;

    /// Constant whose canonical name is exactly `name`
    fn from_constant(name: &str) -> Option<Self>;
}

/// Implement [`Copyable`], [`FieldKind`](crate::FieldKind) and
/// [`NullableKind`](crate::NullableKind) for a struct, so it can be declared
/// as a field both as itself and as an `Option`
///
/// Clauses must appear in this order, all but `fields` optional:
///
/// - `construct <fn() -> Option<Self>>;` builds the default form of types
///   without a `Default` impl. Returning `None` makes every copy into the
///   type fail with an `Uninstantiable` error.
/// - `extends <field>: <Parent>;` names an embedded parent record. Its fields
///   are listed after the type's own, and reads and writes fall through to it.
/// - `exclude [..];` lists fields never copied into this type.
/// - `constants { NAME: Ty = value; }` declares associated constants. They are
///   described, readable, and never copied.
/// - `methods [..];` lists method names reported by the introspector.
/// - `fields { name: Ty; }` lists the copyable fields.
///
/// Nested records are deep-copied through the serialization backend, so a
/// record used as a projection target for a different nested shape should
/// carry `#[serde(default)]`.
///
/// # Example
/// ```
/// use objkopy::{copyable, Copier};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// struct Account {
///     id: i64,
///     owner: String,
///     tags: Vec<String>,
/// }
///
/// copyable!(Account {
///     exclude ["id"];
///     fields {
///         id: i64;
///         owner: String;
///         tags: Vec<String>;
///     }
/// });
///
/// let source = Account { id: 7, owner: "ada".into(), tags: vec!["admin".into()] };
/// let copy = Copier::new().copy(&source)?;
/// assert_eq!(copy.id, 0);
/// assert_eq!(copy.owner, "ada");
/// assert_eq!(copy.tags, source.tags);
/// # Ok::<(), objkopy::CopyError>(())
/// ```
#[macro_export]
macro_rules! copyable {
    (
        $ty:ident {
            $(construct $ctor:expr;)?
            $(extends $parent_field:ident: $parent:ty;)?
            $(exclude [$($excluded:literal),* $(,)?];)?
            $(constants { $($const_name:ident: $const_ty:ty = $const_value:expr;)* })?
            $(methods [$($method:literal),* $(,)?];)?
            fields { $($field:ident: $field_ty:ty;)* }
        }
    ) => {
        $(
            impl $ty {
                $(pub const $const_name: $const_ty = $const_value;)*
            }
        )?

        impl $crate::Copyable for $ty {
            fn describe() -> $crate::TypeDescriptor {
                #[allow(unused_mut)]
                let mut fields: ::std::vec::Vec<$crate::FieldDescriptor> = ::std::vec![
                    $(
                        $crate::FieldDescriptor::new(
                            stringify!($field),
                            <$field_ty as $crate::FieldKind>::field_type(),
                        ),
                    )*
                ];
                $($(
                    fields.push($crate::FieldDescriptor::constant(
                        stringify!($const_name),
                        <$const_ty as $crate::FieldKind>::field_type(),
                    ));
                )*)?
                let excluded: &[&str] = &[$($($excluded),*)?];
                let methods: &[&'static str] = &[$($($method),*)?];
                let descriptor = $crate::TypeDescriptor::new(
                    $crate::TypeKey::of::<Self>(),
                    stringify!($ty),
                )
                .with_fields(fields)
                .with_exclusions(excluded.iter())
                .with_methods(methods);
                $(
                    let descriptor =
                        descriptor.with_parent(<$parent as $crate::Copyable>::describe());
                )?
                descriptor
            }

            fn instantiate() -> $crate::types::Result<Self> {
                $crate::__copyable_instantiate!($ty $(, $ctor)?)
            }

            #[allow(unused_variables)]
            fn read_field<B: $crate::SerializationBackend>(
                &self,
                name: &str,
                backend: &B,
            ) -> $crate::types::Result<::std::option::Option<$crate::FieldValue>> {
                $(
                    if name == stringify!($field) {
                        return <$field_ty as $crate::FieldKind>::to_value(&self.$field, backend)
                            .map(::std::option::Option::Some);
                    }
                )*
                $($(
                    if name == stringify!($const_name) {
                        return <$const_ty as $crate::FieldKind>::to_value(&Self::$const_name, backend)
                            .map(::std::option::Option::Some);
                    }
                )*)?
                $(
                    if let ::std::option::Option::Some(value) =
                        <$parent as $crate::Copyable>::read_field(&self.$parent_field, name, backend)?
                    {
                        return ::std::result::Result::Ok(::std::option::Option::Some(value));
                    }
                )?
                ::std::result::Result::Ok(::std::option::Option::None)
            }

            #[allow(unused_variables, unreachable_code)]
            fn write_field<B: $crate::SerializationBackend>(
                &mut self,
                name: &str,
                value: $crate::FieldValue,
                backend: &B,
            ) -> $crate::types::Result<bool> {
                $(
                    if name == stringify!($field) {
                        self.$field = <$field_ty as $crate::FieldKind>::from_value(value, backend)?;
                        return ::std::result::Result::Ok(true);
                    }
                )*
                $(
                    return <$parent as $crate::Copyable>::write_field(
                        &mut self.$parent_field,
                        name,
                        value,
                        backend,
                    );
                )?
                ::std::result::Result::Ok(false)
            }
        }

        impl $crate::FieldKind for $ty {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::object::<Self>()
            }

            fn to_value<B: $crate::SerializationBackend>(
                &self,
                backend: &B,
            ) -> $crate::types::Result<$crate::FieldValue> {
                $crate::introspect::object_to_value(self, backend)
            }

            fn from_value<B: $crate::SerializationBackend>(
                value: $crate::FieldValue,
                backend: &B,
            ) -> $crate::types::Result<Self> {
                $crate::introspect::object_from_value(value, backend)
            }
        }

        impl $crate::introspect::NullableKind for $ty {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __copyable_instantiate {
    ($ty:ident) => {
        ::std::result::Result::Ok(<$ty as ::std::default::Default>::default())
    };
    ($ty:ident, $ctor:expr) => {
        match ($ctor)() {
            ::std::option::Option::Some(instance) => ::std::result::Result::Ok(instance),
            ::std::option::Option::None => ::std::result::Result::Err(
                $crate::CopyError::uninstantiable(
                    stringify!($ty),
                    "constructor produced no instance",
                ),
            ),
        }
    };
}

/// Implement [`CopyableEnum`], [`FieldKind`](crate::FieldKind) and
/// [`NullableKind`](crate::NullableKind) for a unit-only enum
///
/// The enum must implement `Default`; that constant is what an absent value
/// assigns. Canonical constant names are the variant identifiers.
///
/// # Example
/// ```
/// use objkopy::{copyable_enum, CopyableEnum};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq)]
/// enum Status {
///     #[default]
///     Draft,
///     Published,
/// }
///
/// copyable_enum!(Status { Draft, Published });
///
/// assert_eq!(Status::Published.constant_name(), "Published");
/// assert_eq!(Status::from_constant("Draft"), Some(Status::Draft));
/// assert_eq!(Status::from_constant("draft"), None);
/// ```
#[macro_export]
macro_rules! copyable_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::CopyableEnum for $ty {
            fn enum_info() -> &'static $crate::EnumInfo {
                static INFO: $crate::EnumInfo = $crate::EnumInfo {
                    name: stringify!($ty),
                    constants: &[$(stringify!($variant)),*],
                };
                &INFO
            }

            fn constant_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)*
                }
            }

            fn from_constant(name: &str) -> ::std::option::Option<Self> {
                $(
                    if name == stringify!($variant) {
                        return ::std::option::Option::Some($ty::$variant);
                    }
                )*
                ::std::option::Option::None
            }
        }

        impl $crate::FieldKind for $ty {
            fn field_type() -> $crate::FieldType {
                $crate::FieldType::enumeration::<Self>(
                    <Self as $crate::CopyableEnum>::enum_info(),
                )
            }

            fn to_value<B: $crate::SerializationBackend>(
                &self,
                _backend: &B,
            ) -> $crate::types::Result<$crate::FieldValue> {
                ::std::result::Result::Ok($crate::introspect::enum_to_value(self))
            }

            fn from_value<B: $crate::SerializationBackend>(
                value: $crate::FieldValue,
                _backend: &B,
            ) -> $crate::types::Result<Self> {
                $crate::introspect::enum_from_value(value)
            }
        }

        impl $crate::introspect::NullableKind for $ty {}
    };
}
