//! Batch copies over sequences and sets

use super::Copier;
use crate::codec::SerializationBackend;
use crate::introspect::Copyable;
use crate::types::{CopyError, Result};
use tracing::debug;

impl<B: SerializationBackend> Copier<B> {
    /// Copy every element into a new `Vec`, preserving order
    ///
    /// # Errors
    /// `EmptyInput` when `sources` yields nothing; otherwise the first
    /// element failure, in which case nothing is returned.
    pub fn copy_all<'a, T, I>(&self, sources: I) -> Result<Vec<T>>
    where
        T: Copyable,
        I: IntoIterator<Item = &'a T>,
    {
        self.copy_all_as_with(sources, Vec::new)
    }

    /// Project every element into `D`, preserving order
    pub fn copy_all_as<'a, S, D, I>(&self, sources: I) -> Result<Vec<D>>
    where
        S: Copyable,
        D: Copyable,
        I: IntoIterator<Item = &'a S>,
    {
        self.copy_all_as_with(sources, Vec::new)
    }

    /// Copy every element into a container built by `factory`
    ///
    /// The container's own rules apply: a set drops copies that compare
    /// equal.
    ///
    /// # Example
    /// ```
    /// use objkopy::{copyable, Copier};
    /// use serde::{Deserialize, Serialize};
    /// use std::collections::BTreeSet;
    ///
    /// #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
    /// struct Tag {
    ///     name: String,
    /// }
    ///
    /// copyable!(Tag { fields { name: String; } });
    ///
    /// let tags = vec![
    ///     Tag { name: "b".into() },
    ///     Tag { name: "a".into() },
    ///     Tag { name: "b".into() },
    /// ];
    /// let set = Copier::new().copy_all_with(&tags, BTreeSet::new)?;
    /// assert_eq!(set.len(), 2);
    /// # Ok::<(), objkopy::CopyError>(())
    /// ```
    pub fn copy_all_with<'a, T, I, C, F>(&self, sources: I, factory: F) -> Result<C>
    where
        T: Copyable,
        I: IntoIterator<Item = &'a T>,
        C: Extend<T>,
        F: FnOnce() -> C,
    {
        self.copy_all_as_with(sources, factory)
    }

    /// Project every element into `D` and collect into a container built by
    /// `factory`
    pub fn copy_all_as_with<'a, S, D, I, C, F>(&self, sources: I, factory: F) -> Result<C>
    where
        S: Copyable,
        D: Copyable,
        I: IntoIterator<Item = &'a S>,
        C: Extend<D>,
        F: FnOnce() -> C,
    {
        let mut sources = sources.into_iter().peekable();
        if sources.peek().is_none() {
            let type_name = self.introspector.describe::<S>().name();
            return Err(CopyError::EmptyInput(format!(
                "no {} elements were given",
                type_name
            )));
        }

        let plan = self.plan::<S, D>();
        let mut copies = Vec::with_capacity(sources.size_hint().0);
        for source in sources {
            let mut dest = D::instantiate()?;
            self.execute(&plan, source, &mut dest)?;
            copies.push(dest);
        }

        debug!(
            "Copied {} {} elements into {}",
            copies.len(),
            plan.source_type(),
            plan.dest_type()
        );

        let mut output = factory();
        output.extend(copies);
        Ok(output)
    }
}
