use super::{Basis, KeyComponentProfile};
use crate::accessor::Accessor;
use crate::collation::Collation;
use crate::{Component, ComponentType, Element, Error, Indexable, Result};

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::marker::PhantomData;

/// Builds a [`KeyComponentProfile`] reading `K` components from `V` values.
///
/// Created by [`KeyComponentProfile::ordered`] or
/// [`KeyComponentProfile::hashed`].
pub struct ProfileBuilder<V, K> {
    collation: Collation,
    accessors: Vec<Accessor<V>>,
    _component: PhantomData<fn() -> K>,
}

impl<V: Element, K: Component> ProfileBuilder<V, K> {
    pub(super) fn new(collation: Collation) -> ProfileBuilder<V, K> {
        ProfileBuilder {
            collation,
            accessors: Vec::new(),
            _component: PhantomData,
        }
    }

    /// Orders components with `compare` instead of the default rule. The name
    /// identifies the comparator when profiles are compared.
    pub fn comparator<F>(mut self, name: impl Into<Cow<'static, str>>, compare: F) -> Self
    where
        F: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    {
        self.collation = Collation::comparator::<K, F>(name.into(), compare);
        self
    }

    /// Adds an accessor. Accessors are checked when the profile is built.
    pub fn accessor(mut self, accessor: Accessor<V>) -> Self {
        self.accessors.push(accessor);
        self
    }

    pub fn accessors(mut self, accessors: impl IntoIterator<Item = Accessor<V>>) -> Self {
        self.accessors.extend(accessors);
        self
    }

    /// Builds the profile from the supplied accessors.
    ///
    /// When `K` is `V` the profile is an identity profile and accessors are
    /// ignored.
    pub fn build(self) -> Result<KeyComponentProfile<V>> {
        if is_identity::<V, K>() {
            return Ok(self.build_identity());
        }

        if self.accessors.is_empty() {
            return Err(Error::invalid_profile(format!(
                "no accessor supplied for component type `{}` of `{}`; add one \
                 or discover them from the owner's catalog",
                ComponentType::of::<K>(),
                ComponentType::of::<V>(),
            )));
        }

        self.build_with(Basis::Accessor)
    }

    /// Builds the profile, taking accessors from `V`'s [`Indexable`] catalog
    /// unless some were supplied explicitly.
    ///
    /// Every catalog accessor yielding `K` is used. When there are several, all
    /// of them contribute components and a warning names them.
    pub fn discover(mut self) -> Result<KeyComponentProfile<V>>
    where
        V: Indexable,
    {
        if is_identity::<V, K>() {
            return Ok(self.build_identity());
        }

        if !self.accessors.is_empty() {
            return self.build_with(Basis::Accessor);
        }

        let component = ComponentType::of::<K>();
        self.accessors = V::accessors()
            .into_iter()
            .filter(|accessor| accessor.component_type() == component)
            .collect();

        match self.accessors.len() {
            0 => {
                return Err(Error::invalid_profile(format!(
                    "no accessor of `{}` yields `{component}` or a collection of `{component}`",
                    ComponentType::of::<V>(),
                )))
            }
            1 => {}
            _ => {
                let names: Vec<&str> = self.accessors.iter().map(Accessor::name).collect();
                tracing::warn!(
                    owner = %ComponentType::of::<V>(),
                    component = %component,
                    accessors = ?names,
                    "several accessors yield the component type; all of them are used"
                );
            }
        }

        self.build_with(Basis::DiscoveredAccessor)
    }

    fn build_identity(self) -> KeyComponentProfile<V> {
        KeyComponentProfile::new_identity(self.collation)
    }

    fn build_with(self, basis: Basis) -> Result<KeyComponentProfile<V>> {
        validate_accessors::<V, K>(&self.accessors)?;

        Ok(KeyComponentProfile::from_parts(
            ComponentType::of::<K>(),
            basis,
            self.accessors,
            self.collation,
        ))
    }
}

fn is_identity<V: 'static, K: 'static>() -> bool {
    ComponentType::of::<V>() == ComponentType::of::<K>()
}

fn validate_accessors<V, K: 'static>(accessors: &[Accessor<V>]) -> Result<()> {
    let mut names = HashSet::new();

    for accessor in accessors {
        if accessor.name().is_empty() {
            return Err(Error::invalid_profile("accessor has an empty name"));
        }

        if !names.insert(accessor.name()) {
            return Err(Error::invalid_profile(format!(
                "accessor `{}` is supplied more than once",
                accessor.name()
            )));
        }
    }

    let Some((first, rest)) = accessors.split_first() else {
        return Ok(());
    };

    if let Some(other) = rest
        .iter()
        .find(|accessor| accessor.component_type() != first.component_type())
    {
        return Err(Error::invalid_profile(format!(
            "accessor `{}` yields `{}`, which differs from `{}` yielded by accessor `{}`",
            other.name(),
            other.component_type(),
            first.component_type(),
            first.name(),
        )));
    }

    let expected = ComponentType::of::<K>();
    if first.component_type() != expected {
        return Err(Error::invalid_profile(format!(
            "accessors yield `{}`, which differs from the profile's component type `{expected}`",
            first.component_type(),
        )));
    }

    Ok(())
}
