use crate::collation::{Collation, Slot};
use crate::{ComponentType, KeyComponent};

use std::collections::BTreeSet;
use std::fmt;

/// The distinct key components a set's members yield for one profile,
/// ordered by that profile's collation.
#[derive(Clone)]
pub struct ComponentSet {
    collation: Collation,
    slots: BTreeSet<Slot>,
}

impl ComponentSet {
    pub(crate) fn new(collation: &Collation) -> ComponentSet {
        ComponentSet {
            collation: collation.clone(),
            slots: BTreeSet::new(),
        }
    }

    pub(crate) fn extend(&mut self, components: impl IntoIterator<Item = KeyComponent>) {
        let collation = &self.collation;
        self.slots.extend(
            components
                .into_iter()
                .map(|component| Slot::new(component, collation)),
        );
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn component_type(&self) -> ComponentType {
        self.collation.component_type()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns `true` if the set holds a component equal to `component` under
    /// the profile's collation. Components of another type are never held.
    pub fn contains(&self, component: &KeyComponent) -> bool {
        self.collation.accepts(component)
            && self
                .slots
                .contains(&Slot::new(component.clone(), &self.collation))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &KeyComponent> + ExactSizeIterator + '_ {
        self.slots.iter().map(Slot::component)
    }

    /// Iterates the components downcast to `K`. Yields nothing unless `K` is
    /// the profile's component type.
    pub fn iter_as<K: 'static>(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().filter_map(KeyComponent::downcast_ref::<K>)
    }

    pub fn to_vec(&self) -> Vec<KeyComponent> {
        self.iter().cloned().collect()
    }
}

impl fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
