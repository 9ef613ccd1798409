use super::OrderedSet;
use crate::{Element, Instrument, KeyComponentProfile, MapNode, Result};

use std::sync::Arc;

/// Configures an [`OrderedSet`].
///
/// Profiles are applied in the order they are added: the first one orders the
/// outermost level of the composite key.
pub struct OrderedSetBuilder<V> {
    name: Option<String>,
    profiles: Vec<KeyComponentProfile<V>>,
    instrument: Option<Arc<dyn Instrument>>,
    values: Vec<V>,
}

impl<V: Element> OrderedSetBuilder<V> {
    pub(super) fn new() -> OrderedSetBuilder<V> {
        OrderedSetBuilder {
            name: None,
            profiles: Vec::new(),
            instrument: None,
            values: Vec::new(),
        }
    }

    /// Names the set in reports and log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn profile(mut self, profile: KeyComponentProfile<V>) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn profiles(mut self, profiles: impl IntoIterator<Item = KeyComponentProfile<V>>) -> Self {
        self.profiles.extend(profiles);
        self
    }

    /// Reports index node creation and drops to `instrument`.
    pub fn instrument(mut self, instrument: Arc<dyn Instrument>) -> Self {
        self.instrument = Some(instrument);
        self
    }

    /// Initial members, inserted in order once the set is built.
    pub fn values(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.values.extend(values);
        self
    }

    /// Builds the set.
    ///
    /// Fails with an invalid argument error if no profile was added, or with an
    /// index conflict error if the initial values cannot all be indexed.
    pub fn build(self) -> Result<OrderedSet<V>> {
        let index = match self.instrument {
            Some(instrument) => MapNode::with_instrument(self.profiles, instrument)?,
            None => MapNode::new(self.profiles)?,
        };

        let mut set = OrderedSet::from_index(self.name, index);
        set.extend_from(self.values)?;
        Ok(set)
    }
}

impl<V: Element> Default for OrderedSetBuilder<V> {
    fn default() -> Self {
        OrderedSetBuilder::new()
    }
}
