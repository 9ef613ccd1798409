mod entry;
pub use entry::{CompositeKey, Entry};

mod report;
pub use report::{Dump, Report};

use crate::collation::Slot;
use crate::{Element, Error, Instrument, KeyComponent, KeyComponentProfile, Result};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A recursive index implementing one composite-key ordering.
///
/// Each node consumes one profile. A node with a single remaining profile maps
/// that profile's components straight to values; any other node maps them to
/// child nodes handling the remaining profiles. The last profile is always an
/// identity profile, so every leaf is keyed by the value itself and a value
/// occupies one leaf per distinct composite key it yields.
///
/// Traversal is lexicographic over composite keys, each level ordered by its
/// profile's collation.
pub struct MapNode<V> {
    /// Every profile of the index; this node handles `profiles[level]`.
    profiles: Arc<[KeyComponentProfile<V>]>,
    level: usize,
    table: Table<V>,
    instrument: Option<Arc<dyn Instrument>>,
}

enum Table<V> {
    /// Used when this node handles the last profile.
    Bottom(BTreeMap<Slot, V>),

    /// Used when more profiles follow.
    Middle(BTreeMap<Slot, MapNode<V>>),
}

impl<V: Element> MapNode<V> {
    /// Creates an empty index ordered by `profiles`.
    ///
    /// An identity profile is appended when the last profile is not one.
    pub fn new(profiles: impl IntoIterator<Item = KeyComponentProfile<V>>) -> Result<MapNode<V>> {
        MapNode::build(profiles, None)
    }

    /// Like [`MapNode::new`], reporting node life cycle events to `instrument`.
    pub fn with_instrument(
        profiles: impl IntoIterator<Item = KeyComponentProfile<V>>,
        instrument: Arc<dyn Instrument>,
    ) -> Result<MapNode<V>> {
        MapNode::build(profiles, Some(instrument))
    }

    fn build(
        profiles: impl IntoIterator<Item = KeyComponentProfile<V>>,
        instrument: Option<Arc<dyn Instrument>>,
    ) -> Result<MapNode<V>> {
        let mut profiles: Vec<_> = profiles.into_iter().collect();

        let Some(last) = profiles.last() else {
            return Err(Error::invalid_argument(
                "at least one key component profile is required",
            ));
        };

        if !last.is_identity() {
            profiles.push(KeyComponentProfile::identity());
        }

        Ok(MapNode::node(profiles.into(), 0, instrument))
    }

    /// Returns an empty index with the same profiles and instrument.
    pub fn empty_copy(&self) -> MapNode<V> {
        MapNode::node(self.profiles.clone(), self.level, self.instrument.clone())
    }

    /// Indexes `value` under every composite key it yields.
    ///
    /// Insertion is all-or-nothing: if any of the keys is already taken by a
    /// different value, nothing is written and `false` is returned. A value that
    /// yields no composite key at all (some level extracted no component) is
    /// not indexed, and the call succeeds.
    pub fn insert(&mut self, value: &V) -> bool {
        let keys = self.expand(value);

        if let Some(key) = keys.iter().find(|key| self.conflicts(key, value)) {
            tracing::warn!(
                value = ?value,
                key = ?key,
                "composite key already holds a different value; value not indexed"
            );
            return false;
        }

        for key in &keys {
            self.insert_leaf(key, value);
        }

        true
    }

    /// Removes `value` from every composite key it yields.
    ///
    /// Returns `true` only if every one of those leaves existed and held
    /// `value`. Nodes left without entries are dropped.
    pub fn remove(&mut self, value: &V) -> bool {
        let mut removed_all = true;

        for key in self.expand(value) {
            if !self.remove_leaf(&key, value) {
                removed_all = false;
            }
        }

        removed_all
    }

    /// Every composite key `value` yields below this node, in index order.
    pub fn expand(&self, value: &V) -> Vec<CompositeKey> {
        let levels: Vec<Vec<KeyComponent>> = self
            .profiles()
            .iter()
            .map(|profile| profile.extract(value))
            .collect();

        let mut keys = Vec::new();
        expand_levels(&levels, &mut Vec::with_capacity(levels.len()), &mut keys);
        keys
    }

    fn conflicts(&self, key: &[KeyComponent], value: &V) -> bool {
        let Some((head, rest)) = key.split_first() else {
            return false;
        };
        let slot = self.slot(head);

        match &self.table {
            Table::Bottom(map) => map.get(&slot).is_some_and(|existing| existing != value),
            Table::Middle(map) => map
                .get(&slot)
                .is_some_and(|child| child.conflicts(rest, value)),
        }
    }

    fn insert_leaf(&mut self, key: &[KeyComponent], value: &V) {
        debug_assert_eq!(key.len(), self.depth());

        let Some((head, rest)) = key.split_first() else {
            return;
        };
        let slot = self.slot(head);

        let MapNode {
            profiles,
            level,
            table,
            instrument,
        } = self;

        match table {
            Table::Bottom(map) => {
                map.entry(slot).or_insert_with(|| value.clone());
            }
            Table::Middle(map) => map
                .entry(slot)
                .or_insert_with(|| MapNode::node(profiles.clone(), *level + 1, instrument.clone()))
                .insert_leaf(rest, value),
        }
    }

    fn remove_leaf(&mut self, key: &[KeyComponent], value: &V) -> bool {
        let Some((head, rest)) = key.split_first() else {
            return false;
        };
        let slot = self.slot(head);

        match &mut self.table {
            Table::Bottom(map) => {
                if !map.get(&slot).is_some_and(|existing| existing == value) {
                    return false;
                }
                map.remove(&slot);
                true
            }
            Table::Middle(map) => {
                let Some(child) = map.get_mut(&slot) else {
                    return false;
                };

                let removed = child.remove_leaf(rest, value);
                if child.is_empty() {
                    map.remove(&slot);
                }
                removed
            }
        }
    }
}

impl<V> MapNode<V> {
    fn node(
        profiles: Arc<[KeyComponentProfile<V>]>,
        level: usize,
        instrument: Option<Arc<dyn Instrument>>,
    ) -> MapNode<V> {
        let table = if level + 1 == profiles.len() {
            Table::Bottom(BTreeMap::new())
        } else {
            Table::Middle(BTreeMap::new())
        };

        if let Some(instrument) = &instrument {
            instrument.node_created(level);
        }

        MapNode {
            profiles,
            level,
            table,
            instrument,
        }
    }

    /// The profiles handled by this node and the nodes below it.
    pub fn profiles(&self) -> &[KeyComponentProfile<V>] {
        &self.profiles[self.level..]
    }

    /// Number of key components in a composite key below this node.
    pub fn depth(&self) -> usize {
        self.profiles.len() - self.level
    }

    fn profile(&self) -> &KeyComponentProfile<V> {
        &self.profiles[self.level]
    }

    fn slot(&self, component: &KeyComponent) -> Slot {
        let profile = self.profile();
        assert!(
            profile.accepts(component),
            "internal invariant violated: key component of type `{}` submitted at \
             level {} of an index expecting `{}`",
            component.component_type(),
            self.level,
            profile.component_type(),
        );
        Slot::new(component.clone(), profile.collation())
    }

    /// Number of leaf entries. A value counts once per composite key.
    pub fn len(&self) -> usize {
        match &self.table {
            Table::Bottom(map) => map.len(),
            Table::Middle(map) => map.values().map(MapNode::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.table {
            Table::Bottom(map) => map.is_empty(),
            Table::Middle(map) => map.values().all(MapNode::is_empty),
        }
    }

    /// Every value, once per composite key, in composite-key order.
    pub fn select_all(&self) -> Vec<&V> {
        let mut out = Vec::new();
        self.collect_all(&mut out);
        out
    }

    fn collect_all<'a>(&'a self, out: &mut Vec<&'a V>) {
        match &self.table {
            Table::Bottom(map) => out.extend(map.values()),
            Table::Middle(map) => {
                for child in map.values() {
                    child.collect_all(out);
                }
            }
        }
    }

    /// Values whose composite key matches `pattern`, in composite-key order.
    ///
    /// `pattern[i]` constrains level `i`: `Some` matches that component exactly,
    /// `None` matches every component. Levels past the end of the pattern match
    /// everything.
    pub fn get(&self, pattern: &[Option<KeyComponent>]) -> Result<Vec<&V>> {
        let profiles = self.profiles();

        if pattern.len() > profiles.len() {
            return Err(Error::invalid_argument(format!(
                "key pattern has {} components but the index has {} levels",
                pattern.len(),
                profiles.len()
            )));
        }

        for (level, (component, profile)) in pattern.iter().zip(profiles).enumerate() {
            if let Some(component) = component {
                if !profile.accepts(component) {
                    return Err(Error::invalid_argument(format!(
                        "key component of type `{}` at level {level}; the profile \
                         of that level yields `{}`",
                        component.component_type(),
                        profile.component_type(),
                    )));
                }
            }
        }

        let mut out = Vec::new();
        self.collect_matching(pattern, &mut out);
        Ok(out)
    }

    fn collect_matching<'a>(&'a self, pattern: &[Option<KeyComponent>], out: &mut Vec<&'a V>) {
        let (head, rest) = match pattern.split_first() {
            Some((head, rest)) => (head.as_ref(), rest),
            None => (None, pattern),
        };

        match (&self.table, head) {
            (Table::Bottom(map), None) => out.extend(map.values()),
            (Table::Bottom(map), Some(component)) => {
                out.extend(map.get(&self.slot(component)));
            }
            (Table::Middle(map), None) => {
                for child in map.values() {
                    child.collect_matching(rest, out);
                }
            }
            (Table::Middle(map), Some(component)) => {
                if let Some(child) = map.get(&self.slot(component)) {
                    child.collect_matching(rest, out);
                }
            }
        }
    }

    /// Every leaf as its full composite key and value, in composite-key order.
    pub fn entries(&self) -> Vec<Entry<'_, V>> {
        let mut out = Vec::new();
        self.collect_entries(&mut Vec::with_capacity(self.depth()), &mut out);
        out
    }

    /// Every composite key, in order.
    pub fn composite_keys(&self) -> Vec<CompositeKey> {
        self.entries().into_iter().map(Entry::into_key).collect()
    }

    fn collect_entries<'a>(&'a self, prefix: &mut Vec<KeyComponent>, out: &mut Vec<Entry<'a, V>>) {
        match &self.table {
            Table::Bottom(map) => {
                for (slot, value) in map {
                    prefix.push(slot.component().clone());
                    out.push(Entry::new(CompositeKey::from(prefix.clone()), value));
                    prefix.pop();
                }
            }
            Table::Middle(map) => {
                for (slot, child) in map {
                    prefix.push(slot.component().clone());
                    child.collect_entries(prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    /// Summary of the index structure.
    pub fn report(&self) -> Report<'_, V> {
        Report::new(self)
    }

    /// Every leaf, one per line.
    pub fn dump(&self) -> Dump<'_, V> {
        Dump::new(self)
    }
}

fn expand_levels(
    levels: &[Vec<KeyComponent>],
    partial: &mut Vec<KeyComponent>,
    out: &mut Vec<CompositeKey>,
) {
    let Some((components, rest)) = levels.split_first() else {
        out.push(CompositeKey::from(partial.clone()));
        return;
    };

    for component in components {
        partial.push(component.clone());
        expand_levels(rest, partial, out);
        partial.pop();
    }
}

impl<V> Drop for MapNode<V> {
    fn drop(&mut self) {
        if let Some(instrument) = &self.instrument {
            instrument.node_dropped(self.level);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for MapNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        match &self.table {
            Table::Bottom(table) => map.entries(table.iter()),
            Table::Middle(table) => map.entries(table.iter()),
        };
        map.finish()
    }
}
