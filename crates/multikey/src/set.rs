mod builder;
pub use builder::OrderedSetBuilder;

mod component_set;
pub use component_set::ComponentSet;

mod cursor;
pub use cursor::Cursor;

use crate::index::{CompositeKey, Dump, Entry};
use crate::{Element, Error, KeyComponent, KeyComponentProfile, MapNode, Result};

use indexmap::{Equivalent, IndexMap, IndexSet};
use std::fmt;
use std::hash::Hash;

/// A set whose members are also kept in composite-key order.
///
/// Membership is decided by the members' own `Eq`/`Hash`, and [`iter`]
/// visits members in insertion order. Alongside, every member is indexed in a
/// [`MapNode`] under each composite key it yields, so [`values`] returns
/// members in the order configured by the set's profiles, once per composite
/// key. For every non-identity profile the set also maintains the
/// [`ComponentSet`] of all key components its members currently yield.
///
/// Members must not be mutated in a way that changes their key components
/// while they are in the set. To change a member, remove it, change it, then
/// insert it again.
///
/// [`iter`]: OrderedSet::iter
/// [`values`]: OrderedSet::values
///
/// # Examples
///
/// ```
/// use multikey::{Accessor, KeyComponentProfile, OrderedSet};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// struct Author(&'static str);
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// struct Book {
///     title: &'static str,
///     authors: Vec<Author>,
/// }
///
/// let by_author = KeyComponentProfile::<Book>::ordered::<Author>()
///     .accessor(Accessor::collection("authors", |book: &Book| book.authors.clone()))
///     .build()
///     .unwrap();
///
/// let mut books = OrderedSet::new([by_author.clone()]).unwrap();
/// books
///     .insert(Book { title: "Dune", authors: vec![Author("Herbert")] })
///     .unwrap();
/// books
///     .insert(Book { title: "Good Omens", authors: vec![Author("Pratchett"), Author("Gaiman")] })
///     .unwrap();
///
/// let titles: Vec<_> = books.values().iter().map(|book| book.title).collect();
/// assert_eq!(titles, ["Good Omens", "Dune", "Good Omens"]);
/// assert_eq!(books.len(), 2);
/// assert_eq!(books.key_component_set(&by_author).unwrap().len(), 3);
/// ```
pub struct OrderedSet<V> {
    name: Option<String>,

    /// Members in insertion order.
    elements: IndexSet<V>,

    index: MapNode<V>,

    /// One entry per non-identity profile, in profile order.
    component_sets: IndexMap<KeyComponentProfile<V>, ComponentSet>,
}

impl<V: Element> OrderedSet<V> {
    pub fn builder() -> OrderedSetBuilder<V> {
        OrderedSetBuilder::new()
    }

    /// Creates an empty set ordered by `profiles`.
    pub fn new(profiles: impl IntoIterator<Item = KeyComponentProfile<V>>) -> Result<OrderedSet<V>> {
        OrderedSet::builder().profiles(profiles).build()
    }

    /// Creates a set ordered by `profiles` holding `values`.
    pub fn with_values(
        values: impl IntoIterator<Item = V>,
        profiles: impl IntoIterator<Item = KeyComponentProfile<V>>,
    ) -> Result<OrderedSet<V>> {
        OrderedSet::builder().profiles(profiles).values(values).build()
    }

    fn from_index(name: Option<String>, index: MapNode<V>) -> OrderedSet<V> {
        let component_sets = index
            .profiles()
            .iter()
            .filter(|profile| !profile.is_identity())
            .map(|profile| (profile.clone(), ComponentSet::new(profile.collation())))
            .collect();

        OrderedSet {
            name,
            elements: IndexSet::new(),
            index,
            component_sets,
        }
    }

    /// Adds `value` to the set.
    ///
    /// Returns `Ok(false)` if an equal value is already a member. If any of the
    /// value's composite keys is held by a different value, the set is left
    /// unchanged and an index conflict error is returned.
    pub fn insert(&mut self, value: V) -> Result<bool> {
        if self.elements.contains(&value) {
            return Ok(false);
        }

        if !self.index.insert(&value) {
            return Err(Error::index_conflict(format!(
                "{value:?} shares a composite key with a different member of {}",
                self.label()
            )));
        }

        self.fold_components(&value);
        self.elements.insert(value);

        tracing::debug!(
            set = %self.label(),
            len = self.elements.len(),
            leaves = self.index.len(),
            "inserted value"
        );
        Ok(true)
    }

    /// Inserts every value in order, stopping at the first index conflict.
    ///
    /// Values inserted before the conflict stay in the set. Returns whether
    /// membership changed.
    pub fn extend_from(&mut self, values: impl IntoIterator<Item = V>) -> Result<bool> {
        let mut changed = false;
        for value in values {
            changed |= self.insert(value)?;
        }
        Ok(changed)
    }

    /// Removes the member equal to `value`. Returns whether it was a member.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<V>,
    {
        let Some(removed) = self.elements.shift_take(value) else {
            return false;
        };

        self.unindex(&removed);
        self.rebuild_component_sets();

        tracing::debug!(
            set = %self.label(),
            len = self.elements.len(),
            leaves = self.index.len(),
            "removed value"
        );
        true
    }

    /// Removes every member equal to one of `values`, rebuilding the
    /// component sets once. Returns whether membership changed.
    pub fn remove_all<'q, Q>(&mut self, values: impl IntoIterator<Item = &'q Q>) -> bool
    where
        Q: ?Sized + Hash + Equivalent<V> + 'q,
    {
        let mut removed = 0;
        for value in values {
            if let Some(member) = self.elements.shift_take(value) {
                self.unindex(&member);
                removed += 1;
            }
        }

        if removed > 0 {
            self.rebuild_component_sets();
            tracing::debug!(
                set = %self.label(),
                removed,
                len = self.elements.len(),
                leaves = self.index.len(),
                "removed values"
            );
        }
        removed > 0
    }

    /// Keeps only the members for which `keep` returns `true`, rebuilding the
    /// component sets once.
    pub fn retain(&mut self, mut keep: impl FnMut(&V) -> bool) {
        let mut removed = 0;
        let index = &mut self.index;

        self.elements.retain(|value| {
            if keep(value) {
                return true;
            }
            if !index.remove(value) {
                warn_stale(value);
            }
            removed += 1;
            false
        });

        if removed > 0 {
            self.rebuild_component_sets();
            tracing::debug!(
                set = %self.label(),
                removed,
                len = self.elements.len(),
                "retained values"
            );
        }
    }

    /// Removes every member. The index and component sets are replaced with
    /// empty ones using the same profiles.
    pub fn clear(&mut self) {
        self.elements = IndexSet::new();
        self.index = self.index.empty_copy();
        for set in self.component_sets.values_mut() {
            set.clear();
        }

        tracing::debug!(set = %self.label(), "cleared");
    }

    /// Members in composite-key order, once per composite key.
    pub fn values_with(&self, suppress_consecutive_duplicates: bool) -> Vec<&V> {
        let mut values = self.index.select_all();
        if suppress_consecutive_duplicates {
            values.dedup();
        }
        values
    }

    /// Members filed under `component` at the first level of the composite
    /// key, in composite-key order, each appearing once.
    ///
    /// Fails with an invalid argument error if `component` is not of the first
    /// profile's component type.
    pub fn values_for(&self, component: &KeyComponent) -> Result<Vec<&V>> {
        let first = &self.index.profiles()[0];
        if !first.accepts(component) {
            return Err(Error::invalid_argument(format!(
                "key component of type `{}` cannot select from {}; its first \
                 profile yields `{}`",
                component.component_type(),
                self.label(),
                first.component_type(),
            )));
        }

        let values = self.index.get(&[Some(component.clone())])?;
        let distinct: IndexSet<&V> = values.into_iter().collect();
        Ok(distinct.into_iter().collect())
    }

    /// A cursor over the members in insertion order that can remove the member
    /// it last returned.
    pub fn cursor(&mut self) -> Cursor<'_, V> {
        Cursor::new(self)
    }

    pub(crate) fn unindex(&mut self, value: &V) {
        if !self.index.remove(value) {
            warn_stale(value);
        }
    }

    fn fold_components(&mut self, value: &V) {
        for (profile, set) in &mut self.component_sets {
            set.extend(profile.extract(value));
        }
    }

    pub(crate) fn rebuild_component_sets(&mut self) {
        for (profile, set) in &mut self.component_sets {
            set.clear();
            for value in &self.elements {
                set.extend(profile.extract(value));
            }
        }

        tracing::trace!(
            set = %self.label(),
            profiles = self.component_sets.len(),
            "rebuilt key component sets"
        );
    }
}

impl<V> OrderedSet<V> {
    /// The name used in reports and log events.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed set")
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of index entries. A member counts once per composite key.
    pub fn leaf_count(&self) -> usize {
        self.index.len()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<V>,
    {
        self.elements.contains(value)
    }

    /// The profiles ordering this set, ending with the identity profile.
    pub fn profiles(&self) -> &[KeyComponentProfile<V>] {
        self.index.profiles()
    }

    /// Members in composite-key order, once per composite key.
    pub fn values(&self) -> Vec<&V> {
        self.index.select_all()
    }

    /// All key components the members yield for `profile`.
    ///
    /// Fails with an unknown profile error if `profile` is not one of this
    /// set's non-identity profiles.
    pub fn key_component_set(&self, profile: &KeyComponentProfile<V>) -> Result<&ComponentSet> {
        self.component_sets
            .get(profile)
            .ok_or_else(|| Error::unknown_profile(profile.to_string()))
    }

    pub fn entries(&self) -> Vec<Entry<'_, V>> {
        self.index.entries()
    }

    pub fn composite_keys(&self) -> Vec<CompositeKey> {
        self.index.composite_keys()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, V> {
        self.elements.iter()
    }

    /// Every index entry, one per line.
    pub fn dump(&self) -> Dump<'_, V> {
        self.index.dump()
    }
}

fn warn_stale<V: fmt::Debug>(value: &V) {
    tracing::warn!(
        value = ?value,
        "member was not found under every composite key it yields; it was \
         probably mutated while in the set"
    );
}

impl<'a, V> IntoIterator for &'a OrderedSet<V> {
    type Item = &'a V;
    type IntoIter = indexmap::set::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for OrderedSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSet")
            .field("name", &self.name)
            .field("elements", &self.elements)
            .finish()
    }
}

impl<V> fmt::Display for OrderedSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OrderedSet `{}`: {} members, {} entries",
            self.label(),
            self.len(),
            self.leaf_count()
        )?;

        for (profile, set) in &self.component_sets {
            writeln!(f, "  {profile}: {} key components", set.len())?;
        }

        write!(f, "{}", self.index.report())
    }
}
