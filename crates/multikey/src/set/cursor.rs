use super::OrderedSet;
use crate::Element;

/// Walks the members of an [`OrderedSet`] in insertion order and can remove
/// the member it returned last.
///
/// Created by [`OrderedSet::cursor`]. The cursor borrows the set mutably, so
/// the set cannot change underneath it except through [`Cursor::remove`].
pub struct Cursor<'a, V> {
    set: &'a mut OrderedSet<V>,

    /// Position of the next member to return.
    position: usize,

    /// Position of the member returned by the last `next`, until removed.
    current: Option<usize>,
}

impl<'a, V: Element> Cursor<'a, V> {
    pub(super) fn new(set: &'a mut OrderedSet<V>) -> Cursor<'a, V> {
        Cursor {
            set,
            position: 0,
            current: None,
        }
    }

    /// Returns the next member, or `None` once every member was visited. After
    /// `None`, [`Cursor::remove`] has nothing to remove.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&V> {
        self.current = None;
        let value = self.set.elements.get_index(self.position)?;
        self.current = Some(self.position);
        self.position += 1;
        Some(value)
    }

    /// Removes the member last returned by [`Cursor::next`] from the set, its
    /// index and its key component sets.
    ///
    /// Returns `None` if the last `next` returned `None`, or if it has not
    /// returned a member since the last removal.
    pub fn remove(&mut self) -> Option<V> {
        let position = self.current.take()?;
        let value = self.set.elements.shift_remove_index(position)?;
        self.position = position;

        self.set.unindex(&value);
        self.set.rebuild_component_sets();

        tracing::debug!(
            set = %self.set.label(),
            len = self.set.len(),
            leaves = self.set.leaf_count(),
            "removed value through cursor"
        );
        Some(value)
    }

    /// The set the cursor walks.
    pub fn set(&self) -> &OrderedSet<V> {
        self.set
    }
}
