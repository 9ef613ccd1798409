//! Members must not change their key components while in a set. These tests
//! pin what happens when they do, and the remove, change, insert protocol
//! that avoids it.

use multikey::{Accessor, KeyComponent, KeyComponentProfile, OrderedSet};
use pretty_assertions::assert_eq;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use std_util::prelude::*;

/// A note whose tags can be changed through a shared handle.
#[derive(Debug, Clone)]
struct Note {
    id: u32,
    tags: Arc<Mutex<Vec<&'static str>>>,
}

impl Note {
    fn new(id: u32, tags: &[&'static str]) -> Note {
        Note {
            id,
            tags: Arc::new(Mutex::new(tags.to_vec())),
        }
    }

    fn retag(&self, tags: &[&'static str]) {
        *self.tags.lock().unwrap() = tags.to_vec();
    }

    /// A copy with its own tags.
    fn detached(&self) -> Note {
        Note::new(self.id, &self.tags.lock().unwrap())
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl Hash for Note {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn by_tag() -> KeyComponentProfile<Note> {
    assert_ok!(KeyComponentProfile::<Note>::ordered::<&'static str>()
        .accessor(Accessor::collection("tags", |note: &Note| {
            note.tags.lock().unwrap().clone()
        }))
        .build())
}

fn tagged(set: &OrderedSet<Note>, tag: &'static str) -> Vec<u32> {
    assert_ok!(set.values_for(&KeyComponent::new(tag)))
        .iter()
        .map(|note| note.id)
        .collect()
}

#[test]
fn mutating_a_member_in_place_leaves_the_index_stale() {
    let note = Note::new(1, &["draft"]);
    let mut set = assert_ok!(OrderedSet::with_values([note.clone()], [by_tag()]));

    note.retag(&["final"]);

    // still filed under the old tag, not found under the new one
    assert_eq!(tagged(&set, "draft"), [1]);
    assert_empty!(tagged(&set, "final"));

    // removal looks under the new tag and misses the old leaf
    assert!(set.remove(&note));
    assert!(set.is_empty());
    assert_eq!(set.leaf_count(), 1);
    assert_eq!(tagged(&set, "draft"), [1]);
}

#[test]
fn remove_change_insert_keeps_the_index_consistent() {
    let note = Note::new(1, &["draft"]);
    let mut set = assert_ok!(OrderedSet::with_values([note.clone()], [by_tag()]));

    assert!(set.remove(&note));
    let note = note.detached();
    note.retag(&["final"]);
    assert!(assert_ok!(set.insert(note)));

    assert_empty!(tagged(&set, "draft"));
    assert_eq!(tagged(&set, "final"), [1]);
    assert_eq!(set.leaf_count(), 1);

    let tags: Vec<&str> = assert_ok!(set.key_component_set(&by_tag()))
        .iter_as::<&'static str>()
        .copied()
        .collect();
    assert_eq!(tags, ["final"]);
}
