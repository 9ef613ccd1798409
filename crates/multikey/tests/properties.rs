mod support;

use multikey::{CompositeKey, KeyComponent, KeyComponentProfile, OrderedSet};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std_util::slice::SliceUtil;
use support::*;

const AUTHORS: [Author; 5] = [
    Author { last: "Atwood", first: "Margaret" },
    Author { last: "Banks", first: "Iain" },
    Author { last: "Chiang", first: "Ted" },
    Author { last: "Delany", first: "Samuel" },
    Author { last: "Egan", first: "Greg" },
];

const GENRES: [&str; 4] = ["Comedy", "Fantasy", "Horror", "SF"];

#[derive(Debug, Clone)]
enum Op {
    Insert(Book),
    Remove(u32),
}

/// Books share a small id space so inserts regularly hit existing members.
fn arb_book() -> impl Strategy<Value = Book> {
    (
        0u32..16,
        prop::sample::subsequence(AUTHORS.to_vec(), 0..=3),
        prop::sample::subsequence(GENRES.to_vec(), 0..=3),
    )
        .prop_map(|(id, authors, genres)| book(id, &format!("Book {id}"), &authors, &genres))
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => arb_book().prop_map(Op::Insert),
            1 => (0u32..16).prop_map(Op::Remove),
        ],
        0..40,
    )
}

fn profiles() -> Vec<KeyComponentProfile<Book>> {
    vec![by_author(), by_genre()]
}

/// Applies `ops` and returns the set with the model of its members.
fn apply(ops: &[Op]) -> (OrderedSet<Book>, Vec<Book>) {
    let mut set = OrderedSet::new(profiles()).unwrap();
    let mut model: Vec<Book> = vec![];

    for op in ops {
        match op {
            Op::Insert(book) => {
                let changed = set.insert(book.clone()).unwrap();
                assert_eq!(changed, !model.contains(book));
                if changed {
                    model.push(book.clone());
                }
            }
            Op::Remove(id) => {
                let lookup = book(*id, "", &[], &[]);
                let removed = set.remove(&lookup);
                assert_eq!(removed, model.contains(&lookup));
                model.retain(|member| member.id != *id);
            }
        }
    }

    (set, model)
}

fn compare_keys(
    profiles: &[KeyComponentProfile<Book>],
    a: &CompositeKey,
    b: &CompositeKey,
) -> Ordering {
    profiles
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(profile, (a, b))| profile.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn components_of(set: &OrderedSet<Book>, profile: &KeyComponentProfile<Book>) -> Vec<KeyComponent> {
    set.key_component_set(profile).unwrap().to_vec()
}

proptest! {
    #[test]
    fn membership_counts_distinct_values(ops in arb_ops()) {
        let (set, model) = apply(&ops);

        prop_assert_eq!(set.len(), model.len());
        let distinct: HashSet<u32> = set.values().iter().map(|book| book.id).collect();
        prop_assert_eq!(distinct.len(), model.iter().filter(|book| {
            !book.authors.is_empty() && !book.genres.is_empty()
        }).count());
    }

    #[test]
    fn entries_are_in_composite_key_order(ops in arb_ops()) {
        let (set, _) = apply(&ops);
        let keys = set.composite_keys();

        let sorted = keys.is_sorted_with(|a: &CompositeKey, b: &CompositeKey| {
            compare_keys(set.profiles(), a, b)
        });
        prop_assert!(sorted);
        for pair in keys.windows(2) {
            prop_assert_eq!(compare_keys(set.profiles(), &pair[0], &pair[1]), Ordering::Less);
        }
    }

    #[test]
    fn leaves_are_the_product_of_component_counts(ops in arb_ops()) {
        let (set, model) = apply(&ops);

        let expected: usize = model
            .iter()
            .map(|book| book.authors.len() * book.genres.len())
            .sum();
        prop_assert_eq!(set.leaf_count(), expected);
    }

    #[test]
    fn insert_then_remove_restores_everything(ops in arb_ops(), extra in arb_book()) {
        let (mut set, model) = apply(&ops);
        prop_assume!(!model.contains(&extra));

        let before = ids(&set.values());
        let authors = components_of(&set, &by_author());
        let genres = components_of(&set, &by_genre());

        prop_assert!(set.insert(extra.clone()).unwrap());
        prop_assert!(set.remove(&extra));

        prop_assert_eq!(ids(&set.values()), before);
        prop_assert_eq!(components_of(&set, &by_author()), authors);
        prop_assert_eq!(components_of(&set, &by_genre()), genres);
    }

    #[test]
    fn component_sets_match_members(ops in arb_ops()) {
        let (set, model) = apply(&ops);

        for profile in &set.profiles()[..2] {
            let mut expected: Vec<KeyComponent> = model
                .iter()
                .flat_map(|book| profile.extract(book))
                .collect();
            expected.sort_by(|a, b| profile.compare(a, b));
            expected.dedup();

            prop_assert_eq!(components_of(&set, profile), expected);
        }
    }

    #[test]
    fn suppressed_values_have_no_consecutive_duplicates(ops in arb_ops()) {
        let (set, _) = apply(&ops);
        let all = set.values();
        let suppressed = set.values_with(true);

        prop_assert!(!suppressed.has_consecutive_duplicates());

        // collapsing runs of `all` by hand gives the same sequence
        let mut runs = all.clone();
        runs.dedup();
        prop_assert_eq!(ids(&suppressed), ids(&runs));
    }
}
