use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{cmp::Ordering, collections::HashSet, hash::Hash};

pub trait SliceUtil {
    /// Returns `true` if the slice only contains unique values
    fn is_unique<T>(&self) -> bool
    where
        Self: AsRef<[T]>,
        T: Eq + Hash,
    {
        is_unique(self.as_ref())
    }

    /// Returns `true` if no element orders after its successor
    fn is_sorted_with<T>(&self, compare: impl FnMut(&T, &T) -> Ordering) -> bool
    where
        Self: AsRef<[T]>,
    {
        is_sorted_with(self.as_ref(), compare)
    }

    /// Returns `true` if no two neighbours are equal
    fn has_consecutive_duplicates<T>(&self) -> bool
    where
        Self: AsRef<[T]>,
        T: PartialEq,
    {
        self.as_ref().windows(2).any(|pair| pair[0] == pair[1])
    }

    /// Shuffle the slice, reproducibly for a given seed
    fn shuffle_seeded<T>(&mut self, seed: u64)
    where
        Self: AsMut<[T]>,
    {
        shuffle_seeded(self.as_mut(), seed)
    }
}

impl<T> SliceUtil for [T] {}

#[macro_export]
macro_rules! assert_unique {
    ($slice:expr) => {{
        use $crate::slice::SliceUtil;
        let slice = &$slice;
        assert!(
            slice.is_unique(),
            "expected `{}` to be unique, but it wasn't; actual={:?}",
            stringify!($slice),
            slice,
        );
    }};
}

#[macro_export]
macro_rules! assert_empty {
    ($slice:expr) => {{
        match &$slice[..] {
            [] => {}
            actual => panic!("expected slice to be empty; actual={:?}", actual),
        }
    }};
}

#[macro_export]
macro_rules! assert_sorted_by {
    ($slice:expr, $compare:expr) => {{
        use $crate::slice::SliceUtil;
        let slice = &$slice;
        assert!(
            slice.is_sorted_with($compare),
            "expected `{}` to be sorted, but it wasn't; actual={:?}",
            stringify!($slice),
            slice,
        );
    }};
}

pub fn is_unique<T: Eq + Hash>(slice: &[T]) -> bool {
    let mut s = HashSet::new();

    for el in slice {
        if !s.insert(el) {
            return false;
        }
    }

    true
}

pub fn is_sorted_with<T>(slice: &[T], mut compare: impl FnMut(&T, &T) -> Ordering) -> bool {
    slice
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

pub fn shuffle_seeded<T>(slice: &mut [T], seed: u64) {
    SliceRandom::shuffle(slice, &mut StdRng::seed_from_u64(seed));
}
