use crate::component::WeakComponent;
use crate::{Component, ComponentType, KeyComponent};

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

/// How the components of one profile are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderingRule {
    /// The component type's `Ord` implementation.
    Natural,

    /// An explicit comparator, identified by name.
    Comparator(Cow<'static, str>),

    /// Deterministic hash order for types without `Ord`. Unequal values with
    /// equal hashes are ordered by first sight.
    Hashed,
}

impl fmt::Display for OrderingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingRule::Natural => f.write_str("natural"),
            OrderingRule::Comparator(name) => write!(f, "comparator `{name}`"),
            OrderingRule::Hashed => f.write_str("hashed"),
        }
    }
}

type CompareFn = dyn Fn(&KeyComponent, &KeyComponent) -> Ordering + Send + Sync;

/// A total order over the key components of one component type.
///
/// Selected once when a profile is built and shared by every table that
/// orders that profile's components.
#[derive(Clone)]
pub struct Collation {
    inner: Arc<CollationInner>,
}

struct CollationInner {
    rule: OrderingRule,
    component: ComponentType,
    compare: Box<CompareFn>,
}

impl Collation {
    pub(crate) fn natural<K: Component + Ord>() -> Collation {
        Collation::from_fn::<K>(OrderingRule::Natural, |a, b| {
            a.expect_ref::<K>().cmp(b.expect_ref::<K>())
        })
    }

    pub(crate) fn comparator<K, F>(name: Cow<'static, str>, compare: F) -> Collation
    where
        K: Component,
        F: Fn(&K, &K) -> Ordering + Send + Sync + 'static,
    {
        Collation::from_fn::<K>(OrderingRule::Comparator(name), move |a, b| {
            compare(a.expect_ref::<K>(), b.expect_ref::<K>())
        })
    }

    pub(crate) fn hashed<K: Component + Hash>() -> Collation {
        let ledger = CollisionLedger::default();

        Collation::from_fn::<K>(OrderingRule::Hashed, move |a, b| {
            let (x, y) = (a.expect_ref::<K>(), b.expect_ref::<K>());
            let (hx, hy) = (stable_hash(x), stable_hash(y));

            match hx.cmp(&hy) {
                Ordering::Equal if x != y => ledger.tie_break(hx, a, b),
                Ordering::Equal => Ordering::Equal,
                ordering => ordering,
            }
        })
    }

    fn from_fn<K: Component>(
        rule: OrderingRule,
        compare: impl Fn(&KeyComponent, &KeyComponent) -> Ordering + Send + Sync + 'static,
    ) -> Collation {
        Collation {
            inner: Arc::new(CollationInner {
                rule,
                component: ComponentType::of::<K>(),
                compare: Box::new(compare),
            }),
        }
    }

    pub fn rule(&self) -> &OrderingRule {
        &self.inner.rule
    }

    pub fn component_type(&self) -> ComponentType {
        self.inner.component
    }

    /// Returns `true` if `component` is of the type this collation orders.
    pub fn accepts(&self, component: &KeyComponent) -> bool {
        component.component_type() == self.inner.component
    }

    /// Compares two components.
    ///
    /// # Panics
    ///
    /// Panics if either component is not of the collation's component type.
    pub fn compare(&self, a: &KeyComponent, b: &KeyComponent) -> Ordering {
        (self.inner.compare)(a, b)
    }

    /// Sorts `components` and removes the ones that compare equal.
    pub(crate) fn sort_dedup(&self, components: &mut Vec<KeyComponent>) {
        components.sort_by(|a, b| self.compare(a, b));
        components.dedup_by(|a, b| self.compare(a, b) == Ordering::Equal);
    }
}

impl fmt::Debug for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collation")
            .field("rule", &self.inner.rule)
            .field("component", &self.inner.component)
            .finish()
    }
}

/// Hash used by [`OrderingRule::Hashed`]; fixed keys keep it stable across
/// runs of the same build.
fn stable_hash<K: Hash + ?Sized>(value: &K) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Ordinals for unequal components whose hashes collide.
///
/// Only colliding components are recorded, and only weakly: an ordinal lives
/// while some key component equal to it is alive, so a removed member is not
/// kept around by the ledger. Ordinals are never reused, so the relative order
/// of live components never changes.
#[derive(Default)]
struct CollisionLedger {
    state: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    buckets: HashMap<u64, Bucket>,

    /// Bucket count that triggers the next sweep of dead buckets.
    sweep_at: usize,
}

#[derive(Default)]
struct Bucket {
    next: u64,
    ties: Vec<Tie>,
}

/// One value seen in a bucket, with handles to every allocation of it that
/// took part in a comparison.
struct Tie {
    ordinal: u64,
    handles: Vec<WeakComponent>,
}

impl CollisionLedger {
    fn tie_break(&self, hash: u64, a: &KeyComponent, b: &KeyComponent) -> Ordering {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.sweep();

        let bucket = state.buckets.entry(hash).or_default();
        bucket.prune();

        let first = bucket.ordinal(a);
        let second = bucket.ordinal(b);
        first.cmp(&second)
    }
}

impl LedgerState {
    /// Drops buckets whose components are all gone. Runs when the bucket count
    /// doubles, so the cost is amortized over the collisions that grew it.
    fn sweep(&mut self) {
        if self.buckets.len() < self.sweep_at {
            return;
        }

        self.buckets.retain(|_, bucket| {
            bucket.prune();
            !bucket.ties.is_empty()
        });
        self.sweep_at = (self.buckets.len() * 2).max(16);
    }
}

impl Bucket {
    fn prune(&mut self) {
        self.ties.retain_mut(|tie| {
            tie.handles.retain(WeakComponent::is_alive);
            !tie.handles.is_empty()
        });
    }

    fn ordinal(&mut self, component: &KeyComponent) -> u64 {
        for tie in &mut self.ties {
            let same_value = tie
                .handles
                .iter()
                .find_map(WeakComponent::upgrade)
                .is_some_and(|held| held == *component);

            if same_value {
                if !tie.handles.iter().any(|handle| handle.refers_to(component)) {
                    tie.handles.push(component.downgrade());
                }
                return tie.ordinal;
            }
        }

        let ordinal = self.next;
        self.next += 1;
        self.ties.push(Tie {
            ordinal,
            handles: vec![component.downgrade()],
        });
        ordinal
    }
}

/// A key component paired with the collation that orders it, so it can key a
/// `BTreeMap`/`BTreeSet`.
#[derive(Clone)]
pub(crate) struct Slot {
    component: KeyComponent,
    collation: Collation,
}

impl Slot {
    pub(crate) fn new(component: KeyComponent, collation: &Collation) -> Slot {
        Slot {
            component,
            collation: collation.clone(),
        }
    }

    pub(crate) fn component(&self) -> &KeyComponent {
        &self.component
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Slot {}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.collation.compare(&self.component, &other.component)
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.component, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every value hashes identically, forcing the ledger to order them.
    #[derive(Debug, PartialEq, Eq)]
    struct Colliding(&'static str);

    impl Hash for Colliding {
        fn hash<H: Hasher>(&self, state: &mut H) {
            0u8.hash(state);
        }
    }

    fn kc<K: Component>(value: K) -> KeyComponent {
        KeyComponent::new(value)
    }

    #[test]
    fn natural_order() {
        let collation = Collation::natural::<u32>();
        assert_eq!(collation.compare(&kc(1u32), &kc(2u32)), Ordering::Less);
        assert_eq!(collation.compare(&kc(2u32), &kc(2u32)), Ordering::Equal);
        assert_eq!(collation.rule(), &OrderingRule::Natural);
    }

    #[test]
    fn named_comparator() {
        let collation =
            Collation::comparator::<u32, _>("descending".into(), |a: &u32, b: &u32| b.cmp(a));
        assert_eq!(collation.compare(&kc(1u32), &kc(2u32)), Ordering::Greater);
        assert_eq!(
            collation.rule(),
            &OrderingRule::Comparator(Cow::Borrowed("descending"))
        );
    }

    #[test]
    fn hashed_order_is_consistent() {
        let collation = Collation::hashed::<String>();
        let a = kc(String::from("alpha"));
        let b = kc(String::from("beta"));

        let forward = collation.compare(&a, &b);
        assert_ne!(forward, Ordering::Equal);
        assert_eq!(collation.compare(&b, &a), forward.reverse());
        assert_eq!(collation.compare(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn hash_collisions_are_totally_ordered() {
        let collation = Collation::hashed::<Colliding>();
        let (a, b, c) = (kc(Colliding("a")), kc(Colliding("b")), kc(Colliding("c")));

        // first sight decides: a, then b, then c
        assert_eq!(collation.compare(&a, &b), Ordering::Less);
        assert_eq!(collation.compare(&b, &c), Ordering::Less);
        assert_eq!(collation.compare(&a, &c), Ordering::Less);
        assert_eq!(collation.compare(&c, &a), Ordering::Greater);
        assert_eq!(
            collation.compare(&b, &kc(Colliding("b"))),
            Ordering::Equal
        );
    }

    /// Collides like `Colliding` and counts live copies through `marker`.
    #[derive(Debug)]
    struct Tracked {
        name: &'static str,
        marker: Arc<()>,
    }

    impl PartialEq for Tracked {
        fn eq(&self, other: &Self) -> bool {
            self.name == other.name
        }
    }

    impl Eq for Tracked {}

    impl Hash for Tracked {
        fn hash<H: Hasher>(&self, state: &mut H) {
            0u8.hash(state);
        }
    }

    #[test]
    fn collision_ledger_does_not_keep_components_alive() {
        let marker = Arc::new(());
        let collation = Collation::hashed::<Tracked>();
        let tracked = |name| {
            kc(Tracked {
                name,
                marker: marker.clone(),
            })
        };

        let (a, b) = (tracked("a"), tracked("b"));
        assert_eq!(collation.compare(&a, &b), Ordering::Less);

        drop((a, b));
        assert_eq!(Arc::strong_count(&marker), 1);
    }

    #[test]
    fn collision_order_of_live_components_is_stable() {
        let collation = Collation::hashed::<Colliding>();
        let (a, b) = (kc(Colliding("a")), kc(Colliding("b")));
        assert_eq!(collation.compare(&a, &b), Ordering::Less);

        // an equal value in another allocation shares the ordinal and keeps it
        // once the first allocation is gone
        let a_again = kc(Colliding("a"));
        assert_eq!(collation.compare(&a_again, &b), Ordering::Less);
        drop(a);
        assert_eq!(collation.compare(&b, &a_again), Ordering::Greater);

        // once every copy of `a` is gone, it is seen afresh
        drop(a_again);
        let c = kc(Colliding("c"));
        assert_eq!(collation.compare(&c, &b), Ordering::Greater);
        assert_eq!(collation.compare(&kc(Colliding("a")), &b), Ordering::Greater);
        assert_eq!(collation.compare(&c, &b), Ordering::Greater);
    }

    #[test]
    fn sort_dedup_folds_equal_components() {
        let collation = Collation::natural::<u32>();
        let mut components = vec![kc(3u32), kc(1u32), kc(3u32), kc(2u32)];
        collation.sort_dedup(&mut components);
        assert_eq!(components, vec![kc(1u32), kc(2u32), kc(3u32)]);
    }

    #[test]
    fn accepts_checks_component_type() {
        let collation = Collation::natural::<u32>();
        assert!(collation.accepts(&kc(5u32)));
        assert!(!collation.accepts(&kc(5u64)));
        assert_eq!(collation.component_type(), ComponentType::of::<u32>());
    }

    #[test]
    fn slots_order_by_collation() {
        let collation =
            Collation::comparator::<u32, _>("descending".into(), |a: &u32, b: &u32| b.cmp(a));
        let set: std::collections::BTreeSet<Slot> = [1u32, 3, 2]
            .into_iter()
            .map(|n| Slot::new(kc(n), &collation))
            .collect();

        let ordered: Vec<u32> = set
            .iter()
            .map(|slot| *slot.component().expect_ref::<u32>())
            .collect();
        assert_eq!(ordered, vec![3, 2, 1]);
    }
}
