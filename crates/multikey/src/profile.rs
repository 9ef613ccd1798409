mod builder;
pub use builder::ProfileBuilder;

use crate::accessor::{Accessor, Yields};
use crate::collation::{Collation, OrderingRule};
use crate::{Component, ComponentType, Element, KeyComponent};

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Where a profile's key components come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// The component is the value itself.
    Identity,

    /// Components are read by explicitly supplied accessors.
    Accessor,

    /// Components are read by every accessor of the owner's
    /// [`Indexable`](crate::Indexable) catalog yielding the component type.
    DiscoveredAccessor,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Basis::Identity => "identity",
            Basis::Accessor => "accessor",
            Basis::DiscoveredAccessor => "discovered",
        })
    }
}

/// Describes how one column of a composite key is derived from a value of
/// type `V`, and how that column is ordered.
///
/// Profiles are immutable and cheap to clone; one profile may be used by any
/// number of sets. Two profiles are equal when they were built from the same
/// owner type, component type, basis, accessor names and ordering rule, so a
/// profile rebuilt from the same description is interchangeable with the
/// original.
///
/// # Examples
///
/// ```
/// use multikey::{Accessor, KeyComponentProfile};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// struct Author(&'static str);
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Book {
///     authors: Vec<Author>,
/// }
///
/// let by_author = KeyComponentProfile::<Book>::ordered::<Author>()
///     .accessor(Accessor::collection("authors", |book: &Book| book.authors.clone()))
///     .build()
///     .unwrap();
///
/// let book = Book { authors: vec![Author("Wu"), Author("Bell")] };
/// let authors = by_author.extract(&book);
/// assert_eq!(authors.len(), 2);
/// assert_eq!(authors[0].downcast_ref::<Author>(), Some(&Author("Bell")));
/// ```
pub struct KeyComponentProfile<V> {
    inner: Arc<ProfileInner<V>>,
}

struct ProfileInner<V> {
    owner: ComponentType,
    component: ComponentType,
    basis: Basis,
    accessors: Vec<Accessor<V>>,
    collation: Collation,
    identity: ProfileIdentity,
    hash: u64,
}

/// The fields that decide profile equality, hashed once at construction.
#[derive(Debug, PartialEq, Eq, Hash)]
struct ProfileIdentity {
    owner: ComponentType,
    component: ComponentType,
    basis: Basis,
    accessors: Vec<(Cow<'static, str>, Yields)>,
    rule: OrderingRule,
}

impl<V: Element> KeyComponentProfile<V> {
    /// Starts a profile whose components are ordered by `K`'s `Ord`, unless a
    /// comparator is supplied.
    pub fn ordered<K: Component + Ord>() -> ProfileBuilder<V, K> {
        ProfileBuilder::new(Collation::natural::<K>())
    }

    /// Starts a profile for a component type without a total order. Components
    /// are ordered by hash, unless a comparator is supplied.
    pub fn hashed<K: Component + Hash>() -> ProfileBuilder<V, K> {
        ProfileBuilder::new(Collation::hashed::<K>())
    }

    /// The identity profile appended to composite keys that do not already end
    /// with one. Values are ordered by hash.
    pub fn identity() -> KeyComponentProfile<V> {
        KeyComponentProfile::new_identity(Collation::hashed::<V>())
    }

    /// An identity profile ordering values by their `Ord`.
    pub fn identity_ordered() -> KeyComponentProfile<V>
    where
        V: Ord,
    {
        KeyComponentProfile::new_identity(Collation::natural::<V>())
    }

    fn new_identity(collation: Collation) -> KeyComponentProfile<V> {
        KeyComponentProfile::from_parts(
            ComponentType::of::<V>(),
            Basis::Identity,
            vec![Accessor::identity()],
            collation,
        )
    }
}

impl<V: 'static> KeyComponentProfile<V> {
    fn from_parts(
        component: ComponentType,
        basis: Basis,
        accessors: Vec<Accessor<V>>,
        collation: Collation,
    ) -> KeyComponentProfile<V> {
        let owner = ComponentType::of::<V>();
        let identity = ProfileIdentity {
            owner,
            component,
            basis,
            accessors: accessors.iter().map(Accessor::signature).collect(),
            rule: collation.rule().clone(),
        };
        let hash = {
            let mut hasher = DefaultHasher::new();
            identity.hash(&mut hasher);
            hasher.finish()
        };

        KeyComponentProfile {
            inner: Arc::new(ProfileInner {
                owner,
                component,
                basis,
                accessors,
                collation,
                identity,
                hash,
            }),
        }
    }
}

impl<V> KeyComponentProfile<V> {
    /// The type of values this profile reads from.
    pub fn owner_type(&self) -> ComponentType {
        self.inner.owner
    }

    /// The type of the key components this profile yields.
    pub fn component_type(&self) -> ComponentType {
        self.inner.component
    }

    pub fn basis(&self) -> Basis {
        self.inner.basis
    }

    pub fn is_identity(&self) -> bool {
        self.inner.basis == Basis::Identity
    }

    pub fn accessors(&self) -> &[Accessor<V>] {
        &self.inner.accessors
    }

    pub fn accessor_names(&self) -> Vec<&str> {
        self.inner.accessors.iter().map(Accessor::name).collect()
    }

    pub fn ordering_rule(&self) -> &OrderingRule {
        self.inner.collation.rule()
    }

    pub fn collation(&self) -> &Collation {
        &self.inner.collation
    }

    /// Returns `true` if `component` has this profile's component type.
    pub fn accepts(&self, component: &KeyComponent) -> bool {
        self.inner.collation.accepts(component)
    }

    /// Orders two components of this profile's type.
    pub fn compare(&self, a: &KeyComponent, b: &KeyComponent) -> Ordering {
        self.inner.collation.compare(a, b)
    }

    /// Reads every key component `value` yields for this profile.
    ///
    /// Components from all accessors are united; components that compare equal
    /// are folded. The result is in profile order and may be empty when every
    /// accessor came back empty.
    pub fn extract(&self, value: &V) -> Vec<KeyComponent> {
        let mut components = Vec::new();
        for accessor in &self.inner.accessors {
            accessor.read_into(value, &mut components);
        }

        debug_assert!(components.iter().all(|c| self.accepts(c)));

        self.inner.collation.sort_dedup(&mut components);
        components
    }
}

impl<V> Clone for KeyComponentProfile<V> {
    fn clone(&self) -> Self {
        KeyComponentProfile {
            inner: self.inner.clone(),
        }
    }
}

impl<V> PartialEq for KeyComponentProfile<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
            || (self.inner.hash == other.inner.hash && self.inner.identity == other.inner.identity)
    }
}

impl<V> Eq for KeyComponentProfile<V> {}

impl<V> Hash for KeyComponentProfile<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl<V> fmt::Debug for KeyComponentProfile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyComponentProfile")
            .field("owner", &self.inner.owner)
            .field("component", &self.inner.component)
            .field("basis", &self.inner.basis)
            .field("accessors", &self.accessor_names())
            .field("rule", self.ordering_rule())
            .finish()
    }
}

impl<V> fmt::Display for KeyComponentProfile<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}; basis={}; accessors=[{}]; order={}>",
            self.inner.component,
            self.inner.basis,
            self.accessor_names().join(", "),
            self.ordering_rule()
        )
    }
}
