use std::any::{Any, TypeId};
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Weak};

/// A type that can serve as one column of a composite key.
///
/// Implemented for every `Debug + Eq + Send + Sync + 'static` type.
pub trait Component: Any + fmt::Debug + Eq + Send + Sync {}

impl<T> Component for T where T: Any + fmt::Debug + Eq + Send + Sync {}

/// A value that can be stored in an [`OrderedSet`](crate::OrderedSet) or a
/// [`MapNode`](crate::MapNode).
///
/// Membership is decided by `Eq`/`Hash`. Values are cloned into every leaf
/// they fan out to; wrap heavy values in an `Arc`.
pub trait Element: Component + Hash + Clone {}

impl<T> Element for T where T: Component + Hash + Clone {}

/// Runtime descriptor of a component type.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    pub fn of<T: ?Sized + 'static>() -> ComponentType {
        ComponentType {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path, `Vec<Author>` rather than
    /// `alloc::vec::Vec<shelf::Author>`.
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut segment = String::new();

        for ch in self.name.chars() {
            match ch {
                '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';' => {
                    out.push_str(strip_path(&segment));
                    segment.clear();
                    out.push(ch);
                }
                _ => segment.push(ch),
            }
        }
        out.push_str(strip_path(&segment));
        out
    }
}

fn strip_path(segment: &str) -> &str {
    segment.rsplit("::").next().unwrap_or(segment)
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// A type-erased key component.
///
/// Cloning is cheap; the wrapped value is shared. Two key components are equal
/// when they wrap values of the same type that compare equal.
#[derive(Clone)]
pub struct KeyComponent {
    value: Arc<dyn ErasedComponent>,
}

trait ErasedComponent: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn eq_erased(&self, other: &dyn Any) -> bool;

    fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn component_type(&self) -> ComponentType;
}

impl<T: Component> ErasedComponent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn fmt_erased(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn component_type(&self) -> ComponentType {
        ComponentType::of::<T>()
    }
}

impl KeyComponent {
    /// Wraps `value`.
    ///
    /// A `KeyComponent` passed in is returned unchanged rather than wrapped a
    /// second time.
    pub fn new<K: Component>(value: K) -> KeyComponent {
        match (&value as &dyn Any).downcast_ref::<KeyComponent>() {
            Some(component) => component.clone(),
            None => KeyComponent {
                value: Arc::new(value),
            },
        }
    }

    /// Wraps a clone of `value`.
    pub fn of<K: Component + Clone>(value: &K) -> KeyComponent {
        KeyComponent::new(value.clone())
    }

    pub fn downcast_ref<K: 'static>(&self) -> Option<&K> {
        self.value.as_any().downcast_ref::<K>()
    }

    pub fn is<K: 'static>(&self) -> bool {
        self.value.as_any().is::<K>()
    }

    pub fn component_type(&self) -> ComponentType {
        self.value.component_type()
    }

    pub(crate) fn downgrade(&self) -> WeakComponent {
        WeakComponent {
            value: Arc::downgrade(&self.value),
        }
    }

    /// Downcasts to the type a collation was built for.
    ///
    /// A mismatch means a profile handed its collation a foreign component,
    /// which cannot happen through the public API.
    pub(crate) fn expect_ref<K: 'static>(&self) -> &K {
        match self.downcast_ref::<K>() {
            Some(value) => value,
            None => panic!(
                "internal invariant violated: key component of type `{}` \
                 reached a collation for `{}`",
                self.component_type().name(),
                std::any::type_name::<K>()
            ),
        }
    }
}

/// A handle to a key component that does not keep it alive.
pub(crate) struct WeakComponent {
    value: Weak<dyn ErasedComponent>,
}

impl WeakComponent {
    pub(crate) fn upgrade(&self) -> Option<KeyComponent> {
        self.value.upgrade().map(|value| KeyComponent { value })
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.value.strong_count() > 0
    }

    /// Returns `true` if this handle refers to the same allocation as
    /// `component`, not merely an equal value.
    pub(crate) fn refers_to(&self, component: &KeyComponent) -> bool {
        Weak::ptr_eq(&self.value, &Arc::downgrade(&component.value))
    }
}

impl PartialEq for KeyComponent {
    fn eq(&self, other: &Self) -> bool {
        self.value.eq_erased(other.value.as_any())
    }
}

impl Eq for KeyComponent {}

impl fmt::Debug for KeyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt_erased(f)
    }
}
