use crate::{Component, ComponentType, KeyComponent};

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type ReadFn<V> = dyn Fn(&V, &mut Vec<KeyComponent>) + Send + Sync;

/// A named, parameterless reader of key components from a `V`.
///
/// Accessors are registered explicitly, either directly on a profile or in a
/// type's [`Indexable`] catalog.
pub struct Accessor<V> {
    name: Cow<'static, str>,
    yields: Yields,
    component: ComponentType,
    read: Arc<ReadFn<V>>,
}

/// Whether an accessor returns one component or a collection of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Yields {
    Scalar,
    Collection,
}

impl<V: 'static> Accessor<V> {
    /// An accessor that always yields exactly one component.
    pub fn scalar<K, F>(name: impl Into<Cow<'static, str>>, read: F) -> Accessor<V>
    where
        K: Component,
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        Accessor::from_fn::<K>(name.into(), Yields::Scalar, move |value, out| {
            out.push(KeyComponent::new(read(value)));
        })
    }

    /// An accessor that yields at most one component. `None` contributes
    /// nothing for that value.
    pub fn optional<K, F>(name: impl Into<Cow<'static, str>>, read: F) -> Accessor<V>
    where
        K: Component,
        F: Fn(&V) -> Option<K> + Send + Sync + 'static,
    {
        Accessor::from_fn::<K>(name.into(), Yields::Scalar, move |value, out| {
            out.extend(read(value).map(KeyComponent::new));
        })
    }

    /// An accessor that yields a collection of components.
    pub fn collection<K, I, F>(name: impl Into<Cow<'static, str>>, read: F) -> Accessor<V>
    where
        K: Component,
        I: IntoIterator<Item = K>,
        F: Fn(&V) -> I + Send + Sync + 'static,
    {
        Accessor::from_fn::<K>(name.into(), Yields::Collection, move |value, out| {
            out.extend(read(value).into_iter().map(KeyComponent::new));
        })
    }

    /// The accessor of an identity profile: the value itself.
    pub(crate) fn identity() -> Accessor<V>
    where
        V: Component + Clone,
    {
        Accessor::from_fn::<V>(Cow::Borrowed("self"), Yields::Scalar, |value, out| {
            out.push(KeyComponent::of(value));
        })
    }

    fn from_fn<K: Component>(
        name: Cow<'static, str>,
        yields: Yields,
        read: impl Fn(&V, &mut Vec<KeyComponent>) + Send + Sync + 'static,
    ) -> Accessor<V> {
        Accessor {
            name,
            yields,
            component: ComponentType::of::<K>(),
            read: Arc::new(read),
        }
    }
}

impl<V> Accessor<V> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn yields(&self) -> Yields {
        self.yields
    }

    /// The type of the components this accessor yields (the element type for
    /// collection accessors).
    pub fn component_type(&self) -> ComponentType {
        self.component
    }

    /// Appends the components read from `value` to `out`.
    pub(crate) fn read_into(&self, value: &V, out: &mut Vec<KeyComponent>) {
        (self.read)(value, out)
    }

    pub(crate) fn signature(&self) -> (Cow<'static, str>, Yields) {
        (self.name.clone(), self.yields)
    }
}

impl<V> Clone for Accessor<V> {
    fn clone(&self) -> Self {
        Accessor {
            name: self.name.clone(),
            yields: self.yields,
            component: self.component,
            read: self.read.clone(),
        }
    }
}

impl<V> fmt::Debug for Accessor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("yields", &self.yields)
            .field("component", &self.component)
            .finish()
    }
}

/// A type that publishes the accessors profiles may discover on it.
///
/// # Examples
///
/// ```
/// use multikey::{Accessor, Indexable};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Title(String);
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Book {
///     title: Title,
///     subtitle: Option<Title>,
/// }
///
/// impl Indexable for Book {
///     fn accessors() -> Vec<Accessor<Self>> {
///         vec![
///             Accessor::scalar("title", |book: &Book| book.title.clone()),
///             Accessor::optional("subtitle", |book: &Book| book.subtitle.clone()),
///         ]
///     }
/// }
/// ```
pub trait Indexable: Sized + 'static {
    fn accessors() -> Vec<Accessor<Self>>;
}
