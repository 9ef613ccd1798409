use crate::KeyComponent;

use std::fmt;
use std::ops::Deref;

/// The full path of one leaf: one key component per profile, the last being
/// the value itself.
#[derive(Clone, PartialEq, Eq)]
pub struct CompositeKey {
    components: Vec<KeyComponent>,
}

impl CompositeKey {
    pub fn components(&self) -> &[KeyComponent] {
        &self.components
    }

    /// The component at `level`, downcast to `K`.
    ///
    /// Returns `None` when `level` is out of range or holds another type.
    pub fn get<K: 'static>(&self, level: usize) -> Option<&K> {
        self.components.get(level)?.downcast_ref::<K>()
    }

    pub fn into_components(self) -> Vec<KeyComponent> {
        self.components
    }
}

impl From<Vec<KeyComponent>> for CompositeKey {
    fn from(components: Vec<KeyComponent>) -> CompositeKey {
        CompositeKey { components }
    }
}

impl Deref for CompositeKey {
    type Target = [KeyComponent];

    fn deref(&self) -> &[KeyComponent] {
        &self.components
    }
}

impl fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.components).finish()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "<{component:?}>")?;
        }
        f.write_str("}")
    }
}

/// One leaf of an index.
#[derive(Debug, Clone)]
pub struct Entry<'a, V> {
    key: CompositeKey,
    value: &'a V,
}

impl<'a, V> Entry<'a, V> {
    pub(crate) fn new(key: CompositeKey, value: &'a V) -> Entry<'a, V> {
        Entry { key, value }
    }

    pub fn key(&self) -> &CompositeKey {
        &self.key
    }

    pub fn value(&self) -> &'a V {
        self.value
    }

    pub fn into_key(self) -> CompositeKey {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_components() {
        let key = CompositeKey::from(vec![KeyComponent::new("Wu"), KeyComponent::new(3u8)]);
        assert_eq!(key.to_string(), "{<\"Wu\">; <3>}");
        assert_eq!(key.get::<u8>(1), Some(&3));
        assert_eq!(key.get::<u8>(0), None);
        assert_eq!(key.get::<u8>(2), None);
        assert_eq!(key.len(), 2);
    }
}
