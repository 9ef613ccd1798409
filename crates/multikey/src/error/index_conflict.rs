use super::Error;

/// Error when a value cannot be indexed because one of its composite keys is
/// already taken by a different value.
///
/// The terminal identity level normally makes every composite key unique per
/// value, so this only happens when the identity ordering treats two unequal
/// values as equal. Insertion is all-or-nothing: when this error is returned,
/// neither the index nor the membership record was modified.
#[derive(Debug, Clone)]
pub(super) struct IndexConflict {
    message: Box<str>,
}

impl std::error::Error for IndexConflict {}

impl core::fmt::Display for IndexConflict {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "index conflict: {}", self.message)
    }
}

impl Error {
    /// Creates an index conflict error.
    pub fn index_conflict(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::IndexConflict(IndexConflict {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an index conflict error.
    pub fn is_index_conflict(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IndexConflict(_))
    }
}
