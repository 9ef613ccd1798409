use super::Error;

/// Error when a call receives an argument it cannot accept.
///
/// Examples are an empty profile list, a key component whose type does not
/// match the profile of the level it is used at, or a key pattern deeper than
/// the index.
#[derive(Debug, Clone)]
pub(super) struct InvalidArgument {
    message: Box<str>,
}

impl std::error::Error for InvalidArgument {}

impl core::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgument {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
