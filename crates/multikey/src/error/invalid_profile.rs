use super::Error;

/// Error when a key component profile cannot be constructed.
///
/// This occurs when:
/// - No accessor on the owner type yields the requested component type
/// - The supplied accessors disagree on the component type they yield
/// - The supplied accessors yield a type other than the profile's component type
/// - An accessor is malformed (empty name, or a name used twice in one profile)
///
/// These errors are raised at construction time, before any value is indexed.
#[derive(Debug, Clone)]
pub(super) struct InvalidProfile {
    message: Box<str>,
}

impl std::error::Error for InvalidProfile {}

impl core::fmt::Display for InvalidProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid key component profile: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid profile (configuration) error.
    pub fn invalid_profile(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidProfile(InvalidProfile {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid profile error.
    pub fn is_invalid_profile(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidProfile(_))
    }
}
