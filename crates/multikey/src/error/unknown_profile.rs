use super::Error;

/// Error when a component set is requested for a profile the set was not
/// configured with.
#[derive(Debug, Clone)]
pub(super) struct UnknownProfile {
    profile: Box<str>,
}

impl std::error::Error for UnknownProfile {}

impl core::fmt::Display for UnknownProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "key component profile not found in this set: {}",
            self.profile
        )
    }
}

impl Error {
    /// Creates an unknown profile error. `profile` is the rendered profile.
    pub fn unknown_profile(profile: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownProfile(UnknownProfile {
            profile: profile.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown profile error.
    pub fn is_unknown_profile(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownProfile(_))
    }
}
