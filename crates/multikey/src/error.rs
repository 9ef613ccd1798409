mod index_conflict;
mod invalid_argument;
mod invalid_profile;
mod unknown_profile;

use index_conflict::IndexConflict;
use invalid_argument::InvalidArgument;
use invalid_profile::InvalidProfile;
use std::sync::Arc;
use unknown_profile::UnknownProfile;

/// An error that can occur while configuring or querying an ordered set.
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context is shown first,
    /// followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: Error) -> Error {
        self.context_impl(consequent)
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let ErrorInner { kind, cause } = match Arc::try_unwrap(consequent.inner) {
            Ok(inner) => inner,
            Err(shared) => ErrorInner {
                kind: shared.kind.clone(),
                cause: shared.cause.clone(),
            },
        };
        assert!(
            cause.is_none(),
            "consequent error must not already have a cause"
        );
        Error {
            inner: Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            }),
        }
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = err.inner.cause.as_ref() {
            err = cause;
        }
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner
            .cause
            .as_ref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

#[derive(Debug, Clone)]
enum ErrorKind {
    InvalidProfile(InvalidProfile),
    InvalidArgument(InvalidArgument),
    UnknownProfile(UnknownProfile),
    IndexConflict(IndexConflict),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            InvalidProfile(err) => core::fmt::Display::fmt(err, f),
            InvalidArgument(err) => core::fmt::Display::fmt(err, f),
            UnknownProfile(err) => core::fmt::Display::fmt(err, f),
            IndexConflict(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner { kind, cause: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Ensure Error stays at one pointer
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_kind() {
        let err = Error::invalid_argument("value list is empty");
        assert_eq!(err.to_string(), "invalid argument: value list is empty");
        assert!(err.is_invalid_argument());
        assert!(!err.is_invalid_profile());
    }

    #[test]
    fn error_chain_display() {
        let root = Error::invalid_profile("no accessor yields `Author`");
        let top = Error::invalid_argument("profile #1 of `books by author`");

        let chained = root.context(top);
        assert_eq!(
            chained.to_string(),
            "invalid argument: profile #1 of `books by author`: \
             invalid key component profile: no accessor yields `Author`"
        );
        assert!(chained.is_invalid_argument());
        assert!(chained.root().is_invalid_profile());
    }

    #[test]
    fn error_source_is_cause() {
        use std::error::Error as _;

        let err = Error::unknown_profile("<Genre>").context(Error::invalid_argument("query"));
        let source = err.source().expect("cause is exposed as source");
        assert_eq!(
            source.to_string(),
            "key component profile not found in this set: <Genre>"
        );
    }

    #[test]
    fn context_on_shared_consequent() {
        let consequent = Error::invalid_argument("outer");
        let _keep_alive = consequent.clone();

        let err = Error::index_conflict("value 7").context(consequent);
        assert_eq!(
            err.to_string(),
            "invalid argument: outer: index conflict: value 7"
        );
    }

    #[test]
    fn alternate_debug_shows_kind() {
        let err = Error::invalid_profile("empty accessor name");
        let rendered = format!("{err:#?}");
        assert!(rendered.contains("InvalidProfile"));
        assert_eq!(format!("{err:?}"), err.to_string());
    }
}
