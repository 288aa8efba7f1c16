use std::{
    error::Error as StdError,
    fmt::{self, Debug, Display},
    sync::Arc,
};

/// Error occured in process of asset injection.
pub enum Error {
    /// Host reported that referenced resource failed to load.
    ///
    /// Hosts do not tell network errors, missing resources
    /// and malformed assets apart, so only the url is kept.
    Load { url: Arc<str> },

    /// Host failed to perform an operation on the document.
    ///
    /// Specifically this error may occur in [`Document::append`].
    ///
    /// [`Document::append`]: ./trait.Document.html#tymethod.append
    Host(Arc<dyn StdError + Send + Sync>),

    /// Completion signal was dropped before host reported anything.
    Interrupted,

    /// Failed to spawn callback task.
    SpawnError,
}

impl Error {
    pub(crate) fn load(url: &Arc<str>) -> Self {
        Error::Load { url: url.clone() }
    }

    /// Wraps host error.
    pub fn host<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Host(Arc::new(error))
    }
}

impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::Load { url } => Error::Load { url: url.clone() },
            Error::Host(err) => Error::Host(err.clone()),
            Error::Interrupted => Error::Interrupted,
            Error::SpawnError => Error::SpawnError,
        }
    }
}

impl Debug for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load { url } => write!(fmt, "Error::Load({})", url),
            Error::Host(err) => write!(fmt, "Error::Host({})", err),
            Error::Interrupted => fmt.write_str("Error::Interrupted"),
            Error::SpawnError => fmt.write_str("Error::SpawnError"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Load { url } => write!(fmt, "Failed to load `{}`", url),
            Error::Host(err) => write!(fmt, "Host error: {}", err),
            Error::Interrupted => fmt.write_str("Completion signal dropped"),
            Error::SpawnError => fmt.write_str("Failed to spawn callback task"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Load { .. } => None,
            Error::Host(err) => Some(&**err),
            Error::Interrupted => None,
            Error::SpawnError => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NoHead;

    impl Display for NoHead {
        fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
            fmt.write_str("document has no <head>")
        }
    }

    impl StdError for NoHead {}

    #[test]
    fn host_error_keeps_source() {
        let err = Error::host(NoHead);
        assert_eq!(err.to_string(), "Host error: document has no <head>");
        assert!(err.source().is_some());
        assert!(err.clone().source().is_some());
    }

    #[test]
    fn load_error_names_url() {
        let url: Arc<str> = "https://example.test/a.js".into();
        let err = Error::load(&url);
        assert_eq!(err.to_string(), "Failed to load `https://example.test/a.js`");
        assert_eq!(format!("{:?}", err), "Error::Load(https://example.test/a.js)");
        assert!(err.source().is_none());
    }
}
