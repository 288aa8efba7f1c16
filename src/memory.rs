//! In-memory document.

use {
    crate::{
        document::Document,
        error::Error,
        handle::Resolver,
        reference::{Container, Kind, Reference},
        sync::{Lock, Ptr},
    },
    hashbrown::HashSet,
    std::{
        error::Error as StdError,
        fmt::{self, Debug, Display},
        sync::Arc,
    },
};

/// Document that keeps element ids and inserted references in memory.
///
/// Nothing is fetched. Host signals are simulated with [`MemoryDocument::finish`]
/// and [`MemoryDocument::fail`].
/// Clones share the same state, so one clone can be given to the loader
/// while another is used to inspect and drive it.
#[derive(Clone, Default)]
pub struct MemoryDocument {
    state: Ptr<Lock<State>>,
}

#[derive(Default)]
struct State {
    elements: HashSet<String>,
    missing: HashSet<Container>,
    references: Vec<Reference>,
    pending: Vec<(Arc<str>, Resolver)>,
}

/// Container element is absent in the document.
#[derive(Clone, Copy, Debug)]
pub struct MissingContainer(pub Container);

impl Display for MissingContainer {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Document has no {:?} element", self.0)
    }
}

impl StdError for MissingContainer {}

impl MemoryDocument {
    pub fn new() -> Self {
        MemoryDocument::default()
    }

    /// Adds element with specified id.
    pub fn with_element(self, id: &str) -> Self {
        self.add_element(id);
        self
    }

    pub fn add_element(&self, id: &str) {
        self.state.lock().elements.insert(id.to_owned());
    }

    /// Returns `true` if element was present.
    pub fn remove_element(&self, id: &str) -> bool {
        self.state.lock().elements.remove(id)
    }

    /// Makes appending to `container` fail.
    pub fn remove_container(&self, container: Container) {
        self.state.lock().missing.insert(container);
    }

    /// All inserted references in insertion order.
    pub fn references(&self) -> Vec<Reference> {
        self.state.lock().references.clone()
    }

    pub fn scripts(&self) -> Vec<Reference> {
        self.of_kind(Kind::Script)
    }

    pub fn stylesheets(&self) -> Vec<Reference> {
        self.of_kind(Kind::Stylesheet)
    }

    fn of_kind(&self, kind: Kind) -> Vec<Reference> {
        self.state
            .lock()
            .references
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect()
    }

    /// Number of observed references host did not report yet.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Reports earliest pending reference to `url` as loaded.
    /// Returns `false` if there is none.
    pub fn finish(&self, url: &str) -> bool {
        self.signal(url, |_| Ok(()))
    }

    /// Reports earliest pending reference to `url` as failed.
    /// Returns `false` if there is none.
    pub fn fail(&self, url: &str) -> bool {
        self.signal(url, |url| Err(Error::load(url)))
    }

    /// Reports all pending references as loaded.
    /// Returns number of reported references.
    pub fn finish_all(&self) -> usize {
        let pending = std::mem::take(&mut self.state.lock().pending);
        let count = pending.len();
        for (_, resolver) in pending {
            resolver.resolve(Ok(()));
        }
        count
    }

    fn signal(&self, url: &str, result: impl FnOnce(&Arc<str>) -> Result<(), Error>) -> bool {
        let mut lock = self.state.lock();
        match lock.pending.iter().position(|(u, _)| **u == *url) {
            Some(index) => {
                let (url, resolver) = lock.pending.remove(index);
                drop(lock);
                resolver.resolve(result(&url));
                true
            }
            None => false,
        }
    }
}

impl Document for MemoryDocument {
    fn has_element(&self, id: &str) -> bool {
        self.state.lock().elements.contains(id)
    }

    fn append(&self, reference: &Reference, resolver: Option<Resolver>) -> Result<(), Error> {
        let mut lock = self.state.lock();
        if lock.missing.contains(&reference.container) {
            return Err(Error::host(MissingContainer(reference.container)));
        }
        lock.references.push(reference.clone());
        if let Some(resolver) = resolver {
            lock.pending.push((reference.url.clone(), resolver));
        }
        Ok(())
    }
}

impl Debug for MemoryDocument {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lock = self.state.lock();
        fmt.debug_struct("MemoryDocument")
            .field("elements", &lock.elements)
            .field("references", &lock.references)
            .field("pending", &lock.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::handle::Handle};

    #[test]
    fn records_references() {
        let document = MemoryDocument::new().with_element("vdit");
        assert!(document.has_element("vdit"));
        assert!(!document.has_element("other"));

        document.append(&Reference::stylesheet("a.css"), None).unwrap();
        let (handle, resolver) = Handle::pending();
        document
            .append(&Reference::script("a.js"), Some(resolver))
            .unwrap();

        assert_eq!(document.references().len(), 2);
        assert_eq!(&*document.stylesheets()[0].url, "a.css");
        assert_eq!(&*document.scripts()[0].url, "a.js");
        assert_eq!(document.pending(), 1);

        assert!(!document.finish("b.js"));
        assert!(!handle.is_resolved());
        assert!(document.finish("a.js"));
        assert!(handle.query().is_ready());
        assert_eq!(document.pending(), 0);
    }

    #[test]
    fn missing_container() {
        let document = MemoryDocument::new();
        document.remove_container(Container::Body);
        let script = Reference::script("a.js").in_container(Container::Body);
        let err = document.append(&script, None).unwrap_err();
        assert!(matches!(err, Error::Host(_)));
        assert!(document.references().is_empty());
    }
}
