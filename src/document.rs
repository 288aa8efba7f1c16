use crate::{
    error::Error,
    handle::Resolver,
    reference::Reference,
    sync::{Send, Sync},
};

/// Host document capability injected into [`AssetLoader`].
///
/// [`AssetLoader`]: ./struct.AssetLoader.html
pub trait Document: Send + Sync + 'static {
    /// Returns `true` if element with given id is currently present.
    fn has_element(&self, id: &str) -> bool;

    /// Appends loadable reference to its container.
    ///
    /// When `resolver` is provided the document must resolve it
    /// once host reports the resource loaded or failed.
    /// Stylesheets are appended without resolver and nothing observes them.
    fn append(&self, reference: &Reference, resolver: Option<Resolver>) -> Result<(), Error>;
}

/// Boolean gate evaluated once, before load request is issued.
pub trait Precondition<D: ?Sized> {
    fn check(&self, document: &D) -> bool;
}

impl<D, F> Precondition<D> for F
where
    D: ?Sized,
    F: Fn(&D) -> bool,
{
    fn check(&self, document: &D) -> bool {
        self(document)
    }
}

/// Holds when element with this id is present in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementId<'a>(pub &'a str);

impl<D> Precondition<D> for ElementId<'_>
where
    D: Document + ?Sized,
{
    fn check(&self, document: &D) -> bool {
        document.has_element(self.0)
    }
}
