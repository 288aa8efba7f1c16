use {
    crate::{
        document::{Document, Precondition},
        error::Error,
        handle::Handle,
        reference::{Container, Reference},
        spawn::Spawn,
        sync::{BoxFnOnce, Lock, Ptr, Send},
    },
    hashbrown::HashMap,
    std::{
        fmt::{self, Debug},
        sync::Arc,
    },
};

/// Request to load a script and run callback once it is available.
pub struct LoadRequest {
    url: Arc<str>,
    on_complete: BoxFnOnce<()>,
    on_error: Option<BoxFnOnce<Error>>,
}

impl LoadRequest {
    /// Creates request that runs `on_complete` after script at `url` is loaded.
    /// Load failure is ignored unless [`LoadRequest::on_error`] is set.
    pub fn new<F>(url: impl Into<Arc<str>>, on_complete: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        LoadRequest {
            url: url.into(),
            on_complete: Box::new(move |()| on_complete()),
            on_error: None,
        }
    }

    /// Sets callback that receives load failure.
    pub fn on_error<F>(mut self, on_error: F) -> Self
    where
        F: FnOnce(Error) + Send + 'static,
    {
        self.on_error = Some(Box::new(on_error));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Debug for LoadRequest {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("LoadRequest")
            .field("url", &self.url)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Builder for [`AssetLoader`].
/// Allows configure where and how references are inserted.
#[derive(Clone, Debug)]
pub struct LoaderBuilder {
    container: Container,
    async_scripts: bool,
}

impl Default for LoaderBuilder {
    fn default() -> Self {
        LoaderBuilder::new()
    }
}

impl LoaderBuilder {
    /// Returns new [`LoaderBuilder`] that appends async scripts to `<head>`.
    pub fn new() -> Self {
        LoaderBuilder {
            container: Container::Head,
            async_scripts: true,
        }
    }

    /// Sets container for inserted references.
    pub fn set_container(&mut self, container: Container) -> &mut Self {
        self.container = container;
        self
    }

    /// Sets container for inserted references.
    pub fn with_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    /// Sets whether scripts are inserted with `async` attribute.
    pub fn set_async_scripts(&mut self, async_scripts: bool) -> &mut Self {
        self.async_scripts = async_scripts;
        self
    }

    /// Sets whether scripts are inserted with `async` attribute.
    pub fn with_async_scripts(mut self, async_scripts: bool) -> Self {
        self.async_scripts = async_scripts;
        self
    }

    /// Builds and returns new [`AssetLoader`] instance.
    /// Callbacks are delivered by tasks spawned with `spawn`.
    pub fn build<D, S>(self, document: D, spawn: S) -> AssetLoader<D>
    where
        D: Document,
        S: Spawn + 'static,
    {
        #[cfg(feature = "trace")]
        tracing::info!("Creating new asset loader");

        AssetLoader {
            inner: Ptr::new(Inner {
                document,
                container: self.container,
                async_scripts: self.async_scripts,
                once: Lock::new(HashMap::new()),
                spawn,
            }),
        }
    }
}

/// Injects scripts and stylesheets into the document.
///
/// Each call inserts a new reference, unless [`AssetLoader::load_once`] is used.
pub struct AssetLoader<D> {
    inner: Ptr<Inner<D, dyn Spawn>>,
}

struct Inner<D, S: ?Sized> {
    document: D,
    container: Container,
    async_scripts: bool,
    once: Lock<HashMap<Arc<str>, Handle>>,
    spawn: S,
}

impl<D> Clone for AssetLoader<D> {
    fn clone(&self) -> Self {
        AssetLoader {
            inner: self.inner.clone(),
        }
    }
}

impl<D> Debug for AssetLoader<D>
where
    D: Debug,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("AssetLoader")
            .field("document", &self.inner.document)
            .field("container", &self.inner.container)
            .field("spawn", &&self.inner.spawn)
            .finish()
    }
}

impl<D> AssetLoader<D>
where
    D: Document,
{
    /// Creates loader with default configuration.
    /// Use [`LoaderBuilder`] to configure it.
    pub fn new<S>(document: D, spawn: S) -> Self
    where
        S: Spawn + 'static,
    {
        LoaderBuilder::new().build(document, spawn)
    }

    pub fn document(&self) -> &D {
        &self.inner.document
    }

    fn script(&self, url: &str) -> Reference {
        Reference::script(url)
            .in_container(self.inner.container)
            .with_async(self.inner.async_scripts)
    }

    /// Appends script reference and returns handle
    /// that resolves once host reports the script loaded.
    ///
    /// Calling this twice with the same `url` inserts two references.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self)))]
    pub fn load(&self, url: &str) -> Result<Handle, Error> {
        let reference = self.script(url);
        let (handle, resolver) = Handle::pending();
        self.inner.document.append(&reference, Some(resolver))?;

        #[cfg(feature = "trace")]
        tracing::debug!("Script reference inserted");

        Ok(handle)
    }

    /// Evaluates `precondition` once and loads script only if it holds.
    /// Returns `Ok(None)` without touching the document otherwise.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self, precondition)))]
    pub fn load_if<P>(&self, precondition: P, url: &str) -> Result<Option<Handle>, Error>
    where
        P: Precondition<D>,
    {
        if precondition.check(&self.inner.document) {
            self.load(url).map(Some)
        } else {
            #[cfg(feature = "trace")]
            tracing::debug!("Precondition not met, skipping");
            Ok(None)
        }
    }

    /// Loads script and runs `on_complete` once it is available.
    /// Load failure is silently dropped.
    pub fn load_then<F>(&self, url: &str, on_complete: F) -> Result<(), Error>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(LoadRequest::new(url, on_complete))
    }

    /// Same as [`AssetLoader::load_then`] gated on `precondition`.
    /// Returns `Ok(false)` if precondition didn't hold.
    pub fn load_then_if<P, F>(
        &self,
        precondition: P,
        url: &str,
        on_complete: F,
    ) -> Result<bool, Error>
    where
        P: Precondition<D>,
        F: FnOnce() + Send + 'static,
    {
        self.submit_if(precondition, LoadRequest::new(url, on_complete))
    }

    /// Loads requested script and delivers outcome to request callbacks.
    ///
    /// Callbacks run in a task spawned on the loader's executor,
    /// never within this call.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self)))]
    pub fn submit(&self, request: LoadRequest) -> Result<(), Error> {
        let handle = self.load(&request.url)?;
        self.deliver(handle, request)
    }

    /// Same as [`AssetLoader::submit`] gated on `precondition`.
    /// Returns `Ok(false)` if precondition didn't hold.
    pub fn submit_if<P>(&self, precondition: P, request: LoadRequest) -> Result<bool, Error>
    where
        P: Precondition<D>,
    {
        match self.load_if(precondition, &request.url)? {
            Some(handle) => self.deliver(handle, request).map(|()| true),
            None => Ok(false),
        }
    }

    /// Loads script unless it was already requested with this method.
    /// Returns shared handle for previously requested `url`,
    /// even if that load failed.
    ///
    /// The document is not borrowed from within the dedup map lock,
    /// so `Document::append` may call back into the loader.
    /// If such a call requests the same `url`, the first stored handle wins.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self)))]
    pub fn load_once(&self, url: &str) -> Result<Handle, Error> {
        let cached = self.inner.once.lock().get(url).cloned();
        if let Some(handle) = cached {
            #[cfg(feature = "trace")]
            tracing::trace!("Script was already requested");
            return Ok(handle);
        }

        let handle = self.load(url)?;
        let mut lock = self.inner.once.lock();
        Ok(lock.entry(url.into()).or_insert(handle).clone())
    }

    /// Appends stylesheet reference. Its loading is not observed.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self)))]
    pub fn add_style(&self, url: &str) -> Result<(), Error> {
        let reference = Reference::stylesheet(url).in_container(self.inner.container);
        self.inner.document.append(&reference, None)
    }

    fn deliver(&self, handle: Handle, request: LoadRequest) -> Result<(), Error> {
        let LoadRequest {
            url: _url,
            on_complete,
            on_error,
        } = request;

        let task = async move {
            match handle.await {
                Ok(()) => {
                    #[cfg(feature = "trace")]
                    tracing::debug!("Script `{}` loaded", _url);
                    on_complete(());
                }
                Err(err) => {
                    #[cfg(feature = "trace")]
                    tracing::debug!("Script `{}` failed: {}", _url, err);
                    if let Some(on_error) = on_error {
                        on_error(err);
                    }
                }
            }
        };

        #[cfg(feature = "trace")]
        let task = tracing_futures::Instrument::in_current_span(task);

        self.inner
            .spawn
            .spawn(Box::pin(task))
            .map_err(|_| Error::SpawnError)
    }
}
