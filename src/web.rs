//! Browser document backed by `web-sys`.

#[cfg(feature = "sync")]
core::compile_error!("`WebDocument` cannot be used with `sync` feature. If you build this crate to run in browser you may simply turn it off as there are no threads");

use {
    crate::{
        document::Document,
        error::Error,
        handle::{Handle, Resolver, Watch},
        reference::{Container, Reference},
    },
    std::fmt::{self, Display},
    wasm_bindgen::{closure::Closure, JsCast, JsValue},
    web_sys::{DocumentReadyState, Element, Event},
};

/// Document of the browser page.
#[cfg_attr(all(doc, feature = "unstable-doc"), doc(cfg(feature = "web")))]
#[derive(Clone, Debug)]
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        WebDocument { document }
    }

    /// Returns document of the current window.
    pub fn current() -> Option<Self> {
        match web_sys::window().and_then(|window| window.document()) {
            Some(document) => Some(WebDocument::new(document)),
            None => {
                #[cfg(feature = "trace")]
                tracing::error!("Failed to fetch `Document`");
                None
            }
        }
    }

    /// Returns handle that resolves once document content is parsed.
    /// Already resolved if document is not loading anymore.
    pub fn content_ready(&self) -> Handle {
        if !matches!(self.document.ready_state(), DocumentReadyState::Loading) {
            return Handle::ready(Ok(()));
        }

        let (handle, resolver) = Handle::pending();
        let listener = Closure::once_into_js(move |_: Event| resolver.resolve(Ok(())));
        match self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", listener.unchecked_ref())
        {
            Ok(()) => handle,
            Err(err) => Handle::ready(Err(Error::host(JsError::from(err)))),
        }
    }

    fn container(&self, container: Container) -> Result<Element, Error> {
        let element = match container {
            Container::Head => self.document.head().map(Element::from),
            Container::Body => self.document.body().map(Element::from),
        };
        element.ok_or_else(|| Error::host(JsError(format!("Document has no {:?} element", container))))
    }
}

/// `load` and `error` listeners of observed element.
/// Removed from the element and freed on drop.
struct Listeners {
    element: Element,
    on_load: Closure<dyn FnMut(Event)>,
    on_error: Closure<dyn FnMut(Event)>,
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback("load", self.on_load.as_ref().unchecked_ref());
        let _ = self
            .element
            .remove_event_listener_with_callback("error", self.on_error.as_ref().unchecked_ref());
    }
}

/// Resolves `resolver` on first of `load` and `error` events.
fn observe(element: &Element, reference: &Reference, resolver: Resolver) -> Result<(), Error> {
    let watch = Watch::new(resolver);

    let on_load = Closure::once({
        let watch = watch.clone();
        move |_: Event| {
            watch.settle(Ok(()));
        }
    });

    let on_error = Closure::once({
        let watch = watch.clone();
        let url = reference.url.clone();
        move |_: Event| {
            #[cfg(feature = "trace")]
            tracing::debug!("Failed to load `{}`", url);
            watch.settle(Err(Error::Load { url }));
        }
    });

    // Dropped on error, so a half-registered pair is removed again.
    let listeners = Listeners {
        element: element.clone(),
        on_load,
        on_error,
    };
    element
        .add_event_listener_with_callback("load", listeners.on_load.as_ref().unchecked_ref())
        .map_err(JsError::host)?;
    element
        .add_event_listener_with_callback("error", listeners.on_error.as_ref().unchecked_ref())
        .map_err(JsError::host)?;

    watch.keep(listeners);
    Ok(())
}

impl Document for WebDocument {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn append(&self, reference: &Reference, resolver: Option<Resolver>) -> Result<(), Error> {
        let element = self
            .document
            .create_element(reference.tag())
            .map_err(JsError::host)?;

        for (name, value) in reference.attributes() {
            element.set_attribute(name, value).map_err(JsError::host)?;
        }

        if let Some(resolver) = resolver {
            observe(&element, reference, resolver)?;
        }

        self.container(reference.container)?
            .append_child(&element)
            .map_err(JsError::host)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
#[repr(transparent)]
struct JsError(String);

impl JsError {
    fn host(value: JsValue) -> Error {
        Error::host(JsError::from(value))
    }
}

impl From<JsValue> for JsError {
    fn from(value: JsValue) -> Self {
        let string = match js_sys::JSON::stringify(&value) {
            Ok(string) => String::from(string),
            Err(_) => format!("<{:?}>", value),
        };
        JsError(string)
    }
}

impl Display for JsError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(&self.0)
    }
}

impl std::error::Error for JsError {}
