//! Dynamic script and stylesheet injection.
//!
//! [`AssetLoader`] appends loadable references to a [`Document`]
//! and reports once host confirms they are loaded.
//! Scripts can be gated on a [`Precondition`] that is evaluated once,
//! before anything is inserted.
//! Stylesheets are inserted fire-and-forget.
//!
//! Outcome of every script load is a [`Handle`], single-resolution future.
//! Callback-style API spawns a task on provided [`Spawn`] executor
//! that awaits the handle and runs the callback.
//!
//! # Example
//!
//! ```
//! # use goods_inject::*;
//! # #[derive(Debug)] struct Inline;
//! # impl Spawn for Inline {
//! #     fn spawn(&self, _: BoxFuture<'static, ()>) -> Result<(), SpawnError> { Ok(()) }
//! # }
//! let document = MemoryDocument::new().with_element("editor");
//! let loader = AssetLoader::new(document.clone(), Inline);
//!
//! loader.add_style("https://example.test/editor.css").unwrap();
//!
//! let handle = loader
//!     .load_if(ElementId("editor"), "https://example.test/editor.js")
//!     .unwrap();
//! assert!(handle.is_some());
//! assert_eq!(document.references().len(), 2);
//!
//! // Host reports script loaded.
//! document.finish("https://example.test/editor.js");
//! assert!(handle.unwrap().is_resolved());
//! ```

#![cfg_attr(all(doc, feature = "unstable-doc"), feature(doc_cfg))]

mod document;
mod error;
mod handle;
mod loader;
mod manifest;
mod memory;
mod reference;
mod spawn;
mod sync;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(test, not(feature = "sync")))]
mod testing;

pub use self::{
    document::{Document, ElementId, Precondition},
    error::Error,
    handle::{Handle, Resolver},
    loader::{AssetLoader, LoadRequest, LoaderBuilder},
    manifest::{Manifest, ManifestError, ScriptEntry},
    memory::{MemoryDocument, MissingContainer},
    reference::{Container, Kind, Reference},
    spawn::*,
    sync::{BoxFnOnce, BoxFuture},
};

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use self::web::WebDocument;
