//! Declarative description of references to inject.
//!
//! ```json
//! {
//!     "styles": ["https://cdn.jsdelivr.net/npm/vditor@3.5.5/dist/index.css"],
//!     "scripts": [
//!         {
//!             "url": "https://cdn.jsdelivr.net/npm/vditor@3.5.5/dist/index.min.js",
//!             "requires": "vdit",
//!             "once": true
//!         }
//!     ]
//! }
//! ```

use {
    crate::{
        document::{Document, ElementId, Precondition},
        error::Error,
        handle::Handle,
        loader::AssetLoader,
    },
    std::fmt::{self, Display},
};

/// Stylesheets and scripts to inject.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Manifest {
    /// Stylesheet urls. Inserted unconditionally.
    pub styles: Vec<String>,

    pub scripts: Vec<ScriptEntry>,
}

/// Script entry of the [`Manifest`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ScriptEntry {
    pub url: String,

    /// Id of the element that must be present for the script to be loaded.
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires: Option<String>,

    /// Load with [`AssetLoader::load_once`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub once: bool,
}

impl ScriptEntry {
    pub fn new(url: impl Into<String>) -> Self {
        ScriptEntry {
            url: url.into(),
            requires: None,
            once: false,
        }
    }

    pub fn requires(mut self, id: impl Into<String>) -> Self {
        self.requires = Some(id.into());
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// Manifest decoding failed.
#[derive(Debug)]
pub enum ManifestError {
    #[cfg(feature = "json-format")]
    Json(serde_json::Error),

    #[cfg(feature = "yaml-format")]
    Yaml(serde_yaml::Error),

    #[cfg(feature = "ron-format")]
    Ron(ron::Error),
}

impl Display for ManifestError {
    fn fmt(&self, _fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            #[cfg(feature = "json-format")]
            ManifestError::Json(ref err) => write!(_fmt, "Json manifest error: {}", err),
            #[cfg(feature = "yaml-format")]
            ManifestError::Yaml(ref err) => write!(_fmt, "Yaml manifest error: {}", err),
            #[cfg(feature = "ron-format")]
            ManifestError::Ron(ref err) => write!(_fmt, "Ron manifest error: {}", err),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            #[cfg(feature = "json-format")]
            ManifestError::Json(ref err) => Some(err),
            #[cfg(feature = "yaml-format")]
            ManifestError::Yaml(ref err) => Some(err),
            #[cfg(feature = "ron-format")]
            ManifestError::Ron(ref err) => Some(err),
        }
    }
}

impl Manifest {
    #[cfg(feature = "json-format")]
    #[cfg_attr(all(doc, feature = "unstable-doc"), doc(cfg(feature = "json-format")))]
    pub fn from_json(source: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(source).map_err(ManifestError::Json)
    }

    #[cfg(feature = "yaml-format")]
    #[cfg_attr(all(doc, feature = "unstable-doc"), doc(cfg(feature = "yaml-format")))]
    pub fn from_yaml(source: &str) -> Result<Self, ManifestError> {
        serde_yaml::from_str(source).map_err(ManifestError::Yaml)
    }

    #[cfg(feature = "ron-format")]
    #[cfg_attr(all(doc, feature = "unstable-doc"), doc(cfg(feature = "ron-format")))]
    pub fn from_ron(source: &str) -> Result<Self, ManifestError> {
        ron::de::from_str(source).map_err(ManifestError::Ron)
    }
}

impl<D> AssetLoader<D>
where
    D: Document,
{
    /// Inserts all manifest stylesheets, then loads scripts whose required element is present.
    ///
    /// Returns one entry per manifest script, `None` for scripts skipped by precondition.
    #[cfg_attr(feature = "trace", tracing::instrument(skip(self, manifest)))]
    pub fn apply(&self, manifest: &Manifest) -> Result<Vec<Option<Handle>>, Error> {
        for style in &manifest.styles {
            self.add_style(style)?;
        }

        let mut handles = Vec::with_capacity(manifest.scripts.len());
        for script in &manifest.scripts {
            let admitted = match &script.requires {
                Some(id) => ElementId(id.as_str()).check(self.document()),
                None => true,
            };

            if !admitted {
                #[cfg(feature = "trace")]
                tracing::debug!("Skipping `{}`", script.url);
                handles.push(None);
                continue;
            }

            let handle = if script.once {
                self.load_once(&script.url)?
            } else {
                self.load(&script.url)?
            };
            handles.push(Some(handle));
        }
        Ok(handles)
    }
}

#[cfg(all(test, not(feature = "sync")))]
mod tests {
    use {
        super::*,
        crate::{memory::MemoryDocument, testing::pool},
    };

    fn editor() -> Manifest {
        Manifest {
            styles: vec!["https://example.test/editor.css".to_owned()],
            scripts: vec![
                ScriptEntry::new("https://example.test/editor.js")
                    .requires("vdit")
                    .once(),
                ScriptEntry::new("https://example.test/preview.js").requires("preview"),
            ],
        }
    }

    #[test]
    fn apply_gates_scripts() {
        let (mut pool, spawn) = pool();
        let document = MemoryDocument::new().with_element("vdit");
        let loader = AssetLoader::new(document.clone(), spawn);

        let handles = loader.apply(&editor()).unwrap();
        assert_eq!(handles.len(), 2);
        assert!(handles[1].is_none());

        assert_eq!(document.stylesheets().len(), 1);
        let scripts = document.scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(&*scripts[0].url, "https://example.test/editor.js");

        document.finish_all();
        let script = handles.into_iter().next().flatten().unwrap();
        assert!(pool.run_until(script).is_ok());
    }

    #[test]
    fn apply_twice_respects_once() {
        let (_pool, spawn) = pool();
        let document = MemoryDocument::new().with_element("vdit").with_element("preview");
        let loader = AssetLoader::new(document.clone(), spawn);

        let first = loader.apply(&editor()).unwrap();
        let second = loader.apply(&editor()).unwrap();
        assert_eq!(first[0], second[0]);
        assert_ne!(first[1], second[1]);

        // Stylesheets are not deduplicated.
        assert_eq!(document.stylesheets().len(), 2);
        assert_eq!(document.scripts().len(), 3);
    }

    #[cfg(feature = "json-format")]
    #[test]
    fn from_json() {
        let manifest = Manifest::from_json(
            r#"{
                "styles": ["https://example.test/editor.css"],
                "scripts": [
                    { "url": "https://example.test/editor.js", "requires": "vdit", "once": true },
                    { "url": "https://example.test/preview.js", "requires": "preview" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest, editor());

        assert_eq!(Manifest::from_json("{}").unwrap(), Manifest::default());
        assert!(Manifest::from_json(r#"{ "scripts": [{}] }"#).is_err());
    }

    #[cfg(feature = "yaml-format")]
    #[test]
    fn from_yaml() {
        let manifest = Manifest::from_yaml(
            "styles:\n  - https://example.test/editor.css\nscripts:\n  - url: https://example.test/editor.js\n    requires: vdit\n    once: true\n  - url: https://example.test/preview.js\n    requires: preview\n",
        )
        .unwrap();
        assert_eq!(manifest, editor());
    }

    #[cfg(feature = "ron-format")]
    #[test]
    fn from_ron() {
        let manifest = Manifest::from_ron(
            r#"(
                styles: ["https://example.test/editor.css"],
                scripts: [
                    (url: "https://example.test/editor.js", requires: Some("vdit"), once: true),
                    (url: "https://example.test/preview.js", requires: Some("preview")),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(manifest, editor());
    }
}
