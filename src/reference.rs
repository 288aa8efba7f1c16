use std::{
    fmt::{self, Display},
    sync::Arc,
};

/// Kind of loadable reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Executable script. Rendered as `<script>`.
    Script,

    /// Stylesheet. Rendered as `<link rel="stylesheet">`.
    Stylesheet,
}

/// Element of the document that receives inserted references.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Container {
    Head,
    Body,
}

impl Default for Container {
    fn default() -> Self {
        Container::Head
    }
}

/// Node instructing the host to fetch and apply an external resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: Kind,
    pub url: Arc<str>,
    pub container: Container,

    /// Scripts only. Asks host not to block parsing on this script.
    pub is_async: bool,
}

impl Reference {
    /// Async script reference appended to `<head>`.
    pub fn script(url: impl Into<Arc<str>>) -> Self {
        Reference {
            kind: Kind::Script,
            url: url.into(),
            container: Container::Head,
            is_async: true,
        }
    }

    /// Stylesheet reference appended to `<head>`.
    pub fn stylesheet(url: impl Into<Arc<str>>) -> Self {
        Reference {
            kind: Kind::Stylesheet,
            url: url.into(),
            container: Container::Head,
            is_async: false,
        }
    }

    pub fn in_container(mut self, container: Container) -> Self {
        self.container = container;
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    /// Element tag name.
    pub fn tag(&self) -> &'static str {
        match self.kind {
            Kind::Script => "script",
            Kind::Stylesheet => "link",
        }
    }

    /// Element attributes in insertion order.
    /// Boolean attributes have empty value.
    pub fn attributes(&self) -> Vec<(&'static str, &str)> {
        match self.kind {
            Kind::Script if self.is_async => vec![("src", &*self.url), ("async", "")],
            Kind::Script => vec![("src", &*self.url)],
            Kind::Stylesheet => vec![
                ("rel", "stylesheet"),
                ("type", "text/css"),
                ("href", &*self.url),
            ],
        }
    }
}

/// Writes attribute value escaped for double-quoted markup.
fn write_escaped(fmt: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let mut rest = value;
    while let Some(pos) = rest.find(|c: char| c == '"' || c == '&') {
        fmt.write_str(&rest[..pos])?;
        match rest.as_bytes()[pos] {
            b'"' => fmt.write_str("&quot;")?,
            _ => fmt.write_str("&amp;")?,
        }
        rest = &rest[pos + 1..];
    }
    fmt.write_str(rest)
}

impl Display for Reference {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "<{}", self.tag())?;
        for (name, value) in self.attributes() {
            if value.is_empty() {
                write!(fmt, " {}", name)?;
            } else {
                write!(fmt, " {}=\"", name)?;
                write_escaped(fmt, value)?;
                fmt.write_str("\"")?;
            }
        }
        fmt.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_markup() {
        let script = Reference::script("https://example.test/a.js");
        assert_eq!(
            script.to_string(),
            r#"<script src="https://example.test/a.js" async>"#
        );
        assert_eq!(
            script.with_async(false).to_string(),
            r#"<script src="https://example.test/a.js">"#
        );
    }

    #[test]
    fn stylesheet_markup() {
        let style = Reference::stylesheet("https://example.test/a.css").in_container(Container::Body);
        assert_eq!(style.container, Container::Body);
        assert_eq!(style.tag(), "link");
        assert_eq!(
            style.to_string(),
            r#"<link rel="stylesheet" type="text/css" href="https://example.test/a.css">"#
        );
    }

    #[test]
    fn markup_escapes_attribute_values() {
        let script = Reference::script(r#"https://example.test/a.js?q="x"&r=1"#);
        assert_eq!(
            script.to_string(),
            r#"<script src="https://example.test/a.js?q=&quot;x&quot;&amp;r=1" async>"#
        );
        // Attribute values themselves stay raw for the host.
        assert_eq!(script.attributes()[0].1, r#"https://example.test/a.js?q="x"&r=1"#);
    }
}
