use std::fmt;

use kelp_xml::ParseError;

/// Errors surfaced while loading documents, resolving styles, or building
/// the widget tree.
#[derive(Debug)]
pub enum Error {
    /// The XML itself failed to parse.
    Parse { file: String, source: ParseError },
    /// A document or template file could not be read.
    Io { file: String, source: std::io::Error },
    /// A document's root tag was not `<kelp>`.
    UnknownRoot { file: String, found: String },
    /// A tag no registered widget factory recognizes.
    UnknownTag { file: String, tag: String },
    /// A `style` attribute named a style that was never registered.
    UnknownStyle { name: String },
    /// A `<Style>` definition without a `name` attribute.
    UnnamedStyle,
    /// A style key outside the closed style schema.
    StyleKey { key: String },
    /// A style value of the wrong type for its key.
    StyleType { key: String, expected: &'static str },
    /// A `<Content>` placeholder required a child of one type but the
    /// composite invocation supplied another.
    ContentMismatch { expected: String, found: String },
    /// A required `<Content>` placeholder had no child left to consume.
    MissingContent { expected: String },
    /// A `<Content>` tag appeared outside any composite template.
    ContentOutsideComposite,
    /// A composite referenced a template that could not be resolved.
    MissingTemplate { name: String },
    /// An element was positioned so it no longer fits inside its parent.
    OutOfBounds { id: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { file, source } => write!(f, "{file}: {source}"),
            Error::Io { file, source } => write!(f, "{file}: {source}"),
            Error::UnknownRoot { file, found } => {
                write!(f, "{file}: root element must be <kelp>, found <{found}>")
            }
            Error::UnknownTag { file, tag } => {
                write!(f, "{file}: unknown widget tag <{tag}>")
            }
            Error::UnknownStyle { name } => write!(f, "unknown style `{name}`"),
            Error::UnnamedStyle => write!(f, "style definition needs a `name` attribute"),
            Error::StyleKey { key } => write!(f, "unknown style key `{key}`"),
            Error::StyleType { key, expected } => {
                write!(f, "style key `{key}` expects a {expected} value")
            }
            Error::ContentMismatch { expected, found } => {
                write!(f, "content placeholder expects <{expected}>, got <{found}>")
            }
            Error::MissingContent { expected } => {
                write!(f, "required content placeholder <{expected}> not supplied")
            }
            Error::ContentOutsideComposite => {
                write!(f, "<Content> is only valid inside a composite template")
            }
            Error::MissingTemplate { name } => write!(f, "template `{name}` not found"),
            Error::OutOfBounds { id } => {
                write!(f, "element `{id}` positioned outside its parent")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
