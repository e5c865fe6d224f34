//! Error types for XHTML parsing.

/// Error while reading XHTML input.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum XhtmlParseError {
    /// Malformed XML.
    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute.
    #[error("XML attribute error")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Input bytes not valid in the document encoding.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Close tag without a matching open tag.
    #[error("unbalanced close tag </{found}>, expected {expected}")]
    UnbalancedClose {
        /// Tag that was closed.
        found: String,
        /// Tag that was open, or `nothing`.
        expected: String,
    },
}
