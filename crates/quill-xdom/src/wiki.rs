//! Bridge to the wiki holding the documents references point to.

use std::collections::{BTreeMap, HashSet};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::block::Block;
use crate::error::WikiModelError;
use crate::reference::{PageResourceReference, ResourceReference, ResourceType};

/// Characters escaped when a reference is turned into a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Wiki APIs needed while rendering.
///
/// For example a link renderer needs to know whether a document exists (to
/// render a "create" link instead) and which URL points to it.
pub trait WikiModel: Send + Sync {
    /// URL of a link target (document, URL, path...).
    fn link_url(&self, reference: &ResourceReference) -> String;

    /// URL of an image; `parameters` carries width, height and similar hints.
    fn image_url(
        &self,
        reference: &ResourceReference,
        parameters: &BTreeMap<String, String>,
    ) -> String;

    /// Whether the referenced document exists and can be viewed.
    fn is_document_available(&self, reference: &ResourceReference) -> bool;

    /// URL to view a document.
    fn document_view_url(&self, reference: &ResourceReference) -> String;

    /// URL to edit (or create) a document.
    fn document_edit_url(&self, reference: &ResourceReference) -> String;

    /// Parsed content of the referenced document.
    ///
    /// Not every model can do this; the default answers
    /// [`WikiModelError::NotImplemented`], which callers treat as a normal outcome.
    fn xdom(&self, _reference: &ResourceReference) -> Result<Block, WikiModelError> {
        Err(WikiModelError::NotImplemented)
    }
}

/// Wiki model over a fixed set of document names under a base URL.
///
/// Document `Docs/Guide` is viewed at `{base_url}/view/Docs/Guide` and edited at
/// `{base_url}/edit/Docs/Guide`; attachments live under `{base_url}/download/`.
#[derive(Debug, Clone, Default)]
pub struct StaticWikiModel {
    base_url: String,
    documents: HashSet<String>,
}

impl StaticWikiModel {
    /// Create a model rooted at `base_url` with no known documents.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            documents: HashSet::new(),
        }
    }

    /// Declare a document as existing.
    #[must_use]
    pub fn with_document(mut self, name: impl Into<String>) -> Self {
        self.documents.insert(name.into());
        self
    }

    fn url(&self, action: &str, reference: &ResourceReference) -> String {
        let path = utf8_percent_encode(reference.reference(), PATH_SEGMENT);
        let mut url = format!("{}/{action}/{path}", self.base_url);
        if let Some(query) = reference.parameter(PageResourceReference::QUERY_STRING) {
            url.push('?');
            url.push_str(query);
        }
        if let Some(anchor) = reference.parameter(PageResourceReference::ANCHOR) {
            url.push('#');
            url.push_str(anchor);
        }
        url
    }
}

impl WikiModel for StaticWikiModel {
    fn link_url(&self, reference: &ResourceReference) -> String {
        match reference.resource_type() {
            ResourceType::Url | ResourceType::Path => reference.reference().to_owned(),
            ResourceType::Mailto => format!("mailto:{}", reference.reference()),
            ResourceType::Attachment => self.url("download", reference),
            _ => self.document_view_url(reference),
        }
    }

    fn image_url(
        &self,
        reference: &ResourceReference,
        parameters: &BTreeMap<String, String>,
    ) -> String {
        let mut url = match reference.resource_type() {
            ResourceType::Url | ResourceType::Path => reference.reference().to_owned(),
            _ => self.url("download", reference),
        };
        if let Some(width) = parameters.get("width") {
            url.push_str(if url.contains('?') { "&" } else { "?" });
            url.push_str("width=");
            url.push_str(width);
        }
        url
    }

    fn is_document_available(&self, reference: &ResourceReference) -> bool {
        self.documents.contains(reference.reference())
    }

    fn document_view_url(&self, reference: &ResourceReference) -> String {
        self.url("view", reference)
    }

    fn document_edit_url(&self, reference: &ResourceReference) -> String {
        self.url("edit", reference)
    }
}
