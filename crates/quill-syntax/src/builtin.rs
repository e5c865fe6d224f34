//! Contributors for the syntaxes shipped with quill.

use crate::contributor::SyntaxContributor;
use crate::syntax::Syntax;

/// Contributes `xwiki/2.0` and `xwiki/2.1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XWikiSyntaxContributor;

impl SyntaxContributor for XWikiSyntaxContributor {
    fn initialize(&self) -> Vec<Syntax> {
        vec![Syntax::XWIKI_2_0, Syntax::XWIKI_2_1]
    }
}

/// Contributes `xhtml/1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XhtmlSyntaxContributor;

impl SyntaxContributor for XhtmlSyntaxContributor {
    fn initialize(&self) -> Vec<Syntax> {
        vec![Syntax::XHTML_1_0]
    }
}

/// Contributes `plain/1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainSyntaxContributor;

impl SyntaxContributor for PlainSyntaxContributor {
    fn initialize(&self) -> Vec<Syntax> {
        vec![Syntax::PLAIN_1_0]
    }
}
