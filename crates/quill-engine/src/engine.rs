//! Conversion between syntaxes.

use std::collections::HashMap;
use std::sync::Arc;

use quill_config::{Config, OnError};
use quill_macro::{
    ErrorPolicy, FootnoteMacro, MacroExecutionError, MacroTransformation, PutFootnotesMacro,
    TransformationConfig,
};
use quill_syntax::{
    ContributorBridge, PlainSyntaxContributor, StaticContributors, Syntax, SyntaxRegistry,
    XWikiSyntaxContributor, XhtmlSyntaxContributor,
};
use quill_xdom::{Block, Parser, PlainTextParser, PlainTextRenderer, Renderer, StaticWikiModel};
use quill_xhtml::{XhtmlParser, XhtmlRenderer};

use crate::error::EngineError;

/// Result of converting one document.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered output.
    pub output: String,
    /// Number of macro calls handled.
    pub macro_executions: usize,
    /// Macro failures rendered as error blocks.
    pub warnings: Vec<MacroExecutionError>,
}

/// Parses, transforms and renders documents.
///
/// Shared read-only between threads: every conversion works on its own tree,
/// and the syntax registry is safe for concurrent use.
pub struct RenderingEngine {
    bridge: ContributorBridge,
    parsers: HashMap<String, Arc<dyn Parser>>,
    renderers: HashMap<String, Arc<dyn Renderer>>,
    transformation: Option<MacroTransformation>,
}

impl RenderingEngine {
    /// Create an engine over `registry` with no parsers, renderers or macros.
    #[must_use]
    pub fn new(registry: Arc<SyntaxRegistry>) -> Self {
        Self {
            bridge: ContributorBridge::new(registry),
            parsers: HashMap::new(),
            renderers: HashMap::new(),
            transformation: None,
        }
    }

    /// Create an engine with the built-in syntaxes, parsers, renderers and
    /// macros, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Contributor`] if a built-in syntax contributor
    /// cannot be activated.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let mut engine = Self::new(Arc::new(SyntaxRegistry::new()));

        let contributors = StaticContributors::new()
            .with("xwiki", XWikiSyntaxContributor)
            .with("xhtml", XhtmlSyntaxContributor)
            .with("plain", PlainSyntaxContributor);
        for descriptor in contributors.descriptors() {
            engine.bridge.on_contributor_added(&contributors, descriptor)?;
        }

        let wiki = config
            .wiki
            .documents
            .iter()
            .fold(StaticWikiModel::new(&config.wiki.base_url), |wiki, name| {
                wiki.with_document(name.clone())
            });

        engine = engine
            .with_parser(
                XhtmlParser::new().with_ignore_classes(config.xhtml.ignore_classes.iter().cloned()),
            )
            .with_parser(PlainTextParser::new())
            .with_renderer(
                XhtmlRenderer::new()
                    .with_wiki_model(Arc::new(wiki))
                    .with_escape_non_ascii(config.xhtml.escape_non_ascii),
            )
            .with_renderer(PlainTextRenderer::new());

        if config.macros.enabled {
            let on_error = match config.macros.on_error {
                OnError::Marker => ErrorPolicy::Marker,
                OnError::Abort => ErrorPolicy::Abort,
            };
            let transformation = MacroTransformation::new(
                TransformationConfig::default()
                    .with_max_executions(config.macros.max_executions)
                    .with_error_policy(on_error),
            )
            .with_macro(FootnoteMacro::new())
            .with_macro(PutFootnotesMacro::new());
            engine = engine.with_transformation(transformation);
        }

        Ok(engine)
    }

    /// Add a parser for its syntax, replacing any previous one.
    #[must_use]
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parsers
            .insert(parser.syntax().to_id_string(), Arc::new(parser));
        self
    }

    /// Add a renderer for its syntax, replacing any previous one.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderers
            .insert(renderer.syntax().to_id_string(), Arc::new(renderer));
        self
    }

    /// Run `transformation` between parsing and rendering.
    #[must_use]
    pub fn with_transformation(mut self, transformation: MacroTransformation) -> Self {
        self.transformation = Some(transformation);
        self
    }

    /// Skip macro execution.
    #[must_use]
    pub fn without_transformation(mut self) -> Self {
        self.transformation = None;
        self
    }

    /// The live syntax registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<SyntaxRegistry> {
        self.bridge.registry()
    }

    /// The bridge through which syntax plugins come and go.
    #[must_use]
    pub fn bridge(&self) -> &ContributorBridge {
        &self.bridge
    }

    /// The macro transformation, if macros run.
    #[must_use]
    pub fn transformation(&self) -> Option<&MacroTransformation> {
        self.transformation.as_ref()
    }

    /// Parse `source` written in syntax `from` into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Syntax`] for an unknown syntax,
    /// [`EngineError::NoParser`] when no parser handles it and
    /// [`EngineError::Parse`] when the source is invalid.
    pub fn parse(&self, source: &str, from: &str) -> Result<(Syntax, Block), EngineError> {
        let syntax = self.registry().resolve_syntax(from)?;
        let key = syntax.to_id_string();
        let parser = self.parsers.get(&key).ok_or(EngineError::NoParser(key))?;
        let xdom = parser.parse(source)?;
        Ok((syntax, xdom))
    }

    /// Render `xdom` in syntax `to`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Syntax`] for an unknown syntax and
    /// [`EngineError::NoRenderer`] when no renderer handles it.
    pub fn render(&self, xdom: &Block, to: &str) -> Result<String, EngineError> {
        let renderer = self.renderer(to)?;
        Ok(renderer.render(xdom))
    }

    /// Convert `source` from syntax `from` to syntax `to`.
    ///
    /// Both ids are resolved before any work is done.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse) and [`render`](Self::render); additionally
    /// [`EngineError::Transformation`] when macro execution aborts.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, EngineError> {
        self.convert_document(source, from, to)
            .map(|result| result.output)
    }

    /// Like [`convert`](Self::convert), also reporting what the macros did.
    ///
    /// # Errors
    ///
    /// See [`convert`](Self::convert).
    pub fn convert_document(
        &self,
        source: &str,
        from: &str,
        to: &str,
    ) -> Result<RenderResult, EngineError> {
        let renderer = self.renderer(to)?;
        let (syntax, mut xdom) = self.parse(source, from)?;

        let mut result = RenderResult {
            output: String::new(),
            macro_executions: 0,
            warnings: Vec::new(),
        };
        if let Some(transformation) = &self.transformation {
            let report = transformation.transform(&mut xdom, Some(&syntax))?;
            result.macro_executions = report.executions;
            result.warnings = report.errors;
        }

        result.output = renderer.render(&xdom);
        tracing::debug!(
            from = %syntax,
            to = %renderer.syntax(),
            macros = result.macro_executions,
            "Converted document"
        );
        Ok(result)
    }

    fn renderer(&self, to: &str) -> Result<&Arc<dyn Renderer>, EngineError> {
        let syntax = self.registry().resolve_syntax(to)?;
        let key = syntax.to_id_string();
        self.renderers.get(&key).ok_or(EngineError::NoRenderer(key))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quill_syntax::{ContributorDescriptor, ParseError, SyntaxType};
    use quill_macro::TransformationError;
    use quill_xdom::{BlockKind, Parameters, ResourceReference};
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(RenderingEngine: Send, Sync);

    fn engine() -> RenderingEngine {
        RenderingEngine::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_builtin_syntaxes_registered() {
        let engine = engine();
        let mut ids: Vec<_> = engine.registry().get_syntaxes().into_keys().collect();
        ids.sort();

        assert_eq!(ids, vec!["plain/1.0", "xhtml/1.0", "xwiki/2.0", "xwiki/2.1"]);
    }

    #[test]
    fn test_unknown_syntax() {
        let err = engine().convert("x", "markdown/1.2", "xhtml/1.0").unwrap_err();

        assert!(matches!(
            err,
            EngineError::Syntax(ParseError::UnknownSyntax(id)) if id == "markdown/1.2"
        ));
    }

    #[test]
    fn test_registered_syntax_without_parser() {
        let err = engine().convert("x", "xwiki/2.1", "xhtml/1.0").unwrap_err();

        assert!(matches!(err, EngineError::NoParser(id) if id == "xwiki/2.1"));
    }

    #[test]
    fn test_output_syntax_checked_before_parsing() {
        let err = engine().convert("<p>", "xhtml/1.0", "xwiki/2.0").unwrap_err();

        assert!(matches!(err, EngineError::NoRenderer(id) if id == "xwiki/2.0"));
    }

    #[test]
    fn test_plugin_syntax_usable_after_activation() {
        let engine = engine().with_parser(PlainAliasParser);
        let descriptor = ContributorDescriptor::new("text");

        assert!(engine.convert("a", "text/1.0", "plain/1.0").is_err());

        engine
            .bridge()
            .on_contributor_activated(&descriptor, &|| vec![TEXT.clone()]);
        assert_eq!(engine.convert("a", "text/1.0", "plain/1.0").unwrap(), "a");

        engine.bridge().on_contributor_deactivated(&descriptor);
        assert!(matches!(
            engine.convert("a", "text/1.0", "plain/1.0"),
            Err(EngineError::Syntax(_))
        ));
    }

    #[test]
    fn test_without_transformation_leaves_macros_unrendered() {
        let engine = engine().without_transformation();
        let (_, mut xdom) = engine.parse("Body", "plain/1.0").unwrap();
        xdom.add_child(Block::macro_call("footnote", Parameters::new(), None, false));

        assert!(engine.transformation().is_none());
        assert_eq!(engine.render(&xdom, "xhtml/1.0").unwrap(), "<p>Body</p>");
    }

    #[test]
    fn test_footnotes_rendered_as_references_and_list() {
        let engine = engine();
        let mut xdom = Block::xdom(vec![Block::paragraph(vec![
            Block::word("Text"),
            Block::macro_call("footnote", Parameters::new(), Some(" note ".to_owned()), true),
        ])]);

        let report = engine
            .transformation()
            .unwrap()
            .transform(&mut xdom, Some(&Syntax::PLAIN_1_0))
            .unwrap();

        assert_eq!(report.executions, 2);
        assert_eq!(
            engine.render(&xdom, "xhtml/1.0").unwrap(),
            concat!(
                r##"<p>Text<sup class="footnoteRef" id="x_footnote_ref_1"><a href="#x_footnote_1">1</a></sup></p>"##,
                r##"<ol class="footnotes"><li id="x_footnote_1"><a href="#x_footnote_ref_1" class="footnoteBackRef">^</a> note</li></ol>"##,
            )
        );
    }

    #[test]
    fn test_footnotes_from_markup_executed_and_listed() {
        let result = engine()
            .convert_document(
                "<p>Claim<!--startmacro:footnote|-||-|Source--><!--stopmacro--></p>",
                "xhtml/1.0",
                "xhtml/1.0",
            )
            .unwrap();

        assert_eq!(result.macro_executions, 2);
        assert!(result.warnings.is_empty());
        assert_eq!(
            result.output,
            concat!(
                r##"<p>Claim<sup class="footnoteRef" id="x_footnote_ref_1"><a href="#x_footnote_1">1</a></sup></p>"##,
                r##"<ol class="footnotes"><li id="x_footnote_1"><a href="#x_footnote_ref_1" class="footnoteBackRef">^</a> Source</li></ol>"##,
            )
        );
    }

    #[test]
    fn test_unknown_macro_from_markup_reported() {
        let result = engine()
            .convert_document(
                "<!--startmacro:missing|-|--><p>old output</p><!--stopmacro-->",
                "xhtml/1.0",
                "plain/1.0",
            )
            .unwrap();

        assert_eq!(result.macro_executions, 1);
        assert_eq!(
            result.warnings,
            vec![MacroExecutionError::UnknownMacro("missing".to_owned())]
        );
        assert!(!result.output.contains("old output"));
    }

    #[test]
    fn test_xhtml_round_trip() {
        let source = r#"<p>See <span class="wikiexternallink"><a href="https://example.com">Ex</a></span></p>"#;

        assert_eq!(engine().convert(source, "xhtml/1.0", "xhtml/1.0").unwrap(), source);
    }

    #[test]
    fn test_generated_link_label_dropped_on_import() {
        let source = r#"<p>Go <a href="https://example.com"><span class="wikigeneratedlinkcontent">https://example.com</span></a></p>"#;

        let text = engine().convert(source, "xhtml/1.0", "plain/1.0").unwrap();

        assert_eq!(text.trim_end(), "Go");
    }

    #[test]
    fn test_brace_escaped_end_to_end() {
        let html = engine().convert("{{html}}", "plain/1.0", "xhtml/1.0").unwrap();

        assert_eq!(html, "<p>&#123;&#123;html}}</p>");
    }

    #[test]
    fn test_non_ascii_escaped_by_default() {
        let html = engine().convert("café", "plain/1.0", "xhtml/1.0").unwrap();

        assert_eq!(html, "<p>caf&#233;</p>");
    }

    #[test]
    fn test_abort_policy_returns_error() {
        let mut config = Config::default();
        config.macros.on_error = OnError::Abort;
        let engine = RenderingEngine::from_config(&config).unwrap();
        let mut xdom = Block::xdom(vec![Block::macro_call(
            "missing",
            Parameters::new(),
            None,
            false,
        )]);

        let err = engine
            .transformation()
            .unwrap()
            .transform(&mut xdom, None)
            .unwrap_err();

        assert_eq!(
            err,
            TransformationError::Macro(MacroExecutionError::UnknownMacro("missing".to_owned()))
        );
    }

    #[test]
    fn test_macros_disabled_by_config() {
        let mut config = Config::default();
        config.macros.enabled = false;

        let engine = RenderingEngine::from_config(&config).unwrap();

        assert!(engine.transformation().is_none());
    }

    #[test]
    fn test_convert_document_reports_executions() {
        let result = engine()
            .convert_document("plain text", "plain/1.0", "plain/1.0")
            .unwrap();

        assert_eq!(result.output, "plain text");
        assert_eq!(result.macro_executions, 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_document_links_use_configured_wiki() {
        let mut config = Config::default();
        config.wiki.documents = vec!["Main".to_owned()];
        let engine = RenderingEngine::from_config(&config).unwrap();
        let xdom = Block::xdom(vec![
            Block::new(BlockKind::Link {
                reference: ResourceReference::parse("Main"),
                freestanding: false,
            })
            .with_children(vec![Block::word("Home")]),
        ]);

        assert_eq!(
            engine.render(&xdom, "xhtml/1.0").unwrap(),
            r#"<span class="wikilink"><a href="/wiki/view/Main">Home</a></span>"#
        );
    }

    static TEXT: Syntax = Syntax::from_static(SyntaxType::from_static("text", "Text"), "1.0");

    struct PlainAliasParser;

    impl Parser for PlainAliasParser {
        fn syntax(&self) -> &Syntax {
            &TEXT
        }

        fn parse(&self, source: &str) -> Result<Block, quill_xdom::ParserError> {
            PlainTextParser::new().parse(source)
        }
    }
}
