/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The template engine.
//!
//! A [`TemplateEngine`] owns one DOM subtree and exposes marker-targeted
//! mutations on it. Every mutation resolves its marker id first (see
//! [`TemplateEngine::resolve`]); an id that matches nothing is not an error
//! and leaves the tree untouched.
//!
//! Reading output is split in two:
//!
//! - [`peek_output`](TemplateEngine::peek_output) serializes without side effects
//! - [`finalize`](TemplateEngine::finalize) serializes and closes the engine
//!
//! [`output`](TemplateEngine::output) picks one of them based on
//! [`EngineOptions::auto_close`].

use std::fmt;
use std::rc::Weak;

use crate::diagnostics::{self, Diagnostic, LogSink};
use crate::dom::{self, Handle};
use crate::error::{IceError, IceResult};
use crate::marker::{self, StrippedFlags};
use crate::mode::{Transform, WriteMode};
use crate::options::EngineOptions;
use crate::value::IceValue;

/// What a [`TemplateEngine`] is built from.
#[derive(Debug, Clone)]
pub enum Source {
    /// Raw HTML, parsed as body content.
    Markup(String),
    /// An already-parsed node, wrapped as-is.
    Node(Handle),
}

impl From<&str> for Source {
    fn from(markup: &str) -> Self {
        Source::Markup(markup.to_string())
    }
}

impl From<String> for Source {
    fn from(markup: String) -> Self {
        Source::Markup(markup)
    }
}

impl From<Handle> for Source {
    fn from(node: Handle) -> Self {
        Source::Node(node)
    }
}

impl From<&Handle> for Source {
    fn from(node: &Handle) -> Self {
        Source::Node(node.clone())
    }
}

/// Content for [`TemplateEngine::load`].
pub enum LoadContent<'a> {
    /// HTML text.
    Markup(String),
    /// Another engine; its output is read when the load happens.
    Template(&'a mut TemplateEngine),
}

impl LoadContent<'_> {
    /// Read the markup. A source engine is only peeked at, never closed here.
    fn read(&mut self) -> IceResult<String> {
        match self {
            LoadContent::Markup(markup) => Ok(std::mem::take(markup)),
            LoadContent::Template(engine) => engine.peek_output(),
        }
    }

    /// Close an `auto_close` source engine once its output has been used.
    fn settle(self) -> IceResult<()> {
        match self {
            LoadContent::Template(engine) if engine.options().auto_close => engine.close(),
            _ => Ok(()),
        }
    }
}

impl From<&str> for LoadContent<'_> {
    fn from(markup: &str) -> Self {
        LoadContent::Markup(markup.to_string())
    }
}

impl From<String> for LoadContent<'_> {
    fn from(markup: String) -> Self {
        LoadContent::Markup(markup)
    }
}

impl From<&IceValue> for LoadContent<'_> {
    fn from(value: &IceValue) -> Self {
        LoadContent::Markup(value.render())
    }
}

impl From<IceValue> for LoadContent<'_> {
    fn from(value: IceValue) -> Self {
        LoadContent::Markup(value.render())
    }
}

impl<'a> From<&'a mut TemplateEngine> for LoadContent<'a> {
    fn from(engine: &'a mut TemplateEngine) -> Self {
        LoadContent::Template(engine)
    }
}

/// A stateful wrapper around one DOM subtree.
pub struct TemplateEngine {
    /// The owned subtree; `None` once the engine is closed.
    root: Option<Handle>,

    /// Whether serialization emits the root's own tag.
    include_root: bool,

    options: EngineOptions,

    /// Last serialized output, kept after close.
    cached_output: Option<String>,

    log_sink: Option<Weak<dyn LogSink>>,
}

impl TemplateEngine {
    /// Create an engine from markup or an existing node.
    ///
    /// Markup is parsed as body content and only the parsed content is
    /// serialized. A node is wrapped as-is and serialized including itself.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for empty markup.
    pub fn new(source: impl Into<Source>, options: EngineOptions) -> IceResult<Self> {
        match source.into() {
            Source::Markup(markup) => {
                if markup.is_empty() {
                    return Err(IceError::invalid_argument(
                        "template markup must not be empty",
                    ));
                }
                Ok(Self::with_root(dom::parse(&markup), false, options))
            }
            Source::Node(node) => Ok(Self::from_node(node, options)),
        }
    }

    /// Parse markup with default options.
    pub fn parse(markup: &str) -> IceResult<Self> {
        Self::new(markup, EngineOptions::default())
    }

    /// Wrap an existing node.
    pub fn from_node(node: Handle, options: EngineOptions) -> Self {
        Self::with_root(node, true, options)
    }

    fn with_root(root: Handle, include_root: bool, options: EngineOptions) -> Self {
        Self {
            root: Some(root),
            include_root,
            options,
            cached_output: None,
            log_sink: None,
        }
    }

    /// Attach a sink for debug diagnostics. The engine only holds it weakly.
    pub fn with_log_sink(mut self, sink: Weak<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Replace or remove the diagnostic sink.
    pub fn set_log_sink(&mut self, sink: Option<Weak<dyn LogSink>>) {
        self.log_sink = sink;
    }

    /// Build an engine over a node of this engine's tree (or a clone of one),
    /// sharing options and sink.
    pub(crate) fn child(&self, root: Handle, include_root: bool) -> Self {
        Self {
            root: Some(root),
            include_root,
            options: self.options,
            cached_output: None,
            log_sink: self.log_sink.clone(),
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    pub fn is_closed(&self) -> bool {
        self.root.is_none()
    }

    /// The root node, or `None` once closed.
    pub fn root(&self) -> Option<&Handle> {
        self.root.as_ref()
    }

    pub(crate) fn open_root(&self, operation: &'static str) -> IceResult<&Handle> {
        self.root
            .as_ref()
            .ok_or(IceError::InvalidState { operation })
    }

    /// Find the marker nodes for `id`, in document order.
    ///
    /// Nodes inside a region that was filled by [`load`](Self::load) are
    /// skipped. An empty result is reported to the log sink when debug mode
    /// is on.
    ///
    /// # Errors
    ///
    /// `InvalidState` if closed, `InvalidArgument` if `id` is empty.
    pub fn resolve(&self, id: &str) -> IceResult<Vec<Handle>> {
        self.resolve_for("resolve markers in", id)
    }

    pub(crate) fn resolve_for(
        &self,
        operation: &'static str,
        id: &str,
    ) -> IceResult<Vec<Handle>> {
        let root = self.open_root(operation)?;
        if id.is_empty() {
            return Err(IceError::invalid_argument("marker id must not be empty"));
        }

        let nodes = marker::find_markers(root, id);
        tracing::trace!(id, matched = nodes.len(), "resolved marker");
        if nodes.is_empty() {
            self.report(Diagnostic::MarkerNotFound { id: id.to_string() });
        }
        Ok(nodes)
    }

    fn report(&self, diagnostic: Diagnostic) {
        if !diagnostics::debug_enabled() {
            return;
        }
        if let Some(sink) = self.log_sink.as_ref().and_then(Weak::upgrade) {
            sink.emit(&diagnostic);
        }
    }

    /// Write `value` into the text content of every `id` marker.
    ///
    /// With `auto_drop`, a blank value removes the markers instead.
    /// Setting text replaces all children of the marker.
    pub fn text(
        &mut self,
        id: &str,
        value: impl Into<IceValue>,
        mode: WriteMode,
    ) -> IceResult<()> {
        let value = value.into();
        let nodes = self.resolve_for("write text to", id)?;

        if self.options.auto_drop && value.is_blank() {
            remove_all(&nodes);
            return Ok(());
        }

        let transform = Transform::compile(mode, value.render())?;
        for node in &nodes {
            let current = if transform.reads_current() {
                dom::text_content(node)
            } else {
                String::new()
            };
            dom::set_text_content(node, &transform.apply(&current));
        }
        Ok(())
    }

    /// Write `value` into attribute `key` of every `id` marker.
    ///
    /// `auto_drop` does not apply: the attribute is written even when blank.
    pub fn attr(
        &mut self,
        id: &str,
        key: &str,
        value: impl Into<IceValue>,
        mode: WriteMode,
    ) -> IceResult<()> {
        self.open_root("write an attribute to")?;
        if key.is_empty() {
            return Err(IceError::invalid_argument("attribute name must not be empty"));
        }
        let nodes = self.resolve_for("write an attribute to", id)?;

        let transform = Transform::compile(mode, value.into().render())?;
        for node in &nodes {
            let current = if transform.reads_current() {
                dom::get_attr(node, key).unwrap_or_default()
            } else {
                String::new()
            };
            dom::set_attr(node, key, &transform.apply(&current));
        }
        Ok(())
    }

    /// Load HTML (or another engine's output) into every `id` marker.
    ///
    /// Each marker is flagged as loaded before its content changes, so later
    /// lookups never reach into the loaded content. When nothing matches, a
    /// [`LoadContent::Template`] is left unread. A template source with
    /// `auto_close` is closed only once its output is accepted, so an invalid
    /// `remove` pattern leaves it open.
    pub fn load<'c>(
        &mut self,
        id: &str,
        content: impl Into<LoadContent<'c>>,
        mode: WriteMode,
    ) -> IceResult<()> {
        let nodes = self.resolve_for("load into", id)?;
        if nodes.is_empty() {
            return Ok(());
        }

        let mut content = content.into();
        let markup = content.read()?;
        if self.options.auto_drop && markup.is_empty() {
            content.settle()?;
            remove_all(&nodes);
            return Ok(());
        }

        let transform = Transform::compile(mode, markup)?;
        content.settle()?;
        for node in &nodes {
            marker::flag_loaded(node);
        }
        for node in &nodes {
            let current = if transform.reads_current() {
                dom::inner_html(node)?
            } else {
                String::new()
            };
            dom::set_inner_html(node, &transform.apply(&current));
        }
        Ok(())
    }

    /// Remove every `id` marker from the tree. Does nothing when `should_drop` is false.
    pub fn discard(&mut self, id: &str, should_drop: bool) -> IceResult<()> {
        self.open_root("discard markers from")?;
        if !should_drop {
            return Ok(());
        }
        let nodes = self.resolve_for("discard markers from", id)?;
        remove_all(&nodes);
        Ok(())
    }

    /// Serialize the tree without closing the engine.
    ///
    /// Loaded flags are removed for the duration of serialization and put
    /// back afterwards. On a closed engine, returns the cached output.
    pub fn peek_output(&mut self) -> IceResult<String> {
        let Some(root) = &self.root else {
            return Ok(self.cached_output.clone().unwrap_or_default());
        };

        let output = {
            let _stripped = StrippedFlags::strip(root);
            dom::serialize_node(root, self.include_root)?
        };
        self.cached_output = Some(output.clone());
        Ok(output)
    }

    /// Serialize the tree and close the engine.
    ///
    /// Closing is irreversible; later mutations fail with `InvalidState`.
    pub fn finalize(&mut self) -> IceResult<String> {
        if self.is_closed() {
            return self.peek_output();
        }
        let output = self.peek_output()?;
        self.root = None;
        tracing::debug!(bytes = output.len(), "template finalized");
        Ok(output)
    }

    /// Close the engine, caching its output. No-op if already closed.
    pub fn close(&mut self) -> IceResult<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.finalize().map(|_| ())
    }

    /// Read the output, finalizing the engine when `auto_close` is set.
    pub fn output(&mut self) -> IceResult<String> {
        if self.options.auto_close {
            self.finalize()
        } else {
            self.peek_output()
        }
    }
}

impl fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("closed", &self.is_closed())
            .field("include_root", &self.include_root)
            .field("options", &self.options)
            .field("has_log_sink", &self.log_sink.is_some())
            .finish()
    }
}

pub(crate) fn remove_all(nodes: &[Handle]) {
    for node in nodes {
        dom::detach(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCollector, debug_flag_lock, set_debug};
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn engine(markup: &str) -> TemplateEngine {
        TemplateEngine::parse(markup).expect("markup should parse")
    }

    fn engine_with(markup: &str, options: EngineOptions) -> TemplateEngine {
        TemplateEngine::new(markup, options).expect("markup should parse")
    }

    #[test]
    fn test_text_append_default_scenario() {
        let mut t = engine(r#"<p data-ice="name"></p>"#);
        t.text("name", "Alice", WriteMode::default()).unwrap();
        assert_eq!(t.output().unwrap(), r#"<p data-ice="name">Alice</p>"#);
    }

    #[test]
    fn test_text_modes() {
        let mut t = engine(r#"<p data-ice="x">middle</p>"#);
        t.text("x", "[", WriteMode::Prepend).unwrap();
        t.text("x", "]", WriteMode::Append).unwrap();
        assert_eq!(t.output().unwrap(), r#"<p data-ice="x">[middle]</p>"#);

        t.text("x", r"[\[\]]", WriteMode::Remove).unwrap();
        assert_eq!(t.output().unwrap(), r#"<p data-ice="x">middle</p>"#);
    }

    #[test]
    fn test_text_write_is_idempotent_overwrite() {
        let mut t = engine(r#"<h1 data-ice="title">Draft</h1>"#);
        t.text("title", "First", WriteMode::Write).unwrap();
        t.text("title", "Second", WriteMode::Write).unwrap();
        assert_eq!(t.output().unwrap(), r#"<h1 data-ice="title">Second</h1>"#);
    }

    #[test]
    fn test_text_targets_every_match() {
        let mut t = engine(r#"<b data-ice="n"></b><i data-ice="n"></i>"#);
        t.text("n", 7_i64, WriteMode::Write).unwrap();
        assert_eq!(
            t.output().unwrap(),
            r#"<b data-ice="n">7</b><i data-ice="n">7</i>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let mut t = engine(r#"<p data-ice="x"></p>"#);
        t.text("x", "<script>", WriteMode::Write).unwrap();
        assert_eq!(t.output().unwrap(), r#"<p data-ice="x">&lt;script&gt;</p>"#);
    }

    #[test]
    fn test_text_auto_drop_removes_marker() {
        let mut t = engine_with(
            r#"<div><span data-ice="x">keep</span></div>"#,
            EngineOptions::new().with_auto_drop(true),
        );
        t.text("x", "", WriteMode::default()).unwrap();
        assert_eq!(t.output().unwrap(), "<div></div>");
    }

    #[test]
    fn test_text_blank_without_auto_drop_keeps_marker() {
        let mut t = engine(r#"<span data-ice="x">keep</span>"#);
        t.text("x", IceValue::Null, WriteMode::Write).unwrap();
        assert_eq!(t.output().unwrap(), r#"<span data-ice="x"></span>"#);
    }

    #[test]
    fn test_missing_marker_is_not_an_error() {
        let source = r#"<p data-ice="a">x</p>"#;
        let mut t = engine(source);
        t.text("missing", "v", WriteMode::Write).unwrap();
        t.attr("missing", "class", "v", WriteMode::Write).unwrap();
        t.load("missing", "<b>v</b>", WriteMode::Write).unwrap();
        t.discard("missing", true).unwrap();
        assert_eq!(t.output().unwrap(), source);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut t = engine(r#"<p data-ice="a"></p>"#);
        let err = t.text("", "v", WriteMode::Write).unwrap_err();
        assert!(matches!(err, IceError::InvalidArgument { .. }));
    }

    #[test]
    fn test_empty_markup_rejected() {
        let err = TemplateEngine::parse("").unwrap_err();
        assert!(matches!(err, IceError::InvalidArgument { .. }));
    }

    #[test]
    fn test_attr_modes() {
        let mut t = engine(r#"<a data-ice="link" class="btn"></a>"#);
        t.attr("link", "class", " active", WriteMode::Append).unwrap();
        t.attr("link", "href", "/home", WriteMode::Write).unwrap();
        assert_eq!(
            t.output().unwrap(),
            r#"<a data-ice="link" class="btn active" href="/home"></a>"#
        );

        t.attr("link", "class", r"\s*active", WriteMode::Remove).unwrap();
        assert_eq!(
            t.output().unwrap(),
            r#"<a data-ice="link" class="btn" href="/home"></a>"#
        );
    }

    #[test]
    fn test_attr_empty_key_rejected_before_lookup() {
        let _guard = debug_flag_lock();
        let collector = Rc::new(DiagnosticCollector::new());
        let mut t = engine(r#"<a data-ice="link"></a>"#).with_log_sink(Rc::<DiagnosticCollector>::downgrade(&collector));

        let previous = set_debug(true);
        let result = t.attr("missing", "", "v", WriteMode::Write);
        set_debug(previous);

        assert!(matches!(result, Err(IceError::InvalidArgument { .. })));
        assert!(collector.is_empty());

        t.close().unwrap();
        assert!(matches!(
            t.attr("link", "", "v", WriteMode::Write),
            Err(IceError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_attr_ignores_auto_drop() {
        let mut t = engine_with(
            r#"<img data-ice="pic">"#,
            EngineOptions::new().with_auto_drop(true),
        );
        t.attr("pic", "alt", "", WriteMode::Write).unwrap();
        assert_eq!(t.output().unwrap(), r#"<img data-ice="pic" alt="">"#);
    }

    #[test]
    fn test_invalid_pattern_touches_nothing() {
        let source = r#"<b data-ice="n">a</b><b data-ice="n">b</b>"#;
        let mut t = engine(source);
        let err = t.text("n", "(", WriteMode::Remove).unwrap_err();
        assert!(matches!(err, IceError::InvalidArgument { .. }));
        assert_eq!(t.output().unwrap(), source);
    }

    #[test]
    fn test_load_markup_and_loaded_flag_hidden() {
        let mut t = engine(r#"<div data-ice="body"></div>"#);
        t.load("body", "<p>Hello</p>", WriteMode::default()).unwrap();

        let out = t.output().unwrap();
        assert_eq!(out, r#"<div data-ice="body"><p>Hello</p></div>"#);
        assert!(!out.contains("data-ice-loaded"));

        // The flag is still present in memory
        let node = t.resolve("body").unwrap().remove(0);
        assert_eq!(dom::get_attr(&node, marker::LOADED_ATTR).as_deref(), Some("1"));
    }

    #[test]
    fn test_load_write_replaces_content() {
        let mut t = engine(r#"<div data-ice="body"><p>old</p></div>"#);
        t.load("body", "<em>new</em>", WriteMode::Write).unwrap();
        assert_eq!(t.output().unwrap(), r#"<div data-ice="body"><em>new</em></div>"#);
    }

    #[test]
    fn test_load_prepend_keeps_existing() {
        let mut t = engine(r#"<div data-ice="body"><p>old</p></div>"#);
        t.load("body", "<h2>new</h2>", WriteMode::Prepend).unwrap();
        assert_eq!(
            t.output().unwrap(),
            r#"<div data-ice="body"><h2>new</h2><p>old</p></div>"#
        );
    }

    #[test]
    fn test_loaded_region_is_excluded_from_lookups() {
        let mut t = engine(r#"<div data-ice="slot"></div><p data-ice="name"></p>"#);
        t.load("slot", r#"<span data-ice="name">child</span>"#, WriteMode::Write)
            .unwrap();
        t.text("name", "parent", WriteMode::Write).unwrap();

        assert_eq!(
            t.output().unwrap(),
            r#"<div data-ice="slot"><span data-ice="name">child</span></div><p data-ice="name">parent</p>"#
        );
    }

    #[test]
    fn test_load_from_engine() {
        let mut child = engine(r#"<li data-ice="label"></li>"#);
        child.text("label", "nested", WriteMode::Write).unwrap();

        let mut parent = engine(r#"<ul data-ice="list"></ul>"#);
        parent.load("list", &mut child, WriteMode::Write).unwrap();

        assert_eq!(
            parent.output().unwrap(),
            r#"<ul data-ice="list"><li data-ice="label">nested</li></ul>"#
        );
        assert!(!child.is_closed());
    }

    #[test]
    fn test_load_from_auto_closing_engine_closes_it() {
        let mut child = engine_with("<b>x</b>", EngineOptions::new().with_auto_close(true));
        let mut parent = engine(r#"<div data-ice="slot"></div>"#);
        parent.load("slot", &mut child, WriteMode::Write).unwrap();
        assert!(child.is_closed());
        assert_eq!(child.output().unwrap(), "<b>x</b>");
    }

    #[test]
    fn test_load_invalid_pattern_leaves_source_open() {
        let mut child = engine_with("<b>(</b>", EngineOptions::new().with_auto_close(true));
        let mut parent = engine(r#"<div data-ice="slot">x</div>"#);

        let err = parent
            .load("slot", &mut child, WriteMode::Remove)
            .unwrap_err();
        assert!(matches!(err, IceError::InvalidArgument { .. }));
        assert!(!child.is_closed());
        assert_eq!(parent.output().unwrap(), r#"<div data-ice="slot">x</div>"#);

        // A valid load still closes the source
        parent.load("slot", &mut child, WriteMode::Write).unwrap();
        assert!(child.is_closed());
    }

    #[test]
    fn test_load_remove_mode() {
        let mut t = engine(r#"<div data-ice="body"><p>keep</p><p>drop</p></div>"#);
        t.load("body", "<p>drop</p>", WriteMode::Remove).unwrap();
        assert_eq!(
            t.output().unwrap(),
            r#"<div data-ice="body"><p>keep</p></div>"#
        );
    }

    #[test]
    fn test_load_auto_drop() {
        let mut t = engine_with(
            r#"<p>a</p><div data-ice="slot">b</div>"#,
            EngineOptions::new().with_auto_drop(true),
        );
        t.load("slot", "", WriteMode::Write).unwrap();
        assert_eq!(t.output().unwrap(), "<p>a</p>");
    }

    #[test]
    fn test_discard() {
        let mut t = engine(r#"<p data-ice="a">a</p><p data-ice="b">b</p>"#);
        t.discard("a", false).unwrap();
        assert_eq!(
            t.output().unwrap(),
            r#"<p data-ice="a">a</p><p data-ice="b">b</p>"#
        );
        t.discard("a", true).unwrap();
        assert_eq!(t.output().unwrap(), r#"<p data-ice="b">b</p>"#);
    }

    #[test]
    fn test_close_invalidates_mutations() {
        let mut t = engine(r#"<p data-ice="a">x</p>"#);
        t.text("a", "!", WriteMode::Append).unwrap();
        t.close().unwrap();
        t.close().unwrap();

        assert!(t.is_closed());
        assert!(matches!(
            t.text("a", "v", WriteMode::Write),
            Err(IceError::InvalidState { .. })
        ));
        assert!(matches!(
            t.attr("a", "k", "v", WriteMode::Write),
            Err(IceError::InvalidState { .. })
        ));
        assert!(matches!(
            t.load("a", "v", WriteMode::Write),
            Err(IceError::InvalidState { .. })
        ));
        assert!(matches!(t.discard("a", true), Err(IceError::InvalidState { .. })));
        assert!(matches!(t.resolve("a"), Err(IceError::InvalidState { .. })));

        assert_eq!(t.output().unwrap(), r#"<p data-ice="a">x!</p>"#);
        assert_eq!(t.peek_output().unwrap(), r#"<p data-ice="a">x!</p>"#);
    }

    #[test]
    fn test_auto_close_output_finalizes() {
        let mut t = engine_with(
            r#"<p data-ice="a"></p>"#,
            EngineOptions::new().with_auto_close(true),
        );
        assert_eq!(t.output().unwrap(), r#"<p data-ice="a"></p>"#);
        assert!(t.is_closed());
        assert_eq!(t.output().unwrap(), r#"<p data-ice="a"></p>"#);

        // peek_output never closes
        let mut open = engine(r#"<p></p>"#);
        open.peek_output().unwrap();
        assert!(!open.is_closed());
    }

    #[test]
    fn test_from_node_includes_root() {
        let source = engine(r#"<section data-ice="card"><h2 data-ice="title"></h2></section>"#);
        let card = source.resolve("card").unwrap().remove(0);

        let mut scoped = TemplateEngine::from_node(card, EngineOptions::default());
        scoped.text("title", "Hi", WriteMode::Write).unwrap();
        assert_eq!(
            scoped.output().unwrap(),
            r#"<section data-ice="card"><h2 data-ice="title">Hi</h2></section>"#
        );
    }

    #[test]
    fn test_missing_marker_diagnostic() {
        let _guard = debug_flag_lock();
        let collector = Rc::new(DiagnosticCollector::new());
        let mut t = engine(r#"<p data-ice="a"></p>"#).with_log_sink(Rc::<DiagnosticCollector>::downgrade(&collector));

        let previous = set_debug(false);
        t.text("nope", "v", WriteMode::Write).unwrap();
        assert!(collector.is_empty());

        set_debug(true);
        t.text("nope", "v", WriteMode::Write).unwrap();
        t.text("a", "v", WriteMode::Write).unwrap();
        set_debug(previous);

        assert_eq!(
            collector.diagnostics(),
            vec![Diagnostic::MarkerNotFound { id: "nope".into() }]
        );
    }

    #[test]
    fn test_dropped_sink_is_ignored() {
        let _guard = debug_flag_lock();
        let collector = Rc::new(DiagnosticCollector::new());
        let mut t = engine(r#"<p></p>"#).with_log_sink(Rc::<DiagnosticCollector>::downgrade(&collector));
        drop(collector);

        let previous = set_debug(true);
        let result = t.text("nope", "v", WriteMode::Write);
        set_debug(previous);
        assert!(result.is_ok());
    }
}
