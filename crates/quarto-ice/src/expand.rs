/*
 * expand.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! List expansion and sub-scope delegation.
//!
//! [`TemplateEngine::repeat`] clones a marker once per list item and hands
//! each clone to a callback through its own child engine.
//! [`TemplateEngine::within`] hands each matched marker, in place, to a
//! callback through a child engine scoped to that marker.

use std::fmt;
use std::str::FromStr;

use crate::dom::{self, Handle};
use crate::engine::{TemplateEngine, remove_all};
use crate::error::{IceError, IceResult};
use crate::marker::MARKER_ATTR;
use crate::mode::WriteMode;
use crate::value::IceValue;

/// Per-item callback signature for [`RepeatCallback::Custom`].
pub type ItemCallback<'f> =
    dyn FnMut(usize, &IceValue, &mut TemplateEngine) -> IceResult<()> + 'f;

/// What [`TemplateEngine::repeat`] does with each clone.
pub enum RepeatCallback<'f> {
    /// Append the item as text to the clone (`child.text(id, item)`).
    Text,
    /// Append the item as HTML to the clone (`child.load(id, item)`).
    Html,
    /// Call a function with the item index, the item and the clone's engine.
    Custom(&'f mut ItemCallback<'f>),
}

impl RepeatCallback<'_> {
    fn invoke(
        &mut self,
        id: &str,
        index: usize,
        item: &IceValue,
        child: &mut TemplateEngine,
    ) -> IceResult<()> {
        match self {
            RepeatCallback::Text => child.text(id, item.clone(), WriteMode::Append),
            RepeatCallback::Html => child.load(id, item, WriteMode::Append),
            RepeatCallback::Custom(callback) => callback(index, item, child),
        }
    }
}

impl fmt::Debug for RepeatCallback<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatCallback::Text => f.write_str("Text"),
            RepeatCallback::Html => f.write_str("Html"),
            RepeatCallback::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for RepeatCallback<'_> {
    type Err = IceError;

    /// Parse a shorthand name: `text`, or `html` (alias `load`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(RepeatCallback::Text),
            "html" | "load" => Ok(RepeatCallback::Html),
            other => Err(IceError::invalid_argument(format!(
                "unknown repeat shorthand '{other}' (expected text or html)"
            ))),
        }
    }
}

impl TemplateEngine {
    /// Expand every `id` marker once per item of `values`.
    ///
    /// For each marker, every item gets a fresh deep clone of the marker and
    /// a child engine over it; the callback mutates the clone through that
    /// engine. The finished clones replace the marker, in item order, each
    /// followed by a newline. Clones lose their `data-ice` attribute once
    /// expanded. An empty list removes the marker.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `values` is not a list. A callback error stops
    /// the expansion of the current marker and leaves it in place.
    pub fn repeat(
        &mut self,
        id: &str,
        values: impl Into<IceValue>,
        mut callback: RepeatCallback<'_>,
    ) -> IceResult<()> {
        self.open_root("repeat markers in")?;
        let values = values.into();
        let Some(items) = values.as_list() else {
            return Err(IceError::invalid_argument(format!(
                "repeat over '{id}' expects a list, got {}",
                values.kind()
            )));
        };

        let nodes = self.resolve_for("repeat markers in", id)?;
        tracing::debug!(id, markers = nodes.len(), items = items.len(), "repeat");

        for node in &nodes {
            self.expand_marker(node, id, items, &mut callback)?;
        }
        Ok(())
    }

    /// Replace one marker with its expanded clones.
    fn expand_marker(
        &self,
        node: &Handle,
        id: &str,
        items: &[IceValue],
        callback: &mut RepeatCallback<'_>,
    ) -> IceResult<()> {
        if dom::parent(node).is_none() {
            return Err(detached_marker(id));
        }
        if items.is_empty() {
            dom::detach(node);
            return Ok(());
        }

        let mut fragments = Vec::with_capacity(items.len() * 2);
        for (index, item) in items.iter().enumerate() {
            let container = dom::element("div");
            dom::append(&container, dom::deep_clone(node));

            let mut child = self.child(container.clone(), false);
            callback.invoke(id, index, item, &mut child)?;

            for copy in dom::take_children(&container) {
                if dom::get_attr(&copy, MARKER_ATTR).as_deref() == Some(id) {
                    dom::remove_attr(&copy, MARKER_ATTR);
                }
                fragments.push(copy);
            }
            fragments.push(dom::text_node("\n"));
        }

        if dom::replace_with(node, fragments) {
            Ok(())
        } else {
            Err(detached_marker(id))
        }
    }

    /// [`repeat`](Self::repeat) with a closure.
    pub fn repeat_with<F>(
        &mut self,
        id: &str,
        values: impl Into<IceValue>,
        mut callback: F,
    ) -> IceResult<()>
    where
        F: FnMut(usize, &IceValue, &mut TemplateEngine) -> IceResult<()>,
    {
        self.repeat(id, values, RepeatCallback::Custom(&mut callback))
    }

    /// Run `callback` once per `id` marker with a child engine scoped to it.
    ///
    /// A blank `value` (null, empty string, false, empty list) removes the
    /// markers instead and the callback never runs. The child engine sees only
    /// the marker's descendants, never the marker itself.
    pub fn within<F>(
        &mut self,
        id: &str,
        value: impl Into<IceValue>,
        mut callback: F,
    ) -> IceResult<()>
    where
        F: FnMut(&IceValue, &mut TemplateEngine) -> IceResult<()>,
    {
        let value = value.into();
        let nodes = self.resolve_for("scope markers in", id)?;

        if value.is_blank() {
            remove_all(&nodes);
            return Ok(());
        }

        for node in &nodes {
            let mut child = self.child(node.clone(), true);
            callback(&value, &mut child)?;
        }
        Ok(())
    }
}

fn detached_marker(id: &str) -> IceError {
    IceError::invalid_argument(format!("marker '{id}' is not attached to the template"))
}
