/*
 * dom.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! DOM capabilities consumed by the template engine.
//!
//! Parsing, tree storage and serialization are provided by `html5ever` and
//! `markup5ever_rcdom`. This module wraps them in the handful of operations
//! the engine needs: parse a fragment, query by attribute, walk ancestors,
//! clone, detach, insert, read/write text, attributes and inner HTML, and
//! serialize.
//!
//! `markup5ever_rcdom` keeps its own tree-editing helpers private, so parent
//! pointers are maintained here. Every function preserves the invariant that
//! a node appears in its parent's `children` exactly when its `parent` weak
//! pointer refers to that parent.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markup5ever::Attribute;
use markup5ever_rcdom::{Node, NodeData, RcDom, SerializableHandle};

pub use markup5ever_rcdom::Handle;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local))
}

fn attr_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(local))
}

/// Parse an HTML fragment as if it were the content of `<body>`.
///
/// Returns a detached container element whose children are the parsed nodes.
/// The container itself is never serialized by [`serialize_node`] with
/// `include_node = false`.
pub fn parse(markup: &str) -> Handle {
    parse_in_context(markup, html_name("body"))
}

/// Parse an HTML fragment with `context` as the enclosing element.
fn parse_in_context(markup: &str, context: QualName) -> Handle {
    let dom: RcDom =
        parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new()).one(markup);

    // The fragment parser places the content under a synthetic <html> element.
    // It has to leave the document before the RcDom is dropped, because
    // dropping a node empties the children of everything beneath it.
    let top_level = std::mem::take(&mut *dom.document.children.borrow_mut());
    let container = top_level
        .into_iter()
        .find(is_element)
        .unwrap_or_else(|| element("html"));
    container.parent.set(None);
    container
}

/// Create a detached, empty HTML element.
pub fn element(local: &str) -> Handle {
    Node::new(NodeData::Element {
        name: html_name(local),
        attrs: RefCell::new(Vec::new()),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Create a detached text node.
pub fn text_node(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    })
}

/// Check if a node is an element.
pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// Get an attribute value by name.
pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Check if a node carries an attribute.
pub fn has_attr(node: &Handle, name: &str) -> bool {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .any(|attr| attr.name.local.as_ref() == name),
        _ => false,
    }
}

/// Set an attribute, replacing its value in place when it already exists.
///
/// Does nothing on non-element nodes.
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &node.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|attr| attr.name.local.as_ref() == name) {
        Some(attr) => attr.value = StrTendril::from_slice(value),
        None => attrs.push(Attribute {
            name: attr_name(name),
            value: StrTendril::from_slice(value),
        }),
    }
}

/// Remove an attribute, returning its previous value.
pub fn remove_attr(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else {
        return None;
    };
    let mut attrs = attrs.borrow_mut();
    let index = attrs
        .iter()
        .position(|attr| attr.name.local.as_ref() == name)?;
    Some(attrs.remove(index).value.to_string())
}

/// Get the parent of a node, if it is attached.
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Check if any ancestor of `node` carries attribute `name`.
pub fn has_ancestor_with_attr(node: &Handle, name: &str) -> bool {
    let mut current = parent(node);
    while let Some(ancestor) = current {
        if has_attr(&ancestor, name) {
            return true;
        }
        current = parent(&ancestor);
    }
    false
}

/// All descendant elements of `root` (root excluded), in document order.
pub fn elements(root: &Handle) -> Vec<Handle> {
    let mut found = Vec::new();
    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        if is_element(&node) {
            found.push(node.clone());
        }
        // Push in reverse so the first child is visited next
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }
    found
}

/// Descendant elements of `root` whose attribute `name` equals `value`.
pub fn find_by_attr(root: &Handle, name: &str, value: &str) -> Vec<Handle> {
    elements(root)
        .into_iter()
        .filter(|node| get_attr(node, name).as_deref() == Some(value))
        .collect()
}

/// Descendant elements of `root` that carry attribute `name`.
pub fn find_with_attr(root: &Handle, name: &str) -> Vec<Handle> {
    elements(root)
        .into_iter()
        .filter(|node| has_attr(node, name))
        .collect()
}

/// Deep-copy a node. The copy is detached.
pub fn deep_clone(node: &Handle) -> Handle {
    let data = match &node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(deep_clone)),
            mathml_annotation_xml_integration_point: *mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction { target, contents } => {
            NodeData::ProcessingInstruction {
                target: target.clone(),
                contents: contents.clone(),
            }
        }
    };

    let copy = Node::new(data);
    for child in node.children.borrow().iter() {
        append(&copy, deep_clone(child));
    }
    copy
}

/// Append a detached node to `parent`'s children.
pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Remove a node from its parent. The node (and its subtree) stays valid
/// for as long as the caller holds it.
pub fn detach(node: &Handle) {
    if let Some(parent) = parent(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
}

/// Replace `node` in its parent with `replacements`, in order.
///
/// Returns `false` (and leaves everything untouched) if `node` is detached.
pub fn replace_with(node: &Handle, replacements: Vec<Handle>) -> bool {
    let Some(parent) = parent(node) else {
        return false;
    };
    let Some(index) = parent
        .children
        .borrow()
        .iter()
        .position(|child| Rc::ptr_eq(child, node))
    else {
        return false;
    };

    for replacement in &replacements {
        detach(replacement);
        replacement.parent.set(Some(Rc::downgrade(&parent)));
    }
    let _replaced: Vec<Handle> = parent
        .children
        .borrow_mut()
        .splice(index..=index, replacements)
        .collect();
    node.parent.set(None);
    true
}

/// Detach and return all children of `node`.
pub fn take_children(node: &Handle) -> Vec<Handle> {
    let children = std::mem::take(&mut *node.children.borrow_mut());
    for child in &children {
        child.parent.set(None);
    }
    children
}

/// Concatenated text of all descendant text nodes.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

/// Replace all children of `node` with a single text node.
pub fn set_text_content(node: &Handle, text: &str) {
    take_children(node);
    if !text.is_empty() {
        append(node, text_node(text));
    }
}

/// Serialize the children of `node` to HTML.
pub fn inner_html(node: &Handle) -> io::Result<String> {
    serialize_node(node, false)
}

/// Replace all children of `node` with the parsed `markup`.
///
/// The markup is parsed with `node` as the fragment context, so content such
/// as `<tr>` inside a `<tbody>` or raw text inside `<script>` is handled the
/// way a browser would handle `innerHTML`.
pub fn set_inner_html(node: &Handle, markup: &str) {
    let context = match &node.data {
        NodeData::Element { name, .. } => name.clone(),
        _ => html_name("body"),
    };
    let fragment = parse_in_context(markup, context);
    take_children(node);
    for child in take_children(&fragment) {
        append(node, child);
    }
}

/// Serialize `node` to HTML.
///
/// With `include_node` the node's own tag is emitted; otherwise only its
/// children are.
pub fn serialize_node(node: &Handle, include_node: bool) -> io::Result<String> {
    let traversal_scope = if include_node {
        TraversalScope::IncludeNode
    } else {
        TraversalScope::ChildrenOnly(None)
    };
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };

    let mut bytes = Vec::new();
    serialize(&mut bytes, &SerializableHandle::from(node.clone()), opts)?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
