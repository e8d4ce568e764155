/*
 * marker.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Marker attributes and their lookup rules.
//!
//! A marker is any element with `data-ice="<id>"`. Once a sub-template has
//! been loaded into a marker, the marker carries `data-ice-loaded="1"` and
//! everything beneath it belongs to that sub-template: lookups never descend
//! into it again. The flag is bookkeeping only and is stripped whenever the
//! tree is serialized.

use crate::dom::{self, Handle};

/// Attribute designating a marker node.
pub const MARKER_ATTR: &str = "data-ice";

/// Attribute flagging a marker whose content was loaded from a sub-template.
pub const LOADED_ATTR: &str = "data-ice-loaded";

/// Markers with the given id among the descendants of `root`, in document
/// order, excluding any that sit inside a loaded region. The root itself is
/// never a match.
pub(crate) fn find_markers(root: &Handle, id: &str) -> Vec<Handle> {
    dom::find_by_attr(root, MARKER_ATTR, id)
        .into_iter()
        .filter(|node| !dom::has_ancestor_with_attr(node, LOADED_ATTR))
        .collect()
}

pub(crate) fn flag_loaded(node: &Handle) {
    dom::set_attr(node, LOADED_ATTR, "1");
}

/// Loaded flags temporarily removed from a tree.
///
/// The flags come back when this value is dropped, so the in-memory tree keeps
/// its exclusion regions even if serialization fails halfway.
pub(crate) struct StrippedFlags {
    nodes: Vec<(Handle, String)>,
}

impl StrippedFlags {
    pub(crate) fn strip(root: &Handle) -> Self {
        let nodes = std::iter::once(root.clone())
            .chain(dom::find_with_attr(root, LOADED_ATTR))
            .filter_map(|node| {
                let value = dom::remove_attr(&node, LOADED_ATTR)?;
                Some((node, value))
            })
            .collect();
        Self { nodes }
    }
}

impl Drop for StrippedFlags {
    fn drop(&mut self) {
        for (node, value) in &self.nodes {
            dom::set_attr(node, LOADED_ATTR, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_markers_skips_loaded_regions() {
        let root = dom::parse(concat!(
            r#"<div data-ice="slot" data-ice-loaded="1"><p data-ice="name">inner</p></div>"#,
            r#"<p data-ice="name">outer</p>"#,
        ));

        let found = find_markers(&root, "name");
        assert_eq!(found.len(), 1);
        assert_eq!(dom::text_content(&found[0]), "outer");

        // The loaded marker itself is still addressable
        assert_eq!(find_markers(&root, "slot").len(), 1);
    }

    #[test]
    fn test_find_markers_excludes_root() {
        let root = dom::parse(r#"<li data-ice="item">x</li>"#);
        let item = find_markers(&root, "item").remove(0);
        assert!(find_markers(&item, "item").is_empty());
    }

    #[test]
    fn test_stripped_flags_cover_root() {
        let root = dom::parse(r#"<div data-ice="a">x</div>"#);
        let a = find_markers(&root, "a").remove(0);
        flag_loaded(&a);

        {
            let _stripped = StrippedFlags::strip(&a);
            assert_eq!(
                dom::serialize_node(&a, true).unwrap(),
                r#"<div data-ice="a">x</div>"#
            );
        }
        assert_eq!(dom::get_attr(&a, LOADED_ATTR).as_deref(), Some("1"));
    }

    #[test]
    fn test_stripped_flags_restore_on_drop() {
        let root = dom::parse(r#"<div data-ice="a"></div><div data-ice="b"></div>"#);
        let a = find_markers(&root, "a").remove(0);
        flag_loaded(&a);

        {
            let _stripped = StrippedFlags::strip(&root);
            let html = dom::serialize_node(&root, false).unwrap();
            assert!(!html.contains(LOADED_ATTR));
        }

        assert_eq!(dom::get_attr(&a, LOADED_ATTR).as_deref(), Some("1"));
    }
}
