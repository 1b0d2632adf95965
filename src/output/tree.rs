//! Site tree construction and rendering
//!
//! The crawler produces a flat list of page records, each pointing at the page
//! it was discovered from. This module turns that list into a forest and
//! renders it for the tree report.
//!
//! A tree is as deep as the crawl depth allows, so building, rendering and
//! dropping it all walk explicit stacks instead of recursing per level.

use crate::config::TreeFormat;
use crate::state::PageRecord;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::collections::{HashMap, HashSet};
use std::io;

/// A page in the site tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: u32,
    pub title: String,
    pub url: String,
    pub children: Vec<TreeNode>,
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Builds the site tree from page records
///
/// Records without a parent, or whose parent is not among `records`, become
/// roots. Siblings keep the order of `records`, so a single-seed crawl yields
/// one root with children in discovery order.
pub fn build_tree(records: &[PageRecord]) -> Vec<TreeNode> {
    let known: HashSet<u32> = records.iter().map(|r| r.id).collect();

    let mut children: HashMap<Option<u32>, Vec<&PageRecord>> = HashMap::new();
    for record in records {
        let parent = record
            .parent_id
            .filter(|parent| *parent != record.id && known.contains(parent));
        children.entry(parent).or_default().push(record);
    }

    // Pre-order from the roots: every record comes after its parent
    let mut order = Vec::with_capacity(records.len());
    let mut stack = Vec::new();
    push_records(&mut stack, &mut children, None);
    while let Some((record, parent)) = stack.pop() {
        order.push((record, parent));
        push_records(&mut stack, &mut children, Some(record.id));
    }

    // Walking it backwards, a record's subtree is complete when it is reached.
    // Siblings arrive last to first.
    let mut built: HashMap<Option<u32>, Vec<TreeNode>> = HashMap::new();
    for (record, parent) in order.into_iter().rev() {
        let mut subtree = built.remove(&Some(record.id)).unwrap_or_default();
        subtree.reverse();
        built.entry(parent).or_default().push(TreeNode {
            id: record.id,
            title: record.title.clone(),
            url: record.url.clone(),
            children: subtree,
        });
    }

    let mut forest = built.remove(&None).unwrap_or_default();
    forest.reverse();
    forest
}

fn push_records<'a>(
    stack: &mut Vec<(&'a PageRecord, Option<u32>)>,
    children: &mut HashMap<Option<u32>, Vec<&'a PageRecord>>,
    parent: Option<u32>,
) {
    if let Some(records) = children.remove(&parent) {
        stack.extend(records.into_iter().rev().map(|record| (record, parent)));
    }
}

/// Renders a forest in the requested format
pub fn render_tree(forest: &[TreeNode], format: TreeFormat) -> Result<String, serde_json::Error> {
    match format {
        TreeFormat::Text => Ok(render_text(forest)),
        TreeFormat::Json => render_json(forest, PrettyFormatter::new()),
    }
}

/// Renders a forest as indented text
///
/// ```text
/// Home
/// ├── About
/// │   └── Team
/// └── Blog
/// ```
pub fn render_text(forest: &[TreeNode]) -> String {
    let mut out = String::new();
    let mut stack = Vec::new();

    for root in forest {
        out.push_str(&root.title);
        out.push('\n');
        push_branches(&mut stack, &root.children, "");

        while let Some((node, prefix, last)) = stack.pop() {
            out.push_str(&prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&node.title);
            out.push('\n');

            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            push_branches(&mut stack, &node.children, &child_prefix);
        }
    }
    out
}

fn push_branches<'a>(
    stack: &mut Vec<(&'a TreeNode, String, bool)>,
    nodes: &'a [TreeNode],
    prefix: &str,
) {
    for (i, node) in nodes.iter().enumerate().rev() {
        stack.push((node, prefix.to_string(), i + 1 == nodes.len()));
    }
}

enum JsonStep<'a> {
    Node { node: &'a TreeNode, first: bool },
    CloseChildren,
}

/// Renders a forest as a JSON array of `{id, title, url, children}` objects
///
/// `children` is left out for leaves.
fn render_json<F: Formatter>(
    forest: &[TreeNode],
    mut formatter: F,
) -> Result<String, serde_json::Error> {
    let bytes = write_json(forest, &mut formatter).map_err(serde_json::Error::io)?;
    String::from_utf8(bytes)
        .map_err(|e| serde_json::Error::io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn write_json<F: Formatter>(forest: &[TreeNode], formatter: &mut F) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut steps = Vec::new();
    push_json_nodes(&mut steps, forest);

    formatter.begin_array(&mut out)?;
    while let Some(step) = steps.pop() {
        match step {
            JsonStep::Node { node, first } => {
                formatter.begin_array_value(&mut out, first)?;
                formatter.begin_object(&mut out)?;
                write_field(formatter, &mut out, "id", &node.id, true)?;
                write_field(formatter, &mut out, "title", &node.title, false)?;
                write_field(formatter, &mut out, "url", &node.url, false)?;

                if node.children.is_empty() {
                    formatter.end_object(&mut out)?;
                    formatter.end_array_value(&mut out)?;
                } else {
                    write_key(formatter, &mut out, "children", false)?;
                    formatter.begin_array(&mut out)?;
                    steps.push(JsonStep::CloseChildren);
                    push_json_nodes(&mut steps, &node.children);
                }
            }
            JsonStep::CloseChildren => {
                formatter.end_array(&mut out)?;
                formatter.end_object_value(&mut out)?;
                formatter.end_object(&mut out)?;
                formatter.end_array_value(&mut out)?;
            }
        }
    }
    formatter.end_array(&mut out)?;

    Ok(out)
}

fn push_json_nodes<'a>(steps: &mut Vec<JsonStep<'a>>, nodes: &'a [TreeNode]) {
    for (i, node) in nodes.iter().enumerate().rev() {
        steps.push(JsonStep::Node {
            node,
            first: i == 0,
        });
    }
}

fn write_key<F: Formatter>(
    formatter: &mut F,
    out: &mut Vec<u8>,
    key: &str,
    first: bool,
) -> io::Result<()> {
    formatter.begin_object_key(out, first)?;
    serde_json::to_writer(&mut *out, key)?;
    formatter.end_object_key(out)?;
    formatter.begin_object_value(out)
}

fn write_field<F: Formatter, T: Serialize + ?Sized>(
    formatter: &mut F,
    out: &mut Vec<u8>,
    key: &str,
    value: &T,
    first: bool,
) -> io::Result<()> {
    write_key(formatter, out, key, first)?;
    serde_json::to_writer(&mut *out, value)?;
    formatter.end_object_value(out)
}
