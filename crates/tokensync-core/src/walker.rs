use crate::types::{TokenNode, TokenType};
use serde_json::Value;
use std::collections::BTreeMap;
use tokensync_common::{Result, TokenSyncError};
use tracing::debug;

/// A node in a token tree: either a group of named children or a typed leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Group(TokenGroup),
    Leaf(TokenNode),
}

/// Ordered children of a group. Key order follows the source document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenGroup {
    pub children: Vec<(String, TreeNode)>,
}

impl TokenGroup {
    pub fn get(&self, key: &str) -> Option<&TreeNode> {
        self.children
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }
}

/// Counter of leaves whose type fell outside the canonical vocabulary
pub type UnknownTypeCounts = BTreeMap<String, usize>;

/// Typed view over one canonical token document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenTree {
    pub root: TokenGroup,
    /// Leaves dropped while parsing because they had no usable shape
    pub skipped: usize,
}

impl TokenTree {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a canonical tree. Fails only when the document is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = value.as_object().ok_or_else(|| {
            TokenSyncError::InvalidInput(format!(
                "token tree must be a JSON object, got {}",
                json_kind(value)
            ))
        })?;
        let mut skipped = 0;
        let root = parse_group(obj, &mut skipped);
        if skipped > 0 {
            debug!("Skipped {} malformed token leaves while parsing", skipped);
        }
        Ok(Self { root, skipped })
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// Visits every leaf in document order with its logical path.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&[String], &TokenNode),
    {
        let mut path = Vec::new();
        walk_group(&self.root, &mut path, &mut visit);
    }

    /// Like [`walk`](Self::walk), additionally counting leaves with an unknown type.
    pub fn walk_with_unknown<F>(&self, mut visit: F, unknown: &mut UnknownTypeCounts)
    where
        F: FnMut(&[String], &TokenNode),
    {
        self.walk(|path, node| {
            if let TokenType::Unknown(name) = &node.token_type {
                *unknown.entry(name.clone()).or_insert(0) += 1;
            }
            visit(path, node);
        });
    }

    /// All leaves as `(path, node)` pairs in document order
    pub fn leaves(&self) -> Vec<(Vec<String>, &TokenNode)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        collect_leaves(&self.root, &mut path, &mut out);
        out
    }

    /// Leaf at an exact path, or `None` when the path is missing or names a group.
    pub fn node_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&TokenNode> {
        let mut current = &self.root;
        let (last, parents) = path.split_last()?;
        for segment in parents {
            match current.get(segment.as_ref())? {
                TreeNode::Group(group) => current = group,
                TreeNode::Leaf(_) => return None,
            }
        }
        match current.get(last.as_ref())? {
            TreeNode::Leaf(node) => Some(node),
            TreeNode::Group(_) => None,
        }
    }

    /// Leaf at a `/`-joined path
    pub fn node_at_joined(&self, joined: &str) -> Option<&TokenNode> {
        let segments: Vec<&str> = joined.split('/').collect();
        self.node_at(&segments)
    }

    /// Group at an exact path (the empty path is the root)
    pub fn group_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&TokenGroup> {
        let mut current = &self.root;
        for segment in path {
            match current.get(segment.as_ref())? {
                TreeNode::Group(group) => current = group,
                TreeNode::Leaf(_) => return None,
            }
        }
        Some(current)
    }

    /// Paths of groups with no leaves beneath them
    pub fn empty_groups(&self) -> Vec<Vec<String>> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        find_empty_groups(&self.root, &mut path, &mut out);
        out
    }
}

pub fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("/")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_group(obj: &serde_json::Map<String, Value>, skipped: &mut usize) -> TokenGroup {
    let mut children = Vec::new();
    for (key, child) in obj {
        if key.starts_with('$') {
            continue;
        }
        let Some(child_obj) = child.as_object() else {
            *skipped += 1;
            continue;
        };
        // A string `$type` marks a terminal leaf; its children are never visited.
        if child_obj.get("$type").is_some_and(Value::is_string) {
            match TokenNode::from_json(child_obj) {
                Some(node) => children.push((key.clone(), TreeNode::Leaf(node))),
                None => *skipped += 1,
            }
        } else {
            children.push((key.clone(), TreeNode::Group(parse_group(child_obj, skipped))));
        }
    }
    TokenGroup { children }
}

fn walk_group<F>(group: &TokenGroup, path: &mut Vec<String>, visit: &mut F)
where
    F: FnMut(&[String], &TokenNode),
{
    for (key, child) in &group.children {
        path.push(key.clone());
        match child {
            TreeNode::Leaf(node) => visit(path, node),
            TreeNode::Group(inner) => walk_group(inner, path, visit),
        }
        path.pop();
    }
}

fn collect_leaves<'a>(
    group: &'a TokenGroup,
    path: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a TokenNode)>,
) {
    for (key, child) in &group.children {
        path.push(key.clone());
        match child {
            TreeNode::Leaf(node) => out.push((path.clone(), node)),
            TreeNode::Group(inner) => collect_leaves(inner, path, out),
        }
        path.pop();
    }
}

fn find_empty_groups(group: &TokenGroup, path: &mut Vec<String>, out: &mut Vec<Vec<String>>) -> bool {
    let mut has_leaf = false;
    for (key, child) in &group.children {
        path.push(key.clone());
        match child {
            TreeNode::Leaf(_) => has_leaf = true,
            TreeNode::Group(inner) => {
                if find_empty_groups(inner, path, out) {
                    has_leaf = true;
                } else {
                    out.push(path.clone());
                }
            }
        }
        path.pop();
    }
    has_leaf
}
