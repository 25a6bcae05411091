use crate::types::{TokenNode, TokenType, TokenValue};
use crate::walker::{join_path, TokenTree};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Default bound on alias chain length during resolution
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// A token registered in the graph under its `/`-joined logical path
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub path: String,
    pub token_type: TokenType,
    pub value: TokenValue,
    pub alias_target: Option<String>,
}

impl GraphNode {
    fn from_token(path: String, node: &TokenNode) -> Self {
        Self {
            path,
            token_type: node.token_type.clone(),
            value: node.value.clone(),
            alias_target: node.alias_target.clone(),
        }
    }
}

/// Alias graph over logical paths, built fresh for each generation run
#[derive(Debug, Clone, Default)]
pub struct TokenGraph {
    pub nodes: BTreeMap<String, GraphNode>,
    pub edges: BTreeMap<String, String>,
}

/// Every alias cycle found in a graph. Each cycle is closed: it ends with its start node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub has_cycles: bool,
    pub cycles: Vec<Vec<String>>,
}

impl CycleReport {
    /// Human-readable chains such as `a → b → c → a`
    pub fn chains(&self) -> Vec<String> {
        self.cycles.iter().map(|cycle| cycle.join(" → ")).collect()
    }

    /// Union of several reports. A cycle found in more than one graph, from any starting
    /// node, is kept once in its first-seen form.
    pub fn merged<I: IntoIterator<Item = CycleReport>>(reports: I) -> Self {
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut cycles = Vec::new();
        for report in reports {
            for cycle in report.cycles {
                if seen.insert(rotation_key(&cycle)) {
                    cycles.push(cycle);
                }
            }
        }
        Self {
            has_cycles: !cycles.is_empty(),
            cycles,
        }
    }
}

/// Open cycle rotated to start at its smallest node
fn rotation_key(cycle: &[String]) -> Vec<String> {
    let open = match cycle.split_last() {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => cycle,
    };
    let start = open
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    open[start..].iter().chain(&open[..start]).cloned().collect()
}

impl TokenGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unions the given trees. The first tree to define a path wins for both its
    /// node and its alias edge.
    pub fn build(trees: &[&TokenTree]) -> Self {
        let mut graph = Self::new();
        for tree in trees {
            graph.add_tree(tree);
        }
        debug!(
            "Built token graph with {} nodes and {} alias edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        graph
    }

    pub fn add_tree(&mut self, tree: &TokenTree) {
        tree.walk(|path, node| {
            let key = join_path(path);
            if let Some(target) = &node.alias_target {
                self.edges.entry(key.clone()).or_insert_with(|| target.clone());
            }
            self.nodes
                .entry(key.clone())
                .or_insert_with(|| GraphNode::from_token(key, node));
        });
    }

    /// Depth-first cycle search rooted at every unvisited edge source.
    pub fn detect_cycles(&self) -> CycleReport {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut cycles = Vec::new();

        for start in self.edges.keys() {
            if visited.contains(start.as_str()) {
                continue;
            }
            let mut stack: Vec<&str> = Vec::new();
            let mut on_stack: HashMap<&str, usize> = HashMap::new();
            let mut current = start.as_str();

            loop {
                if let Some(&index) = on_stack.get(current) {
                    let mut cycle: Vec<String> =
                        stack[index..].iter().map(|s| s.to_string()).collect();
                    cycle.push(current.to_string());
                    cycles.push(cycle);
                    break;
                }
                if !visited.insert(current) {
                    break;
                }
                on_stack.insert(current, stack.len());
                stack.push(current);
                match self.edges.get(current) {
                    Some(next) => current = next.as_str(),
                    None => break,
                }
            }
        }

        if !cycles.is_empty() {
            debug!("Detected {} alias cycle(s)", cycles.len());
        }
        CycleReport {
            has_cycles: !cycles.is_empty(),
            cycles,
        }
    }

    /// Path at the end of the alias chain starting at `path`. The terminal path need
    /// not be registered as a node (aliases into a collection that was not supplied).
    /// `None` on a cycle or when the chain is longer than `max_depth`.
    pub fn resolve_terminal_path(&self, path: &str, max_depth: usize) -> Option<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut current = path;
        let mut hops = 0;
        while let Some(next) = self.edges.get(current) {
            if !seen.insert(current) {
                return None;
            }
            hops += 1;
            if hops > max_depth {
                return None;
            }
            current = next.as_str();
        }
        Some(current.to_string())
    }

    /// Terminal node of the alias chain starting at `path`, if it is registered.
    pub fn resolve_token(&self, path: &str, max_depth: usize) -> Option<&GraphNode> {
        let terminal = self.resolve_terminal_path(path, max_depth)?;
        self.nodes.get(&terminal)
    }

    /// Alias chain starting at `path`, stopping before the first repeated node
    pub fn chain_from(&self, path: &str, max_depth: usize) -> Vec<String> {
        let mut chain = vec![path.to_string()];
        let mut seen: HashSet<&str> = HashSet::from([path]);
        let mut current = path;
        while let Some(next) = self.edges.get(current) {
            if chain.len() > max_depth || !seen.insert(next.as_str()) {
                break;
            }
            chain.push(next.clone());
            current = next.as_str();
        }
        chain
    }
}
