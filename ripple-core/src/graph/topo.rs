//! Topological Ordering
//!
//! Depth-first topological sort over a mapping from node to the nodes that
//! depend on it. A node is placed into the result only after everything
//! reachable from it, so dependencies always precede their dependents in the
//! returned order.
//!
//! # Algorithm
//!
//! For each key of the edge map, in insertion order, that has not been
//! visited yet:
//!
//! 1. Walk depth-first along the outgoing edges.
//! 2. Keep the current recursion path; meeting a node that is already on the
//!    path is a cycle, reported from its first occurrence.
//! 3. Once all of a node's dependents are processed, prepend the node to the
//!    result and mark it permanently visited.
//!
//! Independent components keep the relative order in which they were first
//! discovered. Beyond respecting edges, no other ordering is guaranteed.

use std::collections::{HashSet, VecDeque};
use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexMap;
use thiserror::Error;

/// Errors produced while resolving a dependency graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The graph contains a cycle. The path walks the cycle from the first
    /// repeated node back to itself, e.g. `b->a->b`.
    #[error("Cycle detected: {path}")]
    CycleDetected { path: String },
}

/// Topologically sort the nodes of `edges`.
///
/// `edges` maps each node to the nodes that depend on it and therefore must
/// come after it. The result contains every node that appears as a key or as
/// a value, dependencies first.
///
/// Fails with [`GraphError::CycleDetected`] when the edges loop back on
/// themselves.
pub fn sort<K>(edges: &IndexMap<K, Vec<K>>) -> Result<Vec<K>, GraphError>
where
    K: Clone + Eq + Hash + Display,
{
    let mut visited = HashSet::new();
    let mut order = VecDeque::new();
    let mut path = Vec::new();

    for node in edges.keys() {
        if !visited.contains(node) {
            // Fresh path per component so an unrelated component cannot
            // leak into this one's cycle report.
            path.clear();
            visit(node, edges, &mut visited, &mut path, &mut order)?;
        }
    }

    Ok(order.into())
}

fn visit<K>(
    node: &K,
    edges: &IndexMap<K, Vec<K>>,
    visited: &mut HashSet<K>,
    path: &mut Vec<K>,
    order: &mut VecDeque<K>,
) -> Result<(), GraphError>
where
    K: Clone + Eq + Hash + Display,
{
    visited.insert(node.clone());
    path.push(node.clone());

    if let Some(dependents) = edges.get(node) {
        for next in dependents {
            if let Some(start) = path.iter().position(|seen| seen == next) {
                return Err(GraphError::CycleDetected {
                    path: render_cycle(&path[start..], next),
                });
            }

            if !visited.contains(next) {
                visit(next, edges, visited, path, order)?;
            }
        }
    }

    path.pop();
    order.push_front(node.clone());

    Ok(())
}

/// Render `a->b->a` for the slice of the path starting at the repeated node.
fn render_cycle<K: Display>(path: &[K], repeat: &K) -> String {
    let mut rendered = String::new();

    for node in path {
        rendered.push_str(&node.to_string());
        rendered.push_str("->");
    }
    rendered.push_str(&repeat.to_string());

    rendered
}
