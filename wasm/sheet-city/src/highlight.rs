//! Hover state and the upstream walk used to emphasize arcs.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::dataset::Cell;
use crate::graph::{incoming, Connection};

/// What the pointer is over. Compared structurally: re-entering the same
/// tower yields an equal value even though it is a fresh allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HighlightState {
    #[default]
    None,
    Tower {
        name: String,
    },
    Arc {
        from: String,
        to: String,
    },
}

impl HighlightState {
    pub fn tower(name: impl Into<String>) -> Self {
        HighlightState::Tower { name: name.into() }
    }

    pub fn arc(from: impl Into<String>, to: impl Into<String>) -> Self {
        HighlightState::Arc {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, HighlightState::None)
    }

    pub fn hovered_tower(&self) -> Option<&str> {
        match self {
            HighlightState::Tower { name } => Some(name),
            _ => None,
        }
    }

    /// Edges feeding the hovered tower. Empty for any other state.
    pub fn upstream(&self, connections: &[Connection]) -> UpstreamPaths {
        match self {
            HighlightState::Tower { name } => find_upstream_paths(connections, name),
            _ => UpstreamPaths::default(),
        }
    }

    pub fn emphasizes(&self, connection: &Connection, upstream: &UpstreamPaths) -> bool {
        match self {
            HighlightState::None => false,
            HighlightState::Tower { .. } => {
                upstream.contains(&connection.from.name, &connection.to.name)
            }
            HighlightState::Arc { from, to } => connection.links(from, to),
        }
    }

    pub fn tooltip(&self, cells: &[Cell]) -> Option<String> {
        match self {
            HighlightState::None => None,
            HighlightState::Tower { name } => cells
                .iter()
                .find(|c| &c.name == name)
                .map(|c| format!("Cell: {}\n{}", c.name, c.value)),
            HighlightState::Arc { from, to } => Some(format!("Arc from {} to {}", from, to)),
        }
    }
}

/// Set of `(from, to)` edges on some path into a target, keyed by `to`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpstreamPaths {
    sources: HashMap<String, HashSet<String>>,
}

impl UpstreamPaths {
    fn insert(&mut self, from: &str, to: &str) -> bool {
        self.sources
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string())
    }

    pub fn contains(&self, from: &str, to: &str) -> bool {
        self.sources.get(to).map_or(false, |s| s.contains(from))
    }

    pub fn len(&self) -> usize {
        self.sources.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources
            .iter()
            .flat_map(|(to, froms)| froms.iter().map(move |f| (f.as_str(), to.as_str())))
    }
}

/// Every edge on any path that ends at `target`.
///
/// Formula cycles are possible, so each edge is expanded at most once.
pub fn find_upstream_paths(connections: &[Connection], target: &str) -> UpstreamPaths {
    let mut paths = UpstreamPaths::default();
    let mut stack = vec![target];

    while let Some(current) = stack.pop() {
        for c in incoming(connections, current) {
            if paths.insert(&c.from.name, &c.to.name) {
                stack.push(c.from.name.as_str());
            }
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;

    fn chain(links: &[(&str, &[&str])]) -> DependencyGraph {
        let cells: Vec<Cell> = links
            .iter()
            .enumerate()
            .map(|(i, (name, used_by))| {
                Cell::new(*name, i as u32, [i as f64 * 10.0, 0.0], 10.0, 10.0)
                    .with_used_by(used_by.iter().copied())
            })
            .collect();
        DependencyGraph::build(&cells)
    }

    #[test]
    fn test_transitive_upstream() {
        // A -> B -> D, C -> D, E -> F (unrelated)
        let graph = chain(&[
            ("A", &["B"]),
            ("B", &["D"]),
            ("C", &["D"]),
            ("D", &[]),
            ("E", &["F"]),
            ("F", &[]),
        ]);
        let paths = find_upstream_paths(graph.connections(), "D");
        assert_eq!(paths.len(), 3);
        assert!(paths.contains("A", "B"));
        assert!(paths.contains("B", "D"));
        assert!(paths.contains("C", "D"));
        assert!(!paths.contains("E", "F"));
    }

    #[test]
    fn test_leaf_has_no_upstream() {
        let graph = chain(&[("A", &["B"]), ("B", &[]), ("C", &[])]);
        assert!(find_upstream_paths(graph.connections(), "A").is_empty());
        assert!(find_upstream_paths(graph.connections(), "C").is_empty());
    }

    #[test]
    fn test_cycle_terminates_without_duplicates() {
        let graph = chain(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);
        let paths = find_upstream_paths(graph.connections(), "A");
        assert_eq!(paths.len(), 3);
        assert!(paths.contains("A", "B"));
        assert!(paths.contains("B", "C"));
        assert!(paths.contains("C", "A"));
    }

    #[test]
    fn test_self_reference_terminates() {
        let graph = chain(&[("A", &["A", "B"]), ("B", &[])]);
        let paths = find_upstream_paths(graph.connections(), "B");
        assert_eq!(paths.len(), 2);
        assert!(paths.contains("A", "A"));
    }

    #[test]
    fn test_emphasis_by_state() {
        let graph = chain(&[("A", &["B"]), ("B", &["C"]), ("C", &[]), ("X", &["Y"]), ("Y", &[])]);
        let conns = graph.connections();

        let tower = HighlightState::tower("C");
        let upstream = tower.upstream(conns);
        let emphasized: Vec<_> = conns
            .iter()
            .filter(|c| tower.emphasizes(c, &upstream))
            .map(|c| (c.from.name.as_str(), c.to.name.as_str()))
            .collect();
        assert_eq!(emphasized, vec![("A", "B"), ("B", "C")]);

        let arc = HighlightState::arc("X", "Y");
        let upstream = arc.upstream(conns);
        assert!(upstream.is_empty());
        assert_eq!(conns.iter().filter(|c| arc.emphasizes(c, &upstream)).count(), 1);

        let none = HighlightState::None;
        assert!(conns.iter().all(|c| !none.emphasizes(c, &UpstreamPaths::default())));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(HighlightState::tower("A1"), HighlightState::tower(String::from("A1")));
        assert_ne!(HighlightState::tower("A1"), HighlightState::tower("A2"));
        assert_ne!(HighlightState::arc("A1", "B1"), HighlightState::arc("B1", "A1"));
        assert_ne!(HighlightState::tower("A1"), HighlightState::None);
    }

    #[test]
    fn test_tooltip() {
        let cells = vec![Cell::new("Sheet0!B2", 1, [0.0, 0.0], 1.0, 1.0).with_value("42")];
        assert_eq!(
            HighlightState::tower("Sheet0!B2").tooltip(&cells).as_deref(),
            Some("Cell: Sheet0!B2\n42")
        );
        assert_eq!(
            HighlightState::arc("Sheet0!A1", "Sheet0!B2").tooltip(&cells).as_deref(),
            Some("Arc from Sheet0!A1 to Sheet0!B2")
        );
        assert_eq!(HighlightState::tower("nope").tooltip(&cells), None);
        assert_eq!(HighlightState::None.tooltip(&cells), None);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&HighlightState::arc("A", "B")).unwrap();
        assert_eq!(json, r#"{"kind":"arc","from":"A","to":"B"}"#);
        let back: HighlightState = serde_json::from_str(r#"{"kind":"none"}"#).unwrap();
        assert_eq!(back, HighlightState::None);
    }
}
