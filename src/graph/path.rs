//! Name resolution and BFS shortest-path queries over a built graph.

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::error::{NobelnetError, Result};
use crate::schema;

use super::{Graph, NodeId};

/// One step of a resolved path: the node reached and the relation label of
/// the edge it was reached through. The first step has no incoming relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeId,
    pub relation: Option<String>,
}

/// Resolve a free-text person name to a Person node.
///
/// Case-insensitive substring match over `Person` display names, first match
/// in node enumeration (insertion) order. Several people may match a short
/// query; the first enumerated one is returned.
pub fn find_person(graph: &Graph, query: &str) -> Result<NodeId> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(NobelnetError::InvalidInput(
            "person query must not be empty".to_string(),
        ));
    }

    graph
        .nodes()
        .find(|(_, node)| {
            node.label == schema::PERSON && node.name.to_lowercase().contains(&needle)
        })
        .map(|(id, _)| id)
        .ok_or_else(|| NobelnetError::PersonNotFound(query.to_string()))
}

/// Unweighted shortest path between two nodes.
///
/// Breadth-first search with predecessor links, terminating as soon as `to`
/// is dequeued; among equal-length paths the first one discovered in
/// neighbor insertion order is returned. `budget` caps the number of
/// dequeues; `None` runs to exhaustion.
pub fn shortest_path(
    graph: &Graph,
    from: NodeId,
    to: NodeId,
    budget: Option<usize>,
) -> Result<Vec<PathStep>> {
    if !graph.contains(from) {
        return Err(NobelnetError::MissingEndpoint(format!("node #{}", from)));
    }
    if !graph.contains(to) {
        return Err(NobelnetError::MissingEndpoint(format!("node #{}", to)));
    }

    if from == to {
        return Ok(vec![PathStep { node: from, relation: None }]);
    }

    let mut visited = vec![false; graph.node_count()];
    let mut predecessor: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    let mut queue = VecDeque::new();
    let mut steps = 0usize;

    visited[from] = true;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        steps += 1;
        if let Some(max) = budget {
            if steps > max {
                return Err(NobelnetError::BudgetExhausted(max));
            }
        }

        if current == to {
            return Ok(reconstruct(graph, &predecessor, from, to));
        }

        for &next in graph.neighbors(current) {
            if !visited[next] {
                visited[next] = true;
                predecessor[next] = Some(current);
                queue.push_back(next);
            }
        }
    }

    let describe = |id: NodeId| {
        graph
            .node(id)
            .map(|n| n.qualified_name())
            .unwrap_or_else(|| format!("node #{}", id))
    };
    Err(NobelnetError::NoPath {
        from: describe(from),
        to: describe(to),
    })
}

/// Walk predecessor links from `to` back to `from`, then reverse, attaching
/// the relation label of each traversed edge.
fn reconstruct(
    graph: &Graph,
    predecessor: &[Option<NodeId>],
    from: NodeId,
    to: NodeId,
) -> Vec<PathStep> {
    let mut ordered = vec![to];
    let mut current = to;
    while current != from {
        // Every dequeued node other than `from` has a predecessor.
        current = predecessor[current].expect("predecessor chain broken");
        ordered.push(current);
    }
    ordered.reverse();

    let mut steps = Vec::with_capacity(ordered.len());
    for (i, &node) in ordered.iter().enumerate() {
        let relation = if i == 0 {
            None
        } else {
            graph
                .relation_between(ordered[i - 1], node)
                .map(str::to_string)
        };
        steps.push(PathStep { node, relation });
    }
    steps
}

/// Render a path the way the query CLI reports it: numbered
/// `<label>:<name>` lines with the traversed relation between steps.
pub fn format_path(graph: &Graph, steps: &[PathStep]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Path length: {} steps", steps.len().saturating_sub(1));
    for (i, step) in steps.iter().enumerate() {
        let name = graph
            .node(step.node)
            .map(|n| n.qualified_name())
            .unwrap_or_else(|| format!("node #{}", step.node));
        let _ = writeln!(out, "  {}. {}", i + 1, name);
        if let Some(next) = steps.get(i + 1) {
            if let Some(relation) = &next.relation {
                let _ = writeln!(out, "     [{}]", relation);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::source::TripleRecord;

    fn triple(
        start_label: &str,
        start_name: &str,
        relation: &str,
        end_label: &str,
        end_name: &str,
    ) -> TripleRecord {
        TripleRecord::new(start_label, start_name, relation, end_label, end_name)
    }

    fn curie_graph() -> Graph {
        build_graph(&[
            triple("Person", "Marie Curie", "RECEIVED", "AwardStatement", "Q7186_1903"),
            triple("AwardStatement", "Q7186_1903", "IS_INSTANCE_OF", "Award", "Nobel Prize in Physics"),
            triple("Person", "Pierre Curie", "RECEIVED", "AwardStatement", "Q37463_1903"),
            triple("AwardStatement", "Q37463_1903", "IS_INSTANCE_OF", "Award", "Nobel Prize in Physics"),
            triple("Person", "Marie Curie", "IS_CITIZEN_OF", "Country", "France"),
            // Disconnected component
            triple("Person", "Lone Laureate", "WORKS_AS", "Occupation", "hermit"),
        ])
    }

    /// Independent distance computation to cross-check minimality.
    fn reference_distance(graph: &Graph, from: NodeId, to: NodeId) -> Option<usize> {
        let mut dist = vec![None; graph.node_count()];
        dist[from] = Some(0usize);
        let mut queue = std::collections::VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            for &nb in graph.neighbors(cur) {
                if dist[nb].is_none() {
                    dist[nb] = dist[cur].map(|d| d + 1);
                    queue.push_back(nb);
                }
            }
        }
        dist[to]
    }

    #[test]
    fn test_find_person_substring_case_insensitive() {
        let graph = curie_graph();
        let id = find_person(&graph, "curie").unwrap();
        // First match in insertion order is Marie
        assert_eq!(graph.node(id).unwrap().name, "Marie Curie");

        let pierre = find_person(&graph, "PIERRE").unwrap();
        assert_eq!(graph.node(pierre).unwrap().name, "Pierre Curie");
    }

    #[test]
    fn test_find_person_not_found() {
        let graph = curie_graph();
        let err = find_person(&graph, "zzz").unwrap_err();
        assert!(matches!(err, NobelnetError::PersonNotFound(_)));
    }

    #[test]
    fn test_find_person_ignores_non_person_nodes() {
        let graph = curie_graph();
        // "France" only exists as a Country node
        let err = find_person(&graph, "france").unwrap_err();
        assert!(matches!(err, NobelnetError::PersonNotFound(_)));
    }

    #[test]
    fn test_find_person_rejects_empty_query() {
        let graph = curie_graph();
        let err = find_person(&graph, "   ").unwrap_err();
        assert!(matches!(err, NobelnetError::InvalidInput(_)));
    }

    #[test]
    fn test_round_trip_scenario() {
        let graph = build_graph(&[
            triple("Person", "A", "RECEIVED", "AwardStatement", "A_1920"),
            triple("AwardStatement", "A_1920", "INSTANCE_OF", "Award", "Peace"),
        ]);
        let a = graph.lookup("Person", "A").unwrap();
        let peace = graph.lookup("Award", "Peace").unwrap();

        let path = shortest_path(&graph, a, peace, None).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].relation, None);
        assert_eq!(path[1].relation.as_deref(), Some("RECEIVED"));
        assert_eq!(path[2].relation.as_deref(), Some("INSTANCE_OF"));

        let names: Vec<_> = path
            .iter()
            .map(|s| graph.node(s.node).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["A", "A_1920", "Peace"]);
    }

    #[test]
    fn test_marie_to_pierre_via_award() {
        let graph = curie_graph();
        let marie = find_person(&graph, "marie").unwrap();
        let pierre = find_person(&graph, "pierre").unwrap();

        let path = shortest_path(&graph, marie, pierre, None).unwrap();
        // Marie -> Q7186_1903 -> Nobel Prize in Physics -> Q37463_1903 -> Pierre
        assert_eq!(path.len(), 5);
        assert_eq!(
            reference_distance(&graph, marie, pierre),
            Some(path.len() - 1)
        );
    }

    #[test]
    fn test_minimality_with_multiple_geodesics() {
        // Two equal-length routes from A to D; only the length is pinned.
        let graph = build_graph(&[
            triple("Person", "A", "EDUCATED_AT", "Organization", "B"),
            triple("Organization", "B", "EMPLOYED_BY", "Person", "D"),
            triple("Person", "A", "IS_MEMBER_OF", "Organization", "C"),
            triple("Organization", "C", "EMPLOYED_BY", "Person", "D"),
        ]);
        let a = graph.lookup("Person", "A").unwrap();
        let d = graph.lookup("Person", "D").unwrap();

        let path = shortest_path(&graph, a, d, None).unwrap();
        assert_eq!(path.len() - 1, reference_distance(&graph, a, d).unwrap());
    }

    #[test]
    fn test_disconnected_pair_no_path() {
        let graph = curie_graph();
        let marie = find_person(&graph, "marie").unwrap();
        let lone = find_person(&graph, "lone").unwrap();

        let err = shortest_path(&graph, marie, lone, None).unwrap_err();
        match err {
            NobelnetError::NoPath { from, to } => {
                assert_eq!(from, "Person:Marie Curie");
                assert_eq!(to, "Person:Lone Laureate");
            }
            other => panic!("expected NoPath, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_endpoint_is_an_error() {
        let graph = curie_graph();
        let marie = find_person(&graph, "marie").unwrap();
        let err = shortest_path(&graph, marie, graph.node_count() + 5, None).unwrap_err();
        assert!(matches!(err, NobelnetError::MissingEndpoint(_)));
    }

    #[test]
    fn test_same_endpoint_single_step_path() {
        let graph = curie_graph();
        let marie = find_person(&graph, "marie").unwrap();
        let path = shortest_path(&graph, marie, marie, None).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].node, marie);
        assert_eq!(path[0].relation, None);
    }

    #[test]
    fn test_budget_exhaustion() {
        let graph = curie_graph();
        let marie = find_person(&graph, "marie").unwrap();
        let pierre = find_person(&graph, "pierre").unwrap();

        let err = shortest_path(&graph, marie, pierre, Some(2)).unwrap_err();
        assert!(matches!(err, NobelnetError::BudgetExhausted(2)));

        // A generous budget still finds the path
        let path = shortest_path(&graph, marie, pierre, Some(1000)).unwrap();
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_format_path_report() {
        let graph = build_graph(&[
            triple("Person", "A", "RECEIVED", "AwardStatement", "A_1920"),
            triple("AwardStatement", "A_1920", "IS_INSTANCE_OF", "Award", "Peace"),
        ]);
        let a = graph.lookup("Person", "A").unwrap();
        let peace = graph.lookup("Award", "Peace").unwrap();
        let path = shortest_path(&graph, a, peace, None).unwrap();

        let report = format_path(&graph, &path);
        assert!(report.starts_with("Path length: 2 steps"));
        assert!(report.contains("  1. Person:A"));
        assert!(report.contains("     [RECEIVED]"));
        assert!(report.contains("  2. AwardStatement:A_1920"));
        assert!(report.contains("     [IS_INSTANCE_OF]"));
        assert!(report.contains("  3. Award:Peace"));
    }
}
