use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::graph::KnowledgeGraph;
use crate::util::spiral_offset;

use super::super::{
    Canvas, LayoutGraph, PhysicsScratch, Pin, SimLink, SimNode, ViewScratch,
};

/// Builds the layout arena from a loaded document. The document is read-only
/// here; positions and pin state live entirely in the arena. Links whose
/// source or target id matches no node are dropped (and counted), never
/// fatal. Returns the arena and the number of dropped links.
pub(in crate::app) fn build_layout(document: &KnowledgeGraph, canvas: Canvas) -> (LayoutGraph, usize) {
    let center = canvas.center();

    let mut index_by_id = HashMap::with_capacity(document.nodes.len());
    let nodes = document
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            index_by_id.insert(node.id.clone(), index);
            let (dx, dy) = spiral_offset(index);
            SimNode {
                id: node.id.clone(),
                title: node.title.clone(),
                published_date: node.published_date.clone(),
                position: center + vec2(dx, dy),
                velocity: Vec2::ZERO,
                pin: Pin::Free,
            }
        })
        .collect::<Vec<_>>();

    let mut links = Vec::with_capacity(document.links.len());
    let mut dropped = 0usize;
    for link in &document.links {
        match (index_by_id.get(&link.source), index_by_id.get(&link.target)) {
            (Some(&source), Some(&target)) => links.push(SimLink {
                source,
                target,
                value: link.value,
            }),
            _ => {
                tracing::warn!(
                    source = %link.source,
                    target = %link.target,
                    "dropping link with unknown endpoint"
                );
                dropped += 1;
            }
        }
    }

    let mut adjacency = vec![Vec::new(); nodes.len()];
    for link in &links {
        if link.source == link.target {
            continue;
        }
        adjacency[link.source].push((link.target, link.value));
        adjacency[link.target].push((link.source, link.value));
    }

    let layout = LayoutGraph {
        nodes,
        links,
        index_by_id,
        adjacency,
        alpha: 1.0,
        scratch: PhysicsScratch {
            forces: Vec::new(),
            positions: Vec::new(),
            degrees: Vec::new(),
        },
        view_scratch: ViewScratch {
            screen_positions: Vec::new(),
            visible_indices: Vec::new(),
        },
    };

    (layout, dropped)
}

impl LayoutGraph {
    pub(in crate::app) fn pinned_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.pin.is_pinned()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphLink, GraphNode};

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.to_owned(),
            title: format!("Title {id}"),
            published_date: "2023-01-01".to_owned(),
        }
    }

    fn link(source: &str, target: &str, value: f32) -> GraphLink {
        GraphLink {
            source: source.to_owned(),
            target: target.to_owned(),
            value,
        }
    }

    fn canvas() -> Canvas {
        Canvas {
            width: 2048.0,
            height: 1024.0,
        }
    }

    fn three_node_document() -> KnowledgeGraph {
        KnowledgeGraph {
            nodes: vec![node("a"), node("b"), node("c")],
            links: vec![
                link("a", "b", 0.1),
                link("a", "c", 0.5),
                link("b", "a", 0.1),
            ],
        }
    }

    #[test]
    fn every_node_starts_free_at_a_distinct_position() {
        let (layout, dropped) = build_layout(&three_node_document(), canvas());
        assert_eq!(dropped, 0);
        assert_eq!(layout.nodes.len(), 3);
        assert!(layout.nodes.iter().all(|n| n.pin == Pin::Free));
        assert!(layout.nodes.iter().all(|n| n.velocity == Vec2::ZERO));
        assert_ne!(layout.nodes[0].position, layout.nodes[1].position);
        assert_ne!(layout.nodes[1].position, layout.nodes[2].position);
    }

    #[test]
    fn links_bind_to_arena_indices() {
        let (layout, _) = build_layout(&three_node_document(), canvas());
        assert_eq!(layout.links.len(), 3);
        assert_eq!(layout.links[0].source, 0);
        assert_eq!(layout.links[0].target, 1);
        assert_eq!(layout.links[0].value, 0.1);
        // Reciprocal a<->b links stay separate.
        assert_eq!(layout.links[2].source, 1);
        assert_eq!(layout.links[2].target, 0);
    }

    #[test]
    fn links_with_unknown_endpoints_are_dropped_not_fatal() {
        let mut document = three_node_document();
        document.links.push(link("a", "missing", 0.9));
        document.links.push(link("ghost", "b", 0.9));

        let (layout, dropped) = build_layout(&document, canvas());
        assert_eq!(dropped, 2);
        assert_eq!(layout.links.len(), 3);
    }

    #[test]
    fn empty_document_builds_an_empty_layout() {
        let (layout, dropped) = build_layout(&KnowledgeGraph::default(), canvas());
        assert_eq!(dropped, 0);
        assert!(layout.nodes.is_empty());
        assert!(layout.links.is_empty());
    }

    #[test]
    fn layout_mutation_never_touches_the_document() {
        let document = three_node_document();
        let snapshot = document.clone();

        let (mut layout, _) = build_layout(&document, canvas());
        for node in &mut layout.nodes {
            node.position += vec2(100.0, -50.0);
            node.pin = Pin::Pinned(node.position);
        }

        assert_eq!(document, snapshot);

        // A rebuild from the same document yields identical starting state.
        let (fresh, _) = build_layout(&document, canvas());
        assert!(fresh.nodes.iter().all(|n| n.pin == Pin::Free));
        assert_eq!(fresh.nodes[0].position, canvas().center() + {
            let (dx, dy) = crate::util::spiral_offset(0);
            vec2(dx, dy)
        });
    }

    #[test]
    fn adjacency_is_undirected_with_distances() {
        let (layout, _) = build_layout(&three_node_document(), canvas());
        // "a" links out to b and c, and b links back: a sees b twice.
        assert_eq!(layout.adjacency[0].len(), 3);
        assert!(layout.adjacency[2].contains(&(0, 0.5)));
    }
}
