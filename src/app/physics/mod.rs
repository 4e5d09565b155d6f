mod forces;
mod quadtree;

use eframe::egui::Vec2;

use super::{Canvas, LayoutGraph, Pin, SimConfig};
use forces::{accumulate_center_pull, accumulate_link_force, accumulate_repulsion_for_node};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.8;

/// One simulation step: decay alpha, accumulate repulsion, link and
/// centering forces, then integrate free nodes while holding pinned nodes
/// exactly at their pin point. Returns whether the simulation is still hot;
/// once alpha has decayed below `alpha_min` the step is a no-op until the
/// layout is reheated by an interaction.
pub(in crate::app) fn step_simulation(
    layout: &mut LayoutGraph,
    canvas: Canvas,
    config: SimConfig,
) -> bool {
    if layout.nodes.is_empty() || layout.alpha < config.alpha_min {
        return false;
    }

    layout.alpha += (0.0 - layout.alpha) * config.alpha_decay;

    let node_count = layout.nodes.len();
    let scratch = &mut layout.scratch;
    scratch.forces.resize(node_count, Vec2::ZERO);
    scratch.forces.fill(Vec2::ZERO);
    scratch.positions.clear();
    scratch.degrees.clear();
    for (node, adjacency) in layout.nodes.iter().zip(layout.adjacency.iter()) {
        scratch.positions.push(node.position);
        scratch.degrees.push(adjacency.len());
    }

    let forces = &mut scratch.forces;
    let positions = &scratch.positions;
    let degrees = &scratch.degrees;

    if node_count > 1
        && let Some(quadtree) = QuadNode::build(positions)
    {
        for (index, force) in forces.iter_mut().enumerate() {
            accumulate_repulsion_for_node(
                &quadtree,
                index,
                positions,
                config.repulsion,
                BARNES_HUT_THETA,
                force,
            );
        }
    }

    for link in &layout.links {
        accumulate_link_force(
            link.source,
            link.target,
            positions,
            degrees,
            config.link_distance,
            forces,
        );
    }

    accumulate_center_pull(positions, canvas.center(), config.center_pull, forces);

    let alpha = layout.alpha;
    for (node, force) in layout.nodes.iter_mut().zip(forces.iter()) {
        match node.pin {
            Pin::Pinned(point) => {
                node.position = point;
                node.velocity = Vec2::ZERO;
            }
            Pin::Free => {
                let velocity = (node.velocity + (*force * alpha)) * config.velocity_decay;
                node.velocity = velocity;
                node.position += velocity;
            }
        }
    }

    layout.alpha >= config.alpha_min
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::super::graph::build_layout;
    use super::*;
    use crate::graph::{GraphLink, GraphNode, KnowledgeGraph};

    fn canvas() -> Canvas {
        Canvas {
            width: 2048.0,
            height: 1024.0,
        }
    }

    fn document(node_ids: &[&str], links: &[(&str, &str, f32)]) -> KnowledgeGraph {
        KnowledgeGraph {
            nodes: node_ids
                .iter()
                .map(|id| GraphNode {
                    id: (*id).to_owned(),
                    title: format!("Title {id}"),
                    published_date: "2023-01-01".to_owned(),
                })
                .collect(),
            links: links
                .iter()
                .map(|(source, target, value)| GraphLink {
                    source: (*source).to_owned(),
                    target: (*target).to_owned(),
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_layout_is_immediately_settled() {
        let (mut layout, _) = build_layout(&KnowledgeGraph::default(), canvas());
        assert!(!step_simulation(&mut layout, canvas(), SimConfig::default()));
    }

    #[test]
    fn simulation_settles_below_alpha_min_and_stops_moving() {
        let doc = document(
            &["a", "b", "c"],
            &[("a", "b", 0.1), ("b", "c", 0.3), ("c", "a", 0.5)],
        );
        let (mut layout, _) = build_layout(&doc, canvas());
        let config = SimConfig::default();

        let mut steps = 0;
        while step_simulation(&mut layout, canvas(), config) {
            steps += 1;
            assert!(steps < 2000, "simulation failed to settle");
        }
        assert!(layout.alpha < config.alpha_min);

        // Settled steps are no-ops: positions stay put.
        let frozen = layout.nodes.iter().map(|n| n.position).collect::<Vec<_>>();
        assert!(!step_simulation(&mut layout, canvas(), config));
        let after = layout.nodes.iter().map(|n| n.position).collect::<Vec<_>>();
        assert_eq!(frozen, after);
    }

    #[test]
    fn reheating_resumes_a_settled_simulation() {
        let doc = document(&["a", "b"], &[("a", "b", 0.2)]);
        let (mut layout, _) = build_layout(&doc, canvas());
        let config = SimConfig::default();

        while step_simulation(&mut layout, canvas(), config) {}
        assert!(!step_simulation(&mut layout, canvas(), config));

        layout.alpha = 1.0;
        assert!(step_simulation(&mut layout, canvas(), config));
    }

    #[test]
    fn pinned_node_is_held_exactly_while_free_nodes_move() {
        let doc = document(&["a", "b"], &[("a", "b", 0.2)]);
        let (mut layout, _) = build_layout(&doc, canvas());
        let pin_point = vec2(100.0, 100.0);
        layout.nodes[0].pin = Pin::Pinned(pin_point);

        let free_start = layout.nodes[1].position;
        for _ in 0..50 {
            step_simulation(&mut layout, canvas(), SimConfig::default());
        }

        assert_eq!(layout.nodes[0].position, pin_point);
        assert_eq!(layout.nodes[0].velocity, eframe::egui::Vec2::ZERO);
        assert_ne!(layout.nodes[1].position, free_start);
    }

    #[test]
    fn connected_nodes_end_up_closer_than_unconnected_ones() {
        // a-b are linked; c floats free. After settling, the linked pair
        // should sit closer together than either sits to c.
        let doc = document(&["a", "b", "c"], &[("a", "b", 0.1), ("b", "a", 0.1)]);
        let (mut layout, _) = build_layout(&doc, canvas());
        let config = SimConfig::default();
        while step_simulation(&mut layout, canvas(), config) {}

        let ab = (layout.nodes[0].position - layout.nodes[1].position).length();
        let ac = (layout.nodes[0].position - layout.nodes[2].position).length();
        let bc = (layout.nodes[1].position - layout.nodes[2].position).length();
        assert!(ab < ac);
        assert!(ab < bc);
    }
}
