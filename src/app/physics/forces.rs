use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

const SOFTENING: f32 = 100.0;

fn repulsion_between(point: Vec2, other: Vec2, strength: f32) -> Vec2 {
    let delta = point - other;
    let distance_sq = delta.length_sq();
    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        vec2(1.0, 0.0)
    };
    direction * (strength / (distance_sq + SOFTENING))
}

/// Many-body repulsion for one node, walking the quadtree and collapsing
/// far-away cells into their aggregate mass (Barnes-Hut).
pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index != index {
                *force += repulsion_between(point, positions[other_index], strength);
            }
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let can_approximate = !node.bounds.contains(point)
        && ((node.bounds.side_length() / distance) < theta)
        && node.mass > 1.0;

    if can_approximate {
        let direction = delta / distance;
        *force += direction * ((strength * node.mass) / (distance_sq + SOFTENING));
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, strength, theta, force);
    }
}

/// Spring attraction along links toward the preferred edge length. Strength
/// is scaled by the inverse of the smaller endpoint degree so hub nodes are
/// not crushed into their neighbors, and split across the endpoints biased
/// toward the less connected one.
pub(super) fn accumulate_link_force(
    source: usize,
    target: usize,
    positions: &[Vec2],
    degrees: &[usize],
    link_distance: f32,
    forces: &mut [Vec2],
) {
    if source == target {
        return;
    }

    let delta = positions[target] - positions[source];
    let distance_sq = delta.length_sq();
    if distance_sq <= 0.0001 * 0.0001 {
        return;
    }
    let distance = distance_sq.sqrt();
    let direction = delta / distance;

    let source_degree = degrees[source].max(1) as f32;
    let target_degree = degrees[target].max(1) as f32;
    let strength = 1.0 / source_degree.min(target_degree);
    let spring = (distance - link_distance) * strength;
    let bias = source_degree / (source_degree + target_degree);

    forces[source] += direction * (spring * (1.0 - bias));
    forces[target] -= direction * (spring * bias);
}

/// Gentle pull of every node toward the canvas center, keeping disconnected
/// components from drifting off screen.
pub(super) fn accumulate_center_pull(
    positions: &[Vec2],
    center: Vec2,
    strength: f32,
    forces: &mut [Vec2],
) {
    for (position, force) in positions.iter().zip(forces.iter_mut()) {
        *force -= (*position - center) * strength;
    }
}
