use eframe::egui::{Vec2, vec2};

use super::SimulationParams;
use super::quadtree::QuadNode;
use super::store::{LAYOUT_CENTER, NodeStore};

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) padding: f32,
    pub(super) repulsion_gain: f32,
    pub(super) max_collision_distance_sq: f32,
}

impl CollisionParams {
    pub(super) fn new(params: &SimulationParams, radii: &[f32]) -> Self {
        let max_radius = radii.iter().copied().fold(0.0_f32, f32::max);
        let max_collision_distance = (max_radius * 2.0) + params.collision_padding;
        Self {
            padding: params.collision_padding,
            repulsion_gain: params.repulsion_gain,
            max_collision_distance_sq: max_collision_distance * max_collision_distance,
        }
    }
}

fn fallback_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Pulls every free node toward its initiator, or the layout center when the
/// initiator is unknown. No pull once inside the ideal distance.
pub(super) fn accumulate_attraction(
    store: &NodeStore,
    positions: &[Vec2],
    params: &SimulationParams,
    deltas: &mut [Vec2],
) {
    for (index, node) in store.nodes().iter().enumerate() {
        if node.pinned {
            continue;
        }

        let target = store
            .initiator_of(index)
            .map(|parent| positions[parent])
            .unwrap_or(LAYOUT_CENTER);
        let delta = target - positions[index];
        let mut distance = delta.length();
        if distance == 0.0 {
            distance = 1.0;
        }

        let ideal_distance = params.ideal_distance_base + node.radius;
        if distance > ideal_distance {
            deltas[index] += (delta / distance) * params.attraction_strength;
        }
    }
}

fn push_apart(
    from: usize,
    to: usize,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    let min_distance = radii[from] + radii[to] + params.padding;
    let delta = positions[from] - positions[to];
    let distance = delta.length();
    if distance >= min_distance {
        return;
    }

    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        fallback_direction(from, to)
    };
    let overlap = (min_distance - distance) / min_distance;
    let push = direction * (overlap * params.repulsion_gain);
    deltas[from] += push;
    deltas[to] -= push;
}

pub(super) fn accumulate_collisions(
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    for from in 0..positions.len() {
        for to in (from + 1)..positions.len() {
            push_apart(from, to, positions, radii, params, deltas);
        }
    }
}

/// Same result as [`accumulate_collisions`], visiting only quadtree cell
/// pairs that are close enough to hold an overlapping pair.
pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    deltas: &mut [Vec2],
) {
    if node_a.bounds.distance_sq_to(node_b.bounds) > params.max_collision_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[(offset + 1)..] {
                    push_apart(from, to, positions, radii, params, deltas);
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    push_apart(from, to, positions, radii, params, deltas);
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_deref() else {
                continue;
            };

            accumulate_collision_pairs(child_a, child_a, true, positions, radii, params, deltas);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_deref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a, child_b, false, positions, radii, params, deltas,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(child, node_b, false, positions, radii, params, deltas);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(node_a, child, false, positions, radii, params, deltas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::physics::store::fixtures::{record, store_from};
    use crate::resources::ResourceKind;

    fn params() -> SimulationParams {
        SimulationParams::default()
    }

    #[test]
    fn attraction_only_outside_ideal_distance() {
        let mut store = store_from(
            vec![
                record("root", ResourceKind::Html, 0, None),
                record("near", ResourceKind::Js, 0, Some("root")),
                record("far", ResourceKind::Js, 0, Some("root")),
            ],
            4,
        );
        store.place(1, LAYOUT_CENTER + vec2(50.0, 0.0));
        store.place(2, LAYOUT_CENTER + vec2(0.0, 300.0));

        let positions = store.bodies().iter().map(|body| body.position).collect::<Vec<_>>();
        let mut deltas = vec![Vec2::ZERO; 3];
        accumulate_attraction(&store, &positions, &params(), &mut deltas);

        assert_eq!(deltas[0], Vec2::ZERO);
        assert_eq!(deltas[1], Vec2::ZERO);
        assert!((deltas[2] - vec2(0.0, -0.04)).length() < 1e-6);
    }

    #[test]
    fn unresolved_initiator_pulls_toward_center() {
        let mut store = store_from(
            vec![
                record("root", ResourceKind::Html, 0, None),
                record("lost", ResourceKind::Font, 0, Some("gone")),
            ],
            5,
        );
        store.place(1, LAYOUT_CENTER + vec2(-400.0, 0.0));

        let positions = store.bodies().iter().map(|body| body.position).collect::<Vec<_>>();
        let mut deltas = vec![Vec2::ZERO; 2];
        accumulate_attraction(&store, &positions, &params(), &mut deltas);
        assert!(deltas[1].x > 0.0 && deltas[1].y.abs() < 1e-6);
    }

    #[test]
    fn overlapping_pair_is_pushed_symmetrically() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let radii = vec![10.0, 10.0];
        let collision = CollisionParams::new(&params(), &radii);
        let mut deltas = vec![Vec2::ZERO; 2];
        accumulate_collisions(&positions, &radii, collision, &mut deltas);

        let expected = (35.0 - 10.0) / 35.0 * 1.2;
        assert!((deltas[0].x + expected).abs() < 1e-5);
        assert!((deltas[1].x - expected).abs() < 1e-5);
        assert_eq!(deltas[0] + deltas[1], Vec2::ZERO);
    }

    #[test]
    fn coincident_nodes_still_separate() {
        let positions = vec![vec2(3.0, 3.0), vec2(3.0, 3.0)];
        let radii = vec![6.0, 6.0];
        let collision = CollisionParams::new(&params(), &radii);
        let mut deltas = vec![Vec2::ZERO; 2];
        accumulate_collisions(&positions, &radii, collision, &mut deltas);

        assert!(deltas[0].is_finite() && deltas[0].length() > 1.0);
        assert!((deltas[0] + deltas[1]).length() < 1e-6);
    }

    #[test]
    fn quadtree_pairs_match_brute_force() {
        let count = 300;
        let positions = (0..count)
            .map(|index| {
                let t = index as f32;
                vec2((t * 12.9898).sin() * 400.0, (t * 78.233).sin() * 300.0)
            })
            .collect::<Vec<_>>();
        let radii = (0..count)
            .map(|index| 6.0 + (index % 9) as f32 * 4.0)
            .collect::<Vec<_>>();
        let collision = CollisionParams::new(&params(), &radii);

        let mut brute = vec![Vec2::ZERO; count];
        accumulate_collisions(&positions, &radii, collision, &mut brute);

        let mut partitioned = vec![Vec2::ZERO; count];
        let tree = QuadNode::build(&positions).unwrap();
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &radii,
            collision,
            &mut partitioned,
        );

        for (a, b) in brute.iter().zip(&partitioned) {
            assert!((*a - *b).length() < 1e-3, "{a:?} vs {b:?}");
        }
        assert!(brute.iter().any(|delta| delta.length() > 0.0));
    }
}
