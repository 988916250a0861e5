mod driver;
mod forces;
mod integrator;
mod quadtree;
mod store;

use eframe::egui::Vec2;

pub(in crate::app) use driver::{LoopToken, SimulationDriver};
pub(in crate::app) use integrator::StepTiming;
pub(in crate::app) use quadtree::QuadtreeCell;
pub(in crate::app) use store::NodeStore;
#[cfg(test)]
pub(in crate::app) use store::fixtures;

use forces::{
    CollisionParams, accumulate_attraction, accumulate_collision_pairs, accumulate_collisions,
};
use integrator::integrate;
use quadtree::{QuadNode, collect_quadtree_cells};
pub(in crate::app) use store::Body;

/// Above this many nodes, collision pairs come from a quadtree instead of a
/// full pair scan.
pub(in crate::app) const SPATIAL_INDEX_THRESHOLD: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct SimulationParams {
    pub(in crate::app) attraction_strength: f32,
    pub(in crate::app) ideal_distance_base: f32,
    pub(in crate::app) collision_padding: f32,
    pub(in crate::app) repulsion_gain: f32,
    pub(in crate::app) damping: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            attraction_strength: 0.04,
            ideal_distance_base: 80.0,
            collision_padding: 15.0,
            repulsion_gain: 1.2,
            damping: 0.90,
        }
    }
}

/// One simulation tick as a pure function of the current snapshot: every
/// force reads the same positions, and the result is a fresh body vector.
pub(in crate::app) fn step(
    store: &NodeStore,
    params: &SimulationParams,
    step_scale: f32,
) -> Vec<Body> {
    let node_count = store.len();
    let positions = store
        .bodies()
        .iter()
        .map(|body| body.position)
        .collect::<Vec<_>>();
    let radii = store
        .nodes()
        .iter()
        .map(|node| node.radius)
        .collect::<Vec<_>>();
    let mut deltas = vec![Vec2::ZERO; node_count];

    accumulate_attraction(store, &positions, params, &mut deltas);

    let collision = CollisionParams::new(params, &radii);
    if node_count > SPATIAL_INDEX_THRESHOLD {
        if let Some(tree) = QuadNode::build(&positions) {
            accumulate_collision_pairs(
                &tree,
                &tree,
                true,
                &positions,
                &radii,
                collision,
                &mut deltas,
            );
        }
    } else {
        accumulate_collisions(&positions, &radii, collision, &mut deltas);
    }

    integrate(store, &deltas, params.damping, step_scale)
}

pub(in crate::app) fn quadtree_cells(store: &NodeStore, cells: &mut Vec<QuadtreeCell>) {
    cells.clear();
    let positions = store
        .bodies()
        .iter()
        .map(|body| body.position)
        .collect::<Vec<_>>();
    if let Some(tree) = QuadNode::build(&positions) {
        collect_quadtree_cells(&tree, 0, cells);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::fixtures::{record, store_from};
    use super::store::LAYOUT_CENTER;
    use super::*;
    use crate::resources::{ResourceKind, ResourceRecord};

    fn run(store: &mut NodeStore, steps: usize) {
        let params = SimulationParams::default();
        for _ in 0..steps {
            let next = step(store, &params, 1.0);
            store.commit(next);
        }
    }

    fn sample_page() -> Vec<ResourceRecord> {
        let mut records = vec![
            record("root", ResourceKind::Html, 30 * 1024, None),
            record("css", ResourceKind::Css, 45 * 1024, Some("root")),
            record("app", ResourceKind::Js, 150 * 1024, Some("root")),
        ];
        for index in 0..8 {
            records.push(record(
                &format!("chunk-{index}"),
                ResourceKind::Js,
                5_000 + index * 9_000,
                Some("app"),
            ));
        }
        for index in 0..12 {
            records.push(record(
                &format!("img-{index}"),
                ResourceKind::Image,
                20 * 1024 + index * 150 * 1024,
                Some("root"),
            ));
        }
        records.push(record("orphan", ResourceKind::Font, 12_000, Some("cdn")));
        records
    }

    #[test]
    fn lone_child_settles_near_ideal_distance() {
        let mut store = store_from(
            vec![
                record("root", ResourceKind::Html, 0, None),
                record("child", ResourceKind::Js, 0, Some("root")),
            ],
            8,
        );
        let child_radius = 10.0;
        assert!(store.nodes()[1].radius <= child_radius);
        store.place(1, LAYOUT_CENTER + vec2(300.0, 0.0));

        run(&mut store, 3_000);

        let distance = (store.position(1).unwrap() - LAYOUT_CENTER).length();
        let ideal = 80.0 + store.nodes()[1].radius;
        assert!((distance - ideal).abs() < 5.0, "distance {distance}, ideal {ideal}");
        assert!(store.kinetic_energy() < 1e-6);
    }

    #[test]
    fn child_with_radius_ten_rests_about_ninety_away() {
        // ln(x + 1) * 7 = 10 for x = e^(10/7) - 1 KB
        let size = (((10.0_f64 / 7.0).exp() - 1.0) * 1024.0).round() as u64;
        let mut store = store_from(
            vec![
                record("root", ResourceKind::Html, 0, None),
                record("child", ResourceKind::Css, size, Some("root")),
            ],
            9,
        );
        assert!((store.nodes()[1].radius - 10.0).abs() < 0.01);
        store.place(1, vec2(400.0, 300.0) + vec2(0.0, -250.0));

        run(&mut store, 3_000);

        let distance = (store.position(1).unwrap() - vec2(400.0, 300.0)).length();
        assert!((distance - 90.0).abs() < 5.0, "distance {distance}");
    }

    #[test]
    fn pinned_root_never_moves() {
        let mut store = store_from(sample_page(), 10);
        let params = SimulationParams::default();
        for _ in 0..500 {
            let next = step(&store, &params, 1.0);
            store.commit(next);
            assert_eq!(store.position(0), Some(LAYOUT_CENTER));
            assert_eq!(store.bodies()[0].velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn settled_layout_has_no_overlaps() {
        let mut store = store_from(sample_page(), 11);
        run(&mut store, 4_000);

        let epsilon = 1.0;
        let nodes = store.nodes();
        for a in 0..nodes.len() {
            for b in (a + 1)..nodes.len() {
                let distance = (store.position(a).unwrap() - store.position(b).unwrap()).length();
                let touching = nodes[a].radius + nodes[b].radius;
                assert!(
                    distance >= touching - epsilon,
                    "{} and {} overlap: {distance} < {touching}",
                    nodes[a].id,
                    nodes[b].id
                );
            }
        }
    }

    #[test]
    fn step_is_independent_of_node_order() {
        let records = sample_page();
        let store = store_from(records.clone(), 12);
        let next = step(&store, &SimulationParams::default(), 1.0);

        let mut reversed_tail = records;
        reversed_tail[1..].reverse();
        let mut reordered = store_from(reversed_tail, 12);
        let count = store.len();
        for index in 1..count {
            let original = count - index;
            reordered.place(index, store.position(original).unwrap());
        }
        let reordered_next = step(&reordered, &SimulationParams::default(), 1.0);

        for index in 1..count {
            let original = count - index;
            let difference = next[original].position - reordered_next[index].position;
            assert!(difference.length() < 1e-3);
        }
    }

    #[test]
    fn large_sets_use_the_quadtree_and_stay_finite() {
        let mut records = vec![record("root", ResourceKind::Html, 1024, None)];
        for index in 0..(SPATIAL_INDEX_THRESHOLD + 40) {
            records.push(record(
                &format!("n{index}"),
                ResourceKind::Other,
                (index as u64 % 50) * 2048,
                Some("root"),
            ));
        }
        let mut store = store_from(records, 13);
        run(&mut store, 20);

        assert!(
            store
                .bodies()
                .iter()
                .all(|body| body.position.is_finite() && body.velocity.is_finite())
        );
        assert_eq!(store.position(0), Some(LAYOUT_CENTER));

        let mut cells = Vec::new();
        quadtree_cells(&store, &mut cells);
        assert!(cells.len() > 1);
    }
}
