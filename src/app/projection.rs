use std::collections::BTreeSet;

use eframe::egui::Pos2;

use crate::resources::ResourceKind;

use super::physics::NodeStore;
use super::viewport::ViewportTransform;

const LABEL_SCALE_THRESHOLD: f32 = 0.6;
const LABEL_RADIUS_THRESHOLD: f32 = 20.0;

/// Categories currently drawn. Hidden nodes keep simulating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct FilterSet {
    active: BTreeSet<ResourceKind>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FilterSet {
    pub(super) fn all() -> Self {
        Self {
            active: ResourceKind::ALL.into_iter().collect(),
        }
    }

    pub(super) fn none() -> Self {
        Self {
            active: BTreeSet::new(),
        }
    }

    pub(super) fn contains(&self, kind: ResourceKind) -> bool {
        self.active.contains(&kind)
    }

    pub(super) fn is_all(&self) -> bool {
        self.active.len() == ResourceKind::ALL.len()
    }

    pub(super) fn toggle(&mut self, kind: ResourceKind) {
        if !self.active.remove(&kind) {
            self.active.insert(kind);
        }
    }

    pub(super) fn toggle_all(&mut self) {
        *self = if self.is_all() {
            Self::none()
        } else {
            Self::all()
        };
    }
}

pub(super) fn label_visible(scale: f32, radius: f32) -> bool {
    scale > LABEL_SCALE_THRESHOLD || radius > LABEL_RADIUS_THRESHOLD
}

pub(super) struct ProjectedNode {
    pub(super) index: usize,
    pub(super) id: String,
    pub(super) position: Pos2,
    pub(super) screen_radius: f32,
    pub(super) kind: ResourceKind,
    pub(super) show_label: bool,
}

pub(super) struct ProjectedLink {
    pub(super) child: usize,
    pub(super) parent: usize,
    pub(super) from: Pos2,
    pub(super) to: Pos2,
}

impl ProjectedLink {
    /// True when `index` is either end of the link.
    pub(super) fn touches(&self, index: usize) -> bool {
        self.child == index || self.parent == index
    }
}

/// Drawable subset of the node store for one tick, in view space.
#[derive(Default)]
pub(super) struct RenderProjection {
    pub(super) nodes: Vec<ProjectedNode>,
    pub(super) links: Vec<ProjectedLink>,
}

impl RenderProjection {
    pub(super) fn build(
        store: &NodeStore,
        filters: &FilterSet,
        viewport: &ViewportTransform,
    ) -> Self {
        let scale = viewport.scale();
        let eligible = store
            .nodes()
            .iter()
            .map(|node| filters.contains(node.kind))
            .collect::<Vec<_>>();

        let mut links = Vec::new();
        for (child, &child_eligible) in eligible.iter().enumerate() {
            if !child_eligible {
                continue;
            }
            let Some(parent) = store.initiator_of(child) else {
                continue;
            };
            if !eligible[parent] {
                continue;
            }
            let (Some(from), Some(to)) = (store.position(parent), store.position(child)) else {
                continue;
            };

            links.push(ProjectedLink {
                child,
                parent,
                from: viewport.to_screen(from),
                to: viewport.to_screen(to),
            });
        }

        let nodes = store
            .nodes()
            .iter()
            .zip(store.bodies())
            .enumerate()
            .filter(|(index, _)| eligible[*index])
            .map(|(index, (node, body))| ProjectedNode {
                index,
                id: node.id.clone(),
                position: viewport.to_screen(body.position),
                screen_radius: node.radius * scale,
                kind: node.kind,
                show_label: label_visible(scale, node.radius),
            })
            .collect();

        Self { nodes, links }
    }

    /// Topmost node under `pointer`; later nodes are drawn over earlier ones.
    pub(super) fn hit_test(&self, pointer: Pos2) -> Option<&ProjectedNode> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.position.distance(pointer) <= node.screen_radius)
    }

    #[cfg(test)]
    pub(super) fn contains_index(&self, index: usize) -> bool {
        self.nodes.iter().any(|node| node.index == index)
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, vec2};

    use super::*;
    use crate::app::physics::fixtures::{record, store_from};
    use crate::app::physics::{SimulationParams, step};

    fn sample_store() -> NodeStore {
        let mut store = store_from(
            vec![
                record("root", ResourceKind::Html, 0, None),
                record("css", ResourceKind::Css, 0, Some("root")),
                record("img", ResourceKind::Image, 0, Some("css")),
                record("font", ResourceKind::Font, 0, Some("nowhere")),
            ],
            21,
        );
        store.place(1, vec2(500.0, 300.0));
        store.place(2, vec2(600.0, 300.0));
        store.place(3, vec2(400.0, 450.0));
        store
    }

    #[test]
    fn label_threshold_is_exact() {
        assert!(!label_visible(0.6, 20.0));
        assert!(label_visible(0.61, 6.0));
        assert!(label_visible(0.1, 20.5));
        assert!(!label_visible(0.5, 19.9));
    }

    #[test]
    fn projection_applies_viewport_and_labels() {
        let store = sample_store();
        let mut viewport = ViewportTransform::default();
        viewport.set_pan(vec2(10.0, 20.0));
        viewport.zoom_out();

        let projection = RenderProjection::build(&store, &FilterSet::all(), &viewport);
        assert_eq!(projection.nodes.len(), 4);
        assert_eq!(projection.links.len(), 2);

        let root = &projection.nodes[0];
        let scale = 1.0 / 1.2;
        let expected = (vec2(400.0, 300.0) * scale + vec2(10.0, 20.0)).to_pos2();
        assert!(root.position.distance(expected) < 1e-3);
        assert!((root.screen_radius - 30.0 * scale).abs() < 1e-4);
        assert!(root.show_label);
        assert!(projection.nodes[1].show_label);

        viewport.zoom_out();
        viewport.zoom_out();
        assert!(viewport.scale() < 0.6);
        let zoomed_out = RenderProjection::build(&store, &FilterSet::all(), &viewport);
        assert!(zoomed_out.nodes[0].show_label);
        assert!(!zoomed_out.nodes[1].show_label);
    }

    #[test]
    fn filtered_category_drops_nodes_and_touching_links() {
        let store = sample_store();
        let mut filters = FilterSet::all();
        filters.toggle(ResourceKind::Css);

        let projection =
            RenderProjection::build(&store, &filters, &ViewportTransform::default());
        assert!(!projection.contains_index(1));
        assert!(projection.links.is_empty());
        assert_eq!(projection.nodes.len(), 3);

        filters.toggle(ResourceKind::Css);
        let restored = RenderProjection::build(&store, &filters, &ViewportTransform::default());
        let link = restored.links.iter().find(|link| link.child == 2).unwrap();
        assert_eq!(link.parent, 1);
    }

    #[test]
    fn links_touching_a_node_cover_parent_and_children() {
        let store = sample_store();
        let projection =
            RenderProjection::build(&store, &FilterSet::all(), &ViewportTransform::default());

        let touching_css = projection
            .links
            .iter()
            .filter(|link| link.touches(1))
            .map(|link| (link.parent, link.child))
            .collect::<Vec<_>>();
        assert_eq!(touching_css, vec![(0, 1), (1, 2)]);
        assert!(!projection.links.iter().any(|link| link.touches(3)));
    }

    #[test]
    fn hidden_nodes_keep_simulating() {
        let mut store = sample_store();
        let mut filters = FilterSet::all();
        filters.toggle(ResourceKind::Font);

        let before = store.position(3).unwrap();
        let params = SimulationParams::default();
        for _ in 0..10 {
            let next = step(&store, &params, 1.0);
            store.commit(next);
        }

        let projection =
            RenderProjection::build(&store, &filters, &ViewportTransform::default());
        assert!(!projection.contains_index(3));
        assert_ne!(store.position(3).unwrap(), before);
        assert_ne!(store.bodies()[3].velocity, Vec2::ZERO);
    }

    #[test]
    fn hit_test_prefers_topmost_node() {
        let mut store = sample_store();
        store.place(1, vec2(405.0, 300.0));
        let projection =
            RenderProjection::build(&store, &FilterSet::all(), &ViewportTransform::default());

        let hit = projection.hit_test(Pos2::new(402.0, 300.0)).unwrap();
        assert_eq!(hit.id, "css");
        assert!(projection.hit_test(Pos2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn toggle_all_flips_between_everything_and_nothing() {
        let mut filters = FilterSet::all();
        filters.toggle_all();
        assert_eq!(filters, FilterSet::none());
        filters.toggle(ResourceKind::Js);
        filters.toggle_all();
        assert!(filters.is_all());
    }
}
