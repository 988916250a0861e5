use std::collections::HashMap;

use eframe::egui::Vec2;
use rand::Rng;

use crate::resources::{Dataset, ResourceKind};
use crate::util::resource_name;

/// Shared attraction target, also where the root is pinned.
pub(in crate::app) const LAYOUT_CENTER: Vec2 = Vec2::new(400.0, 300.0);

const SEED_JITTER: f32 = 50.0;
const ROOT_RADIUS: f32 = 30.0;
const MIN_RADIUS: f32 = 6.0;
const MAX_RADIUS: f32 = 70.0;

pub(in crate::app) fn node_radius(byte_size: u64, pinned: bool) -> f32 {
    if pinned {
        return ROOT_RADIUS;
    }

    let size_kb = byte_size as f64 / 1024.0;
    ((size_kb + 1.0).ln() * 7.0).clamp(MIN_RADIUS as f64, MAX_RADIUS as f64) as f32
}

pub(in crate::app) struct SimNode {
    pub(in crate::app) id: String,
    pub(in crate::app) url: String,
    pub(in crate::app) name: String,
    pub(in crate::app) kind: ResourceKind,
    pub(in crate::app) byte_size: u64,
    pub(in crate::app) transfer_size: Option<u64>,
    pub(in crate::app) initiator_ref: Option<String>,
    pub(in crate::app) protocol: String,
    pub(in crate::app) compression: String,
    pub(in crate::app) radius: f32,
    pub(in crate::app) pinned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Body {
    pub(in crate::app) position: Vec2,
    pub(in crate::app) velocity: Vec2,
}

/// Per-dataset simulation state. Node attributes and initiator links are
/// fixed at construction; only the body snapshot changes between ticks.
pub(in crate::app) struct NodeStore {
    nodes: Vec<SimNode>,
    bodies: Vec<Body>,
    initiators: Vec<Option<usize>>,
    index_by_id: HashMap<String, usize>,
    root_index: Option<usize>,
}

impl NodeStore {
    pub(in crate::app) fn seeded(dataset: &Dataset, rng: &mut impl Rng) -> Self {
        let root_index = (!dataset.is_empty()).then_some(0);

        let nodes = dataset
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let pinned = Some(index) == root_index;
                SimNode {
                    id: record.id.clone(),
                    url: record.url.clone(),
                    name: resource_name(&record.url, pinned),
                    kind: record.category,
                    byte_size: record.byte_size,
                    transfer_size: record.transfer_size,
                    initiator_ref: record.initiator_ref.clone(),
                    protocol: record.protocol_label.clone(),
                    compression: record.compression_label.clone(),
                    radius: node_radius(record.byte_size, pinned),
                    pinned,
                }
            })
            .collect::<Vec<_>>();

        let bodies = nodes
            .iter()
            .map(|node| {
                let position = if node.pinned {
                    LAYOUT_CENTER
                } else {
                    let jitter = Vec2::new(
                        (rng.random::<f32>() - 0.5) * SEED_JITTER,
                        (rng.random::<f32>() - 0.5) * SEED_JITTER,
                    );
                    LAYOUT_CENTER + jitter
                };
                Body {
                    position,
                    velocity: Vec2::ZERO,
                }
            })
            .collect::<Vec<_>>();

        let mut index_by_key = HashMap::with_capacity(nodes.len() * 2);
        for (index, node) in nodes.iter().enumerate() {
            index_by_key.entry(node.id.clone()).or_insert(index);
            if !node.url.is_empty() {
                index_by_key.entry(node.url.clone()).or_insert(index);
            }
        }

        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect::<HashMap<_, _>>();

        let initiators = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let reference = node.initiator_ref.as_deref()?;
                if reference == node.id {
                    return None;
                }
                index_by_key
                    .get(reference)
                    .copied()
                    .filter(|&parent| parent != index)
            })
            .collect::<Vec<_>>();

        Self {
            nodes,
            bodies,
            initiators,
            index_by_id,
            root_index,
        }
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(in crate::app) fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub(in crate::app) fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub(in crate::app) fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub(in crate::app) fn position(&self, index: usize) -> Option<Vec2> {
        self.bodies.get(index).map(|body| body.position)
    }

    pub(in crate::app) fn initiator_of(&self, index: usize) -> Option<usize> {
        self.initiators.get(index).copied().flatten()
    }

    pub(in crate::app) fn root_index(&self) -> Option<usize> {
        self.root_index
    }

    /// Node with exactly this id. Urls never match here.
    pub(in crate::app) fn index_of_id(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub(in crate::app) fn children_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.initiators
            .iter()
            .enumerate()
            .filter_map(move |(child, parent)| (*parent == Some(index)).then_some(child))
    }

    /// Swaps in the snapshot produced by one simulation step.
    pub(in crate::app) fn commit(&mut self, bodies: Vec<Body>) {
        debug_assert_eq!(bodies.len(), self.bodies.len());
        if bodies.len() == self.bodies.len() {
            self.bodies = bodies;
        }
    }

    pub(in crate::app) fn kinetic_energy(&self) -> f32 {
        self.nodes
            .iter()
            .zip(&self.bodies)
            .filter(|(node, _)| !node.pinned)
            .map(|(_, body)| body.velocity.length_sq())
            .sum()
    }

    #[cfg(test)]
    pub(in crate::app) fn place(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.position = position;
            body.velocity = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
pub(in crate::app) mod fixtures {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::resources::{Dataset, ResourceKind, ResourceRecord};

    use super::NodeStore;

    pub(in crate::app) fn record(
        id: &str,
        kind: ResourceKind,
        byte_size: u64,
        initiator: Option<&str>,
    ) -> ResourceRecord {
        ResourceRecord {
            id: id.to_owned(),
            url: format!("https://site.test/{id}"),
            category: kind,
            byte_size,
            transfer_size: None,
            initiator_ref: initiator.map(str::to_owned),
            protocol_label: "h2".to_owned(),
            compression_label: "Uncompressed".to_owned(),
        }
    }

    pub(in crate::app) fn store_from(records: Vec<ResourceRecord>, seed: u64) -> NodeStore {
        let dataset = Dataset::new("fixture", records).unwrap();
        NodeStore::seeded(&dataset, &mut StdRng::seed_from_u64(seed))
    }
}
