use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::resources::Dataset;

use super::store::NodeStore;
use super::{SimulationParams, StepTiming, step};

/// Identifies one simulation loop. Loading a dataset or stopping the driver
/// retires the current token; ticks carrying a retired token do nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct LoopToken(u64);

pub(in crate::app) struct SimulationDriver {
    generation: u64,
    running: bool,
    store: Option<NodeStore>,
    params: SimulationParams,
    timing: StepTiming,
    rng: StdRng,
    steps: u64,
}

impl SimulationDriver {
    pub(in crate::app) fn new(
        params: SimulationParams,
        timing: StepTiming,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            generation: 0,
            running: false,
            store: None,
            params,
            timing,
            rng,
            steps: 0,
        }
    }

    /// Retires the running loop, then builds a fresh store for `dataset`.
    pub(in crate::app) fn load(&mut self, dataset: &Dataset) -> LoopToken {
        self.generation = self.generation.wrapping_add(1);
        self.store = None;
        self.store = Some(NodeStore::seeded(dataset, &mut self.rng));
        self.running = true;
        self.steps = 0;

        tracing::info!(
            generation = self.generation,
            nodes = dataset.len(),
            source = %dataset.source_label,
            "started layout simulation"
        );
        LoopToken(self.generation)
    }

    pub(in crate::app) fn stop(&mut self) {
        if self.running {
            tracing::debug!(
                generation = self.generation,
                steps = self.steps,
                "stopped layout simulation"
            );
        }
        self.generation = self.generation.wrapping_add(1);
        self.running = false;
    }

    #[cfg(test)]
    pub(in crate::app) fn token(&self) -> Option<LoopToken> {
        (self.running && self.store.is_some()).then_some(LoopToken(self.generation))
    }

    /// Advances the simulation by one step. Returns false when the token is
    /// stale or nothing is loaded.
    pub(in crate::app) fn tick(&mut self, token: LoopToken, elapsed_secs: f32) -> bool {
        if !self.running || token != LoopToken(self.generation) {
            return false;
        }
        let Some(store) = self.store.as_mut() else {
            return false;
        };

        let next = step(store, &self.params, self.timing.step_scale(elapsed_secs));
        store.commit(next);
        self.steps += 1;
        true
    }

    pub(in crate::app) fn store(&self) -> Option<&NodeStore> {
        self.store.as_ref()
    }

    pub(in crate::app) fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    pub(in crate::app) fn timing(&self) -> StepTiming {
        self.timing
    }

    pub(in crate::app) fn set_timing(&mut self, timing: StepTiming) {
        self.timing = timing;
    }

    pub(in crate::app) fn steps(&self) -> u64 {
        self.steps
    }
}
