use crate::agent::{Agent, AgentKind};
use crate::config::{SimConfig, SimConfigError};
use crate::metrics::{AgentSnapshot, CountsSample, PopulationCounts, RunSummary, TickReport};
use crate::rng;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::collections::HashSet;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for ExperimentError {}

/// The live population and its tick driver.
///
/// Each tick runs decision → movement → interaction in strict sequence. All
/// mid-tick creation is buffered in `pending_spawns` and flushed between the
/// movement and interaction phases; all removal marks the agent dead in
/// place and the population is pruned at tick end. Children therefore never
/// decide or move in their birth tick but do participate in interaction,
/// and no phase ever iterates a collection mutated mid-pass.
pub struct World {
    pub agents: Vec<Agent>,
    config: SimConfig,
    rng: ChaCha12Rng,
    next_agent_id: u32,
    tick: u64,
    pending_spawns: Vec<Agent>,
    births_last_tick: usize,
    deaths_last_tick: usize,
    total_births: usize,
    total_deaths: usize,
}

impl World {
    pub const MAX_RUN_STEPS: usize = 10_000_000;

    /// Validate the configuration and build the initial population: kinds
    /// cycled round-robin, positions uniform over the bounds.
    pub fn new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;
        let mut rng = rng::create_rng(config.seed);
        let mut agents = Vec::with_capacity(config.agent_count);
        for i in 0..config.agent_count {
            let kind = AgentKind::ALL[i % AgentKind::ALL.len()];
            let position = [
                rng.random::<f64>() * (config.bounds_width - config.base_size),
                rng.random::<f64>() * (config.bounds_height - config.base_size),
            ];
            agents.push(Agent::spawn(i as u32, kind, position, &config, &mut rng));
        }
        let next_agent_id = agents.len() as u32;
        Ok(Self {
            agents,
            config,
            rng,
            next_agent_id,
            tick: 0,
            pending_spawns: Vec::new(),
            births_last_tick: 0,
            deaths_last_tick: 0,
            total_births: 0,
            total_deaths: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn counts(&self) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for agent in self.agents.iter().filter(|a| a.alive) {
            match agent.kind {
                AgentKind::Rock => counts.rock += 1,
                AgentKind::Paper => counts.paper += 1,
                AgentKind::Scissors => counts.scissors += 1,
            }
        }
        counts
    }

    pub fn is_extinct(&self) -> bool {
        !self.agents.iter().any(|a| a.alive)
    }

    /// Read-only export for external rendering. Must not feed back into the
    /// simulation.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .filter(|a| a.alive)
            .map(|a| AgentSnapshot {
                kind: a.kind,
                x: a.position[0],
                y: a.position[1],
                size: a.size,
            })
            .collect()
    }

    /// The external surface was resized: positions are re-clamped into the
    /// new bounds, never rescaled.
    pub fn set_bounds(&mut self, width: f64, height: f64) -> Result<(), SimConfigError> {
        let candidate = SimConfig {
            bounds_width: width,
            bounds_height: height,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;
        for i in 0..self.agents.len() {
            self.agents[i].position = self.clamp_position(self.agents[i].position);
        }
        Ok(())
    }

    /// Advance one global tick and report the resulting population.
    pub fn step(&mut self) -> TickReport {
        self.births_last_tick = 0;
        self.deaths_last_tick = 0;

        self.run_decision_phase();
        self.run_movement_phase();
        self.flush_spawns();
        self.run_interaction_phase();
        self.prune_dead();
        self.clear_stale_targets();

        self.tick += 1;
        let counts = self.counts();
        TickReport {
            tick: self.tick,
            counts,
            births: self.births_last_tick,
            deaths: self.deaths_last_tick,
            extinct: counts.is_extinct(),
        }
    }

    /// Batch driver: run up to `steps` ticks, sampling counts every
    /// `sample_every` ticks, stopping early at extinction.
    pub fn try_run(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_RUN_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_RUN_STEPS,
                actual: steps,
            });
        }
        let births_before = self.total_births;
        let deaths_before = self.total_deaths;
        let mut samples = Vec::new();
        let mut steps_run = 0;
        let mut extinct_at = None;
        for step in 1..=steps {
            let report = self.step();
            steps_run = step;
            if step % sample_every == 0 || step == steps || report.extinct {
                samples.push(CountsSample {
                    tick: report.tick,
                    counts: report.counts,
                });
            }
            if report.extinct {
                extinct_at = Some(report.tick);
                break;
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps_requested: steps,
            steps_run,
            sample_every,
            final_counts: self.counts(),
            samples,
            total_births: self.total_births - births_before,
            total_deaths: self.total_deaths - deaths_before,
            extinct_at,
        })
    }

    pub(in crate::world) fn clamp_position(&self, position: [f64; 2]) -> [f64; 2] {
        [
            position[0].clamp(0.0, self.config.bounds_width - self.config.base_size),
            position[1].clamp(0.0, self.config.bounds_height - self.config.base_size),
        ]
    }

    /// Room left under the population cap, counting buffered children.
    pub(in crate::world) fn can_spawn(&self) -> bool {
        self.agents.len() + self.pending_spawns.len() < crate::constants::MAX_TOTAL_AGENTS
    }

    pub(in crate::world) fn next_agent_id_checked(&mut self) -> Option<u32> {
        if self.next_agent_id == u32::MAX {
            return None;
        }
        let id = self.next_agent_id;
        self.next_agent_id += 1;
        Some(id)
    }

    /// Mark an agent dead. It stays in place (skipped by every later pair
    /// test) until the end-of-tick prune.
    pub(in crate::world) fn mark_dead(&mut self, index: usize) {
        let agent = &mut self.agents[index];
        if agent.alive {
            agent.alive = false;
            self.deaths_last_tick += 1;
            self.total_deaths += 1;
        }
    }

    /// Spawn a child of `parent_index` two parent-sizes ahead along the
    /// parent's heading, with fresh per-agent traits, buffered until the
    /// phase boundary. Returns the child's slot in the buffer.
    pub(in crate::world) fn spawn_child(&mut self, parent_index: usize) -> Option<usize> {
        if !self.can_spawn() {
            return None;
        }
        let id = self.next_agent_id_checked()?;
        let (kind, position, heading, size) = {
            let parent = &self.agents[parent_index];
            (parent.kind, parent.position, parent.heading, parent.size)
        };
        let child_position = self.clamp_position([
            position[0] + heading.cos() * size * 2.0,
            position[1] + heading.sin() * size * 2.0,
        ]);
        let child = Agent::spawn(id, kind, child_position, &self.config, &mut self.rng);
        self.pending_spawns.push(child);
        Some(self.pending_spawns.len() - 1)
    }

    fn flush_spawns(&mut self) {
        self.births_last_tick += self.pending_spawns.len();
        self.total_births += self.pending_spawns.len();
        self.agents.append(&mut self.pending_spawns);
    }

    fn prune_dead(&mut self) {
        self.agents.retain(|a| a.alive);
    }

    /// No target may name an agent absent from the live population once the
    /// tick completes.
    fn clear_stale_targets(&mut self) {
        let live: HashSet<u32> = self.agents.iter().map(|a| a.id).collect();
        for agent in &mut self.agents {
            if let Some(target) = agent.target {
                if !live.contains(&target) {
                    agent.target = None;
                }
            }
        }
    }
}

mod phases;
