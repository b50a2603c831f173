pub mod agent;
pub mod config;
pub mod constants;
pub mod metrics;
pub mod rng;
pub mod spatial;
pub mod world;

pub use agent::{Agent, AgentKind, BehaviorState};
pub use config::{SimConfig, SimConfigError};
pub use constants::{MAX_BOUNDS, MAX_TOTAL_AGENTS};
pub use metrics::{AgentSnapshot, CountsSample, PopulationCounts, RunSummary, TickReport};
pub use world::{ExperimentError, World};
