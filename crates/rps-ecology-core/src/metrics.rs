use crate::agent::AgentKind;
use serde::{Deserialize, Serialize};

/// Per-kind live agent totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub rock: usize,
    pub paper: usize,
    pub scissors: usize,
}

impl PopulationCounts {
    pub fn of_kind(&self, kind: AgentKind) -> usize {
        match kind {
            AgentKind::Rock => self.rock,
            AgentKind::Paper => self.paper,
            AgentKind::Scissors => self.scissors,
        }
    }

    pub fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    pub fn is_extinct(&self) -> bool {
        self.total() == 0
    }
}

/// Result of one simulation tick, for external reporting.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub counts: PopulationCounts,
    pub births: usize,
    pub deaths: usize,
    pub extinct: bool,
}

/// One sampled point of the population time series.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CountsSample {
    pub tick: u64,
    pub counts: PopulationCounts,
}

fn default_schema_version() -> u32 {
    1
}

/// Summary of a batch run: periodic count samples plus totals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps_requested: usize,
    pub steps_run: usize,
    pub sample_every: usize,
    pub final_counts: PopulationCounts,
    pub samples: Vec<CountsSample>,
    pub total_births: usize,
    pub total_deaths: usize,
    /// Tick at which the population reached zero, if it did.
    pub extinct_at: Option<u64>,
}

/// Read-only agent export for external rendering.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub kind: AgentKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}
