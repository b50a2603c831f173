use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for the simulation RNG stream.
    pub seed: u64,
    /// Initial population size; kinds are assigned round-robin.
    pub agent_count: usize,
    /// Width of the simulation rectangle in world units.
    pub bounds_width: f64,
    /// Height of the simulation rectangle in world units.
    pub bounds_height: f64,
    /// Reference agent size; also anchors the pairwise interaction radius.
    pub base_size: f64,
    /// Pairwise interaction gate is `base_size * interaction_radius_factor`,
    /// independent of individual size or sight.
    pub interaction_radius_factor: f64,
    /// Hunger at creation; timer-reproduction children start here too.
    pub initial_hunger: f64,
    /// Hunger drained from every agent during the movement phase.
    pub hunger_decay_per_tick: f64,
    /// Pivot of the speed-boost bands: below it agents speed up, between it
    /// and `initial_hunger` they slow toward the over-fed cap.
    pub standard_hunger_threshold: f64,
    /// Below this hunger an agent enters the Crazy state.
    pub crazy_hunger_threshold: f64,
    /// Minimum hunger for timer-driven reproduction.
    pub reproduction_hunger_threshold: f64,
    /// Hunger deducted from the parent on timer-driven reproduction.
    pub reproduction_hunger_cost: f64,
    /// Minimum hunger for an emergency split under predator threat.
    pub split_min_hunger: f64,
    /// Predator distance below which a well-fed agent splits.
    pub split_avoidance_radius: f64,
    /// Floor on the hunger gained from any kill.
    pub min_eat_gain: f64,
    /// Multiplier on the eaten prey's hunger.
    pub prey_hunger_factor: f64,
    /// Multiplier on the loser's hunger in a same-kind crazy conflict.
    pub same_kind_hunger_factor: f64,
    /// Maximum extra speed for a starving agent (boost up to `1 + max`).
    pub low_hunger_boost_max: f64,
    /// Flat speed reduction cap for over-fed agents.
    pub high_hunger_slowdown: f64,
    /// Base perception radius.
    pub sight_radius: f64,
    /// Per-agent sight variation: sampled uniformly in `1 ± variation`.
    pub sight_radius_variation: f64,
    /// Base reproduction period in ticks.
    pub reproduction_interval_ticks: u32,
    /// Per-agent reproduction interval variation in `1 ± variation`.
    pub reproduction_interval_variation: f64,
    /// Base idle-wander period in ticks.
    pub direction_change_interval_ticks: u32,
    /// Per-agent wander interval variation in `1 ± variation`.
    pub direction_change_interval_variation: f64,
    /// Fraction of agents that hunt before fleeing.
    pub chase_prey_probability: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            agent_count: 90,
            bounds_width: 800.0,
            bounds_height: 600.0,
            base_size: 6.0,
            interaction_radius_factor: 1.5,
            initial_hunger: 100.0,
            hunger_decay_per_tick: 0.04,
            standard_hunger_threshold: 30.0,
            crazy_hunger_threshold: 20.0,
            reproduction_hunger_threshold: 80.0,
            reproduction_hunger_cost: 4.0,
            split_min_hunger: 100.0,
            split_avoidance_radius: 15.0,
            min_eat_gain: 10.0,
            prey_hunger_factor: 0.6,
            same_kind_hunger_factor: 0.3,
            low_hunger_boost_max: 3.0,
            high_hunger_slowdown: 0.4,
            sight_radius: 90.0,
            sight_radius_variation: 0.2,
            reproduction_interval_ticks: 480,
            reproduction_interval_variation: 0.4,
            direction_change_interval_ticks: 160,
            direction_change_interval_variation: 0.3,
            chase_prey_probability: 0.3,
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidAgentCount => "agent_count must be greater than 0";
    TooManyAgents { max: usize, actual: usize } => "agent_count ({}) exceeds supported maximum ({})", actual, max;
    InvalidBoundsWidth => "bounds_width must be positive and finite";
    InvalidBoundsHeight => "bounds_height must be positive and finite";
    BoundsTooLarge { max: f64, actual: f64 } => "bounds dimension ({actual}) exceeds supported maximum ({max})";
    InvalidBaseSize => "base_size must be positive and finite";
    BaseSizeExceedsBounds => "base_size must be smaller than both bounds dimensions";
    InvalidInteractionRadiusFactor => "interaction_radius_factor must be positive and finite";
    InvalidInitialHunger => "initial_hunger must be positive and finite";
    InvalidHungerDecay => "hunger_decay_per_tick must be positive and finite";
    InvalidStandardHungerThreshold => "standard_hunger_threshold must be finite and within (0, initial_hunger)";
    InvalidCrazyHungerThreshold => "crazy_hunger_threshold must be finite and non-negative";
    InvalidReproductionHungerThreshold => "reproduction_hunger_threshold must be finite and non-negative";
    InvalidReproductionHungerCost => "reproduction_hunger_cost must be positive and finite";
    InvalidReproductionHungerBalance => "reproduction_hunger_threshold must be greater than or equal to reproduction_hunger_cost";
    InvalidSplitMinHunger => "split_min_hunger must be finite and non-negative";
    InvalidSplitAvoidanceRadius => "split_avoidance_radius must be finite and non-negative";
    InvalidMinEatGain => "min_eat_gain must be finite and non-negative";
    InvalidPreyHungerFactor => "prey_hunger_factor must be finite and non-negative";
    InvalidSameKindHungerFactor => "same_kind_hunger_factor must be finite and non-negative";
    InvalidLowHungerBoostMax => "low_hunger_boost_max must be finite and non-negative";
    InvalidHighHungerSlowdown => "high_hunger_slowdown must be finite and within [0,1]";
    InvalidSightRadius => "sight_radius must be non-negative and finite";
    InvalidSightRadiusVariation => "sight_radius_variation must be finite and within [0,1)";
    InvalidReproductionInterval => "reproduction_interval_ticks must be positive";
    InvalidReproductionIntervalVariation => "reproduction_interval_variation must be finite and within [0,1)";
    InvalidDirectionChangeInterval => "direction_change_interval_ticks must be positive";
    InvalidDirectionChangeIntervalVariation => "direction_change_interval_variation must be finite and within [0,1)";
    InvalidChasePreyProbability => "chase_prey_probability must be finite and within [0,1]";
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub const MAX_BOUNDS: f64 = crate::constants::MAX_BOUNDS;
    pub const MAX_TOTAL_AGENTS: usize = crate::constants::MAX_TOTAL_AGENTS;

    /// Distance below which two agents interact, regardless of their
    /// individual sizes.
    pub fn interaction_radius(&self) -> f64 {
        self.base_size * self.interaction_radius_factor
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_population()?;
        self.validate_bounds()?;
        self.validate_hunger()?;
        self.validate_reproduction()?;
        self.validate_perception()?;
        Ok(())
    }

    fn validate_population(&self) -> Result<(), SimConfigError> {
        if self.agent_count == 0 {
            return Err(SimConfigError::InvalidAgentCount);
        }
        if self.agent_count > Self::MAX_TOTAL_AGENTS {
            return Err(SimConfigError::TooManyAgents {
                max: Self::MAX_TOTAL_AGENTS,
                actual: self.agent_count,
            });
        }
        if !(self.chase_prey_probability.is_finite()
            && (0.0..=1.0).contains(&self.chase_prey_probability))
        {
            return Err(SimConfigError::InvalidChasePreyProbability);
        }
        Ok(())
    }

    fn validate_bounds(&self) -> Result<(), SimConfigError> {
        if !(self.bounds_width.is_finite() && self.bounds_width > 0.0) {
            return Err(SimConfigError::InvalidBoundsWidth);
        }
        if !(self.bounds_height.is_finite() && self.bounds_height > 0.0) {
            return Err(SimConfigError::InvalidBoundsHeight);
        }
        let largest = self.bounds_width.max(self.bounds_height);
        if largest > Self::MAX_BOUNDS {
            return Err(SimConfigError::BoundsTooLarge {
                max: Self::MAX_BOUNDS,
                actual: largest,
            });
        }
        if !(self.base_size.is_finite() && self.base_size > 0.0) {
            return Err(SimConfigError::InvalidBaseSize);
        }
        if self.base_size >= self.bounds_width || self.base_size >= self.bounds_height {
            return Err(SimConfigError::BaseSizeExceedsBounds);
        }
        if !(self.interaction_radius_factor.is_finite() && self.interaction_radius_factor > 0.0) {
            return Err(SimConfigError::InvalidInteractionRadiusFactor);
        }
        Ok(())
    }

    fn validate_hunger(&self) -> Result<(), SimConfigError> {
        if !(self.initial_hunger.is_finite() && self.initial_hunger > 0.0) {
            return Err(SimConfigError::InvalidInitialHunger);
        }
        if !(self.hunger_decay_per_tick.is_finite() && self.hunger_decay_per_tick > 0.0) {
            return Err(SimConfigError::InvalidHungerDecay);
        }
        // Boost interpolation divides by both the threshold and the span up
        // to initial_hunger.
        if !(self.standard_hunger_threshold.is_finite()
            && self.standard_hunger_threshold > 0.0
            && self.standard_hunger_threshold < self.initial_hunger)
        {
            return Err(SimConfigError::InvalidStandardHungerThreshold);
        }
        if !(self.crazy_hunger_threshold.is_finite() && self.crazy_hunger_threshold >= 0.0) {
            return Err(SimConfigError::InvalidCrazyHungerThreshold);
        }
        if !(self.min_eat_gain.is_finite() && self.min_eat_gain >= 0.0) {
            return Err(SimConfigError::InvalidMinEatGain);
        }
        if !(self.prey_hunger_factor.is_finite() && self.prey_hunger_factor >= 0.0) {
            return Err(SimConfigError::InvalidPreyHungerFactor);
        }
        if !(self.same_kind_hunger_factor.is_finite() && self.same_kind_hunger_factor >= 0.0) {
            return Err(SimConfigError::InvalidSameKindHungerFactor);
        }
        if !(self.low_hunger_boost_max.is_finite() && self.low_hunger_boost_max >= 0.0) {
            return Err(SimConfigError::InvalidLowHungerBoostMax);
        }
        if !(self.high_hunger_slowdown.is_finite()
            && (0.0..=1.0).contains(&self.high_hunger_slowdown))
        {
            return Err(SimConfigError::InvalidHighHungerSlowdown);
        }
        Ok(())
    }

    fn validate_reproduction(&self) -> Result<(), SimConfigError> {
        if !(self.reproduction_hunger_threshold.is_finite()
            && self.reproduction_hunger_threshold >= 0.0)
        {
            return Err(SimConfigError::InvalidReproductionHungerThreshold);
        }
        if !(self.reproduction_hunger_cost.is_finite() && self.reproduction_hunger_cost > 0.0) {
            return Err(SimConfigError::InvalidReproductionHungerCost);
        }
        if self.reproduction_hunger_threshold < self.reproduction_hunger_cost {
            return Err(SimConfigError::InvalidReproductionHungerBalance);
        }
        if !(self.split_min_hunger.is_finite() && self.split_min_hunger >= 0.0) {
            return Err(SimConfigError::InvalidSplitMinHunger);
        }
        if !(self.split_avoidance_radius.is_finite() && self.split_avoidance_radius >= 0.0) {
            return Err(SimConfigError::InvalidSplitAvoidanceRadius);
        }
        if self.reproduction_interval_ticks == 0 {
            return Err(SimConfigError::InvalidReproductionInterval);
        }
        if !(self.reproduction_interval_variation.is_finite()
            && (0.0..1.0).contains(&self.reproduction_interval_variation))
        {
            return Err(SimConfigError::InvalidReproductionIntervalVariation);
        }
        Ok(())
    }

    fn validate_perception(&self) -> Result<(), SimConfigError> {
        if !(self.sight_radius.is_finite() && self.sight_radius >= 0.0) {
            return Err(SimConfigError::InvalidSightRadius);
        }
        if !(self.sight_radius_variation.is_finite()
            && (0.0..1.0).contains(&self.sight_radius_variation))
        {
            return Err(SimConfigError::InvalidSightRadiusVariation);
        }
        if self.direction_change_interval_ticks == 0 {
            return Err(SimConfigError::InvalidDirectionChangeInterval);
        }
        if !(self.direction_change_interval_variation.is_finite()
            && (0.0..1.0).contains(&self.direction_change_interval_variation))
        {
            return Err(SimConfigError::InvalidDirectionChangeIntervalVariation);
        }
        Ok(())
    }
}
