use crate::config::SimConfig;
use crate::constants::MIN_AGENT_SIZE;
use crate::spatial;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// The three agent kinds, locked in a strict predation cycle:
/// Rock beats Scissors, Scissors beats Paper, Paper beats Rock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Rock,
    Paper,
    Scissors,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Rock, AgentKind::Paper, AgentKind::Scissors];

    /// The kind this kind preys on.
    pub fn prey(self) -> AgentKind {
        match self {
            AgentKind::Rock => AgentKind::Scissors,
            AgentKind::Scissors => AgentKind::Paper,
            AgentKind::Paper => AgentKind::Rock,
        }
    }

    /// The kind that preys on this kind.
    pub fn predator(self) -> AgentKind {
        match self {
            AgentKind::Scissors => AgentKind::Rock,
            AgentKind::Paper => AgentKind::Scissors,
            AgentKind::Rock => AgentKind::Paper,
        }
    }

    /// True if this kind may consume `other`. Irreflexive by construction.
    pub fn can_eat(self, other: AgentKind) -> bool {
        self.prey() == other
    }
}

/// Behavioral state, recomputed from scratch every decision phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorState {
    #[default]
    Idle,
    Chasing,
    Running,
    Crazy,
}

/// Read-only view of one agent, shared across the whole decision phase so
/// every agent assesses the same pre-tick population state.
#[derive(Clone, Copy, Debug)]
pub struct NeighborView {
    pub id: u32,
    pub kind: AgentKind,
    pub position: [f64; 2],
    pub hunger: f64,
}

/// Outcome of the pure target/state selection. `target` and
/// `nearest_predator` are indices into the view slice passed to [`assess`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Assessment {
    pub state: BehaviorState,
    pub target: Option<usize>,
    /// Group-flee bias: average direction away from all visible predators.
    /// Applied to the heading before any facing toward/away from the target.
    pub flee_heading: Option<f64>,
    pub nearest_predator: Option<(usize, f64)>,
}

/// Select behavior state and target from the visible neighborhood.
///
/// Priority order: frenzy (hunger below the crazy threshold) targets the
/// nearest same-kind or prey agent and ignores predators; otherwise the
/// `chase_prey_first` trait decides whether the highest-hunger visible prey
/// or the nearest visible predator wins. Pure over its inputs.
pub fn assess(
    me: &NeighborView,
    chase_prey_first: bool,
    crazy_threshold: f64,
    views: &[NeighborView],
    visible: &[usize],
) -> Assessment {
    let mut best_prey: Option<(usize, f64)> = None;
    let mut predators: Vec<(usize, f64)> = Vec::new();

    for &vi in visible {
        let other = &views[vi];
        if me.kind.can_eat(other.kind) {
            // Highest-hunger prey, not nearest: favors high-value kills.
            match best_prey {
                Some((_, hunger)) if other.hunger <= hunger => {}
                _ => best_prey = Some((vi, other.hunger)),
            }
        }
        if other.kind.can_eat(me.kind) {
            predators.push((vi, spatial::distance(me.position, other.position)));
        }
    }

    let nearest_predator = predators
        .iter()
        .copied()
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let flee_heading = if predators.is_empty() {
        None
    } else {
        let mut away = [0.0f64; 2];
        for &(vi, _) in &predators {
            away[0] += me.position[0] - views[vi].position[0];
            away[1] += me.position[1] - views[vi].position[1];
        }
        let n = predators.len() as f64;
        Some((away[1] / n).atan2(away[0] / n))
    };

    let (state, target) = if me.hunger < crazy_threshold {
        // Frenzy: nearest same-kind or prey agent; predators are ignored.
        let target = visible
            .iter()
            .copied()
            .filter(|&vi| {
                let k = views[vi].kind;
                k == me.kind || me.kind.can_eat(k)
            })
            .min_by(|&a, &b| {
                spatial::distance(me.position, views[a].position)
                    .total_cmp(&spatial::distance(me.position, views[b].position))
            });
        (BehaviorState::Crazy, target)
    } else if chase_prey_first {
        match (best_prey, nearest_predator) {
            (Some((vi, _)), _) => (BehaviorState::Chasing, Some(vi)),
            (None, Some((vi, _))) => (BehaviorState::Running, Some(vi)),
            (None, None) => (BehaviorState::Idle, None),
        }
    } else {
        match (nearest_predator, best_prey) {
            (Some((vi, _)), _) => (BehaviorState::Running, Some(vi)),
            (None, Some((vi, _))) => (BehaviorState::Chasing, Some(vi)),
            (None, None) => (BehaviorState::Idle, None),
        }
    };

    Assessment {
        state,
        target,
        flee_heading,
        nearest_predator,
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub id: u32,
    pub kind: AgentKind,
    pub position: [f64; 2],
    /// Heading in radians; mutated by decisions and wall bounces.
    pub heading: f64,
    pub hunger: f64,
    /// Fixed at creation with per-agent variation.
    pub sight_radius: f64,
    pub reproduction_timer: u32,
    pub reproduction_interval: u32,
    pub direction_change_timer: u32,
    pub direction_change_interval: u32,
    /// Derived from hunger each tick; floored at `MIN_AGENT_SIZE`.
    pub size: f64,
    /// Per-tick speed multiplier derived from the hunger band.
    pub boost: f64,
    /// Trait: hunt before fleeing when both a prey and a predator are seen.
    pub chase_prey_first: bool,
    pub state: BehaviorState,
    /// Stable id of the current target; cleared whenever the target dies.
    pub target: Option<u32>,
    /// Dead agents stay in place until the end-of-tick prune.
    pub alive: bool,
}

/// Uniform sample from `base * [1 - variation, 1 + variation]`, rounded to
/// whole ticks, at least one tick.
fn varied_interval<R: Rng>(base: u32, variation: f64, rng: &mut R) -> u32 {
    let factor = 1.0 - variation + rng.random::<f64>() * 2.0 * variation;
    ((base as f64 * factor).round() as u32).max(1)
}

impl Agent {
    /// Create an agent at `position` with freshly sampled per-agent traits.
    /// Used both for the initial population and for children.
    pub fn spawn<R: Rng>(
        id: u32,
        kind: AgentKind,
        position: [f64; 2],
        config: &SimConfig,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            kind,
            position,
            heading: rng.random::<f64>() * TAU,
            hunger: config.initial_hunger,
            sight_radius: config.sight_radius
                * (1.0 - config.sight_radius_variation
                    + rng.random::<f64>() * 2.0 * config.sight_radius_variation),
            reproduction_timer: 0,
            reproduction_interval: varied_interval(
                config.reproduction_interval_ticks,
                config.reproduction_interval_variation,
                rng,
            ),
            direction_change_timer: 0,
            direction_change_interval: varied_interval(
                config.direction_change_interval_ticks,
                config.direction_change_interval_variation,
                rng,
            ),
            size: config.base_size,
            boost: 1.0,
            chase_prey_first: rng.random::<f64>() < config.chase_prey_probability,
            state: BehaviorState::Idle,
            target: None,
            alive: true,
        }
    }

    /// Size as a function of hunger: agents shrink as they starve and grow
    /// past the base size when over-fed, never below the minimum.
    pub fn size_for_hunger(hunger: f64, config: &SimConfig) -> f64 {
        (config.base_size * (hunger / config.initial_hunger).sqrt()).max(MIN_AGENT_SIZE)
    }

    /// Speed multiplier from the hunger band: starving agents sprint (up to
    /// `1 + low_hunger_boost_max`), over-fed agents are capped at
    /// `1 - high_hunger_slowdown`, the range between the standard threshold
    /// and the initial hunger interpolates linearly.
    pub fn speed_boost(hunger: f64, config: &SimConfig) -> f64 {
        if hunger < config.standard_hunger_threshold {
            1.0 + config.low_hunger_boost_max * (config.standard_hunger_threshold - hunger)
                / config.standard_hunger_threshold
        } else if hunger > config.initial_hunger {
            1.0 - config.high_hunger_slowdown
        } else {
            1.0 - config.high_hunger_slowdown * (hunger - config.standard_hunger_threshold)
                / (config.initial_hunger - config.standard_hunger_threshold)
        }
    }

    /// Reset the per-tick derived fields at the start of a decision.
    pub fn begin_decision(&mut self, config: &SimConfig) {
        self.size = Self::size_for_hunger(self.hunger, config);
        self.target = None;
        self.state = BehaviorState::Idle;
        self.boost = Self::speed_boost(self.hunger, config);
    }

    /// Idle wandering: tick the timer and redraw the heading uniformly once
    /// the per-agent interval elapses. The only heading entropy while no
    /// target is in sight.
    pub fn wander<R: Rng>(&mut self, rng: &mut R) {
        self.direction_change_timer += 1;
        if self.direction_change_timer >= self.direction_change_interval {
            self.heading = rng.random::<f64>() * TAU;
            self.direction_change_timer = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn view(id: u32, kind: AgentKind, x: f64, y: f64, hunger: f64) -> NeighborView {
        NeighborView {
            id,
            kind,
            position: [x, y],
            hunger,
        }
    }

    #[test]
    fn predation_cycle_is_total_and_irreflexive() {
        use AgentKind::*;
        assert!(Rock.can_eat(Scissors));
        assert!(Scissors.can_eat(Paper));
        assert!(Paper.can_eat(Rock));
        assert!(!Scissors.can_eat(Rock));
        assert!(!Paper.can_eat(Scissors));
        assert!(!Rock.can_eat(Paper));
        for kind in AgentKind::ALL {
            assert!(!kind.can_eat(kind));
            assert_eq!(kind.prey().predator(), kind);
        }
    }

    proptest! {
        #[test]
        fn differing_kinds_have_exactly_one_eater(a in 0usize..3, b in 0usize..3) {
            let (a, b) = (AgentKind::ALL[a], AgentKind::ALL[b]);
            if a == b {
                prop_assert!(!a.can_eat(b) && !b.can_eat(a));
            } else {
                prop_assert!(a.can_eat(b) ^ b.can_eat(a));
            }
        }
    }

    #[test]
    fn speed_boost_bands() {
        let config = SimConfig::default();
        // Starving: approaches 1 + low_hunger_boost_max.
        assert!((Agent::speed_boost(0.0, &config) - 4.0).abs() < 1e-12);
        assert!(Agent::speed_boost(15.0, &config) > 1.0);
        // Band edges: exactly 1 at the standard threshold, the flat cap at
        // and above the initial hunger.
        assert!((Agent::speed_boost(30.0, &config) - 1.0).abs() < 1e-12);
        assert!((Agent::speed_boost(100.0, &config) - 0.6).abs() < 1e-12);
        assert!((Agent::speed_boost(250.0, &config) - 0.6).abs() < 1e-12);
        // Interpolation midpoint.
        let mid = Agent::speed_boost(65.0, &config);
        assert!((mid - 0.8).abs() < 1e-12);
    }

    #[test]
    fn size_is_monotonic_in_hunger_and_floored() {
        let config = SimConfig::default();
        assert_eq!(Agent::size_for_hunger(0.0, &config), 1.0);
        assert_eq!(Agent::size_for_hunger(1.0, &config), 1.0);
        let mut last = 0.0;
        for hunger in [5.0, 25.0, 50.0, 100.0, 200.0] {
            let size = Agent::size_for_hunger(hunger, &config);
            assert!(size >= last);
            last = size;
        }
        assert_eq!(Agent::size_for_hunger(100.0, &config), 6.0);
    }

    #[test]
    fn assess_prefers_highest_hunger_prey_over_nearest() {
        let me = view(0, AgentKind::Rock, 0.0, 0.0, 100.0);
        let views = vec![
            me,
            view(1, AgentKind::Scissors, 1.0, 0.0, 40.0), // near, low value
            view(2, AgentKind::Scissors, 50.0, 0.0, 90.0), // far, high value
        ];
        let a = assess(&me, true, 20.0, &views, &[1, 2]);
        assert_eq!(a.state, BehaviorState::Chasing);
        assert_eq!(a.target, Some(2));
    }

    #[test]
    fn assess_chase_prey_first_trait_orders_priorities() {
        let me = view(0, AgentKind::Rock, 0.0, 0.0, 100.0);
        let views = vec![
            me,
            view(1, AgentKind::Scissors, 10.0, 0.0, 50.0), // prey
            view(2, AgentKind::Paper, -10.0, 0.0, 50.0),   // predator
        ];
        let hunter = assess(&me, true, 20.0, &views, &[1, 2]);
        assert_eq!(hunter.state, BehaviorState::Chasing);
        assert_eq!(hunter.target, Some(1));

        let coward = assess(&me, false, 20.0, &views, &[1, 2]);
        assert_eq!(coward.state, BehaviorState::Running);
        assert_eq!(coward.target, Some(2));
        // Both still record the predator for the emergency-split check.
        assert_eq!(hunter.nearest_predator, coward.nearest_predator);
    }

    #[test]
    fn assess_crazy_targets_same_kind_and_ignores_predators() {
        let me = view(0, AgentKind::Rock, 0.0, 0.0, 10.0);
        let views = vec![
            me,
            view(1, AgentKind::Paper, 1.0, 0.0, 50.0), // predator, nearest of all
            view(2, AgentKind::Rock, 5.0, 0.0, 50.0),  // same kind
            view(3, AgentKind::Scissors, 8.0, 0.0, 50.0), // prey
        ];
        let a = assess(&me, false, 20.0, &views, &[1, 2, 3]);
        assert_eq!(a.state, BehaviorState::Crazy);
        assert_eq!(a.target, Some(2));
    }

    #[test]
    fn assess_crazy_state_holds_even_without_a_target() {
        let me = view(0, AgentKind::Rock, 0.0, 0.0, 5.0);
        let views = vec![me];
        let a = assess(&me, false, 20.0, &views, &[]);
        assert_eq!(a.state, BehaviorState::Crazy);
        assert_eq!(a.target, None);
    }

    #[test]
    fn assess_flee_heading_averages_over_all_predators() {
        let me = view(0, AgentKind::Rock, 0.0, 0.0, 100.0);
        // Predators north-east and south-east: average escape points due west.
        let views = vec![
            me,
            view(1, AgentKind::Paper, 10.0, 10.0, 50.0),
            view(2, AgentKind::Paper, 10.0, -10.0, 50.0),
        ];
        let a = assess(&me, false, 20.0, &views, &[1, 2]);
        let heading = a.flee_heading.expect("predators visible");
        assert!((heading.abs() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn assess_nearest_predator_is_minimum_distance() {
        let me = view(0, AgentKind::Scissors, 0.0, 0.0, 100.0);
        let views = vec![
            me,
            view(1, AgentKind::Rock, 30.0, 0.0, 50.0),
            view(2, AgentKind::Rock, 4.0, 3.0, 50.0),
        ];
        let a = assess(&me, false, 20.0, &views, &[1, 2]);
        let (vi, dist) = a.nearest_predator.expect("predators visible");
        assert_eq!(vi, 2);
        assert!((dist - 5.0).abs() < 1e-12);
    }

    #[test]
    fn spawned_traits_stay_within_variation_bands() {
        let config = SimConfig::default();
        let mut rng = crate::rng::create_rng(7);
        for i in 0..200 {
            let agent = Agent::spawn(i, AgentKind::Paper, [0.0, 0.0], &config, &mut rng);
            assert!(agent.sight_radius >= config.sight_radius * 0.8);
            assert!(agent.sight_radius <= config.sight_radius * 1.2);
            assert!(agent.reproduction_interval >= 288 && agent.reproduction_interval <= 672);
            assert!(agent.direction_change_interval >= 112);
            assert!(agent.direction_change_interval <= 208);
            assert!(agent.heading >= 0.0 && agent.heading < TAU);
            assert_eq!(agent.hunger, config.initial_hunger);
        }
    }

    #[test]
    fn wander_redraws_heading_when_interval_elapses() {
        let config = SimConfig::default();
        let mut rng = crate::rng::create_rng(3);
        let mut agent = Agent::spawn(0, AgentKind::Rock, [0.0, 0.0], &config, &mut rng);
        agent.direction_change_interval = 3;
        agent.heading = -1.0; // sentinel outside the redraw range
        agent.wander(&mut rng);
        agent.wander(&mut rng);
        assert_eq!(agent.direction_change_timer, 2);
        assert_eq!(agent.heading, -1.0);
        agent.wander(&mut rng);
        assert_eq!(agent.direction_change_timer, 0);
        assert!(agent.heading >= 0.0 && agent.heading < TAU);
    }
}
