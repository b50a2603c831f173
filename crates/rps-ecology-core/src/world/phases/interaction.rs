use crate::agent::BehaviorState;
use crate::spatial;
use crate::world::World;

impl World {
    /// Phase 3: resolve every close pair once, in index order. Children
    /// flushed after movement participate; agents marked dead earlier in the
    /// tick (or by an earlier pair) are skipped, so one agent can eat
    /// several neighbors in a single tick but nothing eats a corpse.
    pub(in crate::world) fn run_interaction_phase(&mut self) {
        let radius = self.config.interaction_radius();
        let count = self.agents.len();
        for i in 0..count {
            for j in (i + 1)..count {
                if !self.agents[i].alive {
                    break;
                }
                if !self.agents[j].alive {
                    continue;
                }
                if !spatial::are_close(self.agents[i].position, self.agents[j].position, radius) {
                    continue;
                }
                self.resolve_pair(i, j);
            }
        }
    }

    fn resolve_pair(&mut self, i: usize, j: usize) {
        let (kind_i, kind_j) = (self.agents[i].kind, self.agents[j].kind);
        if kind_i.can_eat(kind_j) {
            self.consume(i, j, self.config.prey_hunger_factor);
        } else if kind_j.can_eat(kind_i) {
            self.consume(j, i, self.config.prey_hunger_factor);
        } else {
            // Same kind: a conflict needs exactly one frenzied agent, and
            // only costs it its life when it is also the weaker one.
            let crazy_i = self.agents[i].state == BehaviorState::Crazy;
            let crazy_j = self.agents[j].state == BehaviorState::Crazy;
            let (hunger_i, hunger_j) = (self.agents[i].hunger, self.agents[j].hunger);
            if crazy_i && !crazy_j && hunger_i < hunger_j {
                self.consume(j, i, self.config.same_kind_hunger_factor);
            } else if crazy_j && !crazy_i && hunger_j < hunger_i {
                self.consume(i, j, self.config.same_kind_hunger_factor);
            }
        }
    }

    /// `eaten` dies in place; `eater` gains hunger proportional to the
    /// meal's remaining hunger, floored at the configured minimum.
    fn consume(&mut self, eater: usize, eaten: usize, factor: f64) {
        let gain = (self.agents[eaten].hunger * factor).max(self.config.min_eat_gain);
        self.agents[eater].hunger += gain;
        self.mark_dead(eaten);
    }
}
