use crate::world::World;
use std::f64::consts::PI;

impl World {
    /// Phase 2: advance every agent along its heading, bounce off the walls,
    /// drain hunger, and fire timer-driven reproduction. Starved agents are
    /// marked dead here and skip the rest of their update. Children buffered
    /// during phase 1 are not in `agents` yet and do not move this tick.
    pub(in crate::world) fn run_movement_phase(&mut self) {
        let width = self.config.bounds_width;
        let height = self.config.bounds_height;
        let decay = self.config.hunger_decay_per_tick;

        for i in 0..self.agents.len() {
            if !self.agents[i].alive {
                continue;
            }
            {
                let agent = &mut self.agents[i];
                agent.position[0] += agent.heading.cos() * agent.boost;
                agent.position[1] += agent.heading.sin() * agent.boost;
                // Mirror the heading around the wall axis. The bounce band
                // uses the agent's current size, the clamp the base size.
                if agent.position[0] <= 0.0 || agent.position[0] >= width - agent.size {
                    agent.heading = PI - agent.heading;
                }
                if agent.position[1] <= 0.0 || agent.position[1] >= height - agent.size {
                    agent.heading = -agent.heading;
                }
                agent.hunger -= decay;
            }
            self.agents[i].position = self.clamp_position(self.agents[i].position);

            if self.agents[i].hunger <= 0.0 {
                self.mark_dead(i);
                continue;
            }

            self.agents[i].reproduction_timer += 1;
            if self.agents[i].reproduction_timer >= self.agents[i].reproduction_interval
                && self.agents[i].hunger >= self.config.reproduction_hunger_threshold
            {
                self.timer_reproduce(i);
            }
        }
    }

    /// Timer-driven reproduction: the child starts at full initial hunger,
    /// the parent pays the flat cost and restarts its timer. If the
    /// population cap blocks the spawn, the timer keeps running so the next
    /// free slot is taken immediately.
    fn timer_reproduce(&mut self, parent_index: usize) {
        if self.spawn_child(parent_index).is_none() {
            return;
        }
        let cost = self.config.reproduction_hunger_cost;
        let agent = &mut self.agents[parent_index];
        agent.hunger -= cost;
        agent.reproduction_timer = 0;
    }
}
