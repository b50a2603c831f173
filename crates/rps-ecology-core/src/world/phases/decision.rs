use crate::agent::{self, BehaviorState, NeighborView};
use crate::spatial;
use crate::world::World;
use std::f64::consts::PI;

impl World {
    /// Phase 1: every agent assesses the same pre-tick population state and
    /// picks its behavior state, target, and heading. No position, hunger,
    /// or liveness changes happen here; the only side effects besides the
    /// agents' own decision fields are buffered emergency-split children.
    pub(in crate::world) fn run_decision_phase(&mut self) {
        let views: Vec<NeighborView> = self
            .agents
            .iter()
            .map(|a| NeighborView {
                id: a.id,
                kind: a.kind,
                position: a.position,
                hunger: a.hunger,
            })
            .collect();
        let tree = spatial::build_index(&views);

        for i in 0..self.agents.len() {
            self.agents[i].begin_decision(&self.config);
            let me = views[i];
            let sight = self.agents[i].sight_radius;
            let chase_prey_first = self.agents[i].chase_prey_first;
            let visible = spatial::visible_neighbors(&tree, me.position, sight, i);
            let assessment = agent::assess(
                &me,
                chase_prey_first,
                self.config.crazy_hunger_threshold,
                &views,
                &visible,
            );

            // The group-flee bias lands first; facing a concrete target then
            // overrides it.
            if let Some(heading) = assessment.flee_heading {
                self.agents[i].heading = heading;
            }
            self.agents[i].state = assessment.state;
            self.agents[i].target = assessment.target.map(|vi| views[vi].id);
            match assessment.target {
                Some(vi) => {
                    let toward = (views[vi].position[1] - me.position[1])
                        .atan2(views[vi].position[0] - me.position[0]);
                    self.agents[i].heading = if assessment.state == BehaviorState::Running {
                        toward + PI
                    } else {
                        toward
                    };
                }
                None => self.agents[i].wander(&mut self.rng),
            }

            if self.agents[i].hunger >= self.config.split_min_hunger {
                if let Some((_, dist)) = assessment.nearest_predator {
                    if dist < self.config.split_avoidance_radius {
                        self.emergency_split(i);
                    }
                }
            }
        }
    }

    /// A well-fed agent cornered by a predator splits: parent and child each
    /// keep half the parent's hunger, so the pair is worth no more than the
    /// parent was.
    fn emergency_split(&mut self, parent_index: usize) {
        let Some(child_index) = self.spawn_child(parent_index) else {
            return;
        };
        let half = self.agents[parent_index].hunger / 2.0;
        self.agents[parent_index].hunger = half;
        self.pending_spawns[child_index].hunger = half;
    }
}
