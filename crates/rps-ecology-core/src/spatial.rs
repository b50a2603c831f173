use crate::agent::NeighborView;
use rstar::{RTree, RTreeObject, AABB};

/// Euclidean distance between two positions.
pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Strict containment test: the radius itself is excluded.
pub fn within_radius(origin: [f64; 2], radius: f64, point: [f64; 2]) -> bool {
    distance(origin, point) < radius
}

/// Gate for pairwise interaction. `interaction_radius` is fixed by the
/// configuration (1.5x the base agent size), deliberately independent of
/// either agent's individual size or sight.
pub fn are_close(a: [f64; 2], b: [f64; 2], interaction_radius: f64) -> bool {
    distance(a, b) < interaction_radius
}

/// Lightweight position-only entry for the per-tick spatial index. `index`
/// points back into the decision-phase view slice.
#[derive(Clone, Debug)]
pub struct AgentLocation {
    pub index: usize,
    pub position: [f64; 2],
}

impl RTreeObject for AgentLocation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// Build an R*-tree over the decision-phase views via bulk_load (O(n log n)).
pub fn build_index(views: &[NeighborView]) -> RTree<AgentLocation> {
    let locations: Vec<AgentLocation> = views
        .iter()
        .enumerate()
        .map(|(index, v)| AgentLocation {
            index,
            position: v.position,
        })
        .collect();
    RTree::bulk_load(locations)
}

/// View indices strictly within `radius` of `center`, excluding
/// `self_index`. Envelope query first, then exact Euclidean filter.
pub fn visible_neighbors(
    tree: &RTree<AgentLocation>,
    center: [f64; 2],
    radius: f64,
    self_index: usize,
) -> Vec<usize> {
    let envelope = AABB::from_corners(
        [center[0] - radius, center[1] - radius],
        [center[0] + radius, center[1] + radius],
    );
    let mut result: Vec<usize> = tree
        .locate_in_envelope(&envelope)
        .filter(|loc| loc.index != self_index && within_radius(center, radius, loc.position))
        .map(|loc| loc.index)
        .collect();
    result.sort_unstable();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentKind;

    fn make_view(id: u32, x: f64, y: f64) -> NeighborView {
        NeighborView {
            id,
            kind: AgentKind::Rock,
            position: [x, y],
            hunger: 100.0,
        }
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance([0.0, 0.0], [3.0, 4.0]), 5.0);
        assert_eq!(distance([1.0, 1.0], [1.0, 1.0]), 0.0);
    }

    #[test]
    fn within_radius_excludes_the_radius_itself() {
        assert!(within_radius([0.0, 0.0], 5.0, [3.0, 3.9]));
        assert!(!within_radius([0.0, 0.0], 5.0, [3.0, 4.0]));
        assert!(!within_radius([0.0, 0.0], 5.0, [5.0, 0.1]));
    }

    #[test]
    fn are_close_uses_strict_comparison() {
        assert!(are_close([0.0, 0.0], [8.9, 0.0], 9.0));
        assert!(!are_close([0.0, 0.0], [9.0, 0.0], 9.0));
    }

    #[test]
    fn visible_neighbors_finds_points_within_radius() {
        let views = vec![
            make_view(0, 5.0, 5.0),
            make_view(1, 6.0, 5.0),
            make_view(2, 50.0, 50.0),
        ];
        let tree = build_index(&views);
        assert_eq!(visible_neighbors(&tree, [5.0, 5.0], 2.0, usize::MAX), vec![0, 1]);
    }

    #[test]
    fn visible_neighbors_excludes_self() {
        let views = vec![make_view(0, 5.0, 5.0), make_view(1, 6.0, 5.0)];
        let tree = build_index(&views);
        assert_eq!(visible_neighbors(&tree, [5.0, 5.0], 2.0, 0), vec![1]);
    }

    #[test]
    fn visible_neighbors_excludes_the_exact_radius() {
        // Corner of the envelope but outside the circle, and a point at
        // exactly the radius: both must be filtered out.
        let views = vec![
            make_view(0, 0.0, 0.0),
            make_view(1, 1.9, 1.9),
            make_view(2, 2.0, 0.0),
        ];
        let tree = build_index(&views);
        assert_eq!(visible_neighbors(&tree, [0.0, 0.0], 2.0, 0), Vec::<usize>::new());
    }

    #[test]
    fn visible_neighbors_agrees_with_brute_force() {
        let mut rng = crate::rng::create_rng(99);
        use rand::Rng;
        let views: Vec<NeighborView> = (0..300)
            .map(|i| {
                make_view(
                    i,
                    rng.random::<f64>() * 200.0,
                    rng.random::<f64>() * 200.0,
                )
            })
            .collect();
        let tree = build_index(&views);
        for self_index in [0usize, 17, 150, 299] {
            let center = views[self_index].position;
            let expected: Vec<usize> = views
                .iter()
                .enumerate()
                .filter(|(i, v)| *i != self_index && within_radius(center, 30.0, v.position))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(visible_neighbors(&tree, center, 30.0, self_index), expected);
        }
    }
}
