//! Three-dimensional k-d tree for nearest-neighbor queries.
//!
//! Sky positions are indexed as unit vectors so that chord distance is a
//! monotonic function of angular separation and the RA wrap at 0/360 degrees
//! needs no special handling.

/// A neighbor returned by a query: index into the build slice and the
/// squared Euclidean distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub dist_sq: f64,
}

impl Neighbor {
    /// Ordering used by every query: distance first, then lowest index.
    fn is_better_than(&self, other: &Neighbor) -> bool {
        match self.dist_sq.total_cmp(&other.dist_sq) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Equal => self.index < other.index,
            std::cmp::Ordering::Greater => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    point_idx: usize,
    left: Option<usize>,
    right: Option<usize>,
    axis: usize,
}

/// Balanced k-d tree over `[f64; 3]` points, built with median splits.
#[derive(Debug)]
pub struct KdTree3 {
    nodes: Vec<Node>,
    points: Vec<[f64; 3]>,
}

fn distance_squared(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl KdTree3 {
    /// Build a tree from `points`. Returns `None` when `points` is empty.
    pub fn build(points: &[[f64; 3]]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let points = points.to_vec();
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        Self::build_recursive(&points, &mut indices, 0, &mut nodes);

        Some(Self { nodes, points })
    }

    fn build_recursive(
        points: &[[f64; 3]],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let axis = depth % 3;
        indices.sort_by(|&a, &b| {
            points[a][axis]
                .total_cmp(&points[b][axis])
                .then(a.cmp(&b))
        });

        let median = indices.len() / 2;
        let node_idx = nodes.len();
        nodes.push(Node {
            point_idx: indices[median],
            left: None,
            right: None,
            axis,
        });

        let (left_indices, right_part) = indices.split_at_mut(median);
        let right_indices = &mut right_part[1..];

        let left = Self::build_recursive(points, left_indices, depth + 1, nodes);
        let right = Self::build_recursive(points, right_indices, depth + 1, nodes);
        nodes[node_idx].left = left;
        nodes[node_idx].right = right;

        Some(node_idx)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point stored at `index` (index into the build slice).
    pub fn point(&self, index: usize) -> Option<&[f64; 3]> {
        self.points.get(index)
    }

    /// Nearest point to `query`. Equidistant candidates resolve to the
    /// lowest build index.
    pub fn nearest(&self, query: &[f64; 3]) -> Option<Neighbor> {
        let mut best = None;
        if !self.nodes.is_empty() {
            self.nearest_recursive(0, query, &mut best);
        }
        best
    }

    fn nearest_recursive(&self, node_idx: usize, query: &[f64; 3], best: &mut Option<Neighbor>) {
        let node = &self.nodes[node_idx];
        let point = &self.points[node.point_idx];

        let candidate = Neighbor {
            index: node.point_idx,
            dist_sq: distance_squared(query, point),
        };
        if best.map_or(true, |b| candidate.is_better_than(&b)) {
            *best = Some(candidate);
        }

        let diff = query[node.axis] - point[node.axis];
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(first_idx) = first {
            self.nearest_recursive(first_idx, query, best);
        }

        // `<=` keeps equidistant points on the far side reachable for the tie-break
        if let Some(second_idx) = second {
            if best.map_or(true, |b| diff * diff <= b.dist_sq) {
                self.nearest_recursive(second_idx, query, best);
            }
        }
    }

    /// All points within `radius` of `query`, sorted by distance then index.
    pub fn within_radius(&self, query: &[f64; 3], radius: f64) -> Vec<Neighbor> {
        let mut results = Vec::new();
        if !self.nodes.is_empty() {
            self.within_radius_recursive(0, query, radius * radius, &mut results);
        }
        results.sort_by(|a, b| a.dist_sq.total_cmp(&b.dist_sq).then(a.index.cmp(&b.index)));
        results
    }

    fn within_radius_recursive(
        &self,
        node_idx: usize,
        query: &[f64; 3],
        radius_sq: f64,
        results: &mut Vec<Neighbor>,
    ) {
        let node = &self.nodes[node_idx];
        let point = &self.points[node.point_idx];

        let dist_sq = distance_squared(query, point);
        if dist_sq <= radius_sq {
            results.push(Neighbor {
                index: node.point_idx,
                dist_sq,
            });
        }

        let diff = query[node.axis] - point[node.axis];
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(first_idx) = first {
            self.within_radius_recursive(first_idx, query, radius_sq, results);
        }
        if let Some(second_idx) = second {
            if diff * diff <= radius_sq {
                self.within_radius_recursive(second_idx, query, radius_sq, results);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn brute_force_nearest(points: &[[f64; 3]], query: &[f64; 3]) -> Neighbor {
        let mut best = Neighbor {
            index: 0,
            dist_sq: distance_squared(query, &points[0]),
        };
        for (index, p) in points.iter().enumerate().skip(1) {
            let candidate = Neighbor {
                index,
                dist_sq: distance_squared(query, p),
            };
            if candidate.is_better_than(&best) {
                best = candidate;
            }
        }
        best
    }

    #[test]
    fn test_empty_build_returns_none() {
        assert!(KdTree3::build(&[]).is_none());
    }

    #[test]
    fn test_single_point() {
        let tree = KdTree3::build(&[[1.0, 0.0, 0.0]]).unwrap();
        assert_eq!(tree.len(), 1);
        let n = tree.nearest(&[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(n.index, 0);
        assert!((n.dist_sq - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let points: Vec<[f64; 3]> = (0..500)
            .map(|_| [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()])
            .collect();
        let tree = KdTree3::build(&points).unwrap();

        for _ in 0..200 {
            let q = [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()];
            let expected = brute_force_nearest(&points, &q);
            let found = tree.nearest(&q).unwrap();
            assert_eq!(found.index, expected.index);
        }
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        // Duplicate points at several indices, plus a symmetric pair
        let points = vec![
            [0.5, 0.5, 0.5],
            [1.0, 0.0, 0.0],
            [0.5, 0.5, 0.5],
            [-1.0, 0.0, 0.0],
            [0.5, 0.5, 0.5],
        ];
        let tree = KdTree3::build(&points).unwrap();
        assert_eq!(tree.nearest(&[0.5, 0.5, 0.5]).unwrap().index, 0);
        assert_eq!(tree.nearest(&[0.0, 0.0, 0.0]).unwrap().index, 1);
    }

    #[test]
    fn test_within_radius() {
        let points = vec![
            [0.0, 0.0, 0.0],
            [0.1, 0.0, 0.0],
            [0.0, 0.2, 0.0],
            [1.0, 1.0, 1.0],
        ];
        let tree = KdTree3::build(&points).unwrap();
        let hits = tree.within_radius(&[0.0, 0.0, 0.0], 0.15);
        let indices: Vec<usize> = hits.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
