//! Positional cross-matching on the celestial sphere

use shared::algo::KdTree3;
use shared::units::{Angle, AngleExt};
use skycat::Equatorial;

/// Nearest catalog entry to a query position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyMatch {
    pub index: usize,
    pub separation: Angle,
}

impl SkyMatch {
    /// Whether the separation is strictly inside `radius`.
    pub fn within(&self, radius: Angle) -> bool {
        self.separation < radius
    }
}

/// Nearest-neighbor index over a set of sky positions.
#[derive(Debug)]
pub struct SkyIndex {
    tree: Option<KdTree3>,
    positions: Vec<Equatorial>,
}

impl SkyIndex {
    /// Index positions given as parallel RA/Dec arrays in degrees.
    pub fn from_degrees(ra: &[f64], dec: &[f64]) -> Self {
        let positions: Vec<Equatorial> = ra
            .iter()
            .zip(dec)
            .map(|(&ra, &dec)| Equatorial::from_degrees(ra, dec))
            .collect();
        let points: Vec<[f64; 3]> = positions
            .iter()
            .map(|p| {
                let v = p.to_unit_vector();
                [v.x, v.y, v.z]
            })
            .collect();

        Self {
            tree: KdTree3::build(&points),
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Nearest indexed position; ties go to the lowest index.
    pub fn nearest(&self, position: &Equatorial) -> Option<SkyMatch> {
        let tree = self.tree.as_ref()?;
        let v = position.to_unit_vector();
        let neighbor = tree.nearest(&[v.x, v.y, v.z])?;
        Some(SkyMatch {
            index: neighbor.index,
            separation: position.angular_distance(&self.positions[neighbor.index]),
        })
    }

    /// Nearest indexed position strictly closer than `radius`.
    pub fn nearest_within(&self, position: &Equatorial, radius: Angle) -> Option<SkyMatch> {
        self.nearest(position).filter(|m| m.within(radius))
    }
}

/// For every A position, the nearest B position and its separation.
///
/// The relation is asymmetric: A entries may share a B match. Returns an empty
/// vector when B is empty.
pub fn match_to_catalog(
    a_ra: &[f64],
    a_dec: &[f64],
    b_ra: &[f64],
    b_dec: &[f64],
) -> Vec<SkyMatch> {
    let index = SkyIndex::from_degrees(b_ra, b_dec);
    if index.is_empty() {
        return Vec::new();
    }
    a_ra.iter()
        .zip(a_dec)
        .filter_map(|(&ra, &dec)| index.nearest(&Equatorial::from_degrees(ra, dec)))
        .collect()
}

/// Default acceptance radius as an [`Angle`].
pub fn default_match_radius() -> Angle {
    Angle::from_arcseconds(super::MATCH_RADIUS_ARCSEC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const ARCSEC: f64 = 1.0 / 3600.0;

    #[test]
    fn test_nearest_with_separation() {
        let b_ra = [10.0, 10.0 + 0.3 * ARCSEC, 10.0 + 5.0 * ARCSEC];
        let b_dec = [-20.0, -20.0, -20.0];
        let matches = match_to_catalog(&[10.0 + 0.25 * ARCSEC], &[-20.0], &b_ra, &b_dec);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 1);
        let expected = 0.05 * (20.0f64).to_radians().cos();
        assert_relative_eq!(matches[0].separation.as_arcseconds(), expected, epsilon = 1e-6);
        assert!(matches[0].within(default_match_radius()));
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let b_ra: Vec<f64> = (0..300).map(|_| rng.gen_range(149.9..150.1)).collect();
        let b_dec: Vec<f64> = (0..300).map(|_| rng.gen_range(2.1..2.3)).collect();
        let a_ra: Vec<f64> = (0..50).map(|_| rng.gen_range(149.9..150.1)).collect();
        let a_dec: Vec<f64> = (0..50).map(|_| rng.gen_range(2.1..2.3)).collect();

        let matches = match_to_catalog(&a_ra, &a_dec, &b_ra, &b_dec);
        assert_eq!(matches.len(), a_ra.len());

        for (i, m) in matches.iter().enumerate() {
            let query = Equatorial::from_degrees(a_ra[i], a_dec[i]);
            let best = (0..b_ra.len())
                .map(|j| query.angular_distance(&Equatorial::from_degrees(b_ra[j], b_dec[j])))
                .fold(f64::INFINITY, |acc, d| acc.min(d.as_arcseconds()));
            assert_relative_eq!(m.separation.as_arcseconds(), best, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ra_wrap() {
        let matches = match_to_catalog(&[359.9999], &[0.0], &[180.0, 0.0001], &[0.0, 0.0]);
        assert_eq!(matches[0].index, 1);
        assert_relative_eq!(matches[0].separation.as_arcseconds(), 0.72, epsilon = 1e-6);
    }

    #[test]
    fn test_duplicate_positions_pick_lowest_index() {
        let index = SkyIndex::from_degrees(&[50.0, 50.0, 50.0], &[10.0, 10.0, 10.0]);
        let m = index.nearest(&Equatorial::from_degrees(50.0, 10.0)).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn test_radius_is_exclusive() {
        let index = SkyIndex::from_degrees(&[0.0], &[0.0]);
        let query = Equatorial::from_degrees(0.0, 0.5 * ARCSEC);
        assert!(index.nearest_within(&query, Angle::from_arcseconds(0.6)).is_some());
        assert!(index.nearest_within(&query, Angle::from_arcseconds(0.4)).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(match_to_catalog(&[1.0], &[1.0], &[], &[]).is_empty());
        assert!(SkyIndex::from_degrees(&[], &[]).nearest(&Equatorial::from_degrees(1.0, 1.0)).is_none());
    }
}
