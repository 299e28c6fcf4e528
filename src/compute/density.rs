//! Density estimators used to truncate bounded archives.

use crate::schema::CROWDING_DISTANCE;

/// Estimates how isolated each point of a set is in objective space.
///
/// Larger values mean more diverse. The archive evicts the member with the
/// smallest value.
pub trait DensityEstimator: Send + Sync {
    /// Attribute key under which values are annotated on solutions.
    fn attribute(&self) -> &'static str;

    /// Compute one density value per objective vector, in input order.
    fn compute(&self, objectives: &[&[f64]]) -> Vec<f64>;
}

/// NSGA-II crowding distance.
///
/// Boundary points of each objective get infinite distance; interior points
/// accumulate the normalized gap between their neighbours. Sets of one or two
/// points are all boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrowdingDistance;

impl DensityEstimator for CrowdingDistance {
    fn attribute(&self) -> &'static str {
        CROWDING_DISTANCE
    }

    fn compute(&self, objectives: &[&[f64]]) -> Vec<f64> {
        crowding_distance(objectives)
    }
}

/// Crowding distance of each point in `objectives`.
pub fn crowding_distance(objectives: &[&[f64]]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];
    let mut indices: Vec<usize> = (0..n).collect();

    for obj in 0..m {
        // Stable sort keeps equal values in input order
        indices.sort_by(|&a, &b| objectives[a][obj].total_cmp(&objectives[b][obj]));

        let first = indices[0];
        let last = indices[n - 1];
        distances[first] = f64::INFINITY;
        distances[last] = f64::INFINITY;

        let range = objectives[last][obj] - objectives[first][obj];
        if range <= 0.0 {
            continue;
        }

        for w in 1..(n - 1) {
            let prev = objectives[indices[w - 1]][obj];
            let next = objectives[indices[w + 1]][obj];
            distances[indices[w]] += (next - prev) / range;
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(raw: &[[f64; 2]]) -> Vec<Vec<f64>> {
        raw.iter().map(|p| p.to_vec()).collect()
    }

    fn as_slices(points: &[Vec<f64>]) -> Vec<&[f64]> {
        points.iter().map(Vec::as_slice).collect()
    }

    #[test]
    fn test_small_sets_are_boundary() {
        let pts = points(&[[1.0, 2.0], [2.0, 1.0]]);
        let cd = crowding_distance(&as_slices(&pts));
        assert!(cd.iter().all(|d| d.is_infinite()));
        assert!(crowding_distance(&[]).is_empty());
    }

    #[test]
    fn test_interior_points() {
        let pts = points(&[[1.0, 5.0], [2.0, 4.0], [3.0, 3.0], [4.0, 2.0]]);
        let cd = crowding_distance(&as_slices(&pts));

        assert!(cd[0].is_infinite());
        assert!(cd[3].is_infinite());
        assert!((cd[1] - 4.0 / 3.0).abs() < 1e-12);
        assert!((cd[2] - 4.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_uneven_spacing() {
        let pts = points(&[[1.0, 5.0], [3.0, 3.0], [4.0, 2.0], [5.0, 1.0]]);
        let cd = crowding_distance(&as_slices(&pts));

        // (3,3) has wider gaps around it than (4,2)
        assert!((cd[1] - 1.5).abs() < 1e-12);
        assert!((cd[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_does_not_panic() {
        let mut raw: Vec<[f64; 2]> = (0..64).map(|i| [i as f64, 64.0 - i as f64]).collect();
        raw[10] = [f64::NAN, 1.0];
        raw[40] = [2.0, f64::NAN];
        let pts = points(&raw);

        let cd = crowding_distance(&as_slices(&pts));
        assert_eq!(cd.len(), 64);
    }

    #[test]
    fn test_degenerate_objective() {
        let pts = points(&[[1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]);
        let cd = crowding_distance(&as_slices(&pts));
        assert!((cd[1] - 1.0).abs() < 1e-12);
    }
}
