//! Inverted Generational Distance.

use crate::schema::Solution;

/// Mean distance from each reference point to its nearest candidate point.
///
/// Lower is better; `0.0` means the candidate front covers every reference
/// point exactly.
#[derive(Debug, Clone)]
pub struct InvertedGenerationalDistance {
    reference: Vec<Vec<f64>>,
}

impl InvertedGenerationalDistance {
    /// Build the indicator from a reference front. Only objectives are kept.
    pub fn new(reference_front: &[Solution]) -> Self {
        Self {
            reference: reference_front
                .iter()
                .map(|s| s.objectives.clone())
                .collect(),
        }
    }

    pub fn from_points(reference: Vec<Vec<f64>>) -> Self {
        Self { reference }
    }

    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    /// IGD of `front` against the reference front.
    ///
    /// An empty reference yields `0.0`; an empty candidate front against a
    /// non-empty reference yields infinity.
    pub fn compute(&self, front: &[Solution]) -> f64 {
        if self.reference.is_empty() {
            return 0.0;
        }

        let total: f64 = self
            .reference
            .iter()
            .map(|r| {
                front
                    .iter()
                    .map(|s| euclidean(r, &s.objectives))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum();

        total / self.reference.len() as f64
    }
}

#[inline]
fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front(points: &[[f64; 2]]) -> Vec<Solution> {
        points
            .iter()
            .map(|p| Solution::from_objectives(p.to_vec()))
            .collect()
    }

    #[test]
    fn test_identical_fronts() {
        let reference = front(&[[0.0, 1.0], [0.5, 0.5], [1.0, 0.0]]);
        let igd = InvertedGenerationalDistance::new(&reference);
        assert_eq!(igd.compute(&reference), 0.0);
    }

    #[test]
    fn test_known_distance() {
        let reference = front(&[[0.0, 0.0], [1.0, 0.0]]);
        let candidate = front(&[[0.0, 1.0]]);
        let igd = InvertedGenerationalDistance::new(&reference);

        // Distances: 1 and sqrt(2)
        let expected = (1.0 + 2f64.sqrt()) / 2.0;
        assert!((igd.compute(&candidate) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_inputs() {
        let empty = InvertedGenerationalDistance::from_points(Vec::new());
        assert_eq!(empty.compute(&front(&[[1.0, 1.0]])), 0.0);

        let igd = InvertedGenerationalDistance::new(&front(&[[1.0, 1.0]]));
        assert!(igd.compute(&[]).is_infinite());
    }

    #[test]
    fn test_asymmetry() {
        let a = front(&[[0.0, 0.0]]);
        let b = front(&[[0.0, 0.0], [10.0, 10.0]]);

        assert_eq!(InvertedGenerationalDistance::new(&a).compute(&b), 0.0);
        assert!(InvertedGenerationalDistance::new(&b).compute(&a) > 0.0);
    }
}
