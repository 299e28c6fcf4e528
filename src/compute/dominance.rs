//! Pareto dominance comparators.

use crate::schema::Solution;

/// Outcome of comparing two solutions for dominance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominanceOrdering {
    /// The left solution dominates the right one.
    Dominates,
    /// The left solution is dominated by the right one.
    DominatedBy,
    /// Neither dominates the other.
    NonDominated,
}

impl DominanceOrdering {
    /// Swap the roles of the two compared solutions.
    pub fn reverse(self) -> Self {
        match self {
            Self::Dominates => Self::DominatedBy,
            Self::DominatedBy => Self::Dominates,
            Self::NonDominated => Self::NonDominated,
        }
    }
}

/// Dominance relation used by archives.
pub trait Dominance: Send + Sync {
    /// Compare `a` against `b`.
    fn compare(&self, a: &Solution, b: &Solution) -> DominanceOrdering;
}

/// Pareto dominance over objective vectors (minimization).
///
/// Solutions annotated with a constraint violation are ranked first by
/// feasibility: a feasible solution dominates an infeasible one, and between
/// two infeasible solutions the smaller violation wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParetoDominance;

impl Dominance for ParetoDominance {
    fn compare(&self, a: &Solution, b: &Solution) -> DominanceOrdering {
        let (va, vb) = (a.constraint_violation(), b.constraint_violation());
        match (va < 0.0, vb < 0.0) {
            (false, true) => DominanceOrdering::Dominates,
            (true, false) => DominanceOrdering::DominatedBy,
            (true, true) if va > vb => DominanceOrdering::Dominates,
            (true, true) if va < vb => DominanceOrdering::DominatedBy,
            _ => compare_objectives(&a.objectives, &b.objectives),
        }
    }
}

/// Compare two objective vectors under minimization.
pub fn compare_objectives(a: &[f64], b: &[f64]) -> DominanceOrdering {
    debug_assert_eq!(a.len(), b.len());

    let mut a_better = false;
    let mut b_better = false;
    for (&x, &y) in a.iter().zip(b) {
        if x < y {
            a_better = true;
        } else if y < x {
            b_better = true;
        }
        if a_better && b_better {
            return DominanceOrdering::NonDominated;
        }
    }

    match (a_better, b_better) {
        (true, false) => DominanceOrdering::Dominates,
        (false, true) => DominanceOrdering::DominatedBy,
        _ => DominanceOrdering::NonDominated,
    }
}

/// Returns `true` if objective vector `a` dominates `b`.
#[inline]
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    compare_objectives(a, b) == DominanceOrdering::Dominates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CONSTRAINT_VIOLATION;

    #[test]
    fn test_compare_objectives() {
        assert_eq!(
            compare_objectives(&[1.0, 2.0], &[2.0, 3.0]),
            DominanceOrdering::Dominates
        );
        assert_eq!(
            compare_objectives(&[2.0, 3.0], &[1.0, 2.0]),
            DominanceOrdering::DominatedBy
        );
        assert_eq!(
            compare_objectives(&[1.0, 3.0], &[2.0, 2.0]),
            DominanceOrdering::NonDominated
        );
        // Weakly better in one objective is enough
        assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
        // Equal vectors do not dominate each other
        assert_eq!(
            compare_objectives(&[1.0, 1.0], &[1.0, 1.0]),
            DominanceOrdering::NonDominated
        );
    }

    #[test]
    fn test_feasible_dominates_infeasible() {
        let feasible = Solution::from_objectives(vec![5.0, 5.0]);
        let mut infeasible = Solution::from_objectives(vec![1.0, 1.0]);
        infeasible.set_attribute(CONSTRAINT_VIOLATION, -0.1);

        let cmp = ParetoDominance;
        assert_eq!(
            cmp.compare(&feasible, &infeasible),
            DominanceOrdering::Dominates
        );
        assert_eq!(
            cmp.compare(&infeasible, &feasible),
            DominanceOrdering::DominatedBy
        );
    }

    #[test]
    fn test_smaller_violation_wins() {
        let mut a = Solution::from_objectives(vec![5.0, 5.0]);
        a.set_attribute(CONSTRAINT_VIOLATION, -0.1);
        let mut b = Solution::from_objectives(vec![1.0, 1.0]);
        b.set_attribute(CONSTRAINT_VIOLATION, -2.0);

        assert_eq!(ParetoDominance.compare(&a, &b), DominanceOrdering::Dominates);
        assert_eq!(
            ParetoDominance.compare(&a, &b).reverse(),
            ParetoDominance.compare(&b, &a)
        );
    }
}
