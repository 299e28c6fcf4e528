//! Bounded archive of non-dominated solutions.
//!
//! Members are kept in insertion order. When an insertion pushes the archive
//! over capacity, the density estimator is recomputed over all members and the
//! least diverse one is evicted; ties go to the earliest inserted member.

use crate::schema::{Population, Solution};

use super::density::{CrowdingDistance, DensityEstimator};
use super::dominance::{Dominance, DominanceOrdering, ParetoDominance};

/// Archive member with its insertion sequence number.
#[derive(Debug, Clone)]
struct Member {
    solution: Solution,
    sequence: u64,
}

/// Bounded set of mutually non-dominated solutions.
///
/// Owned by a single algorithm instance; wrap it in a mutex if several
/// threads insert concurrently.
#[derive(Debug, Clone)]
pub struct BoundedArchive<C = ParetoDominance, E = CrowdingDistance> {
    members: Vec<Member>,
    capacity: usize,
    comparator: C,
    estimator: E,
    next_sequence: u64,
}

/// Archive using Pareto dominance and crowding-distance truncation.
pub type CrowdingDistanceArchive = BoundedArchive<ParetoDominance, CrowdingDistance>;

impl CrowdingDistanceArchive {
    /// Create an archive holding at most `capacity` solutions.
    pub fn new(capacity: usize) -> Self {
        Self::with_parts(capacity, ParetoDominance, CrowdingDistance)
    }
}

impl<C: Dominance, E: DensityEstimator> BoundedArchive<C, E> {
    /// Create an archive with a custom comparator and density estimator.
    pub fn with_parts(capacity: usize, comparator: C, estimator: E) -> Self {
        Self {
            members: Vec::with_capacity(capacity.saturating_add(1)),
            capacity,
            comparator,
            estimator,
            next_sequence: 0,
        }
    }

    /// Attempt to insert a solution.
    ///
    /// Returns `true` if the solution is a member once the call returns.
    /// Rejected when unevaluated, when its objective count differs from the
    /// members', or when dominated by (or identical in objectives to) a
    /// member; members it dominates are removed before the capacity check.
    pub fn add(&mut self, solution: Solution) -> bool {
        if !solution.is_evaluated() {
            log::warn!("Archive rejected an unevaluated solution");
            return false;
        }
        if let Some(first) = self.members.first()
            && first.solution.objectives.len() != solution.objectives.len()
        {
            log::warn!(
                "Archive rejected a solution with {} objectives, members have {}",
                solution.objectives.len(),
                first.solution.objectives.len()
            );
            return false;
        }

        let mut dominated = Vec::with_capacity(self.members.len());
        for member in &self.members {
            match self.comparator.compare(&solution, &member.solution) {
                DominanceOrdering::DominatedBy => return false,
                DominanceOrdering::Dominates => dominated.push(true),
                DominanceOrdering::NonDominated => {
                    if member.solution.objectives == solution.objectives {
                        return false;
                    }
                    dominated.push(false);
                }
            }
        }

        let mut flags = dominated.into_iter();
        self.members.retain(|_| !flags.next().unwrap_or(false));

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.members.push(Member { solution, sequence });

        if self.members.len() > self.capacity {
            let evicted = self.truncate_one();
            return evicted != sequence;
        }

        true
    }

    /// Recompute densities, annotate members and evict the least diverse one.
    ///
    /// Returns the evicted member's sequence number.
    fn truncate_one(&mut self) -> u64 {
        let densities = self.annotate_density();

        let mut worst = 0;
        for (i, density) in densities.iter().enumerate().skip(1) {
            if density.total_cmp(&densities[worst]).is_lt() {
                worst = i;
            }
        }

        self.members.remove(worst).sequence
    }

    /// Compute density values for all members and store them as attributes.
    pub fn annotate_density(&mut self) -> Vec<f64> {
        let objectives: Vec<&[f64]> = self
            .members
            .iter()
            .map(|m| m.solution.objectives.as_slice())
            .collect();
        let densities = self.estimator.compute(&objectives);

        let key = self.estimator.attribute();
        for (member, &density) in self.members.iter_mut().zip(&densities) {
            member.solution.set_attribute(key, density);
        }

        densities
    }

    /// Maximum number of members.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the archive is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Get a member by position (insertion order).
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.members.get(index).map(|m| &m.solution)
    }

    /// Iterate over members in insertion order.
    pub fn solutions(&self) -> impl Iterator<Item = &Solution> {
        self.members.iter().map(|m| &m.solution)
    }

    /// Copy the members into a new population.
    pub fn to_population(&self) -> Population {
        self.solutions().cloned().collect()
    }

    /// Remove all members.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

impl<C: Dominance, E: DensityEstimator> Extend<Solution> for BoundedArchive<C, E> {
    fn extend<I: IntoIterator<Item = Solution>>(&mut self, iter: I) {
        for solution in iter {
            self.add(solution);
        }
    }
}
