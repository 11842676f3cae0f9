//! Neighborhood moves on job orders.

use std::collections::HashSet;

use rand::Rng;

use crate::model::Job;

/// A perturbation of a job order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Exchange the jobs at two positions.
    Swap { first: usize, second: usize },
    /// Remove the job at `from` and reinsert it at `to`.
    Insertion { from: usize, to: usize },
}

impl Move {
    /// Returns the perturbed copy of `order`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_energysched::local_search::Move;
    /// use u_energysched::model::Job;
    ///
    /// let order: Vec<Job> = (0..4).map(|i| Job::new(i, i as usize, 0, 1)).collect();
    /// let moved = Move::Insertion { from: 0, to: 2 }.apply(&order);
    /// let ids: Vec<u32> = moved.iter().map(|job| job.id).collect();
    /// assert_eq!(ids, vec![1, 2, 0, 3]);
    /// ```
    pub fn apply(&self, order: &[Job]) -> Vec<Job> {
        let mut neighbor = order.to_vec();
        match *self {
            Move::Swap { first, second } => neighbor.swap(first, second),
            Move::Insertion { from, to } => {
                let job = neighbor.remove(from);
                neighbor.insert(to, job);
            }
        }
        neighbor
    }
}

/// Draws `count` swaps of jobs with different processing times.
///
/// Swapping equally long jobs cannot change the cost, so no swaps are drawn
/// when all processing times coincide.
pub(crate) fn random_swaps<R: Rng>(order: &[Job], count: usize, rng: &mut R) -> Vec<Move> {
    let distinct: HashSet<i64> = order.iter().map(|job| job.processing_time).collect();
    if distinct.len() < 2 {
        return Vec::new();
    }
    (0..count)
        .map(|_| loop {
            let first = rng.random_range(0..order.len());
            let second = rng.random_range(0..order.len());
            if order[first].processing_time != order[second].processing_time {
                break Move::Swap { first, second };
            }
        })
        .collect()
}

/// Draws `count` insertions with uniformly random source and destination.
pub(crate) fn random_insertions<R: Rng>(order: &[Job], count: usize, rng: &mut R) -> Vec<Move> {
    if order.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| Move::Insertion {
            from: rng.random_range(0..order.len()),
            to: rng.random_range(0..order.len()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn jobs(processing: &[i64]) -> Vec<Job> {
        processing
            .iter()
            .enumerate()
            .map(|(i, &p)| Job::new(i as u32, i, 0, p))
            .collect()
    }

    fn ids(order: &[Job]) -> Vec<u32> {
        order.iter().map(|job| job.id).collect()
    }

    #[test]
    fn test_swap_apply() {
        let order = jobs(&[1, 2, 3]);
        let moved = Move::Swap { first: 0, second: 2 }.apply(&order);
        assert_eq!(ids(&moved), vec![2, 1, 0]);
        assert_eq!(ids(&order), vec![0, 1, 2], "input must be untouched");
    }

    #[test]
    fn test_insertion_backwards() {
        let order = jobs(&[1, 1, 1, 1]);
        let moved = Move::Insertion { from: 3, to: 1 }.apply(&order);
        assert_eq!(ids(&moved), vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_swaps_only_between_different_lengths() {
        let order = jobs(&[1, 1, 2, 1]);
        let mut rng = StdRng::seed_from_u64(3);
        let swaps = random_swaps(&order, 50, &mut rng);
        assert_eq!(swaps.len(), 50);
        for mv in swaps {
            let Move::Swap { first, second } = mv else {
                panic!("expected a swap, got {mv:?}");
            };
            assert_ne!(order[first].processing_time, order[second].processing_time);
        }
    }

    #[test]
    fn test_no_swaps_for_uniform_lengths() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_swaps(&jobs(&[2, 2, 2]), 10, &mut rng).is_empty());
        assert!(random_swaps(&jobs(&[4]), 10, &mut rng).is_empty());
    }

    #[test]
    fn test_insertions_in_range() {
        let order = jobs(&[1, 2, 3, 4, 5]);
        let mut rng = StdRng::seed_from_u64(11);
        let insertions = random_insertions(&order, 30, &mut rng);
        assert_eq!(insertions.len(), 30);
        for mv in insertions {
            assert_eq!(mv.apply(&order).len(), order.len());
        }
        assert!(random_insertions(&[], 5, &mut rng).is_empty());
    }
}
