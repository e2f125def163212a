//! Core trait for Simulated Annealing.

use rand::Rng;

/// Solution space explored by [`SaRunner`](super::SaRunner).
///
/// Moves are proposed against the current solution, scored with
/// [`delta`](SaProblem::delta) and only applied when accepted, so a step
/// never clones the solution. Costs are minimized.
///
/// # Examples
///
/// ```ignore
/// struct BitProblem { weights: Vec<f64> }
///
/// impl SaProblem for BitProblem {
///     type Solution = Vec<u8>;
///     type Move = usize;
///
///     fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
///         (0..self.weights.len()).map(|_| rng.random_range(0..2)).collect()
///     }
///
///     fn cost(&self, bits: &Vec<u8>) -> f64 {
///         bits.iter().zip(&self.weights).map(|(&b, w)| b as f64 * w).sum()
///     }
///
///     fn propose<R: Rng>(&self, _bits: &Vec<u8>, rng: &mut R) -> usize {
///         rng.random_range(0..self.weights.len())
///     }
///
///     fn delta(&self, bits: &Vec<u8>, &i: &usize) -> f64 {
///         if bits[i] == 1 { -self.weights[i] } else { self.weights[i] }
///     }
///
///     fn apply(&self, bits: &mut Vec<u8>, i: usize) {
///         bits[i] ^= 1;
///     }
/// }
/// ```
pub trait SaProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// A perturbation of a solution.
    type Move;

    /// Creates a random initial solution.
    fn initial_solution<R: Rng>(&self, rng: &mut R) -> Self::Solution;

    /// Computes the cost of a solution. Lower is better.
    fn cost(&self, solution: &Self::Solution) -> f64;

    /// Proposes a move away from the current solution.
    ///
    /// The neighborhood must be connected (any solution reachable from any
    /// other via a sequence of moves).
    fn propose<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Move;

    /// Cost change caused by applying `mv` to `solution`.
    fn delta(&self, solution: &Self::Solution, mv: &Self::Move) -> f64;

    /// Applies an accepted move in place.
    fn apply(&self, solution: &mut Self::Solution, mv: Self::Move);
}
