//! Annealing loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SaConfig;
use super::types::SaProblem;
use crate::error::Result;

/// Outcome of one annealing trajectory.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// Lowest-cost solution visited.
    pub best: S,

    /// Cost of `best`, accumulated from move deltas.
    pub best_cost: f64,

    /// Proposals evaluated.
    pub iterations: usize,

    /// Proposals accepted, improving ones included.
    pub accepted_moves: usize,
}

/// Runs simulated annealing over an [`SaProblem`].
pub struct SaRunner;

impl SaRunner {
    /// Anneals from a random initial solution down the geometric schedule.
    ///
    /// # Errors
    ///
    /// [`QuboError::InvalidConfig`](crate::QuboError::InvalidConfig) when
    /// `config` fails [`SaConfig::validate`].
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> Result<SaResult<P::Solution>> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        let mut current = problem.initial_solution(&mut rng);
        let mut current_cost = problem.cost(&current);
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let budget = match config.max_iterations {
            0 => usize::MAX,
            n => n,
        };
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut temperature = config.initial_temperature;

        'levels: while temperature > config.min_temperature {
            for _ in 0..config.iterations_per_temperature {
                if iterations >= budget {
                    break 'levels;
                }
                iterations += 1;

                let mv = problem.propose(&current, &mut rng);
                let delta = problem.delta(&current, &mv);

                // Metropolis
                let accept = delta <= 0.0 || rng.random::<f64>() < (-delta / temperature).exp();
                if !accept {
                    continue;
                }
                problem.apply(&mut current, mv);
                current_cost += delta;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best.clone_from(&current);
                    best_cost = current_cost;
                }
            }
            temperature *= config.alpha;
        }

        Ok(SaResult {
            best,
            best_cost,
            iterations,
            accepted_moves,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    // f(x) = x^2 over the reals, minimum at 0
    struct Parabola;

    impl SaProblem for Parabola {
        type Solution = f64;
        type Move = f64;

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> f64 {
            rng.random_range(-10.0..10.0)
        }

        fn cost(&self, x: &f64) -> f64 {
            x * x
        }

        fn propose<R: Rng>(&self, _x: &f64, rng: &mut R) -> f64 {
            rng.random_range(-1.0..1.0)
        }

        fn delta(&self, x: &f64, step: &f64) -> f64 {
            (x + step).powi(2) - x * x
        }

        fn apply(&self, x: &mut f64, step: f64) {
            *x += step;
        }
    }

    #[test]
    fn test_parabola_reaches_minimum() {
        let config = SaConfig::default()
            .with_initial_temperature(100.0)
            .with_min_temperature(0.001)
            .with_alpha(0.95)
            .with_iterations_per_temperature(50)
            .with_seed(42);

        let result = SaRunner::run(&Parabola, &config).unwrap();

        assert!(result.best_cost < 1.0, "best cost {}", result.best_cost);
        assert!((result.best_cost - result.best * result.best).abs() < 1e-9);
    }

    #[test]
    fn test_budget_stops_run() {
        let config = SaConfig::default()
            .with_initial_temperature(1e10)
            .with_min_temperature(1e-15)
            .with_iterations_per_temperature(10)
            .with_max_iterations(100)
            .with_seed(42);

        let result = SaRunner::run(&Parabola, &config).unwrap();
        assert_eq!(result.iterations, 100);
    }

    #[test]
    fn test_iterations_follow_schedule() {
        let config = SaConfig::default()
            .with_initial_temperature(8.0)
            .with_min_temperature(1.5)
            .with_alpha(0.5)
            .with_iterations_per_temperature(7)
            .with_seed(1);

        let result = SaRunner::run(&Parabola, &config).unwrap();
        assert_eq!(result.iterations, 7 * config.levels());
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = SaConfig::default().with_alpha(0.0);
        assert!(SaRunner::run(&Parabola, &config).is_err());
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(0.01)
            .with_seed(7);

        let a = SaRunner::run(&Parabola, &config).unwrap();
        let b = SaRunner::run(&Parabola, &config).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.accepted_moves, b.accepted_moves);
    }

    #[test]
    fn test_hot_schedule_accepts_uphill() {
        let config = SaConfig::default()
            .with_initial_temperature(1e8)
            .with_min_temperature(1e7)
            .with_alpha(0.99)
            .with_iterations_per_temperature(1000)
            .with_seed(42);

        let result = SaRunner::run(&Parabola, &config).unwrap();

        let ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(ratio > 0.8, "acceptance ratio {ratio}");
    }

    // Swap moves on a permutation; cost = misplaced entries.
    struct Unshuffle {
        n: usize,
    }

    fn misplaced(perm: &[usize]) -> f64 {
        perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
    }

    impl SaProblem for Unshuffle {
        type Solution = Vec<usize>;
        type Move = (usize, usize);

        fn initial_solution<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
            let mut perm: Vec<usize> = (0..self.n).collect();
            perm.shuffle(rng);
            perm
        }

        fn cost(&self, perm: &Vec<usize>) -> f64 {
            misplaced(perm)
        }

        fn propose<R: Rng>(&self, _perm: &Vec<usize>, rng: &mut R) -> (usize, usize) {
            (rng.random_range(0..self.n), rng.random_range(0..self.n))
        }

        fn delta(&self, perm: &Vec<usize>, &(i, j): &(usize, usize)) -> f64 {
            let mut swapped = perm.clone();
            swapped.swap(i, j);
            misplaced(&swapped) - misplaced(perm)
        }

        fn apply(&self, perm: &mut Vec<usize>, (i, j): (usize, usize)) {
            perm.swap(i, j);
        }
    }

    #[test]
    fn test_permutation_is_unshuffled() {
        let config = SaConfig::default()
            .with_initial_temperature(50.0)
            .with_min_temperature(0.01)
            .with_alpha(0.98)
            .with_iterations_per_temperature(200)
            .with_seed(42);

        let result = SaRunner::run(&Unshuffle { n: 10 }, &config).unwrap();

        assert!(result.best_cost <= 4.0, "best cost {}", result.best_cost);
        assert_eq!(result.best_cost, misplaced(&result.best));
    }
}
