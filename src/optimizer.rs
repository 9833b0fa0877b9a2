//! Gradient Descent Optimizer
//!
//! Plain full-batch gradient descent, the simplest optimizer there is.
//! Every iteration runs one round of propagation over the whole training
//! set, then steps the parameters against the gradient:
//!
//! ```text
//! w = w - α * dw
//! b = b - α * db
//! ```
//!
//! where α is the learning rate.
//!
//! ## Why Nothing Fancier?
//!
//! Binary cross-entropy over a single sigmoid unit is convex, so plain
//! gradient descent with a fixed rate reaches the optimum. Momentum and
//! adaptive rates earn their complexity on the rugged loss surfaces of deep
//! networks, not here.
//!
//! ## Termination
//!
//! The loop runs for exactly `num_iterations` steps. There is no
//! convergence check, no early stopping, and no rate schedule. Every
//! `cost_every`-th iteration the current cost is recorded into an ordered
//! history (and optionally printed or appended to a CSV log), so a run of
//! 2000 iterations with the default cadence yields 20 cost samples.
//!
//! ## Example
//!
//! ```rust
//! use tybalt::{optimize, Matrix, Parameters, TrainConfig};
//!
//! let mut params = Parameters::zeros(1);
//! let x = Matrix::new(vec![0.0, 1.0], 1, 2);
//! let y = Matrix::new(vec![0.0, 1.0], 1, 2);
//!
//! let outcome = optimize(&mut params, &x, &y, &TrainConfig::quick(), None)?;
//! assert!(!outcome.costs.is_empty());
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::matrix::Matrix;
use crate::regression::{propagate, Gradients, Parameters};
use crate::training_logger::CostLogger;
use rayon::prelude::*;

/// Hyperparameters for a training run
///
/// # Fields
///
/// - `num_iterations`: exact number of gradient steps
/// - `learning_rate`: step size α
/// - `cost_every`: record the cost on every N-th iteration
/// - `print_cost`: echo each recorded cost to the console
#[derive(Clone, Debug)]
pub struct TrainConfig {
    pub num_iterations: usize,
    pub learning_rate: f32,
    pub cost_every: usize,
    pub print_cost: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_iterations: 2000,
            learning_rate: 0.005,
            cost_every: 100,
            print_cost: false,
        }
    }
}

impl TrainConfig {
    /// Short aggressive run for toy datasets and tests
    ///
    /// A handful of well-separated points tolerates a much larger step size
    /// than 12288-dimensional pixel data does.
    pub fn quick() -> Self {
        Self {
            num_iterations: 500,
            learning_rate: 0.5,
            cost_every: 100,
            print_cost: false,
        }
    }
}

/// What a finished optimization loop hands back
///
/// # Fields
///
/// - `costs`: ordered cost history, one entry per recorded iteration
///   (length = ceil(num_iterations / cost_every))
/// - `grads`: gradients from the final iteration (zeros if no iterations ran)
pub struct OptimizeResult {
    pub costs: Vec<f32>,
    pub grads: Gradients,
}

/// Run gradient descent, updating the parameters in place
///
/// # Arguments
///
/// * `params` - Parameters to train, mutated every iteration
/// * `x` - Design matrix `[d, m]`
/// * `y` - Binary labels `[1, m]`
/// * `config` - Iteration count, learning rate, recording cadence
/// * `logger` - Optional CSV logger receiving every recorded cost
///
/// # Returns
///
/// Cost history and final gradients, or an I/O error from the logger.
///
/// # Performance
///
/// The weight update parallelizes via Rayon for vectors with more than
/// 1000 elements and stays sequential below that, where the parallel
/// overhead would dominate.
///
/// # Panics
///
/// Panics if `cost_every` is zero or the shapes disagree (see
/// [`propagate`]).
pub fn optimize(
    params: &mut Parameters,
    x: &Matrix,
    y: &Matrix,
    config: &TrainConfig,
    mut logger: Option<&mut CostLogger>,
) -> std::io::Result<OptimizeResult> {
    assert!(config.cost_every > 0, "cost_every must be nonzero");

    let lr = config.learning_rate;
    let mut costs = Vec::with_capacity(config.num_iterations / config.cost_every + 1);
    let mut last_grads = Gradients {
        dw: Matrix::zeros(params.w.rows, params.w.cols),
        db: 0.0,
    };

    for i in 0..config.num_iterations {
        let (grads, cost) = propagate(params, x, y);

        // w = w - α * dw
        if params.w.data.len() > 1000 {
            params
                .w
                .data
                .par_iter_mut()
                .zip(grads.dw.data.par_iter())
                .for_each(|(w_val, &g)| *w_val -= lr * g);
        } else {
            for (w_val, &g) in params.w.data.iter_mut().zip(&grads.dw.data) {
                *w_val -= lr * g;
            }
        }

        // b = b - α * db
        params.b -= lr * grads.db;

        if i % config.cost_every == 0 {
            costs.push(cost);
            if config.print_cost {
                println!("iteration {:4} | cost {:.6}", i, cost);
            }
            if let Some(log) = logger.as_deref_mut() {
                log.log(i, cost)?;
            }
        }

        last_grads = grads;
    }

    Ok(OptimizeResult {
        costs,
        grads: last_grads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_toy() -> (Matrix, Matrix) {
        let x = Matrix::new(vec![0.0, 0.0, 1.0, 1.0], 1, 4);
        let y = Matrix::new(vec![0.0, 0.0, 1.0, 1.0], 1, 4);
        (x, y)
    }

    #[test]
    fn test_cost_history_length() {
        let (x, y) = separable_toy();

        for (iterations, expected) in [(2000, 20), (250, 3), (100, 1), (1, 1)] {
            let mut params = Parameters::zeros(1);
            let config = TrainConfig {
                num_iterations: iterations,
                learning_rate: 0.1,
                ..TrainConfig::default()
            };
            let outcome = optimize(&mut params, &x, &y, &config, None).unwrap();
            assert_eq!(
                outcome.costs.len(),
                expected,
                "wrong history length for {} iterations",
                iterations
            );
        }
    }

    #[test]
    fn test_cost_history_non_increasing_on_separable_data() {
        let (x, y) = separable_toy();
        let mut params = Parameters::zeros(1);
        let config = TrainConfig {
            num_iterations: 1000,
            learning_rate: 0.1,
            ..TrainConfig::default()
        };

        let outcome = optimize(&mut params, &x, &y, &config, None).unwrap();
        for pair in outcome.costs.windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-6,
                "cost increased: {} -> {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_parameters_move_toward_separation() {
        let (x, y) = separable_toy();
        let mut params = Parameters::zeros(1);
        let config = TrainConfig::quick();

        optimize(&mut params, &x, &y, &config, None).unwrap();

        // Feature value 0 must score below the threshold, feature value 1 above
        assert!(params.b < 0.0);
        assert!(params.w.data[0] + params.b > 0.0);
    }

    #[test]
    fn test_final_gradients_shape() {
        let (x, y) = separable_toy();
        let mut params = Parameters::zeros(1);
        let outcome = optimize(&mut params, &x, &y, &TrainConfig::quick(), None).unwrap();
        assert_eq!(
            (outcome.grads.dw.rows, outcome.grads.dw.cols),
            (params.w.rows, params.w.cols)
        );
    }

    #[test]
    fn test_zero_iterations_yields_empty_history() {
        let (x, y) = separable_toy();
        let mut params = Parameters::zeros(1);
        let config = TrainConfig {
            num_iterations: 0,
            ..TrainConfig::default()
        };
        let outcome = optimize(&mut params, &x, &y, &config, None).unwrap();
        assert!(outcome.costs.is_empty());
        assert_eq!(params.b, 0.0);
    }
}
