//! Logistic Regression Core
//!
//! A single sigmoid unit trained with binary cross-entropy: the smallest
//! possible neural network. This module holds the parameters, the forward
//! and backward propagation math, prediction, and the orchestrator that
//! wires training and evaluation together.
//!
//! ## The Math
//!
//! For a design matrix X of shape `[d, m]` (one flattened image per column)
//! and labels Y of shape `[1, m]`:
//!
//! ```text
//! Forward:   A  = sigmoid(w^T X + b)                    # [1, m] probabilities
//! Cost:      J  = -(1/m) * sum(Y*ln(A) + (1-Y)*ln(1-A)) # scalar
//! Backward:  dw = (1/m) * X (A - Y)^T                   # [d, 1], same shape as w
//!            db = (1/m) * sum(A - Y)                    # scalar
//! ```
//!
//! ## Why These Gradients?
//!
//! The sigmoid derivative cancels against the cross-entropy derivative,
//! so the gradient of J with respect to the score `w^T X + b` is just the
//! prediction error `A - Y`. The chain rule then distributes that error
//! over the weights (through X) and the bias (summed).
//!
//! ## Example
//!
//! ```rust
//! use tybalt::{propagate, Matrix, Parameters};
//!
//! let params = Parameters::zeros(2);
//! let x = Matrix::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
//! let y = Matrix::new(vec![0.0, 1.0], 1, 2);
//! let (grads, cost) = propagate(&params, &x, &y);
//! assert!(cost > 0.0);
//! assert_eq!((grads.dw.rows, grads.dw.cols), (2, 1));
//! ```

use crate::activation::sigmoid_forward;
use crate::matrix::Matrix;
use crate::optimizer::{optimize, TrainConfig};
use crate::training_logger::CostLogger;

/// Trainable parameters of the model
///
/// # Fields
///
/// - `w`: weight column vector, shape `[d, 1]`, one weight per input feature
/// - `b`: bias scalar
#[derive(Clone, Debug)]
pub struct Parameters {
    pub w: Matrix,
    pub b: f32,
}

impl Parameters {
    /// Zero-initialize weights and bias for `dim` input features
    ///
    /// For logistic regression zeros are a fine starting point: with a
    /// single unit there is no symmetry to break, so the random
    /// initialization a deeper network would need is unnecessary.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tybalt::Parameters;
    /// let params = Parameters::zeros(12288);
    /// assert_eq!((params.w.rows, params.w.cols), (12288, 1));
    /// assert_eq!(params.b, 0.0);
    /// ```
    pub fn zeros(dim: usize) -> Self {
        Self {
            w: Matrix::zeros(dim, 1),
            b: 0.0,
        }
    }
}

/// Gradients of the cost with respect to the parameters
///
/// `dw` always has the same shape as `Parameters::w`.
#[derive(Clone, Debug)]
pub struct Gradients {
    pub dw: Matrix,
    pub db: f32,
}

/// One pass of forward and backward propagation over a batch
///
/// # Arguments
///
/// * `params` - Current weights and bias
/// * `x` - Design matrix, shape `[d, m]`
/// * `y` - Binary labels, shape `[1, m]`
///
/// # Returns
///
/// Tuple of (gradients, cost) where cost is the average binary cross-entropy
/// over the batch.
///
/// # Saturation
///
/// The cost is unguarded: a prediction that saturates to exactly 0.0 or 1.0
/// with the opposite label makes J infinite or NaN (see the activation
/// module). Inputs in the ranges this pipeline produces do not saturate.
///
/// # Panics
///
/// Panics if the feature or example counts of `params`, `x`, and `y`
/// disagree.
pub fn propagate(params: &Parameters, x: &Matrix, y: &Matrix) -> (Gradients, f32) {
    assert_eq!(
        params.w.rows, x.rows,
        "Weight count ({}) doesn't match feature count ({})",
        params.w.rows, x.rows
    );
    assert_eq!(
        y.cols, x.cols,
        "Label count ({}) doesn't match example count ({})",
        y.cols, x.cols
    );
    assert_eq!(y.rows, 1, "Labels must be a row vector, got {} rows", y.rows);

    let m = x.cols as f32;

    // Forward: probabilities per example
    let z = params.w.transpose().matmul(x).add_scalar(params.b);
    let a = sigmoid_forward(&z);

    // Average binary cross-entropy
    let mut log_loss = 0.0;
    for (&a_i, &y_i) in a.data.iter().zip(&y.data) {
        log_loss += y_i * a_i.ln() + (1.0 - y_i) * (1.0 - a_i).ln();
    }
    let cost = -log_loss / m;

    // Backward: distribute the prediction error
    let error = a.sub(y); // [1, m]
    let dw = x.matmul(&error.transpose()).mul_scalar(1.0 / m); // [d, 1]
    let db = error.sum() / m;

    assert_eq!(
        (dw.rows, dw.cols),
        (params.w.rows, params.w.cols),
        "Gradient shape {}x{} doesn't match weight shape {}x{}",
        dw.rows,
        dw.cols,
        params.w.rows,
        params.w.cols
    );

    (Gradients { dw, db }, cost)
}

/// Predict binary labels for a batch of examples
///
/// Runs the forward pass and thresholds each probability at 0.5.
///
/// # Returns
///
/// A `[1, m]` matrix containing exactly 0.0 or 1.0 per example.
///
/// # Example
///
/// ```rust
/// # use tybalt::{predict, Matrix, Parameters};
/// let params = Parameters::zeros(3);
/// let x = Matrix::zeros(3, 5);
/// let labels = predict(&params, &x);
/// assert_eq!((labels.rows, labels.cols), (1, 5));
/// ```
pub fn predict(params: &Parameters, x: &Matrix) -> Matrix {
    assert_eq!(
        params.w.rows, x.rows,
        "Weight count ({}) doesn't match feature count ({})",
        params.w.rows, x.rows
    );

    let z = params.w.transpose().matmul(x).add_scalar(params.b);
    let a = sigmoid_forward(&z);

    let labels = a
        .data
        .iter()
        .map(|&p| if p > 0.5 { 1.0 } else { 0.0 })
        .collect();
    Matrix::new(labels, 1, x.cols)
}

/// Percentage of examples classified correctly
///
/// Computed as `100 - mean(|prediction - label|) * 100`, which for binary
/// values counts the matching fraction.
pub fn accuracy(predictions: &Matrix, labels: &Matrix) -> f32 {
    assert_eq!(
        (predictions.rows, predictions.cols),
        (labels.rows, labels.cols),
        "Prediction shape {}x{} doesn't match label shape {}x{}",
        predictions.rows,
        predictions.cols,
        labels.rows,
        labels.cols
    );
    100.0 - predictions.sub(labels).map(f32::abs).mean() * 100.0
}

/// Everything a finished training run produced
///
/// # Fields
///
/// - `costs`: cost history, one entry per recorded iteration
/// - `train_predictions` / `test_predictions`: `[1, m]` binary labels
/// - `parameters`: final trained weights and bias
/// - `train_accuracy` / `test_accuracy`: percentages
/// - `learning_rate` / `num_iterations`: the hyperparameters used
pub struct ClassifierReport {
    pub costs: Vec<f32>,
    pub train_predictions: Matrix,
    pub test_predictions: Matrix,
    pub parameters: Parameters,
    pub train_accuracy: f32,
    pub test_accuracy: f32,
    pub learning_rate: f32,
    pub num_iterations: usize,
}

/// Train the classifier and evaluate it on both splits
///
/// Pipeline: zero-initialize → gradient descent on the training split →
/// predict on train and test → compute and print both accuracies.
///
/// # Arguments
///
/// * `x_train` - Training design matrix `[d, m_train]`
/// * `y_train` - Training labels `[1, m_train]`
/// * `x_test` - Test design matrix `[d, m_test]`
/// * `y_test` - Test labels `[1, m_test]`
/// * `config` - Iteration count, learning rate, cost recording cadence
/// * `logger` - Optional CSV cost logger
///
/// # Returns
///
/// The full [`ClassifierReport`], or an I/O error from the logger.
///
/// # Example
///
/// ```rust,no_run
/// # use tybalt::{train_classifier, Matrix, TrainConfig};
/// # let (x_train, y_train, x_test, y_test): (Matrix, Matrix, Matrix, Matrix) = todo!();
/// let report = train_classifier(
///     &x_train, &y_train,
///     &x_test, &y_test,
///     &TrainConfig::default(),
///     None,
/// )?;
/// println!("final cost: {:?}", report.costs.last());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn train_classifier(
    x_train: &Matrix,
    y_train: &Matrix,
    x_test: &Matrix,
    y_test: &Matrix,
    config: &TrainConfig,
    logger: Option<&mut CostLogger>,
) -> std::io::Result<ClassifierReport> {
    let mut params = Parameters::zeros(x_train.rows);

    let outcome = optimize(&mut params, x_train, y_train, config, logger)?;

    let train_predictions = predict(&params, x_train);
    let test_predictions = predict(&params, x_test);

    let train_accuracy = accuracy(&train_predictions, y_train);
    let test_accuracy = accuracy(&test_predictions, y_test);

    println!("train accuracy: {:.2}%", train_accuracy);
    println!("test accuracy:  {:.2}%", test_accuracy);

    Ok(ClassifierReport {
        costs: outcome.costs,
        train_predictions,
        test_predictions,
        parameters: params,
        train_accuracy,
        test_accuracy,
        learning_rate: config.learning_rate,
        num_iterations: config.num_iterations,
    })
}
