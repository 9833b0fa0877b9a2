//! Tybalt: Educational Logistic Regression Classifier
//!
//! A binary image classifier (cat vs. non-cat) built as the smallest
//! possible neural network: one sigmoid unit trained with full-batch
//! gradient descent, implemented from scratch in Rust for educational
//! purposes. Named after the "prince of cats" from Shakespeare's
//! *Romeo and Juliet*.
//!
//! # Pipeline
//!
//! load → flatten and normalize → train → evaluate → report
//!
//! # Modules
//!
//! - [`matrix`] - Minimal 2-D matrix library (Rayon-parallel where it pays)
//! - [`activation`] - The sigmoid function
//! - [`regression`] - Parameters, propagation, prediction, orchestration
//! - [`optimizer`] - Full-batch gradient descent with cost history
//! - [`dataset`] - Packed dataset files, preprocessing, synthetic data
//! - [`training_logger`] - CSV cost logging
//!
//! # Example
//!
//! ```rust
//! use tybalt::{train_classifier, Dataset, Normalization, TrainConfig};
//!
//! // A small separable dataset; real runs load a packed file instead
//! let dataset = Dataset::synthetic(32, 8, 8, 8, 3, 42);
//! let (x_train, y_train, x_test, y_test) = dataset.features(Normalization::Unit);
//!
//! let report = train_classifier(
//!     &x_train, &y_train,
//!     &x_test, &y_test,
//!     &TrainConfig::default(),
//!     None,
//! )?;
//! assert!(report.train_accuracy > 90.0);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod activation;
pub mod dataset;
pub mod matrix;
pub mod optimizer;
pub mod regression;
pub mod training_logger;

// Re-export main types for convenience
pub use activation::{sigmoid, sigmoid_forward};
pub use dataset::{labels_matrix, Dataset, ImageSet, Normalization, SetDims};
pub use matrix::Matrix;
pub use optimizer::{optimize, OptimizeResult, TrainConfig};
pub use regression::{
    accuracy, predict, propagate, train_classifier, ClassifierReport, Gradients, Parameters,
};
pub use training_logger::CostLogger;
