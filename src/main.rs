//! Train and evaluate the cat classifier from the command line.
//!
//! ```bash
//! # Train on a packed dataset file
//! cargo run --release -- --data catvnoncat.bin --print-cost
//!
//! # No data file handy: train on a generated separable dataset
//! cargo run --release -- --print-cost
//!
//! # Log the cost curve to CSV and keep the original notebook's
//! # test-split scaling for comparison runs
//! cargo run --release -- --data catvnoncat.bin --log costs.csv --legacy-normalization
//! ```

use clap::Parser;
use tybalt::{train_classifier, CostLogger, Dataset, Normalization, TrainConfig};

#[derive(Parser)]
#[command(name = "tybalt", about = "Logistic regression cat classifier")]
struct Args {
    /// Path to a packed dataset file; a synthetic dataset is generated when omitted
    #[arg(long)]
    data: Option<String>,

    /// Number of gradient descent iterations
    #[arg(long, default_value = "2000")]
    iterations: usize,

    /// Learning rate
    #[arg(long, default_value = "0.005")]
    learning_rate: f32,

    /// Print the cost every 100 iterations
    #[arg(long)]
    print_cost: bool,

    /// Write recorded costs to a CSV file
    #[arg(long)]
    log: Option<String>,

    /// Divide test pixels by 25 instead of 255, matching the original notebook's quirk
    #[arg(long)]
    legacy_normalization: bool,

    /// Seed for the synthetic dataset used when --data is not given
    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let dataset = match &args.data {
        Some(path) => Dataset::load(path)?,
        None => {
            println!("No dataset file given, generating a synthetic one");
            Dataset::synthetic(209, 50, 64, 64, 3, args.seed)
        }
    };

    let normalization = if args.legacy_normalization {
        Normalization::Legacy
    } else {
        Normalization::Unit
    };

    let (x_train, y_train, x_test, y_test) = dataset.features(normalization);

    println!("classes: {}", dataset.classes.join(", "));
    println!("x_train: {}x{}", x_train.rows, x_train.cols);
    println!("y_train: {}x{}", y_train.rows, y_train.cols);
    println!("x_test:  {}x{}", x_test.rows, x_test.cols);
    println!("y_test:  {}x{}", y_test.rows, y_test.cols);

    let config = TrainConfig {
        num_iterations: args.iterations,
        learning_rate: args.learning_rate,
        print_cost: args.print_cost,
        ..TrainConfig::default()
    };

    let mut logger = match &args.log {
        Some(path) => Some(CostLogger::new(path)?),
        None => None,
    };

    train_classifier(
        &x_train,
        &y_train,
        &x_test,
        &y_test,
        &config,
        logger.as_mut(),
    )?;

    Ok(())
}
