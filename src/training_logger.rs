//! Training Logger
//!
//! CSV logging of the cost history, so training curves can be plotted and
//! compared across runs.
//!
//! ## CSV Format
//!
//! - `iteration`: gradient descent iteration number
//! - `elapsed_seconds`: time since the logger was created
//! - `cost`: average binary cross-entropy at that iteration
//!
//! ## Example
//!
//! ```rust,no_run
//! use tybalt::CostLogger;
//!
//! let mut logger = CostLogger::new("costs.csv")?;
//! logger.log(0, 0.6931)?;
//! logger.log(100, 0.5845)?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fs::File;
use std::io::Write;
use std::time::Instant;

/// Appends recorded costs to a CSV file
pub struct CostLogger {
    log_file: File,
    start_time: Instant,
}

impl CostLogger {
    /// Create the CSV file and write its header
    pub fn new(log_path: &str) -> std::io::Result<Self> {
        let mut log_file = File::create(log_path)?;
        writeln!(log_file, "iteration,elapsed_seconds,cost")?;

        Ok(Self {
            log_file,
            start_time: Instant::now(),
        })
    }

    /// Append one cost sample and flush
    ///
    /// Flushing per row keeps the log usable if a run is interrupted.
    pub fn log(&mut self, iteration: usize, cost: f32) -> std::io::Result<()> {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        writeln!(self.log_file, "{},{:.3},{:.6}", iteration, elapsed, cost)?;
        self.log_file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_header_and_rows() {
        let path = std::env::temp_dir().join("tybalt_cost_log_test.csv");
        let path = path.to_str().unwrap().to_string();

        let mut logger = CostLogger::new(&path).unwrap();
        logger.log(0, 0.693147).unwrap();
        logger.log(100, 0.5).unwrap();
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "iteration,elapsed_seconds,cost");
        assert!(lines[1].starts_with("0,"));
        assert!(lines[1].ends_with("0.693147"));
        assert!(lines[2].starts_with("100,"));
    }
}
