//! Matrix Operations for the Classifier
//!
//! This module provides a minimal 2-D matrix library sized for a single-layer
//! model. Matrices store their elements in a flat `Vec<f32>` in row-major
//! order together with explicit row and column counts.
//!
//! ## Core Concepts
//!
//! - **Data**: Flat `Vec<f32>` storing all elements row by row
//! - **Rows / Cols**: The two dimensions, checked on every operation
//!
//! ## Example
//!
//! ```rust
//! use tybalt::Matrix;
//!
//! // Create a 2x3 matrix
//! let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
//!
//! // Matrix multiplication
//! let b = Matrix::new(vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0], 3, 2);
//! let c = a.matmul(&b);
//! assert_eq!((c.rows, c.cols), (2, 2));
//! ```
//!
//! ## Performance Optimizations
//!
//! Several operations use parallel processing via Rayon:
//!
//! - **Matrix multiplication**: Cache-blocked algorithm with parallel row
//!   processing for large products
//! - **Element-wise operations**: Parallel iteration over data
//!
//! Small inputs take sequential paths to avoid parallelization overhead.

use rayon::prelude::*;

/// A 2-D matrix of `f32` values in row-major layout
///
/// For a matrix with 2 rows and 3 columns, data is stored as:
/// `[r0c0, r0c1, r0c2, r1c0, r1c1, r1c2]`
///
/// The design matrix of the classifier stores one flattened image per
/// column, so a dataset of m images with d features each is a `d x m`
/// matrix.
#[derive(Clone, Debug)]
pub struct Matrix {
    /// Flat storage of all elements
    pub data: Vec<f32>,
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
}

impl Matrix {
    /// Create a new matrix with given data and dimensions
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tybalt::Matrix;
    /// let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    /// assert_eq!(m.get(1, 0), 3.0);
    /// ```
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "Data length ({}) doesn't match dimensions {}x{}",
            data.len(),
            rows,
            cols
        );
        Self { data, rows, cols }
    }

    /// Create a matrix filled with zeros
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tybalt::Matrix;
    /// let m = Matrix::zeros(3, 4);
    /// assert_eq!(m.data.len(), 12);
    /// assert!(m.data.iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::new(vec![0.0; rows * cols], rows, cols)
    }

    /// Element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Overwrite element at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.cols + col] = value;
    }

    /// SIMD-friendly inner loop for matrix multiplication
    ///
    /// Computes `result[j] += a_val * b[j]` for all j. Written as a plain
    /// zip so LLVM can auto-vectorize it.
    #[inline(always)]
    fn matmul_inner(a_val: f32, b: &[f32], result: &mut [f32]) {
        for (r, &b_val) in result.iter_mut().zip(b.iter()) {
            *r += a_val * b_val;
        }
    }

    /// Matrix multiplication
    ///
    /// For `A @ B` where `A` is `[m, k]` and `B` is `[k, n]`:
    /// - Result shape: `[m, n]`
    /// - Each element `C[i,j] = sum(A[i,l] * B[l,j])` over l
    ///
    /// # Performance
    ///
    /// - **Small products** (< 1K multiply-adds): sequential computation
    /// - **Large products** (>= 1K multiply-adds): parallel cache-blocked
    ///   algorithm
    ///
    /// With 64x64x3 images the forward pass `w^T @ X` is a `1 x 12288` by
    /// `12288 x m` product, well above the threshold.
    ///
    /// # Panics
    ///
    /// Panics if the inner dimensions are incompatible
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tybalt::Matrix;
    /// let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    /// let b = Matrix::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
    /// let c = a.matmul(&b);
    /// assert_eq!(c.data, vec![1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn matmul(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols, other.rows,
            "Matrix dimensions incompatible: [{}, {}] @ [{}, {}]",
            self.rows, self.cols, other.rows, other.cols
        );

        let m = self.rows;
        let n = other.cols;
        let k = self.cols;

        // Work threshold balancing parallel overhead against gains
        if m * n * k >= 1_000 {
            return self.matmul_parallel_blocked(other, m, n, k);
        }

        let mut result = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0;
                for l in 0..k {
                    sum += self.data[i * k + l] * other.data[l * n + j];
                }
                result[i * n + j] = sum;
            }
        }

        Matrix::new(result, m, n)
    }

    /// Parallel cache-blocked matrix multiplication
    ///
    /// 1. **Cache blocking**: processes data in 8x8 blocks that fit in L1
    /// 2. **Parallel processing**: distributes row blocks across cores via
    ///    Rayon
    /// 3. **Memory locality**: inner loops access memory sequentially
    fn matmul_parallel_blocked(&self, other: &Matrix, m: usize, n: usize, k: usize) -> Matrix {
        const BLOCK_SIZE: usize = 8;

        let mut result = vec![0.0; m * n];

        // Each task owns BLOCK_SIZE output rows
        result
            .par_chunks_mut(BLOCK_SIZE * n)
            .enumerate()
            .for_each(|(block_i, result_block)| {
                let i_start = block_i * BLOCK_SIZE;
                let i_end = (i_start + BLOCK_SIZE).min(m);

                for j_start in (0..n).step_by(BLOCK_SIZE) {
                    let j_end = (j_start + BLOCK_SIZE).min(n);

                    for k_start in (0..k).step_by(BLOCK_SIZE) {
                        let k_end = (k_start + BLOCK_SIZE).min(k);

                        for i in i_start..i_end {
                            let row_offset = (i - i_start) * n;
                            for k_idx in k_start..k_end {
                                let a_val = self.data[i * k + k_idx];
                                Self::matmul_inner(
                                    a_val,
                                    &other.data[k_idx * n + j_start..k_idx * n + j_end],
                                    &mut result_block[row_offset + j_start..row_offset + j_end],
                                );
                            }
                        }
                    }
                }
            });

        Matrix::new(result, m, n)
    }

    /// Transposed copy of the matrix
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tybalt::Matrix;
    /// let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    /// let t = m.transpose();
    /// assert_eq!((t.rows, t.cols), (3, 2));
    /// assert_eq!(t.get(2, 1), 6.0);
    /// ```
    pub fn transpose(&self) -> Matrix {
        let mut result = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                result[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix::new(result, self.cols, self.rows)
    }

    /// Element-wise subtraction
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ
    pub fn sub(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            (self.rows, self.cols),
            (other.rows, other.cols),
            "Shapes must match for subtraction: {}x{} vs {}x{}",
            self.rows,
            self.cols,
            other.rows,
            other.cols
        );
        let result = self
            .data
            .par_iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Matrix::new(result, self.rows, self.cols)
    }

    /// Add a scalar to every element
    pub fn add_scalar(&self, scalar: f32) -> Matrix {
        let result = self.data.par_iter().map(|&x| x + scalar).collect();
        Matrix::new(result, self.rows, self.cols)
    }

    /// Multiply every element by a scalar
    pub fn mul_scalar(&self, scalar: f32) -> Matrix {
        let result = self.data.par_iter().map(|&x| x * scalar).collect();
        Matrix::new(result, self.rows, self.cols)
    }

    /// Apply a function to every element in parallel
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tybalt::Matrix;
    /// let m = Matrix::new(vec![1.0, -2.0], 1, 2);
    /// let abs = m.map(f32::abs);
    /// assert_eq!(abs.data, vec![1.0, 2.0]);
    /// ```
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f32) -> f32 + Sync + Send,
    {
        let result = self.data.par_iter().map(|&x| f(x)).collect();
        Matrix::new(result, self.rows, self.cols)
    }

    /// Sum of all elements
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Mean of all elements
    pub fn mean(&self) -> f32 {
        self.sum() / self.data.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        assert_eq!((m.rows, m.cols), (2, 3));
    }

    #[test]
    #[should_panic(expected = "doesn't match dimensions")]
    fn test_new_rejects_bad_length() {
        Matrix::new(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn test_zeros_and_set() {
        let mut m = Matrix::zeros(4, 7);
        assert_eq!(m.data.len(), 28);
        assert!(m.data.iter().all(|&x| x == 0.0));

        m.set(3, 6, 2.5);
        assert_eq!(m.get(3, 6), 2.5);
        assert_eq!(m.data[27], 2.5);
    }

    #[test]
    fn test_matmul_identity() {
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let identity = Matrix::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2);
        let c = a.matmul(&identity);
        assert_eq!(c.data, a.data);
    }

    #[test]
    fn test_matmul_rectangular() {
        // [1 2 3]   [1 4]   [14 32]
        // [4 5 6] @ [2 5] = [32 77]
        //           [3 6]
        let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let b = Matrix::new(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0], 3, 2);
        let c = a.matmul(&b);
        assert_eq!((c.rows, c.cols), (2, 2));
        assert_eq!(c.data, vec![14.0, 32.0, 32.0, 77.0]);
    }

    #[test]
    fn test_matmul_parallel_matches_sequential() {
        // 2 * 3 * 256 multiply-adds, enough to take the blocked parallel path
        let k = 256;
        let a_data: Vec<f32> = (0..2 * k).map(|i| (i % 13) as f32 * 0.25).collect();
        let b_data: Vec<f32> = (0..k * 3).map(|i| (i % 7) as f32 * 0.5).collect();
        let a = Matrix::new(a_data, 2, k);
        let b = Matrix::new(b_data, k, 3);

        let fast = a.matmul(&b);

        // Reference computation
        for i in 0..2 {
            for j in 0..3 {
                let mut expected = 0.0;
                for l in 0..k {
                    expected += a.get(i, l) * b.get(l, j);
                }
                assert!((fast.get(i, j) - expected).abs() < 1e-2);
            }
        }
    }

    #[test]
    #[should_panic(expected = "incompatible")]
    fn test_matmul_rejects_mismatched_dims() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        a.matmul(&b);
    }

    #[test]
    fn test_transpose() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let t = m.transpose();
        assert_eq!((t.rows, t.cols), (3, 2));
        assert_eq!(t.data, vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_scalar_ops_and_sub() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 1, 4);
        assert_eq!(m.add_scalar(1.0).data, vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(m.mul_scalar(2.0).data, vec![2.0, 4.0, 6.0, 8.0]);

        let other = Matrix::new(vec![0.5, 0.5, 0.5, 0.5], 1, 4);
        assert_eq!(m.sub(&other).data, vec![0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_sum_and_mean() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(m.sum(), 10.0);
        assert_eq!(m.mean(), 2.5);
    }
}
