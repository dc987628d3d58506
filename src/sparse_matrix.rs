//! Sparse matrix representation for R1CS matrices

use crate::scalar::Scalar;
use serde::{Deserialize, Serialize};

/// Sparse matrix entry (row, col, value)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseMatEntry {
    pub row: usize,
    pub col: usize,
    pub val: Scalar,
}

impl SparseMatEntry {
    pub fn new(row: usize, col: usize, val: Scalar) -> Self {
        SparseMatEntry { row, col, val }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseMatrix {
    pub num_rows: usize,
    pub num_cols: usize,
    pub M: Vec<SparseMatEntry>,
}

impl SparseMatrix {
    pub fn new(num_rows: usize, num_cols: usize, M: Vec<SparseMatEntry>) -> Self {
        SparseMatrix { num_rows, num_cols, M }
    }

    pub fn num_entries(&self) -> usize {
        self.M.len()
    }

    pub fn entries(&self) -> &[SparseMatEntry] {
        &self.M
    }

    /// Multiply the sparse matrix by a dense vector z
    /// Returns M * z
    pub fn multiply_vec(&self, z: &[Scalar]) -> Vec<Scalar> {
        assert_eq!(z.len(), self.num_cols);

        let mut result = vec![Scalar::zero(); self.num_rows];
        for entry in &self.M {
            result[entry.row] += entry.val * z[entry.col];
        }
        result
    }

    /// Entries grouped by row, in column order within a row
    pub fn rows(&self) -> Vec<Vec<(usize, Scalar)>> {
        let mut rows = vec![Vec::new(); self.num_rows];
        for entry in &self.M {
            rows[entry.row].push((entry.col, entry.val));
        }
        for row in rows.iter_mut() {
            row.sort_by_key(|(col, _)| *col);
        }
        rows
    }
}
