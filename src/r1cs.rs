//! R1CS constraint system shape

use crate::errors::R1CSError;
use crate::scalar::Scalar;
use crate::sparse_matrix::{SparseMatEntry, SparseMatrix};
use crate::timer::Timer;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// R1CS constraint system shape (A, B, C matrices)
///
/// Columns follow the layout `z = (vars, 1, inputs)`: private variables
/// first, then the constant one, then the public inputs in their
/// public-input-vector order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct R1CSShape {
    num_cons: usize,
    num_vars: usize,
    num_inputs: usize,
    pub A: SparseMatrix,
    pub B: SparseMatrix,
    pub C: SparseMatrix,
    /// One human readable label per constraint
    labels: Vec<String>,
}

impl R1CSShape {
    /// Create new R1CS shape from sparse matrix triplets
    pub fn new(
        num_cons: usize,
        num_vars: usize,
        num_inputs: usize,
        A: &[(usize, usize, Scalar)],
        B: &[(usize, usize, Scalar)],
        C: &[(usize, usize, Scalar)],
        labels: Vec<String>,
    ) -> Result<Self, R1CSError> {
        if labels.len() != num_cons {
            return Err(R1CSError::LengthMismatch {
                what: "constraint labels",
                expected: num_cons,
                actual: labels.len(),
            });
        }

        let num_cols = num_vars + 1 + num_inputs;
        let convert = |triplets: &[(usize, usize, Scalar)]| -> Result<SparseMatrix, R1CSError> {
            let entries = triplets
                .iter()
                .map(|(row, col, val)| {
                    if *row >= num_cons || *col >= num_cols {
                        return Err(R1CSError::InvalidIndex);
                    }
                    Ok(SparseMatEntry::new(*row, *col, *val))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SparseMatrix::new(num_cons, num_cols, entries))
        };

        let shape = Self {
            num_cons,
            num_vars,
            num_inputs,
            A: convert(A)?,
            B: convert(B)?,
            C: convert(C)?,
            labels,
        };

        tracing::debug!(
            num_cons,
            num_vars,
            num_inputs,
            nnz_a = shape.A.num_entries(),
            nnz_b = shape.B.num_entries(),
            nnz_c = shape.C.num_entries(),
            "R1CS shape built"
        );
        Ok(shape)
    }

    pub fn get_num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn get_num_cons(&self) -> usize {
        self.num_cons
    }

    pub fn get_num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn label(&self, constraint: usize) -> Option<&str> {
        self.labels.get(constraint).map(String::as_str)
    }

    /// Column of the constant one in `z`
    pub fn one_column(&self) -> usize {
        self.num_vars
    }

    /// Keccak-256 digest of the shape; keys are bound to it
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        bincode::serialize_into(&mut hasher, self).expect("hashing an in-memory shape cannot fail");
        hasher.finalize().into()
    }

    /// Check if the R1CS is satisfied by the given assignment
    pub fn is_sat(&self, vars: &[Scalar], inputs: &[Scalar]) -> bool {
        self.check_sat(vars, inputs).is_ok()
    }

    /// Like [`R1CSShape::is_sat`], reporting the first violated constraint
    pub fn check_sat(&self, vars: &[Scalar], inputs: &[Scalar]) -> Result<(), R1CSError> {
        if vars.len() != self.num_vars {
            return Err(R1CSError::LengthMismatch {
                what: "private variables",
                expected: self.num_vars,
                actual: vars.len(),
            });
        }
        if inputs.len() != self.num_inputs {
            return Err(R1CSError::InvalidNumberOfInputs {
                expected: self.num_inputs,
                actual: inputs.len(),
            });
        }

        let timer = Timer::new("R1CSShape::check_sat");
        let mut z = vars.to_vec();
        z.push(Scalar::one());
        z.extend(inputs);

        let Az = self.A.multiply_vec(&z);
        let Bz = self.B.multiply_vec(&z);
        let Cz = self.C.multiply_vec(&z);
        timer.stop();

        match (0..self.num_cons).find(|&i| Az[i] * Bz[i] != Cz[i]) {
            None => Ok(()),
            Some(i) => Err(R1CSError::Unsatisfiable {
                constraint: i,
                label: self.labels[i].clone(),
            }),
        }
    }
}
