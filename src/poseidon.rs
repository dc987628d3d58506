//! Answer commitment function: circomlib-compatible Poseidon over the BN254
//! scalar field.
//!
//! Up to [`MAX_ARITY`] values are hashed with a single `Poseidon(n)` call,
//! the same function circomlib's `Poseidon(n)` template and
//! `light_poseidon::Poseidon::new_circom(n)` compute (S-box `x^5`, width
//! `n + 1`, zero domain tag, output lane 0). Longer sequences are cut into
//! chunks of `MAX_ARITY`, every chunk is hashed, and the chunk digests are
//! committed the same way. The number of answers is fixed by the circuit,
//! so commitments are only ever compared across sequences of equal length.

use crate::errors::CommitmentError;
use crate::scalar::Scalar;
use ark_bn254::Fr;
use light_poseidon::parameters::bn254_x5;
use light_poseidon::{Poseidon, PoseidonHasher};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag of the commitment function, checked when loading configs.
pub const COMMITMENT_VERSION: u32 = 1;

/// Inputs of the widest circom parameter set (`t = 13`).
pub const MAX_ARITY: usize = 12;

/// S-box exponent the in-circuit permutation is written for.
pub const ALPHA: u64 = 5;

/// Round constants and MDS matrix of one circom Poseidon instance, laid
/// out per round for the constraint gadget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoseidonParams {
    pub width: usize,
    pub full_rounds: usize,
    pub partial_rounds: usize,
    /// One row of `width` constants per round
    pub round_constants: Vec<Vec<Scalar>>,
    pub mds: Vec<Vec<Scalar>>,
}

impl PoseidonParams {
    /// Parameters for hashing `arity` inputs.
    pub fn circom(arity: usize) -> Result<Self, CommitmentError> {
        if arity == 0 || arity > MAX_ARITY {
            return Err(CommitmentError::UnsupportedArity(arity));
        }
        let width = arity + 1;
        let params = bn254_x5::get_poseidon_parameters::<Fr>(width as u8)
            .map_err(|e| CommitmentError::Poseidon(e.to_string()))?;
        if params.alpha != ALPHA || params.width != width {
            return Err(CommitmentError::Poseidon(format!(
                "unexpected parameter set: width {}, alpha {}",
                params.width, params.alpha
            )));
        }

        let round_constants: Vec<Vec<Scalar>> = params
            .ark
            .chunks_exact(width)
            .map(|row| row.iter().copied().map(Scalar).collect())
            .collect();
        if round_constants.len() != params.full_rounds + params.partial_rounds {
            return Err(CommitmentError::Poseidon(format!(
                "{} round constants for {} rounds",
                params.ark.len(),
                params.full_rounds + params.partial_rounds
            )));
        }
        let mds = params
            .mds
            .iter()
            .map(|row| row.iter().copied().map(Scalar).collect())
            .collect();

        Ok(PoseidonParams {
            width,
            full_rounds: params.full_rounds,
            partial_rounds: params.partial_rounds,
            round_constants,
            mds,
        })
    }

    pub fn arity(&self) -> usize {
        self.width - 1
    }

    pub fn total_rounds(&self) -> usize {
        self.full_rounds + self.partial_rounds
    }

    /// Whether `round` applies the S-box to every lane.
    pub fn is_full_round(&self, round: usize) -> bool {
        let half = self.full_rounds / 2;
        round < half || round >= half + self.partial_rounds
    }
}

/// `Poseidon(n)` over `1..=MAX_ARITY` values.
pub fn hash(values: &[Scalar]) -> Result<Scalar, CommitmentError> {
    if values.is_empty() || values.len() > MAX_ARITY {
        return Err(CommitmentError::UnsupportedArity(values.len()));
    }
    let mut hasher = Poseidon::<Fr>::new_circom(values.len())
        .map_err(|e| CommitmentError::Poseidon(e.to_string()))?;
    let inputs: Vec<Fr> = values.iter().map(|v| v.0).collect();
    let digest = hasher
        .hash(&inputs)
        .map_err(|e| CommitmentError::Poseidon(e.to_string()))?;
    Ok(Scalar(digest))
}

/// Commits to a non-empty sequence of field elements.
pub fn commit(values: &[Scalar]) -> Result<Scalar, CommitmentError> {
    match values.len() {
        0 => Err(CommitmentError::Empty),
        n if n <= MAX_ARITY => hash(values),
        _ => {
            let digests = values
                .chunks(MAX_ARITY)
                .map(hash)
                .collect::<Result<Vec<_>, _>>()?;
            commit(&digests)
        }
    }
}

/// Published commitment to the answer(s) of a question instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerCommitment(Scalar);

impl AnswerCommitment {
    /// Commits to the (encoded) answers.
    pub fn new(answers: &[Scalar]) -> Result<Self, CommitmentError> {
        commit(answers).map(AnswerCommitment)
    }

    /// Wraps an already published commitment value.
    pub fn from_scalar(value: Scalar) -> Self {
        AnswerCommitment(value)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        Scalar::from_hex(s).map(AnswerCommitment)
    }

    pub fn as_scalar(&self) -> Scalar {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for AnswerCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerCommitment({})", self.0.to_hex())
    }
}

impl fmt::Display for AnswerCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scalars(values: &[u64]) -> Vec<Scalar> {
        values.iter().map(|v| Scalar::from_u64(*v)).collect()
    }

    #[test]
    fn test_circomlib_vector() {
        // circomlibjs poseidon([1, 2])
        let expected =
            Scalar::from_hex("0x115cc0f5e7d690413df64c6b9662e9cf2a3617f2743245519e19607a4417189a")
                .unwrap();
        assert_eq!(commit(&scalars(&[1, 2])).unwrap(), expected);
    }

    #[test]
    fn test_params_shape() {
        for arity in 1..=MAX_ARITY {
            let params = PoseidonParams::circom(arity).unwrap();
            assert_eq!(params.width, arity + 1);
            assert_eq!(params.full_rounds, 8);
            assert_eq!(params.round_constants.len(), params.total_rounds());
            assert!(params.round_constants.iter().all(|row| row.len() == params.width));
            assert_eq!(params.mds.len(), params.width);
        }

        let params = PoseidonParams::circom(2).unwrap();
        assert_eq!(params.partial_rounds, 57);
        let full: Vec<usize> = (0..params.total_rounds())
            .filter(|r| params.is_full_round(*r))
            .collect();
        assert_eq!(full, vec![0, 1, 2, 3, 61, 62, 63, 64]);
    }

    #[test]
    fn test_unsupported_arity() {
        assert_eq!(
            PoseidonParams::circom(0),
            Err(CommitmentError::UnsupportedArity(0))
        );
        assert_eq!(
            PoseidonParams::circom(MAX_ARITY + 1),
            Err(CommitmentError::UnsupportedArity(MAX_ARITY + 1))
        );
        assert_eq!(
            hash(&[Scalar::one(); MAX_ARITY + 1]),
            Err(CommitmentError::UnsupportedArity(MAX_ARITY + 1))
        );
        assert_eq!(commit(&[]), Err(CommitmentError::Empty));
    }

    #[test]
    fn test_commit_deterministic() {
        let values = scalars(&[123456789]);
        assert_eq!(commit(&values), commit(&values));
        assert_eq!(
            AnswerCommitment::new(&values).unwrap().as_scalar(),
            commit(&values).unwrap()
        );
    }

    #[test]
    fn test_commit_separates_inputs() {
        let a = Scalar::from_u64(123456789);
        let b = Scalar::from_u64(987654321);
        assert_ne!(commit(&[a]), commit(&[b]));
        assert_ne!(commit(&[a, b]), commit(&[b, a]));
        assert_ne!(commit(&[a]), commit(&[a, Scalar::zero()]));
    }

    #[test]
    fn test_long_sequences_hash_chunk_digests() {
        let values: Vec<Scalar> = (0..2 * MAX_ARITY as u64 + 1).map(Scalar::from_u64).collect();
        let digests = vec![
            hash(&values[..MAX_ARITY]).unwrap(),
            hash(&values[MAX_ARITY..2 * MAX_ARITY]).unwrap(),
            hash(&values[2 * MAX_ARITY..]).unwrap(),
        ];
        assert_eq!(commit(&values).unwrap(), hash(&digests).unwrap());

        let mut changed = values.clone();
        changed[MAX_ARITY + 3] += Scalar::one();
        assert_ne!(commit(&values), commit(&changed));
    }

    #[test]
    fn test_random_pairs_do_not_collide() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let v1: Vec<Scalar> = (0..3).map(|_| Scalar::random(&mut rng)).collect();
            let v2: Vec<Scalar> = (0..3).map(|_| Scalar::random(&mut rng)).collect();
            assert_ne!(commit(&v1), commit(&v2));
        }
    }

    #[test]
    fn test_commitment_hex() {
        let c = AnswerCommitment::new(&[Scalar::from_u64(1)]).unwrap();
        assert_eq!(AnswerCommitment::from_hex(&c.to_hex()), Some(c));
    }
}
