//! Error types for trivia circuits, proofs and verifiers

use thiserror::Error;

/// A value could not be mapped onto a BN254 scalar field element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("value is {0} bytes long, at most 32 bytes fit in a field element")]
    TooLong(usize),
    #[error("value is not below the BN254 scalar field modulus")]
    OutOfRange,
    #[error("invalid integer literal: {0:?}")]
    InvalidLiteral(String),
}

/// The commitment function cannot be evaluated on the given values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("Cannot commit to an empty sequence")]
    Empty,
    #[error("No Poseidon parameters for {0} inputs")]
    UnsupportedArity(usize),
    #[error("Poseidon error: {0}")]
    Poseidon(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum R1CSError {
    #[error("Invalid index in R1CS matrix")]
    InvalidIndex,
    #[error("Invalid number of inputs: expected {expected}, got {actual}")]
    InvalidNumberOfInputs { expected: usize, actual: usize },
    #[error("Missing assignment for {0}")]
    AssignmentMissing(String),
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Claim kind does not match the circuit mode: {0}")]
    ClaimKindMismatch(&'static str),
    #[error("A quiz needs at least one question and one option per question")]
    EmptyQuiz,
    #[error("Witness shape does not match the compiled circuit: {0}")]
    ShapeMismatch(String),
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    /// The witness violates a constraint. This is how false claims are
    /// refused, not an internal fault.
    #[error("Constraint system is not satisfiable: constraint {constraint} ({label}) fails")]
    Unsatisfiable { constraint: usize, label: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofVerifyError {
    /// Structurally invalid proof or public input vector.
    #[error("Malformed proof: {0}")]
    MalformedProof(String),
    /// Well-formed proof rejected for the given public inputs.
    #[error("Proof verification failed: {0}")]
    VerificationFailed(String),
    #[error("Verifying key was generated for a different circuit")]
    CircuitMismatch,
}

/// Revert reasons of the on-chain verifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Revert {
    #[error("Invalid proof length: expected {expected} bytes, got {actual}")]
    InvalidProofLength { expected: usize, actual: usize },
    #[error("Public input {0} is not a field element")]
    InputNotInField(usize),
    #[error("Invalid curve point {0}")]
    InvalidPoint(&'static str),
    #[error("Proof failed")]
    ProofFailed,
}

impl Revert {
    /// True for reverts caused by undecodable calldata rather than a rejected proof.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Revert::ProofFailed)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Unsupported commitment version {found}, this build implements version {supported}")]
    UnsupportedCommitmentVersion { found: u32, supported: u32 },
    #[error("Configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for the prove/verify pipeline.
#[derive(Error, Debug)]
pub enum TriviaError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    R1CS(#[from] R1CSError),
    #[error(transparent)]
    Commitment(#[from] CommitmentError),
    #[error(transparent)]
    Verify(#[from] ProofVerifyError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Proving backend error: {0}")]
    Backend(String),
    #[error("Key serialization error: {0}")]
    Serialization(String),
}

impl TriviaError {
    /// True when the attempt was refused because its claim is false.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, TriviaError::R1CS(R1CSError::Unsatisfiable { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsatisfiable_is_recognised() {
        let err: TriviaError = R1CSError::Unsatisfiable {
            constraint: 3,
            label: "score".to_string(),
        }
        .into();
        assert!(err.is_unsatisfiable());
        assert!(err.to_string().contains("constraint 3 (score)"));

        let err: TriviaError = EncodingError::OutOfRange.into();
        assert!(!err.is_unsatisfiable());
    }

    #[test]
    fn test_revert_reasons() {
        assert_eq!(Revert::ProofFailed.to_string(), "Proof failed");
        assert!(!Revert::ProofFailed.is_malformed());
        assert!(Revert::InputNotInField(2).is_malformed());
    }
}
