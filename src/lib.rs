//! Zero-knowledge trivia answer verification over BN254
//!
//! A question publishes a circomlib-compatible Poseidon commitment to its secret answer(s). A
//! prover later shows, without revealing the answers, that a guess matches
//! the committed answer (single-question mode) or that a claimed score is
//! the exact number of matching guesses (quiz mode).
//!
//! # Pipeline
//! `TriviaCircuit::compile` → `groth16::setup` → `assemble_witness` →
//! `groth16::prove` → `Verifier::verify`, either off-chain with
//! `OffchainVerifier` or through the `TriviaVerifierContract` calldata
//! interface. Both verifiers implement the same `Verifier` trait.
//!
//! # Encoding
//! Integers are encoded as big-endian 32-byte words; values not below the
//! scalar field modulus are rejected, never reduced.

#![allow(non_snake_case)]

pub mod circuit;
pub mod config;
pub mod constraint_system;
pub mod contract;
pub mod encoding;
pub mod errors;
pub mod gadgets;
pub mod groth16;
pub mod linear_combination;
pub mod poseidon;
pub mod proof;
pub mod question;
pub mod r1cs;
pub mod scalar;
pub mod solidity;
pub mod sparse_matrix;
pub mod timer;
pub mod verifier;
pub mod witness;

// Re-exports
pub use circuit::{CircuitMode, CompiledCircuit, PublicInputSchema, TriviaCircuit};
pub use config::CircuitConfig;
pub use contract::TriviaVerifierContract;
pub use encoding::{encode_all, encode_be_bytes, FieldEncode};
pub use errors::{
    CommitmentError, ConfigError, EncodingError, ProofVerifyError, R1CSError, Revert, TriviaError,
};
pub use groth16::{prove, prove_batch, setup, ProvingKey, VerifyingKey};
pub use poseidon::{commit, AnswerCommitment, COMMITMENT_VERSION, MAX_ARITY};
pub use proof::{encode_calldata, TriviaProof};
pub use question::{Attempt, Question};
pub use r1cs::R1CSShape;
pub use scalar::Scalar;
pub use solidity::render_solidity_verifier;
pub use verifier::{verify_batch, OffchainVerifier, Verifier};
pub use witness::{assemble_witness, Claim, PrivateInputs, PublicInputs, Witness};
