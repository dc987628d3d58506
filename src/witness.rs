//! Public and private circuit inputs and witness assembly.

use crate::circuit::CompiledCircuit;
use crate::constraint_system::{Assignment, ConstraintSystem, SynthesisMode};
use crate::encoding::{encode_all, FieldEncode};
use crate::errors::{CommitmentError, EncodingError, R1CSError};
use crate::poseidon::AnswerCommitment;
use crate::r1cs::R1CSShape;
use crate::scalar::Scalar;
use crate::timer::Timer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The claimed result of an attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Claim {
    /// Single-question mode: the guess is (or is not) the answer
    Correctness(bool),
    /// Quiz mode: number of guesses matching their answers
    Score(u64),
}

impl Claim {
    pub fn to_scalar(&self) -> Scalar {
        match self {
            Claim::Correctness(correct) => Scalar::from(*correct),
            Claim::Score(score) => Scalar::from_u64(*score),
        }
    }
}

/// Values the verifier sees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    pub answer_hash: AnswerCommitment,
    /// Empty in single-question mode
    pub options: Vec<Scalar>,
    pub guesses: Vec<Scalar>,
    pub claim: Claim,
}

impl PublicInputs {
    pub fn single(answer_hash: AnswerCommitment, guess: Scalar, correct: bool) -> Self {
        PublicInputs {
            answer_hash,
            options: Vec::new(),
            guesses: vec![guess],
            claim: Claim::Correctness(correct),
        }
    }

    pub fn quiz(
        answers_hash: AnswerCommitment,
        options: Vec<Scalar>,
        guesses: Vec<Scalar>,
        score: u64,
    ) -> Self {
        PublicInputs {
            answer_hash: answers_hash,
            options,
            guesses,
            claim: Claim::Score(score),
        }
    }
}

/// The secret answers. Deliberately neither serialisable nor printable.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateInputs {
    answers: Vec<Scalar>,
}

impl PrivateInputs {
    pub fn new(answers: Vec<Scalar>) -> Self {
        PrivateInputs { answers }
    }

    /// Encodes integer answers with the field encoding convention.
    pub fn encode<T: FieldEncode>(answers: &[T]) -> Result<Self, EncodingError> {
        Ok(PrivateInputs {
            answers: encode_all(answers)?,
        })
    }

    pub fn answers(&self) -> &[Scalar] {
        &self.answers
    }

    pub fn commitment(&self) -> Result<AnswerCommitment, CommitmentError> {
        AnswerCommitment::new(&self.answers)
    }
}

impl fmt::Debug for PrivateInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateInputs")
            .field("answers", &format_args!("<{} redacted>", self.answers.len()))
            .finish()
    }
}

/// Full assignment for one attempt. Lives only as long as proof generation.
pub struct Witness {
    assignment: Assignment,
    circuit_digest: [u8; 32],
}

impl Witness {
    pub fn vars(&self) -> &[Scalar] {
        &self.assignment.vars
    }

    pub fn public_inputs(&self) -> &[Scalar] {
        &self.assignment.inputs
    }

    pub fn circuit_digest(&self) -> &[u8; 32] {
        &self.circuit_digest
    }
}

impl fmt::Debug for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Witness")
            .field("vars", &format_args!("<{} redacted>", self.assignment.vars.len()))
            .field("inputs", &self.assignment.inputs)
            .finish()
    }
}

/// Binds `private` and `public` to `circuit`.
///
/// Fails on layout problems only; a witness for a false claim is assembled
/// fine and refused later by the prover's satisfiability check.
#[tracing::instrument(skip_all, name = "assemble_witness")]
pub fn assemble_witness(
    circuit: &CompiledCircuit,
    private: &PrivateInputs,
    public: &PublicInputs,
) -> Result<Witness, R1CSError> {
    let timer = Timer::new("assemble_witness");
    let mut cs = ConstraintSystem::new(SynthesisMode::Prove);
    circuit.circuit().synthesize(&mut cs, Some((private, public)))?;
    let (shape, assignment) = cs.finalize()?;
    timer.stop();

    check_shape(&shape, &circuit.shape)?;
    let assignment = assignment.ok_or_else(|| R1CSError::AssignmentMissing("witness".to_string()))?;

    Ok(Witness {
        assignment,
        circuit_digest: circuit.digest,
    })
}

/// The prove-mode run must reproduce the compiled shape exactly.
fn check_shape(shape: &R1CSShape, compiled: &R1CSShape) -> Result<(), R1CSError> {
    let counts = |s: &R1CSShape| (s.get_num_cons(), s.get_num_vars(), s.get_num_inputs());
    if counts(shape) != counts(compiled) {
        let (cons, vars, inputs) = counts(shape);
        let (want_cons, want_vars, want_inputs) = counts(compiled);
        return Err(R1CSError::ShapeMismatch(format!(
            "{cons} constraints, {vars} variables, {inputs} inputs; \
             compiled circuit has {want_cons}, {want_vars}, {want_inputs}"
        )));
    }
    if shape != compiled {
        return Err(R1CSError::ShapeMismatch(
            "constraint matrices differ from the compiled circuit".to_string(),
        ));
    }
    Ok(())
}
