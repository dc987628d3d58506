//! Question instances and attempts against them.

use crate::circuit::CircuitMode;
use crate::errors::R1CSError;
use crate::poseidon::AnswerCommitment;
use crate::scalar::Scalar;
use crate::witness::{Claim, PrivateInputs, PublicInputs};
use serde::{Deserialize, Serialize};

/// A published question (or quiz). The commitment is computed once, at
/// publication, and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    mode: CircuitMode,
    options: Vec<Scalar>,
    commitment: AnswerCommitment,
}

impl Question {
    pub fn publish(
        mode: CircuitMode,
        options: Vec<Scalar>,
        answers: &PrivateInputs,
    ) -> Result<Self, R1CSError> {
        mode.validate()?;
        if options.len() != mode.num_options() {
            return Err(R1CSError::LengthMismatch {
                what: "options",
                expected: mode.num_options(),
                actual: options.len(),
            });
        }
        check_len("answers", mode.num_questions(), answers.answers().len())?;

        let commitment = answers.commitment()?;
        tracing::debug!(?mode, %commitment, "published question");
        Ok(Question {
            mode,
            options,
            commitment,
        })
    }

    pub fn mode(&self) -> CircuitMode {
        self.mode
    }

    pub fn options(&self) -> &[Scalar] {
        &self.options
    }

    pub fn commitment(&self) -> AnswerCommitment {
        self.commitment
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub guesses: Vec<Scalar>,
    pub claim: Claim,
}

impl Attempt {
    pub fn new(guesses: Vec<Scalar>, claim: Claim) -> Self {
        Attempt { guesses, claim }
    }

    /// An attempt whose claim is the true result for `answers`.
    pub fn honest(
        question: &Question,
        answers: &PrivateInputs,
        guesses: Vec<Scalar>,
    ) -> Result<Self, R1CSError> {
        let n = question.mode.num_questions();
        check_len("answers", n, answers.answers().len())?;
        check_len("guesses", n, guesses.len())?;

        let matches = answers
            .answers()
            .iter()
            .zip(&guesses)
            .filter(|(a, g)| a == g)
            .count() as u64;
        let claim = match question.mode {
            CircuitMode::Single => Claim::Correctness(matches == 1),
            CircuitMode::Quiz { .. } => Claim::Score(matches),
        };
        Ok(Attempt { guesses, claim })
    }

    pub fn public_inputs(&self, question: &Question) -> PublicInputs {
        PublicInputs {
            answer_hash: question.commitment,
            options: question.options.clone(),
            guesses: self.guesses.clone(),
            claim: self.claim,
        }
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), R1CSError> {
    if expected != actual {
        return Err(R1CSError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
