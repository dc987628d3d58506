//! The answer-verification circuit.
//!
//! Single-question mode proves `commit([answer]) == answer_hash` and
//! `(answer == guess) == correctness`. Quiz mode proves
//! `commit(answers) == answers_hash` and `score == #{i : answers[i] == guesses[i]}`.
//!
//! Public inputs are allocated in the order fixed by [`PublicInputSchema`]:
//! `[answer_hash, guess, correctness]` or
//! `[answers_hash, options..., guesses..., score]`. Options are bound only by
//! being part of the public input vector.

use crate::constraint_system::{ConstraintSystem, SynthesisMode};
use crate::errors::R1CSError;
use crate::gadgets::{self, is_equal};
use crate::linear_combination::{LinearCombination, Variable};
use crate::r1cs::R1CSShape;
use crate::scalar::Scalar;
use crate::timer::Timer;
use crate::witness::{Claim, PrivateInputs, PublicInputs};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitMode {
    /// One question, public `correctness` flag
    Single,
    /// `questions` questions with `options_per_question` public options each,
    /// public `score`
    Quiz {
        questions: usize,
        options_per_question: usize,
    },
}

impl CircuitMode {
    pub fn num_questions(&self) -> usize {
        match self {
            CircuitMode::Single => 1,
            CircuitMode::Quiz { questions, .. } => *questions,
        }
    }

    /// Number of public option values; single-question circuits take none.
    pub fn num_options(&self) -> usize {
        match self {
            CircuitMode::Single => 0,
            CircuitMode::Quiz {
                questions,
                options_per_question,
            } => questions * options_per_question,
        }
    }

    pub fn validate(&self) -> Result<(), R1CSError> {
        match self {
            CircuitMode::Quiz {
                questions,
                options_per_question,
            } if *questions == 0 || *options_per_question == 0 => Err(R1CSError::EmptyQuiz),
            _ => Ok(()),
        }
    }
}

/// Layout of the public input vector shared by prover, off-chain verifier
/// and contract. Reordering it is a breaking change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputSchema {
    mode: CircuitMode,
}

impl PublicInputSchema {
    pub fn new(mode: CircuitMode) -> Self {
        PublicInputSchema { mode }
    }

    pub fn mode(&self) -> CircuitMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        2 + self.mode.num_options() + self.mode.num_questions()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn labels(&self) -> Vec<String> {
        match self.mode {
            CircuitMode::Single => vec![
                "answer_hash".to_string(),
                "guess".to_string(),
                "correctness".to_string(),
            ],
            CircuitMode::Quiz { questions, .. } => {
                let mut labels = Vec::with_capacity(self.len());
                labels.push("answers_hash".to_string());
                labels.extend((0..self.mode.num_options()).map(|i| format!("options[{i}]")));
                labels.extend((0..questions).map(|i| format!("guesses[{i}]")));
                labels.push("score".to_string());
                labels
            }
        }
    }

    /// Checks lengths and claim kind against the circuit mode.
    pub fn validate(&self, public: &PublicInputs) -> Result<(), R1CSError> {
        if public.options.len() != self.mode.num_options() {
            return Err(R1CSError::LengthMismatch {
                what: "options",
                expected: self.mode.num_options(),
                actual: public.options.len(),
            });
        }
        if public.guesses.len() != self.mode.num_questions() {
            return Err(R1CSError::LengthMismatch {
                what: "guesses",
                expected: self.mode.num_questions(),
                actual: public.guesses.len(),
            });
        }
        match (self.mode, &public.claim) {
            (CircuitMode::Single, Claim::Correctness(_)) => Ok(()),
            (CircuitMode::Quiz { .. }, Claim::Score(_)) => Ok(()),
            (CircuitMode::Single, Claim::Score(_)) => Err(R1CSError::ClaimKindMismatch(
                "single-question circuits take a correctness flag",
            )),
            (CircuitMode::Quiz { .. }, Claim::Correctness(_)) => {
                Err(R1CSError::ClaimKindMismatch("quiz circuits take a score"))
            }
        }
    }

    /// The public input vector in circuit order.
    pub fn flatten(&self, public: &PublicInputs) -> Result<Vec<Scalar>, R1CSError> {
        self.validate(public)?;
        let mut values = Vec::with_capacity(self.len());
        values.push(public.answer_hash.as_scalar());
        values.extend_from_slice(&public.options);
        values.extend_from_slice(&public.guesses);
        values.push(public.claim.to_scalar());
        Ok(values)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TriviaCircuit {
    mode: CircuitMode,
}

impl TriviaCircuit {
    pub fn new(mode: CircuitMode) -> Result<Self, R1CSError> {
        mode.validate()?;
        Ok(TriviaCircuit { mode })
    }

    pub fn single() -> Self {
        TriviaCircuit {
            mode: CircuitMode::Single,
        }
    }

    pub fn quiz(questions: usize, options_per_question: usize) -> Result<Self, R1CSError> {
        Self::new(CircuitMode::Quiz {
            questions,
            options_per_question,
        })
    }

    pub fn mode(&self) -> CircuitMode {
        self.mode
    }

    pub fn schema(&self) -> PublicInputSchema {
        PublicInputSchema::new(self.mode)
    }

    /// Writes the circuit's constraints into `cs`. `values` must be present
    /// exactly when `cs` is in prove mode.
    pub fn synthesize(
        &self,
        cs: &mut ConstraintSystem,
        values: Option<(&PrivateInputs, &PublicInputs)>,
    ) -> Result<(), R1CSError> {
        let n = self.mode.num_questions();
        let schema = self.schema();

        let public = values.map(|(_, public)| schema.flatten(public)).transpose()?;
        if let Some((private, _)) = values {
            if private.answers().len() != n {
                return Err(R1CSError::LengthMismatch {
                    what: "answers",
                    expected: n,
                    actual: private.answers().len(),
                });
            }
        }
        let input = |i: usize| public.as_ref().map(|p| p[i]);
        let answer = |i: usize| values.map(|(private, _)| private.answers()[i]);

        // public inputs, in schema order
        let answer_hash = cs.alloc_input(input(0))?;
        for i in 0..self.mode.num_options() {
            cs.alloc_input(input(1 + i))?;
        }
        let guess_offset = 1 + self.mode.num_options();
        let guesses = (0..n)
            .map(|i| cs.alloc_input(input(guess_offset + i)))
            .collect::<Result<Vec<_>, _>>()?;
        let claim = cs.alloc_input(input(schema.len() - 1))?;

        let answers = (0..n)
            .map(|i| cs.alloc_private(answer(i)))
            .collect::<Result<Vec<Variable>, _>>()?;

        let answer_lcs: Vec<LinearCombination> = answers.iter().map(|a| (*a).into()).collect();
        let digest = gadgets::poseidon::commit(cs, &answer_lcs)?;
        cs.enforce_equal("commit(answers) == answer_hash", digest, answer_hash);

        let mut matches = LinearCombination::zero();
        for (i, (a, g)) in answers.iter().zip(&guesses).enumerate() {
            let eq = is_equal(cs, *a, *g, &format!("answers[{i}] == guesses[{i}]"))?;
            matches = matches + eq;
        }

        // each flag is boolean, so this also bounds the claim to [0, n]
        let label = match self.mode {
            CircuitMode::Single => "correctness == (answer == guess)",
            CircuitMode::Quiz { .. } => "score == matches",
        };
        cs.enforce_equal(label, matches, claim);
        Ok(())
    }

    /// Synthesises the shape once, without values.
    #[tracing::instrument(skip_all, name = "TriviaCircuit::compile")]
    pub fn compile(&self) -> Result<CompiledCircuit, R1CSError> {
        let timer = Timer::new("TriviaCircuit::compile");
        let mut cs = ConstraintSystem::new(SynthesisMode::Setup);
        self.synthesize(&mut cs, None)?;
        let (shape, _) = cs.finalize()?;
        timer.stop();

        let digest = shape.digest();
        tracing::debug!(
            mode = ?self.mode,
            constraints = shape.get_num_cons(),
            variables = shape.get_num_vars(),
            inputs = shape.get_num_inputs(),
            digest = %hex::encode(digest),
            "compiled trivia circuit"
        );
        Ok(CompiledCircuit {
            mode: self.mode,
            shape,
            schema: self.schema(),
            digest,
        })
    }
}

/// A compiled circuit: its constraint shape, public input layout and digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledCircuit {
    pub mode: CircuitMode,
    pub shape: R1CSShape,
    pub schema: PublicInputSchema,
    pub digest: [u8; 32],
}

impl CompiledCircuit {
    pub fn circuit(&self) -> TriviaCircuit {
        TriviaCircuit { mode: self.mode }
    }
}
