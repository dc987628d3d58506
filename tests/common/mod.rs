#![allow(dead_code)]

use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::SeedableRng;
use trivia_bn254::{
    assemble_witness, encode_calldata, prove, setup, Attempt, CircuitMode, CompiledCircuit,
    OffchainVerifier, PrivateInputs, ProvingKey, PublicInputs, Question, Scalar, TriviaCircuit,
    TriviaError, TriviaProof, TriviaVerifierContract, Verifier, VerifyingKey,
};

pub const ANSWER: u64 = 123456789;
pub const WRONG_GUESS: u64 = 987654321;
pub const QUIZ_ANSWERS: [u64; 3] = [123456789, 9876578, 134256743];
pub const OPTIONS_PER_QUESTION: usize = 4;

pub struct Fixture {
    pub circuit: CompiledCircuit,
    pub pk: ProvingKey,
    pub vk: VerifyingKey,
}

impl Fixture {
    pub fn new(circuit: TriviaCircuit) -> Self {
        let mut rng = StdRng::seed_from_u64(0);
        let circuit = circuit.compile().unwrap();
        let (pk, vk) = setup(&circuit, &mut rng).unwrap();
        Fixture { circuit, pk, vk }
    }

    pub fn prove(
        &self,
        private: &PrivateInputs,
        public: &PublicInputs,
    ) -> Result<TriviaProof, TriviaError> {
        let mut rng = StdRng::seed_from_u64(0);
        let witness = assemble_witness(&self.circuit, private, public)?;
        prove(&self.pk, &self.circuit, &witness, &mut rng)
    }
}

lazy_static! {
    pub static ref SINGLE: Fixture = Fixture::new(TriviaCircuit::single());
    pub static ref QUIZ: Fixture =
        Fixture::new(TriviaCircuit::quiz(QUIZ_ANSWERS.len(), OPTIONS_PER_QUESTION).unwrap());
}

/// Verifies with both backends, asserts they agree and returns the verdict.
pub fn check_both(fixture: &Fixture, proof: &TriviaProof, public: &PublicInputs) -> bool {
    let offchain = OffchainVerifier::new(&fixture.vk).verify(proof, public).unwrap();
    let contract = TriviaVerifierContract::deploy(&fixture.vk);
    let inputs = fixture.vk.schema().flatten(public).unwrap();
    let onchain = contract.verify(&encode_calldata(&inputs, proof)).unwrap();
    assert_eq!(offchain, onchain, "verifiers disagree");
    offchain
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn scalars(values: &[u64]) -> Vec<Scalar> {
    values.iter().map(|v| Scalar::from_u64(*v)).collect()
}

/// Single-question public inputs with a correctly computed commitment.
pub fn single_inputs(answer: u64, guess: u64, correct: bool) -> (PrivateInputs, PublicInputs) {
    let private = PrivateInputs::encode(&[answer]).unwrap();
    let public =
        PublicInputs::single(private.commitment().unwrap(), Scalar::from_u64(guess), correct);
    (private, public)
}

pub fn quiz_question() -> (Question, PrivateInputs) {
    let answers = PrivateInputs::encode(&QUIZ_ANSWERS).unwrap();
    // every block of options contains its answer
    let options: Vec<Scalar> = QUIZ_ANSWERS
        .iter()
        .enumerate()
        .flat_map(|(i, answer)| {
            let mut block = scalars(&[*answer]);
            block.extend((1..OPTIONS_PER_QUESTION as u64).map(|k| Scalar::from_u64(1000 * i as u64 + k)));
            block
        })
        .collect();
    let mode = CircuitMode::Quiz {
        questions: QUIZ_ANSWERS.len(),
        options_per_question: OPTIONS_PER_QUESTION,
    };
    let question = Question::publish(mode, options, &answers).unwrap();
    (question, answers)
}

pub fn quiz_inputs(guesses: &[u64], score: u64) -> (PrivateInputs, PublicInputs) {
    let (question, answers) = quiz_question();
    let attempt = Attempt::new(scalars(guesses), trivia_bn254::Claim::Score(score));
    (answers, attempt.public_inputs(&question))
}
