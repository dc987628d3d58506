//! Walks through publishing a quiz, proving attempts and verifying them
//! off-chain and through the contract interface.
//!
//! Run with `cargo run --release --example trivia [config.json]`.

use std::time::Instant;
use trivia_bn254::{
    assemble_witness, encode_all, encode_calldata, prove, render_solidity_verifier, setup,
    Attempt, CircuitConfig, Claim, OffchainVerifier, PrivateInputs, Question,
    TriviaVerifierContract, Verifier,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║              Trivia answer verification demo               ║");
    println!("╚════════════════════════════════════════════════════════════╝\n");

    let config = match std::env::args().nth(1) {
        Some(path) => CircuitConfig::load(path)?,
        None => CircuitConfig::quiz(3, 2),
    };
    let mode = config.circuit_mode()?;
    let circuit = config.circuit()?.compile()?;
    println!("Circuit: {mode:?}");
    println!("  constraints: {}", circuit.shape.get_num_cons());
    println!("  public inputs: {}", circuit.schema.labels().join(", "));

    let mut rng = rand::thread_rng();
    let start = Instant::now();
    let (pk, vk) = setup(&circuit, &mut rng)?;
    println!("  setup time: {:?}\n", start.elapsed());

    let n = mode.num_questions();
    let answers = PrivateInputs::encode(&(0..n as u64).map(|i| 1000 + i).collect::<Vec<_>>())?;
    let options = encode_all(&(0..mode.num_options() as u64).collect::<Vec<_>>())?;
    let question = Question::publish(mode, options, &answers)?;
    println!("Published commitment {}", question.commitment());

    let offchain = OffchainVerifier::new(&vk);
    let contract = TriviaVerifierContract::deploy(&vk);

    let mut guesses = answers.answers().to_vec();
    guesses[0] += trivia_bn254::Scalar::one();
    let honest = Attempt::honest(&question, &answers, guesses.clone())?;
    let inflated = Attempt::new(
        guesses,
        match honest.claim {
            Claim::Correctness(c) => Claim::Correctness(!c),
            Claim::Score(s) => Claim::Score(s + 1),
        },
    );

    for (name, attempt) in [("honest", &honest), ("inflated", &inflated)] {
        let public = attempt.public_inputs(&question);
        let witness = assemble_witness(&circuit, &answers, &public)?;

        let start = Instant::now();
        match prove(&pk, &circuit, &witness, &mut rng) {
            Ok(proof) => {
                println!("{name} attempt {:?}: proved in {:?}", attempt.claim, start.elapsed());
                let calldata = encode_calldata(witness.public_inputs(), &proof);
                println!("  off-chain: {}", offchain.verify(&proof, &public)?);
                println!("  contract:  {:?}", contract.require_valid(&calldata));
            }
            Err(err) if err.is_unsatisfiable() => {
                println!("{name} attempt {:?}: refused ({err})", attempt.claim);
            }
            Err(err) => return Err(err.into()),
        }
    }

    let solidity = render_solidity_verifier(&vk, "TriviaVerifier");
    println!("\nSolidity verifier: {} lines", solidity.lines().count());
    Ok(())
}
