//! Groth16 proving backend.
//!
//! The compiled [`R1CSShape`] is replayed into an `ark-relations` constraint
//! system and handed to `ark-groth16`. Keys carry the digest of the circuit
//! they were generated for, so a key can never be paired with a different
//! circuit by accident.

use crate::circuit::{CircuitMode, CompiledCircuit, PublicInputSchema};
use crate::errors::{ProofVerifyError, R1CSError, TriviaError};
use crate::proof::TriviaProof;
use crate::r1cs::R1CSShape;
use crate::scalar::Scalar;
use crate::timer::Timer;
use crate::witness::Witness;
use ark_bn254::{Bn254, Fr};
use ark_groth16::Groth16;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystemRef, LinearCombination, SynthesisError, Variable,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Replays a compiled shape (and optionally an assignment) into arkworks.
struct R1CSReplay<'a> {
    shape: &'a R1CSShape,
    vars: Option<&'a [Scalar]>,
    inputs: Option<&'a [Scalar]>,
}

impl ConstraintSynthesizer<Fr> for R1CSReplay<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let value = |values: Option<&[Scalar]>, i: usize| {
            values
                .and_then(|v| v.get(i))
                .map(|s| s.0)
                .ok_or(SynthesisError::AssignmentMissing)
        };

        let inputs = (0..self.shape.get_num_inputs())
            .map(|i| cs.new_input_variable(|| value(self.inputs, i)))
            .collect::<Result<Vec<_>, _>>()?;
        let vars = (0..self.shape.get_num_vars())
            .map(|i| cs.new_witness_variable(|| value(self.vars, i)))
            .collect::<Result<Vec<_>, _>>()?;

        let num_vars = self.shape.get_num_vars();
        let column = |col: usize| -> Variable {
            if col < num_vars {
                vars[col]
            } else if col == num_vars {
                Variable::One
            } else {
                inputs[col - num_vars - 1]
            }
        };
        let lc = |row: &[(usize, Scalar)]| {
            LinearCombination(row.iter().map(|(col, val)| (val.0, column(*col))).collect())
        };

        let (A, B, C) = (self.shape.A.rows(), self.shape.B.rows(), self.shape.C.rows());
        for ((a, b), c) in A.iter().zip(&B).zip(&C) {
            cs.enforce_constraint(lc(a), lc(b), lc(c))?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct KeyHeader {
    mode: CircuitMode,
    circuit_digest: [u8; 32],
}

fn write_key<K: CanonicalSerialize>(header: &KeyHeader, key: &K) -> Result<Vec<u8>, TriviaError> {
    let mut bytes =
        bincode::serialize(header).map_err(|e| TriviaError::Serialization(e.to_string()))?;
    key.serialize_compressed(&mut bytes)
        .map_err(|e| TriviaError::Serialization(e.to_string()))?;
    Ok(bytes)
}

fn read_key<K: CanonicalDeserialize>(mut bytes: &[u8]) -> Result<(KeyHeader, K), TriviaError> {
    let header: KeyHeader = bincode::deserialize_from(&mut bytes)
        .map_err(|e| TriviaError::Serialization(e.to_string()))?;
    let key = K::deserialize_compressed(&mut bytes)
        .map_err(|e| TriviaError::Serialization(e.to_string()))?;
    if !bytes.is_empty() {
        return Err(TriviaError::Serialization(format!(
            "{} trailing bytes after key",
            bytes.len()
        )));
    }
    Ok((header, key))
}

#[derive(Clone)]
pub struct ProvingKey {
    pub(crate) inner: ark_groth16::ProvingKey<Bn254>,
    mode: CircuitMode,
    circuit_digest: [u8; 32],
}

impl ProvingKey {
    pub fn circuit_digest(&self) -> &[u8; 32] {
        &self.circuit_digest
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TriviaError> {
        let header = KeyHeader {
            mode: self.mode,
            circuit_digest: self.circuit_digest,
        };
        write_key(&header, &self.inner)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TriviaError> {
        let (header, inner) = read_key(bytes)?;
        Ok(ProvingKey {
            inner,
            mode: header.mode,
            circuit_digest: header.circuit_digest,
        })
    }
}

/// Verifying key, plus the public input layout it expects.
#[derive(Clone, Debug, PartialEq)]
pub struct VerifyingKey {
    pub(crate) inner: ark_groth16::VerifyingKey<Bn254>,
    mode: CircuitMode,
    circuit_digest: [u8; 32],
}

impl VerifyingKey {
    pub fn circuit_digest(&self) -> &[u8; 32] {
        &self.circuit_digest
    }

    pub fn schema(&self) -> PublicInputSchema {
        PublicInputSchema::new(self.mode)
    }

    /// Number of public inputs the key accepts, one per non-constant IC point.
    pub fn num_inputs(&self) -> usize {
        self.inner.gamma_abc_g1.len().saturating_sub(1)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TriviaError> {
        let header = KeyHeader {
            mode: self.mode,
            circuit_digest: self.circuit_digest,
        };
        write_key(&header, &self.inner)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TriviaError> {
        let (header, inner): (KeyHeader, ark_groth16::VerifyingKey<Bn254>) = read_key(bytes)?;
        let vk = VerifyingKey {
            inner,
            mode: header.mode,
            circuit_digest: header.circuit_digest,
        };
        // one IC point for the constant, one per public input
        if vk.inner.gamma_abc_g1.len() != vk.schema().len() + 1 {
            return Err(ProofVerifyError::CircuitMismatch.into());
        }
        Ok(vk)
    }
}

/// Circuit-specific trusted setup. Test and demo use only; production keys
/// come from a ceremony.
#[tracing::instrument(skip_all, name = "groth16::setup")]
pub fn setup<R: RngCore + CryptoRng>(
    circuit: &CompiledCircuit,
    rng: &mut R,
) -> Result<(ProvingKey, VerifyingKey), TriviaError> {
    let timer = Timer::new("groth16::setup");
    let replay = R1CSReplay {
        shape: &circuit.shape,
        vars: None,
        inputs: None,
    };
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(replay, rng)
        .map_err(|e| TriviaError::Backend(e.to_string()))?;
    timer.stop();

    tracing::debug!(
        mode = ?circuit.mode,
        inputs = circuit.schema.len(),
        "generated groth16 keys"
    );
    Ok((
        ProvingKey {
            inner: pk,
            mode: circuit.mode,
            circuit_digest: circuit.digest,
        },
        VerifyingKey {
            inner: vk,
            mode: circuit.mode,
            circuit_digest: circuit.digest,
        },
    ))
}

/// Proves one attempt. A witness that violates a constraint is refused
/// with [`R1CSError::Unsatisfiable`] before the backend runs.
#[tracing::instrument(skip_all, name = "groth16::prove")]
pub fn prove<R: RngCore + CryptoRng>(
    pk: &ProvingKey,
    circuit: &CompiledCircuit,
    witness: &Witness,
    rng: &mut R,
) -> Result<TriviaProof, TriviaError> {
    if pk.circuit_digest != circuit.digest || *witness.circuit_digest() != circuit.digest {
        return Err(ProofVerifyError::CircuitMismatch.into());
    }

    if let Err(err) = circuit.shape.check_sat(witness.vars(), witness.public_inputs()) {
        if let R1CSError::Unsatisfiable { constraint, label } = &err {
            tracing::debug!(constraint, %label, "refusing to prove an unsatisfiable witness");
        }
        return Err(err.into());
    }

    let timer = Timer::new("groth16::prove");
    let replay = R1CSReplay {
        shape: &circuit.shape,
        vars: Some(witness.vars()),
        inputs: Some(witness.public_inputs()),
    };
    let proof = Groth16::<Bn254>::prove(&pk.inner, replay, rng)
        .map_err(|e| TriviaError::Backend(e.to_string()))?;
    timer.stop();

    Ok(TriviaProof::from_ark(&proof))
}

/// Proves independent attempts in parallel. Each attempt gets its own RNG
/// seeded from `rng`, so results do not depend on scheduling.
pub fn prove_batch<R: RngCore + CryptoRng>(
    pk: &ProvingKey,
    circuit: &CompiledCircuit,
    witnesses: &[Witness],
    rng: &mut R,
) -> Vec<Result<TriviaProof, TriviaError>> {
    let seeds: Vec<[u8; 32]> = witnesses
        .iter()
        .map(|_| {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            seed
        })
        .collect();

    witnesses
        .par_iter()
        .zip(seeds)
        .map(|(witness, seed)| prove(pk, circuit, witness, &mut StdRng::from_seed(seed)))
        .collect()
}
