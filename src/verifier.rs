//! Proof verification: one interface, an off-chain and an on-chain backend.

use crate::errors::ProofVerifyError;
use crate::groth16::VerifyingKey;
use crate::proof::TriviaProof;
use crate::witness::PublicInputs;
use ark_bn254::{Bn254, Fr};
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey};
use ark_snark::SNARK;
use rayon::prelude::*;

/// Checks a proof against public inputs only.
///
/// `Ok(false)` is the normal answer for a well-formed proof that does not
/// verify; `Err` is reserved for structurally invalid proofs or inputs.
pub trait Verifier {
    fn verify(&self, proof: &TriviaProof, public: &PublicInputs) -> Result<bool, ProofVerifyError>;

    /// Like [`Verifier::verify`], with rejection reported as
    /// [`ProofVerifyError::VerificationFailed`].
    fn check(&self, proof: &TriviaProof, public: &PublicInputs) -> Result<(), ProofVerifyError> {
        if self.verify(proof, public)? {
            Ok(())
        } else {
            Err(ProofVerifyError::VerificationFailed(
                "proof does not verify against the given public inputs".to_string(),
            ))
        }
    }
}

/// Groth16 verification with a prepared key.
pub struct OffchainVerifier {
    pvk: PreparedVerifyingKey<Bn254>,
    vk: VerifyingKey,
}

impl OffchainVerifier {
    pub fn new(vk: &VerifyingKey) -> Self {
        OffchainVerifier {
            pvk: prepare_verifying_key(&vk.inner),
            vk: vk.clone(),
        }
    }
}

impl Verifier for OffchainVerifier {
    #[tracing::instrument(skip_all, name = "OffchainVerifier::verify")]
    fn verify(&self, proof: &TriviaProof, public: &PublicInputs) -> Result<bool, ProofVerifyError> {
        let inputs: Vec<Fr> = self
            .vk
            .schema()
            .flatten(public)
            .map_err(|e| ProofVerifyError::MalformedProof(e.to_string()))?
            .into_iter()
            .map(|s| s.0)
            .collect();
        let proof = proof
            .to_ark()
            .map_err(|e| ProofVerifyError::MalformedProof(e.to_string()))?;

        let accepted = Groth16::<Bn254>::verify_with_processed_vk(&self.pvk, &inputs, &proof)
            .map_err(|e| ProofVerifyError::MalformedProof(e.to_string()))?;
        tracing::debug!(accepted, "off-chain verification");
        Ok(accepted)
    }
}

/// Verifies many independent (proof, inputs) pairs in parallel.
pub fn verify_batch<V>(
    verifier: &V,
    items: &[(TriviaProof, PublicInputs)],
) -> Vec<Result<bool, ProofVerifyError>>
where
    V: Verifier + Sync + ?Sized,
{
    items
        .par_iter()
        .map(|(proof, public)| verifier.verify(proof, public))
        .collect()
}
