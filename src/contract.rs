//! On-chain verifier contract.
//!
//! Mirrors the deployed Solidity verifier: the verifying key is fixed at
//! deployment, calldata is `public inputs ‖ proof` in 32-byte big-endian
//! words, the input commitment is built with `ecMul`/`ecAdd` and the final
//! check is a single 4-pair `ecPairing` call. Malformed calldata reverts with
//! a specific reason instead of returning `false`.

use crate::errors::{ProofVerifyError, Revert};
use crate::groth16::VerifyingKey;
use crate::proof::{decode_proof, encode_calldata, encode_g1, encode_g2, TriviaProof, PROOF_LEN, WORD_LEN};
use crate::scalar::Scalar;
use crate::verifier::Verifier;
use crate::witness::PublicInputs;
use ark_bn254::{Bn254, G1Affine, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_std::Zero;
use sha3::{Digest, Keccak256};

pub struct TriviaVerifierContract {
    alpha: G1Affine,
    beta: G2Affine,
    gamma: G2Affine,
    delta: G2Affine,
    ic: Vec<G1Affine>,
    num_inputs: usize,
    vk: VerifyingKey,
    key_hash: [u8; 32],
}

impl TriviaVerifierContract {
    /// Deploys a verifier for `vk`. The key cannot change afterwards.
    pub fn deploy(vk: &VerifyingKey) -> Self {
        let inner = &vk.inner;
        let key_hash = verifying_key_hash(vk);
        tracing::debug!(
            inputs = vk.num_inputs(),
            key_hash = %hex::encode(key_hash),
            "deployed trivia verifier"
        );
        TriviaVerifierContract {
            alpha: inner.alpha_g1,
            beta: inner.beta_g2,
            gamma: inner.gamma_g2,
            delta: inner.delta_g2,
            ic: inner.gamma_abc_g1.clone(),
            num_inputs: vk.num_inputs(),
            vk: vk.clone(),
            key_hash,
        }
    }

    /// Keccak-256 over the EVM encoding of the verifying key.
    pub fn key_hash(&self) -> [u8; 32] {
        self.key_hash
    }

    pub fn calldata_len(&self) -> usize {
        self.num_inputs * WORD_LEN + PROOF_LEN
    }

    /// The contract's `verify(bytes)` entry point.
    #[tracing::instrument(skip_all, name = "TriviaVerifierContract::verify")]
    pub fn verify(&self, calldata: &[u8]) -> Result<bool, Revert> {
        if calldata.len() != self.calldata_len() {
            return Err(Revert::InvalidProofLength {
                expected: self.calldata_len(),
                actual: calldata.len(),
            });
        }
        let (input_words, proof_bytes) = calldata.split_at(self.num_inputs * WORD_LEN);

        let (ic0, ic) = self.ic.split_first().ok_or(Revert::InvalidPoint("IC"))?;
        let mut vk_x = ic0.into_group();
        for (i, (word, ic)) in input_words.chunks_exact(WORD_LEN).zip(ic).enumerate() {
            let mut buf = [0u8; WORD_LEN];
            buf.copy_from_slice(word);
            let input = Scalar::from_be_bytes(&buf).ok_or(Revert::InputNotInField(i))?;
            vk_x += *ic * input.0;
        }

        let proof = decode_proof(proof_bytes)?;
        let vk_x: G1Affine = vk_x.into_affine();
        let neg_a: G1Affine = (-proof.a.into_group()).into_affine();

        let g1: [G1Affine; 4] = [neg_a, self.alpha, vk_x, proof.c];
        let g2: [G2Affine; 4] = [proof.b, self.beta, self.gamma, self.delta];
        let accepted = Bn254::multi_pairing(g1, g2).is_zero();
        tracing::debug!(accepted, "on-chain verification");
        Ok(accepted)
    }

    /// `verify`, reverting with `"Proof failed"` when the proof is rejected.
    pub fn require_valid(&self, calldata: &[u8]) -> Result<(), Revert> {
        if self.verify(calldata)? {
            Ok(())
        } else {
            Err(Revert::ProofFailed)
        }
    }
}

impl Verifier for TriviaVerifierContract {
    fn verify(&self, proof: &TriviaProof, public: &PublicInputs) -> Result<bool, ProofVerifyError> {
        let inputs = self
            .vk
            .schema()
            .flatten(public)
            .map_err(|e| ProofVerifyError::MalformedProof(e.to_string()))?;
        TriviaVerifierContract::verify(self, &encode_calldata(&inputs, proof))
            .map_err(|revert| ProofVerifyError::MalformedProof(revert.to_string()))
    }
}

fn verifying_key_hash(vk: &VerifyingKey) -> [u8; 32] {
    let inner = &vk.inner;
    let mut hasher = Keccak256::new();
    hasher.update(encode_g1(&inner.alpha_g1));
    hasher.update(encode_g2(&inner.beta_g2));
    hasher.update(encode_g2(&inner.gamma_g2));
    hasher.update(encode_g2(&inner.delta_g2));
    for ic in &inner.gamma_abc_g1 {
        hasher.update(encode_g1(ic));
    }
    hasher.finalize().into()
}
