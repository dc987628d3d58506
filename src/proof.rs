//! Proof byte encoding in the EVM precompile layout.
//!
//! A proof is eight 32-byte big-endian words:
//! `A.x, A.y, B.x.c1, B.x.c0, B.y.c1, B.y.c0, C.x, C.y`. G2 coordinates put
//! the imaginary part first, as the `ecPairing` precompile expects. The point
//! at infinity is encoded as all zeros.

use crate::errors::{ProofVerifyError, Revert};
use crate::scalar::{bigint_from_be_bytes, Scalar};
use ark_bn254::{Bn254, Fq, Fq2, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField, Zero};
use ark_groth16::Proof;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const WORD_LEN: usize = 32;
pub const PROOF_LEN: usize = 8 * WORD_LEN;

/// Opaque Groth16 proof bytes. Decoding (and thus validation) happens at the
/// verifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriviaProof(Vec<u8>);

impl TriviaProof {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        TriviaProof(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, ProofVerifyError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(digits)
            .map(TriviaProof)
            .map_err(|e| ProofVerifyError::MalformedProof(e.to_string()))
    }

    pub(crate) fn from_ark(proof: &Proof<Bn254>) -> Self {
        let mut bytes = Vec::with_capacity(PROOF_LEN);
        bytes.extend_from_slice(&encode_g1(&proof.a));
        bytes.extend_from_slice(&encode_g2(&proof.b));
        bytes.extend_from_slice(&encode_g1(&proof.c));
        TriviaProof(bytes)
    }

    pub(crate) fn to_ark(&self) -> Result<Proof<Bn254>, Revert> {
        decode_proof(&self.0)
    }
}

impl fmt::Debug for TriviaProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TriviaProof({})", self.to_hex())
    }
}

/// Contract calldata: the public inputs as 32-byte words, then the proof.
pub fn encode_calldata(public_inputs: &[Scalar], proof: &TriviaProof) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(public_inputs.len() * WORD_LEN + proof.0.len());
    for input in public_inputs {
        calldata.extend_from_slice(&input.to_be_bytes());
    }
    calldata.extend_from_slice(&proof.0);
    calldata
}

fn fq_to_word(x: &Fq) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word.copy_from_slice(&x.into_bigint().to_bytes_be());
    word
}

/// `None` if the word is not below the base field modulus.
fn fq_from_word(word: &[u8]) -> Option<Fq> {
    let word: &[u8; WORD_LEN] = word.try_into().ok()?;
    Fq::from_bigint(bigint_from_be_bytes(word))
}

pub(crate) fn encode_g1(p: &G1Affine) -> [u8; 2 * WORD_LEN] {
    let mut out = [0u8; 2 * WORD_LEN];
    if let Some((x, y)) = p.xy() {
        out[..WORD_LEN].copy_from_slice(&fq_to_word(&x));
        out[WORD_LEN..].copy_from_slice(&fq_to_word(&y));
    }
    out
}

pub(crate) fn encode_g2(p: &G2Affine) -> [u8; 4 * WORD_LEN] {
    let mut out = [0u8; 4 * WORD_LEN];
    if let Some((x, y)) = p.xy() {
        out[..WORD_LEN].copy_from_slice(&fq_to_word(&x.c1));
        out[WORD_LEN..2 * WORD_LEN].copy_from_slice(&fq_to_word(&x.c0));
        out[2 * WORD_LEN..3 * WORD_LEN].copy_from_slice(&fq_to_word(&y.c1));
        out[3 * WORD_LEN..].copy_from_slice(&fq_to_word(&y.c0));
    }
    out
}

fn decode_g1(bytes: &[u8], name: &'static str) -> Result<G1Affine, Revert> {
    let invalid = || Revert::InvalidPoint(name);
    let x = fq_from_word(&bytes[..WORD_LEN]).ok_or_else(invalid)?;
    let y = fq_from_word(&bytes[WORD_LEN..2 * WORD_LEN]).ok_or_else(invalid)?;
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::zero());
    }
    let p = G1Affine::new_unchecked(x, y);
    if p.is_on_curve() && p.is_in_correct_subgroup_assuming_on_curve() {
        Ok(p)
    } else {
        Err(invalid())
    }
}

fn decode_g2(bytes: &[u8], name: &'static str) -> Result<G2Affine, Revert> {
    let invalid = || Revert::InvalidPoint(name);
    let mut words = bytes.chunks_exact(WORD_LEN).map(fq_from_word);
    let mut next = || words.next().flatten().ok_or_else(invalid);
    let (x_c1, x_c0, y_c1, y_c0) = (next()?, next()?, next()?, next()?);

    let x = Fq2::new(x_c0, x_c1);
    let y = Fq2::new(y_c0, y_c1);
    if x.is_zero() && y.is_zero() {
        return Ok(G2Affine::zero());
    }
    let p = G2Affine::new_unchecked(x, y);
    if p.is_on_curve() && p.is_in_correct_subgroup_assuming_on_curve() {
        Ok(p)
    } else {
        Err(invalid())
    }
}

pub(crate) fn decode_proof(bytes: &[u8]) -> Result<Proof<Bn254>, Revert> {
    if bytes.len() != PROOF_LEN {
        return Err(Revert::InvalidProofLength {
            expected: PROOF_LEN,
            actual: bytes.len(),
        });
    }
    Ok(Proof {
        a: decode_g1(&bytes[..2 * WORD_LEN], "A")?,
        b: decode_g2(&bytes[2 * WORD_LEN..6 * WORD_LEN], "B")?,
        c: decode_g1(&bytes[6 * WORD_LEN..], "C")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ark_ec::CurveGroup;
    use ark_std::UniformRand;

    fn random_proof() -> Proof<Bn254> {
        let mut rng = StdRng::seed_from_u64(0);
        Proof {
            a: ark_bn254::G1Projective::rand(&mut rng).into_affine(),
            b: ark_bn254::G2Projective::rand(&mut rng).into_affine(),
            c: ark_bn254::G1Projective::rand(&mut rng).into_affine(),
        }
    }

    #[test]
    fn test_layout() {
        let proof = random_proof();
        let encoded = TriviaProof::from_ark(&proof);
        assert_eq!(encoded.as_bytes().len(), PROOF_LEN);

        let (bx, _) = proof.b.xy().unwrap();
        assert_eq!(&encoded.as_bytes()[64..96], &fq_to_word(&bx.c1)[..]);
        assert_eq!(&encoded.as_bytes()[96..128], &fq_to_word(&bx.c0)[..]);
        assert_eq!(encoded.to_ark().unwrap(), proof);
    }

    #[test]
    fn test_identity_is_zero_words() {
        let mut proof = random_proof();
        proof.c = G1Affine::zero();
        let encoded = TriviaProof::from_ark(&proof);
        assert!(encoded.as_bytes()[6 * WORD_LEN..].iter().all(|b| *b == 0));
        assert!(encoded.to_ark().unwrap().c.is_zero());
    }

    #[test]
    fn test_rejects_malformed() {
        let encoded = TriviaProof::from_ark(&random_proof());

        let short = TriviaProof::from_bytes(encoded.as_bytes()[..200].to_vec());
        assert_eq!(
            short.to_ark().unwrap_err(),
            Revert::InvalidProofLength {
                expected: PROOF_LEN,
                actual: 200
            }
        );

        // A.y bumped off the curve
        let mut bytes = encoded.clone().into_bytes();
        bytes[63] ^= 1;
        assert_eq!(
            TriviaProof::from_bytes(bytes).to_ark().unwrap_err(),
            Revert::InvalidPoint("A")
        );

        // C.x not a base field element
        let mut bytes = encoded.into_bytes();
        bytes[6 * WORD_LEN..7 * WORD_LEN].fill(0xff);
        assert_eq!(
            TriviaProof::from_bytes(bytes).to_ark().unwrap_err(),
            Revert::InvalidPoint("C")
        );
    }

    #[test]
    fn test_calldata() {
        let proof = TriviaProof::from_ark(&random_proof());
        let inputs = [Scalar::from_u64(1), Scalar::from_u64(0x0102)];
        let calldata = encode_calldata(&inputs, &proof);
        assert_eq!(calldata.len(), 2 * WORD_LEN + PROOF_LEN);
        assert_eq!(calldata[31], 1);
        assert_eq!(&calldata[62..64], &[0x01, 0x02]);
        assert_eq!(&calldata[2 * WORD_LEN..], proof.as_bytes());
    }
}
