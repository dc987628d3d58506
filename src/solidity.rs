//! Solidity source for the on-chain verifier.
//!
//! The generated contract has the same calldata layout and revert reasons as
//! [`crate::contract::TriviaVerifierContract`]; its `verify` behaves like
//! `require_valid`, returning `true` or reverting with `"Proof failed"`.

use crate::groth16::VerifyingKey;
use crate::proof::{encode_g1, encode_g2, PROOF_LEN, WORD_LEN};
use ark_bn254::{Fq, Fr};
use ark_ff::{BigInteger, PrimeField};

fn word(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn modulus<F: PrimeField>() -> String {
    word(&F::MODULUS.to_bytes_be())
}

fn g1_constants(name: &str, point: [u8; 2 * WORD_LEN]) -> String {
    format!(
        "    uint256 constant {name}_X = {};\n    uint256 constant {name}_Y = {};\n",
        word(&point[..WORD_LEN]),
        word(&point[WORD_LEN..]),
    )
}

fn g2_constants(name: &str, point: [u8; 4 * WORD_LEN]) -> String {
    let w: Vec<String> = point.chunks_exact(WORD_LEN).map(word).collect();
    format!(
        "    uint256 constant {name}_X1 = {};\n    uint256 constant {name}_X0 = {};\n    uint256 constant {name}_Y1 = {};\n    uint256 constant {name}_Y0 = {};\n",
        w[0], w[1], w[2], w[3]
    )
}

/// Renders a Solidity verifier contract called `name` for `vk`. Needs
/// solc 0.8.5 or later for the calldata slice conversions.
pub fn render_solidity_verifier(vk: &VerifyingKey, name: &str) -> String {
    let inner = &vk.inner;
    let schema = vk.schema();
    let num_inputs = vk.num_inputs();

    let mut constants = String::new();
    constants.push_str(&g1_constants("ALPHA", encode_g1(&inner.alpha_g1)));
    constants.push_str(&g2_constants("BETA", encode_g2(&inner.beta_g2)));
    constants.push_str(&g2_constants("GAMMA", encode_g2(&inner.gamma_g2)));
    constants.push_str(&g2_constants("DELTA", encode_g2(&inner.delta_g2)));
    for (i, ic) in inner.gamma_abc_g1.iter().enumerate() {
        constants.push_str(&g1_constants(&format!("IC{i}"), encode_g1(ic)));
    }

    let mut accumulate = String::new();
    for (i, label) in schema.labels().iter().enumerate() {
        accumulate.push_str(&format!(
            "        // {label}\n        input = uint256(bytes32(data[{start}:{end}]));\n        require(input < SNARK_SCALAR_FIELD, \"Input not in field\");\n        vkX = ecAdd(vkX, ecMul([IC{ic}_X, IC{ic}_Y], input));\n",
            start = i * WORD_LEN,
            end = (i + 1) * WORD_LEN,
            ic = i + 1,
        ));
    }

    format!(
        r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.5;

/// @title {name}
/// @notice Groth16 verifier for the trivia answer circuit ({mode:?}).
/// @dev Calldata: {num_inputs} public inputs as 32-byte words, then the
///      {proof_len}-byte proof (A, B, C; G2 coordinates imaginary part first).
contract {name} {{
    uint256 constant SNARK_SCALAR_FIELD = {r};
    uint256 constant PRIME_Q = {q};
    uint256 constant NUM_INPUTS = {num_inputs};
    uint256 constant PROOF_LENGTH = {proof_len};

{constants}
    function verify(bytes calldata data) external view returns (bool) {{
        require(data.length == NUM_INPUTS * 32 + PROOF_LENGTH, "Invalid proof length");

        uint256[2] memory vkX = [IC0_X, IC0_Y];
        uint256 input;
{accumulate}
        uint256 o = NUM_INPUTS * 32;
        uint256[8] memory proof;
        for (uint256 i = 0; i < 8; i++) {{
            proof[i] = uint256(bytes32(data[o + 32 * i:o + 32 * (i + 1)]));
            require(proof[i] < PRIME_Q, "Invalid point");
        }}

        uint256[24] memory p;
        // e(-A, B)
        p[0] = proof[0];
        p[1] = proof[1] == 0 ? 0 : PRIME_Q - proof[1];
        p[2] = proof[2];
        p[3] = proof[3];
        p[4] = proof[4];
        p[5] = proof[5];
        // e(alpha, beta)
        p[6] = ALPHA_X;
        p[7] = ALPHA_Y;
        p[8] = BETA_X1;
        p[9] = BETA_X0;
        p[10] = BETA_Y1;
        p[11] = BETA_Y0;
        // e(vk_x, gamma)
        p[12] = vkX[0];
        p[13] = vkX[1];
        p[14] = GAMMA_X1;
        p[15] = GAMMA_X0;
        p[16] = GAMMA_Y1;
        p[17] = GAMMA_Y0;
        // e(C, delta)
        p[18] = proof[6];
        p[19] = proof[7];
        p[20] = DELTA_X1;
        p[21] = DELTA_X0;
        p[22] = DELTA_Y1;
        p[23] = DELTA_Y0;

        require(pairing(p), "Proof failed");
        return true;
    }}

    function ecAdd(uint256[2] memory a, uint256[2] memory b) internal view returns (uint256[2] memory r) {{
        uint256[4] memory input = [a[0], a[1], b[0], b[1]];
        bool success;
        assembly {{
            success := staticcall(gas(), 0x06, input, 0x80, r, 0x40)
        }}
        require(success, "Invalid point");
    }}

    function ecMul(uint256[2] memory point, uint256 s) internal view returns (uint256[2] memory r) {{
        uint256[3] memory input = [point[0], point[1], s];
        bool success;
        assembly {{
            success := staticcall(gas(), 0x07, input, 0x60, r, 0x40)
        }}
        require(success, "Invalid point");
    }}

    function pairing(uint256[24] memory input) internal view returns (bool) {{
        uint256[1] memory out;
        bool success;
        assembly {{
            success := staticcall(gas(), 0x08, input, 0x300, out, 0x20)
        }}
        require(success, "Invalid point");
        return out[0] == 1;
    }}
}}
"#,
        mode = schema.mode(),
        r = modulus::<Fr>(),
        q = modulus::<Fq>(),
        proof_len = PROOF_LEN,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::circuit::TriviaCircuit;
    use crate::groth16::setup;

    #[test]
    fn test_render_quiz_verifier() {
        let mut rng = StdRng::seed_from_u64(0);
        let circuit = TriviaCircuit::quiz(2, 2).unwrap().compile().unwrap();
        let (_, vk) = setup(&circuit, &mut rng).unwrap();
        let source = render_solidity_verifier(&vk, "QuizVerifier");

        assert!(source.contains("contract QuizVerifier {"));
        // calldata slice to bytes32 conversions need 0.8.5
        assert!(source.contains("pragma solidity ^0.8.5;"));
        assert!(source.contains("function verify(bytes calldata data) external view returns (bool)"));
        assert!(source.contains("uint256 constant NUM_INPUTS = 8;"));
        assert!(source.contains("uint256 constant IC8_X"));
        assert!(!source.contains("IC9_X"));
        assert!(source.contains("// guesses[1]"));
        assert!(source.contains("\"Proof failed\""));
        assert!(source.contains(
            "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
        ));
    }
}
