//! Mapping of integer answers onto field elements.
//!
//! An integer is encoded as its unsigned big-endian byte string, left-padded
//! to a 32-byte word and read as an element of the BN254 scalar field. Values
//! that are not below the field modulus are rejected rather than reduced, so
//! two distinct integers never encode to the same field element. The same
//! convention is used when publishing a commitment and when building a
//! witness.

use crate::errors::EncodingError;
use crate::scalar::Scalar;
use num_bigint::BigUint;

/// Values that can be encoded as a field element under the convention above.
pub trait FieldEncode {
    fn encode(&self) -> Result<Scalar, EncodingError>;
}

impl FieldEncode for u32 {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        Ok(Scalar::from_u64(u64::from(*self)))
    }
}

impl FieldEncode for u64 {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        Ok(Scalar::from_u64(*self))
    }
}

impl FieldEncode for u128 {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        Ok(Scalar::from_u128(*self))
    }
}

impl FieldEncode for Scalar {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        Ok(*self)
    }
}

/// Decimal, or `0x`-prefixed hexadecimal.
impl FieldEncode for str {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        let value = parse_literal(self.trim())
            .ok_or_else(|| EncodingError::InvalidLiteral(self.to_string()))?;
        encode_be_bytes(&value.to_bytes_be())
    }
}

impl FieldEncode for String {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        self.as_str().encode()
    }
}

impl FieldEncode for [u8] {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        encode_be_bytes(self)
    }
}

impl<T: FieldEncode + ?Sized> FieldEncode for &T {
    fn encode(&self) -> Result<Scalar, EncodingError> {
        (**self).encode()
    }
}

/// Encodes a big-endian unsigned integer of at most 32 bytes.
pub fn encode_be_bytes(bytes: &[u8]) -> Result<Scalar, EncodingError> {
    if bytes.len() > 32 {
        // leading zero bytes do not change the value
        let excess = bytes.len() - 32;
        if bytes[..excess].iter().any(|b| *b != 0) {
            return Err(EncodingError::TooLong(bytes.len()));
        }
        return encode_be_bytes(&bytes[excess..]);
    }
    let mut word = [0u8; 32];
    word[32 - bytes.len()..].copy_from_slice(bytes);
    Scalar::from_be_bytes(&word).ok_or(EncodingError::OutOfRange)
}

/// Encodes every value of a sequence, stopping at the first failure.
pub fn encode_all<T: FieldEncode>(values: &[T]) -> Result<Vec<Scalar>, EncodingError> {
    values.iter().map(FieldEncode::encode).collect()
}

fn parse_literal(s: &str) -> Option<BigUint> {
    if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if hex_digits.is_empty() {
            return None;
        }
        return BigUint::parse_bytes(hex_digits.as_bytes(), 16);
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigUint::parse_bytes(s.as_bytes(), 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::{BigInteger, PrimeField};

    #[test]
    fn test_integer_encodings_agree() {
        let from_u64 = 123456789u64.encode().unwrap();
        assert_eq!(123456789u32.encode().unwrap(), from_u64);
        assert_eq!(123456789u128.encode().unwrap(), from_u64);
        assert_eq!("123456789".encode().unwrap(), from_u64);
        assert_eq!("0x75bcd15".encode().unwrap(), from_u64);
        assert_eq!([0x07u8, 0x5b, 0xcd, 0x15][..].encode().unwrap(), from_u64);
    }

    #[test]
    fn test_big_values() {
        let v = 567483920147u64;
        assert_eq!(v.to_string().encode().unwrap(), Scalar::from_u64(v));

        let big = u128::MAX;
        assert_eq!(big.to_string().encode().unwrap(), Scalar::from_u128(big));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let modulus = Fr::MODULUS.to_bytes_be();
        assert_eq!(encode_be_bytes(&modulus), Err(EncodingError::OutOfRange));

        let modulus_decimal = BigUint::from_bytes_be(&modulus).to_string();
        assert_eq!(modulus_decimal.encode(), Err(EncodingError::OutOfRange));

        let mut below = BigUint::from_bytes_be(&modulus);
        below -= 1u32;
        assert!(below.to_string().encode().is_ok());
    }

    #[test]
    fn test_length_checks() {
        assert_eq!(encode_be_bytes(&[1u8; 33]), Err(EncodingError::TooLong(33)));

        let mut padded = vec![0u8; 40];
        padded[39] = 9;
        assert_eq!(encode_be_bytes(&padded), Ok(Scalar::from_u64(9)));
        assert_eq!(encode_be_bytes(&[]), Ok(Scalar::zero()));
    }

    #[test]
    fn test_invalid_literals() {
        for bad in ["", "-1", "12a", "0x", "1.5", "0xzz"] {
            assert!(
                matches!(bad.encode(), Err(EncodingError::InvalidLiteral(_))),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(" 42 ".encode(), Ok(Scalar::from_u64(42)));
    }
}
