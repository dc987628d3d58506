//! BN254 scalar field wrapper
//! Every answer, guess, commitment and public input is a `Scalar`

use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, Field, One, PrimeField, UniformRand, Zero};
use ark_std::rand::RngCore;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Wrapper around ark_bn254::Fr
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Scalar(pub Fr);

impl Scalar {
    /// The zero scalar
    pub fn zero() -> Self {
        Scalar(Fr::zero())
    }

    /// The one scalar
    pub fn one() -> Self {
        Scalar(Fr::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Generate a random scalar
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        Scalar(Fr::rand(rng))
    }

    /// Compute the multiplicative inverse, `None` for zero
    pub fn invert(&self) -> Option<Self> {
        self.0.inverse().map(Scalar)
    }

    /// Convert to bytes (little-endian, 32 bytes)
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        let bigint = self.0.into_bigint();
        for (i, limb) in bigint.0.iter().enumerate() {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_le_bytes());
        }
        bytes
    }

    /// Create from bytes (little-endian, 32 bytes); `None` if not below the modulus
    pub fn from_bytes(bytes: &[u8; 32]) -> Option<Self> {
        let mut be = *bytes;
        be.reverse();
        Self::from_be_bytes(&be)
    }

    /// Big-endian 32-byte word, the EVM `uint256` layout
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.0.into_bigint().to_bytes_be());
        bytes
    }

    /// Create from a big-endian 32-byte word; `None` if not below the modulus
    pub fn from_be_bytes(bytes: &[u8; 32]) -> Option<Self> {
        Fr::from_bigint(bigint_from_be_bytes(bytes)).map(Scalar)
    }

    /// `0x`-prefixed, 64 hex digit big-endian rendering
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }

    /// Parse the output of [`Scalar::to_hex`]; the `0x` prefix is optional
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).ok()?;
        Self::from_be_bytes(&bytes)
    }

    /// Create from u64
    pub fn from_u64(val: u64) -> Self {
        Scalar(Fr::from(val))
    }

    /// Create from u128
    pub fn from_u128(val: u128) -> Self {
        Scalar(Fr::from(val))
    }

    /// Square the scalar
    pub fn square(&self) -> Self {
        Scalar(self.0.square())
    }
}

/// Reads a big-endian 32-byte word into four little-endian limbs.
pub(crate) fn bigint_from_be_bytes(bytes: &[u8; 32]) -> BigInt<4> {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.rchunks_exact(8).enumerate() {
        let mut limb = [0u8; 8];
        limb.copy_from_slice(chunk);
        limbs[i] = u64::from_be_bytes(limb);
    }
    BigInt(limbs)
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({})", self.to_hex())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<u64> for Scalar {
    fn from(val: u64) -> Self {
        Scalar::from_u64(val)
    }
}

impl From<bool> for Scalar {
    fn from(val: bool) -> Self {
        if val {
            Scalar::one()
        } else {
            Scalar::zero()
        }
    }
}

impl From<Fr> for Scalar {
    fn from(val: Fr) -> Self {
        Scalar(val)
    }
}

impl From<Scalar> for Fr {
    fn from(val: Scalar) -> Self {
        val.0
    }
}

// Arithmetic operations
impl Add for Scalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Scalar(self.0 + rhs.0)
    }
}

impl Sub for Scalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Scalar(self.0 - rhs.0)
    }
}

impl Mul for Scalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Scalar(self.0 * rhs.0)
    }
}

impl Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self {
        Scalar(-self.0)
    }
}

impl AddAssign for Scalar {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Scalar {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl MulAssign for Scalar {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

impl std::iter::Sum for Scalar {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Scalar::zero(), |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a Scalar> for Scalar {
    fn sum<I: Iterator<Item = &'a Scalar>>(iter: I) -> Self {
        iter.fold(Scalar::zero(), |acc, x| acc + *x)
    }
}

// Serde support: hex words for human-readable formats, raw bytes otherwise
impl serde::Serialize for Scalar {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serde::Serialize::serialize(&self.to_bytes(), serializer)
        }
    }
}

impl<'de> serde::Deserialize<'de> for Scalar {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s: String = serde::Deserialize::deserialize(deserializer)?;
            Scalar::from_hex(&s).ok_or_else(|| serde::de::Error::custom("invalid scalar"))
        } else {
            let bytes: [u8; 32] = serde::Deserialize::deserialize(deserializer)?;
            Scalar::from_bytes(&bytes).ok_or_else(|| serde::de::Error::custom("invalid scalar"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scalar_arithmetic() {
        let a = Scalar::from_u64(5);
        let b = Scalar::from_u64(7);

        assert_eq!(a + b, Scalar::from_u64(12));
        assert_eq!(b - a, Scalar::from_u64(2));
        assert_eq!(a * b, Scalar::from_u64(35));
        assert_eq!(-a + a, Scalar::zero());
    }

    #[test]
    fn test_scalar_bytes_roundtrip() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let s = Scalar::random(&mut rng);
            assert_eq!(Scalar::from_bytes(&s.to_bytes()), Some(s));
            assert_eq!(Scalar::from_be_bytes(&s.to_be_bytes()), Some(s));
        }
    }

    #[test]
    fn test_be_layout() {
        let s = Scalar::from_u64(0x0102);
        let be = s.to_be_bytes();
        assert_eq!(be[31], 0x02);
        assert_eq!(be[30], 0x01);
        assert!(be[..30].iter().all(|b| *b == 0));

        let mut le = be;
        le.reverse();
        assert_eq!(s.to_bytes(), le);
    }

    #[test]
    fn test_modulus_rejected() {
        let modulus = Fr::MODULUS.to_bytes_be();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&modulus);
        assert_eq!(Scalar::from_be_bytes(&bytes), None);
        assert_eq!(Scalar::from_be_bytes(&[0xff; 32]), None);
    }

    #[test]
    fn test_hex() {
        let s = Scalar::from_u64(123456789);
        let h = s.to_hex();
        assert_eq!(h.len(), 66);
        assert!(h.ends_with("075bcd15"));
        assert_eq!(Scalar::from_hex(&h), Some(s));
        assert_eq!(Scalar::from_hex(&h[2..]), Some(s));
        assert_eq!(Scalar::from_hex("0x1234"), None);
    }

    #[test]
    fn test_scalar_invert() {
        let a = Scalar::from_u64(7);
        let a_inv = a.invert().unwrap();
        assert_eq!(a * a_inv, Scalar::one());
        assert!(Scalar::zero().invert().is_none());
    }

    #[test]
    fn test_serde_formats() {
        let s = Scalar::from_u64(123456789);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, format!("\"{}\"", s.to_hex()));
        assert_eq!(serde_json::from_str::<Scalar>(&json).unwrap(), s);

        let bytes = bincode::serialize(&s).unwrap();
        assert_eq!(bytes, s.to_bytes().to_vec());
        assert_eq!(bincode::deserialize::<Scalar>(&bytes).unwrap(), s);
    }
}
