use crate::error::Error;
use lazy_static::lazy_static;
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use std::fmt;

/// The 2048-bit MODP group 14 safe prime (RFC 3526), hex encoded.
const P_HEX: &str = "ffffffffffffffffc90fdaa22168c234c4c6628b80dc1cd129024e088a67cc74\
                     020bbea63b139b22514a08798e3404ddef9519b3cd3a431b302b0a6df25f1437\
                     4fe1356d6d51c245e485b576625e7ec6f44c42e9a637ed6b0bff5cb6f406b7ed\
                     ee386bfb5a899fa5ae9f24117c4b1fe649286651ece45b3dc2007cb8a163bf05\
                     98da48361c55d39a69163fa8fd24cf5f83655d23dca3ad961c62f356208552bb\
                     9ed529077096966d670c354e4abc9804f1746c08ca18217c32905e462e36ce3b\
                     e39e772c180e86039b2783a2ec07a28fb5c55df06f4c52c9de2bcbf695581718\
                     3995497cea956ae515d2261898fa051015728e5a8aacaa68ffffffffffffffff";

lazy_static! {
    /// The prime modulus of the full multiplicative group.
    pub static ref P: BigUint = BigUint::parse_bytes(P_HEX.as_bytes(), 16).unwrap();

    /// The order of the subgroup generated by `G`: Q = (P - 1) / 2, itself prime.
    pub static ref Q: BigUint = (&*P - 1u8) >> 1;

    /// Generator of the order-Q subgroup of quadratic residues mod P.
    pub static ref G: BigUint = BigUint::from(4u8);
}

/// Width in bytes of the canonical big-endian encoding of a group element.
pub const ELEMENT_BYTES: usize = 256;

/// An element of the full group, canonically reduced into [0, P).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ElementModP(BigUint);

/// An exponent element, canonically reduced into [0, Q).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ElementModQ(BigUint);

impl ElementModP {
    pub fn new(value: BigUint) -> Result<Self, Error> {
        if value < *P {
            Ok(ElementModP(value))
        } else {
            Err(Error::IntegerOutOfRange)
        }
    }

    pub fn as_uint(&self) -> &BigUint {
        &self.0
    }

    /// Canonical fixed-width big-endian encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        pad_be_bytes(self.0.to_bytes_be())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        ElementModP::new(BigUint::from_bytes_be(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl ElementModQ {
    pub fn new(value: BigUint) -> Result<Self, Error> {
        if value < *Q {
            Ok(ElementModQ(value))
        } else {
            Err(Error::IntegerOutOfRange)
        }
    }

    pub(crate) fn reduce(value: BigUint) -> Self {
        ElementModQ(value % &*Q)
    }

    pub fn as_uint(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Canonical fixed-width big-endian encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        pad_be_bytes(self.0.to_bytes_be())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        ElementModQ::new(BigUint::from_bytes_be(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

// Nonce fields on ciphertext entities are `#[serde(skip)]`, which needs a
// default to deserialize into. The zero element marks an erased nonce.
impl Default for ElementModQ {
    fn default() -> Self {
        ElementModQ(BigUint::zero())
    }
}

impl fmt::Display for ElementModP {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for ElementModQ {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn pad_be_bytes(mut bytes: Vec<u8>) -> Vec<u8> {
    let mut padded = vec![0u8; ELEMENT_BYTES - bytes.len()];
    padded.append(&mut bytes);
    padded
}

/// Reduce a small non-negative integer into the full group.
pub fn int_to_p(value: u64) -> ElementModP {
    ElementModP(BigUint::from(value))
}

/// Reduce a small non-negative integer into the group order.
pub fn int_to_q(value: u64) -> ElementModQ {
    ElementModQ(BigUint::from(value))
}

pub fn add_mod_q(a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
    ElementModQ((&a.0 + &b.0) % &*Q)
}

pub fn a_minus_b_mod_q(a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
    ElementModQ((&a.0 + &*Q - &b.0) % &*Q)
}

pub fn negate_mod_q(a: &ElementModQ) -> ElementModQ {
    ElementModQ((&*Q - &a.0) % &*Q)
}

pub fn mult_mod_q(a: &ElementModQ, b: &ElementModQ) -> ElementModQ {
    ElementModQ((&a.0 * &b.0) % &*Q)
}

pub fn mult_mod_p(a: &ElementModP, b: &ElementModP) -> ElementModP {
    ElementModP((&a.0 * &b.0) % &*P)
}

pub fn pow_mod_p(base: &ElementModP, exponent: &ElementModQ) -> ElementModP {
    ElementModP(base.0.modpow(&exponent.0, &*P))
}

/// Fixed generator exponentiation: G^exponent mod P.
pub fn g_pow_p(exponent: &ElementModQ) -> ElementModP {
    ElementModP(G.modpow(&exponent.0, &*P))
}

/// Draw a uniform random element of [0, Q) from a cryptographically
/// secure generator. This is the injected randomness capability used for
/// the per-ballot master nonce.
pub fn rand_q<R: RngCore + CryptoRng>(rng: &mut R) -> ElementModQ {
    ElementModQ(rng.gen_biguint_below(&*Q))
}
