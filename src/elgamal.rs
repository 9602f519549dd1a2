use crate::error::Error;
use crate::group::{
    g_pow_p, int_to_p, int_to_q, mult_mod_p, negate_mod_q, pow_mod_p, rand_q, ElementModP,
    ElementModQ,
};
use crate::hash_elems;
use crate::serde_hex::{ElementModPHex, Hex};
use rand_core::{CryptoRng, RngCore};

/// An exponential ("lifted") ElGamal ciphertext.
///
/// `pad = g^nonce` and `data = g^message * public_key^nonce`, so pointwise
/// multiplication of two ciphertexts encrypts the sum of their plaintexts.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ElGamalCiphertext {
    #[serde(with = "ElementModPHex")]
    pub pad: ElementModP,

    #[serde(with = "ElementModPHex")]
    pub data: ElementModP,
}

impl ElGamalCiphertext {
    pub fn crypto_hash(&self) -> ElementModQ {
        hash_elems!(&self.pad, &self.data)
    }
}

/// Encrypt a small non-negative integer under the given public key.
///
/// The zero nonce is rejected: it would make `pad = 1` and leak the message.
pub fn elgamal_encrypt(
    message: u64,
    nonce: &ElementModQ,
    public_key: &ElementModP,
) -> Result<ElGamalCiphertext, Error> {
    if nonce.is_zero() {
        return Err(Error::ZeroNonce);
    }
    Ok(ElGamalCiphertext {
        pad: g_pow_p(nonce),
        data: mult_mod_p(&g_pow_p(&int_to_q(message)), &pow_mod_p(public_key, nonce)),
    })
}

/// Homomorphically accumulate ciphertexts by pointwise multiplication.
///
/// The result encrypts the sum of the plaintexts under the sum of the nonces.
pub fn elgamal_add(ciphertexts: &[&ElGamalCiphertext]) -> ElGamalCiphertext {
    let mut accumulation = ElGamalCiphertext {
        pad: int_to_p(1),
        data: int_to_p(1),
    };
    for ciphertext in ciphertexts {
        accumulation = ElGamalCiphertext {
            pad: mult_mod_p(&accumulation.pad, &ciphertext.pad),
            data: mult_mod_p(&accumulation.data, &ciphertext.data),
        };
    }
    accumulation
}

/// An ElGamal key pair.
///
/// The encryption pipeline only ever sees the public key; the full pair
/// exists for key generation and for the decryption collaborator that
/// downstream tallying (and our tests) use.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ElGamalKeyPair {
    #[serde(skip)]
    pub secret_key: ElementModQ,

    #[serde(with = "ElementModPHex")]
    pub public_key: ElementModP,
}

impl ElGamalKeyPair {
    pub fn from_secret(secret_key: ElementModQ) -> Result<Self, Error> {
        if secret_key.is_zero() {
            return Err(Error::ZeroSecretKey);
        }
        let public_key = g_pow_p(&secret_key);
        Ok(ElGamalKeyPair {
            secret_key,
            public_key,
        })
    }

    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, Error> {
        ElGamalKeyPair::from_secret(rand_q(rng))
    }
}

/// Decrypt an exponential ElGamal ciphertext with the secret key, searching
/// the discrete log up to `limit`. Returns `None` when the plaintext is not
/// in `0..=limit`.
pub fn elgamal_decrypt(
    ciphertext: &ElGamalCiphertext,
    secret_key: &ElementModQ,
    limit: u64,
) -> Option<u64> {
    let shared = pow_mod_p(&ciphertext.pad, secret_key);
    decode_message(&ciphertext.data, &shared, limit)
}

/// Decrypt with the encryption nonce instead of the secret key.
pub fn elgamal_decrypt_known_nonce(
    ciphertext: &ElGamalCiphertext,
    nonce: &ElementModQ,
    public_key: &ElementModP,
    limit: u64,
) -> Option<u64> {
    let shared = pow_mod_p(public_key, nonce);
    decode_message(&ciphertext.data, &shared, limit)
}

fn decode_message(data: &ElementModP, shared: &ElementModP, limit: u64) -> Option<u64> {
    // shared has order Q, so its inverse is shared^(Q-1).
    let inverse = pow_mod_p(shared, &negate_mod_q(&int_to_q(1)));
    let encoded = mult_mod_p(data, &inverse);
    (0..=limit).find(|m| g_pow_p(&int_to_q(*m)) == encoded)
}
