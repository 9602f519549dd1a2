use crate::elgamal::ElGamalCiphertext;
use crate::error::Error;
use crate::group::{
    a_minus_b_mod_q, add_mod_q, g_pow_p, int_to_q, mult_mod_p, mult_mod_q, negate_mod_q, pow_mod_p,
    ElementModP, ElementModQ,
};
use crate::hash_elems;
use crate::nonces::NonceSequence;
use crate::serde_hex::{ElementModPHex, ElementModQHex, Hex};

/// A disjunctive Chaum-Pedersen proof that a ciphertext encrypts 0 or 1,
/// without revealing which.
///
/// The proof carries a full Sigma transcript for both branches; the branch
/// matching the real plaintext is genuine, the other is simulated by fixing
/// its challenge and response first. The Fiat-Shamir challenge binds both
/// sets of commitments, and soundness rests on `challenge` equalling the sum
/// of the two branch challenges mod Q.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct DisjunctiveChaumPedersenProof {
    #[serde(with = "ElementModPHex")]
    pub proof_zero_pad: ElementModP,

    #[serde(with = "ElementModPHex")]
    pub proof_zero_data: ElementModP,

    #[serde(with = "ElementModPHex")]
    pub proof_one_pad: ElementModP,

    #[serde(with = "ElementModPHex")]
    pub proof_one_data: ElementModP,

    #[serde(with = "ElementModQHex")]
    pub proof_zero_challenge: ElementModQ,

    #[serde(with = "ElementModQHex")]
    pub proof_one_challenge: ElementModQ,

    #[serde(with = "ElementModQHex")]
    pub challenge: ElementModQ,

    #[serde(with = "ElementModQHex")]
    pub proof_zero_response: ElementModQ,

    #[serde(with = "ElementModQHex")]
    pub proof_one_response: ElementModQ,
}

/// Construct a disjunctive proof for a ciphertext known to encrypt
/// `plaintext` (0 or 1) under `nonce`. Proof randomness is drawn
/// deterministically from `seed`, so identical inputs yield an identical
/// proof.
pub fn make_disjunctive_chaum_pedersen(
    message: &ElGamalCiphertext,
    nonce: &ElementModQ,
    public_key: &ElementModP,
    seed: &ElementModQ,
    plaintext: u64,
) -> Result<DisjunctiveChaumPedersenProof, Error> {
    match plaintext {
        0 => Ok(make_disjunctive_chaum_pedersen_zero(
            message, nonce, public_key, seed,
        )),
        1 => Ok(make_disjunctive_chaum_pedersen_one(
            message, nonce, public_key, seed,
        )),
        _ => Err(Error::InvalidPlaintextForProof(plaintext)),
    }
}

fn make_disjunctive_chaum_pedersen_zero(
    message: &ElGamalCiphertext,
    nonce: &ElementModQ,
    public_key: &ElementModP,
    seed: &ElementModQ,
) -> DisjunctiveChaumPedersenProof {
    let randoms = NonceSequence::with_header(seed, "disjoint-chaum-pedersen-proof");
    let c1 = randoms.get(0);
    let v1 = randoms.get(1);
    let u0 = randoms.get(2);

    // Genuine zero branch.
    let a0 = g_pow_p(&u0);
    let b0 = pow_mod_p(public_key, &u0);

    // Simulated one branch: fix (c1, v1), derive consistent commitments.
    let a1 = mult_mod_p(&g_pow_p(&v1), &pow_mod_p(&message.pad, &negate_mod_q(&c1)));
    let b1 = mult_mod_p(
        &mult_mod_p(&g_pow_p(&c1), &pow_mod_p(public_key, &v1)),
        &pow_mod_p(&message.data, &negate_mod_q(&c1)),
    );

    let challenge = hash_elems!(public_key, &message.pad, &message.data, &a0, &b0, &a1, &b1);
    let c0 = a_minus_b_mod_q(&challenge, &c1);
    let v0 = add_mod_q(&u0, &mult_mod_q(&c0, nonce));

    DisjunctiveChaumPedersenProof {
        proof_zero_pad: a0,
        proof_zero_data: b0,
        proof_one_pad: a1,
        proof_one_data: b1,
        proof_zero_challenge: c0,
        proof_one_challenge: c1,
        challenge,
        proof_zero_response: v0,
        proof_one_response: v1,
    }
}

fn make_disjunctive_chaum_pedersen_one(
    message: &ElGamalCiphertext,
    nonce: &ElementModQ,
    public_key: &ElementModP,
    seed: &ElementModQ,
) -> DisjunctiveChaumPedersenProof {
    let randoms = NonceSequence::with_header(seed, "disjoint-chaum-pedersen-proof");
    let c0 = randoms.get(0);
    let v0 = randoms.get(1);
    let u1 = randoms.get(2);

    // Simulated zero branch.
    let a0 = mult_mod_p(&g_pow_p(&v0), &pow_mod_p(&message.pad, &negate_mod_q(&c0)));
    let b0 = mult_mod_p(
        &pow_mod_p(public_key, &v0),
        &pow_mod_p(&message.data, &negate_mod_q(&c0)),
    );

    // Genuine one branch.
    let a1 = g_pow_p(&u1);
    let b1 = pow_mod_p(public_key, &u1);

    let challenge = hash_elems!(public_key, &message.pad, &message.data, &a0, &b0, &a1, &b1);
    let c1 = a_minus_b_mod_q(&challenge, &c0);
    let v1 = add_mod_q(&u1, &mult_mod_q(&c1, nonce));

    DisjunctiveChaumPedersenProof {
        proof_zero_pad: a0,
        proof_zero_data: b0,
        proof_one_pad: a1,
        proof_one_data: b1,
        proof_zero_challenge: c0,
        proof_one_challenge: c1,
        challenge,
        proof_zero_response: v0,
        proof_one_response: v1,
    }
}

impl DisjunctiveChaumPedersenProof {
    /// Verify the proof against the ciphertext it was made for.
    ///
    /// Recomputes the Fiat-Shamir challenge from public values, checks it
    /// splits into the two branch challenges, then checks each branch's
    /// Sigma equations independently.
    pub fn is_valid(&self, message: &ElGamalCiphertext, public_key: &ElementModP) -> bool {
        let alpha = &message.pad;
        let beta = &message.data;

        let expected_challenge = hash_elems!(
            public_key,
            alpha,
            beta,
            &self.proof_zero_pad,
            &self.proof_zero_data,
            &self.proof_one_pad,
            &self.proof_one_data
        );
        let consistent_hash = self.challenge == expected_challenge;
        let consistent_split = self.challenge
            == add_mod_q(&self.proof_zero_challenge, &self.proof_one_challenge);

        // Zero branch: g^v0 == a0 * alpha^c0 and k^v0 == b0 * beta^c0.
        let zero_pad = g_pow_p(&self.proof_zero_response)
            == mult_mod_p(
                &self.proof_zero_pad,
                &pow_mod_p(alpha, &self.proof_zero_challenge),
            );
        let zero_data = pow_mod_p(public_key, &self.proof_zero_response)
            == mult_mod_p(
                &self.proof_zero_data,
                &pow_mod_p(beta, &self.proof_zero_challenge),
            );

        // One branch: g^v1 == a1 * alpha^c1 and g^c1 * k^v1 == b1 * beta^c1
        // (the g^c1 factor accounts for the encrypted 1 in the exponent).
        let one_pad = g_pow_p(&self.proof_one_response)
            == mult_mod_p(
                &self.proof_one_pad,
                &pow_mod_p(alpha, &self.proof_one_challenge),
            );
        let one_data = mult_mod_p(
            &g_pow_p(&self.proof_one_challenge),
            &pow_mod_p(public_key, &self.proof_one_response),
        ) == mult_mod_p(
            &self.proof_one_data,
            &pow_mod_p(beta, &self.proof_one_challenge),
        );

        consistent_hash && consistent_split && zero_pad && zero_data && one_pad && one_data
    }
}

/// A Chaum-Pedersen proof that a ciphertext (typically a homomorphic
/// accumulation) encrypts exactly a known constant.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ConstantChaumPedersenProof {
    #[serde(with = "ElementModPHex")]
    pub pad: ElementModP,

    #[serde(with = "ElementModPHex")]
    pub data: ElementModP,

    #[serde(with = "ElementModQHex")]
    pub challenge: ElementModQ,

    #[serde(with = "ElementModQHex")]
    pub response: ElementModQ,

    pub constant: u64,
}

/// Prove that `message` encrypts `constant` under the (aggregate) `nonce`.
pub fn make_constant_chaum_pedersen(
    message: &ElGamalCiphertext,
    constant: u64,
    nonce: &ElementModQ,
    public_key: &ElementModP,
    seed: &ElementModQ,
) -> Result<ConstantChaumPedersenProof, Error> {
    if nonce.is_zero() {
        return Err(Error::ZeroNonce);
    }
    let randoms = NonceSequence::with_header(seed, "constant-chaum-pedersen-proof");
    let u = randoms.get(0);

    let pad = g_pow_p(&u);
    let data = pow_mod_p(public_key, &u);

    let challenge = hash_elems!(public_key, &message.pad, &message.data, &pad, &data);
    let response = add_mod_q(&u, &mult_mod_q(&challenge, nonce));

    Ok(ConstantChaumPedersenProof {
        pad,
        data,
        challenge,
        response,
        constant,
    })
}

impl ConstantChaumPedersenProof {
    /// Verify the proof against the ciphertext it was made for.
    pub fn is_valid(&self, message: &ElGamalCiphertext, public_key: &ElementModP) -> bool {
        let expected_challenge = hash_elems!(
            public_key,
            &message.pad,
            &message.data,
            &self.pad,
            &self.data
        );
        let consistent_hash = self.challenge == expected_challenge;

        // g^v == a * A^c
        let consistent_pad = g_pow_p(&self.response)
            == mult_mod_p(&self.pad, &pow_mod_p(&message.pad, &self.challenge));

        // g^(c*L) * k^v == b * B^c, subtracting the constant out of the data.
        let constant_offset = mult_mod_q(&self.challenge, &int_to_q(self.constant));
        let consistent_data = mult_mod_p(
            &g_pow_p(&constant_offset),
            &pow_mod_p(public_key, &self.response),
        ) == mult_mod_p(&self.data, &pow_mod_p(&message.data, &self.challenge));

        consistent_hash && consistent_pad && consistent_data
    }
}
