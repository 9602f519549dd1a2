use crate::chaum_pedersen::{ConstantChaumPedersenProof, DisjunctiveChaumPedersenProof};
use crate::elgamal::{elgamal_add, ElGamalCiphertext};
use crate::error::EncryptionError;
use crate::group::{add_mod_q, int_to_q, ElementModP, ElementModQ};
use crate::hash::HashInput;
use crate::hash_elems;
use crate::serde_hex::{ElementModQHex, Hex};
use std::collections::HashSet;
use tracing::warn;

/// A voter's choice for one selection: `vote` is 0 or 1.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlaintextBallotSelection {
    pub object_id: String,
    pub vote: u64,
    pub is_placeholder: bool,
}

impl PlaintextBallotSelection {
    pub fn new(object_id: &str, vote: u64, is_placeholder: bool) -> Self {
        PlaintextBallotSelection {
            object_id: object_id.to_string(),
            vote,
            is_placeholder,
        }
    }

    pub fn is_valid(&self, expected_object_id: &str) -> Result<(), EncryptionError> {
        if self.object_id != expected_object_id {
            return Err(EncryptionError::SelectionMismatch {
                expected: expected_object_id.to_string(),
                found: self.object_id.clone(),
            });
        }
        if self.vote > 1 {
            return Err(EncryptionError::InvalidVoteValue {
                object_id: self.object_id.clone(),
                value: self.vote,
            });
        }
        Ok(())
    }

    pub fn to_int(&self) -> u64 {
        self.vote
    }
}

/// A voter's choices for one contest. May contain only the selections the
/// voter actually made; the pipeline fills in the rest as explicit zeros.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlaintextBallotContest {
    pub object_id: String,
    pub ballot_selections: Vec<PlaintextBallotSelection>,
}

impl PlaintextBallotContest {
    pub fn is_valid(
        &self,
        expected_object_id: &str,
        expected_number_of_selections: usize,
        number_elected: u64,
        votes_allowed: u64,
    ) -> Result<(), EncryptionError> {
        if self.object_id != expected_object_id {
            return Err(EncryptionError::ContestMismatch {
                expected: expected_object_id.to_string(),
                found: self.object_id.clone(),
            });
        }
        if self.ballot_selections.len() > expected_number_of_selections {
            return Err(EncryptionError::TooManySelections {
                object_id: self.object_id.clone(),
                found: self.ballot_selections.len(),
                allowed: expected_number_of_selections,
            });
        }

        let mut seen = HashSet::new();
        let mut cast = 0u64;
        for selection in self.ballot_selections.iter() {
            if !seen.insert(selection.object_id.as_str()) {
                return Err(EncryptionError::DuplicateSelection {
                    object_id: self.object_id.clone(),
                    selection_id: selection.object_id.clone(),
                });
            }
            cast += selection.to_int();
        }

        if cast > votes_allowed || cast > number_elected {
            return Err(EncryptionError::OvervotedContest {
                object_id: self.object_id.clone(),
                cast,
                allowed: votes_allowed.min(number_elected),
            });
        }
        Ok(())
    }
}

/// A voter's full ballot, validated then discarded after encryption.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PlaintextBallot {
    pub object_id: String,
    pub ballot_style: String,
    pub contests: Vec<PlaintextBallotContest>,
}

impl PlaintextBallot {
    pub fn is_valid(&self, expected_ballot_style: &str) -> Result<(), EncryptionError> {
        if self.ballot_style != expected_ballot_style {
            return Err(EncryptionError::BallotStyleMismatch {
                object_id: self.object_id.clone(),
                expected: expected_ballot_style.to_string(),
                found: self.ballot_style.clone(),
            });
        }
        Ok(())
    }
}

/// An encrypted selection with its proof of well-formedness.
///
/// The `nonce` is a derived secret kept only so proofs can be rebuilt or
/// audited; it is never serialized and can be erased once the caller is done.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CyphertextBallotSelection {
    pub object_id: String,

    #[serde(with = "ElementModQHex")]
    pub description_hash: ElementModQ,

    pub ciphertext: ElGamalCiphertext,
    pub is_placeholder: bool,

    #[serde(skip)]
    pub nonce: ElementModQ,

    pub proof: DisjunctiveChaumPedersenProof,
}

impl CyphertextBallotSelection {
    pub fn crypto_hash(&self) -> ElementModQ {
        hash_elems!(
            &self.object_id,
            &self.description_hash,
            &self.ciphertext.crypto_hash()
        )
    }

    /// Check that this selection is bound to the expected description and
    /// that its disjunctive proof holds.
    pub fn is_valid_encryption(
        &self,
        expected_description_hash: &ElementModQ,
        public_key: &ElementModP,
    ) -> bool {
        if self.description_hash != *expected_description_hash {
            warn!(
                object_id = %self.object_id,
                "selection is bound to a different description hash"
            );
            return false;
        }
        self.proof.is_valid(&self.ciphertext, public_key)
    }

    pub fn erase_nonce(&mut self) {
        self.nonce = ElementModQ::default();
    }
}

/// An encrypted contest: every selection (real and placeholder) plus a
/// constant proof over their homomorphic sum.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CyphertextBallotContest {
    pub object_id: String,

    #[serde(with = "ElementModQHex")]
    pub description_hash: ElementModQ,

    pub ballot_selections: Vec<CyphertextBallotSelection>,

    #[serde(skip)]
    pub nonce: ElementModQ,

    pub proof: ConstantChaumPedersenProof,
}

impl CyphertextBallotContest {
    /// The homomorphic sum of all selection ciphertexts, real and
    /// placeholder. Encrypts the contest's total true-count.
    pub fn elgamal_accumulate(&self) -> ElGamalCiphertext {
        let ciphertexts: Vec<&ElGamalCiphertext> = self
            .ballot_selections
            .iter()
            .map(|selection| &selection.ciphertext)
            .collect();
        elgamal_add(&ciphertexts)
    }

    /// The sum of all selection nonces mod Q: the randomness under which
    /// the accumulation is encrypted.
    pub fn aggregate_nonce(&self) -> ElementModQ {
        self.ballot_selections
            .iter()
            .fold(int_to_q(0), |acc, selection| {
                add_mod_q(&acc, &selection.nonce)
            })
    }

    pub fn crypto_hash(&self) -> ElementModQ {
        let selection_hashes: Vec<ElementModQ> = self
            .ballot_selections
            .iter()
            .map(|selection| selection.crypto_hash())
            .collect();

        let mut inputs = vec![
            HashInput::from(&self.object_id),
            HashInput::from(&self.description_hash),
        ];
        inputs.extend(selection_hashes.iter().map(HashInput::from));
        hash_elems(&inputs)
    }

    /// Check the description binding, every selection's proof, and the
    /// constant proof over the accumulation.
    pub fn is_valid_encryption(
        &self,
        expected_description_hash: &ElementModQ,
        public_key: &ElementModP,
    ) -> bool {
        if self.description_hash != *expected_description_hash {
            warn!(
                object_id = %self.object_id,
                "contest is bound to a different description hash"
            );
            return false;
        }
        for selection in self.ballot_selections.iter() {
            if !selection.is_valid_encryption(&selection.description_hash, public_key) {
                return false;
            }
        }
        self.proof.is_valid(&self.elgamal_accumulate(), public_key)
    }

    pub fn erase_nonces(&mut self) {
        self.nonce = ElementModQ::default();
        for selection in self.ballot_selections.iter_mut() {
            selection.erase_nonce();
        }
    }
}

/// An encrypted ballot: the durable, transmittable artifact. Everything but
/// the transient nonces is public.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CyphertextBallot {
    pub object_id: String,
    pub ballot_style: String,

    #[serde(with = "ElementModQHex")]
    pub extended_base_hash: ElementModQ,

    pub contests: Vec<CyphertextBallotContest>,

    #[serde(skip)]
    pub nonce: ElementModQ,

    pub tracking_id: String,
}

impl CyphertextBallot {
    pub fn crypto_hash(&self) -> ElementModQ {
        let contest_hashes: Vec<ElementModQ> = self
            .contests
            .iter()
            .map(|contest| contest.crypto_hash())
            .collect();

        let mut inputs = vec![
            HashInput::from(&self.object_id),
            HashInput::from(&self.extended_base_hash),
        ];
        inputs.extend(contest_hashes.iter().map(HashInput::from));
        hash_elems(&inputs)
    }

    /// Verify the whole ballot: base-hash binding plus every contest.
    pub fn is_valid_encryption(
        &self,
        expected_extended_base_hash: &ElementModQ,
        public_key: &ElementModP,
    ) -> bool {
        if self.extended_base_hash != *expected_extended_base_hash {
            warn!(
                object_id = %self.object_id,
                "ballot is bound to a different extended base hash"
            );
            return false;
        }
        self.contests
            .iter()
            .all(|contest| contest.is_valid_encryption(&contest.description_hash, public_key))
    }

    /// Clear every derived secret nonce once proofs are generated and
    /// verified; their leakage breaks ballot secrecy.
    pub fn erase_nonces(&mut self) {
        self.nonce = ElementModQ::default();
        for contest in self.contests.iter_mut() {
            contest.erase_nonces();
        }
    }
}
