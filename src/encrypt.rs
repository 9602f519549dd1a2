use crate::ballot::{
    CyphertextBallot, CyphertextBallotContest, CyphertextBallotSelection, PlaintextBallot,
    PlaintextBallotContest, PlaintextBallotSelection,
};
use crate::chaum_pedersen::{make_constant_chaum_pedersen, make_disjunctive_chaum_pedersen};
use crate::election::{ContestDescription, CyphertextElection, ElectionMetadata, SelectionDescription};
use crate::elgamal::{elgamal_add, elgamal_encrypt};
use crate::error::EncryptionError;
use crate::group::{add_mod_q, int_to_q, rand_q, ElementModP, ElementModQ};
use crate::hash_elems;
use crate::nonces::NonceSequence;
use rand_core::{CryptoRng, RngCore};
use tracing::warn;

/// Caches the election metadata and encryption context so ballots can be
/// encrypted one after another.
pub struct EncryptionCompositor<'a> {
    metadata: &'a ElectionMetadata,
    encryption: &'a CyphertextElection,
}

impl<'a> EncryptionCompositor<'a> {
    pub fn new(metadata: &'a ElectionMetadata, encryption: &'a CyphertextElection) -> Self {
        EncryptionCompositor {
            metadata,
            encryption,
        }
    }

    /// Encrypt the specified ballot using the cached election context.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        ballot: &PlaintextBallot,
        rng: &mut R,
    ) -> Result<CyphertextBallot, EncryptionError> {
        encrypt_ballot(ballot, self.metadata, self.encryption, rng, true)
    }
}

/// Construct a `PlaintextBallotSelection` from its description.
///
/// Used to fill selections when a voter undervotes a ballot, and to create
/// the placeholder selections backing the constant proof.
pub fn selection_from(
    description: &SelectionDescription,
    is_placeholder: bool,
    is_affirmative: bool,
) -> PlaintextBallotSelection {
    PlaintextBallotSelection::new(
        &description.object_id,
        is_affirmative as u64,
        is_placeholder,
    )
}

/// Construct an all-false `PlaintextBallotContest` from its description,
/// for contests the voter skipped entirely.
pub fn contest_from(description: &ContestDescription) -> PlaintextBallotContest {
    PlaintextBallotContest {
        object_id: description.object_id.clone(),
        ballot_selections: description
            .ballot_selections
            .iter()
            .map(|selection_description| selection_from(selection_description, false, false))
            .collect(),
    }
}

/// Generate a placeholder selection description unique within its contest,
/// so it can be hashed and nonce-derived like a real one.
pub fn placeholder_selection_description_from(
    description: &ContestDescription,
    sequence_order: u64,
) -> SelectionDescription {
    let placeholder = format!("{}-{}", description.object_id, sequence_order);
    SelectionDescription::new(&placeholder, sequence_order)
}

/// Encrypt a single selection against its description.
///
/// The selection nonce is drawn from a sequence seeded by the description
/// hash and `seed`, indexed by the description's `sequence_order`; index 0 of
/// the same sequence seeds the proof randomness.
pub fn encrypt_selection(
    selection: &PlaintextBallotSelection,
    description: &SelectionDescription,
    elgamal_public_key: &ElementModP,
    seed: &ElementModQ,
    is_placeholder: bool,
    should_verify_proofs: bool,
) -> Result<CyphertextBallotSelection, EncryptionError> {
    selection.is_valid(&description.object_id)?;

    let description_hash = description.crypto_hash();
    let nonce_sequence = NonceSequence::new(&description_hash, seed);
    let selection_nonce = nonce_sequence.get(description.sequence_order);
    let proof_seed = nonce_sequence.get(0);
    let selection_representation = selection.to_int();

    let ciphertext = elgamal_encrypt(
        selection_representation,
        &selection_nonce,
        elgamal_public_key,
    )?;

    let proof = make_disjunctive_chaum_pedersen(
        &ciphertext,
        &selection_nonce,
        elgamal_public_key,
        &proof_seed,
        selection_representation,
    )?;

    let encrypted_selection = CyphertextBallotSelection {
        object_id: selection.object_id.clone(),
        description_hash: description_hash.clone(),
        ciphertext,
        is_placeholder,
        nonce: selection_nonce,
        proof,
    };

    if should_verify_proofs
        && !encrypted_selection.is_valid_encryption(&description_hash, elgamal_public_key)
    {
        warn!(
            object_id = %encrypted_selection.object_id,
            "mismatching selection proof"
        );
        return Err(EncryptionError::SelectionProofInvalid {
            object_id: encrypted_selection.object_id,
        });
    }

    Ok(encrypted_selection)
}

/// Encrypt a contest against its description.
///
/// Accepts a contest that may include only the voter's `true` selections:
/// missing selections are filled with explicit zeros, then exactly
/// `number_elected` placeholder selections are appended, encrypted as 1
/// until the true-count reaches `number_elected` and as 0 thereafter. The
/// total true-count therefore always equals `number_elected`, which is what
/// the constant proof asserts.
pub fn encrypt_contest(
    contest: &PlaintextBallotContest,
    description: &ContestDescription,
    elgamal_public_key: &ElementModP,
    seed: &ElementModQ,
    should_verify_proofs: bool,
) -> Result<CyphertextBallotContest, EncryptionError> {
    contest.is_valid(
        &description.object_id,
        description.ballot_selections.len(),
        description.number_elected,
        description.votes_allowed,
    )?;

    let description_hash = description.crypto_hash();
    let nonce_sequence = NonceSequence::new(&description_hash, seed);
    let contest_nonce = nonce_sequence.get(description.sequence_order);
    let proof_seed = nonce_sequence.get(0);

    let capacity = description.ballot_selections.len() + description.number_elected as usize;
    let mut encrypted_selections = Vec::with_capacity(capacity);

    let mut selection_count = 0u64;
    let mut highest_sequence_order = 0u64;

    // Iterate the descriptions (never the voter's list) so nonce indices
    // stay deterministic. A selection the voter did not supply is encrypted
    // as an explicit zero.
    for selection_description in description.ballot_selections.iter() {
        if selection_description.sequence_order > highest_sequence_order {
            highest_sequence_order = selection_description.sequence_order;
        }

        let encrypted_selection = match contest
            .ballot_selections
            .iter()
            .find(|selection| selection.object_id == selection_description.object_id)
        {
            Some(selection) => {
                selection_count += selection.to_int();
                encrypt_selection(
                    selection,
                    selection_description,
                    elgamal_public_key,
                    &contest_nonce,
                    false,
                    should_verify_proofs,
                )?
            }
            None => encrypt_selection(
                &selection_from(selection_description, false, false),
                selection_description,
                elgamal_public_key,
                &contest_nonce,
                false,
                should_verify_proofs,
            )?,
        };
        encrypted_selections.push(encrypted_selection);
    }

    // One placeholder per seat: true while seats remain unfilled, false
    // after, so the contest total always lands on number_elected.
    for i in 0..description.number_elected {
        let select_placeholder = selection_count < description.number_elected;
        if select_placeholder {
            selection_count += 1;
        }

        let placeholder_description =
            placeholder_selection_description_from(description, highest_sequence_order + 1 + i);

        let encrypted_selection = encrypt_selection(
            &selection_from(&placeholder_description, true, select_placeholder),
            &placeholder_description,
            elgamal_public_key,
            &contest_nonce,
            true,
            should_verify_proofs,
        )?;
        encrypted_selections.push(encrypted_selection);
    }

    if selection_count < description.votes_allowed {
        warn!(
            object_id = %contest.object_id,
            "mismatching selection count: only n-of-m style elections are currently supported"
        );
    }

    let accumulation = {
        let ciphertexts: Vec<_> = encrypted_selections
            .iter()
            .map(|selection| &selection.ciphertext)
            .collect();
        elgamal_add(&ciphertexts)
    };
    let aggregate_nonce = encrypted_selections
        .iter()
        .fold(int_to_q(0), |acc, selection| {
            add_mod_q(&acc, &selection.nonce)
        });

    let proof = make_constant_chaum_pedersen(
        &accumulation,
        description.number_elected,
        &aggregate_nonce,
        elgamal_public_key,
        &proof_seed,
    )?;

    let encrypted_contest = CyphertextBallotContest {
        object_id: contest.object_id.clone(),
        description_hash: description_hash.clone(),
        ballot_selections: encrypted_selections,
        nonce: contest_nonce,
        proof,
    };

    if should_verify_proofs
        && !(encrypted_contest.proof.constant == description.number_elected
            && encrypted_contest.is_valid_encryption(&description_hash, elgamal_public_key))
    {
        warn!(
            object_id = %encrypted_contest.object_id,
            "mismatching contest proof"
        );
        return Err(EncryptionError::ContestProofInvalid {
            object_id: encrypted_contest.object_id,
        });
    }

    Ok(encrypted_contest)
}

/// Encrypt a full ballot in the context of an election.
///
/// The ballot may omit contests entirely; omitted contests are encrypted as
/// all-false selections plus true placeholders, so every contest on the
/// style appears in the output. One master nonce is drawn from `rng` per
/// call and combined with the extended base hash and the ballot's object id
/// to seed every contest below it.
pub fn encrypt_ballot<R: RngCore + CryptoRng>(
    ballot: &PlaintextBallot,
    election_metadata: &ElectionMetadata,
    encryption_context: &CyphertextElection,
    rng: &mut R,
    should_verify_proofs: bool,
) -> Result<CyphertextBallot, EncryptionError> {
    let style = election_metadata
        .get_ballot_style(&ballot.ballot_style)
        .ok_or_else(|| EncryptionError::BallotStyleNotFound(ballot.ballot_style.clone()))?;

    ballot.is_valid(&style.object_id)?;

    let random_master_nonce = rand_q(rng);
    let hashed_ballot_nonce = hash_elems!(
        &encryption_context.crypto_extended_base_hash,
        &ballot.object_id,
        &random_master_nonce
    );

    let mut encrypted_contests = Vec::new();

    // Only iterate on contests for this specific ballot style. A contest
    // the voter did not vote still gets encrypted, from synthesized
    // all-false selections.
    for description in election_metadata.get_contests_for(&ballot.ballot_style) {
        let encrypted_contest = match ballot
            .contests
            .iter()
            .find(|contest| contest.object_id == description.object_id)
        {
            Some(contest) => encrypt_contest(
                contest,
                description,
                &encryption_context.elgamal_public_key,
                &hashed_ballot_nonce,
                should_verify_proofs,
            )?,
            None => encrypt_contest(
                &contest_from(description),
                description,
                &encryption_context.elgamal_public_key,
                &hashed_ballot_nonce,
                should_verify_proofs,
            )?,
        };
        encrypted_contests.push(encrypted_contest);
    }

    // Placeholder derivation only; real tracking codes are assigned by the
    // orchestration layer.
    let tracking_id = hash_elems!(
        &encryption_context.crypto_extended_base_hash,
        &ballot.object_id
    )
    .to_hex();

    let encrypted_ballot = CyphertextBallot {
        object_id: ballot.object_id.clone(),
        ballot_style: ballot.ballot_style.clone(),
        extended_base_hash: encryption_context.crypto_extended_base_hash.clone(),
        contests: encrypted_contests,
        nonce: random_master_nonce,
        tracking_id,
    };

    if should_verify_proofs
        && !encrypted_ballot.is_valid_encryption(
            &encryption_context.crypto_extended_base_hash,
            &encryption_context.elgamal_public_key,
        )
    {
        warn!(
            object_id = %encrypted_ballot.object_id,
            "mismatching ballot proof"
        );
        return Err(EncryptionError::BallotProofInvalid {
            object_id: encrypted_ballot.object_id,
        });
    }

    Ok(encrypted_ballot)
}
