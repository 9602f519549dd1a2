use thiserror::Error;

/// Error types for the cryptographic primitives
#[derive(Debug, Error)]
pub enum Error {
    #[error("verivote: integer is out of range for the group")]
    IntegerOutOfRange,

    #[error("verivote: elgamal encryption requires a non-zero nonce")]
    ZeroNonce,

    #[error("verivote: elgamal secret key must be non-zero")]
    ZeroSecretKey,

    #[error("verivote: disjunctive proof requires a 0 or 1 plaintext, got {0}")]
    InvalidPlaintextForProof(u64),
}

/// Ballot encryption errors
///
/// Every failure is attributable to a specific ballot, contest or selection
/// and carries its object id so callers can locate it.
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("verivote validation: selection {found} does not match description {expected}")]
    SelectionMismatch { expected: String, found: String },

    #[error("verivote validation: selection {object_id} has vote value {value}, expected 0 or 1")]
    InvalidVoteValue { object_id: String, value: u64 },

    #[error("verivote validation: contest {found} does not match description {expected}")]
    ContestMismatch { expected: String, found: String },

    #[error("verivote validation: contest {object_id} contains duplicate selection {selection_id}")]
    DuplicateSelection {
        object_id: String,
        selection_id: String,
    },

    #[error("verivote validation: contest {object_id} has {found} selections, description defines {allowed}")]
    TooManySelections {
        object_id: String,
        found: usize,
        allowed: usize,
    },

    #[error("verivote validation: contest {object_id} casts {cast} votes, only {allowed} allowed")]
    OvervotedContest {
        object_id: String,
        cast: u64,
        allowed: u64,
    },

    #[error("verivote validation: ballot {object_id} references style {found}, expected {expected}")]
    BallotStyleMismatch {
        object_id: String,
        expected: String,
        found: String,
    },

    #[error("verivote validation: no ballot style {0} in election metadata")]
    BallotStyleNotFound(String),

    #[error("verivote: mismatching selection proof for selection {object_id}")]
    SelectionProofInvalid { object_id: String },

    #[error("verivote: mismatching contest proof for contest {object_id}")]
    ContestProofInvalid { object_id: String },

    #[error("verivote: mismatching ballot proof for ballot {object_id}")]
    BallotProofInvalid { object_id: String },

    #[error("verivote: {0}")]
    Crypto(#[from] Error),
}
