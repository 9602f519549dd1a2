use crate::group::{ElementModP, ElementModQ};
use crate::hash::HashInput;
use crate::hash_elems;
use crate::serde_hex::{ElementModPHex, ElementModQHex, Hex};

/// Describes one selectable option within a contest.
///
/// Descriptions are external, already-validated metadata; the encryption
/// pipeline consumes them read-only and binds every ciphertext and proof to
/// their `crypto_hash`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SelectionDescription {
    pub object_id: String,
    pub sequence_order: u64,
}

impl SelectionDescription {
    pub fn new(object_id: &str, sequence_order: u64) -> Self {
        SelectionDescription {
            object_id: object_id.to_string(),
            sequence_order,
        }
    }

    /// Deterministic digest over the identifying fields, so a ciphertext
    /// cannot be replayed against a different selection definition.
    pub fn crypto_hash(&self) -> ElementModQ {
        hash_elems!(&self.object_id, self.sequence_order)
    }
}

/// Describes one contest on a ballot style.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ContestDescription {
    pub object_id: String,
    pub sequence_order: u64,
    pub ballot_selections: Vec<SelectionDescription>,

    /// Number of seats to elect; the homomorphic total of every encrypted
    /// contest is padded up to exactly this count.
    pub number_elected: u64,

    /// Maximum number of votes a voter may cast. Only n-of-m contests
    /// (`votes_allowed == number_elected`) are fully supported.
    pub votes_allowed: u64,
}

impl ContestDescription {
    pub fn crypto_hash(&self) -> ElementModQ {
        let selection_hashes: Vec<ElementModQ> = self
            .ballot_selections
            .iter()
            .map(|selection| selection.crypto_hash())
            .collect();

        let mut inputs = vec![
            HashInput::from(&self.object_id),
            HashInput::from(self.sequence_order),
            HashInput::from(self.number_elected),
            HashInput::from(self.votes_allowed),
        ];
        inputs.extend(selection_hashes.iter().map(HashInput::from));
        hash_elems(&inputs)
    }
}

/// A ballot style: the set of contests a given ballot presents.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BallotStyle {
    pub object_id: String,

    /// Object ids of the contests on this style, in presentation order.
    pub contests: Vec<String>,
}

/// Election metadata consumed by the encryption pipeline.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ElectionMetadata {
    pub object_id: String,
    pub ballot_styles: Vec<BallotStyle>,
    pub contests: Vec<ContestDescription>,
}

impl ElectionMetadata {
    /// Get a ballot style with the given ID
    pub fn get_ballot_style(&self, style_id: &str) -> Option<&BallotStyle> {
        for style in self.ballot_styles.iter() {
            if style.object_id == style_id {
                return Some(style);
            }
        }
        None
    }

    /// Get the contest descriptions for a ballot style, in the declaration
    /// order of `contests`. Nonce indices depend on this order staying
    /// deterministic.
    pub fn get_contests_for(&self, style_id: &str) -> Vec<&ContestDescription> {
        let style = match self.get_ballot_style(style_id) {
            Some(style) => style,
            None => return vec![],
        };
        self.contests
            .iter()
            .filter(|contest| style.contests.contains(&contest.object_id))
            .collect()
    }
}

/// The public encryption context for an election: everything a device needs
/// to encrypt ballots, and nothing secret.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CyphertextElection {
    #[serde(with = "ElementModPHex")]
    pub elgamal_public_key: ElementModP,

    #[serde(with = "ElementModQHex")]
    pub crypto_extended_base_hash: ElementModQ,
}
