use crate::group::ElementModQ;
use crate::hash_elems;

/// A deterministic, indexable, unbounded sequence of pseudo-random exponents
/// derived from a `(head, seed)` pair.
///
/// `get(i)` is O(1) and stateless, so recomputing the sequence from the same
/// pair always reproduces identical values. Index 0 is reserved by callers
/// for proof randomness; selection and contest nonces index by their own
/// `sequence_order`.
#[derive(Clone, Debug)]
pub struct NonceSequence {
    seed: ElementModQ,
}

impl NonceSequence {
    pub fn new(head: &ElementModQ, seed: &ElementModQ) -> Self {
        NonceSequence {
            seed: hash_elems!(head, seed),
        }
    }

    /// Domain-separate a sequence with a string header, for auxiliary
    /// randomness such as proof nonces.
    pub fn with_header(seed: &ElementModQ, header: &str) -> Self {
        NonceSequence {
            seed: hash_elems!(seed, header),
        }
    }

    pub fn get(&self, index: u64) -> ElementModQ {
        hash_elems!(&self.seed, index)
    }

    pub fn iter(&self) -> NonceIter<'_> {
        NonceIter {
            sequence: self,
            next: 0,
        }
    }
}

pub struct NonceIter<'a> {
    sequence: &'a NonceSequence,
    next: u64,
}

impl<'a> Iterator for NonceIter<'a> {
    type Item = ElementModQ;

    fn next(&mut self) -> Option<ElementModQ> {
        let nonce = self.sequence.get(self.next);
        self.next += 1;
        Some(nonce)
    }
}
