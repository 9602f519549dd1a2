use crate::group::{ElementModP, ElementModQ};
use std::borrow::Cow;

pub use hex_buffer_serde::Hex;

// a single-purpose type for use in `#[serde(with)]`
pub enum ElementModPHex {}

impl Hex<ElementModP> for ElementModPHex {
    type Error = String;

    fn create_bytes(element: &ElementModP) -> Cow<[u8]> {
        element.to_bytes().into()
    }

    fn from_bytes(bytes: &[u8]) -> Result<ElementModP, String> {
        ElementModP::from_bytes(bytes).map_err(|e| format!("{}", e))
    }
}

// a single-purpose type for use in `#[serde(with)]`
pub enum ElementModQHex {}

impl Hex<ElementModQ> for ElementModQHex {
    type Error = String;

    fn create_bytes(element: &ElementModQ) -> Cow<[u8]> {
        element.to_bytes().into()
    }

    fn from_bytes(bytes: &[u8]) -> Result<ElementModQ, String> {
        ElementModQ::from_bytes(bytes).map_err(|e| format!("{}", e))
    }
}
