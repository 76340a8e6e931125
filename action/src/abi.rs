//! 32-byte word helpers for the Ethereum ABI layout.
//!
//! Only the pieces the upgrade payload needs are implemented: unsigned
//! integers (offsets and lengths), left-aligned `bytes2`, right-aligned
//! addresses and dynamic arrays of static elements.

use crate::EncodingError;
use govgate_types::{Address, ContractCode};

/// Size of an ABI word in bytes.
pub const WORD: usize = 32;

pub type Word = [u8; WORD];

pub fn uint_word(value: u64) -> Word {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// `bytes2` values are left-aligned and zero-padded on the right.
pub fn code_word(code: &ContractCode) -> Word {
    let mut word = [0u8; WORD];
    word[..ContractCode::WIDTH].copy_from_slice(code.as_bytes());
    word
}

/// Addresses are right-aligned and zero-padded on the left.
pub fn address_word(address: &Address) -> Word {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address.as_slice());
    word
}

/// `at` is the byte position of the word, used for error reporting.
pub fn uint_from_word(word: &Word, at: usize) -> Result<u64, EncodingError> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(EncodingError::ValueOverflow(at));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(buf))
}

pub fn code_from_word(word: &Word, at: usize) -> Result<ContractCode, EncodingError> {
    if word[ContractCode::WIDTH..].iter().any(|b| *b != 0) {
        return Err(EncodingError::NonZeroPadding(at));
    }
    Ok(ContractCode::new([word[0], word[1]])?)
}

pub fn address_from_word(word: &Word, at: usize) -> Result<Address, EncodingError> {
    if word[..WORD - 20].iter().any(|b| *b != 0) {
        return Err(EncodingError::NonZeroPadding(at));
    }
    Ok(Address::from_slice(&word[WORD - 20..]))
}

/// Bounds-checked reader over an encoded payload.
pub struct WordReader<'a> {
    data: &'a [u8],
}

impl<'a> WordReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn word_at(&self, at: usize) -> Result<&'a Word, EncodingError> {
        let end = at.checked_add(WORD).ok_or(EncodingError::InvalidOffset(at))?;
        let slice = self.data.get(at..end).ok_or(EncodingError::Truncated {
            needed: end,
            available: self.data.len(),
        })?;
        <&Word>::try_from(slice).map_err(|_| EncodingError::InvalidOffset(at))
    }

    pub fn uint_at(&self, at: usize) -> Result<u64, EncodingError> {
        uint_from_word(self.word_at(at)?, at)
    }

    /// Read the offset stored in head slot `index`; it must point inside the payload.
    pub fn offset(&self, index: usize) -> Result<usize, EncodingError> {
        let at = index * WORD;
        let raw = self.uint_at(at)?;
        let offset = usize::try_from(raw).map_err(|_| EncodingError::ValueOverflow(at))?;
        if offset >= self.data.len() {
            return Err(EncodingError::InvalidOffset(offset));
        }
        Ok(offset)
    }

    /// Read a dynamic array of static elements starting at `offset`.
    pub fn array_at<T>(
        &self,
        offset: usize,
        element: impl Fn(&Word, usize) -> Result<T, EncodingError>,
    ) -> Result<Vec<T>, EncodingError> {
        let len = self.uint_at(offset)?;
        // A length larger than the remaining words can never be satisfied.
        let remaining = (self.data.len() - offset) / WORD - 1;
        let len = usize::try_from(len)
            .ok()
            .filter(|len| *len <= remaining)
            .ok_or(EncodingError::Truncated {
                needed: offset + WORD,
                available: self.data.len(),
            })?;

        (0..len)
            .map(|i| {
                let at = offset + WORD * (i + 1);
                element(self.word_at(at)?, at)
            })
            .collect()
    }
}
