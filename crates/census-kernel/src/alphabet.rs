// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ordered single-byte alphabets with O(1) symbol lookup.

use std::fmt;

use crate::error::{KernelError, KernelResult};

/// Ordered sequence of distinct ASCII symbols.
///
/// Defines the bijection symbol → dense index `[0, len)`. Lookup goes through
/// a 256-entry table indexed by the raw byte, so bytes outside the alphabet
/// resolve to `None` without hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    text: String,
    lookup: [Option<u8>; 256],
}

impl Alphabet {
    /// Builds an alphabet from its symbols in order.
    ///
    /// Rejects non-ASCII bytes and repeated symbols.
    pub fn new(symbols: &str) -> KernelResult<Self> {
        let mut lookup = [None; 256];
        for (position, &byte) in symbols.as_bytes().iter().enumerate() {
            if !byte.is_ascii() {
                return Err(KernelError::NonAsciiSymbol { byte });
            }
            let slot = &mut lookup[usize::from(byte)];
            if slot.is_some() {
                return Err(KernelError::DuplicateSymbol {
                    symbol: char::from(byte),
                    position,
                });
            }
            // ASCII alphabets hold at most 128 symbols.
            *slot = u8::try_from(position).ok();
        }
        Ok(Self {
            text: symbols.to_owned(),
            lookup,
        })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Dense index of `byte`, or `None` if it is not a symbol.
    #[inline]
    pub fn index_of(&self, byte: u8) -> Option<usize> {
        self.lookup[usize::from(byte)].map(usize::from)
    }

    /// True when `byte` is a symbol of this alphabet.
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.lookup[usize::from(byte)].is_some()
    }

    /// Symbols in order, as bytes.
    pub fn symbols(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Symbols in order, as the original string.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Alphabet").field(&self.text).finish()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_symbol_order() {
        let alphabet = Alphabet::new("aAbB").expect("valid alphabet");
        assert_eq!(alphabet.len(), 4);
        assert_eq!(alphabet.index_of(b'a'), Some(0));
        assert_eq!(alphabet.index_of(b'A'), Some(1));
        assert_eq!(alphabet.index_of(b'B'), Some(3));
        assert_eq!(alphabet.index_of(b'c'), None);
        assert!(!alphabet.contains(0));
    }

    #[test]
    fn duplicate_symbols_are_rejected() {
        let err = Alphabet::new("abca").expect_err("duplicate");
        assert!(matches!(
            err,
            KernelError::DuplicateSymbol {
                symbol: 'a',
                position: 3
            }
        ));
    }

    #[test]
    fn non_ascii_symbols_are_rejected() {
        let err = Alphabet::new("aé").expect_err("non-ascii");
        assert!(matches!(err, KernelError::NonAsciiSymbol { .. }));
    }

    #[test]
    fn empty_alphabet_knows_nothing() {
        let alphabet = Alphabet::new("").expect("empty is valid");
        assert!(alphabet.is_empty());
        assert_eq!(alphabet.index_of(b'a'), None);
    }
}
