// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy shared by every kernel engine.
//!
//! Variants fall into three groups: configuration errors raised while a
//! descriptor is compiled (the instance is never produced), contract
//! violations raised by an operation on bad arguments, and arithmetic or
//! invariant failures in the matrix engine. Degenerate answers (a zero
//! determinant, an empty match list, a dead state) are values, not errors.

use thiserror::Error;

/// Errors emitted by kernel constructors and operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A descriptor is malformed in a way no dedicated variant covers.
    #[error("config error: {0}")]
    Config(String),
    /// An alphabet lists the same symbol twice.
    #[error("duplicate symbol {symbol:?} at alphabet position {position}")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: char,
        /// Position of the second occurrence.
        position: usize,
    },
    /// An alphabet contains a byte outside the ASCII range.
    #[error("alphabet byte 0x{byte:02x} is not ASCII")]
    NonAsciiSymbol {
        /// The offending byte.
        byte: u8,
    },
    /// A transition table does not have `states * letters` entries.
    #[error("transition table has {len} entries, expected {states} states x {letters} letters")]
    TableShape {
        /// Number of entries supplied.
        len: usize,
        /// Number of states declared by the yield table.
        states: usize,
        /// Alphabet size.
        letters: usize,
    },
    /// A transition targets a state that does not exist.
    #[error("transition {index} targets state {target}, but only {states} states exist")]
    StateOutOfRange {
        /// Flat index of the offending entry.
        index: usize,
        /// The stored target.
        target: i64,
        /// Number of states.
        states: usize,
    },
    /// A matrix descriptor's entry count does not match its dimension.
    #[error("matrix of dimension {dimension} needs {expected} entries, got {actual}")]
    EntryCount {
        /// Declared dimension.
        dimension: usize,
        /// `dimension * dimension`.
        expected: usize,
        /// Entries supplied.
        actual: usize,
    },
    /// A descriptor string (substitution images, matcher pattern) uses a
    /// letter outside its alphabet. Raised at construction only.
    #[error("{text:?}: byte 0x{byte:02x} at position {position} is not in the alphabet")]
    ForeignLetter {
        /// The offending descriptor string.
        text: String,
        /// The offending byte.
        byte: u8,
        /// Zero-based position in `text`.
        position: usize,
    },
    /// Two matrices of different dimensions were multiplied.
    #[error("cannot multiply matrices of dimension {left} and {right}")]
    DimensionMismatch {
        /// Dimension of the left operand.
        left: usize,
        /// Dimension of the right operand.
        right: usize,
    },
    /// An operation's word contains a byte outside the engine's alphabet.
    #[error("byte 0x{byte:02x} at position {position} is not in the alphabet")]
    UnknownSymbol {
        /// The offending byte.
        byte: u8,
        /// Zero-based position in the word.
        position: usize,
    },
    /// A word and its extension differ in length.
    #[error("word has length {word} but extension has length {extension}")]
    LengthMismatch {
        /// Length of the current word.
        word: usize,
        /// Length of the proposed extension.
        extension: usize,
    },
    /// A fixed-width computation left the `i64` range.
    #[error("i64 overflow in {0}")]
    Overflow(&'static str),
    /// A Bareiss division left a remainder; the elimination invariant is broken.
    #[error("bareiss step {step}: {numerator} is not divisible by pivot {pivot}")]
    InexactDivision {
        /// Elimination step at which the division was attempted.
        step: usize,
        /// Value being divided.
        numerator: i128,
        /// Previous pivot.
        pivot: i128,
    },
    /// A named entry of a [`KernelConfig`](crate::KernelConfig) failed to compile.
    #[error("{kind} `{name}`: {source}")]
    InvalidEntry {
        /// Section of the config (`automaton`, `checker`, `matrix`).
        kind: &'static str,
        /// Entry name.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<KernelError>,
    },
    /// CBOR encoding failed.
    #[error("encode error: {0}")]
    Encode(String),
    /// CBOR decoding failed.
    #[error("decode error: {0}")]
    Decode(String),
    /// JSON (de)serialization of a config document failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the kernel.
pub type KernelResult<T> = Result<T, KernelError>;
